// src/api/mod.rs
mod status;

pub use status::{ApiError, StatusApi, STATUS_PATH};
