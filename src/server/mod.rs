pub mod assets;
pub mod builder;
pub mod handler;
pub mod listener;

pub use assets::AssetServer;
pub use builder::ServerBuilder;
pub use handler::RequestHandler;
