// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "server-list.yaml";

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(path, &contents)?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn parse_config(path: &Path, contents: &str) -> Result<Config> {
    let config: Config = if path.extension().and_then(|s| s.to_str()) == Some("yaml")
        || path.extension().and_then(|s| s.to_str()) == Some("yml") {
        serde_yaml::from_str(contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(contents).context("Failed to parse JSON config")?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_yaml_with_defaults() {
        let file = write_temp(
            ".yaml",
            "servers:\n  - name: A\n    host: 10.0.0.1\n  - name: B\n    host: example.com\n    port: 443\n",
        );

        let config = load_config(file.path()).await.unwrap();

        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers[0].name, "A");
        assert_eq!(config.servers[1].port, Some(443));
        assert_eq!(config.monitor.interval_secs, 10);
        assert_eq!(config.monitor.timeout_ms, 1000);
        assert_eq!(config.monitor.max_concurrency, 1);
        assert_eq!(config.server.listen.port(), 8080);
        assert!(!config.metrics.enabled);
    }

    #[tokio::test]
    async fn test_load_json() {
        let file = write_temp(
            ".json",
            r#"{"servers":[{"name":"A","host":"10.0.0.1"}],"monitor":{"interval_secs":30}}"#,
        );

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.monitor.interval_secs, 30);
        assert_eq!(config.monitor.timeout_ms, 1000);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let result = load_config("/nonexistent/server-list.yaml").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_servers_key_is_error() {
        let file = write_temp(".yaml", "monitor:\n  interval_secs: 5\n");
        assert!(load_config(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_error() {
        let file = write_temp(".yml", "servers: [name: A\n");
        assert!(load_config(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_validation_error_is_surfaced() {
        let file = write_temp(".yaml", "servers: []\n");
        let err = load_config(file.path()).await.unwrap_err();
        let root = err.root_cause().downcast_ref::<ConfigError>();
        assert!(matches!(root, Some(ConfigError::NoServers)));
    }
}
