use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DocentError, Result};

/// Top-level configuration for Docent.
///
/// The coordinator's network address is the only piece of external
/// configuration the session core needs; everything else is ambient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocentConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
}

impl DocentConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DocentConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DocentError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Where the remote coordinator lives and which endpoints it exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Scheme, host and port of the coordinator service.
    pub base_url: String,
    /// Path of the multipart ingestion endpoint.
    pub ingest_path: String,
    /// Path of the JSON query endpoint.
    pub query_path: String,
    /// Multipart field name carrying the document bytes.
    pub file_field: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            ingest_path: "/agent/coordinator/start_session".to_string(),
            query_path: "/agent/coordinator/query".to_string(),
            file_field: "file".to_string(),
        }
    }
}

impl CoordinatorConfig {
    /// Point the default endpoint paths at a different host.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL of the ingestion endpoint.
    pub fn ingest_url(&self) -> String {
        join_url(&self.base_url, &self.ingest_path)
    }

    /// Full URL of the query endpoint.
    pub fn query_url(&self) -> String {
        join_url(&self.base_url, &self.query_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = DocentConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.coordinator.base_url, "http://localhost:8000");
        assert_eq!(
            config.coordinator.ingest_path,
            "/agent/coordinator/start_session"
        );
        assert_eq!(config.coordinator.query_path, "/agent/coordinator/query");
        assert_eq!(config.coordinator.file_field, "file");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[coordinator]
base_url = "http://coordinator.internal:9000"
ingest_path = "/ingest"
query_path = "/ask"
file_field = "document"
"#;
        let file = create_temp_config(content);
        let config = DocentConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(
            config.coordinator.ingest_url(),
            "http://coordinator.internal:9000/ingest"
        );
        assert_eq!(
            config.coordinator.query_url(),
            "http://coordinator.internal:9000/ask"
        );
        assert_eq!(config.coordinator.file_field, "document");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[coordinator]
base_url = "http://10.0.0.5:8000"
"#;
        let file = create_temp_config(content);
        let config = DocentConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(
            config.coordinator.query_url(),
            "http://10.0.0.5:8000/agent/coordinator/query"
        );
    }

    #[test]
    fn test_config_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = DocentConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.coordinator.file_field, "file");
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = DocentConfig::load(file.path());
        assert!(matches!(result, Err(DocentError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = DocentConfig::load_or_default(Path::new("/nonexistent/docent.toml"));
        assert_eq!(config.coordinator.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("docent.toml");

        let mut config = DocentConfig::default();
        config.coordinator.base_url = "https://rag.example.com".to_string();
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = DocentConfig::load(&path).unwrap();
        assert_eq!(reloaded.coordinator.base_url, "https://rag.example.com");
        assert_eq!(reloaded.general.log_level, "info");
    }

    #[test]
    fn test_url_join_tolerates_slashes() {
        let mut coordinator = CoordinatorConfig::with_base_url("http://host:8000/");
        assert_eq!(
            coordinator.ingest_url(),
            "http://host:8000/agent/coordinator/start_session"
        );

        coordinator.query_path = "ask".to_string();
        assert_eq!(coordinator.query_url(), "http://host:8000/ask");
    }
}
