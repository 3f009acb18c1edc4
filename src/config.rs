use crate::errors::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const ENV_BASE_URL: &str = "LIFTLOG_API_BASE_URL";
const ENV_PAGE_SIZE: &str = "LIFTLOG_PAGE_SIZE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Loads configuration with the usual precedence: defaults, then the
    /// optional JSON file, then environment overrides.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|error| ClientError::Internal(format!("read {}: {error}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|error| ClientError::Validation(format!("config file: {error}")))
    }

    fn apply_env_overrides(&mut self) -> ClientResult<()> {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Ok(raw) = std::env::var(ENV_PAGE_SIZE) {
            self.page_size = raw
                .parse()
                .map_err(|_| ClientError::Validation(format!("{ENV_PAGE_SIZE}: not a number: {raw}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Validation(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.page_size == 0 {
            return Err(ClientError::Validation("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, DEFAULT_PAGE_SIZE};
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"base_url": "https://api.example.test", "page_size": 25}}"#)
            .expect("write config");
        let config = ClientConfig::from_file(file.path()).expect("load config");
        assert_eq!(config.base_url, "https://api.example.test");
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"page_size": 10}}"#).expect("write config");
        let config = ClientConfig::from_file(file.path()).expect("load config");
        assert_eq!(config.base_url, super::DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"base_url": "https://file.example.test", "page_size": 10}}"#)
            .expect("write config");
        std::env::set_var("LIFTLOG_API_BASE_URL", "https://env.example.test");
        std::env::set_var("LIFTLOG_PAGE_SIZE", "20");
        let config = ClientConfig::load(Some(file.path())).expect("load config");
        std::env::remove_var("LIFTLOG_API_BASE_URL");
        std::env::remove_var("LIFTLOG_PAGE_SIZE");
        assert_eq!(config.base_url, "https://env.example.test");
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn rejects_non_http_base_url_and_zero_page_size() {
        let mut config = ClientConfig::default();
        config.base_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
    }
}
