//! API key providers
//!
//! The client only ever receives an opaque key string. Where that key lives
//! (memory, a config file) is up to the provider.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::consts::{API_KEY_PREFIX, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{Error, Result};

/// Supplies the API key used to authenticate requests
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Result<String>;
}

/// A key known up front
#[derive(Clone)]
pub struct StaticCredentials(String);

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(api_key.into())
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticCredentials(****)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredConfig {
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Key stored in the CLI config file, `~/.llama-parse/config.json` by default
#[derive(Debug, Clone)]
pub struct ConfigFileCredentials {
    path: PathBuf,
}

impl ConfigFileCredentials {
    /// Use the default location under the home directory
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::credential("Home directory not found"))?;
        Ok(Self::at(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the key, creating the config directory if needed
    pub fn save(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let config = StoredConfig {
            api_key: Some(api_key.to_string()),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&config)?)?;

        tracing::debug!("API key saved to {}", self.path.display());
        Ok(())
    }
}

impl CredentialProvider for ConfigFileCredentials {
    fn api_key(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(Error::credential(format!(
                "{} file not found",
                self.path.display()
            )));
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let config: StoredConfig = serde_json::from_str(&raw).map_err(|e| {
            Error::credential(format!("Invalid config file {}: {}", self.path.display(), e))
        })?;

        match config.api_key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::credential(format!(
                "API key not found in {}",
                self.path.display()
            ))),
        }
    }
}

/// Check the shape of a key entered by the user
pub fn validate_api_key(input: &str) -> std::result::Result<(), String> {
    if input.is_empty() {
        return Err("API key is required".to_string());
    }
    if !input.starts_with(API_KEY_PREFIX) {
        return Err(format!("API key must start with '{}'", API_KEY_PREFIX));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credentials() {
        let creds = StaticCredentials::new("llx-abc");
        assert_eq!(creds.api_key().unwrap(), "llx-abc");
        assert!(!format!("{:?}", creds).contains("llx-abc"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigFileCredentials::at(dir.path().join(".llama-parse").join("config.json"));

        store.save("llx-secret").unwrap();
        assert_eq!(store.api_key().unwrap(), "llx-secret");

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"apiKey": "llx-secret"}));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigFileCredentials::at(dir.path().join("config.json"));
        let err = store.api_key().unwrap_err();
        assert!(matches!(err, Error::Credential(ref msg) if msg.contains("not found")));
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"apiKey": ""}"#).unwrap();

        let err = ConfigFileCredentials::at(&path).api_key().unwrap_err();
        assert!(matches!(err, Error::Credential(_)));

        std::fs::write(&path, "{}").unwrap();
        assert!(ConfigFileCredentials::at(&path).api_key().is_err());
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("llx-123").is_ok());
        assert_eq!(validate_api_key(""), Err("API key is required".to_string()));
        assert_eq!(
            validate_api_key("sk-123"),
            Err("API key must start with 'llx-'".to_string())
        );
    }
}
