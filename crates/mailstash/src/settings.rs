//! Persistent settings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use mailstash_core::Account;
use serde::{Deserialize, Serialize};

/// Settings read from `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Message store file.
    pub store_path: PathBuf,
    /// Open a corrupt store as empty instead of failing.
    pub recover_corrupt: bool,
    /// Mail account, if one has been configured.
    pub account: Option<Account>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            recover_corrupt: false,
            account: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults if the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }
}

/// `<config_dir>/mailstash/settings.json`
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailstash")
        .join("settings.json")
}

/// `<data_dir>/mailstash/emails.json`
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailstash")
        .join("emails.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailstash_core::Security;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.store_path.ends_with("mailstash/emails.json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{
  "recover_corrupt": true,
  "account": {
    "email": "me@example.com",
    "smtp": { "host": "smtp.example.com", "port": 465, "security": "tls" }
  }
}"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert!(settings.recover_corrupt);
        assert_eq!(settings.store_path, default_store_path());

        let account = settings.account.unwrap();
        assert_eq!(account.email, "me@example.com");
        assert_eq!(account.imap.port, 993);
        assert_eq!(account.smtp.port, 465);
        assert_eq!(account.smtp.security, Security::Tls);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ store_path: ").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
    }
}
