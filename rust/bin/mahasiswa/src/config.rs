//! Client configuration.
//!
//! Reads `~/.mahasiswa/config.toml`.

use std::path::{Path, PathBuf};

use mahasiswa::FirebaseConfig;
use serde::{Deserialize, Serialize};

/// Local storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Session database file (default: ~/.mahasiswa/session.redb).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub firebase: FirebaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Default config file path: ~/.mahasiswa/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Session database location.
    pub fn session_path(&self) -> PathBuf {
        if self.storage.path.is_empty() {
            dirs_path().join("session.redb")
        } else {
            PathBuf::from(&self.storage.path)
        }
    }

    /// Refuse to talk to the backend without a project to talk to.
    pub fn verify(&self, path: &Path) -> anyhow::Result<()> {
        let missing = self.firebase.missing();
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing [firebase] {} in {}.\n\
                 Copy config.example.toml there and fill in your project settings.",
                missing.join(", "),
                path.display()
            );
        }
        Ok(())
    }
}

/// Return the client config directory (~/.mahasiswa).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".mahasiswa")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert!(config.firebase.api_key.is_empty());
        assert!(config.session_path().ends_with("session.redb"));
    }

    #[test]
    fn parses_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[firebase]
api_key = "AIza-test"
project_id = "roster-demo"
firestore_url = "http://127.0.0.1:8080"

[storage]
path = "/tmp/roster/session.redb"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.firebase.project_id, "roster-demo");
        assert_eq!(config.firebase.firestore_url, "http://127.0.0.1:8080");
        assert_eq!(config.firebase.identity_url, mahasiswa::config::DEFAULT_IDENTITY_URL);
        assert_eq!(config.session_path(), PathBuf::from("/tmp/roster/session.redb"));
        assert!(config.verify(&path).is_ok());
    }

    #[test]
    fn verify_names_missing_keys() {
        let err = AppConfig::default()
            .verify(Path::new("/etc/mahasiswa.toml"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("api_key, project_id"));
    }

    #[test]
    fn test_roundtrip() {
        let mut config = AppConfig::default();
        config.firebase.api_key = "k".into();
        config.storage.path = "/data/session.redb".into();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.firebase, config.firebase);
        assert_eq!(back.storage.path, "/data/session.redb");
    }
}
