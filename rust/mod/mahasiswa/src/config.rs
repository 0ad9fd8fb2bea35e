use serde::{Deserialize, Serialize};

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Connection settings for one Firebase project.
///
/// The endpoint URLs default to Google's hosted services; tests and the
/// local emulator suite point them elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
    #[serde(default = "default_secure_token_url")]
    pub secure_token_url: String,
    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,
}

fn default_identity_url() -> String {
    DEFAULT_IDENTITY_URL.into()
}

fn default_secure_token_url() -> String {
    DEFAULT_SECURE_TOKEN_URL.into()
}

fn default_firestore_url() -> String {
    DEFAULT_FIRESTORE_URL.into()
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            identity_url: default_identity_url(),
            secure_token_url: default_secure_token_url(),
            firestore_url: default_firestore_url(),
        }
    }
}

impl FirebaseConfig {
    /// Every endpoint on one base URL, the way the test server and the
    /// emulator expose them.
    pub fn single_host(base: &str, api_key: &str, project_id: &str) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            identity_url: base.into(),
            secure_token_url: base.into(),
            firestore_url: base.into(),
        }
    }

    /// Missing settings, by name.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.trim().is_empty() {
            missing.push("api_key");
        }
        if self.project_id.trim().is_empty() {
            missing.push("project_id");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_fills_endpoints() {
        let cfg: FirebaseConfig = serde_json::from_str(r#"{"api_key":"k","project_id":"p"}"#).unwrap();
        assert_eq!(cfg.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(cfg.firestore_url, DEFAULT_FIRESTORE_URL);
        assert!(cfg.missing().is_empty());
    }

    #[test]
    fn reports_missing_settings() {
        assert_eq!(FirebaseConfig::default().missing(), vec!["api_key", "project_id"]);
    }
}
