//! Settings structures for unified-search configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub account: AccountSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub sync_folders: Vec<SyncFolder>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (UNIFIED_SEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("UNIFIED_SEARCH_SERVER_URL") {
            self.account.server_url = val;
        }
        if let Ok(val) = std::env::var("UNIFIED_SEARCH_USER") {
            self.account.user = val;
        }
        if let Ok(val) = std::env::var("UNIFIED_SEARCH_APP_PASSWORD") {
            self.account.app_password = Some(val);
        }
        if let Ok(val) = std::env::var("UNIFIED_SEARCH_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.search.debounce_ms = ms;
            }
        }
    }
}

/// Account the session searches on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    /// Server base URL
    pub server_url: String,
    /// Login name
    pub user: String,
    /// App password used for basic auth
    pub app_password: Option<String>,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost".to_string(),
            user: String::new(),
            app_password: None,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a search starts
    pub debounce_ms: u64,
    /// Provider ids never added to the registry
    pub denylisted_providers: Vec<String>,
    /// Buffer size of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            denylisted_providers: vec![crate::DENYLISTED_PROVIDER_ID.to_string()],
            event_capacity: 256,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 8,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// A server folder synchronized to a local directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncFolder {
    /// Folder path on the server, e.g. `/` or `/Documents`
    pub remote_path: String,
    /// Local directory the folder is synced into
    pub local_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search.debounce_ms, 800);
        assert_eq!(
            settings.search.denylisted_providers,
            vec!["talk-message-current".to_string()]
        );
        assert!(settings.outgoing.verify_ssl);
        assert!(settings.sync_folders.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml(
            r#"
account:
  server_url: https://cloud.example.com
  user: alice
search:
  debounce_ms: 300
sync_folders:
  - remote_path: /Documents
    local_path: /home/alice/Nextcloud/Documents
"#,
        )
        .unwrap();

        assert_eq!(settings.account.server_url, "https://cloud.example.com");
        assert_eq!(settings.account.user, "alice");
        assert!(settings.account.app_password.is_none());
        assert_eq!(settings.search.debounce_ms, 300);
        assert_eq!(settings.search.event_capacity, 256);
        assert_eq!(settings.outgoing.request_timeout, 10.0);
        assert_eq!(settings.sync_folders.len(), 1);
        assert_eq!(settings.sync_folders[0].remote_path, "/Documents");
    }
}
