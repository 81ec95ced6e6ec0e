//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Web-app endpoint of the spreadsheet store.
    pub store_url: Option<String>,
    /// Directory holding the trip in progress.
    pub data_dir: PathBuf,
    /// How long listed rows are reused before refetching.
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("store_url", &self.store_url.as_ref().map(|_| "[REDACTED]"))
            .field("data_dir", &self.data_dir)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: None,
            data_dir: dirs_data_path().unwrap_or_else(|| PathBuf::from(".")),
            cache_ttl_secs: 300,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `config.toml` in the config directory,
    /// the given file, then `TL_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TL_"));

        figment.extract()
    }

    /// Path of the persisted trip in progress.
    pub fn active_trip_path(&self) -> PathBuf {
        self.data_dir.join("active_trip.json")
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Returns the platform-specific config directory for tl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tl"))
}

/// Returns the platform-specific data directory for tl.
///
/// On Linux: `~/.local/share/tl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tl"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn default_config_has_no_store() {
        let config = Config::default();
        assert!(config.store_url.is_none());
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn dirs_data_path_ends_with_tl() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "tl");
    }

    #[test]
    fn config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(
            &path,
            "store_url = \"https://script.example.com/exec\"\ncache_ttl_secs = 60\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(
            config.store_url.as_deref(),
            Some("https://script.example.com/exec")
        );
        assert_eq!(config.cache_ttl(), chrono::Duration::seconds(60));
    }

    #[test]
    fn debug_redacts_store_url() {
        let config = Config {
            store_url: Some("https://script.example.com/macros/s/deployment-secret/exec".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("deployment-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
