use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::QueryOptions;
use crate::pagination::DEFAULT_PAGE_SIZE;

/// Main configuration structure
///
/// Loaded from the config file; CLI flags override individual fields.
/// Priority: CLI > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub related: RelatedConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path; a missing file means defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the config file path
    /// Uses XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("folio");

        Ok(config_dir.join("config.toml"))
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            page_size: self.pagination.page_size.max(1),
            clamp_page: self.pagination.clamp_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Path to a projects JSON file, or an http(s) URL serving it
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Show the last page when the requested one no longer exists
    #[serde(default = "default_clamp_page")]
    pub clamp_page: bool,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_clamp_page() -> bool {
    true
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            clamp_page: default_clamp_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedConfig {
    /// How many related projects to show under a case study
    #[serde(default = "default_related_limit")]
    pub limit: usize,
}

fn default_related_limit() -> usize {
    3
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            limit: default_related_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pagination.page_size, 9);
        assert!(config.pagination.clamp_page);
        assert_eq!(config.related.limit, 3);
        assert_eq!(config.fetch.max_retries, 3);
        assert!(config.catalog.location.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            location = "https://example.com/projects.json"

            [pagination]
            page_size = 12
            "#,
        )
        .unwrap();

        assert_eq!(
            config.catalog.location.as_deref(),
            Some("https://example.com/projects.json")
        );
        assert_eq!(config.pagination.page_size, 12);
        assert!(config.pagination.clamp_page);
        assert_eq!(config.related.limit, 3);
        assert_eq!(config.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_query_options_never_zero_page_size() {
        let mut config = Config::default();
        config.pagination.page_size = 0;
        config.pagination.clamp_page = false;

        let options = config.query_options();
        assert_eq!(options.page_size, 1);
        assert!(!options.clamp_page);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.catalog.location = Some("data/projects.json".into());
        config.related.limit = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.catalog.location.as_deref(), Some("data/projects.json"));
        assert_eq!(loaded.related.limit, 5);
    }

    #[test]
    fn test_missing_file_is_defaults_and_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing.pagination.page_size, 9);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "pagination = [").unwrap();
        assert!(matches!(
            Config::load_from(&bad),
            Err(crate::Error::ConfigError(_))
        ));
    }
}
