use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration, read from `<config_dir>/libris/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog JSON file; the bundled sample is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    /// Focus the search box as soon as the app starts
    pub focus_on_start: bool,
    pub search: SearchSettings,
}

/// Settings for the search box and its lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub placeholder: String,
    pub debounce_ms: u64,
    pub min_query_len: usize,
    /// Request the default listing when focused with an empty query
    pub show_all_on_empty: bool,
    /// Maximum candidates shown in the dropdown
    pub result_limit: usize,
    /// Artificial lookup delay, useful to see the loading state
    pub latency_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            focus_on_start: true,
            search: SearchSettings::default(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            placeholder: "Search books by title, author or ISBN…".to_string(),
            debounce_ms: 300,
            min_query_len: 2,
            show_all_on_empty: false,
            result_limit: 8,
            latency_ms: 0,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn latency(&self) -> Option<Duration> {
        (self.latency_ms > 0).then(|| Duration::from_millis(self.latency_ms))
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub catalog_path: Option<PathBuf>,
    pub debounce_ms: Option<u64>,
    pub show_all_on_empty: bool,
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("libris"))
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config, falling back to defaults when missing or invalid
    pub fn load(path: Option<&Path>) -> Config {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Config::default(),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}", e);
                Config::default()
            }
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(path) = overrides.catalog_path {
            self.catalog_path = Some(path);
        }
        if let Some(ms) = overrides.debounce_ms {
            self.search.debounce_ms = ms;
        }
        if overrides.show_all_on_empty {
            self.search.show_all_on_empty = true;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.min_query_len, 2);
        assert!(!config.search.show_all_on_empty);
        assert_eq!(config.search.latency(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            catalog_path = "/srv/library/books.json"

            [search]
            debounce_ms = 150
            show_all_on_empty = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/srv/library/books.json"))
        );
        assert_eq!(config.search.debounce_ms, 150);
        assert!(config.search.show_all_on_empty);
        assert_eq!(config.search.result_limit, 8);
        assert!(config.focus_on_start);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::default().with_overrides(Overrides {
            catalog_path: Some(PathBuf::from("books.json")),
            debounce_ms: Some(50),
            show_all_on_empty: true,
        });
        assert_eq!(config.catalog_path, Some(PathBuf::from("books.json")));
        assert_eq!(config.search.debounce_ms, 50);
        assert!(config.search.show_all_on_empty);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/libris.toml")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, parsed);
    }
}
