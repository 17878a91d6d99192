//! Agent configuration: which sources to compose and how to sample them.
//!
//! Configuration is a JSON document; every field is optional.
//!
//! ```json
//! {
//!   "sources": ["sessions"],
//!   "interval_secs": 10.0,
//!   "who_order": "sorted"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composite::CompositeSource;
use crate::sources::{SOURCE_NAMES, WhoOrder, create_source};

/// Default sampling interval for repeated snapshots.
pub const DEFAULT_INTERVAL_SECS: f64 = 5.0;

/// Longest accepted sampling interval (one day).
pub const MAX_INTERVAL_SECS: f64 = 86_400.0;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unknown source `{0}` (known: {known})", known = SOURCE_NAMES.join(", "))]
    UnknownSource(String),

    #[error("interval must be a number of seconds in (0, {max}], got {0}", max = MAX_INTERVAL_SECS)]
    InvalidInterval(f64),
}

/// Top-level agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Sources to compose, in sampling order.
    pub sources: Vec<String>,
    /// Seconds between snapshots when sampling repeatedly.
    pub interval_secs: f64,
    /// Order of identities in the session "who" value.
    pub who_order: WhoOrder,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            sources: vec!["sessions".to_string()],
            interval_secs: DEFAULT_INTERVAL_SECS,
            who_order: WhoOrder::default(),
        }
    }
}

impl AgentConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Check source names and the interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(unknown) = self
            .sources
            .iter()
            .find(|name| !SOURCE_NAMES.contains(&name.as_str()))
        {
            return Err(ConfigError::UnknownSource(unknown.clone()));
        }
        if !(self.interval_secs > 0.0 && self.interval_secs <= MAX_INTERVAL_SECS) {
            return Err(ConfigError::InvalidInterval(self.interval_secs));
        }
        Ok(())
    }

    /// Compose the configured sources, in configured order.
    pub fn build_composite(&self) -> Result<CompositeSource, ConfigError> {
        let children = self
            .sources
            .iter()
            .map(|name| {
                create_source(name, self.who_order)
                    .ok_or_else(|| ConfigError::UnknownSource(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompositeSource::new(children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.sources, vec!["sessions"]);
        assert_eq!(config.interval_secs, DEFAULT_INTERVAL_SECS);
        assert_eq!(config.who_order, WhoOrder::Enumeration);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_full_file() {
        let file = write_config(
            r#"{"sources": ["sessions"], "interval_secs": 2.5, "who_order": "sorted"}"#,
        );
        let config = AgentConfig::load(file.path()).unwrap();
        assert_eq!(config.interval_secs, 2.5);
        assert_eq!(config.who_order, WhoOrder::Sorted);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let file = write_config("{}");
        let config = AgentConfig::load(file.path()).unwrap();
        assert_eq!(config, AgentConfig::default());
    }

    #[test]
    fn empty_source_list_is_valid() {
        let file = write_config(r#"{"sources": []}"#);
        let config = AgentConfig::load(file.path()).unwrap();
        assert!(config.build_composite().unwrap().is_empty());
    }

    #[test]
    fn unknown_source_rejected() {
        let file = write_config(r#"{"sources": ["sessions", "fans"]}"#);
        let err = AgentConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSource(ref n) if n == "fans"));
        assert!(err.to_string().contains("known: sessions"));
    }

    #[test]
    fn bad_interval_rejected() {
        for interval in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e20, MAX_INTERVAL_SECS + 1.0] {
            let config = AgentConfig {
                interval_secs: interval,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidInterval(_))
            ));
        }
    }

    #[test]
    fn longest_interval_accepted() {
        let config = AgentConfig {
            interval_secs: MAX_INTERVAL_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn huge_interval_in_file_rejected() {
        let file = write_config(r#"{"interval_secs": 1e20}"#);
        let err = AgentConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval(v) if v == 1e20));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let file = write_config("{ sources: ");
        let err = AgentConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AgentConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn composite_follows_config_order() {
        let config = AgentConfig {
            sources: vec!["sessions".to_string(), "sessions".to_string()],
            ..Default::default()
        };
        let composite = config.build_composite().unwrap();
        let names: Vec<&str> = composite.source_infos().iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["sessions", "sessions"]);
    }
}
