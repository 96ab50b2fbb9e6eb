//! Build configuration.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{BuildError, read_json};
use crate::street::DEFAULT_WALK_SPEED_KMH;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_transfer_interpolation_walk_seconds must not be negative, got {0}")]
    NegativeWalkLimit(i64),

    #[error("no GTFS feeds configured")]
    NoFeeds,

    #[error("walk speed must be positive, got {0} km/h")]
    WalkSpeed(f64),

    #[error("{0} must not be negative")]
    Negative(&'static str),
}

/// Settings for assembling a transit network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Feed documents, loaded in order as `gtfs_0`, `gtfs_1`, ...
    pub gtfs_feed_paths: Vec<PathBuf>,

    /// Street network document used by the command-line binary.
    pub street_network_path: Option<PathBuf>,

    /// Longest walk (seconds) considered when interpolating transfers.
    pub max_transfer_interpolation_walk_seconds: i64,

    /// Run transfer interpolation as part of [`build`](super::build).
    pub interpolate_transfers: bool,

    /// Walking speed used for interpolation (km/h).
    pub walk_speed_kmh: f64,
}

impl BuildConfig {
    /// Create a configuration for the given feeds with default settings.
    pub fn new(gtfs_feed_paths: Vec<PathBuf>) -> Self {
        Self {
            gtfs_feed_paths,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, BuildError> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the interpolation walk limit as a Duration.
    pub fn max_transfer_interpolation_walk(&self) -> Duration {
        Duration::seconds(self.max_transfer_interpolation_walk_seconds)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transfer_interpolation_walk_seconds < 0 {
            return Err(ConfigError::NegativeWalkLimit(
                self.max_transfer_interpolation_walk_seconds,
            ));
        }
        if !(self.walk_speed_kmh > 0.0) {
            return Err(ConfigError::WalkSpeed(self.walk_speed_kmh));
        }
        Ok(())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            gtfs_feed_paths: Vec::new(),
            street_network_path: None,
            max_transfer_interpolation_walk_seconds: 120,
            interpolate_transfers: false,
            walk_speed_kmh: DEFAULT_WALK_SPEED_KMH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = BuildConfig::default();

        assert!(config.gtfs_feed_paths.is_empty());
        assert_eq!(config.max_transfer_interpolation_walk_seconds, 120);
        assert_eq!(config.max_transfer_interpolation_walk(), Duration::minutes(2));
        assert!(!config.interpolate_transfers);
        assert_eq!(config.walk_speed_kmh, 5.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_walk_limit() {
        let config = BuildConfig {
            max_transfer_interpolation_walk_seconds: -1,
            ..BuildConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeWalkLimit(-1)));
    }

    #[test]
    fn rejects_non_positive_walk_speed() {
        let config = BuildConfig {
            walk_speed_kmh: 0.0,
            ..BuildConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WalkSpeed(0.0)));

        let config = BuildConfig {
            walk_speed_kmh: f64::NAN,
            ..BuildConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let json = r#"{"gtfs_feed_paths": ["a.json", "b.json"], "interpolate_transfers": true}"#;
        let config: BuildConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.gtfs_feed_paths,
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        assert!(config.interpolate_transfers);
        assert_eq!(config.max_transfer_interpolation_walk_seconds, 120);
    }

    #[test]
    fn from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_transfer_interpolation_walk_seconds": -5}}"#).unwrap();

        let err = BuildConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Config(ConfigError::NegativeWalkLimit(-5))
        ));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BuildConfig::from_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }
}
