//! Search configuration for the journey planner.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::build::ConfigError;
use crate::street::{DEFAULT_WALK_SPEED_KMH, FootWeighting};

/// Configuration parameters for journey search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum walking time on streets (seconds).
    /// Labels that walked longer than this are pruned.
    pub max_walk_secs: i64,

    /// Maximum total journey time (seconds).
    pub max_trip_secs: i64,

    /// Maximum number of changes between vehicles.
    pub max_transfers: u32,

    /// Maximum number of journeys to return.
    pub max_results: usize,

    /// Stop searching after this many labels have been settled.
    pub max_visited_labels: usize,

    /// Walking speed in km/h.
    pub walk_speed_kmh: f64,

    /// Bitmask of GTFS route types that may not be boarded
    /// (bit `n` blocks route type `n`, for `n < 32`).
    pub blocked_route_types: u32,

    /// Board trips regardless of their service days.
    pub ignore_validities: bool,
}

impl SearchConfig {
    /// Create a new configuration with the given limits and default
    /// walking speed and filters.
    pub fn new(
        max_walk_secs: i64,
        max_trip_secs: i64,
        max_transfers: u32,
        max_results: usize,
        max_visited_labels: usize,
    ) -> Self {
        Self {
            max_walk_secs,
            max_trip_secs,
            max_transfers,
            max_results,
            max_visited_labels,
            ..Self::default()
        }
    }

    /// Returns the maximum walk time as a Duration.
    pub fn max_walk(&self) -> Duration {
        Duration::seconds(self.max_walk_secs)
    }

    /// Returns the maximum journey time as a Duration.
    pub fn max_trip(&self) -> Duration {
        Duration::seconds(self.max_trip_secs)
    }

    /// Returns a pedestrian weighting at `walk_speed_kmh`.
    pub fn foot_weighting(&self) -> FootWeighting {
        FootWeighting::new(self.walk_speed_kmh)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_walk_secs < 0 {
            return Err(ConfigError::Negative("max_walk_secs"));
        }
        if self.max_trip_secs < 0 {
            return Err(ConfigError::Negative("max_trip_secs"));
        }
        if !(self.walk_speed_kmh > 0.0) {
            return Err(ConfigError::WalkSpeed(self.walk_speed_kmh));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_walk_secs: 15 * 60,
            max_trip_secs: 6 * 60 * 60,
            max_transfers: 3,
            max_results: 10,
            max_visited_labels: 1_000_000,
            walk_speed_kmh: DEFAULT_WALK_SPEED_KMH,
            blocked_route_types: 0,
            ignore_validities: false,
        }
    }
}
