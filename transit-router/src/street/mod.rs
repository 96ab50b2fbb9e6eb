//! Street-network boundary.
//!
//! The router does not own street topology. It consumes three capabilities:
//! adjacency ([`StreetNetwork`]), nearest-node snapping ([`LocationIndex`])
//! and edge weighting ([`Weighting`]). [`InMemoryStreetNetwork`] provides the
//! first two for small networks and tests.

mod memory;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::{StreetEdgeId, StreetNodeId};

pub use memory::{InMemoryStreetNetwork, StreetNetworkData, haversine_m};

/// One direction of a street edge, as seen from its `from` node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreetEdge {
    pub id: StreetEdgeId,
    pub from: StreetNodeId,
    pub to: StreetNodeId,
    pub distance_m: f64,
    /// Walking allowed from `from` to `to`.
    pub foot_forward: bool,
    /// Walking allowed from `to` to `from`.
    pub foot_backward: bool,
}

/// Street adjacency.
pub trait StreetNetwork: Send + Sync {
    /// Returns the number of street nodes.
    fn node_count(&self) -> usize;

    /// Returns the edges incident to `node`, each oriented away from it.
    ///
    /// Unknown nodes have no edges.
    fn edges_from(&self, node: StreetNodeId) -> &[StreetEdge];
}

/// Nearest-node lookup.
pub trait LocationIndex: Send + Sync {
    /// Returns the street node closest to the coordinate, if any is close
    /// enough to snap to.
    fn closest_node(&self, lat: f64, lon: f64) -> Option<StreetNodeId>;
}

/// Street edge weighting.
pub trait Weighting: Send + Sync {
    /// Returns how long it takes to traverse `edge`, or `None` if it cannot
    /// be traversed.
    ///
    /// With `reverse`, the search is running backwards, so the traveller
    /// actually moves from `edge.to` to `edge.from`.
    fn edge_duration(&self, edge: &StreetEdge, reverse: bool) -> Option<Duration>;
}

/// Default walking speed in km/h.
pub const DEFAULT_WALK_SPEED_KMH: f64 = 5.0;

/// Walking at a constant speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootWeighting {
    speed_kmh: f64,
}

impl FootWeighting {
    /// Create a weighting for the given walking speed.
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Returns the walking speed in km/h.
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }
}

impl Default for FootWeighting {
    fn default() -> Self {
        Self::new(DEFAULT_WALK_SPEED_KMH)
    }
}

impl Weighting for FootWeighting {
    fn edge_duration(&self, edge: &StreetEdge, reverse: bool) -> Option<Duration> {
        let accessible = if reverse {
            edge.foot_backward
        } else {
            edge.foot_forward
        };
        if !accessible || self.speed_kmh <= 0.0 {
            return None;
        }
        // m / (km/h) = 3.6 s; in ms that is 3600 / speed
        let millis = (edge.distance_m * 3600.0 / self.speed_kmh).round() as i64;
        Some(Duration::milliseconds(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(distance_m: f64, foot_forward: bool, foot_backward: bool) -> StreetEdge {
        StreetEdge {
            id: StreetEdgeId(0),
            from: StreetNodeId(0),
            to: StreetNodeId(1),
            distance_m,
            foot_forward,
            foot_backward,
        }
    }

    #[test]
    fn walking_time_at_default_speed() {
        let w = FootWeighting::default();
        assert_eq!(w.speed_kmh(), 5.0);
        // 62.5 m at 5 km/h is 45 s
        assert_eq!(
            w.edge_duration(&edge(62.5, true, true), false),
            Some(Duration::seconds(45))
        );
        // 1 km at 5 km/h is 12 min
        assert_eq!(
            w.edge_duration(&edge(1000.0, true, true), false),
            Some(Duration::minutes(12))
        );
    }

    #[test]
    fn respects_access_direction() {
        let w = FootWeighting::default();
        let oneway = edge(100.0, true, false);
        assert!(w.edge_duration(&oneway, false).is_some());
        assert!(w.edge_duration(&oneway, true).is_none());
    }

    #[test]
    fn zero_speed_is_impassable() {
        let w = FootWeighting::new(0.0);
        assert!(w.edge_duration(&edge(10.0, true, true), false).is_none());
    }
}
