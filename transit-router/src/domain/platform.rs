//! Platform descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FeedId, RouteId, StopId};

/// Identifies a boarding point.
///
/// A stop is split into one platform per route when its feed declares
/// route-scoped transfer rules for it; otherwise all routes share a single
/// platform at the stop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlatformDescriptor {
    /// Boarding point for one route at a stop.
    Route {
        feed: FeedId,
        stop: StopId,
        route: RouteId,
    },
    /// Boarding point for any route at a stop.
    RouteType { feed: FeedId, stop: StopId },
}

impl PlatformDescriptor {
    /// Returns the feed owning this platform.
    pub fn feed(&self) -> &FeedId {
        match self {
            PlatformDescriptor::Route { feed, .. } | PlatformDescriptor::RouteType { feed, .. } => {
                feed
            }
        }
    }

    /// Returns the stop of this platform.
    pub fn stop(&self) -> &StopId {
        match self {
            PlatformDescriptor::Route { stop, .. } | PlatformDescriptor::RouteType { stop, .. } => {
                stop
            }
        }
    }

    /// Returns the route for route-specific platforms.
    pub fn route(&self) -> Option<&RouteId> {
        match self {
            PlatformDescriptor::Route { route, .. } => Some(route),
            PlatformDescriptor::RouteType { .. } => None,
        }
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformDescriptor::Route { feed, stop, route } => {
                write!(f, "{feed}/{stop}/{route}")
            }
            PlatformDescriptor::RouteType { feed, stop } => write!(f, "{feed}/{stop}/*"),
        }
    }
}
