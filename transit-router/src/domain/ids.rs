//! Identifier types.
//!
//! Two families live here: string identifiers that come straight from feed
//! records (stops, routes, trips, services, feeds), and dense integer handles
//! that index into the graph stores. Both are newtypes so that a stop id can
//! never be passed where a route id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an empty or blank identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, rejecting empty and blank strings.
            pub fn parse(s: impl Into<String>) -> Result<Self, InvalidId> {
                let s = s.into();
                if s.trim().is_empty() {
                    return Err(InvalidId {
                        kind: $kind,
                        reason: "must not be blank",
                    });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of one loaded feed, e.g. `gtfs_0`.
    FeedId,
    "feed id"
);
string_id!(
    /// A `stop_id` from a feed's stop records.
    StopId,
    "stop id"
);
string_id!(
    /// A `route_id` from a feed's route records.
    RouteId,
    "route id"
);
string_id!(
    /// A `trip_id` from a feed's trip records.
    TripId,
    "trip id"
);
string_id!(
    /// A `service_id` referenced by trips and calendars.
    ServiceId,
    "service id"
);

impl FeedId {
    /// The id assigned to the `n`th configured feed.
    ///
    /// ```
    /// use transit_router::domain::FeedId;
    ///
    /// assert_eq!(FeedId::indexed(2).as_str(), "gtfs_2");
    /// ```
    pub fn indexed(n: usize) -> Self {
        Self(format!("gtfs_{n}"))
    }
}

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the handle as a vector index.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_id!(
    /// Node of the street network.
    StreetNodeId
);
index_id!(
    /// Edge of the street network.
    StreetEdgeId
);
index_id!(
    /// Node of the transit graph.
    PtNodeId
);
index_id!(
    /// Edge of the transit graph. Stable for the lifetime of a build.
    EdgeId
);
index_id!(
    /// Handle of a trip registered in the transit storage.
    TripRef
);
index_id!(
    /// Handle of a service-day bitmap registered in the transit storage.
    ValidityId
);
