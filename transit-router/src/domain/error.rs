//! Lookup failures.
//!
//! These indicate a graph-consistency bug rather than bad input: a correct
//! build never hands out an id that the stores cannot resolve.

use super::{
    EdgeId, FeedId, PlatformDescriptor, PtNodeId, StopId, StreetNodeId, TripRef, ValidityId,
};

/// An id could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("unknown transit edge {0}")]
    Edge(EdgeId),

    #[error("unknown transit node {0}")]
    PtNode(PtNodeId),

    #[error("unknown street node {0}")]
    StreetNode(StreetNodeId),

    /// No platform is registered for an ENTER_PT/EXIT_PT edge.
    #[error("no platform descriptor for edge {0}")]
    PlatformForEdge(EdgeId),

    /// A platform has no ENTER_PT edge.
    #[error("no entry edge for platform {0}")]
    PlatformEntry(PlatformDescriptor),

    #[error("stop {stop} of feed {feed} is not connected to the street network")]
    Station { feed: FeedId, stop: StopId },

    #[error("unknown trip handle {0}")]
    Trip(TripRef),

    #[error("unknown validity handle {0}")]
    Validity(ValidityId),

    #[error("unknown feed {0}")]
    Feed(FeedId),
}
