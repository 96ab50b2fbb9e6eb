//! Domain types shared by the graph stores, the builder and the planner.
//!
//! Identifiers are newtypes and polymorphic things (nodes, edges,
//! platforms) are enums, so a value's kind is always known statically.

mod edge;
mod error;
mod ids;
mod node;
mod platform;

pub use edge::{EdgePayload, EdgeType, PtEdge, SECONDS_PER_DAY};
pub use error::NotFoundError;
pub use ids::{
    EdgeId, FeedId, InvalidId, PtNodeId, RouteId, ServiceId, StopId, StreetEdgeId, StreetNodeId,
    TripId, TripRef, ValidityId,
};
pub use node::NodeId;
pub use platform::PlatformDescriptor;
