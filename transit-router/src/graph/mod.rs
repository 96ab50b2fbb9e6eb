//! Transit graph storage.
//!
//! [`PtGraph`] holds the transit topology; [`TransitStorage`] holds the
//! tables that give its edges meaning (platforms, trips, validities, and the
//! street/transit station mapping).

mod pt_graph;
mod storage;

pub use pt_graph::PtGraph;
pub use storage::{TransitStorage, TripDescriptor};
