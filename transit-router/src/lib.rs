//! Multi-modal journey planner.
//!
//! Builds a time-expanded transit graph from one or more feeds on top of a
//! street network, stitches the feeds together with walking transfers, and
//! answers Pareto-optimal journey queries that trade off arrival time,
//! changes and walking.

pub mod build;
pub mod domain;
pub mod feed;
pub mod graph;
pub mod planner;
pub mod realtime;
pub mod street;

#[cfg(test)]
pub(crate) mod fixtures;
