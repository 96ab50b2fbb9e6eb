//! Journey planning over a built network.
//!
//! [`GraphExplorer`] turns the street network and the transit graph into
//! one time-dependent adjacency, [`MultiCriteriaLabelSetting`] runs a
//! Pareto search over it, and [`Router`] turns the labels that reach the
//! destination into ranked [`Journey`]s.

mod config;
mod explorer;
mod journey;
mod label;
mod label_setting;
mod rank;
mod router;

pub use config::SearchConfig;
pub use explorer::{ExploredEdge, ExplorerOptions, GraphExplorer};
pub use journey::{Journey, Leg, Segment, Walk};
pub use label::{Label, LabelId, TraversedEdge};
pub use label_setting::MultiCriteriaLabelSetting;
pub use rank::{rank_journeys, remove_dominated};
pub use router::{RouteRequest, Router};

#[cfg(test)]
mod router_tests;
