//! Search labels.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::{EdgeId, EdgeType, NodeId, StreetEdgeId};

/// Handle of a label in a search's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub(crate) u32);

impl LabelId {
    /// Returns the handle as an arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The edge a label was reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraversedEdge {
    Street { id: StreetEdgeId },
    Pt { id: EdgeId, edge_type: EdgeType },
}

impl TraversedEdge {
    /// Returns the transit edge type, or `None` for street edges.
    pub fn edge_type(&self) -> Option<EdgeType> {
        match self {
            TraversedEdge::Street { .. } => None,
            TraversedEdge::Pt { edge_type, .. } => Some(*edge_type),
        }
    }
}

/// A path prefix ending at `node`.
///
/// Labels are immutable. The path behind a label is recovered by following
/// `parent` handles through the search that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub id: LabelId,
    pub node: NodeId,
    /// Clock time at `node`. Decreases along the path in a reverse search.
    pub time: DateTime<Utc>,
    /// Time spent since the search origin.
    pub elapsed: Duration,
    /// Number of vehicles boarded so far.
    pub num_transfers: u32,
    /// Time spent walking on streets.
    pub walk_time: Duration,
    pub edge: Option<TraversedEdge>,
    pub parent: Option<LabelId>,
}

impl Label {
    /// Returns true if `self` is at least as good as `other` in every
    /// criterion. Equal labels dominate each other.
    ///
    /// A label that just left transit at a station may not re-enter there,
    /// so it never dominates one that can.
    pub fn weakly_dominates(&self, other: &Label) -> bool {
        self.elapsed <= other.elapsed
            && self.num_transfers <= other.num_transfers
            && self.walk_time <= other.walk_time
            && (!self.left_transit() || other.left_transit())
    }

    /// Returns true if `self` is at least as good as `other` everywhere and
    /// better somewhere.
    pub fn strictly_dominates(&self, other: &Label) -> bool {
        self.weakly_dominates(other)
            && (self.elapsed < other.elapsed
                || self.num_transfers < other.num_transfers
                || self.walk_time < other.walk_time)
    }

    /// Returns the type of the transit edge this label was reached by.
    pub fn edge_type(&self) -> Option<EdgeType> {
        self.edge.and_then(|e| e.edge_type())
    }

    /// Returns true if this label stands at a station it reached straight
    /// off a platform: by EXIT_PT, or by ENTER_PT in a reverse search.
    pub fn left_transit(&self) -> bool {
        matches!(self.node, NodeId::Street(_))
            && matches!(self.edge_type(), Some(EdgeType::ExitPt | EdgeType::EnterPt))
    }
}
