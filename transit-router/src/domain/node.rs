//! Nodes of the combined street + transit graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PtNodeId, StreetNodeId};

/// A node in one of the two coordinate spaces.
///
/// Street nodes and transit nodes are numbered independently, so a bare
/// integer is ambiguous. The search always carries this tagged form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    /// A node of the street network.
    Street(StreetNodeId),
    /// A node of the transit graph.
    Pt(PtNodeId),
}

impl NodeId {
    /// Returns the street node, if this is one.
    pub fn street(self) -> Option<StreetNodeId> {
        match self {
            NodeId::Street(n) => Some(n),
            NodeId::Pt(_) => None,
        }
    }

    /// Returns the transit node, if this is one.
    pub fn pt(self) -> Option<PtNodeId> {
        match self {
            NodeId::Street(_) => None,
            NodeId::Pt(n) => Some(n),
        }
    }

    /// Returns true if this is a street node.
    pub fn is_street(self) -> bool {
        matches!(self, NodeId::Street(_))
    }
}

impl From<StreetNodeId> for NodeId {
    fn from(n: StreetNodeId) -> Self {
        NodeId::Street(n)
    }
}

impl From<PtNodeId> for NodeId {
    fn from(n: PtNodeId) -> Self {
        NodeId::Pt(n)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Street(n) => write!(f, "street:{n}"),
            NodeId::Pt(n) => write!(f, "pt:{n}"),
        }
    }
}
