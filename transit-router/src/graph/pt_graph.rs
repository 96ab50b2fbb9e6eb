//! Append-only transit graph.

use crate::domain::{EdgeId, EdgePayload, EdgeType, NotFoundError, PtEdge, PtNodeId};

/// Node/edge store for transit topology.
///
/// Edges are only ever appended, never changed or removed, so edge ids stay
/// valid for the lifetime of the graph and a finished graph can be shared
/// between threads without locking. Adjacency lists keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct PtGraph {
    edges: Vec<PtEdge>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
}

impl PtGraph {
    /// Create an empty graph sized for roughly `capacity_hint` nodes.
    pub fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            edges: Vec::with_capacity(capacity_hint * 2),
            out_edges: Vec::with_capacity(capacity_hint),
            in_edges: Vec::with_capacity(capacity_hint),
        }
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self) -> PtNodeId {
        let id = PtNodeId(self.out_edges.len() as u32);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        id
    }

    /// Append an edge and return its id.
    pub fn add_edge(
        &mut self,
        from: PtNodeId,
        to: PtNodeId,
        payload: EdgePayload,
    ) -> Result<EdgeId, NotFoundError> {
        for node in [from, to] {
            if node.index() >= self.out_edges.len() {
                return Err(NotFoundError::PtNode(node));
            }
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(PtEdge {
            id,
            from,
            to,
            payload,
        });
        self.out_edges[from.index()].push(id);
        self.in_edges[to.index()].push(id);
        Ok(id)
    }

    /// Returns the out-edges of `node` in insertion order.
    pub fn edges_around(&self, node: PtNodeId) -> impl Iterator<Item = &PtEdge> + '_ {
        self.resolve(self.out_edges.get(node.index()))
    }

    /// Returns the in-edges of `node` in insertion order, for backward search.
    pub fn back_edges_around(&self, node: PtNodeId) -> impl Iterator<Item = &PtEdge> + '_ {
        self.resolve(self.in_edges.get(node.index()))
    }

    /// Returns the out-edges (or in-edges with `reverse`) of `node`.
    pub fn adjacent(&self, node: PtNodeId, reverse: bool) -> impl Iterator<Item = &PtEdge> + '_ {
        let ids = if reverse {
            self.in_edges.get(node.index())
        } else {
            self.out_edges.get(node.index())
        };
        self.resolve(ids)
    }

    fn resolve<'a>(&'a self, ids: Option<&'a Vec<EdgeId>>) -> impl Iterator<Item = &'a PtEdge> + 'a {
        ids.into_iter()
            .flatten()
            .map(move |id| &self.edges[id.index()])
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Result<&PtEdge, NotFoundError> {
        self.edges.get(id.index()).ok_or(NotFoundError::Edge(id))
    }

    /// Returns true if an edge of `edge_type` already joins `from` to `to`.
    pub fn has_edge(&self, from: PtNodeId, to: PtNodeId, edge_type: EdgeType) -> bool {
        self.edges_around(from)
            .any(|e| e.to == to && e.edge_type() == edge_type)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.out_edges.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns all edges in id order.
    pub fn edges(&self) -> &[PtEdge] {
        &self.edges
    }
}
