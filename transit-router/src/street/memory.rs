//! A small street network held in memory.

use rstar::RTree;
use rstar::primitives::GeomWithData;
use serde::{Deserialize, Serialize};

use super::{LocationIndex, StreetEdge, StreetNetwork};
use crate::domain::{NotFoundError, StreetEdgeId, StreetNodeId};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A node position as `[lon, lat]`, tagged with the node index.
type NodePoint = GeomWithData<[f64; 2], u32>;

/// Great-circle distance between two coordinates in metres.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Serialized form of a street network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreetNetworkData {
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub edges: Vec<EdgeData>,
    /// Stops farther than this from every node cannot be snapped.
    #[serde(default)]
    pub max_snap_distance_m: Option<f64>,
}

/// A serialized street node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeData {
    pub lat: f64,
    pub lon: f64,
}

/// A serialized street edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeData {
    pub from: u32,
    pub to: u32,
    /// Defaults to the great-circle distance between the endpoints.
    #[serde(default)]
    pub distance_m: Option<f64>,
    #[serde(default)]
    pub oneway: bool,
}

/// An in-memory street network with an R-tree nearest-node lookup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStreetNetwork {
    coordinates: Vec<(f64, f64)>,
    index: RTree<NodePoint>,
    adjacency: Vec<Vec<StreetEdge>>,
    edge_count: u32,
    max_snap_distance_m: Option<f64>,
}

impl InMemoryStreetNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how far a coordinate may be from its snapped node.
    pub fn with_max_snap_distance(mut self, metres: f64) -> Self {
        self.max_snap_distance_m = Some(metres);
        self
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, lat: f64, lon: f64) -> StreetNodeId {
        let id = self.push_node(lat, lon);
        self.index.insert(NodePoint::new([lon, lat], id.0));
        id
    }

    fn push_node(&mut self, lat: f64, lon: f64) -> StreetNodeId {
        let id = StreetNodeId(self.coordinates.len() as u32);
        self.coordinates.push((lat, lon));
        self.adjacency.push(Vec::new());
        id
    }

    /// Add a street walkable in both directions.
    pub fn add_edge(
        &mut self,
        a: StreetNodeId,
        b: StreetNodeId,
        distance_m: f64,
    ) -> Result<StreetEdgeId, NotFoundError> {
        self.insert_edge(a, b, distance_m, true)
    }

    /// Add a street walkable only from `a` to `b`.
    pub fn add_oneway_edge(
        &mut self,
        a: StreetNodeId,
        b: StreetNodeId,
        distance_m: f64,
    ) -> Result<StreetEdgeId, NotFoundError> {
        self.insert_edge(a, b, distance_m, false)
    }

    fn insert_edge(
        &mut self,
        a: StreetNodeId,
        b: StreetNodeId,
        distance_m: f64,
        both_ways: bool,
    ) -> Result<StreetEdgeId, NotFoundError> {
        for n in [a, b] {
            if n.index() >= self.adjacency.len() {
                return Err(NotFoundError::StreetNode(n));
            }
        }

        let id = StreetEdgeId(self.edge_count);
        self.edge_count += 1;

        self.adjacency[a.index()].push(StreetEdge {
            id,
            from: a,
            to: b,
            distance_m,
            foot_forward: true,
            foot_backward: both_ways,
        });
        if a != b {
            self.adjacency[b.index()].push(StreetEdge {
                id,
                from: b,
                to: a,
                distance_m,
                foot_forward: both_ways,
                foot_backward: true,
            });
        }
        Ok(id)
    }

    /// Returns the coordinate of `node`.
    pub fn coordinate(&self, node: StreetNodeId) -> Option<(f64, f64)> {
        self.coordinates.get(node.index()).copied()
    }

    /// Returns the number of street edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count as usize
    }
}

impl TryFrom<StreetNetworkData> for InMemoryStreetNetwork {
    type Error = NotFoundError;

    fn try_from(data: StreetNetworkData) -> Result<Self, Self::Error> {
        let mut network = Self::new();
        network.max_snap_distance_m = data.max_snap_distance_m;
        let points = data
            .nodes
            .iter()
            .map(|node| {
                let id = network.push_node(node.lat, node.lon);
                NodePoint::new([node.lon, node.lat], id.0)
            })
            .collect();
        network.index = RTree::bulk_load(points);
        for edge in &data.edges {
            let (a, b) = (StreetNodeId(edge.from), StreetNodeId(edge.to));
            let distance = match edge.distance_m {
                Some(d) => d,
                None => {
                    let (lat1, lon1) = network.coordinate(a).ok_or(NotFoundError::StreetNode(a))?;
                    let (lat2, lon2) = network.coordinate(b).ok_or(NotFoundError::StreetNode(b))?;
                    haversine_m(lat1, lon1, lat2, lon2)
                }
            };
            network.insert_edge(a, b, distance, !edge.oneway)?;
        }
        Ok(network)
    }
}

impl StreetNetwork for InMemoryStreetNetwork {
    fn node_count(&self) -> usize {
        self.coordinates.len()
    }

    fn edges_from(&self, node: StreetNodeId) -> &[StreetEdge] {
        self.adjacency
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl LocationIndex for InMemoryStreetNetwork {
    /// Nearest node in plain degrees, then checked against the snap limit
    /// in metres.
    fn closest_node(&self, lat: f64, lon: f64) -> Option<StreetNodeId> {
        let node = StreetNodeId(self.index.nearest_neighbor(&[lon, lat])?.data);
        let (nlat, nlon) = self.coordinate(node)?;

        if self
            .max_snap_distance_m
            .is_some_and(|max| haversine_m(lat, lon, nlat, nlon) > max)
        {
            return None;
        }
        Some(node)
    }
}
