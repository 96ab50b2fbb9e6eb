//! Lookup tables that accompany the transit graph.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{
    EdgeId, FeedId, NotFoundError, PlatformDescriptor, PtNodeId, RouteId, StopId, StreetNodeId,
    TripId, TripRef, ValidityId,
};
use crate::feed::Validity;

/// Static description of one trip, referenced by BOARD/ALIGHT edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDescriptor {
    pub feed: FeedId,
    pub trip: TripId,
    pub route: RouteId,
    pub route_type: u16,
    /// `(stop_sequence, stop)` in calling order.
    pub stops: Vec<(u32, StopId)>,
}

impl TripDescriptor {
    /// Returns the stop called at with `stop_sequence`.
    pub fn stop_at(&self, stop_sequence: u32) -> Option<&StopId> {
        self.stops
            .iter()
            .find(|(seq, _)| *seq == stop_sequence)
            .map(|(_, stop)| stop)
    }
}

/// Everything the search needs besides the bare graph.
///
/// Maps stops to their station street nodes, station street nodes to their
/// transit mirrors, ENTER_PT/EXIT_PT edges to platforms, and holds trip and
/// validity tables.
#[derive(Debug, Clone, Default)]
pub struct TransitStorage {
    station_nodes: HashMap<(FeedId, StopId), StreetNodeId>,
    street_to_pt: HashMap<StreetNodeId, PtNodeId>,
    pt_to_street: HashMap<PtNodeId, StreetNodeId>,
    platform_by_edge: HashMap<EdgeId, PlatformDescriptor>,
    enter_edge_by_platform: HashMap<PlatformDescriptor, EdgeId>,
    exit_edge_by_platform: HashMap<PlatformDescriptor, EdgeId>,
    trips: Vec<TripDescriptor>,
    validities: Vec<Validity>,
}

impl TransitStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the street node a stop snapped to.
    pub fn set_station_node(&mut self, feed: FeedId, stop: StopId, node: StreetNodeId) {
        self.station_nodes.insert((feed, stop), node);
    }

    /// Returns the street node a stop snapped to.
    pub fn station_node(&self, feed: &FeedId, stop: &StopId) -> Result<StreetNodeId, NotFoundError> {
        self.station_nodes
            .get(&(feed.clone(), stop.clone()))
            .copied()
            .ok_or_else(|| NotFoundError::Station {
                feed: feed.clone(),
                stop: stop.clone(),
            })
    }

    /// Distinct station street nodes across all feeds, in ascending order.
    pub fn station_street_nodes(&self) -> Vec<StreetNodeId> {
        self.station_nodes
            .values()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Link a station street node to its transit mirror.
    pub fn link_station(&mut self, street: StreetNodeId, pt: PtNodeId) {
        self.street_to_pt.insert(street, pt);
        self.pt_to_street.insert(pt, street);
    }

    /// Returns the transit mirror of a station street node.
    pub fn station_pt_node(&self, street: StreetNodeId) -> Option<PtNodeId> {
        self.street_to_pt.get(&street).copied()
    }

    /// Returns the street node mirrored by a station transit node.
    pub fn station_street_node(&self, pt: PtNodeId) -> Option<StreetNodeId> {
        self.pt_to_street.get(&pt).copied()
    }

    /// Register the ENTER_PT edge of a platform.
    pub fn register_entry(&mut self, edge: EdgeId, platform: PlatformDescriptor) {
        self.enter_edge_by_platform.insert(platform.clone(), edge);
        self.platform_by_edge.insert(edge, platform);
    }

    /// Register the EXIT_PT edge of a platform.
    pub fn register_exit(&mut self, edge: EdgeId, platform: PlatformDescriptor) {
        self.exit_edge_by_platform.insert(platform.clone(), edge);
        self.platform_by_edge.insert(edge, platform);
    }

    /// Returns the platform an ENTER_PT or EXIT_PT edge belongs to.
    pub fn platform_by_edge(&self, edge: EdgeId) -> Result<&PlatformDescriptor, NotFoundError> {
        self.platform_by_edge
            .get(&edge)
            .ok_or(NotFoundError::PlatformForEdge(edge))
    }

    /// Returns the ENTER_PT edge of a platform.
    pub fn entry_edge(&self, platform: &PlatformDescriptor) -> Result<EdgeId, NotFoundError> {
        self.enter_edge_by_platform
            .get(platform)
            .copied()
            .ok_or_else(|| NotFoundError::PlatformEntry(platform.clone()))
    }

    /// Returns the EXIT_PT edge of a platform, if it has arrivals.
    pub fn exit_edge(&self, platform: &PlatformDescriptor) -> Option<EdgeId> {
        self.exit_edge_by_platform.get(platform).copied()
    }

    /// Returns the number of registered platforms.
    pub fn platform_count(&self) -> usize {
        self.enter_edge_by_platform.len()
    }

    /// Register a trip and return its handle.
    pub fn add_trip(&mut self, trip: TripDescriptor) -> TripRef {
        self.trips.push(trip);
        TripRef(self.trips.len() as u32 - 1)
    }

    /// Look up a trip.
    pub fn trip(&self, trip: TripRef) -> Result<&TripDescriptor, NotFoundError> {
        self.trips.get(trip.index()).ok_or(NotFoundError::Trip(trip))
    }

    /// Register a validity and return its handle.
    pub fn add_validity(&mut self, validity: Validity) -> ValidityId {
        self.validities.push(validity);
        ValidityId(self.validities.len() as u32 - 1)
    }

    /// Look up a validity.
    pub fn validity(&self, id: ValidityId) -> Result<&Validity, NotFoundError> {
        self.validities
            .get(id.index())
            .ok_or(NotFoundError::Validity(id))
    }
}
