//! Adjacency over the combined street and transit graph.
//!
//! The explorer hides the fact that streets and transit live in two separate
//! stores. A station street node exposes the ENTER_PT (or, reversed,
//! EXIT_PT) edges of its transit mirror, and a transit edge that ends at a
//! station mirror reports the street node as its target, so the search only
//! ever sees the station as one node.
//!
//! Time-dependent edges are priced at the label's instant: entering a
//! departure timeline only yields the next departure (the previous arrival
//! when reversed), wrapping around midnight.

use chrono::{DateTime, Days, Duration, Timelike, Utc};

use super::{Label, TraversedEdge};
use crate::domain::{
    EdgePayload, EdgeType, NodeId, PtEdge, PtNodeId, SECONDS_PER_DAY, ValidityId,
};
use crate::graph::{PtGraph, TransitStorage};
use crate::realtime::RealtimeOverlay;
use crate::street::{StreetEdge, StreetNetwork, Weighting};

const MILLIS_PER_DAY: i64 = SECONDS_PER_DAY as i64 * 1000;

/// Mode flags for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorerOptions {
    /// Search backwards in time from an arrival.
    pub reverse: bool,
    /// Only walk; transit nodes are reached but never expanded.
    pub walk_only: bool,
    /// Never use street edges.
    pub pt_only: bool,
    /// Board trips on any day.
    pub ignore_validities: bool,
    /// Bit `n` set means route type `n` may not be ridden.
    pub blocked_route_types: u32,
}

/// One traversable edge with its cost at the label's instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploredEdge {
    pub edge: TraversedEdge,
    pub target: NodeId,
    pub cost: Duration,
    /// Part of `cost` spent walking on streets.
    pub walk: Duration,
    /// Vehicles boarded by taking this edge.
    pub boardings: u32,
}

/// Yields the traversable edges around a label.
pub struct GraphExplorer<'a> {
    street: &'a dyn StreetNetwork,
    graph: &'a PtGraph,
    storage: &'a TransitStorage,
    weighting: &'a dyn Weighting,
    realtime: &'a dyn RealtimeOverlay,
    options: ExplorerOptions,
}

impl<'a> GraphExplorer<'a> {
    pub fn new(
        street: &'a dyn StreetNetwork,
        graph: &'a PtGraph,
        storage: &'a TransitStorage,
        weighting: &'a dyn Weighting,
        realtime: &'a dyn RealtimeOverlay,
        options: ExplorerOptions,
    ) -> Self {
        Self {
            street,
            graph,
            storage,
            weighting,
            realtime,
            options,
        }
    }

    pub fn options(&self) -> ExplorerOptions {
        self.options
    }

    /// Returns the edges that can be taken from `label`'s node at its time.
    ///
    /// In a reverse search these are the node's in-edges, traversed against
    /// their direction.
    pub fn edges_from(&self, label: &Label) -> impl Iterator<Item = ExploredEdge> + '_ {
        let label = *label;
        let (street_node, pt_node) = match label.node {
            NodeId::Street(s) => (Some(s), self.storage.station_pt_node(s)),
            NodeId::Pt(p) => (None, Some(p)),
        };

        let walking: &[StreetEdge] = match street_node {
            Some(s) if !self.options.pt_only => self.street.edges_from(s),
            _ => &[],
        };
        let transit = if self.options.walk_only && street_node.is_none() {
            None
        } else {
            pt_node
        };

        let street_edges = walking.iter().filter_map(move |e| self.street_edge(e));
        let pt_edges = transit
            .into_iter()
            .flat_map(move |p| self.graph.adjacent(p, self.options.reverse))
            .filter_map(move |e| self.pt_edge(e, &label));
        let timeline = transit.and_then(|p| self.timeline_entry(p, &label));

        street_edges.chain(pt_edges).chain(timeline)
    }

    fn street_edge(&self, edge: &StreetEdge) -> Option<ExploredEdge> {
        let duration = self.weighting.edge_duration(edge, self.options.reverse)?;
        Some(ExploredEdge {
            edge: TraversedEdge::Street { id: edge.id },
            target: NodeId::Street(edge.to),
            cost: duration,
            walk: duration,
            boardings: 0,
        })
    }

    fn pt_edge(&self, edge: &PtEdge, label: &Label) -> Option<ExploredEdge> {
        let reverse = self.options.reverse;
        let (seconds, boardings) = match edge.payload {
            EdgePayload::EnterPt => {
                if !reverse && label.edge_type() == Some(EdgeType::ExitPt) {
                    return None;
                }
                (0, 0)
            }
            EdgePayload::ExitPt => {
                if reverse && label.edge_type() == Some(EdgeType::EnterPt) {
                    return None;
                }
                (0, 0)
            }
            // Forward timeline entry is priced by `timeline_entry`.
            EdgePayload::EnterTimeExpanded { .. } => {
                if !reverse {
                    return None;
                }
                (0, 0)
            }
            EdgePayload::Wait { seconds } | EdgePayload::Overnight { seconds } => {
                if reverse {
                    return None;
                }
                (seconds, 0)
            }
            // Likewise reverse timeline exit.
            EdgePayload::LeaveTimeExpanded { .. } => {
                if reverse {
                    return None;
                }
                (0, 0)
            }
            EdgePayload::WaitArrival { seconds } => {
                if !reverse {
                    return None;
                }
                (seconds, 0)
            }
            EdgePayload::Board {
                validity,
                day_offset,
                route_type,
                ..
            } => {
                if !self.may_ride(edge, route_type) {
                    return None;
                }
                if reverse {
                    (0, 0)
                } else if self.runs_on(label.time, validity, day_offset) {
                    (0, 1)
                } else {
                    return None;
                }
            }
            EdgePayload::Alight {
                validity,
                day_offset,
                route_type,
                ..
            } => {
                if !self.may_ride(edge, route_type) {
                    return None;
                }
                if !reverse {
                    (0, 0)
                } else if self.runs_on(label.time, validity, day_offset) {
                    (0, 1)
                } else {
                    return None;
                }
            }
            EdgePayload::Hop { seconds } | EdgePayload::Dwell { seconds } => {
                if self.realtime.is_blocked(edge.id) {
                    return None;
                }
                (self.realtime.adjusted_seconds(edge.id, seconds), 0)
            }
            EdgePayload::Transfer { seconds } => (seconds, 0),
        };

        let other = if reverse { edge.from } else { edge.to };
        Some(ExploredEdge {
            edge: TraversedEdge::Pt {
                id: edge.id,
                edge_type: edge.edge_type(),
            },
            target: self.node_for(other),
            cost: Duration::seconds(i64::from(seconds)),
            walk: Duration::zero(),
            boardings,
        })
    }

    /// The single timeline edge to take from a platform node: the next
    /// departure going forward, the previous arrival going backward.
    fn timeline_entry(&self, node: PtNodeId, label: &Label) -> Option<ExploredEdge> {
        let reverse = self.options.reverse;
        let now = millis_of_day(label.time);

        let (edge, wait) = self
            .graph
            .adjacent(node, reverse)
            .filter_map(|e| match e.payload {
                EdgePayload::EnterTimeExpanded { time_of_day } if !reverse => {
                    Some((e, i64::from(time_of_day) * 1000))
                }
                EdgePayload::LeaveTimeExpanded { time_of_day } if reverse => {
                    Some((e, i64::from(time_of_day) * 1000))
                }
                _ => None,
            })
            .map(|(e, scheduled)| {
                let wait = if reverse {
                    now - scheduled
                } else {
                    scheduled - now
                };
                (e, wait.rem_euclid(MILLIS_PER_DAY))
            })
            .min_by_key(|&(_, wait)| wait)?;

        let other = if reverse { edge.from } else { edge.to };
        Some(ExploredEdge {
            edge: TraversedEdge::Pt {
                id: edge.id,
                edge_type: edge.edge_type(),
            },
            target: self.node_for(other),
            cost: Duration::milliseconds(wait),
            walk: Duration::zero(),
            boardings: 0,
        })
    }

    fn may_ride(&self, edge: &PtEdge, route_type: u16) -> bool {
        if route_type < 32 && self.options.blocked_route_types & (1u32 << route_type) != 0 {
            return false;
        }
        !self.realtime.is_blocked(edge.id)
    }

    /// Returns true if a trip whose call is `day_offset` days into its
    /// service day runs at `time`.
    fn runs_on(&self, time: DateTime<Utc>, validity: ValidityId, day_offset: u32) -> bool {
        if self.options.ignore_validities {
            return true;
        }
        let Some(service_day) = time
            .date_naive()
            .checked_sub_days(Days::new(u64::from(day_offset)))
        else {
            return false;
        };
        self.storage
            .validity(validity)
            .is_ok_and(|v| v.is_active(service_day))
    }

    fn node_for(&self, pt: PtNodeId) -> NodeId {
        match self.storage.station_street_node(pt) {
            Some(street) => NodeId::Street(street),
            None => NodeId::Pt(pt),
        }
    }
}

fn millis_of_day(time: DateTime<Utc>) -> i64 {
    let sub_second = i64::from(time.nanosecond() % 1_000_000_000) / 1_000_000;
    i64::from(time.num_seconds_from_midnight()) * 1000 + sub_second
}
