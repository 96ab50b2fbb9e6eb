//! Journey types.
//!
//! A `Journey` is read off the label path that reached the destination. Its
//! segments are walks on streets, rides on one trip, and transfers between
//! platforms; waiting on platforms is implicit in the gaps between them.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

use super::{Label, TraversedEdge};
use crate::domain::{
    EdgePayload, FeedId, NodeId, NotFoundError, RouteId, StopId, StreetEdgeId, TripId, TripRef,
};
use crate::graph::{PtGraph, TransitStorage};

fn as_seconds<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_seconds())
}

/// A walk on streets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Walk {
    pub from: NodeId,
    pub to: NodeId,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub edges: Vec<StreetEdgeId>,
}

impl Walk {
    /// Returns the walking duration.
    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }
}

/// A ride on one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    pub feed: FeedId,
    pub trip: TripId,
    pub route: RouteId,
    pub route_type: u16,
    pub board_stop: StopId,
    pub alight_stop: StopId,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    /// Number of stops travelled.
    pub hops: usize,
}

impl Leg {
    /// Returns the riding duration.
    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }
}

/// One part of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Walk(Walk),
    Transit(Leg),
    /// A declared or interpolated transfer between platforms.
    Transfer {
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    },
}

impl Segment {
    /// Returns the time this segment starts.
    pub fn departure(&self) -> DateTime<Utc> {
        match self {
            Segment::Walk(walk) => walk.departure,
            Segment::Transit(leg) => leg.departure,
            Segment::Transfer { departure, .. } => *departure,
        }
    }

    /// Returns the time this segment ends.
    pub fn arrival(&self) -> DateTime<Utc> {
        match self {
            Segment::Walk(walk) => walk.arrival,
            Segment::Transit(leg) => leg.arrival,
            Segment::Transfer { arrival, .. } => *arrival,
        }
    }

    /// Returns the leg if this is a transit segment.
    pub fn as_leg(&self) -> Option<&Leg> {
        match self {
            Segment::Transit(leg) => Some(leg),
            _ => None,
        }
    }
}

/// A complete journey from origin to destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    segments: Vec<Segment>,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    boardings: u32,
    #[serde(serialize_with = "as_seconds")]
    walk_time: Duration,
    edges: Vec<TraversedEdge>,
}

/// One traversed edge in travel order.
struct Step {
    edge: TraversedEdge,
    from: NodeId,
    to: NodeId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// A trip boarded but not yet alighted.
struct Riding {
    trip: TripRef,
    stop_sequence: u32,
    departure: DateTime<Utc>,
    hops: usize,
}

impl Journey {
    /// Reconstruct a journey from a search path (search origin first).
    ///
    /// With `reverse`, the path was found by a backward search, so the
    /// search origin is the travel destination.
    pub fn from_path(
        path: &[Label],
        reverse: bool,
        graph: &PtGraph,
        storage: &TransitStorage,
    ) -> Result<Self, NotFoundError> {
        let mut travel = path.to_vec();
        if reverse {
            travel.reverse();
        }

        // A forward label holds the edge that led to it; a reverse label
        // holds the edge that leaves it in travel order.
        let steps: Vec<Step> = travel
            .windows(2)
            .filter_map(|pair| {
                let carrier = if reverse { &pair[0] } else { &pair[1] };
                carrier.edge.map(|edge| Step {
                    edge,
                    from: pair[0].node,
                    to: pair[1].node,
                    start: pair[0].time,
                    end: pair[1].time,
                })
            })
            .collect();

        let last_settled = if reverse { travel.first() } else { travel.last() };
        let (boardings, walk_time) = last_settled
            .map(|l| (l.num_transfers, l.walk_time))
            .unwrap_or((0, Duration::zero()));

        Ok(Self {
            segments: segments(&steps, graph, storage)?,
            departure: travel.first().map(|l| l.time).unwrap_or_default(),
            arrival: travel.last().map(|l| l.time).unwrap_or_default(),
            boardings,
            walk_time,
            edges: steps.iter().map(|s| s.edge).collect(),
        })
    }

    /// Returns the segments in travel order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the transit legs in travel order.
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.segments.iter().filter_map(Segment::as_leg)
    }

    pub fn departure_time(&self) -> DateTime<Utc> {
        self.departure
    }

    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.arrival
    }

    pub fn total_duration(&self) -> Duration {
        self.arrival - self.departure
    }

    /// Returns the number of changes between vehicles.
    pub fn change_count(&self) -> u32 {
        self.boardings.saturating_sub(1)
    }

    /// Returns the time spent walking on streets.
    pub fn walk_time(&self) -> Duration {
        self.walk_time
    }

    /// Returns every traversed edge in travel order.
    pub fn edges(&self) -> &[TraversedEdge] {
        &self.edges
    }
}

fn segments(
    steps: &[Step],
    graph: &PtGraph,
    storage: &TransitStorage,
) -> Result<Vec<Segment>, NotFoundError> {
    let mut segments = Vec::new();
    let mut walk: Option<Walk> = None;
    let mut riding: Option<Riding> = None;

    for step in steps {
        let id = match step.edge {
            TraversedEdge::Street { id } => {
                let current = walk.get_or_insert_with(|| Walk {
                    from: step.from,
                    to: step.to,
                    departure: step.start,
                    arrival: step.end,
                    edges: Vec::new(),
                });
                current.to = step.to;
                current.arrival = step.end;
                current.edges.push(id);
                continue;
            }
            TraversedEdge::Pt { id, .. } => id,
        };
        if let Some(done) = walk.take() {
            segments.push(Segment::Walk(done));
        }

        match graph.edge(id)?.payload {
            EdgePayload::Board {
                trip,
                stop_sequence,
                ..
            } => {
                riding = Some(Riding {
                    trip,
                    stop_sequence,
                    departure: step.start,
                    hops: 0,
                });
            }
            EdgePayload::Hop { .. } => {
                if let Some(r) = riding.as_mut() {
                    r.hops += 1;
                }
            }
            EdgePayload::Alight { stop_sequence, .. } => {
                if let Some(r) = riding.take() {
                    segments.push(Segment::Transit(leg(storage, &r, stop_sequence, step.start)?));
                }
            }
            EdgePayload::Transfer { .. } => segments.push(Segment::Transfer {
                departure: step.start,
                arrival: step.end,
            }),
            _ => {}
        }
    }
    if let Some(done) = walk {
        segments.push(Segment::Walk(done));
    }
    Ok(segments)
}

fn leg(
    storage: &TransitStorage,
    riding: &Riding,
    alight_sequence: u32,
    arrival: DateTime<Utc>,
) -> Result<Leg, NotFoundError> {
    let trip = storage.trip(riding.trip)?;
    let stop = |seq| trip.stop_at(seq).cloned().ok_or(NotFoundError::Trip(riding.trip));
    Ok(Leg {
        feed: trip.feed.clone(),
        trip: trip.trip.clone(),
        route: trip.route.clone(),
        route_type: trip.route_type,
        board_stop: stop(riding.stop_sequence)?,
        alight_stop: stop(alight_sequence)?,
        departure: riding.departure,
        arrival,
        hops: riding.hops,
    })
}
