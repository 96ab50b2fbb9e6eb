//! Transit graph edges.
//!
//! Every edge carries an [`EdgePayload`]. The payload variant determines the
//! [`EdgeType`], so there is no way to build a HOP edge that lacks a travel
//! time or a BOARD edge without a validity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EdgeId, PtNodeId, TripRef, ValidityId};

/// Seconds in one service day.
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// The kind of a transit edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Station node to platform entry node.
    EnterPt,
    /// Platform exit node to station node.
    ExitPt,
    /// Platform entry node to one departure-timeline node.
    EnterTimeExpanded,
    /// Arrival-timeline node to platform exit node.
    LeaveTimeExpanded,
    /// Departure-timeline node onto a trip.
    Board,
    /// Off a trip onto an arrival-timeline node.
    Alight,
    /// Staying on a trip while it stands at a stop.
    Dwell,
    /// Riding a trip between two consecutive stops.
    Hop,
    /// Waiting on a departure timeline for the next departure.
    Wait,
    /// Waiting on an arrival timeline (used by backward search).
    WaitArrival,
    /// Walking from one platform to another.
    Transfer,
    /// Waiting from the last departure of a day to the first of the next.
    Overnight,
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeType::EnterPt => "ENTER_PT",
            EdgeType::ExitPt => "EXIT_PT",
            EdgeType::EnterTimeExpanded => "ENTER_TIME_EXPANDED",
            EdgeType::LeaveTimeExpanded => "LEAVE_TIME_EXPANDED",
            EdgeType::Board => "BOARD",
            EdgeType::Alight => "ALIGHT",
            EdgeType::Dwell => "DWELL",
            EdgeType::Hop => "HOP",
            EdgeType::Wait => "WAIT",
            EdgeType::WaitArrival => "WAIT_ARRIVAL",
            EdgeType::Transfer => "TRANSFER",
            EdgeType::Overnight => "OVERNIGHT",
        };
        f.write_str(name)
    }
}

/// Type-specific edge data.
///
/// Times of day are seconds after midnight in `0..SECONDS_PER_DAY`. Trips
/// running past midnight keep their service day and record the number of
/// whole days elapsed in `day_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgePayload {
    EnterPt,
    ExitPt,
    EnterTimeExpanded {
        time_of_day: u32,
    },
    LeaveTimeExpanded {
        time_of_day: u32,
    },
    Board {
        trip: TripRef,
        stop_sequence: u32,
        validity: ValidityId,
        day_offset: u32,
        route_type: u16,
    },
    Alight {
        trip: TripRef,
        stop_sequence: u32,
        validity: ValidityId,
        day_offset: u32,
        route_type: u16,
    },
    Dwell {
        seconds: u32,
    },
    Hop {
        seconds: u32,
    },
    Wait {
        seconds: u32,
    },
    WaitArrival {
        seconds: u32,
    },
    Transfer {
        seconds: u32,
    },
    Overnight {
        seconds: u32,
    },
}

impl EdgePayload {
    /// Returns the edge type this payload belongs to.
    pub fn edge_type(&self) -> EdgeType {
        match self {
            EdgePayload::EnterPt => EdgeType::EnterPt,
            EdgePayload::ExitPt => EdgeType::ExitPt,
            EdgePayload::EnterTimeExpanded { .. } => EdgeType::EnterTimeExpanded,
            EdgePayload::LeaveTimeExpanded { .. } => EdgeType::LeaveTimeExpanded,
            EdgePayload::Board { .. } => EdgeType::Board,
            EdgePayload::Alight { .. } => EdgeType::Alight,
            EdgePayload::Dwell { .. } => EdgeType::Dwell,
            EdgePayload::Hop { .. } => EdgeType::Hop,
            EdgePayload::Wait { .. } => EdgeType::Wait,
            EdgePayload::WaitArrival { .. } => EdgeType::WaitArrival,
            EdgePayload::Transfer { .. } => EdgeType::Transfer,
            EdgePayload::Overnight { .. } => EdgeType::Overnight,
        }
    }

    /// Returns the fixed traversal time for edges that have one.
    ///
    /// Timeline entry/exit edges are time-dependent and board/alight edges
    /// are free, so they return `None`.
    pub fn fixed_seconds(&self) -> Option<u32> {
        match *self {
            EdgePayload::Dwell { seconds }
            | EdgePayload::Hop { seconds }
            | EdgePayload::Wait { seconds }
            | EdgePayload::WaitArrival { seconds }
            | EdgePayload::Transfer { seconds }
            | EdgePayload::Overnight { seconds } => Some(seconds),
            _ => None,
        }
    }
}

/// A directed transit edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtEdge {
    pub id: EdgeId,
    pub from: PtNodeId,
    pub to: PtNodeId,
    pub payload: EdgePayload,
}

impl PtEdge {
    /// Returns the edge type.
    pub fn edge_type(&self) -> EdgeType {
        self.payload.edge_type()
    }
}
