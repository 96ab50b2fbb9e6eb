//! Structural problems in feed data.

use crate::domain::{NotFoundError, RouteId, ServiceId, StopId, TripId};

/// A feed is internally inconsistent.
///
/// Any of these aborts the whole build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("trip {trip} references unknown stop {stop}")]
    MissingStop { trip: TripId, stop: StopId },

    #[error("trip {trip} references unknown route {route}")]
    MissingRoute { trip: TripId, route: RouteId },

    #[error("trip {trip} references service {service} with no calendar")]
    MissingService { trip: TripId, service: ServiceId },

    #[error("stop time references unknown trip {0}")]
    UnknownTrip(TripId),

    #[error("trip {trip} has duplicate stop_sequence {stop_sequence}")]
    DuplicateStopSequence { trip: TripId, stop_sequence: u32 },

    /// A departure precedes the arrival at the same stop, or an arrival
    /// precedes the previous departure.
    #[error("trip {trip} goes back in time at stop_sequence {stop_sequence}")]
    TimeTravel { trip: TripId, stop_sequence: u32 },

    #[error("transfer references unknown stop {0}")]
    TransferStop(StopId),

    #[error("stop {0} has no street node within reach")]
    UnsnappableStop(StopId),

    #[error("duplicate {kind} {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeedError::MissingStop {
            trip: TripId::parse("T1").unwrap(),
            stop: StopId::parse("S9").unwrap(),
        };
        assert_eq!(err.to_string(), "trip T1 references unknown stop S9");

        let err = FeedError::TimeTravel {
            trip: TripId::parse("T1").unwrap(),
            stop_sequence: 3,
        };
        assert_eq!(err.to_string(), "trip T1 goes back in time at stop_sequence 3");

        let err = FeedError::Duplicate {
            kind: "stop",
            id: "S1".into(),
        };
        assert_eq!(err.to_string(), "duplicate stop S1");
    }
}
