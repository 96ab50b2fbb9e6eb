//! Feed ingestion boundary.
//!
//! Typed feed records, the schedule-time format they use, service-day
//! validities derived from calendars, and the per-feed transfer index.

mod error;
mod model;
mod time;
mod transfers;
mod validity;

pub use error::FeedError;
pub use model::{
    Calendar, CalendarDate, ExceptionType, Feed, Route, Stop, StopTime, Transfer, TransferType,
    Trip,
};
pub use time::{ScheduleTime, ScheduleTimeError};
pub use transfers::Transfers;
pub use validity::Validity;
