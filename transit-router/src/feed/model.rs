//! Parsed feed records.
//!
//! These mirror the GTFS tables the router consumes. Parsing raw feed files
//! happens upstream; a [`Feed`] arrives already typed, usually as JSON.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::ScheduleTime;
use crate::domain::{RouteId, ServiceId, StopId, TripId};

/// One complete transit dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub stop_times: Vec<StopTime>,
    #[serde(default)]
    pub calendars: Vec<Calendar>,
    #[serde(default)]
    pub calendar_dates: Vec<CalendarDate>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

impl Feed {
    /// Deserialize a feed from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// A place where vehicles stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: StopId,
    #[serde(default)]
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

/// A group of trips shown to riders as one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: RouteId,
    #[serde(default)]
    pub route_short_name: String,
    /// GTFS route type (0 tram, 1 subway, 2 rail, 3 bus, ...).
    pub route_type: u16,
}

/// One run of a vehicle along a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
}

/// A scheduled call of a trip at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub arrival_time: ScheduleTime,
    pub departure_time: ScheduleTime,
}

/// Weekly service pattern for a service id over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub service_id: ServiceId,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Calendar {
    /// Returns true if the weekly pattern includes the weekday of `date`.
    pub fn runs_on_weekday(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Whether a calendar date adds or removes service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionType {
    Added,
    Removed,
}

/// A single-date exception to a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub exception_type: ExceptionType,
}

/// GTFS transfer type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    /// Recommended transfer point between routes.
    #[default]
    Recommended,
    /// The departing vehicle waits for the arriving one.
    Timed,
    /// Transfer needs at least `min_transfer_time` seconds.
    MinimumTime,
    /// Transfers are not possible between these stops/routes.
    NotPossible,
}

/// A declared transfer rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_stop_id: StopId,
    pub to_stop_id: StopId,
    #[serde(default)]
    pub from_route_id: Option<RouteId>,
    #[serde(default)]
    pub to_route_id: Option<RouteId>,
    #[serde(default)]
    pub transfer_type: TransferType,
    #[serde(default)]
    pub min_transfer_time: Option<u32>,
}

impl Transfer {
    /// Seconds needed to make this transfer.
    pub fn min_transfer_seconds(&self) -> u32 {
        self.min_transfer_time.unwrap_or(0)
    }

    /// Returns true if this rule mentions a route on either side.
    pub fn is_route_specific(&self) -> bool {
        self.from_route_id.is_some() || self.to_route_id.is_some()
    }
}
