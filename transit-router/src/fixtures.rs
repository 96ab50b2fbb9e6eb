//! Feed and street fixtures shared by unit tests.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::{RouteId, ServiceId, StopId, TripId};
use crate::feed::{Calendar, Feed, Route, ScheduleTime, Stop, StopTime, Transfer, TransferType, Trip};
use crate::street::InMemoryStreetNetwork;

/// 2024-03-15 (a Friday) at `h:m` UTC.
pub(crate) fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, h, m, 0).unwrap()
}

pub(crate) fn stop_id(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

pub(crate) fn route_id(s: &str) -> RouteId {
    RouteId::parse(s).unwrap()
}

pub(crate) fn stop(id: &str, lat: f64, lon: f64) -> Stop {
    Stop {
        stop_id: stop_id(id),
        stop_name: id.to_string(),
        stop_lat: lat,
        stop_lon: lon,
    }
}

pub(crate) fn route(id: &str, route_type: u16) -> Route {
    Route {
        route_id: route_id(id),
        route_short_name: id.to_string(),
        route_type,
    }
}

/// A trip on `route` with service `daily`.
pub(crate) fn trip(id: &str, route: &str) -> Trip {
    Trip {
        trip_id: TripId::parse(id).unwrap(),
        route_id: route_id(route),
        service_id: ServiceId::parse("daily").unwrap(),
    }
}

pub(crate) fn stop_time(trip: &str, stop: &str, seq: u32, arr: &str, dep: &str) -> StopTime {
    StopTime {
        trip_id: TripId::parse(trip).unwrap(),
        stop_id: stop_id(stop),
        stop_sequence: seq,
        arrival_time: ScheduleTime::parse(arr).unwrap(),
        departure_time: ScheduleTime::parse(dep).unwrap(),
    }
}

/// Service `daily`, every day of March 2024.
pub(crate) fn daily() -> Calendar {
    Calendar {
        service_id: ServiceId::parse("daily").unwrap(),
        monday: true,
        tuesday: true,
        wednesday: true,
        thursday: true,
        friday: true,
        saturday: true,
        sunday: true,
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    }
}

pub(crate) fn transfer(
    from: &str,
    to: &str,
    from_route: Option<&str>,
    to_route: Option<&str>,
    seconds: u32,
) -> Transfer {
    Transfer {
        from_stop_id: stop_id(from),
        to_stop_id: stop_id(to),
        from_route_id: from_route.map(route_id),
        to_route_id: to_route.map(route_id),
        transfer_type: TransferType::MinimumTime,
        min_transfer_time: Some(seconds),
    }
}

/// Longitude of street node `i` in [`street`]. Nodes are 0.01 degrees
/// (about 1.1 km) apart on the equator.
pub(crate) fn lon(i: u32) -> f64 {
    f64::from(i) * 0.01
}

/// `nodes` street nodes on the equator, joined only by `edges`
/// (`(a, b, metres)`).
pub(crate) fn street(nodes: u32, edges: &[(u32, u32, f64)]) -> Arc<InMemoryStreetNetwork> {
    let mut net = InMemoryStreetNetwork::new();
    let ids: Vec<_> = (0..nodes).map(|i| net.add_node(0.0, lon(i))).collect();
    for &(a, b, metres) in edges {
        net.add_edge(ids[a as usize], ids[b as usize], metres).unwrap();
    }
    Arc::new(net)
}

/// Single feed, two routes meeting at stop S with a 60 s route-scoped
/// transfer from R1 to R2.
///
/// Stops: X at node 0, S at node 1, Y at node 2 (no streets between them).
/// T1 (R1) X 08:00 -> S 08:10, T2 (R2) S 08:11 -> Y 08:30, and the
/// too-early T3 (R2) S 08:10:30 -> Y 08:20.
pub(crate) fn declared_transfer_feed() -> Feed {
    Feed {
        stops: vec![stop("X", 0.0, lon(0)), stop("S", 0.0, lon(1)), stop("Y", 0.0, lon(2))],
        routes: vec![route("R1", 3), route("R2", 3)],
        trips: vec![trip("T1", "R1"), trip("T2", "R2"), trip("T3", "R2")],
        stop_times: vec![
            stop_time("T1", "X", 1, "08:00:00", "08:00:00"),
            stop_time("T1", "S", 2, "08:10:00", "08:10:00"),
            stop_time("T2", "S", 1, "08:11:00", "08:11:00"),
            stop_time("T2", "Y", 2, "08:30:00", "08:30:00"),
            stop_time("T3", "S", 1, "08:10:30", "08:10:30"),
            stop_time("T3", "Y", 2, "08:20:00", "08:20:00"),
        ],
        calendars: vec![daily()],
        calendar_dates: Vec::new(),
        transfers: vec![transfer("S", "S", Some("R1"), Some("R2"), 60)],
    }
}

/// First of two feeds meeting at neighbouring stations: A0 (node 2)
/// 08:00 -> A1 (node 0) 08:10.
pub(crate) fn feed_a() -> Feed {
    Feed {
        stops: vec![stop("A0", 0.0, lon(2)), stop("A1", 0.0, lon(0))],
        routes: vec![route("RA", 2)],
        trips: vec![trip("TA", "RA")],
        stop_times: vec![
            stop_time("TA", "A0", 1, "08:00:00", "08:00:00"),
            stop_time("TA", "A1", 2, "08:10:00", "08:10:00"),
        ],
        calendars: vec![daily()],
        ..Feed::default()
    }
}

/// Second feed: B1 (node 1) 08:12 -> B2 (node 3) 08:30.
pub(crate) fn feed_b() -> Feed {
    Feed {
        stops: vec![stop("B1", 0.0, lon(1)), stop("B2", 0.0, lon(3))],
        routes: vec![route("RB", 3)],
        trips: vec![trip("TB", "RB")],
        stop_times: vec![
            stop_time("TB", "B1", 1, "08:12:00", "08:12:00"),
            stop_time("TB", "B2", 2, "08:30:00", "08:30:00"),
        ],
        calendars: vec![daily()],
        ..Feed::default()
    }
}

/// Street for [`feed_a`] and [`feed_b`]: nodes 0 and 1 are 62.5 m apart,
/// which is 45 s at walking speed.
pub(crate) fn two_feed_street() -> Arc<InMemoryStreetNetwork> {
    street(4, &[(0, 1, 62.5)])
}
