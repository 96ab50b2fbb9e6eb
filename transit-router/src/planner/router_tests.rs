//! End-to-end query tests over small built networks.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use super::*;
use crate::build::{BuildConfig, ConfigError, TransitNetwork, TransitNetworkBuilder};
use crate::domain::{EdgePayload, NodeId, NotFoundError, StreetNodeId};
use crate::feed::{Calendar, Feed, Transfer, TransferType};
use crate::fixtures::*;
use crate::realtime::{DelayOverlay, RealtimeOverlay, StaticSchedule};
use crate::street::{FootWeighting, InMemoryStreetNetwork};

fn node(i: u32) -> StreetNodeId {
    StreetNodeId(i)
}

fn network(street: Arc<InMemoryStreetNetwork>, feeds: Vec<Feed>, interpolate: bool) -> TransitNetwork {
    let mut builder = TransitNetworkBuilder::new(BuildConfig::default(), street).unwrap();
    for feed in feeds {
        builder = builder.with_feed(feed).unwrap();
    }
    if interpolate {
        builder.interpolate_transfers(&FootWeighting::default()).unwrap();
    }
    builder.finish()
}

fn declared() -> TransitNetwork {
    network(street(3, &[]), vec![declared_transfer_feed()], false)
}

fn two_feeds(interpolate: bool) -> TransitNetwork {
    network(two_feed_street(), vec![feed_a(), feed_b()], interpolate)
}

fn route_with(
    network: &TransitNetwork,
    realtime: &dyn RealtimeOverlay,
    config: SearchConfig,
    request: RouteRequest,
) -> Vec<Journey> {
    let weighting = config.foot_weighting();
    Router::new(network, &weighting, realtime, config)
        .unwrap()
        .route(&request)
        .unwrap()
}

fn plan(network: &TransitNetwork, request: RouteRequest) -> Vec<Journey> {
    route_with(network, &StaticSchedule, SearchConfig::default(), request)
}

/// The segment kinds of a journey, for compact assertions.
fn shape(journey: &Journey) -> Vec<&'static str> {
    journey
        .segments()
        .iter()
        .map(|s| match s {
            Segment::Walk(_) => "walk",
            Segment::Transit(_) => "transit",
            Segment::Transfer { .. } => "transfer",
        })
        .collect()
}

#[test]
fn declared_transfer_is_the_only_way_to_change() {
    let network = declared();
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(2), at(7, 55)));

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(shape(journey), vec!["transit", "transfer", "transit"]);
    assert_eq!(journey.departure_time(), at(7, 55));
    assert_eq!(journey.arrival_time(), at(8, 30));
    assert_eq!(journey.change_count(), 1);
    assert_eq!(journey.walk_time(), Duration::zero());

    let Segment::Transfer { departure, arrival } = journey.segments()[1] else {
        unreachable!()
    };
    assert_eq!(arrival - departure, Duration::seconds(60));

    // T3 leaves S 30 s after T1 arrives, too soon for the 60 s rule.
    let legs: Vec<&Leg> = journey.legs().collect();
    assert_eq!(legs[0].trip.as_str(), "T1");
    assert_eq!(legs[1].trip.as_str(), "T2");
    assert_eq!(legs[1].board_stop.as_str(), "S");
    assert_eq!(legs[1].alight_stop.as_str(), "Y");
    assert_eq!(legs[1].departure, at(8, 11));
    assert_eq!(legs[1].hops, 1);
}

#[test]
fn direct_ride() {
    let network = declared();
    let journeys = plan(&network, RouteRequest::depart_at(node(1), node(2), at(8, 0)));

    assert_eq!(journeys.len(), 1);
    let legs: Vec<&Leg> = journeys[0].legs().collect();
    assert_eq!(legs.len(), 1);
    assert_eq!(legs[0].trip.as_str(), "T3");
    assert_eq!(legs[0].route.as_str(), "R2");
    assert_eq!(legs[0].route_type, 3);
    assert_eq!(journeys[0].arrival_time(), at(8, 20));
    assert_eq!(journeys[0].change_count(), 0);
}

#[test]
fn missed_departure_waits_for_next() {
    let network = declared();
    // After T3 has left, T2 is next.
    let journeys = plan(
        &network,
        RouteRequest::depart_at(node(1), node(2), Utc.with_ymd_and_hms(2024, 3, 15, 8, 10, 45).unwrap()),
    );
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].arrival_time(), at(8, 30));
}

#[test]
fn cross_feed_journey_uses_interpolated_transfer() {
    let network = two_feeds(true);
    let journeys = plan(&network, RouteRequest::depart_at(node(2), node(3), at(7, 55)));

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(shape(journey), vec!["transit", "transfer", "transit"]);
    assert_eq!(journey.arrival_time(), at(8, 30));
    assert_eq!(journey.walk_time(), Duration::zero());

    let legs: Vec<&Leg> = journey.legs().collect();
    assert_eq!(legs[0].feed.as_str(), "gtfs_0");
    assert_eq!(legs[1].feed.as_str(), "gtfs_1");
}

#[test]
fn cross_feed_journey_walks_without_interpolation() {
    let network = two_feeds(false);
    let journeys = plan(&network, RouteRequest::depart_at(node(2), node(3), at(7, 55)));

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(shape(journey), vec!["transit", "walk", "transit"]);
    assert_eq!(journey.walk_time(), Duration::seconds(45));
    let Segment::Walk(walk) = &journey.segments()[1] else {
        unreachable!()
    };
    assert_eq!(walk.from, NodeId::Street(node(0)));
    assert_eq!(walk.to, NodeId::Street(node(1)));
    assert_eq!(walk.duration(), Duration::seconds(45));
}

#[test]
fn walk_limit_forbids_the_walking_change() {
    let network = two_feeds(false);
    let config = SearchConfig {
        max_walk_secs: 30,
        ..SearchConfig::default()
    };
    let journeys = route_with(
        &network,
        &StaticSchedule,
        config,
        RouteRequest::depart_at(node(2), node(3), at(7, 55)),
    );
    assert!(journeys.is_empty());
}

#[test]
fn arrive_by_departs_as_late_as_possible() {
    let network = two_feeds(true);
    let journeys = plan(&network, RouteRequest::arrive_by(node(2), node(3), at(8, 35)));

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(shape(journey), vec!["transit", "transfer", "transit"]);
    assert_eq!(journey.departure_time(), at(8, 0));
    assert_eq!(journey.arrival_time(), at(8, 35));
    assert_eq!(journey.change_count(), 1);

    let legs: Vec<&Leg> = journey.legs().collect();
    assert_eq!(legs[0].departure, at(8, 0));
    assert_eq!(legs[0].arrival, at(8, 10));
    assert_eq!(legs[1].departure, at(8, 12));
    assert_eq!(legs[1].arrival, at(8, 30));
}

#[test]
fn arrive_by_before_last_arrival_finds_nothing_same_day() {
    let network = declared();
    // Y is only reached at 08:20 and 08:30.
    let journeys = plan(&network, RouteRequest::arrive_by(node(1), node(2), at(8, 15)));
    assert!(journeys.is_empty());
}

#[test]
fn max_transfers_limits_boardings() {
    let network = declared();
    let config = SearchConfig {
        max_transfers: 0,
        ..SearchConfig::default()
    };
    let journeys = route_with(
        &network,
        &StaticSchedule,
        config.clone(),
        RouteRequest::depart_at(node(0), node(2), at(7, 55)),
    );
    assert!(journeys.is_empty());

    let direct = route_with(
        &network,
        &StaticSchedule,
        config,
        RouteRequest::depart_at(node(1), node(2), at(8, 0)),
    );
    assert_eq!(direct.len(), 1);
}

#[test]
fn service_must_run_on_the_day() {
    let network = declared();
    let journeys = plan(
        &network,
        RouteRequest::depart_at(node(1), node(2), Utc.with_ymd_and_hms(2024, 4, 15, 8, 0, 0).unwrap()),
    );
    assert!(journeys.is_empty());

    let config = SearchConfig {
        ignore_validities: true,
        ..SearchConfig::default()
    };
    let journeys = route_with(
        &network,
        &StaticSchedule,
        config,
        RouteRequest::depart_at(node(1), node(2), Utc.with_ymd_and_hms(2024, 4, 15, 8, 0, 0).unwrap()),
    );
    assert_eq!(journeys.len(), 1);
}

/// N runs 24:30 -> 25:00 on the service day of Friday 15 March only.
fn overnight_feed() -> Feed {
    let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    Feed {
        stops: vec![stop("P", 0.0, lon(0)), stop("Q", 0.0, lon(1))],
        routes: vec![route("RN", 3)],
        trips: vec![trip("N", "RN")],
        stop_times: vec![
            stop_time("N", "P", 1, "24:30:00", "24:30:00"),
            stop_time("N", "Q", 2, "25:00:00", "25:00:00"),
        ],
        calendars: vec![Calendar {
            start_date: friday,
            end_date: friday,
            ..daily()
        }],
        ..Feed::default()
    }
}

#[test]
fn trip_past_midnight_belongs_to_previous_service_day() {
    let network = network(street(2, &[]), vec![overnight_feed()], false);

    let saturday_night = Utc.with_ymd_and_hms(2024, 3, 16, 0, 20, 0).unwrap();
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(1), saturday_night));
    assert_eq!(journeys.len(), 1);
    assert_eq!(
        journeys[0].arrival_time(),
        Utc.with_ymd_and_hms(2024, 3, 16, 1, 0, 0).unwrap()
    );

    // The same clock time a day earlier belongs to Thursday's service.
    let friday_night = Utc.with_ymd_and_hms(2024, 3, 15, 0, 20, 0).unwrap();
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(1), friday_night));
    assert!(journeys.is_empty());
}

#[test]
fn delays_shift_arrival() {
    let network = declared();
    let t2_hop = network
        .graph()
        .edges()
        .iter()
        .find(|e| e.payload == EdgePayload::Hop { seconds: 19 * 60 })
        .unwrap()
        .id;
    let realtime = DelayOverlay::new().delay(t2_hop, 120);

    let journeys = route_with(
        &network,
        &realtime,
        SearchConfig::default(),
        RouteRequest::depart_at(node(0), node(2), at(7, 55)),
    );
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].arrival_time(), at(8, 32));
}

#[test]
fn empty_overlay_matches_static_schedule() {
    let network = two_feeds(true);
    let request = RouteRequest::depart_at(node(2), node(3), at(7, 55));

    let scheduled = plan(&network, request);
    let overlaid = route_with(&network, &DelayOverlay::new(), SearchConfig::default(), request);
    assert_eq!(scheduled, overlaid);
}

#[test]
fn blocked_hop_removes_trip() {
    let network = declared();
    let t3_hop = network
        .graph()
        .edges()
        .iter()
        .find(|e| e.payload == EdgePayload::Hop { seconds: 9 * 60 + 30 })
        .unwrap()
        .id;
    let realtime = DelayOverlay::new().block(t3_hop);

    let journeys = route_with(
        &network,
        &realtime,
        SearchConfig::default(),
        RouteRequest::depart_at(node(1), node(2), at(8, 0)),
    );
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].legs().next().unwrap().trip.as_str(), "T2");
}

#[test]
fn blocked_route_type_is_never_ridden() {
    let network = declared();
    let config = SearchConfig {
        blocked_route_types: 1 << 3,
        ..SearchConfig::default()
    };
    let journeys = route_with(
        &network,
        &StaticSchedule,
        config,
        RouteRequest::depart_at(node(1), node(2), at(8, 0)),
    );
    assert!(journeys.is_empty());
}

/// S1 (node 0) 08:05 -> S2 (node 1) 08:10, daily.
fn shuttle_feed() -> Feed {
    Feed {
        stops: vec![stop("S1", 0.0, lon(0)), stop("S2", 0.0, lon(1))],
        routes: vec![route("SH", 3)],
        trips: vec![trip("SH1", "SH")],
        stop_times: vec![
            stop_time("SH1", "S1", 1, "08:05:00", "08:05:00"),
            stop_time("SH1", "S2", 2, "08:10:00", "08:10:00"),
        ],
        calendars: vec![daily()],
        ..Feed::default()
    }
}

#[test]
fn walking_and_riding_are_both_pareto_optimal() {
    // 600 m takes 7:12 on foot.
    let network = network(street(2, &[(0, 1, 600.0)]), vec![shuttle_feed()], false);
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(1), at(8, 0)));

    assert_eq!(journeys.len(), 2);
    assert_eq!(shape(&journeys[0]), vec!["walk"]);
    assert_eq!(journeys[0].arrival_time(), at(8, 7) + Duration::seconds(12));
    assert_eq!(shape(&journeys[1]), vec!["transit"]);
    assert_eq!(journeys[1].arrival_time(), at(8, 10));
    assert_eq!(journeys[1].walk_time(), Duration::zero());
}

#[test]
fn max_results_truncates() {
    let network = network(street(2, &[(0, 1, 600.0)]), vec![shuttle_feed()], false);
    let config = SearchConfig {
        max_results: 1,
        ..SearchConfig::default()
    };
    let request = RouteRequest::depart_at(node(0), node(1), at(8, 0));

    let all = plan(&network, request);
    let truncated = route_with(&network, &StaticSchedule, config, request);
    assert_eq!(all.len(), 2);
    assert_eq!(truncated, all[..1]);
}

#[test]
fn walking_only_journey() {
    let network = two_feeds(false);
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(1), at(9, 0)));

    assert_eq!(journeys.len(), 1);
    assert_eq!(shape(&journeys[0]), vec!["walk"]);
    assert_eq!(journeys[0].arrival_time(), at(9, 0) + Duration::seconds(45));
    assert_eq!(journeys[0].change_count(), 0);
}

#[test]
fn origin_equals_destination() {
    let network = two_feeds(false);
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(0), at(9, 0)));

    assert_eq!(journeys.len(), 1);
    assert!(journeys[0].segments().is_empty());
    assert_eq!(journeys[0].total_duration(), Duration::zero());
}

#[test]
fn unknown_street_node_is_an_error() {
    let network = two_feeds(false);
    let weighting = FootWeighting::default();
    let router = Router::new(&network, &weighting, &StaticSchedule, SearchConfig::default()).unwrap();

    let err = router
        .route(&RouteRequest::depart_at(node(0), node(99), at(9, 0)))
        .unwrap_err();
    assert_eq!(err, NotFoundError::StreetNode(node(99)));
}

/// T1 runs P (node 0) 08:00 -> S (node 1) 08:10 -> R (node 3) 08:11 and T2
/// runs S 08:20 -> Q (node 2) 08:30.
fn through_feed() -> Feed {
    Feed {
        stops: vec![
            stop("P", 0.0, lon(0)),
            stop("S", 0.0, lon(1)),
            stop("Q", 0.0, lon(2)),
            stop("R", 0.0, lon(3)),
        ],
        routes: vec![route("RT", 3)],
        trips: vec![trip("T1", "RT"), trip("T2", "RT")],
        stop_times: vec![
            stop_time("T1", "P", 1, "08:00:00", "08:00:00"),
            stop_time("T1", "S", 2, "08:10:00", "08:10:00"),
            stop_time("T1", "R", 3, "08:11:00", "08:11:00"),
            stop_time("T2", "S", 1, "08:20:00", "08:20:00"),
            stop_time("T2", "Q", 2, "08:30:00", "08:30:00"),
        ],
        calendars: vec![daily()],
        ..Feed::default()
    }
}

#[test]
fn same_stop_change_needs_no_declared_rule() {
    let network = network(street(4, &[]), vec![through_feed()], false);
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(2), at(7, 55)));

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(shape(journey), vec!["transit", "transfer", "transit"]);
    assert_eq!(journey.arrival_time(), at(8, 30));
    assert_eq!(journey.change_count(), 1);
    let legs: Vec<&Leg> = journey.legs().collect();
    assert_eq!(legs[0].alight_stop.as_str(), "S");
    assert_eq!(legs[1].board_stop.as_str(), "S");
}

#[test]
fn walking_to_a_nearby_stop_changes_vehicles() {
    // Changing at S is ruled out, so the only way is to ride on to R and
    // walk back to S.
    let mut feed = through_feed();
    feed.transfers.push(Transfer {
        transfer_type: TransferType::NotPossible,
        ..transfer("S", "S", None, None, 0)
    });
    let network = network(street(4, &[(1, 3, 62.5)]), vec![feed], false);
    let journeys = plan(&network, RouteRequest::depart_at(node(0), node(2), at(7, 55)));

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(shape(journey), vec!["transit", "walk", "transit"]);
    assert_eq!(journey.walk_time(), Duration::seconds(45));
    assert_eq!(journey.arrival_time(), at(8, 30));
    let legs: Vec<&Leg> = journey.legs().collect();
    assert_eq!(legs[0].alight_stop.as_str(), "R");
    assert_eq!(legs[1].board_stop.as_str(), "S");
}

/// Like [`feed_b`], but B1 sits on A1's street node and the feed declares
/// a 120 s change at B1.
fn feed_b_sharing_station() -> Feed {
    let mut feed = feed_b();
    feed.stops[0].stop_lon = lon(0);
    feed.transfers.push(transfer("B1", "B1", None, None, 120));
    feed
}

#[test]
fn feeds_with_own_rules_still_connect_at_shared_station() {
    let mut a = feed_a();
    a.transfers.push(transfer("A1", "A1", None, None, 300));
    let network = network(two_feed_street(), vec![a, feed_b_sharing_station()], true);
    let journeys = plan(&network, RouteRequest::depart_at(node(2), node(3), at(7, 55)));

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(shape(journey), vec!["transit", "transfer", "transit"]);
    assert_eq!(journey.arrival_time(), at(8, 30));
    let Segment::Transfer { departure, arrival } = journey.segments()[1] else {
        unreachable!()
    };
    // Rules of one feed never govern a change into another.
    assert_eq!(arrival - departure, Duration::zero());
}

#[test]
fn invalid_search_config_is_rejected() {
    let network = two_feeds(false);
    let weighting = FootWeighting::default();
    let config = SearchConfig {
        max_walk_secs: -1,
        ..SearchConfig::default()
    };
    let err = Router::new(&network, &weighting, &StaticSchedule, config).err();
    assert_eq!(err, Some(ConfigError::Negative("max_walk_secs")));
}

#[test]
fn configured_walk_speed_prices_walking() {
    let network = two_feeds(false);
    let config = SearchConfig {
        walk_speed_kmh: 2.5,
        ..SearchConfig::default()
    };
    let journeys = route_with(
        &network,
        &StaticSchedule,
        config,
        RouteRequest::depart_at(node(0), node(1), at(9, 0)),
    );
    assert_eq!(journeys[0].arrival_time(), at(9, 0) + Duration::seconds(90));
}
