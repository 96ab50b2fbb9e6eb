//! Per-feed graph construction.
//!
//! A feed's stops are snapped to street nodes, its trips are expanded into
//! platform timelines plus trip chains, and its declared transfer rules
//! become TRANSFER edges. All nodes and edges go into the shared
//! [`PtGraph`], so several feeds can meet at the same station street node.
//!
//! Per platform the layout is:
//!
//! ```text
//! station --ENTER_PT--> entry --ENTER_TIME_EXPANDED--> departure timeline
//! departure timeline --WAIT--> ... --OVERNIGHT--> first departure
//! departure --BOARD--> trip --HOP/DWELL--> trip --ALIGHT--> arrival timeline
//! arrival timeline --LEAVE_TIME_EXPANDED--> exit --EXIT_PT--> station
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, trace};

use crate::domain::{
    EdgeId, EdgePayload, FeedId, NotFoundError, PlatformDescriptor, PtNodeId, RouteId,
    SECONDS_PER_DAY, ServiceId, StopId, StreetNodeId, TripId, ValidityId,
};
use crate::feed::{
    Calendar, CalendarDate, Feed, FeedError, Route, StopTime, TransferType, Transfers, Trip,
    Validity,
};
use crate::graph::{PtGraph, TransitStorage, TripDescriptor};
use crate::street::LocationIndex;

/// Builds one feed's part of the shared transit graph.
pub struct FeedReader<'g> {
    feed_id: FeedId,
    graph: &'g mut PtGraph,
    storage: &'g mut TransitStorage,
}

/// Scheduled times seen at one platform.
#[derive(Debug, Default)]
struct PlatformTimes {
    departures: BTreeSet<u32>,
    arrivals: BTreeSet<u32>,
}

/// Timeline nodes of one platform, keyed by time of day.
#[derive(Debug, Default)]
struct Timelines {
    departures: BTreeMap<u32, PtNodeId>,
    arrivals: BTreeMap<u32, PtNodeId>,
    exit: Option<PtNodeId>,
}

/// A trip with its validated, ordered stop times.
struct TripPlan<'f> {
    trip: &'f Trip,
    route: &'f Route,
    validity: ValidityId,
    calls: Vec<(&'f StopTime, PlatformDescriptor)>,
}

impl<'g> FeedReader<'g> {
    /// Create a reader that writes `feed_id`'s nodes and edges.
    pub fn new(feed_id: FeedId, graph: &'g mut PtGraph, storage: &'g mut TransitStorage) -> Self {
        Self {
            feed_id,
            graph,
            storage,
        }
    }

    /// Returns the feed this reader builds.
    pub fn feed_id(&self) -> &FeedId {
        &self.feed_id
    }

    /// Snap every stop to a street node and make sure the node has a
    /// transit mirror. Returns the number of stops connected.
    pub fn connect_stops_to_street_network(
        &mut self,
        feed: &Feed,
        index: &dyn LocationIndex,
    ) -> Result<usize, FeedError> {
        let mut seen = BTreeSet::new();
        for stop in &feed.stops {
            if !seen.insert(&stop.stop_id) {
                return Err(FeedError::Duplicate {
                    kind: "stop",
                    id: stop.stop_id.to_string(),
                });
            }
            let node = index
                .closest_node(stop.stop_lat, stop.stop_lon)
                .ok_or_else(|| FeedError::UnsnappableStop(stop.stop_id.clone()))?;
            self.station_pt_node_or_create(node);
            self.storage
                .set_station_node(self.feed_id.clone(), stop.stop_id.clone(), node);
            trace!(feed = %self.feed_id, stop = %stop.stop_id, node = %node, "stop snapped");
        }
        debug!(feed = %self.feed_id, stops = seen.len(), "stops connected to street network");
        Ok(seen.len())
    }

    fn station_pt_node_or_create(&mut self, street: StreetNodeId) -> PtNodeId {
        if let Some(pt) = self.storage.station_pt_node(street) {
            return pt;
        }
        let pt = self.graph.add_node();
        self.storage.link_station(street, pt);
        pt
    }

    /// Expand trips into timelines and trip chains, then materialize the
    /// feed's declared transfers.
    ///
    /// Stops must already be connected. Trips are processed in trip id
    /// order and their calls in stop sequence order, so the same feed always
    /// produces the same edge ids.
    pub fn build_pt_network(&mut self, feed: &Feed, transfers: &Transfers) -> Result<(), FeedError> {
        let edges_before = self.graph.edge_count();
        let plans = self.plan_trips(feed, transfers)?;

        let mut times: BTreeMap<PlatformDescriptor, PlatformTimes> = BTreeMap::new();
        for plan in &plans {
            let last = plan.calls.len() - 1;
            for (i, (call, platform)) in plan.calls.iter().enumerate() {
                let entry = times.entry(platform.clone()).or_default();
                if i < last {
                    entry.departures.insert(call.departure_time.time_of_day());
                }
                if i > 0 {
                    entry.arrivals.insert(call.arrival_time.time_of_day());
                }
            }
        }

        let mut timelines = BTreeMap::new();
        for (platform, platform_times) in &times {
            let timeline = self.build_platform(platform, platform_times)?;
            timelines.insert(platform.clone(), timeline);
        }

        for plan in &plans {
            self.build_trip(plan, &timelines)?;
        }

        let declared = self.materialize_transfers(feed, &timelines)?;
        let within_stop = self.insert_within_stop_transfers(transfers, &timelines)?;

        info!(
            feed = %self.feed_id,
            trips = plans.len(),
            platforms = timelines.len(),
            declared_transfers = declared,
            within_stop_transfers = within_stop,
            edges = self.graph.edge_count() - edges_before,
            "transit network built"
        );
        Ok(())
    }

    /// Validate trips and stop times and put them in build order.
    fn plan_trips<'f>(
        &mut self,
        feed: &'f Feed,
        transfers: &Transfers,
    ) -> Result<Vec<TripPlan<'f>>, FeedError> {
        let mut routes: HashMap<&RouteId, &Route> = HashMap::new();
        for route in &feed.routes {
            if routes.insert(&route.route_id, route).is_some() {
                return Err(FeedError::Duplicate {
                    kind: "route",
                    id: route.route_id.to_string(),
                });
            }
        }

        let mut trips: BTreeMap<&TripId, &Trip> = BTreeMap::new();
        for trip in &feed.trips {
            if trips.insert(&trip.trip_id, trip).is_some() {
                return Err(FeedError::Duplicate {
                    kind: "trip",
                    id: trip.trip_id.to_string(),
                });
            }
        }

        let mut stop_times: HashMap<&TripId, Vec<&StopTime>> = HashMap::new();
        for st in &feed.stop_times {
            if !trips.contains_key(&st.trip_id) {
                return Err(FeedError::UnknownTrip(st.trip_id.clone()));
            }
            stop_times.entry(&st.trip_id).or_default().push(st);
        }

        let mut validities = ValidityTable::new(feed);
        let mut plans = Vec::with_capacity(trips.len());

        for (trip_id, trip) in trips {
            let route = routes
                .get(&trip.route_id)
                .copied()
                .ok_or_else(|| FeedError::MissingRoute {
                    trip: trip_id.clone(),
                    route: trip.route_id.clone(),
                })?;

            let mut calls = stop_times.remove(trip_id).unwrap_or_default();
            if calls.len() < 2 {
                trace!(feed = %self.feed_id, trip = %trip_id, "skipping trip with fewer than two calls");
                continue;
            }
            calls.sort_by_key(|st| st.stop_sequence);
            check_calls(trip_id, &calls)?;

            let validity = validities.get_or_insert(self.storage, trip)?;

            let mut planned = Vec::with_capacity(calls.len());
            for call in calls {
                // Connected stops are exactly the feed's stops.
                if self.storage.station_node(&self.feed_id, &call.stop_id).is_err() {
                    return Err(FeedError::MissingStop {
                        trip: trip_id.clone(),
                        stop: call.stop_id.clone(),
                    });
                }
                let platform = self.platform_for(&call.stop_id, &route.route_id, transfers);
                planned.push((call, platform));
            }

            plans.push(TripPlan {
                trip,
                route,
                validity,
                calls: planned,
            });
        }
        Ok(plans)
    }

    fn platform_for(&self, stop: &StopId, route: &RouteId, transfers: &Transfers) -> PlatformDescriptor {
        if transfers.has_route_specific_rules(stop) {
            PlatformDescriptor::Route {
                feed: self.feed_id.clone(),
                stop: stop.clone(),
                route: route.clone(),
            }
        } else {
            PlatformDescriptor::RouteType {
                feed: self.feed_id.clone(),
                stop: stop.clone(),
            }
        }
    }

    /// Create a platform's entry/exit nodes and its two timelines.
    fn build_platform(
        &mut self,
        platform: &PlatformDescriptor,
        times: &PlatformTimes,
    ) -> Result<Timelines, FeedError> {
        let street = self
            .storage
            .station_node(platform.feed(), platform.stop())?;
        let station = self.station_pt_node_or_create(street);
        let mut timeline = Timelines::default();

        if !times.departures.is_empty() {
            let entry = self.graph.add_node();
            let enter_edge = self.graph.add_edge(station, entry, EdgePayload::EnterPt)?;
            self.storage.register_entry(enter_edge, platform.clone());

            for &tod in &times.departures {
                let node = self.graph.add_node();
                self.graph.add_edge(
                    entry,
                    node,
                    EdgePayload::EnterTimeExpanded { time_of_day: tod },
                )?;
                timeline.departures.insert(tod, node);
            }
            self.link_timeline(&timeline.departures, |seconds| EdgePayload::Wait { seconds }, |seconds| {
                EdgePayload::Overnight { seconds }
            })?;
        }

        if !times.arrivals.is_empty() {
            let exit = self.graph.add_node();
            let exit_edge = self.graph.add_edge(exit, station, EdgePayload::ExitPt)?;
            self.storage.register_exit(exit_edge, platform.clone());

            for &tod in &times.arrivals {
                let node = self.graph.add_node();
                self.graph.add_edge(
                    node,
                    exit,
                    EdgePayload::LeaveTimeExpanded { time_of_day: tod },
                )?;
                timeline.arrivals.insert(tod, node);
            }
            self.link_timeline(
                &timeline.arrivals,
                |seconds| EdgePayload::WaitArrival { seconds },
                |seconds| EdgePayload::WaitArrival { seconds },
            )?;
            timeline.exit = Some(exit);
        }

        trace!(%platform, departures = times.departures.len(), arrivals = times.arrivals.len(), "platform built");
        Ok(timeline)
    }

    /// Chain consecutive timeline nodes and close the day with a wrap edge.
    fn link_timeline(
        &mut self,
        nodes: &BTreeMap<u32, PtNodeId>,
        wait: impl Fn(u32) -> EdgePayload,
        wrap: impl Fn(u32) -> EdgePayload,
    ) -> Result<(), FeedError> {
        let ordered: Vec<(u32, PtNodeId)> = nodes.iter().map(|(&t, &n)| (t, n)).collect();
        for pair in ordered.windows(2) {
            let ((t0, n0), (t1, n1)) = (pair[0], pair[1]);
            self.graph.add_edge(n0, n1, wait(t1 - t0))?;
        }
        if let (Some(&(first_t, first)), Some(&(last_t, last))) = (ordered.first(), ordered.last()) {
            self.graph
                .add_edge(last, first, wrap(SECONDS_PER_DAY - last_t + first_t))?;
        }
        Ok(())
    }

    /// Create the trip chain and hook it into the platform timelines.
    fn build_trip(
        &mut self,
        plan: &TripPlan<'_>,
        timelines: &BTreeMap<PlatformDescriptor, Timelines>,
    ) -> Result<(), FeedError> {
        let trip_ref = self.storage.add_trip(TripDescriptor {
            feed: self.feed_id.clone(),
            trip: plan.trip.trip_id.clone(),
            route: plan.route.route_id.clone(),
            route_type: plan.route.route_type,
            stops: plan
                .calls
                .iter()
                .map(|(call, _)| (call.stop_sequence, call.stop_id.clone()))
                .collect(),
        });

        let last = plan.calls.len() - 1;
        let mut previous_departure: Option<(PtNodeId, u32)> = None;

        for (i, (call, platform)) in plan.calls.iter().enumerate() {
            let timeline = timelines
                .get(platform)
                .ok_or_else(|| NotFoundError::PlatformEntry(platform.clone()))?;
            let arrival = call.arrival_time.seconds();
            let departure = call.departure_time.seconds();

            let arrival_node = if i > 0 {
                let node = self.graph.add_node();
                if let Some((from, departed)) = previous_departure {
                    self.graph.add_edge(
                        from,
                        node,
                        EdgePayload::Hop {
                            seconds: arrival - departed,
                        },
                    )?;
                }
                let target = timeline
                    .arrivals
                    .get(&call.arrival_time.time_of_day())
                    .copied()
                    .ok_or_else(|| NotFoundError::PlatformEntry(platform.clone()))?;
                self.graph.add_edge(
                    node,
                    target,
                    EdgePayload::Alight {
                        trip: trip_ref,
                        stop_sequence: call.stop_sequence,
                        validity: plan.validity,
                        day_offset: call.arrival_time.day_offset(),
                        route_type: plan.route.route_type,
                    },
                )?;
                Some(node)
            } else {
                None
            };

            if i < last {
                let node = self.graph.add_node();
                let source = timeline
                    .departures
                    .get(&call.departure_time.time_of_day())
                    .copied()
                    .ok_or_else(|| NotFoundError::PlatformEntry(platform.clone()))?;
                self.graph.add_edge(
                    source,
                    node,
                    EdgePayload::Board {
                        trip: trip_ref,
                        stop_sequence: call.stop_sequence,
                        validity: plan.validity,
                        day_offset: call.departure_time.day_offset(),
                        route_type: plan.route.route_type,
                    },
                )?;
                if let Some(arrived) = arrival_node {
                    self.graph.add_edge(
                        arrived,
                        node,
                        EdgePayload::Dwell {
                            seconds: departure - arrival,
                        },
                    )?;
                }
                previous_departure = Some((node, departure));
            }
        }
        Ok(())
    }

    /// Turn declared transfer rules into TRANSFER edges from the exits of
    /// the origin stop's platforms to the entries of the destination stop's.
    fn materialize_transfers(
        &mut self,
        feed: &Feed,
        timelines: &BTreeMap<PlatformDescriptor, Timelines>,
    ) -> Result<usize, FeedError> {
        let mut inserted = 0;
        for rule in &feed.transfers {
            for stop in [&rule.from_stop_id, &rule.to_stop_id] {
                if self.storage.station_node(&self.feed_id, stop).is_err() {
                    return Err(FeedError::TransferStop(stop.clone()));
                }
            }
            if rule.transfer_type == TransferType::NotPossible {
                continue;
            }

            let exits: Vec<PtNodeId> = timelines
                .iter()
                .filter(|(p, _)| matches_side(p, &rule.from_stop_id, rule.from_route_id.as_ref()))
                .filter_map(|(_, t)| t.exit)
                .collect();
            let entries: Vec<PlatformDescriptor> = timelines
                .iter()
                .filter(|(p, t)| {
                    !t.departures.is_empty()
                        && matches_side(p, &rule.to_stop_id, rule.to_route_id.as_ref())
                })
                .map(|(p, _)| p.clone())
                .collect();

            for &exit in &exits {
                for platform in &entries {
                    self.insert_transfer_edges(exit, rule.min_transfer_seconds(), platform)?;
                    inserted += 1;
                }
            }
            trace!(
                feed = %self.feed_id,
                from = %rule.from_stop_id,
                to = %rule.to_stop_id,
                route_specific = rule.is_route_specific(),
                edges = exits.len() * entries.len(),
                "declared transfer"
            );
        }
        Ok(inserted)
    }

    /// Join every arrival platform of a stop to every departure platform of
    /// the same stop with a 0 s TRANSFER edge, unless a declared rule
    /// governs that change.
    fn insert_within_stop_transfers(
        &mut self,
        transfers: &Transfers,
        timelines: &BTreeMap<PlatformDescriptor, Timelines>,
    ) -> Result<usize, NotFoundError> {
        let mut by_stop: BTreeMap<&StopId, Vec<(&PlatformDescriptor, &Timelines)>> = BTreeMap::new();
        for (platform, timeline) in timelines {
            by_stop.entry(platform.stop()).or_default().push((platform, timeline));
        }

        let mut inserted = 0;
        for (stop, platforms) in by_stop {
            for &(from, from_timeline) in &platforms {
                let Some(exit) = from_timeline.exit else {
                    continue;
                };
                for &(to, to_timeline) in &platforms {
                    if to_timeline.departures.is_empty()
                        || transfers.governs_within_stop(stop, from.route(), to.route())
                    {
                        continue;
                    }
                    self.insert_transfer_edges(exit, 0, to)?;
                    inserted += 1;
                }
            }
        }
        Ok(inserted)
    }

    /// Append a TRANSFER edge from `from` to the entry node of `to_platform`.
    ///
    /// Does not check for an existing edge between the two nodes.
    pub fn insert_transfer_edges(
        &mut self,
        from: PtNodeId,
        cost_seconds: u32,
        to_platform: &PlatformDescriptor,
    ) -> Result<EdgeId, NotFoundError> {
        let enter_edge = self.storage.entry_edge(to_platform)?;
        let entry = self.graph.edge(enter_edge)?.to;
        self.graph.add_edge(
            from,
            entry,
            EdgePayload::Transfer {
                seconds: cost_seconds,
            },
        )
    }
}

fn matches_side(platform: &PlatformDescriptor, stop: &StopId, route: Option<&RouteId>) -> bool {
    platform.stop() == stop && route.is_none_or(|r| platform.route() == Some(r))
}

/// Check stop-sequence uniqueness and that time never runs backwards.
fn check_calls(trip: &TripId, calls: &[&StopTime]) -> Result<(), FeedError> {
    let mut previous: Option<&StopTime> = None;
    for call in calls {
        if let Some(prev) = previous {
            if prev.stop_sequence == call.stop_sequence {
                return Err(FeedError::DuplicateStopSequence {
                    trip: trip.clone(),
                    stop_sequence: call.stop_sequence,
                });
            }
            if call.arrival_time < prev.departure_time {
                return Err(FeedError::TimeTravel {
                    trip: trip.clone(),
                    stop_sequence: call.stop_sequence,
                });
            }
        }
        if call.departure_time < call.arrival_time {
            return Err(FeedError::TimeTravel {
                trip: trip.clone(),
                stop_sequence: call.stop_sequence,
            });
        }
        previous = Some(call);
    }
    Ok(())
}

/// Validities of a feed's services, registered on first use.
struct ValidityTable<'f> {
    calendars: HashMap<&'f ServiceId, &'f Calendar>,
    exceptions: HashMap<&'f ServiceId, Vec<&'f CalendarDate>>,
    registered: HashMap<&'f ServiceId, ValidityId>,
}

impl<'f> ValidityTable<'f> {
    fn new(feed: &'f Feed) -> Self {
        let calendars = feed.calendars.iter().map(|c| (&c.service_id, c)).collect();
        let mut exceptions: HashMap<&ServiceId, Vec<&CalendarDate>> = HashMap::new();
        for date in &feed.calendar_dates {
            exceptions.entry(&date.service_id).or_default().push(date);
        }
        Self {
            calendars,
            exceptions,
            registered: HashMap::new(),
        }
    }

    fn get_or_insert(
        &mut self,
        storage: &mut TransitStorage,
        trip: &'f Trip,
    ) -> Result<ValidityId, FeedError> {
        let service = &trip.service_id;
        if let Some(&id) = self.registered.get(service) {
            return Ok(id);
        }
        let calendar = self.calendars.get(service).copied();
        let exceptions = self.exceptions.get(service).map(Vec::as_slice).unwrap_or(&[]);
        let validity = Validity::from_calendar(calendar, exceptions).ok_or_else(|| {
            FeedError::MissingService {
                trip: trip.trip_id.clone(),
                service: service.clone(),
            }
        })?;
        trace!(%service, active_days = validity.active_day_count(), "service registered");
        let id = storage.add_validity(validity);
        self.registered.insert(service, id);
        Ok(id)
    }
}
