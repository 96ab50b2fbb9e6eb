//! Declared transfer rules of one feed.

use std::collections::{HashMap, HashSet};

use super::{Feed, Transfer};
use crate::domain::{RouteId, StopId};

/// Index of a feed's transfer rules by destination and origin stop.
///
/// Built once per feed and read-only afterwards. Lookups never cross feed
/// boundaries because each feed owns its own index.
#[derive(Debug, Clone, Default)]
pub struct Transfers {
    to_stop: HashMap<StopId, Vec<Transfer>>,
    from_stop: HashMap<StopId, Vec<Transfer>>,
    route_scoped_stops: HashSet<StopId>,
}

impl Transfers {
    /// Index the transfer rules of `feed`.
    pub fn new(feed: &Feed) -> Self {
        Self::from_rules(feed.transfers.iter().cloned())
    }

    /// Index an arbitrary set of rules.
    pub fn from_rules(rules: impl IntoIterator<Item = Transfer>) -> Self {
        let mut index = Self::default();
        for rule in rules {
            if rule.from_route_id.is_some() {
                index.route_scoped_stops.insert(rule.from_stop_id.clone());
            }
            if rule.to_route_id.is_some() {
                index.route_scoped_stops.insert(rule.to_stop_id.clone());
            }
            index
                .from_stop
                .entry(rule.from_stop_id.clone())
                .or_default()
                .push(rule.clone());
            index
                .to_stop
                .entry(rule.to_stop_id.clone())
                .or_default()
                .push(rule);
        }
        index
    }

    /// Rules ending at `stop` that apply when boarding `route`.
    ///
    /// Rules scoped to exactly `route` come first, then rules without a
    /// destination route. Rules scoped to a different route are excluded.
    /// With `route = None` only route-agnostic rules match.
    pub fn transfers_to_stop(&self, stop: &StopId, route: Option<&RouteId>) -> Vec<&Transfer> {
        let Some(rules) = self.to_stop.get(stop) else {
            return Vec::new();
        };

        let specific = rules
            .iter()
            .filter(|t| route.is_some() && t.to_route_id.as_ref() == route);
        let agnostic = rules.iter().filter(|t| t.to_route_id.is_none());
        specific.chain(agnostic).collect()
    }

    /// Rules starting at `stop`.
    pub fn transfers_from_stop(&self, stop: &StopId) -> &[Transfer] {
        self.from_stop.get(stop).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if some rule already covers `from_stop -> to_stop`
    /// for a departure on `to_route`.
    pub fn covers(&self, from_stop: &StopId, to_stop: &StopId, to_route: Option<&RouteId>) -> bool {
        self.transfers_to_stop(to_stop, to_route)
            .iter()
            .any(|t| &t.from_stop_id == from_stop)
    }

    /// Returns true if some rule, possible or not, governs changing at
    /// `stop` from a vehicle on `from_route` to one on `to_route`.
    ///
    /// Route-agnostic rules govern every pair. A `None` route only
    /// matches route-agnostic sides.
    pub fn governs_within_stop(
        &self,
        stop: &StopId,
        from_route: Option<&RouteId>,
        to_route: Option<&RouteId>,
    ) -> bool {
        self.transfers_from_stop(stop).iter().any(|t| {
            &t.to_stop_id == stop
                && (!t.is_route_specific()
                    || (t.from_route_id.as_ref().is_none_or(|r| Some(r) == from_route)
                        && t.to_route_id.as_ref().is_none_or(|r| Some(r) == to_route)))
        })
    }

    /// Returns true if any rule names a route at `stop`.
    ///
    /// Such stops get one platform per route.
    pub fn has_route_specific_rules(&self, stop: &StopId) -> bool {
        self.route_scoped_stops.contains(stop)
    }

    /// Returns the total number of rules.
    pub fn len(&self) -> usize {
        self.to_stop.values().map(Vec::len).sum()
    }

    /// Returns true if the feed declares no transfers.
    pub fn is_empty(&self) -> bool {
        self.to_stop.is_empty()
    }
}
