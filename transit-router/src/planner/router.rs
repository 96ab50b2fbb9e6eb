//! Query entry point.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{
    ExplorerOptions, Journey, Label, MultiCriteriaLabelSetting, SearchConfig, rank_journeys,
    remove_dominated,
};
use crate::build::{ConfigError, TransitNetwork};
use crate::domain::{NodeId, NotFoundError, StreetNodeId};
use crate::realtime::RealtimeOverlay;
use crate::street::Weighting;

/// A journey query between two street nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest {
    pub from: StreetNodeId,
    pub to: StreetNodeId,
    /// Departure time, or latest arrival time when `arrive_by` is set.
    pub time: DateTime<Utc>,
    pub arrive_by: bool,
}

impl RouteRequest {
    /// Leave `from` no earlier than `time`.
    pub fn depart_at(from: StreetNodeId, to: StreetNodeId, time: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            time,
            arrive_by: false,
        }
    }

    /// Reach `to` no later than `time`.
    pub fn arrive_by(from: StreetNodeId, to: StreetNodeId, time: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            time,
            arrive_by: true,
        }
    }
}

/// Answers journey queries over a finished network.
///
/// Holds only shared references, so any number of routers can query the
/// same network concurrently.
pub struct Router<'a> {
    network: &'a TransitNetwork,
    weighting: &'a dyn Weighting,
    realtime: &'a dyn RealtimeOverlay,
    config: SearchConfig,
}

impl<'a> Router<'a> {
    /// Create a router, rejecting an unusable `config`.
    ///
    /// `weighting` prices every street edge; pass
    /// [`SearchConfig::foot_weighting`] to walk at the configured speed.
    pub fn new(
        network: &'a TransitNetwork,
        weighting: &'a dyn Weighting,
        realtime: &'a dyn RealtimeOverlay,
        config: SearchConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            network,
            weighting,
            realtime,
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find the Pareto-optimal journeys for `request`, best first.
    ///
    /// An empty result means no journey exists within the configured limits.
    pub fn route(&self, request: &RouteRequest) -> Result<Vec<Journey>, NotFoundError> {
        let street_nodes = self.network.street().node_count();
        for node in [request.from, request.to] {
            if node.index() >= street_nodes {
                return Err(NotFoundError::StreetNode(node));
            }
        }

        let arrive_by = request.arrive_by;
        let (origin, target) = if arrive_by {
            (request.to, request.from)
        } else {
            (request.from, request.to)
        };
        let options = ExplorerOptions {
            reverse: arrive_by,
            ignore_validities: self.config.ignore_validities,
            blocked_route_types: self.config.blocked_route_types,
            ..ExplorerOptions::default()
        };

        let explorer = self.network.explorer(self.weighting, self.realtime, options);
        let mut search = MultiCriteriaLabelSetting::new(explorer)
            .with_limit_street_time(self.config.max_walk())
            .with_limit_trip_time(self.config.max_trip())
            .with_max_transfers(self.config.max_transfers)
            .calc_labels(NodeId::Street(origin), request.time);

        let target = NodeId::Street(target);
        let arrivals: Vec<Label> = search
            .by_ref()
            .take(self.config.max_visited_labels)
            .filter(|label| label.node == target)
            .collect();

        let journeys = arrivals
            .iter()
            .map(|label| {
                Journey::from_path(
                    &search.path(label),
                    arrive_by,
                    self.network.graph(),
                    self.network.storage(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let found = journeys.len();

        let mut journeys = rank_journeys(remove_dominated(journeys, arrive_by), arrive_by);
        journeys.truncate(self.config.max_results);

        debug!(
            settled = search.settled_count(),
            created = search.created_count(),
            found,
            "label search complete"
        );
        info!(
            from = %request.from,
            to = %request.to,
            arrive_by,
            journeys = journeys.len(),
            "route computed"
        );
        Ok(journeys)
    }
}
