//! Network lifecycle: a mutable builder and the frozen network it yields.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use super::{BuildConfig, BuildError, ConfigError, FeedReader, InterpolationReport, read_json};
use crate::domain::{FeedId, NotFoundError};
use crate::feed::{Feed, Transfers};
use crate::graph::{PtGraph, TransitStorage};
use crate::planner::{ExplorerOptions, GraphExplorer};
use crate::realtime::RealtimeOverlay;
use crate::street::{FootWeighting, LocationIndex, StreetNetwork, Weighting};

/// Owns the transit graph while feeds are loaded and transfers interpolated.
///
/// Every step consumes or mutably borrows the builder, and a failed step
/// returns an error instead of the builder, so a half-built graph can never
/// be queried.
pub struct TransitNetworkBuilder {
    config: BuildConfig,
    street: Arc<dyn StreetNetwork>,
    locations: Arc<dyn LocationIndex>,
    graph: PtGraph,
    storage: TransitStorage,
    transfers: BTreeMap<FeedId, Transfers>,
}

impl TransitNetworkBuilder {
    /// Start building on top of `street`.
    pub fn new<S>(config: BuildConfig, street: Arc<S>) -> Result<Self, BuildError>
    where
        S: StreetNetwork + LocationIndex + 'static,
    {
        config.validate()?;
        let locations: Arc<dyn LocationIndex> = street.clone();
        Ok(Self {
            config,
            street,
            locations,
            graph: PtGraph::default(),
            storage: TransitStorage::new(),
            transfers: BTreeMap::new(),
        })
    }

    /// Add the next feed. It is named `gtfs_<n>` where `n` counts the feeds
    /// added before it.
    pub fn with_feed(mut self, feed: Feed) -> Result<Self, BuildError> {
        let feed_id = FeedId::indexed(self.transfers.len());
        let transfers = Transfers::new(&feed);

        let mut reader = FeedReader::new(feed_id.clone(), &mut self.graph, &mut self.storage);
        let result = reader
            .connect_stops_to_street_network(&feed, self.locations.as_ref())
            .and_then(|_| reader.build_pt_network(&feed, &transfers));
        if let Err(source) = result {
            return Err(BuildError::InvalidFeed {
                feed: feed_id,
                source,
            });
        }

        info!(
            feed = %feed_id,
            stops = feed.stops.len(),
            trips = feed.trips.len(),
            transfer_rules = transfers.len(),
            "feed loaded"
        );
        self.transfers.insert(feed_id, transfers);
        Ok(self)
    }

    /// Load every feed named in the configuration, in order.
    pub fn load_configured_feeds(mut self) -> Result<Self, BuildError> {
        if self.config.gtfs_feed_paths.is_empty() {
            return Err(ConfigError::NoFeeds.into());
        }
        let paths = self.config.gtfs_feed_paths.clone();
        for path in &paths {
            let feed: Feed = read_json(path)?;
            self = self.with_feed(feed)?;
        }
        Ok(self)
    }

    /// Connect stations by walking, see [`interpolate_transfers`](super::interpolate_transfers).
    pub fn interpolate_transfers(
        &mut self,
        weighting: &dyn Weighting,
    ) -> Result<InterpolationReport, BuildError> {
        let report = super::interpolate_transfers(
            self.street.as_ref(),
            &mut self.graph,
            &mut self.storage,
            &self.transfers,
            weighting,
            self.config.max_transfer_interpolation_walk(),
        )?;
        Ok(report)
    }

    /// Returns the configuration the builder was created with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Returns the graph built so far.
    pub fn graph(&self) -> &PtGraph {
        &self.graph
    }

    /// Freeze the network for querying.
    pub fn finish(self) -> TransitNetwork {
        info!(
            feeds = self.transfers.len(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            platforms = self.storage.platform_count(),
            "transit network ready"
        );
        TransitNetwork {
            street: self.street,
            graph: self.graph,
            storage: self.storage,
            transfers: self.transfers,
        }
    }
}

/// Build a network from the configured feeds, interpolating transfers if
/// the configuration asks for it.
pub fn build<S>(config: BuildConfig, street: Arc<S>) -> Result<TransitNetwork, BuildError>
where
    S: StreetNetwork + LocationIndex + 'static,
{
    let interpolate = config.interpolate_transfers;
    let weighting = FootWeighting::new(config.walk_speed_kmh);
    let mut builder = TransitNetworkBuilder::new(config, street)?.load_configured_feeds()?;
    if interpolate {
        builder.interpolate_transfers(&weighting)?;
    }
    Ok(builder.finish())
}

/// A finished, read-only transit network.
///
/// Shared freely between query threads.
pub struct TransitNetwork {
    street: Arc<dyn StreetNetwork>,
    graph: PtGraph,
    storage: TransitStorage,
    transfers: BTreeMap<FeedId, Transfers>,
}

impl TransitNetwork {
    pub fn street(&self) -> &dyn StreetNetwork {
        self.street.as_ref()
    }

    pub fn graph(&self) -> &PtGraph {
        &self.graph
    }

    pub fn storage(&self) -> &TransitStorage {
        &self.storage
    }

    /// Returns the declared transfers of `feed`.
    pub fn transfers(&self, feed: &FeedId) -> Result<&Transfers, NotFoundError> {
        self.transfers
            .get(feed)
            .ok_or_else(|| NotFoundError::Feed(feed.clone()))
    }

    /// Returns the ids of all loaded feeds.
    pub fn feeds(&self) -> impl Iterator<Item = &FeedId> {
        self.transfers.keys()
    }

    /// Create an explorer over this network.
    pub fn explorer<'a>(
        &'a self,
        weighting: &'a dyn Weighting,
        realtime: &'a dyn RealtimeOverlay,
        options: ExplorerOptions,
    ) -> GraphExplorer<'a> {
        GraphExplorer::new(
            self.street.as_ref(),
            &self.graph,
            &self.storage,
            weighting,
            realtime,
            options,
        )
    }
}
