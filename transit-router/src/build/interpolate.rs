//! Transfer interpolation.
//!
//! Feeds are built independently, so nothing connects an arrival in one
//! feed to a departure in another, and within a feed only changes at a
//! single stop are joined. This pass adds TRANSFER edges for every
//! platform pair within walking distance: for each station it searches
//! backwards on foot, and every platform exit found that way gets an edge to
//! every platform entry at the station, costing the walk.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, trace};

use super::FeedReader;
use crate::domain::{EdgeType, FeedId, NodeId, NotFoundError, PlatformDescriptor, PtNodeId};
use crate::feed::Transfers;
use crate::graph::{PtGraph, TransitStorage};
use crate::planner::{ExplorerOptions, GraphExplorer, MultiCriteriaLabelSetting, TraversedEdge};
use crate::realtime::StaticSchedule;
use crate::street::{StreetNetwork, Weighting};

/// Outcome of one interpolation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InterpolationReport {
    /// Stations searched from.
    pub stations: usize,
    /// TRANSFER edges added.
    pub inserted: usize,
    /// Pairs left alone because the feed declares a rule for them.
    pub skipped_declared: usize,
    /// Pairs already joined by a TRANSFER edge.
    pub skipped_existing: usize,
}

/// A TRANSFER edge to add.
struct Decision {
    from: PtNodeId,
    seconds: u32,
    to: PlatformDescriptor,
}

/// Insert walking transfers between platforms up to `max_walk` apart.
///
/// Pairs within one feed that the feed's own rules already cover are left
/// to those rules, and pairs that already have a TRANSFER edge are skipped,
/// so running the pass twice adds nothing the second time. Any lookup
/// failure aborts the pass.
pub fn interpolate_transfers(
    street: &dyn StreetNetwork,
    graph: &mut PtGraph,
    storage: &mut TransitStorage,
    transfers: &BTreeMap<FeedId, Transfers>,
    weighting: &dyn Weighting,
    max_walk: Duration,
) -> Result<InterpolationReport, NotFoundError> {
    let mut report = InterpolationReport::default();
    let stations = storage.station_street_nodes();
    let options = ExplorerOptions {
        reverse: true,
        walk_only: true,
        ..ExplorerOptions::default()
    };
    let realtime = StaticSchedule;

    for station in stations {
        let Some(station_pt) = storage.station_pt_node(station) else {
            continue;
        };
        report.stations += 1;

        let explorer = GraphExplorer::new(street, graph, storage, weighting, &realtime, options);
        let search = MultiCriteriaLabelSetting::new(explorer)
            .with_limit_street_time(max_walk)
            .calc_labels(NodeId::Street(station), DateTime::<Utc>::UNIX_EPOCH);

        let mut decisions = Vec::new();
        for label in search {
            let (Some(TraversedEdge::Pt { id, edge_type: EdgeType::ExitPt }), NodeId::Pt(exit)) =
                (label.edge, label.node)
            else {
                continue;
            };
            let from_platform = storage.platform_by_edge(id)?;
            let seconds = u32::try_from(label.walk_time.num_seconds()).unwrap_or(u32::MAX);

            for enter in graph
                .edges_around(station_pt)
                .filter(|e| e.edge_type() == EdgeType::EnterPt)
            {
                let to_platform = storage.platform_by_edge(enter.id)?;
                if from_platform.feed() == to_platform.feed() {
                    let feed = from_platform.feed();
                    let rules = transfers
                        .get(feed)
                        .ok_or_else(|| NotFoundError::Feed(feed.clone()))?;
                    if rules.covers(from_platform.stop(), to_platform.stop(), to_platform.route()) {
                        trace!(from = %from_platform, to = %to_platform, "declared rule covers pair");
                        report.skipped_declared += 1;
                        continue;
                    }
                }
                if graph.has_edge(exit, enter.to, EdgeType::Transfer) {
                    report.skipped_existing += 1;
                    continue;
                }
                decisions.push(Decision {
                    from: exit,
                    seconds,
                    to: to_platform.clone(),
                });
            }
        }

        for decision in decisions {
            debug!(
                %station,
                to = %decision.to,
                seconds = decision.seconds,
                "interpolated transfer"
            );
            FeedReader::new(decision.to.feed().clone(), graph, storage).insert_transfer_edges(
                decision.from,
                decision.seconds,
                &decision.to,
            )?;
            report.inserted += 1;
        }
    }

    info!(
        stations = report.stations,
        inserted = report.inserted,
        skipped_declared = report.skipped_declared,
        skipped_existing = report.skipped_existing,
        "transfer interpolation complete"
    );
    Ok(report)
}
