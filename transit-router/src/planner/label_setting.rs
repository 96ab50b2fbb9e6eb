//! Multi-criteria label-setting search.
//!
//! Labels are compared by elapsed time, vehicles boarded and walking time.
//! Every node keeps a front of labels none of which dominates another; a new
//! label is only queued if nothing in its node's front is at least as good,
//! and it evicts the front labels it is at least as good as. The queue pops
//! labels by elapsed time, so labels settle in non-decreasing elapsed time.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use super::{GraphExplorer, Label, LabelId};
use crate::domain::NodeId;

type QueueKey = Reverse<(Duration, u32, Duration, LabelId)>;

/// Label arena plus per-node fronts and the open queue.
#[derive(Debug, Default)]
struct Frontier {
    labels: Vec<Label>,
    removed: Vec<bool>,
    fronts: HashMap<NodeId, Vec<LabelId>>,
    queue: BinaryHeap<QueueKey>,
}

impl Frontier {
    fn next_id(&self) -> LabelId {
        LabelId(self.labels.len() as u32)
    }

    /// Add `label` unless a label in its node's front is at least as good.
    ///
    /// `label.id` must be [`next_id`](Self::next_id).
    fn offer(&mut self, label: Label) -> bool {
        let front = self.fronts.entry(label.node).or_default();
        if front
            .iter()
            .any(|id| self.labels[id.index()].weakly_dominates(&label))
        {
            return false;
        }

        let labels = &self.labels;
        let removed = &mut self.removed;
        front.retain(|id| {
            let dominated = label.weakly_dominates(&labels[id.index()]);
            if dominated {
                removed[id.index()] = true;
            }
            !dominated
        });
        front.push(label.id);

        self.labels.push(label);
        self.removed.push(false);
        self.queue.push(Reverse((
            label.elapsed,
            label.num_transfers,
            label.walk_time,
            label.id,
        )));
        true
    }

    /// Pop the best open label that is still in its front.
    fn pop(&mut self) -> Option<Label> {
        while let Some(Reverse((.., id))) = self.queue.pop() {
            if !self.removed[id.index()] {
                return Some(self.labels[id.index()]);
            }
        }
        None
    }
}

/// Pareto search over a [`GraphExplorer`].
///
/// Call [`calc_labels`](Self::calc_labels), then iterate to receive settled
/// labels in non-decreasing elapsed time. Stopping early is fine; the search
/// does no work beyond what has been pulled.
pub struct MultiCriteriaLabelSetting<'a> {
    explorer: GraphExplorer<'a>,
    limit_street_time: Option<Duration>,
    limit_trip_time: Option<Duration>,
    max_transfers: Option<u32>,
    frontier: Frontier,
    settled: usize,
}

impl<'a> MultiCriteriaLabelSetting<'a> {
    pub fn new(explorer: GraphExplorer<'a>) -> Self {
        Self {
            explorer,
            limit_street_time: None,
            limit_trip_time: None,
            max_transfers: None,
            frontier: Frontier::default(),
            settled: 0,
        }
    }

    /// Prune labels that walked longer than `limit`.
    pub fn with_limit_street_time(mut self, limit: Duration) -> Self {
        self.limit_street_time = Some(limit);
        self
    }

    /// Prune labels whose elapsed time exceeds `limit`.
    pub fn with_limit_trip_time(mut self, limit: Duration) -> Self {
        self.limit_trip_time = Some(limit);
        self
    }

    /// Prune labels that changed vehicles more than `max` times.
    pub fn with_max_transfers(mut self, max: u32) -> Self {
        self.max_transfers = Some(max);
        self
    }

    /// Start a search from `origin` at `start`, discarding any earlier one.
    pub fn calc_labels(mut self, origin: NodeId, start: DateTime<Utc>) -> Self {
        self.frontier = Frontier::default();
        self.settled = 0;
        let label = Label {
            id: self.frontier.next_id(),
            node: origin,
            time: start,
            elapsed: Duration::zero(),
            num_transfers: 0,
            walk_time: Duration::zero(),
            edge: None,
            parent: None,
        };
        self.frontier.offer(label);
        debug!(%origin, %start, reverse = self.explorer.options().reverse, "label search started");
        self
    }

    /// Look up a label created by this search.
    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.frontier.labels.get(id.index())
    }

    /// Returns the labels from the search origin to `label`, inclusive.
    pub fn path(&self, label: &Label) -> Vec<Label> {
        let mut path = vec![*label];
        let mut current = label.parent;
        while let Some(id) = current {
            let Some(parent) = self.label(id) else {
                break;
            };
            path.push(*parent);
            current = parent.parent;
        }
        path.reverse();
        path
    }

    /// Returns the number of labels settled so far.
    pub fn settled_count(&self) -> usize {
        self.settled
    }

    /// Returns the number of labels created so far.
    pub fn created_count(&self) -> usize {
        self.frontier.labels.len()
    }

    fn expand(&mut self, label: Label) {
        let reverse = self.explorer.options().reverse;
        let street_limit = self.limit_street_time;
        let trip_limit = self.limit_trip_time;
        let boardings_limit = self.max_transfers.map(|m| m.saturating_add(1));
        let Self {
            explorer, frontier, ..
        } = self;

        for explored in explorer.edges_from(&label) {
            let walk_time = label.walk_time + explored.walk;
            if street_limit.is_some_and(|limit| walk_time > limit) {
                continue;
            }
            let elapsed = label.elapsed + explored.cost;
            if trip_limit.is_some_and(|limit| elapsed > limit) {
                continue;
            }
            let num_transfers = label.num_transfers + explored.boardings;
            if boardings_limit.is_some_and(|limit| num_transfers > limit) {
                continue;
            }
            let time = if reverse {
                label.time - explored.cost
            } else {
                label.time + explored.cost
            };

            frontier.offer(Label {
                id: frontier.next_id(),
                node: explored.target,
                time,
                elapsed,
                num_transfers,
                walk_time,
                edge: Some(explored.edge),
                parent: Some(label.id),
            });
        }
    }
}

impl Iterator for MultiCriteriaLabelSetting<'_> {
    type Item = Label;

    fn next(&mut self) -> Option<Label> {
        let label = self.frontier.pop()?;
        self.settled += 1;
        trace!(
            node = %label.node,
            elapsed = label.elapsed.num_seconds(),
            transfers = label.num_transfers,
            walk = label.walk_time.num_seconds(),
            "label settled"
        );
        self.expand(label);
        Some(label)
    }
}
