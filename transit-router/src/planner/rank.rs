//! Journey ranking for search results.
//!
//! Ranks journeys by a combination of factors to present the most useful
//! options first.

use std::cmp::Ordering;

use chrono::Duration;

use super::Journey;

/// The comparable criteria of a journey, smaller is better in each.
///
/// For arrive-by queries a later departure is better, so the departure
/// timestamp is negated.
fn criteria(journey: &Journey, arrive_by: bool) -> (i64, u32, Duration) {
    let time = if arrive_by {
        -journey.departure_time().timestamp_millis()
    } else {
        journey.arrival_time().timestamp_millis()
    };
    (time, journey.change_count(), journey.walk_time())
}

fn dominates(a: &Journey, b: &Journey, arrive_by: bool) -> bool {
    let (a_time, a_changes, a_walk) = criteria(a, arrive_by);
    let (b_time, b_changes, b_walk) = criteria(b, arrive_by);
    a_time <= b_time
        && a_changes <= b_changes
        && a_walk <= b_walk
        // Must be strictly better in at least one dimension
        && (a_time < b_time || a_changes < b_changes || a_walk < b_walk)
}

/// Rank journeys by preference.
///
/// Journeys are ranked by:
/// 1. Arrival time (earlier is better), or departure time (later is better)
///    for arrive-by queries
/// 2. Number of changes (fewer is better)
/// 3. Walking time (shorter is better)
/// 4. Total duration (shorter is better)
///
/// Returns journeys sorted best-first.
pub fn rank_journeys(mut journeys: Vec<Journey>, arrive_by: bool) -> Vec<Journey> {
    journeys.sort_by(|a, b| {
        let primary = criteria(a, arrive_by).cmp(&criteria(b, arrive_by));
        if primary != Ordering::Equal {
            return primary;
        }
        a.total_duration().cmp(&b.total_duration())
    });
    journeys
}

/// Remove dominated journeys.
///
/// A journey is dominated if another journey is at least as good in time,
/// changes and walking, and strictly better in one of them. Of several
/// journeys with identical criteria, the first is kept.
pub fn remove_dominated(journeys: Vec<Journey>, arrive_by: bool) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    let mut result: Vec<Journey> = Vec::with_capacity(journeys.len());

    for journey in journeys {
        let dominated = result.iter().any(|existing| {
            dominates(existing, &journey, arrive_by)
                || criteria(existing, arrive_by) == criteria(&journey, arrive_by)
        });

        if !dominated {
            // Also remove any existing journeys dominated by this one
            result.retain(|existing| !dominates(&journey, existing, arrive_by));
            result.push(journey);
        }
    }

    result
}
