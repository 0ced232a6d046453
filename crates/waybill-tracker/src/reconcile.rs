//! Timeline reconciliation: best-effort chronological ordering of carrier
//! events.
//!
//! Events are stably sorted by parsed timestamp. When the sort cannot be
//! trusted (not monotonic, or every timestamp is zero) the carrier order is
//! reversed instead, since carriers usually list newest first. The two
//! policies can disagree when only some dates parse; a partially parseable
//! timeline still takes the sorted order.

use serde::Serialize;
use waybill_core::RawEvent;

use crate::dates::event_timestamp;

/// Which ordering policy produced a reconciled timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Stable sort by parsed timestamp.
    Chronological,
    /// Reverse of the carrier-supplied order.
    Reversed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciled {
    pub events: Vec<RawEvent>,
    pub order: OrderPolicy,
}

/// Orders `events` oldest first. Event contents are never modified.
#[must_use]
pub fn reconcile(events: &[RawEvent]) -> Vec<RawEvent> {
    reconcile_with_policy(events).events
}

/// Like [`reconcile`] but also reports which policy was applied.
#[must_use]
pub fn reconcile_with_policy(events: &[RawEvent]) -> Reconciled {
    let mut keyed: Vec<(i64, &RawEvent)> = events
        .iter()
        .map(|event| (event_timestamp(&event.date), event))
        .collect();
    keyed.sort_by_key(|(ts, _)| *ts);

    let monotonic = keyed.windows(2).all(|pair| pair[0].0 <= pair[1].0);
    let all_zero = keyed.iter().all(|(ts, _)| *ts == 0);

    if !monotonic || all_zero {
        if !events.is_empty() {
            tracing::info!(
                events = events.len(),
                monotonic,
                all_zero,
                "timeline dates inconclusive, reversing carrier order"
            );
        }
        return Reconciled {
            events: events.iter().rev().cloned().collect(),
            order: OrderPolicy::Reversed,
        };
    }

    Reconciled {
        events: keyed.into_iter().map(|(_, event)| event.clone()).collect(),
        order: OrderPolicy::Chronological,
    }
}
