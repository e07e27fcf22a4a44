//! Buff Valuation
//!
//! A buff event carries only its start; it stays active until the next
//! event of the same player, or until the reference time for the latest one.
//! Each active window is worth its length times the weighted boost above
//! baseline.

use crate::params::BuffWeights;
use crate::types::BuffEvent;
use std::cmp::Ordering;

/// Buff event with every field present and finite
#[derive(Clone, Copy, Debug)]
struct ValidEvent {
    server_time: f64,
    egg_laying: f64,
    earnings: f64,
}

impl ValidEvent {
    fn from_event(event: &BuffEvent) -> Option<Self> {
        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
        Some(Self {
            server_time: finite(event.server_time)?,
            egg_laying: finite(event.egg_laying_buff)?,
            earnings: finite(event.earnings_buff)?,
        })
    }

    /// Latest first; ties broken on the multipliers so input order never matters
    fn latest_first(a: &Self, b: &Self) -> Ordering {
        b.server_time
            .total_cmp(&a.server_time)
            .then_with(|| b.egg_laying.total_cmp(&a.egg_laying))
            .then_with(|| b.earnings.total_cmp(&a.earnings))
    }
}

/// Percentage above baseline of a multiplier
fn percent_above_baseline(multiplier: f64) -> f64 {
    (multiplier - 1.0) * 100.0
}

/// Buff valuator
#[derive(Clone, Debug, Default)]
pub struct BuffValuator {
    weights: BuffWeights,
}

impl BuffValuator {
    /// Create valuator with weights
    pub fn new(weights: BuffWeights) -> Self {
        Self { weights }
    }

    /// Cumulative buff time value of a history at a reference time
    ///
    /// Malformed events are ignored. The result does not depend on the order
    /// of `history` and is never negative.
    pub fn value(&self, history: &[BuffEvent], reference_timestamp: f64) -> f64 {
        let mut events: Vec<ValidEvent> = history.iter().filter_map(ValidEvent::from_event).collect();
        events.sort_by(ValidEvent::latest_first);

        let mut total = 0.0;
        for (i, event) in events.iter().enumerate() {
            if event.server_time <= reference_timestamp {
                continue;
            }

            let end = events
                .get(i + 1)
                .map_or(reference_timestamp, |next| next.server_time)
                .max(reference_timestamp);
            let duration = event.server_time - end;
            if duration <= 0.0 {
                continue;
            }

            total += self.window_value(duration, event);
        }

        total
    }

    fn window_value(&self, duration: f64, event: &ValidEvent) -> f64 {
        let mut value = 0.0;

        let egg_laying_percent = percent_above_baseline(event.egg_laying);
        if egg_laying_percent > 0.0 {
            value += duration * self.weights.egg_laying * (egg_laying_percent / 100.0);
        }

        let earnings_percent = percent_above_baseline(event.earnings);
        if earnings_percent > 0.0 {
            value += duration * self.weights.earnings * (earnings_percent / 100.0);
        }

        value
    }
}
