//! Aegis Historian Numeric Rollup
//!
//! Time-weighted statistics for continuous signals.
//!
//! Every value is weighted by how long it stayed in force: from its own
//! timestamp to the next sample, and for the last value to the end of the
//! period. The optional start value is the value in force at the period
//! start; it seeds the extremes and the weighting but is not counted as a
//! sample.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::generator::{Lifecycle, RollupGenerator, Timed};
use crate::rollup::RollupSummary;
use crate::summary::{replaces_max, replaces_min, RunningSummary};
use historian_common::{Period, Result, Sample};
use serde::{Deserialize, Serialize};

const NAME: &str = "numeric rollup";

/// Milliseconds per second, for expressing the integral in value-seconds.
const MILLIS_PER_SECOND: f64 = 1000.0;

// =============================================================================
// Numeric Rollup
// =============================================================================

/// Time-weighted average, integral, extremes, and delta of a numeric signal.
#[derive(Debug, Clone)]
pub struct NumericRollup {
    period: Period,
    lifecycle: Lifecycle,
    start_value: Option<f64>,
    minimum: Option<Timed<f64>>,
    maximum: Option<Timed<f64>>,
    first: Option<Timed<f64>>,
    last: Option<Timed<f64>>,
    latest: Option<Timed<f64>>,
    weighted_sum: f64,
    weighted_duration: i64,
    summary: RunningSummary,
    average: Option<f64>,
    integral: f64,
}

impl NumericRollup {
    /// Create a rollup for `period`, seeded with the value in force at its
    /// start when known.
    pub fn new(period: Period, start_value: Option<f64>) -> Self {
        let mut rollup = Self {
            period,
            lifecycle: Lifecycle::Accumulating,
            start_value,
            minimum: None,
            maximum: None,
            first: None,
            last: None,
            latest: None,
            weighted_sum: 0.0,
            weighted_duration: 0,
            summary: RunningSummary::new(),
            average: None,
            integral: 0.0,
        };

        if let Some(value) = start_value {
            rollup.update_extremes(value, period.start);
            rollup.latest = Some(Timed::new(value, period.start));
        }

        rollup
    }

    fn update_extremes(&mut self, value: f64, time: i64) {
        if replaces_min(self.minimum.map(|m| m.value), value) {
            self.minimum = Some(Timed::new(value, time));
        }
        if replaces_max(self.maximum.map(|m| m.value), value) {
            self.maximum = Some(Timed::new(value, time));
        }
    }

    /// Credit the value in force with the time elapsed until `time`.
    fn accrue(&mut self, time: i64) {
        if let Some(latest) = self.latest {
            let duration = time.saturating_sub(latest.time);
            if duration > 0 {
                self.weighted_sum += latest.value * duration as f64;
                self.weighted_duration = self.weighted_duration.saturating_add(duration);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn start_value(&self) -> Option<f64> {
        self.start_value
    }

    /// Smallest value seen, including the start value.
    pub fn minimum(&self) -> Option<Timed<f64>> {
        self.minimum
    }

    /// Largest value seen, including the start value.
    pub fn maximum(&self) -> Option<Timed<f64>> {
        self.maximum
    }

    /// First accepted sample; never the start value.
    pub fn first(&self) -> Option<Timed<f64>> {
        self.first
    }

    pub fn last(&self) -> Option<Timed<f64>> {
        self.last
    }

    /// Time-weighted average. Falls back to the last observed value when no
    /// time elapsed between observations. `None` before finalize or when
    /// nothing was observed.
    pub fn average(&self) -> Option<f64> {
        self.average
    }

    /// Weighted sum in value-seconds. Zero when the average fell back to a
    /// single value.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Milliseconds covered by the weighting.
    pub fn weighted_duration(&self) -> i64 {
        self.weighted_duration
    }

    /// Change over the period: last minus start value when a start value was
    /// supplied, else last minus first.
    pub fn delta(&self) -> Option<f64> {
        match (self.start_value, self.last, self.first) {
            (Some(start), Some(last), _) => Some(last.value - start),
            (Some(_), None, _) => Some(0.0),
            (None, Some(last), Some(first)) => Some(last.value - first.value),
            _ => None,
        }
    }

    /// Number of accepted samples.
    pub fn count(&self) -> u64 {
        self.summary.count()
    }

    /// Unweighted sum of accepted samples.
    pub fn sum(&self) -> f64 {
        self.summary.sum()
    }

    pub fn arithmetic_mean(&self) -> Option<f64> {
        self.summary.mean()
    }

    /// Smallest accepted sample, ignoring the start value.
    pub fn min_in_period(&self) -> Option<f64> {
        self.summary.min()
    }

    /// Largest accepted sample, ignoring the start value.
    pub fn max_in_period(&self) -> Option<f64> {
        self.summary.max()
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.summary.std_dev()
    }

    pub fn to_summary(&self) -> NumericSummary {
        NumericSummary {
            period: self.period,
            start_value: self.start_value,
            count: self.count(),
            first: self.first,
            last: self.last,
            minimum: self.minimum,
            maximum: self.maximum,
            average: self.average,
            integral: self.integral,
            delta: self.delta(),
            weighted_duration: self.weighted_duration,
            sum: self.sum(),
            arithmetic_mean: self.arithmetic_mean(),
            min_in_period: self.min_in_period(),
            max_in_period: self.max_in_period(),
            std_dev: self.std_dev(),
        }
    }
}

impl RollupGenerator for NumericRollup {
    fn name(&self) -> &'static str {
        NAME
    }

    fn period(&self) -> Period {
        self.period
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn accept(&mut self, sample: &Sample) -> Result<()> {
        self.lifecycle.ensure_accumulating(NAME);
        let Some(value) = &sample.value else {
            return Ok(());
        };
        let value = value.as_double()?;
        let time = sample.time;

        self.update_extremes(value, time);
        if self.first.is_none() {
            self.first = Some(Timed::new(value, time));
        }
        self.last = Some(Timed::new(value, time));
        self.summary.add(value);

        self.accrue(time);
        self.latest = Some(Timed::new(value, time));
        Ok(())
    }

    fn finalize(&mut self) {
        self.lifecycle.finish(NAME);

        // A lone observation is reported as-is rather than stretched to the
        // period end.
        if self.weighted_duration > 0 {
            self.accrue(self.period.end);
            self.average = Some(self.weighted_sum / self.weighted_duration as f64);
            self.integral = self.weighted_sum / MILLIS_PER_SECOND;
        } else {
            self.average = self.latest.map(|latest| latest.value);
            self.integral = 0.0;
        }

        tracing::debug!(
            period = %self.period,
            count = self.count(),
            weighted_duration = self.weighted_duration,
            "finalized numeric rollup"
        );
    }

    fn summary(&self) -> RollupSummary {
        RollupSummary::Numeric(self.to_summary())
    }
}

// =============================================================================
// Numeric Summary
// =============================================================================

/// Serializable result of a numeric rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub period: Period,
    pub start_value: Option<f64>,
    pub count: u64,
    pub first: Option<Timed<f64>>,
    pub last: Option<Timed<f64>>,
    pub minimum: Option<Timed<f64>>,
    pub maximum: Option<Timed<f64>>,
    pub average: Option<f64>,
    pub integral: f64,
    pub delta: Option<f64>,
    pub weighted_duration: i64,
    pub sum: f64,
    pub arithmetic_mean: Option<f64>,
    pub min_in_period: Option<f64>,
    pub max_in_period: Option<f64>,
    pub std_dev: Option<f64>,
}

// =============================================================================
// Tests
// =============================================================================
