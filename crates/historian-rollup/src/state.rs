//! Aegis Historian State Duration Rollup
//!
//! Per-value runtime accounting for discrete signals. Each distinct value
//! gets a bucket holding how often it occurred and how long it was in force.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::generator::{Lifecycle, RollupGenerator, Timed};
use crate::rollup::RollupSummary;
use historian_common::{Period, Result, Sample, SignalValue, StartsMode};
use serde::{Deserialize, Serialize};

const NAME: &str = "state duration rollup";

// =============================================================================
// State Bucket
// =============================================================================

/// Occurrences and runtime of one distinct value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateBucket {
    pub value: SignalValue,
    pub occurrences: u64,
    /// Milliseconds the value was in force.
    pub duration: i64,
    /// Share of the total runtime, computed at finalize.
    pub proportion: f64,
}

impl StateBucket {
    fn new(value: SignalValue) -> Self {
        Self {
            value,
            occurrences: 0,
            duration: 0,
            proportion: 0.0,
        }
    }
}

// =============================================================================
// State Duration Rollup
// =============================================================================

/// Tracks how long a discrete signal spent at each of its values.
///
/// The start value, when supplied, is in force from the period start and
/// accrues runtime but never counts as an occurrence. After finalize the
/// buckets are sorted ascending by value.
#[derive(Debug, Clone)]
pub struct StateDurationRollup {
    period: Period,
    lifecycle: Lifecycle,
    starts_mode: StartsMode,
    start_value: Option<SignalValue>,
    buckets: Vec<StateBucket>,
    current: Option<usize>,
    latest_time: i64,
    first: Option<Timed<SignalValue>>,
    last: Option<Timed<SignalValue>>,
    count: u64,
    total_duration: i64,
}

impl StateDurationRollup {
    pub fn new(period: Period, start_value: Option<SignalValue>) -> Self {
        Self::with_mode(period, start_value, StartsMode::default())
    }

    pub fn with_mode(
        period: Period,
        start_value: Option<SignalValue>,
        starts_mode: StartsMode,
    ) -> Self {
        let mut rollup = Self {
            period,
            lifecycle: Lifecycle::Accumulating,
            starts_mode,
            start_value: None,
            buckets: Vec::new(),
            current: None,
            latest_time: period.start,
            first: None,
            last: None,
            count: 0,
            total_duration: 0,
        };

        if let Some(value) = start_value {
            rollup.buckets.push(StateBucket::new(value.clone()));
            rollup.current = Some(0);
            rollup.start_value = Some(value);
        }

        rollup
    }

    fn accrue(&mut self, time: i64) {
        if let Some(index) = self.current {
            let duration = time.saturating_sub(self.latest_time);
            if duration > 0 {
                let bucket = &mut self.buckets[index];
                bucket.duration = bucket.duration.saturating_add(duration);
            }
        }
    }

    fn bucket_index(&mut self, value: &SignalValue) -> usize {
        match self.buckets.iter().position(|b| b.value.matches(value)) {
            Some(index) => index,
            None => {
                self.buckets.push(StateBucket::new(value.clone()));
                self.buckets.len() - 1
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn starts_mode(&self) -> StartsMode {
        self.starts_mode
    }

    pub fn start_value(&self) -> Option<&SignalValue> {
        self.start_value.as_ref()
    }

    pub fn first(&self) -> Option<&Timed<SignalValue>> {
        self.first.as_ref()
    }

    pub fn last(&self) -> Option<&Timed<SignalValue>> {
        self.last.as_ref()
    }

    /// Number of accepted samples.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all bucket durations, available after finalize.
    pub fn total_duration(&self) -> i64 {
        self.total_duration
    }

    pub fn buckets(&self) -> &[StateBucket] {
        &self.buckets
    }

    /// Bucket for `value`, if it was observed.
    ///
    /// # Panics
    ///
    /// Panics if `value` is of a different variant than the tracked values.
    pub fn bucket(&self, value: &SignalValue) -> Option<&StateBucket> {
        self.buckets.iter().find(|b| b.value.matches(value))
    }

    pub fn to_summary(&self) -> StateSummary {
        StateSummary {
            period: self.period,
            starts_mode: self.starts_mode,
            start_value: self.start_value.clone(),
            count: self.count,
            first: self.first.clone(),
            last: self.last.clone(),
            total_duration: self.total_duration,
            buckets: self.buckets.clone(),
        }
    }
}

impl RollupGenerator for StateDurationRollup {
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
        let time = sample.time;

        self.accrue(time);
        let index = self.bucket_index(value);
        let counts = match self.starts_mode {
            StartsMode::EverySample => true,
            StartsMode::OnChange => self.current != Some(index),
        };
        if counts {
            self.buckets[index].occurrences += 1;
        }
        self.current = Some(index);
        self.latest_time = time;

        self.count += 1;
        if self.first.is_none() {
            self.first = Some(Timed::new(value.clone(), time));
        }
        self.last = Some(Timed::new(value.clone(), time));
        Ok(())
    }

    fn finalize(&mut self) {
        self.lifecycle.finish(NAME);
        self.accrue(self.period.end);
        self.current = None;

        self.total_duration = self
            .buckets
            .iter()
            .fold(0i64, |total, b| total.saturating_add(b.duration));
        let total = self.total_duration;
        for bucket in &mut self.buckets {
            bucket.proportion = if total == 0 {
                0.0
            } else {
                bucket.duration as f64 / total as f64
            };
        }
        self.buckets.sort_by(|a, b| a.value.compare(&b.value));

        tracing::debug!(
            period = %self.period,
            count = self.count,
            buckets = self.buckets.len(),
            total_duration = self.total_duration,
            "finalized state duration rollup"
        );
    }

    fn summary(&self) -> RollupSummary {
        RollupSummary::StateDuration(self.to_summary())
    }
}

// =============================================================================
// State Summary
// =============================================================================

/// Serializable result of a state duration rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    pub period: Period,
    pub starts_mode: StartsMode,
    pub start_value: Option<SignalValue>,
    pub count: u64,
    pub first: Option<Timed<SignalValue>>,
    pub last: Option<Timed<SignalValue>>,
    pub total_duration: i64,
    pub buckets: Vec<StateBucket>,
}

// =============================================================================
// Tests
// =============================================================================
