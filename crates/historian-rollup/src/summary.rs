//! Aegis Historian Running Summary
//!
//! Unweighted streaming statistics over accepted numeric values.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};

/// Returns true if `value` should replace `current` as the running minimum.
///
/// An empty or NaN extreme is replaced by the next value, so NaN only stands
/// as an extreme until a real value arrives. Ties keep the earlier value.
pub(crate) fn replaces_min(current: Option<f64>, value: f64) -> bool {
    match current {
        None => true,
        Some(c) => c.is_nan() || value < c,
    }
}

/// Counterpart of `replaces_min` for the running maximum.
pub(crate) fn replaces_max(current: Option<f64>, value: f64) -> bool {
    match current {
        None => true,
        Some(c) => c.is_nan() || value > c,
    }
}

// =============================================================================
// Running Summary
// =============================================================================

/// Streaming count/sum/mean/min/max/variance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningSummary {
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
    mean: f64,
    m2: f64,
}

impl RunningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value to the summary.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        if replaces_min(self.min, value) {
            self.min = Some(value);
        }
        if replaces_max(self.max, value) {
            self.max = Some(value);
        }

        // Welford
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Arithmetic mean, or `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    /// Population variance, or `None` when empty.
    pub fn variance(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.m2 / self.count as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}

// =============================================================================
// Tests
// =============================================================================
