//! Aegis Historian Generator Contract
//!
//! Lifecycle shared by every rollup generator: seed, accumulate, finalize
//! once, then read.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::rollup::RollupSummary;
use historian_common::{Period, Result, Sample};
use serde::{Deserialize, Serialize};

// =============================================================================
// Timed Value
// =============================================================================

/// A value together with the instant it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timed<T> {
    pub value: T,
    pub time: i64,
}

impl<T> Timed<T> {
    pub fn new(value: T, time: i64) -> Self {
        Self { value, time }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Generator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Accumulating,
    Finalized,
}

impl Lifecycle {
    /// # Panics
    ///
    /// Panics if the generator has already been finalized.
    pub fn ensure_accumulating(&self, generator: &str) {
        if *self == Lifecycle::Finalized {
            panic!("{}: accept called after finalize", generator);
        }
    }

    /// Moves to `Finalized`.
    ///
    /// # Panics
    ///
    /// Panics if the generator has already been finalized.
    pub fn finish(&mut self, generator: &str) {
        if *self == Lifecycle::Finalized {
            panic!("{}: finalize called more than once", generator);
        }
        *self = Lifecycle::Finalized;
    }
}

// =============================================================================
// Rollup Generator
// =============================================================================

/// Contract implemented by all rollup generators.
///
/// A generator is single use. `accept` must be called with samples in
/// non-decreasing time order; samples outside the period are accepted as
/// given. Samples without a value are ignored. `finalize` must be called
/// exactly once, after which the generator is read-only.
///
/// Calling `accept` or `finalize` after `finalize` is a caller defect and
/// panics. Instances are not synchronized; drive each one from a single
/// thread.
pub trait RollupGenerator {
    /// Short generator name used in logs and defect messages.
    fn name(&self) -> &'static str;

    fn period(&self) -> Period;

    fn period_start(&self) -> i64 {
        self.period().start
    }

    fn period_end(&self) -> i64 {
        self.period().end
    }

    fn lifecycle(&self) -> Lifecycle;

    fn is_finalized(&self) -> bool {
        self.lifecycle() == Lifecycle::Finalized
    }

    /// Feeds one sample. Fails only when the sample's value cannot be used
    /// by this generator (e.g. text fed to a numeric rollup).
    fn accept(&mut self, sample: &Sample) -> Result<()>;

    /// Closes the period and computes derived statistics.
    fn finalize(&mut self);

    /// Snapshot of the generator's results.
    fn summary(&self) -> RollupSummary;

    /// Feeds every sample in order, stopping at the first failure.
    fn accept_all<'a, I>(&mut self, samples: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Sample>,
        Self: Sized,
    {
        for sample in samples {
            self.accept(sample)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        let mut lifecycle = Lifecycle::default();
        assert_eq!(lifecycle, Lifecycle::Accumulating);
        lifecycle.ensure_accumulating("test");
        lifecycle.finish("test");
        assert_eq!(lifecycle, Lifecycle::Finalized);
    }

    #[test]
    #[should_panic(expected = "finalize called more than once")]
    fn test_lifecycle_double_finish_panics() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.finish("test");
        lifecycle.finish("test");
    }

    #[test]
    #[should_panic(expected = "accept called after finalize")]
    fn test_lifecycle_accept_after_finish_panics() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.finish("test");
        lifecycle.ensure_accumulating("test");
    }
}
