//! Aegis Historian Passthrough Collector
//!
//! Retains raw samples unchanged for callers that asked for no rollup.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::generator::{Lifecycle, RollupGenerator};
use crate::rollup::RollupSummary;
use historian_common::{Period, Result, Sample};

const NAME: &str = "passthrough collector";

/// Collects every accepted sample in arrival order.
#[derive(Debug, Clone)]
pub struct PassthroughCollector {
    period: Period,
    lifecycle: Lifecycle,
    samples: Vec<Sample>,
}

impl PassthroughCollector {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            lifecycle: Lifecycle::Accumulating,
            samples: Vec::new(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl RollupGenerator for PassthroughCollector {
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
        if sample.value.is_some() {
            self.samples.push(sample.clone());
        }
        Ok(())
    }

    fn finalize(&mut self) {
        self.lifecycle.finish(NAME);
    }

    fn summary(&self) -> RollupSummary {
        RollupSummary::Raw {
            samples: self.samples.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
