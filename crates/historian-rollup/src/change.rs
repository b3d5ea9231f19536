//! Aegis Historian Change Counter
//!
//! Counts samples and value transitions within a period.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::generator::{Lifecycle, RollupGenerator, Timed};
use crate::rollup::RollupSummary;
use historian_common::{Period, Result, Sample, SignalValue};
use serde::{Deserialize, Serialize};

const NAME: &str = "change counter";

/// Counts accepted samples and how many of them changed the signal's value.
///
/// The start value seeds change detection: a first sample equal to it is not
/// a change.
#[derive(Debug, Clone)]
pub struct ChangeCounter {
    period: Period,
    lifecycle: Lifecycle,
    start_value: Option<SignalValue>,
    latest: Option<SignalValue>,
    first: Option<Timed<SignalValue>>,
    last: Option<Timed<SignalValue>>,
    count: u64,
    changes: u64,
}

impl ChangeCounter {
    pub fn new(period: Period, start_value: Option<SignalValue>) -> Self {
        Self {
            period,
            lifecycle: Lifecycle::Accumulating,
            latest: start_value.clone(),
            start_value,
            first: None,
            last: None,
            count: 0,
            changes: 0,
        }
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

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub fn to_summary(&self) -> ChangeSummary {
        ChangeSummary {
            period: self.period,
            start_value: self.start_value.clone(),
            count: self.count,
            changes: self.changes,
            first: self.first.clone(),
            last: self.last.clone(),
        }
    }
}

impl RollupGenerator for ChangeCounter {
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

        self.count += 1;
        if self.first.is_none() {
            self.first = Some(Timed::new(value.clone(), sample.time));
        }

        let changed = match &self.latest {
            Some(latest) => !latest.matches(value),
            None => true,
        };
        if changed {
            self.changes += 1;
            self.latest = Some(value.clone());
        }

        self.last = Some(Timed::new(value.clone(), sample.time));
        Ok(())
    }

    fn finalize(&mut self) {
        self.lifecycle.finish(NAME);
        tracing::debug!(
            period = %self.period,
            count = self.count,
            changes = self.changes,
            "finalized change counter"
        );
    }

    fn summary(&self) -> RollupSummary {
        RollupSummary::Changes(self.to_summary())
    }
}

/// Serializable result of a change counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub period: Period,
    pub start_value: Option<SignalValue>,
    pub count: u64,
    pub changes: u64,
    pub first: Option<Timed<SignalValue>>,
    pub last: Option<Timed<SignalValue>>,
}

// =============================================================================
// Tests
// =============================================================================
