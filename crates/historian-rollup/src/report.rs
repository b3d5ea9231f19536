//! Aegis Historian Report Runner
//!
//! Drives one generator per (point, period) job for a batch report. Jobs
//! share nothing, so they run on a dedicated rayon pool when parallel
//! execution is enabled.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::generator::RollupGenerator;
use crate::rollup::{RollupKind, RollupSummary};
use historian_common::{EngineConfig, HistorianError, Period, Result, Sample, SignalValue};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

// =============================================================================
// Report Job
// =============================================================================

/// Everything needed to roll up one point over one period.
///
/// `samples` must be in ascending time order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportJob {
    pub point: String,
    pub kind: RollupKind,
    pub period: Period,
    #[serde(default)]
    pub start_value: Option<SignalValue>,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl ReportJob {
    pub fn new(point: impl Into<String>, kind: RollupKind, period: Period) -> Self {
        Self {
            point: point.into(),
            kind,
            period,
            start_value: None,
            samples: Vec::new(),
        }
    }

    pub fn with_start_value(mut self, value: impl Into<SignalValue>) -> Self {
        self.start_value = Some(value.into());
        self
    }

    pub fn with_samples(mut self, samples: Vec<Sample>) -> Self {
        self.samples = samples;
        self
    }

    /// Build, feed, and finalize a generator for this job.
    pub fn execute(&self, config: &EngineConfig) -> Result<ReportRow> {
        let mut rollup = self
            .kind
            .build(self.period, self.start_value.clone(), config)?;
        rollup.accept_all(&self.samples)?;
        rollup.finalize();

        tracing::trace!(point = %self.point, kind = %self.kind, "report job complete");

        Ok(ReportRow {
            point: self.point.clone(),
            period: self.period,
            summary: rollup.summary(),
        })
    }
}

/// One finished row of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub point: String,
    pub period: Period,
    pub summary: RollupSummary,
}

// =============================================================================
// Report Runner
// =============================================================================

/// Executes batches of report jobs.
pub struct ReportRunner {
    config: EngineConfig,
    pool: Option<ThreadPool>,
}

impl ReportRunner {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let pool = if config.report.parallel {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.report.workers)
                .thread_name(|i| format!("historian-report-{}", i))
                .build()
                .map_err(|e| HistorianError::Internal(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every job, returning rows in job order. Fails with the first
    /// job error encountered.
    pub fn run(&self, jobs: &[ReportJob]) -> Result<Vec<ReportRow>> {
        tracing::debug!(
            jobs = jobs.len(),
            parallel = self.pool.is_some(),
            "running rollup report"
        );

        let rows = match &self.pool {
            Some(pool) => pool.install(|| {
                jobs.par_iter()
                    .map(|job| job.execute(&self.config))
                    .collect::<Result<Vec<_>>>()
            }),
            None => jobs
                .iter()
                .map(|job| job.execute(&self.config))
                .collect::<Result<Vec<_>>>(),
        }?;

        tracing::debug!(rows = rows.len(), "rollup report complete");
        Ok(rows)
    }
}

// =============================================================================
// Tests
// =============================================================================
