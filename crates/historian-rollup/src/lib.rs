//! Aegis Historian Rollup - Rollup Generators
//!
//! Summarizes the raw samples a historian recorded for one point during one
//! period. Each generator is seeded with the value in force at the start of
//! the period, fed every sample of the period in ascending time order, and
//! finalized exactly once before its accessors are read.
//!
//! Key Features:
//! - Time-weighted average and integral with start-value bookends
//! - Per-state duration, occurrence, and proportion tracking
//! - Sample and transition counting
//! - Raw passthrough sharing the same generator contract
//! - Parallel batch reports over independent (point, period) jobs
//!
//! Samples must arrive in non-decreasing time order. Generators neither sort
//! nor validate ordering; out-of-order samples silently skew durations.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod change;
pub mod generator;
pub mod numeric;
pub mod passthrough;
pub mod report;
pub mod rollup;
pub mod state;
pub mod summary;

pub use change::{ChangeCounter, ChangeSummary};
pub use generator::{Lifecycle, RollupGenerator, Timed};
pub use numeric::{NumericRollup, NumericSummary};
pub use passthrough::PassthroughCollector;
pub use report::{ReportJob, ReportRow, ReportRunner};
pub use rollup::{Rollup, RollupKind, RollupSummary};
pub use state::{StateBucket, StateDurationRollup, StateSummary};
pub use summary::RunningSummary;
