//! Aegis Historian Rollup Selection
//!
//! Chooses a generator by rollup kind and dispatches the shared contract
//! across the four generator implementations.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::change::{ChangeCounter, ChangeSummary};
use crate::generator::{Lifecycle, RollupGenerator};
use crate::numeric::{NumericRollup, NumericSummary};
use crate::passthrough::PassthroughCollector;
use crate::state::{StateDurationRollup, StateSummary};
use historian_common::{EngineConfig, HistorianError, Period, Result, Sample, SignalValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Rollup Kind
// =============================================================================

/// Kind of rollup a caller requests for a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RollupKind {
    /// Raw samples, no computation.
    #[default]
    None,
    Numeric,
    StateDuration,
    Changes,
}

impl RollupKind {
    /// Build a fresh generator for `period`.
    ///
    /// The start value is ignored for `None`. A numeric rollup fails when the
    /// start value has no numeric coercion.
    pub fn build(
        self,
        period: Period,
        start_value: Option<SignalValue>,
        config: &EngineConfig,
    ) -> Result<Rollup> {
        let rollup = match self {
            RollupKind::None => Rollup::Raw(PassthroughCollector::new(period)),
            RollupKind::Numeric => {
                let start = start_value.map(|v| v.as_double()).transpose()?;
                Rollup::Numeric(NumericRollup::new(period, start))
            }
            RollupKind::StateDuration => Rollup::StateDuration(StateDurationRollup::with_mode(
                period,
                start_value,
                config.state.starts_mode,
            )),
            RollupKind::Changes => Rollup::Changes(ChangeCounter::new(period, start_value)),
        };
        Ok(rollup)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RollupKind::None => "none",
            RollupKind::Numeric => "numeric",
            RollupKind::StateDuration => "state_duration",
            RollupKind::Changes => "changes",
        }
    }
}

impl fmt::Display for RollupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollupKind {
    type Err = HistorianError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "raw" => Ok(RollupKind::None),
            "numeric" | "average" => Ok(RollupKind::Numeric),
            "state_duration" | "state" | "runtime" => Ok(RollupKind::StateDuration),
            "changes" | "change" => Ok(RollupKind::Changes),
            other => Err(HistorianError::Parse(format!("unknown rollup kind: {}", other))),
        }
    }
}

// =============================================================================
// Rollup
// =============================================================================

/// Any of the four rollup generators.
#[derive(Debug, Clone)]
pub enum Rollup {
    Raw(PassthroughCollector),
    Numeric(NumericRollup),
    StateDuration(StateDurationRollup),
    Changes(ChangeCounter),
}

impl Rollup {
    pub fn kind(&self) -> RollupKind {
        match self {
            Rollup::Raw(_) => RollupKind::None,
            Rollup::Numeric(_) => RollupKind::Numeric,
            Rollup::StateDuration(_) => RollupKind::StateDuration,
            Rollup::Changes(_) => RollupKind::Changes,
        }
    }

    fn generator(&self) -> &dyn RollupGenerator {
        match self {
            Rollup::Raw(g) => g,
            Rollup::Numeric(g) => g,
            Rollup::StateDuration(g) => g,
            Rollup::Changes(g) => g,
        }
    }

    fn generator_mut(&mut self) -> &mut dyn RollupGenerator {
        match self {
            Rollup::Raw(g) => g,
            Rollup::Numeric(g) => g,
            Rollup::StateDuration(g) => g,
            Rollup::Changes(g) => g,
        }
    }
}

impl RollupGenerator for Rollup {
    fn name(&self) -> &'static str {
        self.generator().name()
    }

    fn period(&self) -> Period {
        self.generator().period()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.generator().lifecycle()
    }

    fn accept(&mut self, sample: &Sample) -> Result<()> {
        self.generator_mut().accept(sample)
    }

    fn finalize(&mut self) {
        self.generator_mut().finalize()
    }

    fn summary(&self) -> RollupSummary {
        self.generator().summary()
    }
}

impl From<PassthroughCollector> for Rollup {
    fn from(g: PassthroughCollector) -> Self {
        Rollup::Raw(g)
    }
}

impl From<NumericRollup> for Rollup {
    fn from(g: NumericRollup) -> Self {
        Rollup::Numeric(g)
    }
}

impl From<StateDurationRollup> for Rollup {
    fn from(g: StateDurationRollup) -> Self {
        Rollup::StateDuration(g)
    }
}

impl From<ChangeCounter> for Rollup {
    fn from(g: ChangeCounter) -> Self {
        Rollup::Changes(g)
    }
}

// =============================================================================
// Rollup Summary
// =============================================================================

/// Serializable snapshot of a generator's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollupSummary {
    Raw { samples: Vec<Sample> },
    Numeric(NumericSummary),
    StateDuration(StateSummary),
    Changes(ChangeSummary),
}

impl RollupSummary {
    pub fn kind(&self) -> RollupKind {
        match self {
            RollupSummary::Raw { .. } => RollupKind::None,
            RollupSummary::Numeric(_) => RollupKind::Numeric,
            RollupSummary::StateDuration(_) => RollupKind::StateDuration,
            RollupSummary::Changes(_) => RollupKind::Changes,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
