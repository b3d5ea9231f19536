//! Aegis Historian Common - Shared Types and Utilities
//!
//! Foundational types, error handling, and configuration shared by the
//! historian rollup engine and its drivers. Every generator consumes the
//! signal model defined here and reports failures through the unified error
//! type.
//!
//! Key Features:
//! - Closed signal value model (boolean, state, numeric, text, binary reference)
//! - Samples and half-open periods on epoch-millisecond timestamps
//! - Unified error type separating data errors from configuration errors
//! - TOML-backed engine configuration
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, ReportConfig, StartsMode, StateConfig};
pub use error::{HistorianError, Result};
pub use types::*;
