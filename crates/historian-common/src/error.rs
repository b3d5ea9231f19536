//! Aegis Historian Error - Unified Error Types
//!
//! Recoverable failures raised by the historian crates. Caller bugs such as
//! finalizing a generator twice are not represented here: those are
//! precondition defects and abort with a panic at the call site.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::types::ValueKind;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all historian operations.
#[derive(Error, Debug)]
pub enum HistorianError {
    // Data errors
    #[error("cannot coerce {kind} value to a number")]
    Coercion { kind: ValueKind },

    #[error("invalid period: start {start} is after end {end}")]
    InvalidPeriod { start: i64, end: i64 },

    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    // Input errors
    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for historian operations.
pub type Result<T> = std::result::Result<T, HistorianError>;

// =============================================================================
// Error Classification
// =============================================================================

impl HistorianError {
    /// Returns true if the error stems from the data a caller supplied
    /// rather than from the environment.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            HistorianError::Coercion { .. }
                | HistorianError::InvalidPeriod { .. }
                | HistorianError::TimestampOutOfRange(_)
        )
    }

    /// Returns true if this is a user error (vs system error).
    pub fn is_user_error(&self) -> bool {
        self.is_data_error()
            || matches!(
                self,
                HistorianError::Parse(_) | HistorianError::Configuration(_)
            )
    }
}

// =============================================================================
// Tests
// =============================================================================
