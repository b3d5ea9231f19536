//! Aegis Historian Types - Core Data Types
//!
//! The signal value model, samples, and periods consumed by every rollup
//! generator. Timestamps are epoch milliseconds throughout; `chrono`
//! conversions are provided at the edges for callers that hold wall-clock
//! times.
//!
//! Key Features:
//! - Closed `SignalValue` variant type with same-variant ordering
//! - Numeric coercion for boolean, state, and numeric payloads
//! - Content-addressed binary references
//! - Half-open `[start, end)` periods
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::error::{HistorianError, Result};
use chrono::{DateTime, Utc};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Value Kind
// =============================================================================

/// Variant tag of a `SignalValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    State,
    Numeric,
    Text,
    BinaryRef,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "boolean",
            ValueKind::State => "state",
            ValueKind::Numeric => "numeric",
            ValueKind::Text => "text",
            ValueKind::BinaryRef => "binary reference",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Binary Reference
// =============================================================================

/// Reference to a large binary payload stored outside the sample stream.
///
/// References carrying a content digest are equal when their digests match,
/// whatever their ids. References without a digest are equal when their ids
/// match. A digest-bearing reference never equals an id-only one and sorts
/// before it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryRef {
    pub id: u64,
    pub digest: Option<[u8; 32]>,
}

impl BinaryRef {
    /// Reference by id only.
    pub fn new(id: u64) -> Self {
        Self { id, digest: None }
    }

    /// Reference carrying the SHA-256 digest of its content.
    pub fn from_content(id: u64, content: &[u8]) -> Self {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(content));
        Self {
            id,
            digest: Some(digest),
        }
    }

    /// Hex-encoded digest, if present.
    pub fn digest_hex(&self) -> Option<String> {
        self.digest.as_ref().map(|d| HEXLOWER.encode(d))
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (&self.digest, &other.digest) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.id.cmp(&other.id),
        }
    }
}

impl PartialEq for BinaryRef {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl fmt::Display for BinaryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.digest_hex() {
            Some(hex) => write!(f, "sha256:{}", hex),
            None => write!(f, "#{}", self.id),
        }
    }
}

// =============================================================================
// Signal Value
// =============================================================================

/// Payload of a single historian sample.
///
/// Ordering and equality are only meaningful between values of the same
/// variant. `compare` and `matches` treat a variant mismatch as a caller
/// defect and panic; the `PartialEq`/`PartialOrd` impls report mismatched
/// variants as unequal/unordered instead, so values can still be used in
/// assertions and collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SignalValue {
    Boolean(bool),
    State(i32),
    Numeric(f64),
    Text(String),
    BinaryRef(BinaryRef),
}

impl SignalValue {
    /// Returns the variant tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            SignalValue::Boolean(_) => ValueKind::Boolean,
            SignalValue::State(_) => ValueKind::State,
            SignalValue::Numeric(_) => ValueKind::Numeric,
            SignalValue::Text(_) => ValueKind::Text,
            SignalValue::BinaryRef(_) => ValueKind::BinaryRef,
        }
    }

    /// Returns true if `as_double` succeeds for this value.
    pub fn is_numeric_kind(&self) -> bool {
        matches!(
            self,
            SignalValue::Boolean(_) | SignalValue::State(_) | SignalValue::Numeric(_)
        )
    }

    /// Numeric coercion. Booleans map to 0.0/1.0.
    pub fn as_double(&self) -> Result<f64> {
        match self {
            SignalValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            SignalValue::State(s) => Ok(f64::from(*s)),
            SignalValue::Numeric(n) => Ok(*n),
            other => Err(HistorianError::Coercion { kind: other.kind() }),
        }
    }

    /// Compares two values of the same variant, or returns `None` when the
    /// variants differ.
    pub fn try_compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (SignalValue::Boolean(a), SignalValue::Boolean(b)) => Some(a.cmp(b)),
            (SignalValue::State(a), SignalValue::State(b)) => Some(a.cmp(b)),
            (SignalValue::Numeric(a), SignalValue::Numeric(b)) => Some(compare_f64(*a, *b)),
            (SignalValue::Text(a), SignalValue::Text(b)) => Some(a.cmp(b)),
            (SignalValue::BinaryRef(a), SignalValue::BinaryRef(b)) => Some(a.compare(b)),
            _ => None,
        }
    }

    /// Natural ordering within a variant: numeric ascending, text lexical,
    /// `false` before `true`. Every NaN equals every other NaN, regardless of
    /// sign or payload, and sorts above every other numeric value.
    ///
    /// # Panics
    ///
    /// Panics if the two values are of different variants.
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.try_compare(other) {
            Some(ordering) => ordering,
            None => panic!(
                "cannot compare {} signal value with {} signal value",
                self.kind(),
                other.kind()
            ),
        }
    }

    /// Same-variant equality.
    ///
    /// # Panics
    ///
    /// Panics if the two values are of different variants.
    pub fn matches(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

/// Total order on `f64` with all NaNs equal and greater than +inf.
fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl PartialEq for SignalValue {
    fn eq(&self, other: &Self) -> bool {
        self.try_compare(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for SignalValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_compare(other)
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Boolean(b) => write!(f, "{}", b),
            SignalValue::State(s) => write!(f, "{}", s),
            SignalValue::Numeric(n) => write!(f, "{}", n),
            SignalValue::Text(t) => f.write_str(t),
            SignalValue::BinaryRef(r) => write!(f, "{}", r),
        }
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        SignalValue::Boolean(value)
    }
}

impl From<i32> for SignalValue {
    fn from(value: i32) -> Self {
        SignalValue::State(value)
    }
}

impl From<f64> for SignalValue {
    fn from(value: f64) -> Self {
        SignalValue::Numeric(value)
    }
}

impl From<&str> for SignalValue {
    fn from(value: &str) -> Self {
        SignalValue::Text(value.to_string())
    }
}

impl From<String> for SignalValue {
    fn from(value: String) -> Self {
        SignalValue::Text(value)
    }
}

impl From<BinaryRef> for SignalValue {
    fn from(value: BinaryRef) -> Self {
        SignalValue::BinaryRef(value)
    }
}

// =============================================================================
// Sample
// =============================================================================

/// A recorded value of one point at one instant.
///
/// A sample without a value (a gap or a null reading) is ignored by every
/// generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: i64,
    pub value: Option<SignalValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<i64>,
}

impl Sample {
    pub fn new(time: i64, value: impl Into<SignalValue>) -> Self {
        Self {
            time,
            value: Some(value.into()),
            series_id: None,
        }
    }

    /// A sample carrying no value.
    pub fn empty(time: i64) -> Self {
        Self {
            time,
            value: None,
            series_id: None,
        }
    }

    /// A sample stamped with a wall-clock time.
    pub fn at(timestamp: DateTime<Utc>, value: impl Into<SignalValue>) -> Self {
        Self::new(timestamp.timestamp_millis(), value)
    }

    pub fn with_series(mut self, series_id: i64) -> Self {
        self.series_id = Some(series_id);
        self
    }

    pub fn timestamp(&self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
            .ok_or(HistorianError::TimestampOutOfRange(self.time))
    }
}

// =============================================================================
// Period
// =============================================================================

/// Half-open time range `[start, end)` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: i64,
    pub end: i64,
}

impl Period {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(HistorianError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn from_datetimes(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::new(start.timestamp_millis(), end.timestamp_millis())
    }

    pub fn contains(&self, time: i64) -> bool {
        time >= self.start && time < self.end
    }

    /// Length in milliseconds, saturating at `i64::MAX`.
    pub fn duration_millis(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.duration_millis())
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// =============================================================================
// Tests
// =============================================================================
