//! End-to-end property tests for historian rollups
//!
//! Exercises every generator through the shared contract: empty periods,
//! bookend start values, time weighting, ordering violations, and the
//! one-shot finalize rule.

use historian_common::{EngineConfig, Period, Sample, SignalValue};
use historian_rollup::{
    ChangeCounter, NumericRollup, PassthroughCollector, Rollup, RollupGenerator, RollupKind,
    RollupSummary, StateDurationRollup, Timed,
};
use proptest::prelude::*;

fn period() -> Period {
    Period::new(0, 1000).expect("valid period")
}

/// Ascending timestamps within `[0, 1000)` paired with state values.
fn state_samples() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec((0i64..1000, 0i32..4), 0..40).prop_map(|mut raw| {
        raw.sort_by_key(|(t, _)| *t);
        raw.into_iter().map(|(t, v)| Sample::new(t, v)).collect()
    })
}

fn numeric_samples() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec((0i64..1000, -1000.0f64..1000.0), 1..40).prop_map(|mut raw| {
        raw.sort_by_key(|(t, _)| *t);
        raw.into_iter().map(|(t, v)| Sample::new(t, v)).collect()
    })
}

fn all_kinds() -> [RollupKind; 4] {
    [
        RollupKind::None,
        RollupKind::Numeric,
        RollupKind::StateDuration,
        RollupKind::Changes,
    ]
}

// =============================================================================
// Fixed Scenarios
// =============================================================================

#[test]
fn test_empty_period_without_start_value() {
    let mut rollup = NumericRollup::new(period(), None);
    rollup.finalize();

    assert_eq!(rollup.count(), 0);
    assert_eq!(rollup.average(), None);
    assert_eq!(rollup.minimum(), None);
    assert_eq!(rollup.maximum(), None);
    assert_eq!(rollup.first(), None);
    assert_eq!(rollup.last(), None);
    assert_eq!(rollup.delta(), None);

    let mut counter = ChangeCounter::new(period(), None);
    counter.finalize();
    assert_eq!(counter.count(), 0);
    assert_eq!(counter.first(), None);

    let mut state = StateDurationRollup::new(period(), None);
    state.finalize();
    assert_eq!(state.count(), 0);
    assert!(state.buckets().is_empty());
}

#[test]
fn test_start_value_without_samples() {
    let mut rollup = NumericRollup::new(period(), Some(42.0));
    rollup.finalize();

    assert_eq!(rollup.minimum(), Some(Timed::new(42.0, 0)));
    assert_eq!(rollup.maximum(), Some(Timed::new(42.0, 0)));
    assert_eq!(rollup.average(), Some(42.0));
    assert_eq!(rollup.delta(), Some(0.0));
    assert_eq!(rollup.integral(), 0.0);
}

#[test]
fn test_single_sample_without_bookends() {
    let mut rollup = NumericRollup::new(period(), None);
    rollup.accept(&Sample::new(500, 10.0)).expect("sample");
    rollup.finalize();

    assert_eq!(rollup.average(), Some(10.0));
    assert_eq!(rollup.integral(), 0.0);
    assert_eq!(rollup.minimum().map(|m| m.value), Some(10.0));
    assert_eq!(rollup.maximum().map(|m| m.value), Some(10.0));
}

#[test]
fn test_worked_time_weighted_example() {
    let mut rollup = NumericRollup::new(period(), Some(0.0));
    rollup.accept(&Sample::new(500, 10.0)).expect("sample");
    rollup.finalize();

    assert_eq!(rollup.average(), Some(5.0));
    assert_eq!(rollup.integral(), 5.0);
}

#[test]
fn test_state_span_runs_from_first_accrual_to_period_end() {
    let mut state = StateDurationRollup::new(period(), None);
    state
        .accept_all(&[Sample::new(250, 1), Sample::new(600, 2)])
        .expect("samples");
    state.finalize();

    assert_eq!(state.total_duration(), 750);
    assert_eq!(state.buckets().iter().map(|b| b.duration).sum::<i64>(), 750);
}

#[test]
fn test_out_of_order_samples_skew_but_do_not_fail() {
    // Ordering is the caller's contract; a late sample is applied as given
    // and only its non-negative durations count.
    let mut rollup = NumericRollup::new(period(), Some(0.0));
    rollup
        .accept_all(&[Sample::new(600, 10.0), Sample::new(200, 20.0)])
        .expect("samples");
    rollup.finalize();

    // 0 for [0, 600), then 20 extended from t=200 to the end: 800ms.
    assert_eq!(rollup.weighted_duration(), 1400);
    assert_eq!(rollup.last(), Some(Timed::new(20.0, 200)));
    let average = rollup.average().expect("average");
    assert!((average - 16000.0 / 1400.0).abs() < 1e-9);

    let mut state = StateDurationRollup::new(period(), Some(SignalValue::State(0)));
    state
        .accept_all(&[Sample::new(600, 1), Sample::new(200, 2)])
        .expect("samples");
    state.finalize();
    let one = state.bucket(&SignalValue::State(1)).expect("bucket");
    assert_eq!(one.duration, 0);
    assert_eq!(state.total_duration(), 600 + 800);
}

#[test]
fn test_samples_outside_period_are_not_rejected() {
    let mut counter = ChangeCounter::new(period(), None);
    counter
        .accept_all(&[Sample::new(-100, 1), Sample::new(5000, 2)])
        .expect("samples");
    counter.finalize();
    assert_eq!(counter.count(), 2);
    assert_eq!(counter.changes(), 2);
}

#[test]
fn test_double_finalize_always_panics() {
    let config = EngineConfig::default();
    for kind in all_kinds() {
        let result = std::panic::catch_unwind(|| {
            let mut rollup: Rollup = kind
                .build(period(), None, &config)
                .expect("build should succeed");
            rollup.finalize();
            rollup.finalize();
        });
        assert!(result.is_err(), "{} allowed a second finalize", kind);
    }
}

#[test]
fn test_accept_after_finalize_always_panics() {
    let config = EngineConfig::default();
    for kind in all_kinds() {
        let result = std::panic::catch_unwind(|| {
            let mut rollup: Rollup = kind
                .build(period(), None, &config)
                .expect("build should succeed");
            rollup.finalize();
            let _ = rollup.accept(&Sample::new(1, 1));
        });
        assert!(result.is_err(), "{} accepted after finalize", kind);
    }
}

#[test]
fn test_summary_json_shape() {
    let mut state = StateDurationRollup::new(period(), Some(SignalValue::Boolean(false)));
    state.accept(&Sample::new(400, true)).expect("sample");
    state.finalize();

    let json = serde_json::to_value(state.summary()).expect("serialize");
    assert_eq!(json["kind"], "state_duration");
    assert_eq!(json["buckets"][0]["value"]["Boolean"], false);
    assert_eq!(json["buckets"][0]["duration"], 400);
    assert_eq!(json["buckets"][1]["occurrences"], 1);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_state_proportions_sum_to_one(
        samples in state_samples(),
        start in prop::option::of(0i32..4),
    ) {
        let mut state = StateDurationRollup::new(period(), start.map(SignalValue::State));
        state.accept_all(&samples).expect("samples");
        state.finalize();

        let total: i64 = state.buckets().iter().map(|b| b.duration).sum();
        prop_assert_eq!(total, state.total_duration());

        if state.total_duration() > 0 {
            let proportions: f64 = state.buckets().iter().map(|b| b.proportion).sum();
            prop_assert!((proportions - 1.0).abs() < 1e-9);
        }

        let span_start = if start.is_some() {
            Some(0)
        } else {
            samples.first().map(|s| s.time)
        };
        if let Some(span_start) = span_start {
            prop_assert_eq!(state.total_duration(), 1000 - span_start);
        }

        for pair in state.buckets().windows(2) {
            prop_assert!(pair[0].value.compare(&pair[1].value).is_lt());
        }

        let occurrences: u64 = state.buckets().iter().map(|b| b.occurrences).sum();
        prop_assert_eq!(occurrences, samples.len() as u64);
    }

    #[test]
    fn prop_repeated_value_counts_one_change(n in 1usize..200, value in any::<i32>()) {
        let mut counter = ChangeCounter::new(period(), None);
        for i in 0..n {
            counter.accept(&Sample::new(i as i64, value)).expect("sample");
        }
        counter.finalize();

        prop_assert_eq!(counter.count(), n as u64);
        prop_assert_eq!(counter.changes(), 1);
    }

    #[test]
    fn prop_passthrough_round_trip(samples in numeric_samples()) {
        let mut collector = PassthroughCollector::new(period());
        collector.accept_all(&samples).expect("samples");
        collector.finalize();

        prop_assert_eq!(collector.samples(), samples.as_slice());
        prop_assert_eq!(collector.summary(), RollupSummary::Raw { samples });
    }

    #[test]
    fn prop_delta_law(
        samples in numeric_samples(),
        start in prop::option::of(-50.0f64..50.0),
    ) {
        let mut rollup = NumericRollup::new(period(), start);
        rollup.accept_all(&samples).expect("samples");
        rollup.finalize();

        let last = rollup.last().expect("last").value;
        let expected = match start {
            Some(start) => last - start,
            None => last - rollup.first().expect("first").value,
        };
        prop_assert_eq!(rollup.delta(), Some(expected));
    }

    #[test]
    fn prop_average_within_extremes(
        samples in numeric_samples(),
        start in prop::option::of(-50.0f64..50.0),
    ) {
        let mut rollup = NumericRollup::new(period(), start);
        rollup.accept_all(&samples).expect("samples");
        rollup.finalize();

        let average = rollup.average().expect("average");
        let min = rollup.minimum().expect("minimum").value;
        let max = rollup.maximum().expect("maximum").value;
        prop_assert!(average >= min - 1e-6 && average <= max + 1e-6);
    }
}
