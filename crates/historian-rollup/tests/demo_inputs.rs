//! Checks that the sample inputs shipped under `demos/` stay loadable and
//! produce the documented results.

use historian_common::{EngineConfig, Period, Sample, SignalValue};
use historian_rollup::{ReportJob, ReportRunner, RollupGenerator, RollupKind, RollupSummary};
use serde::Deserialize;

#[derive(Deserialize)]
struct RollupInput {
    start_value: Option<SignalValue>,
    samples: Vec<Sample>,
}

#[test]
fn test_tank_level_demo() {
    let input: RollupInput =
        serde_json::from_str(include_str!("../../../demos/tank_level.json")).expect("demo input");
    let period = Period::new(1_700_000_000_000, 1_700_000_300_000).expect("valid period");

    let mut rollup = RollupKind::Numeric
        .build(period, input.start_value, &EngineConfig::default())
        .expect("build should succeed");
    rollup.accept_all(&input.samples).expect("samples");
    rollup.finalize();

    match rollup.summary() {
        RollupSummary::Numeric(summary) => {
            assert_eq!(summary.count, 3);
            assert_eq!(summary.delta, Some(4.0));
            // 40 for 60s, 42.5 for 60s, 47 for 90s, 44 for 90s.
            let expected = (40.0 * 60.0 + 42.5 * 60.0 + 47.0 * 90.0 + 44.0 * 90.0) / 300.0;
            let average = summary.average.expect("average");
            assert!((average - expected).abs() < 1e-9);
            assert!((summary.integral - expected * 300.0).abs() < 1e-6);
        }
        other => panic!("unexpected summary: {:?}", other.kind()),
    }
}

#[test]
fn test_pump_report_demo() {
    let jobs: Vec<ReportJob> =
        serde_json::from_str(include_str!("../../../demos/pump_report.json")).expect("demo jobs");
    let config =
        EngineConfig::from_toml(include_str!("../../../demos/historian.toml")).expect("config");

    let rows = ReportRunner::new(config)
        .expect("runner")
        .run(&jobs)
        .expect("report");
    assert_eq!(rows.len(), 2);

    match &rows[0].summary {
        RollupSummary::StateDuration(summary) => {
            let durations: Vec<i64> = summary.buckets.iter().map(|b| b.duration).collect();
            assert_eq!(durations, vec![600_000, 2_400_000, 600_000]);
            let starts: Vec<u64> = summary.buckets.iter().map(|b| b.occurrences).collect();
            assert_eq!(starts, vec![0, 2, 1]);
        }
        other => panic!("unexpected summary: {:?}", other.kind()),
    }

    match &rows[1].summary {
        RollupSummary::Changes(summary) => {
            assert_eq!(summary.count, 3);
            assert_eq!(summary.changes, 3);
        }
        other => panic!("unexpected summary: {:?}", other.kind()),
    }
}
