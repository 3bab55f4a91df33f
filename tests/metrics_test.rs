//! Unit tests for metrics.rs module

mod common;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

use common::{coordinator, starlink_file, test_db};
use tle_ingest::metrics::{
    FILES_FAILED_TOTAL, FILES_INGESTED_TOTAL, FILES_SKIPPED_TOTAL, INGEST_DURATION_SECONDS,
    ORBITS_INSERTED_TOTAL, RECORDS_PARSED_TOTAL, RECORDS_REJECTED_TOTAL,
};

#[test]
fn test_metric_names_are_unique() {
    let names = [
        FILES_INGESTED_TOTAL,
        FILES_SKIPPED_TOTAL,
        FILES_FAILED_TOTAL,
        RECORDS_PARSED_TOTAL,
        RECORDS_REJECTED_TOTAL,
        ORBITS_INSERTED_TOTAL,
        INGEST_DURATION_SECONDS,
    ];
    let mut sorted = names.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), names.len());
}

#[test]
fn test_counters_end_in_total() {
    for name in [FILES_INGESTED_TOTAL, FILES_SKIPPED_TOTAL, FILES_FAILED_TOTAL, ORBITS_INSERTED_TOTAL] {
        assert!(name.ends_with("_total"), "{name}");
    }
    assert!(INGEST_DURATION_SECONDS.ends_with("_seconds"));
}

/// Captured metrics as `(name, labels, value)`
fn captured(snapshotter: &Snapshotter) -> Vec<(String, Vec<(String, String)>, DebugValue)> {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, value)| {
            let labels = key
                .key()
                .labels()
                .map(|label| (label.key().to_string(), label.value().to_string()))
                .collect();
            (key.key().name().to_string(), labels, value)
        })
        .collect()
}

fn counter(metrics: &[(String, Vec<(String, String)>, DebugValue)], name: &str, label: (&str, &str)) -> u64 {
    metrics
        .iter()
        .filter(|(metric, labels, _)| {
            metric == name && labels.iter().any(|(key, value)| key == label.0 && value == label.1)
        })
        .map(|(_, _, value)| match value {
            DebugValue::Counter(count) => *count,
            other => panic!("{name} is not a counter: {other:?}"),
        })
        .sum()
}

#[test]
fn test_ingestion_outcomes_are_counted() {
    let (_dir, db) = test_db();
    let coordinator = coordinator(db);
    let content = starlink_file("23053.20743056");

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    metrics::with_local_recorder(&recorder, || {
        coordinator.ingest("STARLINK", "https://celestrak.org/starlink.txt", content.as_bytes()).unwrap();
        coordinator.ingest("STARLINK", "https://celestrak.org/starlink.txt", content.as_bytes()).unwrap();
        coordinator.ingest("", "https://celestrak.org/starlink.txt", content.as_bytes()).unwrap_err();
    });

    let metrics = captured(&snapshotter);
    let starlink = ("constellation", "STARLINK");
    assert_eq!(counter(&metrics, FILES_INGESTED_TOTAL, starlink), 1);
    assert_eq!(counter(&metrics, RECORDS_PARSED_TOTAL, starlink), 3);
    assert_eq!(counter(&metrics, RECORDS_REJECTED_TOTAL, starlink), 0);
    assert_eq!(counter(&metrics, ORBITS_INSERTED_TOTAL, starlink), 3);
    assert_eq!(counter(&metrics, FILES_SKIPPED_TOTAL, starlink), 1);
    assert_eq!(counter(&metrics, FILES_FAILED_TOTAL, starlink), 0);
    assert_eq!(counter(&metrics, FILES_FAILED_TOTAL, ("kind", "invalid_source")), 1);

    let durations: Vec<_> = metrics.iter().filter(|(name, ..)| name == INGEST_DURATION_SECONDS).collect();
    assert_eq!(durations.len(), 1);
    assert!(matches!(&durations[0].2, DebugValue::Histogram(samples) if samples.len() == 1));
}
