use std::time::Duration;

use metrics::{counter, histogram};

/// Files fully ingested
pub const FILES_INGESTED_TOTAL: &str = "tle_ingest_files_ingested_total";
/// Files skipped because their fingerprint was already stored
pub const FILES_SKIPPED_TOTAL: &str = "tle_ingest_files_skipped_total";
/// Files whose ingestion failed
pub const FILES_FAILED_TOTAL: &str = "tle_ingest_files_failed_total";
/// Records parsed successfully
pub const RECORDS_PARSED_TOTAL: &str = "tle_ingest_records_parsed_total";
/// Records rejected individually
pub const RECORDS_REJECTED_TOTAL: &str = "tle_ingest_records_rejected_total";
/// Orbit snapshots written
pub const ORBITS_INSERTED_TOTAL: &str = "tle_ingest_orbits_inserted_total";
/// Wall time of one file's ingestion
pub const INGEST_DURATION_SECONDS: &str = "tle_ingest_file_duration_seconds";

/// Metrics recorded by the ingestion pipeline
///
/// Without an installed recorder every call is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestMetrics;

impl IngestMetrics {
    /// Record a completed file ingestion
    pub fn record_file_ingested(&self, constellation: &str, parsed: usize, rejected: usize, inserted: usize, duration: Duration) {
        let label = constellation.to_string();
        counter!(FILES_INGESTED_TOTAL, "constellation" => label.clone()).increment(1);
        counter!(RECORDS_PARSED_TOTAL, "constellation" => label.clone()).increment(parsed as u64);
        counter!(RECORDS_REJECTED_TOTAL, "constellation" => label.clone()).increment(rejected as u64);
        counter!(ORBITS_INSERTED_TOTAL, "constellation" => label.clone()).increment(inserted as u64);
        histogram!(INGEST_DURATION_SECONDS, "constellation" => label).record(duration.as_secs_f64());
    }

    /// Record a file skipped as already ingested
    pub fn record_file_skipped(&self, constellation: &str) {
        counter!(FILES_SKIPPED_TOTAL, "constellation" => constellation.to_string()).increment(1);
    }

    /// Record a failed file, labelled by error kind
    pub fn record_file_failed(&self, constellation: &str, kind: &'static str) {
        counter!(FILES_FAILED_TOTAL, "constellation" => constellation.to_string(), "kind" => kind).increment(1);
    }
}
