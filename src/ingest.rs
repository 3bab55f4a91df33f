//! Ingestion coordinator.
//!
//! Drives one constellation's raw TLE file into the store exactly once per
//! distinct file content: fingerprint, skip if already stored, parse, then
//! upsert the constellation and its satellites and append one orbit snapshot
//! per record inside a single transaction.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{IngestError, Result};
use crate::fingerprint::fingerprint;
use crate::logging::OperationTimer;
use crate::metrics::IngestMetrics;
use crate::models::{NewSatelliteOrbit, TleRecord};
use crate::orbit::{CentralBody, DerivedOrbit};
use crate::repository::{OrbitStore, SatelliteUpsert};
use crate::tle::TleParser;
use crate::validation::InputValidator;

/// Source of ingestion timestamps
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Counts describing one completed file ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Id of the (possibly pre-existing) constellation
    pub constellation_id: i64,
    /// Fingerprint of the ingested file
    pub file_hash: String,
    /// Records that parsed successfully
    pub records_parsed: usize,
    /// Orbit snapshots written
    pub orbits_inserted: usize,
    /// Satellites seen for the first time
    pub new_satellites: usize,
    /// Records rejected individually
    pub rejected_records: usize,
    /// Trailing lines that did not form a complete record
    pub discarded_lines: usize,
}

/// Result of offering one source file to the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IngestOutcome {
    /// The file was new and its snapshots were committed
    Ingested(IngestReport),
    /// The file's fingerprint was already stored; nothing was written
    Duplicate {
        /// Fingerprint of the skipped file
        file_hash: String,
    },
}

/// Coordinates parsing, derivation and transactional writes for source files
#[derive(Debug, Clone)]
pub struct IngestCoordinator<S, C = SystemClock> {
    store: S,
    parser: TleParser,
    body: CentralBody,
    clock: C,
    metrics: IngestMetrics,
}

impl<S: OrbitStore> IngestCoordinator<S> {
    /// Create a coordinator that timestamps rows with the wall clock
    pub fn new(store: S, parser: TleParser, body: CentralBody) -> Self {
        Self::with_clock(store, parser, body, SystemClock)
    }
}

impl<S: OrbitStore, C: Clock> IngestCoordinator<S, C> {
    /// Create a coordinator with an explicit clock
    pub fn with_clock(store: S, parser: TleParser, body: CentralBody, clock: C) -> Self {
        Self { store, parser, body, clock, metrics: IngestMetrics }
    }

    /// The underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Ingest one constellation's raw TLE file.
    ///
    /// Callers must not ingest the same constellation name concurrently.
    pub fn ingest(&self, name: &str, source_url: &str, content: &[u8]) -> Result<IngestOutcome> {
        let result = self.ingest_file(name, source_url, content);
        if let Err(err) = &result {
            self.metrics.record_file_failed(name, err.kind());
        }
        result
    }

    fn ingest_file(&self, name: &str, source_url: &str, content: &[u8]) -> Result<IngestOutcome> {
        InputValidator::validate_constellation_name(name)?;
        let timer = OperationTimer::new("ingest_file");

        let file_hash = fingerprint(content);
        if self.store.contains_file_hash(&file_hash)? {
            info!(constellation = name, file_hash = %file_hash, "Source unchanged, skipping");
            self.metrics.record_file_skipped(name);
            return Ok(IngestOutcome::Duplicate { file_hash });
        }

        let parsed = self.parser.parse_bytes(content);
        for rejected in &parsed.rejected {
            warn!(
                constellation = name,
                record = rejected.index,
                title = %rejected.title,
                error = %rejected.error,
                "Rejected TLE record"
            );
        }

        let records_parsed = parsed.records.len();
        let ingested_at = self.clock.now();
        let orbits = self.prepare_orbits(name, parsed.records, &file_hash, source_url, ingested_at);
        let rejected_records = parsed.rejected.len() + records_parsed - orbits.len();

        let (constellation_id, new_satellites) = self.store.transaction(|writer| {
            let constellation_id = writer.upsert_constellation(name)?;
            let mut new_satellites = 0;

            for orbit in &orbits {
                match writer.upsert_satellite(orbit.catalog_number, constellation_id)? {
                    SatelliteUpsert::Inserted => new_satellites += 1,
                    SatelliteUpsert::Existing { constellation_id: owner } if owner != constellation_id => {
                        warn!(
                            constellation = name,
                            catalog_number = orbit.catalog_number,
                            owner,
                            "Satellite belongs to another constellation, keeping original owner"
                        );
                    }
                    SatelliteUpsert::Existing { .. } => {}
                }
                writer.insert_orbit(orbit)?;
            }

            Ok((constellation_id, new_satellites))
        })?;

        let report = IngestReport {
            constellation_id,
            file_hash,
            records_parsed,
            orbits_inserted: orbits.len(),
            new_satellites,
            rejected_records,
            discarded_lines: parsed.discarded_lines,
        };

        let duration = timer.finish();
        self.metrics.record_file_ingested(
            name,
            report.records_parsed,
            report.rejected_records,
            report.orbits_inserted,
            duration,
        );
        info!(
            constellation = name,
            file_hash = %report.file_hash,
            orbits = report.orbits_inserted,
            new_satellites = report.new_satellites,
            rejected = report.rejected_records,
            "Ingested source"
        );

        Ok(IngestOutcome::Ingested(report))
    }

    /// Derive orbits and build snapshot rows; records that cannot be stored are reported and dropped.
    fn prepare_orbits(
        &self,
        name: &str,
        records: Vec<TleRecord>,
        file_hash: &str,
        source_url: &str,
        ingested_at: DateTime<Utc>,
    ) -> Vec<NewSatelliteOrbit> {
        let mut seen = HashSet::new();
        let mut orbits = Vec::with_capacity(records.len());

        for record in records {
            // One snapshot per (satellite, file): later repeats lose.
            if !seen.insert(record.catalog_number) {
                let error = IngestError::MalformedRecord(format!(
                    "catalog number {} repeated in file",
                    record.catalog_number
                ));
                warn!(constellation = name, title = %record.line0, error = %error, "Rejected TLE record");
                continue;
            }

            match self.body.derive(record.mean_motion) {
                Ok(derived) => orbits.push(new_orbit(record, derived, file_hash, source_url, ingested_at)),
                Err(error) => {
                    warn!(constellation = name, title = %record.line0, error = %error, "Rejected TLE record");
                }
            }
        }

        orbits
    }
}

fn new_orbit(
    record: TleRecord,
    derived: DerivedOrbit,
    file_hash: &str,
    source_url: &str,
    ingested_at: DateTime<Utc>,
) -> NewSatelliteOrbit {
    NewSatelliteOrbit {
        catalog_number: record.catalog_number,
        tle_line0: record.line0,
        tle_line1: record.line1,
        tle_line2: record.line2,
        epoch: record.epoch,
        inclination_deg: record.inclination_deg as f32,
        raan_deg: record.raan_deg as f32,
        altitude_km: derived.altitude_km as f32,
        period_s: derived.period_s as f32,
        mean_motion: record.mean_motion as f32,
        element_set_number: record.element_set_number,
        file_hash: file_hash.to_string(),
        source_url: source_url.to_string(),
        ingested_at,
    }
}
