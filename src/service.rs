//! Run driver: reads the source manifest and each downloaded TLE file, and
//! feeds them through the coordinator one source at a time.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{IngestError, Result};
use crate::ingest::{Clock, IngestCoordinator, IngestOutcome, SystemClock};
use crate::metrics::IngestMetrics;
use crate::models::SourceEntry;
use crate::repository::OrbitStore;
use crate::validation::InputValidator;

/// A manifest row that could not be decoded into a [`SourceEntry`]
#[derive(Debug)]
pub struct InvalidManifestRow {
    /// 1-based line in the manifest file
    pub line: u64,
    /// Decoding error
    pub error: IngestError,
}

/// Sources listed in a manifest, plus the rows that were skipped
#[derive(Debug, Default)]
pub struct Manifest {
    /// Valid entries in file order
    pub entries: Vec<SourceEntry>,
    /// Rows skipped because they could not be decoded
    pub invalid_rows: Vec<InvalidManifestRow>,
}

/// Read a CSV manifest with header `name,url[,file]`.
///
/// A row that fails to decode is logged and skipped; only an unreadable file
/// is an error.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut manifest = Manifest::default();
    for (index, row) in reader.deserialize::<SourceEntry>().enumerate() {
        match row {
            Ok(entry) => manifest.entries.push(entry),
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err.into()),
            Err(err) => {
                // Line 1 is the header
                let line = err.position().map_or(index as u64 + 2, csv::Position::line);
                warn!(manifest = %path.display(), line, error = %err, "Skipping invalid manifest row");
                manifest.invalid_rows.push(InvalidManifestRow { line, error: err.into() });
            }
        }
    }

    info!(
        manifest = %path.display(),
        sources = manifest.entries.len(),
        invalid_rows = manifest.invalid_rows.len(),
        "Loaded source manifest"
    );
    Ok(manifest)
}

/// Outcome of one manifest entry
#[derive(Debug)]
pub struct SourceResult {
    /// Constellation name
    pub name: String,
    /// Source URL
    pub url: String,
    /// What happened to the file
    pub result: Result<IngestOutcome>,
}

/// Per-source results of a whole run, in manifest order
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One entry per manifest row
    pub results: Vec<SourceResult>,
}

/// Aggregate counts of a run, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunTotals {
    /// Sources whose file was ingested
    pub ingested: usize,
    /// Sources skipped as unchanged
    pub unchanged: usize,
    /// Sources that failed
    pub failed: usize,
    /// Orbit snapshots written across all sources
    pub orbits_inserted: usize,
}

impl RunSummary {
    /// Aggregate counts over every source
    #[must_use]
    pub fn totals(&self) -> RunTotals {
        self.results.iter().fold(RunTotals::default(), |mut totals, source| {
            match &source.result {
                Ok(IngestOutcome::Ingested(report)) => {
                    totals.ingested += 1;
                    totals.orbits_inserted += report.orbits_inserted;
                }
                Ok(IngestOutcome::Duplicate { .. }) => totals.unchanged += 1,
                Err(_) => totals.failed += 1,
            }
            totals
        })
    }

    /// Sources that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &IngestError)> {
        self.results
            .iter()
            .filter_map(|source| source.result.as_ref().err().map(|err| (source.name.as_str(), err)))
    }
}

/// Ingests every source of a manifest, isolating failures per source
pub struct IngestService<S, C = SystemClock> {
    coordinator: Arc<IngestCoordinator<S, C>>,
    tle_directory: PathBuf,
}

impl<S, C> IngestService<S, C>
where
    S: OrbitStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Create a service reading default file locations from `tle_directory`
    pub fn new(coordinator: IngestCoordinator<S, C>, tle_directory: impl Into<PathBuf>) -> Self {
        Self { coordinator: Arc::new(coordinator), tle_directory: tle_directory.into() }
    }

    /// The coordinator driving each file
    #[must_use]
    pub fn coordinator(&self) -> &IngestCoordinator<S, C> {
        &self.coordinator
    }

    /// Where the downloaded file of `entry` lives.
    ///
    /// Relative `file` paths resolve against the TLE directory; without one the
    /// file is `<tle_directory>/<name>.txt`.
    #[must_use]
    pub fn source_path(&self, entry: &SourceEntry) -> PathBuf {
        match &entry.file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => self.tle_directory.join(file),
            None => self.tle_directory.join(format!("{}.txt", entry.name)),
        }
    }

    /// Read one source file and ingest it
    pub async fn ingest_source(&self, entry: &SourceEntry) -> Result<IngestOutcome> {
        let content = match self.read_source(entry).await {
            Ok(content) => content,
            Err(err) => {
                IngestMetrics.record_file_failed(&entry.name, err.kind());
                return Err(err);
            }
        };

        let coordinator = Arc::clone(&self.coordinator);
        let name = entry.name.clone();
        let url = entry.url.trim().to_string();
        tokio::task::spawn_blocking(move || coordinator.ingest(&name, &url, &content)).await?
    }

    async fn read_source(&self, entry: &SourceEntry) -> Result<Vec<u8>> {
        InputValidator::validate_source_url(&entry.url)?;

        let path = self.source_path(entry);
        debug!(constellation = %entry.name, path = %path.display(), "Reading source file");
        tokio::fs::read(&path)
            .await
            .map_err(|source| IngestError::SourceRead { path, source })
    }

    /// Ingest every entry in order; a failing source never stops the others
    pub async fn run(&self, entries: &[SourceEntry]) -> RunSummary {
        let mut summary = RunSummary::default();

        for entry in entries {
            let result = self.ingest_source(entry).await;
            if let Err(err) = &result {
                error!(
                    constellation = %entry.name,
                    url = %entry.url,
                    kind = err.kind(),
                    retryable = err.is_retryable(),
                    error = %err,
                    "Source ingestion failed"
                );
            }
            summary.results.push(SourceResult { name: entry.name.clone(), url: entry.url.clone(), result });
        }

        let totals = summary.totals();
        info!(
            ingested = totals.ingested,
            unchanged = totals.unchanged,
            failed = totals.failed,
            orbits = totals.orbits_inserted,
            "Ingestion run finished"
        );
        summary
    }
}
