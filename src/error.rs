//! Error types for the tle-ingest library.
//!
//! Record-level variants reject a single TLE record and never abort the file
//! it came from. Everything else aborts ingestion of one source file only.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while parsing or ingesting TLE data.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A fixed-column field could not be parsed as the expected numeric type
    #[error("Malformed field `{field}`: {value:?}")]
    MalformedField {
        /// Name of the TLE field
        field: &'static str,
        /// Raw (trimmed) column content
        value: String,
    },

    /// The epoch field could not be decoded
    #[error("Malformed epoch: {0:?}")]
    MalformedEpoch(String),

    /// Structural problem with a record (line numbers, length, checksum)
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Degenerate input to the orbit derivation
    #[error("Invalid orbital elements: {0}")]
    InvalidOrbitalElements(String),

    /// The source name or manifest entry is unusable
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The raw bytes of a source file could not be read
    #[error("Failed to read source file {}: {source}", .path.display())]
    SourceRead {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Database-related errors
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Source manifest could not be read or decoded
    #[error("Manifest error: {0}")]
    Manifest(#[from] csv::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O errors outside of source reading
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking ingestion task panicked or was cancelled
    #[error("Ingestion task failed: {0}")]
    Task(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

impl IngestError {
    /// True for errors that reject a single record rather than a whole file.
    #[must_use]
    pub const fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::MalformedField { .. }
                | Self::MalformedEpoch(_)
                | Self::MalformedRecord(_)
                | Self::InvalidOrbitalElements(_)
        )
    }

    /// Short, stable label for logs and metrics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedField { .. } => "malformed_field",
            Self::MalformedEpoch(_) => "malformed_epoch",
            Self::MalformedRecord(_) => "malformed_record",
            Self::InvalidOrbitalElements(_) => "invalid_orbital_elements",
            Self::InvalidSource(_) => "invalid_source",
            Self::SourceRead { .. } => "source_read",
            Self::Store(_) | Self::Pool(_) => "store",
            Self::Manifest(_) => "manifest",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
            Self::Task(_) => "task",
            Self::Other(_) => "other",
        }
    }

    /// True when retrying the same file may succeed.
    ///
    /// Ingestion is idempotent, so any store-side failure is safe to retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Pool(_) | Self::SourceRead { .. } | Self::Task(_))
    }
}

/// Convenience type alias for Result with `IngestError`
pub type Result<T> = std::result::Result<T, IngestError>;

impl From<anyhow::Error> for IngestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for IngestError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
