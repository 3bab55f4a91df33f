//! TLE Ingest - Orbital Element Parsing and Storage
//!
//! A Rust library for turning raw Two-Line Element files, as published per
//! constellation by satellite catalogs, into a deduplicated history of orbit
//! snapshots in SQLite.
//!
//! # Features
//!
//! - Fixed-column TLE parsing with a configurable malformed-field policy
//! - Epoch decoding with the two-digit year pivot
//! - Period and altitude derivation from mean motion
//! - Content-hash deduplication of source files
//! - All-or-nothing transactional ingestion per file

/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// TLE epoch decoding
pub mod epoch;
/// Error types
pub mod error;
/// Content fingerprints of source files
pub mod fingerprint;
/// Per-file ingestion coordinator
pub mod ingest;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Orbit derivation
pub mod orbit;
/// Store traits used by the coordinator
pub mod repository;
/// Database schema definitions
pub mod schema;
/// Manifest-driven ingestion runs
pub mod service;
/// TLE record parsing
pub mod tle;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use error::{IngestError, Result};
pub use ingest::{IngestCoordinator, IngestOutcome, IngestReport};
pub use models::{FieldPolicy, SourceEntry, TleRecord};
pub use orbit::{CentralBody, DerivedOrbit};
pub use service::{IngestService, RunSummary};
pub use tle::{ParseOptions, TleParser};
