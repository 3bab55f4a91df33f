//! Data models for TLE ingestion and storage
//!
//! This module contains the parsed element records, the source descriptions
//! handed over by the catalog scraper, and the database row types.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// How unparseable numeric fields in a TLE record are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
    /// Substitute zero for the field and keep the record
    #[default]
    ZeroFill,
    /// Reject the record with a `MalformedField` error
    Strict,
}

impl FieldPolicy {
    /// Parse the configuration spelling of a policy
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "zero_fill" | "zero-fill" | "tolerant" => Some(Self::ZeroFill),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    /// Configuration spelling of this policy
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroFill => "zero_fill",
            Self::Strict => "strict",
        }
    }

    /// Resolve a parse attempt: keep the value, zero-fill it, or reject.
    pub fn resolve<T: Default>(
        self,
        parsed: Option<T>,
        on_error: impl FnOnce() -> IngestError,
    ) -> Result<T> {
        match (parsed, self) {
            (Some(value), _) => Ok(value),
            (None, Self::ZeroFill) => Ok(T::default()),
            (None, Self::Strict) => Err(on_error()),
        }
    }
}

/// One entry of the catalog listing: a constellation and where its TLE file came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Constellation name
    pub name: String,
    /// URL the TLE file was downloaded from
    pub url: String,
    /// Local copy of the downloaded file (optional, defaults to `<tle_dir>/<name>.txt`)
    #[serde(default, deserialize_with = "empty_path_as_none")]
    pub file: Option<PathBuf>,
}

fn empty_path_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).map(PathBuf::from))
}

/// Orbital elements extracted from one three-line TLE record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TleRecord {
    /// Title line, trimmed
    pub line0: String,
    /// First data line, verbatim
    pub line1: String,
    /// Second data line, verbatim
    pub line2: String,
    /// SATCAT catalog number
    pub catalog_number: u32,
    /// Epoch of the element set
    pub epoch: DateTime<Utc>,
    /// Inclination in degrees
    pub inclination_deg: f64,
    /// Right ascension of the ascending node in degrees
    pub raan_deg: f64,
    /// Mean motion in revolutions per day
    pub mean_motion: f64,
    /// Element set number
    pub element_set_number: u32,
}

/// Database representation of a constellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbConstellation {
    /// Database primary key
    pub id: i64,
    /// Unique constellation name
    pub name: String,
}

/// Database representation of a satellite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbSatellite {
    /// SATCAT catalog number (primary key)
    pub catalog_number: u32,
    /// Foreign key to the owning constellation
    pub constellation_id: i64,
    /// Launch date, when known
    pub launch_date: Option<NaiveDate>,
}

/// Database representation of an orbit snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbSatelliteOrbit {
    /// Database primary key
    pub id: i64,
    /// Foreign key to the satellite
    pub catalog_number: u32,
    /// Title line
    pub tle_line0: String,
    /// First data line
    pub tle_line1: String,
    /// Second data line
    pub tle_line2: String,
    /// Epoch of the element set
    pub epoch: DateTime<Utc>,
    /// Inclination in degrees
    pub inclination_deg: f32,
    /// RAAN in degrees
    pub raan_deg: f32,
    /// Derived altitude in km
    pub altitude_km: f32,
    /// Derived period in seconds
    pub period_s: f32,
    /// Mean motion in revolutions per day
    pub mean_motion: f32,
    /// Element set number
    pub element_set_number: u32,
    /// SHA-256 of the source file
    pub file_hash: String,
    /// Source URL of the file
    pub source_url: String,
    /// When the row was written
    pub ingested_at: DateTime<Utc>,
}

/// Data for inserting a new orbit snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct NewSatelliteOrbit {
    /// Foreign key to the satellite
    pub catalog_number: u32,
    /// Title line
    pub tle_line0: String,
    /// First data line
    pub tle_line1: String,
    /// Second data line
    pub tle_line2: String,
    /// Epoch of the element set
    pub epoch: DateTime<Utc>,
    /// Inclination in degrees
    pub inclination_deg: f32,
    /// RAAN in degrees
    pub raan_deg: f32,
    /// Derived altitude in km
    pub altitude_km: f32,
    /// Derived period in seconds
    pub period_s: f32,
    /// Mean motion in revolutions per day
    pub mean_motion: f32,
    /// Element set number
    pub element_set_number: u32,
    /// SHA-256 of the source file
    pub file_hash: String,
    /// Source URL of the file
    pub source_url: String,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
}

/// Row counts across the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of constellations
    pub constellations: usize,
    /// Number of satellites
    pub satellites: usize,
    /// Number of orbit snapshots
    pub orbits: usize,
    /// Number of distinct source files ingested
    pub source_files: usize,
}
