//! Store abstraction used by the ingestion coordinator.
//!
//! The coordinator only needs a content-hash lookup, a transaction scope, and
//! three idempotent writes inside it. [`crate::db::Database`] is the SQLite
//! implementation.

use crate::error::Result;
use crate::models::NewSatelliteOrbit;

/// Outcome of an idempotent satellite upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteUpsert {
    /// The satellite did not exist and was inserted
    Inserted,
    /// The satellite already existed; it is never reassigned
    Existing {
        /// Constellation the satellite belongs to
        constellation_id: i64,
    },
}

/// Writes performed inside a single store transaction
pub trait OrbitWriter {
    /// Insert the constellation if absent and return its id either way
    fn upsert_constellation(&mut self, name: &str) -> Result<i64>;

    /// Insert the satellite if absent; an existing satellite is left untouched
    fn upsert_satellite(&mut self, catalog_number: u32, constellation_id: i64) -> Result<SatelliteUpsert>;

    /// Insert one orbit snapshot and return its id
    fn insert_orbit(&mut self, orbit: &NewSatelliteOrbit) -> Result<i64>;
}

/// A relational store with transactional multi-statement writes
pub trait OrbitStore {
    /// True when any orbit snapshot already carries this source fingerprint
    fn contains_file_hash(&self, file_hash: &str) -> Result<bool>;

    /// Run `work` inside one transaction.
    ///
    /// The transaction commits only when `work` returns `Ok`; any error rolls
    /// back every write made through the writer.
    fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut dyn OrbitWriter) -> Result<T>;
}
