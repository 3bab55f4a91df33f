use std::fs;
use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{DbConstellation, DbSatellite, DbSatelliteOrbit, NewSatelliteOrbit, StoreStats};
use crate::repository::{OrbitStore, OrbitWriter, SatelliteUpsert};
use crate::schema::{constellations, satellite_orbits, satellites};

// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Strip an optional `sqlite:` / `sqlite://` scheme from a database URL
#[must_use]
pub fn database_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

/// Database manager for handling connections and operations
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (and migrate) the database at `database_url` with default pool settings
    pub fn new(database_url: &str) -> Result<Self> {
        Self::with_config(&DatabaseConfig { path: database_url.to_string(), ..DatabaseConfig::default() })
    }

    /// Open (and migrate) the database described by `config`
    pub fn with_config(config: &DatabaseConfig) -> Result<Self> {
        let path = Path::new(database_path(&config.path));

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Foreign keys are a per-connection setting in SQLite
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;"));
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .build(manager)?;

        let conn = pool.get()?;
        Self::run_migrations(&conn)?;
        info!(path = %path.display(), "Database ready");

        Ok(Self { pool })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("../migrations/2026-10-16-000000_create_tables/up.sql"))?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Get a constellation by name
    pub fn get_constellation(&self, name: &str) -> Result<Option<DbConstellation>> {
        let conn = self.get_connection()?;

        let constellation = conn
            .query_row(
                &format!("SELECT * FROM {} WHERE {} = ?", constellations::TABLE, constellations::NAME),
                params![name],
                map_db_constellation,
            )
            .optional()?;

        Ok(constellation)
    }

    /// Get a satellite by catalog number
    pub fn get_satellite(&self, catalog_number: u32) -> Result<Option<DbSatellite>> {
        let conn = self.get_connection()?;

        let satellite = conn
            .query_row(
                &format!("SELECT * FROM {} WHERE {} = ?", satellites::TABLE, satellites::CATALOG_NUMBER),
                params![catalog_number],
                map_db_satellite,
            )
            .optional()?;

        Ok(satellite)
    }

    /// All orbit snapshots of one satellite, oldest epoch first
    pub fn get_orbit_history(&self, catalog_number: u32) -> Result<Vec<DbSatelliteOrbit>> {
        self.query_orbits(
            &format!(
                "SELECT * FROM {} WHERE {} = ? ORDER BY {} ASC, {} ASC",
                satellite_orbits::TABLE,
                satellite_orbits::CATALOG_NUMBER,
                satellite_orbits::EPOCH,
                satellite_orbits::ID
            ),
            params![catalog_number],
        )
    }

    /// All orbit snapshots ingested from one source file
    pub fn get_orbits_by_file_hash(&self, file_hash: &str) -> Result<Vec<DbSatelliteOrbit>> {
        self.query_orbits(
            &format!(
                "SELECT * FROM {} WHERE {} = ? ORDER BY {} ASC",
                satellite_orbits::TABLE,
                satellite_orbits::FILE_HASH,
                satellite_orbits::ID
            ),
            params![file_hash],
        )
    }

    fn query_orbits(&self, query: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<DbSatelliteOrbit>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(query)?;
        let orbit_iter = stmt.query_map(params, map_db_orbit)?;

        let mut results = Vec::new();
        for orbit in orbit_iter {
            results.push(orbit?);
        }

        Ok(results)
    }

    /// Row counts across the store
    pub fn get_stats(&self) -> Result<StoreStats> {
        let conn = self.get_connection()?;

        let count = |query: String| -> Result<usize> {
            let n: i64 = conn.query_row(&query, params![], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or_default())
        };

        Ok(StoreStats {
            constellations: count(format!("SELECT COUNT(*) FROM {}", constellations::TABLE))?,
            satellites: count(format!("SELECT COUNT(*) FROM {}", satellites::TABLE))?,
            orbits: count(format!("SELECT COUNT(*) FROM {}", satellite_orbits::TABLE))?,
            source_files: count(format!(
                "SELECT COUNT(DISTINCT {}) FROM {}",
                satellite_orbits::FILE_HASH,
                satellite_orbits::TABLE
            ))?,
        })
    }
}

impl OrbitStore for Database {
    fn contains_file_hash(&self, file_hash: &str) -> Result<bool> {
        let conn = self.get_connection()?;

        let exists: bool = conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
                satellite_orbits::TABLE,
                satellite_orbits::FILE_HASH
            ),
            params![file_hash],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut dyn OrbitWriter) -> Result<T>,
    {
        let mut conn = self.get_connection()?;
        // IMMEDIATE takes the write lock up front so concurrent writers wait on
        // busy_timeout instead of failing a SHARED -> RESERVED upgrade.
        let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Dropping `tx` on the error path rolls it back.
        let value = work(&mut tx)?;
        tx.commit()?;

        Ok(value)
    }
}

impl OrbitWriter for Transaction<'_> {
    fn upsert_constellation(&mut self, name: &str) -> Result<i64> {
        let existing: Option<i64> = self
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?",
                    constellations::ID,
                    constellations::TABLE,
                    constellations::NAME
                ),
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            debug!(constellation = name, id, "Constellation exists");
            return Ok(id);
        }

        self.execute(
            &format!("INSERT INTO {} ({}) VALUES (?)", constellations::TABLE, constellations::NAME),
            params![name],
        )?;
        let id = self.last_insert_rowid();
        info!(constellation = name, id, "Created constellation");

        Ok(id)
    }

    fn upsert_satellite(&mut self, catalog_number: u32, constellation_id: i64) -> Result<SatelliteUpsert> {
        let existing: Option<i64> = self
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?",
                    satellites::CONSTELLATION_ID,
                    satellites::TABLE,
                    satellites::CATALOG_NUMBER
                ),
                params![catalog_number],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(constellation_id) = existing {
            return Ok(SatelliteUpsert::Existing { constellation_id });
        }

        self.execute(
            &format!(
                "INSERT INTO {} ({}, {}) VALUES (?, ?)",
                satellites::TABLE,
                satellites::CATALOG_NUMBER,
                satellites::CONSTELLATION_ID
            ),
            params![catalog_number, constellation_id],
        )?;

        Ok(SatelliteUpsert::Inserted)
    }

    fn insert_orbit(&mut self, orbit: &NewSatelliteOrbit) -> Result<i64> {
        self.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                satellite_orbits::TABLE,
                satellite_orbits::CATALOG_NUMBER,
                satellite_orbits::TLE_LINE0,
                satellite_orbits::TLE_LINE1,
                satellite_orbits::TLE_LINE2,
                satellite_orbits::EPOCH,
                satellite_orbits::INCLINATION_DEG,
                satellite_orbits::RAAN_DEG,
                satellite_orbits::ALTITUDE_KM,
                satellite_orbits::PERIOD_S,
                satellite_orbits::MEAN_MOTION,
                satellite_orbits::ELEMENT_SET_NUMBER,
                satellite_orbits::FILE_HASH,
                satellite_orbits::SOURCE_URL,
                satellite_orbits::INGESTED_AT
            ),
            params![
                orbit.catalog_number,
                orbit.tle_line0,
                orbit.tle_line1,
                orbit.tle_line2,
                orbit.epoch,
                orbit.inclination_deg,
                orbit.raan_deg,
                orbit.altitude_km,
                orbit.period_s,
                orbit.mean_motion,
                orbit.element_set_number,
                orbit.file_hash,
                orbit.source_url,
                orbit.ingested_at
            ],
        )?;

        Ok(self.last_insert_rowid())
    }
}

/// Map a database row to a `DbConstellation`
fn map_db_constellation(row: &Row) -> rusqlite::Result<DbConstellation> {
    Ok(DbConstellation { id: row.get(constellations::ID)?, name: row.get(constellations::NAME)? })
}

/// Map a database row to a `DbSatellite`
fn map_db_satellite(row: &Row) -> rusqlite::Result<DbSatellite> {
    Ok(DbSatellite {
        catalog_number: row.get(satellites::CATALOG_NUMBER)?,
        constellation_id: row.get(satellites::CONSTELLATION_ID)?,
        launch_date: row.get(satellites::LAUNCH_DATE)?,
    })
}

/// Map a database row to a `DbSatelliteOrbit`
fn map_db_orbit(row: &Row) -> rusqlite::Result<DbSatelliteOrbit> {
    Ok(DbSatelliteOrbit {
        id: row.get(satellite_orbits::ID)?,
        catalog_number: row.get(satellite_orbits::CATALOG_NUMBER)?,
        tle_line0: row.get(satellite_orbits::TLE_LINE0)?,
        tle_line1: row.get(satellite_orbits::TLE_LINE1)?,
        tle_line2: row.get(satellite_orbits::TLE_LINE2)?,
        epoch: row.get(satellite_orbits::EPOCH)?,
        inclination_deg: row.get(satellite_orbits::INCLINATION_DEG)?,
        raan_deg: row.get(satellite_orbits::RAAN_DEG)?,
        altitude_km: row.get(satellite_orbits::ALTITUDE_KM)?,
        period_s: row.get(satellite_orbits::PERIOD_S)?,
        mean_motion: row.get(satellite_orbits::MEAN_MOTION)?,
        element_set_number: row.get(satellite_orbits::ELEMENT_SET_NUMBER)?,
        file_hash: row.get(satellite_orbits::FILE_HASH)?,
        source_url: row.get(satellite_orbits::SOURCE_URL)?,
        ingested_at: row.get(satellite_orbits::INGESTED_AT)?,
    })
}
