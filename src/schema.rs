//! Database schema definitions
//!
//! Constants for table and column names used with rusqlite. The DDL itself
//! lives under `migrations/`.

/// Constellations table schema
pub mod constellations {
    /// Table name
    pub const TABLE: &str = "constellations";
    /// Primary key column
    pub const ID: &str = "id";
    /// Unique constellation name column
    pub const NAME: &str = "name";
}

/// Satellites table schema
pub mod satellites {
    /// Table name
    pub const TABLE: &str = "satellites";
    /// SATCAT catalog number, primary key
    pub const CATALOG_NUMBER: &str = "catalog_number";
    /// Foreign key to constellations table
    pub const CONSTELLATION_ID: &str = "constellation_id";
    /// Launch date column
    pub const LAUNCH_DATE: &str = "launch_date";
}

/// Orbit snapshots table schema
pub mod satellite_orbits {
    /// Table name
    pub const TABLE: &str = "satellite_orbits";
    /// Primary key column
    pub const ID: &str = "id";
    /// Foreign key to satellites table
    pub const CATALOG_NUMBER: &str = "catalog_number";
    /// Title line column
    pub const TLE_LINE0: &str = "tle_line0";
    /// First data line column
    pub const TLE_LINE1: &str = "tle_line1";
    /// Second data line column
    pub const TLE_LINE2: &str = "tle_line2";
    /// Element set epoch column
    pub const EPOCH: &str = "epoch";
    /// Inclination column (degrees)
    pub const INCLINATION_DEG: &str = "inclination_deg";
    /// RAAN column (degrees)
    pub const RAAN_DEG: &str = "raan_deg";
    /// Derived altitude column (km)
    pub const ALTITUDE_KM: &str = "altitude_km";
    /// Derived period column (seconds)
    pub const PERIOD_S: &str = "period_s";
    /// Mean motion column (rev/day)
    pub const MEAN_MOTION: &str = "mean_motion";
    /// Element set number column
    pub const ELEMENT_SET_NUMBER: &str = "element_set_number";
    /// Source file content hash column
    pub const FILE_HASH: &str = "file_hash";
    /// Source URL column
    pub const SOURCE_URL: &str = "source_url";
    /// Ingestion timestamp column
    pub const INGESTED_AT: &str = "ingested_at";
}
