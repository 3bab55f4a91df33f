#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use tle_ingest::db::Database;
use tle_ingest::ingest::{Clock, IngestCoordinator};
use tle_ingest::models::FieldPolicy;
use tle_ingest::orbit::CentralBody;
use tle_ingest::tle::{ParseOptions, TleParser};
use tle_ingest::validation::InputValidator;

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap())
}

/// One three-line record with correct columns and checksums
pub fn tle_record(title: &str, catalog_number: u32, epoch: &str, inclination: f64, mean_motion: f64) -> String {
    let body1 = format!("1 {catalog_number:05}U 19074A   {epoch}  .00024213  00000+0  16238-2 0  999");
    let body2 = format!(
        "2 {catalog_number:05} {inclination:8.4} {:8.4} 0001443  97.6224 213.8633 {mean_motion:11.8}    1",
        136.2602
    );
    let line1 = format!("{body1}{}", InputValidator::tle_checksum(&body1));
    let line2 = format!("{body2}{}", InputValidator::tle_checksum(&body2));
    format!("{title}\n{line1}\n{line2}\n")
}

/// A small Starlink-like file with three satellites
pub fn starlink_file(epoch: &str) -> String {
    [
        tle_record("STARLINK-1007", 44713, epoch, 53.0505, 15.063_419_72),
        tle_record("STARLINK-1008", 44714, epoch, 53.0536, 15.063_389_86),
        tle_record("STARLINK-1009", 44715, epoch, 53.0541, 15.063_402_11),
    ]
    .concat()
}

pub fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = Database::new(dir.path().join("tle.db").to_str().unwrap()).expect("Failed to create database");
    (dir, db)
}

pub fn parser(policy: FieldPolicy) -> TleParser {
    TleParser::new(ParseOptions { policy, verify_checksum: true }).unwrap()
}

pub fn coordinator(db: Database) -> IngestCoordinator<Database, FixedClock> {
    IngestCoordinator::with_clock(db, parser(FieldPolicy::ZeroFill), CentralBody::EARTH, fixed_clock())
}
