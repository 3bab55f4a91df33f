//! Parser and epoch tests, including property checks

mod common;

use chrono::{Datelike, Timelike};
use proptest::prelude::*;

use common::{starlink_file, tle_record};
use tle_ingest::epoch::{decode_epoch, expand_two_digit_year, YEAR_PIVOT};
use tle_ingest::models::FieldPolicy;
use tle_ingest::orbit::CentralBody;
use tle_ingest::tle::{split_records, ParseOptions, TleParser};

fn parser(policy: FieldPolicy) -> TleParser {
    TleParser::new(ParseOptions { policy, verify_checksum: false }).unwrap()
}

#[test]
fn test_parse_iss_reference_record() {
    let record = parser(FieldPolicy::Strict)
        .parse_record(
            "ISS (ZARYA)             ",
            "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
            "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537",
        )
        .unwrap();

    assert_eq!(record.line0, "ISS (ZARYA)");
    assert_eq!(record.catalog_number, 25544);
    assert_eq!(record.element_set_number, 292);
    assert_eq!(record.epoch.year(), 2008);
    assert_eq!(record.epoch.ordinal(), 264);
    assert_eq!((record.epoch.hour(), record.epoch.minute(), record.epoch.second()), (12, 25, 40));
    assert!((record.inclination_deg - 51.6416).abs() < 1e-9);
    assert!((record.raan_deg - 247.4627).abs() < 1e-9);

    let orbit = CentralBody::EARTH.derive(record.mean_motion).unwrap();
    assert!((orbit.period_s - 5495.74).abs() < 0.1);
    assert!((orbit.semi_major_axis_km - 6730.96).abs() < 0.1);
    assert!((orbit.altitude_km - 359.96).abs() < 0.1);
}

#[test]
fn test_parse_file_mixed_validity() {
    let content = format!(
        "{}GARBAGE\nnot a tle line\nstill not\n",
        starlink_file("23053.20743056")
    );

    let parsed = parser(FieldPolicy::Strict).parse_file(&content);
    assert_eq!(parsed.records.len(), 3);
    assert_eq!(parsed.rejected.len(), 1);
    assert_eq!(parsed.rejected[0].index, 3);
    assert_eq!(parsed.rejected[0].title, "GARBAGE");
    assert!(parsed.rejected[0].error.is_record_level());
}

#[test]
fn test_zero_fill_keeps_garbage_record_with_identity() {
    let record = tle_record("ODD", 12345, "23053.20743056", 98.7, 14.2).replace("98.7000", "9?.7000");

    let parsed = parser(FieldPolicy::ZeroFill).parse_file(&record);
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].catalog_number, 12345);
    assert!(parsed.records[0].inclination_deg.abs() < f64::EPSILON);
}

#[test]
fn test_checksum_verification_rejects_corrupted_line() {
    let record = tle_record("STARLINK-1007", 44713, "23053.20743056", 53.0505, 15.063_419_72);
    let corrupted = record.replacen("53.0505", "53.0506", 1);

    let checking = TleParser::new(ParseOptions { policy: FieldPolicy::ZeroFill, verify_checksum: true }).unwrap();
    assert_eq!(checking.parse_file(&record).records.len(), 1);
    assert_eq!(checking.parse_file(&corrupted).rejected.len(), 1);
    assert_eq!(parser(FieldPolicy::ZeroFill).parse_file(&corrupted).records.len(), 1);
}

#[test]
fn test_year_pivot_boundaries() {
    assert_eq!(YEAR_PIVOT, 56);
    assert_eq!(expand_two_digit_year(56), 2056);
    assert_eq!(expand_two_digit_year(57), 1957);
    assert_eq!(expand_two_digit_year(0), 2000);
    assert_eq!(expand_two_digit_year(99), 1999);
}

proptest! {
    #[test]
    fn year_rule_holds_for_every_two_digit_year(yy in 0i32..100, day in 1u32..=365, fraction in 0u32..100_000_000) {
        let field = format!("{yy:02}{day:03}.{fraction:08}");
        let epoch = decode_epoch(&field, FieldPolicy::Strict).unwrap();

        let expected_year = if yy > 56 { 1900 + yy } else { 2000 + yy };
        prop_assert_eq!(epoch.year(), expected_year);
        prop_assert_eq!(epoch.ordinal(), day);
    }

    #[test]
    fn complete_groups_and_leftover_lines(groups in 0usize..20, extra in 0usize..3) {
        let mut content = String::new();
        for i in 0..groups {
            content.push_str(&format!("SAT-{i}\nline one\nline two\n"));
        }
        for i in 0..extra {
            content.push_str(&format!("dangling {i}\n"));
        }

        let (records, discarded) = split_records(content.as_bytes());
        prop_assert_eq!(records.len(), groups);
        prop_assert_eq!(discarded, extra);
    }

    #[test]
    fn every_group_is_parsed_or_rejected(lines in proptest::collection::vec("[ -~]{0,80}", 0..30)) {
        let content: String = lines.iter().map(|line| format!("{line}\n")).collect();
        let parsed = parser(FieldPolicy::ZeroFill).parse_file(&content);
        prop_assert_eq!(parsed.records.len() + parsed.rejected.len(), lines.len() / 3);
    }

    #[test]
    fn derivation_is_consistent_for_positive_mean_motion(mean_motion in 0.5f64..20.0) {
        let orbit = CentralBody::EARTH.derive(mean_motion).unwrap();
        prop_assert!((orbit.period_s * mean_motion - 86_400.0).abs() < 1e-6);
        prop_assert!((orbit.semi_major_axis_km - orbit.altitude_km - 6_371.0).abs() < 1e-9);
    }
}
