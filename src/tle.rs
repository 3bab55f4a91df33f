//! Fixed-column parsing of three-line TLE records.
//!
//! Column positions follow the NORAD two-line format and are 1-indexed,
//! inclusive, exactly as they are usually documented.

use std::str::FromStr;

use tracing::debug;

use crate::epoch::decode_epoch;
use crate::error::{IngestError, Result};
use crate::models::{FieldPolicy, TleRecord};
use crate::validation::InputValidator;

/// A fixed-width field of one of the two data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name used in error reports
    pub name: &'static str,
    /// First column, 1-indexed
    pub start: usize,
    /// Last column, 1-indexed and inclusive
    pub end: usize,
}

impl Column {
    const fn new(name: &'static str, start: usize, end: usize) -> Self {
        Self { name, start, end }
    }

    /// Raw, whitespace-trimmed content; empty when the line is too short.
    #[must_use]
    pub fn extract<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.start - 1..self.end).map_or("", str::trim)
    }
}

/// Line 1, columns 3-7
pub const CATALOG_NUMBER: Column = Column::new("catalog_number", 3, 7);
/// Line 1, columns 19-32
pub const EPOCH: Column = Column::new("epoch", 19, 32);
/// Line 1, columns 65-68
pub const ELEMENT_SET_NUMBER: Column = Column::new("element_set_number", 65, 68);
/// Line 2, columns 9-16
pub const INCLINATION: Column = Column::new("inclination", 9, 16);
/// Line 2, columns 18-25
pub const RAAN: Column = Column::new("raan", 18, 25);
/// Line 2, columns 53-63
pub const MEAN_MOTION: Column = Column::new("mean_motion", 53, 63);

/// Options controlling how strictly records are parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Handling of unparseable numeric fields
    pub policy: FieldPolicy,
    /// Reject data lines whose modulo-10 checksum does not match
    pub verify_checksum: bool,
}

/// A record that could not be turned into a [`TleRecord`]
#[derive(Debug)]
pub struct RejectedRecord {
    /// Zero-based index of the three-line group in the file
    pub index: usize,
    /// Trimmed title line, for reporting
    pub title: String,
    /// Why the record was rejected
    pub error: IngestError,
}

/// Result of parsing a whole TLE file
#[derive(Debug, Default)]
pub struct ParsedFile {
    /// Successfully parsed records, in file order
    pub records: Vec<TleRecord>,
    /// Records rejected individually
    pub rejected: Vec<RejectedRecord>,
    /// Trailing lines that did not form a complete group
    pub discarded_lines: usize,
}

/// Split raw file content into complete three-line groups.
///
/// Returns the groups and the number of trailing lines that were dropped.
/// A `\r` before each line break is treated as part of the terminator.
/// Lines stay as bytes so an encoding error can be charged to one record.
#[must_use]
pub fn split_records(content: &[u8]) -> (Vec<[&[u8]; 3]>, usize) {
    let lines: Vec<&[u8]> = content
        .split_inclusive(|&byte| byte == b'\n')
        .map(|line| match line {
            [rest @ .., b'\r', b'\n'] | [rest @ .., b'\n'] => rest,
            _ => line,
        })
        .collect();
    let groups = lines
        .chunks_exact(3)
        .map(|group| [group[0], group[1], group[2]])
        .collect();
    (groups, lines.len() % 3)
}

fn decode_lines(group: [&[u8]; 3]) -> Result<[&str; 3]> {
    let mut lines = [""; 3];
    for (number, (line, raw)) in lines.iter_mut().zip(group).enumerate() {
        *line = std::str::from_utf8(raw)
            .map_err(|err| IngestError::MalformedRecord(format!("line {number} is not valid UTF-8: {err}")))?;
    }
    Ok(lines)
}

/// Decode a catalog number, accepting the Alpha-5 extension (`A0001` = 100001).
#[must_use]
pub fn decode_catalog_number(raw: &str) -> Option<u32> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    if first.is_ascii_digit() {
        return raw.parse().ok();
    }

    // Alpha-5 skips I and O to avoid confusion with 1 and 0.
    let letter = first.to_ascii_uppercase();
    let offset = match letter {
        'A'..='H' => u32::from(letter) - u32::from('A'),
        'J'..='N' => u32::from(letter) - u32::from('A') - 1,
        'P'..='Z' => u32::from(letter) - u32::from('A') - 2,
        _ => return None,
    };
    let rest = chars.as_str();
    if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((10 + offset) * 10_000 + rest.parse::<u32>().ok()?)
}

/// Parser for TLE records and files
#[derive(Debug, Clone)]
pub struct TleParser {
    options: ParseOptions,
    validator: InputValidator,
}

impl TleParser {
    /// Create a parser with the given options
    pub fn new(options: ParseOptions) -> Result<Self> {
        Ok(Self { options, validator: InputValidator::new()? })
    }

    /// Options this parser was built with
    #[must_use]
    pub const fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse one record from its title line and two data lines.
    ///
    /// The catalog number is never zero-filled: it is the satellite's
    /// identity, and a substituted zero would merge unrelated satellites.
    pub fn parse_record(&self, line0: &str, line1: &str, line2: &str) -> Result<TleRecord> {
        if self.options.policy == FieldPolicy::Strict {
            self.validator.validate_data_line(line1, 1)?;
            self.validator.validate_data_line(line2, 2)?;
        }
        if self.options.verify_checksum {
            InputValidator::verify_checksum(line1, 1)?;
            InputValidator::verify_checksum(line2, 2)?;
        }

        let raw_catalog = CATALOG_NUMBER.extract(line1);
        let catalog_number = decode_catalog_number(raw_catalog).ok_or_else(|| IngestError::MalformedField {
            field: CATALOG_NUMBER.name,
            value: raw_catalog.to_string(),
        })?;

        Ok(TleRecord {
            line0: line0.trim().to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            catalog_number,
            epoch: decode_epoch(EPOCH.extract(line1), self.options.policy)?,
            inclination_deg: self.float_field(line2, INCLINATION)?,
            raan_deg: self.float_field(line2, RAAN)?,
            mean_motion: self.float_field(line2, MEAN_MOTION)?,
            element_set_number: self.field(line1, ELEMENT_SET_NUMBER)?,
        })
    }

    /// Parse every complete three-line group of a file.
    ///
    /// Rejected records are collected rather than aborting the file.
    #[must_use]
    pub fn parse_file(&self, content: &str) -> ParsedFile {
        self.parse_bytes(content.as_bytes())
    }

    /// Parse raw file bytes.
    ///
    /// A line that is not valid UTF-8 rejects its own record only.
    #[must_use]
    pub fn parse_bytes(&self, content: &[u8]) -> ParsedFile {
        let (groups, discarded_lines) = split_records(content);
        if discarded_lines > 0 {
            debug!(discarded_lines, "Discarding trailing partial TLE group");
        }

        let mut parsed = ParsedFile { discarded_lines, ..ParsedFile::default() };
        for (index, group) in groups.into_iter().enumerate() {
            let result =
                decode_lines(group).and_then(|[line0, line1, line2]| self.parse_record(line0, line1, line2));
            match result {
                Ok(record) => parsed.records.push(record),
                Err(error) => parsed.rejected.push(RejectedRecord {
                    index,
                    title: String::from_utf8_lossy(group[0]).trim().to_string(),
                    error,
                }),
            }
        }
        parsed
    }

    fn field<T: FromStr + Default>(&self, line: &str, column: Column) -> Result<T> {
        let raw = column.extract(line);
        self.options.policy.resolve(raw.parse().ok(), || IngestError::MalformedField {
            field: column.name,
            value: raw.to_string(),
        })
    }

    fn float_field(&self, line: &str, column: Column) -> Result<f64> {
        let raw = column.extract(line);
        self.options.policy.resolve(
            raw.parse::<f64>().ok().filter(|value| value.is_finite()),
            || IngestError::MalformedField { field: column.name, value: raw.to_string() },
        )
    }
}
