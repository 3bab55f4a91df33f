use regex::Regex;

use crate::error::{IngestError, Result};

/// Minimum length of a TLE data line, checksum column included
pub const TLE_LINE_LEN: usize = 69;

/// Longest accepted constellation name
pub const MAX_NAME_LEN: usize = 100;

/// Validation utilities for source entries and TLE lines
#[derive(Debug, Clone)]
pub struct InputValidator {
    data_line: Regex,
}

impl InputValidator {
    /// Compile the line-shape pattern
    pub fn new() -> Result<Self> {
        // Line number, a space, then the five-character catalog number (Alpha-5 allowed).
        let data_line = Regex::new(r"^[12] [0-9A-Z ]{4}[0-9]")
            .map_err(|e| IngestError::Config(format!("Failed to compile TLE line regex: {e}")))?;
        Ok(Self { data_line })
    }

    /// Validate a constellation name
    pub fn validate_constellation_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(IngestError::InvalidSource("Constellation name cannot be empty".to_string()));
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(IngestError::InvalidSource(format!(
                "Constellation name too long (max {MAX_NAME_LEN} characters)"
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(IngestError::InvalidSource(
                "Constellation name contains control characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate the URL a source was fetched from
    pub fn validate_source_url(url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(IngestError::InvalidSource("Source URL cannot be empty".to_string()));
        }

        if url.chars().any(char::is_whitespace) {
            return Err(IngestError::InvalidSource(format!("Source URL contains whitespace: {url}")));
        }

        if !["http://", "https://", "file://"].iter().any(|scheme| url.starts_with(scheme)) {
            return Err(IngestError::InvalidSource(format!("Unsupported source URL scheme: {url}")));
        }

        Ok(())
    }

    /// Check the line number prefix and minimum length of a data line
    pub fn validate_data_line(&self, line: &str, line_number: u8) -> Result<()> {
        if line.len() < TLE_LINE_LEN {
            return Err(IngestError::MalformedRecord(format!(
                "line {line_number} is {} characters, expected at least {TLE_LINE_LEN}",
                line.len()
            )));
        }

        if !self.data_line.is_match(line) || !line.starts_with(char::from(b'0' + line_number)) {
            return Err(IngestError::MalformedRecord(format!(
                "line {line_number} does not start with `{line_number} <catalog number>`"
            )));
        }

        Ok(())
    }

    /// Modulo-10 checksum over the first 68 columns: digits count their value, `-` counts one
    #[must_use]
    pub fn tle_checksum(line: &str) -> u32 {
        line.bytes()
            .take(TLE_LINE_LEN - 1)
            .map(|b| match b {
                b'0'..=b'9' => u32::from(b - b'0'),
                b'-' => 1,
                _ => 0,
            })
            .sum::<u32>()
            % 10
    }

    /// Compare the computed checksum against column 69
    pub fn verify_checksum(line: &str, line_number: u8) -> Result<()> {
        let expected = line
            .as_bytes()
            .get(TLE_LINE_LEN - 1)
            .filter(|b| b.is_ascii_digit())
            .map(|b| u32::from(b - b'0'))
            .ok_or_else(|| {
                IngestError::MalformedRecord(format!("line {line_number} has no checksum digit"))
            })?;

        let actual = Self::tle_checksum(line);
        if actual != expected {
            return Err(IngestError::MalformedRecord(format!(
                "line {line_number} checksum mismatch: computed {actual}, found {expected}"
            )));
        }

        Ok(())
    }
}
