//! Candidate column schema (the `--format` string).

use crate::error::{OptionExt, Result, StitchError};

/// Default column layout for candidate records.
pub const DEFAULT_FORMAT: &str = "no,i,j,lon,lat";

/// Split a line into tokens separated by any run of commas or whitespace.
pub fn split_tokens(line: &str) -> Vec<String> {
    line.split(|c: char| matches!(c, ',' | ' ' | '\t' | '\n' | '\r'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered list of candidate column names with the positions of the
/// mandatory `lat` and `lon` columns resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSchema {
    raw: String,
    columns: Vec<String>,
    lat_index: usize,
    lon_index: usize,
}

impl FormatSchema {
    /// Parse a schema string such as `no,i,j,lon,lat`.
    ///
    /// When a name appears more than once, the last occurrence wins.
    pub fn parse(format: &str) -> Result<Self> {
        let columns = split_tokens(format);
        if columns.is_empty() {
            return Err(StitchError::config("No format specified"));
        }

        let lat_index = columns
            .iter()
            .rposition(|c| c == "lat")
            .ok_or_config("Latitude \"lat\" must be specified in format")?;
        let lon_index = columns
            .iter()
            .rposition(|c| c == "lon")
            .ok_or_config("Longitude \"lon\" must be specified in format")?;

        Ok(Self {
            raw: format.to_string(),
            columns,
            lat_index,
            lon_index,
        })
    }

    /// The schema string exactly as supplied (used in the `visit` header).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn lat_index(&self) -> usize {
        self.lat_index
    }

    pub fn lon_index(&self) -> usize {
        self.lon_index
    }
}

impl Default for FormatSchema {
    fn default() -> Self {
        Self {
            raw: DEFAULT_FORMAT.to_string(),
            columns: split_tokens(DEFAULT_FORMAT),
            lat_index: 4,
            lon_index: 3,
        }
    }
}
