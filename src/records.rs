//! Candidate record storage and the line-oriented ingestion boundary.
//!
//! The input stream alternates between a time header line
//! (`day month year count hour`) and `count` candidate lines whose columns
//! follow the [`FormatSchema`]. Blank lines and `#` comments are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::SphericalPoint;
use crate::error::{Result, StitchError};
use crate::geo_utils::to_unit_sphere;
use crate::schema::{FormatSchema, split_tokens};

/// Number of tokens in a time header line.
pub const HEADER_FIELDS: usize = 5;

/// Position of the candidate-count token within a time header.
pub const COUNT_FIELD: usize = 3;

/// Header of one discrete time step: day, month, year, candidate count, hour.
///
/// The raw tokens are retained so output reproduces them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStepHeader {
    tokens: Vec<String>,
    count: usize,
}

impl TimeStepHeader {
    /// Build a header from numeric fields.
    pub fn new(day: u32, month: u32, year: i32, count: usize, hour: u32) -> Self {
        Self {
            tokens: vec![
                day.to_string(),
                month.to_string(),
                year.to_string(),
                count.to_string(),
                hour.to_string(),
            ],
            count,
        }
    }

    /// Parse a header from its tokens.
    ///
    /// Returns a human-readable reason on failure; the caller attaches the
    /// line context.
    fn from_tokens(tokens: Vec<String>) -> std::result::Result<Self, String> {
        if tokens.len() != HEADER_FIELDS {
            return Err(format!(
                "expected {} fields, found {}",
                HEADER_FIELDS,
                tokens.len()
            ));
        }
        let count = tokens[COUNT_FIELD]
            .parse::<usize>()
            .map_err(|_| format!("invalid candidate count \"{}\"", tokens[COUNT_FIELD]))?;
        Ok(Self { tokens, count })
    }

    pub fn day(&self) -> &str {
        &self.tokens[0]
    }

    pub fn month(&self) -> &str {
        &self.tokens[1]
    }

    pub fn year(&self) -> &str {
        &self.tokens[2]
    }

    pub fn hour(&self) -> &str {
        &self.tokens[4]
    }

    /// Declared number of candidates.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Header tokens in input order, excluding the candidate count.
    pub fn date_fields(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != COUNT_FIELD)
            .map(|(_, t)| t.as_str())
    }
}

/// One detected feature: raw string fields in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    fields: Vec<String>,
}

impl CandidateRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Latitude and longitude in degrees, if both columns are present and
    /// hold finite numbers.
    pub fn coordinates(&self, schema: &FormatSchema) -> Option<(f64, f64)> {
        let parse = |index: usize| {
            self.field(index)?
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
        };
        Some((parse(schema.lat_index())?, parse(schema.lon_index())?))
    }

    /// Unit-sphere position.
    ///
    /// Each coordinate is read from the longest leading numeric prefix of its
    /// field, so `12.5N` reads as 12.5. Anything else, non-finite values
    /// included, reads as 0.0.
    pub fn position(&self, schema: &FormatSchema) -> SphericalPoint {
        let parse = |index: usize| self.field(index).and_then(leading_number).unwrap_or(0.0);
        to_unit_sphere(parse(schema.lat_index()), parse(schema.lon_index()))
    }
}

/// Longest finite decimal number at the start of `field`, ignoring leading
/// whitespace.
fn leading_number(field: &str) -> Option<f64> {
    let field = field.trim_start();
    let candidate_len = field
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(field.len());
    (1..=candidate_len)
        .rev()
        .find_map(|end| field[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// A time step: its header and the candidates read for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStep {
    pub header: TimeStepHeader,
    pub candidates: Vec<CandidateRecord>,
}

impl TimeStep {
    pub fn new(header: TimeStepHeader, candidates: Vec<CandidateRecord>) -> Self {
        Self { header, candidates }
    }
}

/// Diagnostics gathered while ingesting a candidate stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Candidates whose field count differs from the schema length.
    pub schema_mismatches: usize,
    /// Candidates whose lat/lon is missing, non-numeric or non-finite.
    pub invalid_coordinates: usize,
    /// Input ended before the last time step's declared candidates were read.
    pub truncated: bool,
    /// Lines skipped as blank or comments.
    pub skipped_lines: usize,
}

impl IngestReport {
    pub fn has_warnings(&self) -> bool {
        self.schema_mismatches > 0 || self.invalid_coordinates > 0 || self.truncated
    }
}

enum ReadState {
    Header,
    Candidates { remaining: usize },
}

/// All time steps of a run, in chronological (input) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStore {
    time_steps: Vec<TimeStep>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_time_steps(time_steps: Vec<TimeStep>) -> Self {
        Self { time_steps }
    }

    pub fn push(&mut self, step: TimeStep) {
        self.time_steps.push(step);
    }

    /// Load a candidate file.
    pub fn load(path: &Path, schema: &FormatSchema) -> Result<(Self, IngestReport)> {
        let file = File::open(path).map_err(|e| StitchError::io(path, e))?;
        Self::from_reader(BufReader::new(file), schema).map_err(|e| match e {
            StitchError::Stream(source) => StitchError::io(path, source),
            other => other,
        })
    }

    /// Parse a candidate stream.
    ///
    /// Fails on the first malformed time header; nothing parsed so far is
    /// returned in that case.
    pub fn from_reader<R: BufRead>(
        reader: R,
        schema: &FormatSchema,
    ) -> Result<(Self, IngestReport)> {
        let mut store = RecordStore::new();
        let mut report = IngestReport::default();
        let mut state = ReadState::Header;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                report.skipped_lines += 1;
                continue;
            }

            let tokens = split_tokens(&line);
            state = match state {
                ReadState::Header => {
                    let header = TimeStepHeader::from_tokens(tokens).map_err(|reason| {
                        StitchError::Format {
                            line: line_no + 1,
                            content: line.clone(),
                            reason,
                        }
                    })?;
                    let remaining = header.count();
                    store.push(TimeStep::new(header, Vec::with_capacity(remaining)));
                    if remaining == 0 {
                        ReadState::Header
                    } else {
                        ReadState::Candidates { remaining }
                    }
                }
                ReadState::Candidates { remaining } => {
                    let candidate = CandidateRecord::new(tokens);
                    if candidate.fields().len() != schema.len() {
                        report.schema_mismatches += 1;
                    }
                    if candidate.coordinates(schema).is_none() {
                        report.invalid_coordinates += 1;
                    }
                    if let Some(step) = store.time_steps.last_mut() {
                        step.candidates.push(candidate);
                    }
                    if remaining == 1 {
                        ReadState::Header
                    } else {
                        ReadState::Candidates {
                            remaining: remaining - 1,
                        }
                    }
                }
            };
        }

        if let ReadState::Candidates { remaining } = state {
            report.truncated = true;
            debug!(
                "Input ended with {} candidate(s) missing from the final time step",
                remaining
            );
        }

        if report.schema_mismatches > 0 {
            warn!(
                "{} candidate(s) do not match the {} --format entries",
                report.schema_mismatches,
                schema.len()
            );
        }
        if report.invalid_coordinates > 0 {
            warn!(
                "{} candidate(s) have missing, non-numeric or non-finite lat/lon; \
                 read from any numeric prefix, else 0.0",
                report.invalid_coordinates
            );
        }

        info!(
            "Loaded {} discrete times, {} candidates",
            store.len(),
            store.candidate_count()
        );

        Ok((store, report))
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.time_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_steps.is_empty()
    }

    /// Total number of candidates across all time steps.
    pub fn candidate_count(&self) -> usize {
        self.time_steps.iter().map(|s| s.candidates.len()).sum()
    }

    pub fn time_steps(&self) -> &[TimeStep] {
        &self.time_steps
    }

    pub fn time_step(&self, time: usize) -> Option<&TimeStep> {
        self.time_steps.get(time)
    }

    pub fn header(&self, time: usize) -> Option<&TimeStepHeader> {
        self.time_steps.get(time).map(|s| &s.header)
    }

    pub fn candidate(&self, time: usize, candidate: usize) -> Option<&CandidateRecord> {
        self.time_steps.get(time)?.candidates.get(candidate)
    }

    /// Unit-sphere positions per time step, in candidate order.
    pub fn positions(&self, schema: &FormatSchema) -> Vec<Vec<SphericalPoint>> {
        self.time_steps
            .iter()
            .map(|step| step.candidates.iter().map(|c| c.position(schema)).collect())
            .collect()
    }
}
