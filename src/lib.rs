//! # Node Stitch
//!
//! Assemble trajectories of tracked features (storm centers, vortices) from
//! per-time-step candidate detections.
//!
//! This library provides:
//! - Ingestion of line-oriented candidate lists with a caller-supplied column schema
//! - A per-time-step R-tree over unit-sphere positions for nearest-neighbor search
//! - Gap-tolerant greedy segment construction under a great-circle range limit
//! - Greedy chaining of segments into disjoint paths, filtered by length
//! - `std` and `visit` output layouts
//!
//! ## Features
//!
//! - **`parallel`** - Build indices and search segments with rayon
//! - **`synthetic`** - Seeded synthetic storm-track generator
//!
//! ## Quick Start
//!
//! ```rust
//! use nodestitch::{FormatSchema, RecordStore, StitchConfig, stitch_nodes};
//!
//! let input = "1 1 2000 1 0\n1 0 0 0.0 0.0\n1 1 2000 1 6\n1 0 0 4.0 0.0\n";
//! let schema = FormatSchema::parse("no,i,j,lon,lat").unwrap();
//! let (store, _report) = RecordStore::from_reader(input.as_bytes(), &schema).unwrap();
//!
//! let config = StitchConfig {
//!     min_path_length: 2,
//!     ..StitchConfig::default()
//! };
//! let result = stitch_nodes(&store, &schema, &config).unwrap();
//! assert_eq!(result.paths.len(), 1);
//! assert_eq!(result.paths[0].len(), 2);
//! ```

use std::fmt;
use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, StitchError};

// Unit-sphere projection and great-circle distance
pub mod geo_utils;

// Candidate column schema
pub mod schema;
pub use schema::{DEFAULT_FORMAT, FormatSchema};

// Record store and ingestion
pub mod records;
pub use records::{CandidateRecord, IngestReport, RecordStore, TimeStep, TimeStepHeader};

// Per-time-step nearest-neighbor index
pub mod spatial_index;
pub use spatial_index::{CandidateIndex, IndexedPoint, build_indices, build_indices_with_progress};

// Segment construction
pub mod segments;
pub use segments::{
    PathSegment, SegmentSet, build_segments, build_segments_with_progress, find_segment,
};

// Greedy path chaining
pub mod paths;
pub use paths::{AssemblyOutcome, Path, assemble_paths};

// Output layouts
pub mod output;
pub use output::{OutputFormat, render_paths, write_paths};

// Progress reporting
pub mod progress;
pub use progress::{AtomicProgressTracker, NoopProgress, StitchPhase, StitchProgressCallback};

// Synthetic data for benches and scale tests
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// Reference to one candidate: time step index and position within it.
///
/// Ordered lexicographically by `(time, candidate)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub time: usize,
    pub candidate: usize,
}

impl NodeRef {
    pub fn new(time: usize, candidate: usize) -> Self {
        Self { time, candidate }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.time, self.candidate)
    }
}

/// A candidate position on the unit sphere.
///
/// `lat`/`lon` are kept in radians alongside the Cartesian coordinates for
/// great-circle distance computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub lat: f64,
    pub lon: f64,
}

/// Matching and filtering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Maximum great-circle distance (degrees) for a segment.
    /// Default: 5.0
    pub range_degrees: f64,

    /// Minimum number of nodes for a path to be kept.
    /// Default: 3
    pub min_path_length: usize,

    /// Number of time steps that may be skipped between linked candidates.
    /// 0 allows only adjacent time steps. Default: 0
    pub max_gap: usize,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            range_degrees: 5.0,
            min_path_length: 3,
            max_gap: 0,
        }
    }
}

impl StitchConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.range_degrees.is_finite() || self.range_degrees < 0.0 {
            return Err(StitchError::config(format!(
                "Range must be a non-negative number of degrees, got {}",
                self.range_degrees
            )));
        }
        Ok(())
    }
}

/// Counters describing one stitching run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchStats {
    pub time_steps: usize,
    pub candidates: usize,
    pub indexed_time_steps: usize,
    pub segments: usize,
    pub paths_found: usize,
    pub paths_discarded: usize,
}

/// Output of [`stitch_nodes`].
#[derive(Debug, Clone)]
pub struct StitchResult {
    /// Retained paths, in discovery order.
    pub paths: Vec<Path>,
    /// Every segment generated, ordered by origin.
    pub segments: Vec<PathSegment>,
    pub stats: StitchStats,
}

/// Settings for a complete file-to-file run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub stitch: StitchConfig,
    pub output_format: OutputFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            format: DEFAULT_FORMAT.to_string(),
            stitch: StitchConfig::default(),
            output_format: OutputFormat::Std,
        }
    }
}

/// What a completed run read and produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ingest: IngestReport,
    pub stats: StitchStats,
}

// ============================================================================
// Core Functions
// ============================================================================

/// Stitch candidates into paths.
///
/// # Example
/// ```
/// use nodestitch::{FormatSchema, RecordStore, StitchConfig, stitch_nodes};
///
/// let schema = FormatSchema::parse("lon,lat").unwrap();
/// let (store, _) = RecordStore::from_reader("1 1 2000 0 0\n".as_bytes(), &schema).unwrap();
/// let result = stitch_nodes(&store, &schema, &StitchConfig::default()).unwrap();
/// assert!(result.paths.is_empty());
/// ```
pub fn stitch_nodes(
    store: &RecordStore,
    schema: &FormatSchema,
    config: &StitchConfig,
) -> Result<StitchResult> {
    stitch_nodes_with_progress(store, schema, config, &NoopProgress)
}

/// Stitch candidates into paths, reporting phase progress.
///
/// Each phase is announced with its item count: time steps for index
/// building, origin time steps for segment building, and segments for
/// assembly. By the end of a phase `progress` has been ticked exactly that
/// many times.
pub fn stitch_nodes_with_progress(
    store: &RecordStore,
    schema: &FormatSchema,
    config: &StitchConfig,
    progress: &dyn StitchProgressCallback,
) -> Result<StitchResult> {
    config.validate()?;

    let positions = store.positions(schema);

    progress.on_phase(StitchPhase::BuildingIndices, positions.len() as u32);
    let indices = build_indices_with_progress(&positions, progress);
    let indexed_time_steps = indices.iter().filter(|i| i.is_some()).count();
    info!(
        "Built {} spatial indices over {} time steps",
        indexed_time_steps,
        indices.len()
    );

    progress.on_phase(
        StitchPhase::BuildingSegments,
        indices.len().saturating_sub(1) as u32,
    );
    let mut sets = build_segments_with_progress(&positions, &indices, config, progress);
    let segments: Vec<PathSegment> = sets.iter().flat_map(|s| s.iter()).collect();
    info!("Populated {} path segments", segments.len());

    progress.on_phase(StitchPhase::AssemblingPaths, segments.len() as u32);
    let outcome = assemble_paths(&mut sets, config.min_path_length, progress);
    info!("Total paths found: {}", outcome.paths.len());

    let stats = StitchStats {
        time_steps: store.len(),
        candidates: store.candidate_count(),
        indexed_time_steps,
        segments: segments.len(),
        paths_found: outcome.paths.len(),
        paths_discarded: outcome.discarded,
    };

    Ok(StitchResult {
        paths: outcome.paths,
        segments,
        stats,
    })
}

/// Read the input file, stitch, and write the output file.
///
/// The output file is created only after all paths have been assembled and
/// rendered; configuration and ingestion errors leave no output behind.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let input = config
        .input
        .as_ref()
        .ok_or_config("No input file specified")?;
    let output = config
        .output
        .as_ref()
        .ok_or_config("No output file specified")?;
    let schema = FormatSchema::parse(&config.format)?;
    config.stitch.validate()?;

    let (store, ingest) = RecordStore::load(input, &schema)?;
    let result = stitch_nodes(&store, &schema, &config.stitch)?;

    let rendered = render_paths(config.output_format, &result.paths, &store, &schema)?;
    std::fs::write(output, rendered).map_err(|e| StitchError::io(output, e))?;
    info!(
        "Wrote {} paths to {} ({} format)",
        result.paths.len(),
        output.display(),
        config.output_format
    );

    Ok(RunSummary {
        ingest,
        stats: result.stats,
    })
}
