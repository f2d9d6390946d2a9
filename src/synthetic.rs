//! Synthetic storm-track generator for stress testing and benchmarking.
//!
//! Generates time-stepped candidate sets with known tracks plus random
//! clutter, providing ground truth for validation of the stitching pipeline.
//!
//! Feature-gated behind `synthetic`, not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use nodestitch::synthetic::SyntheticScenario;
//!
//! let scenario = SyntheticScenario {
//!     time_steps: 20,
//!     track_count: 5,
//!     clutter_per_step: 3,
//!     ..SyntheticScenario::default()
//! };
//!
//! let dataset = scenario.generate();
//! assert_eq!(dataset.store.len(), 20);
//! assert_eq!(dataset.tracks.len(), 5);
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::NodeRef;
use crate::records::{CandidateRecord, RecordStore, TimeStep, TimeStepHeader};

/// Column layout of generated candidates.
pub const SYNTHETIC_FORMAT: &str = "no,lon,lat,track";

/// Scenario configuration for generating synthetic data.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    /// Number of discrete time steps (6-hourly).
    pub time_steps: usize,
    /// Number of ground-truth storm tracks.
    pub track_count: usize,
    /// Minimum track lifetime in time steps.
    pub min_lifetime: usize,
    /// Maximum track lifetime in time steps.
    pub max_lifetime: usize,
    /// Maximum displacement per time step in degrees (each axis).
    pub max_step_degrees: f64,
    /// Random non-track detections added to every time step.
    pub clutter_per_step: usize,
    /// Probability that a track is not detected at a given step.
    pub dropout_probability: f64,
    /// Latitude band (degrees) where tracks and clutter are placed.
    pub lat_band: (f64, f64),
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

impl Default for SyntheticScenario {
    fn default() -> Self {
        Self {
            time_steps: 40,
            track_count: 10,
            min_lifetime: 4,
            max_lifetime: 16,
            max_step_degrees: 1.5,
            clutter_per_step: 0,
            dropout_probability: 0.0,
            lat_band: (-40.0, 40.0),
            seed: 42,
        }
    }
}

/// A ground-truth track: the candidates it was detected as.
#[derive(Debug, Clone)]
pub struct ExpectedTrack {
    pub id: usize,
    pub nodes: Vec<NodeRef>,
}

/// A complete synthetic dataset with ground truth.
pub struct SyntheticDataset {
    pub store: RecordStore,
    /// Schema string matching the generated records.
    pub format: String,
    pub tracks: Vec<ExpectedTrack>,
}

struct Detection {
    lon: f64,
    lat: f64,
    track: Option<usize>,
}

impl SyntheticScenario {
    pub fn generate(&self) -> SyntheticDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut per_step: Vec<Vec<Detection>> = (0..self.time_steps).map(|_| Vec::new()).collect();

        let min_life = self.min_lifetime.max(1);
        let max_life = self.max_lifetime.max(min_life);

        for track in 0..self.track_count {
            if self.time_steps == 0 {
                break;
            }
            let lifetime = rng.gen_range(min_life..=max_life).min(self.time_steps);
            let start = rng.gen_range(0..=self.time_steps - lifetime);
            let mut lat = rng.gen_range(self.lat_band.0..=self.lat_band.1);
            let mut lon = rng.gen_range(0.0..360.0);
            let drift_lon = rng.gen_range(-self.max_step_degrees..=self.max_step_degrees);
            let drift_lat = rng.gen_range(-self.max_step_degrees..=self.max_step_degrees) * 0.5;

            for (offset, step) in per_step.iter_mut().skip(start).take(lifetime).enumerate() {
                if offset > 0 {
                    lon = (lon + drift_lon).rem_euclid(360.0);
                    lat = (lat + drift_lat).clamp(-85.0, 85.0);
                }
                // Never drop the first or last detection so lifetimes stay intact.
                let interior = offset > 0 && offset + 1 < lifetime;
                if interior && rng.gen_bool(self.dropout_probability.clamp(0.0, 1.0)) {
                    continue;
                }
                step.push(Detection {
                    lon,
                    lat,
                    track: Some(track),
                });
            }
        }

        for step in per_step.iter_mut() {
            for _ in 0..self.clutter_per_step {
                step.push(Detection {
                    lon: rng.gen_range(0.0..360.0),
                    lat: rng.gen_range(self.lat_band.0..=self.lat_band.1),
                    track: None,
                });
            }
            step.shuffle(&mut rng);
        }

        let mut tracks: Vec<ExpectedTrack> = (0..self.track_count)
            .map(|id| ExpectedTrack {
                id,
                nodes: Vec::new(),
            })
            .collect();
        let mut store = RecordStore::new();

        for (t, detections) in per_step.into_iter().enumerate() {
            let day = (t / 4) as u32 % 28 + 1;
            let hour = (t % 4) as u32 * 6;
            let header = TimeStepHeader::new(day, 1, 2000, detections.len(), hour);

            let candidates = detections
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    if let Some(track) = d.track {
                        tracks[track].nodes.push(NodeRef::new(t, i));
                    }
                    CandidateRecord::new(vec![
                        (i + 1).to_string(),
                        format!("{:.4}", d.lon),
                        format!("{:.4}", d.lat),
                        d.track.map_or("-".to_string(), |id| id.to_string()),
                    ])
                })
                .collect();

            store.push(TimeStep::new(header, candidates));
        }

        SyntheticDataset {
            store,
            format: SYNTHETIC_FORMAT.to_string(),
            tracks,
        }
    }
}
