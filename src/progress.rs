//! Progress callback for the stitching phases.
//!
//! Each phase is announced through [`StitchProgressCallback::on_phase`] with
//! its item count, then ticked once per item:
//!
//! - [`StitchPhase::BuildingIndices`]: once per time step, empty ones
//!   included. With the `parallel` feature the ticks come from rayon worker
//!   threads, so implementations must be `Send + Sync`.
//! - [`StitchPhase::BuildingSegments`]: once per origin time step, after all
//!   of its candidates have been searched.
//! - [`StitchPhase::AssemblingPaths`]: once per segment consumed by chaining,
//!   whether or not its path survives the length filter.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Stitching phases, ordered by execution sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitchPhase {
    /// Building one R-tree per non-empty time step; one item per time step
    BuildingIndices,
    /// Nearest-neighbor search for every candidate; one item per origin step
    BuildingSegments,
    /// Sequential greedy chaining; one item per segment
    AssemblingPaths,
}

impl StitchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            StitchPhase::BuildingIndices => "building_indices",
            StitchPhase::BuildingSegments => "building_segments",
            StitchPhase::AssemblingPaths => "assembling_paths",
        }
    }
}

/// Trait for receiving progress updates during stitching.
pub trait StitchProgressCallback: Send + Sync {
    /// Called when entering a new phase. `total` is the number of items in this phase.
    fn on_phase(&self, phase: StitchPhase, total: u32);
    /// Called after completing one item in the current phase. May be called
    /// concurrently from several threads.
    fn on_progress(&self);
}

/// Ignores all updates.
pub struct NoopProgress;

impl StitchProgressCallback for NoopProgress {
    fn on_phase(&self, _phase: StitchPhase, _total: u32) {}
    fn on_progress(&self) {}
}

/// Atomic progress tracker that can be polled from another thread.
pub struct AtomicProgressTracker {
    pub phase: Mutex<String>,
    pub completed: AtomicU32,
    pub total: AtomicU32,
}

impl Default for AtomicProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicProgressTracker {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(String::new()),
            completed: AtomicU32::new(0),
            total: AtomicU32::new(0),
        }
    }

    /// Name of the phase most recently entered.
    pub fn current_phase(&self) -> String {
        self.phase
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl StitchProgressCallback for AtomicProgressTracker {
    fn on_phase(&self, phase: StitchPhase, total: u32) {
        if let Ok(mut current) = self.phase.lock() {
            *current = phase.as_str().to_string();
        }
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn on_progress(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }
}
