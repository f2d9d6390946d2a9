//! Directed path segments and their construction.
//!
//! A segment proposes that candidate `(t0, i0)` and candidate `(t1, i1)`,
//! `t1 > t0`, are the same tracked feature. Construction guarantees at most
//! one outgoing segment per origin, so each time step's segments form a
//! partial function from origin to destination.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::great_circle_degrees;
use crate::progress::{NoopProgress, StitchProgressCallback};
use crate::spatial_index::CandidateIndex;
use crate::{NodeRef, SphericalPoint, StitchConfig};

/// A directed link between candidates at two time steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub origin: NodeRef,
    pub destination: NodeRef,
}

impl PathSegment {
    pub fn new(origin: NodeRef, destination: NodeRef) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Number of time steps spanned (1 for adjacent steps).
    pub fn span(&self) -> usize {
        self.destination.time - self.origin.time
    }
}

/// Segments originating in one time step, ordered by origin.
///
/// Keyed by origin: inserting a second segment for the same origin replaces
/// the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentSet {
    segments: BTreeMap<NodeRef, NodeRef>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, segment: PathSegment) -> Option<PathSegment> {
        self.segments
            .insert(segment.origin, segment.destination)
            .map(|destination| PathSegment::new(segment.origin, destination))
    }

    /// Remove and return the segment with the smallest origin.
    pub fn pop_smallest(&mut self) -> Option<PathSegment> {
        self.segments
            .pop_first()
            .map(|(origin, destination)| PathSegment::new(origin, destination))
    }

    /// Segment originating exactly at `origin`, if any.
    pub fn find_exact(&self, origin: &NodeRef) -> Option<PathSegment> {
        self.segments
            .get(origin)
            .map(|destination| PathSegment::new(*origin, *destination))
    }

    /// Remove the segment originating exactly at `origin`.
    pub fn erase_exact(&mut self, origin: &NodeRef) -> Option<PathSegment> {
        self.segments
            .remove(origin)
            .map(|destination| PathSegment::new(*origin, destination))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PathSegment> + '_ {
        self.segments
            .iter()
            .map(|(origin, destination)| PathSegment::new(*origin, *destination))
    }
}

impl FromIterator<PathSegment> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        let mut set = SegmentSet::new();
        for segment in iter {
            set.insert(segment);
        }
        set
    }
}

/// Search forward from `(time, candidate)` for an acceptable match.
///
/// Gaps are tried in increasing order up to `max_gap + 1`. A time step with
/// no index is skipped, while an index that yields no neighbor ends the
/// search. The first destination within `range_degrees` wins.
pub fn find_segment(
    time: usize,
    candidate: usize,
    positions: &[Vec<SphericalPoint>],
    indices: &[Option<CandidateIndex>],
    config: &StitchConfig,
) -> Option<PathSegment> {
    let origin = positions.get(time)?.get(candidate)?;
    let last_time = indices.len().checked_sub(1)?;

    for gap in 1..=config.max_gap + 1 {
        let target = time + gap;
        if target > last_time {
            break;
        }

        let Some(index) = &indices[target] else {
            continue;
        };

        let Some((nearest, _chord)) = index.nearest(origin) else {
            break;
        };

        let distance = great_circle_degrees(origin, &positions[target][nearest]);
        if distance <= config.range_degrees {
            return Some(PathSegment::new(
                NodeRef::new(time, candidate),
                NodeRef::new(target, nearest),
            ));
        }
    }

    None
}

/// Build the segment sets for every origin time step `0..T-1`.
pub fn build_segments(
    positions: &[Vec<SphericalPoint>],
    indices: &[Option<CandidateIndex>],
    config: &StitchConfig,
) -> Vec<SegmentSet> {
    build_segments_with_progress(positions, indices, config, &NoopProgress)
}

/// Build the segment sets, ticking `progress` once per origin time step.
///
/// With the `parallel` feature, candidate searches within a time step run
/// concurrently; results are gathered before insertion so the sets are
/// identical to a sequential run.
pub fn build_segments_with_progress(
    positions: &[Vec<SphericalPoint>],
    indices: &[Option<CandidateIndex>],
    config: &StitchConfig,
    progress: &dyn StitchProgressCallback,
) -> Vec<SegmentSet> {
    let origin_steps = indices.len().saturating_sub(1);

    (0..origin_steps)
        .map(|t| {
            let count = positions.get(t).map_or(0, Vec::len);

            #[cfg(feature = "parallel")]
            let found: Vec<PathSegment> = (0..count)
                .into_par_iter()
                .filter_map(|i| find_segment(t, i, positions, indices, config))
                .collect();

            #[cfg(not(feature = "parallel"))]
            let found: Vec<PathSegment> = (0..count)
                .filter_map(|i| find_segment(t, i, positions, indices, config))
                .collect();

            debug!("Time {}: {} of {} candidates linked", t, found.len(), count);
            progress.on_progress();
            found.into_iter().collect::<SegmentSet>()
        })
        .collect()
}

/// Total number of segments across all sets.
pub fn segment_count(sets: &[SegmentSet]) -> usize {
    sets.iter().map(SegmentSet::len).sum()
}
