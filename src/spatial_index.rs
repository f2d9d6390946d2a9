//! Per-time-step nearest-neighbor index over unit-sphere positions.
//!
//! Uses an R-tree over the 3-D Cartesian embedding. For points on the unit
//! sphere the Euclidean (chord) distance is monotonic in great-circle
//! distance, so the nearest entry by chord is also nearest on the sphere.
//!
//! Equidistant entries are resolved by the tree's traversal order, which
//! depends on bulk-load layout. Callers must not rely on a particular winner.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::SphericalPoint;
use crate::progress::{NoopProgress, StitchProgressCallback};

/// A unit-sphere point tagged with its position in the time step's
/// candidate list.
#[derive(Debug, Clone, Copy)]
pub struct IndexedPoint {
    pub idx: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl IndexedPoint {
    pub fn new(idx: usize, point: &SphericalPoint) -> Self {
        Self {
            idx,
            x: point.x,
            y: point.y,
            z: point.z,
        }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y, self.z])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        let dz = self.z - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Nearest-neighbor index for the candidates of one time step.
#[derive(Debug)]
pub struct CandidateIndex {
    tree: RTree<IndexedPoint>,
}

impl CandidateIndex {
    /// Bulk-load an index; entry `i` carries payload `i`.
    pub fn build(points: &[SphericalPoint]) -> Self {
        let indexed: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedPoint::new(i, p))
            .collect();
        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Build an index only when there is something to index.
    pub fn for_time_step(points: &[SphericalPoint]) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self::build(points))
        }
    }

    /// Nearest indexed candidate and its chord distance.
    ///
    /// Returns `None` only when the index is empty.
    pub fn nearest(&self, query: &SphericalPoint) -> Option<(usize, f64)> {
        let q = [query.x, query.y, query.z];
        self.tree
            .nearest_neighbor(&q)
            .map(|p| (p.idx, p.distance_2(&q).sqrt()))
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Build one index per time step; empty time steps get `None`.
pub fn build_indices(positions: &[Vec<SphericalPoint>]) -> Vec<Option<CandidateIndex>> {
    build_indices_with_progress(positions, &NoopProgress)
}

/// Build one index per time step, ticking `progress` once per time step.
///
/// Time steps are independent, so with the `parallel` feature the trees are
/// bulk-loaded concurrently and ticks arrive from rayon workers. Each index
/// is published only once fully built.
pub fn build_indices_with_progress(
    positions: &[Vec<SphericalPoint>],
    progress: &dyn StitchProgressCallback,
) -> Vec<Option<CandidateIndex>> {
    let build = |points: &Vec<SphericalPoint>| {
        let index = CandidateIndex::for_time_step(points);
        progress.on_progress();
        index
    };

    #[cfg(feature = "parallel")]
    {
        positions.par_iter().map(build).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        positions.iter().map(build).collect()
    }
}
