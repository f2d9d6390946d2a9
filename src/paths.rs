//! Greedy chaining of segments into trajectories.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::NodeRef;
use crate::progress::StitchProgressCallback;
use crate::segments::SegmentSet;

/// A trajectory: candidates strictly increasing in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<NodeRef>,
}

impl Path {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> Option<NodeRef> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<NodeRef> {
        self.nodes.last().copied()
    }

    pub fn start_time(&self) -> Option<usize> {
        self.start().map(|n| n.time)
    }
}

/// Paths kept after the length filter, plus how many were dropped.
#[derive(Debug, Clone, Default)]
pub struct AssemblyOutcome {
    pub paths: Vec<Path>,
    pub discarded: usize,
}

/// Chain segments into maximal disjoint paths, consuming every segment.
///
/// `sets[t]` holds the segments originating at time `t`; the last time index
/// is therefore `sets.len()`. Origin time steps are visited in order and,
/// within each, the smallest remaining origin starts the next path. From a
/// path's current destination the chain continues through the segment that
/// originates exactly there, if it has not been consumed already.
///
/// Paths shorter than `min_path_length` nodes are discarded, but their
/// segments are consumed all the same. `progress` is ticked once per consumed
/// segment.
pub fn assemble_paths(
    sets: &mut [SegmentSet],
    min_path_length: usize,
    progress: &dyn StitchProgressCallback,
) -> AssemblyOutcome {
    let last_time = sets.len();
    let mut outcome = AssemblyOutcome::default();

    for t in 0..sets.len() {
        while let Some(first) = sets[t].pop_smallest() {
            progress.on_progress();
            let mut nodes = vec![first.origin];
            let mut current = first;

            loop {
                nodes.push(current.destination);

                let next_time = current.destination.time;
                if next_time >= last_time {
                    break;
                }

                match sets[next_time].erase_exact(&current.destination) {
                    Some(next) => {
                        progress.on_progress();
                        current = next;
                    }
                    None => break,
                }
            }

            if nodes.len() >= min_path_length {
                outcome.paths.push(Path { nodes });
            } else {
                outcome.discarded += 1;
            }
        }
    }

    debug!(
        "Assembled {} paths, discarded {} shorter than {} nodes",
        outcome.paths.len(),
        outcome.discarded,
        min_path_length
    );

    outcome
}
