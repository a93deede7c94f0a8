//! Keeps the best solution path seen so far.

use std::cmp::Ordering;

use crate::models::{BestPath, PathScore};

/// Orders path scores: narrower first, then shorter, then lower mean width.
pub fn compare_scores(a: &PathScore, b: &PathScore) -> Ordering {
    a.width
        .cmp(&b.width)
        .then(a.length.cmp(&b.length))
        .then(a.mean_width.total_cmp(&b.mean_width))
}

/// Running best over a stream of candidate paths.
#[derive(Debug, Default)]
pub struct BestPathSelector {
    best: Option<BestPath>,
    offered: usize,
}

impl BestPathSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a candidate. Returns `true` if it strictly improves on the best.
    pub fn offer(&mut self, candidate: BestPath) -> bool {
        self.offered += 1;
        let improves = match &self.best {
            None => true,
            Some(best) => compare_scores(&candidate.score, &best.score) == Ordering::Less,
        };
        if improves {
            self.best = Some(candidate);
        }
        improves
    }

    pub fn best(&self) -> Option<&BestPath> {
        self.best.as_ref()
    }

    /// Number of candidates offered so far.
    pub fn offered(&self) -> usize {
        self.offered
    }

    pub fn into_best(self) -> Option<BestPath> {
        self.best
    }
}
