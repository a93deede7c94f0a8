//! Heuristic scoring of buses.
//!
//! Lower scores are closer to the goal. Scores are a greedy proxy used to
//! order the frontier; they are not a lower bound on the remaining steps.

use crate::error::{Error, Result};
use crate::models::Bus;
use crate::oracle::ReachabilityOracle;
use crate::search::HypothesisGraph;

/// Trait for bus scoring strategies.
///
/// `bus` must already be a node of `hypotheses`, connected to its parent, and
/// must be valid for `goals`.
pub trait BusScorer {
    fn score(
        &self,
        oracle: &ReachabilityOracle<'_>,
        hypotheses: &HypothesisGraph,
        bus: &Bus,
        goals: &Bus,
    ) -> Result<f64>;
}

/// Sum of the crafting distances of the goals not yet on the bus.
pub fn distance_score(oracle: &ReachabilityOracle<'_>, bus: &Bus, goals: &Bus) -> Result<f64> {
    let mut total = 0u32;
    for goal in goals.iter() {
        total += oracle.distance(bus, goal)?;
    }
    Ok(total as f64)
}

/// Scores by remaining crafting distance only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceScorer;

impl BusScorer for DistanceScorer {
    fn score(
        &self,
        oracle: &ReachabilityOracle<'_>,
        _hypotheses: &HypothesisGraph,
        bus: &Bus,
        goals: &Bus,
    ) -> Result<f64> {
        distance_score(oracle, bus, goals)
    }
}

/// Blends the distance score with the narrowest possible widest bus on the
/// way from the starting bus, pulling the search toward narrow buses.
///
/// `score = (1 - weight) * distance + weight * minimax_width`
#[derive(Debug, Clone, Copy)]
pub struct MinimaxWidthScorer {
    pub weight: f64,
}

impl BusScorer for MinimaxWidthScorer {
    fn score(
        &self,
        oracle: &ReachabilityOracle<'_>,
        hypotheses: &HypothesisGraph,
        bus: &Bus,
        goals: &Bus,
    ) -> Result<f64> {
        let distance = distance_score(oracle, bus, goals)?;
        let minimax = hypotheses.minimax_width(bus).unwrap_or(bus.len());
        Ok(distance * (1.0 - self.weight) + minimax as f64 * self.weight)
    }
}

/// Selects a scorer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScoringStrategy {
    #[default]
    Distance,
    MinimaxWidth { weight: f64 },
}

impl ScoringStrategy {
    /// Minimax-width scoring with a weight in `[0, 1]`.
    pub fn minimax_width(weight: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(Error::Config(format!(
                "minimax weight must be between 0 and 1, got {}",
                weight
            )));
        }
        Ok(ScoringStrategy::MinimaxWidth { weight })
    }

    pub fn scorer(self) -> Box<dyn BusScorer> {
        match self {
            ScoringStrategy::Distance => Box::new(DistanceScorer),
            ScoringStrategy::MinimaxWidth { weight } => Box::new(MinimaxWidthScorer { weight }),
        }
    }
}
