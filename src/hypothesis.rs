//! Generation of candidate next buses.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Bus, Item};
use crate::oracle::ReachabilityOracle;

/// Which kinds of single-step changes the search considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPolicy {
    /// Only add one craftable item per step.
    #[default]
    CreationOnly,
    /// Also drop one item per step.
    CreationAndRemoval,
}

/// Items not yet on the bus whose ingredients are all on it.
pub fn creatable_items(oracle: &ReachabilityOracle<'_>, bus: &Bus) -> BTreeSet<Item> {
    let graph = oracle.graph();
    let mut candidates = BTreeSet::new();
    for item in bus.iter() {
        candidates.extend(graph.successors(item));
    }
    candidates
        .into_iter()
        .filter(|s| !bus.contains(s) && oracle.direct_supplied_by(s, bus))
        .collect()
}

/// Every bus reachable by crafting exactly one more item.
pub fn creation_hypotheses(oracle: &ReachabilityOracle<'_>, bus: &Bus) -> BTreeSet<Bus> {
    creatable_items(oracle, bus)
        .iter()
        .map(|item| bus.with(item))
        .collect()
}

/// Every non-empty bus obtained by dropping exactly one item.
pub fn removal_hypotheses(bus: &Bus) -> BTreeSet<Bus> {
    bus.iter()
        .map(|item| bus.without(item))
        .filter(|h| !h.is_empty())
        .collect()
}

/// Candidate children of `bus` under the given policy.
pub fn generate(oracle: &ReachabilityOracle<'_>, bus: &Bus, policy: GenerationPolicy) -> BTreeSet<Bus> {
    let mut hypotheses = creation_hypotheses(oracle, bus);
    if policy == GenerationPolicy::CreationAndRemoval {
        hypotheses.extend(removal_hypotheses(bus));
    }
    hypotheses
}
