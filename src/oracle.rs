//! Reachability predicates over (item, bus) pairs.
//!
//! All answers depend only on the immutable dependency graph, the bus and the
//! item, so they are memoised for the lifetime of the oracle. A search run owns
//! one oracle; dropping it at the end of the run discards the caches.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::models::{Bus, Item};

/// Memoising reachability oracle over a dependency graph.
///
/// # Example
///
/// ```
/// use busplan::graph::DependencyGraph;
/// use busplan::models::{Bus, Ingredient, Recipe};
/// use busplan::oracle::ReachabilityOracle;
///
/// let recipes = vec![Recipe {
///     product: "Copper Wire".to_string(),
///     time: 0.5,
///     output: 2.0,
///     ingredients: vec![Ingredient { item: "Copper Plate".to_string(), amount: 1.0 }],
/// }];
/// let graph = DependencyGraph::from_recipes(&recipes).unwrap();
/// let oracle = ReachabilityOracle::new(&graph);
///
/// assert!(oracle.direct_supplied_by("Copper Wire", &Bus::from_items(["Copper Plate"])));
/// assert!(!oracle.direct_supplied_by("Copper Plate", &Bus::from_items(["Copper Plate"])));
/// ```
pub struct ReachabilityOracle<'g> {
    graph: &'g DependencyGraph,
    reach_cache: RefCell<HashMap<(Bus, Item), bool>>,
    distance_cache: RefCell<HashMap<(Bus, Item), u32>>,
}

impl<'g> ReachabilityOracle<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        ReachabilityOracle {
            graph,
            reach_cache: RefCell::new(HashMap::new()),
            distance_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn graph(&self) -> &'g DependencyGraph {
        self.graph
    }

    /// True iff `item` has ingredients and every one of them is in `bus`.
    ///
    /// Raw items are never directly supplied; they count as available only
    /// when they are already on the bus.
    pub fn direct_supplied_by(&self, item: &str, bus: &Bus) -> bool {
        let predecessors = self.graph.predecessors(item);
        !predecessors.is_empty() && predecessors.iter().all(|p| bus.contains(p))
    }

    /// True if `item` is on the bus, or can be crafted from it through any
    /// number of intermediate recipes.
    pub fn recursively_supplied_by(&self, item: &str, bus: &Bus) -> bool {
        if bus.contains(item) {
            return true;
        }
        let key = (bus.clone(), item.to_string());
        if let Some(&cached) = self.reach_cache.borrow().get(&key) {
            return cached;
        }

        let predecessors = self.graph.predecessors(item);
        let supplied = !predecessors.is_empty()
            && predecessors
                .iter()
                .all(|p| bus.contains(p) || self.recursively_supplied_by(p, bus));

        self.reach_cache.borrow_mut().insert(key, supplied);
        supplied
    }

    /// Conjunction of [`Self::recursively_supplied_by`] over the goal set.
    pub fn goal_set_supplied_by(&self, goals: &Bus, bus: &Bus) -> bool {
        goals.iter().all(|g| self.recursively_supplied_by(g, bus))
    }

    /// Goal items that the bus can not supply, in sorted order.
    pub fn unsupplied_goals(&self, goals: &Bus, bus: &Bus) -> Vec<Item> {
        goals
            .iter()
            .filter(|g| !self.recursively_supplied_by(g, bus))
            .cloned()
            .collect()
    }

    /// A bus is valid if it is non-empty and can eventually supply every goal.
    ///
    /// Adding items never invalidates a bus, so under creation-only generation
    /// an invalid bus is a dead end.
    pub fn is_valid_bus(&self, goals: &Bus, bus: &Bus) -> bool {
        !bus.is_empty() && self.goal_set_supplied_by(goals, bus)
    }

    /// True iff every goal is already on the bus.
    pub fn is_terminal(&self, goals: &Bus, bus: &Bus) -> bool {
        goals.is_subset(bus)
    }

    /// Number of crafting steps between the bus and `item`.
    ///
    /// 0 if the item is on the bus, 1 if it is directly supplied, otherwise
    /// one more than its closest ingredient.
    ///
    /// # Errors
    ///
    /// [`Error::Unscorable`] if some ingredient chain of `item` bottoms out in
    /// a raw item that is not on the bus. Only score buses that are valid for
    /// the item.
    pub fn distance(&self, bus: &Bus, item: &str) -> Result<u32> {
        if bus.contains(item) {
            return Ok(0);
        }
        if self.direct_supplied_by(item, bus) {
            return Ok(1);
        }
        let key = (bus.clone(), item.to_string());
        if let Some(&cached) = self.distance_cache.borrow().get(&key) {
            return Ok(cached);
        }

        let predecessors = self.graph.predecessors(item);
        if predecessors.is_empty() {
            return Err(Error::Unscorable(item.to_string()));
        }
        let mut closest = u32::MAX;
        for p in &predecessors {
            closest = closest.min(self.distance(bus, p)?);
        }
        let distance = closest + 1;

        self.distance_cache.borrow_mut().insert(key, distance);
        Ok(distance)
    }

    /// Number of memoised answers, for diagnostics.
    pub fn cache_len(&self) -> usize {
        self.reach_cache.borrow().len() + self.distance_cache.borrow().len()
    }
}
