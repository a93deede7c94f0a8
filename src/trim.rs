//! Removal of items that no later step consumes.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::models::{Bus, Item};
use crate::oracle::ReachabilityOracle;

/// True if some item of `bus` has `item` as an ingredient.
fn consumed_in(graph: &DependencyGraph, item: &str, bus: &Bus) -> bool {
    bus.iter().any(|product| graph.predecessors(product).contains(item))
}

/// Trims a raw solution path.
///
/// The last step is replaced by `goals`. Working backwards, every earlier
/// step keeps only the items that are an ingredient of something in an
/// already trimmed later step, plus any item listed in `exceptions`. Trimming
/// a trimmed path returns it unchanged.
///
/// # Errors
///
/// [`Error::TrimPrecondition`] if the first step can not supply the goals or
/// the last step does not contain them, and [`Error::EmptyPath`] for an empty
/// path.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use busplan::graph::DependencyGraph;
/// use busplan::models::{Bus, Ingredient, Recipe};
/// use busplan::oracle::ReachabilityOracle;
/// use busplan::trim::trim_path;
///
/// let recipes = vec![Recipe {
///     product: "Iron Gear Wheel".to_string(),
///     time: 0.5,
///     output: 1.0,
///     ingredients: vec![Ingredient { item: "Iron Plate".to_string(), amount: 2.0 }],
/// }];
/// let graph = DependencyGraph::from_recipes(&recipes).unwrap();
/// let oracle = ReachabilityOracle::new(&graph);
///
/// let path = vec![
///     Bus::from_items(["Iron Plate", "Coal"]),
///     Bus::from_items(["Iron Plate", "Coal", "Iron Gear Wheel"]),
/// ];
/// let goals = Bus::from_items(["Iron Gear Wheel"]);
/// let trimmed = trim_path(&oracle, &path, &goals, &BTreeSet::new()).unwrap();
/// assert_eq!(trimmed, vec![Bus::from_items(["Iron Plate"]), goals]);
/// ```
pub fn trim_path(
    oracle: &ReachabilityOracle<'_>,
    path: &[Bus],
    goals: &Bus,
    exceptions: &BTreeSet<Item>,
) -> Result<Vec<Bus>> {
    let (first, last) = match (path.first(), path.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::EmptyPath),
    };
    if !oracle.is_valid_bus(goals, first) {
        return Err(Error::TrimPrecondition(format!(
            "goal {} can not be supplied by the starting bus {}",
            goals, first
        )));
    }
    if !goals.is_subset(last) {
        let missing: Vec<Item> = goals.difference(last).into_iter().collect();
        return Err(Error::TrimPrecondition(format!(
            "final bus is missing goal items: {}",
            missing.join(", ")
        )));
    }

    let graph = oracle.graph();
    let mut trimmed = vec![goals.clone()];
    for bus in path[..path.len() - 1].iter().rev() {
        let kept: Bus = bus
            .iter()
            .filter(|item| {
                exceptions.contains(*item)
                    || trimmed.iter().any(|next| consumed_in(graph, item, next))
            })
            .cloned()
            .collect();
        trimmed.push(kept);
    }
    trimmed.reverse();
    Ok(trimmed)
}
