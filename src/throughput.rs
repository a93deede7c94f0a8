//! Quantity and assembler bookkeeping for a demand on the recipe graph.
//!
//! Demand flows backwards along recipe edges: every unit of a product needs
//! `quantity_per` units of each of its ingredients.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::graph::DependencyGraph;
use crate::models::Item;

/// Throughput figures for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemThroughput {
    pub item: Item,
    /// Units needed per unit of time to satisfy the demand
    pub quantity_needed: f64,
    /// Units one assembler makes per unit of time (None for raw items)
    pub rate_per_factory: Option<f64>,
    /// Assemblers needed to keep up (None for raw items)
    pub factories_needed: Option<f64>,
}

fn quantity_needed(
    graph: &DependencyGraph,
    item: &str,
    demand: &BTreeMap<Item, f64>,
    memo: &mut HashMap<Item, f64>,
) -> f64 {
    if let Some(&known) = memo.get(item) {
        return known;
    }
    let mut total = demand.get(item).copied().unwrap_or(0.0);
    for product in graph.successors(item) {
        let per = graph.quantity_per(item, &product).unwrap_or(0.0);
        total += per * quantity_needed(graph, &product, demand, memo);
    }
    memo.insert(item.to_string(), total);
    total
}

/// Computes throughput for every item in the graph.
///
/// # Arguments
///
/// * `graph` - The recipe graph
/// * `demand` - Units per unit of time requested directly, per item
/// * `time_constant` - Scales recipe rates (60 turns per-second rates into per-minute rates)
///
/// # Returns
///
/// One entry per item, sorted by item name.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use busplan::graph::DependencyGraph;
/// use busplan::models::{Ingredient, Recipe};
/// use busplan::throughput::plan_throughput;
///
/// let recipes = vec![Recipe {
///     product: "Iron Gear Wheel".to_string(),
///     time: 0.5,
///     output: 1.0,
///     ingredients: vec![Ingredient { item: "Iron Plate".to_string(), amount: 2.0 }],
/// }];
/// let graph = DependencyGraph::from_recipes(&recipes).unwrap();
/// let demand = BTreeMap::from([("Iron Gear Wheel".to_string(), 1.0)]);
/// let plan = plan_throughput(&graph, &demand, 1.0);
///
/// let plate = plan.iter().find(|t| t.item == "Iron Plate").unwrap();
/// assert_eq!(plate.quantity_needed, 2.0);
/// assert_eq!(plate.factories_needed, None);
/// ```
pub fn plan_throughput(
    graph: &DependencyGraph,
    demand: &BTreeMap<Item, f64>,
    time_constant: f64,
) -> Vec<ItemThroughput> {
    let mut memo = HashMap::new();
    graph
        .items()
        .into_iter()
        .map(|item| {
            let needed = quantity_needed(graph, &item, demand, &mut memo);
            let rate = graph
                .recipe(&item)
                .and_then(|r| Some(r.output? / r.time? * time_constant));
            let factories = rate.map(|rate| if needed > 0.0 { needed / rate } else { 0.0 });
            ItemThroughput {
                item,
                quantity_needed: needed,
                rate_per_factory: rate,
                factories_needed: factories,
            }
        })
        .collect()
}

/// Demand of one unit per unit of time for each item.
pub fn unit_demand<'a, I>(items: I) -> BTreeMap<Item, f64>
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().map(|item| (item.clone(), 1.0)).collect()
}
