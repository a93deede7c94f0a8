//! Tests for quantity and assembler bookkeeping.

use busplan::data::load_recipes;
use busplan::graph::DependencyGraph;
use busplan::throughput::{plan_throughput, unit_demand, ItemThroughput};
use std::path::Path;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn entry<'a>(plan: &'a [ItemThroughput], item: &str) -> &'a ItemThroughput {
    plan.iter().find(|t| t.item == item).expect("item should be planned")
}

#[test]
fn test_science_pack_1_demand() {
    let data_path = Path::new("data/recipes.csv");
    if !data_path.exists() {
        return;
    }
    let recipes = load_recipes(data_path).expect("Failed to load data");
    let graph = DependencyGraph::from_recipes(&recipes).unwrap();
    let goals = vec!["Science Pack 1".to_string()];

    let plan = plan_throughput(&graph, &unit_demand(goals.iter()), 1.0);
    assert_eq!(plan.len(), graph.len());

    let pack = entry(&plan, "Science Pack 1");
    assert!(approx(pack.quantity_needed, 1.0));
    assert!(approx(pack.rate_per_factory.unwrap(), 0.2));
    assert!(approx(pack.factories_needed.unwrap(), 5.0));

    assert!(approx(entry(&plan, "Iron Gear Wheel").quantity_needed, 1.0));
    assert!(approx(entry(&plan, "Iron Plate").quantity_needed, 2.0));
    assert!(approx(entry(&plan, "Iron Ore").quantity_needed, 2.0));
    assert!(approx(entry(&plan, "Copper Ore").quantity_needed, 1.0));
    assert_eq!(entry(&plan, "Iron Ore").factories_needed, None);

    let unused = entry(&plan, "Steel Plate");
    assert_eq!(unused.quantity_needed, 0.0);
    assert_eq!(unused.factories_needed, Some(0.0));
}

#[test]
fn test_time_constant_scales_rates() {
    let data_path = Path::new("data/recipes.csv");
    if !data_path.exists() {
        return;
    }
    let recipes = load_recipes(data_path).expect("Failed to load data");
    let graph = DependencyGraph::from_recipes(&recipes).unwrap();
    let goals = vec!["Science Pack 1".to_string()];

    let plan = plan_throughput(&graph, &unit_demand(goals.iter()), 60.0);
    let pack = entry(&plan, "Science Pack 1");
    assert!(approx(pack.rate_per_factory.unwrap(), 12.0));
    assert!(approx(pack.factories_needed.unwrap(), 1.0 / 12.0));
}

#[test]
fn test_plan_is_sorted_by_item() {
    let data_path = Path::new("data/recipes.csv");
    if !data_path.exists() {
        return;
    }
    let recipes = load_recipes(data_path).expect("Failed to load data");
    let graph = DependencyGraph::from_recipes(&recipes).unwrap();
    let goals = vec!["High Tech Science Pack".to_string()];

    let plan = plan_throughput(&graph, &unit_demand(goals.iter()), 1.0);
    for pair in plan.windows(2) {
        assert!(pair[0].item < pair[1].item);
    }
    // Every processing unit needs twenty circuits directly and six more through
    // its two advanced circuits; three units go into each pack.
    let circuits = entry(&plan, "Electronic Circuit").quantity_needed;
    assert!(circuits > 60.0);
}
