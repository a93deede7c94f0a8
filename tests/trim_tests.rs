//! Tests for path trimming.

use busplan::data::load_recipes;
use busplan::error::Error;
use busplan::graph::DependencyGraph;
use busplan::models::{Bus, Ingredient, Recipe};
use busplan::oracle::ReachabilityOracle;
use busplan::trim::trim_path;
use std::collections::BTreeSet;
use std::path::Path;

fn load_graph() -> Option<DependencyGraph> {
    let data_path = Path::new("data/recipes.csv");
    if !data_path.exists() {
        return None;
    }
    let recipes = load_recipes(data_path).expect("Failed to load data");
    Some(DependencyGraph::from_recipes(&recipes).expect("Recipes should be acyclic"))
}

fn expected_path() -> Vec<Bus> {
    vec![
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas"]),
        Bus::from_items(["Iron Plate", "Water", "Sulfur"]),
        Bus::from_items(["Sulfuric Acid"]),
    ]
}

#[test]
fn test_trim_path() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let path = vec![
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas"]),
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas", "Sulfur"]),
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas", "Sulfur", "Sulfuric Acid"]),
    ];
    let goals = Bus::from_items(["Sulfuric Acid"]);

    let out = trim_path(&oracle, &path, &goals, &BTreeSet::new()).unwrap();
    assert_eq!(out, expected_path());
}

#[test]
fn test_trim_path_rejects_unreachable_goal() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let path = vec![
        Bus::from_items(["Copper Wire", "Water", "Petrolium Gas", "Copper Plate"]),
        Bus::from_items(["Copper Wire", "Water", "Petrolium Gas", "Sulfur"]),
        Bus::from_items(["Copper Wire", "Water", "Petrolium Gas", "Sulfur", "Sulfuric Acid"]),
    ];
    let goals = Bus::from_items(["Sulfuric Acid"]);

    assert!(matches!(
        trim_path(&oracle, &path, &goals, &BTreeSet::new()),
        Err(Error::TrimPrecondition(_))
    ));
}

#[test]
fn test_trim_path_rejects_final_bus_without_goal() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let path = vec![
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas"]),
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas", "Sulfur"]),
    ];
    let goals = Bus::from_items(["Sulfuric Acid"]);

    assert!(matches!(
        trim_path(&oracle, &path, &goals, &BTreeSet::new()),
        Err(Error::TrimPrecondition(_))
    ));
    assert!(matches!(
        trim_path(&oracle, &[], &goals, &BTreeSet::new()),
        Err(Error::EmptyPath)
    ));
}

#[test]
fn test_trim_path_drops_unneeded_items() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let path = vec![
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas", "Copper Plate"]),
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas", "Copper Plate", "Sulfur"]),
        Bus::from_items([
            "Iron Plate",
            "Water",
            "Petrolium Gas",
            "Copper Plate",
            "Sulfur",
            "Sulfuric Acid",
        ]),
    ];
    let goals = Bus::from_items(["Sulfuric Acid"]);

    let out = trim_path(&oracle, &path, &goals, &BTreeSet::new()).unwrap();
    assert_eq!(out, expected_path());
}

#[test]
fn test_trim_path_is_idempotent() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let goals = Bus::from_items(["Sulfuric Acid"]);

    let once = trim_path(&oracle, &expected_path(), &goals, &BTreeSet::new()).unwrap();
    assert_eq!(once, expected_path());
    let twice = trim_path(&oracle, &once, &goals, &BTreeSet::new()).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn test_trim_path_keeps_exceptions() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let path = vec![
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas", "Copper Plate"]),
        Bus::from_items(["Iron Plate", "Water", "Petrolium Gas", "Copper Plate", "Sulfur"]),
        Bus::from_items([
            "Iron Plate",
            "Water",
            "Petrolium Gas",
            "Copper Plate",
            "Sulfur",
            "Sulfuric Acid",
        ]),
    ];
    let goals = Bus::from_items(["Sulfuric Acid"]);
    let keep: BTreeSet<String> = ["Copper Plate".to_string()].into_iter().collect();

    let out = trim_path(&oracle, &path, &goals, &keep).unwrap();
    assert!(out[0].contains("Copper Plate"));
    assert!(out[1].contains("Copper Plate"));
    assert_eq!(out[2], goals);
}

#[test]
fn test_trim_single_step_path() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let goals = Bus::from_items(["Sulfuric Acid"]);

    let out = trim_path(&oracle, &[goals.with("Coal")], &goals, &BTreeSet::new()).unwrap();
    assert_eq!(out, vec![goals]);
}

fn recipe(product: &str, ingredient: &str) -> Recipe {
    Recipe {
        product: product.to_string(),
        time: 1.0,
        output: 1.0,
        ingredients: vec![Ingredient {
            item: ingredient.to_string(),
            amount: 1.0,
        }],
    }
}

#[test]
fn test_trim_path_drops_dead_end_crafts_in_one_pass() {
    let graph =
        DependencyGraph::from_recipes(&[recipe("Z", "A"), recipe("Y", "B")]).unwrap();
    let oracle = ReachabilityOracle::new(&graph);
    let goals = Bus::from_items(["Y"]);

    // Z is crafted from A but never used.
    let path = vec![
        Bus::from_items(["A", "B"]),
        Bus::from_items(["A", "B", "Z"]),
        Bus::from_items(["A", "B", "Y", "Z"]),
    ];

    let once = trim_path(&oracle, &path, &goals, &BTreeSet::new()).unwrap();
    assert_eq!(
        once,
        vec![Bus::from_items(["B"]), Bus::from_items(["B"]), goals.clone()]
    );
    let twice = trim_path(&oracle, &once, &goals, &BTreeSet::new()).unwrap();
    assert_eq!(twice, once);
}
