//! Tests for candidate bus generation.

use busplan::data::load_recipes;
use busplan::graph::DependencyGraph;
use busplan::hypothesis::{
    creatable_items, creation_hypotheses, generate, removal_hypotheses, GenerationPolicy,
};
use busplan::models::Bus;
use busplan::oracle::ReachabilityOracle;
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

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_creatable_items() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let bus = Bus::from_items(["Grenade", "Piercing Rounds Magazine", "Gun Turret"]);
    assert_eq!(creatable_items(&oracle, &bus), names(&["Military Science Pack"]));

    let bus = Bus::from_items([
        "Advanced Circuit",
        "Electric Mining Drill",
        "Lubricant",
        "Electronic Circuit",
        "Engine Unit",
    ]);
    assert_eq!(
        creatable_items(&oracle, &bus),
        names(&["Science Pack 3", "Speed Module", "Electric Engine Unit"])
    );

    let bus = Bus::from_items([
        "Battery",
        "Sulfuric Acid",
        "Advanced Circuit",
        "Electric Mining Drill",
        "Lubricant",
        "Electronic Circuit",
        "Engine Unit",
    ]);
    assert_eq!(
        creatable_items(&oracle, &bus),
        names(&["Processing Unit", "Science Pack 3", "Speed Module", "Electric Engine Unit"])
    );
}

#[test]
fn test_creation_hypotheses() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let bus = Bus::from_items(["Grenade", "Piercing Rounds Magazine", "Gun Turret"]);
    let out = creation_hypotheses(&oracle, &bus);
    assert_eq!(out, BTreeSet::from([bus.with("Military Science Pack")]));

    let bus = Bus::from_items([
        "Advanced Circuit",
        "Electric Mining Drill",
        "Lubricant",
        "Electronic Circuit",
        "Engine Unit",
    ]);
    let out = creation_hypotheses(&oracle, &bus);
    assert_eq!(
        out,
        BTreeSet::from([
            bus.with("Science Pack 3"),
            bus.with("Electric Engine Unit"),
            bus.with("Speed Module"),
        ])
    );
}

#[test]
fn test_creation_hypotheses_grow_by_exactly_one() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let roots: Bus = graph.roots().into_iter().collect();

    let mut frontier = vec![roots];
    for _ in 0..3 {
        let mut next = Vec::new();
        for bus in &frontier {
            for hypothesis in creation_hypotheses(&oracle, bus) {
                assert_eq!(hypothesis.len(), bus.len() + 1);
                assert!(bus.is_subset(&hypothesis));
                assert_ne!(&hypothesis, bus);
                next.push(hypothesis);
            }
        }
        assert!(!next.is_empty());
        frontier = next;
    }
}

#[test]
fn test_removal_hypotheses() {
    let out = removal_hypotheses(&Bus::from_items(["Grenade", "Gun Turret"]));
    assert_eq!(
        out,
        BTreeSet::from([Bus::from_items(["Grenade"]), Bus::from_items(["Gun Turret"])])
    );

    assert!(removal_hypotheses(&Bus::from_items(["Gun Turret"])).is_empty());
    assert!(removal_hypotheses(&Bus::default()).is_empty());
}

#[test]
fn test_generate_respects_policy() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let bus = Bus::from_items(["Grenade", "Piercing Rounds Magazine", "Gun Turret"]);

    let creation_only = generate(&oracle, &bus, GenerationPolicy::CreationOnly);
    assert_eq!(creation_only.len(), 1);

    let with_removal = generate(&oracle, &bus, GenerationPolicy::CreationAndRemoval);
    assert_eq!(with_removal.len(), 4);
    assert!(with_removal.contains(&Bus::from_items(["Grenade", "Gun Turret"])));
    assert_eq!(GenerationPolicy::default(), GenerationPolicy::CreationOnly);
}
