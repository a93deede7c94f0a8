//! Tests for reachability predicates and crafting distances.

use busplan::data::load_recipes;
use busplan::error::Error;
use busplan::graph::DependencyGraph;
use busplan::models::Bus;
use busplan::oracle::ReachabilityOracle;
use std::path::Path;

fn load_graph() -> Option<DependencyGraph> {
    let data_path = Path::new("data/recipes.csv");
    if !data_path.exists() {
        return None;
    }
    let recipes = load_recipes(data_path).expect("Failed to load data");
    Some(DependencyGraph::from_recipes(&recipes).expect("Recipes should be acyclic"))
}

fn science_goals() -> Bus {
    Bus::from_items([
        "Science Pack 1",
        "Science Pack 2",
        "Science Pack 3",
        "Production Science Pack",
        "Military Science Pack",
        "High Tech Science Pack",
    ])
}

#[test]
fn test_direct_supplied_by() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    assert!(oracle.direct_supplied_by(
        "Electronic Circuit",
        &Bus::from_items(["Iron Plate", "Copper Wire"])
    ));
    assert!(!oracle.direct_supplied_by("Electronic Circuit", &Bus::from_items(["Iron Plate"])));
    assert!(oracle.direct_supplied_by(
        "Electronic Circuit",
        &Bus::from_items(["Iron Plate", "Copper Wire", "Iron Gear Wheel"])
    ));
}

#[test]
fn test_raw_items_are_never_directly_supplied() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    let bus = Bus::from_items(["Iron Ore"]);
    assert!(!oracle.direct_supplied_by("Iron Ore", &bus));
    assert!(oracle.recursively_supplied_by("Iron Ore", &bus));
    assert!(!oracle.recursively_supplied_by("Coal", &bus));
}

#[test]
fn test_recursively_supplied_by() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);

    assert!(oracle.recursively_supplied_by(
        "Electronic Circuit",
        &Bus::from_items(["Iron Ore", "Copper Plate"])
    ));
    assert!(!oracle.recursively_supplied_by("Electronic Circuit", &Bus::from_items(["Iron Ore"])));
    assert!(oracle.recursively_supplied_by(
        "Electronic Circuit",
        &Bus::from_items(["Iron Ore", "Copper Wire", "Iron Gear Wheel"])
    ));
}

#[test]
fn test_goal_set_supplied_by() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let goals = Bus::from_items(["Electronic Circuit", "Steel Plate"]);

    assert!(oracle.goal_set_supplied_by(&goals, &Bus::from_items(["Iron Ore", "Copper Plate"])));
    assert!(!oracle.goal_set_supplied_by(&goals, &Bus::from_items(["Iron Ore"])));
    assert_eq!(
        oracle.unsupplied_goals(&goals, &Bus::from_items(["Iron Ore"])),
        vec!["Electronic Circuit".to_string()]
    );
}

#[test]
fn test_is_valid_bus() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let goals = science_goals();
    let roots: Bus = graph.roots().into_iter().collect();

    assert!(oracle.is_valid_bus(&goals, &roots));
    assert!(!oracle.is_valid_bus(&goals, &roots.without("Iron Ore")));
    assert!(oracle.is_valid_bus(&goals, &roots.with("Uranium-238")));
    assert!(!oracle.is_valid_bus(&goals, &Bus::default()));
}

#[test]
fn test_is_terminal() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let goals = science_goals();

    assert!(oracle.is_terminal(&goals, &goals));
    assert!(oracle.is_terminal(&goals, &goals.with("Electronic Circuit")));
    assert!(!oracle.is_terminal(&goals, &goals.without("High Tech Science Pack")));
}

#[test]
fn test_direct_supply_implies_recursive_supply() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let roots: Bus = graph.roots().into_iter().collect();
    let buses = [
        roots.clone(),
        Bus::from_items(["Iron Plate", "Copper Plate", "Iron Gear Wheel"]),
        Bus::from_items(["Advanced Circuit", "Electronic Circuit", "Sulfuric Acid", "Battery"]),
        Bus::from_items(["Water", "Petrolium Gas"]),
    ];

    for bus in &buses {
        for item in graph.items() {
            if oracle.direct_supplied_by(&item, bus) {
                assert!(
                    oracle.recursively_supplied_by(&item, bus),
                    "{} is directly but not recursively supplied by {}",
                    item,
                    bus
                );
            }
        }
    }
}

#[test]
fn test_validity_is_monotonic() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let goals = Bus::from_items(["Science Pack 1", "Sulfuric Acid"]);

    let mut bus = Bus::from_items(["Iron Ore", "Copper Ore"]);
    let mut was_valid = oracle.is_valid_bus(&goals, &bus);
    assert!(!was_valid);
    for item in ["Stone", "Water", "Crude Oil", "Coal", "Iron Plate", "Sulfur"] {
        bus = bus.with(item);
        let valid = oracle.is_valid_bus(&goals, &bus);
        assert!(valid || !was_valid, "adding {} invalidated {}", item, bus);
        was_valid = valid;
    }
    assert!(was_valid);
}

#[test]
fn test_distance() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let bus = Bus::from_items(["Iron Ore", "Copper Ore"]);

    assert_eq!(oracle.distance(&bus, "Iron Ore").unwrap(), 0);
    assert_eq!(oracle.distance(&bus, "Iron Plate").unwrap(), 1);
    assert_eq!(oracle.distance(&bus, "Iron Gear Wheel").unwrap(), 2);
    // Closest ingredient wins: Iron Plate (1) beats Copper Wire (2).
    assert_eq!(oracle.distance(&bus, "Electronic Circuit").unwrap(), 2);
    // Cached answers agree with fresh ones.
    assert_eq!(oracle.distance(&bus, "Electronic Circuit").unwrap(), 2);
    assert!(oracle.cache_len() > 0);
}

#[test]
fn test_distance_fails_for_unreachable_items() {
    let Some(graph) = load_graph() else { return };
    let oracle = ReachabilityOracle::new(&graph);
    let bus = Bus::from_items(["Iron Ore"]);

    assert!(matches!(oracle.distance(&bus, "Coal"), Err(Error::Unscorable(_))));
    assert!(oracle.distance(&bus, "Copper Wire").is_err());
}

#[test]
fn test_list_input_with_duplicates_is_rejected() {
    let items = vec!["Iron Plate".to_string(), "Water".to_string(), "Iron Plate".to_string()];
    assert!(matches!(
        Bus::try_from_items(items),
        Err(Error::MalformedBus(item)) if item == "Iron Plate"
    ));

    let ok = Bus::try_from_items(vec!["Water".to_string(), "Iron Plate".to_string()]).unwrap();
    assert_eq!(ok, Bus::from_items(["Iron Plate", "Water"]));
}
