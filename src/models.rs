//! Data models and structures for busplan.
//!
//! This module contains the plain data types shared by every stage of the
//! search: items and buses, the recipe records loaded from CSV, the records
//! attached to hypothesis graph nodes and edges, and the scored paths that
//! come out the other end.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named producible good (e.g. "Iron Plate", "Science Pack 1").
pub type Item = String;

/// An immutable, unordered set of items that are available without further crafting.
///
/// Two buses are equal iff their item sets are equal. The items are kept sorted,
/// so the derived `Ord` compares buses lexicographically over their items; the
/// search uses that order to break score ties deterministically.
///
/// Cloning a bus is cheap: the set is shared behind an `Arc`.
///
/// # Example
///
/// ```
/// use busplan::models::Bus;
///
/// let bus = Bus::from_items(["Iron Plate", "Copper Wire"]);
/// assert!(bus.contains("Iron Plate"));
/// assert_eq!(bus.len(), 2);
///
/// // Duplicates in list input are rejected rather than silently collapsed.
/// assert!(Bus::try_from_items(vec!["Coal".to_string(), "Coal".to_string()]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Bus(Arc<BTreeSet<Item>>);

impl Bus {
    /// Builds a bus from anything that yields item names. Duplicates collapse.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Item>,
    {
        Bus(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Builds a bus from list input, failing if the list repeats an item.
    ///
    /// This is the boundary where order-sensitive containers enter the crate;
    /// a duplicated entry means the caller built the list wrong.
    pub fn try_from_items(items: Vec<Item>) -> Result<Self> {
        let mut set = BTreeSet::new();
        for item in items {
            if set.contains(&item) {
                return Err(Error::MalformedBus(item));
            }
            set.insert(item);
        }
        Ok(Bus(Arc::new(set)))
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0.contains(item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.0.iter()
    }

    pub fn items(&self) -> &BTreeSet<Item> {
        &self.0
    }

    /// True iff every item of `self` is also in `other`.
    pub fn is_subset(&self, other: &Bus) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Returns a new bus with `item` added.
    pub fn with(&self, item: &str) -> Bus {
        let mut set = (*self.0).clone();
        set.insert(item.to_string());
        Bus(Arc::new(set))
    }

    /// Returns a new bus with `item` removed.
    pub fn without(&self, item: &str) -> Bus {
        let mut set = (*self.0).clone();
        set.remove(item);
        Bus(Arc::new(set))
    }

    /// Items in `self` that are not in `other`.
    pub fn difference(&self, other: &Bus) -> BTreeSet<Item> {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<Item> for Bus {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Bus(Arc::new(iter.into_iter().collect()))
    }
}

/// A single ingredient of a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    /// Name of the consumed item
    pub item: Item,
    /// Units consumed per craft
    pub amount: f64,
}

/// A recipe producing one item from zero or more ingredients.
///
/// # Example
///
/// ```
/// use busplan::models::{Ingredient, Recipe};
///
/// let circuit = Recipe {
///     product: "Electronic Circuit".to_string(),
///     time: 0.5,
///     output: 1.0,
///     ingredients: vec![
///         Ingredient { item: "Iron Plate".to_string(), amount: 1.0 },
///         Ingredient { item: "Copper Wire".to_string(), amount: 3.0 },
///     ],
/// };
/// assert_eq!(circuit.ingredients.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// The item this recipe produces
    pub product: Item,
    /// Craft time in seconds
    pub time: f64,
    /// Units produced per craft
    pub output: f64,
    /// Consumed items, in CSV column order
    pub ingredients: Vec<Ingredient>,
}

/// Per-node data in the dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeNode {
    pub name: Item,
    /// Craft time in seconds (None for raw resources)
    pub time: Option<f64>,
    /// Units per craft (None for raw resources)
    pub output: Option<f64>,
}

/// Attributes of an explored bus in the hypothesis graph.
#[derive(Debug, Clone)]
pub struct HypothesisNode {
    pub bus: Bus,
    /// The goal set is reachable from this bus with further crafting
    pub valid: bool,
    /// The goal set is already contained in this bus
    pub terminal: bool,
    /// Children have been generated (or the node is terminal)
    pub expanded: bool,
    /// Heuristic distance to the goal; only valid nodes are scored
    pub score: Option<f64>,
}

/// The change between a parent bus and a child bus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepDiff {
    pub added: BTreeSet<Item>,
    pub removed: BTreeSet<Item>,
}

impl StepDiff {
    pub fn between(from: &Bus, to: &Bus) -> Self {
        StepDiff {
            added: to.difference(from),
            removed: from.difference(to),
        }
    }
}

/// Width statistics of a path, used to rank solutions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathScore {
    /// Largest bus cardinality along the path
    pub width: usize,
    /// Number of buses in the path
    pub length: usize,
    /// Mean bus cardinality
    pub mean_width: f64,
}

impl PathScore {
    /// Scores a path. Returns `None` for an empty path.
    pub fn of(path: &[Bus]) -> Option<Self> {
        let width = path.iter().map(Bus::len).max()?;
        let total: usize = path.iter().map(Bus::len).sum();
        Some(PathScore {
            width,
            length: path.len(),
            mean_width: total as f64 / path.len() as f64,
        })
    }
}

/// The best path found by a search.
#[derive(Debug, Clone)]
pub struct BestPath {
    /// Trimmed buses, first is the (trimmed) starting bus, last is the goal set
    pub steps: Vec<Bus>,
    pub score: PathScore,
    /// One diff per consecutive pair of steps
    pub diffs: Vec<StepDiff>,
}

impl BestPath {
    pub fn new(steps: Vec<Bus>) -> Result<Self> {
        let score = PathScore::of(&steps).ok_or(Error::EmptyPath)?;
        let diffs = steps
            .windows(2)
            .map(|pair| StepDiff::between(&pair[0], &pair[1]))
            .collect();
        Ok(BestPath { steps, score, diffs })
    }
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// CSV row structure for the recipe table.
#[derive(Debug, Deserialize)]
pub struct RecipeRow {
    /// Product name
    #[serde(rename = "Parent")]
    pub parent: String,
    /// Craft time in seconds
    #[serde(rename = "Time")]
    pub time: f64,
    /// Units produced per craft
    #[serde(rename = "Output")]
    pub output: f64,
    #[serde(rename = "Child 1")]
    pub child_1: Option<String>,
    #[serde(rename = "Amount 1")]
    pub amount_1: Option<f64>,
    #[serde(rename = "Child 2")]
    pub child_2: Option<String>,
    #[serde(rename = "Amount 2")]
    pub amount_2: Option<f64>,
    #[serde(rename = "Child 3")]
    pub child_3: Option<String>,
    #[serde(rename = "Amount 3")]
    pub amount_3: Option<f64>,
}
