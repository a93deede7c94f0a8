//! The recipe dependency graph.
//!
//! Edges run from ingredient to product, so the predecessors of an item are
//! its ingredients and its successors are the items it is used in. The graph
//! is built once from the loaded recipes and is read-only afterwards.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::{Error, Result};
use crate::models::{Item, Recipe, RecipeNode};

/// Immutable directed acyclic graph of recipes.
///
/// # Example
///
/// ```
/// use busplan::graph::DependencyGraph;
/// use busplan::models::{Ingredient, Recipe};
///
/// let recipes = vec![Recipe {
///     product: "Iron Gear Wheel".to_string(),
///     time: 0.5,
///     output: 1.0,
///     ingredients: vec![Ingredient { item: "Iron Plate".to_string(), amount: 2.0 }],
/// }];
/// let graph = DependencyGraph::from_recipes(&recipes).unwrap();
/// assert!(graph.predecessors("Iron Gear Wheel").contains("Iron Plate"));
/// assert!(graph.roots().contains("Iron Plate"));
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<RecipeNode, f64>,
    index: HashMap<Item, NodeIndex>,
}

impl DependencyGraph {
    /// Builds the graph from recipes.
    ///
    /// Items that only appear as ingredients become raw nodes without a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicRecipes`] if the recipes form a cycle.
    pub fn from_recipes(recipes: &[Recipe]) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut index: HashMap<Item, NodeIndex> = HashMap::new();

        for recipe in recipes {
            let idx = *index.entry(recipe.product.clone()).or_insert_with(|| {
                graph.add_node(RecipeNode {
                    name: recipe.product.clone(),
                    time: None,
                    output: None,
                })
            });
            graph[idx].time = Some(recipe.time);
            graph[idx].output = Some(recipe.output);
        }

        for recipe in recipes {
            let product = index[&recipe.product];
            for ingredient in &recipe.ingredients {
                let source = *index.entry(ingredient.item.clone()).or_insert_with(|| {
                    graph.add_node(RecipeNode {
                        name: ingredient.item.clone(),
                        time: None,
                        output: None,
                    })
                });
                graph.add_edge(source, product, ingredient.amount);
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(Error::CyclicRecipes(graph[cycle.node_id()].name.clone()));
        }

        Ok(DependencyGraph { graph, index })
    }

    fn neighbors(&self, item: &str, direction: Direction) -> BTreeSet<Item> {
        match self.index.get(item) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, direction)
                .map(|n| self.graph[n].name.clone())
                .collect(),
            None => BTreeSet::new(),
        }
    }

    /// The ingredients of `item`. Empty for raw or unknown items.
    pub fn predecessors(&self, item: &str) -> BTreeSet<Item> {
        self.neighbors(item, Direction::Incoming)
    }

    /// The items `item` is used in. Empty for final or unknown items.
    pub fn successors(&self, item: &str) -> BTreeSet<Item> {
        self.neighbors(item, Direction::Outgoing)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.index.contains_key(item)
    }

    /// Number of items in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All item names, sorted.
    pub fn items(&self) -> BTreeSet<Item> {
        self.index.keys().cloned().collect()
    }

    /// Items with no ingredients (raw resources).
    pub fn roots(&self) -> BTreeSet<Item> {
        self.graph
            .node_indices()
            .filter(|&n| {
                self.graph
                    .neighbors_directed(n, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|n| self.graph[n].name.clone())
            .collect()
    }

    /// Items that are not used in any other recipe.
    pub fn heads(&self) -> BTreeSet<Item> {
        self.graph
            .node_indices()
            .filter(|&n| {
                self.graph
                    .neighbors_directed(n, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|n| self.graph[n].name.clone())
            .collect()
    }

    /// Recipe data of an item, if it is in the graph.
    pub fn recipe(&self, item: &str) -> Option<&RecipeNode> {
        self.index.get(item).map(|&idx| &self.graph[idx])
    }

    /// Units of `ingredient` consumed per craft of `product`.
    pub fn quantity_per(&self, ingredient: &str, product: &str) -> Option<f64> {
        let from = *self.index.get(ingredient)?;
        let to = *self.index.get(product)?;
        self.graph.find_edge(from, to).map(|e| self.graph[e])
    }

    /// All edges as (ingredient, product, quantity) triples.
    pub fn edges(&self) -> Vec<(Item, Item, f64)> {
        let mut edges: Vec<(Item, Item, f64)> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (from, to) = self.graph.edge_endpoints(e)?;
                Some((
                    self.graph[from].name.clone(),
                    self.graph[to].name.clone(),
                    self.graph[e],
                ))
            })
            .collect();
        edges.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        edges
    }

    /// Fails with [`Error::UnknownItem`] for the first name not in the graph.
    pub fn check_known<'a, I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        for item in items {
            if !self.contains(item) {
                return Err(Error::UnknownItem(item.clone()));
            }
        }
        Ok(())
    }
}
