//! # Busplan
//!
//! A command-line tool and library for planning a narrow main bus through a
//! production dependency graph.
//!
//! Given a set of goal items and a starting bus (by default every raw
//! resource), the search finds an incremental path of buses, each one item
//! larger than the last, that ends with every goal available. The path is then
//! trimmed so each bus only carries items a later step still consumes, and the
//! narrowest path seen within the iteration budget is reported.
//!
//! ## Modules
//!
//! - [`models`] - Items, buses, recipes, and scored paths
//! - [`data`] - CSV recipe loading
//! - [`graph`] - The recipe dependency graph
//! - [`oracle`] - Reachability predicates with memoisation
//! - [`hypothesis`] - Candidate next buses
//! - [`scorer`] - Heuristic bus scoring strategies
//! - [`search`] - The best-first search engine
//! - [`trim`] - Path trimming
//! - [`select`] - Best-path selection
//! - [`throughput`] - Quantity and assembler bookkeeping
//! - [`display`] - Output formatting and DOT rendering
//!
//! ## Example Usage
//!
//! ```no_run
//! use busplan::{
//!     data::load_recipes,
//!     display::display_search_report,
//!     graph::DependencyGraph,
//!     models::Bus,
//!     search::{search, CancelToken, SearchConfig},
//! };
//! use std::path::Path;
//!
//! let recipes = load_recipes(Path::new("data/recipes.csv")).unwrap();
//! let graph = DependencyGraph::from_recipes(&recipes).unwrap();
//!
//! let goals = Bus::from_items(["Science Pack 1", "Science Pack 2"]);
//! let start: Bus = graph.roots().into_iter().collect();
//!
//! let report = search(&graph, goals, start, SearchConfig::default(), &CancelToken::new()).unwrap();
//! display_search_report(&report);
//! ```
//!
//! ## Scoring Strategies
//!
//! 1. **Distance** (default): sum of crafting steps still needed per goal.
//!
//! 2. **Minimax width**: blends the distance with the narrowest widest bus on
//!    the way from the start, biasing the search toward narrow buses.

pub mod data;
pub mod display;
pub mod error;
pub mod graph;
pub mod hypothesis;
pub mod models;
pub mod oracle;
pub mod scorer;
pub mod search;
pub mod select;
pub mod throughput;
pub mod trim;
pub mod wasm;
