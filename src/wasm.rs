//! WebAssembly bindings for busplan.
//!
//! This module provides JavaScript-accessible functions over the recipe table
//! embedded in the binary. Inputs and outputs are JSON strings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::parse_recipes;
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::hypothesis::GenerationPolicy;
use crate::models::{Bus, Item, StepDiff};
use crate::scorer::ScoringStrategy;
use crate::search::{search, CancelToken, SearchConfig, SearchStatus};

/// JavaScript-friendly search input.
#[derive(Debug, Clone, Deserialize)]
pub struct JsSearchInput {
    pub goals: Vec<Item>,
    /// Defaults to the raw items of the recipe table
    #[serde(default)]
    pub starting_bus: Option<Vec<Item>>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub scoring: ScoringName,
    #[serde(default = "default_minimax_weight")]
    pub minimax_weight: f64,
    #[serde(default)]
    pub allow_removal: bool,
}

fn default_max_iterations() -> usize {
    500
}

fn default_minimax_weight() -> f64 {
    0.5
}

/// Scoring strategy as spelled in JSON input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringName {
    #[default]
    Distance,
    MinimaxWidth,
}

/// JavaScript-friendly search result.
#[derive(Debug, Clone, Serialize)]
pub struct JsSearchResult {
    pub success: bool,
    pub error: Option<String>,
    pub steps: Vec<Vec<Item>>,
    pub diffs: Vec<StepDiff>,
    pub width: usize,
    pub length: usize,
    pub mean_width: f64,
    pub status: String,
    pub iterations: usize,
}

impl JsSearchResult {
    fn failure(error: String) -> Self {
        JsSearchResult {
            success: false,
            error: Some(error),
            steps: vec![],
            diffs: vec![],
            width: 0,
            length: 0,
            mean_width: 0.0,
            status: String::new(),
            iterations: 0,
        }
    }
}

fn status_name(status: SearchStatus) -> &'static str {
    match status {
        SearchStatus::BudgetExhausted => "budget_exhausted",
        SearchStatus::SpaceExhausted => "space_exhausted",
        SearchStatus::Cancelled => "cancelled",
    }
}

/// Get embedded recipe data.
/// This embeds the CSV data directly into the WASM binary.
fn embedded_graph() -> Result<DependencyGraph> {
    let recipes = parse_recipes(include_str!("../data/recipes.csv").as_bytes())?;
    DependencyGraph::from_recipes(&recipes)
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(message: &str) {
    tracing::debug!("{}", message);
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    0.0
}

fn run_search(input: JsSearchInput) -> Result<JsSearchResult> {
    let graph = embedded_graph()?;

    let goals = Bus::try_from_items(input.goals)?;
    graph.check_known(goals.iter())?;
    let start = match input.starting_bus {
        Some(items) => Bus::try_from_items(items)?,
        None => graph.roots().into_iter().collect(),
    };
    graph.check_known(start.iter())?;

    let scoring = match input.scoring {
        ScoringName::Distance => ScoringStrategy::Distance,
        ScoringName::MinimaxWidth => ScoringStrategy::minimax_width(input.minimax_weight)?,
    };
    let config = SearchConfig {
        max_iterations: input.max_iterations,
        scoring,
        generation: if input.allow_removal {
            GenerationPolicy::CreationAndRemoval
        } else {
            GenerationPolicy::CreationOnly
        },
        max_paths_per_solution: SearchConfig::default().max_paths_per_solution,
        trim_exceptions: BTreeSet::new(),
    };

    let report = search(&graph, goals, start, config, &CancelToken::new())?;
    let status = status_name(report.status).to_string();
    Ok(match report.best {
        Some(best) => JsSearchResult {
            success: true,
            error: None,
            steps: best
                .steps
                .iter()
                .map(|bus| bus.iter().cloned().collect())
                .collect(),
            diffs: best.diffs,
            width: best.score.width,
            length: best.score.length,
            mean_width: best.score.mean_width,
            status,
            iterations: report.iterations,
        },
        None => JsSearchResult {
            status,
            iterations: report.iterations,
            ..JsSearchResult::failure("Could not find a path to the goal.".to_string())
        },
    })
}

/// Run the bus search with the given configuration.
///
/// Takes a JSON string input and returns a JSON string result.
#[wasm_bindgen]
pub fn find_bus_path(input_json: &str) -> String {
    let input: JsSearchInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => {
            return serde_json::to_string(&JsSearchResult::failure(format!("Invalid input: {}", e)))
                .unwrap_or_default();
        }
    };

    let started = now_ms();
    let result = match run_search(input) {
        Ok(result) => result,
        Err(e) => JsSearchResult::failure(e.to_string()),
    };
    log(&format!(
        "bus search finished: success={} iterations={} in {:.0}ms",
        result.success,
        result.iterations,
        now_ms() - started
    ));

    serde_json::to_string(&result).unwrap_or_default()
}

/// Get the version of the planner.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the list of items in the embedded recipe table.
/// Returns JSON array of item names and whether they are raw resources.
#[wasm_bindgen]
pub fn get_items() -> String {
    #[derive(Serialize)]
    struct ItemInfo {
        name: String,
        is_raw: bool,
    }

    let graph = match embedded_graph() {
        Ok(graph) => graph,
        Err(_) => return "[]".to_string(),
    };
    let roots = graph.roots();
    let items: Vec<ItemInfo> = graph
        .items()
        .into_iter()
        .map(|name| ItemInfo {
            is_raw: roots.contains(&name),
            name,
        })
        .collect();

    serde_json::to_string(&items).unwrap_or_default()
}
