//! Display and formatting utilities for busplan.
//!
//! This module prints search results as text and renders the recipe graph and
//! the chosen path as Graphviz DOT source.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use crate::graph::DependencyGraph;
use crate::models::{BestPath, Item};
use crate::search::{SearchReport, SearchStatus};
use crate::throughput::ItemThroughput;

/// Formats an item set as `{a, b, c}`.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use busplan::display::format_items;
///
/// let items: BTreeSet<String> = ["Coal", "Stone"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(format_items(&items), "{Coal, Stone}");
/// ```
pub fn format_items(items: &BTreeSet<Item>) -> String {
    let names: Vec<&str> = items.iter().map(String::as_str).collect();
    format!("{{{}}}", names.join(", "))
}

/// Formats the buses, step diffs and width summary of a path.
pub fn format_best_path(path: &BestPath) -> String {
    let mut out = String::new();
    for (i, bus) in path.steps.iter().enumerate() {
        let _ = writeln!(out, "  Bus {:>2} ({:>2} items): {}", i, bus.len(), bus);
    }
    out.push('\n');
    for (i, diff) in path.diffs.iter().enumerate() {
        if !diff.added.is_empty() {
            let _ = writeln!(out, "  Step {:>2} added:   {}", i + 1, format_items(&diff.added));
        }
        if !diff.removed.is_empty() {
            let _ = writeln!(out, "  Step {:>2} removed: {}", i + 1, format_items(&diff.removed));
        }
    }
    let _ = writeln!(
        out,
        "\n  Width: {}  Length: {}  Mean width: {:.2}",
        path.score.width, path.score.length, path.score.mean_width
    );
    out
}

/// Human-readable reason a search stopped.
pub fn status_label(status: SearchStatus) -> &'static str {
    match status {
        SearchStatus::BudgetExhausted => "iteration budget exhausted",
        SearchStatus::SpaceExhausted => "search space exhausted",
        SearchStatus::Cancelled => "cancelled",
    }
}

/// Displays the complete search results to stdout.
pub fn display_search_report(report: &SearchReport) {
    println!();
    println!("+================================================================+");
    println!("|                    BUS SEARCH RESULTS                          |");
    println!("+================================================================+");
    println!();
    println!("[SEARCH]");
    println!("----------------------------------------------------------------");
    println!("  Stopped:          {}", status_label(report.status));
    println!("  Iterations:       {}", report.iterations);
    println!("  Solutions found:  {}", report.solutions);
    println!("  Paths compared:   {}", report.paths_examined);
    println!("  Buses explored:   {}", report.graph_nodes);
    println!();

    match &report.best {
        Some(path) => {
            println!("[BEST PATH]");
            println!("----------------------------------------------------------------");
            print!("{}", format_best_path(path));
        }
        None => {
            println!("[WARNING] No path to the goal was found.");
        }
    }
    println!();
}

/// Displays the throughput table for items that are actually needed.
pub fn display_throughput(throughput: &[ItemThroughput]) {
    println!("[THROUGHPUT]");
    println!("----------------------------------------------------------------");
    println!("{:<28} {:>12} {:>10} {:>10}", "Item", "Needed", "Rate", "Factories");
    println!("----------------------------------------------------------------");
    for entry in throughput.iter().filter(|t| t.quantity_needed > 0.0) {
        let rate = entry
            .rate_per_factory
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "raw".to_string());
        let factories = entry
            .factories_needed
            .map(|f| format!("{:.2}", f))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:>12.2} {:>10} {:>10}",
            entry.item, entry.quantity_needed, rate, factories
        );
    }
    println!();
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Renders the recipe graph as DOT, labelling nodes with throughput figures.
pub fn render_dependency_dot(graph: &DependencyGraph, throughput: &[ItemThroughput]) -> String {
    let by_item: HashMap<&str, &ItemThroughput> =
        throughput.iter().map(|t| (t.item.as_str(), t)).collect();

    let mut out = String::new();
    out.push_str("digraph recipes {\n");
    out.push_str("  rankdir=LR;\n");
    for item in graph.items() {
        let mut lines = vec![escape(&item)];
        if let Some(recipe) = graph.recipe(&item) {
            if let (Some(time), Some(output)) = (recipe.time, recipe.output) {
                lines.push(format!("Time: {:.2}", time));
                lines.push(format!("QuantityOut: {:.2}", output));
            }
        }
        if let Some(t) = by_item.get(item.as_str()) {
            lines.push(format!("QuantityNeeded: {:.2}", t.quantity_needed));
            if let Some(factories) = t.factories_needed {
                lines.push(format!("FactoriesNeeded: {:.2}", factories));
            }
        }
        let _ = writeln!(
            out,
            "  \"{}\" [label=\"{}\"];",
            escape(&item),
            lines.join("\\n")
        );
    }
    for (from, to, quantity) in graph.edges() {
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"QuantityPer: {:.2}\"];",
            escape(&from),
            escape(&to),
            quantity
        );
    }
    out.push_str("}\n");
    out
}

/// Renders a path as a DOT chain of buses with the diff on each edge.
pub fn render_path_dot(path: &BestPath) -> String {
    let mut out = String::new();
    out.push_str("digraph path {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=box];\n");
    for (i, bus) in path.steps.iter().enumerate() {
        let items: Vec<String> = bus.iter().map(|item| escape(item)).collect();
        let _ = writeln!(out, "  step{} [label=\"{}\"];", i, items.join("\\n"));
    }
    for (i, diff) in path.diffs.iter().enumerate() {
        let mut label = String::new();
        if !diff.added.is_empty() {
            let _ = write!(label, "+ {}", escape(&format_items(&diff.added)));
        }
        if !diff.removed.is_empty() {
            if !label.is_empty() {
                label.push_str("\\n");
            }
            let _ = write!(label, "- {}", escape(&format_items(&diff.removed)));
        }
        let _ = writeln!(out, "  step{} -> step{} [label=\"{}\"];", i, i + 1, label);
    }
    out.push_str("}\n");
    out
}
