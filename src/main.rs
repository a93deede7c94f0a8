//! Busplan - Command Line Interface
//!
//! This is the main entry point for the bus planner.
//! Run with `--help` to see all available options.

use clap::{Parser, ValueEnum};
use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use busplan::{
    data::{load_recipes, DEFAULT_RECIPES},
    display::{display_search_report, display_throughput, render_dependency_dot, render_path_dot},
    graph::DependencyGraph,
    hypothesis::GenerationPolicy,
    models::Bus,
    scorer::ScoringStrategy,
    search::{search, CancelToken, SearchConfig},
    throughput::{plan_throughput, unit_demand},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScoringArg {
    /// Remaining crafting distance only
    Distance,
    /// Distance blended with the narrowest widest bus so far
    MinimaxWidth,
}

/// Command-line arguments for Busplan.
#[derive(Parser, Debug)]
#[command(name = "busplan")]
#[command(author, version, about = "Plan a narrow main bus from raw resources to a set of goal items", long_about = None)]
struct Args {
    /// Goal item (repeat for several goals)
    #[arg(short, long = "goal", required = true)]
    goals: Vec<String>,

    /// Starting bus item (repeat; defaults to every raw resource)
    #[arg(short, long = "start")]
    start: Vec<String>,

    /// Recipe table
    #[arg(short, long, default_value = DEFAULT_RECIPES)]
    data: PathBuf,

    /// Number of expansions before the search stops
    #[arg(short = 'n', long, default_value = "500")]
    max_iterations: usize,

    /// Bus scoring strategy
    #[arg(long, value_enum, default_value = "distance")]
    scoring: ScoringArg,

    /// Weight of the width term for minimax-width scoring
    #[arg(long, default_value = "0.5")]
    minimax_weight: f64,

    /// Also consider dropping one item per step
    #[arg(long, default_value = "false")]
    allow_removal: bool,

    /// Cap on shortest derivations examined per solution
    #[arg(long, default_value = "64")]
    max_paths: usize,

    /// Items the trimmer must always keep
    #[arg(long = "keep")]
    keep: Vec<String>,

    /// Stop the search after this many seconds and report the best so far
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Scales recipe rates in the throughput table (60 for per-minute figures)
    #[arg(long, default_value = "1.0")]
    time_constant: f64,

    /// Write the recipe graph as Graphviz DOT to this file
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Write the best path as Graphviz DOT to this file
    #[arg(long)]
    path_dot: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    if !args.data.exists() {
        eprintln!(
            "Error: recipe table '{}' not found. Please run from the project root or pass --data.",
            args.data.display()
        );
        std::process::exit(1);
    }

    let recipes = load_recipes(&args.data)?;
    let graph = DependencyGraph::from_recipes(&recipes)?;

    let goals = Bus::try_from_items(args.goals.clone())?;
    graph.check_known(goals.iter())?;
    let start = if args.start.is_empty() {
        graph.roots().into_iter().collect()
    } else {
        Bus::try_from_items(args.start.clone())?
    };
    graph.check_known(start.iter())?;
    let keep: BTreeSet<String> = args.keep.iter().cloned().collect();
    graph.check_known(keep.iter())?;

    let scoring = match args.scoring {
        ScoringArg::Distance => ScoringStrategy::Distance,
        ScoringArg::MinimaxWidth => ScoringStrategy::minimax_width(args.minimax_weight)?,
    };
    let config = SearchConfig {
        max_iterations: args.max_iterations,
        scoring,
        generation: if args.allow_removal {
            GenerationPolicy::CreationAndRemoval
        } else {
            GenerationPolicy::CreationOnly
        },
        max_paths_per_solution: args.max_paths,
        trim_exceptions: keep,
    };

    println!("Busplan - Main Bus Planner");
    println!("================================================================");
    println!();
    println!("Configuration:");
    println!("  Recipes:         {} ({} items)", args.data.display(), graph.len());
    println!("  Goal:            {}", goals);
    println!("  Starting bus:    {}", start);
    println!("  Max iterations:  {}", config.max_iterations);
    println!("  Scoring:         {:?}", config.scoring);
    println!("  Generation:      {:?}", config.generation);

    let cancel = CancelToken::new();
    if let Some(secs) = args.timeout_secs {
        let timer = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            timer.cancel();
        });
    }

    let report = search(&graph, goals.clone(), start, config, &cancel)?;
    display_search_report(&report);

    let throughput = plan_throughput(&graph, &unit_demand(goals.iter()), args.time_constant);
    display_throughput(&throughput);

    if let Some(path) = &args.dot {
        fs::write(path, render_dependency_dot(&graph, &throughput))?;
        println!("Recipe graph written to {}", path.display());
    }
    if let Some(path) = &args.path_dot {
        match &report.best {
            Some(best) => {
                fs::write(path, render_path_dot(best))?;
                println!("Best path written to {}", path.display());
            }
            None => println!("[WARNING] No path to write to {}", path.display()),
        }
    }

    Ok(())
}
