//! Generate-and-test search over buses.
//!
//! The engine grows a [`HypothesisGraph`] of explored buses from the starting
//! bus. Each iteration expands the lowest scored unexpanded bus, adding one
//! child per hypothesis. Whenever a child already holds every goal, all
//! shortest derivations of it are trimmed and offered to the best-path
//! selector. The search keeps going after the first solution until the
//! iteration budget runs out, the frontier is empty, or it is cancelled.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::hypothesis::{generate, GenerationPolicy};
use crate::models::{BestPath, Bus, HypothesisNode, Item, StepDiff};
use crate::oracle::ReachabilityOracle;
use crate::scorer::{BusScorer, ScoringStrategy};
use crate::select::BestPathSelector;
use crate::trim::trim_path;

/// Cooperative cancellation flag, checked between expansions.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Graph of explored buses. Nodes and edges are only ever added.
#[derive(Debug)]
pub struct HypothesisGraph {
    graph: DiGraph<HypothesisNode, StepDiff>,
    index: HashMap<Bus, NodeIndex>,
    root: NodeIndex,
}

impl HypothesisGraph {
    fn new(root: HypothesisNode) -> Self {
        let mut graph = DiGraph::new();
        let bus = root.bus.clone();
        let root = graph.add_node(root);
        let mut index = HashMap::new();
        index.insert(bus, root);
        HypothesisGraph { graph, index, root }
    }

    fn add_node(&mut self, node: HypothesisNode) -> NodeIndex {
        let bus = node.bus.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(bus, idx);
        idx
    }

    fn add_edge(&mut self, parent: &Bus, child: &Bus) {
        if let (Some(&from), Some(&to)) = (self.index.get(parent), self.index.get(child)) {
            self.graph
                .update_edge(from, to, StepDiff::between(parent, child));
        }
    }

    fn node_mut(&mut self, bus: &Bus) -> Option<&mut HypothesisNode> {
        let idx = *self.index.get(bus)?;
        Some(&mut self.graph[idx])
    }

    /// The bus the search started from.
    pub fn root(&self) -> &Bus {
        &self.graph[self.root].bus
    }

    pub fn contains(&self, bus: &Bus) -> bool {
        self.index.contains_key(bus)
    }

    pub fn node(&self, bus: &Bus) -> Option<&HypothesisNode> {
        self.index.get(bus).map(|&idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &HypothesisNode> {
        self.graph.node_weights()
    }

    /// All edges as (parent, child, diff).
    pub fn edges(&self) -> impl Iterator<Item = (&Bus, &Bus, &StepDiff)> {
        self.graph.edge_indices().filter_map(move |e| {
            let (from, to) = self.graph.edge_endpoints(e)?;
            Some((&self.graph[from].bus, &self.graph[to].bus, &self.graph[e]))
        })
    }

    /// Buses with no children yet.
    pub fn heads(&self) -> Vec<&Bus> {
        self.graph
            .node_indices()
            .filter(|&n| {
                self.graph
                    .neighbors_directed(n, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|n| &self.graph[n].bus)
            .collect()
    }

    /// Smallest possible largest bus size over all paths from the root to `bus`.
    pub fn minimax_width(&self, bus: &Bus) -> Option<usize> {
        let target = *self.index.get(bus)?;
        let mut best: HashMap<NodeIndex, usize> = HashMap::new();
        let mut heap = BinaryHeap::new();
        let start = self.graph[self.root].bus.len();
        best.insert(self.root, start);
        heap.push(Reverse((start, self.root)));

        while let Some(Reverse((width, node))) = heap.pop() {
            if node == target {
                return Some(width);
            }
            if best.get(&node).is_some_and(|&w| w < width) {
                continue;
            }
            for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
                let through = width.max(self.graph[next].bus.len());
                if best.get(&next).map_or(true, |&w| through < w) {
                    best.insert(next, through);
                    heap.push(Reverse((through, next)));
                }
            }
        }
        None
    }

    /// Edge-count distances from the root.
    fn depths(&self) -> HashMap<NodeIndex, usize> {
        let mut depth = HashMap::new();
        let mut queue = VecDeque::new();
        depth.insert(self.root, 0);
        queue.push_back(self.root);
        while let Some(node) = queue.pop_front() {
            let d = depth[&node];
            for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
                if !depth.contains_key(&next) {
                    depth.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        depth
    }

    /// All shortest paths from the root to `target`, at most `limit` of them,
    /// in lexicographic order of their buses read from the target backwards.
    pub fn shortest_paths(&self, target: &Bus, limit: usize) -> Vec<Vec<Bus>> {
        let mut paths = Vec::new();
        let Some(&target) = self.index.get(target) else {
            return paths;
        };
        let depth = self.depths();
        if !depth.contains_key(&target) {
            return paths;
        }
        let mut suffix = Vec::new();
        self.collect_paths(target, &depth, &mut suffix, &mut paths, limit);
        paths
    }

    fn collect_paths(
        &self,
        node: NodeIndex,
        depth: &HashMap<NodeIndex, usize>,
        suffix: &mut Vec<NodeIndex>,
        paths: &mut Vec<Vec<Bus>>,
        limit: usize,
    ) {
        if paths.len() >= limit {
            return;
        }
        suffix.push(node);
        if node == self.root {
            paths.push(suffix.iter().rev().map(|&n| self.graph[n].bus.clone()).collect());
        } else {
            let d = depth[&node];
            let mut parents: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .filter(|p| depth.get(p).is_some_and(|&pd| pd + 1 == d))
                .collect();
            parents.sort_by(|a, b| self.graph[*a].bus.cmp(&self.graph[*b].bus));
            parents.dedup();
            for parent in parents {
                self.collect_paths(parent, depth, suffix, paths, limit);
            }
        }
        suffix.pop();
    }
}

/// Frontier ordering: lowest score first, ties broken by bus order.
#[derive(Debug)]
struct FrontierKey {
    score: f64,
    bus: Bus,
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.bus.cmp(&other.bus))
    }
}

/// Tunables of a search run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Expansion budget
    pub max_iterations: usize,
    pub scoring: ScoringStrategy,
    pub generation: GenerationPolicy,
    /// Cap on shortest derivations enumerated per terminal bus
    pub max_paths_per_solution: usize,
    /// Items the trimmer always keeps
    pub trim_exceptions: BTreeSet<Item>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: 500,
            scoring: ScoringStrategy::Distance,
            generation: GenerationPolicy::CreationOnly,
            max_paths_per_solution: 64,
            trim_exceptions: BTreeSet::new(),
        }
    }
}

/// Why a search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The iteration budget was used up.
    BudgetExhausted,
    /// No valid unexpanded bus was left.
    SpaceExhausted,
    /// The cancel token was set.
    Cancelled,
}

/// Outcome of a search run. `best` is `None` when no solution was found.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub best: Option<BestPath>,
    pub status: SearchStatus,
    pub iterations: usize,
    /// Terminal buses discovered
    pub solutions: usize,
    /// Trimmed paths compared by the selector
    pub paths_examined: usize,
    pub graph_nodes: usize,
}

/// Best-first search engine over one dependency graph and goal set.
pub struct SearchEngine<'g> {
    oracle: ReachabilityOracle<'g>,
    goals: Bus,
    config: SearchConfig,
    scorer: Box<dyn BusScorer>,
    hypotheses: HypothesisGraph,
    frontier: BinaryHeap<Reverse<FrontierKey>>,
    selector: BestPathSelector,
    iterations: usize,
    solutions: usize,
}

impl<'g> SearchEngine<'g> {
    /// Seeds a search from `start`.
    ///
    /// # Errors
    ///
    /// [`Error::GoalUnreachable`] if `start` can never supply the goals.
    pub fn new(
        graph: &'g DependencyGraph,
        goals: Bus,
        start: Bus,
        config: SearchConfig,
    ) -> Result<Self> {
        let scorer = config.scoring.scorer();
        Self::with_scorer(graph, goals, start, config, scorer)
    }

    /// Like [`SearchEngine::new`], but scores buses with `scorer` instead of
    /// `config.scoring`.
    pub fn with_scorer(
        graph: &'g DependencyGraph,
        goals: Bus,
        start: Bus,
        config: SearchConfig,
        scorer: Box<dyn BusScorer>,
    ) -> Result<Self> {
        let oracle = ReachabilityOracle::new(graph);
        if !oracle.is_valid_bus(&goals, &start) {
            let missing = if start.is_empty() {
                goals.iter().cloned().collect()
            } else {
                oracle.unsupplied_goals(&goals, &start)
            };
            return Err(Error::GoalUnreachable { missing });
        }

        let terminal = oracle.is_terminal(&goals, &start);
        let hypotheses = HypothesisGraph::new(HypothesisNode {
            bus: start.clone(),
            valid: true,
            terminal,
            expanded: terminal,
            score: None,
        });

        let mut engine = SearchEngine {
            oracle,
            goals,
            config,
            scorer,
            hypotheses,
            frontier: BinaryHeap::new(),
            selector: BestPathSelector::new(),
            iterations: 0,
            solutions: 0,
        };

        let score = engine.score(&start)?;
        if let Some(node) = engine.hypotheses.node_mut(&start) {
            node.score = Some(score);
        }
        if terminal {
            engine.record_solution(&start)?;
        } else {
            engine.frontier.push(Reverse(FrontierKey { score, bus: start }));
        }
        Ok(engine)
    }

    fn score(&self, bus: &Bus) -> Result<f64> {
        self.scorer
            .score(&self.oracle, &self.hypotheses, bus, &self.goals)
    }

    /// Lowest scored bus that has not been expanded.
    fn select_next(&mut self) -> Option<Bus> {
        while let Some(Reverse(key)) = self.frontier.pop() {
            if self.hypotheses.node(&key.bus).is_some_and(|n| !n.expanded) {
                return Some(key.bus);
            }
        }
        None
    }

    /// Generates the children of `bus`. Returns the newly found terminal buses.
    fn expand(&mut self, bus: &Bus) -> Result<Vec<Bus>> {
        if let Some(node) = self.hypotheses.node_mut(bus) {
            node.expanded = true;
        }

        let children = generate(&self.oracle, bus, self.config.generation);
        let mut terminals = Vec::new();
        for child in children {
            if self.hypotheses.contains(&child) {
                self.hypotheses.add_edge(bus, &child);
                continue;
            }

            let valid = self.oracle.is_valid_bus(&self.goals, &child);
            let terminal = self.oracle.is_terminal(&self.goals, &child);
            self.hypotheses.add_node(HypothesisNode {
                bus: child.clone(),
                valid,
                terminal,
                expanded: terminal,
                score: None,
            });
            self.hypotheses.add_edge(bus, &child);

            if valid {
                let score = self.score(&child)?;
                if let Some(node) = self.hypotheses.node_mut(&child) {
                    node.score = Some(score);
                }
                if !terminal {
                    self.frontier.push(Reverse(FrontierKey { score, bus: child.clone() }));
                }
            }
            if terminal {
                terminals.push(child);
            }
        }
        Ok(terminals)
    }

    /// Trims every shortest derivation of `anchor` and offers it to the selector.
    fn record_solution(&mut self, anchor: &Bus) -> Result<()> {
        self.solutions += 1;
        let paths = self
            .hypotheses
            .shortest_paths(anchor, self.config.max_paths_per_solution);
        for path in paths {
            let trimmed = trim_path(
                &self.oracle,
                &path,
                &self.goals,
                &self.config.trim_exceptions,
            )?;
            let candidate = BestPath::new(trimmed)?;
            let score = candidate.score;
            if self.selector.offer(candidate) {
                info!(
                    width = score.width,
                    length = score.length,
                    mean_width = score.mean_width,
                    "new best path"
                );
            }
        }
        Ok(())
    }

    /// Runs until the budget is spent, the frontier empties, or `cancel` is set.
    ///
    /// Cancellation is observed between expansions, so the hypothesis graph is
    /// always left consistent and the best path found so far is returned.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<SearchReport> {
        let status = loop {
            if cancel.is_cancelled() {
                warn!(iterations = self.iterations, "search cancelled");
                break SearchStatus::Cancelled;
            }
            if self.iterations >= self.config.max_iterations {
                break SearchStatus::BudgetExhausted;
            }
            let Some(next) = self.select_next() else {
                if self.selector.best().is_none() {
                    warn!(iterations = self.iterations, "search space exhausted without a solution");
                }
                break SearchStatus::SpaceExhausted;
            };

            let terminals = self.expand(&next)?;
            self.iterations += 1;
            debug!(
                iteration = self.iterations,
                width = next.len(),
                nodes = self.hypotheses.node_count(),
                terminals = terminals.len(),
                "expanded bus"
            );
            for anchor in &terminals {
                self.record_solution(anchor)?;
            }
        };

        info!(
            ?status,
            iterations = self.iterations,
            solutions = self.solutions,
            nodes = self.hypotheses.node_count(),
            "search finished"
        );
        Ok(self.report(status))
    }

    fn report(&self, status: SearchStatus) -> SearchReport {
        SearchReport {
            best: self.selector.best().cloned(),
            status,
            iterations: self.iterations,
            solutions: self.solutions,
            paths_examined: self.selector.offered(),
            graph_nodes: self.hypotheses.node_count(),
        }
    }

    pub fn hypotheses(&self) -> &HypothesisGraph {
        &self.hypotheses
    }

    pub fn oracle(&self) -> &ReachabilityOracle<'g> {
        &self.oracle
    }

    pub fn goals(&self) -> &Bus {
        &self.goals
    }
}

/// Builds an engine and runs it to completion.
///
/// # Example
///
/// ```
/// use busplan::graph::DependencyGraph;
/// use busplan::models::{Bus, Ingredient, Recipe};
/// use busplan::search::{search, CancelToken, SearchConfig};
///
/// let recipes = vec![Recipe {
///     product: "Iron Gear Wheel".to_string(),
///     time: 0.5,
///     output: 1.0,
///     ingredients: vec![Ingredient { item: "Iron Plate".to_string(), amount: 2.0 }],
/// }];
/// let graph = DependencyGraph::from_recipes(&recipes).unwrap();
/// let report = search(
///     &graph,
///     Bus::from_items(["Iron Gear Wheel"]),
///     Bus::from_items(["Iron Plate"]),
///     SearchConfig::default(),
///     &CancelToken::new(),
/// )
/// .unwrap();
/// let best = report.best.unwrap();
/// assert_eq!(best.steps.last(), Some(&Bus::from_items(["Iron Gear Wheel"])));
/// ```
pub fn search(
    graph: &DependencyGraph,
    goals: Bus,
    start: Bus,
    config: SearchConfig,
    cancel: &CancelToken,
) -> Result<SearchReport> {
    let mut engine = SearchEngine::new(graph, goals, start, config)?;
    engine.run(cancel)
}
