//! Randomized, parallel search for spanning interconnection plans
//! over an [`IntersectionGraph`].

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::{EdgeId, IntersectionGraph, NodeId};

/// An ordered sequence of half-edges linking every chosen word into a
/// single spanning, acyclic structure.
pub type Plan = Vec<EdgeId>;

/// Per-attempt mutable state, orthogonal to the immutable graph
/// structure: reset at the start of every attempt.
struct AttemptState {
    visited: Vec<bool>,
    linked: Vec<Vec<bool>>,
    used: Vec<bool>,
    linked_pairs: HashSet<(NodeId, NodeId)>,
}

impl AttemptState {
    fn new(graph: &IntersectionGraph) -> Self {
        AttemptState {
            visited: vec![false; graph.num_nodes()],
            linked: (0..graph.num_nodes())
                .map(|n| vec![false; graph.num_positions(n)])
                .collect(),
            used: vec![false; graph.num_edges()],
            linked_pairs: HashSet::new(),
        }
    }
}

fn canonical_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Run one attempt at building a spanning plan. Returns `None` if the
/// attempt ran out of available nodes before reaching a complete plan
/// -- this is an expected, non-erroneous outcome.
fn attempt_plan(graph: &IntersectionGraph, rng: &mut StdRng) -> Option<Plan> {
    let target_len = graph.num_nodes().saturating_sub(1);
    if target_len == 0 {
        return Some(Vec::new());
    }

    let mut state = AttemptState::new(graph);
    let mut available: Vec<NodeId> = (0..graph.num_nodes()).collect();
    let mut plan: Plan = Vec::new();

    while plan.len() < target_len && !available.is_empty() {
        let idx = rng.gen_range(0..available.len());
        let node = available.remove(idx);

        if state.visited[node] || graph.num_positions(node) == 0 {
            continue;
        }

        let position = rng.gen_range(0..graph.num_positions(node));
        if state.linked[node][position] {
            continue;
        }

        let slot_edges = graph.slot_edges(node, position);
        if slot_edges.is_empty() {
            continue;
        }

        let edge_id = slot_edges[rng.gen_range(0..slot_edges.len())];
        let edge = graph.edge(edge_id);
        if state.used[edge_id] {
            continue;
        }
        let pair_key = canonical_pair(node, edge.target);
        if state.linked_pairs.contains(&pair_key) {
            continue;
        }

        // Commit.
        plan.push(edge_id);
        state.linked_pairs.insert(pair_key);
        state.visited[node] = true;
        state.linked[node][position] = true;
        state.used[edge_id] = true;

        let mirror = *graph.edge(edge.mirror);
        state.linked[mirror.origin][mirror.origin_index] = true;
        state.used[edge.mirror] = true;
    }

    if plan.len() == target_len {
        Some(plan)
    } else {
        None
    }
}

fn canonical_plan_key(graph: &IntersectionGraph, plan: &Plan) -> String {
    plan.iter()
        .map(|&id| graph.edge(id).descriptor(graph))
        .collect::<Vec<_>>()
        .join("--")
}

/// Per-worker search loop: repeat attempts until either `target_paths`
/// distinct complete plans have been collected or `max_iterations`
/// attempts have been made.
fn worker_search(
    graph: &IntersectionGraph,
    target_paths: usize,
    max_iterations: usize,
    seed: u64,
    early_exit: &AtomicBool,
) -> BTreeMap<String, Plan> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut found: BTreeMap<String, Plan> = BTreeMap::new();
    let mut iteration = 0;

    while found.len() < target_paths && iteration < max_iterations {
        iteration += 1;
        if iteration % 64 == 0 && early_exit.load(Ordering::Relaxed) {
            debug!("Worker stopping early after {} iterations ({} plans found)", iteration, found.len());
            break;
        }
        if let Some(plan) = attempt_plan(graph, &mut rng) {
            let key = canonical_plan_key(graph, &plan);
            found.insert(key, plan);
        }
    }

    found
}

/// Sample up to `max_paths` distinct spanning plans (aggregate across
/// `workers` threads) over `graph`, using `master_seed` to derive
/// per-worker independent RNG streams. Each worker runs on its own
/// clone of the graph and communicates its result back over one
/// `mpsc` channel.
pub fn sample_plans(
    graph: &IntersectionGraph,
    max_paths: usize,
    workers: usize,
    max_iterations: usize,
    master_seed: u64,
) -> BTreeMap<String, Plan> {
    let workers = workers.max(1);
    let target_per_worker = (max_paths / workers).max(1);
    let early_exit = Arc::new(AtomicBool::new(false));

    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::with_capacity(workers);

    for worker_index in 0..workers {
        let graph_snapshot = graph.clone();
        let tx = tx.clone();
        let early_exit = Arc::clone(&early_exit);
        let seed = master_seed.wrapping_add(worker_index as u64);

        handles.push(thread::spawn(move || {
            let result = worker_search(&graph_snapshot, target_per_worker, max_iterations, seed, &early_exit);
            let _ = tx.send(result);
        }));
    }
    drop(tx);

    let mut merged: BTreeMap<String, Plan> = BTreeMap::new();
    for result in rx {
        merged.extend(result);
        if merged.len() >= max_paths {
            early_exit.store(true, Ordering::Relaxed);
        }
    }

    for handle in handles {
        let _ = handle.join();
    }

    info!("Sampled {} distinct plans across {} workers", merged.len(), workers);
    merged
}
