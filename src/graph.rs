//! The letter-intersection graph: for a chosen set of words, every
//! position at which two words could cross is recorded as a mirrored
//! pair of half-edges.
//!
//! Modelled as an arena: nodes, slots and half-edges live in flat,
//! indexed `Vec`s; everything else refers to them by integer handle.
//! This makes a worker's per-attempt snapshot cheap to produce
//! (`Clone` of three vectors) and avoids deep-cloning a pointer graph.

use log::debug;

pub type NodeId = usize;
pub type EdgeId = usize;

/// A directional crossing record between two words at specific
/// positions. `mirror` names the half-edge describing the same
/// physical crossing as seen from `target`'s side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    pub char: char,
    pub origin: NodeId,
    pub origin_index: usize,
    pub target: NodeId,
    pub target_index: usize,
    pub mirror: EdgeId,
}

impl HalfEdge {
    /// Canonical descriptor string used to dedupe completed plans.
    pub fn descriptor(&self, graph: &IntersectionGraph) -> String {
        format!(
            "{}_{}({})__linkedto__{}({})_{}",
            graph.word(self.origin),
            self.origin_index,
            self.char,
            self.target_index,
            self.char,
            graph.word(self.target)
        )
    }
}

#[derive(Debug, Clone)]
struct Node {
    word: String,
    /// One entry per letter position; each holds the ids of the
    /// half-edges originating at that (node, position) slot.
    slots: Vec<Vec<EdgeId>>,
}

/// Arena-of-handles multigraph over a chosen word set. Immutable once
/// built; per-attempt mutable state (`visited`/`linked`/`used` flags)
/// lives in the sampler, indexed by the same handles.
#[derive(Debug, Clone)]
pub struct IntersectionGraph {
    nodes: Vec<Node>,
    edges: Vec<HalfEdge>,
}

impl IntersectionGraph {
    /// Build the graph over `words`. Words need not be unique, though
    /// in practice the Assembler feeds it a deduplicated pick.
    pub fn new(words: &[String]) -> Self {
        let nodes: Vec<Node> = words
            .iter()
            .map(|w| Node {
                word: w.clone(),
                slots: vec![Vec::new(); w.chars().count()],
            })
            .collect();
        let mut graph = IntersectionGraph { nodes, edges: Vec::new() };

        let chars: Vec<Vec<char>> = words.iter().map(|w| w.chars().collect()).collect();

        // Each unordered pair is visited exactly once, so every match
        // yields exactly one mirrored pair of half-edges -- no
        // duplicate-detection pass is needed.
        for a in 0..chars.len() {
            for b in (a + 1)..chars.len() {
                for (p, &ca) in chars[a].iter().enumerate() {
                    for (q, &cb) in chars[b].iter().enumerate() {
                        if ca == cb {
                            graph.insert_mirrored_pair(a, p, b, q, ca);
                        }
                    }
                }
            }
        }

        debug!(
            "Built intersection graph over {} words with {} half-edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        graph
    }

    fn insert_mirrored_pair(&mut self, a: NodeId, p: usize, b: NodeId, q: usize, ch: char) {
        let forward_id = self.edges.len();
        let backward_id = forward_id + 1;

        self.edges.push(HalfEdge {
            char: ch,
            origin: a,
            origin_index: p,
            target: b,
            target_index: q,
            mirror: backward_id,
        });
        self.edges.push(HalfEdge {
            char: ch,
            origin: b,
            origin_index: q,
            target: a,
            target_index: p,
            mirror: forward_id,
        });

        self.nodes[a].slots[p].push(forward_id);
        self.nodes[b].slots[q].push(backward_id);
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn word(&self, node: NodeId) -> &str {
        &self.nodes[node].word
    }

    pub fn num_positions(&self, node: NodeId) -> usize {
        self.nodes[node].slots.len()
    }

    /// The mutually-exclusive half-edges originating at `(node, position)`.
    pub fn slot_edges(&self, node: NodeId, position: usize) -> &[EdgeId] {
        &self.nodes[node].slots[position]
    }

    pub fn edge(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id]
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<String> {
        vec!["anel".to_string(), "animal".to_string(), "ato".to_string()]
    }

    #[test]
    fn anel_position_zero_has_three_outgoing_edges() {
        let graph = IntersectionGraph::new(&words());
        let anel = 0;
        let animal = 1;
        let ato = 2;

        let edges = graph.slot_edges(anel, 0);
        assert_eq!(edges.len(), 3);

        let targets: Vec<(NodeId, usize)> = edges
            .iter()
            .map(|&e| {
                let he = graph.edge(e);
                (he.target, he.target_index)
            })
            .collect();

        assert!(targets.contains(&(animal, 0)));
        assert!(targets.contains(&(animal, 4)));
        assert!(targets.contains(&(ato, 0)));
    }

    #[test]
    fn anel_position_three_has_one_outgoing_edge_to_animal_five() {
        let graph = IntersectionGraph::new(&words());
        let anel = 0;
        let animal = 1;

        let edges = graph.slot_edges(anel, 3);
        assert_eq!(edges.len(), 1);
        let he = graph.edge(edges[0]);
        assert_eq!(he.char, 'l');
        assert_eq!(he.target, animal);
        assert_eq!(he.target_index, 5);
    }

    #[test]
    fn ato_position_zero_has_three_outgoing_edges() {
        let graph = IntersectionGraph::new(&words());
        let anel = 0;
        let animal = 1;
        let ato = 2;

        let edges = graph.slot_edges(ato, 0);
        assert_eq!(edges.len(), 3);
        let targets: Vec<(NodeId, usize)> = edges
            .iter()
            .map(|&e| {
                let he = graph.edge(e);
                (he.target, he.target_index)
            })
            .collect();
        assert!(targets.contains(&(anel, 0)));
        assert!(targets.contains(&(animal, 0)));
        assert!(targets.contains(&(animal, 4)));
    }

    #[test]
    fn mirrored_edges_point_back_with_swapped_indices() {
        let graph = IntersectionGraph::new(&words());
        let anel = 0;

        for &edge_id in graph.slot_edges(anel, 0) {
            let forward = *graph.edge(edge_id);
            let mirror = *graph.edge(forward.mirror);
            assert_eq!(mirror.origin, forward.target);
            assert_eq!(mirror.origin_index, forward.target_index);
            assert_eq!(mirror.target, forward.origin);
            assert_eq!(mirror.target_index, forward.origin_index);
            assert_eq!(mirror.char, forward.char);
            // Mirroring is involutive.
            assert_eq!(graph.edge(mirror.mirror).origin, forward.origin);
        }
    }

    #[test]
    fn deep_clone_is_independent() {
        let graph = IntersectionGraph::new(&words());
        let mut clone = graph.clone();
        clone.edges[0].origin_index = 99;
        clone.nodes[0].slots[0].clear();

        assert_ne!(graph.edges[0].origin_index, 99);
        assert!(!graph.nodes[0].slots[0].is_empty());
    }
}
