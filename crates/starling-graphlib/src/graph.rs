//! Undirected weighted graph container.
//!
//! Nodes keep their insertion order; that order is the deterministic index order every
//! downstream algorithm iterates in. Incident edges are kept per node (also in insertion order) so
//! neighbor queries are O(degree) instead of O(E).

use crate::error::{GraphError, Result};
use rustc_hash::FxBuildHasher;

mod entries;

pub mod alg;

use entries::{EdgeEntry, NodeEntry};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Unordered node pair, stored with the smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey {
    lo: usize,
    hi: usize,
}

impl EdgeKey {
    fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }
}

/// Borrowed view of one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    pub v: &'a str,
    pub w: &'a str,
    pub v_ix: usize,
    pub w_ix: usize,
    pub weight: u32,
}

#[derive(Debug, Clone)]
pub struct Graph<N = ()> {
    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry>,
    edge_index: HashMap<EdgeKey, usize>,

    incident: Vec<Vec<usize>>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Graph<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            incident: Vec::new(),
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            node_index: HashMap::with_capacity_and_hasher(nodes, FxBuildHasher),
            edges: Vec::with_capacity(edges),
            edge_index: HashMap::with_capacity_and_hasher(edges, FxBuildHasher),
            incident: Vec::with_capacity(nodes),
        }
    }

    /// Inserts a node or replaces the label of an existing one. Returns the node index.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> usize {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            self.nodes[ix].label = label;
            return ix;
        }
        let ix = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, ix);
        self.incident.push(Vec::new());
        ix
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> usize
    where
        N: Default,
    {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            return ix;
        }
        self.set_node(id, N::default())
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&ix| &self.nodes[ix].label)
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// Id of the node at `ix`.
    ///
    /// # Panics
    ///
    /// Panics if `ix` is out of bounds.
    pub fn node_id(&self, ix: usize) -> &str {
        &self.nodes[ix].id
    }

    pub fn label_at(&self, ix: usize) -> &N {
        &self.nodes[ix].label
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.edges.iter().map(|e| Edge {
            v: &self.nodes[e.v_ix].id,
            w: &self.nodes[e.w_ix].id,
            v_ix: e.v_ix,
            w_ix: e.w_ix,
            weight: e.weight,
        })
    }

    /// Adds `weight` to the edge `v -- w`, creating it if needed. Returns the edge index.
    ///
    /// Both endpoints must already exist and must differ.
    pub fn add_edge(&mut self, v: &str, w: &str, weight: u32) -> Result<usize> {
        if v == w {
            return Err(GraphError::SelfLoop { id: v.to_string() });
        }
        let missing = |id: &str| GraphError::MissingNode {
            v: v.to_string(),
            w: w.to_string(),
            missing: id.to_string(),
        };
        let v_ix = self.node_ix(v).ok_or_else(|| missing(v))?;
        let w_ix = self.node_ix(w).ok_or_else(|| missing(w))?;
        Ok(self.add_edge_ix(v_ix, w_ix, weight))
    }

    fn add_edge_ix(&mut self, v_ix: usize, w_ix: usize, weight: u32) -> usize {
        let key = EdgeKey::new(v_ix, w_ix);
        if let Some(&idx) = self.edge_index.get(&key) {
            let e = &mut self.edges[idx];
            e.weight = e.weight.saturating_add(weight);
            return idx;
        }
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            v_ix: key.lo,
            w_ix: key.hi,
            weight,
        });
        self.edge_index.insert(key, idx);
        self.incident[v_ix].push(idx);
        self.incident[w_ix].push(idx);
        idx
    }

    pub fn has_edge(&self, v: &str, w: &str) -> bool {
        self.edge_weight(v, w).is_some()
    }

    pub fn edge_weight(&self, v: &str, w: &str) -> Option<u32> {
        let v_ix = self.node_ix(v)?;
        let w_ix = self.node_ix(w)?;
        self.edge_index
            .get(&EdgeKey::new(v_ix, w_ix))
            .map(|&idx| self.edges[idx].weight)
    }

    /// Number of incident edges, ignoring weights.
    pub fn degree(&self, ix: usize) -> usize {
        self.incident[ix].len()
    }

    pub fn degree_of(&self, id: &str) -> Option<usize> {
        self.node_ix(id).map(|ix| self.degree(ix))
    }

    pub fn max_degree(&self) -> usize {
        self.incident.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// `(neighbor index, edge weight)` pairs in edge insertion order.
    pub fn neighbors(&self, ix: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.incident[ix].iter().map(move |&e| {
            let edge = &self.edges[e];
            (edge.other(ix), edge.weight)
        })
    }

    pub fn neighbor_ids(&self, id: &str) -> Vec<&str> {
        let Some(ix) = self.node_ix(id) else {
            return Vec::new();
        };
        self.neighbors(ix)
            .map(|(n, _)| self.nodes[n].id.as_str())
            .collect()
    }

    pub fn total_weight(&self) -> u64 {
        self.edges.iter().map(|e| u64::from(e.weight)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::Graph;
    use crate::GraphError;

    #[test]
    fn duplicate_edges_sum_weights_in_either_direction() {
        let mut g: Graph = Graph::new();
        g.ensure_node("a");
        g.ensure_node("b");
        let first = g.add_edge("a", "b", 2).expect("edge");
        let second = g.add_edge("b", "a", 3).expect("edge");

        assert_eq!(first, second);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight("a", "b"), Some(5));
        assert_eq!(g.degree_of("a"), Some(1));
    }

    #[test]
    fn rejects_self_loops_and_missing_endpoints() {
        let mut g: Graph = Graph::new();
        g.ensure_node("a");

        assert_eq!(
            g.add_edge("a", "a", 1),
            Err(GraphError::SelfLoop {
                id: "a".to_string()
            })
        );
        assert!(matches!(
            g.add_edge("a", "ghost", 1),
            Err(GraphError::MissingNode { missing, .. }) if missing == "ghost"
        ));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn set_node_keeps_index_and_replaces_label() {
        let mut g: Graph<&'static str> = Graph::new();
        let ix = g.set_node("a", "first");
        assert_eq!(g.set_node("a", "second"), ix);
        assert_eq!(g.node("a"), Some(&"second"));
        assert_eq!(g.node_count(), 1);
    }
}
