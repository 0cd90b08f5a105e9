//! Whole-network statistics and per-node centralities.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use starling_graphlib::{Graph, alg};
use std::collections::VecDeque;

/// Per-node score keyed by node id, in input order.
pub type Centrality = IndexMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    /// Sum of all edge weights (mutual-connection counts).
    pub total_weight: u64,
    pub density: f64,
    /// Connected components, singletons included.
    pub components: usize,
    pub largest_component: usize,
    pub isolated: usize,
    pub max_degree: usize,
    pub average_degree: f64,
    /// Longest shortest path (in hops) within any component.
    pub diameter: usize,
}

impl NetworkStats {
    pub fn compute<N>(g: &Graph<N>) -> Self {
        let n = g.node_count();
        let components = alg::components_ix(g);
        let average_degree = if n == 0 {
            0.0
        } else {
            2.0 * g.edge_count() as f64 / n as f64
        };
        Self {
            nodes: n,
            edges: g.edge_count(),
            total_weight: g.total_weight(),
            density: alg::density(g),
            components: components.len(),
            largest_component: components.iter().map(Vec::len).max().unwrap_or(0),
            isolated: alg::isolated(g).len(),
            max_degree: g.max_degree(),
            average_degree,
            diameter: diameter(g),
        }
    }
}

fn diameter<N>(g: &Graph<N>) -> usize {
    (0..g.node_count())
        .filter(|&ix| g.degree(ix) > 0)
        .filter_map(|ix| alg::bfs_distances(g, ix).into_iter().flatten().max())
        .max()
        .unwrap_or(0)
}

/// `degree / (n - 1)`. A graph with a single node gives it centrality 1.
pub fn degree_centrality<N>(g: &Graph<N>) -> Centrality {
    let n = g.node_count();
    let scale = if n <= 1 { 1.0 } else { 1.0 / (n - 1) as f64 };
    (0..n)
        .map(|ix| {
            let value = if n <= 1 { 1.0 } else { g.degree(ix) as f64 * scale };
            (g.node_id(ix).to_string(), value)
        })
        .collect()
}

/// Unweighted betweenness (Brandes), normalized by `(n - 1)(n - 2)` so that the center of a
/// star scores 1.
pub fn betweenness_centrality<N>(g: &Graph<N>) -> Centrality {
    let n = g.node_count();
    let mut centrality = vec![0.0f64; n];

    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma: Vec<f64> = vec![0.0; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut delta: Vec<f64> = vec![0.0; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for s in 0..n {
        stack.clear();
        for p in &mut preds {
            p.clear();
        }
        sigma.iter_mut().for_each(|v| *v = 0.0);
        dist.iter_mut().for_each(|d| *d = None);
        delta.iter_mut().for_each(|d| *d = 0.0);

        sigma[s] = 1.0;
        dist[s] = Some(0);
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v].unwrap_or(0);
            for (w, _) in g.neighbors(v) {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        0.0
    };
    (0..n)
        .map(|ix| (g.node_id(ix).to_string(), centrality[ix] * scale))
        .collect()
}

/// Weighted modularity of a partition given per node index, with `resolution` scaling the
/// expected-edge term as in [`Louvain`](crate::algo::community::Louvain). Resolution 1 is plain
/// Newman modularity. Unlabelled nodes belong to no community.
pub fn modularity<N>(g: &Graph<N>, labels: &[Option<usize>], resolution: f64) -> f64 {
    let adjacency: Vec<Vec<(usize, u32)>> = (0..g.node_count())
        .map(|ix| g.neighbors(ix).collect())
        .collect();
    partition_modularity(&adjacency, labels, resolution)
}

pub(crate) fn partition_modularity(
    adjacency: &[Vec<(usize, u32)>],
    labels: &[Option<usize>],
    resolution: f64,
) -> f64 {
    let two_m: f64 = adjacency
        .iter()
        .flat_map(|adj| adj.iter().map(|&(_, w)| f64::from(w)))
        .sum();
    if two_m <= 0.0 {
        return 0.0;
    }

    let count = labels.iter().flatten().map(|&l| l + 1).max().unwrap_or(0);
    let mut internal = vec![0.0f64; count];
    let mut degree = vec![0.0f64; count];
    for (ix, adj) in adjacency.iter().enumerate() {
        let Some(c) = labels.get(ix).copied().flatten() else {
            continue;
        };
        for &(nb, w) in adj {
            degree[c] += f64::from(w);
            if labels.get(nb).copied().flatten() == Some(c) {
                internal[c] += f64::from(w);
            }
        }
    }

    // `internal` counts each edge from both ends, so it already equals 2 * L_c.
    internal
        .iter()
        .zip(&degree)
        .map(|(&l2, &d)| l2 / two_m - resolution * (d / two_m).powi(2))
        .sum()
}
