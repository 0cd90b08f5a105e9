//! Helper algorithms over [`Graph`](super::Graph).

use super::Graph;
use std::collections::VecDeque;

/// Connected components as node-index lists, in node insertion order (zero-degree nodes form
/// singleton components).
pub fn components_ix<N>(g: &Graph<N>) -> Vec<Vec<usize>> {
    let mut seen = vec![false; g.node_count()];
    let mut out: Vec<Vec<usize>> = Vec::new();

    for start in 0..g.node_count() {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut comp: Vec<usize> = Vec::new();
        let mut q: VecDeque<usize> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            comp.push(v);
            for (n, _) in g.neighbors(v) {
                if !seen[n] {
                    seen[n] = true;
                    q.push_back(n);
                }
            }
        }
        out.push(comp);
    }

    out
}

pub fn components<N>(g: &Graph<N>) -> Vec<Vec<String>> {
    components_ix(g)
        .into_iter()
        .map(|comp| comp.into_iter().map(|ix| g.node_id(ix).to_string()).collect())
        .collect()
}

/// Indices of nodes without any incident edge.
pub fn isolated<N>(g: &Graph<N>) -> Vec<usize> {
    (0..g.node_count()).filter(|&ix| g.degree(ix) == 0).collect()
}

/// Edge density of a simple undirected graph: `2E / (n (n - 1))`.
pub fn density<N>(g: &Graph<N>) -> f64 {
    let n = g.node_count();
    if n < 2 {
        return 0.0;
    }
    let possible = (n * (n - 1)) as f64;
    (2 * g.edge_count()) as f64 / possible
}

/// Unweighted BFS hop distances from `source`; unreachable nodes are `None`.
pub fn bfs_distances<N>(g: &Graph<N>, source: usize) -> Vec<Option<usize>> {
    let mut dist: Vec<Option<usize>> = vec![None; g.node_count()];
    if source >= g.node_count() {
        return dist;
    }
    dist[source] = Some(0);
    let mut q: VecDeque<usize> = VecDeque::new();
    q.push_back(source);
    while let Some(v) = q.pop_front() {
        let Some(d) = dist[v] else {
            debug_assert!(false, "bfs visited node without a distance");
            continue;
        };
        for (n, _) in g.neighbors(v) {
            if dist[n].is_none() {
                dist[n] = Some(d + 1);
                q.push_back(n);
            }
        }
    }
    dist
}
