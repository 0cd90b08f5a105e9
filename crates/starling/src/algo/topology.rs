use starling_graphlib::Graph;

/// Index-based, read-only view of the input graph shared by every stage.
#[derive(Debug, Clone)]
pub(crate) struct Topology {
    pub(crate) ids: Vec<String>,
    pub(crate) adjacency: Vec<Vec<(usize, u32)>>,
}

impl Topology {
    pub(crate) fn from_graph<N>(g: &Graph<N>) -> Self {
        let n = g.node_count();
        let mut ids: Vec<String> = Vec::with_capacity(n);
        let mut adjacency: Vec<Vec<(usize, u32)>> = Vec::with_capacity(n);
        for ix in 0..n {
            ids.push(g.node_id(ix).to_string());
            adjacency.push(g.neighbors(ix).collect());
        }
        Self { ids, adjacency }
    }

    #[cfg(test)]
    pub(crate) fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut adjacency: Vec<Vec<(usize, u32)>> = vec![Vec::new(); n];
        for &(a, b) in edges {
            adjacency[a].push((b, 1));
            adjacency[b].push((a, 1));
        }
        Self {
            ids: (0..n).map(|i| format!("n{i}")).collect(),
            adjacency,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn degree(&self, ix: usize) -> usize {
        self.adjacency[ix].len()
    }

    pub(crate) fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    pub(crate) fn neighbors(&self, ix: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[ix].iter().map(|&(n, _)| n)
    }

    /// Nodes with at least one edge, in input order.
    pub(crate) fn connected(&self) -> Vec<usize> {
        (0..self.len()).filter(|&ix| self.degree(ix) > 0).collect()
    }
}
