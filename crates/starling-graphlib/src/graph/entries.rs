//! Internal storage entries for [`Graph`](super::Graph).

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry<N> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) label: N,
}

#[derive(Debug, Clone, Copy)]
pub(in crate::graph) struct EdgeEntry {
    pub(in crate::graph) v_ix: usize,
    pub(in crate::graph) w_ix: usize,
    pub(in crate::graph) weight: u32,
}

impl EdgeEntry {
    /// Endpoint opposite to `ix`.
    pub(in crate::graph) fn other(&self, ix: usize) -> usize {
        if self.v_ix == ix { self.w_ix } else { self.v_ix }
    }
}
