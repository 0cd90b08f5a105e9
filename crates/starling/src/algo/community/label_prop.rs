use super::{CommunityDetection, WeightedAdjacency};
use crate::error::Result;
use crate::rng::LayoutRng;
use std::collections::BTreeMap;

/// Asynchronous label propagation.
///
/// Every node repeatedly adopts the label most common among its neighbors (edge weights are
/// ignored). A node keeps its label when it is among the most common ones; otherwise ties go to
/// the lowest label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPropagation {
    pub max_iterations: usize,
}

impl Default for LabelPropagation {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

impl CommunityDetection for LabelPropagation {
    fn name(&self) -> &'static str {
        "labelPropagation"
    }

    fn detect(&self, adjacency: &WeightedAdjacency, rng: &mut LayoutRng) -> Result<Vec<usize>> {
        let n = adjacency.len();
        let mut labels: Vec<usize> = (0..n).collect();
        let mut order: Vec<usize> = (0..n).collect();
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();

        for iteration in 0..self.max_iterations {
            rng.shuffle(&mut order);
            let mut changed = false;
            for &i in &order {
                if adjacency[i].is_empty() {
                    continue;
                }
                counts.clear();
                for &(j, _) in &adjacency[i] {
                    *counts.entry(labels[j]).or_insert(0) += 1;
                }
                let best = counts.values().copied().max().unwrap_or(0);
                let current = labels[i];
                if counts.get(&current).copied() == Some(best) {
                    continue;
                }
                // BTreeMap iterates in label order.
                if let Some((&label, _)) = counts.iter().find(|&(_, &c)| c == best) {
                    labels[i] = label;
                    changed = true;
                }
            }
            if !changed {
                tracing::trace!(iterations = iteration + 1, "label propagation converged");
                break;
            }
        }
        Ok(labels)
    }
}
