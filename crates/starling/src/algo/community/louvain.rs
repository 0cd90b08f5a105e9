use super::{CommunityDetection, WeightedAdjacency, renumber};
use crate::error::{Error, Result};
use crate::rng::LayoutRng;
use std::collections::BTreeMap;

const MIN_GAIN: f64 = 1e-12;

/// Multi-level greedy modularity optimisation.
///
/// Each level moves single nodes between neighboring communities while the gain
/// `w_ic - resolution * tot_c * k_i / 2m` improves, then collapses communities into weighted
/// super-nodes and repeats until no node moves. The resolution scales the null-model term, so
/// values above 1 favour many smaller communities and values below 1 fewer, larger ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Louvain {
    pub resolution: f64,
    /// Local-moving sweeps per level.
    pub max_passes: usize,
    pub max_levels: usize,
}

impl Louvain {
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution,
            ..Default::default()
        }
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 100,
            max_levels: 32,
        }
    }
}

#[derive(Debug, Clone)]
struct LevelGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    degrees: Vec<f64>,
    two_m: f64,
}

impl LevelGraph {
    fn new(adjacency: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let degrees: Vec<f64> = adjacency
            .iter()
            .zip(&self_loops)
            .map(|(adj, &lw)| adj.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * lw)
            .collect();
        let two_m = degrees.iter().sum();
        Self {
            adjacency,
            self_loops,
            degrees,
            two_m,
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Local moving phase. Returns the community of every node and whether any node moved.
    fn one_level(&self, resolution: f64, max_passes: usize, rng: &mut LayoutRng) -> (Vec<usize>, bool) {
        let n = self.len();
        let mut community: Vec<usize> = (0..n).collect();
        let mut totals: Vec<f64> = self.degrees.clone();

        let mut order: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut order);

        let mut weight_to: Vec<f64> = vec![0.0; n];
        let mut seen: Vec<bool> = vec![false; n];
        let mut touched: Vec<usize> = Vec::new();
        let mut improved = false;

        for _ in 0..max_passes {
            let mut moved = false;
            for &i in &order {
                let current = community[i];
                let k_i = self.degrees[i];

                for &(j, w) in &self.adjacency[i] {
                    let c = community[j];
                    if !seen[c] {
                        seen[c] = true;
                        touched.push(c);
                    }
                    weight_to[c] += w;
                }

                totals[current] -= k_i;
                let gain =
                    |c: usize, w: f64, totals: &[f64]| w - resolution * totals[c] * k_i / self.two_m;

                let mut best = current;
                let mut best_gain = gain(current, weight_to[current], &totals);
                for &c in &touched {
                    let g = gain(c, weight_to[c], &totals);
                    if g > best_gain + MIN_GAIN {
                        best = c;
                        best_gain = g;
                    }
                }
                totals[best] += k_i;
                community[i] = best;
                if best != current {
                    moved = true;
                }

                for &c in &touched {
                    weight_to[c] = 0.0;
                    seen[c] = false;
                }
                touched.clear();
            }
            if !moved {
                break;
            }
            improved = true;
        }
        (community, improved)
    }

    /// Collapses each community into one node. `community` must be dense in `0..count`.
    fn aggregate(&self, community: &[usize], count: usize) -> LevelGraph {
        let mut self_loops = vec![0.0; count];
        let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        for i in 0..self.len() {
            let ci = community[i];
            self_loops[ci] += self.self_loops[i];
            for &(j, w) in &self.adjacency[i] {
                let cj = community[j];
                if ci == cj {
                    // Each internal edge is seen from both endpoints.
                    self_loops[ci] += w / 2.0;
                } else {
                    *links[ci].entry(cj).or_insert(0.0) += w;
                }
            }
        }
        let adjacency = links.into_iter().map(|m| m.into_iter().collect()).collect();
        LevelGraph::new(adjacency, self_loops)
    }
}

impl CommunityDetection for Louvain {
    fn name(&self) -> &'static str {
        "louvain"
    }

    fn detect(&self, adjacency: &WeightedAdjacency, rng: &mut LayoutRng) -> Result<Vec<usize>> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::CommunityDetection {
                algorithm: self.name(),
                reason: format!("resolution must be positive, got {}", self.resolution),
            });
        }
        let mut level = LevelGraph::new(adjacency.to_vec(), vec![0.0; adjacency.len()]);
        if !(level.two_m.is_finite() && level.two_m > 0.0) {
            return Err(Error::CommunityDetection {
                algorithm: self.name(),
                reason: "total edge weight is zero".to_string(),
            });
        }

        let mut labels: Vec<usize> = (0..adjacency.len()).collect();
        for depth in 0..self.max_levels {
            let (community, improved) = level.one_level(self.resolution, self.max_passes, rng);
            if !improved {
                break;
            }
            let (dense, count) = renumber(&community);
            for label in labels.iter_mut() {
                *label = dense[*label];
            }
            tracing::trace!(depth, from = level.len(), to = count, "louvain level");
            if count == level.len() {
                break;
            }
            level = level.aggregate(&dense, count);
        }
        Ok(labels)
    }
}
