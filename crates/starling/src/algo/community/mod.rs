//! Community detection over the subgraph induced by connected nodes.
//!
//! Labels produced here are the *detected* communities. Placement stages never use them
//! directly; they use each node's primary community from [`cohesion`](super::cohesion).

mod label_prop;
mod louvain;

pub use label_prop::LabelPropagation;
pub use louvain::Louvain;

use super::{Detector, LayoutOptions, Topology};
use crate::error::{Error, Result};
use crate::rng::LayoutRng;

/// Weighted adjacency lists over local node indices `0..n`; every undirected edge is listed
/// from both endpoints.
pub type WeightedAdjacency = [Vec<(usize, f64)>];

pub trait CommunityDetection {
    fn name(&self) -> &'static str;

    /// Returns one label per node of `adjacency`. Labels need not be dense.
    fn detect(&self, adjacency: &WeightedAdjacency, rng: &mut LayoutRng) -> Result<Vec<usize>>;
}

/// Detected community per node (`None` for zero-degree nodes), labels dense in `0..count` with
/// the largest community first.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    labels: Vec<Option<usize>>,
    count: usize,
    method: Detector,
}

impl Partition {
    #[cfg(test)]
    pub(crate) fn from_labels(labels: Vec<Option<usize>>) -> Self {
        let count = labels.iter().flatten().map(|&l| l + 1).max().unwrap_or(0);
        Self {
            labels,
            count,
            method: Detector::Louvain,
        }
    }

    fn empty(len: usize, method: Detector) -> Self {
        Self {
            labels: vec![None; len],
            count: 0,
            method,
        }
    }

    pub fn label(&self, ix: usize) -> Option<usize> {
        self.labels.get(ix).copied().flatten()
    }

    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// Number of detected communities.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The algorithm whose output was kept (after any fallback).
    pub fn method(&self) -> Detector {
        self.method
    }

    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.count];
        for label in self.labels.iter().flatten() {
            sizes[*label] += 1;
        }
        sizes
    }
}

/// Renumbers labels densely: larger communities get lower labels, equal sizes keep the order
/// in which they first appear. Returns the new labels and their count.
pub fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut first_seen: rustc_hash::FxHashMap<usize, usize> = rustc_hash::FxHashMap::default();
    let mut sizes: Vec<(usize, usize)> = Vec::new();
    for &label in labels {
        let next = first_seen.len();
        let slot = *first_seen.entry(label).or_insert(next);
        if slot == sizes.len() {
            sizes.push((label, 0));
        }
        sizes[slot].1 += 1;
    }

    let mut ranked: Vec<usize> = (0..sizes.len()).collect();
    ranked.sort_by(|&a, &b| sizes[b].1.cmp(&sizes[a].1).then(a.cmp(&b)));
    let mut mapping: rustc_hash::FxHashMap<usize, usize> = rustc_hash::FxHashMap::default();
    for (dense, &slot) in ranked.iter().enumerate() {
        mapping.insert(sizes[slot].0, dense);
    }

    let out = labels.iter().map(|l| mapping[l]).collect();
    (out, sizes.len())
}

/// Connected nodes and their adjacency re-indexed locally.
struct ConnectedSubgraph {
    nodes: Vec<usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl ConnectedSubgraph {
    fn new(topology: &Topology) -> Self {
        let nodes = topology.connected();
        let mut local: Vec<Option<usize>> = vec![None; topology.len()];
        for (i, &ix) in nodes.iter().enumerate() {
            local[ix] = Some(i);
        }
        let adjacency = nodes
            .iter()
            .map(|&ix| {
                topology.adjacency[ix]
                    .iter()
                    .filter_map(|&(n, w)| local[n].map(|l| (l, f64::from(w))))
                    .collect()
            })
            .collect();
        Self { nodes, adjacency }
    }
}

fn detector_chain(opts: &LayoutOptions) -> Vec<(Detector, Box<dyn CommunityDetection>)> {
    let mut chain: Vec<(Detector, Box<dyn CommunityDetection>)> = Vec::new();
    if opts.detector == Detector::Louvain {
        chain.push((Detector::Louvain, Box::new(Louvain::new(opts.resolution))));
    }
    if opts.detector != Detector::SingleCommunity {
        chain.push((
            Detector::LabelPropagation,
            Box::new(LabelPropagation::default()),
        ));
    }
    chain
}

/// Runs the configured detector, falling back to label propagation and then to a single
/// community. Never fails: an edgeless graph simply has zero communities.
pub(crate) fn detect(topology: &Topology, opts: &LayoutOptions, rng: &mut LayoutRng) -> Partition {
    let sub = ConnectedSubgraph::new(topology);
    if sub.nodes.is_empty() {
        return Partition::empty(topology.len(), opts.detector);
    }

    for (method, detector) in detector_chain(opts) {
        let labels = detector
            .detect(&sub.adjacency, rng)
            .and_then(|labels| check_labels(detector.name(), labels, sub.nodes.len()));
        match labels {
            Ok(labels) => {
                let (dense, count) = renumber(&labels);
                let mut out = vec![None; topology.len()];
                for (i, &ix) in sub.nodes.iter().enumerate() {
                    out[ix] = Some(dense[i]);
                }
                tracing::debug!(
                    algorithm = detector.name(),
                    communities = count,
                    nodes = sub.nodes.len(),
                    "detected communities"
                );
                return Partition {
                    labels: out,
                    count,
                    method,
                };
            }
            Err(err) => {
                tracing::warn!(algorithm = detector.name(), %err, "community detection failed, falling back");
            }
        }
    }

    let mut out = vec![None; topology.len()];
    for &ix in &sub.nodes {
        out[ix] = Some(0);
    }
    Partition {
        labels: out,
        count: 1,
        method: Detector::SingleCommunity,
    }
}

fn check_labels(algorithm: &'static str, labels: Vec<usize>, expected: usize) -> Result<Vec<usize>> {
    if labels.len() != expected {
        return Err(Error::CommunityDetection {
            algorithm,
            reason: format!("labelled {} of {expected} nodes", labels.len()),
        });
    }
    Ok(labels)
}
