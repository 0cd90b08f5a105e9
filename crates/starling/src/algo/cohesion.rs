use super::Topology;
use super::community::Partition;
use std::collections::BTreeMap;

/// How strongly a connected node belongs to its neighborhood's majority community.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CohesionProfile {
    /// Detected community holding most of the node's neighbors (ties: lowest label).
    pub(crate) primary: usize,
    /// Fraction of neighbors whose own primary community is `primary`.
    pub(crate) cohesion: f64,
    /// Number of neighbors sharing the primary community.
    pub(crate) same: usize,
    /// `same` relative to the largest `same` found in the primary community.
    pub(crate) intra_strength: f64,
    /// Foreign primary community with the most neighbors, with that neighbor count.
    pub(crate) top_foreign: Option<(usize, usize)>,
}

impl CohesionProfile {
    pub(crate) fn cross_ratio(&self) -> f64 {
        1.0 - self.cohesion
    }
}

/// Majority vote over the neighbors' detector labels. Falls back to the node's own label when no
/// neighbor carries one.
fn primary_community(topology: &Topology, partition: &Partition, ix: usize) -> Option<usize> {
    let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
    for n in topology.neighbors(ix) {
        if let Some(label) = partition.label(n) {
            *votes.entry(label).or_insert(0) += 1;
        }
    }
    let mut best: Option<(usize, usize)> = None;
    for (label, count) in votes {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label).or_else(|| partition.label(ix))
}

/// Computes a profile for every connected node; zero-degree nodes get `None`.
pub(crate) fn analyze(topology: &Topology, partition: &Partition) -> Vec<Option<CohesionProfile>> {
    let n = topology.len();
    let primaries: Vec<Option<usize>> = (0..n)
        .map(|ix| {
            if topology.degree(ix) == 0 {
                None
            } else {
                primary_community(topology, partition, ix)
            }
        })
        .collect();

    let mut same_counts: Vec<usize> = vec![0; n];
    let mut foreign: Vec<Option<(usize, usize)>> = vec![None; n];
    let mut max_same: BTreeMap<usize, usize> = BTreeMap::new();
    for ix in 0..n {
        let Some(primary) = primaries[ix] else {
            continue;
        };
        let mut others: BTreeMap<usize, usize> = BTreeMap::new();
        for nb in topology.neighbors(ix) {
            match primaries[nb] {
                Some(p) if p == primary => same_counts[ix] += 1,
                Some(p) => *others.entry(p).or_insert(0) += 1,
                None => {}
            }
        }
        for (community, count) in others {
            if foreign[ix].is_none_or(|(_, c)| count > c) {
                foreign[ix] = Some((community, count));
            }
        }
        let best = max_same.entry(primary).or_insert(0);
        *best = (*best).max(same_counts[ix]);
    }

    (0..n)
        .map(|ix| {
            let primary = primaries[ix]?;
            let degree = topology.degree(ix);
            let same = same_counts[ix];
            let cohesion = if degree == 0 {
                0.0
            } else {
                same as f64 / degree as f64
            };
            let intra_strength = match max_same.get(&primary) {
                Some(&m) if m > 0 => same as f64 / m as f64,
                _ => 0.0,
            };
            Some(CohesionProfile {
                primary,
                cohesion,
                same,
                intra_strength,
                top_foreign: foreign[ix],
            })
        })
        .collect()
}

/// Node count per primary community.
pub(crate) fn primary_sizes(profiles: &[Option<CohesionProfile>]) -> BTreeMap<usize, usize> {
    let mut sizes = BTreeMap::new();
    for p in profiles.iter().flatten() {
        *sizes.entry(p.primary).or_insert(0) += 1;
    }
    sizes
}
