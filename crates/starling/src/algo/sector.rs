//! Angular wedges per community.

use crate::geom::normalize_angle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::TAU;

/// Contiguous angular range `[base_angle, base_angle + angle_span]`, measured counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub base_angle: f64,
    pub angle_span: f64,
}

impl Sector {
    pub fn center(&self) -> f64 {
        self.base_angle + self.angle_span / 2.0
    }

    pub fn end(&self) -> f64 {
        self.base_angle + self.angle_span
    }

    pub fn contains(&self, angle: f64) -> bool {
        normalize_angle(angle - self.base_angle) <= self.angle_span
    }

    /// Leaves angles inside the sector untouched. An angle outside is moved to the nearer
    /// boundary and then `slack` inward (at most half the span).
    pub fn soft_clamp(&self, angle: f64, slack: f64) -> f64 {
        if self.contains(angle) {
            return angle;
        }
        let inward = slack.clamp(0.0, self.angle_span / 2.0);
        let before_start = normalize_angle(self.base_angle - angle);
        let past_end = normalize_angle(angle - self.end());
        if before_start <= past_end {
            self.base_angle + inward
        } else {
            self.end() - inward
        }
    }
}

/// Gap left after each of `count` sectors.
pub fn gap_per_sector(count: usize, gap_fraction: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    TAU * gap_fraction / count as f64
}

/// Allocates one sector per community, proportional to its size.
///
/// Sectors start at angle 0 and follow each other counter-clockwise in size-descending order
/// (ties by lower label), each followed by an equal gap. Spans plus gaps cover the full turn.
pub fn allocate(sizes: &BTreeMap<usize, usize>, gap_fraction: f64) -> BTreeMap<usize, Sector> {
    let total: usize = sizes.values().sum();
    let mut out = BTreeMap::new();
    if sizes.is_empty() || total == 0 {
        return out;
    }

    let usable = TAU * (1.0 - gap_fraction);
    let gap = gap_per_sector(sizes.len(), gap_fraction);

    let mut order: Vec<(usize, usize)> = sizes.iter().map(|(&c, &s)| (c, s)).collect();
    order.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut current = 0.0;
    for (community, size) in order {
        let angle_span = size as f64 / total as f64 * usable;
        out.insert(
            community,
            Sector {
                base_angle: current,
                angle_span,
            },
        );
        current += angle_span + gap;
    }
    out
}
