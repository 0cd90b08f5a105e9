use super::pipeline::LayoutContext;
use crate::geom::Point;
use crate::rng::LayoutRng;
use std::collections::BTreeMap;

/// Share of a sector's span available to in-sector angle offsets.
const USABLE_SPAN: f64 = 0.85;

#[derive(Debug, Clone)]
pub(crate) struct Anchors {
    /// Placeable nodes ranked by `(cohesion, degree)` descending; anchors are the prefix.
    pub(crate) ranked: Vec<usize>,
    pub(crate) count: usize,
    pub(crate) is_anchor: Vec<bool>,
    /// In-sector angle each placeable node would take without neighbors to follow.
    pub(crate) preferred_angles: Vec<f64>,
    /// Anchor positions; `None` for every other node.
    pub(crate) positions: Vec<Option<Point>>,
    /// Mean anchor position per primary community. Communities without anchors are absent.
    pub(crate) centers: BTreeMap<usize, Point>,
}

impl Anchors {
    pub(crate) fn anchors(&self) -> &[usize] {
        &self.ranked[..self.count]
    }

    pub(crate) fn remaining(&self) -> &[usize] {
        &self.ranked[self.count..]
    }
}

/// `ceil(n * fraction)`, at least one anchor whenever there is a node, never more than `n`.
pub(crate) fn anchor_count(n: usize, fraction: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let wanted = (n as f64 * fraction).ceil();
    if wanted.is_finite() && wanted >= 1.0 {
        (wanted as usize).min(n)
    } else {
        1
    }
}

/// Well-embedded nodes sit near the sector center; bridges are pushed toward a random edge.
fn preferred_angle(ctx: &LayoutContext, ix: usize, rng: &mut LayoutRng) -> Option<f64> {
    let profile = ctx.profiles[ix]?;
    let sector = ctx.sectors.get(&profile.primary)?;
    let c = profile.cohesion;
    let usable = sector.angle_span * USABLE_SPAN;
    let offset = if c < 0.5 {
        let edge_factor = (0.5 - c) * 2.0;
        rng.sign() * edge_factor * 0.5 * usable
    } else {
        let center_factor = (c - 0.5) * 2.0;
        rng.uniform(-0.1, 0.1) * (1.0 - center_factor) * usable
    };
    Some(sector.center() + offset)
}

fn rank(ctx: &LayoutContext, placeable: &[usize]) -> Vec<usize> {
    let key = |ix: usize| {
        let cohesion = ctx.profiles[ix].map_or(0.0, |p| p.cohesion);
        (cohesion, ctx.topology.degree(ix))
    };
    let mut ranked = placeable.to_vec();
    ranked.sort_by(|&a, &b| {
        let (ca, da) = key(a);
        let (cb, db) = key(b);
        cb.total_cmp(&ca).then(db.cmp(&da))
    });
    ranked
}

/// Picks and places the anchors, then derives the community centers from them.
pub(crate) fn place(ctx: &LayoutContext, placeable: &[usize], rng: &mut LayoutRng) -> Anchors {
    let n = ctx.topology.len();
    let mut preferred_angles = vec![0.0; n];
    for &ix in placeable {
        if let Some(angle) = preferred_angle(ctx, ix, rng) {
            preferred_angles[ix] = angle;
        }
    }

    let ranked = rank(ctx, placeable);
    let count = anchor_count(ranked.len(), ctx.opts.anchor_fraction);

    let mut is_anchor = vec![false; n];
    let mut positions: Vec<Option<Point>> = vec![None; n];
    for &ix in &ranked[..count] {
        is_anchor[ix] = true;
        let radius = (ctx.radii[ix] * (1.0 + rng.uniform(-0.45, 0.45))).max(0.0);
        positions[ix] = Some(Point::from_polar(radius, preferred_angles[ix]));
    }

    let mut members: BTreeMap<usize, Vec<Point>> = BTreeMap::new();
    for &ix in &ranked[..count] {
        if let (Some(profile), Some(p)) = (ctx.profiles[ix], positions[ix]) {
            members.entry(profile.primary).or_default().push(p);
        }
    }
    let centers: BTreeMap<usize, Point> = members
        .into_iter()
        .filter_map(|(c, points)| Point::centroid(points).map(|center| (c, center)))
        .collect();

    tracing::debug!(
        anchors = count,
        placeable = ranked.len(),
        centers = centers.len(),
        "placed anchors"
    );

    Anchors {
        ranked,
        count,
        is_anchor,
        preferred_angles,
        positions,
        centers,
    }
}

#[cfg(test)]
mod tests {
    use super::anchor_count;
    use crate::algo::pipeline::tests::context_for;
    use crate::rng::LayoutRng;

    #[test]
    fn anchor_count_rounds_up_with_a_floor_of_one() {
        assert_eq!(anchor_count(0, 0.1), 0);
        assert_eq!(anchor_count(3, 0.1), 1);
        assert_eq!(anchor_count(10, 0.1), 1);
        assert_eq!(anchor_count(11, 0.1), 2);
        assert_eq!(anchor_count(4, 1.0), 4);
    }

    #[test]
    fn anchors_are_the_most_cohesive_best_connected_nodes() {
        // Triangle {0,1,2} with a tail 2-3-4; node 2 has the highest degree among cohesive nodes.
        let edges = [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)];
        let labels = [0, 0, 0, 0, 0].map(Some).to_vec();
        let (ctx, placeable) = context_for(5, &edges, labels);
        let anchors = super::place(&ctx, &placeable, &mut LayoutRng::new(8));

        assert_eq!(anchors.count, 1);
        assert_eq!(anchors.anchors(), &[2]);
        assert!(anchors.is_anchor[2]);
        assert_eq!(anchors.remaining().len(), 4);
        let center = anchors.centers[&0];
        assert_eq!(Some(center), anchors.positions[2]);
    }

    #[test]
    fn anchor_radius_stays_within_jitter() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 4)];
        let labels = [0, 0, 0, 0, 0].map(Some).to_vec();
        let (mut ctx, placeable) = context_for(5, &edges, labels);
        ctx.opts.anchor_fraction = 1.0;
        for seed in 0..20 {
            let anchors = super::place(&ctx, &placeable, &mut LayoutRng::new(seed));
            assert_eq!(anchors.count, 5);
            for &ix in anchors.anchors() {
                let r = anchors.positions[ix].expect("anchor placed").length();
                let base = ctx.radii[ix];
                assert!(r >= base * 0.55 - 1e-9 && r <= base * 1.45 + 1e-9, "r={r} base={base}");
            }
        }
    }
}
