//! Pairwise overlap removal between connected nodes.
//!
//! Cost is `O(n^2)` per pass. At a few thousand connected nodes this dominates the layout; a
//! grid bucket index over the snapshot would be the way to scale past that.

use super::pipeline::LayoutContext;
use super::radial::band_limits;
use super::relax::{BOUNDARY_SLACK, clamp_angle};
use super::sector::Sector;
use crate::geom::{Point, angle_delta};
use crate::rng::LayoutRng;

const SAME_COMMUNITY_GAP: f64 = 1.3;
const CROSS_COMMUNITY_GAP: f64 = 2.0;

/// Required center distance between two nodes.
pub(crate) fn min_separation(ctx: &LayoutContext, a: usize, b: usize) -> f64 {
    let factor = match (ctx.primary(a), ctx.primary(b)) {
        (Some(x), Some(y)) if x == y => SAME_COMMUNITY_GAP,
        _ => CROSS_COMMUNITY_GAP,
    };
    (ctx.visual_sizes[a] + ctx.visual_sizes[b]) * factor
}

/// Sector-center angle a bridge node is allowed to drift to, if it qualifies.
pub(crate) fn drift_angle(ctx: &LayoutContext, ix: usize) -> Option<f64> {
    let profile = ctx.profiles[ix]?;
    let t = ctx.opts.bridge;
    if profile.cross_ratio() <= t.cross_ratio {
        return None;
    }
    let (foreign, count) = profile.top_foreign?;
    let degree = ctx.topology.degree(ix);
    let share = count as f64 / degree as f64;
    let balance = count as f64 / (profile.same + count) as f64;
    if share <= t.foreign_share || balance <= t.balance {
        return None;
    }
    let home = ctx.sectors.get(&profile.primary)?.center();
    let target = ctx.sectors.get(&foreign)?.center();
    let shift = (balance - t.balance) / (1.0 - t.balance);
    Some(home + angle_delta(home, target) * shift * 0.5)
}

/// Angular freedom of one node while collisions are resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Heading {
    /// Anywhere inside the home sector.
    Sector(Sector),
    /// Pinned to a bridge node's drift angle.
    Drift(f64),
    Free,
}

impl Heading {
    fn of(ctx: &LayoutContext, ix: usize) -> Self {
        match (drift_angle(ctx, ix), ctx.sector_of(ix)) {
            (Some(angle), _) => Heading::Drift(angle),
            (None, Some(sector)) => Heading::Sector(*sector),
            (None, None) => Heading::Free,
        }
    }

    /// Direction used for a point sitting on the origin.
    fn fallback(self) -> f64 {
        match self {
            Heading::Sector(sector) => sector.center(),
            Heading::Drift(angle) => angle,
            Heading::Free => 0.0,
        }
    }

    fn project(self, angle: f64) -> f64 {
        match self {
            Heading::Sector(sector) => sector.soft_clamp(angle, BOUNDARY_SLACK),
            Heading::Drift(angle) => angle,
            Heading::Free => angle,
        }
    }
}

/// `p` with its distance clamped into `[lo, hi]` and its angle passed through `steer`.
fn polar_clamp(p: Point, lo: f64, hi: f64, heading: Heading, steer: impl FnOnce(f64) -> f64) -> Point {
    let r = p.length();
    let angle = if r <= f64::EPSILON {
        heading.fallback()
    } else {
        steer(p.angle())
    };
    Point::from_polar(r.clamp(lo, hi), angle)
}

/// Unit direction pushing `a` away from `b`; random when the two coincide.
fn separation_direction(a: Point, b: Point, rng: &mut LayoutRng) -> (Point, f64) {
    let d = a - b;
    let dist = d.length();
    if dist > f64::EPSILON {
        (d * (1.0 / dist), dist)
    } else {
        let theta = rng.uniform(0.0, std::f64::consts::TAU);
        (Point::from_polar(1.0, theta), 0.0)
    }
}

/// Damped repulsion passes followed by the settle sweeps. Returns the number of settle sweeps
/// that still found overlaps.
pub(crate) fn resolve(
    ctx: &LayoutContext,
    nodes: &[usize],
    positions: &mut [Option<Point>],
    rng: &mut LayoutRng,
) -> usize {
    let headings: Vec<Heading> = nodes.iter().map(|&ix| Heading::of(ctx, ix)).collect();
    let bridges = headings
        .iter()
        .filter(|h| matches!(h, Heading::Drift(_)))
        .count();
    let limits: Vec<(f64, f64)> = nodes
        .iter()
        .map(|&ix| band_limits(ctx.radii[ix], ctx.visual_sizes[ix], ctx.opts.max_radius))
        .collect();

    let mut current: Vec<Point> = nodes
        .iter()
        .map(|&ix| positions[ix].unwrap_or(Point::ORIGIN))
        .collect();

    for _ in 0..ctx.opts.collision_iterations {
        let mut push = vec![Point::ORIGIN; nodes.len()];
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let min = min_separation(ctx, nodes[i], nodes[j]);
                let (dir, dist) = separation_direction(current[i], current[j], rng);
                if dist < min {
                    let shove = dir * (min - dist);
                    push[i] += shove;
                    push[j] -= shove;
                }
            }
        }

        let mut next = current.clone();
        for k in 0..nodes.len() {
            let moved = current[k] + push[k] * ctx.opts.collision_damping;
            let (lo, hi) = limits[k];
            let heading = headings[k];
            next[k] = polar_clamp(moved, lo, hi, heading, |angle| match heading {
                Heading::Sector(sector) => clamp_angle(&sector, angle, rng),
                other => other.project(angle),
            });
        }
        current = next;
    }

    let overlapping = settle(ctx, nodes, &headings, &limits, &mut current, rng);
    tracing::debug!(
        nodes = nodes.len(),
        bridges,
        passes = ctx.opts.collision_iterations,
        overlapping_sweeps = overlapping,
        "resolved collisions"
    );

    for (k, &ix) in nodes.iter().enumerate() {
        positions[ix] = Some(current[k]);
    }
    overlapping
}

/// Scales both radii so the pair reaches `min` along their own rays. Used when the heading
/// projection took back the push of a settle step.
fn spread_radially(a: Point, b: Point, min: f64, floors: (f64, f64), ceiling: f64) -> (Point, Point) {
    let dist = a.distance(b);
    if dist >= min || dist <= f64::EPSILON {
        return (a, b);
    }
    let scale = min / dist;
    let a = a.with_length((a.length() * scale).clamp(floors.0, ceiling));
    let b = b.with_length((b.length() * scale).clamp(floors.1, ceiling));
    (a, b)
}

/// In-place projection sweeps. Each overlapping pair is moved apart by half the overlap each,
/// then both nodes go back into their heading and between their radial floor and `max_radius`.
/// Stops at the first sweep without overlap.
fn settle(
    ctx: &LayoutContext,
    nodes: &[usize],
    headings: &[Heading],
    limits: &[(f64, f64)],
    current: &mut [Point],
    rng: &mut LayoutRng,
) -> usize {
    let ceiling = ctx.opts.max_radius;
    let project = |k: usize, p: Point| {
        let heading = headings[k];
        polar_clamp(p, limits[k].0, ceiling, heading, |angle| heading.project(angle))
    };
    for (k, p) in current.iter_mut().enumerate() {
        *p = project(k, *p);
    }

    let mut sweeps = 0;
    for _ in 0..ctx.opts.settle_iterations {
        let mut any = false;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let min = min_separation(ctx, nodes[i], nodes[j]);
                let (dir, dist) = separation_direction(current[i], current[j], rng);
                let overlap = min - dist;
                if overlap <= min * 1e-9 {
                    continue;
                }
                any = true;
                let half = dir * (overlap * 0.5);
                let a = project(i, current[i] + half);
                let b = project(j, current[j] - half);
                let (a, b) = spread_radially(a, b, min, (limits[i].0, limits[j].0), ceiling);
                current[i] = a;
                current[j] = b;
            }
        }
        if !any {
            break;
        }
        sweeps += 1;
    }
    sweeps
}

#[cfg(test)]
mod tests {
    use super::{LayoutContext, drift_angle, min_separation, resolve, spread_radially};
    use crate::algo::pipeline::tests::context_for;
    use crate::geom::{Point, angle_delta};
    use crate::rng::LayoutRng;

    fn assert_separated(ctx: &LayoutContext, positions: &[Option<Point>], nodes: &[usize]) {
        for (k, &a) in nodes.iter().enumerate() {
            for &b in &nodes[k + 1..] {
                let pa = positions[a].expect("placed");
                let pb = positions[b].expect("placed");
                let min = min_separation(ctx, a, b);
                assert!(pa.distance(pb) >= 0.95 * min, "{a}-{b}: {} < {min}", pa.distance(pb));
            }
        }
    }

    fn two_triangles_and_bridge() -> (Vec<(usize, usize)>, Vec<Option<usize>>) {
        // Node 6 belongs to the first triangle by label but has two friends in the second.
        let edges = vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (6, 0), (6, 3), (6, 4)];
        let labels = [0, 0, 0, 1, 1, 1, 0].map(Some).to_vec();
        (edges, labels)
    }

    #[test]
    fn separation_is_wider_across_communities() {
        let (edges, labels) = two_triangles_and_bridge();
        let (ctx, _) = context_for(7, &edges, labels);
        let same = min_separation(&ctx, 1, 2);
        let cross = min_separation(&ctx, 1, 4);
        assert!((same - (ctx.visual_sizes[1] + ctx.visual_sizes[2]) * 1.3).abs() < 1e-12);
        assert!((cross - (ctx.visual_sizes[1] + ctx.visual_sizes[4]) * 2.0).abs() < 1e-12);
    }

    #[test]
    fn weakly_split_nodes_stay_in_their_sector() {
        let (edges, labels) = two_triangles_and_bridge();
        let (ctx, _) = context_for(7, &edges, labels);
        let profile = ctx.profiles[6].expect("profile");
        // Neighbors 3 and 4 vote for community 1, neighbor 0 for community 0.
        assert_eq!(profile.primary, 1);

        // As a member of community 1 its only foreign friend is node 0: too weak to drift.
        assert_eq!(drift_angle(&ctx, 6), None);
        assert_eq!(drift_angle(&ctx, 1), None);
    }

    #[test]
    fn bridge_with_foreign_majority_drifts_toward_the_foreign_sector() {
        // 4-clique {0..3}, 4-cycle {4..7}; node 8 has one friend in the cycle and three in the clique.
        let mut edges = Vec::new();
        for a in 0..4 {
            for b in a + 1..4 {
                edges.push((a, b));
            }
        }
        edges.extend([(4, 5), (5, 6), (6, 7), (7, 4), (8, 7), (8, 0), (8, 1), (8, 2)]);
        let labels = [0, 0, 0, 0, 1, 1, 1, 1, 1].map(Some).to_vec();
        let (mut ctx, _) = context_for(9, &edges, labels);

        // Pretend node 8 was homed with its single cycle friend.
        let mut profile = ctx.profiles[8].expect("profile");
        profile.primary = 1;
        profile.same = 1;
        profile.cohesion = 0.25;
        profile.top_foreign = Some((0, 3));
        ctx.profiles[8] = Some(profile);

        let angle = drift_angle(&ctx, 8).expect("bridge drifts");
        let home = ctx.sectors[&1].center();
        let foreign = ctx.sectors[&0].center();
        // balance 0.75 -> shift 0.5 -> a quarter of the way.
        let expected = home + angle_delta(home, foreign) * 0.25;
        assert!((angle - expected).abs() < 1e-12);
    }

    #[test]
    fn coincident_nodes_are_pulled_apart() {
        let edges = [(0, 1), (1, 2), (2, 0)];
        let labels = [0, 0, 0].map(Some).to_vec();
        let (ctx, nodes) = context_for(3, &edges, labels);
        let mut positions = vec![Some(Point::ORIGIN); 3];
        resolve(&ctx, &nodes, &mut positions, &mut LayoutRng::new(2));

        for a in 0..3 {
            for b in (a + 1)..3 {
                let pa = positions[a].expect("placed");
                let pb = positions[b].expect("placed");
                let min = min_separation(&ctx, a, b);
                assert!(pa.distance(pb) >= 0.95 * min, "{a}-{b}: {}", pa.distance(pb));
            }
        }
    }

    #[test]
    fn nodes_piled_on_the_origin_end_in_their_own_sectors() {
        let (edges, labels) = two_triangles_and_bridge();
        let (ctx, nodes) = context_for(7, &edges, labels);
        let mut positions = vec![Some(Point::ORIGIN); 7];
        for seed in [1, 5, 9] {
            resolve(&ctx, &nodes, &mut positions, &mut LayoutRng::new(seed));
            for &ix in &nodes {
                let p = positions[ix].expect("placed");
                let sector = ctx.sector_of(ix).expect("sector");
                assert_eq!(drift_angle(&ctx, ix), None);
                assert!(sector.contains(p.angle()), "seed {seed}: node {ix} at {} outside {sector:?}", p.angle());
                assert!(p.length() >= ctx.visual_sizes[ix] - 1e-9, "node {ix} collapsed");
                assert!(p.length() <= ctx.opts.max_radius + 1e-9);
            }
            assert_separated(&ctx, &positions, &nodes);
        }
    }

    #[test]
    fn drifting_bridge_stays_on_its_drift_angle() {
        let mut edges = Vec::new();
        for a in 0..4 {
            for b in a + 1..4 {
                edges.push((a, b));
            }
        }
        edges.extend([(4, 5), (5, 6), (6, 7), (7, 4), (8, 7), (8, 0), (8, 1), (8, 2)]);
        let labels = [0, 0, 0, 0, 1, 1, 1, 1, 1].map(Some).to_vec();
        let (mut ctx, nodes) = context_for(9, &edges, labels);
        let mut profile = ctx.profiles[8].expect("profile");
        profile.primary = 1;
        profile.same = 1;
        profile.cohesion = 0.25;
        profile.top_foreign = Some((0, 3));
        ctx.profiles[8] = Some(profile);
        let drift = drift_angle(&ctx, 8).expect("bridge drifts");

        let mut positions = vec![Some(Point::new(50.0, 0.0)); 9];
        resolve(&ctx, &nodes, &mut positions, &mut LayoutRng::new(3));

        let bridge = positions[8].expect("placed");
        assert!(angle_delta(drift, bridge.angle()).abs() < 1e-9, "{} vs {drift}", bridge.angle());
        for ix in 0..8 {
            let p = positions[ix].expect("placed");
            assert!(ctx.sector_of(ix).expect("sector").contains(p.angle()), "node {ix}");
        }
        assert_separated(&ctx, &positions, &nodes);
    }

    #[test]
    fn blocked_pairs_spread_along_their_rays() {
        // Two points a small angle apart: only a radial move can separate them.
        let a = Point::from_polar(20.0, 0.0);
        let b = Point::from_polar(20.0, 0.1);
        let (a2, b2) = spread_radially(a, b, 40.0, (10.0, 10.0), 500.0);
        assert!((a2.distance(b2) - 40.0).abs() < 1e-9);
        assert!((a2.angle() - 0.0).abs() < 1e-12);
        assert!((b2.angle() - 0.1).abs() < 1e-12);

        // The ceiling wins over the separation.
        let (a3, _) = spread_radially(a, b, 40.0, (10.0, 10.0), 100.0);
        assert!((a3.length() - 100.0).abs() < 1e-9);
    }
}
