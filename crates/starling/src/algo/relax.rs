//! Initial placement of non-anchor nodes and centroid-pull refinement.

use super::anchor::Anchors;
use super::pipeline::LayoutContext;
use super::radial::clamp_to_band;
use super::sector::Sector;
use crate::geom::Point;
use crate::rng::LayoutRng;

/// Below this distance from the origin a point has no usable direction.
const DEGENERATE: f64 = 1e-9;
pub(crate) const BOUNDARY_SLACK: f64 = 0.01;

/// Soft sector clamp with a random inward slack, drawn only when the angle is outside.
pub(crate) fn clamp_angle(sector: &Sector, angle: f64, rng: &mut LayoutRng) -> f64 {
    if sector.contains(angle) {
        angle
    } else {
        sector.soft_clamp(angle, rng.uniform(0.02, 0.15))
    }
}

/// Polar fallback for nodes without a usable direction.
fn polar_jitter(radius: f64, angle: f64, angle_jitter: f64, radial_jitter: f64, rng: &mut LayoutRng) -> Point {
    let a = angle + rng.uniform(-angle_jitter, angle_jitter);
    let r = (radius * (1.0 + rng.uniform(-radial_jitter, radial_jitter))).max(0.0);
    Point::from_polar(r, a)
}

/// Blend of community center and neighbor centroids that a freshly placed node heads for.
fn attractor(
    cohesion: f64,
    center: Option<Point>,
    same: Option<Point>,
    cross: Option<Point>,
) -> Option<Point> {
    let Some(same) = same else {
        return center;
    };
    let c = center.unwrap_or(Point::ORIGIN);
    match cross {
        Some(cross) if cohesion < 0.7 => {
            let wc = cohesion * cohesion * 0.1;
            let ws = cohesion * 0.4;
            let wx = (1.0 - cohesion) * 1.2;
            let total = wc + ws + wx;
            Some((c * wc + same * ws + cross * wx) * (1.0 / total))
        }
        _ => Some(c * (cohesion * 0.9) + same * 0.1),
    }
}

/// Places every non-anchor node, in rank order. Each placed node immediately becomes a
/// positioned neighbor for the nodes after it.
pub(crate) fn initial_placement(
    ctx: &LayoutContext,
    anchors: &Anchors,
    rng: &mut LayoutRng,
) -> Vec<Option<Point>> {
    let mut positions = anchors.positions.clone();

    for &ix in anchors.remaining() {
        let Some(profile) = ctx.profiles[ix] else {
            continue;
        };
        let base = ctx.radii[ix];
        let preferred = anchors.preferred_angles[ix];

        let mut same: Vec<Point> = Vec::new();
        let mut cross: Vec<Point> = Vec::new();
        for nb in ctx.topology.neighbors(ix) {
            let Some(p) = positions[nb] else {
                continue;
            };
            if ctx.primary(nb) == Some(profile.primary) {
                same.push(p);
            } else {
                cross.push(p);
            }
        }

        if same.is_empty() && cross.is_empty() {
            positions[ix] = Some(polar_jitter(base, preferred, 0.3, 0.35, rng));
            continue;
        }

        let c = profile.cohesion;
        let intra = profile.intra_strength;
        let target = base * (0.3 + (1.0 - (c * 0.7 + intra * 0.3)) * 1.2);
        let center = anchors.centers.get(&profile.primary).copied();
        let toward = attractor(c, center, Point::centroid(same), Point::centroid(cross))
            .filter(|p| p.length() > DEGENERATE);

        let p = match (toward, ctx.sectors.get(&profile.primary)) {
            (Some(toward), Some(sector)) => {
                let jitter = 0.10 + 0.20 * (1.0 - intra);
                let angle = toward.angle() + rng.uniform(-0.35, 0.35);
                let angle = if sector.contains(angle) {
                    angle
                } else {
                    sector.soft_clamp(angle, BOUNDARY_SLACK)
                };
                let r = (target * (1.0 + rng.uniform(-jitter, jitter))).max(0.0);
                Point::from_polar(r, angle)
            }
            _ => polar_jitter(target, preferred, 0.25, 0.30, rng),
        };
        positions[ix] = Some(p);
    }
    positions
}

/// One refinement step toward the community center and the same-community centroid. Weakly
/// cohesive nodes (below 0.4) are also pushed back away from the center.
fn pull(p: Point, center: Point, same: Point, cohesion: f64, anchor: bool) -> Point {
    let (kc, ks) = if anchor {
        (0.05 * cohesion * cohesion, 0.12)
    } else {
        (0.6 * cohesion * cohesion, 0.4)
    };
    let mut t = p + (center - p) * kc + (same - p) * ks;
    if cohesion < 0.4 {
        t += (p - center) * ((0.4 - cohesion) * 0.5);
    }
    t
}

/// Synchronous centroid-pull passes: every node reads the previous snapshot.
pub(crate) fn refine(
    ctx: &LayoutContext,
    anchors: &Anchors,
    mut positions: Vec<Option<Point>>,
    rng: &mut LayoutRng,
) -> Vec<Option<Point>> {
    let placeable = &anchors.ranked;
    for _ in 0..ctx.opts.relax_iterations {
        let mut next = positions.clone();
        for &ix in placeable {
            let (Some(profile), Some(p)) = (ctx.profiles[ix], positions[ix]) else {
                continue;
            };
            let c = profile.cohesion;
            let same = Point::centroid(
                ctx.topology
                    .neighbors(ix)
                    .filter(|&nb| ctx.primary(nb) == Some(profile.primary))
                    .filter_map(|nb| positions[nb]),
            );
            let center = anchors.centers.get(&profile.primary).copied();

            let moved = match (same, center) {
                (Some(s), Some(center)) => pull(p, center, s, c, anchors.is_anchor[ix]),
                _ => p,
            };
            if moved.length() <= DEGENERATE {
                continue;
            }

            let band_target = ctx.radii[ix] * (0.7 + 0.6 * (1.0 - c));
            let banded = clamp_to_band(moved, band_target);
            let out = match ctx.sectors.get(&profile.primary) {
                Some(sector) => {
                    let angle = clamp_angle(sector, banded.angle(), rng);
                    Point::from_polar(banded.length(), angle)
                }
                None => banded,
            };
            next[ix] = Some(out);
        }
        positions = next;
    }
    positions
}
