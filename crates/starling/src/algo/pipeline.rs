use super::cohesion::{self, CohesionProfile};
use super::community::{self, Partition};
use super::sector::{self, Sector};
use super::{LayoutOptions, Topology, anchor, collision, isolated, radial, relax};
use crate::error::Result;
use crate::geom::Point;
use crate::graph::{CommunityAssignment, CommunityLayout, LayoutResult, NodeLayout};
use crate::metrics::partition_modularity;
use crate::rng::{LayoutRng, entropy_seed};
use indexmap::IndexMap;
use starling_graphlib::Graph;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
struct LayoutTimings {
    total: std::time::Duration,
    detect: std::time::Duration,
    analyze: std::time::Duration,
    anchors: std::time::Duration,
    relax: std::time::Duration,
    collision: std::time::Duration,
    output: std::time::Duration,
}

/// Everything the placement stages read but never change.
#[derive(Debug, Clone)]
pub(crate) struct LayoutContext {
    pub(crate) topology: Topology,
    pub(crate) opts: LayoutOptions,
    pub(crate) profiles: Vec<Option<CohesionProfile>>,
    pub(crate) radii: Vec<f64>,
    pub(crate) visual_sizes: Vec<f64>,
    /// Keyed by primary community.
    pub(crate) sectors: BTreeMap<usize, Sector>,
}

impl LayoutContext {
    pub(crate) fn new(topology: Topology, opts: LayoutOptions, partition: &Partition) -> Self {
        let degrees = topology.degrees();
        let radii = radial::target_radii(&degrees, opts.max_radius);
        let visual_sizes = degrees.iter().map(|&d| radial::visual_size(d)).collect();
        let profiles = cohesion::analyze(&topology, partition);
        let sectors = sector::allocate(&cohesion::primary_sizes(&profiles), opts.gap_fraction);
        Self {
            topology,
            opts,
            profiles,
            radii,
            visual_sizes,
            sectors,
        }
    }

    pub(crate) fn primary(&self, ix: usize) -> Option<usize> {
        self.profiles[ix].map(|p| p.primary)
    }

    pub(crate) fn sector_of(&self, ix: usize) -> Option<&Sector> {
        self.primary(ix).and_then(|c| self.sectors.get(&c))
    }

    /// Connected nodes that have a sector to live in, in input order.
    pub(crate) fn placeable(&self) -> Vec<usize> {
        (0..self.topology.len())
            .filter(|&ix| self.topology.degree(ix) > 0 && self.sector_of(ix).is_some())
            .collect()
    }
}

fn seeded(opts: &LayoutOptions) -> (u64, LayoutRng) {
    let seed = opts.random_seed.unwrap_or_else(entropy_seed);
    (seed, LayoutRng::new(seed))
}

/// Runs every stage on `g`. `name_of` supplies the optional display name reported per node.
pub(crate) fn run<N, F>(g: &Graph<N>, opts: &LayoutOptions, name_of: F) -> Result<LayoutResult>
where
    F: Fn(&N) -> Option<String>,
{
    opts.validate()?;

    let timing_enabled = std::env::var("STARLING_LAYOUT_TIMING").ok().as_deref() == Some("1");
    let mut timings = LayoutTimings::default();
    let total_start = timing_enabled.then(std::time::Instant::now);

    let (seed, mut rng) = seeded(opts);
    let topology = Topology::from_graph(g);
    let n = topology.len();

    let detect_start = timing_enabled.then(std::time::Instant::now);
    let partition = community::detect(&topology, opts, &mut rng);
    let modularity = partition_modularity(&topology.adjacency, partition.labels(), 1.0);
    if let Some(s) = detect_start {
        timings.detect = s.elapsed();
    }

    let analyze_start = timing_enabled.then(std::time::Instant::now);
    let ctx = LayoutContext::new(topology, opts.clone(), &partition);
    let placeable = ctx.placeable();
    if let Some(s) = analyze_start {
        timings.analyze = s.elapsed();
    }
    tracing::debug!(
        nodes = n,
        connected = placeable.len(),
        detected = partition.count(),
        sectors = ctx.sectors.len(),
        "analyzed cohesion"
    );

    let anchors_start = timing_enabled.then(std::time::Instant::now);
    let anchors = anchor::place(&ctx, &placeable, &mut rng);
    if let Some(s) = anchors_start {
        timings.anchors = s.elapsed();
    }

    let relax_start = timing_enabled.then(std::time::Instant::now);
    let positions = relax::initial_placement(&ctx, &anchors, &mut rng);
    let mut positions = relax::refine(&ctx, &anchors, positions, &mut rng);
    if let Some(s) = relax_start {
        timings.relax = s.elapsed();
    }

    let collision_start = timing_enabled.then(std::time::Instant::now);
    let overlapping = collision::resolve(&ctx, &placeable, &mut positions, &mut rng);
    if overlapping == opts.settle_iterations && opts.settle_iterations > 0 {
        tracing::warn!(
            sweeps = overlapping,
            "nodes still overlap after the last settle sweep"
        );
    }
    if let Some(s) = collision_start {
        timings.collision = s.elapsed();
    }

    let output_start = timing_enabled.then(std::time::Instant::now);
    let leftovers: Vec<usize> = (0..n).filter(|&ix| positions[ix].is_none()).collect();
    let stray = leftovers
        .iter()
        .filter(|&&ix| ctx.topology.degree(ix) > 0)
        .count();
    if stray > 0 {
        tracing::warn!(stray, "connected nodes without a sector were placed on the isolated grid");
    }
    let grid = isolated::grid_positions(
        leftovers.len(),
        opts.max_radius,
        opts.isolated_margin,
        opts.grid_spacing,
    );
    for (&ix, p) in leftovers.iter().zip(grid) {
        positions[ix] = Some(p);
    }

    let bridges: Vec<bool> = (0..n)
        .map(|ix| collision::drift_angle(&ctx, ix).is_some())
        .collect();
    let mut nodes: IndexMap<String, NodeLayout> = IndexMap::with_capacity(n);
    for ix in 0..n {
        let profile = ctx.profiles[ix];
        nodes.insert(
            ctx.topology.ids[ix].clone(),
            NodeLayout {
                position: positions[ix].unwrap_or(Point::ORIGIN),
                degree: ctx.topology.degree(ix),
                community: partition.label(ix),
                primary_community: profile.map(|p| p.primary),
                cohesion: profile.map_or(0.0, |p| p.cohesion),
                cross_ratio: profile.map_or(0.0, |p| p.cross_ratio()),
                radius: ctx.radii[ix],
                visual_size: ctx.visual_sizes[ix],
                is_anchor: anchors.is_anchor[ix],
                is_bridge: bridges[ix],
                name: name_of(g.label_at(ix)),
            },
        );
    }

    let sizes = cohesion::primary_sizes(&ctx.profiles);
    let communities: BTreeMap<usize, CommunityLayout> = ctx
        .sectors
        .iter()
        .map(|(&label, sector)| {
            (
                label,
                CommunityLayout {
                    size: sizes.get(&label).copied().unwrap_or(0),
                    base_angle: sector.base_angle,
                    angle_span: sector.angle_span,
                    center: anchors.centers.get(&label).copied(),
                },
            )
        })
        .collect();
    if let Some(s) = output_start {
        timings.output = s.elapsed();
    }

    if let Some(s) = total_start {
        timings.total = s.elapsed();
        tracing::info!(
            total = ?timings.total,
            detect = ?timings.detect,
            analyze = ?timings.analyze,
            anchors = ?timings.anchors,
            relax = ?timings.relax,
            collision = ?timings.collision,
            output = ?timings.output,
            nodes = n,
            connected = placeable.len(),
            isolated = leftovers.len(),
            "[starling-timing]"
        );
    }

    Ok(LayoutResult {
        seed,
        detector: partition.method(),
        detected_communities: partition.count(),
        modularity,
        nodes,
        communities,
    })
}

/// Community detection alone, with the same seeding and fallback as [`run`].
pub(crate) fn detect_only<N>(g: &Graph<N>, opts: &LayoutOptions) -> Result<CommunityAssignment> {
    opts.validate()?;
    let (seed, mut rng) = seeded(opts);
    let topology = Topology::from_graph(g);
    let partition = community::detect(&topology, opts, &mut rng);
    let modularity = partition_modularity(&topology.adjacency, partition.labels(), 1.0);
    let membership = topology
        .ids
        .iter()
        .enumerate()
        .map(|(ix, id)| (id.clone(), partition.label(ix)))
        .collect();
    Ok(CommunityAssignment {
        seed,
        detector: partition.method(),
        count: partition.count(),
        sizes: partition.sizes(),
        modularity,
        membership,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::LayoutContext;
    use crate::algo::community::Partition;
    use crate::algo::{LayoutOptions, Topology};

    /// Context over `n` nodes with unit edges and a fixed detected partition.
    pub(crate) fn context_for(
        n: usize,
        edges: &[(usize, usize)],
        labels: Vec<Option<usize>>,
    ) -> (LayoutContext, Vec<usize>) {
        let topology = Topology::from_edges(n, edges);
        let ctx = LayoutContext::new(
            topology,
            LayoutOptions::default(),
            &Partition::from_labels(labels),
        );
        let placeable = ctx.placeable();
        (ctx, placeable)
    }

    #[test]
    fn placeable_skips_zero_degree_nodes() {
        let (ctx, placeable) = context_for(4, &[(0, 1), (1, 2)], vec![Some(0), Some(0), Some(0), None]);
        assert_eq!(placeable, vec![0, 1, 2]);
        assert_eq!(ctx.sectors.len(), 1);
        assert_eq!(ctx.radii[1], 0.0);
        assert_eq!(ctx.radii[3], 500.0);
    }
}
