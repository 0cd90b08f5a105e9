#![forbid(unsafe_code)]

//! Headless community-sector radial layout for mutual-connection graphs.
//!
//! Highly connected nodes gather near the origin, weakly connected ones drift outward, and every
//! detected community owns an angular sector. Nodes without edges are parked on a grid outside
//! the circle. The crate only computes coordinates and per-node metrics; rendering is up to the
//! caller.
//!
//! ```no_run
//! use starling::{Edge, Graph, LayoutOptions, Node};
//!
//! let mut graph = Graph::new();
//! graph
//!     .add_node(Node::named("u1", "Ann"))
//!     .add_node(Node::named("u2", "Bo"))
//!     .add_edge(Edge::new("u1", "u2", 3));
//!
//! let result = starling::layout(&graph, &LayoutOptions::default().with_seed(7))?;
//! println!("{:?}", result.position("u1"));
//! # Ok::<(), starling::Error>(())
//! ```

pub mod algo;
pub mod error;
pub mod geom;
pub mod graph;
pub mod metrics;
pub mod rng;

pub use starling_graphlib as graphlib;

pub use algo::{BridgeThresholds, Detector, LayoutOptions};
pub use error::{Error, Result};
pub use geom::Point;
pub use graph::{
    CommunityAssignment, CommunityLayout, Edge, Graph, GraphDocument, LayoutResult, Node, NodeLayout,
};
pub use metrics::NetworkStats;

/// Validates `graph` and lays it out.
pub fn layout(graph: &Graph, opts: &LayoutOptions) -> Result<LayoutResult> {
    let g = graph.to_graphlib()?;
    algo::run(&g, opts, |n: &Node| n.name.clone())
}

/// Lays out an already indexed graph. Node labels are not inspected.
pub fn layout_graph<N>(g: &graphlib::Graph<N>, opts: &LayoutOptions) -> Result<LayoutResult> {
    algo::run(g, opts, |_| None)
}

/// Runs community detection only, with the same fallback chain as [`layout`].
pub fn communities(graph: &Graph, opts: &LayoutOptions) -> Result<CommunityAssignment> {
    let g = graph.to_graphlib()?;
    algo::detect_only(&g, opts)
}
