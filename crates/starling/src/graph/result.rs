use crate::algo::Detector;
use crate::geom::Point;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final placement and descriptive metrics of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLayout {
    pub position: Point,
    /// Number of distinct neighbors (weights ignored).
    pub degree: usize,
    /// Detected community; `None` for zero-degree nodes.
    pub community: Option<usize>,
    /// Majority community of the neighbors. This is the one that decides the node's sector.
    pub primary_community: Option<usize>,
    pub cohesion: f64,
    /// `1 - cohesion` for connected nodes, `0` for isolated ones.
    pub cross_ratio: f64,
    /// Degree-derived target radius.
    pub radius: f64,
    pub visual_size: f64,
    pub is_anchor: bool,
    /// Drifted out of its home sector toward the community it bridges to.
    pub is_bridge: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Sector and center of one primary community.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityLayout {
    /// Number of nodes whose primary community this is.
    pub size: usize,
    pub base_angle: f64,
    pub angle_span: f64,
    /// Mean anchor position; `None` when the community received no anchor.
    pub center: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Seed that reproduces this layout.
    pub seed: u64,
    /// Partitioner whose output was used.
    pub detector: Detector,
    /// Number of detected communities (before the primary-community vote).
    pub detected_communities: usize,
    /// Newman modularity (resolution 1) of the detected partition.
    pub modularity: f64,
    /// Every input node, in input order.
    pub nodes: IndexMap<String, NodeLayout>,
    /// Keyed by primary community label.
    pub communities: BTreeMap<usize, CommunityLayout>,
}

impl LayoutResult {
    pub fn position(&self, id: &str) -> Option<Point> {
        self.nodes.get(id).map(|n| n.position)
    }

    pub fn positions(&self) -> impl Iterator<Item = (&str, Point)> {
        self.nodes.iter().map(|(id, n)| (id.as_str(), n.position))
    }

    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.get(id)
    }
}

/// Output of community detection alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityAssignment {
    pub seed: u64,
    pub detector: Detector,
    pub count: usize,
    /// Member count per community label.
    pub sizes: Vec<usize>,
    pub modularity: f64,
    /// Detected community per node, `None` for zero-degree nodes, in input order.
    pub membership: IndexMap<String, Option<usize>>,
}
