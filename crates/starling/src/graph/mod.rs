use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod document;
mod result;

pub use document::GraphDocument;
pub use result::{CommunityAssignment, CommunityLayout, LayoutResult, NodeLayout};

/// Plain input value: nodes with attributes and weighted undirected edges.
///
/// Use [`Graph::validate`] (or [`Graph::to_graphlib`], which validates) before handing it to the
/// layout; the pipeline itself assumes a well-formed graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Display name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Undirected edge; `weight` is the mutual-connection count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: u32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut node_exists: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
        for n in &self.nodes {
            if !node_exists.insert(n.id.as_str()) {
                return Err(Error::DuplicateNode { node: n.id.clone() });
            }
        }
        for e in &self.edges {
            for endpoint in [&e.source, &e.target] {
                if !node_exists.contains(endpoint.as_str()) {
                    return Err(Error::MissingEndpoint {
                        edge: format!("{} -- {}", e.source, e.target),
                        node: endpoint.clone(),
                    });
                }
            }
            if e.source == e.target {
                return Err(Error::SelfLoop {
                    node: e.source.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validates and builds the indexed container; repeated pairs (in either direction) are
    /// merged with their weights summed.
    pub fn to_graphlib(&self) -> Result<starling_graphlib::Graph<Node>> {
        self.validate()?;
        let mut g: starling_graphlib::Graph<Node> =
            starling_graphlib::Graph::with_capacity(self.nodes.len(), self.edges.len());
        for n in &self.nodes {
            g.set_node(n.id.clone(), n.clone());
        }
        for e in &self.edges {
            g.add_edge(&e.source, &e.target, e.weight)?;
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::{Edge, Graph, Node};
    use crate::Error;

    #[test]
    fn validate_rejects_unknown_endpoint() {
        let mut g = Graph::new();
        g.add_node(Node::new("a"))
            .add_edge(Edge::new("a", "ghost", 1));

        let err = g.validate().expect_err("missing endpoint");
        assert!(matches!(err, Error::MissingEndpoint { ref node, .. } if node == "ghost"));
    }

    #[test]
    fn validate_rejects_self_loops_and_duplicate_ids() {
        let mut looped = Graph::new();
        looped.add_node(Node::new("a")).add_edge(Edge::new("a", "a", 1));
        assert!(matches!(looped.validate(), Err(Error::SelfLoop { .. })));

        let mut dup = Graph::new();
        dup.add_node(Node::new("a")).add_node(Node::named("a", "again"));
        assert!(matches!(dup.validate(), Err(Error::DuplicateNode { .. })));
    }

    #[test]
    fn to_graphlib_sums_repeated_pairs() {
        let mut g = Graph::new();
        g.add_node(Node::new("a"))
            .add_node(Node::new("b"))
            .add_edge(Edge::new("a", "b", 1))
            .add_edge(Edge::new("b", "a", 2));

        let built = g.to_graphlib().expect("valid graph");
        assert_eq!(built.edge_count(), 1);
        assert_eq!(built.edge_weight("a", "b"), Some(3));
    }

    #[test]
    fn edge_weight_defaults_to_one_when_deserialized() {
        let e: Edge = serde_json::from_str(r#"{"source":"a","target":"b"}"#).expect("edge");
        assert_eq!(e.weight, 1);
    }
}
