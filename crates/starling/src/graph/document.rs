//! JSON graph documents accepted by [`Graph::from_json`].
//!
//! Two shapes are understood:
//!
//! - a friends snapshot: `{"friends": {"<id>": "<name>"}, "edges": {"<id>|<id>": <count>}}`
//! - explicit lists: `{"nodes": [{"id": ..}], "edges": [{"source": .., "target": .., "weight": ..}]}`
//!
//! Snapshots are loaded tolerantly (bad pair keys, unknown endpoints and self pairs are skipped
//! with a warning) since they come from scraped data. List documents are kept verbatim and are
//! validated strictly later on.

use super::{Edge, Graph, Node};
use crate::error::Result;
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GraphDocument {
    Snapshot {
        friends: IndexMap<String, String>,
        #[serde(default)]
        edges: IndexMap<String, u32>,
    },
    Lists(Graph),
}

impl GraphDocument {
    pub fn into_graph(self) -> Graph {
        match self {
            GraphDocument::Lists(graph) => graph,
            GraphDocument::Snapshot { friends, edges } => snapshot_to_graph(friends, edges),
        }
    }
}

fn snapshot_to_graph(friends: IndexMap<String, String>, edges: IndexMap<String, u32>) -> Graph {
    let mut graph = Graph {
        nodes: Vec::with_capacity(friends.len()),
        edges: Vec::with_capacity(edges.len()),
    };
    for (id, name) in &friends {
        graph.nodes.push(Node::named(id.clone(), name.clone()));
    }

    let mut skipped = 0usize;
    for (key, count) in edges {
        let Some((a, b)) = key.split_once('|') else {
            tracing::warn!(key = %key, "skipping edge key without a `|` separator");
            skipped += 1;
            continue;
        };
        if a == b || !friends.contains_key(a) || !friends.contains_key(b) {
            skipped += 1;
            continue;
        }
        graph.edges.push(Edge::new(a, b, count));
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped snapshot edges that do not join two distinct friends");
    }
    graph
}

impl Graph {
    /// Parses either JSON document shape.
    pub fn from_json(text: &str) -> Result<Graph> {
        let doc: GraphDocument = serde_json::from_str(text)?;
        Ok(doc.into_graph())
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn snapshot_preserves_friend_order_and_skips_bad_pairs() {
        let text = r#"{
            "friends": {"u2": "Bea", "u1": "Al", "u3": "Cy"},
            "edges": {"u1|u2": 4, "u2|u1": 1, "u1|ghost": 2, "u3|u3": 1, "nonsense": 9}
        }"#;
        let g = Graph::from_json(text).expect("snapshot");

        let ids: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1", "u3"]);
        assert_eq!(g.nodes[0].name.as_deref(), Some("Bea"));
        assert_eq!(g.edges.len(), 2);

        let built = g.to_graphlib().expect("valid");
        assert_eq!(built.edge_weight("u1", "u2"), Some(5));
    }

    #[test]
    fn list_documents_are_kept_verbatim() {
        let text = r#"{
            "nodes": [{"id": "a", "name": "Ann"}, {"id": "b"}],
            "edges": [{"source": "a", "target": "b", "weight": 3}]
        }"#;
        let g = Graph::from_json(text).expect("lists");
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges[0].weight, 3);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Graph::from_json("{not json").is_err());
    }
}
