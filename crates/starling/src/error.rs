#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph contains an edge with a missing endpoint: {edge} (unknown node {node})")]
    MissingEndpoint { edge: String, node: String },
    #[error("graph contains a self loop on node {node}")]
    SelfLoop { node: String },
    #[error("graph contains duplicate node id: {node}")]
    DuplicateNode { node: String },
    #[error("invalid layout option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },
    #[error("community detection failed ({algorithm}): {reason}")]
    CommunityDetection {
        algorithm: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Graph(#[from] starling_graphlib::GraphError),
    #[error("failed to parse graph document: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
