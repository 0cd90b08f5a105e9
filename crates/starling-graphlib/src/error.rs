#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("edge {v} -- {w} references a missing node: {missing}")]
    MissingNode {
        v: String,
        w: String,
        missing: String,
    },
    #[error("self loops are not allowed: {id}")]
    SelfLoop { id: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
