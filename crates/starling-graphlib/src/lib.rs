#![forbid(unsafe_code)]

//! Graph container APIs used by `starling`.
//!
//! The container models a mutual-connection graph: undirected, simple (no self loops, at most one
//! edge per unordered pair) and integer-weighted. Adding an edge that already exists sums the
//! weights instead of creating a parallel edge.

mod error;
mod graph;

pub use error::{GraphError, Result};
pub use graph::alg;
pub use graph::{Edge, Graph};
