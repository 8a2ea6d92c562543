//! dotgraph
//!
//! An in-memory model of Graphviz DOT graphs with a deterministic serializer.
//!
//! # Features
//!
//! - Directed and undirected root graphs, optionally strict
//! - Nested subgraphs and clusters with globally unique identifiers
//! - Node and edge attributes rendered in a stable order
//! - Same-rank groups
//! - Byte-exact accounting when the output sink fails part way
//!
//! ## Example Usage
//!
//! ```rust
//! use dotgraph::{keys, Graph, GraphOptions};
//!
//! let mut graph = Graph::new(GraphOptions::new().id("deps")).unwrap();
//!
//! let core = graph.node("core").into_id();
//! graph
//!     .node("app")
//!     .set_attribute(keys::SHAPE, "box")
//!     .edge(core)
//!     .dashed();
//!
//! assert_eq!(
//!     graph.to_string(),
//!     "digraph \"deps\" {\"app\"[shape=\"box\"];\"core\";\"app\"->\"core\"[style=\"dashed\"];}"
//! );
//! ```

pub mod graph;
pub mod serialization;

pub use graph::{
    keys, AttributeValue, Attributes, Edge, EdgeId, EdgeMut, Graph, GraphError, GraphId, GraphKind,
    GraphLevel, GraphOptions, GraphResult, IdGenerator, Node, NodeId, NodeMut, RankGroup, Scope,
    UuidGenerator, RANDOM_ID,
};
pub use serialization::{WriteError, WriteResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
