//! In-memory DOT graph model
//!
//! This module implements the graph tree with:
//! - A root graph owning nested subgraphs and clusters
//! - Nodes with globally unique identifiers, declared where first requested
//! - Edges recorded at the level that created them, parallel edges allowed
//! - Ordered attribute stores on every entity
//! - Same-rank groups

pub mod attribute;
pub mod edge;
pub mod node;
pub mod options;
pub mod registry;
pub mod store;
pub mod types;

// Re-export main types
pub use attribute::{keys, AttributeValue, Attributes};
pub use edge::{Edge, EdgeMut};
pub use node::{Node, NodeMut};
pub use options::{EdgeInitializer, GraphOptions, NodeInitializer};
pub use registry::{IdGenerator, UuidGenerator, CLUSTER_PREFIX, RANDOM_ID};
pub use store::{Graph, GraphError, GraphLevel, GraphResult, RankGroup, Scope};
pub use types::{EdgeId, GraphId, GraphKind, NodeId};
