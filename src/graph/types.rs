//! Core type definitions for the graph model
//!
//! Handles are plain arena indices. They are only meaningful for the
//! [`Graph`](super::Graph) that issued them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a node inside a graph tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Handle of an edge inside a graph tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// Handle of a graph level (the root graph or one of its subgraphs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GraphId(pub(crate) usize);

impl GraphId {
    /// The root graph of every tree
    pub const ROOT: GraphId = GraphId(0);

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphId({})", self.0)
    }
}

/// Kind of a graph level
///
/// Only the root may be `Directed` or `Undirected`; every nested level is a
/// `Subgraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GraphKind {
    #[default]
    Directed,
    Undirected,
    Subgraph,
}

impl GraphKind {
    /// Keyword that opens the block in DOT output
    pub fn keyword(&self) -> &'static str {
        match self {
            GraphKind::Directed => "digraph",
            GraphKind::Undirected => "graph",
            GraphKind::Subgraph => "subgraph",
        }
    }

    /// Edge operator used by a root of this kind
    pub fn connector(&self) -> &'static str {
        match self {
            GraphKind::Directed => "->",
            _ => "--",
        }
    }

    pub fn is_root_kind(&self) -> bool {
        !matches!(self, GraphKind::Subgraph)
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}
