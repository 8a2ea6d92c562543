//! Node implementation
//!
//! [`Node`] is the stored record; [`NodeMut`] is the fluent mutable view
//! handed out by the graph.

use super::attribute::{AttributeValue, Attributes};
use super::edge::EdgeMut;
use super::store::Graph;
use super::types::{EdgeId, GraphId, NodeId};

/// A vertex of the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,

    /// Identifier as rendered in the output
    name: String,

    /// Level where the node was first requested; it is declared there
    graph: GraphId,

    attributes: Attributes,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String, graph: GraphId) -> Self {
        Node {
            id,
            name,
            graph,
            attributes: Attributes::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning graph level
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// Mutable view of one node
pub struct NodeMut<'g> {
    graph: &'g mut Graph,
    id: NodeId,
}

impl<'g> NodeMut<'g> {
    pub(crate) fn new(graph: &'g mut Graph, id: NodeId) -> Self {
        NodeMut { graph, id }
    }

    fn node(&self) -> &Node {
        &self.graph.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.node().name()
    }

    /// Owning graph level
    pub fn graph_id(&self) -> GraphId {
        self.node().graph()
    }

    pub fn attributes(&self) -> &Attributes {
        self.node().attributes()
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        self.graph.nodes[self.id.0].attributes_mut()
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes().get(key)
    }

    pub fn set_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes_mut().set(key, value);
        self
    }

    pub fn set_attributes<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.attributes_mut().extend(pairs);
        self
    }

    pub fn delete_attribute(mut self, key: &str) -> Self {
        self.attributes_mut().remove(key);
        self
    }

    /// Connect this node to `to`; the edge is recorded at this node's level
    pub fn edge(self, to: NodeId) -> EdgeMut<'g> {
        self.edge_with_attributes(to, Attributes::new())
    }

    pub fn edge_with_attributes(self, to: NodeId, attributes: Attributes) -> EdgeMut<'g> {
        let level = self.graph_id();
        let edge = self.graph.create_edge(level, self.id, to, attributes);
        EdgeMut::new(self.graph, edge)
    }

    /// Every edge from this node to `to` at or below this node's level
    pub fn edges_to(&self, to: NodeId) -> Vec<EdgeId> {
        self.graph.find_edges_in(self.graph_id(), self.id, to)
    }

    /// Release the view, keeping only the handle
    pub fn into_id(self) -> NodeId {
        self.id
    }
}
