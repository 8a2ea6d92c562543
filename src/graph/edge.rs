//! Edge implementation
//!
//! Edges are never deduplicated: every call creates a new one, and parallel
//! edges between the same ordered pair are kept in creation order.

use super::attribute::{keys, AttributeValue, Attributes};
use super::store::Graph;
use super::types::{EdgeId, GraphId, NodeId};

/// A connection between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    from: NodeId,
    to: NodeId,

    /// Level the edge was created at; it is serialized there, whoever owns
    /// the endpoints
    graph: GraphId,

    attributes: Attributes,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        from: NodeId,
        to: NodeId,
        graph: GraphId,
        attributes: Attributes,
    ) -> Self {
        Edge {
            id,
            from,
            to,
            graph,
            attributes,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn graph(&self) -> GraphId {
        self.graph
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Check if this edge goes from `from` to `to`
    pub fn connects(&self, from: NodeId, to: NodeId) -> bool {
        self.from == from && self.to == to
    }
}

/// Mutable view of one edge
pub struct EdgeMut<'g> {
    graph: &'g mut Graph,
    id: EdgeId,
}

impl<'g> EdgeMut<'g> {
    pub(crate) fn new(graph: &'g mut Graph, id: EdgeId) -> Self {
        EdgeMut { graph, id }
    }

    fn record(&self) -> &Edge {
        &self.graph.edges[self.id.0]
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.record().from()
    }

    pub fn to(&self) -> NodeId {
        self.record().to()
    }

    pub fn graph_id(&self) -> GraphId {
        self.record().graph()
    }

    pub fn attributes(&self) -> &Attributes {
        self.record().attributes()
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        self.graph.edges[self.id.0].attributes_mut()
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

    /// Set the `style` attribute in place
    ///
    /// Usable from an edge initializer, which only holds `&mut EdgeMut`.
    pub fn set_style(&mut self, style: &str) -> &mut Self {
        self.attributes_mut().set(keys::STYLE, style);
        self
    }

    /// Default style
    pub fn solid(mut self) -> Self {
        self.set_style("solid");
        self
    }

    pub fn bold(mut self) -> Self {
        self.set_style("bold");
        self
    }

    pub fn dashed(mut self) -> Self {
        self.set_style("dashed");
        self
    }

    pub fn dotted(mut self) -> Self {
        self.set_style("dotted");
        self
    }

    /// Continue the chain from this edge's target to `to`
    ///
    /// The new edge is recorded at the same level as this one.
    pub fn edge(self, to: NodeId) -> EdgeMut<'g> {
        self.edge_with_attributes(to, Attributes::new())
    }

    pub fn edge_with_attributes(self, to: NodeId, attributes: Attributes) -> EdgeMut<'g> {
        let level = self.graph_id();
        let from = self.to();
        let edge = self.graph.create_edge(level, from, to, attributes);
        EdgeMut::new(self.graph, edge)
    }

    /// Every edge from this edge's target to `to`, at or below this level
    pub fn edges_to(&self, to: NodeId) -> Vec<EdgeId> {
        self.graph.find_edges_in(self.graph_id(), self.to(), to)
    }

    pub fn into_id(self) -> EdgeId {
        self.id
    }
}
