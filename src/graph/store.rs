//! In-memory graph tree
//!
//! A [`Graph`] is the root of a tree of graph levels. Every level, node and
//! edge lives in an arena owned by the root and is addressed by a handle:
//! - levels: `GraphId` -> [`GraphLevel`] (index 0 is the root)
//! - nodes: `NodeId` -> [`Node`]
//! - edges: `EdgeId` -> [`Edge`]
//!
//! Identifier uniqueness is enforced by the root's [`IdentityRegistry`].

use super::attribute::{AttributeValue, Attributes};
use super::edge::{Edge, EdgeMut};
use super::node::{Node, NodeMut};
use super::options::{GeneratorOption, GraphOptions, ParentOption, RootConfig};
use super::registry::{IdentityRegistry, NodeResolution};
use super::types::{EdgeId, GraphId, GraphKind, NodeId};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur while building a graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Root graph must be directed or undirected, got {0:?}")]
    InvalidRootKind(GraphKind),

    #[error("Root graph cannot be a cluster")]
    ClusterRoot,

    #[error("Root graph cannot have a parent")]
    RootParent,

    #[error("Subgraph cannot be of kind {0:?}")]
    InvalidSubgraphKind(GraphKind),

    #[error("Subgraph requires a parent")]
    MissingParent,

    #[error("Subgraph parent {requested} is not the creating graph {actual}")]
    ForeignParent { requested: GraphId, actual: GraphId },

    #[error("An identifier generator is required")]
    MissingGenerator,

    #[error("Option `{0}` can only be set on the root graph")]
    RootOnlyOption(&'static str),

    #[error("Subgraph \"{0}\" already exists")]
    DuplicateSubgraph(String),

    #[error("Graph {0} not found")]
    UnknownGraph(GraphId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Nodes constrained to the same rank by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroup {
    label: String,
    nodes: Vec<NodeId>,
}

impl RankGroup {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

/// One level of the tree: the root graph or a subgraph
#[derive(Debug, Clone)]
pub struct GraphLevel {
    id: GraphId,
    name: String,
    kind: GraphKind,
    cluster: bool,
    parent: Option<GraphId>,
    attributes: Attributes,

    /// Child subgraphs in creation order
    children: Vec<GraphId>,

    /// Nodes first requested at this level, ordered by identifier
    nodes: BTreeMap<String, NodeId>,

    /// Edges created at this level in creation order
    edges: Vec<EdgeId>,

    ranks: Vec<RankGroup>,
}

impl GraphLevel {
    fn new(id: GraphId, name: String, kind: GraphKind, cluster: bool, parent: Option<GraphId>) -> Self {
        GraphLevel {
            id,
            name,
            kind,
            cluster,
            parent,
            attributes: Attributes::new(),
            children: Vec::new(),
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            ranks: Vec::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Rendered identifier; empty for anonymous graphs
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_cluster(&self) -> bool {
        self.cluster
    }

    pub fn parent(&self) -> Option<GraphId> {
        self.parent
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[GraphId] {
        &self.children
    }

    /// Locally owned nodes in ascending identifier order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.values().copied()
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn rank_groups(&self) -> &[RankGroup] {
        &self.ranks
    }
}

/// Root graph owning the whole tree
///
/// Root-level operations are available directly on `Graph`; other levels are
/// reached through [`Graph::scope`].
#[derive(Debug)]
pub struct Graph {
    config: RootConfig,
    registry: IdentityRegistry,
    pub(crate) levels: Vec<GraphLevel>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
}

impl Graph {
    /// Create a new root graph
    pub fn new(options: GraphOptions) -> GraphResult<Self> {
        let kind = options.kind.unwrap_or_default();
        if !kind.is_root_kind() {
            return Err(GraphError::InvalidRootKind(kind));
        }
        if options.cluster {
            return Err(GraphError::ClusterRoot);
        }
        if !matches!(options.parent, ParentOption::Unset) {
            return Err(GraphError::RootParent);
        }
        let generator = options
            .resolved_generator()
            .ok_or(GraphError::MissingGenerator)?;

        let registry = IdentityRegistry::new(generator);
        // a root is never a cluster, so a requested prefix is dropped
        let name = registry.canonical_subgraph_id(&options.id, false);
        debug!("Creating {} graph \"{}\" (strict: {})", kind, name, options.strict);

        Ok(Graph {
            config: RootConfig {
                kind,
                strict: options.strict,
                node_initializer: options.node_initializer,
                edge_initializer: options.edge_initializer,
            },
            registry,
            levels: vec![GraphLevel::new(GraphId::ROOT, name, kind, false, None)],
            nodes: Vec::new(),
            edges: Vec::new(),
        })
    }

    /// Root identifier; empty for an anonymous graph
    pub fn name(&self) -> &str {
        self.levels[GraphId::ROOT.0].name()
    }

    pub fn kind(&self) -> GraphKind {
        self.config.kind
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    pub fn root(&self) -> &GraphLevel {
        &self.levels[GraphId::ROOT.0]
    }

    /// Mutable view of one level of the tree
    pub fn scope(&mut self, id: GraphId) -> GraphResult<Scope<'_>> {
        if id.0 >= self.levels.len() {
            return Err(GraphError::UnknownGraph(id));
        }
        Ok(Scope { graph: self, level: id })
    }

    pub fn root_scope(&mut self) -> Scope<'_> {
        Scope {
            graph: self,
            level: GraphId::ROOT,
        }
    }

    /// Get or create a node; new nodes are owned by the root
    pub fn node(&mut self, name: &str) -> NodeMut<'_> {
        let id = self.create_node(GraphId::ROOT, name);
        NodeMut::new(self, id)
    }

    /// Create an edge at the root level
    ///
    /// # Panics
    ///
    /// Panics if either handle was not issued by this graph.
    pub fn edge(&mut self, from: NodeId, to: NodeId) -> EdgeMut<'_> {
        self.edge_with_attributes(from, to, Attributes::new())
    }

    pub fn edge_with_attributes(&mut self, from: NodeId, to: NodeId, attributes: Attributes) -> EdgeMut<'_> {
        let id = self.create_edge(GraphId::ROOT, from, to, attributes);
        EdgeMut::new(self, id)
    }

    /// Create a direct child subgraph of the root
    pub fn subgraph(&mut self, options: GraphOptions) -> GraphResult<GraphId> {
        self.create_subgraph(GraphId::ROOT, options)
    }

    pub fn add_to_same_rank(&mut self, label: impl Into<String>, nodes: &[NodeId]) {
        self.add_rank_group(GraphId::ROOT, label.into(), nodes);
    }

    pub fn attributes(&self) -> &Attributes {
        self.root().attributes()
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.levels[GraphId::ROOT.0].attributes
    }

    /// Set a root graph attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> &mut Self {
        self.attributes_mut().set(key, value);
        self
    }

    pub fn set_attributes<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.attributes_mut().extend(pairs);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes().get(key)
    }

    pub fn delete_attribute(&mut self, key: &str) -> &mut Self {
        self.attributes_mut().remove(key);
        self
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn get_subgraph(&self, id: GraphId) -> Option<&GraphLevel> {
        self.levels.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if id.0 >= self.nodes.len() {
            return None;
        }
        Some(NodeMut::new(self, id))
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<EdgeMut<'_>> {
        if id.0 >= self.edges.len() {
            return None;
        }
        Some(EdgeMut::new(self, id))
    }

    /// Every edge `from -> to` in the whole tree
    pub fn find_edges(&self, from: NodeId, to: NodeId) -> Vec<EdgeId> {
        self.find_edges_in(GraphId::ROOT, from, to)
    }

    /// Every edge `from -> to` created at `level` or below
    ///
    /// Levels are visited in preorder (a level before its children, children
    /// in creation order); edges keep creation order within a level.
    pub fn find_edges_in(&self, level: GraphId, from: NodeId, to: NodeId) -> Vec<EdgeId> {
        self.preorder(level)
            .into_iter()
            .flat_map(|id| self.levels[id.0].edges.iter().copied())
            .filter(|edge| self.edges[edge.0].connects(from, to))
            .collect()
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.registry.find_node(name)
    }

    /// Look up a node owned by `level` or one of its descendants
    pub fn find_node_in(&self, level: GraphId, name: &str) -> Option<NodeId> {
        let id = self.registry.find_node(name)?;
        let owner = self.nodes[id.0].graph();
        self.is_within(owner, level).then_some(id)
    }

    pub fn find_nodes(&self) -> Vec<NodeId> {
        self.find_nodes_in(GraphId::ROOT)
    }

    /// Nodes owned by `level` and its descendants, in preorder
    pub fn find_nodes_in(&self, level: GraphId) -> Vec<NodeId> {
        self.preorder(level)
            .into_iter()
            .flat_map(|id| self.levels[id.0].nodes())
            .collect()
    }

    /// Global subgraph lookup, independent of the caller's position
    pub fn find_subgraph(&self, name: &str) -> Option<GraphId> {
        self.registry.find_subgraph(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of subgraphs, not counting the root
    pub fn subgraph_count(&self) -> usize {
        self.levels.len() - 1
    }

    pub(crate) fn create_node(&mut self, level: GraphId, name: &str) -> NodeId {
        let name = match self.registry.resolve_node(name) {
            NodeResolution::Existing(id) => return id,
            NodeResolution::Vacant(name) => name,
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, name.clone(), level));
        self.levels[level.0].nodes.insert(name.clone(), id);
        debug!("Created node \"{}\" in {}", name, level);
        self.registry.register_node(name, id);

        if let Some(init) = self.config.node_initializer.clone() {
            init(&mut NodeMut::new(self, id));
        }
        id
    }

    pub(crate) fn create_edge(
        &mut self,
        level: GraphId,
        from: NodeId,
        to: NodeId,
        attributes: Attributes,
    ) -> EdgeId {
        assert!(
            from.0 < self.nodes.len() && to.0 < self.nodes.len(),
            "edge endpoints {} and {} must belong to this graph",
            from,
            to
        );

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(id, from, to, level, Attributes::new()));
        self.levels[level.0].edges.push(id);
        trace!("Created edge {} ({} -> {}) in {}", id, from, to, level);

        if let Some(init) = self.config.edge_initializer.clone() {
            init(&mut EdgeMut::new(self, id));
        }
        self.edges[id.0].attributes_mut().extend(attributes);
        id
    }

    pub(crate) fn create_subgraph(&mut self, parent: GraphId, options: GraphOptions) -> GraphResult<GraphId> {
        if parent.0 >= self.levels.len() {
            return Err(GraphError::UnknownGraph(parent));
        }
        if let Some(kind) = options.kind {
            if kind.is_root_kind() {
                return Err(GraphError::InvalidSubgraphKind(kind));
            }
        }
        match options.parent {
            ParentOption::Unset => {}
            ParentOption::Set(requested) if requested == parent => {}
            ParentOption::Set(requested) => {
                return Err(GraphError::ForeignParent {
                    requested,
                    actual: parent,
                })
            }
            ParentOption::Removed => return Err(GraphError::MissingParent),
        }
        match options.generator {
            GeneratorOption::Default => {}
            GeneratorOption::Custom(_) => return Err(GraphError::RootOnlyOption("generator")),
            GeneratorOption::Removed => return Err(GraphError::MissingGenerator),
        }
        if options.strict {
            return Err(GraphError::RootOnlyOption("strict"));
        }
        if options.node_initializer.is_some() {
            return Err(GraphError::RootOnlyOption("node_initializer"));
        }
        if options.edge_initializer.is_some() {
            return Err(GraphError::RootOnlyOption("edge_initializer"));
        }

        let id = GraphId(self.levels.len());
        let name = self.registry.resolve_subgraph(&options.id, options.cluster, id)?;
        debug!("Created subgraph \"{}\" ({}) under {}", name, id, parent);

        self.levels.push(GraphLevel::new(
            id,
            name,
            GraphKind::Subgraph,
            options.cluster,
            Some(parent),
        ));
        self.levels[parent.0].children.push(id);
        Ok(id)
    }

    pub(crate) fn add_rank_group(&mut self, level: GraphId, label: String, nodes: &[NodeId]) {
        assert!(
            nodes.iter().all(|id| id.0 < self.nodes.len()),
            "rank group members must belong to this graph"
        );
        trace!("Adding rank group \"{}\" with {} nodes to {}", label, nodes.len(), level);
        self.levels[level.0].ranks.push(RankGroup {
            label,
            nodes: nodes.to_vec(),
        });
    }

    /// `level` and its descendants, a level before its children
    fn preorder(&self, level: GraphId) -> Vec<GraphId> {
        let mut order = Vec::new();
        if level.0 >= self.levels.len() {
            return order;
        }
        let mut stack = vec![level];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.levels[id.0].children.iter().rev().copied());
        }
        order
    }

    fn is_within(&self, mut level: GraphId, ancestor: GraphId) -> bool {
        loop {
            if level == ancestor {
                return true;
            }
            match self.levels[level.0].parent {
                Some(parent) => level = parent,
                None => return false,
            }
        }
    }
}

/// Mutable view of one graph level
pub struct Scope<'g> {
    graph: &'g mut Graph,
    level: GraphId,
}

impl<'g> Scope<'g> {
    fn level(&self) -> &GraphLevel {
        &self.graph.levels[self.level.0]
    }

    pub fn id(&self) -> GraphId {
        self.level
    }

    pub fn name(&self) -> &str {
        self.level().name()
    }

    pub fn parent(&self) -> Option<GraphId> {
        self.level().parent()
    }

    pub fn is_cluster(&self) -> bool {
        self.level().is_cluster()
    }

    /// Get or create a node; new nodes are owned by this level
    pub fn node(&mut self, name: &str) -> NodeMut<'_> {
        let id = self.graph.create_node(self.level, name);
        NodeMut::new(self.graph, id)
    }

    /// Create an edge at this level
    ///
    /// # Panics
    ///
    /// Panics if either handle was not issued by this graph.
    pub fn edge(&mut self, from: NodeId, to: NodeId) -> EdgeMut<'_> {
        self.edge_with_attributes(from, to, Attributes::new())
    }

    pub fn edge_with_attributes(&mut self, from: NodeId, to: NodeId, attributes: Attributes) -> EdgeMut<'_> {
        let id = self.graph.create_edge(self.level, from, to, attributes);
        EdgeMut::new(self.graph, id)
    }

    /// Create a child subgraph of this level
    pub fn subgraph(&mut self, options: GraphOptions) -> GraphResult<GraphId> {
        self.graph.create_subgraph(self.level, options)
    }

    pub fn add_to_same_rank(&mut self, label: impl Into<String>, nodes: &[NodeId]) -> &mut Self {
        self.graph.add_rank_group(self.level, label.into(), nodes);
        self
    }

    pub fn attributes(&self) -> &Attributes {
        self.level().attributes()
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.graph.levels[self.level.0].attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes().get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> &mut Self {
        self.attributes_mut().set(key, value);
        self
    }

    pub fn set_attributes<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.attributes_mut().extend(pairs);
        self
    }

    pub fn delete_attribute(&mut self, key: &str) -> &mut Self {
        self.attributes_mut().remove(key);
        self
    }

    pub fn find_edges(&self, from: NodeId, to: NodeId) -> Vec<EdgeId> {
        self.graph.find_edges_in(self.level, from, to)
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.graph.find_node_in(self.level, name)
    }

    pub fn find_nodes(&self) -> Vec<NodeId> {
        self.graph.find_nodes_in(self.level)
    }

    pub fn find_subgraph(&self, name: &str) -> Option<GraphId> {
        self.graph.find_subgraph(name)
    }
}
