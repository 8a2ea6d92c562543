//! Construction options for root graphs and subgraphs
//!
//! The same option set feeds both factories; options that only make sense on
//! one of them are rejected by the other. Options are order-insensitive.

use super::edge::EdgeMut;
use super::node::NodeMut;
use super::registry::{IdGenerator, UuidGenerator};
use super::types::{GraphId, GraphKind};
use std::fmt;
use std::rc::Rc;

/// Callback applied exactly once to every newly created node
///
/// The callback gets the view by `&mut`, so it edits attributes through
/// [`NodeMut::attributes_mut`] rather than the consuming fluent setters.
pub type NodeInitializer = Rc<dyn Fn(&mut NodeMut<'_>)>;

/// Callback applied exactly once to every newly created edge
///
/// Use [`EdgeMut::set_style`] or [`EdgeMut::attributes_mut`]; the consuming
/// shorthands such as `dashed()` need the view by value.
pub type EdgeInitializer = Rc<dyn Fn(&mut EdgeMut<'_>)>;

#[derive(Clone, Default)]
pub(crate) enum ParentOption {
    #[default]
    Unset,
    Set(GraphId),
    Removed,
}

#[derive(Clone, Default)]
pub(crate) enum GeneratorOption {
    #[default]
    Default,
    Custom(Rc<dyn IdGenerator>),
    Removed,
}

/// Named construction options
///
/// ```rust
/// use dotgraph::{Graph, GraphKind, GraphOptions};
///
/// let options = GraphOptions::new()
///     .id("deps")
///     .kind(GraphKind::Undirected)
///     .strict();
/// let graph = Graph::new(options).unwrap();
/// assert_eq!(graph.to_string(), "strict graph \"deps\" {}");
/// ```
#[derive(Clone, Default)]
pub struct GraphOptions {
    pub(crate) id: String,
    pub(crate) kind: Option<GraphKind>,
    pub(crate) strict: bool,
    pub(crate) cluster: bool,
    pub(crate) parent: ParentOption,
    pub(crate) generator: GeneratorOption,
    pub(crate) node_initializer: Option<NodeInitializer>,
    pub(crate) edge_initializer: Option<EdgeInitializer>,
}

impl GraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the graph; `"-"` requests a generated one
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn kind(mut self, kind: GraphKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Emit `strict` in front of the root keyword
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Mark a subgraph as a cluster
    pub fn cluster(mut self) -> Self {
        self.cluster = true;
        self
    }

    /// Attach a subgraph to an explicit parent, which must be the level
    /// creating it
    pub fn parent(mut self, parent: GraphId) -> Self {
        self.parent = ParentOption::Set(parent);
        self
    }

    /// Request a subgraph without a parent; always rejected
    pub fn without_parent(mut self) -> Self {
        self.parent = ParentOption::Removed;
        self
    }

    pub fn generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.generator = GeneratorOption::Custom(Rc::new(generator));
        self
    }

    /// Remove the identifier generator; always rejected
    pub fn without_generator(mut self) -> Self {
        self.generator = GeneratorOption::Removed;
        self
    }

    pub fn node_initializer(mut self, init: impl Fn(&mut NodeMut<'_>) + 'static) -> Self {
        self.node_initializer = Some(Rc::new(init));
        self
    }

    pub fn edge_initializer(mut self, init: impl Fn(&mut EdgeMut<'_>) + 'static) -> Self {
        self.edge_initializer = Some(Rc::new(init));
        self
    }

    pub(crate) fn resolved_generator(&self) -> Option<Rc<dyn IdGenerator>> {
        match &self.generator {
            GeneratorOption::Default => Some(Rc::new(UuidGenerator)),
            GeneratorOption::Custom(generator) => Some(Rc::clone(generator)),
            GeneratorOption::Removed => None,
        }
    }
}

impl fmt::Debug for GraphOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = match self.parent {
            ParentOption::Unset => "unset".to_string(),
            ParentOption::Set(id) => id.to_string(),
            ParentOption::Removed => "removed".to_string(),
        };
        let generator = match self.generator {
            GeneratorOption::Default => "uuid",
            GeneratorOption::Custom(_) => "custom",
            GeneratorOption::Removed => "removed",
        };
        f.debug_struct("GraphOptions")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("strict", &self.strict)
            .field("cluster", &self.cluster)
            .field("parent", &parent)
            .field("generator", &generator)
            .field("node_initializer", &self.node_initializer.is_some())
            .field("edge_initializer", &self.edge_initializer.is_some())
            .finish()
    }
}

/// Root-level configuration shared by the whole tree
#[derive(Clone)]
pub(crate) struct RootConfig {
    pub kind: GraphKind,
    pub strict: bool,
    pub node_initializer: Option<NodeInitializer>,
    pub edge_initializer: Option<EdgeInitializer>,
}

impl fmt::Debug for RootConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootConfig")
            .field("kind", &self.kind)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
