//! Identity registry
//!
//! The root graph owns a single registry that maps identifiers to node and
//! subgraph handles. All uniqueness decisions go through it, whatever the
//! nesting depth of the caller.

use super::store::{GraphError, GraphResult};
use super::types::{GraphId, NodeId};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Identifier that requests a freshly generated one
pub const RANDOM_ID: &str = "-";

/// Prefix that marks a subgraph as a cluster
pub const CLUSTER_PREFIX: &str = "cluster_";

/// Source of fresh identifier strings
pub trait IdGenerator {
    fn generate(&self) -> String;
}

impl<F: Fn() -> String> IdGenerator for F {
    fn generate(&self) -> String {
        self()
    }
}

/// Default generator producing hyphen-less v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Outcome of a node lookup-or-reserve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeResolution {
    /// The identifier is already bound to this node
    Existing(NodeId),
    /// No node exists yet; it must be created under this identifier
    Vacant(String),
}

/// Root-held identifier maps
pub struct IdentityRegistry {
    generator: Rc<dyn IdGenerator>,
    nodes: IndexMap<String, NodeId>,
    subgraphs: IndexMap<String, GraphId>,
}

impl IdentityRegistry {
    pub fn new(generator: Rc<dyn IdGenerator>) -> Self {
        IdentityRegistry {
            generator,
            nodes: IndexMap::new(),
            subgraphs: IndexMap::new(),
        }
    }

    /// Generate an identifier that `taken` does not reject
    ///
    /// Collisions are resolved with a numeric suffix so a custom generator
    /// with a small range still yields a usable name.
    pub fn fresh_id(&self, taken: impl Fn(&str) -> bool) -> String {
        let base = self.generator.generate();
        if !taken(&base) {
            debug!("Generated identifier {}", base);
            return base;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !taken(&candidate) {
                debug!("Generated identifier {} after {} collisions", candidate, n);
                return candidate;
            }
            n += 1;
        }
    }

    /// Look up a node identifier, reserving a generated one when requested
    ///
    /// Both the random sentinel and the empty identifier produce a fresh name.
    pub fn resolve_node(&self, requested: &str) -> NodeResolution {
        if requested.is_empty() || requested == RANDOM_ID {
            return NodeResolution::Vacant(self.fresh_id(|id| self.nodes.contains_key(id)));
        }
        match self.nodes.get(requested) {
            Some(&id) => NodeResolution::Existing(id),
            None => NodeResolution::Vacant(requested.to_string()),
        }
    }

    pub fn register_node(&mut self, name: String, id: NodeId) {
        self.nodes.insert(name, id);
    }

    /// Compute the canonical identifier of a subgraph without registering it
    ///
    /// A requested `cluster_` prefix is always stripped first; it is
    /// reattached only for clusters. Anonymous clusters get a generated name.
    pub fn canonical_subgraph_id(&self, requested: &str, cluster: bool) -> String {
        let raw = requested.strip_prefix(CLUSTER_PREFIX).unwrap_or(requested);
        let needs_fresh = raw == RANDOM_ID || (cluster && raw.is_empty());
        let prefix = if cluster { CLUSTER_PREFIX } else { "" };

        if needs_fresh {
            let fresh = self.fresh_id(|id| {
                self.subgraphs.contains_key(format!("{}{}", prefix, id).as_str())
            });
            format!("{}{}", prefix, fresh)
        } else if raw.is_empty() {
            String::new()
        } else {
            format!("{}{}", prefix, raw)
        }
    }

    /// Canonicalize and register a subgraph identifier
    ///
    /// Anonymous subgraphs are not registered and never collide.
    pub fn resolve_subgraph(
        &mut self,
        requested: &str,
        cluster: bool,
        id: GraphId,
    ) -> GraphResult<String> {
        let name = self.canonical_subgraph_id(requested, cluster);
        if name.is_empty() {
            return Ok(name);
        }
        if self.subgraphs.contains_key(&name) {
            return Err(GraphError::DuplicateSubgraph(name));
        }
        self.subgraphs.insert(name.clone(), id);
        Ok(name)
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.get(name).copied()
    }

    pub fn find_subgraph(&self, name: &str) -> Option<GraphId> {
        self.subgraphs.get(name).copied()
    }
}

impl fmt::Debug for IdentityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRegistry")
            .field("nodes", &self.nodes)
            .field("subgraphs", &self.subgraphs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_registry() -> IdentityRegistry {
        let counter = Cell::new(0u32);
        IdentityRegistry::new(Rc::new(move || {
            counter.set(counter.get() + 1);
            format!("gen{}", counter.get())
        }))
    }

    #[test]
    fn test_uuid_generator() {
        let a = UuidGenerator.generate();
        let b = UuidGenerator.generate();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_node() {
        let mut registry = counting_registry();
        assert_eq!(
            registry.resolve_node("A"),
            NodeResolution::Vacant("A".to_string())
        );
        registry.register_node("A".to_string(), NodeId(0));
        assert_eq!(registry.resolve_node("A"), NodeResolution::Existing(NodeId(0)));
        assert_eq!(registry.find_node("A"), Some(NodeId(0)));
        assert_eq!(registry.find_node("B"), None);
    }

    #[test]
    fn test_random_node_ids() {
        let registry = counting_registry();
        assert_eq!(
            registry.resolve_node(RANDOM_ID),
            NodeResolution::Vacant("gen1".to_string())
        );
        assert_eq!(
            registry.resolve_node(""),
            NodeResolution::Vacant("gen2".to_string())
        );
    }

    #[test]
    fn test_fresh_id_avoids_collisions() {
        let mut registry = IdentityRegistry::new(Rc::new(|| "same".to_string()));
        registry.register_node("same".to_string(), NodeId(0));
        registry.register_node("same-1".to_string(), NodeId(1));
        assert_eq!(
            registry.resolve_node(RANDOM_ID),
            NodeResolution::Vacant("same-2".to_string())
        );
    }

    #[test]
    fn test_cluster_prefix_handling() {
        let registry = counting_registry();
        assert_eq!(registry.canonical_subgraph_id("s1", true), "cluster_s1");
        assert_eq!(registry.canonical_subgraph_id("cluster_s1", true), "cluster_s1");
        assert_eq!(registry.canonical_subgraph_id("cluster_test-sub", false), "test-sub");
        assert_eq!(registry.canonical_subgraph_id("", false), "");
        assert_eq!(registry.canonical_subgraph_id(RANDOM_ID, true), "cluster_gen1");
        assert_eq!(registry.canonical_subgraph_id("", true), "cluster_gen2");
    }

    #[test]
    fn test_duplicate_subgraph() {
        let mut registry = counting_registry();
        registry.resolve_subgraph("one", false, GraphId(1)).unwrap();
        let err = registry.resolve_subgraph("one", false, GraphId(2)).unwrap_err();
        assert_eq!(err, GraphError::DuplicateSubgraph("one".to_string()));

        // a cluster named "one" is a different identifier
        let name = registry.resolve_subgraph("one", true, GraphId(3)).unwrap();
        assert_eq!(name, "cluster_one");
        assert_eq!(registry.find_subgraph("cluster_one"), Some(GraphId(3)));
        assert_eq!(registry.find_subgraph("one"), Some(GraphId(1)));
    }

    #[test]
    fn test_anonymous_subgraphs_never_collide() {
        let mut registry = counting_registry();
        assert_eq!(registry.resolve_subgraph("", false, GraphId(1)).unwrap(), "");
        assert_eq!(registry.resolve_subgraph("", false, GraphId(2)).unwrap(), "");
        assert!(registry.subgraphs.is_empty());
    }
}
