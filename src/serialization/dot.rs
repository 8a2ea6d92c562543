//! Tree walk producing the canonical DOT text
//!
//! Body order of every level: graph attributes, child subgraphs in creation
//! order, local nodes by identifier, rank groups, edges in creation order.

use super::{quote, CountingSink, WriteResult};
use crate::graph::{Graph, GraphId, GraphLevel};
use std::fmt;
use std::io::Write;
use tracing::trace;

/// Serializer bound to one graph and one sink
pub struct DotWriter<'a, 'w, W: Write + ?Sized> {
    graph: &'a Graph,
    sink: CountingSink<'w, W>,
}

impl<'a, 'w, W: Write + ?Sized> DotWriter<'a, 'w, W> {
    pub fn new(graph: &'a Graph, sink: &'w mut W) -> Self {
        DotWriter {
            graph,
            sink: CountingSink::new(sink),
        }
    }

    /// Write the whole tree, returning the number of bytes accepted
    pub fn write(mut self) -> WriteResult<u64> {
        let graph = self.graph;
        trace!("Serializing graph \"{}\"", graph.name());
        self.visit(graph.root())?;
        trace!("Serialized {} bytes", self.sink.written());
        Ok(self.sink.written())
    }

    fn visit(&mut self, level: &'a GraphLevel) -> WriteResult<()> {
        let graph = self.graph;
        if level.id() == GraphId::ROOT {
            if graph.is_strict() {
                self.sink.emit("strict ")?;
            }
            self.sink.emit(graph.kind().keyword())?;
        } else {
            self.sink.emit("subgraph")?;
        }
        if !level.name().is_empty() {
            self.sink.emit(" ")?;
            self.sink.emit(&quote(level.name()))?;
        }
        self.sink.emit(" {")?;

        if !level.attributes().is_empty() {
            self.sink.emit("graph ")?;
            self.sink.emit(&level.attributes().to_string())?;
            self.sink.emit(";")?;
        }

        for &child in level.children() {
            if let Some(child) = graph.get_subgraph(child) {
                self.visit(child)?;
            }
        }

        for id in level.nodes() {
            if let Some(node) = graph.get_node(id) {
                self.sink.emit(&quote(node.name()))?;
                self.sink.emit(&node.attributes().to_string())?;
                self.sink.emit(";")?;
            }
        }

        for group in level.rank_groups() {
            self.sink.emit("{")?;
            self.sink.emit("rank=same;")?;
            for &id in group.nodes() {
                if let Some(node) = graph.get_node(id) {
                    self.sink.emit(&quote(node.name()))?;
                    self.sink.emit(";")?;
                }
            }
            self.sink.emit("}")?;
        }

        let connector = graph.kind().connector();
        for &id in level.edges() {
            let Some(edge) = graph.get_edge(id) else {
                continue;
            };
            let (Some(from), Some(to)) = (graph.get_node(edge.from()), graph.get_node(edge.to())) else {
                continue;
            };
            self.sink.emit(&quote(from.name()))?;
            self.sink.emit(connector)?;
            self.sink.emit(&quote(to.name()))?;
            self.sink.emit(&edge.attributes().to_string())?;
            self.sink.emit(";")?;
        }

        self.sink.emit("}")
    }
}

impl Graph {
    /// Serialize the tree to `sink`
    ///
    /// On success the returned count equals the length of the text. On
    /// failure the error carries the exact number of bytes the sink accepted,
    /// and nothing more is written after the failing call.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> WriteResult<u64> {
        DotWriter::new(self, sink).write()
    }
}

/// Canonical DOT text
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write_to(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{keys, AttributeValue, Attributes, Graph, GraphKind, GraphOptions};

    #[test]
    fn test_empty_graphs() {
        let graph = Graph::new(GraphOptions::new()).unwrap();
        assert_eq!(graph.to_string(), "digraph {}");

        let graph = Graph::new(GraphOptions::new().kind(GraphKind::Undirected)).unwrap();
        assert_eq!(graph.to_string(), "graph {}");

        let graph = Graph::new(GraphOptions::new().id("G").strict()).unwrap();
        assert_eq!(graph.to_string(), "strict digraph \"G\" {}");
    }

    #[test]
    fn test_nodes_and_edges() {
        let mut graph = Graph::new(GraphOptions::new()).unwrap();
        let b = graph.node("B").into_id();
        graph.node("A").edge(b);
        assert_eq!(graph.to_string(), "digraph {\"A\";\"B\";\"A\"->\"B\";}");
    }

    #[test]
    fn test_undirected_connector() {
        let mut graph = Graph::new(GraphOptions::new().kind(GraphKind::Undirected)).unwrap();
        let sub = graph.subgraph(GraphOptions::new()).unwrap();
        let a = graph.node("A").into_id();
        let b = graph.node("B").into_id();
        graph.scope(sub).unwrap().edge(a, b);
        assert_eq!(graph.to_string(), "graph {subgraph {\"A\"--\"B\";}\"A\";\"B\";}");
    }

    #[test]
    fn test_attribute_blocks() {
        let mut graph = Graph::new(GraphOptions::new().id("G")).unwrap();
        graph.set_attribute(keys::RANK_DIR, AttributeValue::raw("LR"));
        let b = graph.node("B").into_id();
        graph
            .node("A")
            .set_attribute(keys::SHAPE, "box")
            .edge_with_attributes(b, Attributes::new().with(keys::LABEL, "a \"b\""));

        assert_eq!(
            graph.to_string(),
            "digraph \"G\" {graph [rankdir=LR];\"A\"[shape=\"box\"];\"B\";\"A\"->\"B\"[label=\"a \\\"b\\\"\"];}"
        );
    }

    #[test]
    fn test_escaped_identifiers() {
        let mut graph = Graph::new(GraphOptions::new()).unwrap();
        graph.node("say \"hi\"");
        assert_eq!(graph.to_string(), "digraph {\"say \\\"hi\\\"\";}");
    }

    #[test]
    fn test_write_to_counts_bytes() {
        let mut graph = Graph::new(GraphOptions::new()).unwrap();
        graph.node("A");
        let mut buf = Vec::new();
        let written = graph.write_to(&mut buf).unwrap();
        assert_eq!(written, buf.len() as u64);
        assert_eq!(buf, b"digraph {\"A\";}");
    }
}
