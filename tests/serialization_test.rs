use dotgraph::{keys, AttributeValue, Graph, GraphKind, GraphOptions, WriteError};
use std::error::Error as _;
use std::io::{self, Write};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Sink accepting at most `limit` bytes, then failing
struct LimitedWriter {
    buf: Vec<u8>,
    limit: usize,
}

impl LimitedWriter {
    fn new(limit: usize) -> Self {
        LimitedWriter {
            buf: Vec::new(),
            limit,
        }
    }
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.buf.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "limit reached"));
        }
        let n = room.min(buf.len());
        self.buf.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn sample_graph() -> Graph {
    let mut graph = Graph::new(GraphOptions::new().id("sample").strict()).unwrap();
    graph.set_attribute(keys::RANK_DIR, AttributeValue::raw("LR"));

    let cluster = graph.subgraph(GraphOptions::new().id("core").cluster()).unwrap();
    let mut scope = graph.scope(cluster).unwrap();
    scope.set_attribute(keys::LABEL, AttributeValue::markup("<B>core</B>"));
    let parser = scope.node("parser").into_id();
    let lexer = scope.node("lexer").into_id();
    scope.add_to_same_rank("front", &[parser, lexer]);
    scope.edge(parser, lexer).dotted();

    let cli = graph.node("cli").set_attribute(keys::SHAPE, "box").into_id();
    graph.edge(cli, parser).set_attribute(keys::LABEL, "uses \"parse\"");
    graph.add_to_same_rank("entry", &[cli]);
    graph
}

#[test]
fn test_sample_text() {
    init_tracing();
    let graph = sample_graph();
    assert_eq!(
        graph.to_string(),
        concat!(
            "strict digraph \"sample\" {graph [rankdir=LR];",
            "subgraph \"cluster_core\" {graph [label=<<B>core</B>>];\"lexer\";\"parser\";",
            "{rank=same;\"parser\";\"lexer\";}",
            "\"parser\"->\"lexer\"[style=\"dotted\"];}",
            "\"cli\"[shape=\"box\"];",
            "{rank=same;\"cli\";}",
            "\"cli\"->\"parser\"[label=\"uses \\\"parse\\\"\"];",
            "}"
        )
    );
}

#[test]
fn test_full_write_returns_length() {
    init_tracing();
    let graph = sample_graph();
    let expected = graph.to_string();

    let mut buf = Vec::new();
    let written = graph.write_to(&mut buf).unwrap();
    assert_eq!(written, expected.len() as u64);
    assert_eq!(buf, expected.as_bytes());
}

#[test]
fn test_every_truncation_point() {
    init_tracing();
    let graph = sample_graph();
    let expected = graph.to_string();
    let len = expected.len();

    for limit in 0..len {
        let mut sink = LimitedWriter::new(limit);
        let err = graph.write_to(&mut sink).unwrap_err();
        assert_eq!(err.written(), limit as u64, "limit {}", limit);
        assert_eq!(sink.buf, &expected.as_bytes()[..limit], "limit {}", limit);
    }

    let mut sink = LimitedWriter::new(len);
    assert_eq!(graph.write_to(&mut sink).unwrap(), len as u64);
    assert_eq!(sink.buf, expected.as_bytes());
}

#[test]
fn test_sink_error_is_preserved() {
    init_tracing();
    let graph = Graph::new(GraphOptions::new()).unwrap();
    let mut sink = LimitedWriter::new(0);

    match graph.write_to(&mut sink) {
        Err(WriteError::Sink { written, source }) => {
            assert_eq!(written, 0);
            assert_eq!(source.kind(), io::ErrorKind::WriteZero);
            assert_eq!(source.to_string(), "limit reached");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_short_write_reports_counts() {
    init_tracing();
    let graph = Graph::new(GraphOptions::new().kind(GraphKind::Undirected)).unwrap();
    let mut sink = LimitedWriter::new(3);

    let err = graph.write_to(&mut sink).unwrap_err();
    assert!(err.source().is_none());
    match err {
        WriteError::ShortWrite {
            written,
            requested,
            accepted,
        } => {
            assert_eq!(written, 3);
            assert_eq!(requested, "graph".len());
            assert_eq!(accepted, 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(sink.buf, b"gra");
}

#[test]
fn test_graph_reusable_after_failure() {
    init_tracing();
    let graph = sample_graph();
    let mut sink = LimitedWriter::new(10);
    assert!(graph.write_to(&mut sink).is_err());

    let mut buf = Vec::new();
    graph.write_to(&mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), graph.to_string());
}
