//! DOT serialization
//!
//! Implements the textual output of a graph tree:
//! - escaping of quoted identifiers and values
//! - a byte-counting sink wrapper that stops on the first short or failed write
//! - the tree walk producing the canonical text (see [`dot`])

pub mod dot;

use std::borrow::Cow;
use std::fmt::Write as _;
use std::io::{self, Write};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while writing to a sink
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Sink failed after {written} bytes: {source}")]
    Sink {
        written: u64,
        #[source]
        source: io::Error,
    },

    #[error("Sink accepted {accepted} of {requested} bytes after {written} bytes")]
    ShortWrite {
        written: u64,
        requested: usize,
        accepted: usize,
    },
}

impl WriteError {
    /// Total bytes the sink accepted before serialization stopped
    pub fn written(&self) -> u64 {
        match self {
            WriteError::Sink { written, .. } | WriteError::ShortWrite { written, .. } => *written,
        }
    }
}

pub type WriteResult<T> = Result<T, WriteError>;

/// Escape text for use between double quotes
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Render `text` as a double-quoted, escaped token
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

/// Render an attribute key, quoting it unless it is a plain DOT identifier
///
/// Plain identifiers start with a letter, `_` or a non-ASCII character and
/// continue with those or digits.
pub fn key(text: &str) -> Cow<'_, str> {
    let mut chars = text.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || !first.is_ascii())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii())
        }
        None => false,
    };
    if plain {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(quote(text))
    }
}

/// Sink wrapper tracking the exact number of accepted bytes
///
/// Each token is handed to the sink in full. Interrupted writes are retried;
/// any other error or a short write ends the session and is reported with the
/// byte count accepted so far.
pub struct CountingSink<'w, W: Write + ?Sized> {
    inner: &'w mut W,
    written: u64,
}

impl<'w, W: Write + ?Sized> CountingSink<'w, W> {
    pub fn new(inner: &'w mut W) -> Self {
        CountingSink { inner, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn emit(&mut self, token: &str) -> WriteResult<()> {
        let bytes = token.as_bytes();
        if bytes.is_empty() {
            return Ok(());
        }
        loop {
            match self.inner.write(bytes) {
                Ok(n) => {
                    self.written += n as u64;
                    if n < bytes.len() {
                        warn!("Sink accepted {} of {} bytes", n, bytes.len());
                        return Err(WriteError::ShortWrite {
                            written: self.written,
                            requested: bytes.len(),
                            accepted: n,
                        });
                    }
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("Sink failed after {} bytes: {}", self.written, e);
                    return Err(WriteError::Sink {
                        written: self.written,
                        source: e,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct InterruptOnce {
        interrupted: bool,
        buf: Vec<u8>,
    }

    impl Write for InterruptOnce {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.buf.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape("a\\b"), "a\\\\b");
        assert_eq!(escape("line\nnext\ttab\r"), "line\\nnext\\ttab\\r");
        assert_eq!(escape("bell\u{7}"), "bell\\x07");
        assert_eq!(escape("ünïcode"), "ünïcode");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("A"), "\"A\"");
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn test_key() {
        assert_eq!(key("label"), "label");
        assert_eq!(key("_z9"), "_z9");
        assert_eq!(key("größe"), "größe");
        assert_eq!(key("my key\""), "\"my key\\\"\"");
        assert_eq!(key("9lives"), "\"9lives\"");
        assert_eq!(key(""), "\"\"");
    }

    #[test]
    fn test_counting_sink() {
        let mut buf = Vec::new();
        let mut sink = CountingSink::new(&mut buf);
        sink.emit("digraph").unwrap();
        sink.emit("").unwrap();
        sink.emit(" {").unwrap();
        assert_eq!(sink.written(), 9);
        assert_eq!(buf, b"digraph {");
    }

    #[test]
    fn test_sink_error_keeps_source() {
        let mut writer = FailingWriter;
        let mut sink = CountingSink::new(&mut writer);
        let err = sink.emit("x").unwrap_err();

        assert_eq!(err.written(), 0);
        let source = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_short_write() {
        let mut storage = [0u8; 3];
        let mut writer: &mut [u8] = &mut storage;
        let mut sink = CountingSink::new(&mut writer);
        sink.emit("ab").unwrap();

        let err = sink.emit("cde").unwrap_err();
        assert_eq!(err.written(), 3);
        assert!(matches!(
            err,
            WriteError::ShortWrite {
                requested: 3,
                accepted: 1,
                ..
            }
        ));
        assert_eq!(&storage, b"abc");
    }

    #[test]
    fn test_interrupted_is_retried() {
        let mut writer = InterruptOnce {
            interrupted: false,
            buf: Vec::new(),
        };
        let mut sink = CountingSink::new(&mut writer);
        sink.emit("graph").unwrap();
        assert_eq!(sink.written(), 5);
        assert_eq!(writer.buf, b"graph");
    }
}
