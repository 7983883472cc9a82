//! `marklet stream` command implementation.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Args;
use marklet::StreamingParser;
use marklet_config::{CliSettings, Config};

use super::open_input;
use super::render::{STANDALONE_FOOTER, standalone_header};
use crate::error::CliError;

/// Arguments for the stream command.
#[derive(Args)]
pub(crate) struct StreamArgs {
    /// Markdown file to stream (default: stdin).
    input: Option<PathBuf>,

    /// Bytes read per chunk (overrides config).
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Open links in a new tab with rel="noopener noreferrer".
    #[arg(long)]
    safe_links: bool,

    /// Wrap the output in a complete HTML document.
    #[arg(long)]
    standalone: bool,

    /// Document title for standalone output (overrides config).
    #[arg(long)]
    title: Option<String>,

    /// Path to configuration file (default: auto-discover marklet.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl StreamArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            safe_links: self.safe_links.then_some(true),
            chunk_size: self.chunk_size,
            standalone: self.standalone.then_some(true),
            title: self.title,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let reader = open_input(self.input.as_deref())?;
        let mut parser = StreamingParser::new().with_safe_links(config.render.safe_links);
        let mut stdout = io::stdout().lock();

        let chunk_size = config.stream.chunk_size;
        let chunks = if config.output.standalone {
            stream_standalone(
                reader,
                &mut stdout,
                &mut parser,
                chunk_size,
                &config.output.title,
            )?
        } else {
            stream_document(reader, &mut stdout, &mut parser, chunk_size)?
        };
        tracing::info!(chunks, chunk_size, "Stream finished");
        Ok(())
    }
}

/// Feed `reader` through `parser` chunk by chunk, writing each fragment as
/// soon as it is produced. Returns the number of chunks read.
pub(crate) fn stream_document<R: Read, W: Write>(
    mut reader: R,
    writer: &mut W,
    parser: &mut StreamingParser,
    chunk_size: usize,
) -> io::Result<usize> {
    let mut buf = vec![0u8; chunk_size];
    let mut decoder = Utf8Decoder::default();
    let mut chunks = 0;

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        chunks += 1;
        let text = decoder.decode(&buf[..read]);
        write_fragment(writer, &parser.parse_chunk(&text))?;
    }

    let tail = decoder.finish();
    if !tail.is_empty() {
        write_fragment(writer, &parser.parse_chunk(&tail))?;
    }
    write_fragment(writer, &parser.finalize())?;
    Ok(chunks)
}

/// Like [`stream_document`], but inside a standalone HTML document. The header
/// is written before the first chunk is read and the footer after `finalize`.
pub(crate) fn stream_standalone<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    parser: &mut StreamingParser,
    chunk_size: usize,
    title: &str,
) -> io::Result<usize> {
    write_fragment(writer, &standalone_header(title))?;
    let chunks = stream_document(reader, writer, parser, chunk_size)?;
    write_fragment(writer, STANDALONE_FOOTER)?;
    Ok(chunks)
}

fn write_fragment<W: Write>(writer: &mut W, fragment: &str) -> io::Result<()> {
    if fragment.is_empty() {
        return Ok(());
    }
    writer.write_all(fragment.as_bytes())?;
    writer.flush()
}

/// Incremental UTF-8 decoder.
///
/// A multi-byte sequence split across chunks is held back until the rest
/// arrives. Invalid bytes decode to U+FFFD.
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut text = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    let Some(invalid_len) = e.error_len() else {
                        // Incomplete sequence at the end; wait for more bytes.
                        rest = after;
                        break;
                    };
                    text.push(char::REPLACEMENT_CHARACTER);
                    rest = &after[invalid_len..];
                }
            }
        }

        let consumed = self.pending.len() - rest.len();
        self.pending.drain(..consumed);
        text
    }

    /// Decode whatever is still pending at end of input.
    fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn stream_bytes(input: &[u8], chunk_size: usize) -> String {
        let mut out = Vec::new();
        let mut parser = StreamingParser::new();
        stream_document(input, &mut out, &mut parser, chunk_size).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_decoder_joins_split_sequence() {
        let bytes = "é".as_bytes();
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.decode(&bytes[1..]), "é");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{fffd}b");
    }

    #[test]
    fn test_decoder_incomplete_sequence_at_end() {
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(b"ok\xe2\x82"), "ok");
        assert_eq!(decoder.finish(), "\u{fffd}");
    }

    #[test]
    fn test_stream_document_single_byte_chunks() {
        let markdown = "# Café\n\n```\nx < y\n```\nnaïve **text**";
        assert_eq!(
            stream_bytes(markdown.as_bytes(), 1),
            "<h1>Café</h1>\n<pre><code>x &lt; y</code></pre>\n<p>naïve <strong>text</strong></p>\n"
        );
    }

    #[test]
    fn test_stream_document_matches_any_chunk_size() {
        let markdown = "## Über\nline one\nline two\n";
        let expected = stream_bytes(markdown.as_bytes(), 4096);
        for size in [1, 2, 3, 5, 8] {
            assert_eq!(stream_bytes(markdown.as_bytes(), size), expected);
        }
    }

    #[test]
    fn test_stream_document_closes_open_fence() {
        assert_eq!(
            stream_bytes(b"```rust\nfn f() {}", 3),
            "<pre><code class=\"language-rust\">fn f() {}</code></pre>\n"
        );
    }

    #[test]
    fn test_stream_document_counts_chunks() {
        let mut out = Vec::new();
        let mut parser = StreamingParser::new();
        let chunks = stream_document(&b"abcdef"[..], &mut out, &mut parser, 4).unwrap();
        assert_eq!(chunks, 2);
        assert_eq!(out, b"<p>abcdef</p>\n");
    }

    #[test]
    fn test_stream_standalone_wraps_fragments() {
        let markdown = "# Title\n```\na < b\n```\ntext";
        let mut out = Vec::new();
        let mut parser = StreamingParser::new();
        stream_standalone(markdown.as_bytes(), &mut out, &mut parser, 3, "Notes").unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            crate::commands::render::standalone_document(
                "Notes",
                &stream_bytes(markdown.as_bytes(), 3)
            )
        );
    }

    #[test]
    fn test_stream_standalone_empty_input() {
        let mut out = Vec::new();
        let mut parser = StreamingParser::new();
        stream_standalone(&b""[..], &mut out, &mut parser, 8, "T").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
             <title>T</title>\n</head>\n<body>\n</body>\n</html>\n"
        );
    }

    #[test]
    fn test_stream_document_empty_input() {
        assert_eq!(stream_bytes(b"", 8), "");
    }
}
