//! Incremental rendering for input that arrives in chunks.
//!
//! Without lookahead only a reduced grammar is available: each complete line
//! is classified on its own as a code fence, a heading or a paragraph. Lists,
//! tables, blockquotes, rules and standalone images or links are not grouped
//! and render as paragraphs. An unterminated code fence is closed by
//! [`StreamingParser::finalize`] instead of degrading to paragraphs.
//!
//! For input made only of headings, code fences and plain paragraphs the
//! concatenated output matches [`MarkdownRenderer::render`](crate::MarkdownRenderer::render).

use crate::escape::escape_html;
use crate::fence::{FenceEvent, FenceTracker};
use crate::html;
use crate::inline::InlineTransformer;
use crate::scanner::parse_heading;

/// Line-at-a-time markdown renderer.
///
/// State covers one document. Call [`finalize`](Self::finalize) once at end of
/// input; it also resets the parser for reuse.
///
/// # Example
///
/// ```
/// use marklet::StreamingParser;
///
/// let mut parser = StreamingParser::new();
/// let mut html = parser.parse_chunk("# Ti");
/// html.push_str(&parser.parse_chunk("tle\nbody"));
/// html.push_str(&parser.finalize());
/// assert_eq!(html, "<h1>Title</h1>\n<p>body</p>\n");
/// ```
#[derive(Debug)]
pub struct StreamingParser {
    /// Trailing partial line from the previous chunk.
    buffer: String,
    fence: FenceTracker,
    /// Whether the open code block has emitted a line yet.
    code_started: bool,
    inline: InlineTransformer,
}

impl StreamingParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_inline(InlineTransformer::new())
    }

    /// Enable link-safety mode for links in paragraphs.
    #[must_use]
    pub fn with_safe_links(mut self, enabled: bool) -> Self {
        self.inline = self.inline.with_safe_links(enabled);
        self
    }

    pub(crate) fn with_inline(inline: InlineTransformer) -> Self {
        Self {
            buffer: String::new(),
            fence: FenceTracker::new(),
            code_started: false,
            inline,
        }
    }

    /// Whether the last complete line left a code fence open.
    pub fn in_code_block(&self) -> bool {
        self.fence.in_fence()
    }

    /// Feed the next chunk and return the HTML for every line it completed.
    ///
    /// The incomplete tail is kept until a later chunk supplies its newline or
    /// [`finalize`](Self::finalize) flushes it.
    pub fn parse_chunk(&mut self, chunk: &str) -> String {
        self.buffer.push_str(chunk);
        let Some(last_newline) = self.buffer.rfind('\n') else {
            return String::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        let mut out = String::new();
        for line in complete.split_terminator('\n') {
            self.render_line(line.strip_suffix('\r').unwrap_or(line), &mut out);
        }
        out
    }

    /// Flush the buffered partial line, close an open code block and reset.
    pub fn finalize(&mut self) -> String {
        let mut out = String::new();
        let tail = std::mem::take(&mut self.buffer);
        if !tail.is_empty() {
            self.render_line(tail.strip_suffix('\r').unwrap_or(&tail), &mut out);
        }
        if self.fence.in_fence() {
            tracing::debug!("Closing unterminated code fence at end of stream");
            html::code_block_close(&mut out);
            out.push('\n');
        }
        self.reset();
        out
    }

    /// Drop all carried state. Inline options are kept.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.fence.reset();
        self.code_started = false;
    }

    fn render_line(&mut self, line: &str, out: &mut String) {
        match self.fence.update(line) {
            FenceEvent::Open(language) => {
                html::code_block_open(language.as_deref(), out);
                self.code_started = false;
            }
            FenceEvent::Close => {
                html::code_block_close(out);
                out.push('\n');
            }
            FenceEvent::None if self.fence.in_fence() => {
                if self.code_started {
                    out.push('\n');
                }
                out.push_str(&escape_html(line));
                self.code_started = true;
            }
            FenceEvent::None => {
                if line.trim().is_empty() {
                    return;
                }
                if let Some((level, text)) = parse_heading(line) {
                    html::heading(level, text, out);
                } else {
                    out.push_str(&self.inline.paragraph(line.trim()));
                }
                out.push('\n');
            }
        }
    }
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}
