//! Line-oriented markdown to HTML rendering.
//!
//! The [`scan`] function splits a document into block [`Token`]s using a fixed
//! precedence of detectors. [`MarkdownRenderer`] turns tokens into HTML, giving
//! registered [`Plugin`]s the first chance at each token before the built-in
//! templates run. [`StreamingParser`] renders input that arrives in chunks with
//! a reduced, per-line grammar.
//!
//! Rendering is total: every input string produces HTML. Malformed structures
//! degrade to paragraphs instead of failing.
//!
//! # Example
//!
//! ```
//! use marklet::{MarkdownRenderer, Plugin, Token};
//!
//! struct Anchors;
//!
//! impl Plugin for Anchors {
//!     fn try_render(&self, token: &Token) -> Option<String> {
//!         let Token::Heading { level, text } = token else {
//!             return None;
//!         };
//!         let id = text.to_lowercase().replace(' ', "-");
//!         Some(format!("<h{level} id=\"{id}\">{text}</h{level}>\n"))
//!     }
//! }
//!
//! let renderer = MarkdownRenderer::new().with_plugin(Anchors);
//! assert_eq!(
//!     renderer.render("## Getting Started\n\n- one\n- two"),
//!     "<h2 id=\"getting-started\">Getting Started</h2>\n<ul><li>one</li><li>two</li></ul>\n"
//! );
//! ```
//!
//! # Features
//!
//! - `syntect`: [`SyntectHighlighter`] and class-based highlighting for fenced
//!   code blocks.
//! - `serde`: `Serialize` for [`Token`].

mod escape;
mod fence;
mod highlight;
mod html;
mod inline;
mod plugin;
mod renderer;
mod scanner;
mod streaming;
mod token;

pub use escape::escape_html;
#[cfg(feature = "syntect")]
pub use highlight::SyntectHighlighter;
pub use highlight::{Highlighted, Highlighter, PlainHighlighter, SyntaxHighlightPlugin};
pub use inline::InlineTransformer;
pub use plugin::{Plugin, PluginPipeline};
pub use renderer::MarkdownRenderer;
pub use scanner::scan;
pub use streaming::StreamingParser;
pub use token::Token;

/// Render a document with a default [`MarkdownRenderer`].
///
/// ```
/// assert_eq!(marklet::render("Hello *world*"), "<p>Hello <em>world</em></p>\n");
/// ```
pub fn render(markdown: &str) -> String {
    MarkdownRenderer::new().render(markdown)
}
