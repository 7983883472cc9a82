//! Token renderer with a plugin pipeline.

use std::sync::Arc;

use crate::highlight::{Highlighter, SyntaxHighlightPlugin};
use crate::html;
use crate::inline::InlineTransformer;
use crate::plugin::{Plugin, PluginPipeline};
use crate::scanner::scan;
use crate::streaming::StreamingParser;
use crate::token::Token;

/// Markdown to HTML renderer.
///
/// Every token is offered to the registered plugins first, in registration
/// order. The first fragment a plugin returns is used verbatim; otherwise the
/// default template for the token renders it, followed by a newline.
///
/// Each renderer owns its pipeline, so plugins registered on one renderer
/// never leak into another.
///
/// # Example
///
/// ```
/// use marklet::MarkdownRenderer;
///
/// let renderer = MarkdownRenderer::new();
/// let html = renderer.render("# Hello\n\nSome **bold** text");
/// assert_eq!(html, "<h1>Hello</h1>\n<p>Some <strong>bold</strong> text</p>\n");
/// ```
pub struct MarkdownRenderer {
    plugins: PluginPipeline,
    inline: InlineTransformer,
    /// The designated highlighting plugin, present in `plugins` only while
    /// highlighting is enabled.
    highlight: Arc<dyn Plugin>,
}

impl MarkdownRenderer {
    /// Create a renderer with no plugins and highlighting disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: PluginPipeline::new(),
            inline: InlineTransformer::new(),
            highlight: Arc::new(SyntaxHighlightPlugin::default()),
        }
    }

    /// Append a plugin to the pipeline.
    pub fn use_plugin<P: Plugin + 'static>(&mut self, plugin: P) -> &mut Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Builder form of [`use_plugin`](Self::use_plugin).
    #[must_use]
    pub fn with_plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.use_plugin(plugin);
        self
    }

    /// Insert or remove the highlighting plugin.
    ///
    /// Idempotent. Enabling appends the plugin after everything registered so
    /// far; disabling removes only that plugin and leaves the order of the
    /// others intact.
    pub fn enable_syntax_highlighting(&mut self, enabled: bool) -> &mut Self {
        if enabled {
            if !self.plugins.contains(&self.highlight) {
                self.plugins.push(Arc::clone(&self.highlight));
            }
        } else {
            self.plugins.remove(&self.highlight);
        }
        tracing::debug!(enabled, "Syntax highlighting toggled");
        self
    }

    /// Builder form of [`enable_syntax_highlighting`](Self::enable_syntax_highlighting).
    #[must_use]
    pub fn with_syntax_highlighting(mut self, enabled: bool) -> Self {
        self.enable_syntax_highlighting(enabled);
        self
    }

    /// Whether the highlighting plugin is currently in the pipeline.
    pub fn syntax_highlighting(&self) -> bool {
        self.plugins.contains(&self.highlight)
    }

    /// Swap the highlighting backend.
    ///
    /// If highlighting is enabled the new plugin takes the old one's place in
    /// the pipeline.
    #[must_use]
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, backend: H) -> Self {
        let plugin: Arc<dyn Plugin> = Arc::new(SyntaxHighlightPlugin::new(backend));
        self.plugins.replace(&self.highlight, &plugin);
        self.highlight = plugin;
        self
    }

    /// Enable link-safety mode for inline and standalone links.
    #[must_use]
    pub fn with_safe_links(mut self, enabled: bool) -> Self {
        self.inline = self.inline.with_safe_links(enabled);
        self
    }

    /// The registered plugins, including the highlighting plugin when enabled.
    pub fn plugins(&self) -> &PluginPipeline {
        &self.plugins
    }

    /// Create a streaming parser sharing this renderer's inline options.
    ///
    /// Plugins do not take part in streaming.
    pub fn streaming(&self) -> StreamingParser {
        StreamingParser::with_inline(self.inline)
    }

    /// Scan and render a whole document. Never fails.
    pub fn render(&self, markdown: &str) -> String {
        self.render_tokens(&scan(markdown))
    }

    /// Render an already scanned token sequence.
    pub fn render_tokens(&self, tokens: &[Token]) -> String {
        let mut output = String::with_capacity(tokens.len() * 64);
        for token in tokens {
            self.render_into(token, &mut output);
        }
        output
    }

    /// Render a single token.
    pub fn render_token(&self, token: &Token) -> String {
        let mut output = String::new();
        self.render_into(token, &mut output);
        output
    }

    fn render_into(&self, token: &Token, out: &mut String) {
        if let Some(fragment) = self.plugins.try_render(token) {
            out.push_str(&fragment);
            return;
        }

        match token {
            Token::Heading { level, text } => html::heading(*level, text, out),
            Token::Paragraph { text } => out.push_str(&self.inline.paragraph(text)),
            Token::UnorderedList { items } => html::list(false, items, out),
            Token::OrderedList { items } => html::list(true, items, out),
            Token::Blockquote { text } => html::blockquote(text, out),
            Token::Table { rows } => html::table(rows, out),
            Token::CodeBlock { language, lines } => {
                html::code_block(language.as_deref(), &lines.join("\n"), out);
            }
            Token::Image { alt, src } => html::image(src, alt, out),
            Token::Link { text, href } => html::link(href, text, self.inline.link_attrs(), out),
            Token::HorizontalRule => html::horizontal_rule(out),
        }
        out.push('\n');
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownRenderer")
            .field("plugins", &self.plugins)
            .field("inline", &self.inline)
            .field("syntax_highlighting", &self.syntax_highlighting())
            .finish()
    }
}
