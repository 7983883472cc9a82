//! Render plugins.
//!
//! A [`Plugin`] gets the first chance to render every token. The renderer asks
//! each registered plugin in registration order and uses the first fragment it
//! gets back; when every plugin declines, the built-in template runs.

use std::sync::Arc;

use crate::token::Token;

/// Overrides rendering for some tokens.
///
/// Implementations must be pure with respect to the token. A returned fragment
/// is used verbatim, so the plugin decides its own trailing newline.
///
/// # Example
///
/// ```
/// use marklet::{MarkdownRenderer, Plugin, Token};
///
/// struct ClassedHeadings;
///
/// impl Plugin for ClassedHeadings {
///     fn try_render(&self, token: &Token) -> Option<String> {
///         match token {
///             Token::Heading { text, .. } => Some(format!("<h1 class=\"custom\">{text}</h1>\n")),
///             _ => None,
///         }
///     }
/// }
///
/// let renderer = MarkdownRenderer::new().with_plugin(ClassedHeadings);
/// assert_eq!(renderer.render("### Title"), "<h1 class=\"custom\">Title</h1>\n");
/// ```
pub trait Plugin: Send + Sync {
    /// Render `token`, or return `None` to let the next plugin try.
    fn try_render(&self, token: &Token) -> Option<String>;
}

/// Ordered list of plugins.
///
/// Entries are compared by pointer identity, so the same plugin instance can be
/// detected and removed without disturbing the order of the others.
#[derive(Clone, Default)]
pub struct PluginPipeline {
    entries: Vec<Arc<dyn Plugin>>,
}

impl PluginPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin.
    pub fn push(&mut self, plugin: Arc<dyn Plugin>) {
        self.entries.push(plugin);
    }

    /// Check whether this exact plugin instance is registered.
    pub fn contains(&self, plugin: &Arc<dyn Plugin>) -> bool {
        self.entries.iter().any(|entry| same_plugin(entry, plugin))
    }

    /// Remove every occurrence of this plugin instance, keeping the order of
    /// the remaining entries. Returns `true` if anything was removed.
    pub fn remove(&mut self, plugin: &Arc<dyn Plugin>) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !same_plugin(entry, plugin));
        self.entries.len() != before
    }

    /// Replace this plugin instance in place with another one.
    pub(crate) fn replace(&mut self, old: &Arc<dyn Plugin>, new: &Arc<dyn Plugin>) {
        for entry in &mut self.entries {
            if same_plugin(entry, old) {
                *entry = Arc::clone(new);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ask each plugin in order; the first fragment wins.
    pub fn try_render(&self, token: &Token) -> Option<String> {
        self.entries.iter().enumerate().find_map(|(index, plugin)| {
            let html = plugin.try_render(token)?;
            tracing::trace!(plugin = index, token = token.kind(), "Plugin rendered token");
            Some(html)
        })
    }
}

impl std::fmt::Debug for PluginPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginPipeline")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Compare data pointers only; vtable pointers for the same type may differ
/// between codegen units.
fn same_plugin(a: &Arc<dyn Plugin>, b: &Arc<dyn Plugin>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
