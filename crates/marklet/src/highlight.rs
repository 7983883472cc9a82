//! Syntax highlighting for fenced code blocks.
//!
//! The renderer owns one [`SyntaxHighlightPlugin`] wrapping a [`Highlighter`]
//! backend. Enabling highlighting inserts that plugin into the pipeline;
//! languages the backend does not support fall through to the plain escaped
//! code block template.

use crate::escape::escape_html;
use crate::plugin::Plugin;
use crate::token::Token;

/// Result of a highlighting attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlighted {
    /// Whether the backend recognised the language.
    pub supported: bool,
    /// Highlighted markup for the code body (without `<pre><code>`).
    pub html: String,
}

impl Highlighted {
    pub fn supported(html: impl Into<String>) -> Self {
        Self {
            supported: true,
            html: html.into(),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            html: String::new(),
        }
    }
}

/// A syntax highlighting backend.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` written in `language`.
    fn highlight(&self, code: &str, language: &str) -> Highlighted;
}

/// Backend that supports no language.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, _code: &str, _language: &str) -> Highlighted {
        Highlighted::unsupported()
    }
}

/// Plugin that renders code blocks through a [`Highlighter`].
///
/// Claims only code blocks that have a language the backend supports.
pub struct SyntaxHighlightPlugin {
    backend: Box<dyn Highlighter>,
}

impl SyntaxHighlightPlugin {
    pub fn new<H: Highlighter + 'static>(backend: H) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }
}

impl Default for SyntaxHighlightPlugin {
    fn default() -> Self {
        Self::new(default_highlighter())
    }
}

impl Plugin for SyntaxHighlightPlugin {
    fn try_render(&self, token: &Token) -> Option<String> {
        let Token::CodeBlock {
            language: Some(language),
            lines,
        } = token
        else {
            return None;
        };

        let highlighted = self.backend.highlight(&lines.join("\n"), language);
        if !highlighted.supported {
            tracing::trace!(language, "Language not supported by highlighter");
            return None;
        }
        Some(format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(language),
            highlighted.html
        ))
    }
}

#[cfg(feature = "syntect")]
fn default_highlighter() -> SyntectHighlighter {
    SyntectHighlighter
}

#[cfg(not(feature = "syntect"))]
fn default_highlighter() -> PlainHighlighter {
    PlainHighlighter
}

#[cfg(feature = "syntect")]
pub use self::syntect_backend::SyntectHighlighter;

#[cfg(feature = "syntect")]
mod syntect_backend {
    use std::sync::LazyLock;

    use syntect::html::{ClassStyle, ClassedHTMLGenerator};
    use syntect::parsing::SyntaxSet;
    use syntect::util::LinesWithEndings;

    use super::{Highlighted, Highlighter};

    static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

    /// Class-based highlighting with the default `syntect` syntaxes.
    ///
    /// Spans carry `hl-` prefixed scope classes; pair the output with a
    /// stylesheet generated by `syntect::html::css_for_theme_with_class_style`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SyntectHighlighter;

    impl Highlighter for SyntectHighlighter {
        fn highlight(&self, code: &str, language: &str) -> Highlighted {
            let token = normalize_language(language);
            let Some(syntax) = SYNTAX_SET.find_syntax_by_token(&token) else {
                return Highlighted::unsupported();
            };

            let mut generator = ClassedHTMLGenerator::new_with_class_style(
                syntax,
                &SYNTAX_SET,
                ClassStyle::SpacedPrefixed { prefix: "hl-" },
            );
            let source = format!("{code}\n");
            for line in LinesWithEndings::from(&source) {
                if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                    tracing::warn!(language, error = %e, "Syntax highlighting failed");
                    return Highlighted::unsupported();
                }
            }
            Highlighted::supported(generator.finalize())
        }
    }

    /// Map common aliases to tokens the default syntax set recognises.
    fn normalize_language(language: &str) -> String {
        let lower = language.to_lowercase();
        match lower.as_str() {
            "shell" | "sh" | "zsh" | "console" => "bash".to_owned(),
            "rs" => "rust".to_owned(),
            "py" | "python3" => "python".to_owned(),
            "yml" => "yaml".to_owned(),
            _ => lower,
        }
    }

}
