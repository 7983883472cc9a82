//! `marklet render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use marklet::{MarkdownRenderer, escape_html};
use marklet_config::{CliSettings, Config, RenderConfig};

use super::{open_output, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open links in a new tab with rel="noopener noreferrer".
    #[arg(long)]
    safe_links: bool,

    /// Highlight fenced code blocks with a known language.
    #[arg(long)]
    highlight: bool,

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

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            safe_links: self.safe_links.then_some(true),
            syntax_highlighting: self.highlight.then_some(true),
            standalone: self.standalone.then_some(true),
            title: self.title,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if config.render.syntax_highlighting && !cfg!(feature = "highlight") {
            output.warning("Syntax highlighting requested but not compiled in; code is left plain");
        }

        let markdown = read_input(self.input.as_deref())?;
        let renderer = build_renderer(&config.render);
        let mut html = renderer.render(&markdown);
        if config.output.standalone {
            html = standalone_document(&config.output.title, &html);
        }
        tracing::info!(
            bytes_in = markdown.len(),
            bytes_out = html.len(),
            "Rendered document"
        );

        let mut writer = open_output(self.output.as_deref())?;
        writer.write_all(html.as_bytes())?;
        writer.flush()?;

        if let Some(path) = &self.output {
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}

/// Build a renderer from the `[render]` configuration section.
pub(crate) fn build_renderer(config: &RenderConfig) -> MarkdownRenderer {
    MarkdownRenderer::new()
        .with_safe_links(config.safe_links)
        .with_syntax_highlighting(config.syntax_highlighting)
}

/// Closing tags of a standalone document.
pub(crate) const STANDALONE_FOOTER: &str = "</body>\n</html>\n";

/// Opening part of a standalone document, up to and including `<body>`.
pub(crate) fn standalone_header(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n</head>\n<body>\n",
        escape_html(title)
    )
}

/// Wrap rendered HTML in a minimal HTML5 document.
pub(crate) fn standalone_document(title: &str, body: &str) -> String {
    format!("{}{body}{STANDALONE_FOOTER}", standalone_header(title))
}
