//! marklet CLI - Markdown to HTML.
//!
//! Provides commands for:
//! - `render`: Render a whole document
//! - `stream`: Render input incrementally as it arrives
//! - `tokens`: Dump the scanned block tokens as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, StreamArgs, TokensArgs};
use output::Output;

/// marklet - Markdown to HTML renderer.
#[derive(Parser)]
#[command(name = "marklet", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown document to HTML.
    Render(RenderArgs),
    /// Render markdown incrementally, writing HTML as lines complete.
    Stream(StreamArgs),
    /// Print the block tokens of a document as JSON.
    Tokens(TokensArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Render(args) => args.verbose,
            Self::Stream(args) => args.verbose,
            Self::Tokens(_) => false,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Stream(args) => args.execute(),
        Commands::Tokens(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
