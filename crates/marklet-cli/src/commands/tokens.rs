//! `marklet tokens` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use marklet::Token;

use super::read_input;
use crate::error::CliError;

/// Arguments for the tokens command.
#[derive(Args)]
pub(crate) struct TokensArgs {
    /// Markdown file to scan (default: stdin).
    input: Option<PathBuf>,
}

impl TokensArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = read_input(self.input.as_deref())?;
        let tokens = marklet::scan(&markdown);
        let mut stdout = io::stdout().lock();
        write_tokens(&mut stdout, &tokens)?;
        Ok(())
    }
}

/// Write tokens as a pretty-printed JSON array followed by a newline.
fn write_tokens<W: Write>(writer: &mut W, tokens: &[Token]) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, tokens)?;
    writeln!(writer)?;
    Ok(())
}
