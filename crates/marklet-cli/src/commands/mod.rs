//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod stream;
pub(crate) mod tokens;

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

pub(crate) use render::RenderArgs;
pub(crate) use stream::StreamArgs;
pub(crate) use tokens::TokensArgs;

/// Read the whole input document from a file, or stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Open the input as a byte reader, or stdin when no path is given.
pub(crate) fn open_input(path: Option<&Path>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(path) => Ok(Box::new(File::open(path)?)),
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Open the output as a writer, or stdout when no path is given.
pub(crate) fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}
