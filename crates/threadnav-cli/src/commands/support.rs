use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

pub(super) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Reads markdown from a file, or from stdin when the path is `-`.
pub(super) fn read_source(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read markdown from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(source).with_context(|| format!("failed to read {}", source.display()))
}
