//! Convert command - convert a file or stdin and write to stdout

use crate::context::Context;
use anyhow::{Context as _, Result};
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Execute `pandoclab convert` command
///
/// Input and output are passed through as bytes so binary formats survive.
pub fn execute_convert(
    ctx: &Context,
    from: &str,
    to: &str,
    input: Option<PathBuf>,
    extra: &[String],
) -> Result<()> {
    let pandoc = ctx.pandoc()?;

    let data = match &input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data).context("Failed to read stdin")?;
            data
        }
    };

    let output = pandoc.convert_bytes(from, to, &data, extra)?;

    let mut out = io::stdout().lock();
    out.write_all(&output)?;
    out.flush()?;
    Ok(())
}
