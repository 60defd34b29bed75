//! Formats command - list what the located pandoc reads and writes

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Serialize)]
struct Formats<'a> {
    input: &'a BTreeSet<String>,
    output: &'a BTreeSet<String>,
    highlight_languages: &'a BTreeSet<String>,
}

/// Execute `pandoclab formats` command
pub fn execute_formats(ctx: &Context, json: bool) -> Result<()> {
    let pandoc = ctx.pandoc()?;
    let formats = Formats {
        input: pandoc.input_formats(),
        output: pandoc.output_formats(),
        highlight_languages: pandoc.highlight_languages(),
    };

    if json {
        return print_json(&formats);
    }

    if formats.input.is_empty() && formats.output.is_empty() {
        print_text(&format!(
            "{} pandoc {} does not list its formats (requires 1.18 or newer)",
            "!".yellow(),
            pandoc.version()
        ))?;
        return Ok(());
    }

    print_text(&format!("Input formats ({}):", formats.input.len()))?;
    print_text(&format!("  {}", join(formats.input)))?;
    print_text(&format!("Output formats ({}):", formats.output.len()))?;
    print_text(&format!("  {}", join(formats.output)))?;
    Ok(())
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
