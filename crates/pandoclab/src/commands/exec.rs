//! Exec command - run the located pandoc with inherited streams

use crate::context::Context;
use anyhow::{Result, bail};
use pandoclab_pandoc::IoOptions;

/// Execute `pandoclab exec` command
///
/// Exits the process with pandoc's exit code when it is non-zero.
pub fn execute_exec(ctx: &Context, args: Vec<String>) -> Result<()> {
    let pandoc = ctx.pandoc()?;

    let outcome = pandoc.run(&args, IoOptions::default());
    if outcome.launch_failed() {
        bail!("Failed to run {}", pandoc.bin().display());
    }
    if outcome.signaled {
        bail!("{} was terminated by a signal", pandoc.bin().display());
    }

    // Exit with the same code as pandoc
    if !outcome.success() {
        std::process::exit(outcome.exit_code);
    }

    Ok(())
}
