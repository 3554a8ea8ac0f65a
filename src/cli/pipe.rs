use anyhow::{Context, Result};
use std::path::PathBuf;

use dscript::script::ScriptContext;

/// Export `input` to an NMRPipe file
pub fn run(input: PathBuf, output: PathBuf) -> Result<()> {
    let mut ctx = ScriptContext::default();
    let dataset = ctx
        .open(&input, false)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let stats = ctx
        .to_pipe(&dataset, &output)
        .with_context(|| format!("Failed to export {}", output.display()))?;
    println!("Wrote {}: {}", output.display(), stats);

    ctx.close(dataset)?;
    Ok(())
}
