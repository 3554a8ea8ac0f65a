use anyhow::{Context, Result};
use std::path::PathBuf;

use dscript::dataset::Dataset;
use dscript::script::ScriptContext;

/// Save the vector along `dim` at `indices` as a 1-D dataset file
pub fn run(input: PathBuf, output: PathBuf, dim: usize, indices: Vec<usize>) -> Result<()> {
    let mut ctx = ScriptContext::default();
    let dataset = ctx
        .open(&input, false)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let extracted = ctx.extract(&dataset, dim, &indices)?;
    let mut vector = ctx.get_vector(&extracted, 0)?;
    extracted.read_vector(&mut vector)?;

    let mut saved = Dataset::create_with_header(&output, extracted.header().clone(), true)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    saved.write_vector(&vector)?;
    saved.close()?;

    println!(
        "Extracted {} ({} points) to {}",
        extracted.name(),
        vector.len(),
        output.display()
    );
    ctx.close(dataset)?;
    Ok(())
}
