use anyhow::{Context, Result};
use std::path::PathBuf;

use dscript::dataset::Dataset;
use dscript::script::ScriptContext;

/// Create an empty dataset of `sizes`, seeded from `like` when given
pub fn run(output: PathBuf, sizes: Vec<usize>, like: Option<PathBuf>, title: String) -> Result<()> {
    let mut ctx = ScriptContext::default();
    let source = like
        .map(|path| {
            Dataset::open(&path, false)
                .with_context(|| format!("Failed to open {}", path.display()))
        })
        .transpose()?;

    let dataset = ctx
        .create(&output, &sizes, source.as_ref(), &title)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    println!("Created {} with sizes {:?}", dataset.name(), dataset.sizes());
    ctx.close(dataset)?;
    Ok(())
}

/// Create a dataset shaped like the first `n_dim` dimensions of `source`
pub fn run_sub(source: PathBuf, output: PathBuf, n_dim: usize, title: String) -> Result<()> {
    let mut ctx = ScriptContext::default();
    let dataset = ctx
        .create_sub(&output, n_dim, source.as_path(), &title)
        .with_context(|| {
            format!(
                "Failed to derive {} from {}",
                output.display(),
                source.display()
            )
        })?;
    println!("Created {} with sizes {:?}", dataset.name(), dataset.sizes());
    ctx.close(dataset)?;
    Ok(())
}
