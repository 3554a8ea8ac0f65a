use anyhow::{Context, Result};
use std::path::PathBuf;

use dscript::dataset::Dataset;

use super::heading;

/// Display the header of a dataset
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let dataset = Dataset::open(&file, false).context("Failed to open dataset")?;
    let header = dataset.header();

    println!("{}", heading("Dataset Information"));
    println!("{}", heading("==================="));
    println!("File: {}", file.display());
    println!("Title: {}", header.title);
    println!("Created: {}", header.created.to_rfc3339());
    println!("Dimensions: {}", header.n_dim());
    println!();

    println!("{}", heading("Axes:"));
    for (dim, block) in header.dims.iter().enumerate() {
        let (low, high) = block.ppm_range();
        println!(
            "  {}. {:<8} size {:>6}{}  sf {:.4} MHz  sw {:.2} Hz  ppm {:.3}..{:.3}{}",
            dim,
            block.label,
            block.size,
            if block.complex { " (complex)" } else { "" },
            block.sf,
            block.sw,
            low,
            high,
            if block.values.is_some() {
                "  [explicit values]"
            } else {
                ""
            }
        );
    }

    Ok(())
}
