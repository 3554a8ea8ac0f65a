use anyhow::{Context, Result};
use std::path::PathBuf;

use dscript::peaks::{write_parquet_file, write_xpk2_file, PickOptions};
use dscript::script::ScriptContext;

use super::heading;

/// One `--limit` argument
#[derive(Clone, Debug, PartialEq)]
pub struct LimitArg {
    /// Dimension name (`x`, `y`, ...)
    pub name: String,
    /// First ppm bound as given
    pub first: f64,
    /// Second ppm bound as given
    pub second: f64,
}

/// Parse `DIM=FROM:TO`
pub fn parse_limit(arg: &str) -> Result<LimitArg, String> {
    let (name, range) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected DIM=FROM:TO, got '{}'", arg))?;
    let (first, second) = range
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO after '=', got '{}'", range))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad ppm value '{}': {}", s, e))
    };
    Ok(LimitArg {
        name: name.trim().to_string(),
        first: parse(first)?,
        second: parse(second)?,
    })
}

/// Pick `input` and print the list, saving it when `output` is given
pub fn run(input: PathBuf, options: PickOptions, output: Option<PathBuf>) -> Result<()> {
    let mut ctx = ScriptContext::default();
    let dataset = ctx
        .open(&input, false)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let list = ctx.pick(&dataset, options)?;

    println!("{}", heading(&list.to_string()));
    for peak in &list.peaks {
        let shifts: Vec<String> = peak.dims.iter().map(|d| format!("{:.3}", d.ppm)).collect();
        println!(
            "  {:>4}  {:<24} {:>14.4e} {:>14.4e}",
            peak.id,
            shifts.join(" "),
            peak.intensity,
            peak.volume
        );
    }

    if let Some(output) = output {
        let parquet = output
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
        let written = if parquet {
            write_parquet_file(&list, &output)
        } else {
            write_xpk2_file(&list, &output)
        };
        written.with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Saved {} peaks to {}", list.len(), output.display());
    }

    ctx.close(dataset)?;
    Ok(())
}
