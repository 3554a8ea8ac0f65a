//! # dscript
//!
//! Command-line front end for scripting multidimensional NMR datasets.
//!
//! ## Usage
//!
//! ```bash
//! # Inspect a dataset header
//! dscript info hsqc.nv
//!
//! # Average three repeat acquisitions
//! dscript combine run1.nv run2.nv run3.nv --op mean -o mean.nv
//!
//! # Pick the amide region and save an XPK2 list
//! dscript pick mean.nv --level 1e5 --limit x=6.5:9.5 -o mean.xpk2
//!
//! # Export for NMRPipe
//! dscript pipe mean.nv mean.ft2
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
