use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dscript::peaks::{PickMode, PickRegion};

mod combine;
mod config;
mod create;
mod extract;
mod info;
mod pick;
mod pipe;

pub use combine::CombineOp;
pub use config::Config;
pub use pick::LimitArg;

/// dscript - Scripting tools for multidimensional NMR datasets
#[derive(Parser)]
#[command(name = "dscript")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load defaults from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the header of a dataset
    Info {
        /// Dataset file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Create an empty dataset, optionally calibrated like another
    Create {
        /// Output dataset path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Comma-separated dimension sizes
        #[arg(short, long, value_delimiter = ',', required = true)]
        sizes: Vec<usize>,

        /// Dataset whose headers seed the shared dimensions
        #[arg(long, value_name = "DATASET")]
        like: Option<PathBuf>,

        /// Dataset title
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Create a dataset shaped like the leading dimensions of another
    Sub {
        /// Source dataset
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Output dataset path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Number of leading dimensions to keep
        #[arg(short, long)]
        n_dim: usize,

        /// Dataset title
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Save one vector of a dataset as a 1-D dataset
    Extract {
        /// Source dataset
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output dataset path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Dimension the vector runs along (0-based)
        #[arg(short, long)]
        dim: usize,

        /// Comma-separated indices along every other dimension
        #[arg(short, long, value_delimiter = ',')]
        indices: Vec<usize>,
    },

    /// Combine same-shaped datasets vector by vector
    Combine {
        /// Input datasets; the output is cloned from the first
        #[arg(value_name = "INPUTS", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output dataset path
        #[arg(short, long)]
        output: PathBuf,

        /// Operator applied to each set of vectors (default: add)
        #[arg(long, value_enum)]
        op: Option<CombineOp>,
    },

    /// Pick peaks and print or save the list
    Pick {
        /// Dataset to pick
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Detection threshold
        #[arg(short, long)]
        level: Option<f64>,

        /// Limit a dimension, e.g. --limit x=7.0:9.5 (repeatable)
        #[arg(long = "limit", value_name = "DIM=FROM:TO", value_parser = pick::parse_limit)]
        limits: Vec<LimitArg>,

        /// Volume region (box, window, point)
        #[arg(long)]
        region: Option<PickRegion>,

        /// List mode (new, append)
        #[arg(long)]
        mode: Option<PickMode>,

        /// Also pick negative peaks
        #[arg(long)]
        neg: bool,

        /// Skip positive peaks
        #[arg(long)]
        no_pos: bool,

        /// Peak list name (defaults to the dataset name)
        #[arg(long)]
        list_name: Option<String>,

        /// Output file; `.parquet` writes a Parquet table, anything else XPK2
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a dataset to NMRPipe format
    Pipe {
        /// Dataset to export
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output pipe file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Info { file } => info::run(file),
        Commands::Create {
            output,
            sizes,
            like,
            title,
        } => create::run(output, sizes, like, title),
        Commands::Sub {
            source,
            output,
            n_dim,
            title,
        } => create::run_sub(source, output, n_dim, title),
        Commands::Extract {
            input,
            output,
            dim,
            indices,
        } => extract::run(input, output, dim, indices),
        Commands::Combine { inputs, output, op } => {
            let op = op.or(config.combine.operator).unwrap_or_default();
            combine::run(inputs, output, op)
        }
        Commands::Pick {
            input,
            level,
            limits,
            region,
            mode,
            neg,
            no_pos,
            list_name,
            output,
        } => {
            let mut options = config.pick.to_options();
            if let Some(level) = level {
                options.level = level;
            }
            if let Some(region) = region {
                options.region = region;
            }
            if let Some(mode) = mode {
                options.mode = mode;
            }
            if neg {
                options.neg = true;
            }
            if no_pos {
                options.pos = false;
            }
            options.list_name = list_name;
            for limit in limits {
                options = options.limit(limit.name, limit.first, limit.second);
            }
            pick::run(input, options, output)
        }
        Commands::Pipe { input, output } => pipe::run(input, output),
    }
}

/// Section heading, coloured when the `colorized_output` feature is on
pub(crate) fn heading(text: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        console::style(text).bold().cyan().to_string()
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        text.to_string()
    }
}
