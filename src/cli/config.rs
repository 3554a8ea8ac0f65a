//! TOML configuration file support.
//!
//! Defaults for the `pick` and `combine` commands can live in a config file
//! instead of being repeated as flags; flags given on the command line win:
//!
//! ```toml
//! # dscript.toml
//! [pick]
//! level = 50000.0
//! region = "window"
//! neg = true
//!
//! [combine]
//! operator = "mean"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use dscript::peaks::{PickMode, PickOptions, PickRegion};

use super::combine::CombineOp;

/// Root configuration structure for dscript.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Peak picking defaults.
    #[serde(default)]
    pub pick: PickConfig,

    /// Combination defaults.
    #[serde(default)]
    pub combine: CombineConfig,
}

/// Configuration for the pick command.
#[derive(Debug, Default, Deserialize)]
pub struct PickConfig {
    /// Detection threshold.
    pub level: Option<f64>,

    /// List mode (`new` or `append`).
    pub mode: Option<PickMode>,

    /// Volume region (`box`, `window` or `point`).
    pub region: Option<PickRegion>,

    /// Pick positive peaks.
    pub pos: Option<bool>,

    /// Pick negative peaks.
    pub neg: Option<bool>,
}

impl PickConfig {
    /// Pick options with these settings applied over the defaults.
    pub fn to_options(&self) -> PickOptions {
        let defaults = PickOptions::default();
        PickOptions {
            level: self.level.unwrap_or(defaults.level),
            mode: self.mode.unwrap_or(defaults.mode),
            region: self.region.unwrap_or(defaults.region),
            pos: self.pos.unwrap_or(defaults.pos),
            neg: self.neg.unwrap_or(defaults.neg),
            ..defaults
        }
    }
}

/// Configuration for the combine command.
#[derive(Debug, Default, Deserialize)]
pub struct CombineConfig {
    /// Operator used when `--op` is not given.
    pub operator: Option<CombineOp>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
