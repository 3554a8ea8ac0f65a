use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

use super::error::PeakPickError;

/// Dimension names accepted in limits, in dimension order
pub const DIM_NAMES: [&str; 7] = ["x", "y", "z", "a", "b", "c", "d"];

/// Dimension index for a limit name
pub fn dim_index(name: &str) -> Result<usize, PeakPickError> {
    DIM_NAMES
        .iter()
        .position(|&n| n == name)
        .ok_or_else(|| PeakPickError::UnknownDimension(name.to_string()))
}

/// Whether a pick starts a list or extends one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickMode {
    /// Replace any list of the same name
    #[default]
    New,
    /// Add to the list of the same name
    Append,
}

impl FromStr for PickMode {
    type Err = PeakPickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(PickMode::New),
            "append" => Ok(PickMode::Append),
            other => Err(PeakPickError::InvalidOption(format!("mode '{}'", other))),
        }
    }
}

impl fmt::Display for PickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickMode::New => write!(f, "new"),
            PickMode::Append => write!(f, "append"),
        }
    }
}

/// Region used to integrate a peak's volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickRegion {
    /// Box spanned by the half-height bounds in every dimension
    #[default]
    Box,
    /// Fixed one-point window around the peak
    Window,
    /// The peak point alone
    Point,
}

impl FromStr for PickRegion {
    type Err = PeakPickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(PickRegion::Box),
            "window" => Ok(PickRegion::Window),
            "point" => Ok(PickRegion::Point),
            other => Err(PeakPickError::InvalidOption(format!("region '{}'", other))),
        }
    }
}

impl fmt::Display for PickRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickRegion::Box => write!(f, "box"),
            PickRegion::Window => write!(f, "window"),
            PickRegion::Point => write!(f, "point"),
        }
    }
}

/// Caller-facing pick options with their defaults
///
/// Limits are keyed by dimension name (`x`, `y`, ...) and are only checked
/// when the request is built against a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PickOptions {
    /// Output list name; derived from the dataset name when `None`
    pub list_name: Option<String>,
    /// Detection threshold
    pub level: f64,
    /// New list or append
    pub mode: PickMode,
    /// Volume region
    pub region: PickRegion,
    /// Pick positive peaks
    pub pos: bool,
    /// Pick negative peaks
    pub neg: bool,
    /// Per-dimension ppm limits by dimension name
    pub limits: Vec<(String, (f64, f64))>,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            list_name: None,
            level: 1.0,
            mode: PickMode::New,
            region: PickRegion::Box,
            pos: true,
            neg: false,
            limits: Vec::new(),
        }
    }
}

impl PickOptions {
    /// Set the output list name
    pub fn list_name(mut self, name: impl Into<String>) -> Self {
        self.list_name = Some(name.into());
        self
    }

    /// Set the detection threshold
    pub fn level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    /// Set the list mode
    pub fn mode(mut self, mode: PickMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the volume region
    pub fn region(mut self, region: PickRegion) -> Self {
        self.region = region;
        self
    }

    /// Enable or disable positive peaks
    pub fn pos(mut self, pos: bool) -> Self {
        self.pos = pos;
        self
    }

    /// Enable or disable negative peaks
    pub fn neg(mut self, neg: bool) -> Self {
        self.neg = neg;
        self
    }

    /// Restrict a dimension, named from [`DIM_NAMES`], to a ppm range
    pub fn limit(mut self, dim_name: impl Into<String>, first: f64, second: f64) -> Self {
        self.limits.push((dim_name.into(), (first, second)));
        self
    }
}

/// Fully specified, validated pick request
#[derive(Debug, Clone, PartialEq)]
pub struct PeakPickParams {
    dataset_name: String,
    list_name: String,
    level: f64,
    mode: PickMode,
    region: PickRegion,
    pos: bool,
    neg: bool,
    /// `(low, high)` ppm per dimension
    limits: Vec<(f64, f64)>,
}

impl PeakPickParams {
    /// Build a request for `dataset`
    ///
    /// Ranges start as each dimension's full ppm range and are then narrowed
    /// by the named limits in order. Fails on an unknown dimension name, a
    /// name beyond the dataset's dimensionality, or a non-finite level or limit.
    pub fn new(
        dataset: &Dataset,
        list_name: &str,
        options: &PickOptions,
    ) -> Result<Self, PeakPickError> {
        if !options.level.is_finite() || options.level < 0.0 {
            return Err(PeakPickError::InvalidOption(format!(
                "level {} must be finite and non-negative",
                options.level
            )));
        }
        if list_name.is_empty() {
            return Err(PeakPickError::InvalidOption("empty list name".to_string()));
        }

        let mut limits = default_ranges(dataset);
        for (name, (first, second)) in &options.limits {
            let dim = dim_index(name)?;
            if dim >= dataset.n_dim() {
                return Err(PeakPickError::DimensionOutOfRange {
                    name: name.clone(),
                    dim,
                    n_dim: dataset.n_dim(),
                });
            }
            if !first.is_finite() || !second.is_finite() {
                return Err(PeakPickError::InvalidOption(format!(
                    "limit {} = ({}, {}) is not finite",
                    name, first, second
                )));
            }
            limits[dim] = (first.min(*second), first.max(*second));
        }

        Ok(Self {
            dataset_name: dataset.name().to_string(),
            list_name: list_name.to_string(),
            level: options.level,
            mode: options.mode,
            region: options.region,
            pos: options.pos,
            neg: options.neg,
            limits,
        })
    }

    /// Name of the dataset the request was built for
    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    /// Output list name
    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    /// Detection threshold
    pub fn level(&self) -> f64 {
        self.level
    }

    /// List mode
    pub fn mode(&self) -> PickMode {
        self.mode
    }

    /// Volume region
    pub fn region(&self) -> PickRegion {
        self.region
    }

    /// Positive peaks enabled
    pub fn pos(&self) -> bool {
        self.pos
    }

    /// Negative peaks enabled
    pub fn neg(&self) -> bool {
        self.neg
    }

    /// `(low, high)` ppm limits, one per dataset dimension
    pub fn limits(&self) -> &[(f64, f64)] {
        &self.limits
    }
}

fn default_ranges(dataset: &Dataset) -> Vec<(f64, f64)> {
    dataset.header().dims.iter().map(|d| d.ppm_range()).collect()
}
