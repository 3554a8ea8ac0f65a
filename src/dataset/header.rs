use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DatasetError;

/// Maximum dimensionality supported by the engine
pub const MAX_DIMS: usize = 7;

/// Per-dimension metadata block
///
/// Axis calibration follows the usual NMR convention: chemical shift
/// decreases with increasing point index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimHeader {
    /// Number of logical points along this dimension
    pub size: usize,

    /// Whether each point stores a (real, imaginary) pair
    pub complex: bool,

    /// Spectrometer frequency in MHz
    pub sf: f64,

    /// Sweep width in Hz
    pub sw: f64,

    /// Chemical shift (ppm) at `ref_point`
    pub ref_value: f64,

    /// Point at which `ref_value` applies
    pub ref_point: f64,

    /// Axis label (e.g. "1H", "HN")
    pub label: String,

    /// Observed nucleus
    pub nucleus: String,

    /// Explicit axis values, one per point, for arrayed dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
}

impl DimHeader {
    /// Default header for a dimension of `size` points
    pub fn new(size: usize, dim: usize) -> Self {
        Self {
            size,
            complex: false,
            sf: 1.0,
            sw: size.max(1) as f64,
            ref_value: 0.0,
            ref_point: 0.0,
            label: format!("D{}", dim + 1),
            nucleus: String::new(),
            values: None,
        }
    }

    /// Number of stored values along this dimension
    pub fn stored_size(&self) -> usize {
        if self.complex {
            self.size * 2
        } else {
            self.size
        }
    }

    /// Chemical shift per point
    fn ppm_per_point(&self) -> f64 {
        if self.size == 0 || self.sf == 0.0 {
            return 0.0;
        }
        self.sw / (self.sf * self.size as f64)
    }

    /// Convert a (fractional) point index to ppm
    pub fn point_to_ppm(&self, point: f64) -> f64 {
        self.ref_value - (point - self.ref_point) * self.ppm_per_point()
    }

    /// Convert ppm to a fractional point index
    pub fn ppm_to_point(&self, ppm: f64) -> f64 {
        let scale = self.ppm_per_point();
        if scale == 0.0 {
            return self.ref_point;
        }
        self.ref_point + (self.ref_value - ppm) / scale
    }

    /// Full ppm range covered by the dimension as `(low, high)`
    pub fn ppm_range(&self) -> (f64, f64) {
        let first = self.point_to_ppm(0.0);
        let last = self.point_to_ppm(self.size.saturating_sub(1) as f64);
        if first <= last {
            (first, last)
        } else {
            (last, first)
        }
    }

    /// Axis values: explicit values when set, otherwise ppm per point
    pub fn axis_values(&self) -> Vec<f64> {
        match &self.values {
            Some(values) => values.clone(),
            None => (0..self.size).map(|i| self.point_to_ppm(i as f64)).collect(),
        }
    }

    /// Copy calibration and labelling from another dimension, keeping this
    /// dimension's size and storage layout.
    pub fn copy_calibration_from(&mut self, other: &DimHeader) {
        self.sf = other.sf;
        self.sw = other.sw;
        self.ref_value = other.ref_value;
        self.ref_point = other.ref_point;
        self.label = other.label.clone();
        self.nucleus = other.nucleus.clone();
        self.values = match &other.values {
            Some(values) if values.len() == self.size => Some(values.clone()),
            _ => None,
        };
    }
}

/// Dataset-level header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetHeader {
    /// Free-form title
    pub title: String,

    /// Creation time
    pub created: DateTime<Utc>,

    /// One block per dimension, dimension 0 first
    pub dims: Vec<DimHeader>,
}

impl DatasetHeader {
    /// Header with default dimension blocks for the given sizes
    pub fn new(title: &str, sizes: &[usize]) -> Result<Self, DatasetError> {
        let header = Self {
            title: title.to_string(),
            created: Utc::now(),
            dims: sizes
                .iter()
                .enumerate()
                .map(|(i, &size)| DimHeader::new(size, i))
                .collect(),
        };
        header.validate()?;
        Ok(header)
    }

    /// Number of dimensions
    pub fn n_dim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of stored values
    pub fn stored_len(&self) -> usize {
        self.dims.iter().map(DimHeader::stored_size).product()
    }

    /// Check structural invariants
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.dims.is_empty() || self.dims.len() > MAX_DIMS {
            return Err(DatasetError::InvalidArgument(format!(
                "dataset must have 1..={} dimensions, got {}",
                MAX_DIMS,
                self.dims.len()
            )));
        }
        for (i, dim) in self.dims.iter().enumerate() {
            if let Some(values) = &dim.values {
                if values.len() != dim.size {
                    return Err(DatasetError::InvalidFormat(format!(
                        "dimension {} has {} axis values for {} points",
                        i,
                        values.len(),
                        dim.size
                    )));
                }
            }
        }
        Ok(())
    }
}
