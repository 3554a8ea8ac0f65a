use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis description of one peak-list dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralDim {
    /// Axis label
    pub label: String,
    /// Spectrometer frequency in MHz
    pub sf: f64,
    /// Sweep width in Hz
    pub sw: f64,
    /// Number of points in the source dataset
    pub size: usize,
}

/// Position and shape of a peak along one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDim {
    /// Interpolated point position
    pub point: f64,
    /// Chemical shift in ppm
    pub ppm: f64,
    /// Full width at half height in ppm
    pub width_ppm: f64,
}

/// A located peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Identifier, unique within its list
    pub id: usize,
    /// Value at the peak's grid point
    pub intensity: f64,
    /// Integrated value over the region the pick mode defines
    pub volume: f64,
    /// Per-dimension position, dimension 0 first
    pub dims: Vec<PeakDim>,
}

/// Peaks picked from one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakList {
    /// List name
    pub name: String,
    /// Name of the dataset the peaks came from
    pub dataset_name: String,
    /// Axis descriptions, dimension 0 first
    pub dims: Vec<SpectralDim>,
    /// Peaks in detection order
    pub peaks: Vec<Peak>,
}

impl PeakList {
    /// Empty list
    pub fn new(name: &str, dataset_name: &str, dims: Vec<SpectralDim>) -> Self {
        Self {
            name: name.to_string(),
            dataset_name: dataset_name.to_string(),
            dims,
            peaks: Vec::new(),
        }
    }

    /// Default list name for a dataset: its name without the last extension
    pub fn name_for_dataset(dataset_name: &str) -> String {
        match dataset_name.rfind('.') {
            Some(index) => dataset_name[..index].to_string(),
            None => dataset_name.to_string(),
        }
    }

    /// Number of dimensions
    pub fn n_dim(&self) -> usize {
        self.dims.len()
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// True when the list has no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Add a peak, assigning the id after the last peak's
    ///
    /// Ids increase along the list when peaks are only added through this
    /// method or [`PeakList::append`].
    pub fn add_peak(&mut self, mut peak: Peak) -> usize {
        peak.id = self.next_id();
        let id = peak.id;
        self.peaks.push(peak);
        id
    }

    /// Move every peak of `other` into this list, renumbering ids after the
    /// current ones
    pub fn append(&mut self, other: PeakList) {
        for peak in other.peaks {
            self.add_peak(peak);
        }
    }

    fn next_id(&self) -> usize {
        self.peaks.last().map_or(0, |p| p.id + 1)
    }
}

impl fmt::Display for PeakList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Peak list {} ({} dims, {} peaks) from {}",
            self.name,
            self.n_dim(),
            self.len(),
            self.dataset_name
        )
    }
}
