use crate::dataset::DatasetError;

/// Errors that can occur while building a pick request, picking, or writing
/// peak lists
#[derive(Debug, thiserror::Error)]
pub enum PeakPickError {
    /// Limit keyed by a name outside the dimension-name table
    #[error("Unknown dimension name: {0} (expected one of x, y, z, a, b, c, d)")]
    UnknownDimension(String),

    /// Limit names a dimension the dataset does not have
    #[error("Dimension {name} ({dim}) out of range for {n_dim}-dimensional dataset")]
    DimensionOutOfRange {
        /// Dimension name as given
        name: String,
        /// Resolved index
        dim: usize,
        /// Dimensionality of the dataset
        n_dim: usize,
    },

    /// Option value that cannot be used
    #[error("Invalid pick option: {0}")]
    InvalidOption(String),

    /// Error reading the dataset
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// I/O error writing a peak list
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error writing a tab-separated peak list
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Arrow error building a peak table
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error writing a peak table
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),
}

impl PeakPickError {
    /// True for errors caused by a bad request rather than by storage
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PeakPickError::UnknownDimension(_)
                | PeakPickError::DimensionOutOfRange { .. }
                | PeakPickError::InvalidOption(_)
        )
    }
}
