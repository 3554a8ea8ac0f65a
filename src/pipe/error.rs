use crate::dataset::DatasetError;

/// Errors that can occur during NMRPipe export
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    /// I/O error writing the pipe file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reading the source dataset
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// NMRPipe single-file streams describe at most four dimensions
    #[error("NMRPipe export supports at most 4 dimensions, dataset has {0}")]
    TooManyDimensions(usize),
}
