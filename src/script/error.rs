use crate::dataset::DatasetError;
use crate::peaks::PeakPickError;
use crate::pipe::PipeError;

/// Errors surfaced by the scripting layer
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Argument rejected before any storage was touched
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Combination inputs do not share the first input's shape
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Name lookup in the dataset registry failed
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Storage failure from the dataset engine
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Failure while building or running a peak pick
    #[error("Peak pick error: {0}")]
    PeakPick(#[from] PeakPickError),

    /// Failure while exporting to NMRPipe format
    #[error("Pipe export error: {0}")]
    Pipe(#[from] PipeError),

    /// I/O error outside the dataset engine (file copies, exports)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScriptError {
    /// True for errors caused by a bad argument rather than by storage
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            ScriptError::InvalidArgument(_) | ScriptError::UnknownDataset(_) => true,
            ScriptError::PeakPick(e) => e.is_invalid_argument(),
            ScriptError::Pipe(e) => matches!(e, PipeError::TooManyDimensions(_)),
            ScriptError::Dataset(e) => matches!(
                e,
                DatasetError::InvalidArgument(_)
                    | DatasetError::DimensionOutOfRange { .. }
                    | DatasetError::WriterOpen(_)
            ),
            _ => false,
        }
    }
}
