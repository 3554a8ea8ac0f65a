/// Errors that can occur during dataset operations
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error serializing/deserializing the JSON header
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File is not a dataset or is corrupt
    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),

    /// Caller supplied an argument the engine cannot honor
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Dimension index beyond the dataset's dimensionality
    #[error("Dimension {dim} out of range for {n_dim}-dimensional dataset")]
    DimensionOutOfRange {
        /// Requested dimension
        dim: usize,
        /// Dimensionality of the dataset
        n_dim: usize,
    },

    /// Point index beyond the extent of a dimension
    #[error("Index {index} out of range for dimension {dim} (extent {extent})")]
    IndexOutOfRange {
        /// Dimension the index applies to
        dim: usize,
        /// Requested index
        index: usize,
        /// Stored extent of the dimension
        extent: usize,
    },

    /// Write attempted on a dataset opened read-only
    #[error("Dataset is read-only: {0}")]
    ReadOnly(String),

    /// Vector does not fit the dataset line it addresses
    #[error("Vector mismatch: {0}")]
    VectorMismatch(String),

    /// Serialized header outgrew the block reserved for it at creation
    #[error("Header of {needed} bytes exceeds reserved block of {reserved} bytes")]
    HeaderTooLarge {
        /// Bytes needed for the JSON header
        needed: usize,
        /// Bytes reserved in the file
        reserved: usize,
    },

    /// No dataset registered under the given name
    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// A writable handle on the dataset is still open
    #[error("Dataset is open for writing elsewhere: {0}")]
    WriterOpen(String),

    /// Operation needs a file-backed dataset
    #[error("Dataset has no backing file: {0}")]
    NotFileBacked(String),
}
