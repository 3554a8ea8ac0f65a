use std::fmt;
use std::path::PathBuf;

/// Statistics from an NMRPipe export
#[derive(Debug, Clone, Default)]
pub struct PipeStats {
    /// Output file, when written to a path
    pub path: Option<PathBuf>,
    /// Number of 1-D vectors written
    pub vectors_written: usize,
    /// Total bytes written, header included
    pub bytes_written: u64,
}

impl fmt::Display for PipeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vectors, {} bytes",
            self.vectors_written, self.bytes_written
        )
    }
}
