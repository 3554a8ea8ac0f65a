//! # Dataset Engine
//!
//! File-backed N-dimensional NMR datasets with per-dimension headers and
//! line-oriented (vector) access.
//!
//! ## File Layout
//!
//! ```text
//! {name}.nv
//! ├── preamble          # magic, version, header block length
//! ├── header (JSON)     # DatasetHeader, padded to a reserved block
//! └── samples           # f32 LE, dimension 0 contiguous
//! ```
//!
//! Along a complex dimension every point stores a (real, imaginary) pair, so
//! the stored extent of that dimension is twice its size. Outer coordinates
//! address stored rows.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dscript::dataset::{DataVector, Dataset};
//!
//! let mut dataset = Dataset::create("hsqc.nv", "HSQC", &[512, 128], true)?;
//!
//! let mut vector = DataVector::from_real(vec![1.0; 512]);
//! vector.set_pt(&[7], 0);
//! dataset.write_vector(&vector)?;
//!
//! for coords in &dataset.indexer(0)? {
//!     dataset.read_vector_at(&mut vector, &coords, 0)?;
//! }
//!
//! dataset.close()?;
//! # Ok::<(), dscript::dataset::DatasetError>(())
//! ```

mod error;
mod header;
mod indexer;
mod io;
mod open;
mod registry;
mod storage;
mod vector;

#[cfg(test)]
mod tests;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

pub use error::DatasetError;
pub use header::{DatasetHeader, DimHeader, MAX_DIMS};
pub use indexer::{CoordinateIter, VectorIndexer};
pub use io::VectorIter;
pub use registry::{DatasetRegistry, RegistryEntry};
pub use storage::{DATASET_FORMAT_VERSION, DATASET_MAGIC};
pub use vector::{DataVector, VectorLocation};

/// Where a dataset's samples live
enum Backing {
    /// Samples in a dataset file
    File {
        file: File,
        path: PathBuf,
        header_block: usize,
        data_offset: u64,
    },
    /// Samples held in memory (single-vector datasets built from a vector)
    Memory { samples: Vec<f32> },
}

/// Handle to an N-dimensional dataset
///
/// A handle opened writable is the only writer of its file. Header edits are
/// flushed by [`Dataset::write_header`] or [`Dataset::close`]; sample writes go
/// straight to disk.
pub struct Dataset {
    name: String,
    header: DatasetHeader,
    backing: Backing,
    writable: bool,
    /// Sample strides per dimension (dimension 0 contiguous)
    strides: Vec<usize>,
    /// Dropped with the handle; registries hold a weak reference to it
    alive: Arc<()>,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name)
            .field("path", &self.path())
            .field("sizes", &self.sizes())
            .field("writable", &self.writable)
            .finish()
    }
}

/// Sample strides for the given header
fn strides_for(header: &DatasetHeader) -> Vec<usize> {
    let mut strides = Vec::with_capacity(header.n_dim());
    let mut stride = 1;
    for dim in &header.dims {
        strides.push(stride);
        stride *= dim.stored_size();
    }
    strides
}
