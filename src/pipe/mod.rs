//! # NMRPipe Export
//!
//! Writes datasets of up to four dimensions as a single NMRPipe stream:
//! a 512-float header followed by float32 samples, one 1-D record per row
//! of dimension 0.
//!
//! ```rust,no_run
//! use dscript::dataset::Dataset;
//! use dscript::pipe::PipeWriter;
//!
//! let dataset = Dataset::open("hsqc.nv", false)?;
//! let stats = PipeWriter::new(&dataset)?.save_file("hsqc.ft2")?;
//! println!("{}", stats);
//! # Ok::<(), dscript::pipe::PipeError>(())
//! ```

mod error;
mod header;
mod stats;
mod writer;


pub use error::PipeError;
pub use header::HEADER_LEN;
pub use stats::PipeStats;
pub use writer::{PipeWriter, MAX_PIPE_DIMS};
