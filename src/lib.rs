//! # dscript - Scripting Layer for Multidimensional NMR Datasets
//!
//! `dscript` provides short composable calls over file-backed N-dimensional
//! NMR datasets: creating datasets shaped like others, extracting single
//! vectors, combining datasets vector by vector, transforming axis values,
//! picking peaks and exporting to NMRPipe.
//!
//! ## Key Features
//!
//! - **Vector Combination**: `combine` and `combine_n` walk every dimension-0
//!   vector of same-shaped inputs in lock step and write a caller-supplied
//!   function's result to a new dataset cloned from the first input.
//!
//! - **Header Propagation**: datasets created from a source inherit its
//!   per-dimension calibration (spectrometer frequency, sweep width,
//!   reference, label) and complex flags.
//!
//! - **Peak Picking**: a validated request built from named ppm limits drives
//!   a local-extremum picker; lists export to XPK2 text or Parquet.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dscript::prelude::*;
//!
//! let mut ctx = ScriptContext::new(ScriptConfig::with_base_dir("data"));
//!
//! let a = ctx.open("noesy_a.nv", false)?;
//! let b = ctx.open("noesy_b.nv", false)?;
//!
//! // Difference spectrum
//! let stats = ctx.combine(
//!     |va: &DataVector, vb: &DataVector| va.zip_with(vb, |x, y| x - y).expect("same shape"),
//!     "noesy_diff.nv",
//!     &a,
//!     &b,
//! )?;
//! println!("{}", stats);
//!
//! let diff = ctx.open("noesy_diff.nv", false)?;
//! let peaks = ctx.pick(&diff, PickOptions::default().level(5e4).neg(true))?;
//! write_xpk2_file(&peaks, "data/noesy_diff.xpk2")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`dataset`]: dataset files, headers, vectors, outer-coordinate indexing
//!   and the name registry
//! - [`script`]: the scripting session, dataset factory and combination engine
//! - [`peaks`]: pick requests, the peak picker and peak list export
//! - [`pipe`]: NMRPipe export

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod dataset;
pub mod peaks;
pub mod pipe;
pub mod script;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dataset::{
        DataVector, Dataset, DatasetError, DatasetHeader, DatasetRegistry, DimHeader,
        VectorIndexer,
    };
    pub use crate::peaks::{
        write_parquet_file, write_xpk2_file, Peak, PeakList, PeakPickError, PeakPickParams,
        PeakPicker, PickMode, PickOptions, PickRegion,
    };
    pub use crate::pipe::{PipeError, PipeStats, PipeWriter};
    pub use crate::script::{
        CombineStats, DatasetRef, DatasetSource, ScriptConfig, ScriptContext, ScriptError,
    };
}
