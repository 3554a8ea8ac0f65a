//! # Peak Picking
//!
//! Request building, local-extremum detection and peak list export.
//!
//! A pick is described by [`PickOptions`] (caller-facing, with defaults) and
//! validated against a dataset into an immutable [`PeakPickParams`]. The
//! [`PeakPicker`] runs the request and returns a [`PeakList`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dscript::dataset::Dataset;
//! use dscript::peaks::{write_xpk2_file, PeakPickParams, PeakPicker, PickOptions};
//!
//! let dataset = Dataset::open("hsqc.nv", false)?;
//! let options = PickOptions::default().level(1e5).limit("x", 6.5, 9.5);
//! let params = PeakPickParams::new(&dataset, "hsqc", &options)?;
//!
//! let list = PeakPicker::new(params).pick(&dataset)?;
//! write_xpk2_file(&list, "hsqc.xpk2")?;
//! # Ok::<(), dscript::peaks::PeakPickError>(())
//! ```

mod error;
mod params;
mod picker;
mod types;
mod writer;


pub use error::PeakPickError;
pub use params::{dim_index, PeakPickParams, PickMode, PickOptions, PickRegion, DIM_NAMES};
pub use picker::PeakPicker;
pub use types::{Peak, PeakDim, PeakList, SpectralDim};
pub use writer::{
    peak_table, peak_table_schema, write_parquet, write_parquet_file, write_xpk2,
    write_xpk2_file,
};
