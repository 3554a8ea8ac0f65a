//! Creation of datasets shaped and calibrated like existing ones.

use std::ops::Range;
use std::path::Path;

use log::debug;

use crate::dataset::{Dataset, DatasetError, DatasetHeader};

use super::error::ScriptError;

/// Copy per-dimension calibration from `source` into `target` for `dims`
pub fn propagate_headers(
    source: &Dataset,
    target: &mut Dataset,
    dims: Range<usize>,
) -> Result<(), DatasetError> {
    for dim in dims {
        source.copy_header(target, dim)?;
    }
    Ok(())
}

/// Create a dataset of `sizes` at `path` and open it for writing
///
/// With a `source`, the dimensions both datasets have (the first
/// `min(sizes.len(), source.n_dim())`) take the source's complex flags and
/// calibration, and the header is flushed before returning.
pub fn create(
    path: &Path,
    sizes: &[usize],
    source: Option<&Dataset>,
    title: &str,
) -> Result<Dataset, ScriptError> {
    let mut header = DatasetHeader::new(title, sizes)?;
    let shared = source.map_or(0, |s| s.n_dim().min(sizes.len()));

    if let Some(source) = source {
        for (dim, block) in header.dims.iter_mut().enumerate().take(shared) {
            block.complex = source.complex(dim)?;
        }
    }

    let mut dataset = Dataset::create_with_header(path, header, true)?;

    if let Some(source) = source {
        propagate_headers(source, &mut dataset, 0..shared)?;
        dataset.write_header()?;
        debug!(
            "Seeded {} dimension header(s) of {} from {}",
            shared,
            dataset.name(),
            source.name()
        );
    }

    Ok(dataset)
}

/// Create a dataset shaped like the first `n_dim` dimensions of `source`
pub fn create_sub(
    path: &Path,
    n_dim: usize,
    source: &Dataset,
    title: &str,
) -> Result<Dataset, ScriptError> {
    if n_dim > source.n_dim() {
        return Err(ScriptError::InvalidArgument(format!(
            "new dataset has more dimensions ({}) than source {} ({})",
            n_dim,
            source.name(),
            source.n_dim()
        )));
    }
    let sizes = &source.sizes()[..n_dim];
    create(path, sizes, Some(source), title)
}
