//! Lock-step combination of same-shaped datasets, one dimension-0 vector at a
//! time.
//!
//! The output file starts as a byte copy of the first input, so it inherits
//! that input's shape and header. Vectors are read and written in
//! [`VectorIndexer`](crate::dataset::VectorIndexer) order. A failure part-way
//! leaves the output truncated; it is not removed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::dataset::{DataVector, Dataset};

use super::error::ScriptError;

/// Traversal dimension of every combination
const COMBINE_DIM: usize = 0;

/// Statistics from a completed combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineStats {
    /// Number of input datasets
    pub inputs: usize,
    /// Number of vectors written to the output
    pub vectors_written: usize,
    /// Output dataset path
    pub output: PathBuf,
}

impl fmt::Display for CombineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Combined {} datasets into {} ({} vectors)",
            self.inputs,
            self.output.display(),
            self.vectors_written
        )
    }
}

/// Combine two datasets vector by vector
///
/// For each dimension-0 vector position, writes `func(a, b)` to the same
/// position of a new dataset at `out_path` cloned from `a`.
pub fn combine<F>(
    mut func: F,
    out_path: &Path,
    a: &Dataset,
    b: &Dataset,
) -> Result<CombineStats, ScriptError>
where
    F: FnMut(&DataVector, &DataVector) -> DataVector,
{
    check_shapes(&[a, b])?;
    let mut output = clone_first(&[a, b], out_path)?;

    let mut written = 0;
    for (va, vb) in a.vectors(COMBINE_DIM)?.zip(b.vectors(COMBINE_DIM)?) {
        let (va, vb) = (va?, vb?);
        let mut result = func(&va, &vb);
        result.set_pt(&va.location().coords, COMBINE_DIM);
        output.write_vector(&result)?;
        written += 1;
    }
    output.close()?;

    let stats = CombineStats {
        inputs: 2,
        vectors_written: written,
        output: out_path.to_path_buf(),
    };
    info!("{}", stats);
    Ok(stats)
}

/// Combine any number of datasets vector by vector
///
/// For each coordinate of `inputs[0]`'s dimension-0 indexer, reads one vector
/// from every input and writes `func(&vectors)` to the same coordinate of a
/// new dataset at `out_path` cloned from `inputs[0]`. The vector buffers are
/// reused between steps.
pub fn combine_n<F>(
    mut func: F,
    out_path: &Path,
    inputs: &[&Dataset],
) -> Result<CombineStats, ScriptError>
where
    F: FnMut(&[DataVector]) -> DataVector,
{
    let first = *inputs
        .first()
        .ok_or_else(|| ScriptError::InvalidArgument("no datasets to combine".to_string()))?;
    check_shapes(inputs)?;
    let mut output = clone_first(inputs, out_path)?;

    let size = first.size(COMBINE_DIM)?;
    let complex = first.complex(COMBINE_DIM)?;
    let mut vectors: Vec<DataVector> = inputs
        .iter()
        .map(|input| {
            let mut vector = DataVector::new(size, complex);
            vector.set_name(input.name());
            vector
        })
        .collect();
    let mut index = vec![0usize; first.n_dim() - 1];

    let mut written = 0;
    for coords in &first.indexer(COMBINE_DIM)? {
        index.copy_from_slice(&coords);
        for (vector, input) in vectors.iter_mut().zip(inputs) {
            input.read_vector_at(vector, &index, COMBINE_DIM)?;
        }
        let mut result = func(&vectors);
        result.set_pt(&index, COMBINE_DIM);
        output.write_vector(&result)?;
        written += 1;
    }
    output.close()?;

    let stats = CombineStats {
        inputs: inputs.len(),
        vectors_written: written,
        output: out_path.to_path_buf(),
    };
    info!("{}", stats);
    Ok(stats)
}

/// Every input must match the first in dimensionality, sizes and complex flags
pub(crate) fn check_shapes(inputs: &[&Dataset]) -> Result<(), ScriptError> {
    let Some((first, rest)) = inputs.split_first() else {
        return Ok(());
    };
    let expected = shape_of(first);
    for (i, input) in rest.iter().enumerate() {
        let actual = shape_of(input);
        if actual != expected {
            return Err(ScriptError::ShapeMismatch(format!(
                "input {} ({}) has shape {:?}, expected {:?} from {}",
                i + 2,
                input.name(),
                actual,
                expected,
                first.name()
            )));
        }
    }
    Ok(())
}

fn shape_of(dataset: &Dataset) -> Vec<(usize, bool)> {
    dataset
        .header()
        .dims
        .iter()
        .map(|d| (d.size, d.complex))
        .collect()
}

/// Byte-copy the first input to `out_path` and open the copy for writing
///
/// `out_path` must not name any of the inputs: the copy would overwrite it
/// while it is still being read.
fn clone_first(inputs: &[&Dataset], out_path: &Path) -> Result<Dataset, ScriptError> {
    let Some(first) = inputs.first() else {
        return Err(ScriptError::InvalidArgument("no datasets to combine".to_string()));
    };
    let source = first.canonical_path().map_err(|_| {
        ScriptError::InvalidArgument(format!(
            "first input {} has no backing file to clone",
            first.name()
        ))
    })?;

    if let Ok(existing) = out_path.canonicalize() {
        for (i, input) in inputs.iter().enumerate() {
            if input.canonical_path().is_ok_and(|path| path == existing) {
                return Err(ScriptError::InvalidArgument(format!(
                    "output {} is input {} ({})",
                    out_path.display(),
                    i + 1,
                    input.name()
                )));
            }
        }
    }

    let bytes = fs::copy(&source, out_path)?;
    debug!(
        "Cloned {} to {} ({} bytes)",
        source.display(),
        out_path.display(),
        bytes
    );
    Ok(Dataset::open(out_path, true)?)
}
