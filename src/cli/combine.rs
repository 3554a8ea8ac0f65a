use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

use dscript::dataset::DataVector;
use dscript::script::{DatasetSource, ScriptContext};

/// Built-in vector operators for `dscript combine`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineOp {
    /// Sum of all inputs
    #[default]
    Add,
    /// First input minus every other input
    Subtract,
    /// Component-wise product of all inputs
    Multiply,
    /// Component-wise mean of all inputs
    Mean,
    /// The first input unchanged
    First,
}

impl CombineOp {
    /// Apply the operator to one set of same-shaped vectors
    pub fn apply(self, vectors: &[DataVector]) -> DataVector {
        let Some((first, rest)) = vectors.split_first() else {
            return DataVector::new(0, false);
        };
        let mut result = first.clone();
        let fold: fn(f64, f64) -> f64 = match self {
            CombineOp::First => return result,
            CombineOp::Add | CombineOp::Mean => |a, b| a + b,
            CombineOp::Subtract => |a, b| a - b,
            CombineOp::Multiply => |a, b| a * b,
        };

        for vector in rest {
            fold_into(result.real_mut(), vector.real(), fold);
            if let (Some(acc), Some(imag)) = (result.imag_mut(), vector.imag()) {
                fold_into(acc, imag, fold);
            }
        }

        if self == CombineOp::Mean {
            let n = vectors.len() as f64;
            result = result.map(|v| v / n);
        }
        result
    }
}

fn fold_into(acc: &mut [f64], values: &[f64], fold: fn(f64, f64) -> f64) {
    for (a, &b) in acc.iter_mut().zip(values) {
        *a = fold(*a, b);
    }
}

/// Combine `inputs` into `output` with a built-in operator
pub fn run(inputs: Vec<PathBuf>, output: PathBuf, op: CombineOp) -> Result<()> {
    let ctx = ScriptContext::default();
    let sources: Vec<DatasetSource> = inputs.into_iter().map(DatasetSource::from).collect();

    let stats = ctx
        .combine_n(|vectors: &[DataVector]| op.apply(vectors), &output, &sources)
        .with_context(|| format!("Failed to combine into {}", output.display()))?;

    println!("{} ({:?})", stats, op);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors() -> Vec<DataVector> {
        vec![
            DataVector::from_real(vec![6.0, 8.0]),
            DataVector::from_real(vec![2.0, 4.0]),
            DataVector::from_real(vec![1.0, 0.0]),
        ]
    }

    #[test]
    fn test_operators() {
        let vs = vectors();
        assert_eq!(CombineOp::Add.apply(&vs).real(), &[9.0, 12.0]);
        assert_eq!(CombineOp::Subtract.apply(&vs).real(), &[3.0, 4.0]);
        assert_eq!(CombineOp::Multiply.apply(&vs).real(), &[12.0, 0.0]);
        assert_eq!(CombineOp::Mean.apply(&vs).real(), &[3.0, 4.0]);
        assert_eq!(CombineOp::First.apply(&vs).real(), &[6.0, 8.0]);
    }

    #[test]
    fn test_operators_cover_imaginary_part() {
        let vs = vec![
            DataVector::from_complex(vec![1.0], vec![10.0]).unwrap(),
            DataVector::from_complex(vec![2.0], vec![20.0]).unwrap(),
        ];
        let sum = CombineOp::Add.apply(&vs);
        assert_eq!(sum.real(), &[3.0]);
        assert_eq!(sum.imag(), Some(&[30.0][..]));
    }
}
