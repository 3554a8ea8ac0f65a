use super::error::DatasetError;

/// Position of a vector inside its dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorLocation {
    /// Dimension the vector runs along
    pub dim: usize,
    /// Indices along every other dimension, ascending dimension order
    pub coords: Vec<usize>,
}

/// One line of samples from a dataset
///
/// Real vectors carry only `real`; complex vectors carry a matching
/// `imag` buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVector {
    name: String,
    real: Vec<f64>,
    imag: Option<Vec<f64>>,
    location: VectorLocation,
}

impl DataVector {
    /// Zero-filled vector of `size` points
    pub fn new(size: usize, complex: bool) -> Self {
        Self {
            name: String::new(),
            real: vec![0.0; size],
            imag: complex.then(|| vec![0.0; size]),
            location: VectorLocation::default(),
        }
    }

    /// Real vector from raw samples
    pub fn from_real(values: Vec<f64>) -> Self {
        Self {
            name: String::new(),
            real: values,
            imag: None,
            location: VectorLocation::default(),
        }
    }

    /// Complex vector from separate real and imaginary parts
    pub fn from_complex(real: Vec<f64>, imag: Vec<f64>) -> Result<Self, DatasetError> {
        if real.len() != imag.len() {
            return Err(DatasetError::VectorMismatch(format!(
                "real part has {} points, imaginary part {}",
                real.len(),
                imag.len()
            )));
        }
        Ok(Self {
            name: String::new(),
            real,
            imag: Some(imag),
            location: VectorLocation::default(),
        })
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// True when the vector has no points
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Whether the vector carries an imaginary part
    pub fn is_complex(&self) -> bool {
        self.imag.is_some()
    }

    /// Real part
    pub fn real(&self) -> &[f64] {
        &self.real
    }

    /// Mutable real part
    pub fn real_mut(&mut self) -> &mut [f64] {
        &mut self.real
    }

    /// Imaginary part, if complex
    pub fn imag(&self) -> Option<&[f64]> {
        self.imag.as_deref()
    }

    /// Mutable imaginary part, if complex
    pub fn imag_mut(&mut self) -> Option<&mut [f64]> {
        self.imag.as_deref_mut()
    }

    /// Vector name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the vector
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Where the vector was read from or will be written to
    pub fn location(&self) -> &VectorLocation {
        &self.location
    }

    /// Address the vector at `coords` along `dim`
    pub fn set_pt(&mut self, coords: &[usize], dim: usize) {
        self.location.dim = dim;
        self.location.coords.clear();
        self.location.coords.extend_from_slice(coords);
    }

    /// Reshape in place, zeroing the contents when the shape changes
    pub(crate) fn reshape(&mut self, size: usize, complex: bool) {
        if self.real.len() != size {
            self.real = vec![0.0; size];
        }
        match (&mut self.imag, complex) {
            (Some(imag), true) if imag.len() == size => {}
            (_, true) => self.imag = Some(vec![0.0; size]),
            (_, false) => self.imag = None,
        }
    }

    /// Apply `f` to every component (real and imaginary)
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            name: self.name.clone(),
            real: self.real.iter().map(|&v| f(v)).collect(),
            imag: self
                .imag
                .as_ref()
                .map(|imag| imag.iter().map(|&v| f(v)).collect()),
            location: self.location.clone(),
        }
    }

    /// Combine two vectors component-wise
    ///
    /// The result keeps `self`'s name and location. Both vectors must have the
    /// same length and complexity.
    pub fn zip_with(
        &self,
        other: &DataVector,
        mut f: impl FnMut(f64, f64) -> f64,
    ) -> Result<Self, DatasetError> {
        if self.len() != other.len() || self.is_complex() != other.is_complex() {
            return Err(DatasetError::VectorMismatch(format!(
                "cannot combine {}-point {} vector with {}-point {} vector",
                self.len(),
                kind(self.is_complex()),
                other.len(),
                kind(other.is_complex())
            )));
        }
        let real = self
            .real
            .iter()
            .zip(&other.real)
            .map(|(&a, &b)| f(a, b))
            .collect();
        let imag = match (&self.imag, &other.imag) {
            (Some(a), Some(b)) => Some(a.iter().zip(b).map(|(&a, &b)| f(a, b)).collect()),
            _ => None,
        };
        Ok(Self {
            name: self.name.clone(),
            real,
            imag,
            location: self.location.clone(),
        })
    }

    /// Interleave into stored (re, im) order
    pub(crate) fn to_stored(&self) -> Vec<f32> {
        match &self.imag {
            Some(imag) => self
                .real
                .iter()
                .zip(imag)
                .flat_map(|(&re, &im)| [re as f32, im as f32])
                .collect(),
            None => self.real.iter().map(|&v| v as f32).collect(),
        }
    }

    /// Fill from stored samples, de-interleaving when complex
    pub(crate) fn fill_from_stored(&mut self, stored: &[f32]) {
        match &mut self.imag {
            Some(imag) => {
                for (i, pair) in stored.chunks_exact(2).enumerate() {
                    self.real[i] = pair[0] as f64;
                    imag[i] = pair[1] as f64;
                }
            }
            None => {
                for (dst, &src) in self.real.iter_mut().zip(stored) {
                    *dst = src as f64;
                }
            }
        }
    }
}

fn kind(complex: bool) -> &'static str {
    if complex {
        "complex"
    } else {
        "real"
    }
}
