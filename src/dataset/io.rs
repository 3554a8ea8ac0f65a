use log::trace;

use super::header::{DatasetHeader, DimHeader};
use super::indexer::{CoordinateIter, VectorIndexer};
use super::storage;
use super::{Backing, DataVector, Dataset, DatasetError};

impl Dataset {
    /// Full header
    pub fn header(&self) -> &DatasetHeader {
        &self.header
    }

    /// Number of dimensions
    pub fn n_dim(&self) -> usize {
        self.header.n_dim()
    }

    /// Logical sizes of all dimensions
    pub fn sizes(&self) -> Vec<usize> {
        self.header.dims.iter().map(|d| d.size).collect()
    }

    /// Header block of one dimension
    pub fn dim_header(&self, dim: usize) -> Result<&DimHeader, DatasetError> {
        let n_dim = self.n_dim();
        self.header
            .dims
            .get(dim)
            .ok_or(DatasetError::DimensionOutOfRange { dim, n_dim })
    }

    /// Mutable header block of one dimension
    ///
    /// Size and complex flag fix the file layout; changing them here is
    /// rejected by [`Dataset::write_header`].
    pub fn dim_header_mut(&mut self, dim: usize) -> Result<&mut DimHeader, DatasetError> {
        let n_dim = self.n_dim();
        self.header
            .dims
            .get_mut(dim)
            .ok_or(DatasetError::DimensionOutOfRange { dim, n_dim })
    }

    /// Logical size of a dimension
    pub fn size(&self, dim: usize) -> Result<usize, DatasetError> {
        Ok(self.dim_header(dim)?.size)
    }

    /// Stored extent of a dimension (twice the size when complex)
    pub fn stored_size(&self, dim: usize) -> Result<usize, DatasetError> {
        Ok(self.dim_header(dim)?.stored_size())
    }

    /// Whether a dimension is complex
    pub fn complex(&self, dim: usize) -> Result<bool, DatasetError> {
        Ok(self.dim_header(dim)?.complex)
    }

    /// Copy the calibration of `dim` into the same dimension of `target`
    pub fn copy_header(&self, target: &mut Dataset, dim: usize) -> Result<(), DatasetError> {
        let source = self.dim_header(dim)?;
        target.dim_header_mut(dim)?.copy_calibration_from(source);
        Ok(())
    }

    /// Flush the header to the backing file
    pub fn write_header(&mut self) -> Result<(), DatasetError> {
        if !self.writable {
            return Err(DatasetError::ReadOnly(self.name.clone()));
        }
        self.header.validate()?;
        if self.strides != super::strides_for(&self.header) {
            return Err(DatasetError::InvalidArgument(format!(
                "header of {} changes the sample layout",
                self.name
            )));
        }
        match &mut self.backing {
            Backing::File {
                file, header_block, ..
            } => storage::write_header_block(file, &self.header, *header_block),
            Backing::Memory { .. } => Ok(()),
        }
    }

    /// Outer-coordinate enumeration for vectors along `dim`
    pub fn indexer(&self, dim: usize) -> Result<VectorIndexer, DatasetError> {
        self.dim_header(dim)?;
        let extents: Vec<usize> = self.header.dims.iter().map(|d| d.stored_size()).collect();
        Ok(VectorIndexer::new(dim, &extents))
    }

    /// Iterate over every vector along `dim` in indexer order
    pub fn vectors(&self, dim: usize) -> Result<VectorIter<'_>, DatasetError> {
        let coords = self.indexer(dim)?.iter();
        Ok(VectorIter {
            dataset: self,
            dim,
            coords,
        })
    }

    /// Fill `vector` from the line its location addresses
    ///
    /// The vector is reshaped to the size and complexity of its dimension.
    pub fn read_vector(&self, vector: &mut DataVector) -> Result<(), DatasetError> {
        let dim = vector.location().dim;
        let (start, stride) = self.line_start(dim, &vector.location().coords)?;
        let header = self.dim_header(dim)?;
        vector.reshape(header.size, header.complex);

        let count = header.stored_size();
        let stored = match &self.backing {
            Backing::File {
                file, data_offset, ..
            } => storage::read_line(file, *data_offset, start, stride, count)?,
            Backing::Memory { samples } => (0..count).map(|i| samples[start + i * stride]).collect(),
        };
        vector.fill_from_stored(&stored);
        trace!("Read vector {:?} from {}", vector.location(), self.name);
        Ok(())
    }

    /// Address `vector` at `coords` along `dim`, then read it
    pub fn read_vector_at(
        &self,
        vector: &mut DataVector,
        coords: &[usize],
        dim: usize,
    ) -> Result<(), DatasetError> {
        vector.set_pt(coords, dim);
        self.read_vector(vector)
    }

    /// Write `vector` to the line its location addresses
    pub fn write_vector(&mut self, vector: &DataVector) -> Result<(), DatasetError> {
        if !self.writable {
            return Err(DatasetError::ReadOnly(self.name.clone()));
        }
        let dim = vector.location().dim;
        let (start, stride) = self.line_start(dim, &vector.location().coords)?;
        let header = self.dim_header(dim)?;
        if vector.len() != header.size || vector.is_complex() != header.complex {
            return Err(DatasetError::VectorMismatch(format!(
                "{}-point vector (complex={}) does not fit dimension {} of {} ({} points, complex={})",
                vector.len(),
                vector.is_complex(),
                dim,
                self.name,
                header.size,
                header.complex
            )));
        }

        let stored = vector.to_stored();
        match &mut self.backing {
            Backing::File {
                file, data_offset, ..
            } => storage::write_line(file, *data_offset, start, stride, &stored)?,
            Backing::Memory { samples } => {
                for (i, value) in stored.into_iter().enumerate() {
                    samples[start + i * stride] = value;
                }
            }
        }
        trace!("Wrote vector {:?} to {}", vector.location(), self.name);
        Ok(())
    }

    /// Axis values of a dimension
    pub fn values(&self, dim: usize) -> Result<Vec<f64>, DatasetError> {
        Ok(self.dim_header(dim)?.axis_values())
    }

    /// Replace the axis values of a dimension (in memory; flush with
    /// [`Dataset::write_header`])
    pub fn set_values(&mut self, dim: usize, values: Vec<f64>) -> Result<(), DatasetError> {
        let header = self.dim_header_mut(dim)?;
        if values.len() != header.size {
            return Err(DatasetError::InvalidArgument(format!(
                "{} axis values for dimension {} of {} points",
                values.len(),
                dim,
                header.size
            )));
        }
        header.values = Some(values);
        Ok(())
    }

    /// First sample and stride of the line along `dim` at `coords`
    fn line_start(&self, dim: usize, coords: &[usize]) -> Result<(usize, usize), DatasetError> {
        let n_dim = self.n_dim();
        if dim >= n_dim {
            return Err(DatasetError::DimensionOutOfRange { dim, n_dim });
        }
        if coords.len() != n_dim - 1 {
            return Err(DatasetError::VectorMismatch(format!(
                "{} coordinates for a {}-dimensional dataset",
                coords.len(),
                n_dim
            )));
        }

        let outer_dims = (0..n_dim).filter(|&d| d != dim);
        let mut start = 0;
        for (d, &index) in outer_dims.zip(coords) {
            let extent = self.header.dims[d].stored_size();
            if index >= extent {
                return Err(DatasetError::IndexOutOfRange {
                    dim: d,
                    index,
                    extent,
                });
            }
            start += index * self.strides[d];
        }
        Ok((start, self.strides[dim]))
    }
}

/// Iterator over every vector of a dataset along one dimension
pub struct VectorIter<'a> {
    dataset: &'a Dataset,
    dim: usize,
    coords: CoordinateIter,
}

impl Iterator for VectorIter<'_> {
    type Item = Result<DataVector, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        let coords = self.coords.next()?;
        let mut vector = DataVector::new(0, false);
        vector.set_name(self.dataset.name());
        Some(
            self.dataset
                .read_vector_at(&mut vector, &coords, self.dim)
                .map(|_| vector),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.coords.size_hint()
    }
}
