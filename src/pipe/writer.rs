use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use log::info;

use crate::dataset::Dataset;

use super::error::PipeError;
use super::header::{self, HEADER_LEN};
use super::stats::PipeStats;

/// Largest dimensionality a single pipe stream describes
pub const MAX_PIPE_DIMS: usize = 4;

/// Writes a dataset as a single-file NMRPipe stream
///
/// The stream is the 512-float header followed by every 1-D vector along
/// dimension 0 in indexer order; a complex vector is written as its real
/// block then its imaginary block.
pub struct PipeWriter<'a> {
    dataset: &'a Dataset,
}

impl<'a> PipeWriter<'a> {
    /// Writer for `dataset`; fails for more than four dimensions
    pub fn new(dataset: &'a Dataset) -> Result<Self, PipeError> {
        if dataset.n_dim() > MAX_PIPE_DIMS {
            return Err(PipeError::TooManyDimensions(dataset.n_dim()));
        }
        Ok(Self { dataset })
    }

    /// Header values this writer emits
    pub fn header(&self) -> Vec<f32> {
        header::build(self.dataset)
    }

    /// Stream the header and data to `writer`
    pub fn write<W: Write>(&self, mut writer: W) -> Result<PipeStats, PipeError> {
        let mut stats = PipeStats::default();

        for value in self.header() {
            writer.write_f32::<LittleEndian>(value)?;
        }
        stats.bytes_written += HEADER_LEN as u64 * 4;

        for vector in self.dataset.vectors(0)? {
            let vector = vector?;
            for &value in vector.real() {
                writer.write_f32::<LittleEndian>(value as f32)?;
            }
            if let Some(imag) = vector.imag() {
                for &value in imag {
                    writer.write_f32::<LittleEndian>(value as f32)?;
                }
            }
            let samples = vector.len() * if vector.is_complex() { 2 } else { 1 };
            stats.bytes_written += samples as u64 * 4;
            stats.vectors_written += 1;
        }

        writer.flush()?;
        Ok(stats)
    }

    /// Write the stream to `path`, replacing any existing file
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<PipeStats, PipeError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut stats = self.write(BufWriter::new(file))?;
        stats.path = Some(PathBuf::from(path));

        info!(
            "Exported {} to NMRPipe {}: {}",
            self.dataset.name(),
            path.display(),
            stats
        );
        Ok(stats)
    }
}
