use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use log::{debug, info};

use super::header::{DatasetHeader, DimHeader};
use super::storage::{self, PREAMBLE_LEN};
use super::{strides_for, Backing, DataVector, Dataset, DatasetError};

impl Dataset {
    /// Create a dataset of the given sizes and open it for writing
    ///
    /// All samples start at zero. Fails if the file exists and `overwrite`
    /// is false.
    pub fn create<P: AsRef<Path>>(
        path: P,
        title: &str,
        sizes: &[usize],
        overwrite: bool,
    ) -> Result<Self, DatasetError> {
        let header = DatasetHeader::new(title, sizes)?;
        Self::create_with_header(path, header, overwrite)
    }

    /// Create a dataset laid out by a prepared header and open it for writing
    pub fn create_with_header<P: AsRef<Path>>(
        path: P,
        header: DatasetHeader,
        overwrite: bool,
    ) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        header.validate()?;

        if path.as_os_str().is_empty() {
            return Err(DatasetError::InvalidArgument("empty dataset path".to_string()));
        }
        if path.exists() && !overwrite {
            return Err(DatasetError::InvalidArgument(format!(
                "dataset already exists: {}",
                path.display()
            )));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let json_len = serde_json::to_vec(&header)?.len();
        let header_block = storage::header_block_for(&header, json_len);
        storage::write_header_block(&mut file, &header, header_block)?;

        let data_offset = PREAMBLE_LEN + header_block as u64;
        file.set_len(data_offset + header.stored_len() as u64 * 4)?;

        info!(
            "Created dataset {} with sizes {:?}",
            path.display(),
            header.dims.iter().map(|d| d.size).collect::<Vec<_>>()
        );

        Ok(Self {
            name: file_name(path),
            strides: strides_for(&header),
            header,
            backing: Backing::File {
                file,
                path: path.to_path_buf(),
                header_block,
                data_offset,
            },
            writable: true,
            alive: Arc::new(()),
        })
    }

    /// Open an existing dataset file
    pub fn open<P: AsRef<Path>>(path: P, writable: bool) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let mut file = if writable {
            OpenOptions::new().read(true).write(true).open(path)?
        } else {
            File::open(path)?
        };

        let (header, header_block) = storage::read_header_block(&mut file)?;
        let data_offset = PREAMBLE_LEN + header_block as u64;

        let expected = data_offset + header.stored_len() as u64 * 4;
        let actual = file.metadata()?.len();
        if actual < expected {
            return Err(DatasetError::InvalidFormat(format!(
                "{} is truncated: {} bytes, expected {}",
                path.display(),
                actual,
                expected
            )));
        }

        debug!(
            "Opened dataset {} ({} dims, writable={})",
            path.display(),
            header.n_dim(),
            writable
        );

        Ok(Self {
            name: file_name(path),
            strides: strides_for(&header),
            header,
            backing: Backing::File {
                file,
                path: path.to_path_buf(),
                header_block,
                data_offset,
            },
            writable,
            alive: Arc::new(()),
        })
    }

    /// Wrap a single vector as a one-dimensional in-memory dataset
    ///
    /// The dataset takes the vector's name. `dim_header` supplies the axis
    /// calibration; its size and complex flag are overridden by the vector.
    pub fn from_vector(vector: &DataVector, dim_header: Option<DimHeader>) -> Self {
        let mut dim = dim_header.unwrap_or_else(|| DimHeader::new(vector.len(), 0));
        dim.size = vector.len();
        dim.complex = vector.is_complex();
        if dim.values.as_ref().is_some_and(|v| v.len() != dim.size) {
            dim.values = None;
        }

        let header = DatasetHeader {
            title: vector.name().to_string(),
            created: chrono::Utc::now(),
            dims: vec![dim],
        };

        Self {
            name: vector.name().to_string(),
            strides: strides_for(&header),
            header,
            backing: Backing::Memory {
                samples: vector.to_stored(),
            },
            writable: true,
            alive: Arc::new(()),
        }
    }

    /// Flush the header (when writable) and release the file
    pub fn close(mut self) -> Result<(), DatasetError> {
        if self.writable {
            if let Backing::File { .. } = self.backing {
                self.write_header()?;
            }
        }
        if let Backing::File { file, path, .. } = self.backing {
            if self.writable {
                file.sync_all()?;
            }
            debug!("Closed dataset {}", path.display());
        }
        Ok(())
    }

    /// Dataset name (file name for file-backed datasets)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File { path, .. } => Some(path),
            Backing::Memory { .. } => None,
        }
    }

    /// Absolute, symlink-resolved path of the backing file
    pub fn canonical_path(&self) -> Result<PathBuf, DatasetError> {
        match &self.backing {
            Backing::File { path, .. } => Ok(path.canonicalize()?),
            Backing::Memory { .. } => Err(DatasetError::NotFileBacked(self.name.clone())),
        }
    }

    /// Whether writes are permitted
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Weak reference that expires once this handle is closed or dropped
    pub(crate) fn liveness(&self) -> Weak<()> {
        Arc::downgrade(&self.alive)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
