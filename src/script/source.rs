use std::ops::Deref;
use std::path::{Path, PathBuf};

use log::debug;

use crate::dataset::{Dataset, DatasetError};

/// A dataset argument: an open handle or a path to open read-only
#[derive(Debug)]
pub enum DatasetSource<'a> {
    /// Caller-owned open handle
    Handle(&'a Dataset),
    /// Path of a dataset file
    Path(PathBuf),
}

impl<'a> From<&'a Dataset> for DatasetSource<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        DatasetSource::Handle(dataset)
    }
}

impl From<&str> for DatasetSource<'_> {
    fn from(path: &str) -> Self {
        DatasetSource::Path(PathBuf::from(path))
    }
}

impl From<String> for DatasetSource<'_> {
    fn from(path: String) -> Self {
        DatasetSource::Path(PathBuf::from(path))
    }
}

impl From<&Path> for DatasetSource<'_> {
    fn from(path: &Path) -> Self {
        DatasetSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for DatasetSource<'_> {
    fn from(path: PathBuf) -> Self {
        DatasetSource::Path(path)
    }
}

impl<'a> DatasetSource<'a> {
    /// Open path sources read-only (relative to `base_dir`) and borrow handles
    pub fn resolve(&self, base_dir: &Path) -> Result<ResolvedDataset<'a>, DatasetError> {
        match self {
            DatasetSource::Handle(dataset) => Ok(ResolvedDataset::Borrowed(*dataset)),
            DatasetSource::Path(path) => {
                let full = base_dir.join(path);
                debug!("Resolving dataset path {}", full.display());
                Ok(ResolvedDataset::Owned(Dataset::open(full, false)?))
            }
        }
    }
}

/// A dataset argument after resolution
#[derive(Debug)]
pub enum ResolvedDataset<'a> {
    /// The caller's handle
    Borrowed(&'a Dataset),
    /// A handle opened during resolution, closed when dropped
    Owned(Dataset),
}

impl Deref for ResolvedDataset<'_> {
    type Target = Dataset;

    fn deref(&self) -> &Dataset {
        match self {
            ResolvedDataset::Borrowed(dataset) => dataset,
            ResolvedDataset::Owned(dataset) => dataset,
        }
    }
}
