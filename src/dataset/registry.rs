use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Weak;

use log::debug;

use super::{Dataset, DatasetError};

/// A registered dataset: where it lives and how it was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Name the dataset is registered under
    pub name: String,
    /// Backing file
    pub path: PathBuf,
    /// Whether the registering handle was writable
    pub writable: bool,
}

/// Registry of open datasets, keyed by dataset name
///
/// Entries are added when a dataset is opened or created through the
/// registry's owner and removed when it is closed. Only file-backed datasets
/// are registered.
///
/// The registry also tracks the most recent handle it saw for each name. While
/// that handle is writable and alive, [`DatasetRegistry::open`] refuses to hand
/// out another one, so a file never has two writers.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    entries: BTreeMap<String, RegistryEntry>,
    handles: BTreeMap<String, Weak<()>>,
}

impl DatasetRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an open dataset, replacing any entry of the same name
    pub fn register(&mut self, dataset: &Dataset) -> bool {
        let Some(path) = dataset.path() else {
            return false;
        };
        let entry = RegistryEntry {
            name: dataset.name().to_string(),
            path: path.to_path_buf(),
            writable: dataset.is_writable(),
        };
        debug!("Registered dataset {} -> {}", entry.name, entry.path.display());
        self.handles.insert(entry.name.clone(), dataset.liveness());
        self.entries.insert(entry.name.clone(), entry);
        true
    }

    /// Drop the entry for `name`
    pub fn unregister(&mut self, name: &str) -> Option<RegistryEntry> {
        self.handles.remove(name);
        let removed = self.entries.remove(name);
        if removed.is_some() {
            debug!("Unregistered dataset {}", name);
        }
        removed
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Registered entries in name order
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Entry for `name`
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Entry whose backing file is `path`
    pub fn find_path(&self, path: &Path) -> Option<&RegistryEntry> {
        self.entries.values().find(|e| e.path == path)
    }

    /// True while a writable handle registered under `name` is still open
    pub fn has_live_writer(&self, name: &str) -> bool {
        let writable = self.entries.get(name).is_some_and(|e| e.writable);
        writable && self.handles.get(name).is_some_and(|h| h.strong_count() > 0)
    }

    /// Open a fresh handle on a registered dataset with its recorded access
    ///
    /// Fails with [`DatasetError::WriterOpen`] while the registered writable
    /// handle is alive. A new writable handle becomes the tracked writer.
    pub fn open(&mut self, name: &str) -> Result<Dataset, DatasetError> {
        if self.has_live_writer(name) {
            return Err(DatasetError::WriterOpen(name.to_string()));
        }
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DatasetError::NotFound(name.to_string()))?;
        let dataset = Dataset::open(&entry.path, entry.writable)?;
        self.handles.insert(name.to_string(), dataset.liveness());
        Ok(dataset)
    }

    /// Open a read-only handle on a registered dataset
    ///
    /// Readers never conflict with the tracked writer.
    pub fn open_read(&self, name: &str) -> Result<Dataset, DatasetError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DatasetError::NotFound(name.to_string()))?;
        Dataset::open(&entry.path, false)
    }

    /// Number of registered datasets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
