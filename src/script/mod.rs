//! # Scripting Layer
//!
//! Short composable calls over the dataset engine and the peak picker:
//!
//! - dataset lifecycle: [`ScriptContext::open`], [`ScriptContext::get`],
//!   [`ScriptContext::close`], [`ScriptContext::names`]
//! - derivation: [`ScriptContext::create`], [`ScriptContext::create_sub`],
//!   [`ScriptContext::extract`]
//! - combination: [`ScriptContext::combine`], [`ScriptContext::combine_n`]
//! - transforms and analysis: [`ScriptContext::apply_to_values`],
//!   [`ScriptContext::pick`], [`ScriptContext::to_pipe`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use dscript::dataset::DataVector;
//! use dscript::peaks::PickOptions;
//! use dscript::script::{DatasetSource, ScriptContext};
//! use std::path::Path;
//!
//! let mut ctx = ScriptContext::default();
//!
//! // Average three repeat acquisitions
//! let inputs: Vec<DatasetSource> = vec!["run1.nv".into(), "run2.nv".into(), "run3.nv".into()];
//! ctx.combine_n(
//!     |vs: &[DataVector]| {
//!         let n = vs.len() as f64;
//!         let mut sum = vs[0].clone();
//!         for v in &vs[1..] {
//!             sum = sum.zip_with(v, |a, b| a + b).expect("same shape");
//!         }
//!         sum.map(|x| x / n)
//!     },
//!     Path::new("mean.nv"),
//!     &inputs,
//! )?;
//!
//! let mean = ctx.open("mean.nv", false)?;
//! let peaks = ctx.pick(&mean, PickOptions::default().level(1e5).limit("x", 7.0, 9.5))?;
//! println!("{} peaks", peaks.len());
//! # Ok::<(), dscript::script::ScriptError>(())
//! ```

pub mod combine;
mod error;
pub mod factory;
mod source;


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::dataset::{DataVector, Dataset, DatasetError, DatasetRegistry, RegistryEntry};
use crate::peaks::{PeakList, PeakPickParams, PeakPicker, PickMode, PickOptions};
use crate::pipe::{PipeStats, PipeWriter};

pub use combine::CombineStats;
pub use error::ScriptError;
pub use source::{DatasetSource, ResolvedDataset};

/// Configuration for a [`ScriptContext`]
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Directory relative dataset paths are resolved against
    pub base_dir: PathBuf,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }
}

impl ScriptConfig {
    /// Configuration resolving paths against `base_dir`
    pub fn with_base_dir<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

/// A dataset named by handle or by registry name
#[derive(Debug)]
pub enum DatasetRef<'a> {
    /// Caller-owned handle
    Handle(&'a Dataset),
    /// Name of a registered dataset
    Name(String),
}

impl<'a> From<&'a Dataset> for DatasetRef<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        DatasetRef::Handle(dataset)
    }
}

impl<'a> From<&'a mut Dataset> for DatasetRef<'a> {
    fn from(dataset: &'a mut Dataset) -> Self {
        DatasetRef::Handle(dataset)
    }
}

impl From<&str> for DatasetRef<'_> {
    fn from(name: &str) -> Self {
        DatasetRef::Name(name.to_string())
    }
}

impl From<String> for DatasetRef<'_> {
    fn from(name: String) -> Self {
        DatasetRef::Name(name)
    }
}

/// Scripting session: dataset registry, held peak lists and path resolution
#[derive(Debug, Default)]
pub struct ScriptContext {
    config: ScriptConfig,
    registry: DatasetRegistry,
    peak_lists: BTreeMap<String, PeakList>,
}

impl ScriptContext {
    /// New session with the given configuration
    pub fn new(config: ScriptConfig) -> Self {
        Self {
            config,
            registry: DatasetRegistry::new(),
            peak_lists: BTreeMap::new(),
        }
    }

    /// Session configuration
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// The dataset registry
    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    /// Resolve `path` against the base directory
    pub fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.config.base_dir.join(path)
    }

    // ==================== Dataset lifecycle ====================

    /// Open a dataset and register it under its name
    pub fn open<P: AsRef<Path>>(&mut self, path: P, writable: bool) -> Result<Dataset, ScriptError> {
        let dataset = Dataset::open(self.resolve_path(path), writable)?;
        self.registry.register(&dataset);
        Ok(dataset)
    }

    /// Names of registered datasets
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Registered datasets
    pub fn datasets(&self) -> Vec<RegistryEntry> {
        self.registry.entries().cloned().collect()
    }

    /// New handle on a registered dataset, with the access it was registered with
    ///
    /// Fails while a writable handle on the dataset is still open; use that
    /// handle instead.
    pub fn get(&mut self, name: &str) -> Result<Dataset, ScriptError> {
        self.registry.open(name).map_err(lookup_error)
    }

    /// Close a dataset and drop its registry entry
    pub fn close(&mut self, dataset: Dataset) -> Result<(), ScriptError> {
        let registered_here = match (self.registry.get(dataset.name()), dataset.path()) {
            (Some(entry), Some(path)) => entry.path == path,
            _ => false,
        };
        if registered_here {
            self.registry.unregister(dataset.name());
        }
        dataset.close()?;
        Ok(())
    }

    // ==================== Derivation ====================

    /// Create a dataset of `sizes`, optionally seeded from `source`'s headers
    pub fn create<P: AsRef<Path>>(
        &mut self,
        path: P,
        sizes: &[usize],
        source: Option<&Dataset>,
        title: &str,
    ) -> Result<Dataset, ScriptError> {
        let dataset = factory::create(&self.resolve_path(path), sizes, source, title)?;
        self.registry.register(&dataset);
        Ok(dataset)
    }

    /// Create a dataset shaped like `source`'s first `n_dim` dimensions
    pub fn create_sub<'a, P: AsRef<Path>>(
        &mut self,
        path: P,
        n_dim: usize,
        source: impl Into<DatasetSource<'a>>,
        title: &str,
    ) -> Result<Dataset, ScriptError> {
        let source: DatasetSource<'a> = source.into();
        let source = source.resolve(&self.config.base_dir)?;
        let dataset = factory::create_sub(&self.resolve_path(path), n_dim, &source, title)?;
        self.registry.register(&dataset);
        Ok(dataset)
    }

    /// Zeroed vector sized for dimension `dim` of `dataset`
    pub fn get_vector(&self, dataset: &Dataset, dim: usize) -> Result<DataVector, ScriptError> {
        let header = dataset.dim_header(dim)?;
        Ok(DataVector::new(header.size, header.complex))
    }

    /// Read one vector along `dim` and wrap it as a single-vector dataset
    ///
    /// The new dataset is named `<base>_d<dim+1>_<i+1>...` where `<base>` is
    /// the source name without its extension.
    pub fn extract(
        &self,
        dataset: &Dataset,
        dim: usize,
        indices: &[usize],
    ) -> Result<Dataset, ScriptError> {
        let header = dataset.dim_header(dim)?.clone();
        if indices.len() + 1 != dataset.n_dim() {
            return Err(ScriptError::InvalidArgument(format!(
                "extract from {}-dimensional {} needs {} indices, got {}",
                dataset.n_dim(),
                dataset.name(),
                dataset.n_dim() - 1,
                indices.len()
            )));
        }

        let mut vector = DataVector::new(header.size, header.complex);
        dataset.read_vector_at(&mut vector, indices, dim)?;
        let name = extract_name(dataset.name(), dim, indices);
        debug!("Extracted {} from {}", name, dataset.name());
        vector.set_name(name);

        Ok(Dataset::from_vector(&vector, Some(header)))
    }

    /// Export to NMRPipe format
    pub fn to_pipe<P: AsRef<Path>>(&self, dataset: &Dataset, path: P) -> Result<PipeStats, ScriptError> {
        let stats = PipeWriter::new(dataset)?.save_file(self.resolve_path(path))?;
        Ok(stats)
    }

    // ==================== Combination ====================

    /// Combine two datasets vector by vector into `out_path`
    pub fn combine<F, P>(
        &self,
        func: F,
        out_path: P,
        a: &Dataset,
        b: &Dataset,
    ) -> Result<CombineStats, ScriptError>
    where
        F: FnMut(&DataVector, &DataVector) -> DataVector,
        P: AsRef<Path>,
    {
        combine::combine(func, &self.resolve_path(out_path), a, b)
    }

    /// Combine any number of datasets (handles or paths) into `out_path`
    pub fn combine_n<F, P>(
        &self,
        func: F,
        out_path: P,
        inputs: &[DatasetSource<'_>],
    ) -> Result<CombineStats, ScriptError>
    where
        F: FnMut(&[DataVector]) -> DataVector,
        P: AsRef<Path>,
    {
        let resolved = inputs
            .iter()
            .map(|input| input.resolve(&self.config.base_dir))
            .collect::<Result<Vec<_>, _>>()?;
        let handles: Vec<&Dataset> = resolved.iter().map(|r| &**r).collect();
        combine::combine_n(func, &self.resolve_path(out_path), &handles)
    }

    // ==================== Transforms ====================

    /// Map `f` over the axis values of one dimension
    ///
    /// The header is flushed when the dataset is writable.
    pub fn apply_to_values<F>(&self, dataset: &mut Dataset, dim: usize, f: F) -> Result<(), ScriptError>
    where
        F: FnMut(f64) -> f64,
    {
        let values: Vec<f64> = dataset.values(dim)?.into_iter().map(f).collect();
        dataset.set_values(dim, values)?;
        if dataset.is_writable() {
            dataset.write_header()?;
        }
        Ok(())
    }

    /// [`ScriptContext::apply_to_values`] on a registered dataset
    ///
    /// The dataset must have been registered writable, and any handle that
    /// registered it must be closed, so the new values reach the file.
    pub fn apply_to_values_named<F>(&mut self, name: &str, dim: usize, f: F) -> Result<(), ScriptError>
    where
        F: FnMut(f64) -> f64,
    {
        let mut dataset = self.get(name)?;
        if !dataset.is_writable() {
            return Err(ScriptError::Dataset(DatasetError::ReadOnly(name.to_string())));
        }
        self.apply_to_values(&mut dataset, dim, f)?;
        dataset.close()?;
        Ok(())
    }

    // ==================== Peak picking ====================

    /// Pick peaks in a dataset
    ///
    /// Unknown dimension names in the limits fail immediately. In
    /// [`PickMode::Append`] the new peaks extend the list of the same name held
    /// by this session; in [`PickMode::New`] that list is replaced.
    pub fn pick<'a>(
        &mut self,
        dataset: impl Into<DatasetRef<'a>>,
        options: PickOptions,
    ) -> Result<PeakList, ScriptError> {
        let dataset: DatasetRef<'a> = dataset.into();
        let resolved = match dataset {
            DatasetRef::Handle(dataset) => ResolvedDataset::Borrowed(dataset),
            DatasetRef::Name(name) => {
                ResolvedDataset::Owned(self.registry.open_read(&name).map_err(lookup_error)?)
            }
        };

        let list_name = options
            .list_name
            .clone()
            .unwrap_or_else(|| PeakList::name_for_dataset(resolved.name()));
        let params = PeakPickParams::new(&resolved, &list_name, &options)?;
        let picked = PeakPicker::new(params).pick(&resolved)?;

        let list = match (options.mode, self.peak_lists.remove(&list_name)) {
            (PickMode::Append, Some(mut existing)) => {
                existing.append(picked);
                existing
            }
            _ => picked,
        };
        info!("Peak list {} holds {} peaks", list.name, list.len());
        self.peak_lists.insert(list_name, list.clone());
        Ok(list)
    }

    /// Peak list held by this session
    pub fn peak_list(&self, name: &str) -> Option<&PeakList> {
        self.peak_lists.get(name)
    }

    /// Names of peak lists held by this session
    pub fn peak_list_names(&self) -> Vec<String> {
        self.peak_lists.keys().cloned().collect()
    }
}

fn lookup_error(e: DatasetError) -> ScriptError {
    match e {
        DatasetError::NotFound(name) => ScriptError::UnknownDataset(name),
        other => ScriptError::Dataset(other),
    }
}

/// `<base>_d<dim+1>_<i+1>...` for an extracted vector
pub(crate) fn extract_name(dataset_name: &str, dim: usize, indices: &[usize]) -> String {
    let base = match dataset_name.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => dataset_name,
    };
    let mut name = format!("{}_d{}", base, dim + 1);
    for index in indices {
        name.push_str(&format!("_{}", index + 1));
    }
    name
}
