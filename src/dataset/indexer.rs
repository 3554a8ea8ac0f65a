/// Enumerates the outer coordinates of a dataset for one traversal dimension
///
/// Coordinates hold one index per non-traversed dimension in ascending
/// dimension order. The first outer dimension varies fastest and the last one
/// is the outermost loop, which follows the on-disk sample order.
///
/// The indexer is a description, not a cursor: every call to
/// [`VectorIndexer::iter`] starts a fresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorIndexer {
    dim: usize,
    extents: Vec<usize>,
}

impl VectorIndexer {
    /// Indexer over `extents` (the stored extents of all dimensions) that
    /// skips `dim`
    pub(crate) fn new(dim: usize, all_extents: &[usize]) -> Self {
        let extents = all_extents
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != dim)
            .map(|(_, &extent)| extent)
            .collect();
        Self { dim, extents }
    }

    /// Indexer over every coordinate of `extents`, with no traversal
    /// dimension; [`VectorIndexer::dim`] reports `extents.len()`
    pub(crate) fn full(extents: &[usize]) -> Self {
        Self {
            dim: extents.len(),
            extents: extents.to_vec(),
        }
    }

    /// Traversal dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Extents of the outer dimensions
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Number of coordinates a full pass yields
    pub fn len(&self) -> usize {
        self.extents.iter().product()
    }

    /// True when a pass yields nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a new pass
    pub fn iter(&self) -> CoordinateIter {
        let current = if self.extents.iter().any(|&e| e == 0) {
            None
        } else {
            Some(vec![0; self.extents.len()])
        };
        CoordinateIter {
            extents: self.extents.clone(),
            current,
            remaining: self.len(),
        }
    }
}

impl<'a> IntoIterator for &'a VectorIndexer {
    type Item = Vec<usize>;
    type IntoIter = CoordinateIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`VectorIndexer`]
#[derive(Debug, Clone)]
pub struct CoordinateIter {
    extents: Vec<usize>,
    current: Option<Vec<usize>>,
    remaining: usize,
}

impl Iterator for CoordinateIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        self.remaining -= 1;

        let mut next = current.clone();
        let mut advanced = false;
        for (index, &extent) in next.iter_mut().zip(&self.extents) {
            *index += 1;
            if *index < extent {
                advanced = true;
                break;
            }
            *index = 0;
        }
        if advanced {
            self.current = Some(next);
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CoordinateIter {}
