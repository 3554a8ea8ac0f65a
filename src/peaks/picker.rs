use log::{debug, info};

use crate::dataset::{DataVector, Dataset, DimHeader, VectorIndexer};

use super::error::PeakPickError;
use super::params::{PeakPickParams, PickRegion};
use super::types::{Peak, PeakDim, PeakList, SpectralDim};

/// Real-valued copy of a dataset, dimension 0 fastest
struct Grid {
    sizes: Vec<usize>,
    strides: Vec<usize>,
    values: Vec<f64>,
}

impl Grid {
    /// Read the real part of every point of `dataset`
    fn load(dataset: &Dataset) -> Result<Self, PeakPickError> {
        let sizes = dataset.sizes();
        let mut strides = Vec::with_capacity(sizes.len());
        let mut stride = 1;
        for &size in &sizes {
            strides.push(stride);
            stride *= size;
        }
        let mut values = vec![0.0; stride];

        // Outer coordinates are logical; a complex outer dimension keeps
        // its real rows at even stored indices.
        let row_scale: Vec<usize> = dataset
            .header()
            .dims
            .iter()
            .skip(1)
            .map(|d| if d.complex { 2 } else { 1 })
            .collect();
        let outer = VectorIndexer::new(0, &sizes);
        let mut vector = DataVector::new(0, false);
        let mut stored = vec![0; sizes.len() - 1];
        for coords in &outer {
            for ((slot, &index), &scale) in stored.iter_mut().zip(&coords).zip(&row_scale) {
                *slot = index * scale;
            }
            dataset.read_vector_at(&mut vector, &stored, 0)?;
            let base: usize = coords
                .iter()
                .zip(&strides[1..])
                .map(|(&index, &stride)| index * stride)
                .sum();
            values[base..base + sizes[0]].copy_from_slice(vector.real());
        }

        Ok(Self {
            sizes,
            strides,
            values,
        })
    }

    fn offset(&self, point: &[usize]) -> usize {
        point.iter().zip(&self.strides).map(|(&p, &s)| p * s).sum()
    }

    fn get(&self, point: &[usize]) -> f64 {
        self.values[self.offset(point)]
    }

    /// Value at `point` moved by `delta` along `dim`, if inside the grid
    fn shifted(&self, point: &[usize], dim: usize, delta: isize) -> Option<f64> {
        let index = point[dim] as isize + delta;
        if index < 0 || index as usize >= self.sizes[dim] {
            return None;
        }
        let offset = self.offset(point) as isize + delta * self.strides[dim] as isize;
        Some(self.values[offset as usize])
    }
}

/// Inclusive point bounds along one dimension
#[derive(Debug, Clone, Copy)]
struct Span {
    low: usize,
    high: usize,
}

/// Local-extremum peak picker
///
/// A point is a peak when it passes the level threshold with the enabled
/// sign and is strictly above (positive) or below (negative) every in-grid
/// neighbour, diagonals included.
#[derive(Debug, Clone)]
pub struct PeakPicker {
    params: PeakPickParams,
}

impl PeakPicker {
    /// Picker for a validated request
    pub fn new(params: PeakPickParams) -> Self {
        Self { params }
    }

    /// Request this picker runs
    pub fn params(&self) -> &PeakPickParams {
        &self.params
    }

    /// Pick `dataset` into a new list named after the request
    pub fn pick(&self, dataset: &Dataset) -> Result<PeakList, PeakPickError> {
        let headers = &dataset.header().dims;
        if self.params.limits().len() != headers.len() {
            return Err(PeakPickError::InvalidOption(format!(
                "request has {} limits, dataset {} has {} dimensions",
                self.params.limits().len(),
                dataset.name(),
                headers.len()
            )));
        }

        let dims = headers
            .iter()
            .map(|h| SpectralDim {
                label: h.label.clone(),
                sf: h.sf,
                sw: h.sw,
                size: h.size,
            })
            .collect();
        let mut list = PeakList::new(self.params.list_name(), dataset.name(), dims);

        let Some(spans) = self.search_spans(headers) else {
            debug!("Pick limits fall outside {}", dataset.name());
            return Ok(list);
        };
        let grid = Grid::load(dataset)?;

        let extents: Vec<usize> = spans.iter().map(|s| s.high - s.low + 1).collect();
        let neighbours: Vec<Vec<isize>> = VectorIndexer::full(&vec![3; headers.len()])
            .iter()
            .map(|c| c.iter().map(|&i| i as isize - 1).collect::<Vec<isize>>())
            .filter(|d| d.iter().any(|&i| i != 0))
            .collect();

        let mut point = vec![0; headers.len()];
        for relative in &VectorIndexer::full(&extents) {
            for ((slot, &r), span) in point.iter_mut().zip(&relative).zip(&spans) {
                *slot = span.low + r;
            }
            let value = grid.get(&point);
            if !self.passes_level(value) || !is_extremum(&grid, &point, value, &neighbours) {
                continue;
            }
            list.add_peak(self.describe(&grid, headers, &point, value));
        }

        info!(
            "Picked {} peaks from {} into {}",
            list.len(),
            dataset.name(),
            list.name
        );
        Ok(list)
    }

    /// Point bounds of the ppm limits, or `None` when any dimension's range
    /// misses the grid
    fn search_spans(&self, headers: &[DimHeader]) -> Option<Vec<Span>> {
        headers
            .iter()
            .zip(self.params.limits())
            .map(|(header, &(low, high))| {
                if header.size == 0 {
                    return None;
                }
                let a = header.ppm_to_point(low);
                let b = header.ppm_to_point(high);
                let first = a.min(b).ceil().max(0.0);
                let last = a.max(b).floor().min((header.size - 1) as f64);
                (first <= last).then(|| Span {
                    low: first as usize,
                    high: last as usize,
                })
            })
            .collect()
    }

    fn passes_level(&self, value: f64) -> bool {
        let level = self.params.level();
        (self.params.pos() && value > 0.0 && value >= level)
            || (self.params.neg() && value < 0.0 && value <= -level)
    }

    fn describe(&self, grid: &Grid, headers: &[DimHeader], point: &[usize], value: f64) -> Peak {
        let mut dims = Vec::with_capacity(point.len());
        let mut half_spans = Vec::with_capacity(point.len());
        for (dim, header) in headers.iter().enumerate() {
            let position = point[dim] as f64 + parabolic_offset(grid, point, dim, value);
            let (left, right, span) = half_height(grid, point, dim, value);
            let ppm_per_point = (header.point_to_ppm(0.0) - header.point_to_ppm(1.0)).abs();
            dims.push(PeakDim {
                point: position,
                ppm: header.point_to_ppm(position),
                width_ppm: (right - left) * ppm_per_point,
            });
            half_spans.push(span);
        }

        let volume = match self.params.region() {
            PickRegion::Point => value,
            PickRegion::Box => sum_region(grid, &half_spans),
            PickRegion::Window => {
                let window: Vec<Span> = point
                    .iter()
                    .zip(&grid.sizes)
                    .map(|(&p, &size)| Span {
                        low: p.saturating_sub(1),
                        high: (p + 1).min(size - 1),
                    })
                    .collect();
                sum_region(grid, &window)
            }
        };

        Peak {
            id: 0,
            intensity: value,
            volume,
            dims,
        }
    }
}

fn is_extremum(grid: &Grid, point: &[usize], value: f64, neighbours: &[Vec<isize>]) -> bool {
    let mut moved = point.to_vec();
    'outer: for delta in neighbours {
        for ((slot, &p), (&d, &size)) in moved
            .iter_mut()
            .zip(point)
            .zip(delta.iter().zip(&grid.sizes))
        {
            let index = p as isize + d;
            if index < 0 || index as usize >= size {
                continue 'outer;
            }
            *slot = index as usize;
        }
        let other = grid.get(&moved);
        let beaten = if value > 0.0 {
            value > other
        } else {
            value < other
        };
        if !beaten {
            return false;
        }
    }
    true
}

/// Sub-point offset of the vertex of the parabola through the peak and its
/// two neighbours along `dim`, within half a point
fn parabolic_offset(grid: &Grid, point: &[usize], dim: usize, value: f64) -> f64 {
    let (Some(before), Some(after)) = (
        grid.shifted(point, dim, -1),
        grid.shifted(point, dim, 1),
    ) else {
        return 0.0;
    };
    let curvature = before - 2.0 * value + after;
    if curvature == 0.0 {
        return 0.0;
    }
    (0.5 * (before - after) / curvature).clamp(-0.5, 0.5)
}

/// Fractional half-height crossings on both sides of the peak along `dim`,
/// plus the whole points between them
fn half_height(grid: &Grid, point: &[usize], dim: usize, value: f64) -> (f64, f64, Span) {
    let half = value.abs() / 2.0;
    let centre = point[dim];
    let size = grid.sizes[dim];

    let crossing = |step: isize| -> (f64, usize) {
        let mut inside = centre;
        let mut inside_value = value.abs();
        loop {
            let next = inside as isize + step;
            if next < 0 || next as usize >= size {
                return (inside as f64, inside);
            }
            let next_value = grid.shifted(point, dim, next - centre as isize).map_or(0.0, f64::abs);
            if next_value <= half {
                let fraction = (inside_value - half) / (inside_value - next_value);
                return (inside as f64 + step as f64 * fraction, inside);
            }
            inside = next as usize;
            inside_value = next_value;
        }
    };

    let (left, low) = crossing(-1);
    let (right, high) = crossing(1);
    (left, right, Span { low, high })
}

fn sum_region(grid: &Grid, spans: &[Span]) -> f64 {
    let extents: Vec<usize> = spans.iter().map(|s| s.high - s.low + 1).collect();
    let mut point = vec![0; spans.len()];
    VectorIndexer::full(&extents)
        .iter()
        .map(|relative| {
            for ((slot, &r), span) in point.iter_mut().zip(&relative).zip(spans) {
                *slot = span.low + r;
            }
            grid.get(&point)
        })
        .sum()
}
