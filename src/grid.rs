//! # Raw Grids and Missing Values
//!
//! [`RawGrid`] is the N-dimensional array handed over by a grid source
//! together with its dimension names, in the source's storage order.
//! [`normalize`] replaces the source's fill sentinel with [`NODATA`].

use crate::axis::AxisVector;
use crate::error::{RasterError, RasterResult};
use log::debug;
use ndarray::{Array, Array2, ArrayD, Axis, Dimension, Ix2, IxDyn};

/// Marker for cells without a valid measurement.
pub const NODATA: f64 = f64::NAN;

/// Whether a cell holds the no-data marker.
pub fn is_nodata(value: f64) -> bool {
    value.is_nan()
}

/// N-dimensional numeric array with named dimensions in storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    dimensions: Vec<String>,
    data: ArrayD<f64>,
}

impl RawGrid {
    pub fn new(dimensions: Vec<String>, data: ArrayD<f64>) -> RasterResult<Self> {
        if dimensions.len() != data.ndim() {
            return Err(RasterError::ShapeMismatch(format!(
                "{} dimension names for a {}-dimensional array",
                dimensions.len(),
                data.ndim()
            )));
        }
        Ok(RawGrid { dimensions, data })
    }

    /// Builds a grid from flat row-major values (last dimension fastest).
    pub fn from_shape_vec(
        dimensions: Vec<String>,
        shape: &[usize],
        values: Vec<f64>,
    ) -> RasterResult<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)
            .map_err(|e| RasterError::ShapeMismatch(e.to_string()))?;
        Self::new(dimensions, data)
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn dimension_index(&self, name: &str) -> RasterResult<usize> {
        self.dimensions
            .iter()
            .position(|d| d == name)
            .ok_or_else(|| RasterError::MissingDimension(name.to_string()))
    }

    /// Checks that the extent of the dimension named like `axis` equals the
    /// axis length.
    pub fn check_axis(&self, axis: &AxisVector) -> RasterResult<()> {
        let index = self.dimension_index(axis.name())?;
        let extent = self.data.shape()[index];
        if extent != axis.len() {
            return Err(RasterError::ShapeMismatch(format!(
                "dimension '{}' has extent {} but its axis has {} coordinates",
                axis.name(),
                extent,
                axis.len()
            )));
        }
        Ok(())
    }

    /// Dimension names left after removing `dimension`, in storage order.
    pub fn dimensions_without(&self, dimension: &str) -> Vec<String> {
        self.dimensions
            .iter()
            .filter(|d| d.as_str() != dimension)
            .cloned()
            .collect()
    }

    /// The grid as a 2D array; fails unless it has exactly two dimensions.
    pub fn to_array2(&self) -> RasterResult<Array2<f64>> {
        self.data
            .clone()
            .into_dimensionality::<Ix2>()
            .map_err(|e| RasterError::ShapeMismatch(e.to_string()))
    }

    /// Splits a 3D grid into 2D slices along `dimension`, keeping the order of
    /// the two remaining dimensions.
    pub fn slices_along(&self, dimension: &str) -> RasterResult<Vec<Array2<f64>>> {
        if self.ndim() != 3 {
            return Err(RasterError::ShapeMismatch(format!(
                "expected a 3-dimensional grid to slice along '{}', got {} dimensions",
                dimension,
                self.ndim()
            )));
        }
        let index = self.dimension_index(dimension)?;
        let slices = self
            .data
            .axis_iter(Axis(index))
            .map(|view| {
                view.to_owned()
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| RasterError::ShapeMismatch(e.to_string()))
            })
            .collect::<RasterResult<Vec<_>>>()?;
        debug!("Split grid into {} slices along '{}'", slices.len(), dimension);
        Ok(slices)
    }
}

fn matches_fill(value: f64, fill_value: f64) -> bool {
    if fill_value.is_nan() {
        value.to_bits() == fill_value.to_bits()
    } else {
        value == fill_value
    }
}

/// Replaces every cell equal to `fill_value` with [`NODATA`].
///
/// Comparison is exact. A NaN fill value is matched by bit pattern.
pub fn normalize_array<D: Dimension>(mut array: Array<f64, D>, fill_value: f64) -> Array<f64, D> {
    array.mapv_inplace(|v| if matches_fill(v, fill_value) { NODATA } else { v });
    array
}

/// Replaces every cell of `grid` equal to `fill_value` with [`NODATA`].
///
/// # Examples
///
/// ```rust
/// use nc2raster::grid::{is_nodata, normalize, RawGrid};
///
/// let grid = RawGrid::from_shape_vec(
///     vec!["y".to_string(), "x".to_string()],
///     &[1, 3],
///     vec![1.0, -9999.0, 3.0],
/// )?;
/// let normalized = normalize(grid, -9999.0);
/// assert!(is_nodata(normalized.data()[[0, 1]]));
/// assert_eq!(normalized.data()[[0, 2]], 3.0);
/// # Ok::<(), nc2raster::RasterError>(())
/// ```
pub fn normalize(grid: RawGrid, fill_value: f64) -> RawGrid {
    RawGrid {
        dimensions: grid.dimensions,
        data: normalize_array(grid.data, fill_value),
    }
}

/// Applies [`normalize`] for each sentinel in turn.
pub fn normalize_all(grid: RawGrid, fill_values: &[f64]) -> RawGrid {
    fill_values
        .iter()
        .fold(grid, |grid, &fill| normalize(grid, fill))
}

/// Applies CF packing, `value * scale_factor + add_offset`. No-data cells
/// stay no-data.
pub fn unpack(grid: RawGrid, scale_factor: f64, add_offset: f64) -> RawGrid {
    if scale_factor == 1.0 && add_offset == 0.0 {
        return grid;
    }
    let mut data = grid.data;
    data.mapv_inplace(|v| v * scale_factor + add_offset);
    RawGrid {
        dimensions: grid.dimensions,
        data,
    }
}
