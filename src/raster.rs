//! # Georeferenced Rasters
//!
//! A [`Raster`] is a north-up 2D grid: row 0 holds the maximum y coordinate
//! and column 0 the minimum x coordinate. Rasters are only built through
//! [`crate::adapter::to_raster`], which enforces that orientation.

use crate::axis::AxisVector;
use crate::error::{RasterError, RasterResult};
use crate::grid::is_nodata;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Minimum enclosing rectangle of a raster's cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounding box spanned by an x and a y axis.
    pub fn from_axes(x_axis: &AxisVector, y_axis: &AxisVector) -> Self {
        Self::new(x_axis.min(), y_axis.min(), x_axis.max(), y_axis.max())
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Summary statistics over the valid cells of a raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RasterStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub valid_cells: usize,
    pub nodata_cells: usize,
}

/// North-up 2D grid with oriented axes, bounding box and reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    data: Array2<f64>,
    x_axis: AxisVector,
    y_axis: AxisVector,
    bbox: BoundingBox,
    crs: String,
}

impl Raster {
    /// Assembles a raster from an already oriented grid: `x_axis` ascending,
    /// `y_axis` descending, `data` shaped `(y, x)`.
    pub(crate) fn from_oriented(
        data: Array2<f64>,
        x_axis: AxisVector,
        y_axis: AxisVector,
        crs: &str,
    ) -> RasterResult<Self> {
        if data.dim() != (y_axis.len(), x_axis.len()) {
            return Err(RasterError::ShapeMismatch(format!(
                "grid of {}x{} cells does not match axes '{}' ({}) and '{}' ({})",
                data.nrows(),
                data.ncols(),
                y_axis.name(),
                y_axis.len(),
                x_axis.name(),
                x_axis.len()
            )));
        }
        let bbox = BoundingBox::from_axes(&x_axis, &y_axis);
        Ok(Raster {
            data,
            x_axis,
            y_axis,
            bbox,
            crs: crs.to_string(),
        })
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_data(self) -> Array2<f64> {
        self.data
    }

    /// Ascending x coordinates of the columns.
    pub fn x_axis(&self) -> &AxisVector {
        &self.x_axis
    }

    /// Descending y coordinates of the rows.
    pub fn y_axis(&self) -> &AxisVector {
        &self.y_axis
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Coordinates `(x, y)` of a cell center.
    pub fn cell_center(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let x = self.x_axis.values().get(col)?;
        let y = self.y_axis.values().get(row)?;
        Some((*x, *y))
    }

    /// Whether `other` shares width, height, bounding box and reference system.
    pub fn is_aligned_with(&self, other: &Raster) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.bbox == other.bbox
            && self.crs == other.crs
    }

    /// Equality that treats two no-data cells as equal.
    pub fn identical(&self, other: &Raster) -> bool {
        self.is_aligned_with(other)
            && self.x_axis == other.x_axis
            && self.y_axis == other.y_axis
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (is_nodata(*a) && is_nodata(*b)) || a == b)
    }

    pub fn nodata_count(&self) -> usize {
        self.data.iter().filter(|v| is_nodata(**v)).count()
    }

    /// Min, max and mean of the valid cells; `None` when every cell is no-data.
    pub fn stats(&self) -> Option<RasterStats> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut valid_cells = 0;
        for &v in self.data.iter().filter(|v| !is_nodata(**v)) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            valid_cells += 1;
        }
        if valid_cells == 0 {
            return None;
        }
        Some(RasterStats {
            min,
            max,
            mean: sum / valid_cells as f64,
            valid_cells,
            nodata_cells: self.data.len() - valid_cells,
        })
    }
}
