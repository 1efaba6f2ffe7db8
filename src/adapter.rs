//! # Grid Orientation
//!
//! Converts a 2D slice in source storage order into a north-up [`Raster`].
//!
//! The rule is deterministic:
//!
//! 1. [`AxisOrder::YMajor`] slices (rows follow x) are transposed so rows
//!    follow y and columns follow x.
//! 2. An increasing y axis (bottom-left origin) has its rows reversed so row 0
//!    holds the maximum y.
//! 3. A decreasing x axis has its columns reversed so column 0 holds the
//!    minimum x.
//!
//! Cell `[0, 0]` of the result is therefore the northwest corner.

use crate::axis::AxisVector;
use crate::error::{RasterError, RasterResult};
use crate::raster::Raster;
use log::debug;
use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Storage order of a 2D slice as declared by its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    /// x varies fastest: rows follow y, columns follow x.
    XMajor,
    /// y varies fastest: rows follow x, columns follow y.
    YMajor,
}

impl AxisOrder {
    /// Derives the storage order from a variable's dimension names.
    ///
    /// Dimensions are listed slowest first, so an x dimension listed after
    /// the y dimension means x varies fastest.
    ///
    /// ```rust
    /// use nc2raster::adapter::AxisOrder;
    ///
    /// let dims = vec!["time".to_string(), "lat".to_string(), "lon".to_string()];
    /// assert_eq!(AxisOrder::from_dimensions(&dims, "lon", "lat")?, AxisOrder::XMajor);
    /// # Ok::<(), nc2raster::RasterError>(())
    /// ```
    pub fn from_dimensions(dimensions: &[String], x_name: &str, y_name: &str) -> RasterResult<Self> {
        let x_pos = dimensions
            .iter()
            .position(|d| d == x_name)
            .ok_or_else(|| RasterError::MissingDimension(x_name.to_string()))?;
        let y_pos = dimensions
            .iter()
            .position(|d| d == y_name)
            .ok_or_else(|| RasterError::MissingDimension(y_name.to_string()))?;
        if x_pos > y_pos {
            Ok(AxisOrder::XMajor)
        } else {
            Ok(AxisOrder::YMajor)
        }
    }
}

/// Builds a north-up raster from a 2D slice and its axes.
///
/// Fails with `ShapeMismatch` when the slice, once in row = y / column = x
/// form, is not `(len(y_axis), len(x_axis))`.
///
/// # Examples
///
/// ```rust
/// use nc2raster::adapter::{to_raster, AxisOrder};
/// use nc2raster::axis::AxisVector;
/// use ndarray::array;
///
/// let x = AxisVector::new("lon", vec![10.0, 20.0, 30.0])?;
/// let y = AxisVector::new("lat", vec![0.0, 10.0])?;
/// let slice = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
///
/// let raster = to_raster(slice.view(), &x, &y, AxisOrder::XMajor, "EPSG:4326")?;
/// assert_eq!(raster.get(0, 0), Some(4.0));
/// # Ok::<(), nc2raster::RasterError>(())
/// ```
pub fn to_raster(
    slice: ArrayView2<f64>,
    x_axis: &AxisVector,
    y_axis: &AxisVector,
    order: AxisOrder,
    crs: &str,
) -> RasterResult<Raster> {
    let mut view = match order {
        AxisOrder::XMajor => slice,
        AxisOrder::YMajor => slice.reversed_axes(),
    };

    if view.dim() != (y_axis.len(), x_axis.len()) {
        return Err(RasterError::ShapeMismatch(format!(
            "{:?} slice of shape {:?} does not match axes '{}' ({}) and '{}' ({})",
            order,
            slice.dim(),
            x_axis.name(),
            x_axis.len(),
            y_axis.name(),
            y_axis.len()
        )));
    }

    let mut oriented_y = y_axis.clone();
    if y_axis.is_increasing() {
        view.invert_axis(Axis(0));
        oriented_y = y_axis.reversed();
    }

    let mut oriented_x = x_axis.clone();
    if !x_axis.is_increasing() {
        view.invert_axis(Axis(1));
        oriented_x = x_axis.reversed();
    }

    debug!(
        "Adapted {:?} slice to {}x{} north-up raster (y flipped: {}, x flipped: {})",
        order,
        view.nrows(),
        view.ncols(),
        y_axis.is_increasing(),
        !x_axis.is_increasing()
    );

    Raster::from_oriented(
        view.as_standard_layout().into_owned(),
        oriented_x,
        oriented_y,
        crs,
    )
}
