//! # Raster Differences

use crate::error::{RasterError, RasterResult};
use crate::grid::{is_nodata, NODATA};
use crate::raster::Raster;
use ndarray::Zip;

/// Cell-wise `a - b` keeping the georeferencing of `a`.
///
/// Both rasters must share width, height, bounding box and reference system,
/// otherwise `ShapeMismatch` is returned. A no-data cell in either operand
/// gives a no-data cell in the result.
pub fn diff(a: &Raster, b: &Raster) -> RasterResult<Raster> {
    if !a.is_aligned_with(b) {
        return Err(RasterError::ShapeMismatch(format!(
            "cannot subtract a {}x{} raster ({:?}, '{}') from a {}x{} raster ({:?}, '{}')",
            b.height(),
            b.width(),
            b.bbox(),
            b.crs(),
            a.height(),
            a.width(),
            a.bbox(),
            a.crs()
        )));
    }

    let data = Zip::from(a.data()).and(b.data()).map_collect(|&x, &y| {
        if is_nodata(x) || is_nodata(y) {
            NODATA
        } else {
            x - y
        }
    });

    Raster::from_oriented(data, a.x_axis().clone(), a.y_axis().clone(), a.crs())
}
