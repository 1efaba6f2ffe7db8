//! # Error Types
//!
//! Every fallible operation in the library returns [`RasterResult`]. Errors
//! are raised at the call that detects them; out-of-bounds point sampling is
//! not an error and yields [`crate::NODATA`] instead.

use thiserror::Error;

/// Errors raised while reading, adapting, stacking or exporting grids
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Key not found in raster stack: {0}")]
    KeyNotFound(String),

    #[error("Duplicate key in raster stack: {0}")]
    DuplicateKey(String),

    #[error("Axis '{0}' has no coordinates")]
    EmptyAxis(String),

    #[error("Axis '{name}' is not strictly monotonic at index {index}")]
    NonMonotonicAxis { name: String, index: usize },

    #[error("Dimension '{0}' not found")]
    MissingDimension(String),

    #[error("Variable '{0}' not found")]
    MissingVariable(String),

    #[error("Invalid time units: {0}")]
    InvalidTimeUnits(String),

    #[error("Grid spacing is irregular: {0}")]
    IrregularGrid(String),

    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for raster operations
pub type RasterResult<T> = Result<T, RasterError>;
