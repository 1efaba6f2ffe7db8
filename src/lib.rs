//! # nc2raster
//!
//! A Rust library for turning gridded NetCDF variables into orientation-correct,
//! georeferenced rasters.
//!
//! ## Features
//!
//! - **North-up rasters**: explicit storage order plus a deterministic flip rule,
//!   so row 0 is always the northernmost row and column 0 the westernmost
//! - **Missing values**: fill sentinels replaced by a single no-data marker
//! - **Raster stacks**: one layer per time step, keyed by decoded dates
//! - **Point series**: nearest-cell sampling across all layers
//! - **Differences**: layer subtraction with no-data propagation
//! - **Export**: Parquet tables and ESRI ASCII grids
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nc2raster::{process_raster_job, input::JobConfig};
//!
//! let config = JobConfig::from_file("config.json").expect("Failed to load config");
//! process_raster_job(&config).expect("Failed to process NetCDF file");
//! ```
//!
//! ## Configuration Example
//!
//! ```json
//! {
//!   "nc_key": "precipitation.nc",
//!   "variable_name": "precip",
//!   "x_dimension": "lon",
//!   "y_dimension": "lat",
//!   "time_dimension": "time",
//!   "outputs": [
//!     { "kind": "layer", "params": { "key": "2003-01-01", "output": "precip_2003.asc" } },
//!     { "kind": "diff", "params": { "from": "2000-01-01", "to": "2003-01-01", "output": "change.parquet" } }
//!   ]
//! }
//! ```

pub mod adapter;
pub mod axis;
pub mod cli;
pub mod diff;
pub mod error;
pub mod export;
pub mod grid;
pub mod info;
pub mod input;
pub mod log;
pub mod raster;
pub mod sampler;
pub mod source;
pub mod stack;
pub mod time;

#[cfg(test)]
mod cli_tests;

pub use crate::error::{RasterError, RasterResult};
pub use crate::grid::{is_nodata, NODATA};

use crate::adapter::AxisOrder;
use crate::export::{export_raster, export_series, RasterFormat};
use crate::grid::{normalize_all, unpack};
use crate::input::{JobConfig, OutputConfig, DEFAULT_CRS};
use crate::sampler::SampleNearest;
use crate::source::{GridSource, NetCdfSource};
use crate::stack::RasterStack;
use ::log::{debug, warn};

/// Reads the configured variable from `source` and builds its raster stack.
///
/// Steps: read the variable, replace fill values with no-data, apply CF
/// packing, check the x/y axes against the grid, resolve the reference system,
/// then adapt one layer per step of the time dimension (or a single layer
/// keyed by the variable name when there is none).
pub fn load_stack<S: GridSource>(source: &S, config: &JobConfig) -> RasterResult<RasterStack<String>> {
    let var_name = &config.variable_name;
    let grid = source.variable(var_name)?;

    let fills = match config.fill_value {
        Some(fill) => vec![fill],
        None => source.fill_values(var_name)?,
    };
    debug!("Normalizing '{}' with fill values {:?}", var_name, fills);
    let grid = normalize_all(grid, &fills);

    let (scale, offset) = source.packing(var_name)?;
    let grid = unpack(grid, scale, offset);

    let x_axis = source.axis(&config.x_dimension)?;
    let y_axis = source.axis(&config.y_dimension)?;
    grid.check_axis(&x_axis)?;
    grid.check_axis(&y_axis)?;

    let crs = match (&config.crs, source.crs(var_name)?) {
        (Some(crs), _) => crs.clone(),
        (None, Some(crs)) => crs,
        (None, None) => {
            warn!("No reference system found for '{}', assuming {}", var_name, DEFAULT_CRS);
            DEFAULT_CRS.to_string()
        }
    };

    match &config.time_dimension {
        Some(time_dim) => {
            let time_axis = source.axis(time_dim)?;
            // A bare dimension has no variable to carry units.
            let units = source.attribute(time_dim, "units").ok().flatten();
            let keys = time::layer_labels(time_axis.values(), units.as_deref());
            RasterStack::from_raw_grid(&grid, time_dim, keys, &x_axis, &y_axis, &crs)
        }
        None => {
            let order = AxisOrder::from_dimensions(grid.dimensions(), &config.x_dimension, &config.y_dimension)?;
            RasterStack::build(
                vec![(var_name.clone(), grid.to_array2()?)],
                &x_axis,
                &y_axis,
                order,
                &crs,
            )
        }
    }
}

/// Produces one output from a loaded stack.
pub fn write_output(
    stack: &RasterStack<String>,
    output: &OutputConfig,
    value_name: &str,
) -> RasterResult<()> {
    match output {
        OutputConfig::Layer { params } => {
            let raster = match &params.key {
                Some(key) => stack.layer(key)?,
                None => stack.first(),
            };
            let format = params
                .format
                .unwrap_or_else(|| RasterFormat::from_path(&params.output));
            export_raster(raster, &params.output, format, value_name)
        }
        OutputConfig::Sample { params } => {
            let series = stack.sample_nearest(params.lon, params.lat);
            export_series(&series, &params.output, "key", value_name)
        }
        OutputConfig::Diff { params } => {
            let raster = stack.diff_layers(&params.from, &params.to)?;
            let format = params
                .format
                .unwrap_or_else(|| RasterFormat::from_path(&params.output));
            export_raster(&raster, &params.output, format, value_name)
        }
    }
}

/// Processes a NetCDF file according to the provided job configuration.
///
/// This function orchestrates the entire pipeline:
/// 1. Opens the NetCDF file
/// 2. Builds the north-up raster stack for the configured variable
/// 3. Writes every configured output
///
/// # Errors
///
/// This function will return an error if:
/// - The NetCDF file cannot be opened
/// - The variable or one of its dimensions is not found
/// - The grid does not match its axes
/// - A requested layer key does not exist
/// - An output file cannot be written
pub fn process_raster_job(config: &JobConfig) -> RasterResult<RasterStack<String>> {
    let source = NetCdfSource::open(&config.nc_key)?;
    let stack = load_stack(&source, config)?;

    for output in &config.outputs {
        debug!("Writing {} output to {}", output.kind(), output.output_path());
        write_output(&stack, output, &config.variable_name)?;
    }

    source.close()?;
    Ok(stack)
}
