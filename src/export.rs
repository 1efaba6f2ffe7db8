//! # Raster and Series Export
//!
//! Converts rasters and sampled series into Polars DataFrames and writes
//! them as Parquet, and writes rasters as ESRI ASCII grids.
//!
//! ## Formats
//!
//! - **Parquet**: long table with `x`, `y` and value columns, rows in
//!   north-up row-major order, no-data cells as nulls
//! - **ASCII grid**: `ncols`/`nrows`/`xllcenter`/`yllcenter`/`cellsize`
//!   header followed by rows from north to south

use crate::error::{RasterError, RasterResult};
use crate::grid::is_nodata;
use crate::raster::Raster;
use crate::sampler::SampledSeries;
use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// No-data value written to ASCII grids.
pub const ASCII_GRID_NODATA: f64 = -9999.0;

/// Relative tolerance on cell spacing for ASCII grid output.
const SPACING_TOLERANCE: f64 = 1e-6;

/// Output format for rasters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RasterFormat {
    /// Long-format Parquet table
    Parquet,
    /// ESRI ASCII grid
    AsciiGrid,
}

impl RasterFormat {
    /// `.asc` selects ASCII grid, anything else Parquet.
    pub fn from_path(path: &str) -> Self {
        if path.to_lowercase().ends_with(".asc") {
            RasterFormat::AsciiGrid
        } else {
            RasterFormat::Parquet
        }
    }
}

fn to_optional(value: f64) -> Option<f64> {
    if is_nodata(value) { None } else { Some(value) }
}

/// One row per cell: `x`, `y` and `value_name` columns.
pub fn raster_to_dataframe(raster: &Raster, value_name: &str) -> RasterResult<DataFrame> {
    let capacity = raster.width() * raster.height();
    let mut xs = Vec::with_capacity(capacity);
    let mut ys = Vec::with_capacity(capacity);
    let mut values = Vec::with_capacity(capacity);

    for (row, y) in raster.y_axis().values().iter().enumerate() {
        for (col, x) in raster.x_axis().values().iter().enumerate() {
            xs.push(*x);
            ys.push(*y);
            values.push(to_optional(raster.data()[[row, col]]));
        }
    }

    let df = DataFrame::new(vec![
        Series::new("x".into(), xs).into(),
        Series::new("y".into(), ys).into(),
        Series::new(value_name.into(), values).into(),
    ])?;
    Ok(df)
}

/// One row per layer: `key_name` (as text) and `value_name` columns.
pub fn series_to_dataframe<K: fmt::Display>(
    series: &SampledSeries<K>,
    key_name: &str,
    value_name: &str,
) -> RasterResult<DataFrame> {
    let keys: Vec<String> = series.keys().map(|k| k.to_string()).collect();
    let values: Vec<Option<f64>> = series.values().into_iter().map(to_optional).collect();

    let df = DataFrame::new(vec![
        Series::new(key_name.into(), keys).into(),
        Series::new(value_name.into(), values).into(),
    ])?;
    Ok(df)
}

pub fn write_dataframe_to_parquet(df: &DataFrame, output_path: &str) -> RasterResult<()> {
    debug!("Writing DataFrame to parquet file: {}", output_path);
    debug!("DataFrame shape: {:?}", df.shape());
    debug!("DataFrame schema:\n{:?}", df.schema());

    let file = File::create(output_path)?;
    let mut df_clone = df.clone();
    ParquetWriter::new(file).finish(&mut df_clone)?;

    debug!("Successfully wrote parquet file: {}", output_path);
    Ok(())
}

fn ascii_cell_size(raster: &Raster) -> RasterResult<f64> {
    let x_axis = raster.x_axis();
    let y_axis = raster.y_axis();
    if !x_axis.is_regular(SPACING_TOLERANCE) || !y_axis.is_regular(SPACING_TOLERANCE) {
        return Err(RasterError::IrregularGrid(format!(
            "axes '{}' and '{}' must be evenly spaced",
            x_axis.name(),
            y_axis.name()
        )));
    }

    match (x_axis.mean_spacing(), y_axis.mean_spacing()) {
        (Some(dx), Some(dy)) if (dx - dy).abs() <= SPACING_TOLERANCE * dx => Ok(dx),
        (Some(dx), Some(dy)) => Err(RasterError::IrregularGrid(format!(
            "cells are not square ({} by {})",
            dx, dy
        ))),
        (Some(d), None) | (None, Some(d)) => Ok(d),
        (None, None) => Err(RasterError::IrregularGrid(
            "cannot derive a cell size from a single cell".to_string(),
        )),
    }
}

/// Writes `raster` as an ESRI ASCII grid. Requires evenly spaced, square cells.
pub fn write_ascii_grid<P: AsRef<Path>>(raster: &Raster, path: P) -> RasterResult<()> {
    let cell_size = ascii_cell_size(raster)?;
    let bbox = raster.bbox();
    debug!("Writing ASCII grid to {}", path.as_ref().display());

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "ncols {}", raster.width())?;
    writeln!(out, "nrows {}", raster.height())?;
    writeln!(out, "xllcenter {}", bbox.min_x)?;
    writeln!(out, "yllcenter {}", bbox.min_y)?;
    writeln!(out, "cellsize {}", cell_size)?;
    writeln!(out, "NODATA_value {}", ASCII_GRID_NODATA)?;

    for row in raster.data().rows() {
        let line: Vec<String> = row
            .iter()
            .map(|v| {
                if is_nodata(*v) {
                    ASCII_GRID_NODATA.to_string()
                } else {
                    v.to_string()
                }
            })
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `raster` in `format`, naming the value column `value_name`.
pub fn export_raster(
    raster: &Raster,
    output_path: &str,
    format: RasterFormat,
    value_name: &str,
) -> RasterResult<()> {
    match format {
        RasterFormat::Parquet => {
            let df = raster_to_dataframe(raster, value_name)?;
            write_dataframe_to_parquet(&df, output_path)
        }
        RasterFormat::AsciiGrid => write_ascii_grid(raster, output_path),
    }
}

/// Writes a sampled series as a Parquet table.
pub fn export_series<K: fmt::Display>(
    series: &SampledSeries<K>,
    output_path: &str,
    key_name: &str,
    value_name: &str,
) -> RasterResult<()> {
    let df = series_to_dataframe(series, key_name, value_name)?;
    write_dataframe_to_parquet(&df, output_path)
}
