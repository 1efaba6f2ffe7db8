//! # Input Configuration Module
//!
//! This module provides configuration parsing for nc2raster jobs. A job names
//! the NetCDF input, the variable and its spatial/temporal dimensions, and a
//! list of outputs to produce from the resulting raster stack.
//!
//! ## Output Types
//!
//! - **layer**: export one layer of the stack as a raster
//! - **sample**: extract the nearest-cell time series at a point
//! - **diff**: export the difference between two layers
//!
//! ## Example Usage
//!
//! ```rust
//! use nc2raster::input::JobConfig;
//!
//! let json = r#"
//! {
//!   "nc_key": "precipitation.nc",
//!   "variable_name": "precip",
//!   "x_dimension": "lon",
//!   "y_dimension": "lat",
//!   "time_dimension": "time",
//!   "outputs": [
//!     { "kind": "sample", "params": { "lon": 10.5, "lat": 45.2, "output": "series.parquet" } }
//!   ]
//! }"#;
//! let config = JobConfig::from_json(json)?;
//! assert_eq!(config.outputs.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::export::RasterFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Reference system used when neither the job nor the file declares one.
pub const DEFAULT_CRS: &str = "EPSG:4326";

fn default_x_dimension() -> String {
    "lon".to_string()
}

fn default_y_dimension() -> String {
    "lat".to_string()
}

/// Main configuration structure for nc2raster jobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobConfig {
    /// Path to the input NetCDF file
    pub nc_key: String,
    /// Name of the gridded variable
    pub variable_name: String,
    /// Dimension holding x (longitude) coordinates
    #[serde(default = "default_x_dimension")]
    pub x_dimension: String,
    /// Dimension holding y (latitude) coordinates
    #[serde(default = "default_y_dimension")]
    pub y_dimension: String,
    /// Dimension stacked into layers; absent for a single 2D field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dimension: Option<String>,
    /// Overrides the file's reference system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
    /// Overrides the variable's `_FillValue`/`missing_value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<f64>,
    /// Outputs produced from the raster stack
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

/// Enumeration of all supported outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum OutputConfig {
    /// Export one stack layer
    #[serde(rename = "layer")]
    Layer { params: LayerParams },
    /// Nearest-cell series at a point
    #[serde(rename = "sample")]
    Sample { params: SampleParams },
    /// Difference between two layers
    #[serde(rename = "diff")]
    Diff { params: DiffParams },
}

/// Parameters for layer export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerParams {
    /// Layer key; the first layer when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Output path
    pub output: String,
    /// Output format; inferred from the extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<RasterFormat>,
}

/// Parameters for point sampling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleParams {
    pub lon: f64,
    pub lat: f64,
    /// Output Parquet path
    pub output: String,
}

/// Parameters for layer differences, computed as `to - from`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffParams {
    pub from: String,
    pub to: String,
    /// Output path
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<RasterFormat>,
}

impl JobConfig {
    /// Loads a job configuration from a JSON or YAML file, chosen by
    /// extension (`.yaml`/`.yml` for YAML, JSON otherwise).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(&path)?;
        let is_yaml = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn from_json(json_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: JobConfig = serde_json::from_str(json_str)?;
        Ok(config)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: JobConfig = serde_yaml::from_str(yaml_str)?;
        Ok(config)
    }
}

impl OutputConfig {
    /// Returns the string identifier for this output type.
    pub fn kind(&self) -> &'static str {
        match self {
            OutputConfig::Layer { .. } => "layer",
            OutputConfig::Sample { .. } => "sample",
            OutputConfig::Diff { .. } => "diff",
        }
    }

    pub fn output_path(&self) -> &str {
        match self {
            OutputConfig::Layer { params } => &params.output,
            OutputConfig::Sample { params } => &params.output,
            OutputConfig::Diff { params } => &params.output,
        }
    }
}
