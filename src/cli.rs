//! # CLI Module
//!
//! This module provides the command-line interface for nc2raster, including:
//! - Argument parsing with clap
//! - Configuration file loading (JSON/YAML)
//! - Environment variable support with the NC2RASTER_ prefix
//! - Subcommands for layer export, point sampling, differences and inspection
//! - Configuration templates

use crate::export::RasterFormat;
use crate::input::{DiffParams, JobConfig, LayerParams, OutputConfig, SampleParams};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Georeferenced rasters and point series from NetCDF grids
#[derive(Parser, Debug)]
#[command(name = "nc2raster")]
#[command(about = "Convert NetCDF grids into north-up georeferenced rasters")]
#[command(version)]
#[command(long_about = "
nc2raster converts gridded NetCDF variables into orientation-correct, georeferenced
rasters. Row 0 of every raster is the northernmost row regardless of how the file
stores its latitude axis.

FEATURES:
  • Layer export: any time step as a Parquet table or ESRI ASCII grid
  • Point series: nearest-cell values at a location across all time steps
  • Differences: subtract two time steps with no-data propagation
  • Configuration files: JSON and YAML job descriptions with templates
  • Shell completions: bash, zsh, fish and PowerShell

EXAMPLES:
  # Export the layer for 2003 as an ASCII grid
  nc2raster layer precip.nc precip_2003.asc -n precip --time-dim time --key 2003-01-01

  # Point time series
  nc2raster sample precip.nc series.parquet -n precip --time-dim time --point 10.5,45.2

  # Difference between two years
  nc2raster diff precip.nc change.asc -n precip --time-dim time \\
    --from 2000-01-01 --to 2003-01-01

  # Run a job file
  nc2raster run job.yaml

  # Inspect a file
  nc2raster info precip.nc --detailed
")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for structured data
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Configuration file path (JSON or YAML)
    #[arg(short, long, global = true, env = "NC2RASTER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input grid selection shared by the raster commands
#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Input NetCDF file path
    #[arg(value_name = "INPUT", env = "NC2RASTER_INPUT")]
    pub input: String,

    /// NetCDF variable name
    #[arg(short = 'n', long, env = "NC2RASTER_VARIABLE")]
    pub variable: String,

    /// Dimension holding x (longitude) coordinates
    #[arg(long, default_value = "lon", env = "NC2RASTER_X_DIM")]
    pub x_dim: String,

    /// Dimension holding y (latitude) coordinates
    #[arg(long, default_value = "lat", env = "NC2RASTER_Y_DIM")]
    pub y_dim: String,

    /// Dimension stacked into layers
    #[arg(long, env = "NC2RASTER_TIME_DIM")]
    pub time_dim: Option<String>,

    /// Reference system override
    #[arg(long, env = "NC2RASTER_CRS")]
    pub crs: Option<String>,

    /// Fill value override
    #[arg(long, allow_hyphen_values = true)]
    pub fill_value: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a job configuration file
    Run {
        /// Job file (JSON or YAML); falls back to --config
        config_file: Option<PathBuf>,

        /// Override input path from config
        #[arg(long, env = "NC2RASTER_INPUT_OVERRIDE")]
        input_override: Option<String>,

        /// Dry run - validate configuration without processing
        #[arg(long, env = "NC2RASTER_DRY_RUN")]
        dry_run: bool,
    },

    /// Export one layer as a raster
    Layer {
        #[command(flatten)]
        grid: GridArgs,

        /// Output path (.asc for ASCII grid, Parquet otherwise)
        #[arg(value_name = "OUTPUT")]
        output: String,

        /// Layer key (decoded time label); first layer when omitted
        #[arg(long)]
        key: Option<String>,

        /// Output format, overriding the extension
        #[arg(long, value_enum)]
        format: Option<RasterFormat>,
    },

    /// Extract the nearest-cell series at a point
    Sample {
        #[command(flatten)]
        grid: GridArgs,

        /// Output Parquet path
        #[arg(value_name = "OUTPUT")]
        output: String,

        /// Query location: lon,lat
        #[arg(long, env = "NC2RASTER_POINT", value_parser = parse_point, allow_hyphen_values = true)]
        point: PointArg,
    },

    /// Export the difference between two layers (to - from)
    Diff {
        #[command(flatten)]
        grid: GridArgs,

        /// Output path (.asc for ASCII grid, Parquet otherwise)
        #[arg(value_name = "OUTPUT")]
        output: String,

        /// Layer subtracted
        #[arg(long)]
        from: String,

        /// Layer subtracted from
        #[arg(long)]
        to: String,

        /// Output format, overriding the extension
        #[arg(long, value_enum)]
        format: Option<RasterFormat>,
    },

    /// Show information about NetCDF file
    Info {
        /// NetCDF file path
        file: String,

        /// Show global attributes
        #[arg(long)]
        detailed: bool,

        /// Show only specific variable info
        #[arg(short = 'n', long)]
        variable: Option<String>,

        /// Output format for file information
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Generate configuration templates
    Template {
        /// Template type to generate
        #[arg(value_enum)]
        template_type: TemplateType,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration format
        #[arg(long, value_enum, default_value_t = ConfigFormat::Json)]
        format: ConfigFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON structured output
    Json,
    /// YAML structured output
    Yaml,
    /// CSV output (where applicable)
    Csv,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum TemplateType {
    /// Single 2D field exported as a raster
    Basic,
    /// Point time series from a stacked variable
    TimeSeries,
    /// Difference between two time steps
    Difference,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// YAML configuration format
    Yaml,
}

/// Query location from the command line
#[derive(Clone, Debug, PartialEq)]
pub struct PointArg {
    pub lon: f64,
    pub lat: f64,
}

/// Parse a point from a command line argument
/// Format: lon,lat
fn parse_point(s: &str) -> Result<PointArg, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("Point must be in format 'lon,lat'".to_string());
    }

    let lon = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid longitude value")?;
    let lat = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid latitude value")?;

    if !lon.is_finite() || !lat.is_finite() {
        return Err("Point coordinates must be finite".to_string());
    }

    Ok(PointArg { lon, lat })
}

impl GridArgs {
    fn to_job_config(&self, outputs: Vec<OutputConfig>) -> JobConfig {
        JobConfig {
            nc_key: self.input.clone(),
            variable_name: self.variable.clone(),
            x_dimension: self.x_dim.clone(),
            y_dimension: self.y_dim.clone(),
            time_dimension: self.time_dim.clone(),
            crs: self.crs.clone(),
            fill_value: self.fill_value,
            outputs,
        }
    }
}

impl Commands {
    /// Job equivalent of a raster command; `None` for the other commands.
    pub fn to_job_config(&self) -> Option<JobConfig> {
        match self {
            Commands::Layer {
                grid,
                output,
                key,
                format,
            } => Some(grid.to_job_config(vec![OutputConfig::Layer {
                params: LayerParams {
                    key: key.clone(),
                    output: output.clone(),
                    format: *format,
                },
            }])),
            Commands::Sample {
                grid,
                output,
                point,
            } => Some(grid.to_job_config(vec![OutputConfig::Sample {
                params: SampleParams {
                    lon: point.lon,
                    lat: point.lat,
                    output: output.clone(),
                },
            }])),
            Commands::Diff {
                grid,
                output,
                from,
                to,
                format,
            } => Some(grid.to_job_config(vec![OutputConfig::Diff {
                params: DiffParams {
                    from: from.clone(),
                    to: to.clone(),
                    output: output.clone(),
                    format: *format,
                },
            }])),
            _ => None,
        }
    }
}

/// Starter job configuration for a template type
pub fn generate_template(template_type: &TemplateType) -> JobConfig {
    let base = JobConfig {
        nc_key: "input.nc".to_string(),
        variable_name: "precip".to_string(),
        x_dimension: "lon".to_string(),
        y_dimension: "lat".to_string(),
        time_dimension: None,
        crs: None,
        fill_value: None,
        outputs: Vec::new(),
    };

    match template_type {
        TemplateType::Basic => JobConfig {
            outputs: vec![OutputConfig::Layer {
                params: LayerParams {
                    key: None,
                    output: "output.asc".to_string(),
                    format: Some(RasterFormat::AsciiGrid),
                },
            }],
            ..base
        },
        TemplateType::TimeSeries => JobConfig {
            time_dimension: Some("time".to_string()),
            outputs: vec![OutputConfig::Sample {
                params: SampleParams {
                    lon: 10.5,
                    lat: 45.2,
                    output: "series.parquet".to_string(),
                },
            }],
            ..base
        },
        TemplateType::Difference => JobConfig {
            time_dimension: Some("time".to_string()),
            crs: Some("EPSG:4326".to_string()),
            outputs: vec![
                OutputConfig::Layer {
                    params: LayerParams {
                        key: Some("2003-01-01".to_string()),
                        output: "layer_2003.parquet".to_string(),
                        format: None,
                    },
                },
                OutputConfig::Diff {
                    params: DiffParams {
                        from: "2000-01-01".to_string(),
                        to: "2003-01-01".to_string(),
                        output: "change_2000_2003.asc".to_string(),
                        format: None,
                    },
                },
            ],
            ..base
        },
    }
}

/// Serialize a job configuration in the requested format
pub fn render_config(config: &JobConfig, format: &ConfigFormat) -> anyhow::Result<String> {
    let rendered = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let result = parse_point("10.5,45.2").unwrap();
        assert_eq!(result.lon, 10.5);
        assert_eq!(result.lat, 45.2);

        let result = parse_point(" -120.25 , -33.0 ").unwrap();
        assert_eq!(result.lon, -120.25);
        assert_eq!(result.lat, -33.0);

        // Test invalid formats
        assert!(parse_point("10.5").is_err());
        assert!(parse_point("10.5,45.2,3.0").is_err());
        assert!(parse_point("east,45.2").is_err());
        assert!(parse_point("10.5,inf").is_err());
    }

    #[test]
    fn test_layer_command_to_job_config() {
        let cli = Cli::parse_from([
            "nc2raster",
            "layer",
            "precip.nc",
            "out.asc",
            "-n",
            "precip",
            "--time-dim",
            "time",
            "--key",
            "2003-01-01",
        ]);

        let config = cli.command.to_job_config().unwrap();
        assert_eq!(config.nc_key, "precip.nc");
        assert_eq!(config.variable_name, "precip");
        assert_eq!(config.x_dimension, "lon");
        assert_eq!(config.y_dimension, "lat");
        assert_eq!(config.time_dimension.as_deref(), Some("time"));
        assert_eq!(config.outputs.len(), 1);

        if let OutputConfig::Layer { params } = &config.outputs[0] {
            assert_eq!(params.key.as_deref(), Some("2003-01-01"));
            assert_eq!(params.output, "out.asc");
            assert_eq!(params.format, None);
        } else {
            panic!("Expected Layer output");
        }
    }

    #[test]
    fn test_sample_command_to_job_config() {
        let cli = Cli::parse_from([
            "nc2raster",
            "sample",
            "precip.nc",
            "series.parquet",
            "-n",
            "precip",
            "--point",
            "-60.5,-10.0",
        ]);

        let config = cli.command.to_job_config().unwrap();
        if let OutputConfig::Sample { params } = &config.outputs[0] {
            assert_eq!(params.lon, -60.5);
            assert_eq!(params.lat, -10.0);
            assert_eq!(params.output, "series.parquet");
        } else {
            panic!("Expected Sample output");
        }
    }

    #[test]
    fn test_templates_round_trip_through_serde() {
        for template_type in [
            TemplateType::Basic,
            TemplateType::TimeSeries,
            TemplateType::Difference,
        ] {
            let config = generate_template(&template_type);

            let json = render_config(&config, &ConfigFormat::Json).unwrap();
            assert_eq!(JobConfig::from_json(&json).unwrap(), config);

            let yaml = render_config(&config, &ConfigFormat::Yaml).unwrap();
            assert_eq!(JobConfig::from_yaml(&yaml).unwrap(), config);
        }
    }

    #[test]
    fn test_non_raster_commands_have_no_job() {
        let cli = Cli::parse_from(["nc2raster", "info", "data.nc"]);
        assert!(cli.command.to_job_config().is_none());
    }
}
