//! # CLI Integration Tests
//!
//! Argument parsing, subcommand options and error handling of the
//! command-line interface.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::path::PathBuf;

    use crate::cli::{Cli, Commands, ConfigFormat, OutputFormat, TemplateType};
    use crate::export::RasterFormat;

    /// Test basic CLI argument parsing
    #[test]
    fn test_cli_help() {
        let result = Cli::try_parse_from(["nc2raster", "-h"]);
        assert!(result.is_err()); // -h causes early exit with "error"

        let error = result.unwrap_err();
        assert!(error
            .to_string()
            .contains("Convert NetCDF grids into north-up georeferenced rasters"));
    }

    /// Test version argument
    #[test]
    fn test_cli_version() {
        let result = Cli::try_parse_from(["nc2raster", "--version"]);
        assert!(result.is_err()); // --version causes early exit
    }

    /// Test global flags
    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "nc2raster",
            "--verbose",
            "--output-format",
            "json",
            "--config",
            "/path/to/job.yaml",
            "template",
            "basic",
        ]);

        assert!(cli.verbose);
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/job.yaml")));
    }

    #[test]
    fn test_layer_command_defaults() {
        let cli = Cli::parse_from([
            "nc2raster",
            "layer",
            "input.nc",
            "output.parquet",
            "-n",
            "temperature",
        ]);

        if let Commands::Layer {
            grid,
            output,
            key,
            format,
        } = &cli.command
        {
            assert_eq!(grid.input, "input.nc");
            assert_eq!(grid.variable, "temperature");
            assert_eq!(grid.x_dim, "lon");
            assert_eq!(grid.y_dim, "lat");
            assert_eq!(grid.time_dim, None);
            assert_eq!(grid.fill_value, None);
            assert_eq!(output, "output.parquet");
            assert_eq!(key, &None);
            assert_eq!(format, &None);
        } else {
            panic!("Expected Layer command");
        }
    }

    #[test]
    fn test_layer_command_with_options() {
        let cli = Cli::parse_from([
            "nc2raster",
            "layer",
            "input.nc",
            "dem",
            "-n",
            "elevation",
            "--x-dim",
            "x",
            "--y-dim",
            "y",
            "--crs",
            "EPSG:32633",
            "--fill-value",
            "-32768",
            "--format",
            "ascii-grid",
        ]);

        if let Commands::Layer { grid, format, .. } = &cli.command {
            assert_eq!(grid.x_dim, "x");
            assert_eq!(grid.y_dim, "y");
            assert_eq!(grid.crs.as_deref(), Some("EPSG:32633"));
            assert_eq!(grid.fill_value, Some(-32768.0));
            assert_eq!(format, &Some(RasterFormat::AsciiGrid));
        } else {
            panic!("Expected Layer command");
        }
    }

    #[test]
    fn test_layer_command_requires_variable() {
        let result = Cli::try_parse_from(["nc2raster", "layer", "input.nc", "output.parquet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_diff_command() {
        let cli = Cli::parse_from([
            "nc2raster",
            "diff",
            "precip.nc",
            "change.asc",
            "-n",
            "precip",
            "--time-dim",
            "time",
            "--from",
            "2000-01-01",
            "--to",
            "2003-01-01",
        ]);

        if let Commands::Diff {
            grid, from, to, ..
        } = &cli.command
        {
            assert_eq!(grid.time_dim.as_deref(), Some("time"));
            assert_eq!(from, "2000-01-01");
            assert_eq!(to, "2003-01-01");
        } else {
            panic!("Expected Diff command");
        }

        // Both layers are required
        let result = Cli::try_parse_from([
            "nc2raster",
            "diff",
            "precip.nc",
            "change.asc",
            "-n",
            "precip",
            "--from",
            "2000-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_point() {
        for point in ["10.5", "a,b", "1,2,3"] {
            let result = Cli::try_parse_from([
                "nc2raster",
                "sample",
                "precip.nc",
                "series.parquet",
                "-n",
                "precip",
                "--point",
                point,
            ]);
            assert!(result.is_err(), "{} should be rejected", point);
        }
    }

    #[test]
    fn test_point_from_environment() {
        unsafe {
            std::env::set_var("NC2RASTER_POINT", "-47.9,-15.8");
        }

        let cli = Cli::parse_from([
            "nc2raster",
            "sample",
            "precip.nc",
            "series.parquet",
            "-n",
            "precip",
        ]);

        if let Commands::Sample { point, .. } = &cli.command {
            assert_eq!(point.lon, -47.9);
            assert_eq!(point.lat, -15.8);
        } else {
            panic!("Expected Sample command");
        }

        unsafe {
            std::env::remove_var("NC2RASTER_POINT");
        }
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from([
            "nc2raster",
            "run",
            "job.yaml",
            "--input-override",
            "other.nc",
            "--dry-run",
        ]);

        if let Commands::Run {
            config_file,
            input_override,
            dry_run,
        } = &cli.command
        {
            assert_eq!(config_file, &Some(PathBuf::from("job.yaml")));
            assert_eq!(input_override.as_deref(), Some("other.nc"));
            assert!(*dry_run);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_info_command() {
        let cli = Cli::parse_from([
            "nc2raster",
            "info",
            "data.nc",
            "--detailed",
            "-n",
            "precip",
            "--format",
            "yaml",
        ]);

        if let Commands::Info {
            file,
            detailed,
            variable,
            format,
        } = &cli.command
        {
            assert_eq!(file, "data.nc");
            assert!(*detailed);
            assert_eq!(variable.as_deref(), Some("precip"));
            assert_eq!(format, &Some(OutputFormat::Yaml));
        } else {
            panic!("Expected Info command");
        }
    }

    #[test]
    fn test_template_types() {
        let cases = [
            ("basic", TemplateType::Basic),
            ("time-series", TemplateType::TimeSeries),
            ("difference", TemplateType::Difference),
        ];

        for (arg, expected) in cases {
            let cli = Cli::parse_from(["nc2raster", "template", arg, "--format", "yaml"]);
            if let Commands::Template {
                template_type,
                output,
                format,
            } = &cli.command
            {
                assert_eq!(template_type, &expected);
                assert_eq!(output, &None);
                assert_eq!(format, &ConfigFormat::Yaml);
            } else {
                panic!("Expected Template command");
            }
        }
    }

    #[test]
    fn test_quiet_mode() {
        let cli = Cli::parse_from(["nc2raster", "--quiet", "info", "data.nc"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_verbose_quiet_conflict() {
        let result = Cli::try_parse_from(["nc2raster", "--verbose", "--quiet", "info", "data.nc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_completions_command() {
        let cli = Cli::parse_from(["nc2raster", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Bash,
                ..
            }
        ));
    }
}
