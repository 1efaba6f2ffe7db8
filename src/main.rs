use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use nc2raster::cli::{generate_template, render_config, Cli, Commands, OutputFormat};
use nc2raster::info::{
    get_netcdf_info, print_file_info_csv, print_file_info_human, print_file_info_json,
    print_file_info_yaml,
};
use nc2raster::input::JobConfig;
use nc2raster::log::{config_echo, show_farewell_with_timing, show_greeting, show_stack_summary};
use nc2raster::process_raster_job;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Commands::Run {
            config_file,
            input_override,
            dry_run,
        } => {
            let path = config_file
                .as_ref()
                .or(cli.config.as_ref())
                .context("No job configuration given (pass a file or --config)")?;
            let mut config = load_config(path)?;
            if let Some(input) = input_override {
                config.nc_key = input.clone();
            }
            if *dry_run {
                if !cli.quiet {
                    config_echo(&config);
                    println!("\nConfiguration is valid.");
                }
                return Ok(());
            }
            run(&config, cli.quiet)
        }
        Commands::Layer { .. } | Commands::Sample { .. } | Commands::Diff { .. } => {
            let config = cli
                .command
                .to_job_config()
                .context("Command does not describe a raster job")?;
            run(&config, cli.quiet)
        }
        Commands::Info {
            file,
            detailed,
            variable,
            format,
        } => {
            let info = get_netcdf_info(file, variable.as_deref(), *detailed)?;
            match format.as_ref().unwrap_or(&cli.output_format) {
                OutputFormat::Human => print_file_info_human(&info),
                OutputFormat::Json => print_file_info_json(&info)?,
                OutputFormat::Yaml => print_file_info_yaml(&info)?,
                OutputFormat::Csv => print_file_info_csv(&info)?,
            }
            Ok(())
        }
        Commands::Template {
            template_type,
            output,
            format,
        } => {
            let rendered = render_config(&generate_template(template_type), format)?;
            write_text(output.as_ref(), rendered.as_bytes())
        }
        Commands::Completions { shell, output } => {
            let mut command = Cli::command();
            let mut buffer = Vec::new();
            clap_complete::generate(*shell, &mut command, "nc2raster", &mut buffer);
            write_text(output.as_ref(), &buffer)
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: &Path) -> Result<JobConfig> {
    debug!("Loading job configuration from {}", path.display());
    JobConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))
}

fn run(config: &JobConfig, quiet: bool) -> Result<()> {
    let start_time = Instant::now();

    if !quiet {
        show_greeting(&config.nc_key);
        config_echo(config);
    }

    let stack = process_raster_job(config)
        .with_context(|| format!("Failed to process {}", config.nc_key))?;

    if !quiet {
        show_stack_summary(&stack);
        show_farewell_with_timing(start_time.elapsed());
    }
    Ok(())
}

fn write_text(output: Option<&PathBuf>, content: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => std::io::stdout().write_all(content)?,
    }
    Ok(())
}
