use crate::input::{JobConfig, OutputConfig};
use crate::stack::RasterStack;
use std::time::Duration;

pub fn show_greeting(input: &str) {
    println!("=== NetCDF to Raster Converter ===");
    println!("Input: {}", input);
}

pub fn config_echo(config: &JobConfig) {
    println!("\nConfiguration:");
    println!("  Input NetCDF: {}", config.nc_key);
    println!("  Variable: {}", config.variable_name);
    println!("  Axes: x = {}, y = {}", config.x_dimension, config.y_dimension);
    if let Some(time_dim) = &config.time_dimension {
        println!("  Layers from: {}", time_dim);
    }
    if let Some(crs) = &config.crs {
        println!("  CRS: {}", crs);
    }
    println!("  Number of outputs: {}", config.outputs.len());

    for (i, output) in config.outputs.iter().enumerate() {
        let detail = match output {
            OutputConfig::Layer { params } => {
                format!("layer {}", params.key.as_deref().unwrap_or("<first>"))
            }
            OutputConfig::Sample { params } => format!("sample at ({}, {})", params.lon, params.lat),
            OutputConfig::Diff { params } => format!("diff {} -> {}", params.from, params.to),
        };
        println!("    Output {}: {} -> {}", i + 1, detail, output.output_path());
    }
}

pub fn show_stack_summary(stack: &RasterStack<String>) {
    let bbox = stack.bbox();
    println!("\nRaster Stack:");
    println!("  Layers: {}", stack.len());
    println!("  Size: {} rows x {} columns", stack.height(), stack.width());
    println!(
        "  Extent: x [{}, {}], y [{}, {}]",
        bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y
    );
    println!("  CRS: {}", stack.crs());

    let keys: Vec<&str> = stack.keys().map(|k| k.as_str()).collect();
    match keys.as_slice() {
        [] => {}
        [only] => println!("  Key: {}", only),
        [first, .., last] => println!("  Keys: {} .. {}", first, last),
    }
}

pub fn show_farewell_with_timing(elapsed: Duration) {
    println!(
        "\n=== Conversion completed successfully in {:.2}s! ===",
        elapsed.as_secs_f64()
    );
}
