use std::{fs::File, path::PathBuf, time::Instant};

use anyhow::{anyhow, Result};
use clap::Parser;
use clip_raster::{ImageTexture, RenderConfig, RenderExecutor, Stats, StatsNodeTrait};
use log::{error, info, LevelFilter};
use options::Options;

mod options;

/// Initializes the program logging
///
/// # Arguments
/// * `filter` - The log level filter, i.e., the minimum log level to be logged.
fn initialize_logging(filter: LevelFilter) {
    let mut builder = pretty_env_logger::formatted_timed_builder();

    builder.filter_level(filter).init();
}

/// Loads the first texture that matches the provided glob pattern.
///
/// # Arguments
/// * `pattern` - The glob pattern for the texture files.
fn load_texture(pattern: &str) -> Result<ImageTexture> {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(err) => {
            error!("Invalid texture pattern: {:?}", err);
            return Err(err.into());
        }
    };

    for entry in paths {
        match entry {
            Ok(path) => {
                info!("Loading texture '{}'...", path.display());

                match ImageTexture::from_file(&path) {
                    Ok(texture) => return Ok(texture),
                    Err(err) => {
                        error!("Failed to load texture: {:?}", err);
                        info!("Skipping texture...");
                    }
                }
            }
            Err(err) => {
                error!("Failed to read entry: {:?}", err);
                info!("Skipping entry...");
            }
        }
    }

    Err(anyhow!("No texture matches '{}'", pattern))
}

/// Reads the render configuration from the given file.
///
/// # Arguments
/// * `path` - The path of the YAML configuration.
fn load_config(path: &str) -> Result<RenderConfig> {
    let file = File::open(path).map_err(|err| {
        error!("Failed to open the configuration '{}': {:?}", path, err);
        err
    })?;

    Ok(RenderConfig::read(file)?)
}

/// Runs the program.
///
/// # Arguments
/// * `options` - The program options.
fn run_program(options: Options) -> anyhow::Result<()> {
    let s = Stats::root();
    let t_ = Instant::now();

    let mut config = load_config(&options.config)?;
    if let Some(frames) = options.frames {
        config.num_frames = frames;
    }

    let texture = match options.texture.as_ref() {
        Some(pattern) => {
            let _t = s.get_child("loading").register_timing();
            Some(load_texture(pattern)?)
        }
        None => None,
    };

    let executor = RenderExecutor::new(config, texture, PathBuf::from(&options.output));
    let stats = {
        let _t = s.get_child("rendering").register_timing();
        executor.run(s.clone())?
    };

    info!("Render information:");
    info!("  - Number of input triangles: {}", stats.num_triangles);
    info!("  - Number of clipped triangles: {}", stats.num_clipped);
    info!("  - Number of culled triangles: {}", stats.num_culled);
    info!("  - Number of rasterized triangles: {}", stats.num_rasterized);
    info!(
        "Finished in {} ms",
        t_.elapsed().as_secs_f64() * 1e3f64
    );

    Ok(())
}

fn main() {
    let options = Options::parse();
    initialize_logging(options.log_level.into());
    options.dump_to_log();

    match run_program(options) {
        Ok(_) => {
            info!("Stat:");
            info!("{}", format!("{}", *Stats::root().lock().unwrap()));
            info!("Program completed successfully");
        }
        Err(err) => {
            error!("Program failed: {:?}", err);
            std::process::exit(1);
        }
    }
}
