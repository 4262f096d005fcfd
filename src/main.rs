//! pixeldust viewer binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pixeldust::{load_image, EffectConfig, Field, Viewer};

/// Show images as particle fields that scatter from the mouse.
///
/// Keys: Space/S scatter, N/Enter or right click switch image, Escape quit.
#[derive(Parser)]
#[command(name = "pixeldust", version, about, long_about = None)]
struct Cli {
    /// Source images (PNG or JPEG), cycled in order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON effect config; missing keys use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field width in pixels
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Field height in pixels
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Seed for reproducible particle motion (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins; the flags only pick the default filter.
    let default_filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => EffectConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EffectConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    let images = cli
        .images
        .iter()
        .map(load_image)
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("loaded {} images", images.len());

    let field = Field::new(cli.width, cli.height, images, config)?;
    Viewer::new(field).run()?;
    Ok(())
}
