use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::fs;
use std::path::Path;
use std::time::Instant;
use umbra_renderer::{render, RenderConfig};

mod cli;
mod scenes;

use cli::Args;

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Read a JSON render configuration. Missing fields take their defaults.
fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RenderConfig::default(),
    };
    args.apply_overrides(&mut config);

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    info!("Umbra {} - scene {:?}", env!("CARGO_PKG_VERSION"), args.scene);
    config.validate().context("Invalid render configuration")?;

    let start = Instant::now();
    let scene = scenes::build(args.scene, &config)
        .with_context(|| format!("Failed to build scene {:?}", args.scene))?;
    info!("Scene built in {:.2?}", start.elapsed());

    let image = render(&scene, &config).context("Render failed")?;
    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Done in {:.2?}", start.elapsed());
    Ok(())
}
