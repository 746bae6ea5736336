use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use umbra_renderer::RenderConfig;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Cornell box with a glass sphere and a rotated block
    Cornell,
    /// Checkered floor with moving, metal and glass spheres under a spherical light
    Motion,
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "umbra")]
#[command(about = "A Monte Carlo path tracer with light importance sampling")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cornell")]
    pub scene: SceneKind,

    /// JSON render configuration; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file path (.png or .ppm)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples_per_pixel: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bucket edge length in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Apply any flags that were given on top of `config`.
    pub fn apply_overrides(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples_per_pixel {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(size) = self.bucket_size {
            config.bucket_size = size;
        }
    }
}
