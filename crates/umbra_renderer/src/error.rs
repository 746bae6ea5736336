//! Error types for scene construction and render output.

use thiserror::Error;

/// Errors raised while assembling the scene's acceleration structures.
///
/// These are invariant violations: a scene that produces one cannot be
/// rendered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("cannot build a BVH over an empty primitive list")]
    EmptyList,

    #[error("primitive {index} has no bounding box over time [{time0}, {time1}]")]
    MissingBoundingBox { index: usize, time0: f32, time1: f32 },
}

/// Errors raised while configuring a render or writing its output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
