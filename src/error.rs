//! Error types for sector data import and image export.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to import a sector table.
///
/// A table that parses but holds no rows is not an error; it comes back as
/// `Ok` with an empty vector.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV headers are incorrect, missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to produce an image file from a layout.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),

    #[error("raster buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },

    #[error("image of {width}x{height}px exceeds the {max}px side limit")]
    TooLarge { width: f64, height: f64, max: u32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Presentation settings that cannot produce a usable canvas.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("canvas width must be a finite number in (0, {max}], got {width}")]
    InvalidWidth { width: f64, max: f64 },

    #[error("export scale must be a finite number in (0, {max}], got {scale}")]
    InvalidScale { scale: f64, max: f64 },
}
