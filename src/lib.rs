// Public library interface for sectormap
// The CLI and the debug-layout tool both build on these modules

pub mod config;
pub mod data;
pub mod error;
pub mod layout;
pub mod render;
pub mod ui;

pub use config::HeatmapConfig;
pub use error::{ConfigError, ExportError, ImportError};
pub use layout::{squarify, LayoutRect, Viewport, Weighted};
