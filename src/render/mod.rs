pub mod colors;
pub mod labels;
pub mod raster;
pub mod scene;
pub mod svg;
pub mod text;

pub use colors::{ChangeBand, Theme};
pub use raster::{export_png, rasterize, write_png};
pub use svg::export_svg;
