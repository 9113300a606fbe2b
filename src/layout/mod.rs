pub mod squarify;

use compact_str::CompactString;

pub use squarify::{
    allocate_areas, build_row, layout_areas, squarify, worst_aspect_ratio, ItemWithArea,
    LayoutRect, Placement,
};

/// Anything that can be sized in a treemap.
///
/// The weight only needs to be meaningful relative to the other items in the
/// same layout call. Negative and NaN weights are treated as zero.
pub trait Weighted {
    fn weight(&self) -> f64;
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

/// Minimal named weight, for callers without a payload of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedItem {
    pub name: CompactString,
    pub weight: f64,
}

impl WeightedItem {
    pub fn new(name: impl Into<CompactString>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

impl Weighted for WeightedItem {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Shape of the heatmap canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// 1:1
    Square,
    /// 16:9
    #[default]
    Wide,
}

impl AspectRatio {
    /// Height for a canvas of the given width.
    pub fn height_for(self, width: f64) -> f64 {
        match self {
            AspectRatio::Square => width,
            AspectRatio::Wide => width * (9.0 / 16.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide => "16:9",
        }
    }
}

/// Concrete target rectangle handed to the layout engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Resolve a canvas width and aspect ratio into both dimensions.
    pub fn from_width(width: f64, aspect: AspectRatio) -> Self {
        Self {
            width,
            height: aspect.height_for(width),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Squarify `items` over the whole viewport, origin at (0, 0).
    pub fn layout<T: Weighted + Clone>(&self, items: &[T]) -> Vec<LayoutRect<T>> {
        squarify(items, 0.0, 0.0, self.width, self.height)
    }
}
