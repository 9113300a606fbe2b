use crate::error::ConfigError;
use crate::layout::{AspectRatio, Viewport};
use crate::render::Theme;

/// Widest canvas accepted, in layout units.
pub const MAX_WIDTH: f64 = 8_192.0;
/// Largest PNG pixel density accepted.
pub const MAX_EXPORT_SCALE: f64 = 4.0;

/// Presentation settings resolved before any layout call.
#[derive(Debug, Clone)]
pub struct HeatmapConfig {
    /// Canvas width in layout units (px)
    pub width: f64,
    pub aspect: AspectRatio,
    pub theme: Theme,
    /// Draw name/change captions where they fit
    pub show_labels: bool,
    /// PNG pixels per layout unit
    pub export_scale: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            aspect: AspectRatio::Wide,
            theme: Theme::Dark,
            show_labels: true,
            export_scale: 2.0,
        }
    }
}

impl HeatmapConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::from_width(self.width, self.aspect)
    }

    /// Reject widths and scales that would give an empty or unallocatable canvas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0 && self.width <= MAX_WIDTH) {
            return Err(ConfigError::InvalidWidth {
                width: self.width,
                max: MAX_WIDTH,
            });
        }
        if !(self.export_scale.is_finite()
            && self.export_scale > 0.0
            && self.export_scale <= MAX_EXPORT_SCALE)
        {
            return Err(ConfigError::InvalidScale {
                scale: self.export_scale,
                max: MAX_EXPORT_SCALE,
            });
        }
        Ok(())
    }
}
