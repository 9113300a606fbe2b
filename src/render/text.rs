use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use std::path::{Path, PathBuf};

/// Rasterizes caption text with a single system font.
pub struct TextRenderer {
    font: Option<Font>,
    layout: Layout,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            font: None,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn load_font_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let data = std::fs::read(path)?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        self.font = Some(font);
        Ok(())
    }

    /// Try a list of well-known bold sans-serif fonts.
    pub fn load_system_font(&mut self) -> anyhow::Result<()> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeuib.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arialbd.ttf")));
        }
        candidates.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial Bold.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans-Bold.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"));

        for path in candidates {
            if self.load_font_file(&path).is_ok() {
                tracing::info!("Loaded label font from {}", path.display());
                return Ok(());
            }
        }

        anyhow::bail!("unable to load a system font from known locations")
    }

    /// Lay out and rasterize one line of text as coverage masks.
    pub fn render_text(&mut self, text: &str, font_size: f32) -> Option<TextRenderResult> {
        let font = self.font.as_ref()?;

        self.layout.reset(&LayoutSettings::default());
        self.layout.append(&[font], &TextStyle::new(text, font_size, 0));

        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for glyph in self.layout.glyphs() {
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            let right = glyph.x + metrics.width as f32;
            let bottom = glyph.y + metrics.height as f32;
            width = width.max(right);
            height = height.max(bottom);

            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            glyphs.push(TextGlyph {
                x: glyph.x,
                y: glyph.y,
                width: metrics.width,
                height: metrics.height,
                coverage,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextRenderResult {
            glyphs,
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        })
    }
}

pub struct TextRenderResult {
    pub glyphs: Vec<TextGlyph>,
    pub width: u32,
    pub height: u32,
}

pub struct TextGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    /// Grayscale coverage, one byte per pixel
    pub coverage: Vec<u8>,
}
