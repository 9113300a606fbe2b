use std::io::Cursor;
use std::path::Path;

use crate::data::SectorShare;
use crate::error::ExportError;
use crate::layout::LayoutRect;
use crate::render::colors::{AppColor, ChangeBand, Theme, STROKE};
use crate::render::labels::{self, LabelMetrics, LabelTarget, STROKE_WIDTH};
use crate::render::text::TextRenderer;

/// Longest image side, in pixels, that export will allocate.
pub const MAX_RASTER_SIDE: u32 = 16_384;

/// Pixel buffer produced by [`rasterize`].
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Straight RGBA, row major
    pub pixels: Vec<u8>,
}

impl RasterImage {
    fn new(width: u32, height: u32, fill: AppColor) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        let rgba = fill.to_rgba8();
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Blend `color` over every pixel whose centre lies in the canvas-space rect.
    fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: AppColor) {
        let w = self.width as usize;
        let px0 = (x0.max(0.0).round() as usize).min(w);
        let py0 = (y0.max(0.0).round() as usize).min(self.height as usize);
        let px1 = (x1.max(0.0).round() as usize).min(w);
        let py1 = (y1.max(0.0).round() as usize).min(self.height as usize);
        let opaque = color.a >= 1.0;
        let rgba = color.to_rgba8();

        for py in py0..py1 {
            let row_offset = py * w;
            for px in px0..px1 {
                let idx = (row_offset + px) * 4;
                let dst = &mut self.pixels[idx..idx + 4];
                if opaque {
                    dst.copy_from_slice(&rgba);
                } else {
                    let blended = color.blend_over([dst[0], dst[1], dst[2], dst[3]]);
                    dst.copy_from_slice(&blended);
                }
            }
        }
    }

    /// Outline of the given thickness, drawn inward from the rect edge.
    fn stroke_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, t: f64, color: AppColor) {
        let t = t.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0).max(0.0);
        self.fill_rect(x0, y0, x1, y0 + t, color);
        self.fill_rect(x0, y1 - t, x1, y1, color);
        self.fill_rect(x0, y0 + t, x0 + t, y1 - t, color);
        self.fill_rect(x1 - t, y0 + t, x1, y1 - t, color);
    }

    /// Paint white text from coverage masks with its top-left at (x, y).
    fn draw_coverage(&mut self, x: i64, y: i64, width: usize, height: usize, coverage: &[u8]) {
        for gy in 0..height {
            let py = y + gy as i64;
            if py < 0 || py >= self.height as i64 {
                continue;
            }
            for gx in 0..width {
                let px = x + gx as i64;
                if px < 0 || px >= self.width as i64 {
                    continue;
                }
                let alpha = coverage[gy * width + gx];
                if alpha == 0 {
                    continue;
                }
                let idx = (py as usize * self.width as usize + px as usize) * 4;
                let a = alpha as f32 / 255.0;
                for c in 0..3 {
                    let d = self.pixels[idx + c] as f32;
                    self.pixels[idx + c] = (255.0 * a + d * (1.0 - a)).round() as u8;
                }
            }
        }
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or(ExportError::BufferSize {
                width: self.width,
                height: self.height,
            })?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Canvas size implied by a layout: the furthest right and bottom edges.
pub fn layout_extent<T>(layout: &[LayoutRect<T>]) -> (f64, f64) {
    layout.iter().fold((0.0_f64, 0.0_f64), |(w, h), r| {
        (w.max(r.right()), h.max(r.bottom()))
    })
}

/// CPU-rasterize the heatmap boxes into an RGBA buffer.
///
/// Each box is filled with its change band colour and outlined like the
/// interactive view. Captions are drawn only when `text` holds a font.
pub fn rasterize(
    layout: &[LayoutRect<SectorShare>],
    theme: Theme,
    scale: f64,
    mut text: Option<&mut TextRenderer>,
) -> Option<RasterImage> {
    let (width, height) = match raster_size(layout, scale) {
        Ok(Some(size)) => size,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Not rasterizing: {}", e);
            return None;
        }
    };

    let mut img = RasterImage::new(width, height, theme.background());

    for rect in layout {
        let band = ChangeBand::classify(rect.item.sector.change);
        let (bx, by, bw, bh) = labels::inset(rect.x, rect.y, rect.w, rect.h);
        if bw <= 0.0 || bh <= 0.0 {
            continue;
        }

        // The stroke straddles the inset edge, half inside and half outside
        let half = STROKE_WIDTH / 2.0;
        let (x0, y0) = ((bx - half) * scale, (by - half) * scale);
        let (x1, y1) = ((bx + bw + half) * scale, (by + bh + half) * scale);
        img.fill_rect(x0, y0, x1, y1, band.color());
        img.stroke_rect(x0, y0, x1, y1, STROKE_WIDTH * scale, STROKE);

        if let Some(renderer) = text.as_deref_mut() {
            if labels::can_show_label(rect.w, rect.h) {
                draw_caption(&mut img, renderer, rect, scale);
            }
        }
    }

    tracing::debug!("Rasterized {} boxes into {}x{}", layout.len(), width, height);
    Some(img)
}

/// Pixel size of the image for `layout` at `scale`.
///
/// `None` when there is nothing to draw, an error when a side would exceed
/// [`MAX_RASTER_SIDE`].
fn raster_size<T>(layout: &[LayoutRect<T>], scale: f64) -> Result<Option<(u32, u32)>, ExportError> {
    if layout.is_empty() || !(scale > 0.0) {
        return Ok(None);
    }
    let (w, h) = layout_extent(layout);
    // Absorb float residue so a 100.00000000000001 wide layout stays 100px
    let width = (w * scale - 1e-6).ceil().max(0.0);
    let height = (h * scale - 1e-6).ceil().max(0.0);
    let max = f64::from(MAX_RASTER_SIDE);
    if !(width <= max && height <= max) {
        return Err(ExportError::TooLarge {
            width,
            height,
            max: MAX_RASTER_SIDE,
        });
    }
    if width == 0.0 || height == 0.0 {
        return Ok(None);
    }
    Ok(Some((width as u32, height as u32)))
}

/// Rasterize and encode in one go; `None` for an empty layout.
pub fn export_png(
    layout: &[LayoutRect<SectorShare>],
    theme: Theme,
    scale: f64,
    text: Option<&mut TextRenderer>,
) -> Result<Option<Vec<u8>>, ExportError> {
    if raster_size(layout, scale)?.is_none() {
        return Ok(None);
    }
    match rasterize(layout, theme, scale, text) {
        Some(img) => img.to_png().map(Some),
        None => Ok(None),
    }
}

/// Export to a PNG file at `path`. Returns `false` when there was nothing to draw.
pub fn write_png(
    path: &Path,
    layout: &[LayoutRect<SectorShare>],
    theme: Theme,
    scale: f64,
    text: Option<&mut TextRenderer>,
) -> Result<bool, ExportError> {
    let Some(png) = export_png(layout, theme, scale, text)? else {
        return Ok(false);
    };
    std::fs::write(path, png)?;
    Ok(true)
}

fn draw_caption(
    img: &mut RasterImage,
    renderer: &mut TextRenderer,
    rect: &LayoutRect<SectorShare>,
    scale: f64,
) {
    let metrics = LabelMetrics::for_width(rect.w, LabelTarget::Export);
    let lines = labels::wrap_words(&rect.item.sector.name, rect.w, metrics.name_size);
    let change = labels::format_change(rect.item.sector.change);

    let name_block = lines.len() as f64 * metrics.name_size * labels::LINE_HEIGHT;
    let change_block = metrics.change_size * 1.5;
    let total = name_block + metrics.gap() + change_block;
    let mut cursor_y = rect.y + rect.h / 2.0 - total / 2.0;
    let centre_x = rect.x + rect.w / 2.0;

    let mut rows: Vec<(String, f64, f64)> = lines
        .into_iter()
        .map(|line| {
            let row = (line, metrics.name_size, cursor_y);
            cursor_y += metrics.name_size * labels::LINE_HEIGHT;
            row
        })
        .collect();
    rows.push((change, metrics.change_size, cursor_y + metrics.gap()));

    for (line, size, top) in rows {
        let Some(rendered) = renderer.render_text(&line, (size * scale) as f32) else {
            continue;
        };
        let left = centre_x * scale - rendered.width as f64 / 2.0;
        for glyph in &rendered.glyphs {
            img.draw_coverage(
                (left + glyph.x as f64).round() as i64,
                (top * scale + glyph.y as f64).round() as i64,
                glyph.width,
                glyph.height,
                &glyph.coverage,
            );
        }
    }
}
