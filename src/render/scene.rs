use vello::kurbo::{Affine, Rect, Stroke};
use vello::peniko::Fill;
use vello::Scene;

use crate::data::SectorShare;
use crate::layout::LayoutRect;
use crate::render::colors::{ChangeBand, Theme, STROKE};
use crate::render::labels::{self, STROKE_WIDTH};

/// Get the inset box for a layout rect (as a vello kurbo Rect).
pub fn box_shape<T>(rect: &LayoutRect<T>) -> Rect {
    let (x, y, w, h) = labels::inset(rect.x, rect.y, rect.w, rect.h);
    Rect::new(x, y, x + w, y + h)
}

/// Build a Vello scene of the interactive heatmap boxes.
///
/// Captions are left to the front-end's text stack; `hover` brightens one box.
pub fn build_scene(
    scene: &mut Scene,
    layout: &[LayoutRect<SectorShare>],
    theme: Theme,
    viewport: (f64, f64),
    hover: Option<usize>,
) {
    scene.reset();

    let background = Rect::new(0.0, 0.0, viewport.0, viewport.1);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        theme.background().to_peniko(),
        None,
        &background,
    );

    if layout.is_empty() {
        tracing::debug!("No sectors to draw");
        return;
    }

    let outline = Stroke::new(STROKE_WIDTH);
    for (idx, rect) in layout.iter().enumerate() {
        let shape = box_shape(rect);
        if shape.width() <= 0.0 || shape.height() <= 0.0 {
            continue;
        }

        let mut color = ChangeBand::classify(rect.item.sector.change).color();
        if hover == Some(idx) {
            color = color.lighten(0.15);
        }

        scene.fill(Fill::NonZero, Affine::IDENTITY, color.to_peniko(), None, &shape);
        scene.stroke(&outline, Affine::IDENTITY, STROKE.to_peniko(), None, &shape);
    }
}
