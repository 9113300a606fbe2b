use std::fmt::Write;

use crate::data::SectorShare;
use crate::layout::LayoutRect;
use crate::render::colors::{ChangeBand, Theme, STROKE_CSS};
use crate::render::labels::{self, LabelMetrics, LabelTarget, LINE_HEIGHT, STROKE_WIDTH};
use crate::render::raster::layout_extent;

const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif, 'Apple Color Emoji', 'Segoe UI Emoji', 'Segoe UI Symbol'";

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Standalone SVG document for a layout, sized to the layout's extent.
///
/// `None` when there is nothing to draw.
pub fn export_svg(layout: &[LayoutRect<SectorShare>], theme: Theme) -> Option<String> {
    if layout.is_empty() {
        return None;
    }
    let (width, height) = layout_extent(layout);
    Some(build_svg(layout, theme, width, height))
}

/// SVG document of the given canvas size.
pub fn build_svg(
    layout: &[LayoutRect<SectorShare>],
    theme: Theme,
    width: f64,
    height: f64,
) -> String {
    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="{bg}" />"#,
        w = width,
        h = height,
        bg = theme.background_hex(),
    );

    let boxes: Vec<String> = layout.iter().map(svg_box).collect();
    svg.push_str(&boxes.join("\n"));
    svg.push_str("</svg>");
    svg
}

fn svg_box(rect: &LayoutRect<SectorShare>) -> String {
    let fill = ChangeBand::classify(rect.item.sector.change).hex();
    let (x, y, w, h) = labels::inset(rect.x, rect.y, rect.w, rect.h);
    let caption = if labels::can_show_label(rect.w, rect.h) {
        caption(rect)
    } else {
        String::new()
    };

    format!(
        r#"<g><rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}" stroke="{STROKE_CSS}" stroke-width="{STROKE_WIDTH}" />{caption}</g>"#
    )
}

fn caption(rect: &LayoutRect<SectorShare>) -> String {
    let sector = &rect.item.sector;
    let metrics = LabelMetrics::for_width(rect.w, LabelTarget::Export);
    let name_size = metrics.name_size;
    let change_size = metrics.change_size;

    // Wrap the escaped text so entity lengths count, matching the browser export
    let lines = labels::wrap_words(&escape_xml(&sector.name), rect.w, name_size);

    let name_block = lines.len() as f64 * name_size * LINE_HEIGHT;
    let change_block = change_size * 1.5;
    let total = name_block + metrics.gap() + change_block;
    let content_top = rect.y + rect.h / 2.0 - total / 2.0;
    let name_y = content_top + name_size * (LINE_HEIGHT - 1.0);
    let centre_x = rect.x + rect.w / 2.0;

    let mut tspans = String::new();
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 {
            "0".to_string()
        } else {
            format!("{}em", LINE_HEIGHT)
        };
        let _ = write!(tspans, r#"<tspan x="{centre_x}" dy="{dy}">{line}</tspan>"#);
    }

    let change_y = content_top + name_block + metrics.gap() + change_size;
    let change_text = escape_xml(&labels::format_change(sector.change));

    format!(
        concat!(
            r##"<text y="{name_y}" font-family="{font}" font-weight="700" font-size="{name_size}" fill="#FFFFFF" text-anchor="middle">{tspans}</text>"##,
            r##"<text x="{centre_x}" y="{change_y}" font-family="{font}" font-weight="700" font-size="{change_size}" fill="#FFFFFF" text-anchor="middle">{change_text}</text>"##,
        ),
        name_y = name_y,
        font = FONT_FAMILY,
        name_size = name_size,
        tspans = tspans,
        centre_x = centre_x,
        change_y = change_y,
        change_size = change_size,
        change_text = change_text,
    )
}
