//! When and how a box gets its name/change caption.

/// Stroke drawn around every box, in canvas units.
pub const STROKE_WIDTH: f64 = 3.0;

/// Line height multiplier for wrapped names.
pub const LINE_HEIGHT: f64 = 1.2;

/// Where a caption is drawn; exports use slightly smaller type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    Interactive,
    Export,
}

impl LabelTarget {
    fn base_divisor(self) -> f64 {
        match self {
            LabelTarget::Interactive => 12.0,
            LabelTarget::Export => 14.0,
        }
    }
}

/// Only boxes with room for text get a caption.
pub fn can_show_label(w: f64, h: f64) -> bool {
    w.min(h) > 30.0 && w > 40.0
}

/// Font sizes for a caption inside a box of width `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    pub name_size: f64,
    pub change_size: f64,
}

impl LabelMetrics {
    pub fn for_width(w: f64, target: LabelTarget) -> Self {
        let base = w / target.base_divisor();
        Self {
            name_size: base.clamp(9.0, 18.0),
            change_size: (base * 1.05).clamp(10.0, 18.0),
        }
    }

    /// Gap between the name block and the change line.
    pub fn gap(&self) -> f64 {
        self.name_size * 0.4
    }
}

/// Signed change text, e.g. `+1.76%` or `-0.40%`.
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{:.2}%", change)
    } else {
        format!("{:.2}%", change)
    }
}

/// Greedy word wrap using an approximate glyph width of `0.6 * font_size`,
/// within 90% of the box width. A single long word stays on its own line.
pub fn wrap_words(text: &str, box_width: f64, font_size: f64) -> Vec<String> {
    let available = box_width * 0.9;
    let char_w = font_size * 0.6;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if candidate.chars().count() as f64 * char_w > available {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Box rectangle after insetting by half the stroke on each side.
pub fn inset(x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
    let half = STROKE_WIDTH / 2.0;
    (
        x + half,
        y + half,
        (w - STROKE_WIDTH).max(0.0),
        (h - STROKE_WIDTH).max(0.0),
    )
}
