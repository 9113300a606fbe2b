use crate::data::SectorShare;
use crate::layout::LayoutRect;
use crate::render::colors::{ChangeBand, Tone};
use crate::render::labels::format_change;

/// Information to display in the tooltip when hovering over a sector.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub name: String,
    pub market_cap_display: String,
    pub share_display: String,
    pub price_display: String,
    pub change_display: String,
    pub tone: Tone,
}

impl TooltipInfo {
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!("Market Cap: ${}", self.market_cap_display),
            format!("Portfolio Share: {}", self.share_display),
            format!("Price: ${}", self.price_display),
            format!("Change: {}", self.change_display),
        ]
    }
}

/// Build tooltip info for a laid-out sector.
pub fn build_tooltip(share: &SectorShare) -> TooltipInfo {
    let sector = &share.sector;
    TooltipInfo {
        name: sector.name.to_string(),
        market_cap_display: format_grouped(sector.market_cap),
        share_display: format!("{:.1}%", share.percentage),
        price_display: format_grouped(sector.price),
        change_display: format_change(sector.change),
        tone: ChangeBand::classify(sector.change).tone(),
    }
}

/// Index of the box under the cursor, if any.
pub fn hit_test<T>(layout: &[LayoutRect<T>], x: f64, y: f64) -> Option<usize> {
    layout.iter().position(|r| r.contains(x, y))
}

/// Thousands-separated number with at most three decimals, e.g. `19,626.7`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}
