use vello::peniko::Color;

/// Performance band of a sector's daily change, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeBand {
    /// Above +1.5%
    StrongPositive,
    /// Above +0.05% up to +1.5%
    Positive,
    /// -0.05% to +0.05% inclusive
    Neutral,
    /// Below -0.05% down to -1.5%
    Negative,
    /// Below -1.5%
    StrongNegative,
}

impl ChangeBand {
    /// Legend order, most negative first.
    pub const LEGEND: [ChangeBand; 5] = [
        ChangeBand::StrongNegative,
        ChangeBand::Negative,
        ChangeBand::Neutral,
        ChangeBand::Positive,
        ChangeBand::StrongPositive,
    ];

    pub fn classify(change: f64) -> Self {
        if change > 1.5 {
            ChangeBand::StrongPositive
        } else if change > 0.05 {
            ChangeBand::Positive
        } else if change < -1.5 {
            ChangeBand::StrongNegative
        } else if change < -0.05 {
            ChangeBand::Negative
        } else {
            ChangeBand::Neutral
        }
    }

    pub fn color(self) -> AppColor {
        match self {
            ChangeBand::StrongPositive => AppColor::from_rgb8(0x22, 0xC5, 0x5E),
            ChangeBand::Positive => AppColor::from_rgb8(0x15, 0x80, 0x3D),
            ChangeBand::Neutral => AppColor::from_rgb8(0x33, 0x41, 0x55),
            ChangeBand::Negative => AppColor::from_rgb8(0xB9, 0x1C, 0x1C),
            ChangeBand::StrongNegative => AppColor::from_rgb8(0xDC, 0x26, 0x26),
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ChangeBand::StrongPositive => "#22C55E",
            ChangeBand::Positive => "#15803d",
            ChangeBand::Neutral => "#334155",
            ChangeBand::Negative => "#B91C1C",
            ChangeBand::StrongNegative => "#DC2626",
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            ChangeBand::StrongNegative => "Strong Negative (< -1.5%)",
            ChangeBand::Negative => "Negative",
            ChangeBand::Neutral => "Neutral (-0.05% to +0.05%)",
            ChangeBand::Positive => "Positive",
            ChangeBand::StrongPositive => "Strong Positive (> +1.5%)",
        }
    }

    /// Tooltip text tone: only the sign matters here.
    pub fn tone(self) -> Tone {
        match self {
            ChangeBand::StrongPositive | ChangeBand::Positive => Tone::Up,
            ChangeBand::Neutral => Tone::Flat,
            ChangeBand::Negative | ChangeBand::StrongNegative => Tone::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Up,
    Flat,
    Down,
}

/// Canvas theme for exports and the interactive scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn background(self) -> AppColor {
        match self {
            Theme::Dark => AppColor::new(0.0, 0.0, 0.0),
            Theme::Light => AppColor::new(1.0, 1.0, 1.0),
        }
    }

    pub fn background_hex(self) -> &'static str {
        match self {
            Theme::Dark => "#000000",
            Theme::Light => "#FFFFFF",
        }
    }
}

/// Box outline, white at 80% opacity.
pub const STROKE: AppColor = AppColor {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 0.8,
};

pub const STROKE_CSS: &str = "rgba(255, 255, 255, 0.8)";

/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Convert to vello's peniko Color (AlphaColor<Srgb>).
    pub fn to_peniko(self) -> Color {
        Color::new([self.r, self.g, self.b, self.a])
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Create a lighter version (for hover highlight).
    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }

    /// Source-over blend of `self` onto an opaque `dst`.
    pub fn blend_over(self, dst: [u8; 4]) -> [u8; 4] {
        let [r, g, b, _] = self.to_rgba8();
        let a = self.a.clamp(0.0, 1.0);
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        [mix(r, dst[0]), mix(g, dst[1]), mix(b, dst[2]), 255]
    }
}
