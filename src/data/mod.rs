pub mod csv;

use compact_str::CompactString;

use crate::layout::Weighted;

/// One market segment as entered or imported by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub name: CompactString,
    /// Market capitalisation, drives the rectangle area
    pub market_cap: f64,
    pub price: f64,
    /// Daily change in percent, drives the colour band
    pub change: f64,
}

impl Sector {
    pub fn new(name: &str, market_cap: f64, price: f64, change: f64) -> Self {
        Self {
            name: CompactString::new(name),
            market_cap,
            price,
            change,
        }
    }
}

/// A sector together with its share of the total market cap, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorShare {
    pub sector: Sector,
    pub percentage: f64,
}

impl Weighted for SectorShare {
    fn weight(&self) -> f64 {
        self.percentage
    }
}

pub fn total_market_cap(sectors: &[Sector]) -> f64 {
    sectors.iter().map(|s| s.market_cap).sum()
}

/// Attach each sector's percentage of the total market cap.
///
/// All percentages are zero when the total is not positive, which the layout
/// engine turns into an empty layout.
pub fn shares(sectors: &[Sector]) -> Vec<SectorShare> {
    let total = total_market_cap(sectors);
    sectors
        .iter()
        .map(|s| SectorShare {
            sector: s.clone(),
            percentage: if total > 0.0 {
                s.market_cap / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Built-in Tadawul sector snapshot shown before any import.
pub fn default_sectors() -> Vec<Sector> {
    const ROWS: &[(&str, f64, f64)] = &[
        ("Commercial & Professional Svc", 4284.46, 1.76),
        ("Tadawul All Share Index (TASI)", 11302.35, 0.41),
        ("Transportation", 5593.49, 0.64),
        ("Consumer Durables & Apparel", 4152.07, -0.4),
        ("Consumer Services", 4191.26, 1.54),
        ("Media and Entertainment", 19626.7, 0.16),
        ("Consumer Discretionary Distribution & Retail", 8408.9, 0.48),
        ("Consumer Staples Distribution & Retail", 6735.78, -0.28),
        ("Food & Beverages", 4871.43, 1.28),
        ("Health Care Equipment & Svc", 10671.34, 0.2),
        ("Pharma, Biotech & Life Science", 4904.49, 1.36),
        ("Banks", 12800.49, 0.57),
        ("Financial Services", 6696.19, 0.6),
        ("Insurance", 8464.85, 0.92),
        ("Telecommunication Services", 8929.69, -0.83),
        ("Utilities", 8450.47, -0.08),
        ("Household & Personal Products", 4834.25, 2.26),
        ("REITs", 3008.32, 0.75),
        ("Energy", 4924.57, 0.93),
        ("Materials", 5296.5, -0.68),
        ("Capital Goods", 15635.25, 1.48),
        ("Tadawul Large Cap Index", 4771.61, 0.02),
        ("Real Estate Mgmt & Dev't", 3801.76, 0.63),
        ("MSCI Tadawul 30 Index", 1468.54, 0.19),
        ("Software & Services", 6187.39, -0.16),
        ("Tadawul Medium Cap Index", 4549.22, 0.74),
        ("Tadawul Small Cap Index", 4808.58, 0.47),
        ("TASSI50 Index", 4834.73, 0.31),
    ];

    ROWS.iter()
        .map(|&(name, cap, change)| Sector::new(name, cap, 0.0, change))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_sum_to_one_hundred() {
        let shares = shares(&default_sectors());
        assert_eq!(shares.len(), 28);
        let total: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let sectors = [Sector::new("a", 0.0, 1.0, 0.0), Sector::new("b", 0.0, 1.0, 0.0)];
        assert!(shares(&sectors).iter().all(|s| s.percentage == 0.0));
        assert!(shares(&[]).is_empty());
    }

    #[test]
    fn share_is_proportional_to_market_cap() {
        let sectors = [Sector::new("a", 300.0, 0.0, 0.0), Sector::new("b", 100.0, 0.0, 0.0)];
        let shares = shares(&sectors);
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].weight(), 25.0);
    }
}
