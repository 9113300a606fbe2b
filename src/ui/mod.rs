pub mod tooltip;

pub use tooltip::{build_tooltip, hit_test, TooltipInfo};
