/// Diagnostic tool to verify data → layout → label pipeline
use sectormap::data::{self, csv};
use sectormap::layout::{AspectRatio, Viewport};
use sectormap::render::labels::can_show_label;
use sectormap::render::ChangeBand;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sectormap=debug".parse()?),
        )
        .init();

    let input = std::env::args().nth(1).map(PathBuf::from);

    println!("=== DIAGNOSTIC: Data → Layout Pipeline ===");

    // Load
    let sectors = match &input {
        Some(path) => {
            println!("Importing: {}", path.display());
            let report = csv::read_csv_file(path)?;
            for skipped in &report.skipped {
                println!("    skipped line {}: {:?}", skipped.line, skipped.reason);
            }
            report.sectors
        }
        None => {
            println!("Using built-in sector data");
            data::default_sectors()
        }
    };
    let shares = data::shares(&sectors);
    println!("\n[1] Loaded {} sectors (total cap {:.2})", sectors.len(), data::total_market_cap(&sectors));

    for aspect in [AspectRatio::Wide, AspectRatio::Square] {
        let vp = Viewport::from_width(1024.0, aspect);
        let layout = vp.layout(&shares);

        println!(
            "\n[2] Layout {} ({:.0}x{:.0}): {} rectangles",
            aspect.label(),
            vp.width,
            vp.height,
            layout.len()
        );

        // Top 10 largest rectangles (layout order is already area-descending)
        for (i, rect) in layout.iter().take(10).enumerate() {
            println!(
                "    [{}] '{}' - rect: {:.1}x{:.1} at ({:.1}, {:.1}) - share {:.2}% - {:?}",
                i,
                rect.item.sector.name,
                rect.w,
                rect.h,
                rect.x,
                rect.y,
                rect.item.percentage,
                ChangeBand::classify(rect.item.sector.change)
            );
        }

        // Check for anomalies
        let covered: f64 = layout.iter().map(|r| r.w * r.h).sum();
        println!("    Total rect area: {:.1}px²", covered);
        println!("    Viewport area:   {:.1}px²", vp.area());
        println!("    Coverage: {:.4}%", covered / vp.area() * 100.0);

        let mut overlaps = 0;
        for (i, a) in layout.iter().enumerate() {
            for b in &layout[i + 1..] {
                let ix = a.right().min(b.right()) - a.x.max(b.x);
                let iy = a.bottom().min(b.bottom()) - a.y.max(b.y);
                if ix > 1e-6 && iy > 1e-6 {
                    overlaps += 1;
                    println!("    OVERLAP: '{}' and '{}'", a.item.sector.name, b.item.sector.name);
                }
            }
        }
        println!("    Overlapping pairs: {}", overlaps);

        let worst = layout
            .iter()
            .filter(|r| r.w > 0.0 && r.h > 0.0)
            .map(|r| (r.w / r.h).max(r.h / r.w))
            .fold(1.0_f64, f64::max);
        println!("    Worst aspect ratio: {:.2}", worst);

        let labeled = layout.iter().filter(|r| can_show_label(r.w, r.h)).count();
        println!("    Label count: {} rects (out of {})", labeled, layout.len());
    }

    Ok(())
}
