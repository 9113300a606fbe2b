use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};

use sectormap::data::{self, csv};
use sectormap::layout::AspectRatio;
use sectormap::render::text::TextRenderer;
use sectormap::render::{self, ChangeBand, Theme};
use sectormap::HeatmapConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AspectArg {
    /// 1:1
    Square,
    /// 16:9
    Wide,
}

impl From<AspectArg> for AspectRatio {
    fn from(arg: AspectArg) -> Self {
        match arg {
            AspectArg::Square => AspectRatio::Square,
            AspectArg::Wide => AspectRatio::Wide,
        }
    }
}

/// Lay out market sectors as a squarified heatmap and export it.
#[derive(Parser, Debug)]
#[command(name = "sectormap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with name, marketCap, price and change columns (built-in data if omitted)
    input: Option<PathBuf>,

    /// Canvas shape
    #[arg(short, long, value_enum, default_value = "wide")]
    aspect: AspectArg,

    /// Canvas width in px
    #[arg(short, long, default_value = "1024")]
    width: f64,

    /// Light background instead of dark
    #[arg(long, action = ArgAction::SetTrue)]
    light: bool,

    /// Do not draw captions into the PNG
    #[arg(long = "no-labels", action = ArgAction::SetTrue)]
    no_labels: bool,

    /// Write an SVG image
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write a PNG image (rendered at 2x)
    #[arg(long)]
    png: Option<PathBuf>,

    /// Write the sample CSV file and exit
    #[arg(long = "sample-csv")]
    sample_csv: Option<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "sectormap=debug" } else { "sectormap=info" };
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.parse().context("invalid log directive")?),
        )
        .init();

    if let Some(path) = &args.sample_csv {
        csv::write_sample_csv(path)
            .with_context(|| format!("failed to write sample CSV to {}", path.display()))?;
        tracing::info!("Wrote sample CSV to {}", path.display());
        return Ok(());
    }

    let config = HeatmapConfig {
        width: args.width,
        aspect: args.aspect.into(),
        theme: if args.light { Theme::Light } else { Theme::Dark },
        show_labels: !args.no_labels,
        ..HeatmapConfig::default()
    };
    config.validate()?;

    let sectors = match &args.input {
        Some(path) => {
            let report = csv::read_csv_file(path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            if !report.skipped.is_empty() {
                tracing::warn!("{} line(s) skipped in {}", report.skipped.len(), path.display());
            }
            report.sectors
        }
        None => data::default_sectors(),
    };

    let viewport = config.viewport();
    let layout = viewport.layout(&data::shares(&sectors));
    tracing::info!(
        "{} sectors, total market cap {:.2}, canvas {}x{} ({})",
        sectors.len(),
        data::total_market_cap(&sectors),
        viewport.width,
        viewport.height,
        config.aspect.label()
    );

    if layout.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    println!(
        "{:<46} {:>8} {:>8} {:>8} {:>8} {:>7} {:>8}",
        "name", "x", "y", "w", "h", "share", "change"
    );
    for rect in &layout {
        let sector = &rect.item.sector;
        println!(
            "{:<46} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>6.1}% {:>8} {:?}",
            sector.name,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            rect.item.percentage,
            render::labels::format_change(sector.change),
            ChangeBand::classify(sector.change)
        );
    }

    println!();
    for band in ChangeBand::LEGEND {
        println!("  {}  {}", band.hex(), band.legend_label());
    }

    if let Some(path) = &args.svg {
        if let Some(svg) = render::export_svg(&layout, config.theme) {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
    }

    if let Some(path) = &args.png {
        let mut text = TextRenderer::new();
        if config.show_labels {
            if let Err(e) = text.load_system_font() {
                tracing::warn!("PNG captions disabled: {}", e);
            }
        }
        let text = (config.show_labels && text.has_font()).then_some(&mut text);

        if render::write_png(path, &layout, config.theme, config.export_scale, text)
            .with_context(|| format!("failed to export {}", path.display()))?
        {
            tracing::info!("Wrote {}", path.display());
        }
    }

    Ok(())
}
