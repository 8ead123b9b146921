use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rainchart::config::ChartConfig;
use rainchart::ir::Point;
use rainchart::loader::SourceCatalog;
use rainchart::palette::{self, Stylesheet};
use rainchart::runtime::{ChartRuntime, RenderOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Svg,
    Jpg,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "rainchart")]
#[command(about = "Chart average monthly rainfall by district from CSV data", long_about = None)]
struct Args {
    #[arg(long = "data-dir", default_value = "data", help = "Directory holding the rainfall CSV files")]
    data_dir: PathBuf,

    #[arg(short = 's', long = "source", help = "Data source label or file name (defaults to the first one)")]
    source: Option<String>,

    #[arg(long = "list", help = "List available data sources and exit")]
    list: bool,

    #[arg(short = 'f', long = "format", value_enum, default_value = "svg", help = "Export format")]
    format: OutputFormat,

    #[arg(short = 'o', long = "out-dir", default_value = ".", help = "Directory for exported files")]
    out_dir: PathBuf,

    #[arg(long = "width", default_value = "900", help = "Chart width in logical units")]
    width: u32,

    #[arg(long = "height", default_value = "500", help = "Chart height in logical units")]
    height: u32,

    #[arg(short = 't', long = "title", help = "Chart title")]
    title: Option<String>,

    #[arg(long = "bar-color", help = "Bar fill as #rrggbb or a color name")]
    bar_color: Option<String>,

    #[arg(long = "hover", help = "Print the hover label of this district's bar")]
    hover: Option<String>,

    #[arg(long = "log-level", default_value = "warn", help = "Log filter when RUST_LOG is unset")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let catalog = SourceCatalog::discover(&args.data_dir)
        .with_context(|| format!("Failed to read data directory '{}'", args.data_dir.display()))?;

    if args.list {
        for label in catalog.labels() {
            println!("{}", label);
        }
        return Ok(());
    }

    let source = match args.source.clone() {
        Some(source) => source,
        None => catalog
            .labels()
            .next()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("No CSV files found in '{}'", args.data_dir.display()))?,
    };

    let mut config = ChartConfig {
        width: args.width,
        height: args.height,
        ..ChartConfig::default()
    };
    if let Some(title) = args.title {
        config.title = title;
    }

    let mut stylesheet = Stylesheet::default();
    if let Some(color) = &args.bar_color {
        stylesheet.bar_fill = palette::parse_color(color)
            .ok_or_else(|| anyhow!("Unrecognized color '{}'", color))?;
    }

    let mut runtime = ChartRuntime::new(config, stylesheet, catalog, args.out_dir.clone());

    let outcome = runtime.render(&source).await;
    match outcome {
        RenderOutcome::Rendered { bars } => info!(source = %source, bars, "Rendered chart"),
        RenderOutcome::Empty => eprintln!("Warning: '{}' contains no rows; exporting an empty chart", source),
        RenderOutcome::Failed(err) => {
            if err.is_recoverable() {
                let labels: Vec<&str> = runtime.catalog().labels().collect();
                eprintln!("Available sources: {}", labels.join(", "));
            }
            return Err(err).context("Failed to render chart");
        }
        RenderOutcome::Stale => bail!("Render of '{}' was superseded", source),
    }

    if let Some(district) = &args.hover {
        let (surface, hover) = runtime
            .hover_mut()
            .ok_or_else(|| anyhow!("No chart to hover"))?;
        let rect = surface
            .bars
            .iter()
            .find(|bar| bar.entry.category.eq_ignore_ascii_case(district))
            .map(|bar| bar.rect)
            .ok_or_else(|| anyhow!("District '{}' not found in '{}'", district, source))?;
        hover.dispatch(surface, Point::new(rect.x + rect.width / 2.0, rect.bottom()));
        if let Some(tooltip) = hover.tooltip() {
            println!("{}", tooltip.text);
        }
    }

    if matches!(args.format, OutputFormat::Svg | OutputFormat::Both) {
        let artifact = runtime.export_vector().context("Vector export failed")?;
        println!("{}", artifact.path.display());
    }
    if matches!(args.format, OutputFormat::Jpg | OutputFormat::Both) {
        let artifact = runtime.export_raster().context("Raster export failed")?;
        println!("{}", artifact.path.display());
    }

    Ok(())
}
