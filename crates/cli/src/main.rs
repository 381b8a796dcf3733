//! partview: bounds, fitted view box, grid and labels for a path document.

mod report;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use partview_core::ViewerConfig;
use partview_protocol::{PathDocument, ViewBox};
use tracing::info;
use tracing_subscriber::EnvFilter;

use report::{Canvas, Report, parse_size, parse_view};

#[derive(Parser)]
#[command(name = "partview")]
#[command(about = "Bounds and grid graduations for a 2D path document", long_about = None)]
struct Cli {
    /// Path document (JSON)
    document: PathBuf,
    /// View box `x,y,w,h` in post-transform units (default: fit to bounds)
    #[arg(long, value_parser = parse_view, allow_hyphen_values = true)]
    view: Option<ViewBox>,
    /// Canvas size in pixels, `WxH` (default: document size or 800x600)
    #[arg(long, value_parser = parse_size)]
    size: Option<Canvas>,
    /// Engine settings (JSON); missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Only use the segments of this path id
    #[arg(long)]
    path: Option<String>,
    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data = std::fs::read(&cli.document)
        .with_context(|| format!("failed to read {}", cli.document.display()))?;
    let document: PathDocument = serde_json::from_slice(&data)
        .with_context(|| format!("failed to parse {}", cli.document.display()))?;

    let config = match &cli.config {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ViewerConfig::from_json(&data)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ViewerConfig::default(),
    };

    let canvas = cli.size.unwrap_or_else(|| Canvas::from_document(&document));
    let report = Report::build(&document, cli.path.as_deref(), cli.view, canvas, &config)?;
    info!(
        segments = report.segments,
        step = report.grid.step_model,
        "report built"
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    let mut out = std::io::stdout().lock();
    writeln!(out, "{json}")?;
    Ok(())
}
