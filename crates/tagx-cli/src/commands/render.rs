//! Render command
//!
//! Usage: tagx render <DOCUMENT> [--view <FILE>] [--format <FORMAT>] [--output <FILE>]

use clap::Args;
use std::path::PathBuf;
use tagx_core::{render, RenderFormat, XmlExportOptions};
use tracing::info;

use super::{init_logging, load_document, load_view};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Document script (JSON)
    pub document: PathBuf,

    /// View definition (JSON); everything is shown when omitted
    #[arg(short, long)]
    pub view: Option<PathBuf>,

    /// Output notation: tagml, xml, texmecs or events
    #[arg(short, long, default_value = "tagml")]
    pub format: RenderFormat,

    /// Layer whose markup is written as real XML elements
    #[arg(long)]
    pub leading_layer: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log profile: dev, prod or test (default: no logging)
    #[arg(long)]
    pub log_profile: Option<String>,
}

/// Execute render command
pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log_profile.as_deref())?;

    let document = load_document(&args.document)?;
    let view = load_view(args.view.as_deref())?;

    let xml_options = args
        .leading_layer
        .map(XmlExportOptions::with_leading_layer)
        .unwrap_or_default();

    let rendered = render(&document, &view, args.format, &xml_options)?;
    info!(format = %args.format, bytes = rendered.len(), "rendered document");

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)?;
        println!("✓ Rendered to {}", output_path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}
