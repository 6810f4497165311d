//! Layers command
//!
//! Usage: tagx layers <DOCUMENT> [--view <FILE>] [--json]

use clap::Args;
use std::path::PathBuf;
use tagx_core::{DocumentGraph, TagxError};

use super::{load_document, load_view};

#[derive(Debug, Args)]
pub struct LayersArgs {
    /// Document script (JSON)
    pub document: PathBuf,

    /// View definition (JSON); every layer is relevant when omitted
    #[arg(short, long)]
    pub view: Option<PathBuf>,

    /// Print the relevant layers as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Execute layers command
pub fn execute(args: LayersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document(&args.document)?;
    let view = load_view(args.view.as_deref())?;
    if !view.is_valid() {
        return Err(TagxError::InvalidView.into());
    }

    let names = document.layer_names();
    let relevant = view.filter_relevant_layers(names.iter().map(String::as_str));

    if args.json {
        println!("{}", serde_json::to_string(&relevant)?);
        return Ok(());
    }

    for layer in &names {
        let marker = if relevant.contains(layer) { "+" } else { "-" };
        let name = if layer.is_empty() { "(default)" } else { layer.as_str() };
        println!("{} {}", marker, name);
    }
    Ok(())
}
