//! TAGX CLI
//!
//! Command-line interface for rendering TAG documents

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tagx")]
#[command(about = "TAGX - Render overlapping, layered markup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a document script as TAGML, XML, TexMECS or traversal events
    Render(commands::render::RenderArgs),
    /// List a document's layers and which of them a view keeps
    Layers(commands::layers::LayersArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Layers(args) => commands::layers::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
