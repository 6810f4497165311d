//! Rendering a document into text notations
//!
//! Each notation is a [`TagVisitor`](crate::traversal::TagVisitor); the
//! functions here run a traversal with the matching exporter and hand back the
//! produced text.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::errors::{Result, TagxError};
use crate::graph::DocumentGraph;
use crate::traversal::{traverse, EventRecorder};
use crate::view::TagView;

pub mod tagml;
pub mod texmecs;
pub mod xml;

pub use tagml::TagmlExporter;
pub use texmecs::TexmecsExporter;
pub use xml::{XmlExportOptions, XmlExporter};

/// Output notations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    #[default]
    Tagml,
    Xml,
    Texmecs,
    /// The raw traversal events as JSON
    Events,
}

impl RenderFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderFormat::Tagml => "tagml",
            RenderFormat::Xml => "xml",
            RenderFormat::Texmecs => "texmecs",
            RenderFormat::Events => "events",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tagml" => Ok(RenderFormat::Tagml),
            "xml" => Ok(RenderFormat::Xml),
            "texmecs" => Ok(RenderFormat::Texmecs),
            "events" => Ok(RenderFormat::Events),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render as TAGML
///
/// # Errors
///
/// Any traversal error; see [`traverse`].
pub fn render_tagml<G: DocumentGraph + ?Sized>(graph: &G, view: &TagView) -> Result<String> {
    let mut exporter = TagmlExporter::new();
    traverse(graph, view, &mut exporter)?;
    Ok(exporter.into_string())
}

/// Render as XML
///
/// # Errors
///
/// Any traversal error; see [`traverse`].
pub fn render_xml<G: DocumentGraph + ?Sized>(
    graph: &G,
    view: &TagView,
    options: &XmlExportOptions,
) -> Result<String> {
    let mut exporter = XmlExporter::new(options.clone());
    traverse(graph, view, &mut exporter)?;
    Ok(exporter.into_string())
}

/// Render as TexMECS
///
/// # Errors
///
/// Any traversal error; see [`traverse`].
pub fn render_texmecs<G: DocumentGraph + ?Sized>(graph: &G, view: &TagView) -> Result<String> {
    let mut exporter = TexmecsExporter::new();
    traverse(graph, view, &mut exporter)?;
    Ok(exporter.into_string())
}

/// Render the raw traversal events as pretty JSON
///
/// # Errors
///
/// Any traversal error; `Serialization` if the events cannot be written.
pub fn render_events<G: DocumentGraph + ?Sized>(graph: &G, view: &TagView) -> Result<String> {
    let mut recorder = EventRecorder::new();
    traverse(graph, view, &mut recorder)?;
    recorder.to_json().map_err(TagxError::from)
}

/// Render in the given format
///
/// `xml_options` only affects [`RenderFormat::Xml`].
///
/// # Errors
///
/// Any traversal error.
pub fn render<G: DocumentGraph + ?Sized>(
    graph: &G,
    view: &TagView,
    format: RenderFormat,
    xml_options: &XmlExportOptions,
) -> Result<String> {
    debug!(format = %format, "render document");
    match format {
        RenderFormat::Tagml => render_tagml(graph, view),
        RenderFormat::Xml => render_xml(graph, view, xml_options),
        RenderFormat::Texmecs => render_texmecs(graph, view),
        RenderFormat::Events => render_events(graph, view),
    }
}
