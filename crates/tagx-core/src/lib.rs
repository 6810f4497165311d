//! TAGX Core - traversal and rendering of overlapping, discontinuous, variant markup
//!
//! This crate provides:
//! - An in-memory document graph of text nodes, layered markup and text variation
//! - Views selecting the layers and markup tags relevant to a rendering
//! - A traversal engine turning the graph into an ordered stream of visitor callbacks
//! - Exporters for TAGML, XML (trojan-horse encoding) and TexMECS
//!
//! ```
//! use tagx_core::graph::DocumentBuilder;
//! use tagx_core::model::MarkupSpec;
//! use tagx_core::render::render_tagml;
//! use tagx_core::view::TagView;
//!
//! let mut builder = DocumentBuilder::new();
//! let line = builder.open_markup(MarkupSpec::new("line"));
//! builder.add_text("Hello");
//! builder.close_markup(line).unwrap();
//! let document = builder.build().unwrap();
//!
//! let tagml = render_tagml(&document, &TagView::show_all()).unwrap();
//! assert_eq!(tagml, "[line>Hello<line]");
//! ```

pub mod errors;
pub mod graph;
pub mod logging_facility;
pub mod model;
pub mod render;
pub mod traversal;
pub mod view;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, TagxError};
pub use graph::{Document, DocumentBuilder, DocumentGraph, DocumentScript};
pub use model::{Annotation, AnnotationValue, Markup, MarkupSpec, DEFAULT_LAYER};
pub use render::{render, RenderFormat, XmlExportOptions};
pub use traversal::{traverse, TagVisitor, Traverser};
pub use view::{TagView, ViewFactory};
