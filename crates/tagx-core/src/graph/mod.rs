//! Document graph: text nodes, markup spans, layers and text variation
//!
//! The traversal engine only reads the graph through [`DocumentGraph`]. The
//! in-memory [`Document`] is the implementation this crate ships; a storage
//! layer can provide its own.

use std::collections::BTreeSet;

use tagx_core_types::{MarkupId, TextNodeId};

use crate::errors::Result;
use crate::model::{Markup, TextNode, TextVariation};

pub mod builder;
pub mod document;
pub mod script;

pub use builder::DocumentBuilder;
pub use document::Document;
pub use script::{DocumentScript, ScriptStep};

/// Read-only access to an annotated text graph
pub trait DocumentGraph {
    /// Text node ids in document order, every branch of every variation
    /// linearized one after the other
    fn text_node_ids(&self) -> Vec<TextNodeId>;

    /// Look up a text node
    ///
    /// # Errors
    ///
    /// `TextNodeNotFound` if the id is unknown.
    fn text_node(&self, id: TextNodeId) -> Result<&TextNode>;

    /// Markup covering a text node, outermost first
    ///
    /// This is nesting order, not creation order: a resumed markup sits inside
    /// markup opened while it was suspended.
    fn markup_ids_covering(&self, id: TextNodeId) -> Vec<MarkupId>;

    /// Look up a markup
    ///
    /// # Errors
    ///
    /// `MarkupNotFound` if the id is unknown.
    fn markup(&self, id: MarkupId) -> Result<&Markup>;

    /// Every layer name used by the document's markup
    fn layer_names(&self) -> BTreeSet<String>;

    /// Variations whose first branch starts at this node, outermost first
    fn variations_starting_at(&self, id: TextNodeId) -> Vec<&TextVariation>;
}
