use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tagx_core_types::{MarkupId, TextNodeId};

use super::annotation::Annotation;
use super::layer::normalize_layers;

/// Markup - a named span over text nodes
///
/// A markup belongs to one or more layers, carries ordered annotations and
/// covers a set of text nodes that need not be contiguous. Rendering state
/// (suspended/resumed) is never stored here; the traversal derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Markup {
    /// Identifier, unique within the owning document
    pub id: MarkupId,

    /// Tag name
    pub tag: String,

    /// Layers this markup belongs to (never empty)
    pub layers: BTreeSet<String>,

    /// Annotations in declaration order
    pub annotations: Vec<Annotation>,

    /// Milestone markup: covers one empty text node, has no close tag
    pub anonymous: bool,

    /// Optional markup
    pub optional: bool,

    /// Covered text nodes are split into more than one segment
    pub discontinuous: bool,

    /// Covered text nodes in document order
    pub text_node_ids: Vec<TextNodeId>,
}

impl Markup {
    /// Create a markup in the given layers from a [`MarkupSpec`]
    pub fn from_spec(id: MarkupId, spec: MarkupSpec) -> Self {
        Self {
            id,
            tag: spec.tag,
            layers: normalize_layers(spec.layers),
            annotations: spec.annotations,
            anonymous: false,
            optional: spec.optional,
            discontinuous: false,
            text_node_ids: Vec::new(),
        }
    }

    /// Total number of text nodes associated with this markup
    pub fn text_node_count(&self) -> usize {
        self.text_node_ids.len()
    }

    /// Check if this markup belongs to the given layer
    pub fn in_layer(&self, layer: &str) -> bool {
        self.layers.contains(layer)
    }

    pub(crate) fn associate(&mut self, text_node_id: TextNodeId) {
        if !self.text_node_ids.contains(&text_node_id) {
            self.text_node_ids.push(text_node_id);
        }
    }
}

/// Declaration of a markup span before it is attached to a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSpec {
    pub tag: String,
    pub layers: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub optional: bool,
}

impl MarkupSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a layer
    pub fn in_layer(mut self, layer: impl Into<String>) -> Self {
        self.layers.push(layer.into());
        self
    }

    /// Add an annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}
