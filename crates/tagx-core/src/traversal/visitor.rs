use std::collections::BTreeSet;

use serde::Serialize;
use tagx_core_types::MarkupId;

use crate::model::layer::is_default_layer;
use crate::view::TagView;

/// What the traversal knows about a markup when it opens or closes it
///
/// Computed once per markup on its first opening and reused for every later
/// segment of the same markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupTag {
    pub id: MarkupId,
    pub tag: String,
    /// The markup's layers that are relevant in the current view
    pub layers: BTreeSet<String>,
    /// Relevant layers this markup is the first to use
    pub new_layers: BTreeSet<String>,
    pub anonymous: bool,
    pub optional: bool,
    pub discontinuous: bool,
}

impl MarkupTag {
    /// Relevant layers other than the default layer
    pub fn named_layers(&self) -> impl Iterator<Item = &str> {
        self.layers
            .iter()
            .map(String::as_str)
            .filter(|layer| !is_default_layer(layer))
    }
}

/// How an open tag starts its markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// First segment
    Start,
    /// Continues a suspended markup
    Resume,
}

/// How a close tag ends its markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseMode {
    /// Last segment
    End,
    /// The markup continues later in the document
    Suspend,
}

/// Callbacks driven by the traversal engine
///
/// The engine calls these in document order and never looks at the output.
/// Annotation values are serialized depth-first: children of lists and maps
/// are serialized before the parent, and the finished key/value text is passed
/// to [`add_annotation`](Self::add_annotation) between
/// [`enter_open_tag`](Self::enter_open_tag) and
/// [`exit_open_tag`](Self::exit_open_tag). Resumed opens carry no annotations.
pub trait TagVisitor {
    fn set_view(&mut self, _view: &TagView) {}

    fn set_relevant_layers(&mut self, _layers: &BTreeSet<String>) {}

    fn enter_document(&mut self) {}

    fn exit_document(&mut self);

    fn enter_open_tag(&mut self, tag: &MarkupTag, mode: OpenMode);

    fn add_annotation(&mut self, annotation: &str);

    fn exit_open_tag(&mut self, tag: &MarkupTag, mode: OpenMode);

    fn exit_close_tag(&mut self, tag: &MarkupTag, mode: CloseMode);

    fn exit_text(&mut self, text: &str, in_variation: bool);

    fn enter_text_variation(&mut self);

    /// Between two branches of the innermost variation
    fn add_branch_divider(&mut self);

    fn exit_text_variation(&mut self);

    fn serialize_string_annotation_value(&self, value: &str) -> String;

    fn serialize_number_annotation_value(&self, value: f64) -> String;

    fn serialize_boolean_annotation_value(&self, value: bool) -> String;

    /// `items` are the already serialized list elements
    fn serialize_list_annotation_value(&self, items: &[String]) -> String;

    /// `entries` are keys with already serialized values
    fn serialize_map_annotation_value(&self, entries: &[(String, String)]) -> String;

    fn serialize_reference_annotation_value(&self, target: &str) -> String;

    /// Join a key with its serialized value
    fn serialize_annotation_assigner(&self, key: &str, value: &str) -> String;
}
