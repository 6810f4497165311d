//! XML with trojan-horse encoding for cross-layer markup
//!
//! Markup in the leading layer becomes ordinary nested elements. Markup of
//! other layers cannot nest with it, so each of its segments becomes a pair of
//! empty marker elements correlated by `th:sId`/`th:eId`:
//!
//! ```text
//! <xml xmlns:th="http://www.blackmesatech.com/2017/nss/trojan-horse" th:doc="_default A">
//! <s th:doc="A" th:sId="s0"/>Hello<s th:doc="A" th:eId="s0"/></xml>
//! ```

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tagx_core_types::MarkupId;

use crate::model::{format_number, DEFAULT_LAYER};
use crate::traversal::{CloseMode, MarkupTag, OpenMode, TagVisitor};

pub const TROJAN_HORSE_NAMESPACE: &str = "http://www.blackmesatech.com/2017/nss/trojan-horse";
pub const TAG_NAMESPACE: &str = "http://tag.humanities.knaw.nl/1.0";

const PROLOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
/// How the default layer is written in `th:doc`
const DEFAULT_LAYER_NAME: &str = "_default";

/// XML rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XmlExportOptions {
    /// Layer whose markup renders as nested elements
    pub leading_layer: String,
}

impl Default for XmlExportOptions {
    fn default() -> Self {
        Self {
            leading_layer: DEFAULT_LAYER.to_string(),
        }
    }
}

impl XmlExportOptions {
    pub fn with_leading_layer(leading_layer: impl Into<String>) -> Self {
        Self {
            leading_layer: leading_layer.into(),
        }
    }
}

/// Visitor producing XML
///
/// The root element's namespace declarations depend on what the body uses, so
/// the body is buffered and the document assembled in `exit_document`.
#[derive(Debug, Default)]
pub struct XmlExporter {
    options: XmlExportOptions,
    relevant_layers: BTreeSet<String>,
    body: String,
    output: String,
    /// Open tag being assembled between `enter_open_tag` and `exit_open_tag`
    pending: String,
    /// Current segment's `th:sId` per trojan markup
    trojan_ids: HashMap<MarkupId, String>,
    trojan_counter: usize,
    discontinuity_numbers: HashMap<MarkupId, usize>,
    discontinuity_counter: usize,
    uses_tag_namespace: bool,
}

impl XmlExporter {
    pub fn new(options: XmlExportOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn uses_trojan_horse(&self) -> bool {
        self.relevant_layers.len() > 1
    }

    fn is_trojan(&self, tag: &MarkupTag) -> bool {
        self.uses_trojan_horse() && !tag.layers.contains(&self.options.leading_layer)
    }

    /// Space-joined relevant layers of a markup, leading layer left out
    fn trojan_doc(&self, tag: &MarkupTag) -> String {
        let layers: Vec<&str> = tag
            .layers
            .iter()
            .filter(|layer| **layer != self.options.leading_layer)
            .map(|layer| layer_name(layer))
            .collect();
        layers.join(" ")
    }

    fn discontinuity_number(&mut self, id: MarkupId) -> usize {
        let counter = &mut self.discontinuity_counter;
        *self.discontinuity_numbers.entry(id).or_insert_with(|| {
            let number = *counter;
            *counter += 1;
            number
        })
    }

    fn push_flags(&mut self, tag: &MarkupTag) {
        if tag.discontinuous {
            let number = self.discontinuity_number(tag.id);
            self.pending.push_str(&format!(" tag:n=\"{}\"", number));
            self.uses_tag_namespace = true;
        }
        if tag.optional {
            self.pending.push_str(" tag:optional=\"true\"");
            self.uses_tag_namespace = true;
        }
    }

    fn root_start(&self) -> String {
        let mut root = String::from("<xml");
        if self.uses_trojan_horse() {
            let layers: Vec<&str> = self.relevant_layers.iter().map(|l| layer_name(l)).collect();
            root.push_str(&format!(
                " xmlns:th=\"{}\" th:doc=\"{}\"",
                TROJAN_HORSE_NAMESPACE,
                escape_attribute(&layers.join(" "))
            ));
        }
        if self.uses_tag_namespace {
            root.push_str(&format!(" xmlns:tag=\"{}\"", TAG_NAMESPACE));
        }
        root.push('>');
        root
    }
}

impl TagVisitor for XmlExporter {
    fn set_relevant_layers(&mut self, layers: &BTreeSet<String>) {
        self.relevant_layers = layers.clone();
    }

    fn exit_document(&mut self) {
        self.output = format!("{}{}{}</xml>", PROLOG, self.root_start(), self.body);
    }

    fn enter_open_tag(&mut self, tag: &MarkupTag, _mode: OpenMode) {
        self.pending = format!("<{}", tag.tag);
        if self.is_trojan(tag) {
            let doc = self.trojan_doc(tag);
            let id = format!("{}{}", tag.tag, self.trojan_counter);
            self.trojan_counter += 1;
            let attribute = if tag.anonymous { "th:soleId" } else { "th:sId" };
            self.pending.push_str(&format!(
                " th:doc=\"{}\" {}=\"{}\"",
                escape_attribute(&doc),
                attribute,
                escape_attribute(&id)
            ));
            if !tag.anonymous {
                self.trojan_ids.insert(tag.id, id);
            }
        }
        self.push_flags(tag);
    }

    fn add_annotation(&mut self, annotation: &str) {
        self.pending.push(' ');
        self.pending.push_str(annotation);
    }

    fn exit_open_tag(&mut self, tag: &MarkupTag, _mode: OpenMode) {
        let empty = tag.anonymous || self.is_trojan(tag);
        self.pending.push_str(if empty { "/>" } else { ">" });
        let element = std::mem::take(&mut self.pending);
        self.body.push_str(&element);
    }

    fn exit_close_tag(&mut self, tag: &MarkupTag, _mode: CloseMode) {
        if tag.anonymous {
            return;
        }
        if !self.is_trojan(tag) {
            self.body.push_str(&format!("</{}>", tag.tag));
            return;
        }
        let doc = self.trojan_doc(tag);
        let id = self.trojan_ids.remove(&tag.id).unwrap_or_default();
        self.pending = format!(
            "<{} th:doc=\"{}\" th:eId=\"{}\"",
            tag.tag,
            escape_attribute(&doc),
            escape_attribute(&id)
        );
        self.push_flags(tag);
        self.pending.push_str("/>");
        let element = std::mem::take(&mut self.pending);
        self.body.push_str(&element);
    }

    fn exit_text(&mut self, text: &str, _in_variation: bool) {
        self.body.push_str(&escape_text(text));
    }

    fn enter_text_variation(&mut self) {
        self.uses_tag_namespace = true;
        self.body.push_str("<tag:branches><tag:branch>");
    }

    fn add_branch_divider(&mut self) {
        self.body.push_str("</tag:branch><tag:branch>");
    }

    fn exit_text_variation(&mut self) {
        self.body.push_str("</tag:branch></tag:branches>");
    }

    fn serialize_string_annotation_value(&self, value: &str) -> String {
        value.to_string()
    }

    fn serialize_number_annotation_value(&self, value: f64) -> String {
        format_number(value)
    }

    fn serialize_boolean_annotation_value(&self, value: bool) -> String {
        value.to_string()
    }

    fn serialize_list_annotation_value(&self, items: &[String]) -> String {
        format!("[{}]", items.join(","))
    }

    fn serialize_map_annotation_value(&self, entries: &[(String, String)]) -> String {
        let entries: Vec<String> = entries
            .iter()
            .map(|(key, value)| format!("{}:{}", key, value))
            .collect();
        format!("{{{}}}", entries.join(","))
    }

    fn serialize_reference_annotation_value(&self, target: &str) -> String {
        target.to_string()
    }

    fn serialize_annotation_assigner(&self, key: &str, value: &str) -> String {
        format!("{}=\"{}\"", key, escape_attribute(value))
    }
}

fn layer_name(layer: &str) -> &str {
    if layer == DEFAULT_LAYER {
        DEFAULT_LAYER_NAME
    } else {
        layer
    }
}

/// Escape text content
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for use between double quotes
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
