//! TexMECS-style minimal bracket notation
//!
//! ```text
//! <line|Hello <w|world|w>|line>
//! ```
//!
//! Layers and optionality have no syntax here and are dropped. Compound and
//! reference annotation values are written as the `"..."` placeholder.

use crate::model::format_number;
use crate::traversal::{CloseMode, MarkupTag, OpenMode, TagVisitor};

const PLACEHOLDER: &str = "\"...\"";

/// Visitor producing TexMECS text
#[derive(Debug, Default)]
pub struct TexmecsExporter {
    output: String,
}

impl TexmecsExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl TagVisitor for TexmecsExporter {
    fn exit_document(&mut self) {}

    fn enter_open_tag(&mut self, tag: &MarkupTag, mode: OpenMode) {
        self.output.push('<');
        if mode == OpenMode::Resume {
            self.output.push('+');
        }
        self.output.push_str(&tag.tag);
    }

    fn add_annotation(&mut self, annotation: &str) {
        self.output.push(' ');
        self.output.push_str(annotation);
    }

    fn exit_open_tag(&mut self, tag: &MarkupTag, _mode: OpenMode) {
        self.output.push(if tag.anonymous { '>' } else { '|' });
    }

    fn exit_close_tag(&mut self, tag: &MarkupTag, mode: CloseMode) {
        if tag.anonymous {
            return;
        }
        self.output.push('|');
        if mode == CloseMode::Suspend {
            self.output.push('-');
        }
        self.output.push_str(&tag.tag);
        self.output.push('>');
    }

    fn exit_text(&mut self, text: &str, _in_variation: bool) {
        self.output.push_str(&escape_text(text));
    }

    fn enter_text_variation(&mut self) {
        self.output.push_str("<|");
    }

    fn add_branch_divider(&mut self) {
        self.output.push('|');
    }

    fn exit_text_variation(&mut self) {
        self.output.push_str("|>");
    }

    fn serialize_string_annotation_value(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }

    fn serialize_number_annotation_value(&self, value: f64) -> String {
        format!("\"{}\"", format_number(value))
    }

    fn serialize_boolean_annotation_value(&self, value: bool) -> String {
        format!("\"{}\"", value)
    }

    fn serialize_list_annotation_value(&self, _items: &[String]) -> String {
        PLACEHOLDER.to_string()
    }

    fn serialize_map_annotation_value(&self, _entries: &[(String, String)]) -> String {
        PLACEHOLDER.to_string()
    }

    fn serialize_reference_annotation_value(&self, _target: &str) -> String {
        PLACEHOLDER.to_string()
    }

    fn serialize_annotation_assigner(&self, key: &str, value: &str) -> String {
        format!("{}={}", key, value)
    }
}

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '<' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
