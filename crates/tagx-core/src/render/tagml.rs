//! TAGML bracket notation
//!
//! ```text
//! [line|+A>Hello [w>world<w]<line|A]
//! ```

use crate::model::format_number;
use crate::traversal::{CloseMode, MarkupTag, OpenMode, TagVisitor};

/// Visitor producing TAGML text
#[derive(Debug, Default)]
pub struct TagmlExporter {
    output: String,
}

impl TagmlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn push_layer_suffix(&mut self, tag: &MarkupTag, mark_new: bool) {
        let layers: Vec<String> = tag
            .named_layers()
            .map(|layer| {
                if mark_new && tag.new_layers.contains(layer) {
                    format!("+{}", layer)
                } else {
                    layer.to_string()
                }
            })
            .collect();
        if !layers.is_empty() {
            self.output.push('|');
            self.output.push_str(&layers.join(","));
        }
    }
}

impl TagVisitor for TagmlExporter {
    fn exit_document(&mut self) {}

    fn enter_open_tag(&mut self, tag: &MarkupTag, mode: OpenMode) {
        self.output.push('[');
        if !tag.anonymous {
            if mode == OpenMode::Resume {
                self.output.push('+');
            } else if tag.optional {
                self.output.push('?');
            }
        }
        self.output.push_str(&tag.tag);
        self.push_layer_suffix(tag, mode == OpenMode::Start);
    }

    fn add_annotation(&mut self, annotation: &str) {
        self.output.push(' ');
        self.output.push_str(annotation);
    }

    fn exit_open_tag(&mut self, tag: &MarkupTag, _mode: OpenMode) {
        self.output.push(if tag.anonymous { ']' } else { '>' });
    }

    fn exit_close_tag(&mut self, tag: &MarkupTag, mode: CloseMode) {
        if tag.anonymous {
            return;
        }
        self.output.push('<');
        if mode == CloseMode::Suspend {
            self.output.push('-');
        } else if tag.optional {
            self.output.push('?');
        }
        self.output.push_str(&tag.tag);
        self.push_layer_suffix(tag, false);
        self.output.push(']');
    }

    fn exit_text(&mut self, text: &str, in_variation: bool) {
        self.output.push_str(&escape_text(text, in_variation));
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
            .map(|(key, value)| self.serialize_annotation_assigner(key, value))
            .collect();
        format!("{{{}}}", entries.join(" "))
    }

    fn serialize_reference_annotation_value(&self, target: &str) -> String {
        format!("->{}", target)
    }

    fn serialize_annotation_assigner(&self, key: &str, value: &str) -> String {
        format!("{}={}", key, value)
    }
}

/// Escape text content; `|` only matters inside a variation
pub fn escape_text(text: &str, in_variation: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '<' | '[' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '|' if in_variation => escaped.push_str("\\|"),
            _ => escaped.push(c),
        }
    }
    escaped
}
