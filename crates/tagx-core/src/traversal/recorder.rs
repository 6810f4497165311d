//! Notation-free record of a traversal
//!
//! [`EventRecorder`] keeps every callback as a [`TraversalEvent`], along with
//! the open markup at each text node. Useful to check engine behavior without
//! going through an output format, and serializable for inspection.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use serde::Serialize;
use tagx_core_types::MarkupId;

use super::visitor::{CloseMode, MarkupTag, OpenMode, TagVisitor};
use crate::model::format_number;

/// One callback of the traversal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TraversalEvent {
    EnterDocument,
    ExitDocument,
    #[serde(rename_all = "camelCase")]
    OpenTag {
        markup_id: MarkupId,
        tag: String,
        mode: OpenMode,
        annotations: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    CloseTag {
        markup_id: MarkupId,
        tag: String,
        mode: CloseMode,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        in_variation: bool,
        /// Markup open when the text was emitted, in opening order
        open: Vec<MarkupId>,
    },
    EnterVariation,
    BranchDivider,
    ExitVariation,
}

/// Visitor that records events instead of producing text
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<TraversalEvent>,
    relevant_layers: BTreeSet<String>,
    open: IndexSet<MarkupId>,
    /// Open markup at each enclosing divergence, restored on every branch
    divergences: Vec<IndexSet<MarkupId>>,
    pending_annotations: Vec<String>,
    balanced: bool,
    /// Every close so far ended the innermost open markup
    nested: bool,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self {
            balanced: true,
            nested: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[TraversalEvent] {
        &self.events
    }

    /// Relevant layers reported by the engine
    pub fn relevant_layers(&self) -> &BTreeSet<String> {
        &self.relevant_layers
    }

    /// No markup closed while not open, none opened twice, none left open
    ///
    /// Each branch starts from the markup open at its divergence.
    pub fn is_balanced(&self) -> bool {
        self.balanced && self.open.is_empty() && self.divergences.is_empty()
    }

    /// Every close tag ended the innermost open markup, so the output nests
    pub fn is_well_nested(&self) -> bool {
        self.nested
    }

    /// Emitted text, concatenated
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraversalEvent::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Open markup at the text event with the given content
    pub fn open_at(&self, content: &str) -> Option<&[MarkupId]> {
        self.events.iter().find_map(|event| match event {
            TraversalEvent::Text {
                content: text,
                open,
                ..
            } if text == content => Some(open.as_slice()),
            _ => None,
        })
    }

    /// Tags of open/close events, `+tag`/`-tag`, in order
    pub fn tag_trace(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraversalEvent::OpenTag { tag, .. } => Some(format!("+{}", tag)),
                TraversalEvent::CloseTag { tag, .. } => Some(format!("-{}", tag)),
                _ => None,
            })
            .collect()
    }

    /// Render the recorded events as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl TagVisitor for EventRecorder {
    fn set_relevant_layers(&mut self, layers: &BTreeSet<String>) {
        self.relevant_layers = layers.clone();
    }

    fn enter_document(&mut self) {
        self.events.push(TraversalEvent::EnterDocument);
    }

    fn exit_document(&mut self) {
        self.events.push(TraversalEvent::ExitDocument);
    }

    fn enter_open_tag(&mut self, _tag: &MarkupTag, _mode: OpenMode) {
        self.pending_annotations.clear();
    }

    fn add_annotation(&mut self, annotation: &str) {
        self.pending_annotations.push(annotation.to_string());
    }

    fn exit_open_tag(&mut self, tag: &MarkupTag, mode: OpenMode) {
        if !self.open.insert(tag.id) {
            self.balanced = false;
        }
        self.events.push(TraversalEvent::OpenTag {
            markup_id: tag.id,
            tag: tag.tag.clone(),
            mode,
            annotations: std::mem::take(&mut self.pending_annotations),
        });
    }

    fn exit_close_tag(&mut self, tag: &MarkupTag, mode: CloseMode) {
        if self.open.last() != Some(&tag.id) {
            self.nested = false;
        }
        if !self.open.shift_remove(&tag.id) {
            self.balanced = false;
        }
        self.events.push(TraversalEvent::CloseTag {
            markup_id: tag.id,
            tag: tag.tag.clone(),
            mode,
        });
    }

    fn exit_text(&mut self, text: &str, in_variation: bool) {
        self.events.push(TraversalEvent::Text {
            content: text.to_string(),
            in_variation,
            open: self.open.iter().copied().collect(),
        });
    }

    fn enter_text_variation(&mut self) {
        self.divergences.push(self.open.clone());
        self.events.push(TraversalEvent::EnterVariation);
    }

    fn add_branch_divider(&mut self) {
        if let Some(snapshot) = self.divergences.last() {
            self.open = snapshot.clone();
        } else {
            self.balanced = false;
        }
        self.events.push(TraversalEvent::BranchDivider);
    }

    fn exit_text_variation(&mut self) {
        if self.divergences.pop().is_none() {
            self.balanced = false;
        }
        self.events.push(TraversalEvent::ExitVariation);
    }

    fn serialize_string_annotation_value(&self, value: &str) -> String {
        format!("{:?}", value)
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
            .map(|(key, value)| format!("{}={}", key, value))
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
