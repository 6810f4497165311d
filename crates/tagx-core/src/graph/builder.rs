use std::collections::HashSet;

use indexmap::IndexSet;
use tagx_core_types::{MarkupId, TextNodeId};
use tracing::trace;

use super::document::Document;
use crate::errors::{Result, TagxError};
use crate::model::{Markup, MarkupSpec, TextNode, TextVariation};

/// Variation being built
#[derive(Debug)]
struct OpenVariation {
    /// Index into `Document::variations`
    index: usize,
    /// Markup open when the text diverged; every branch starts from it
    open_at_divergence: IndexSet<MarkupId>,
    suspended_at_divergence: HashSet<MarkupId>,
    /// No text node added since the current branch began
    awaiting_branch_start: bool,
}

/// Builds a [`Document`] from the events a notation parser would emit
///
/// Text added with [`add_text`](Self::add_text) is covered by every markup
/// open at that moment. Markup may close in any order (overlap), may be
/// suspended and resumed (discontinuity), and text may diverge into branches.
///
/// ```
/// use tagx_core::graph::DocumentBuilder;
/// use tagx_core::model::MarkupSpec;
///
/// let mut builder = DocumentBuilder::new();
/// let line = builder.open_markup(MarkupSpec::new("line"));
/// builder.add_text("Hello");
/// builder.close_markup(line).unwrap();
/// let document = builder.build().unwrap();
/// assert_eq!(document.plain_text(), "Hello");
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
    next_text_node: u64,
    next_markup: u64,
    open: IndexSet<MarkupId>,
    suspended: HashSet<MarkupId>,
    variations: Vec<OpenVariation>,
    /// Closed variations waiting for the next text node as convergence
    pending_convergence: Vec<usize>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a markup; subsequent text is covered by it until it closes
    pub fn open_markup(&mut self, spec: MarkupSpec) -> MarkupId {
        let id = self.allocate_markup_id();
        trace!(markup_id = %id, tag = %spec.tag, "open markup");
        self.document.insert_markup(Markup::from_spec(id, spec));
        self.open.insert(id);
        id
    }

    /// Close an open markup
    ///
    /// A markup closed before covering any text gets an empty text node.
    ///
    /// # Errors
    ///
    /// `InvalidMarkupState` if the markup is not open.
    pub fn close_markup(&mut self, id: MarkupId) -> Result<()> {
        if !self.open.contains(&id) {
            return Err(self.not_open(id, "closed"));
        }
        if self.document.markup_mut(id)?.text_node_ids.is_empty() {
            self.add_text("");
        }
        self.open.shift_remove(&id);
        Ok(())
    }

    /// Suspend an open markup; text added while suspended is not covered by it
    ///
    /// # Errors
    ///
    /// `InvalidMarkupState` if the markup is not open or covers no text yet.
    pub fn suspend_markup(&mut self, id: MarkupId) -> Result<()> {
        if !self.open.contains(&id) {
            return Err(self.not_open(id, "suspended"));
        }
        if self.document.markup_mut(id)?.text_node_ids.is_empty() {
            return Err(TagxError::InvalidMarkupState {
                markup_id: id,
                action: "suspended".to_string(),
                reason: "markup covers no text yet".to_string(),
            });
        }
        self.open.shift_remove(&id);
        self.suspended.insert(id);
        Ok(())
    }

    /// Resume a suspended markup, making it discontinuous
    ///
    /// # Errors
    ///
    /// `InvalidMarkupState` if the markup is not suspended.
    pub fn resume_markup(&mut self, id: MarkupId) -> Result<()> {
        if !self.suspended.remove(&id) {
            return Err(TagxError::InvalidMarkupState {
                markup_id: id,
                action: "resumed".to_string(),
                reason: "markup is not suspended".to_string(),
            });
        }
        self.document.markup_mut(id)?.discontinuous = true;
        self.open.insert(id);
        Ok(())
    }

    /// Add a milestone: anonymous markup anchored on an empty text node
    pub fn add_milestone(&mut self, spec: MarkupSpec) -> MarkupId {
        let id = self.open_markup(spec);
        if let Ok(markup) = self.document.markup_mut(id) {
            markup.anonymous = true;
        }
        self.add_text("");
        self.open.shift_remove(&id);
        id
    }

    /// Append a text node covered by all currently open markup
    pub fn add_text(&mut self, content: impl Into<String>) -> TextNodeId {
        let id = TextNodeId::new(self.next_text_node);
        self.next_text_node += 1;
        self.document.insert_text_node(TextNode::new(id, content));

        for markup_id in self.open.iter().copied().collect::<Vec<_>>() {
            // open ids always come from this builder
            let _ = self.document.associate(markup_id, id);
        }

        for variation in self.variations.iter_mut().filter(|v| v.awaiting_branch_start) {
            self.document.variations[variation.index].branch_starts.push(id);
            variation.awaiting_branch_start = false;
        }
        for index in self.pending_convergence.drain(..) {
            self.document.variations[index].convergence = Some(id);
        }
        id
    }

    /// Diverge into the first branch of a new variation
    pub fn open_variation(&mut self) {
        let index = self.document.variations.len();
        self.document.variations.push(TextVariation {
            branch_starts: Vec::new(),
            convergence: None,
        });
        self.variations.push(OpenVariation {
            index,
            open_at_divergence: self.open.clone(),
            suspended_at_divergence: self.suspended.clone(),
            awaiting_branch_start: true,
        });
    }

    /// End the current branch and start the next one
    ///
    /// # Errors
    ///
    /// `InvalidVariation` outside a variation, after an empty branch, or when
    /// markup opened in the branch is still open or suspended.
    pub fn next_branch(&mut self) -> Result<()> {
        self.end_branch("next branch")?;
        // variation existence checked by end_branch
        if let Some(variation) = self.variations.last_mut() {
            self.open = variation.open_at_divergence.clone();
            self.suspended = variation.suspended_at_divergence.clone();
            variation.awaiting_branch_start = true;
        }
        Ok(())
    }

    /// End the last branch and converge
    ///
    /// # Errors
    ///
    /// `InvalidVariation` outside a variation, after an empty branch, with
    /// fewer than two branches, or when markup opened in the branch is open.
    pub fn close_variation(&mut self) -> Result<()> {
        self.end_branch("close variation")?;
        let Some(variation) = self.variations.pop() else {
            return Err(no_variation("close variation"));
        };
        if self.document.variations[variation.index].branch_count() < 2 {
            return Err(TagxError::InvalidVariation {
                reason: "a variation needs at least two branches".to_string(),
            });
        }
        self.pending_convergence.push(variation.index);
        Ok(())
    }

    /// Finish the document
    ///
    /// # Errors
    ///
    /// `InvalidVariation` if a variation is still open, `UnclosedMarkup` if
    /// markup is still open or suspended.
    pub fn build(self) -> Result<Document> {
        if !self.variations.is_empty() {
            return Err(TagxError::InvalidVariation {
                reason: format!("{} variation(s) never closed", self.variations.len()),
            });
        }
        let unclosed = self
            .open
            .iter()
            .chain(self.suspended.iter())
            .min()
            .copied();
        if let Some(markup_id) = unclosed {
            let tag = self
                .document
                .markups
                .get(&markup_id)
                .map(|m| m.tag.clone())
                .unwrap_or_default();
            return Err(TagxError::UnclosedMarkup { markup_id, tag });
        }
        Ok(self.document)
    }

    fn end_branch(&mut self, action: &str) -> Result<()> {
        let Some(variation) = self.variations.last() else {
            return Err(no_variation(action));
        };
        if variation.awaiting_branch_start {
            return Err(TagxError::InvalidVariation {
                reason: format!("{}: branch has no text", action),
            });
        }
        if let Some(left_open) = self
            .open
            .iter()
            .find(|id| !variation.open_at_divergence.contains(*id))
        {
            return Err(TagxError::InvalidVariation {
                reason: format!(
                    "{}: markup {} opened in branch is still open",
                    action, left_open
                ),
            });
        }
        if let Some(left_suspended) = self.suspended.iter().find(|id| {
            !variation.open_at_divergence.contains(*id)
                && !variation.suspended_at_divergence.contains(*id)
        }) {
            return Err(TagxError::InvalidVariation {
                reason: format!(
                    "{}: markup {} opened in branch is still suspended",
                    action, left_suspended
                ),
            });
        }
        // nested variations closed at the very end of this branch have no convergence node
        self.pending_convergence.clear();
        Ok(())
    }

    fn allocate_markup_id(&mut self) -> MarkupId {
        let id = MarkupId::new(self.next_markup);
        self.next_markup += 1;
        id
    }

    fn not_open(&self, id: MarkupId, action: &str) -> TagxError {
        let reason = if self.suspended.contains(&id) {
            "markup is suspended"
        } else {
            "markup is not open"
        };
        TagxError::InvalidMarkupState {
            markup_id: id,
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn no_variation(action: &str) -> TagxError {
    TagxError::InvalidVariation {
        reason: format!("{}: no open variation", action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DocumentGraph;

    #[test]
    fn test_overlapping_markup_coverage() {
        let mut builder = DocumentBuilder::new();
        let a = builder.open_markup(MarkupSpec::new("a"));
        let t1 = builder.add_text("x");
        let b = builder.open_markup(MarkupSpec::new("b"));
        let t2 = builder.add_text("y");
        builder.close_markup(a).unwrap();
        let t3 = builder.add_text("z");
        builder.close_markup(b).unwrap();
        let document = builder.build().unwrap();

        assert_eq!(document.markup_ids_covering(t1), vec![a]);
        assert_eq!(document.markup_ids_covering(t2), vec![a, b]);
        assert_eq!(document.markup_ids_covering(t3), vec![b]);
    }

    #[test]
    fn test_suspend_resume_marks_discontinuous() {
        let mut builder = DocumentBuilder::new();
        let q = builder.open_markup(MarkupSpec::new("q"));
        builder.add_text("a");
        builder.suspend_markup(q).unwrap();
        let gap = builder.add_text("b");
        builder.resume_markup(q).unwrap();
        builder.add_text("c");
        builder.close_markup(q).unwrap();
        let document = builder.build().unwrap();

        let markup = document.markup(q).unwrap();
        assert!(markup.discontinuous);
        assert_eq!(markup.text_node_count(), 2);
        assert!(document.markup_ids_covering(gap).is_empty());
    }

    #[test]
    fn test_resumed_markup_nests_inside_markup_opened_in_its_gap() {
        let mut builder = DocumentBuilder::new();
        let q = builder.open_markup(MarkupSpec::new("q"));
        builder.add_text("a");
        builder.suspend_markup(q).unwrap();
        builder.add_text("b");
        let r = builder.open_markup(MarkupSpec::new("r"));
        builder.resume_markup(q).unwrap();
        let c = builder.add_text("c");
        builder.close_markup(q).unwrap();
        builder.add_text("e");
        builder.close_markup(r).unwrap();
        let document = builder.build().unwrap();

        assert_eq!(document.markup_ids_covering(c), vec![r, q]);
    }

    #[test]
    fn test_suspension_in_branch_is_undone_at_next_branch() {
        let mut builder = DocumentBuilder::new();
        let s = builder.open_markup(MarkupSpec::new("s"));
        builder.open_variation();
        builder.add_text("a");
        builder.suspend_markup(s).unwrap();
        builder.add_text("b");
        builder.next_branch().unwrap();
        let c = builder.add_text("c");
        builder.close_variation().unwrap();
        builder.close_markup(s).unwrap();
        let document = builder.build().unwrap();

        assert_eq!(document.markup_ids_covering(c), vec![s]);
        assert!(!document.markup(s).unwrap().discontinuous);
    }

    #[test]
    fn test_markup_left_suspended_in_branch_rejected() {
        let mut builder = DocumentBuilder::new();
        builder.open_variation();
        let s = builder.open_markup(MarkupSpec::new("s"));
        builder.add_text("a");
        builder.suspend_markup(s).unwrap();
        let err = builder.next_branch().unwrap_err();
        assert!(matches!(err, TagxError::InvalidVariation { .. }));
    }

    #[test]
    fn test_close_without_text_adds_empty_node() {
        let mut builder = DocumentBuilder::new();
        let e = builder.open_markup(MarkupSpec::new("e"));
        builder.close_markup(e).unwrap();
        let document = builder.build().unwrap();

        assert_eq!(document.text_node_count(), 1);
        assert_eq!(document.markup(e).unwrap().text_node_count(), 1);
    }

    #[test]
    fn test_variation_structure() {
        let mut builder = DocumentBuilder::new();
        builder.add_text("a");
        builder.open_variation();
        let b1 = builder.add_text("b");
        builder.next_branch().unwrap();
        let b2 = builder.add_text("c");
        builder.close_variation().unwrap();
        let after = builder.add_text("d");
        let document = builder.build().unwrap();

        let variations = document.variations_starting_at(b1);
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].branch_starts, vec![b1, b2]);
        assert_eq!(variations[0].convergence, Some(after));
    }

    #[test]
    fn test_nested_variation_at_branch_end_has_no_convergence() {
        let mut builder = DocumentBuilder::new();
        builder.open_variation();
        builder.open_variation();
        let inner = builder.add_text("a");
        builder.next_branch().unwrap();
        builder.add_text("b");
        builder.close_variation().unwrap();
        builder.next_branch().unwrap();
        builder.add_text("c");
        builder.close_variation().unwrap();
        let document = builder.build().unwrap();

        let variations = document.variations_starting_at(inner);
        assert_eq!(variations.len(), 2);
        assert_eq!(variations[0].branch_count(), 2);
        assert_eq!(variations[1].convergence, None);
    }

    #[test]
    fn test_empty_branch_rejected() {
        let mut builder = DocumentBuilder::new();
        builder.open_variation();
        let err = builder.next_branch().unwrap_err();
        assert!(matches!(err, TagxError::InvalidVariation { .. }));
    }

    #[test]
    fn test_markup_left_open_in_branch_rejected() {
        let mut builder = DocumentBuilder::new();
        builder.open_variation();
        builder.open_markup(MarkupSpec::new("x"));
        builder.add_text("a");
        assert!(builder.next_branch().is_err());
    }

    #[test]
    fn test_unclosed_markup_rejected() {
        let mut builder = DocumentBuilder::new();
        builder.open_markup(MarkupSpec::new("p"));
        builder.add_text("a");
        let err = builder.build().unwrap_err();
        assert!(matches!(err, TagxError::UnclosedMarkup { ref tag, .. } if tag == "p"));
    }

    #[test]
    fn test_close_unknown_markup_rejected() {
        let mut builder = DocumentBuilder::new();
        let err = builder.close_markup(MarkupId::new(42)).unwrap_err();
        assert!(matches!(err, TagxError::InvalidMarkupState { .. }));
    }
}
