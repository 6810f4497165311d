use std::collections::{BTreeMap, BTreeSet, HashMap};

use tagx_core_types::{MarkupId, TextNodeId};

use super::DocumentGraph;
use crate::errors::{Result, TagxError};
use crate::model::{Markup, TextNode, TextVariation};

/// In-memory document graph
///
/// Owns text nodes, markup and the variation structure. Built through
/// [`DocumentBuilder`](super::DocumentBuilder); read-only afterwards.
/// Not thread-safe by itself, but `Send + Sync` as plain data.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Map of text node ID to text node
    pub(crate) text_nodes: HashMap<TextNodeId, TextNode>,
    /// Text node IDs in document order (branches linearized one after another)
    pub(crate) order: Vec<TextNodeId>,
    /// Markup by ID; ID order is creation order
    pub(crate) markups: BTreeMap<MarkupId, Markup>,
    /// Markup covering each text node, outermost first
    pub(crate) coverage: HashMap<TextNodeId, Vec<MarkupId>>,
    /// Variations in the order they were opened
    pub(crate) variations: Vec<TextVariation>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of text nodes
    pub fn text_node_count(&self) -> usize {
        self.order.len()
    }

    /// Find markup by tag name, in creation order
    pub fn markup_with_tag(&self, tag: &str) -> Vec<&Markup> {
        self.markups.values().filter(|m| m.tag == tag).collect()
    }

    /// All variations, in the order they were opened
    pub fn variations(&self) -> &[TextVariation] {
        &self.variations
    }

    /// Concatenated text of every node in document order
    ///
    /// Branches of a variation appear one after the other.
    pub fn plain_text(&self) -> String {
        self.order
            .iter()
            .filter_map(|id| self.text_nodes.get(id))
            .map(|node| node.content.as_str())
            .collect()
    }

    pub(crate) fn insert_text_node(&mut self, node: TextNode) {
        self.order.push(node.id);
        self.coverage.entry(node.id).or_default();
        self.text_nodes.insert(node.id, node);
    }

    pub(crate) fn insert_markup(&mut self, markup: Markup) {
        self.markups.insert(markup.id, markup);
    }

    pub(crate) fn markup_mut(&mut self, id: MarkupId) -> Result<&mut Markup> {
        self.markups
            .get_mut(&id)
            .ok_or(TagxError::MarkupNotFound { markup_id: id })
    }

    /// Associate a markup with a text node
    ///
    /// Coverage keeps association order; associate outermost markup first.
    pub(crate) fn associate(
        &mut self,
        markup_id: MarkupId,
        text_node_id: TextNodeId,
    ) -> Result<()> {
        self.markup_mut(markup_id)?.associate(text_node_id);
        let covering = self.coverage.entry(text_node_id).or_default();
        if !covering.contains(&markup_id) {
            covering.push(markup_id);
        }
        Ok(())
    }
}

impl DocumentGraph for Document {
    fn text_node_ids(&self) -> Vec<TextNodeId> {
        self.order.clone()
    }

    fn text_node(&self, id: TextNodeId) -> Result<&TextNode> {
        self.text_nodes
            .get(&id)
            .ok_or(TagxError::TextNodeNotFound { text_node_id: id })
    }

    fn markup_ids_covering(&self, id: TextNodeId) -> Vec<MarkupId> {
        self.coverage.get(&id).cloned().unwrap_or_default()
    }

    fn markup(&self, id: MarkupId) -> Result<&Markup> {
        self.markups
            .get(&id)
            .ok_or(TagxError::MarkupNotFound { markup_id: id })
    }

    fn layer_names(&self) -> BTreeSet<String> {
        self.markups
            .values()
            .flat_map(|m| m.layers.iter().cloned())
            .collect()
    }

    fn variations_starting_at(&self, id: TextNodeId) -> Vec<&TextVariation> {
        self.variations
            .iter()
            .filter(|v| v.first_branch_start() == Some(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarkupSpec;

    #[test]
    fn test_new_document() {
        let document = Document::new();
        assert_eq!(document.text_node_count(), 0);
        assert!(document.layer_names().is_empty());
    }

    #[test]
    fn test_get_nonexistent_markup() {
        let document = Document::new();
        let result = document.markup(MarkupId::new(3));
        assert!(matches!(result, Err(TagxError::MarkupNotFound { .. })));
    }

    #[test]
    fn test_coverage_kept_in_association_order() {
        let mut document = Document::new();
        let node = TextNode::new(TextNodeId::new(0), "x");
        document.insert_text_node(node);
        document.insert_markup(Markup::from_spec(MarkupId::new(5), MarkupSpec::new("b")));
        document.insert_markup(Markup::from_spec(MarkupId::new(2), MarkupSpec::new("a")));

        document.associate(MarkupId::new(5), TextNodeId::new(0)).unwrap();
        document.associate(MarkupId::new(2), TextNodeId::new(0)).unwrap();
        document.associate(MarkupId::new(2), TextNodeId::new(0)).unwrap();

        assert_eq!(
            document.markup_ids_covering(TextNodeId::new(0)),
            vec![MarkupId::new(5), MarkupId::new(2)]
        );
    }
}
