use serde::{Deserialize, Serialize};
use tagx_core_types::TextNodeId;

/// An immutable run of text at one position in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: TextNodeId,
    pub content: String,
}

impl TextNode {
    pub fn new(id: TextNodeId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    /// Check if this node carries no text (milestone anchors, empty spans)
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
