//! Identifier types for document graph entities
//!
//! Identifiers are plain sequence numbers handed out by the document that owns
//! the entity. They are ordered, so that a lower id always means "created
//! earlier", which the graph uses to order markup by hierarchical depth.

use serde::{Deserialize, Serialize};

/// Identifier of a text node within one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextNodeId(u64);

impl TextNodeId {
    /// Wrap a raw sequence number
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw sequence number
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TextNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Identifier of a markup span within one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkupId(u64);

impl MarkupId {
    /// Wrap a raw sequence number
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw sequence number
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MarkupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}", self.0)
    }
}
