//! Views: per-rendering relevance filters over layers and markup tags

pub mod definition;
pub mod tag_view;

pub use definition::{ViewDefinition, ViewFactory};
pub use tag_view::{RelevanceStyle, TagView};
