//! Core types shared across TAGX crates
//!
//! This crate provides foundational types used by the document graph,
//! the traversal engine and the logging facility:
//!
//! - **Identifiers**: TextNodeId, MarkupId
//! - **Schema constants**: Canonical field keys and event names

pub mod ids;
pub mod schema;

pub use ids::{MarkupId, TextNodeId};
