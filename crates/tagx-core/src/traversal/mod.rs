//! Document traversal
//!
//! The engine walks text nodes in document order and turns overlap,
//! discontinuity, text variation and view filtering into one ordered stream of
//! [`TagVisitor`] callbacks.

pub mod engine;
pub mod recorder;
pub mod state;
pub mod visitor;

pub use engine::{traverse, TraversalPhase, Traverser};
pub use recorder::{EventRecorder, TraversalEvent};
pub use state::ExporterState;
pub use visitor::{CloseMode, MarkupTag, OpenMode, TagVisitor};
