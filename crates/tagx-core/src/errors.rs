use tagx_core_types::{MarkupId, TextNodeId};
use thiserror::Error;

use crate::view::RelevanceStyle;

/// Result type alias using TagxError
pub type Result<T> = std::result::Result<T, TagxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    ConflictingRelevance,
    InvalidView,
    InvalidViewDefinition,

    // Document construction
    NotFound,
    InvalidInput,
    InvalidVariation,

    // Traversal/Export
    TraversalBroken,
    DanglingReference,

    // Integration
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ConflictingRelevance => "ERR_CONFLICTING_RELEVANCE",
            ExErrorKind::InvalidView => "ERR_INVALID_VIEW",
            ExErrorKind::InvalidViewDefinition => "ERR_INVALID_VIEW_DEFINITION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidVariation => "ERR_INVALID_VARIATION",
            ExErrorKind::TraversalBroken => "ERR_TRAVERSAL_BROKEN",
            ExErrorKind::DanglingReference => "ERR_DANGLING_REFERENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// Whether this kind is a caller configuration problem rather than a graph defect
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ConflictingRelevance
                | ExErrorKind::InvalidView
                | ExErrorKind::InvalidViewDefinition
        )
    }

    /// Whether this kind signals a corrupted graph or an engine defect
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::TraversalBroken | ExErrorKind::DanglingReference
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, entity, text node)
/// to diagnose an aborted rendering.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    text_node_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            text_node_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add text node context
    pub fn with_text_node_id(mut self, id: impl Into<String>) -> Self {
        self.text_node_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the text node context, if any
    pub fn text_node_id(&self) -> Option<&str> {
        self.text_node_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(text_node_id) = &self.text_node_id {
            write!(f, " (text_node_id: {})", text_node_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for view configuration, document construction and traversal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TagxError {
    // ===== Configuration Errors =====
    /// Layer axis already carries the opposite relevance style
    #[error("Cannot set layers to {requested}: layers to {existing} already set")]
    ConflictingLayerRelevance {
        existing: RelevanceStyle,
        requested: RelevanceStyle,
    },

    /// Markup axis already carries the opposite relevance style
    #[error("Cannot set markup to {requested}: markup to {existing} already set")]
    ConflictingMarkupRelevance {
        existing: RelevanceStyle,
        requested: RelevanceStyle,
    },

    /// Neither axis of the view filters anything
    #[error("Invalid view: neither layer nor markup relevance is defined")]
    InvalidView,

    /// View definition could not be read
    #[error("Invalid view definition: {reason}")]
    InvalidViewDefinition { reason: String },

    // ===== Document Errors =====
    /// Text node not found in document
    #[error("Text node not found: {text_node_id}")]
    TextNodeNotFound { text_node_id: TextNodeId },

    /// Markup not found in document
    #[error("Markup not found: {markup_id}")]
    MarkupNotFound { markup_id: MarkupId },

    /// Markup was closed, suspended or resumed while not in the expected state
    #[error("Markup {markup_id} cannot be {action}: {reason}")]
    InvalidMarkupState {
        markup_id: MarkupId,
        action: String,
        reason: String,
    },

    /// Markup still open when the document was built
    #[error("Markup [{tag}] ({markup_id}) was never closed")]
    UnclosedMarkup { markup_id: MarkupId, tag: String },

    /// Variation opened, branched or closed out of order
    #[error("Invalid text variation: {reason}")]
    InvalidVariation { reason: String },

    /// Document script step could not be replayed
    #[error("Invalid document script at step {step}: {reason}")]
    InvalidScript { step: usize, reason: String },

    // ===== Traversal Errors =====
    /// A covering-set lookup referenced markup the graph does not hold
    #[error("Text node {text_node_id} references missing markup {markup_id}")]
    DanglingMarkup {
        text_node_id: TextNodeId,
        markup_id: MarkupId,
    },

    /// Variation bookkeeping disagrees with the node stream
    #[error("Traversal broken at text node {text_node_id}: {reason}")]
    TraversalBroken {
        text_node_id: TextNodeId,
        reason: String,
    },

    /// A traverser was run again after leaving its idle phase
    #[error("Traverser already ran (phase {phase})")]
    TraverserReused { phase: String },

    // ===== Integration Errors =====
    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<TagxError> for ExError {
    fn from(err: TagxError) -> Self {
        match err {
            TagxError::ConflictingLayerRelevance {
                existing,
                requested,
            } => ExError::new(ExErrorKind::ConflictingRelevance)
                .with_op("set_layer_relevance")
                .with_message(format!(
                    "layers to {} requested while layers to {} is set",
                    requested, existing
                )),

            TagxError::ConflictingMarkupRelevance {
                existing,
                requested,
            } => ExError::new(ExErrorKind::ConflictingRelevance)
                .with_op("set_markup_relevance")
                .with_message(format!(
                    "markup to {} requested while markup to {} is set",
                    requested, existing
                )),

            TagxError::InvalidView => ExError::new(ExErrorKind::InvalidView)
                .with_message("Neither layer nor markup relevance is defined"),

            TagxError::InvalidViewDefinition { reason } => {
                ExError::new(ExErrorKind::InvalidViewDefinition)
                    .with_op("load_view")
                    .with_message(reason)
            }

            TagxError::TextNodeNotFound { text_node_id } => ExError::new(ExErrorKind::NotFound)
                .with_text_node_id(text_node_id.to_string())
                .with_message("Text node not found"),

            TagxError::MarkupNotFound { markup_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(markup_id.to_string())
                .with_message("Markup not found"),

            TagxError::InvalidMarkupState {
                markup_id,
                action,
                reason,
            } => ExError::new(ExErrorKind::InvalidInput)
                .with_op(action)
                .with_entity_id(markup_id.to_string())
                .with_message(reason),

            TagxError::UnclosedMarkup { markup_id, tag } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("build_document")
                    .with_entity_id(markup_id.to_string())
                    .with_message(format!("Markup [{}] was never closed", tag))
            }

            TagxError::InvalidVariation { reason } => {
                ExError::new(ExErrorKind::InvalidVariation).with_message(reason)
            }

            TagxError::InvalidScript { step, reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("replay_script")
                .with_message(format!("step {}: {}", step, reason)),

            TagxError::DanglingMarkup {
                text_node_id,
                markup_id,
            } => ExError::new(ExErrorKind::DanglingReference)
                .with_op("traverse")
                .with_entity_id(markup_id.to_string())
                .with_text_node_id(text_node_id.to_string())
                .with_message("Covering markup missing from graph"),

            TagxError::TraversalBroken {
                text_node_id,
                reason,
            } => ExError::new(ExErrorKind::TraversalBroken)
                .with_op("traverse")
                .with_text_node_id(text_node_id.to_string())
                .with_message(reason),

            TagxError::TraverserReused { phase } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("traverse")
                .with_message(format!("traverser already ran, phase {}", phase)),

            TagxError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to TagxError
impl From<serde_json::Error> for TagxError {
    fn from(err: serde_json::Error) -> Self {
        TagxError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::ConflictingRelevance, "ERR_CONFLICTING_RELEVANCE"),
            (ExErrorKind::InvalidView, "ERR_INVALID_VIEW"),
            (ExErrorKind::DanglingReference, "ERR_DANGLING_REFERENCE"),
            (ExErrorKind::TraversalBroken, "ERR_TRAVERSAL_BROKEN"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_configuration_kinds() {
        assert!(ExErrorKind::InvalidView.is_configuration());
        assert!(ExErrorKind::ConflictingRelevance.is_configuration());
        assert!(!ExErrorKind::DanglingReference.is_configuration());
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("traverse")
            .with_entity_id("m3")
            .with_message("Markup not found");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_NOT_FOUND]"));
        assert!(text.contains("traverse"));
        assert!(text.contains("m3"));
    }
}
