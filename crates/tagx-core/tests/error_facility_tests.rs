#![allow(clippy::unwrap_used, clippy::expect_used)]

use tagx_core::errors::{ExError, ExErrorKind, TagxError};
use tagx_core::view::{RelevanceStyle, ViewFactory};
use tagx_core_types::{MarkupId, TextNodeId};

#[test]
fn test_configuration_errors_map_to_configuration_kinds() {
    let cases = vec![
        TagxError::ConflictingLayerRelevance {
            existing: RelevanceStyle::Include,
            requested: RelevanceStyle::Exclude,
        },
        TagxError::InvalidView,
        TagxError::InvalidViewDefinition {
            reason: "bad".to_string(),
        },
    ];
    for err in cases {
        let ex: ExError = err.into();
        assert!(ex.kind().is_configuration(), "{:?}", ex);
        assert!(!ex.kind().is_internal());
    }
}

#[test]
fn test_graph_defects_map_to_internal_kinds() {
    let dangling: ExError = TagxError::DanglingMarkup {
        text_node_id: TextNodeId::new(4),
        markup_id: MarkupId::new(9),
    }
    .into();
    assert_eq!(dangling.code(), "ERR_DANGLING_REFERENCE");
    assert_eq!(dangling.entity_id(), Some("m9"));
    assert_eq!(dangling.text_node_id(), Some("t4"));
    assert!(dangling.kind().is_internal());

    let broken: ExError = TagxError::TraversalBroken {
        text_node_id: TextNodeId::new(1),
        reason: "branch missing".to_string(),
    }
    .into();
    assert_eq!(broken.kind(), ExErrorKind::TraversalBroken);
    assert_eq!(broken.op(), Some("traverse"));
    assert_eq!(broken.message(), "branch missing");
}

#[test]
fn test_document_errors_are_invalid_input() {
    let unclosed: ExError = TagxError::UnclosedMarkup {
        markup_id: MarkupId::new(0),
        tag: "p".to_string(),
    }
    .into();
    assert_eq!(unclosed.kind(), ExErrorKind::InvalidInput);
    assert!(unclosed.message().contains("[p]"));

    let script: ExError = TagxError::InvalidScript {
        step: 3,
        reason: "unknown markup handle 'x'".to_string(),
    }
    .into();
    assert_eq!(script.op(), Some("replay_script"));
    assert!(script.to_string().starts_with("[ERR_INVALID_INPUT] in operation 'replay_script'"));
}

#[test]
fn test_view_definition_error_code() {
    let err = ViewFactory::from_json("not json").unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.code(), "ERR_INVALID_VIEW_DEFINITION");
    assert_eq!(ex.op(), Some("load_view"));
}

#[test]
fn test_serde_json_error_converts() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: TagxError = json_err.into();
    assert!(matches!(err, TagxError::Serialization { .. }));
    assert_eq!(ExError::from(err).code(), "ERR_SERIALIZATION");
}

#[test]
fn test_display_messages() {
    let err = TagxError::ConflictingMarkupRelevance {
        existing: RelevanceStyle::Exclude,
        requested: RelevanceStyle::Include,
    };
    assert_eq!(
        err.to_string(),
        "Cannot set markup to include: markup to exclude already set"
    );
    assert_eq!(
        TagxError::MarkupNotFound {
            markup_id: MarkupId::new(2)
        }
        .to_string(),
        "Markup not found: m2"
    );
}
