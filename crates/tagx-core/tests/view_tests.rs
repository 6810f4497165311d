#![allow(clippy::unwrap_used, clippy::expect_used)]

use tagx_core::view::{RelevanceStyle, TagView, ViewFactory};
use tagx_core::{ExError, ExErrorKind, TagxError, DEFAULT_LAYER};

#[test]
fn test_layer_axis_exclusivity_both_orders() {
    let mut view = TagView::new();
    view.layers_to_include(["A"]).unwrap();
    assert!(view.layers_to_exclude(["B"]).is_err());

    let mut view = TagView::new();
    view.layers_to_exclude(["B"]).unwrap();
    assert!(view.layers_to_include(["A"]).is_err());
}

#[test]
fn test_markup_axis_exclusivity_both_orders() {
    let mut view = TagView::new();
    view.markup_to_include(["s"]).unwrap();
    let err = view.markup_to_exclude(["l"]).unwrap_err();
    assert_eq!(
        ExError::from(err).kind(),
        ExErrorKind::ConflictingRelevance
    );

    let mut view = TagView::new();
    view.markup_to_exclude(["l"]).unwrap();
    assert!(matches!(
        view.markup_to_include(["s"]),
        Err(TagxError::ConflictingMarkupRelevance { .. })
    ));
}

#[test]
fn test_axes_are_independent() {
    let mut view = TagView::new();
    view.layers_to_include(["A"]).unwrap();
    view.markup_to_exclude(["x"]).unwrap();
    assert_eq!(view.layer_style(), RelevanceStyle::Include);
    assert_eq!(view.markup_style(), RelevanceStyle::Exclude);
    assert!(view.is_valid());
}

#[test]
fn test_default_layer_always_relevant() {
    let mut view = TagView::new();
    view.layers_to_include(["A"]).unwrap();
    let relevant = view.filter_relevant_layers(["A", "B", DEFAULT_LAYER]);
    assert!(relevant.contains(DEFAULT_LAYER));
    assert!(relevant.contains("A"));
    assert!(!relevant.contains("B"));

    // even when the document has no default-layer markup
    let relevant = view.filter_relevant_layers(["B"]);
    assert_eq!(relevant.len(), 1);
    assert!(relevant.contains(DEFAULT_LAYER));
}

#[test]
fn test_undefined_layer_axis_keeps_all_layers() {
    let view = TagView::show_all();
    let relevant = view.filter_relevant_layers(["A", "B"]);
    assert_eq!(relevant.len(), 3);
}

#[test]
fn test_view_definition_to_json_omits_default_layer() {
    let mut view = TagView::new();
    view.layers_to_include(["A"]).unwrap();
    let json = ViewFactory::to_json(&view).unwrap();
    assert_eq!(json, r#"{"includeLayers":["A"]}"#);
}

#[test]
fn test_show_all_definition() {
    let view = ViewFactory::from_json(r#"{"excludeMarkup":[]}"#).unwrap();
    assert_eq!(view, TagView::show_all());
}
