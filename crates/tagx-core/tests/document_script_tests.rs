#![allow(clippy::unwrap_used, clippy::expect_used)]

use tagx_core::graph::{DocumentGraph, DocumentScript, ScriptStep};
use tagx_core::render::render_tagml;
use tagx_core::view::TagView;
use tagx_core::TagxError;

const VARIANT_SCRIPT: &str = r#"{
  "steps": [
    { "op": "open", "tag": "s", "layers": ["A"],
      "annotations": [{ "key": "n", "value": { "type": "number", "value": 1 } }] },
    { "op": "text", "content": "The " },
    { "op": "openVariation" },
    { "op": "open", "tag": "del", "handle": "d1" },
    { "op": "text", "content": "old" },
    { "op": "close", "handle": "d1" },
    { "op": "nextBranch" },
    { "op": "text", "content": "new" },
    { "op": "closeVariation" },
    { "op": "text", "content": " text" },
    { "op": "suspend", "tag": "s" },
    { "op": "milestone", "tag": "pb" },
    { "op": "resume", "tag": "s" },
    { "op": "text", "content": "!" },
    { "op": "close", "tag": "s" }
  ]
}"#;

#[test]
fn test_script_renders_all_features() {
    let document = DocumentScript::from_json(VARIANT_SCRIPT).unwrap().build().unwrap();
    assert_eq!(document.variations().len(), 1);
    assert!(document.markup_with_tag("s")[0].discontinuous);

    let output = render_tagml(&document, &TagView::show_all()).unwrap();
    assert_eq!(
        output,
        "[s|+A n=1>The <|[del>old<del]|new|> text<-s|A][pb][+s|A>!<s|A]"
    );
}

#[test]
fn test_script_round_trips_through_serde() {
    let script = DocumentScript::from_json(VARIANT_SCRIPT).unwrap();
    let json = serde_json::to_string(&script).unwrap();
    let again = DocumentScript::from_json(&json).unwrap();
    assert_eq!(script, again);
    assert!(matches!(again.steps[2], ScriptStep::OpenVariation));
}

#[test]
fn test_builder_errors_surface() {
    let json = r#"{"steps":[{"op":"openVariation"},{"op":"nextBranch"}]}"#;
    let err = DocumentScript::from_json(json).unwrap().build().unwrap_err();
    assert!(matches!(err, TagxError::InvalidVariation { .. }));

    let json = r#"{"steps":[{"op":"open","tag":"x"},{"op":"text","content":"a"}]}"#;
    let err = DocumentScript::from_json(json).unwrap().build().unwrap_err();
    assert!(matches!(err, TagxError::UnclosedMarkup { .. }));
}

#[test]
fn test_layers_collected_from_script() {
    let document = DocumentScript::from_json(VARIANT_SCRIPT).unwrap().build().unwrap();
    let layers: Vec<String> = document.layer_names().into_iter().collect();
    assert_eq!(layers, vec!["".to_string(), "A".to_string()]);
}
