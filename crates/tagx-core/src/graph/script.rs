//! Replayable document descriptions
//!
//! A script is the list of builder calls that produce a document, written as
//! JSON so that the CLI and test fixtures can describe documents without a
//! notation parser:
//!
//! ```json
//! { "steps": [
//!     { "op": "open", "tag": "line" },
//!     { "op": "text", "content": "Hello" },
//!     { "op": "close", "tag": "line" }
//! ] }
//! ```
//!
//! Markup is referred to by `handle`, which defaults to the tag name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tagx_core_types::MarkupId;

use super::builder::DocumentBuilder;
use super::document::Document;
use crate::errors::{Result, TagxError};
use crate::model::{Annotation, MarkupSpec};

/// One builder call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ScriptStep {
    Text {
        content: String,
    },
    Open {
        tag: String,
        #[serde(default)]
        handle: Option<String>,
        #[serde(default)]
        layers: Vec<String>,
        #[serde(default)]
        annotations: Vec<Annotation>,
        #[serde(default)]
        optional: bool,
    },
    Close {
        #[serde(alias = "tag")]
        handle: String,
    },
    Suspend {
        #[serde(alias = "tag")]
        handle: String,
    },
    Resume {
        #[serde(alias = "tag")]
        handle: String,
    },
    Milestone {
        tag: String,
        #[serde(default)]
        layers: Vec<String>,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    OpenVariation,
    NextBranch,
    CloseVariation,
}

/// Ordered builder calls describing one document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentScript {
    pub steps: Vec<ScriptStep>,
}

impl DocumentScript {
    /// Parse a script from JSON
    ///
    /// # Errors
    ///
    /// `Serialization` if the JSON does not describe a script.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replay the steps through a [`DocumentBuilder`]
    ///
    /// # Errors
    ///
    /// `InvalidScript` for handles that were never opened or are reused while
    /// open; any builder error otherwise.
    pub fn build(&self) -> Result<Document> {
        let mut builder = DocumentBuilder::new();
        let mut handles: HashMap<String, MarkupId> = HashMap::new();

        for (step_index, step) in self.steps.iter().enumerate() {
            let lookup = |handles: &HashMap<String, MarkupId>, handle: &str| {
                handles
                    .get(handle)
                    .copied()
                    .ok_or_else(|| TagxError::InvalidScript {
                        step: step_index,
                        reason: format!("unknown markup handle '{}'", handle),
                    })
            };

            match step {
                ScriptStep::Text { content } => {
                    builder.add_text(content.as_str());
                }
                ScriptStep::Open {
                    tag,
                    handle,
                    layers,
                    annotations,
                    optional,
                } => {
                    let handle = handle.clone().unwrap_or_else(|| tag.clone());
                    if handles.contains_key(&handle) {
                        return Err(TagxError::InvalidScript {
                            step: step_index,
                            reason: format!("handle '{}' is already in use", handle),
                        });
                    }
                    let spec = MarkupSpec {
                        tag: tag.clone(),
                        layers: layers.clone(),
                        annotations: annotations.clone(),
                        optional: *optional,
                    };
                    handles.insert(handle, builder.open_markup(spec));
                }
                ScriptStep::Close { handle } => {
                    let id = lookup(&handles, handle)?;
                    builder.close_markup(id)?;
                    handles.remove(handle);
                }
                ScriptStep::Suspend { handle } => {
                    builder.suspend_markup(lookup(&handles, handle)?)?;
                }
                ScriptStep::Resume { handle } => {
                    builder.resume_markup(lookup(&handles, handle)?)?;
                }
                ScriptStep::Milestone {
                    tag,
                    layers,
                    annotations,
                } => {
                    builder.add_milestone(MarkupSpec {
                        tag: tag.clone(),
                        layers: layers.clone(),
                        annotations: annotations.clone(),
                        optional: false,
                    });
                }
                ScriptStep::OpenVariation => builder.open_variation(),
                ScriptStep::NextBranch => builder.next_branch()?,
                ScriptStep::CloseVariation => builder.close_variation()?,
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DocumentGraph;

    #[test]
    fn test_script_from_json_builds_document() {
        let json = r#"{"steps":[
            {"op":"open","tag":"line","layers":["A"]},
            {"op":"text","content":"Hello"},
            {"op":"milestone","tag":"br"},
            {"op":"close","tag":"line"}
        ]}"#;
        let document = DocumentScript::from_json(json).unwrap().build().unwrap();

        assert_eq!(document.plain_text(), "Hello");
        assert_eq!(document.text_node_count(), 2);
        assert!(document.layer_names().contains("A"));
        assert!(document.markup_with_tag("br")[0].anonymous);
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let json = r#"{"steps":[{"op":"close","handle":"nope"}]}"#;
        let err = DocumentScript::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, TagxError::InvalidScript { step: 0, .. }));
    }

    #[test]
    fn test_duplicate_open_handle_rejected() {
        let json = r#"{"steps":[
            {"op":"open","tag":"s"},
            {"op":"open","tag":"s"}
        ]}"#;
        let err = DocumentScript::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, TagxError::InvalidScript { step: 1, .. }));
    }

    #[test]
    fn test_unknown_op_is_serialization_error() {
        let err = DocumentScript::from_json(r#"{"steps":[{"op":"dance"}]}"#).unwrap_err();
        assert!(matches!(err, TagxError::Serialization { .. }));
    }
}
