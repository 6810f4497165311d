//! JSON view definitions
//!
//! A view definition is the configuration form of a [`TagView`]:
//!
//! ```json
//! { "excludeLayers": ["edit"], "includeMarkup": ["s", "l"] }
//! ```
//!
//! Fields are optional. Giving both the include and the exclude form of one
//! axis is rejected with the same configuration error as the setters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tag_view::{RelevanceStyle, TagView};
use crate::errors::{Result, TagxError};
use crate::model::DEFAULT_LAYER;

/// Serialized view configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ViewDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_layers: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_layers: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_markup: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_markup: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclusive_markup: BTreeSet<String>,
}

impl ViewDefinition {
    /// Describe an existing view
    pub fn from_view(view: &TagView) -> Self {
        let mut definition = Self {
            exclusive_markup: view.exclusive_markup_tags().clone(),
            ..Self::default()
        };
        match view.layer_style() {
            RelevanceStyle::Include => {
                let mut layers = view.layers().clone();
                layers.remove(DEFAULT_LAYER);
                definition.include_layers = Some(layers);
            }
            RelevanceStyle::Exclude => definition.exclude_layers = Some(view.layers().clone()),
            RelevanceStyle::Undefined => {}
        }
        match view.markup_style() {
            RelevanceStyle::Include => definition.include_markup = Some(view.markup().clone()),
            RelevanceStyle::Exclude => definition.exclude_markup = Some(view.markup().clone()),
            RelevanceStyle::Undefined => {}
        }
        definition
    }
}

/// Builds views from definitions
pub struct ViewFactory;

impl ViewFactory {
    /// Build a view from a definition
    ///
    /// # Errors
    ///
    /// `ConflictingLayerRelevance` / `ConflictingMarkupRelevance` when one axis
    /// is given in both styles.
    pub fn from_definition(definition: &ViewDefinition) -> Result<TagView> {
        let mut view = TagView::new();
        if let Some(layers) = &definition.include_layers {
            view.layers_to_include(layers.iter().cloned())?;
        }
        if let Some(layers) = &definition.exclude_layers {
            view.layers_to_exclude(layers.iter().cloned())?;
        }
        if let Some(tags) = &definition.include_markup {
            view.markup_to_include(tags.iter().cloned())?;
        }
        if let Some(tags) = &definition.exclude_markup {
            view.markup_to_exclude(tags.iter().cloned())?;
        }
        view.exclusive_markup(definition.exclusive_markup.iter().cloned());
        Ok(view)
    }

    /// Parse a JSON definition and build the view
    ///
    /// # Errors
    ///
    /// `InvalidViewDefinition` for malformed JSON, plus the errors of
    /// [`ViewFactory::from_definition`].
    pub fn from_json(json: &str) -> Result<TagView> {
        let definition: ViewDefinition =
            serde_json::from_str(json).map_err(|e| TagxError::InvalidViewDefinition {
                reason: e.to_string(),
            })?;
        Self::from_definition(&definition)
    }

    /// Serialize a view back to its JSON definition
    ///
    /// # Errors
    ///
    /// `Serialization` if the definition cannot be encoded.
    pub fn to_json(view: &TagView) -> Result<String> {
        Ok(serde_json::to_string(&ViewDefinition::from_view(view))?)
    }
}
