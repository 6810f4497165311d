use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tagx_core_types::MarkupId;

use crate::errors::{Result, TagxError};
use crate::model::{Markup, DEFAULT_LAYER};

/// How one axis of a view selects relevant entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceStyle {
    /// Only the listed names are relevant
    Include,
    /// Everything except the listed names is relevant
    Exclude,
    /// The axis does not filter
    #[default]
    Undefined,
}

impl fmt::Display for RelevanceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelevanceStyle::Include => "include",
            RelevanceStyle::Exclude => "exclude",
            RelevanceStyle::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

/// A view: which layers and which markup tags are relevant to a rendering
///
/// The two axes are independent. Each axis is either an include-set, an
/// exclude-set, or undefined; never both. The default layer is relevant in
/// every view and is silently added to include-sets and dropped from
/// exclude-sets.
///
/// Views naming layers or tags absent from a document are fine: they just
/// match nothing on that axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagView {
    layer_style: RelevanceStyle,
    layers: BTreeSet<String>,
    markup_style: RelevanceStyle,
    markup: BTreeSet<String>,
    exclusive_markup: BTreeSet<String>,
}

impl TagView {
    /// Create a view with both axes undefined
    ///
    /// Such a view is not valid until at least one axis is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The "no filtering" view: an empty markup exclude-set
    pub fn show_all() -> Self {
        Self {
            markup_style: RelevanceStyle::Exclude,
            ..Self::default()
        }
    }

    /// Make only the given layers (plus the default layer) relevant
    ///
    /// # Errors
    ///
    /// `ConflictingLayerRelevance` if layers to exclude were already set.
    pub fn layers_to_include<I, S>(&mut self, layers: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.layer_style == RelevanceStyle::Exclude {
            return Err(TagxError::ConflictingLayerRelevance {
                existing: RelevanceStyle::Exclude,
                requested: RelevanceStyle::Include,
            });
        }
        self.layer_style = RelevanceStyle::Include;
        self.layers = layers.into_iter().map(Into::into).collect();
        self.layers.insert(DEFAULT_LAYER.to_string());
        Ok(self)
    }

    /// Make every layer except the given ones relevant
    ///
    /// # Errors
    ///
    /// `ConflictingLayerRelevance` if layers to include were already set.
    pub fn layers_to_exclude<I, S>(&mut self, layers: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.layer_style == RelevanceStyle::Include {
            return Err(TagxError::ConflictingLayerRelevance {
                existing: RelevanceStyle::Include,
                requested: RelevanceStyle::Exclude,
            });
        }
        self.layer_style = RelevanceStyle::Exclude;
        self.layers = layers.into_iter().map(Into::into).collect();
        self.layers.remove(DEFAULT_LAYER);
        Ok(self)
    }

    /// Make only markup with the given tags relevant
    ///
    /// # Errors
    ///
    /// `ConflictingMarkupRelevance` if markup to exclude was already set.
    pub fn markup_to_include<I, S>(&mut self, tags: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.markup_style == RelevanceStyle::Exclude {
            return Err(TagxError::ConflictingMarkupRelevance {
                existing: RelevanceStyle::Exclude,
                requested: RelevanceStyle::Include,
            });
        }
        self.markup_style = RelevanceStyle::Include;
        self.markup = tags.into_iter().map(Into::into).collect();
        Ok(self)
    }

    /// Make every markup except the given tags relevant
    ///
    /// # Errors
    ///
    /// `ConflictingMarkupRelevance` if markup to include was already set.
    pub fn markup_to_exclude<I, S>(&mut self, tags: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.markup_style == RelevanceStyle::Include {
            return Err(TagxError::ConflictingMarkupRelevance {
                existing: RelevanceStyle::Include,
                requested: RelevanceStyle::Exclude,
            });
        }
        self.markup_style = RelevanceStyle::Exclude;
        self.markup = tags.into_iter().map(Into::into).collect();
        Ok(self)
    }

    /// Declare tags whose text disappears together with their filtered-out layer
    pub fn exclusive_markup<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusive_markup = tags.into_iter().map(Into::into).collect();
        self
    }

    /// A view is valid when at least one axis filters
    pub fn is_valid(&self) -> bool {
        self.layer_style != RelevanceStyle::Undefined
            || self.markup_style != RelevanceStyle::Undefined
    }

    pub fn layer_style(&self) -> RelevanceStyle {
        self.layer_style
    }

    pub fn markup_style(&self) -> RelevanceStyle {
        self.markup_style
    }

    /// Layer names of the layer axis (include- or exclude-set)
    pub fn layers(&self) -> &BTreeSet<String> {
        &self.layers
    }

    /// Tag names of the markup axis (include- or exclude-set)
    pub fn markup(&self) -> &BTreeSet<String> {
        &self.markup
    }

    pub fn exclusive_markup_tags(&self) -> &BTreeSet<String> {
        &self.exclusive_markup
    }

    /// Reduce a document's layer names to the ones relevant in this view
    ///
    /// The default layer is always part of the result.
    pub fn filter_relevant_layers<'a, I>(&self, layer_names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut relevant: BTreeSet<String> = layer_names
            .into_iter()
            .filter(|layer| self.layer_is_relevant(layer))
            .map(str::to_string)
            .collect();
        relevant.insert(DEFAULT_LAYER.to_string());
        relevant
    }

    /// Check a single layer name against the layer axis
    pub fn layer_is_relevant(&self, layer: &str) -> bool {
        match self.layer_style {
            RelevanceStyle::Include => self.layers.contains(layer),
            RelevanceStyle::Exclude => !self.layers.contains(layer),
            RelevanceStyle::Undefined => true,
        }
    }

    /// Layer axis for a markup: relevant if any of its layers is relevant
    pub fn markup_layers_relevant(&self, markup: &Markup) -> bool {
        match self.layer_style {
            RelevanceStyle::Undefined => true,
            _ => markup.layers.iter().any(|layer| self.layer_is_relevant(layer)),
        }
    }

    /// Tag axis for a markup
    pub fn tag_is_relevant(&self, tag: &str) -> bool {
        match self.markup_style {
            RelevanceStyle::Include => self.markup.contains(tag),
            RelevanceStyle::Exclude => !self.markup.contains(tag),
            RelevanceStyle::Undefined => true,
        }
    }

    /// Both axes, conjunctively
    pub fn is_relevant(&self, markup: &Markup) -> bool {
        self.markup_layers_relevant(markup) && self.tag_is_relevant(&markup.tag)
    }

    /// Keep the ids of relevant markup, preserving input order
    pub fn filter_relevant_markup<'a, I>(&self, markups: I) -> Vec<MarkupId>
    where
        I: IntoIterator<Item = &'a Markup>,
    {
        markups
            .into_iter()
            .filter(|markup| self.is_relevant(markup))
            .map(|markup| markup.id)
            .collect()
    }

    /// Whether the text under the given covering markup must be dropped
    ///
    /// True when at least one layer-exclusive markup covers the node and every
    /// such markup sits only in filtered-out layers.
    pub fn suppresses_text(&self, covering: &[&Markup]) -> bool {
        if self.exclusive_markup.is_empty() {
            return false;
        }
        let mut exclusive = covering
            .iter()
            .filter(|markup| self.exclusive_markup.contains(&markup.tag))
            .peekable();
        if exclusive.peek().is_none() {
            return false;
        }
        exclusive.all(|markup| !self.markup_layers_relevant(markup))
    }
}
