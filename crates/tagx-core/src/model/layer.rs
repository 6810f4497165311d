use std::collections::BTreeSet;

/// Name of the default layer
///
/// Markup declared without a layer lives here. It is relevant in every view.
pub const DEFAULT_LAYER: &str = "";

/// Collect layer names into a set, falling back to the default layer when empty
pub fn normalize_layers<I, S>(layers: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut set: BTreeSet<String> = layers.into_iter().map(Into::into).collect();
    if set.is_empty() {
        set.insert(DEFAULT_LAYER.to_string());
    }
    set
}

/// Whether `layer` names the default layer
pub fn is_default_layer(layer: &str) -> bool {
    layer == DEFAULT_LAYER
}
