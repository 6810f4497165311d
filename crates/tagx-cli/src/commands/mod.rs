pub mod layers;
pub mod render;

use std::path::Path;

use tagx_core::logging_facility::{init, Profile};
use tagx_core::{Document, DocumentScript, TagView, ViewFactory};

/// Start logging for a command; no profile means no subscriber
pub(crate) fn init_logging(profile: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(profile) = profile {
        init(profile.parse::<Profile>()?);
    }
    Ok(())
}

/// Read and replay a JSON document script
pub(crate) fn load_document(path: &Path) -> Result<Document, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let document = DocumentScript::from_json(&json)?.build()?;
    Ok(document)
}

/// Read a JSON view definition, or show everything when none is given
pub(crate) fn load_view(path: Option<&Path>) -> Result<TagView, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(ViewFactory::from_json(&json)?)
        }
        None => Ok(TagView::show_all()),
    }
}
