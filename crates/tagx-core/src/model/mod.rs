pub mod annotation;
pub mod layer;
pub mod markup;
pub mod text_node;
pub mod variation;

pub use annotation::{format_number, Annotation, AnnotationValue};
pub use layer::{normalize_layers, DEFAULT_LAYER};
pub use markup::{Markup, MarkupSpec};
pub use text_node::TextNode;
pub use variation::TextVariation;
