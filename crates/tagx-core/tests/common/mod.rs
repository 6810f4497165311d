use tagx_core::graph::{Document, DocumentBuilder};
use tagx_core::model::{Annotation, AnnotationValue, MarkupSpec};
use tagx_core::view::TagView;

/// `[line>Hello world<line]`
#[allow(dead_code)]
pub fn line_document() -> Document {
    let mut builder = DocumentBuilder::new();
    let line = builder.open_markup(MarkupSpec::new("line"));
    builder.add_text("Hello world");
    builder.close_markup(line).unwrap();
    builder.build().unwrap()
}

/// Root span over "abcd" with `p` in L1 over "ab" and `q` in L2 over "bc"
#[allow(dead_code)]
pub fn overlap_document() -> Document {
    let mut builder = DocumentBuilder::new();
    let root = builder.open_markup(MarkupSpec::new("root"));
    let p = builder.open_markup(MarkupSpec::new("p").in_layer("L1"));
    builder.add_text("a");
    let q = builder.open_markup(MarkupSpec::new("q").in_layer("L2"));
    builder.add_text("b");
    builder.close_markup(p).unwrap();
    builder.add_text("c");
    builder.close_markup(q).unwrap();
    builder.add_text("d");
    builder.close_markup(root).unwrap();
    builder.build().unwrap()
}

/// `q` suspended around "b"
#[allow(dead_code)]
pub fn discontinuous_document() -> Document {
    let mut builder = DocumentBuilder::new();
    let q = builder.open_markup(MarkupSpec::new("q"));
    builder.add_text("a");
    builder.suspend_markup(q).unwrap();
    builder.add_text("b");
    builder.resume_markup(q).unwrap();
    builder.add_text("c");
    builder.close_markup(q).unwrap();
    builder.build().unwrap()
}

/// `q` suspended after "a", resumed inside `r` which opened after "b"
#[allow(dead_code)]
pub fn resumed_in_gap_document() -> Document {
    let mut builder = DocumentBuilder::new();
    let q = builder.open_markup(MarkupSpec::new("q"));
    builder.add_text("a");
    builder.suspend_markup(q).unwrap();
    builder.add_text("b");
    let r = builder.open_markup(MarkupSpec::new("r"));
    builder.resume_markup(q).unwrap();
    builder.add_text("c");
    builder.close_markup(q).unwrap();
    builder.add_text("e");
    builder.close_markup(r).unwrap();
    builder.build().unwrap()
}

/// `t` over "a", a two-branch variation (`del` over "b" | `add` over "c"), then "d"
#[allow(dead_code)]
pub fn variation_document() -> Document {
    let mut builder = DocumentBuilder::new();
    let t = builder.open_markup(MarkupSpec::new("t"));
    builder.add_text("a");
    builder.open_variation();
    let del = builder.open_markup(MarkupSpec::new("del"));
    builder.add_text("b");
    builder.close_markup(del).unwrap();
    builder.next_branch().unwrap();
    let add = builder.open_markup(MarkupSpec::new("add"));
    builder.add_text("c");
    builder.close_markup(add).unwrap();
    builder.close_variation().unwrap();
    builder.add_text("d");
    builder.close_markup(t).unwrap();
    builder.build().unwrap()
}

/// `p` carrying one annotation of every kind, with a `br` milestone inside
#[allow(dead_code)]
pub fn annotated_document() -> Document {
    let spec = MarkupSpec::new("p")
        .with_annotation(Annotation::string("who", "A \"b\""))
        .with_annotation(Annotation::number("n", 3.0))
        .with_annotation(Annotation::boolean("ok", true))
        .with_annotation(Annotation::list(
            "l",
            vec![AnnotationValue::Number(1.0), AnnotationValue::Number(2.5)],
        ))
        .with_annotation(Annotation::map("m", vec![Annotation::number("a", 1.0)]))
        .with_annotation(Annotation::reference("r", "x"));

    let mut builder = DocumentBuilder::new();
    let p = builder.open_markup(spec);
    builder.add_text("Hi");
    builder.add_milestone(MarkupSpec::new("br"));
    builder.close_markup(p).unwrap();
    builder.build().unwrap()
}

/// Default-layer `root` with `s` in layer A over "ab"
#[allow(dead_code)]
pub fn two_layer_document() -> Document {
    let mut builder = DocumentBuilder::new();
    let root = builder.open_markup(MarkupSpec::new("root"));
    let s = builder.open_markup(MarkupSpec::new("s").in_layer("A"));
    builder.add_text("ab");
    builder.close_markup(s).unwrap();
    builder.close_markup(root).unwrap();
    builder.build().unwrap()
}

#[allow(dead_code)]
pub fn show_all() -> TagView {
    TagView::show_all()
}

#[allow(dead_code)]
pub fn excluding_layers(layers: &[&str]) -> TagView {
    let mut view = TagView::new();
    view.layers_to_exclude(layers.iter().copied()).unwrap();
    view
}

#[allow(dead_code)]
pub fn including_layers(layers: &[&str]) -> TagView {
    let mut view = TagView::new();
    view.layers_to_include(layers.iter().copied()).unwrap();
    view
}
