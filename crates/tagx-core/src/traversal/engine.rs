use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

use tagx_core_types::{MarkupId, TextNodeId};
use tracing::{debug, trace};

use super::state::ExporterState;
use super::visitor::{CloseMode, MarkupTag, OpenMode, TagVisitor};
use crate::errors::{Result, TagxError};
use crate::graph::DocumentGraph;
use crate::model::{AnnotationValue, Markup, TextVariation, DEFAULT_LAYER};
use crate::view::TagView;
use crate::{log_op_end, log_op_error, log_op_start};

/// Where a traversal currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPhase {
    /// `enter_document` not emitted yet
    Idle,
    InMainLine,
    /// Inside this many nested variations
    InVariationBranch(usize),
    Done,
}

/// An active variation
#[derive(Debug)]
struct VariationFrame {
    branch_starts: Vec<TextNodeId>,
    /// Index into `branch_starts` of the branch expected next
    next_branch: usize,
    convergence: Option<TextNodeId>,
    /// Open markup at the divergence point
    snapshot: ExporterState,
    /// Suspended markup at the divergence point
    suspended: HashSet<MarkupId>,
}

impl VariationFrame {
    fn new(
        variation: &TextVariation,
        snapshot: ExporterState,
        suspended: HashSet<MarkupId>,
    ) -> Self {
        Self {
            branch_starts: variation.branch_starts.clone(),
            next_branch: 1,
            convergence: variation.convergence,
            snapshot,
            suspended,
        }
    }

    fn next_branch_start(&self) -> Option<TextNodeId> {
        self.branch_starts.get(self.next_branch).copied()
    }

    fn remaining_branches(&self) -> usize {
        self.branch_starts.len().saturating_sub(self.next_branch)
    }

    fn expects(&self, id: TextNodeId) -> bool {
        self.convergence == Some(id) || self.next_branch_start() == Some(id)
    }
}

/// Walks a document graph once and drives a [`TagVisitor`]
///
/// A traverser is single use: [`accept`](Self::accept) runs it from
/// [`TraversalPhase::Idle`] to [`TraversalPhase::Done`], and a second call is
/// rejected. [`phase`](Self::phase) tells how far a failed run got. All
/// per-rendering state (open markup, variation frames, suspended markup, tag
/// records) lives here and is dropped with it.
pub struct Traverser<'a, G: DocumentGraph + ?Sized> {
    graph: &'a G,
    view: &'a TagView,
    relevant_layers: BTreeSet<String>,
    state: ExporterState,
    frames: Vec<VariationFrame>,
    processed: HashSet<TextNodeId>,
    /// Unvisited text node associations per markup
    remaining: HashMap<MarkupId, usize>,
    suspended: HashSet<MarkupId>,
    tags: HashMap<MarkupId, MarkupTag>,
    /// Relevant layers used by some markup opened so far
    layers_opened: BTreeSet<String>,
    phase: TraversalPhase,
    last_text_node: Option<TextNodeId>,
}

impl<'a, G: DocumentGraph + ?Sized> Traverser<'a, G> {
    /// Prepare a traversal of `graph` under `view`
    ///
    /// # Errors
    ///
    /// `InvalidView` if neither axis of the view is defined.
    pub fn new(graph: &'a G, view: &'a TagView) -> Result<Self> {
        if !view.is_valid() {
            return Err(TagxError::InvalidView);
        }
        let layer_names = graph.layer_names();
        let relevant_layers = view.filter_relevant_layers(layer_names.iter().map(String::as_str));

        Ok(Self {
            graph,
            view,
            relevant_layers,
            state: ExporterState::new(),
            frames: Vec::new(),
            processed: HashSet::new(),
            remaining: HashMap::new(),
            suspended: HashSet::new(),
            tags: HashMap::new(),
            layers_opened: BTreeSet::new(),
            phase: TraversalPhase::Idle,
            last_text_node: None,
        })
    }

    pub fn phase(&self) -> TraversalPhase {
        self.phase
    }

    /// Layers of the document relevant in this view, default layer included
    pub fn relevant_layers(&self) -> &BTreeSet<String> {
        &self.relevant_layers
    }

    /// Traverse the whole document, emitting events into `visitor`
    ///
    /// # Errors
    ///
    /// `TraverserReused` unless the traverser is still idle. `DanglingMarkup`
    /// or `TraversalBroken` if the graph is inconsistent; the visitor's output
    /// is incomplete then and [`phase`](Self::phase) is where it stopped.
    pub fn accept<V: TagVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        if self.phase != TraversalPhase::Idle {
            return Err(TagxError::TraverserReused {
                phase: format!("{:?}", self.phase),
            });
        }
        let text_node_ids = self.graph.text_node_ids();
        log_op_start!(
            "traverse",
            text_node_count = text_node_ids.len() as u64,
            layer_count = self.relevant_layers.len() as u64
        );
        let start = std::time::Instant::now();

        self.run(&text_node_ids, visitor).map_err(|e| {
            log_op_error!(
                "traverse",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                phase = ?self.phase
            );
            e
        })?;

        log_op_end!(
            "traverse",
            duration_ms = start.elapsed().as_millis() as u64,
            text_node_count = self.processed.len() as u64,
            phase = ?self.phase
        );
        Ok(())
    }

    fn run<V: TagVisitor + ?Sized>(
        &mut self,
        text_node_ids: &[TextNodeId],
        visitor: &mut V,
    ) -> Result<()> {
        visitor.set_view(self.view);
        visitor.set_relevant_layers(&self.relevant_layers);
        visitor.enter_document();
        self.set_phase(TraversalPhase::InMainLine);

        for &id in text_node_ids {
            if !self.processed.insert(id) {
                continue;
            }
            self.visit_text_node(id, visitor)?;
        }

        self.finish(visitor)
    }

    fn visit_text_node<V: TagVisitor + ?Sized>(
        &mut self,
        id: TextNodeId,
        visitor: &mut V,
    ) -> Result<()> {
        let graph = self.graph;
        let view = self.view;

        let node = graph.text_node(id).map_err(|_| TagxError::TraversalBroken {
            text_node_id: id,
            reason: "text node listed in document order is missing".to_string(),
        })?;

        let mut covering: Vec<&Markup> = Vec::new();
        for markup_id in graph.markup_ids_covering(id) {
            let markup = graph.markup(markup_id).map_err(|_| TagxError::DanglingMarkup {
                text_node_id: id,
                markup_id,
            })?;
            let remaining = self
                .remaining
                .entry(markup_id)
                .or_insert_with(|| markup.text_node_count());
            *remaining = remaining.saturating_sub(1);
            covering.push(markup);
        }
        let relevant = view.filter_relevant_markup(covering.iter().copied());

        self.cross_variation_boundaries(id, visitor)?;

        for markup_id in self.state.to_close(&relevant) {
            self.close_markup(markup_id, visitor)?;
        }

        for variation in graph.variations_starting_at(id) {
            debug!(
                text_node_id = %id,
                branch_count = variation.branch_count() as u64,
                variation_depth = self.frames.len() as u64 + 1,
                "enter text variation"
            );
            visitor.enter_text_variation();
            let frame = VariationFrame::new(variation, self.state.clone(), self.suspended.clone());
            self.frames.push(frame);
        }
        self.update_phase();

        for markup_id in self.state.to_open(&relevant) {
            let markup = covering
                .iter()
                .copied()
                .find(|markup| markup.id == markup_id)
                .ok_or(TagxError::DanglingMarkup {
                    text_node_id: id,
                    markup_id,
                })?;
            self.open_markup(markup, visitor);
        }

        if view.suppresses_text(&covering) {
            trace!(text_node_id = %id, "text suppressed by layer-exclusive markup");
        } else {
            visitor.exit_text(&node.content, !self.frames.is_empty());
        }

        self.last_text_node = Some(id);
        Ok(())
    }

    /// Handle convergences and branch starts at `id`
    fn cross_variation_boundaries<V: TagVisitor + ?Sized>(
        &mut self,
        id: TextNodeId,
        visitor: &mut V,
    ) -> Result<()> {
        while let Some(frame) = self.frames.last() {
            if frame.next_branch_start() == Some(id) {
                self.close_branch_local(visitor)?;
                visitor.add_branch_divider();
                if let Some(frame) = self.frames.last_mut() {
                    self.state = frame.snapshot.clone();
                    self.suspended = frame.suspended.clone();
                    frame.next_branch += 1;
                    debug!(
                        text_node_id = %id,
                        remaining_branches = frame.remaining_branches() as u64,
                        "next branch"
                    );
                }
                return Ok(());
            }

            let depth = self.frames.len();
            let converges_here = frame.convergence == Some(id);
            let belongs_below = self.frames[..depth - 1].iter().any(|lower| lower.expects(id));
            if !converges_here && !belongs_below {
                return Ok(());
            }
            self.leave_variation(id, visitor)?;
        }
        Ok(())
    }

    /// Close branch-local markup and pop the innermost frame
    fn leave_variation<V: TagVisitor + ?Sized>(
        &mut self,
        id: TextNodeId,
        visitor: &mut V,
    ) -> Result<()> {
        if let Some(frame) = self.frames.last() {
            if frame.remaining_branches() > 0 {
                return Err(TagxError::TraversalBroken {
                    text_node_id: id,
                    reason: format!(
                        "variation left with {} branch(es) not traversed",
                        frame.remaining_branches()
                    ),
                });
            }
        }
        self.close_branch_local(visitor)?;
        visitor.exit_text_variation();
        self.frames.pop();
        self.update_phase();
        debug!(
            text_node_id = %id,
            variation_depth = self.frames.len() as u64,
            "exit text variation"
        );
        Ok(())
    }

    /// Close markup opened since the innermost divergence, last opened first
    fn close_branch_local<V: TagVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        let Some(frame) = self.frames.last() else {
            return Ok(());
        };
        for markup_id in self.state.opened_since(&frame.snapshot) {
            self.close_markup(markup_id, visitor)?;
        }
        Ok(())
    }

    fn open_markup<V: TagVisitor + ?Sized>(&mut self, markup: &Markup, visitor: &mut V) {
        let mode = if self.suspended.remove(&markup.id) {
            trace!(markup_id = %markup.id, tag = %markup.tag, "resume markup");
            OpenMode::Resume
        } else {
            OpenMode::Start
        };

        let tag = match self.tags.entry(markup.id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(markup_tag(
                markup,
                &self.relevant_layers,
                &mut self.layers_opened,
            )),
        };

        visitor.enter_open_tag(tag, mode);
        if mode == OpenMode::Start {
            for annotation in &markup.annotations {
                trace!(
                    markup_id = %markup.id,
                    key = %annotation.key,
                    kind = annotation.value.type_name(),
                    "serialize annotation"
                );
                let value = serialize_annotation_value(&*visitor, &annotation.value);
                let assigned = visitor.serialize_annotation_assigner(&annotation.key, &value);
                visitor.add_annotation(&assigned);
            }
        }
        visitor.exit_open_tag(tag, mode);
        self.state.open(markup.id);
    }

    fn close_markup<V: TagVisitor + ?Sized>(
        &mut self,
        markup_id: MarkupId,
        visitor: &mut V,
    ) -> Result<()> {
        let Some(tag) = self.tags.get(&markup_id) else {
            return Err(TagxError::TraversalBroken {
                text_node_id: self.last_text_node.unwrap_or_default(),
                reason: format!("markup {} closed before it was opened", markup_id),
            });
        };
        let remaining = self.remaining.get(&markup_id).copied().unwrap_or(0);
        let mode = if tag.discontinuous && remaining > 0 {
            CloseMode::Suspend
        } else {
            CloseMode::End
        };

        visitor.exit_close_tag(tag, mode);
        if mode == CloseMode::Suspend {
            trace!(
                markup_id = %markup_id,
                tag = %tag.tag,
                remaining = remaining as u64,
                "suspend markup"
            );
            self.suspended.insert(markup_id);
        }
        self.state.close(markup_id);
        Ok(())
    }

    fn finish<V: TagVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        let last = self.last_text_node.unwrap_or_default();
        while !self.frames.is_empty() {
            self.leave_variation(last, visitor)?;
        }
        for markup_id in self.state.closing_order() {
            self.close_markup(markup_id, visitor)?;
        }
        visitor.exit_document();
        self.set_phase(TraversalPhase::Done);
        Ok(())
    }

    fn update_phase(&mut self) {
        let phase = match self.frames.len() {
            0 => TraversalPhase::InMainLine,
            depth => TraversalPhase::InVariationBranch(depth),
        };
        self.set_phase(phase);
    }

    fn set_phase(&mut self, phase: TraversalPhase) {
        if self.phase != phase {
            trace!(from = ?self.phase, to = ?phase, "traversal phase");
            self.phase = phase;
        }
    }
}

/// Traverse `graph` under `view`, driving `visitor` to completion
///
/// # Errors
///
/// `InvalidView` before anything is emitted; `DanglingMarkup` or
/// `TraversalBroken` for an inconsistent graph.
pub fn traverse<G, V>(graph: &G, view: &TagView, visitor: &mut V) -> Result<()>
where
    G: DocumentGraph + ?Sized,
    V: TagVisitor + ?Sized,
{
    Traverser::new(graph, view)?.accept(visitor)
}

fn markup_tag(
    markup: &Markup,
    relevant_layers: &BTreeSet<String>,
    layers_opened: &mut BTreeSet<String>,
) -> MarkupTag {
    let layers: BTreeSet<String> = markup
        .layers
        .iter()
        .filter(|layer| relevant_layers.contains(*layer))
        .cloned()
        .collect();
    let new_layers: BTreeSet<String> = layers
        .iter()
        .filter(|layer| layer.as_str() != DEFAULT_LAYER && !layers_opened.contains(*layer))
        .cloned()
        .collect();
    layers_opened.extend(layers.iter().cloned());

    MarkupTag {
        id: markup.id,
        tag: markup.tag.clone(),
        layers,
        new_layers,
        anonymous: markup.anonymous,
        optional: markup.optional,
        discontinuous: markup.discontinuous,
    }
}

/// Serialize a value depth-first through the visitor's per-type callbacks
fn serialize_annotation_value<V: TagVisitor + ?Sized>(
    visitor: &V,
    value: &AnnotationValue,
) -> String {
    match value {
        AnnotationValue::String(text) => visitor.serialize_string_annotation_value(text),
        AnnotationValue::Number(number) => visitor.serialize_number_annotation_value(*number),
        AnnotationValue::Boolean(flag) => visitor.serialize_boolean_annotation_value(*flag),
        AnnotationValue::List(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|item| serialize_annotation_value(visitor, item))
                .collect();
            visitor.serialize_list_annotation_value(&items)
        }
        AnnotationValue::Map(entries) => {
            let entries: Vec<(String, String)> = entries
                .iter()
                .map(|entry| {
                    (
                        entry.key.clone(),
                        serialize_annotation_value(visitor, &entry.value),
                    )
                })
                .collect();
            visitor.serialize_map_annotation_value(&entries)
        }
        AnnotationValue::Reference(target) => visitor.serialize_reference_annotation_value(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Document, DocumentBuilder};
    use crate::model::MarkupSpec;
    use crate::traversal::recorder::{EventRecorder, TraversalEvent};

    fn simple_document() -> Document {
        let mut builder = DocumentBuilder::new();
        let p = builder.open_markup(MarkupSpec::new("p"));
        builder.add_text("hi");
        builder.close_markup(p).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_invalid_view_rejected_before_traversal() {
        let document = simple_document();
        let view = TagView::new();
        let result = Traverser::new(&document, &view);
        assert!(matches!(result, Err(TagxError::InvalidView)));
    }

    #[test]
    fn test_phase_starts_idle() {
        let document = simple_document();
        let view = TagView::show_all();
        let traverser = Traverser::new(&document, &view).unwrap();
        assert_eq!(traverser.phase(), TraversalPhase::Idle);
        assert!(traverser.relevant_layers().contains(DEFAULT_LAYER));
    }

    #[test]
    fn test_phase_done_after_accept_and_reuse_rejected() {
        let document = simple_document();
        let view = TagView::show_all();
        let mut traverser = Traverser::new(&document, &view).unwrap();
        let mut recorder = EventRecorder::new();

        traverser.accept(&mut recorder).unwrap();
        assert_eq!(traverser.phase(), TraversalPhase::Done);

        let err = traverser.accept(&mut recorder).unwrap_err();
        assert!(matches!(err, TagxError::TraverserReused { .. }));
        assert_eq!(recorder.events().len(), 5);
    }

    #[test]
    fn test_simple_event_order() {
        let document = simple_document();
        let mut recorder = EventRecorder::new();
        traverse(&document, &TagView::show_all(), &mut recorder).unwrap();

        let events = recorder.events();
        assert_eq!(events.first(), Some(&TraversalEvent::EnterDocument));
        assert_eq!(events.last(), Some(&TraversalEvent::ExitDocument));
        assert_eq!(events.len(), 5);
        assert!(recorder.is_balanced());
    }

    #[test]
    fn test_dangling_markup_aborts() {
        let mut document = simple_document();
        document.markups.clear();
        let mut recorder = EventRecorder::new();
        let err = traverse(&document, &TagView::show_all(), &mut recorder).unwrap_err();
        assert!(matches!(err, TagxError::DanglingMarkup { .. }));
    }

    #[test]
    fn test_missing_branch_detected() {
        let mut builder = DocumentBuilder::new();
        builder.open_variation();
        builder.add_text("a");
        builder.next_branch().unwrap();
        builder.add_text("b");
        builder.close_variation().unwrap();
        builder.add_text("c");
        let mut document = builder.build().unwrap();
        // the second branch start vanishes from document order
        document.order.remove(1);

        let view = TagView::show_all();
        let mut traverser = Traverser::new(&document, &view).unwrap();
        let mut recorder = EventRecorder::new();
        let err = traverser.accept(&mut recorder).unwrap_err();
        assert!(matches!(err, TagxError::TraversalBroken { .. }));
        assert_eq!(traverser.phase(), TraversalPhase::InVariationBranch(1));
    }

    #[test]
    fn test_suspension_in_first_branch_undone_for_second() {
        let mut builder = DocumentBuilder::new();
        let s = builder.open_markup(MarkupSpec::new("s"));
        builder.add_text("a");
        builder.suspend_markup(s).unwrap();
        builder.open_variation();
        builder.add_text("b");
        builder.resume_markup(s).unwrap();
        builder.add_text("c");
        builder.suspend_markup(s).unwrap();
        builder.next_branch().unwrap();
        builder.add_text("d");
        builder.close_variation().unwrap();
        builder.resume_markup(s).unwrap();
        builder.add_text("e");
        builder.close_markup(s).unwrap();
        let document = builder.build().unwrap();

        let mut recorder = EventRecorder::new();
        traverse(&document, &TagView::show_all(), &mut recorder).unwrap();

        assert!(recorder.is_balanced());
        assert_eq!(
            recorder.tag_trace(),
            vec!["+s", "-s", "+s", "-s", "+s", "-s"]
        );
        let modes: Vec<_> = recorder
            .events()
            .iter()
            .filter_map(|event| match event {
                TraversalEvent::OpenTag { mode, .. } => Some(format!("open:{:?}", mode)),
                TraversalEvent::CloseTag { mode, .. } => Some(format!("close:{:?}", mode)),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![
                "open:Start",
                "close:Suspend",
                "open:Resume",
                "close:Suspend",
                "open:Resume",
                "close:End"
            ]
        );
    }
}
