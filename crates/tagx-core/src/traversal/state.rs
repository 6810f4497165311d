use indexmap::IndexSet;
use tagx_core_types::MarkupId;

/// Markup open at the current point of a rendering
///
/// Insertion-ordered: the last opened markup is the first to close. Cloning
/// gives an independent snapshot, which is what a variation frame keeps to
/// restore at the start of each later branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExporterState {
    open: IndexSet<MarkupId>,
}

impl ExporterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Open ids missing from `relevant`, last opened first
    pub fn to_close(&self, relevant: &[MarkupId]) -> Vec<MarkupId> {
        self.open
            .iter()
            .rev()
            .filter(|id| !relevant.contains(id))
            .copied()
            .collect()
    }

    /// Relevant ids not open yet, in relevance order
    pub fn to_open(&self, relevant: &[MarkupId]) -> Vec<MarkupId> {
        relevant
            .iter()
            .filter(|id| !self.open.contains(*id))
            .copied()
            .collect()
    }

    /// Ids open here but not in `snapshot`, last opened first
    pub fn opened_since(&self, snapshot: &ExporterState) -> Vec<MarkupId> {
        self.open
            .iter()
            .rev()
            .filter(|id| !snapshot.open.contains(*id))
            .copied()
            .collect()
    }

    /// Every open id, last opened first
    pub fn closing_order(&self) -> Vec<MarkupId> {
        self.open.iter().rev().copied().collect()
    }

    pub(crate) fn open(&mut self, id: MarkupId) {
        self.open.insert(id);
    }

    pub(crate) fn close(&mut self, id: MarkupId) {
        self.open.shift_remove(&id);
    }
}
