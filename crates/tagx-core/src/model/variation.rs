use serde::{Deserialize, Serialize};
use tagx_core_types::TextNodeId;

/// A point where the text diverges into parallel branches
///
/// Branches are listed in document order by their first text node. The
/// convergence node is the first node after the last branch, absent when the
/// variation runs to the end of its enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextVariation {
    pub branch_starts: Vec<TextNodeId>,
    pub convergence: Option<TextNodeId>,
}

impl TextVariation {
    /// First text node of the first branch
    pub fn first_branch_start(&self) -> Option<TextNodeId> {
        self.branch_starts.first().copied()
    }

    pub fn branch_count(&self) -> usize {
        self.branch_starts.len()
    }
}
