//! Undo/redo stacks and their transitions

use crate::record::OperationRecord;

/// The two ordered stacks of operation records, most recent last.
///
/// History only changes through four transitions: [`History::record`],
/// [`History::pop_undo`]/[`History::push_redo`] for an undo and
/// [`History::pop_redo`]/[`History::push_undo`] for a redo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    undo_stack: Vec<OperationRecord>,
    redo_stack: Vec<OperationRecord>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from already ordered stacks
    pub fn from_stacks(undo_stack: Vec<OperationRecord>, redo_stack: Vec<OperationRecord>) -> Self {
        History {
            undo_stack,
            redo_stack,
        }
    }

    /// Record a new forward action.
    ///
    /// Invalidates everything that was undone before it.
    pub fn record(&mut self, record: OperationRecord) {
        self.undo_stack.push(record);
        self.redo_stack.clear();
    }

    /// Take the most recent applied record
    pub fn pop_undo(&mut self) -> Option<OperationRecord> {
        self.undo_stack.pop()
    }

    /// Take the most recent undone record
    pub fn pop_redo(&mut self) -> Option<OperationRecord> {
        self.redo_stack.pop()
    }

    /// Put a record on top of the undo stack without touching the redo stack
    pub fn push_undo(&mut self, record: OperationRecord) {
        self.undo_stack.push(record);
    }

    /// Put a record on top of the redo stack
    pub fn push_redo(&mut self, record: OperationRecord) {
        self.redo_stack.push(record);
    }

    /// Most recent applied record
    pub fn peek_undo(&self) -> Option<&OperationRecord> {
        self.undo_stack.last()
    }

    /// Most recent undone record
    pub fn peek_redo(&self) -> Option<&OperationRecord> {
        self.redo_stack.last()
    }

    /// Applied records, oldest first
    pub fn undo_stack(&self) -> &[OperationRecord] {
        &self.undo_stack
    }

    /// Undone records, oldest first
    pub fn redo_stack(&self) -> &[OperationRecord] {
        &self.redo_stack
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undoable records
    pub fn undoable_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redoable records
    pub fn redoable_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// True when both stacks are empty
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty() && self.redo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_record() {
        let mut history = History::new();
        history.record(OperationRecord::rename("a", "b"));
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undoable_count(), 1);
    }

    #[test]
    fn test_history_record_clears_redo() {
        let mut history = History::new();
        history.record(OperationRecord::rename("a", "b"));
        let record = history.pop_undo().unwrap();
        history.push_redo(record);
        assert!(history.can_redo());

        history.record(OperationRecord::create_batch(["10_"]));
        assert!(!history.can_redo());
        assert_eq!(history.undoable_count(), 1);
    }

    #[test]
    fn test_history_stack_order() {
        let mut history = History::new();
        history.record(OperationRecord::rename("a", "b"));
        history.record(OperationRecord::rename("c", "d"));

        assert_eq!(history.peek_undo(), Some(&OperationRecord::rename("c", "d")));
        assert_eq!(history.pop_undo(), Some(OperationRecord::rename("c", "d")));
        assert_eq!(history.pop_undo(), Some(OperationRecord::rename("a", "b")));
        assert_eq!(history.pop_undo(), None);
    }

    #[test]
    fn test_history_push_undo_keeps_redo() {
        let mut history = History::from_stacks(vec![], vec![OperationRecord::rename("a", "b")]);
        history.push_undo(OperationRecord::rename("c", "d"));
        assert_eq!(history.redoable_count(), 1);
        assert_eq!(history.undoable_count(), 1);
    }

    #[test]
    fn test_history_is_empty() {
        let mut history = History::new();
        assert!(history.is_empty());
        history.push_redo(OperationRecord::delete_batch(["a"]));
        assert!(!history.is_empty());
    }
}
