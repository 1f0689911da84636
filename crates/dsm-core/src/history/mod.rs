//! Change-history engine: undo/redo stacks over reversible ops.
//!
//! Every structural mutation of a matrix is recorded here before it takes
//! effect; nothing bypasses the stack. Checkpoints group low-level changes
//! into user-visible operations: collaborators call
//! [`ChangeLog::set_current_state_as_checkpoint`] once a user operation is
//! complete, flagging the change on top of the undo stack.
//!
//! # Undo/redo semantics
//!
//! - `undo_to_checkpoint` always undoes the top change (even when it is
//!   itself a checkpoint — otherwise undo at a checkpoint boundary would be
//!   a no-op), then keeps undoing until the next change on the stack is a
//!   checkpointed one, i.e. the boundary of the previous operation.
//! - `redo_to_checkpoint` replays in the opposite order and stops right
//!   after re-applying a checkpointed change.
//! - Undo/redo against an empty stack is a silent no-op, not an error.
//!
//! An undo followed by a redo restores the matrix observationally
//! unchanged; the integration suite pins that law down.
//!
//! The history is unbounded. Eviction would have to drop whole
//! checkpoint-delimited groups to keep the pairing sound, and matrices are
//! session-scoped, so the added complexity buys nothing here.

mod op;

pub use op::ChangeOp;

use tracing::debug;

use crate::matrix::state::MatrixState;

/// One recorded mutation: the reversible op plus the checkpoint marker.
///
/// Immutable once recorded, except for the checkpoint flag which
/// `set_current_state_as_checkpoint` raises on the stack top.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    op: ChangeOp,
    checkpoint: bool,
}

impl Change {
    fn new(op: ChangeOp) -> Self {
        Self {
            op,
            checkpoint: false,
        }
    }

    /// Whether this change starts an undo/redo stopping boundary.
    pub fn is_checkpoint(&self) -> bool {
        self.checkpoint
    }

    /// The recorded op.
    pub fn op(&self) -> &ChangeOp {
        &self.op
    }
}

/// Undo/redo stacks plus the dirty flag for the save workflow.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    undo: Vec<Change>,
    redo: Vec<Change>,
    dirty: bool,
}

impl ChangeLog {
    /// Fresh, empty history with a clean dirty flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `op` against `state` and push it onto the undo stack.
    ///
    /// Does not touch the redo stack; only checkpointing clears it.
    /// Marks the matrix dirty.
    pub(crate) fn record(&mut self, state: &mut MatrixState, op: ChangeOp) {
        op.apply(state);
        self.undo.push(Change::new(op));
        self.dirty = true;
    }

    /// Undo back to the previous checkpoint boundary.
    ///
    /// No-op when the undo stack is empty.
    pub(crate) fn undo_to_checkpoint(&mut self, state: &mut MatrixState) {
        if self.undo.is_empty() {
            debug!("undo requested on empty stack, ignoring");
            return;
        }
        let mut first = true;
        while let Some(top) = self.undo.last() {
            if top.checkpoint && !first {
                break;
            }
            if let Some(change) = self.undo.pop() {
                change.op.inverted().apply(state);
                self.redo.push(change);
            }
            first = false;
        }
        self.dirty = true;
        debug!(undo_depth = self.undo.len(), redo_depth = self.redo.len(), "undo applied");
    }

    /// Redo forward to the next checkpoint boundary.
    ///
    /// No-op when the redo stack is empty.
    pub(crate) fn redo_to_checkpoint(&mut self, state: &mut MatrixState) {
        if self.redo.is_empty() {
            debug!("redo requested on empty stack, ignoring");
            return;
        }
        while let Some(change) = self.redo.pop() {
            change.op.apply(state);
            let boundary = change.checkpoint;
            self.undo.push(change);
            if boundary {
                break;
            }
        }
        self.dirty = true;
        debug!(undo_depth = self.undo.len(), redo_depth = self.redo.len(), "redo applied");
    }

    /// Flag the change on top of the undo stack as a checkpoint and clear
    /// the redo stack: a committed edit invalidates prior redo history.
    pub fn set_current_state_as_checkpoint(&mut self) {
        if let Some(top) = self.undo.last_mut() {
            top.checkpoint = true;
        }
        self.redo.clear();
    }

    /// Whether anything can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether anything can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of recorded changes awaiting undo.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of undone changes awaiting redo.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Whether the matrix has unsaved mutations.
    pub fn is_modified(&self) -> bool {
        self.dirty
    }

    /// Reset the dirty flag after a successful save.
    pub fn clear_modified_flag(&mut self) {
        self.dirty = false;
    }

    /// Force the dirty flag, e.g. after a failed save attempt.
    pub fn mark_modified(&mut self) {
        self.dirty = true;
    }

    /// Drop all recorded history, keeping the dirty flag untouched.
    ///
    /// Used after bulk operations whose step-by-step history is
    /// meaningless to a user, e.g. handing a clustering result back.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Item;

    fn insert_op(state: &MatrixState, name: &str) -> ChangeOp {
        ChangeOp::InsertItem {
            item: Item::new(name, 1.0, state.default_grouping),
            as_row: true,
            index: usize::MAX,
        }
    }

    #[test]
    fn test_record_applies_and_marks_dirty() {
        let mut state = MatrixState::new();
        let mut log = ChangeLog::new();
        assert!(!log.is_modified());
        let op = insert_op(&state, "a");
        log.record(&mut state, op);
        assert_eq!(state.rows.len(), 1);
        assert!(log.is_modified());
        assert_eq!(log.undo_depth(), 1);
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let mut state = MatrixState::new();
        let mut log = ChangeLog::new();
        log.undo_to_checkpoint(&mut state);
        log.redo_to_checkpoint(&mut state);
        assert!(!log.is_modified());
        assert!(state.rows.is_empty());
    }

    #[test]
    fn test_undo_stops_at_previous_checkpoint() {
        let mut state = MatrixState::new();
        let mut log = ChangeLog::new();
        // Operation 1: two changes, then checkpoint.
        let op = insert_op(&state, "a");
        log.record(&mut state, op);
        let op = insert_op(&state, "b");
        log.record(&mut state, op);
        log.set_current_state_as_checkpoint();
        // Operation 2: one change, then checkpoint.
        let op = insert_op(&state, "c");
        log.record(&mut state, op);
        log.set_current_state_as_checkpoint();

        log.undo_to_checkpoint(&mut state);
        // Only operation 2 is undone, even though its change is the
        // checkpointed stack top.
        assert_eq!(state.rows.len(), 2);
        assert_eq!(log.redo_depth(), 1);

        log.undo_to_checkpoint(&mut state);
        assert!(state.rows.is_empty());
    }

    #[test]
    fn test_redo_restores_whole_operation() {
        let mut state = MatrixState::new();
        let mut log = ChangeLog::new();
        let op = insert_op(&state, "a");
        log.record(&mut state, op);
        let op = insert_op(&state, "b");
        log.record(&mut state, op);
        log.set_current_state_as_checkpoint();

        log.undo_to_checkpoint(&mut state);
        assert!(state.rows.is_empty());
        log.redo_to_checkpoint(&mut state);
        assert_eq!(state.rows.len(), 2);
        assert_eq!(log.undo_depth(), 2);
        assert_eq!(log.redo_depth(), 0);
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut state = MatrixState::new();
        let mut log = ChangeLog::new();
        let op = insert_op(&state, "a");
        log.record(&mut state, op);
        log.set_current_state_as_checkpoint();
        log.undo_to_checkpoint(&mut state);
        assert!(log.can_redo());

        let op = insert_op(&state, "b");
        log.record(&mut state, op);
        log.set_current_state_as_checkpoint();
        assert!(!log.can_redo());
    }
}
