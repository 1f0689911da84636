//! Integration tests for the change-history engine through the public
//! matrix API: checkpoint boundaries, the undo/redo inverse law, and the
//! empty-stack no-ops.

use dsm_core::matrix::{Matrix, MatrixVariant};
use dsm_core::types::{Connection, Grouping, Item};

/// Observable matrix state, captured through the public API only.
#[derive(Debug, PartialEq)]
struct Snapshot {
    rows: Vec<Item>,
    cols: Vec<Item>,
    connections: Vec<Connection>,
    groupings: Vec<Grouping>,
    title: String,
    project_name: String,
    customer: String,
    version_number: String,
}

fn snapshot(m: &Matrix) -> Snapshot {
    Snapshot {
        rows: m.rows().to_vec(),
        cols: m.cols().to_vec(),
        connections: m.connections().cloned().collect(),
        groupings: m.groupings().to_vec(),
        title: m.title().to_string(),
        project_name: m.project_name().to_string(),
        customer: m.customer().to_string(),
        version_number: m.version_number().to_string(),
    }
}

// ========== Inverse law ==========

#[test]
fn test_undo_then_redo_restores_observable_state() {
    let mut m = Matrix::new(MatrixVariant::Symmetric);
    let (a_row, _) = m.create_item_pair("a").unwrap();
    let (_, b_col) = m.create_item_pair("b").unwrap();
    m.set_current_state_as_checkpoint();

    m.modify_connection(a_row, b_col, "data", 2.0, Default::default());
    m.set_item_name(a_row, "alpha").unwrap();
    m.set_title("linked");
    m.set_current_state_as_checkpoint();

    let before = snapshot(&m);
    m.undo_to_checkpoint();
    assert_ne!(snapshot(&m), before, "undo must change observable state");
    m.redo_to_checkpoint();
    assert_eq!(snapshot(&m), before, "redo must restore the pre-undo state");
}

#[test]
fn test_repeated_undo_redo_round_trips() {
    let mut m = Matrix::new(MatrixVariant::Asymmetric);
    let r = m.create_item("task", true).unwrap();
    m.set_current_state_as_checkpoint();
    let c = m.create_item("resource", false).unwrap();
    m.set_current_state_as_checkpoint();
    m.modify_connection(r, c, "uses", 1.0, Default::default());
    m.set_current_state_as_checkpoint();

    let full = snapshot(&m);
    m.undo_to_checkpoint();
    m.undo_to_checkpoint();
    m.undo_to_checkpoint();
    assert!(m.rows().is_empty() && m.cols().is_empty());

    m.redo_to_checkpoint();
    m.redo_to_checkpoint();
    m.redo_to_checkpoint();
    assert_eq!(snapshot(&m), full);
}

// ========== Checkpoint grouping ==========

#[test]
fn test_multi_change_operation_undoes_as_a_unit() {
    let mut m = Matrix::new(MatrixVariant::Asymmetric);
    let r = m.create_item("r", true).unwrap();
    m.set_current_state_as_checkpoint();

    // One user-visible operation made of three low-level changes.
    let c1 = m.create_item("c1", false).unwrap();
    let c2 = m.create_item("c2", false).unwrap();
    m.modify_connection(r, c1, "x", 1.0, Default::default());
    m.set_current_state_as_checkpoint();

    m.undo_to_checkpoint();
    assert!(m.rows().iter().any(|i| i.uid == r), "prior operation untouched");
    assert!(m.cols().is_empty(), "whole operation undone");
    assert_eq!(m.connection_count(), 0);

    m.redo_to_checkpoint();
    assert!(m.cols().iter().any(|i| i.uid == c1));
    assert!(m.cols().iter().any(|i| i.uid == c2));
    assert_eq!(m.connection_count(), 1);
}

#[test]
fn test_undo_at_checkpointed_top_is_not_a_noop() {
    let mut m = Matrix::new(MatrixVariant::Asymmetric);
    m.create_item("only", true).unwrap();
    m.set_current_state_as_checkpoint();
    // The top of the undo stack is itself the checkpoint; undo must still
    // take the operation back.
    m.undo_to_checkpoint();
    assert!(m.rows().is_empty());
}

// ========== Empty-stack and redo-invalidation behavior ==========

#[test]
fn test_undo_redo_on_empty_stacks_are_noops() {
    let mut m = Matrix::new(MatrixVariant::Symmetric);
    m.undo_to_checkpoint();
    m.redo_to_checkpoint();
    assert!(!m.can_undo());
    assert!(!m.can_redo());
    assert!(m.rows().is_empty());
}

#[test]
fn test_new_checkpointed_edit_after_undo_clears_redo() {
    let mut m = Matrix::new(MatrixVariant::Asymmetric);
    m.create_item("a", true).unwrap();
    m.set_current_state_as_checkpoint();
    m.undo_to_checkpoint();
    assert!(m.can_redo());

    m.create_item("b", true).unwrap();
    m.set_current_state_as_checkpoint();
    assert!(!m.can_redo(), "a committed edit invalidates redo history");
}

// ========== Cascade ordering ==========

#[test]
fn test_delete_cascade_and_item_removal_undo_together() {
    let mut m = Matrix::new(MatrixVariant::Asymmetric);
    let r = m.create_item("r", true).unwrap();
    let c = m.create_item("c", false).unwrap();
    m.modify_connection(r, c, "uses", 5.0, Default::default());
    m.set_current_state_as_checkpoint();

    m.delete_item(r).unwrap();
    m.set_current_state_as_checkpoint();
    assert!(m.get_connection(r, c).is_none());
    assert!(m.get_item(r).is_err());

    // The cascade was recorded as separate changes before the removal;
    // one undo pops them all back to the checkpoint.
    m.undo_to_checkpoint();
    assert!(m.get_item(r).is_ok());
    let conn = m.get_connection(r, c).expect("connection restored");
    assert_eq!(conn.weight, 5.0);
}

// ========== Dirty flag ==========

#[test]
fn test_dirty_tracks_save_workflow() {
    let mut m = Matrix::new(MatrixVariant::Symmetric);
    assert!(!m.is_modified());
    m.create_item_pair("a").unwrap();
    assert!(m.is_modified());
    m.clear_modified_flag();
    m.undo_to_checkpoint();
    assert!(m.is_modified(), "undo changes saved state");
}
