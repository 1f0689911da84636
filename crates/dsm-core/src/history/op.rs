//! Reversible matrix operations stored in the change history.
//!
//! Every structural mutation of a matrix is expressed as a [`ChangeOp`]:
//! a tagged variant carrying value snapshots (old and new field values,
//! removed items, removed connections) rather than live references, so an
//! op can be applied and inverted long after it was recorded. `apply`
//! executes the op against raw state; `inverted` produces the op that
//! exactly undoes it.

use uuid::Uuid;

use crate::matrix::state::{MatrixState, MetadataField};
use crate::types::{Color, Connection, Grouping, Item};

/// One reversible mutation of matrix state.
///
/// Ops come in inverse pairs (`InsertItem`/`RemoveItem`, ...) or are
/// self-describing value swaps (`Set*` with `old`/`new` snapshots).
/// `SwapRowsCols` is its own inverse.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    /// Insert a single item into one role at a fixed position.
    InsertItem { item: Item, as_row: bool, index: usize },
    /// Remove a single item from one role; `index` restores ordering on undo.
    RemoveItem { item: Item, as_row: bool, index: usize },
    /// Insert a mutually aliased row/column pair as one change, so that
    /// undoing a paired creation removes both sides.
    InsertPair {
        row: Item,
        col: Item,
        row_index: usize,
        col_index: usize,
    },
    /// Remove a mutually aliased row/column pair as one change.
    RemovePair {
        row: Item,
        col: Item,
        row_index: usize,
        col_index: usize,
    },
    /// Rename an item and, when `alias_uid` is set, its aliased counterpart.
    SetItemName {
        uid: Uuid,
        alias_uid: Option<Uuid>,
        old: String,
        new: String,
    },
    /// Re-sort an item (and alias) to a new sort index.
    SetItemSortIndex {
        uid: Uuid,
        alias_uid: Option<Uuid>,
        old: f64,
        new: f64,
    },
    /// Reclassify an item (and alias) into another grouping.
    SetItemGroup {
        uid: Uuid,
        alias_uid: Option<Uuid>,
        old: Uuid,
        new: Uuid,
    },
    /// Upsert or delete the connection at `(row_uid, col_uid)`.
    ///
    /// `old`/`new` of `None` encode absence, which makes one variant cover
    /// creation (`None` → `Some`), modification (`Some` → `Some`) and
    /// deletion (`Some` → `None`).
    SetConnection {
        row_uid: Uuid,
        col_uid: Uuid,
        old: Option<Connection>,
        new: Option<Connection>,
    },
    /// Swap the row and column collections wholesale. Self-inverse; the
    /// final step of a matrix transposition.
    SwapRowsCols,
    /// Replace one metadata string.
    SetMetadata {
        field: MetadataField,
        old: String,
        new: String,
    },
    /// Add a grouping to the addressed table (`None` = matrix-level).
    AddGrouping {
        domain: Option<Uuid>,
        grouping: Grouping,
    },
    /// Drop a grouping nothing references; inverse of [`Self::AddGrouping`].
    DropGrouping {
        domain: Option<Uuid>,
        grouping: Grouping,
    },
    /// Remove a grouping and empty its members into `fallback`.
    ///
    /// `members` lists the uids of every item that referenced the grouping
    /// at removal time, so the inverse can restore their classification.
    RemoveGrouping {
        domain: Option<Uuid>,
        grouping: Grouping,
        members: Vec<Uuid>,
        fallback: Uuid,
    },
    /// Re-add a removed grouping and reclassify its members back into it.
    RestoreGrouping {
        domain: Option<Uuid>,
        grouping: Grouping,
        members: Vec<Uuid>,
        fallback: Uuid,
    },
    /// Rename a grouping in the addressed table.
    RenameGrouping {
        domain: Option<Uuid>,
        uid: Uuid,
        old: String,
        new: String,
    },
    /// Recolor a grouping's cell fill.
    SetGroupingColor {
        domain: Option<Uuid>,
        uid: Uuid,
        old: Color,
        new: Color,
    },
    /// Recolor a grouping's cell text.
    SetGroupingFontColor {
        domain: Option<Uuid>,
        uid: Uuid,
        old: Color,
        new: Color,
    },
    /// Register a domain together with its grouping table.
    AddDomain {
        domain: Grouping,
        groupings: Vec<Grouping>,
    },
    /// Unregister an empty domain and its grouping table.
    RemoveDomain {
        domain: Grouping,
        groupings: Vec<Grouping>,
    },
}

impl ChangeOp {
    /// Execute this op against raw matrix state.
    pub(crate) fn apply(&self, state: &mut MatrixState) {
        match self {
            ChangeOp::InsertItem { item, as_row, index } => {
                let items = if *as_row { &mut state.rows } else { &mut state.cols };
                let at = (*index).min(items.len());
                items.insert(at, item.clone());
            }
            ChangeOp::RemoveItem { item, as_row, .. } => {
                let items = if *as_row { &mut state.rows } else { &mut state.cols };
                items.retain(|i| i.uid != item.uid);
            }
            ChangeOp::InsertPair {
                row,
                col,
                row_index,
                col_index,
            } => {
                let at = (*row_index).min(state.rows.len());
                state.rows.insert(at, row.clone());
                let at = (*col_index).min(state.cols.len());
                state.cols.insert(at, col.clone());
            }
            ChangeOp::RemovePair { row, col, .. } => {
                state.rows.retain(|i| i.uid != row.uid);
                state.cols.retain(|i| i.uid != col.uid);
            }
            ChangeOp::SetItemName {
                uid,
                alias_uid,
                old,
                new,
            } => {
                Self::set_item_field(state, *uid, *alias_uid, |item| {
                    debug_assert_eq!(&item.name, old, "aliased pair diverged before rename");
                    item.name = new.clone();
                });
            }
            ChangeOp::SetItemSortIndex {
                uid,
                alias_uid,
                old,
                new,
            } => {
                Self::set_item_field(state, *uid, *alias_uid, |item| {
                    debug_assert_eq!(item.sort_index, *old, "aliased pair diverged before re-sort");
                    item.sort_index = *new;
                });
            }
            ChangeOp::SetItemGroup {
                uid,
                alias_uid,
                old,
                new,
            } => {
                Self::set_item_field(state, *uid, *alias_uid, |item| {
                    debug_assert_eq!(item.group, *old, "aliased pair diverged before regroup");
                    item.group = *new;
                });
            }
            ChangeOp::SetConnection {
                row_uid,
                col_uid,
                new,
                ..
            } => {
                let key = (*row_uid, *col_uid);
                match new {
                    Some(conn) => {
                        state.connections.insert(key, conn.clone());
                    }
                    None => {
                        state.connections.remove(&key);
                    }
                }
            }
            ChangeOp::SwapRowsCols => {
                std::mem::swap(&mut state.rows, &mut state.cols);
            }
            ChangeOp::SetMetadata { field, new, .. } => {
                let slot = match field {
                    MetadataField::Title => &mut state.metadata.title,
                    MetadataField::ProjectName => &mut state.metadata.project_name,
                    MetadataField::Customer => &mut state.metadata.customer,
                    MetadataField::VersionNumber => &mut state.metadata.version_number,
                };
                *slot = new.clone();
            }
            ChangeOp::AddGrouping { domain, grouping } => {
                if let Some(table) = state.grouping_table_mut(*domain) {
                    table.push(grouping.clone());
                }
            }
            ChangeOp::DropGrouping { domain, grouping } => {
                if let Some(table) = state.grouping_table_mut(*domain) {
                    table.retain(|g| g.uid != grouping.uid);
                }
            }
            ChangeOp::RemoveGrouping {
                domain,
                grouping,
                members,
                fallback,
            } => {
                for uid in members {
                    if let Some(item) = state.item_mut(*uid) {
                        item.group = *fallback;
                    }
                }
                if let Some(table) = state.grouping_table_mut(*domain) {
                    table.retain(|g| g.uid != grouping.uid);
                }
            }
            ChangeOp::RestoreGrouping {
                domain,
                grouping,
                members,
                ..
            } => {
                if let Some(table) = state.grouping_table_mut(*domain) {
                    table.push(grouping.clone());
                }
                for uid in members {
                    if let Some(item) = state.item_mut(*uid) {
                        item.group = grouping.uid;
                    }
                }
            }
            ChangeOp::RenameGrouping { domain, uid, new, .. } => {
                if let Some(table) = state.grouping_table_mut(*domain) {
                    if let Some(g) = table.iter_mut().find(|g| g.uid == *uid) {
                        g.name = new.clone();
                    }
                }
            }
            ChangeOp::SetGroupingColor { domain, uid, new, .. } => {
                if let Some(table) = state.grouping_table_mut(*domain) {
                    if let Some(g) = table.iter_mut().find(|g| g.uid == *uid) {
                        g.color = *new;
                    }
                }
            }
            ChangeOp::SetGroupingFontColor { domain, uid, new, .. } => {
                if let Some(table) = state.grouping_table_mut(*domain) {
                    if let Some(g) = table.iter_mut().find(|g| g.uid == *uid) {
                        g.font_color = *new;
                    }
                }
            }
            ChangeOp::AddDomain { domain, groupings } => {
                state.domains.push(domain.clone());
                state.domain_groupings.insert(domain.uid, groupings.clone());
            }
            ChangeOp::RemoveDomain { domain, .. } => {
                state.domains.retain(|d| d.uid != domain.uid);
                state.domain_groupings.remove(&domain.uid);
            }
        }
    }

    /// The op that exactly undoes this one.
    pub(crate) fn inverted(&self) -> ChangeOp {
        match self.clone() {
            ChangeOp::InsertItem { item, as_row, index } => {
                ChangeOp::RemoveItem { item, as_row, index }
            }
            ChangeOp::RemoveItem { item, as_row, index } => {
                ChangeOp::InsertItem { item, as_row, index }
            }
            ChangeOp::InsertPair {
                row,
                col,
                row_index,
                col_index,
            } => ChangeOp::RemovePair {
                row,
                col,
                row_index,
                col_index,
            },
            ChangeOp::RemovePair {
                row,
                col,
                row_index,
                col_index,
            } => ChangeOp::InsertPair {
                row,
                col,
                row_index,
                col_index,
            },
            ChangeOp::SetItemName {
                uid,
                alias_uid,
                old,
                new,
            } => ChangeOp::SetItemName {
                uid,
                alias_uid,
                old: new,
                new: old,
            },
            ChangeOp::SetItemSortIndex {
                uid,
                alias_uid,
                old,
                new,
            } => ChangeOp::SetItemSortIndex {
                uid,
                alias_uid,
                old: new,
                new: old,
            },
            ChangeOp::SetItemGroup {
                uid,
                alias_uid,
                old,
                new,
            } => ChangeOp::SetItemGroup {
                uid,
                alias_uid,
                old: new,
                new: old,
            },
            ChangeOp::SetConnection {
                row_uid,
                col_uid,
                old,
                new,
            } => ChangeOp::SetConnection {
                row_uid,
                col_uid,
                old: new,
                new: old,
            },
            ChangeOp::SwapRowsCols => ChangeOp::SwapRowsCols,
            ChangeOp::SetMetadata { field, old, new } => ChangeOp::SetMetadata {
                field,
                old: new,
                new: old,
            },
            ChangeOp::AddGrouping { domain, grouping } => {
                ChangeOp::DropGrouping { domain, grouping }
            }
            ChangeOp::DropGrouping { domain, grouping } => {
                ChangeOp::AddGrouping { domain, grouping }
            }
            ChangeOp::RemoveGrouping {
                domain,
                grouping,
                members,
                fallback,
            } => ChangeOp::RestoreGrouping {
                domain,
                grouping,
                members,
                fallback,
            },
            ChangeOp::RestoreGrouping {
                domain,
                grouping,
                members,
                fallback,
            } => ChangeOp::RemoveGrouping {
                domain,
                grouping,
                members,
                fallback,
            },
            ChangeOp::RenameGrouping { domain, uid, old, new } => ChangeOp::RenameGrouping {
                domain,
                uid,
                old: new,
                new: old,
            },
            ChangeOp::SetGroupingColor { domain, uid, old, new } => ChangeOp::SetGroupingColor {
                domain,
                uid,
                old: new,
                new: old,
            },
            ChangeOp::SetGroupingFontColor { domain, uid, old, new } => {
                ChangeOp::SetGroupingFontColor {
                    domain,
                    uid,
                    old: new,
                    new: old,
                }
            }
            ChangeOp::AddDomain { domain, groupings } => {
                ChangeOp::RemoveDomain { domain, groupings }
            }
            ChangeOp::RemoveDomain { domain, groupings } => {
                ChangeOp::AddDomain { domain, groupings }
            }
        }
    }

    /// Apply a field mutation to an item and its aliased counterpart.
    ///
    /// Touching both sides inside one op is what makes aliased-pair
    /// divergence structurally impossible rather than convention-checked.
    fn set_item_field<F>(state: &mut MatrixState, uid: Uuid, alias_uid: Option<Uuid>, mutate: F)
    where
        F: Fn(&mut Item),
    {
        if let Some(item) = state.item_mut(uid) {
            mutate(item);
        }
        if let Some(alias) = alias_uid {
            if let Some(item) = state.item_mut(alias) {
                mutate(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn state_with_pair() -> (MatrixState, Uuid, Uuid) {
        let mut state = MatrixState::new();
        let (row, col) = Item::new_pair("a", 1.0, state.default_grouping);
        let (r, c) = (row.uid, col.uid);
        state.rows.push(row);
        state.cols.push(col);
        (state, r, c)
    }

    #[test]
    fn test_insert_item_then_inverse_restores_state() {
        let mut state = MatrixState::new();
        let item = Item::new("a", 1.0, state.default_grouping);
        let op = ChangeOp::InsertItem {
            item,
            as_row: true,
            index: 0,
        };
        op.apply(&mut state);
        assert_eq!(state.rows.len(), 1);
        op.inverted().apply(&mut state);
        assert!(state.rows.is_empty());
    }

    #[test]
    fn test_set_item_name_touches_both_sides_of_pair() {
        let (mut state, r, c) = state_with_pair();
        let op = ChangeOp::SetItemName {
            uid: r,
            alias_uid: Some(c),
            old: "a".into(),
            new: "b".into(),
        };
        op.apply(&mut state);
        assert_eq!(state.item(r).unwrap().name, "b");
        assert_eq!(state.item(c).unwrap().name, "b");
        op.inverted().apply(&mut state);
        assert_eq!(state.item(r).unwrap().name, "a");
        assert_eq!(state.item(c).unwrap().name, "a");
    }

    #[test]
    fn test_set_connection_upsert_and_delete() {
        let (mut state, r, c) = state_with_pair();
        let conn = Connection::new(r, c, "data", 2.0, BTreeSet::new());
        let create = ChangeOp::SetConnection {
            row_uid: r,
            col_uid: c,
            old: None,
            new: Some(conn.clone()),
        };
        create.apply(&mut state);
        assert_eq!(state.connections.len(), 1);
        create.inverted().apply(&mut state);
        assert!(state.connections.is_empty());
    }

    #[test]
    fn test_remove_grouping_empties_members_into_fallback() {
        let mut state = MatrixState::new();
        let fallback = state.default_grouping;
        let extra = Grouping::new("engine", Color::WHITE, Color::BLACK, 1);
        let extra_uid = extra.uid;
        state.groupings.push(extra.clone());
        let item = Item::new("a", 1.0, extra_uid);
        let item_uid = item.uid;
        state.rows.push(item);

        let op = ChangeOp::RemoveGrouping {
            domain: None,
            grouping: extra,
            members: vec![item_uid],
            fallback,
        };
        op.apply(&mut state);
        assert_eq!(state.item(item_uid).unwrap().group, fallback);
        assert_eq!(state.groupings.len(), 1);

        op.inverted().apply(&mut state);
        assert_eq!(state.item(item_uid).unwrap().group, extra_uid);
        assert_eq!(state.groupings.len(), 2);
    }

    #[test]
    fn test_swap_rows_cols_is_self_inverse() {
        let (mut state, r, c) = state_with_pair();
        let op = ChangeOp::SwapRowsCols;
        op.apply(&mut state);
        assert!(state.is_row(c) && state.is_col(r));
        op.inverted().apply(&mut state);
        assert!(state.is_row(r) && state.is_col(c));
    }
}
