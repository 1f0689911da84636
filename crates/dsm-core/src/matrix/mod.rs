//! The matrix: row/column items, connections, groupings, and the public
//! mutation surface.
//!
//! One concrete [`Matrix`] type covers all three variants (symmetric,
//! asymmetric, multi-domain); the [`MatrixVariant`] tag dispatches the few
//! behaviors that differ. All mutation goes through the change-history
//! engine — every public modifier records one or more reversible ops, which
//! is what makes undo/redo, the dirty flag, and the aliased-pair invariant
//! hold across every path.
//!
//! # Module map
//!
//! - `state`: raw owned storage, crate-internal
//! - `variant`: the variant tag
//! - `symmetric` / `asymmetric` / `multi_domain`: variant-specific surface
//! - `grid`: read-only 2-D projection for rendering collaborators

pub(crate) mod state;

mod asymmetric;
mod grid;
mod multi_domain;
mod symmetric;
mod variant;

pub use grid::{CellKind, GridCell};
pub use state::{Metadata, MetadataField};
pub use variant::MatrixVariant;

use std::collections::BTreeSet;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DsmError, DsmResult};
use crate::history::{ChangeLog, ChangeOp};
use crate::types::{Color, Connection, Grouping, Item};

use state::MatrixState;

/// A design structure matrix with change-tracked mutation.
///
/// Created empty via [`Matrix::new`] or by deep copy via
/// [`Matrix::create_copy`]. The matrix exclusively owns its items,
/// connections, and groupings; collaborators read through the lookup and
/// projection API and mutate only through the public modifiers.
///
/// Single-writer: nothing in here synchronizes. Callers serialize access
/// per matrix instance.
///
/// # Example
///
/// ```
/// use dsm_core::matrix::{Matrix, MatrixVariant};
///
/// let mut m = Matrix::new(MatrixVariant::Symmetric);
/// let (a_row, _a_col) = m.create_item_pair("engine").unwrap();
/// let (_b_row, b_col) = m.create_item_pair("gearbox").unwrap();
/// m.modify_connection(a_row, b_col, "torque", 3.0, Default::default());
/// m.set_current_state_as_checkpoint();
/// assert_eq!(m.connection_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix {
    variant: MatrixVariant,
    state: MatrixState,
    log: ChangeLog,
}

impl Matrix {
    /// Create an empty matrix of the given variant.
    ///
    /// Symmetric and asymmetric matrices start with the sentinel default
    /// grouping; multi-domain matrices additionally start with one initial
    /// domain (a matrix must always keep at least one).
    pub fn new(variant: MatrixVariant) -> Self {
        let mut state = MatrixState::new();
        if variant == MatrixVariant::MultiDomain {
            let domain = Grouping::sentinel_default();
            state
                .domain_groupings
                .insert(domain.uid, vec![Grouping::sentinel_default()]);
            state.domains.push(domain);
        }
        Self {
            variant,
            state,
            log: ChangeLog::new(),
        }
    }

    /// Which variant this matrix is.
    pub fn variant(&self) -> MatrixVariant {
        self.variant
    }

    /// Deep copy: all value objects are freshly allocated, nothing is
    /// shared with the original, and the copy starts with empty history
    /// and a clean dirty flag.
    pub fn create_copy(&self) -> Matrix {
        Matrix {
            variant: self.variant,
            state: self.state.clone(),
            log: ChangeLog::new(),
        }
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Look up an item by uid in either role. Fails fast when absent.
    pub fn get_item(&self, uid: Uuid) -> DsmResult<&Item> {
        self.state.item(uid).ok_or(DsmError::ItemNotFound(uid))
    }

    /// Resolve an alias reference (an item's `alias_uid`) to the aliased
    /// item. Fails fast when the reference is dangling.
    pub fn get_item_by_alias(&self, alias_uid: Uuid) -> DsmResult<&Item> {
        self.state
            .item(alias_uid)
            .ok_or(DsmError::AliasNotFound(alias_uid))
    }

    /// The connection at `(row_uid, col_uid)`, if one exists.
    pub fn get_connection(&self, row_uid: Uuid, col_uid: Uuid) -> Option<&Connection> {
        self.state.connections.get(&(row_uid, col_uid))
    }

    /// Whether `uid` currently names a row item.
    pub fn is_row(&self, uid: Uuid) -> bool {
        self.state.is_row(uid)
    }

    /// Whether `uid` currently names a column item.
    pub fn is_col(&self, uid: Uuid) -> bool {
        self.state.is_col(uid)
    }

    /// Row items in storage order.
    pub fn rows(&self) -> &[Item] {
        &self.state.rows
    }

    /// Column items in storage order.
    pub fn cols(&self) -> &[Item] {
        &self.state.cols
    }

    /// All connections, in deterministic key order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.state.connections.values()
    }

    /// Number of connections.
    pub fn connection_count(&self) -> usize {
        self.state.connections.len()
    }

    /// The matrix-level grouping table (symmetric/asymmetric).
    pub fn groupings(&self) -> &[Grouping] {
        &self.state.groupings
    }

    /// Uid of the matrix-level sentinel default grouping.
    pub fn default_grouping(&self) -> Uuid {
        self.state.default_grouping
    }

    /// Look up a grouping by uid across the matrix-level table and every
    /// domain table.
    pub fn get_grouping(&self, uid: Uuid) -> DsmResult<&Grouping> {
        if let Some(g) = self.state.groupings.iter().find(|g| g.uid == uid) {
            return Ok(g);
        }
        for table in self.state.domain_groupings.values() {
            if let Some(g) = table.iter().find(|g| g.uid == uid) {
                return Ok(g);
            }
        }
        Err(DsmError::GroupingNotFound(uid))
    }

    // ------------------------------------------------------------------
    // Item mutation
    // ------------------------------------------------------------------

    /// Append an existing item to one role. One recorded change.
    pub fn add_item(&mut self, item: Item, as_row: bool) {
        let index = if as_row {
            self.state.rows.len()
        } else {
            self.state.cols.len()
        };
        self.log
            .record(&mut self.state, ChangeOp::InsertItem { item, as_row, index });
    }

    /// Delete an item, cascading deletion of every connection that
    /// references it.
    ///
    /// Connection deletions are recorded as separate changes before the
    /// item removal itself; undoing a deletion therefore pops the removal
    /// and the cascade as one checkpoint-delimited group. For aliased
    /// pairs the whole pair is removed in one change, and the cascade
    /// covers connections touching either side.
    pub fn delete_item(&mut self, uid: Uuid) -> DsmResult<()> {
        let item = self.get_item(uid)?.clone();

        // Normalize a paired item to its row side so RemovePair always
        // carries (row, col) in that order.
        let (primary, alias) = match item.alias_uid {
            Some(alias_uid) if self.state.is_col(uid) => {
                let row = self.get_item_by_alias(alias_uid)?.clone();
                (row, Some(item))
            }
            Some(alias_uid) => {
                let col = self.get_item_by_alias(alias_uid)?.clone();
                (item, Some(col))
            }
            None => (item, None),
        };

        let mut endpoint_uids = vec![primary.uid];
        if let Some(a) = &alias {
            endpoint_uids.push(a.uid);
        }
        let doomed: Vec<Connection> = self
            .state
            .connections
            .values()
            .filter(|c| endpoint_uids.contains(&c.row_uid) || endpoint_uids.contains(&c.col_uid))
            .cloned()
            .collect();
        for conn in doomed {
            self.log.record(
                &mut self.state,
                ChangeOp::SetConnection {
                    row_uid: conn.row_uid,
                    col_uid: conn.col_uid,
                    old: Some(conn),
                    new: None,
                },
            );
        }

        match alias {
            Some(col) => {
                let row_index = self.state.row_index(primary.uid).unwrap_or(0);
                let col_index = self.state.col_index(col.uid).unwrap_or(0);
                self.log.record(
                    &mut self.state,
                    ChangeOp::RemovePair {
                        row: primary,
                        col,
                        row_index,
                        col_index,
                    },
                );
            }
            None => {
                let as_row = self.state.is_row(primary.uid);
                let index = if as_row {
                    self.state.row_index(primary.uid).unwrap_or(0)
                } else {
                    self.state.col_index(primary.uid).unwrap_or(0)
                };
                self.log.record(
                    &mut self.state,
                    ChangeOp::RemoveItem {
                        item: primary,
                        as_row,
                        index,
                    },
                );
            }
        }
        Ok(())
    }

    /// Rename an item. Propagates to the aliased counterpart inside the
    /// same change.
    pub fn set_item_name(&mut self, uid: Uuid, name: impl Into<String>) -> DsmResult<()> {
        let item = self.get_item(uid)?;
        let op = ChangeOp::SetItemName {
            uid,
            alias_uid: item.alias_uid,
            old: item.name.clone(),
            new: name.into(),
        };
        self.log.record(&mut self.state, op);
        Ok(())
    }

    /// Re-sort an item. Propagates to the aliased counterpart inside the
    /// same change.
    pub fn set_item_sort_index(&mut self, uid: Uuid, sort_index: f64) -> DsmResult<()> {
        let item = self.get_item(uid)?;
        let op = ChangeOp::SetItemSortIndex {
            uid,
            alias_uid: item.alias_uid,
            old: item.sort_index,
            new: sort_index,
        };
        self.log.record(&mut self.state, op);
        Ok(())
    }

    /// Reclassify an item into another grouping. Propagates to the aliased
    /// counterpart inside the same change.
    pub fn set_item_group(&mut self, uid: Uuid, group: Uuid) -> DsmResult<()> {
        let item = self.get_item(uid)?;
        let op = ChangeOp::SetItemGroup {
            uid,
            alias_uid: item.alias_uid,
            old: item.group,
            new: group,
        };
        self.log.record(&mut self.state, op);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Connection mutation
    // ------------------------------------------------------------------

    /// Upsert the connection at `(row_uid, col_uid)`.
    ///
    /// Creates the connection when absent, overwrites its fields when
    /// present; either way one recorded change whose inverse restores the
    /// prior state exactly. Silent no-op unless `row_uid` currently names
    /// a row and `col_uid` a column, or when the endpoints are an aliased
    /// pair (a self-loop in a symmetric matrix).
    pub fn modify_connection(
        &mut self,
        row_uid: Uuid,
        col_uid: Uuid,
        name: impl Into<String>,
        weight: f64,
        interfaces: BTreeSet<Uuid>,
    ) {
        if !self.state.is_row(row_uid) || !self.state.is_col(col_uid) {
            warn!(%row_uid, %col_uid, "connection endpoints are not a row/col pair, ignoring");
            return;
        }
        if let Some(item) = self.state.item(row_uid) {
            if item.alias_uid == Some(col_uid) {
                warn!(%row_uid, %col_uid, "self-connection across an alias pair, ignoring");
                return;
            }
        }
        let old = self.state.connections.get(&(row_uid, col_uid)).cloned();
        let new = Connection::new(row_uid, col_uid, name, weight, interfaces);
        self.log.record(
            &mut self.state,
            ChangeOp::SetConnection {
                row_uid,
                col_uid,
                old,
                new: Some(new),
            },
        );
    }

    /// Delete the connection at `(row_uid, col_uid)`. No-op when absent.
    pub fn delete_connection(&mut self, row_uid: Uuid, col_uid: Uuid) {
        let Some(old) = self.state.connections.get(&(row_uid, col_uid)).cloned() else {
            return;
        };
        self.log.record(
            &mut self.state,
            ChangeOp::SetConnection {
                row_uid,
                col_uid,
                old: Some(old),
                new: None,
            },
        );
    }

    /// Delete every connection, one recorded change per connection.
    /// No-op when the matrix has none.
    pub fn delete_all_connections(&mut self) {
        let all: Vec<Connection> = self.state.connections.values().cloned().collect();
        for conn in all {
            self.log.record(
                &mut self.state,
                ChangeOp::SetConnection {
                    row_uid: conn.row_uid,
                    col_uid: conn.col_uid,
                    old: Some(conn),
                    new: None,
                },
            );
        }
    }

    /// Swap the row and column role of every connection, then the row and
    /// column collections themselves.
    ///
    /// Rewiring happens one connection at a time (a delete change plus a
    /// create change each), followed by a single swap change, so
    /// transposing N connections pushes 2N+1 changes.
    pub fn transpose_matrix(&mut self) {
        let all: Vec<Connection> = self.state.connections.values().cloned().collect();
        for conn in all {
            self.log.record(
                &mut self.state,
                ChangeOp::SetConnection {
                    row_uid: conn.row_uid,
                    col_uid: conn.col_uid,
                    old: Some(conn.clone()),
                    new: None,
                },
            );
            let flipped = Connection::new(
                conn.col_uid,
                conn.row_uid,
                conn.name.clone(),
                conn.weight,
                conn.interfaces.clone(),
            );
            self.log.record(
                &mut self.state,
                ChangeOp::SetConnection {
                    row_uid: flipped.row_uid,
                    col_uid: flipped.col_uid,
                    old: None,
                    new: Some(flipped),
                },
            );
        }
        self.log.record(&mut self.state, ChangeOp::SwapRowsCols);
    }

    /// Compact sort indices to 1..=N per role, preserving the current
    /// order (stable with respect to equal indices). One recorded change
    /// per item, no single atomic change.
    ///
    /// For paired variants the row pass covers both roles, since every
    /// sort-index change propagates to the aliased column.
    pub fn redistribute_sort_indices(&mut self) {
        self.redistribute_role(true);
        if self.variant == MatrixVariant::Asymmetric {
            self.redistribute_role(false);
        }
    }

    fn redistribute_role(&mut self, as_row: bool) {
        let items = if as_row {
            &self.state.rows
        } else {
            &self.state.cols
        };
        let mut order: Vec<(Uuid, Option<Uuid>, f64)> = items
            .iter()
            .map(|i| (i.uid, i.alias_uid, i.sort_index))
            .collect();
        order.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));
        for (pos, (uid, alias_uid, old)) in order.into_iter().enumerate() {
            self.log.record(
                &mut self.state,
                ChangeOp::SetItemSortIndex {
                    uid,
                    alias_uid,
                    old,
                    new: (pos + 1) as f64,
                },
            );
        }
    }

    // ------------------------------------------------------------------
    // Grouping CRUD (matrix-level table; multi-domain uses the
    // domain-scoped calls in `multi_domain`)
    // ------------------------------------------------------------------

    /// Add a grouping to the matrix-level table.
    pub fn add_grouping(
        &mut self,
        name: impl Into<String>,
        color: Color,
        font_color: Color,
    ) -> DsmResult<Uuid> {
        if self.variant == MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant));
        }
        let grouping = Grouping::new(name, color, font_color, self.state.next_grouping_priority(None));
        let uid = grouping.uid;
        self.log
            .record(&mut self.state, ChangeOp::AddGrouping { domain: None, grouping });
        Ok(uid)
    }

    /// Remove a grouping from the matrix-level table, emptying its members
    /// into the sentinel default. Removing the default itself is a silent
    /// no-op.
    pub fn remove_grouping(&mut self, uid: Uuid) -> DsmResult<()> {
        if self.variant == MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant));
        }
        let grouping = self
            .state
            .grouping(None, uid)
            .ok_or(DsmError::GroupingNotFound(uid))?
            .clone();
        if grouping.is_default() {
            warn!(%uid, "refusing to remove the sentinel default grouping");
            return Ok(());
        }
        let members: Vec<Uuid> = self
            .state
            .rows
            .iter()
            .chain(self.state.cols.iter())
            .filter(|i| i.group == uid)
            .map(|i| i.uid)
            .collect();
        let fallback = self.state.default_grouping;
        self.log.record(
            &mut self.state,
            ChangeOp::RemoveGrouping {
                domain: None,
                grouping,
                members,
                fallback,
            },
        );
        Ok(())
    }

    /// Rename a grouping, searched across the matrix-level table and every
    /// domain table.
    pub fn rename_grouping(&mut self, uid: Uuid, name: impl Into<String>) -> DsmResult<()> {
        let (domain, old) = self.locate_grouping(uid)?;
        self.log.record(
            &mut self.state,
            ChangeOp::RenameGrouping {
                domain,
                uid,
                old,
                new: name.into(),
            },
        );
        Ok(())
    }

    /// Change a grouping's fill color.
    pub fn update_grouping_color(&mut self, uid: Uuid, color: Color) -> DsmResult<()> {
        let (domain, _) = self.locate_grouping(uid)?;
        let old = self
            .state
            .grouping(domain, uid)
            .map(|g| g.color)
            .unwrap_or(Color::WHITE);
        self.log.record(
            &mut self.state,
            ChangeOp::SetGroupingColor {
                domain,
                uid,
                old,
                new: color,
            },
        );
        Ok(())
    }

    /// Change a grouping's font color.
    pub fn update_grouping_font_color(&mut self, uid: Uuid, font_color: Color) -> DsmResult<()> {
        let (domain, _) = self.locate_grouping(uid)?;
        let old = self
            .state
            .grouping(domain, uid)
            .map(|g| g.font_color)
            .unwrap_or(Color::BLACK);
        self.log.record(
            &mut self.state,
            ChangeOp::SetGroupingFontColor {
                domain,
                uid,
                old,
                new: font_color,
            },
        );
        Ok(())
    }

    /// Find which table holds a grouping; returns the addressing domain
    /// and the grouping's current name.
    fn locate_grouping(&self, uid: Uuid) -> DsmResult<(Option<Uuid>, String)> {
        if let Some(g) = self.state.groupings.iter().find(|g| g.uid == uid) {
            return Ok((None, g.name.clone()));
        }
        for (domain, table) in &self.state.domain_groupings {
            if let Some(g) = table.iter().find(|g| g.uid == uid) {
                return Ok((Some(*domain), g.name.clone()));
            }
        }
        Err(DsmError::GroupingNotFound(uid))
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Matrix title.
    pub fn title(&self) -> &str {
        &self.state.metadata.title
    }

    /// Project name.
    pub fn project_name(&self) -> &str {
        &self.state.metadata.project_name
    }

    /// Customer name.
    pub fn customer(&self) -> &str {
        &self.state.metadata.customer
    }

    /// Version string.
    pub fn version_number(&self) -> &str {
        &self.state.metadata.version_number
    }

    /// Set the title. One recorded change.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.set_metadata(MetadataField::Title, title.into());
    }

    /// Set the project name. One recorded change.
    pub fn set_project_name(&mut self, project_name: impl Into<String>) {
        self.set_metadata(MetadataField::ProjectName, project_name.into());
    }

    /// Set the customer name. One recorded change.
    pub fn set_customer(&mut self, customer: impl Into<String>) {
        self.set_metadata(MetadataField::Customer, customer.into());
    }

    /// Set the version string. One recorded change.
    pub fn set_version_number(&mut self, version_number: impl Into<String>) {
        self.set_metadata(MetadataField::VersionNumber, version_number.into());
    }

    fn set_metadata(&mut self, field: MetadataField, new: String) {
        let old = match field {
            MetadataField::Title => self.state.metadata.title.clone(),
            MetadataField::ProjectName => self.state.metadata.project_name.clone(),
            MetadataField::Customer => self.state.metadata.customer.clone(),
            MetadataField::VersionNumber => self.state.metadata.version_number.clone(),
        };
        self.log
            .record(&mut self.state, ChangeOp::SetMetadata { field, old, new });
    }

    // ------------------------------------------------------------------
    // History & dirty flag facade
    // ------------------------------------------------------------------

    /// Undo back to the previous checkpoint boundary. No-op on an empty
    /// undo stack.
    pub fn undo_to_checkpoint(&mut self) {
        self.log.undo_to_checkpoint(&mut self.state);
    }

    /// Redo forward to the next checkpoint boundary. No-op on an empty
    /// redo stack.
    pub fn redo_to_checkpoint(&mut self) {
        self.log.redo_to_checkpoint(&mut self.state);
    }

    /// Mark the current state as the end of a user-visible operation and
    /// invalidate redo history.
    pub fn set_current_state_as_checkpoint(&mut self) {
        debug!(undo_depth = self.log.undo_depth(), "checkpoint set");
        self.log.set_current_state_as_checkpoint();
    }

    /// Whether anything can be undone.
    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    /// Whether anything can be redone.
    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Number of recorded changes awaiting undo.
    pub fn undo_depth(&self) -> usize {
        self.log.undo_depth()
    }

    /// Number of undone changes awaiting redo.
    pub fn redo_depth(&self) -> usize {
        self.log.redo_depth()
    }

    /// Whether the matrix has unsaved mutations.
    pub fn is_modified(&self) -> bool {
        self.log.is_modified()
    }

    /// Reset the dirty flag after a successful save.
    pub fn clear_modified_flag(&mut self) {
        self.log.clear_modified_flag();
    }

    /// Force the dirty flag, e.g. after a failed save attempt.
    pub fn mark_modified(&mut self) {
        self.log.mark_modified();
    }

    /// Drop all recorded history. The state itself is untouched.
    pub fn clear_history(&mut self) {
        self.log.clear();
    }

    // Crate-internal access for the variant modules.
    pub(crate) fn state_mut(&mut self) -> &mut MatrixState {
        &mut self.state
    }

    pub(crate) fn state_ref(&self) -> &MatrixState {
        &self.state
    }

    pub(crate) fn record(&mut self, op: ChangeOp) {
        self.log.record(&mut self.state, op);
    }
}
