//! Symmetric-specific surface: aliased row/column pairs and mirrored
//! connections.

use std::collections::BTreeSet;

use tracing::warn;
use uuid::Uuid;

use crate::error::{DsmError, DsmResult};
use crate::history::ChangeOp;
use crate::types::Item;

use super::{Matrix, MatrixVariant};

impl Matrix {
    /// Create a mutually aliased row/column pair sharing name, sort index,
    /// and group, inserted as one recorded change so that undo removes
    /// both sides together. Returns `(row_uid, col_uid)`.
    pub fn create_item_pair(&mut self, name: impl Into<String>) -> DsmResult<(Uuid, Uuid)> {
        if self.variant() != MatrixVariant::Symmetric {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        let state = self.state_ref();
        let sort_index = state.next_sort_index(true);
        let (row, col) = Item::new_pair(name, sort_index, state.default_grouping);
        let uids = (row.uid, col.uid);
        let op = ChangeOp::InsertPair {
            row_index: state.rows.len(),
            col_index: state.cols.len(),
            row,
            col,
        };
        self.record(op);
        Ok(uids)
    }

    /// The mirror of the connection `(row_uid, col_uid)`: the pair
    /// `(alias_of(col_uid), alias_of(row_uid))` obtained by swapping the
    /// endpoints through their alias links.
    pub fn get_symmetric_connection_uids(
        &self,
        row_uid: Uuid,
        col_uid: Uuid,
    ) -> DsmResult<(Uuid, Uuid)> {
        let row_item = self.get_item(row_uid)?;
        let col_item = self.get_item(col_uid)?;
        let mirror_row = col_item.alias_uid.ok_or(DsmError::AliasNotFound(col_uid))?;
        let mirror_col = row_item.alias_uid.ok_or(DsmError::AliasNotFound(row_uid))?;
        Ok((mirror_row, mirror_col))
    }

    /// Upsert a connection and its mirror in one call.
    ///
    /// Issues two independent [`Matrix::modify_connection`] changes, one
    /// per direction. Self-connections across an alias pair are illegal
    /// and ignored.
    pub fn modify_connection_symmetric(
        &mut self,
        row_uid: Uuid,
        col_uid: Uuid,
        name: impl Into<String>,
        weight: f64,
        interfaces: BTreeSet<Uuid>,
    ) -> DsmResult<()> {
        if self.variant() != MatrixVariant::Symmetric {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        if self.get_item(row_uid)?.alias_uid == Some(col_uid) {
            warn!(%row_uid, %col_uid, "self-connection across an alias pair, ignoring");
            return Ok(());
        }
        let (mirror_row, mirror_col) = self.get_symmetric_connection_uids(row_uid, col_uid)?;
        let name = name.into();
        self.modify_connection(row_uid, col_uid, name.clone(), weight, interfaces.clone());
        self.modify_connection(mirror_row, mirror_col, name, weight, interfaces);
        Ok(())
    }
}
