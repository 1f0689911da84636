//! Asymmetric-specific surface: independent row and column items.

use uuid::Uuid;

use crate::error::{DsmError, DsmResult};
use crate::history::ChangeOp;
use crate::types::Item;

use super::{Matrix, MatrixVariant};

impl Matrix {
    /// Create a single item in the given role with the next free sort
    /// index (`floor(max) + 1`) and the default grouping. One recorded
    /// change, not a checkpoint.
    ///
    /// Asymmetric matrices only; paired variants create items through
    /// [`Matrix::create_item_pair`] or
    /// [`Matrix::create_item_in_domain`].
    pub fn create_item(&mut self, name: impl Into<String>, as_row: bool) -> DsmResult<Uuid> {
        if self.variant() != MatrixVariant::Asymmetric {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        let state = self.state_ref();
        let sort_index = state.next_sort_index(as_row);
        let item = Item::new(name, sort_index, state.default_grouping);
        let uid = item.uid;
        let index = if as_row {
            state.rows.len()
        } else {
            state.cols.len()
        };
        self.record(ChangeOp::InsertItem { item, as_row, index });
        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_item_assigns_next_sort_index_per_role() {
        let mut m = Matrix::new(MatrixVariant::Asymmetric);
        let a = m.create_item("a", true).unwrap();
        let b = m.create_item("b", true).unwrap();
        let c = m.create_item("c", false).unwrap();
        assert_eq!(m.get_item(a).unwrap().sort_index, 1.0);
        assert_eq!(m.get_item(b).unwrap().sort_index, 2.0);
        assert_eq!(m.get_item(c).unwrap().sort_index, 1.0);
        assert!(m.is_row(a) && !m.is_col(a));
        assert!(m.is_col(c) && !m.is_row(c));
    }

    #[test]
    fn test_create_item_has_no_alias() {
        let mut m = Matrix::new(MatrixVariant::Asymmetric);
        let a = m.create_item("a", true).unwrap();
        assert_eq!(m.get_item(a).unwrap().alias_uid, None);
    }

    #[test]
    fn test_create_item_rejected_on_paired_variants() {
        let mut m = Matrix::new(MatrixVariant::Symmetric);
        assert_eq!(
            m.create_item("a", true),
            Err(DsmError::UnsupportedVariant(MatrixVariant::Symmetric))
        );
    }
}
