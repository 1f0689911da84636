//! Item: one row or column element of the matrix.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A system element occupying one row or one column of the matrix.
///
/// Within one matrix instance an item is either a row or a column, never
/// both. In symmetric and multi-domain matrices every row item is mirrored
/// by exactly one column item; `alias_uid` links the two, and the mutation
/// paths keep `name`, `sort_index`, and `group` equal across the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity, unique within the matrix, immutable after creation.
    pub uid: Uuid,
    /// Uid of the mirrored item in the opposite role, when one exists.
    pub alias_uid: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Display-order key. Real-valued so items can be inserted between
    /// neighbors without renumbering; `redistribute_sort_indices` compacts.
    pub sort_index: f64,
    /// Primary classification: uid of a grouping owned by the matrix
    /// (or by this item's domain in a multi-domain matrix).
    pub group: Uuid,
    /// Domain partition, used only by multi-domain matrices.
    pub domain: Option<Uuid>,
}

impl Item {
    /// Create an unaliased item with a fresh uid.
    pub fn new(name: impl Into<String>, sort_index: f64, group: Uuid) -> Self {
        Self {
            uid: Uuid::new_v4(),
            alias_uid: None,
            name: name.into(),
            sort_index,
            group,
            domain: None,
        }
    }

    /// Create a mutually aliased row/column pair sharing name, sort index,
    /// and group. Returned as `(row, col)`.
    pub fn new_pair(name: impl Into<String>, sort_index: f64, group: Uuid) -> (Self, Self) {
        let name = name.into();
        let mut row = Self::new(name.clone(), sort_index, group);
        let mut col = Self::new(name, sort_index, group);
        row.alias_uid = Some(col.uid);
        col.alias_uid = Some(row.uid);
        (row, col)
    }

    /// Builder: stamp a domain onto the item.
    #[must_use]
    pub fn with_domain(mut self, domain: Uuid) -> Self {
        self.domain = Some(domain);
        self
    }
}
