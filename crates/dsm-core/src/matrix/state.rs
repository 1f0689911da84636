//! Raw matrix storage mutated by change ops.
//!
//! [`MatrixState`] owns every item, connection, and grouping in the matrix.
//! Nothing outside the crate touches it directly: the public [`super::Matrix`]
//! API routes all mutation through recorded change ops, which is what keeps
//! the undo/redo stacks authoritative.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Connection, Grouping, Item};

/// Matrix header strings, each editable through the change-history engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Matrix title.
    pub title: String,
    /// Project the matrix belongs to.
    pub project_name: String,
    /// Customer name.
    pub customer: String,
    /// Version string, free-form.
    pub version_number: String,
}

/// Which metadata string a change addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataField {
    /// `Metadata::title`
    Title,
    /// `Metadata::project_name`
    ProjectName,
    /// `Metadata::customer`
    Customer,
    /// `Metadata::version_number`
    VersionNumber,
}

/// Owned storage for one matrix: ordered row/col items, the connection
/// table, grouping taxonomies, and metadata.
///
/// Connections are keyed on `(row_uid, col_uid)` in a `BTreeMap`, which
/// both enforces the at-most-one-connection-per-pair invariant and keeps
/// iteration deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixState {
    pub(crate) rows: Vec<Item>,
    pub(crate) cols: Vec<Item>,
    pub(crate) connections: BTreeMap<(Uuid, Uuid), Connection>,
    /// Flat grouping table used by symmetric and asymmetric matrices.
    pub(crate) groupings: Vec<Grouping>,
    /// Uid of the sentinel default grouping in `groupings`.
    pub(crate) default_grouping: Uuid,
    /// Domain partition groupings, multi-domain only.
    pub(crate) domains: Vec<Grouping>,
    /// Per-domain grouping tables, each containing its own sentinel default.
    pub(crate) domain_groupings: BTreeMap<Uuid, Vec<Grouping>>,
    pub(crate) metadata: Metadata,
}

impl MatrixState {
    /// Empty state with a fresh sentinel default grouping.
    pub(crate) fn new() -> Self {
        let default = Grouping::sentinel_default();
        let default_uid = default.uid;
        Self {
            rows: Vec::new(),
            cols: Vec::new(),
            connections: BTreeMap::new(),
            groupings: vec![default],
            default_grouping: default_uid,
            domains: Vec::new(),
            domain_groupings: BTreeMap::new(),
            metadata: Metadata::default(),
        }
    }

    // ------------------------------------------------------------------
    // Item lookups
    // ------------------------------------------------------------------

    pub(crate) fn item(&self, uid: Uuid) -> Option<&Item> {
        self.rows
            .iter()
            .find(|i| i.uid == uid)
            .or_else(|| self.cols.iter().find(|i| i.uid == uid))
    }

    pub(crate) fn item_mut(&mut self, uid: Uuid) -> Option<&mut Item> {
        if let Some(idx) = self.rows.iter().position(|i| i.uid == uid) {
            return self.rows.get_mut(idx);
        }
        if let Some(idx) = self.cols.iter().position(|i| i.uid == uid) {
            return self.cols.get_mut(idx);
        }
        None
    }

    pub(crate) fn is_row(&self, uid: Uuid) -> bool {
        self.rows.iter().any(|i| i.uid == uid)
    }

    pub(crate) fn is_col(&self, uid: Uuid) -> bool {
        self.cols.iter().any(|i| i.uid == uid)
    }

    pub(crate) fn row_index(&self, uid: Uuid) -> Option<usize> {
        self.rows.iter().position(|i| i.uid == uid)
    }

    pub(crate) fn col_index(&self, uid: Uuid) -> Option<usize> {
        self.cols.iter().position(|i| i.uid == uid)
    }

    /// Next auto-assigned sort index for the given role:
    /// `floor(max_existing) + 1`, or 1 for an empty role.
    pub(crate) fn next_sort_index(&self, as_row: bool) -> f64 {
        let items = if as_row { &self.rows } else { &self.cols };
        items
            .iter()
            .map(|i| i.sort_index)
            .fold(0.0_f64, f64::max)
            .floor()
            + 1.0
    }

    // ------------------------------------------------------------------
    // Grouping tables
    // ------------------------------------------------------------------

    /// The grouping table addressed by `domain`: the flat matrix-level
    /// table for `None`, a domain-scoped table for `Some`.
    pub(crate) fn grouping_table(&self, domain: Option<Uuid>) -> Option<&Vec<Grouping>> {
        match domain {
            None => Some(&self.groupings),
            Some(d) => self.domain_groupings.get(&d),
        }
    }

    pub(crate) fn grouping_table_mut(&mut self, domain: Option<Uuid>) -> Option<&mut Vec<Grouping>> {
        match domain {
            None => Some(&mut self.groupings),
            Some(d) => self.domain_groupings.get_mut(&d),
        }
    }

    pub(crate) fn grouping(&self, domain: Option<Uuid>, uid: Uuid) -> Option<&Grouping> {
        self.grouping_table(domain)?.iter().find(|g| g.uid == uid)
    }

    /// Uid of the sentinel default in the addressed table.
    pub(crate) fn default_of(&self, domain: Option<Uuid>) -> Option<Uuid> {
        match domain {
            None => Some(self.default_grouping),
            Some(d) => self
                .domain_groupings
                .get(&d)?
                .iter()
                .find(|g| g.is_default())
                .map(|g| g.uid),
        }
    }

    pub(crate) fn next_grouping_priority(&self, domain: Option<Uuid>) -> u32 {
        self.grouping_table(domain)
            .map(|t| t.iter().map(|g| g.priority).max().unwrap_or(0) + 1)
            .unwrap_or(1)
    }

    pub(crate) fn domain(&self, uid: Uuid) -> Option<&Grouping> {
        self.domains.iter().find(|d| d.uid == uid)
    }
}

impl Default for MatrixState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_sentinel_default() {
        let state = MatrixState::new();
        assert_eq!(state.groupings.len(), 1);
        assert_eq!(state.groupings[0].uid, state.default_grouping);
        assert!(state.groupings[0].is_default());
    }

    #[test]
    fn test_next_sort_index_floors() {
        let mut state = MatrixState::new();
        let g = state.default_grouping;
        state.rows.push(Item::new("a", 1.0, g));
        state.rows.push(Item::new("b", 2.5, g));
        assert_eq!(state.next_sort_index(true), 3.0);
        assert_eq!(state.next_sort_index(false), 1.0);
    }
}
