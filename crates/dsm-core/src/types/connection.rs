//! Connection: a weighted, named dependency between a row and a column.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed dependency from a row item to a column item.
///
/// At most one connection exists per `(row_uid, col_uid)` pair; the matrix
/// enforces this by keying its connection table on the pair. A connection
/// may only reference a uid that is currently a row and a uid that is
/// currently a column, and in symmetric matrices a row may never connect to
/// its own aliased column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Uid of the row endpoint.
    pub row_uid: Uuid,
    /// Uid of the column endpoint.
    pub col_uid: Uuid,
    /// Connection label, e.g. the kind of dependency.
    pub name: String,
    /// Connection strength. Analysis filters on this.
    pub weight: f64,
    /// Interface-type references attached to this connection.
    ///
    /// Ordered set so projections and comparisons are deterministic.
    pub interfaces: BTreeSet<Uuid>,
}

impl Connection {
    /// Create a connection between the given endpoints.
    pub fn new(
        row_uid: Uuid,
        col_uid: Uuid,
        name: impl Into<String>,
        weight: f64,
        interfaces: BTreeSet<Uuid>,
    ) -> Self {
        Self {
            row_uid,
            col_uid,
            name: name.into(),
            weight,
            interfaces,
        }
    }

    /// The `(row_uid, col_uid)` key this connection occupies.
    pub fn key(&self) -> (Uuid, Uuid) {
        (self.row_uid, self.col_uid)
    }
}
