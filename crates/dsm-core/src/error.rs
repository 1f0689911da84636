//! Error types for dsm-core.
//!
//! The error taxonomy is deliberately small. Lookups by uid fail fast with
//! a not-found variant carrying the offending uid; illegal operations
//! (connection between non-endpoints, undo on an empty stack, deleting the
//! sentinel grouping, removing the last domain) are silent no-ops by design
//! and never surface here; variant-specific entry points called on a matrix
//! variant that does not support them return
//! [`DsmError::UnsupportedVariant`].

use thiserror::Error;
use uuid::Uuid;

use crate::matrix::MatrixVariant;

/// Result alias for dsm-core operations.
pub type DsmResult<T> = Result<T, DsmError>;

/// Errors raised by the matrix core.
#[derive(Debug, Error, PartialEq)]
pub enum DsmError {
    /// No item with the given uid exists in either role.
    #[error("item not found: {0}")]
    ItemNotFound(Uuid),

    /// An alias reference did not resolve to an item.
    ///
    /// Raised by [`crate::matrix::Matrix::get_item_by_alias`] when the uid
    /// recorded in an item's `alias_uid` no longer names an item.
    #[error("aliased item not found: {0}")]
    AliasNotFound(Uuid),

    /// No grouping with the given uid exists in the addressed table.
    #[error("grouping not found: {0}")]
    GroupingNotFound(Uuid),

    /// No domain with the given uid exists.
    #[error("domain not found: {0}")]
    DomainNotFound(Uuid),

    /// A variant-specific operation was called on a matrix variant that
    /// does not support it.
    ///
    /// # When This Occurs
    ///
    /// - Paired item creation on an asymmetric matrix
    /// - Zoom export/import on anything but a multi-domain matrix
    /// - Symmetric connection mirroring on an asymmetric matrix
    /// - Flat grouping CRUD on a multi-domain matrix (whose groupings are
    ///   domain-scoped)
    #[error("operation not supported on a {0} matrix")]
    UnsupportedVariant(MatrixVariant),
}
