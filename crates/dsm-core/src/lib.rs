//! Design Structure Matrix core library.
//!
//! Provides the data model and change-history engine for DSM editing:
//! items, weighted connections, grouping taxonomies, and a matrix type in
//! three variants (symmetric, asymmetric, multi-domain), every mutation of
//! which is undoable to checkpoint boundaries.
//!
//! # Architecture
//!
//! - **types**: identity & value types ([`types::Item`],
//!   [`types::Connection`], [`types::Grouping`], [`types::Color`])
//! - **history**: the change-history engine — reversible ops, undo/redo
//!   stacks, checkpointing, dirty flag
//! - **matrix**: the [`matrix::Matrix`] itself — storage, lookups, the
//!   public mutation surface, variant-specific behavior, and the
//!   read-only grid projection
//! - **error**: [`DsmError`] and the [`DsmResult`] alias
//!
//! Rendering, dialogs, file formats, and event wiring are external
//! collaborators: they consume the grid projection and the dirty/metadata
//! queries, and mutate only through the public modifier API.
//!
//! # Example
//!
//! ```
//! use dsm_core::matrix::{Matrix, MatrixVariant};
//!
//! let mut m = Matrix::new(MatrixVariant::Symmetric);
//! let (a_row, _) = m.create_item_pair("engine").unwrap();
//! let (_, b_col) = m.create_item_pair("gearbox").unwrap();
//! m.modify_connection(a_row, b_col, "torque", 3.0, Default::default());
//! m.set_current_state_as_checkpoint();
//!
//! m.undo_to_checkpoint();
//! assert_eq!(m.connection_count(), 0);
//! m.redo_to_checkpoint();
//! assert_eq!(m.connection_count(), 1);
//! ```

pub mod error;
pub mod history;
pub mod matrix;
pub mod types;

// Re-exports for convenience
pub use error::{DsmError, DsmResult};
pub use matrix::{CellKind, GridCell, Matrix, MatrixVariant};
pub use types::{Color, Connection, Grouping, Item};
