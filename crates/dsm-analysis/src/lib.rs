//! Graph analysis over DSM matrices.
//!
//! Two read-side algorithms that consume `dsm-core` matrices and produce
//! derived results without going through the change-history engine:
//!
//! - **propagation**: breadth-first level expansion from a start item,
//!   counting or weight-summing reachable neighbors per level
//! - **art1**: ART1 prototype clustering of a symmetric matrix, operating
//!   on a private deep copy and returning it with one grouping per item
//!
//! # Example
//!
//! ```
//! use dsm_core::matrix::{Matrix, MatrixVariant};
//! use dsm_analysis::propagation::{propagation_analysis, PropagationParams};
//!
//! let mut m = Matrix::new(MatrixVariant::Symmetric);
//! let (a, _) = m.create_item_pair("a").unwrap();
//! let (b, b_col) = m.create_item_pair("b").unwrap();
//! m.modify_connection(a, b_col, "link", 2.0, Default::default());
//!
//! let result = propagation_analysis(&m, &PropagationParams::new(a));
//! assert_eq!(result[&1][&b], 1.0);
//! ```

pub mod art1;
pub mod error;
pub mod propagation;

// Re-exports for convenience
pub use art1::{art1_cluster, Art1Params};
pub use error::{AnalysisError, AnalysisResult};
pub use propagation::{propagation_analysis, PropagationParams, PropagationResult};
