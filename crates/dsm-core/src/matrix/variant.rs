//! Matrix variant tag.
//!
//! The original design expressed variants as an inheritance tree; here one
//! concrete [`super::Matrix`] carries this tag and dispatches the handful
//! of variant-specific behaviors (item creation, grouping rules, zoom)
//! explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of matrix this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixVariant {
    /// Rows and columns always mirror each other: every row item has
    /// exactly one aliased column item sharing name, sort index, and group.
    Symmetric,
    /// Rows and columns are independent item lists.
    Asymmetric,
    /// Symmetric pairing plus a domain partition: every item belongs to
    /// one domain, and each domain owns its own grouping taxonomy.
    MultiDomain,
}

impl MatrixVariant {
    /// Whether items of this variant come as aliased row/column pairs.
    pub fn is_paired(&self) -> bool {
        matches!(self, MatrixVariant::Symmetric | MatrixVariant::MultiDomain)
    }
}

impl fmt::Display for MatrixVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatrixVariant::Symmetric => "symmetric",
            MatrixVariant::Asymmetric => "asymmetric",
            MatrixVariant::MultiDomain => "multi-domain",
        };
        write!(f, "{}", s)
    }
}
