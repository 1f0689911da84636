//! Propagation analysis: breadth-first level expansion over connections.
//!
//! Starting from one item, each level visits every connection from the
//! current frontier to the opposite role, filtered by a weight threshold.
//! Every qualifying neighbor accumulates either the connection weight or a
//! hit count into that level's result map; neighbors that are not excluded
//! feed the next level's frontier. Excluded items still accumulate in the
//! level where they are reached but never propagate further.
//!
//! # Direction
//!
//! For asymmetric matrices the traversal direction strictly alternates
//! (row→col, then col→row, ...) based on the start item's role. For
//! symmetric and multi-domain matrices the alternation is irrelevant —
//! row and column are the same logical item through the alias link — so
//! identities are normalized to the row side and every level expands
//! rows→cols.
//!
//! Results are deterministic for a given matrix state and parameter set.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use dsm_core::matrix::Matrix;

use crate::error::{AnalysisError, AnalysisResult};

/// Per-level accumulation: `level → (neighbor uid → accumulated value)`.
pub type PropagationResult = BTreeMap<u32, HashMap<Uuid, f64>>;

/// Parameters for propagation analysis.
///
/// # Example
///
/// ```
/// use dsm_analysis::propagation::PropagationParams;
/// use uuid::Uuid;
///
/// let start = Uuid::new_v4();
/// let params = PropagationParams::new(start)
///     .num_levels(3)
///     .min_weight(2.0)
///     .count_by_weight(true);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationParams {
    /// Item the expansion starts from. Always treated as excluded.
    pub start_uid: Uuid,
    /// Number of levels to expand (default: 1). Zero yields an empty
    /// result tree.
    pub num_levels: u32,
    /// Items that accumulate when reached but never propagate.
    pub exclusions: Vec<Uuid>,
    /// Connections below this weight are not traversed (default: 0.0).
    pub min_weight: f64,
    /// Accumulate connection weights instead of hit counts.
    pub count_by_weight: bool,
}

impl PropagationParams {
    /// Params with defaults: one level, no exclusions, zero threshold,
    /// hit counting.
    pub fn new(start_uid: Uuid) -> Self {
        Self {
            start_uid,
            num_levels: 1,
            exclusions: Vec::new(),
            min_weight: 0.0,
            count_by_weight: false,
        }
    }

    /// Builder: set the number of levels.
    #[must_use]
    pub fn num_levels(mut self, num_levels: u32) -> Self {
        self.num_levels = num_levels;
        self
    }

    /// Builder: add one excluded item.
    #[must_use]
    pub fn exclude(mut self, uid: Uuid) -> Self {
        self.exclusions.push(uid);
        self
    }

    /// Builder: replace the exclusion set.
    #[must_use]
    pub fn exclusions(mut self, exclusions: Vec<Uuid>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Builder: set the weight threshold.
    #[must_use]
    pub fn min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    /// Builder: accumulate weights instead of counts.
    #[must_use]
    pub fn count_by_weight(mut self, count_by_weight: bool) -> Self {
        self.count_by_weight = count_by_weight;
        self
    }

    /// Check parameter sanity.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.min_weight.is_finite() {
            return Err(AnalysisError::InvalidParams(format!(
                "min_weight must be finite, got {}",
                self.min_weight
            )));
        }
        Ok(())
    }
}

/// Run propagation analysis over the matrix.
///
/// Returns the per-level accumulation maps for levels `1..=num_levels`.
/// A missing start item or zero levels yields an empty tree.
pub fn propagation_analysis(matrix: &Matrix, params: &PropagationParams) -> PropagationResult {
    let mut results = PropagationResult::new();
    if params.num_levels == 0 {
        return results;
    }

    let paired = matrix.variant().is_paired();
    // Normalize paired identities to the row side, so that exclusions,
    // frontier membership, and result keys all name the same logical item
    // regardless of which side a connection touched.
    let canonical = |uid: Uuid| -> Uuid {
        if paired && matrix.is_col(uid) {
            matrix
                .get_item(uid)
                .ok()
                .and_then(|i| i.alias_uid)
                .unwrap_or(uid)
        } else {
            uid
        }
    };

    let start = canonical(params.start_uid);
    if matrix.get_item(start).is_err() {
        debug!(start_uid = %params.start_uid, "propagation start item not found");
        return results;
    }

    let mut excluded: HashSet<Uuid> = params.exclusions.iter().map(|u| canonical(*u)).collect();
    excluded.insert(start);

    let mut frontier: HashSet<Uuid> = HashSet::from([start]);
    let mut from_rows = if paired {
        true
    } else {
        matrix.is_row(params.start_uid)
    };

    for level in 1..=params.num_levels {
        let mut accumulated: HashMap<Uuid, f64> = HashMap::new();
        let mut next: HashSet<Uuid> = HashSet::new();

        for conn in matrix.connections() {
            let (source, neighbor_raw) = if from_rows {
                (conn.row_uid, conn.col_uid)
            } else {
                (conn.col_uid, conn.row_uid)
            };
            if !frontier.contains(&canonical(source)) {
                continue;
            }
            if conn.weight < params.min_weight {
                continue;
            }
            let neighbor = canonical(neighbor_raw);
            let value = if params.count_by_weight {
                conn.weight
            } else {
                1.0
            };
            *accumulated.entry(neighbor).or_insert(0.0) += value;
            if !excluded.contains(&neighbor) {
                next.insert(neighbor);
            }
        }

        results.insert(level, accumulated);
        frontier = next;
        if !paired {
            from_rows = !from_rows;
        }
    }

    debug!(
        levels = results.len(),
        reached = results.values().map(|m| m.len()).sum::<usize>(),
        "propagation analysis complete"
    );
    results
}
