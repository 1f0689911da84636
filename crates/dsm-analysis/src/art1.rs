//! ART1 clustering of symmetric matrices.
//!
//! Adaptive Resonance Theory type-1: items are assigned to prototypes
//! (binary masks over the item set) by an AND-based similarity test with a
//! vigilance threshold, and the assignment is re-run in full passes until
//! it stabilizes.
//!
//! # Algorithm
//!
//! 1. Deep-copy the matrix; the caller's instance is never touched.
//! 2. Build the N×N binary adjacency from connection presence, with an
//!    identity diagonal (every item is adjacent to itself).
//! 3. For each item `i`, find the best prototype `p` passing both gates:
//!    - proximity: `|AND(p, a_i)| / (beta + |p|) > |a_i| / (beta + N)`
//!    - vigilance: `|AND(p, a_i)| / |a_i| > vigilance`
//!    On acceptance, `p` becomes the AND of all member adjacency rows.
//!    With no acceptor, a new prototype is seeded from `a_i`, or the item
//!    is forced into the last prototype once `max_groups` is exhausted.
//! 4. Repeat full passes until one makes no reassignment, or `max_passes`
//!    is hit (pathological vigilance/beta combinations never stabilize).
//! 5. Stamp one freshly colored grouping per surviving prototype onto the
//!    copy and return it; the caller decides whether to merge it back.
//!
//! Cluster colors step around the hue circle by the golden-ratio
//! conjugate from a fixed seed, so runs are deterministic for a given
//! item ordering.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use dsm_core::matrix::{Matrix, MatrixVariant};
use dsm_core::types::Color;

use crate::error::{AnalysisError, AnalysisResult};

/// Hue the palette starts from.
const INITIAL_HUE: f64 = 0.0;
/// Golden-ratio conjugate hue step: successive clusters land far apart on
/// the hue circle.
const HUE_STEP: f64 = 0.618_033_988_7;
/// Fixed palette saturation.
const SATURATION: f64 = 0.5;
/// Fixed palette brightness.
const BRIGHTNESS: f64 = 0.95;

/// Parameters for ART1 clustering.
///
/// # Example
///
/// ```
/// use dsm_analysis::art1::Art1Params;
///
/// let params = Art1Params::default().vigilance(0.7).max_groups(4);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Art1Params {
    /// Vigilance threshold in `[0, 1]`: the fraction of an item's
    /// connections a prototype must match. Higher values make smaller,
    /// tighter clusters.
    pub vigilance: f64,
    /// Choice parameter biasing the proximity gate; must be non-negative
    /// and finite.
    pub beta: f64,
    /// Prototype budget. Once exhausted, unmatched items are forced into
    /// the last prototype.
    pub max_groups: usize,
    /// Full-pass cap for parameter combinations that never stabilize.
    pub max_passes: usize,
}

impl Default for Art1Params {
    fn default() -> Self {
        Self {
            vigilance: 0.5,
            beta: 1.0,
            max_groups: 10,
            max_passes: 500,
        }
    }
}

impl Art1Params {
    /// Builder: set the vigilance threshold.
    #[must_use]
    pub fn vigilance(mut self, vigilance: f64) -> Self {
        self.vigilance = vigilance;
        self
    }

    /// Builder: set the choice parameter.
    #[must_use]
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Builder: set the prototype budget.
    #[must_use]
    pub fn max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = max_groups;
        self
    }

    /// Builder: set the pass cap.
    #[must_use]
    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Check parameter sanity.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(0.0..=1.0).contains(&self.vigilance) {
            return Err(AnalysisError::InvalidParams(format!(
                "vigilance must be in [0, 1], got {}",
                self.vigilance
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(AnalysisError::InvalidParams(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if self.max_groups == 0 {
            return Err(AnalysisError::InvalidParams(
                "max_groups must be at least 1".into(),
            ));
        }
        if self.max_passes == 0 {
            return Err(AnalysisError::InvalidParams(
                "max_passes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Cluster a symmetric matrix, returning a deep copy with one grouping
/// assigned per item.
pub fn art1_cluster(matrix: &Matrix, params: &Art1Params) -> AnalysisResult<Matrix> {
    params.validate()?;
    if matrix.variant() != MatrixVariant::Symmetric {
        return Err(AnalysisError::WrongVariant {
            expected: MatrixVariant::Symmetric,
            actual: matrix.variant(),
        });
    }

    let mut copy = matrix.create_copy();
    let items: Vec<Uuid> = copy.rows().iter().map(|i| i.uid).collect();
    let n = items.len();
    if n == 0 {
        return Ok(copy);
    }

    let adjacency = build_adjacency(&copy, &items);

    let mut prototypes: Vec<Vec<bool>> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    let mut assignment: Vec<Option<usize>> = vec![None; n];

    let mut passes = 0usize;
    loop {
        passes += 1;
        let mut changed = false;

        for i in 0..n {
            let a_i = &adjacency[i];
            let a_norm = ones(a_i);
            let baseline = a_norm / (params.beta + n as f64);

            let mut best: Option<(usize, f64)> = None;
            for (p, proto) in prototypes.iter().enumerate() {
                let matched = and_ones(proto, a_i);
                let proximity = matched / (params.beta + ones(proto));
                if proximity <= baseline {
                    continue;
                }
                if matched / a_norm <= params.vigilance {
                    continue;
                }
                if best.map_or(true, |(_, score)| proximity > score) {
                    best = Some((p, proximity));
                }
            }

            let target = match best {
                Some((p, _)) => p,
                None if prototypes.len() < params.max_groups => {
                    prototypes.push(a_i.clone());
                    members.push(Vec::new());
                    prototypes.len() - 1
                }
                // Budget exhausted: force into the last prototype.
                None => prototypes.len() - 1,
            };

            if assignment[i] != Some(target) {
                if let Some(old) = assignment[i] {
                    members[old].retain(|&m| m != i);
                }
                members[target].push(i);
                assignment[i] = Some(target);
                prototypes[target] = and_of_rows(&adjacency, &members[target], n);
                changed = true;
            }
        }

        if !changed {
            break;
        }
        if passes >= params.max_passes {
            warn!(passes, "clustering pass cap reached before stabilizing");
            break;
        }
    }
    debug!(passes, prototypes = prototypes.len(), "clustering converged");

    // Stamp one grouping per surviving prototype, golden-ratio palette.
    let mut hue = INITIAL_HUE;
    let mut cluster_no = 0usize;
    for member_list in &members {
        if member_list.is_empty() {
            continue;
        }
        cluster_no += 1;
        hue = (hue + HUE_STEP) % 1.0;
        let color = Color::from_hsb(hue, SATURATION, BRIGHTNESS);
        let grouping = copy.add_grouping(format!("cluster {}", cluster_no), color, Color::BLACK)?;
        for &i in member_list {
            copy.set_item_group(items[i], grouping)?;
        }
    }

    // The step-by-step history of a clustering run means nothing to an
    // editor; hand back a clean slate.
    copy.clear_history();
    Ok(copy)
}

/// Binary adjacency from connection presence, identity diagonal included.
/// Either stored direction of a logical pair counts.
fn build_adjacency(matrix: &Matrix, items: &[Uuid]) -> Vec<Vec<bool>> {
    let n = items.len();
    let alias_of = |uid: Uuid| -> Option<Uuid> {
        matrix.get_item(uid).ok().and_then(|i| i.alias_uid)
    };
    let mut adjacency = vec![vec![false; n]; n];
    for i in 0..n {
        adjacency[i][i] = true;
        for j in 0..n {
            if i == j {
                continue;
            }
            let forward = alias_of(items[j])
                .map(|col| matrix.get_connection(items[i], col).is_some())
                .unwrap_or(false);
            let backward = alias_of(items[i])
                .map(|col| matrix.get_connection(items[j], col).is_some())
                .unwrap_or(false);
            adjacency[i][j] = forward || backward;
        }
    }
    adjacency
}

fn ones(mask: &[bool]) -> f64 {
    mask.iter().filter(|&&b| b).count() as f64
}

fn and_ones(a: &[bool], b: &[bool]) -> f64 {
    a.iter().zip(b).filter(|(&x, &y)| x && y).count() as f64
}

fn and_of_rows(adjacency: &[Vec<bool>], rows: &[usize], n: usize) -> Vec<bool> {
    let mut out = vec![true; n];
    for &r in rows {
        for (slot, &bit) in out.iter_mut().zip(adjacency[r].iter()) {
            *slot = *slot && bit;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(m: &mut Matrix, names: [&str; 3]) -> Vec<Uuid> {
        let pairs: Vec<(Uuid, Uuid)> = names
            .iter()
            .map(|n| m.create_item_pair(*n).unwrap())
            .collect();
        for i in 0..3 {
            for j in (i + 1)..3 {
                m.modify_connection_symmetric(pairs[i].0, pairs[j].1, "link", 1.0, Default::default())
                    .unwrap();
            }
        }
        pairs.into_iter().map(|(r, _)| r).collect()
    }

    #[test]
    fn test_rejects_non_symmetric_matrix() {
        let m = Matrix::new(MatrixVariant::Asymmetric);
        let err = art1_cluster(&m, &Art1Params::default()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::WrongVariant {
                expected: MatrixVariant::Symmetric,
                actual: MatrixVariant::Asymmetric,
            }
        );
    }

    #[test]
    fn test_caller_matrix_is_untouched() {
        let mut m = Matrix::new(MatrixVariant::Symmetric);
        triangle(&mut m, ["a", "b", "c"]);
        let groupings_before = m.groupings().len();
        let _clustered = art1_cluster(&m, &Art1Params::default()).unwrap();
        assert_eq!(m.groupings().len(), groupings_before);
    }

    #[test]
    fn test_empty_matrix_clusters_to_itself() {
        let m = Matrix::new(MatrixVariant::Symmetric);
        let clustered = art1_cluster(&m, &Art1Params::default()).unwrap();
        assert!(clustered.rows().is_empty());
    }

    #[test]
    fn test_adjacency_has_identity_diagonal() {
        let mut m = Matrix::new(MatrixVariant::Symmetric);
        let items = triangle(&mut m, ["a", "b", "c"]);
        let adjacency = build_adjacency(&m, &items);
        for (i, row) in adjacency.iter().enumerate() {
            assert!(row[i]);
        }
        assert!(adjacency[0][1] && adjacency[1][0]);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Art1Params::default().vigilance(1.5).validate().is_err());
        assert!(Art1Params::default().beta(-0.1).validate().is_err());
        assert!(Art1Params::default().max_groups(0).validate().is_err());
        assert!(Art1Params::default().validate().is_ok());
    }

    #[test]
    fn test_palette_is_deterministic() {
        let mut m = Matrix::new(MatrixVariant::Symmetric);
        triangle(&mut m, ["a", "b", "c"]);
        let params = Art1Params::default();
        let first = art1_cluster(&m, &params).unwrap();
        let second = art1_cluster(&m, &params).unwrap();
        let colors =
            |m: &Matrix| m.groupings().iter().map(|g| g.color).collect::<Vec<_>>();
        assert_eq!(colors(&first), colors(&second));
    }
}
