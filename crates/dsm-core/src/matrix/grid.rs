//! Read-only 2-D grid projection for rendering collaborators.
//!
//! The projection is re-derived from scratch on every call; there is no
//! incremental diff. Collaborators treat the result as read-only and call
//! [`Matrix::grid`] again after every mutation.
//!
//! # Layout
//!
//! Symmetric/asymmetric matrices produce one header row followed by one
//! row per row item:
//!
//! ```text
//! | Grouping | Name | <sort> | col name (vertical) ... |
//! | group    | name | 1      | connection cells ...    |
//! ```
//!
//! Multi-domain matrices prepend a domain column whose label cell spans
//! the domain's contiguous row block; continuation rows carry an empty
//! placeholder in that column. Rows and columns are ordered by sort index
//! (and, for multi-domain, grouped by domain first).

use uuid::Uuid;

use crate::types::Item;

use super::{Matrix, MatrixVariant};

/// What a grid cell is and how it may be edited.
#[derive(Debug, Clone, PartialEq)]
pub enum CellKind {
    /// Uneditable text, horizontally or vertically rendered.
    Text {
        /// Render rotated 90° when true.
        vertical: bool,
    },
    /// An item's name, horizontally or vertically rendered; editing it
    /// renames the item.
    ItemName {
        /// The named item.
        uid: Uuid,
        /// Render rotated 90° when true.
        vertical: bool,
    },
    /// The grouping classification of a row item.
    GroupingCell {
        /// The classified item.
        uid: Uuid,
    },
    /// The sort index of a row item.
    SortIndexCell {
        /// The sorted item.
        uid: Uuid,
    },
    /// An editable connection cell addressed by its endpoints.
    Connection {
        /// Row endpoint.
        row_uid: Uuid,
        /// Column endpoint.
        col_uid: Uuid,
    },
    /// An uneditable connection cell: the diagonal where a row item meets
    /// its own aliased column.
    ReadOnlyConnection,
    /// A domain label spanning a contiguous block of rows (multi-domain
    /// only). Continuation rows of the block carry empty `Text` cells.
    DomainLabel {
        /// The labelled domain.
        uid: Uuid,
        /// Number of grid rows the label spans.
        span: usize,
    },
}

/// One cell of the projection: its kind plus the display label.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// What the cell is.
    pub kind: CellKind,
    /// Pre-rendered display text.
    pub label: String,
}

impl GridCell {
    fn text(label: impl Into<String>, vertical: bool) -> Self {
        Self {
            kind: CellKind::Text { vertical },
            label: label.into(),
        }
    }
}

impl Matrix {
    /// Project the matrix into an ordered 2-D cell structure.
    pub fn grid(&self) -> Vec<Vec<GridCell>> {
        let mut rows: Vec<Item> = self.rows().to_vec();
        let mut cols: Vec<Item> = self.cols().to_vec();
        let multi_domain = self.variant() == MatrixVariant::MultiDomain;

        if multi_domain {
            // Keep each domain's block contiguous, in domain registration
            // order, sorted by sort index inside the block.
            let order: Vec<Uuid> = self.domains().iter().map(|d| d.uid).collect();
            let domain_rank =
                |i: &Item| i.domain.and_then(|d| order.iter().position(|u| *u == d)).unwrap_or(usize::MAX);
            rows.sort_by(|a, b| {
                domain_rank(a)
                    .cmp(&domain_rank(b))
                    .then(a.sort_index.partial_cmp(&b.sort_index).unwrap_or(std::cmp::Ordering::Equal))
            });
            cols.sort_by(|a, b| {
                domain_rank(a)
                    .cmp(&domain_rank(b))
                    .then(a.sort_index.partial_cmp(&b.sort_index).unwrap_or(std::cmp::Ordering::Equal))
            });
        } else {
            rows.sort_by(|a, b| a.sort_index.partial_cmp(&b.sort_index).unwrap_or(std::cmp::Ordering::Equal));
            cols.sort_by(|a, b| a.sort_index.partial_cmp(&b.sort_index).unwrap_or(std::cmp::Ordering::Equal));
        }

        let mut grid = Vec::with_capacity(rows.len() + 1);

        // Header row.
        let mut header = Vec::with_capacity(cols.len() + 4);
        if multi_domain {
            header.push(GridCell::text("Domain", false));
        }
        header.push(GridCell::text("Grouping", false));
        header.push(GridCell::text("Name", false));
        header.push(GridCell::text("", false));
        for col in &cols {
            header.push(GridCell {
                kind: CellKind::ItemName {
                    uid: col.uid,
                    vertical: true,
                },
                label: col.name.clone(),
            });
        }
        grid.push(header);

        // Data rows.
        for (pos, row) in rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(cols.len() + 4);
            if multi_domain {
                let is_block_start = pos == 0 || rows[pos - 1].domain != row.domain;
                if is_block_start {
                    let span = rows[pos..]
                        .iter()
                        .take_while(|i| i.domain == row.domain)
                        .count();
                    let (uid, label) = match row.domain.and_then(|d| self.state_ref().domain(d)) {
                        Some(d) => (d.uid, d.name.clone()),
                        None => (Uuid::nil(), String::new()),
                    };
                    cells.push(GridCell {
                        kind: CellKind::DomainLabel { uid, span },
                        label,
                    });
                } else {
                    cells.push(GridCell::text("", false));
                }
            }

            let group_label = self
                .get_grouping(row.group)
                .map(|g| g.name.clone())
                .unwrap_or_default();
            cells.push(GridCell {
                kind: CellKind::GroupingCell { uid: row.uid },
                label: group_label,
            });
            cells.push(GridCell {
                kind: CellKind::ItemName {
                    uid: row.uid,
                    vertical: false,
                },
                label: row.name.clone(),
            });
            cells.push(GridCell {
                kind: CellKind::SortIndexCell { uid: row.uid },
                label: format!("{}", row.sort_index),
            });

            for col in &cols {
                if row.alias_uid == Some(col.uid) {
                    cells.push(GridCell {
                        kind: CellKind::ReadOnlyConnection,
                        label: String::new(),
                    });
                } else {
                    let label = self
                        .get_connection(row.uid, col.uid)
                        .map(|c| c.name.clone())
                        .unwrap_or_default();
                    cells.push(GridCell {
                        kind: CellKind::Connection {
                            row_uid: row.uid,
                            col_uid: col.uid,
                        },
                        label,
                    });
                }
            }
            grid.push(cells);
        }

        grid
    }
}
