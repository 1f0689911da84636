//! Multi-domain surface: domain partitioning and zoom export/import.
//!
//! A multi-domain matrix pairs items like a symmetric one, but every item
//! additionally belongs to exactly one domain, and each domain owns an
//! isolated grouping taxonomy with its own sentinel default. A domain-pair
//! sub-matrix can be exported as a standalone symmetric or asymmetric
//! matrix ("zoom"), edited in isolation, and merged back.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DsmError, DsmResult};
use crate::history::ChangeOp;
use crate::types::{Color, Connection, Grouping, Item};

use super::{Matrix, MatrixVariant};

impl Matrix {
    /// Registered domains, in registration order.
    pub fn domains(&self) -> &[Grouping] {
        &self.state_ref().domains
    }

    /// The grouping table owned by a domain.
    pub fn domain_groupings(&self, domain: Uuid) -> DsmResult<&[Grouping]> {
        self.state_ref()
            .domain_groupings
            .get(&domain)
            .map(|t| t.as_slice())
            .ok_or(DsmError::DomainNotFound(domain))
    }

    /// Look up a domain by name.
    pub fn get_domain_by_name(&self, name: &str) -> Option<&Grouping> {
        self.state_ref().domains.iter().find(|d| d.name == name)
    }

    /// Register a domain with a fresh grouping table. Returns the existing
    /// domain's uid when the name is already registered.
    pub fn add_domain(&mut self, name: impl Into<String>) -> DsmResult<Uuid> {
        if self.variant() != MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        let name = name.into();
        if let Some(existing) = self.get_domain_by_name(&name) {
            debug!(domain = %name, "domain already registered");
            return Ok(existing.uid);
        }
        let priority = self
            .state_ref()
            .domains
            .iter()
            .map(|d| d.priority)
            .max()
            .unwrap_or(0)
            + 1;
        let domain = Grouping::new(name, Color::WHITE, Color::BLACK, priority);
        let uid = domain.uid;
        self.record(ChangeOp::AddDomain {
            domain,
            groupings: vec![Grouping::sentinel_default()],
        });
        Ok(uid)
    }

    /// Unregister a domain and its grouping table.
    ///
    /// Silent no-op when the domain is the last one remaining or still has
    /// items in it.
    pub fn remove_domain(&mut self, uid: Uuid) -> DsmResult<()> {
        if self.variant() != MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        let domain = self
            .state_ref()
            .domain(uid)
            .ok_or(DsmError::DomainNotFound(uid))?
            .clone();
        if self.state_ref().domains.len() == 1 {
            warn!(%uid, "refusing to remove the last remaining domain");
            return Ok(());
        }
        let occupied = self
            .state_ref()
            .rows
            .iter()
            .any(|i| i.domain == Some(uid));
        if occupied {
            warn!(%uid, "refusing to remove a domain that still has items");
            return Ok(());
        }
        let groupings = self
            .state_ref()
            .domain_groupings
            .get(&uid)
            .cloned()
            .unwrap_or_default();
        self.record(ChangeOp::RemoveDomain { domain, groupings });
        Ok(())
    }

    /// Add a grouping to a domain's table.
    pub fn add_domain_grouping(
        &mut self,
        domain: Uuid,
        name: impl Into<String>,
        color: Color,
        font_color: Color,
    ) -> DsmResult<Uuid> {
        if self.variant() != MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        if self.state_ref().domain(domain).is_none() {
            return Err(DsmError::DomainNotFound(domain));
        }
        let priority = self.state_ref().next_grouping_priority(Some(domain));
        let grouping = Grouping::new(name, color, font_color, priority);
        let uid = grouping.uid;
        self.record(ChangeOp::AddGrouping {
            domain: Some(domain),
            grouping,
        });
        Ok(uid)
    }

    /// Remove a grouping from a domain's table, emptying its members into
    /// that domain's sentinel default. Removing the default itself is a
    /// silent no-op.
    pub fn remove_domain_grouping(&mut self, domain: Uuid, uid: Uuid) -> DsmResult<()> {
        if self.variant() != MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        let grouping = self
            .state_ref()
            .grouping(Some(domain), uid)
            .ok_or(DsmError::GroupingNotFound(uid))?
            .clone();
        if grouping.is_default() {
            warn!(%uid, "refusing to remove a domain's sentinel default grouping");
            return Ok(());
        }
        let fallback = self
            .state_ref()
            .default_of(Some(domain))
            .ok_or(DsmError::DomainNotFound(domain))?;
        let members: Vec<Uuid> = self
            .state_ref()
            .rows
            .iter()
            .chain(self.state_ref().cols.iter())
            .filter(|i| i.group == uid)
            .map(|i| i.uid)
            .collect();
        self.record(ChangeOp::RemoveGrouping {
            domain: Some(domain),
            grouping,
            members,
            fallback,
        });
        Ok(())
    }

    /// Create an aliased row/column pair inside a domain, auto-registering
    /// the domain when the name is new. The pair starts in the domain's
    /// default grouping. Returns `(row_uid, col_uid)`.
    pub fn create_item_in_domain(
        &mut self,
        name: impl Into<String>,
        domain_name: &str,
    ) -> DsmResult<(Uuid, Uuid)> {
        if self.variant() != MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        let domain = self.add_domain(domain_name)?;
        let group = self
            .state_ref()
            .default_of(Some(domain))
            .ok_or(DsmError::DomainNotFound(domain))?;
        let sort_index = self.state_ref().next_sort_index(true);
        let (row, col) = Item::new_pair(name, sort_index, group);
        let (row, col) = (row.with_domain(domain), col.with_domain(domain));
        let uids = (row.uid, col.uid);
        let op = ChangeOp::InsertPair {
            row_index: self.state_ref().rows.len(),
            col_index: self.state_ref().cols.len(),
            row,
            col,
        };
        self.record(op);
        Ok(uids)
    }

    // ------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------

    /// Project the sub-matrix whose rows lie in `from` and columns in `to`
    /// into a standalone matrix: symmetric when the domains are equal,
    /// asymmetric otherwise.
    ///
    /// Items, connections, and groupings are copied by value; uids are
    /// preserved so [`Matrix::import_zoom`] can merge edits back. The copy
    /// starts with empty history and a clean dirty flag.
    pub fn export_zoom(&self, from: Uuid, to: Uuid) -> DsmResult<Matrix> {
        if self.variant() != MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        let from_domain = self
            .state_ref()
            .domain(from)
            .ok_or(DsmError::DomainNotFound(from))?
            .clone();
        let to_domain = self
            .state_ref()
            .domain(to)
            .ok_or(DsmError::DomainNotFound(to))?
            .clone();
        let symmetric = from == to;

        let mut out = Matrix::new(if symmetric {
            MatrixVariant::Symmetric
        } else {
            MatrixVariant::Asymmetric
        });

        // Grouping tables, by value with preserved uids. For a cross-domain
        // export both tables are merged; the extra sentinel stays protected
        // from deletion but only `from`'s becomes the table default.
        let mut table = self
            .state_ref()
            .domain_groupings
            .get(&from)
            .cloned()
            .unwrap_or_default();
        if !symmetric {
            for g in self
                .state_ref()
                .domain_groupings
                .get(&to)
                .cloned()
                .unwrap_or_default()
            {
                if !table.iter().any(|x| x.uid == g.uid) {
                    table.push(g);
                }
            }
        }
        let default = table
            .iter()
            .find(|g| g.is_default())
            .map(|g| g.uid)
            .unwrap_or(out.state_ref().default_grouping);

        let rows: Vec<Item> = self
            .state_ref()
            .rows
            .iter()
            .filter(|i| i.domain == Some(from))
            .cloned()
            .map(|mut i| {
                i.domain = None;
                if !symmetric {
                    i.alias_uid = None;
                }
                i
            })
            .collect();
        let cols: Vec<Item> = self
            .state_ref()
            .cols
            .iter()
            .filter(|i| i.domain == Some(to))
            .cloned()
            .map(|mut i| {
                i.domain = None;
                if !symmetric {
                    i.alias_uid = None;
                }
                i
            })
            .collect();
        let row_uids: BTreeSet<Uuid> = rows.iter().map(|i| i.uid).collect();
        let col_uids: BTreeSet<Uuid> = cols.iter().map(|i| i.uid).collect();

        let state = out.state_mut();
        state.groupings = table;
        state.default_grouping = default;
        state.rows = rows;
        state.cols = cols;
        for conn in self.state_ref().connections.values() {
            if row_uids.contains(&conn.row_uid) && col_uids.contains(&conn.col_uid) {
                state.connections.insert(conn.key(), conn.clone());
            }
        }
        state.metadata.title = format!("{} / {}", from_domain.name, to_domain.name);
        state.metadata.project_name = self.state_ref().metadata.project_name.clone();
        state.metadata.customer = self.state_ref().metadata.customer.clone();
        state.metadata.version_number = self.state_ref().metadata.version_number.clone();

        debug!(
            rows = out.rows().len(),
            cols = out.cols().len(),
            connections = out.connection_count(),
            "zoom exported"
        );
        Ok(out)
    }

    /// Merge an exported (and possibly edited) sub-matrix back into the
    /// `(from, to)` domain pair.
    ///
    /// For every imported item, an item that still exists under the same
    /// uid is updated in place (name, sort index, group); a new uid is
    /// inserted as a fresh aliased pair in the owning domain; items that
    /// were in the domain before the merge but are absent from the import
    /// are deleted. The `(from, to)` connection block is replaced
    /// wholesale. A symmetric sub-matrix reconciles its pairs against
    /// `from`; an asymmetric one reconciles rows against `from` and
    /// columns against `to` independently.
    ///
    /// Every step is change-tracked; the caller checkpoints the merge as
    /// one user-visible operation.
    pub fn import_zoom(&mut self, sub: &Matrix, from: Uuid, to: Uuid) -> DsmResult<()> {
        if self.variant() != MatrixVariant::MultiDomain {
            return Err(DsmError::UnsupportedVariant(self.variant()));
        }
        if self.state_ref().domain(from).is_none() {
            return Err(DsmError::DomainNotFound(from));
        }
        if self.state_ref().domain(to).is_none() {
            return Err(DsmError::DomainNotFound(to));
        }
        let symmetric = from == to;
        let expected = if symmetric {
            MatrixVariant::Symmetric
        } else {
            MatrixVariant::Asymmetric
        };
        if sub.variant() != expected {
            return Err(DsmError::UnsupportedVariant(sub.variant()));
        }

        self.merge_zoom_groupings(sub, from, to);
        if symmetric {
            self.merge_zoom_side(sub, true, from)?;
        } else {
            self.merge_zoom_side(sub, true, from)?;
            self.merge_zoom_side(sub, false, to)?;
        }
        self.replace_zoom_connections(sub, from, to);
        debug!(%from, %to, "zoom imported");
        Ok(())
    }

    /// Carry groupings the sub-matrix introduced (e.g. by clustering) into
    /// the owning domain tables. Sentinels never travel; existing uids are
    /// left untouched.
    fn merge_zoom_groupings(&mut self, sub: &Matrix, from: Uuid, to: Uuid) {
        let row_refs: BTreeSet<Uuid> = sub.rows().iter().map(|i| i.group).collect();
        for g in sub.groupings().to_vec() {
            if g.is_default() {
                continue;
            }
            let known = self.state_ref().grouping(Some(from), g.uid).is_some()
                || self.state_ref().grouping(Some(to), g.uid).is_some();
            if known {
                continue;
            }
            // Cross-domain exports carry both taxonomies; attribute new
            // groupings to the side that references them.
            let target = if from != to && !row_refs.contains(&g.uid) {
                to
            } else {
                from
            };
            self.record(ChangeOp::AddGrouping {
                domain: Some(target),
                grouping: g,
            });
        }
    }

    /// Reconcile one side of the import against one domain: delete absent
    /// items, update existing ones, insert new pairs.
    fn merge_zoom_side(&mut self, sub: &Matrix, rows_side: bool, domain: Uuid) -> DsmResult<()> {
        let sub_items: Vec<Item> = if rows_side {
            sub.rows().to_vec()
        } else {
            sub.cols().to_vec()
        };
        let sub_uids: BTreeSet<Uuid> = sub_items.iter().map(|i| i.uid).collect();

        let existing: Vec<Uuid> = {
            let items = if rows_side {
                &self.state_ref().rows
            } else {
                &self.state_ref().cols
            };
            items
                .iter()
                .filter(|i| i.domain == Some(domain))
                .map(|i| i.uid)
                .collect()
        };
        for uid in existing {
            if !sub_uids.contains(&uid) {
                self.delete_item(uid)?;
            }
        }

        for s in sub_items {
            let group = self.resolve_imported_group(domain, s.group);
            let current = self.state_ref().item(s.uid).map(|i| {
                (i.name.clone(), i.sort_index, i.group)
            });
            match current {
                Some((name, sort_index, current_group)) => {
                    if name != s.name {
                        self.set_item_name(s.uid, s.name.clone())?;
                    }
                    if sort_index != s.sort_index {
                        self.set_item_sort_index(s.uid, s.sort_index)?;
                    }
                    if current_group != group {
                        self.set_item_group(s.uid, group)?;
                    }
                }
                None => {
                    let (row_uid, col_uid) = if rows_side {
                        (s.uid, s.alias_uid.unwrap_or_else(Uuid::new_v4))
                    } else {
                        (s.alias_uid.unwrap_or_else(Uuid::new_v4), s.uid)
                    };
                    let row = Item {
                        uid: row_uid,
                        alias_uid: Some(col_uid),
                        name: s.name.clone(),
                        sort_index: s.sort_index,
                        group,
                        domain: Some(domain),
                    };
                    let col = Item {
                        uid: col_uid,
                        alias_uid: Some(row_uid),
                        ..row.clone()
                    };
                    let op = ChangeOp::InsertPair {
                        row_index: self.state_ref().rows.len(),
                        col_index: self.state_ref().cols.len(),
                        row,
                        col,
                    };
                    self.record(op);
                }
            }
        }
        Ok(())
    }

    /// Delete the `(from, to)` connection block, then copy the sub-matrix
    /// connections in.
    fn replace_zoom_connections(&mut self, sub: &Matrix, from: Uuid, to: Uuid) {
        let block: Vec<Connection> = self
            .state_ref()
            .connections
            .values()
            .filter(|c| {
                self.item_domain(c.row_uid) == Some(from) && self.item_domain(c.col_uid) == Some(to)
            })
            .cloned()
            .collect();
        for conn in block {
            self.record(ChangeOp::SetConnection {
                row_uid: conn.row_uid,
                col_uid: conn.col_uid,
                old: Some(conn),
                new: None,
            });
        }
        for conn in sub.connections().cloned().collect::<Vec<_>>() {
            if !self.state_ref().is_row(conn.row_uid) || !self.state_ref().is_col(conn.col_uid) {
                warn!(row_uid = %conn.row_uid, col_uid = %conn.col_uid,
                    "imported connection references no surviving endpoint, skipping");
                continue;
            }
            self.record(ChangeOp::SetConnection {
                row_uid: conn.row_uid,
                col_uid: conn.col_uid,
                old: None,
                new: Some(conn),
            });
        }
    }

    fn resolve_imported_group(&self, domain: Uuid, group: Uuid) -> Uuid {
        if self.state_ref().grouping(Some(domain), group).is_some() {
            return group;
        }
        let fallback = self.state_ref().default_of(Some(domain)).unwrap_or(group);
        warn!(%group, %domain, "imported grouping unknown in domain, falling back to default");
        fallback
    }

    fn item_domain(&self, uid: Uuid) -> Option<Uuid> {
        self.state_ref().item(uid).and_then(|i| i.domain)
    }
}
