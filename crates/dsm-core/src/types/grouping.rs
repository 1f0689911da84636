//! Grouping: a named, colored classification bucket for items.
//!
//! Groupings serve two roles: the primary classification of an item inside
//! one matrix (or inside one domain of a multi-domain matrix), and the
//! domain partition itself (domains are groupings used coarsely). Every
//! grouping table carries a sentinel default that cannot be deleted, only
//! emptied into.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color::Color;

/// Name of the sentinel default grouping.
pub const DEFAULT_GROUPING_NAME: &str = "default";

/// Priority of the sentinel default grouping. Lowest value sorts first.
pub const DEFAULT_GROUPING_PRIORITY: u32 = 0;

/// A named, colored classification bucket assignable to items.
///
/// Groupings are owned by the matrix (or by a domain inside a multi-domain
/// matrix) and referenced from items by uid.
///
/// # Example
///
/// ```
/// use dsm_core::types::{Color, Grouping};
///
/// let g = Grouping::new("power train", Color::new(200, 60, 60), Color::BLACK, 3);
/// assert_eq!(g.name, "power train");
/// assert!(!g.is_default());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    /// Stable identity.
    pub uid: Uuid,
    /// Ordering key; the default grouping always sorts first.
    pub priority: u32,
    /// Display name.
    pub name: String,
    /// Cell fill color.
    pub color: Color,
    /// Cell text color.
    pub font_color: Color,
}

impl Grouping {
    /// Create a grouping with a fresh uid.
    pub fn new(name: impl Into<String>, color: Color, font_color: Color, priority: u32) -> Self {
        Self {
            uid: Uuid::new_v4(),
            priority,
            name: name.into(),
            color,
            font_color,
        }
    }

    /// Create the sentinel default grouping for a fresh grouping table.
    pub fn sentinel_default() -> Self {
        Self::new(
            DEFAULT_GROUPING_NAME,
            Color::WHITE,
            Color::BLACK,
            DEFAULT_GROUPING_PRIORITY,
        )
    }

    /// Whether this grouping is a sentinel default.
    ///
    /// The check is by priority, not by name: renamed user groupings may
    /// collide with the default's name, but priority 0 is reserved.
    pub fn is_default(&self) -> bool {
        self.priority == DEFAULT_GROUPING_PRIORITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_default_shape() {
        let g = Grouping::sentinel_default();
        assert_eq!(g.name, DEFAULT_GROUPING_NAME);
        assert_eq!(g.priority, DEFAULT_GROUPING_PRIORITY);
        assert!(g.is_default());
        assert_eq!(g.color, Color::WHITE);
    }

    #[test]
    fn test_fresh_uids_are_distinct() {
        let a = Grouping::sentinel_default();
        let b = Grouping::sentinel_default();
        assert_ne!(a.uid, b.uid);
    }
}
