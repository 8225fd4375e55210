//! Per-combatant resource pools: spell slots and class resources.
//!
//! Pools are plain counters. The slot-table math, consumption rules, and
//! rest semantics live in the resource engine in `sl-mechanics`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which rest refreshes a class resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestKind {
    /// A short rest (roughly an hour of downtime).
    Short,
    /// A long rest (overnight).
    Long,
}

impl fmt::Display for RestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short rest"),
            Self::Long => write!(f, "long rest"),
        }
    }
}

/// A spell slot row: how many slots of one level exist and how many are
/// spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlot {
    /// Spell level of the slot (1-9).
    pub level: u8,
    /// Total slots of this level.
    pub total: u8,
    /// Slots already spent.
    pub used: u8,
}

impl SpellSlot {
    /// Slots of this level still available.
    pub fn remaining(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }
}

/// A named class resource (ki, rage, bardic inspiration, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassResource {
    /// Display name of the resource.
    pub name: String,
    /// Total uses.
    pub total: u8,
    /// Uses already spent.
    pub used: u8,
    /// Which rest refreshes this resource.
    pub reset_on: RestKind,
}

impl ClassResource {
    /// Uses still available.
    pub fn remaining(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }
}

/// A combatant's expendable resources. Persists across encounters; only
/// rest operations refresh it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    /// Spell slot rows, one per castable level.
    pub slots: Vec<SpellSlot>,
    /// Class resource rows.
    pub resources: Vec<ClassResource>,
}

impl ResourcePool {
    /// An empty pool (non-casters with no tracked resources).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the slot row for a spell level.
    pub fn slot(&self, level: u8) -> Option<&SpellSlot> {
        self.slots.iter().find(|s| s.level == level)
    }

    /// Get a mutable slot row for a spell level.
    pub fn slot_mut(&mut self, level: u8) -> Option<&mut SpellSlot> {
        self.slots.iter_mut().find(|s| s.level == level)
    }

    /// Get a class resource row by name (case-insensitive).
    pub fn resource(&self, name: &str) -> Option<&ClassResource> {
        self.resources
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Get a mutable class resource row by name (case-insensitive).
    pub fn resource_mut(&mut self, name: &str) -> Option<&mut ClassResource> {
        self.resources
            .iter_mut()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// The highest slot level with at least one slot remaining, or `None`
    /// for a dry pool.
    pub fn highest_available_slot(&self) -> Option<u8> {
        self.slots
            .iter()
            .filter(|s| s.remaining() > 0)
            .map(|s| s.level)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ResourcePool {
        ResourcePool {
            slots: vec![
                SpellSlot {
                    level: 1,
                    total: 4,
                    used: 1,
                },
                SpellSlot {
                    level: 2,
                    total: 3,
                    used: 3,
                },
            ],
            resources: vec![ClassResource {
                name: "Ki".to_string(),
                total: 5,
                used: 2,
                reset_on: RestKind::Short,
            }],
        }
    }

    #[test]
    fn slot_lookup() {
        let p = pool();
        assert_eq!(p.slot(1).unwrap().remaining(), 3);
        assert_eq!(p.slot(2).unwrap().remaining(), 0);
        assert!(p.slot(3).is_none());
    }

    #[test]
    fn resource_lookup_case_insensitive() {
        let p = pool();
        assert_eq!(p.resource("ki").unwrap().remaining(), 3);
        assert!(p.resource("Rage").is_none());
    }

    #[test]
    fn highest_available_skips_dry_levels() {
        let p = pool();
        // Level 2 is fully spent, so level 1 is the highest castable.
        assert_eq!(p.highest_available_slot(), Some(1));
    }

    #[test]
    fn empty_pool_has_nothing() {
        let p = ResourcePool::empty();
        assert!(p.highest_available_slot().is_none());
        assert!(p.slot(1).is_none());
    }

    #[test]
    fn remaining_saturates() {
        let slot = SpellSlot {
            level: 1,
            total: 2,
            used: 5,
        };
        assert_eq!(slot.remaining(), 0);
    }
}
