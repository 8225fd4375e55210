//! Exhaustion penalties.
//!
//! Exhaustion is a single integer level (0-6) stored on the combatant;
//! the penalty set is a pure function of the level, cumulative from
//! level 1 up. Nothing here is stored as a timed effect.

use serde::{Deserialize, Serialize};

/// The cumulative penalty set for an exhaustion level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhaustionPenalties {
    /// Level 1+: disadvantage on ability checks.
    pub disadvantage_on_checks: bool,
    /// Level 2+: speed halved.
    pub speed_halved: bool,
    /// Level 3+: disadvantage on attack rolls and saving throws.
    pub disadvantage_on_attacks_and_saves: bool,
    /// Level 4+: hit point maximum halved.
    pub max_hp_halved: bool,
    /// Level 5+: speed reduced to 0.
    pub speed_zero: bool,
    /// Level 6: death.
    pub dead: bool,
}

/// Compute the penalties for an exhaustion level. Levels above 6 are
/// treated as 6.
pub fn penalties(level: u8) -> ExhaustionPenalties {
    ExhaustionPenalties {
        disadvantage_on_checks: level >= 1,
        speed_halved: level >= 2,
        disadvantage_on_attacks_and_saves: level >= 3,
        max_hp_halved: level >= 4,
        speed_zero: level >= 5,
        dead: level >= 6,
    }
}
