//! Timed effect and condition rows.
//!
//! Durations are keyed to round numbers with EXCLUSIVE end semantics: a
//! row is active while `round < end_round`, and `end_round = None` means
//! indefinite. Expiry never consults wall-clock time; the timestamps on
//! the rows are persistence metadata only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::damage::DamageType;
use crate::id::{CombatantId, ConditionId, EffectId};

/// When a recurring effect applies its tick damage during the target's
/// turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickTiming {
    /// At the start of the target's turn, before action flags reset.
    StartOfTurn,
    /// At the end of the target's turn.
    EndOfTurn,
}

/// A timed modifier attached to a combatant (a spell, an ongoing burn, a
/// blessing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    /// Unique identifier of this row.
    pub id: EffectId,
    /// The combatant the effect is on.
    pub target: CombatantId,
    /// Display name ("Bless", "Burning").
    pub name: String,
    /// Where the effect came from, if recorded.
    pub source: Option<String>,
    /// Round the effect was registered in.
    pub start_round: u32,
    /// Round the effect ends (exclusive); `None` = indefinite.
    pub end_round: Option<u32>,
    /// When the effect ticks, if it ticks at all.
    pub timing: Option<TickTiming>,
    /// Damage dealt on each tick.
    pub tick_amount: Option<u32>,
    /// Damage type of the tick damage.
    pub tick_damage_type: Option<DamageType>,
    /// True if the effect is held by concentration.
    pub concentration: bool,
    /// The combatant concentrating on this effect.
    pub concentrating: Option<CombatantId>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Effect {
    /// Create a new indefinite effect with no tick behavior.
    pub fn new(target: CombatantId, name: impl Into<String>, start_round: u32) -> Self {
        Self {
            id: EffectId::new(),
            target,
            name: name.into(),
            source: None,
            start_round,
            end_round: None,
            timing: None,
            tick_amount: None,
            tick_damage_type: None,
            concentration: false,
            concentrating: None,
            created_at: Utc::now(),
        }
    }

    /// Is the effect active at the given round?
    pub fn is_active(&self, round: u32) -> bool {
        match self.end_round {
            Some(end) => round < end,
            None => true,
        }
    }

    /// Does this effect deal damage at the given tick timing? Requires
    /// the full tick triple: timing, amount, and damage type.
    pub fn ticks_at(&self, timing: TickTiming) -> bool {
        self.timing == Some(timing)
            && self.tick_amount.is_some()
            && self.tick_damage_type.is_some()
    }
}

/// The enumerated status set.
///
/// Exhaustion enters through `Exhaustion(level)` with levels 1-6, but is
/// stored as an integer on the combatant rather than as a timed row; see
/// the ledger's registration rules in `sl-mechanics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Cannot see; attacks against have advantage.
    Blinded,
    /// Cannot attack the charmer.
    Charmed,
    /// Cannot hear.
    Deafened,
    /// One of the six exhaustion levels (1-6).
    Exhaustion(u8),
    /// Cannot willingly approach the source of fear.
    Frightened,
    /// Speed zero while held.
    Grappled,
    /// Cannot take actions or reactions.
    Incapacitated,
    /// Cannot be seen without magical aid.
    Invisible,
    /// Incapacitated and cannot move or speak.
    Paralyzed,
    /// Turned to stone.
    Petrified,
    /// Disadvantage on attacks and ability checks.
    Poisoned,
    /// On the ground; melee attacks against have advantage.
    Prone,
    /// Speed zero; attacks against have advantage.
    Restrained,
    /// Incapacitated, cannot move, automatically fails Str/Dex saves.
    Stunned,
    /// Incapacitated and prone; attacks from within 5 ft crit.
    Unconscious,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blinded => write!(f, "blinded"),
            Self::Charmed => write!(f, "charmed"),
            Self::Deafened => write!(f, "deafened"),
            Self::Exhaustion(level) => write!(f, "exhaustion {level}"),
            Self::Frightened => write!(f, "frightened"),
            Self::Grappled => write!(f, "grappled"),
            Self::Incapacitated => write!(f, "incapacitated"),
            Self::Invisible => write!(f, "invisible"),
            Self::Paralyzed => write!(f, "paralyzed"),
            Self::Petrified => write!(f, "petrified"),
            Self::Poisoned => write!(f, "poisoned"),
            Self::Prone => write!(f, "prone"),
            Self::Restrained => write!(f, "restrained"),
            Self::Stunned => write!(f, "stunned"),
            Self::Unconscious => write!(f, "unconscious"),
        }
    }
}

/// A status condition attached to a combatant, with the same exclusive
/// round-number duration semantics as [`Effect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Unique identifier of this row.
    pub id: ConditionId,
    /// The combatant the condition is on.
    pub target: CombatantId,
    /// Which condition this is.
    pub kind: ConditionKind,
    /// Round the condition ends (exclusive); `None` = indefinite.
    pub end_round: Option<u32>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Condition {
    /// Create a new indefinite condition.
    pub fn new(target: CombatantId, kind: ConditionKind) -> Self {
        Self {
            id: ConditionId::new(),
            target,
            kind,
            end_round: None,
            created_at: Utc::now(),
        }
    }

    /// Is the condition active at the given round?
    pub fn is_active(&self, round: u32) -> bool {
        match self.end_round {
            Some(end) => round < end,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_exclusive_end_round() {
        let mut effect = Effect::new(CombatantId::new(), "Bless", 3);
        effect.end_round = Some(5);
        assert!(effect.is_active(3));
        assert!(effect.is_active(4));
        assert!(!effect.is_active(5));
        assert!(!effect.is_active(6));
    }

    #[test]
    fn indefinite_effect_always_active() {
        let effect = Effect::new(CombatantId::new(), "Mage Armor", 1);
        assert!(effect.is_active(1));
        assert!(effect.is_active(9999));
    }

    #[test]
    fn ticks_at_requires_the_full_tick_triple() {
        let mut effect = Effect::new(CombatantId::new(), "Burning", 1);
        assert!(!effect.ticks_at(TickTiming::EndOfTurn));

        effect.timing = Some(TickTiming::EndOfTurn);
        effect.tick_amount = Some(3);
        assert!(!effect.ticks_at(TickTiming::EndOfTurn));

        effect.tick_damage_type = Some(DamageType::Fire);
        assert!(effect.ticks_at(TickTiming::EndOfTurn));
        assert!(!effect.ticks_at(TickTiming::StartOfTurn));
    }

    #[test]
    fn condition_exclusive_end_round() {
        let mut condition = Condition::new(CombatantId::new(), ConditionKind::Stunned);
        condition.end_round = Some(2);
        assert!(condition.is_active(1));
        assert!(!condition.is_active(2));
    }

    #[test]
    fn condition_kind_display() {
        assert_eq!(ConditionKind::Prone.to_string(), "prone");
        assert_eq!(ConditionKind::Exhaustion(3).to_string(), "exhaustion 3");
    }

    #[test]
    fn condition_kind_serde_round_trip() {
        let kind = ConditionKind::Exhaustion(2);
        let json = serde_json::to_string(&kind).unwrap();
        let back: ConditionKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, back);
    }
}
