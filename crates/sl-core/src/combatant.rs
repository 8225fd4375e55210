//! Combatants: the participants of an encounter.
//!
//! Characters and monsters share one struct; what differs between them
//! lives in the tagged [`CombatantKind`] variant, so hit points, defenses,
//! and turn state are always reached the same way.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hp::HpState;
use crate::id::CombatantId;
use crate::resources::ResourcePool;

/// What kind of combatant this is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CombatantKind {
    /// A player character.
    Character {
        /// Class name ("Wizard", "Paladin"), if recorded.
        class: Option<String>,
        /// Character level (1-20).
        level: u8,
    },
    /// A monster or NPC run by the director.
    Monster {
        /// Challenge rating label ("1/2", "5"), if recorded.
        challenge: Option<String>,
    },
}

impl CombatantKind {
    /// A character of the given level with no class recorded.
    pub fn character(level: u8) -> Self {
        Self::Character { class: None, level }
    }

    /// A monster with no challenge rating recorded.
    pub fn monster() -> Self {
        Self::Monster { challenge: None }
    }

    /// Returns true for the character variant.
    pub fn is_character(&self) -> bool {
        matches!(self, Self::Character { .. })
    }
}

/// Per-turn action economy flags, reset when the combatant's turn starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEconomy {
    /// The action has been spent this turn.
    pub action_used: bool,
    /// The bonus action has been spent this turn.
    pub bonus_action_used: bool,
    /// The reaction has been spent this round.
    pub reaction_used: bool,
}

impl ActionEconomy {
    /// Mark everything unused.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A participant in an encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    /// Unique identifier.
    pub id: CombatantId,
    /// Display name.
    pub name: String,
    /// Character or monster.
    pub kind: CombatantKind,
    /// Initiative roll result (d20 + modifier).
    pub initiative: i32,
    /// Dexterity modifier, the first tie-break key. Monsters entered
    /// without a statted modifier have `None`, which sorts after any
    /// present value.
    pub dexterity_mod: Option<i32>,
    /// Passive perception, the second tie-break key.
    pub passive_perception: Option<i32>,
    /// Stable insertion order, the final tie-break key. Assigned by the
    /// encounter when the combatant joins.
    pub order: u32,
    /// True while it is this combatant's turn. At most one combatant per
    /// encounter holds this.
    pub has_turn: bool,
    /// Hit-point state.
    pub hp: HpState,
    /// Per-turn action flags.
    pub action_economy: ActionEconomy,
    /// Exhaustion level (0-6). Penalties are derived, never stored.
    pub exhaustion: u8,
    /// Spell slots and class resources.
    pub resources: ResourcePool,
}

impl Combatant {
    /// Create a combatant with full HP, no defenses, and an empty pool.
    /// The insertion order is assigned when the combatant is added to an
    /// encounter.
    pub fn new(name: impl Into<String>, kind: CombatantKind, initiative: i32, max_hp: u32) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            kind,
            initiative,
            dexterity_mod: None,
            passive_perception: None,
            order: 0,
            has_turn: false,
            hp: HpState::new(max_hp),
            action_economy: ActionEconomy::default(),
            exhaustion: 0,
            resources: ResourcePool::empty(),
        }
    }

    /// Set the dexterity modifier tie-break key.
    pub fn with_dexterity_mod(mut self, modifier: i32) -> Self {
        self.dexterity_mod = Some(modifier);
        self
    }

    /// Set the passive perception tie-break key.
    pub fn with_passive_perception(mut self, perception: i32) -> Self {
        self.passive_perception = Some(perception);
        self
    }

    /// Set the resource pool.
    pub fn with_resources(mut self, resources: ResourcePool) -> Self {
        self.resources = resources;
        self
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.hp)
    }
}
