use std::fmt;

use serde::{Deserialize, Serialize};

/// The thirteen damage type tags consulted during damage resolution.
///
/// A combatant's resistance, vulnerability, and immunity sets are sets of
/// these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Blunt force: hammers, falling, constriction.
    Bludgeoning,
    /// Puncturing: spears, bites, arrows.
    Piercing,
    /// Cutting: swords, axes, claws.
    Slashing,
    /// Corrosive liquids and sprays.
    Acid,
    /// Freezing cold.
    Cold,
    /// Flame and heat.
    Fire,
    /// Pure magical energy.
    Force,
    /// Electrical discharge.
    Lightning,
    /// Withering, life-draining energy.
    Necrotic,
    /// Toxins and venoms.
    Poison,
    /// Mind-rending energy.
    Psychic,
    /// Searing divine light.
    Radiant,
    /// Concussive bursts of sound.
    Thunder,
}

impl DamageType {
    /// All damage types, in display order.
    pub const ALL: [DamageType; 13] = [
        Self::Bludgeoning,
        Self::Piercing,
        Self::Slashing,
        Self::Acid,
        Self::Cold,
        Self::Fire,
        Self::Force,
        Self::Lightning,
        Self::Necrotic,
        Self::Poison,
        Self::Psychic,
        Self::Radiant,
        Self::Thunder,
    ];

    /// Parse a damage type from its lowercase name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.to_string() == s.to_lowercase())
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bludgeoning => "bludgeoning",
            Self::Piercing => "piercing",
            Self::Slashing => "slashing",
            Self::Acid => "acid",
            Self::Cold => "cold",
            Self::Fire => "fire",
            Self::Force => "force",
            Self::Lightning => "lightning",
            Self::Necrotic => "necrotic",
            Self::Poison => "poison",
            Self::Psychic => "psychic",
            Self::Radiant => "radiant",
            Self::Thunder => "thunder",
        };
        write!(f, "{name}")
    }
}
