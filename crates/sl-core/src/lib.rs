//! Core types for Spielleiter: combatants, encounters, effects, and
//! resource pools.
//!
//! This crate defines the data model the encounter engine operates on. It
//! carries no game-rule logic beyond structural invariants (HP bounds,
//! exclusive end-round activity, stable insertion order); turn scheduling,
//! ticking, damage resolution, and resource math live in `sl-mechanics`.

/// Combatant types and per-turn action flags.
pub mod combatant;
/// Damage type tags.
pub mod damage;
/// Timed effect and condition rows.
pub mod effect;
/// The encounter aggregate.
pub mod encounter;
/// Error types used throughout the crate.
pub mod error;
/// Hit-point state and death saves.
pub mod hp;
/// Identifier newtypes.
pub mod id;
/// Spell slots and class resources.
pub mod resources;

/// Re-export combatant types.
pub use combatant::{ActionEconomy, Combatant, CombatantKind};
/// Re-export damage type tags.
pub use damage::DamageType;
/// Re-export effect and condition rows.
pub use effect::{Condition, ConditionKind, Effect, TickTiming};
/// Re-export the encounter aggregate.
pub use encounter::Encounter;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export hit-point state.
pub use hp::{DeathSaves, HpState};
/// Re-export identifier newtypes.
pub use id::{CombatantId, ConditionId, EffectId, EncounterId};
/// Re-export resource pool types.
pub use resources::{ClassResource, ResourcePool, RestKind, SpellSlot};
