use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::effect::{Condition, Effect};
use crate::error::{CoreError, CoreResult};
use crate::id::{CombatantId, ConditionId, EffectId, EncounterId};

/// An encounter: the aggregate the scheduler and pipeline mutate.
///
/// Owns the ordered combatant list and the effect/condition rows attached
/// to it. The combatant list is kept in initiative order by the scheduler
/// in `sl-mechanics`; this type only stores and looks things up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    /// Unique identifier.
    pub id: EncounterId,
    /// Display name ("Ambush at the ford").
    pub name: String,
    /// Current round, 1-based. Monotonic except explicit manual rollback.
    pub round: u32,
    /// False once the encounter has been wrapped up.
    pub active: bool,
    /// Bumped once per committed mutation; the idempotency marker for
    /// turn-advance requests.
    pub version: u64,
    /// Combatants in initiative order.
    pub combatants: Vec<Combatant>,
    /// Timed effect rows for this encounter.
    pub effects: Vec<Effect>,
    /// Condition rows for this encounter.
    pub conditions: Vec<Condition>,
    /// Next insertion-order key to hand out.
    next_order: u32,
    /// When the encounter was created.
    pub created_at: DateTime<Utc>,
    /// When the encounter was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Encounter {
    /// Create a new empty encounter at round 1.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EncounterId::new(),
            name: name.into(),
            round: 1,
            active: true,
            version: 0,
            combatants: Vec::new(),
            effects: Vec::new(),
            conditions: Vec::new(),
            next_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // -----------------------------------------------------------------------
    // Combatants
    // -----------------------------------------------------------------------

    /// Append a combatant, assigning it the next stable insertion-order
    /// key. Callers go through the scheduler's `add_combatant`, which
    /// re-sorts the list afterwards.
    pub fn push_combatant(&mut self, mut combatant: Combatant) -> CombatantId {
        combatant.order = self.next_order;
        self.next_order += 1;
        let id = combatant.id;
        self.combatants.push(combatant);
        id
    }

    /// Get a combatant by ID.
    pub fn combatant(&self, id: CombatantId) -> CoreResult<&Combatant> {
        self.combatants
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoreError::CombatantNotFound(id))
    }

    /// Get a mutable combatant by ID.
    pub fn combatant_mut(&mut self, id: CombatantId) -> CoreResult<&mut Combatant> {
        self.combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::CombatantNotFound(id))
    }

    /// Remove a combatant, along with every effect row targeting it or
    /// held by its concentration and every condition row targeting it.
    /// Turn-flag reassignment is the scheduler's job.
    pub fn take_combatant(&mut self, id: CombatantId) -> CoreResult<Combatant> {
        let index = self
            .combatants
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::CombatantNotFound(id))?;
        let combatant = self.combatants.remove(index);

        self.effects
            .retain(|e| e.target != id && e.concentrating != Some(id));
        self.conditions.retain(|c| c.target != id);

        Ok(combatant)
    }

    /// Index of the combatant currently holding the turn flag.
    pub fn current_index(&self) -> Option<usize> {
        self.combatants.iter().position(|c| c.has_turn)
    }

    /// The combatant currently holding the turn flag.
    pub fn current(&self) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.has_turn)
    }

    /// Number of combatants.
    pub fn combatant_count(&self) -> usize {
        self.combatants.len()
    }

    /// True once a turn flag has been assigned (combat has started).
    pub fn has_started(&self) -> bool {
        self.current_index().is_some()
    }

    // -----------------------------------------------------------------------
    // Effect and condition rows
    // -----------------------------------------------------------------------

    /// Append an effect row.
    pub fn add_effect(&mut self, effect: Effect) -> EffectId {
        let id = effect.id;
        self.effects.push(effect);
        id
    }

    /// Append a condition row.
    pub fn add_condition(&mut self, condition: Condition) -> ConditionId {
        let id = condition.id;
        self.conditions.push(condition);
        id
    }

    /// Get an effect row by ID.
    pub fn effect(&self, id: EffectId) -> CoreResult<&Effect> {
        self.effects
            .iter()
            .find(|e| e.id == id)
            .ok_or(CoreError::EffectNotFound(id))
    }

    /// Remove an effect row by ID.
    pub fn remove_effect(&mut self, id: EffectId) -> CoreResult<Effect> {
        let index = self
            .effects
            .iter()
            .position(|e| e.id == id)
            .ok_or(CoreError::EffectNotFound(id))?;
        Ok(self.effects.remove(index))
    }

    /// Remove a condition row by ID.
    pub fn remove_condition(&mut self, id: ConditionId) -> CoreResult<Condition> {
        let index = self
            .conditions
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::ConditionNotFound(id))?;
        Ok(self.conditions.remove(index))
    }

    /// Effect rows on a combatant that are active at the given round.
    pub fn active_effects_on(&self, target: CombatantId, round: u32) -> Vec<&Effect> {
        self.effects
            .iter()
            .filter(|e| e.target == target && e.is_active(round))
            .collect()
    }

    /// Condition rows on a combatant that are active at the given round.
    pub fn active_conditions_on(&self, target: CombatantId, round: u32) -> Vec<&Condition> {
        self.conditions
            .iter()
            .filter(|c| c.target == target && c.is_active(round))
            .collect()
    }

    /// True if any effect row is held by the given combatant's
    /// concentration and active at the given round.
    pub fn is_concentrating(&self, caster: CombatantId, round: u32) -> bool {
        self.effects
            .iter()
            .any(|e| e.concentration && e.concentrating == Some(caster) && e.is_active(round))
    }

    // -----------------------------------------------------------------------
    // Commit bookkeeping
    // -----------------------------------------------------------------------

    /// Record a committed mutation: bump the version marker and the
    /// updated-at timestamp.
    pub fn bump_version(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}
