//! The director's command surface.
//!
//! Every operation is one serializable unit: authorize, load the
//! encounter from the store, mutate a private copy through the engine,
//! and only on success bump the version, save, and publish the events.
//! A failure anywhere leaves the stored encounter untouched — there is no
//! partial commit, and the engine performs no internal retries.

use sl_core::{
    Combatant, CombatantId, DamageType, DeathSaves, EffectId, Encounter, EncounterId, RestKind,
};
use sl_mechanics::ledger::{ConditionSpec, EffectSpec, RegisteredCondition};
use sl_mechanics::{EncounterEvent, EncounterEventKind, damage, ledger, resources, turn};

use crate::auth::{AccessPolicy, ActorId};
use crate::broadcast::EventSink;
use crate::error::{SessionError, SessionResult};
use crate::store::EncounterStore;

/// The shape returned by turn movement operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    /// The round after the movement.
    pub new_round: u32,
    /// True if the movement crossed a round boundary.
    pub is_new_round: bool,
    /// Display name of the combatant whose turn it now is.
    pub next_combatant_name: String,
}

/// The shape returned by a damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageReport {
    /// The amount that actually landed, after modifiers.
    pub final_amount_applied: u32,
    /// True if the target was concentrating and must now save.
    pub concentration_check_required: bool,
    /// The save DC, when a check is required.
    pub concentration_dc: Option<u32>,
}

/// A session over an encounter store: the single mutation path for the
/// director, and the read path for observers.
pub struct Session<S, P, B> {
    store: S,
    policy: P,
    sink: B,
}

impl<S, P, B> Session<S, P, B>
where
    S: EncounterStore,
    P: AccessPolicy,
    B: EventSink,
{
    /// Create a session over the given collaborators.
    pub fn new(store: S, policy: P, sink: B) -> Self {
        Self { store, policy, sink }
    }

    /// The underlying store (observer reads, test setup).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The event sink.
    pub fn sink(&self) -> &B {
        &self.sink
    }

    // -----------------------------------------------------------------------
    // Encounter lifecycle
    // -----------------------------------------------------------------------

    /// Create and store a new empty encounter.
    pub fn create_encounter(&self, name: &str) -> SessionResult<EncounterId> {
        let encounter = Encounter::new(name);
        let id = encounter.id;
        self.store.save(&encounter)?;
        tracing::info!(encounter = %id, name, "encounter created");
        Ok(id)
    }

    /// Fetch an encounter for reading. Open to any caller.
    pub fn encounter(&self, id: EncounterId) -> SessionResult<Encounter> {
        self.load(id)
    }

    /// Add a combatant to the encounter; the initiative order is
    /// recomputed.
    pub fn add_combatant(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: Combatant,
    ) -> SessionResult<CombatantId> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let combatant_id = turn::add_combatant(&mut encounter, combatant);
        self.commit(encounter, Vec::new())?;
        Ok(combatant_id)
    }

    /// Remove a combatant; the initiative order is recomputed and the
    /// turn flag reassigned if the combatant held it.
    pub fn remove_combatant(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: CombatantId,
    ) -> SessionResult<()> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let events = turn::remove_combatant(&mut encounter, combatant)?;
        self.commit(encounter, events)
    }

    // -----------------------------------------------------------------------
    // Turn movement
    // -----------------------------------------------------------------------

    /// Advance to the next turn.
    ///
    /// `version` is the encounter version the caller last observed; a
    /// mismatch means another request already advanced the turn, and the
    /// call is rejected with [`SessionError::AlreadyAdvanced`] without
    /// touching anything.
    pub fn advance_turn(
        &self,
        actor: &ActorId,
        id: EncounterId,
        version: u64,
    ) -> SessionResult<TurnSummary> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        check_version(&encounter, version)?;

        let advance = turn::advance_turn(&mut encounter)?;
        let summary = TurnSummary {
            new_round: advance.round,
            is_new_round: advance.is_new_round,
            next_combatant_name: advance.combatant_name,
        };
        tracing::debug!(
            encounter = %id,
            round = summary.new_round,
            next = %summary.next_combatant_name,
            "turn advanced"
        );
        self.commit(encounter, advance.events)?;
        Ok(summary)
    }

    /// Move back to the previous turn. Same idempotency rule as
    /// [`Session::advance_turn`]; no ticks are re-run.
    pub fn previous_turn(
        &self,
        actor: &ActorId,
        id: EncounterId,
        version: u64,
    ) -> SessionResult<TurnSummary> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        check_version(&encounter, version)?;

        let advance = turn::previous_turn(&mut encounter)?;
        let summary = TurnSummary {
            new_round: advance.round,
            is_new_round: advance.is_new_round,
            next_combatant_name: advance.combatant_name,
        };
        tracing::debug!(encounter = %id, round = summary.new_round, "turn rolled back");
        self.commit(encounter, advance.events)?;
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Damage and healing
    // -----------------------------------------------------------------------

    /// Apply damage to a combatant through the resolution pipeline.
    pub fn apply_damage(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: CombatantId,
        amount: u32,
        damage_type: DamageType,
    ) -> SessionResult<DamageReport> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;

        let round = encounter.round;
        let concentrating = encounter.is_concentrating(combatant, round);
        let target = encounter.combatant_mut(combatant)?;
        let outcome = damage::apply_damage(&mut target.hp, amount, damage_type, concentrating);

        let mut events = vec![EncounterEvent::new(
            round,
            EncounterEventKind::DamageApplied {
                combatant,
                amount: outcome.applied,
                damage_type,
            },
        )];
        if outcome.dropped_to_zero {
            events.push(EncounterEvent::new(
                round,
                EncounterEventKind::DroppedToZero { combatant },
            ));
        }
        if let Some(check) = outcome.concentration {
            events.push(EncounterEvent::new(
                round,
                EncounterEventKind::ConcentrationCheckRequired {
                    combatant,
                    dc: check.dc,
                },
            ));
        }

        tracing::debug!(
            encounter = %id,
            combatant = %combatant,
            raw = amount,
            applied = outcome.applied,
            "damage applied"
        );
        self.commit(encounter, events)?;
        Ok(DamageReport {
            final_amount_applied: outcome.applied,
            concentration_check_required: outcome.concentration.is_some(),
            concentration_dc: outcome.concentration.map(|c| c.dc),
        })
    }

    /// Heal a combatant. Returns the HP actually regained.
    pub fn heal(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: CombatantId,
        amount: u32,
    ) -> SessionResult<u32> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let target = encounter.combatant_mut(combatant)?;
        let outcome = damage::heal(&mut target.hp, amount);

        let events = vec![EncounterEvent::new(
            round,
            EncounterEventKind::Healed {
                combatant,
                amount: outcome.healed,
            },
        )];
        self.commit(encounter, events)?;
        Ok(outcome.healed)
    }

    /// Grant temporary HP (the higher of old and new survives). Returns
    /// the temporary HP now in place.
    pub fn grant_temporary_hp(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: CombatantId,
        amount: u32,
    ) -> SessionResult<u32> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let target = encounter.combatant_mut(combatant)?;
        let in_place = damage::grant_temporary_hp(&mut target.hp, amount);

        let events = vec![EncounterEvent::new(
            round,
            EncounterEventKind::TemporaryHpGranted {
                combatant,
                amount: in_place,
            },
        )];
        self.commit(encounter, events)?;
        Ok(in_place)
    }

    /// Record a death saving throw for a combatant at 0 HP. Returns the
    /// counters after recording; the stabilize/die outcome is the
    /// caller's call.
    pub fn record_death_save(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: CombatantId,
        success: bool,
    ) -> SessionResult<DeathSaves> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let target = encounter.combatant_mut(combatant)?;
        target.hp.death_saves.record(success);
        let saves = target.hp.death_saves;

        let events = vec![EncounterEvent::new(
            round,
            EncounterEventKind::DeathSaveRecorded { combatant, success },
        )];
        self.commit(encounter, events)?;
        Ok(saves)
    }

    // -----------------------------------------------------------------------
    // Effects and conditions
    // -----------------------------------------------------------------------

    /// Register a timed effect.
    pub fn register_effect(
        &self,
        actor: &ActorId,
        id: EncounterId,
        spec: EffectSpec,
    ) -> SessionResult<EffectId> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let target = spec.target;
        let name = spec.name.clone();
        let effect = ledger::register_effect(&mut encounter, spec)?;

        let events = vec![EncounterEvent::new(
            round,
            EncounterEventKind::EffectRegistered {
                effect,
                target,
                name,
            },
        )];
        self.commit(encounter, events)?;
        Ok(effect)
    }

    /// Register a condition. Exhaustion raises the target's level
    /// instead of creating a row.
    pub fn register_condition(
        &self,
        actor: &ActorId,
        id: EncounterId,
        spec: ConditionSpec,
    ) -> SessionResult<RegisteredCondition> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let target = spec.target;
        let kind = spec.kind;
        let registered = ledger::register_condition(&mut encounter, spec)?;

        let events = vec![match registered {
            RegisteredCondition::Row(condition) => EncounterEvent::new(
                round,
                EncounterEventKind::ConditionRegistered {
                    condition,
                    target,
                    kind,
                },
            ),
            RegisteredCondition::ExhaustionRaised(level) => EncounterEvent::new(
                round,
                EncounterEventKind::ExhaustionChanged {
                    combatant: target,
                    level,
                },
            ),
        }];
        self.commit(encounter, events)?;
        Ok(registered)
    }

    /// End a caster's concentration (a failed save or a voluntary drop),
    /// removing every effect it holds. Returns how many effects ended.
    pub fn drop_concentration(
        &self,
        actor: &ActorId,
        id: EncounterId,
        caster: CombatantId,
    ) -> SessionResult<usize> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let events = ledger::drop_concentration(&mut encounter, caster, round);
        let ended = events
            .iter()
            .map(|e| match &e.kind {
                EncounterEventKind::ConcentrationEnded { effects, .. } => effects.len(),
                _ => 0,
            })
            .sum();
        if ended == 0 {
            return Ok(0);
        }
        self.commit(encounter, events)?;
        Ok(ended)
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    /// Spend a spell slot. Returns the slots of that level still
    /// available.
    pub fn spend_slot(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: CombatantId,
        level: u8,
    ) -> SessionResult<u8> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let caster = encounter.combatant_mut(combatant)?;
        let remaining = resources::consume(&mut caster.resources, level)?;

        let events = vec![EncounterEvent::new(
            round,
            EncounterEventKind::SlotSpent {
                combatant,
                level,
                remaining,
            },
        )];
        self.commit(encounter, events)?;
        Ok(remaining)
    }

    /// Rest a combatant: refresh the pool, and on a long rest restore HP,
    /// clear death saves and temporary HP, reset action flags, and remove
    /// one exhaustion level.
    pub fn rest(
        &self,
        actor: &ActorId,
        id: EncounterId,
        combatant: CombatantId,
        kind: RestKind,
    ) -> SessionResult<()> {
        self.authorize(actor, id)?;
        let mut encounter = self.load(id)?;
        let round = encounter.round;
        let target = encounter.combatant_mut(combatant)?;
        resources::rest(target, kind);

        tracing::debug!(encounter = %id, combatant = %combatant, %kind, "rest completed");
        let events = vec![EncounterEvent::new(
            round,
            EncounterEventKind::Rested { combatant, kind },
        )];
        self.commit(encounter, events)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn authorize(&self, actor: &ActorId, encounter: EncounterId) -> SessionResult<()> {
        if self.policy.is_director(actor, encounter) {
            Ok(())
        } else {
            Err(SessionError::Forbidden {
                actor: actor.clone(),
                encounter,
            })
        }
    }

    fn load(&self, id: EncounterId) -> SessionResult<Encounter> {
        self.store
            .load(id)?
            .ok_or(SessionError::EncounterNotFound(id))
    }

    /// Commit one mutation: bump the version marker, save, then publish.
    fn commit(&self, mut encounter: Encounter, events: Vec<EncounterEvent>) -> SessionResult<()> {
        encounter.bump_version();
        let id = encounter.id;
        self.store.save(&encounter)?;
        self.sink.publish(id, &events);
        Ok(())
    }
}

fn check_version(encounter: &Encounter, version: u64) -> SessionResult<()> {
    if encounter.version != version {
        return Err(SessionError::AlreadyAdvanced {
            expected: version,
            actual: encounter.version,
        });
    }
    Ok(())
}
