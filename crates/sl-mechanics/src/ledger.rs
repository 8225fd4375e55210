//! The effect & condition ledger: registration, tick phases, and the
//! round-boundary sweep.
//!
//! Durations are stored as exclusive end rounds (`end_round =
//! current_round + duration`); the sweep deletes every row whose end
//! round has been reached. Tick damage goes through the damage pipeline,
//! so resistances and temporary HP apply to ongoing damage exactly as
//! they do to attacks.

use sl_core::{
    CombatantId, Condition, ConditionId, ConditionKind, DamageType, Effect, EffectId, Encounter,
    TickTiming,
};

use crate::damage;
use crate::error::{MechError, MechResult};
use crate::event::{EncounterEvent, EncounterEventKind};

/// Registration input for a timed effect.
#[derive(Debug, Clone)]
pub struct EffectSpec {
    /// The combatant the effect is on.
    pub target: CombatantId,
    /// Display name.
    pub name: String,
    /// Where the effect came from.
    pub source: Option<String>,
    /// Duration in rounds; `None` = indefinite. Zero is rejected.
    pub duration_rounds: Option<u32>,
    /// When the effect ticks, if it ticks.
    pub timing: Option<TickTiming>,
    /// Tick damage amount. Goes together with `tick_damage_type`.
    pub tick_amount: Option<u32>,
    /// Tick damage type.
    pub tick_damage_type: Option<DamageType>,
    /// True if held by concentration.
    pub concentration: bool,
    /// The concentrating combatant.
    pub concentrating: Option<CombatantId>,
}

impl EffectSpec {
    /// A plain named effect on a target with the given duration.
    pub fn new(target: CombatantId, name: impl Into<String>, duration_rounds: Option<u32>) -> Self {
        Self {
            target,
            name: name.into(),
            source: None,
            duration_rounds,
            timing: None,
            tick_amount: None,
            tick_damage_type: None,
            concentration: false,
            concentrating: None,
        }
    }

    /// Add tick damage to the spec.
    pub fn with_tick(mut self, timing: TickTiming, amount: u32, damage_type: DamageType) -> Self {
        self.timing = Some(timing);
        self.tick_amount = Some(amount);
        self.tick_damage_type = Some(damage_type);
        self
    }

    /// Mark the effect as held by a caster's concentration.
    pub fn with_concentration(mut self, caster: CombatantId) -> Self {
        self.concentration = true;
        self.concentrating = Some(caster);
        self
    }
}

/// Registration input for a condition.
#[derive(Debug, Clone)]
pub struct ConditionSpec {
    /// The combatant the condition is on.
    pub target: CombatantId,
    /// Which condition to apply.
    pub kind: ConditionKind,
    /// Duration in rounds; `None` = indefinite. Zero is rejected.
    pub duration_rounds: Option<u32>,
}

/// What registering a condition produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisteredCondition {
    /// A timed condition row was stored.
    Row(ConditionId),
    /// An exhaustion registration raised the target's stored level
    /// instead of creating a row. Carries the level now in place.
    ExhaustionRaised(u8),
}

/// Register a timed effect. The end round is `current round + duration`
/// (exclusive); an absent duration means indefinite.
pub fn register_effect(encounter: &mut Encounter, spec: EffectSpec) -> MechResult<EffectId> {
    encounter.combatant(spec.target)?;
    if let Some(caster) = spec.concentrating {
        encounter.combatant(caster)?;
    }
    let end_round = end_round_for(encounter.round, spec.duration_rounds)?;

    let mut effect = Effect::new(spec.target, spec.name, encounter.round);
    effect.source = spec.source;
    effect.end_round = end_round;
    effect.timing = spec.timing;
    effect.tick_amount = spec.tick_amount;
    effect.tick_damage_type = spec.tick_damage_type;
    effect.concentration = spec.concentration;
    effect.concentrating = spec.concentrating;
    Ok(encounter.add_effect(effect))
}

/// Register a condition. Exhaustion raises the target's stored level
/// (never lowering it) instead of creating a timed row; every other kind
/// is stored with the same duration semantics as effects.
pub fn register_condition(
    encounter: &mut Encounter,
    spec: ConditionSpec,
) -> MechResult<RegisteredCondition> {
    if let ConditionKind::Exhaustion(level) = spec.kind {
        if level == 0 || level > 6 {
            return Err(MechError::InvalidExhaustionLevel(level));
        }
        let combatant = encounter.combatant_mut(spec.target)?;
        combatant.exhaustion = combatant.exhaustion.max(level);
        return Ok(RegisteredCondition::ExhaustionRaised(combatant.exhaustion));
    }

    encounter.combatant(spec.target)?;
    let end_round = end_round_for(encounter.round, spec.duration_rounds)?;
    let mut condition = Condition::new(spec.target, spec.kind);
    condition.end_round = end_round;
    Ok(RegisteredCondition::Row(encounter.add_condition(condition)))
}

/// Set a combatant's exhaustion level directly (the director's manual
/// adjustment; unlike registration this may lower the level).
pub fn set_exhaustion(
    encounter: &mut Encounter,
    combatant: CombatantId,
    level: u8,
) -> MechResult<u8> {
    if level > 6 {
        return Err(MechError::InvalidExhaustionLevel(level));
    }
    encounter.combatant_mut(combatant)?.exhaustion = level;
    Ok(level)
}

/// Run the start-of-turn tick phase for a combatant. Executed before the
/// scheduler resets that combatant's action-economy flags.
pub fn tick_start(
    encounter: &mut Encounter,
    combatant: CombatantId,
    round: u32,
) -> Vec<EncounterEvent> {
    tick(encounter, combatant, round, TickTiming::StartOfTurn)
}

/// Run the end-of-turn tick phase for a combatant.
pub fn tick_end(
    encounter: &mut Encounter,
    combatant: CombatantId,
    round: u32,
) -> Vec<EncounterEvent> {
    tick(encounter, combatant, round, TickTiming::EndOfTurn)
}

fn tick(
    encounter: &mut Encounter,
    combatant: CombatantId,
    round: u32,
    timing: TickTiming,
) -> Vec<EncounterEvent> {
    let ticking: Vec<(EffectId, String, u32, DamageType)> = encounter
        .effects
        .iter()
        .filter(|e| e.target == combatant && e.is_active(round) && e.ticks_at(timing))
        .filter_map(|e| {
            let amount = e.tick_amount?;
            let damage_type = e.tick_damage_type?;
            Some((e.id, e.name.clone(), amount, damage_type))
        })
        .collect();

    let mut events = Vec::new();
    for (effect_id, name, amount, damage_type) in ticking {
        let concentrating = encounter.is_concentrating(combatant, round);
        let Ok(target) = encounter.combatant_mut(combatant) else {
            break;
        };
        let outcome = damage::apply_damage(&mut target.hp, amount, damage_type, concentrating);
        events.push(EncounterEvent::new(
            round,
            EncounterEventKind::TickDamage {
                combatant,
                effect: effect_id,
                name,
                amount: outcome.applied,
            },
        ));
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
    }
    events
}

/// Delete every effect and condition, encounter-wide, whose end round has
/// been reached (`end_round <= round`). Runs after either tick phase.
pub fn sweep(encounter: &mut Encounter, round: u32) -> Vec<EncounterEvent> {
    let mut events = Vec::new();

    let expired = |end: Option<u32>| end.is_some_and(|e| e <= round);

    for effect in encounter.effects.iter().filter(|e| expired(e.end_round)) {
        events.push(EncounterEvent::new(
            round,
            EncounterEventKind::EffectExpired {
                effect: effect.id,
                target: effect.target,
                name: effect.name.clone(),
            },
        ));
    }
    encounter.effects.retain(|e| !expired(e.end_round));

    for condition in encounter.conditions.iter().filter(|c| expired(c.end_round)) {
        events.push(EncounterEvent::new(
            round,
            EncounterEventKind::ConditionExpired {
                condition: condition.id,
                target: condition.target,
                kind: condition.kind,
            },
        ));
    }
    encounter.conditions.retain(|c| !expired(c.end_round));

    events
}

/// End a caster's concentration, removing every effect it holds. The
/// caller decides when this happens (a failed save, incapacitation, or a
/// voluntary drop).
pub fn drop_concentration(
    encounter: &mut Encounter,
    caster: CombatantId,
    round: u32,
) -> Vec<EncounterEvent> {
    let held = |e: &Effect| e.concentration && e.concentrating == Some(caster);

    let removed: Vec<EffectId> = encounter.effects.iter().filter(|e| held(e)).map(|e| e.id).collect();
    if removed.is_empty() {
        return Vec::new();
    }
    encounter.effects.retain(|e| !held(e));
    vec![EncounterEvent::new(
        round,
        EncounterEventKind::ConcentrationEnded {
            caster,
            effects: removed,
        },
    )]
}

fn end_round_for(round: u32, duration: Option<u32>) -> MechResult<Option<u32>> {
    match duration {
        Some(0) => Err(MechError::InvalidDuration(0)),
        Some(d) => Ok(Some(round + d)),
        None => Ok(None),
    }
}
