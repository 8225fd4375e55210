//! Turn and round scheduling.
//!
//! One `advance_turn` call is one logical unit: end-of-turn ticks for the
//! departing combatant settle completely, then the sweep runs, then the
//! turn flag moves, then start-of-turn ticks for the incoming combatant,
//! the sweep again, and finally the incoming combatant's action flags
//! reset. All validation happens before the first mutation, so the call
//! either applies in full or not at all.

use sl_core::{Combatant, CombatantId, CoreError, Encounter};

use crate::error::{MechError, MechResult};
use crate::event::{EncounterEvent, EncounterEventKind};
use crate::{initiative, ledger};

/// The result of a turn movement.
#[derive(Debug, Clone)]
pub struct TurnAdvance {
    /// The round after the movement.
    pub round: u32,
    /// True if the movement crossed a round boundary.
    pub is_new_round: bool,
    /// The combatant now holding the turn flag.
    pub combatant: CombatantId,
    /// That combatant's display name.
    pub combatant_name: String,
    /// Everything that happened, in order.
    pub events: Vec<EncounterEvent>,
}

/// Advance to the next turn.
///
/// If combat has not started (no combatant holds the turn flag), the
/// first combatant in sort order takes the turn and nothing ticks.
/// Otherwise the flag moves to the next combatant, wrapping into a new
/// round at the end of the order.
pub fn advance_turn(encounter: &mut Encounter) -> MechResult<TurnAdvance> {
    if encounter.combatants.is_empty() {
        return Err(MechError::NoCombatants);
    }

    let Some(current) = encounter.current_index() else {
        return Ok(start_combat(encounter));
    };

    let count = encounter.combatants.len();
    let next = (current + 1) % count;
    let is_new_round = next == 0;
    let old_round = encounter.round;
    let new_round = if is_new_round { old_round + 1 } else { old_round };

    let departing = encounter.combatants[current].id;
    let departing_name = encounter.combatants[current].name.clone();
    let incoming = encounter.combatants[next].id;
    let incoming_name = encounter.combatants[next].name.clone();

    let mut events = Vec::new();

    // The departing combatant's end-of-turn ticks belong to the old round.
    events.extend(ledger::tick_end(encounter, departing, old_round));
    events.push(EncounterEvent::new(
        old_round,
        EncounterEventKind::TurnEnded {
            combatant: departing,
            name: departing_name,
        },
    ));

    if is_new_round {
        encounter.round = new_round;
        events.push(EncounterEvent::new(
            new_round,
            EncounterEventKind::RoundStarted { round: new_round },
        ));
    }
    events.extend(ledger::sweep(encounter, new_round));

    for combatant in &mut encounter.combatants {
        combatant.has_turn = false;
    }
    encounter.combatants[next].has_turn = true;
    events.push(EncounterEvent::new(
        new_round,
        EncounterEventKind::TurnStarted {
            combatant: incoming,
            name: incoming_name.clone(),
        },
    ));

    events.extend(ledger::tick_start(encounter, incoming, new_round));
    events.extend(ledger::sweep(encounter, new_round));

    encounter.combatants[next].action_economy.reset();

    Ok(TurnAdvance {
        round: new_round,
        is_new_round,
        combatant: incoming,
        combatant_name: incoming_name,
        events,
    })
}

/// Move back to the previous turn.
///
/// A rollback control: no ticks run and nothing is swept, since
/// re-running tick phases would double-apply their damage. The round
/// decrements only when moving from the top of the order back to the
/// bottom, and never below round 1.
pub fn previous_turn(encounter: &mut Encounter) -> MechResult<TurnAdvance> {
    if encounter.combatants.is_empty() {
        return Err(MechError::NoCombatants);
    }

    let Some(current) = encounter.current_index() else {
        return Ok(start_combat(encounter));
    };

    let count = encounter.combatants.len();
    let previous = if current == 0 { count - 1 } else { current - 1 };
    let is_new_round = current == 0 && encounter.round > 1;
    if is_new_round {
        encounter.round -= 1;
    }

    for combatant in &mut encounter.combatants {
        combatant.has_turn = false;
    }
    encounter.combatants[previous].has_turn = true;

    let combatant = encounter.combatants[previous].id;
    let combatant_name = encounter.combatants[previous].name.clone();
    let events = vec![EncounterEvent::new(
        encounter.round,
        EncounterEventKind::TurnStarted {
            combatant,
            name: combatant_name.clone(),
        },
    )];

    Ok(TurnAdvance {
        round: encounter.round,
        is_new_round,
        combatant,
        combatant_name,
        events,
    })
}

/// Add a combatant and recompute the initiative order.
pub fn add_combatant(encounter: &mut Encounter, combatant: Combatant) -> CombatantId {
    let id = encounter.push_combatant(combatant);
    initiative::sort(&mut encounter.combatants);
    id
}

/// Remove a combatant and recompute the initiative order.
///
/// If the removed combatant held the turn flag, the flag passes to the
/// combatant now occupying the removed index (wrapping to the top of the
/// order), without a round increment and without ticks; the next
/// `advance_turn` proceeds normally from there.
pub fn remove_combatant(
    encounter: &mut Encounter,
    id: CombatantId,
) -> MechResult<Vec<EncounterEvent>> {
    let index = encounter
        .combatants
        .iter()
        .position(|c| c.id == id)
        .ok_or(CoreError::CombatantNotFound(id))?;
    let removed = encounter.take_combatant(id)?;

    let mut events = vec![EncounterEvent::new(
        encounter.round,
        EncounterEventKind::CombatantRemoved {
            combatant: removed.id,
            name: removed.name.clone(),
        },
    )];

    if removed.has_turn && !encounter.combatants.is_empty() {
        let successor = index % encounter.combatants.len();
        encounter.combatants[successor].has_turn = true;
        events.push(EncounterEvent::new(
            encounter.round,
            EncounterEventKind::TurnStarted {
                combatant: encounter.combatants[successor].id,
                name: encounter.combatants[successor].name.clone(),
            },
        ));
    }

    initiative::sort(&mut encounter.combatants);
    Ok(events)
}

/// Combat start: the first combatant in sort order takes the turn.
fn start_combat(encounter: &mut Encounter) -> TurnAdvance {
    encounter.combatants[0].has_turn = true;
    let combatant = encounter.combatants[0].id;
    let combatant_name = encounter.combatants[0].name.clone();
    let round = encounter.round;
    let events = vec![EncounterEvent::new(
        round,
        EncounterEventKind::TurnStarted {
            combatant,
            name: combatant_name.clone(),
        },
    )];
    TurnAdvance {
        round,
        is_new_round: false,
        combatant,
        combatant_name,
        events,
    }
}
