//! Encounter event types and the event log.
//!
//! Every engine mutation reports what happened as events; the session
//! layer forwards committed events to the broadcast contract. Events are
//! the engine's only side-channel.

use std::fmt;

use sl_core::{CombatantId, ConditionId, ConditionKind, DamageType, EffectId, RestKind};

/// What kind of encounter event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncounterEventKind {
    // Scheduling
    /// A new round began.
    RoundStarted {
        /// The round that began.
        round: u32,
    },
    /// A combatant's turn began.
    TurnStarted {
        /// The combatant whose turn it now is.
        combatant: CombatantId,
        /// The combatant's display name.
        name: String,
    },
    /// A combatant's turn ended.
    TurnEnded {
        /// The combatant whose turn ended.
        combatant: CombatantId,
        /// The combatant's display name.
        name: String,
    },
    /// A combatant left the encounter.
    CombatantRemoved {
        /// The removed combatant.
        combatant: CombatantId,
        /// The combatant's display name.
        name: String,
    },

    // Ledger
    /// An effect row was registered.
    EffectRegistered {
        /// The new effect row.
        effect: EffectId,
        /// The combatant the effect is on.
        target: CombatantId,
        /// The effect's display name.
        name: String,
    },
    /// A condition row was registered.
    ConditionRegistered {
        /// The new condition row.
        condition: ConditionId,
        /// The combatant the condition is on.
        target: CombatantId,
        /// Which condition was applied.
        kind: ConditionKind,
    },
    /// An effect reached its end round and was purged by the sweep.
    EffectExpired {
        /// The purged effect row.
        effect: EffectId,
        /// The combatant the effect was on.
        target: CombatantId,
        /// The effect's display name.
        name: String,
    },
    /// A condition reached its end round and was purged by the sweep.
    ConditionExpired {
        /// The purged condition row.
        condition: ConditionId,
        /// The combatant the condition was on.
        target: CombatantId,
        /// Which condition expired.
        kind: ConditionKind,
    },
    /// A combatant's exhaustion level changed.
    ExhaustionChanged {
        /// The combatant whose level changed.
        combatant: CombatantId,
        /// The new level (0-6).
        level: u8,
    },
    /// A caster's concentration ended, removing the held effects.
    ConcentrationEnded {
        /// The caster who lost concentration.
        caster: CombatantId,
        /// The effect rows that were removed.
        effects: Vec<EffectId>,
    },

    // Damage pipeline
    /// Damage was applied to a combatant.
    DamageApplied {
        /// The damaged combatant.
        combatant: CombatantId,
        /// Amount after resistance/vulnerability/immunity.
        amount: u32,
        /// The damage type.
        damage_type: DamageType,
    },
    /// A recurring effect dealt its tick damage.
    TickDamage {
        /// The damaged combatant.
        combatant: CombatantId,
        /// The effect that ticked.
        effect: EffectId,
        /// The effect's display name.
        name: String,
        /// Amount after resistance/vulnerability/immunity.
        amount: u32,
    },
    /// Current HP crossed from above zero to zero.
    DroppedToZero {
        /// The combatant who went down.
        combatant: CombatantId,
    },
    /// The damaged combatant was concentrating; a save is due.
    ConcentrationCheckRequired {
        /// The concentrating combatant.
        combatant: CombatantId,
        /// Save DC: `max(10, damage / 2)`.
        dc: u32,
    },
    /// A combatant regained hit points.
    Healed {
        /// The healed combatant.
        combatant: CombatantId,
        /// HP actually regained (after the max-HP cap).
        amount: u32,
    },
    /// A combatant was granted temporary hit points.
    TemporaryHpGranted {
        /// The shielded combatant.
        combatant: CombatantId,
        /// The temporary HP value now in place.
        amount: u32,
    },
    /// A death saving throw was recorded.
    DeathSaveRecorded {
        /// The combatant at 0 HP.
        combatant: CombatantId,
        /// Whether the save succeeded.
        success: bool,
    },

    // Resources
    /// A spell slot was spent.
    SlotSpent {
        /// The caster.
        combatant: CombatantId,
        /// Slot level spent.
        level: u8,
        /// Slots of that level still available.
        remaining: u8,
    },
    /// A combatant completed a rest.
    Rested {
        /// The rested combatant.
        combatant: CombatantId,
        /// Short or long.
        kind: RestKind,
    },
}

impl EncounterEventKind {
    /// Check whether a given combatant is involved in this event.
    pub fn involves(&self, id: CombatantId) -> bool {
        match self {
            Self::RoundStarted { .. } => false,
            Self::TurnStarted { combatant, .. }
            | Self::TurnEnded { combatant, .. }
            | Self::CombatantRemoved { combatant, .. }
            | Self::ExhaustionChanged { combatant, .. }
            | Self::DamageApplied { combatant, .. }
            | Self::TickDamage { combatant, .. }
            | Self::DroppedToZero { combatant }
            | Self::ConcentrationCheckRequired { combatant, .. }
            | Self::Healed { combatant, .. }
            | Self::TemporaryHpGranted { combatant, .. }
            | Self::DeathSaveRecorded { combatant, .. }
            | Self::SlotSpent { combatant, .. }
            | Self::Rested { combatant, .. } => *combatant == id,
            Self::EffectRegistered { target, .. }
            | Self::EffectExpired { target, .. }
            | Self::ConditionRegistered { target, .. }
            | Self::ConditionExpired { target, .. } => *target == id,
            Self::ConcentrationEnded { caster, .. } => *caster == id,
        }
    }
}

impl fmt::Display for EncounterEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted { round } => write!(f, "Round {round} begins"),
            Self::TurnStarted { name, .. } => write!(f, "{name}'s turn begins"),
            Self::TurnEnded { name, .. } => write!(f, "{name}'s turn ends"),
            Self::CombatantRemoved { name, .. } => write!(f, "{name} leaves the encounter"),
            Self::EffectRegistered { name, .. } => write!(f, "{name} takes hold"),
            Self::ConditionRegistered { kind, .. } => write!(f, "now {kind}"),
            Self::EffectExpired { name, .. } => write!(f, "{name} fades"),
            Self::ConditionExpired { kind, .. } => write!(f, "no longer {kind}"),
            Self::ExhaustionChanged { level, .. } => write!(f, "exhaustion level {level}"),
            Self::ConcentrationEnded { effects, .. } => {
                write!(f, "concentration broken ({} effects end)", effects.len())
            }
            Self::DamageApplied {
                amount,
                damage_type,
                ..
            } => write!(f, "takes {amount} {damage_type} damage"),
            Self::TickDamage { name, amount, .. } => write!(f, "takes {amount} damage from {name}"),
            Self::DroppedToZero { .. } => write!(f, "drops to 0 HP"),
            Self::ConcentrationCheckRequired { dc, .. } => {
                write!(f, "concentration check required (DC {dc})")
            }
            Self::Healed { amount, .. } => write!(f, "regains {amount} HP"),
            Self::TemporaryHpGranted { amount, .. } => write!(f, "gains {amount} temporary HP"),
            Self::DeathSaveRecorded { success, .. } => {
                if *success {
                    write!(f, "death save succeeded")
                } else {
                    write!(f, "death save failed")
                }
            }
            Self::SlotSpent {
                level, remaining, ..
            } => write!(f, "spends a level {level} slot ({remaining} left)"),
            Self::Rested { kind, .. } => write!(f, "completes a {kind}"),
        }
    }
}

/// A record of something that happened in the encounter.
#[derive(Debug, Clone)]
pub struct EncounterEvent {
    /// The round the event belongs to.
    pub round: u32,
    /// The specific kind of event.
    pub kind: EncounterEventKind,
}

impl EncounterEvent {
    /// Create a new event stamped with the round it belongs to.
    pub fn new(round: u32, kind: EncounterEventKind) -> Self {
        Self { round, kind }
    }
}

/// Accumulates events across an encounter.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<EncounterEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its
    /// capacity.
    pub fn push(&mut self, event: EncounterEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Append a batch of events.
    pub fn extend(&mut self, events: impl IntoIterator<Item = EncounterEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[EncounterEvent] {
        &self.events
    }

    /// Return all events that occurred in the given round.
    pub fn events_in_round(&self, round: u32) -> Vec<&EncounterEvent> {
        self.events.iter().filter(|e| e.round == round).collect()
    }

    /// Return all events involving the given combatant.
    pub fn events_for(&self, id: CombatantId) -> Vec<&EncounterEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
