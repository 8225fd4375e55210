//! Encounter engine for Spielleiter.
//!
//! Four components over the `sl-core` data model: the initiative/turn
//! scheduler, the effect & condition ledger, the damage resolution
//! pipeline, and the resource/spell-slot engine. State transitions are
//! pure — everything that happens is reported as [`EncounterEvent`]s for
//! an adapter layer to broadcast.

pub mod damage;
pub mod error;
pub mod event;
pub mod exhaustion;
pub mod initiative;
pub mod ledger;
pub mod resources;
pub mod turn;

pub use damage::{
    ConcentrationCheck, DamageModifier, DamageOutcome, HealOutcome, apply_damage,
    grant_temporary_hp, heal,
};
pub use error::{MechError, MechResult};
pub use event::{EncounterEvent, EncounterEventKind, EventLog};
pub use exhaustion::{ExhaustionPenalties, penalties};
pub use ledger::{ConditionSpec, EffectSpec, RegisteredCondition};
pub use resources::{
    Progression, ScalableValue, ScaledEffect, ScalingRule, consume, consume_resource,
    pool_for_caster, rest, rest_pool, scale_effect, slot_table,
};
pub use turn::{TurnAdvance, add_combatant, advance_turn, previous_turn, remove_combatant};

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use sl_core::{Combatant, CombatantKind, DamageType, Encounter, HpState};

    use crate::{damage, resources, turn};

    fn encounter_of(count: usize) -> Encounter {
        let mut enc = Encounter::new("Prop");
        for i in 0..count {
            turn::add_combatant(
                &mut enc,
                Combatant::new(
                    format!("c{i}"),
                    CombatantKind::monster(),
                    (i % 7) as i32,
                    20,
                ),
            );
        }
        enc
    }

    proptest! {
        #[test]
        fn exactly_one_turn_flag_after_any_advance_count(
            count in 1usize..8,
            advances in 1usize..40,
        ) {
            let mut enc = encounter_of(count);
            for _ in 0..advances {
                turn::advance_turn(&mut enc).unwrap();
                let holders = enc.combatants.iter().filter(|c| c.has_turn).count();
                prop_assert_eq!(holders, 1);
            }
        }

        #[test]
        fn full_cycle_adds_exactly_one_round(count in 1usize..8) {
            let mut enc = encounter_of(count);
            turn::advance_turn(&mut enc).unwrap(); // start
            let holder = enc.current().unwrap().id;
            let round = enc.round;

            for _ in 0..count {
                turn::advance_turn(&mut enc).unwrap();
            }
            prop_assert_eq!(enc.current().unwrap().id, holder);
            prop_assert_eq!(enc.round, round + 1);
        }

        #[test]
        fn immunity_always_zeroes(amount in 0u32..10_000) {
            let mut hp = HpState::new(50);
            hp.immunities.insert(DamageType::Fire);
            let outcome = damage::apply_damage(&mut hp, amount, DamageType::Fire, false);
            prop_assert_eq!(outcome.applied, 0);
            prop_assert_eq!(hp.current, 50);
        }

        #[test]
        fn hp_stays_in_bounds_under_any_sequence(
            ops in prop::collection::vec((any::<bool>(), 0u32..200), 0..50),
        ) {
            let mut hp = HpState::new(30);
            for (is_damage, amount) in ops {
                if is_damage {
                    damage::apply_damage(&mut hp, amount, DamageType::Slashing, false);
                } else {
                    damage::heal(&mut hp, amount);
                }
                prop_assert!(hp.current <= hp.max);
            }
        }

        #[test]
        fn upcasting_never_shrinks_dice(
            base_level in 1u8..=9,
            cast_level in 1u8..=9,
            count in 1u32..10,
        ) {
            let scaled = resources::scale_effect(
                base_level,
                cast_level,
                resources::ScalingRule::PerSlotLevel,
                resources::ScalableValue::Dice { count, size: 8 },
            );
            prop_assert!(
                matches!(
                    scaled.value,
                    resources::ScalableValue::Dice { count: c, size: 8 } if c >= count
                ),
                "upcasting must not shrink dice count"
            );
        }
    }
}
