//! The resource and spell-slot engine.
//!
//! Slot tables and upcast scaling are pure functions; consumption and
//! rest operations mutate a pool. Pools persist across encounters — only
//! rests refresh them.

use std::fmt;

use serde::{Deserialize, Serialize};

use sl_core::{Combatant, ResourcePool, RestKind, SpellSlot};

use crate::error::{MechError, MechResult};

/// Spell slots per spell level (1-9) for full casters, by caster level
/// (1-20).
const FULL_CASTER_SLOTS: [[u8; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [3, 0, 0, 0, 0, 0, 0, 0, 0], // 2
    [4, 2, 0, 0, 0, 0, 0, 0, 0], // 3
    [4, 3, 0, 0, 0, 0, 0, 0, 0], // 4
    [4, 3, 2, 0, 0, 0, 0, 0, 0], // 5
    [4, 3, 3, 0, 0, 0, 0, 0, 0], // 6
    [4, 3, 3, 1, 0, 0, 0, 0, 0], // 7
    [4, 3, 3, 2, 0, 0, 0, 0, 0], // 8
    [4, 3, 3, 3, 1, 0, 0, 0, 0], // 9
    [4, 3, 3, 3, 2, 0, 0, 0, 0], // 10
    [4, 3, 3, 3, 2, 1, 0, 0, 0], // 11
    [4, 3, 3, 3, 2, 1, 0, 0, 0], // 12
    [4, 3, 3, 3, 2, 1, 1, 0, 0], // 13
    [4, 3, 3, 3, 2, 1, 1, 0, 0], // 14
    [4, 3, 3, 3, 2, 1, 1, 1, 0], // 15
    [4, 3, 3, 3, 2, 1, 1, 1, 0], // 16
    [4, 3, 3, 3, 2, 1, 1, 1, 1], // 17
    [4, 3, 3, 3, 3, 1, 1, 1, 1], // 18
    [4, 3, 3, 3, 3, 2, 1, 1, 1], // 19
    [4, 3, 3, 3, 3, 2, 2, 1, 1], // 20
];

/// How a class gains spell slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progression {
    /// Wizards, clerics, druids, sorcerers, bards.
    Full,
    /// Paladins and rangers: the full table at `ceil(level / 2)`.
    Half,
    /// Eldritch knights and arcane tricksters: the full table at
    /// `ceil(level / 3)`.
    Third,
    /// Warlocks: few slots, all at one level, refreshed on a short rest.
    Pact,
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full caster"),
            Self::Half => write!(f, "half caster"),
            Self::Third => write!(f, "third caster"),
            Self::Pact => write!(f, "pact caster"),
        }
    }
}

/// Slots per spell level (index 0 = level 1) for a caster of the given
/// progression and level. Levels run 1-20.
pub fn slot_table(progression: Progression, level: u8) -> MechResult<[u8; 9]> {
    if level == 0 || level > 20 {
        return Err(MechError::InvalidCasterLevel(level));
    }
    let table = match progression {
        Progression::Full => FULL_CASTER_SLOTS[level as usize - 1],
        Progression::Half => FULL_CASTER_SLOTS[(level as usize).div_ceil(2) - 1],
        Progression::Third => FULL_CASTER_SLOTS[(level as usize).div_ceil(3) - 1],
        Progression::Pact => {
            let slot_level = (level as usize).div_ceil(2).min(5);
            let count = match level {
                1 => 1,
                2..=10 => 2,
                11..=16 => 3,
                _ => 4,
            };
            let mut table = [0u8; 9];
            table[slot_level - 1] = count;
            table
        }
    };
    Ok(table)
}

/// Build a resource pool with the slot rows for a caster, skipping empty
/// levels.
pub fn pool_for_caster(progression: Progression, level: u8) -> MechResult<ResourcePool> {
    let table = slot_table(progression, level)?;
    let slots = table
        .iter()
        .enumerate()
        .filter(|&(_, &total)| total > 0)
        .map(|(index, &total)| SpellSlot {
            level: index as u8 + 1,
            total,
            used: 0,
        })
        .collect();
    Ok(ResourcePool {
        slots,
        resources: Vec::new(),
    })
}

/// How a spell's numbers grow when cast from a higher slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingRule {
    /// One step per slot level above the base.
    PerSlotLevel,
    /// One step per two slot levels above the base.
    PerTwoSlotLevels,
    /// One step, once, when cast above the base at all.
    FixedOnce,
    /// The spell does not scale.
    None,
}

/// The scalable component of a spell's numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalableValue {
    /// A dice expression: `count` dice of `size` sides.
    Dice {
        /// Number of dice.
        count: u32,
        /// Die size.
        size: u32,
    },
    /// A number of targets.
    Targets(u32),
    /// A duration in the spell's own units.
    Duration(u32),
}

impl fmt::Display for ScalableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dice { count, size } => write!(f, "{count}d{size}"),
            Self::Targets(n) => write!(f, "{n} targets"),
            Self::Duration(n) => write!(f, "{n} duration units"),
        }
    }
}

/// The result of upcast scaling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledEffect {
    /// The scaled value.
    pub value: ScalableValue,
    /// How many steps were added.
    pub increase: u32,
    /// Human-readable description of the increase ("+2d8", "+1 target").
    pub description: String,
}

/// Scale a spell component for an upcast.
///
/// `delta = max(0, cast_level - base_level)`; the rule turns the delta
/// into a step count, which is added to the scalable component. The
/// result is never below the base value. Whether `cast_level` exceeds the
/// caster's highest available slot is the caller's validation.
pub fn scale_effect(
    base_level: u8,
    cast_level: u8,
    rule: ScalingRule,
    base: ScalableValue,
) -> ScaledEffect {
    let delta = u32::from(cast_level.saturating_sub(base_level));
    let steps = match rule {
        ScalingRule::PerSlotLevel => delta,
        ScalingRule::PerTwoSlotLevels => delta / 2,
        ScalingRule::FixedOnce => u32::from(delta >= 1),
        ScalingRule::None => 0,
    };

    let value = match base {
        ScalableValue::Dice { count, size } => ScalableValue::Dice {
            count: count + steps,
            size,
        },
        ScalableValue::Targets(n) => ScalableValue::Targets(n + steps),
        ScalableValue::Duration(n) => ScalableValue::Duration(n + steps),
    };

    let description = if steps == 0 {
        "no increase".to_string()
    } else {
        match base {
            ScalableValue::Dice { size, .. } => format!("+{steps}d{size}"),
            ScalableValue::Targets(_) => {
                if steps == 1 {
                    "+1 target".to_string()
                } else {
                    format!("+{steps} targets")
                }
            }
            ScalableValue::Duration(_) => format!("+{steps} duration"),
        }
    };

    ScaledEffect {
        value,
        increase: steps,
        description,
    }
}

/// Spend a spell slot of the given level. Returns the slots of that level
/// still available.
pub fn consume(pool: &mut ResourcePool, level: u8) -> MechResult<u8> {
    let Some(slot) = pool.slot_mut(level) else {
        return Err(MechError::InsufficientResource(format!(
            "level {level} spell slot"
        )));
    };
    if slot.used >= slot.total {
        return Err(MechError::InsufficientResource(format!(
            "level {level} spell slot"
        )));
    }
    slot.used += 1;
    Ok(slot.remaining())
}

/// Spend one use of a named class resource. Returns the uses still
/// available.
pub fn consume_resource(pool: &mut ResourcePool, name: &str) -> MechResult<u8> {
    let Some(resource) = pool.resource_mut(name) else {
        return Err(MechError::InsufficientResource(name.to_string()));
    };
    if resource.used >= resource.total {
        return Err(MechError::InsufficientResource(name.to_string()));
    }
    resource.used += 1;
    Ok(resource.remaining())
}

/// Refresh a pool. A short rest refreshes resources flagged
/// reset-on-short; a long rest refreshes every slot and every resource.
pub fn rest_pool(pool: &mut ResourcePool, kind: RestKind) {
    match kind {
        RestKind::Short => {
            for resource in &mut pool.resources {
                if resource.reset_on == RestKind::Short {
                    resource.used = 0;
                }
            }
        }
        RestKind::Long => {
            for slot in &mut pool.slots {
                slot.used = 0;
            }
            for resource in &mut pool.resources {
                resource.used = 0;
            }
        }
    }
}

/// Rest a combatant. The pool refreshes per [`rest_pool`]; a long rest
/// additionally restores current HP to max, clears death saves and
/// temporary HP, resets action-economy flags, and removes one exhaustion
/// level.
pub fn rest(combatant: &mut Combatant, kind: RestKind) {
    rest_pool(&mut combatant.resources, kind);
    if kind == RestKind::Long {
        combatant.hp.current = combatant.hp.max;
        combatant.hp.temporary = 0;
        combatant.hp.death_saves.clear();
        combatant.action_economy.reset();
        combatant.exhaustion = combatant.exhaustion.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::{ClassResource, CombatantKind};

    #[test]
    fn full_caster_table() {
        assert_eq!(
            slot_table(Progression::Full, 1).unwrap(),
            [2, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            slot_table(Progression::Full, 5).unwrap(),
            [4, 3, 2, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            slot_table(Progression::Full, 20).unwrap(),
            [4, 3, 3, 3, 3, 2, 2, 1, 1]
        );
    }

    #[test]
    fn half_caster_looks_up_at_half_level() {
        // ceil(5 / 2) = 3: the full-caster level 3 row.
        assert_eq!(
            slot_table(Progression::Half, 5).unwrap(),
            slot_table(Progression::Full, 3).unwrap()
        );
        assert_eq!(
            slot_table(Progression::Half, 1).unwrap(),
            slot_table(Progression::Full, 1).unwrap()
        );
    }

    #[test]
    fn third_caster_looks_up_at_third_level() {
        // ceil(7 / 3) = 3.
        assert_eq!(
            slot_table(Progression::Third, 7).unwrap(),
            slot_table(Progression::Full, 3).unwrap()
        );
        assert_eq!(
            slot_table(Progression::Third, 20).unwrap(),
            slot_table(Progression::Full, 7).unwrap()
        );
    }

    #[test]
    fn pact_caster_slots() {
        assert_eq!(
            slot_table(Progression::Pact, 1).unwrap(),
            [1, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            slot_table(Progression::Pact, 2).unwrap(),
            [2, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            slot_table(Progression::Pact, 5).unwrap(),
            [0, 0, 2, 0, 0, 0, 0, 0, 0]
        );
        // The slot level caps at 5.
        assert_eq!(
            slot_table(Progression::Pact, 11).unwrap(),
            [0, 0, 0, 0, 3, 0, 0, 0, 0]
        );
        assert_eq!(
            slot_table(Progression::Pact, 17).unwrap(),
            [0, 0, 0, 0, 4, 0, 0, 0, 0]
        );
    }

    #[test]
    fn slot_table_rejects_out_of_range_levels() {
        for progression in [Progression::Full, Progression::Pact] {
            assert!(matches!(
                slot_table(progression, 0),
                Err(MechError::InvalidCasterLevel(0))
            ));
            assert!(matches!(
                slot_table(progression, 21),
                Err(MechError::InvalidCasterLevel(21))
            ));
        }
    }

    #[test]
    fn pool_for_caster_skips_empty_levels() {
        let pool = pool_for_caster(Progression::Full, 5).unwrap();
        let levels: Vec<u8> = pool.slots.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(pool.slot(1).unwrap().total, 4);

        let pool = pool_for_caster(Progression::Pact, 5).unwrap();
        let levels: Vec<u8> = pool.slots.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![3]);
    }

    #[test]
    fn upcast_adds_dice_per_slot_level() {
        // 1d8 base, cast from a level 3 slot: 3d8.
        let scaled = scale_effect(
            1,
            3,
            ScalingRule::PerSlotLevel,
            ScalableValue::Dice { count: 1, size: 8 },
        );
        assert_eq!(scaled.value, ScalableValue::Dice { count: 3, size: 8 });
        assert_eq!(scaled.increase, 2);
        assert_eq!(scaled.description, "+2d8");
    }

    #[test]
    fn upcast_per_two_slot_levels_floors() {
        let scaled = scale_effect(1, 4, ScalingRule::PerTwoSlotLevels, ScalableValue::Targets(1));
        assert_eq!(scaled.value, ScalableValue::Targets(2));
        assert_eq!(scaled.description, "+1 target");
    }

    #[test]
    fn upcast_fixed_once_caps_at_one_step() {
        let scaled = scale_effect(2, 6, ScalingRule::FixedOnce, ScalableValue::Duration(10));
        assert_eq!(scaled.value, ScalableValue::Duration(11));
        assert_eq!(scaled.increase, 1);

        let scaled = scale_effect(2, 2, ScalingRule::FixedOnce, ScalableValue::Duration(10));
        assert_eq!(scaled.increase, 0);
        assert_eq!(scaled.description, "no increase");
    }

    #[test]
    fn upcast_never_scales_below_base() {
        // Cast level below base: delta clamps to 0.
        let scaled = scale_effect(
            3,
            1,
            ScalingRule::PerSlotLevel,
            ScalableValue::Dice { count: 8, size: 6 },
        );
        assert_eq!(scaled.value, ScalableValue::Dice { count: 8, size: 6 });
    }

    #[test]
    fn no_scaling_rule_never_scales() {
        let scaled = scale_effect(1, 9, ScalingRule::None, ScalableValue::Targets(3));
        assert_eq!(scaled.value, ScalableValue::Targets(3));
        assert_eq!(scaled.description, "no increase");
    }

    #[test]
    fn consume_spends_and_rejects_when_dry() {
        let mut pool = pool_for_caster(Progression::Full, 3).unwrap();
        assert_eq!(consume(&mut pool, 2).unwrap(), 1);
        assert_eq!(consume(&mut pool, 2).unwrap(), 0);
        assert!(matches!(
            consume(&mut pool, 2),
            Err(MechError::InsufficientResource(_))
        ));
    }

    #[test]
    fn consume_rejects_absent_level() {
        let mut pool = pool_for_caster(Progression::Full, 3).unwrap();
        assert!(matches!(
            consume(&mut pool, 9),
            Err(MechError::InsufficientResource(_))
        ));
    }

    #[test]
    fn consume_resource_by_name() {
        let mut pool = ResourcePool {
            slots: Vec::new(),
            resources: vec![ClassResource {
                name: "Rage".to_string(),
                total: 2,
                used: 0,
                reset_on: RestKind::Long,
            }],
        };
        assert_eq!(consume_resource(&mut pool, "rage").unwrap(), 1);
        assert_eq!(consume_resource(&mut pool, "Rage").unwrap(), 0);
        assert!(consume_resource(&mut pool, "Rage").is_err());
        assert!(consume_resource(&mut pool, "Ki").is_err());
    }

    fn worn_out_caster() -> Combatant {
        let mut pool = pool_for_caster(Progression::Full, 5).unwrap();
        pool.resources.push(ClassResource {
            name: "Ki".to_string(),
            total: 5,
            used: 4,
            reset_on: RestKind::Short,
        });
        pool.resources.push(ClassResource {
            name: "Rage".to_string(),
            total: 3,
            used: 2,
            reset_on: RestKind::Long,
        });
        for slot in &mut pool.slots {
            slot.used = slot.total;
        }

        let mut combatant =
            Combatant::new("Worn", CombatantKind::character(5), 12, 38).with_resources(pool);
        combatant.hp.current = 1;
        combatant.hp.temporary = 4;
        combatant.hp.death_saves.record(false);
        combatant.action_economy.action_used = true;
        combatant.exhaustion = 2;
        combatant
    }

    #[test]
    fn short_rest_refreshes_only_short_resources() {
        let mut combatant = worn_out_caster();
        rest(&mut combatant, RestKind::Short);

        assert_eq!(combatant.resources.resource("Ki").unwrap().used, 0);
        assert_eq!(combatant.resources.resource("Rage").unwrap().used, 2);
        assert_eq!(combatant.resources.slot(1).unwrap().used, 4);
        // HP and flags untouched.
        assert_eq!(combatant.hp.current, 1);
        assert!(combatant.action_economy.action_used);
        assert_eq!(combatant.exhaustion, 2);
    }

    #[test]
    fn long_rest_restores_everything() {
        let mut combatant = worn_out_caster();
        rest(&mut combatant, RestKind::Long);

        assert_eq!(combatant.hp.current, combatant.hp.max);
        assert_eq!(combatant.hp.temporary, 0);
        assert_eq!(combatant.hp.death_saves.failures, 0);
        assert!(!combatant.action_economy.action_used);
        assert_eq!(combatant.exhaustion, 1);
        for slot in &combatant.resources.slots {
            assert_eq!(slot.used, 0);
        }
        for resource in &combatant.resources.resources {
            assert_eq!(resource.used, 0);
        }
    }
}
