//! Damage resolution pipeline.
//!
//! Stateless: every function takes the target's [`HpState`] and returns an
//! outcome describing exactly what happened. Death-save bookkeeping and
//! the actual concentration save roll belong to the caller.
//!
//! Resolution order: immunity zeroes the damage and stops; otherwise
//! resistance halves (rounding down); otherwise vulnerability doubles. A
//! type in both the resistance and vulnerability sets is treated as
//! resisted. Temporary HP absorbs before current HP; both floor at 0.

use sl_core::{DamageType, HpState};

/// How the resistance/vulnerability/immunity sets modified the raw amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageModifier {
    /// Target is immune; nothing gets through.
    Immune,
    /// Target resists; amount halved, rounded down.
    Resisted,
    /// Target is vulnerable; amount doubled.
    Vulnerable,
    /// No modifier applied.
    Unmodified,
}

/// A concentration save the caller must roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcentrationCheck {
    /// Save DC: `max(10, damage / 2)`.
    pub dc: u32,
}

/// The result of pushing one damage instance through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    /// The raw amount before modifiers.
    pub raw: u32,
    /// Which modifier applied.
    pub modifier: DamageModifier,
    /// The final amount after modifiers — what the target actually takes.
    pub applied: u32,
    /// Portion of `applied` absorbed by temporary HP.
    pub absorbed_by_temp: u32,
    /// Portion of `applied` subtracted from current HP.
    pub taken: u32,
    /// Current HP crossed from above zero to zero.
    pub dropped_to_zero: bool,
    /// Present when the target was concentrating and took damage.
    pub concentration: Option<ConcentrationCheck>,
}

/// Resolve one instance of damage against a target.
///
/// `concentrating` is whether the target currently holds a concentration
/// effect; the caller derives it from the encounter's effect rows.
pub fn apply_damage(
    hp: &mut HpState,
    amount: u32,
    damage_type: DamageType,
    concentrating: bool,
) -> DamageOutcome {
    let (modifier, applied) = if hp.immunities.contains(&damage_type) {
        (DamageModifier::Immune, 0)
    } else if hp.resistances.contains(&damage_type) {
        (DamageModifier::Resisted, amount / 2)
    } else if hp.vulnerabilities.contains(&damage_type) {
        (DamageModifier::Vulnerable, amount.saturating_mul(2))
    } else {
        (DamageModifier::Unmodified, amount)
    };

    let was_up = hp.current > 0;
    let absorbed_by_temp = hp.absorb_temporary(applied);
    let taken = hp.lose(applied - absorbed_by_temp);
    let dropped_to_zero = was_up && hp.current == 0;

    let concentration = (concentrating && applied > 0).then_some(ConcentrationCheck {
        dc: (applied / 2).max(10),
    });

    DamageOutcome {
        raw: amount,
        modifier,
        applied,
        absorbed_by_temp,
        taken,
        dropped_to_zero,
        concentration,
    }
}

/// The result of a healing application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealOutcome {
    /// The amount requested.
    pub requested: u32,
    /// The amount actually regained (capped at max HP).
    pub healed: u32,
}

/// Heal the target: add to current HP, capped at max. Temporary HP is
/// untouched. Amounts are unsigned, so negative healing is
/// unrepresentable.
pub fn heal(hp: &mut HpState, amount: u32) -> HealOutcome {
    HealOutcome {
        requested: amount,
        healed: hp.gain(amount),
    }
}

/// Grant temporary HP. Temporary HP does not stack; the higher of the
/// existing and granted values survives. Returns the value now in place.
pub fn grant_temporary_hp(hp: &mut HpState, amount: u32) -> u32 {
    hp.temporary = hp.temporary.max(amount);
    hp.temporary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(max: u32) -> HpState {
        HpState::new(max)
    }

    #[test]
    fn unmodified_damage_comes_off_current() {
        let mut hp = target(20);
        let outcome = apply_damage(&mut hp, 7, DamageType::Slashing, false);
        assert_eq!(outcome.applied, 7);
        assert_eq!(outcome.taken, 7);
        assert_eq!(outcome.modifier, DamageModifier::Unmodified);
        assert_eq!(hp.current, 13);
    }

    #[test]
    fn immunity_zeroes_everything() {
        let mut hp = target(20);
        hp.immunities.insert(DamageType::Poison);
        hp.temporary = 5;
        let outcome = apply_damage(&mut hp, 100, DamageType::Poison, true);
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.modifier, DamageModifier::Immune);
        assert_eq!(hp.current, 20);
        assert_eq!(hp.temporary, 5);
        // No damage means no concentration check either.
        assert!(outcome.concentration.is_none());
    }

    #[test]
    fn resistance_halves_rounding_down() {
        let mut hp = target(20);
        hp.resistances.insert(DamageType::Fire);
        let outcome = apply_damage(&mut hp, 9, DamageType::Fire, false);
        assert_eq!(outcome.applied, 4);
        assert_eq!(hp.current, 16);
    }

    #[test]
    fn vulnerability_doubles() {
        let mut hp = target(20);
        hp.vulnerabilities.insert(DamageType::Cold);
        let outcome = apply_damage(&mut hp, 6, DamageType::Cold, false);
        assert_eq!(outcome.applied, 12);
        assert_eq!(outcome.modifier, DamageModifier::Vulnerable);
        assert_eq!(hp.current, 8);
    }

    #[test]
    fn resistance_wins_over_vulnerability() {
        let mut hp = target(20);
        hp.resistances.insert(DamageType::Fire);
        hp.vulnerabilities.insert(DamageType::Fire);
        let outcome = apply_damage(&mut hp, 10, DamageType::Fire, false);
        assert_eq!(outcome.modifier, DamageModifier::Resisted);
        assert_eq!(outcome.applied, 5);
    }

    #[test]
    fn temp_hp_absorbs_before_current() {
        // Temp 5, resistance, raw 12: halved to 6, 5 absorbed, 1 taken.
        let mut hp = target(20);
        hp.temporary = 5;
        hp.resistances.insert(DamageType::Fire);
        let outcome = apply_damage(&mut hp, 12, DamageType::Fire, false);
        assert_eq!(outcome.applied, 6);
        assert_eq!(outcome.absorbed_by_temp, 5);
        assert_eq!(outcome.taken, 1);
        assert_eq!(hp.temporary, 0);
        assert_eq!(hp.current, 19);
    }

    #[test]
    fn dropping_to_zero_is_reported_once() {
        let mut hp = HpState::with_current(3, 20);
        let outcome = apply_damage(&mut hp, 10, DamageType::Bludgeoning, false);
        assert!(outcome.dropped_to_zero);
        assert_eq!(hp.current, 0);

        // Already down: no second report.
        let outcome = apply_damage(&mut hp, 10, DamageType::Bludgeoning, false);
        assert!(!outcome.dropped_to_zero);
    }

    #[test]
    fn concentration_dc_floors_at_ten() {
        let mut hp = target(50);
        let outcome = apply_damage(&mut hp, 7, DamageType::Force, true);
        assert_eq!(outcome.concentration, Some(ConcentrationCheck { dc: 10 }));
    }

    #[test]
    fn concentration_dc_is_half_damage() {
        let mut hp = target(100);
        let outcome = apply_damage(&mut hp, 46, DamageType::Force, true);
        assert_eq!(outcome.concentration, Some(ConcentrationCheck { dc: 23 }));
    }

    #[test]
    fn no_concentration_check_when_not_concentrating() {
        let mut hp = target(20);
        let outcome = apply_damage(&mut hp, 8, DamageType::Force, false);
        assert!(outcome.concentration.is_none());
    }

    #[test]
    fn heal_caps_at_max() {
        let mut hp = HpState::with_current(4, 10);
        let outcome = heal(&mut hp, 20);
        assert_eq!(outcome.healed, 6);
        assert_eq!(hp.current, 10);
    }

    #[test]
    fn heal_leaves_temp_alone() {
        let mut hp = HpState::with_current(4, 10);
        hp.temporary = 2;
        heal(&mut hp, 3);
        assert_eq!(hp.current, 7);
        assert_eq!(hp.temporary, 2);
    }

    #[test]
    fn temp_hp_takes_the_higher_value() {
        let mut hp = target(10);
        assert_eq!(grant_temporary_hp(&mut hp, 8), 8);
        assert_eq!(grant_temporary_hp(&mut hp, 3), 8);
        assert_eq!(grant_temporary_hp(&mut hp, 12), 12);
    }
}
