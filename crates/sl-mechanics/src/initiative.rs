//! Initiative ordering.
//!
//! Sort key, descending: initiative roll, then dexterity modifier, then
//! passive perception, then stable insertion order (ascending). A missing
//! tie-break key sorts after any present value. The order is recomputed
//! only when combatants are added or removed, never on turn advances.

use std::cmp::Ordering;

use rand::Rng;
use rand::rngs::StdRng;

use sl_core::Combatant;

/// Compare two combatants for initiative order.
pub fn compare(a: &Combatant, b: &Combatant) -> Ordering {
    b.initiative
        .cmp(&a.initiative)
        .then_with(|| descending_optional(a.dexterity_mod, b.dexterity_mod))
        .then_with(|| descending_optional(a.passive_perception, b.passive_perception))
        .then_with(|| a.order.cmp(&b.order))
}

/// Sort a combatant list into initiative order.
pub fn sort(combatants: &mut [Combatant]) {
    combatants.sort_by(compare);
}

/// Roll initiative: d20 plus the dexterity modifier.
pub fn roll_initiative(rng: &mut StdRng, modifier: i32) -> i32 {
    rng.random_range(1..=20) + modifier
}

/// Descending compare where `None` sorts after any present value.
fn descending_optional(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sl_core::CombatantKind;

    fn combatant(name: &str, initiative: i32) -> Combatant {
        Combatant::new(name, CombatantKind::monster(), initiative, 10)
    }

    fn names(combatants: &[Combatant]) -> Vec<&str> {
        combatants.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn sorts_by_initiative_descending() {
        let mut list = vec![combatant("Low", 8), combatant("High", 19), combatant("Mid", 12)];
        sort(&mut list);
        assert_eq!(names(&list), vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn dexterity_breaks_ties() {
        let mut list = vec![
            combatant("B", 15).with_dexterity_mod(1),
            combatant("A", 15).with_dexterity_mod(2),
        ];
        sort(&mut list);
        assert_eq!(names(&list), vec!["A", "B"]);
    }

    #[test]
    fn missing_dexterity_sorts_last_among_ties() {
        let mut list = vec![combatant("NoDex", 15), combatant("Dex", 15).with_dexterity_mod(0)];
        sort(&mut list);
        assert_eq!(names(&list), vec!["Dex", "NoDex"]);
    }

    #[test]
    fn passive_perception_breaks_remaining_ties() {
        let mut list = vec![
            combatant("B", 15)
                .with_dexterity_mod(2)
                .with_passive_perception(11),
            combatant("A", 15)
                .with_dexterity_mod(2)
                .with_passive_perception(14),
        ];
        sort(&mut list);
        assert_eq!(names(&list), vec!["A", "B"]);
    }

    #[test]
    fn insertion_order_is_the_final_tie_break() {
        let mut first = combatant("First", 15);
        first.order = 0;
        let mut second = combatant("Second", 15);
        second.order = 1;
        let mut list = vec![second, first];
        sort(&mut list);
        assert_eq!(names(&list), vec!["First", "Second"]);
    }

    #[test]
    fn tie_break_cascade() {
        // Rolls [15, 15, 10], dex mods [2, 1, none]: A, B, C.
        let mut list = vec![
            combatant("C", 10),
            combatant("B", 15).with_dexterity_mod(1),
            combatant("A", 15).with_dexterity_mod(2),
        ];
        sort(&mut list);
        assert_eq!(names(&list), vec!["A", "B", "C"]);
    }

    #[test]
    fn roll_initiative_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let roll = roll_initiative(&mut rng, 3);
            assert!((4..=23).contains(&roll));
        }
    }

    #[test]
    fn roll_initiative_is_deterministic_per_seed() {
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        assert_eq!(roll_initiative(&mut rng1, 0), roll_initiative(&mut rng2, 0));
    }
}
