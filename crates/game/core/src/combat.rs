//! Melee resolution math.
//!
//! Pure helpers shared by the attack action; all randomness stays with the
//! caller, which passes in already-rolled values.

/// To-hit threshold: a d100 roll at or under this value lands.
pub const MELEE_HIT_CHANCE: u32 = 55;

/// Whether an attack roll lands.
pub fn check_hit(roll: u32) -> bool {
    roll <= MELEE_HIT_CHANCE
}

/// Damage dealt by a power roll against flat defense. Never negative.
pub fn melee_damage(power_roll: u32, defense: u32) -> u32 {
    power_roll.saturating_sub(defense)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_threshold_is_inclusive() {
        assert!(check_hit(1));
        assert!(check_hit(MELEE_HIT_CHANCE));
        assert!(!check_hit(MELEE_HIT_CHANCE + 1));
        assert!(!check_hit(100));
    }

    #[test]
    fn damage_never_underflows() {
        assert_eq!(melee_damage(5, 2), 3);
        assert_eq!(melee_damage(2, 2), 0);
        assert_eq!(melee_damage(1, 4), 0);
    }
}
