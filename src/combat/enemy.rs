use crate::character::stats::StatBlock;
use crate::combat::difficulty::DifficultyProfile;
use crate::core::constants::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An enemy for a single battle. Dropped when the battle ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub tier: u32,
    pub stats: StatBlock,
}

impl Enemy {
    pub fn new(name: String, tier: u32, stats: StatBlock) -> Self {
        Self { name, tier, stats }
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }
}

pub fn clamp_grade(grade: u32) -> u32 {
    grade.clamp(MIN_GRADE, MAX_GRADE)
}

/// Enemy tier for a battle.
///
/// Starts from the unit's own difficulty, or ceil(grade / 2) when the unit has
/// none, then adds the profile's bump. Clamped to `MIN_TIER..=max_tier`.
pub fn resolve_tier(
    grade: u32,
    unit_difficulty: Option<u32>,
    profile: &DifficultyProfile,
    max_tier: u32,
) -> u32 {
    let base = unit_difficulty.unwrap_or_else(|| clamp_grade(grade).div_ceil(2));
    let max_tier = max_tier.clamp(MIN_TIER, MAX_TIER);
    base.saturating_add(profile.tier_bump)
        .clamp(MIN_TIER, max_tier)
}

/// Looks up tier base stats. Returns (base_hp, hp_step, base_atk, atk_step, base_def, def_step).
/// Tiers are 1-indexed; out of range tiers clamp to the table.
fn tier_base_stats(tier: u32) -> (u32, u32, u32, u32, u32, u32) {
    let index = (tier.saturating_sub(1) as usize).min(TIER_ENEMY_STATS.len() - 1);
    TIER_ENEMY_STATS[index]
}

/// Calculates unscaled enemy stats for a tier and grade.
/// Returns (hp, attack, defense).
pub fn calc_tier_enemy_stats(tier: u32, grade: u32) -> (u32, u32, u32) {
    let (base_hp, hp_step, base_atk, atk_step, base_def, def_step) = tier_base_stats(tier);
    let grade_offset = clamp_grade(grade) - 1;

    (
        base_hp + grade_offset * hp_step,
        base_atk + grade_offset * atk_step,
        base_def + grade_offset * def_step,
    )
}

/// Gets tier-specific enemy name prefixes
fn tier_enemy_prefixes(tier: u32) -> &'static [&'static str] {
    match tier {
        1 => &["Counting", "Tally", "Pebble", "Abacus", "Digit"],
        2 => &["Fraction", "Remainder", "Divided", "Halfling", "Quotient"],
        3 => &["Decimal", "Percent", "Ratio", "Rounding", "Place-Value"],
        4 => &["Algebra", "Variable", "Equation", "Exponent", "Radical"],
        _ => &["Calculus", "Integral", "Limit", "Vector", "Infinite"],
    }
}

/// Gets tier-specific enemy suffixes
fn tier_enemy_suffixes(tier: u32) -> &'static [&'static str] {
    match tier {
        1 => &["Critter", "Beetle", "Sprite", "Imp", "Mouse"],
        2 => &["Fiend", "Goblin", "Wisp", "Bat", "Spider"],
        3 => &["Drake", "Serpent", "Wraith", "Harpy", "Golem"],
        4 => &["Golem", "Gargoyle", "Sphinx", "Knight", "Hydra"],
        _ => &["Titan", "Colossus", "Dragon", "Lich", "Overlord"],
    }
}

/// Generates a tier-themed enemy name
pub fn generate_enemy_name(tier: u32, rng: &mut impl Rng) -> String {
    let prefixes = tier_enemy_prefixes(tier);
    let suffixes = tier_enemy_suffixes(tier);

    let prefix = prefixes[rng.gen_range(0..prefixes.len())];
    let suffix = suffixes[rng.gen_range(0..suffixes.len())];

    format!("{} {}", prefix, suffix)
}

/// Generates the battle enemy for a grade and resolved tier, scaled by the
/// profile's boss multipliers. Enemy level is grade + tier - 1.
pub fn generate_enemy(
    grade: u32,
    tier: u32,
    profile: &DifficultyProfile,
    rng: &mut impl Rng,
) -> Enemy {
    let (hp, attack, defense) = calc_tier_enemy_stats(tier, grade);

    let boss_hp = (hp as f64 * profile.boss_health_multiplier).max(1.0) as u32;
    let boss_attack = (attack as f64 * profile.boss_attack_multiplier).max(1.0) as u32;

    let stats = StatBlock::new(boss_hp, boss_attack, defense)
        .with_level(clamp_grade(grade) + tier.max(MIN_TIER) - 1);

    Enemy::new(generate_enemy_name(tier, rng), tier, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::difficulty::Difficulty;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_tier_from_grade() {
        let medium = Difficulty::Medium.profile();
        assert_eq!(resolve_tier(1, None, medium, 5), 1);
        assert_eq!(resolve_tier(2, None, medium, 5), 1);
        assert_eq!(resolve_tier(3, None, medium, 5), 2);
        assert_eq!(resolve_tier(6, None, medium, 5), 3);
        // Grade 12 would be tier 6, capped at 5
        assert_eq!(resolve_tier(12, None, medium, 5), 5);
    }

    #[test]
    fn test_unit_difficulty_overrides_grade() {
        let medium = Difficulty::Medium.profile();
        assert_eq!(resolve_tier(8, Some(2), medium, 5), 2);
        assert_eq!(resolve_tier(1, Some(4), medium, 5), 4);
        assert_eq!(resolve_tier(1, Some(0), medium, 5), 1);
    }

    #[test]
    fn test_difficulty_bumps_tier() {
        assert_eq!(resolve_tier(3, None, Difficulty::Hard.profile(), 5), 3);
        assert_eq!(resolve_tier(3, None, Difficulty::Nightmare.profile(), 5), 4);
        assert_eq!(resolve_tier(9, None, Difficulty::Nightmare.profile(), 5), 5);
        assert_eq!(resolve_tier(3, Some(5), Difficulty::Hard.profile(), 5), 5);
    }

    #[test]
    fn test_configured_max_tier() {
        let nightmare = Difficulty::Nightmare.profile();
        assert_eq!(resolve_tier(6, None, nightmare, 3), 3);
    }

    #[test]
    fn test_tier_stats_scale_with_grade() {
        let (hp1, atk1, def1) = calc_tier_enemy_stats(2, 1);
        let (hp4, atk4, def4) = calc_tier_enemy_stats(2, 4);
        assert_eq!((hp1, atk1, def1), (80, 10, 3));
        assert_eq!((hp4, atk4, def4), (104, 13, 6));
    }

    #[test]
    fn test_out_of_range_tier_clamps() {
        assert_eq!(calc_tier_enemy_stats(0, 1), calc_tier_enemy_stats(1, 1));
        assert_eq!(calc_tier_enemy_stats(9, 1), calc_tier_enemy_stats(5, 1));
    }

    #[test]
    fn test_generate_enemy_applies_profile() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let medium = generate_enemy(1, 1, Difficulty::Medium.profile(), &mut rng);
        let nightmare = generate_enemy(1, 1, Difficulty::Nightmare.profile(), &mut rng);

        assert_eq!(medium.stats.max_hp, 50);
        assert_eq!(medium.stats.current_hp, 50);
        assert_eq!(medium.stats.attack, 7);
        assert_eq!(nightmare.stats.max_hp, 80); // 50 * 1.6
        assert_eq!(nightmare.stats.attack, 10); // 7 * 1.5 = 10.5
        assert_eq!(nightmare.stats.defense, medium.stats.defense);
    }

    #[test]
    fn test_enemy_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let enemy = generate_enemy(4, 3, Difficulty::Medium.profile(), &mut rng);
        assert_eq!(enemy.stats.level, 6);
        assert_eq!(enemy.tier, 3);
    }

    #[test]
    fn test_generate_enemy_name() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for tier in 1..=5 {
            let name = generate_enemy_name(tier, &mut rng);
            assert!(name.contains(' '));
            let prefix = name.split(' ').next().unwrap();
            assert!(tier_enemy_prefixes(tier).contains(&prefix));
        }
    }
}
