//! Attack resolution and the boss fairness cap.
//!
//! These pure functions calculate combat outcomes. The only side effect in
//! this module is [`apply_damage`], which mutates its target.

use crate::character::stats::StatBlock;
use crate::core::constants::*;
use rand::Rng;

/// Rolls the per-attack variance, uniform over `0..=DAMAGE_VARIANCE_MAX`.
pub fn roll_variance(rng: &mut impl Rng) -> u32 {
    rng.gen_range(0..=DAMAGE_VARIANCE_MAX)
}

/// Calculate damage from `attacker` to `defender` with a fresh variance roll.
///
/// # Arguments
/// * `attacker` - Uses attack plus weapon bonus
/// * `defender` - Uses defense
/// * `was_correct` - Wrong answers halve the base before variance
/// * `rng` - Random number generator
///
/// # Returns
/// Damage dealt, never less than 1
pub fn calculate_damage(
    attacker: &StatBlock,
    defender: &StatBlock,
    was_correct: bool,
    rng: &mut impl Rng,
) -> u32 {
    let variance = roll_variance(rng);
    calculate_damage_with_variance(attacker, defender, was_correct, variance)
}

/// Deterministic core of [`calculate_damage`].
///
/// The halving and the defense penalty stay fractional; the single floor is
/// taken on the final difference.
pub fn calculate_damage_with_variance(
    attacker: &StatBlock,
    defender: &StatBlock,
    was_correct: bool,
    variance: u32,
) -> u32 {
    let mut base = attacker.total_attack() as f64;
    if !was_correct {
        base *= WRONG_ANSWER_BASE_FACTOR;
    }

    let raw = base + variance as f64;
    let defense_penalty = defender.defense as f64 * DEFENSE_MITIGATION_FACTOR;

    floor_damage(raw - defense_penalty)
}

/// Scales already-computed damage by one or more multipliers.
/// Multipliers are applied together and floored once.
pub fn scale_damage(damage: u32, multipliers: &[f64]) -> u32 {
    let scaled = multipliers
        .iter()
        .fold(damage as f64, |acc, m| acc * m);
    floor_damage(scaled)
}

/// Apply damage to a stat block.
///
/// Negative amounts are treated as zero. HP floors at 0.
///
/// # Returns
/// Whether the target is still alive
pub fn apply_damage(target: &mut StatBlock, amount: i64) -> bool {
    let amount = amount.clamp(0, u32::MAX as i64) as u32;
    target.current_hp = target.current_hp.saturating_sub(amount);
    target.is_alive()
}

/// Caps a boss hit so it can never exceed 20% of the hero's max HP.
///
/// Nominal damage is boosted by 5% per hero level above 1 before the cap.
/// A full-health hero always takes at least 5 hits to defeat.
pub fn cap_boss_damage(nominal_damage: u32, hero_level: u32, hero_max_hp: u32) -> u32 {
    let levels_above_one = hero_level.saturating_sub(1) as u64;
    let multiplier_percent = 100 + levels_above_one * BOSS_DAMAGE_PERCENT_PER_LEVEL;

    // Saturates: past u64::MAX the ceiling wins anyway
    let boosted = (nominal_damage as u64).saturating_mul(multiplier_percent) / 100;
    let ceiling = hero_max_hp as u64 * BOSS_HIT_MAX_HP_PERCENT / 100;

    boosted.min(ceiling).max(MIN_DAMAGE as u64) as u32
}

fn floor_damage(value: f64) -> u32 {
    let floored = value.floor();
    if floored < MIN_DAMAGE as f64 {
        MIN_DAMAGE
    } else if floored >= u32::MAX as f64 {
        u32::MAX
    } else {
        floored as u32
    }
}
