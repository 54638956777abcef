//! Combatant stat block and leveling.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// Health, offense, defense and progression of one combatant.
///
/// The hero's block outlives battles and is the snapshot that gets persisted.
/// An enemy's block lives only as long as its battle.
///
/// IMPORTANT: When adding new fields, use `#[serde(default)]` so older saves
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_hp: u32,
    pub current_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub gold: u64,
    #[serde(default)]
    pub weapon_damage_bonus: u32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new_hero()
    }
}

impl StatBlock {
    /// A level 1 hero with starting stats.
    pub fn new_hero() -> Self {
        Self::new(BASE_HERO_HP, BASE_HERO_ATTACK, BASE_HERO_DEFENSE)
    }

    /// Full-health level 1 block. `max_hp` is raised to 1 if zero.
    pub fn new(max_hp: u32, attack: u32, defense: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            max_hp,
            current_hp: max_hp,
            attack,
            defense,
            level: 1,
            experience: 0,
            experience_to_next_level: BASE_XP_TO_NEXT_LEVEL,
            gold: 0,
            weapon_damage_bonus: 0,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_weapon_bonus(mut self, bonus: u32) -> Self {
        self.weapon_damage_bonus = bonus;
        self
    }

    pub fn with_experience_to_next_level(mut self, threshold: u64) -> Self {
        self.experience_to_next_level = threshold.max(1);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Attack including the equipped weapon bonus.
    pub fn total_attack(&self) -> u32 {
        self.attack.saturating_add(self.weapon_damage_bonus)
    }

    pub fn heal_full(&mut self) {
        self.current_hp = self.max_hp;
    }

    pub fn add_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Adds experience and processes any level-ups in order.
    /// Returns true if at least one level was gained.
    pub fn add_experience(&mut self, exp: u64) -> bool {
        self.experience = self.experience.saturating_add(exp);
        let mut leveled_up = false;

        while self.experience >= self.experience_to_next_level {
            self.experience -= self.experience_to_next_level;
            self.level_up();
            leveled_up = true;
        }

        leveled_up
    }

    /// Gains one level. Heals exactly the max HP gained, not to full.
    pub fn level_up(&mut self) {
        let old_max_hp = self.max_hp;

        self.level += 1;
        self.max_hp = scale_percent_u32(self.max_hp, LEVEL_UP_HP_PERCENT);
        self.current_hp = self
            .current_hp
            .saturating_add(self.max_hp - old_max_hp)
            .min(self.max_hp);
        self.attack = scale_percent_u32(self.attack, LEVEL_UP_ATTACK_PERCENT);
        self.defense = scale_percent_u32(self.defense, LEVEL_UP_DEFENSE_PERCENT);
        self.experience_to_next_level =
            (self.experience_to_next_level as u128 * LEVEL_UP_XP_CURVE_PERCENT as u128 / 100)
                .min(u64::MAX as u128) as u64;
    }
}

/// floor(value * percent / 100), saturating at u32::MAX.
fn scale_percent_u32(value: u32, percent: u64) -> u32 {
    (value as u64 * percent / 100).min(u32::MAX as u64) as u32
}
