// Attack resolution
pub const DAMAGE_VARIANCE_MAX: u32 = 5;
pub const WRONG_ANSWER_BASE_FACTOR: f64 = 0.5;
pub const DEFENSE_MITIGATION_FACTOR: f64 = 0.5;
pub const MIN_DAMAGE: u32 = 1;

// Boss fairness cap (integer percent math so floors are exact)
pub const BOSS_DAMAGE_PERCENT_PER_LEVEL: u64 = 5;
pub const BOSS_HIT_MAX_HP_PERCENT: u64 = 20;

// Leveling growth, in percent of the previous value
pub const LEVEL_UP_HP_PERCENT: u64 = 120;
pub const LEVEL_UP_ATTACK_PERCENT: u64 = 115;
pub const LEVEL_UP_DEFENSE_PERCENT: u64 = 110;
pub const LEVEL_UP_XP_CURVE_PERCENT: u64 = 150;

// Starting hero
pub const BASE_HERO_HP: u32 = 100;
pub const BASE_HERO_ATTACK: u32 = 10;
pub const BASE_HERO_DEFENSE: u32 = 5;
pub const BASE_XP_TO_NEXT_LEVEL: u64 = 100;

// Victory rewards per enemy level
pub const XP_PER_ENEMY_LEVEL: f64 = 10.0;
pub const GOLD_PER_ENEMY_LEVEL: f64 = 15.0;

// Enemy tiers and grades
pub const MIN_TIER: u32 = 1;
pub const MAX_TIER: u32 = 5;
pub const MIN_GRADE: u32 = 1;
pub const MAX_GRADE: u32 = 12;

// Enemy tier base stats: (base_hp, hp_step, base_atk, atk_step, base_def, def_step)
// Index 0 = Tier 1. Steps are per grade above grade 1.
pub const TIER_ENEMY_STATS: [(u32, u32, u32, u32, u32, u32); 5] = [
    (50, 6, 7, 1, 2, 0),     // Tier 1: Counting Critters
    (80, 8, 10, 1, 3, 1),    // Tier 2: Fraction Fiends
    (110, 10, 13, 2, 5, 1),  // Tier 3: Decimal Drakes
    (150, 12, 17, 2, 7, 1),  // Tier 4: Algebra Golems
    (200, 15, 22, 3, 10, 2), // Tier 5: Calculus Titans
];

// Deferred enemy turn
pub const ENEMY_TURN_DELAY_SECONDS: f64 = 1.0;

// Answer checking
pub const NUMERIC_ANSWER_TOLERANCE: f64 = 0.01;

// Save file format
pub const SAVE_VERSION_MAGIC: u64 = 0x4D51_4845_524F_0001; // "MQHERO" v1
