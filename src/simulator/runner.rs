//! Main simulation runner using the real `Battle` orchestrator.
//!
//! Each run is a campaign: one hero fights `battles_per_run` battles back to
//! back, healed to full before each. Statistics are tracked externally from
//! `BattleResult`s.

use super::config::SimConfig;
use super::drill::ArithmeticDrill;
use super::report::{RunStats, SimReport};
use crate::battle::{Battle, BattleParams, TurnState};
use crate::character::stats::StatBlock;
use crate::core::config::BattleConfig;
use crate::problem::{StandardAnswerValidator, UnitDescriptor};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

/// Never matches a numeric answer.
const WRONG_ANSWER: &str = "?";

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        // Create RNG for this run
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let run_stats = simulate_single_run(config, &mut rng);

        if config.verbosity >= 2 {
            info!(
                run = run_idx + 1,
                of = config.num_runs,
                wins = run_stats.wins,
                losses = run_stats.losses,
                timeouts = run_stats.timeouts,
                final_level = run_stats.final_level,
                max_enemy_hit = run_stats.max_enemy_hit,
                "run complete"
            );
        }
        all_runs.push(run_stats);
    }

    let report = SimReport::from_runs(all_runs);
    if config.verbosity >= 1 {
        info!(
            runs = report.num_runs,
            battles = report.total_battles,
            win_rate = report.win_rate,
            difficulty = config.difficulty.key(),
            grade = config.grade,
            "simulation complete"
        );
    }
    report
}

/// Simulate one campaign with a persistent hero.
fn simulate_single_run(config: &SimConfig, rng: &mut ChaCha8Rng) -> RunStats {
    let accuracy = config.accuracy.clamp(0.0, 1.0);
    let mut hero = StatBlock::new_hero();
    let mut stats = RunStats::default();

    for _ in 0..config.battles_per_run {
        hero.heal_full();
        let params = BattleParams::new(config.grade, UnitDescriptor::new("Drill"), config.difficulty);
        let mut battle = Battle::new(
            hero,
            params,
            ArithmeticDrill::new(rng.next_u64()),
            StandardAnswerValidator::default(),
        )
        .with_config(BattleConfig::seeded(rng.next_u64()));

        if let Err(e) = battle.start_battle() {
            warn!(error = %e, "simulated battle failed to start");
            hero = battle.into_hero();
            break;
        }
        stats.battles += 1;

        let mut player_turns = 0;
        while battle.battle_state() == TurnState::PlayerTurn {
            if player_turns >= config.max_turns_per_battle {
                break;
            }
            let Some(problem) = battle.current_problem() else {
                break;
            };
            let answer = if rng.gen_bool(accuracy) {
                problem.answer.clone()
            } else {
                WRONG_ANSWER.to_string()
            };

            let result = match battle.submit_answer(&answer) {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "simulated battle aborted");
                    break;
                }
            };
            player_turns += 1;
            stats.total_turns += 1;
            if result.correct {
                stats.correct_answers += 1;
            }

            if let Some(enemy_turn) = result.enemy_turn {
                let max_hp = battle.hero_stats().max_hp;
                stats.record_enemy_hit(enemy_turn.damage, max_hp);
            }
        }

        match battle.battle_state() {
            TurnState::Victory => {
                stats.wins += 1;
                stats.hp_remaining_on_win += battle.hero_stats().current_hp as u64;
            }
            TurnState::Defeat => stats.losses += 1,
            _ => stats.timeouts += 1,
        }

        hero = battle.into_hero();
    }

    stats.final_level = hero.level;
    stats.final_gold = hero.gold;
    stats
}
