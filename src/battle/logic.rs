//! Battle orchestrator.
//!
//! [`Battle`] owns the hero's stat block for the length of one battle, the
//! enemy, the turn controller and the log. It is driven by three calls:
//!
//! 1. `start_battle()` - spawns the enemy and fetches the first problem
//! 2. `submit_answer()` - resolves the player's hit, then schedules the enemy
//! 3. `advance()` / `enemy_turn()` - resolves the enemy's reply
//!
//! The enemy reply is deferred by `BattleConfig::enemy_turn_delay_seconds` so
//! the caller can show the player's hit first. A delay of zero resolves it
//! inside `submit_answer`. While the reply is pending the battle is in
//! `EnemyTurn` and `submit_answer` is a no-op.

use super::types::*;
use crate::character::save::{HeroStore, NullStore};
use crate::character::stats::StatBlock;
use crate::combat::damage::{apply_damage, calculate_damage, cap_boss_damage, scale_damage};
use crate::combat::difficulty::Difficulty;
use crate::combat::enemy::{clamp_grade, generate_enemy, resolve_tier, Enemy};
use crate::combat::turn::{Side, TurnController};
use crate::core::config::BattleConfig;
use crate::core::constants::{GOLD_PER_ENEMY_LEVEL, XP_PER_ENEMY_LEVEL};
use crate::problem::{AnswerValidator, Problem, ProblemGenerator, UnitDescriptor};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What the battle is about: who is learning what, and how hard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleParams {
    pub grade: u32,
    pub unit: UnitDescriptor,
    pub difficulty: Difficulty,
}

impl BattleParams {
    pub fn new(grade: u32, unit: UnitDescriptor, difficulty: Difficulty) -> Self {
        Self {
            grade,
            unit,
            difficulty,
        }
    }
}

/// A cancellable, time-driven enemy reply.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledEnemyTurn {
    delay_seconds: f64,
    elapsed_seconds: f64,
}

impl ScheduledEnemyTurn {
    fn new(delay_seconds: f64) -> Self {
        Self {
            delay_seconds,
            elapsed_seconds: 0.0,
        }
    }

    /// Accumulates time. Returns true once the delay has elapsed.
    fn advance(&mut self, elapsed_seconds: f64) -> bool {
        if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            self.elapsed_seconds += elapsed_seconds;
        }
        self.elapsed_seconds >= self.delay_seconds
    }
}

pub struct Battle {
    id: Uuid,
    params: BattleParams,
    config: BattleConfig,
    hero: StatBlock,
    enemy: Option<Enemy>,
    state: TurnState,
    turns: TurnController,
    log: BattleLog,
    current_problem: Option<Problem>,
    pending_enemy_turn: Option<ScheduledEnemyTurn>,
    generator: Box<dyn ProblemGenerator>,
    validator: Box<dyn AnswerValidator>,
    store: Box<dyn HeroStore>,
    observer: Box<dyn BattleObserver>,
    rng: Box<dyn RngCore>,
}

impl Battle {
    /// Creates a battle in the `Waiting` state. The hero is moved in and comes
    /// back out through [`Battle::into_hero`].
    pub fn new(
        hero: StatBlock,
        params: BattleParams,
        generator: impl ProblemGenerator + 'static,
        validator: impl AnswerValidator + 'static,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            params,
            config: BattleConfig::default(),
            hero,
            enemy: None,
            state: TurnState::Waiting,
            turns: TurnController::new(),
            log: BattleLog::new(),
            current_problem: None,
            pending_enemy_turn: None,
            generator: Box::new(generator),
            validator: Box::new(validator),
            store: Box::new(NullStore),
            observer: Box::new(NullObserver),
            rng: Box::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Applies a config. A configured seed replaces the RNG.
    pub fn with_config(mut self, config: BattleConfig) -> Self {
        if let Some(seed) = config.seed {
            self.rng = Box::new(ChaCha8Rng::seed_from_u64(seed));
        }
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: impl HeroStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_observer(mut self, observer: impl BattleObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    // === Accessors ===

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn battle_state(&self) -> TurnState {
        self.state
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.current_problem.as_ref()
    }

    pub fn hero_stats(&self) -> &StatBlock {
        &self.hero
    }

    /// `None` until the battle has started.
    pub fn enemy_stats(&self) -> Option<&StatBlock> {
        self.enemy.as_ref().map(|e| &e.stats)
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn enemy_name(&self) -> Option<&str> {
        self.enemy.as_ref().map(|e| e.name.as_str())
    }

    pub fn battle_log(&self) -> &BattleLog {
        &self.log
    }

    pub fn turn_count(&self) -> u32 {
        self.turns.turn_count()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.params.difficulty
    }

    pub fn params(&self) -> &BattleParams {
        &self.params
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn has_pending_enemy_turn(&self) -> bool {
        self.pending_enemy_turn.is_some()
    }

    /// Ends the session and hands the hero back. Fleeing is just this: any
    /// pending enemy turn is dropped with the battle.
    pub fn into_hero(self) -> StatBlock {
        self.hero
    }

    // === Operations ===

    /// Spawns the enemy, fetches the first problem and hands the turn to the
    /// player.
    ///
    /// Fails without changing anything if the generator has no problem.
    pub fn start_battle(&mut self) -> Result<(), BattleError> {
        if self.state != TurnState::Waiting {
            return Err(BattleError::AlreadyStarted);
        }

        let profile = self.params.difficulty.profile();
        let grade = clamp_grade(self.params.grade);
        let tier = resolve_tier(
            grade,
            self.params.unit.difficulty,
            profile,
            self.config.max_tier,
        );

        let problem = self.next_problem()?;
        let enemy = generate_enemy(grade, tier, profile, &mut self.rng);

        self.turns.reset();
        self.turns.start_turn(Side::Player)?;

        self.log.clear();
        self.log.push(format!(
            "A wild {} (Lv. {}) appears! Difficulty: {}",
            enemy.name, enemy.stats.level, self.params.difficulty
        ));

        info!(
            battle_id = %self.id,
            enemy = %enemy.name,
            enemy_level = enemy.stats.level,
            enemy_hp = enemy.stats.max_hp,
            tier,
            difficulty = self.params.difficulty.key(),
            "battle started"
        );

        let event = BattleEvent::BattleStarted {
            enemy_name: enemy.name.clone(),
            enemy_level: enemy.stats.level,
            tier,
        };

        self.enemy = Some(enemy);
        self.current_problem = Some(problem);
        self.pending_enemy_turn = None;
        self.state = TurnState::PlayerTurn;
        self.observer.on_event(&event);

        Ok(())
    }

    /// Resolves the player's answer against the current problem.
    ///
    /// Outside the player's turn this is a no-op returning an inert result
    /// (`accepted == false`). Any answer that does not match is simply wrong.
    ///
    /// # Errors
    ///
    /// With a zero enemy-turn delay the enemy replies inside this call, and the
    /// next problem is fetched right after. If the generator has nothing this
    /// returns `ProblemUnavailable` after both hits were applied. The battle is
    /// then in `PlayerTurn` with no problem: read the outcome from
    /// `hero_stats()`, `enemy_stats()` and `battle_log()`, and call
    /// `request_problem()` to continue.
    pub fn submit_answer(&mut self, answer: &str) -> Result<BattleResult, BattleError> {
        if self.state != TurnState::PlayerTurn {
            debug!(battle_id = %self.id, state = %self.state, "answer ignored: not the player's turn");
            return Ok(BattleResult::inert(self.enemy_hp()));
        }

        let profile = self.params.difficulty.profile();
        let enemy_hp_before = self.enemy_hp();
        let (Some(enemy), Some(problem)) = (self.enemy.as_mut(), self.current_problem.as_ref())
        else {
            debug!(battle_id = %self.id, "answer ignored: no current problem");
            return Ok(BattleResult::inert(enemy_hp_before));
        };

        let correct = self.validator.validate(problem, answer);
        let nominal = calculate_damage(&self.hero, &enemy.stats, correct, &mut self.rng);
        let damage = if correct {
            scale_damage(nominal, &[profile.player_damage_multiplier])
        } else {
            scale_damage(
                nominal,
                &[profile.player_damage_multiplier, profile.wrong_answer_penalty],
            )
        };
        let enemy_alive = apply_damage(&mut enemy.stats, damage as i64);
        let enemy_hp = enemy.stats.current_hp;
        let enemy_level = enemy.stats.level;
        let enemy_name = enemy.name.clone();

        if correct {
            self.log.push(format!(
                "Correct! You strike the {} for {} damage.",
                enemy_name, damage
            ));
        } else {
            self.log.push(format!(
                "Wrong! The answer was {}. Your shaky strike deals {} damage.",
                problem.answer, damage
            ));
        }
        debug!(battle_id = %self.id, correct, nominal, damage, enemy_hp, "player attack");
        self.observer
            .on_event(&BattleEvent::PlayerAttack { damage, correct });

        let mut result = BattleResult {
            accepted: true,
            correct,
            damage,
            enemy_hp,
            ..Default::default()
        };

        self.turns.end_turn()?;

        if !enemy_alive {
            self.state = TurnState::Victory;

            let exp_gained =
                (enemy_level as f64 * XP_PER_ENEMY_LEVEL * profile.experience_multiplier).floor()
                    as u64;
            let gold_gained =
                (enemy_level as f64 * GOLD_PER_ENEMY_LEVEL * profile.experience_multiplier).floor()
                    as u64;

            self.hero.add_gold(gold_gained);
            let leveled_up = self.hero.add_experience(exp_gained);
            self.persist_hero();

            self.log.push(format!(
                "{} was defeated! You gained {} XP and {} gold.",
                enemy_name, exp_gained, gold_gained
            ));
            self.observer.on_event(&BattleEvent::EnemyDefeated {
                exp_gained,
                gold_gained,
            });
            if leveled_up {
                self.log
                    .push(format!("Level up! You are now level {}.", self.hero.level));
                self.observer.on_event(&BattleEvent::LeveledUp {
                    new_level: self.hero.level,
                });
            }

            info!(
                battle_id = %self.id,
                enemy = %enemy_name,
                exp_gained,
                gold_gained,
                leveled_up,
                turns = self.turns.turn_count(),
                "victory"
            );

            result.victory = true;
            result.leveled_up = leveled_up;
            result.exp_gained = exp_gained;
            result.gold_gained = gold_gained;
            return Ok(result);
        }

        self.turns.start_turn(Side::Enemy)?;
        self.state = TurnState::EnemyTurn;

        let delay_seconds = self.config.enemy_turn_delay_seconds;
        if delay_seconds > 0.0 {
            self.pending_enemy_turn = Some(ScheduledEnemyTurn::new(delay_seconds));
            debug!(battle_id = %self.id, delay_seconds, "enemy turn scheduled");
            self.observer
                .on_event(&BattleEvent::EnemyTurnScheduled { delay_seconds });
        } else {
            result.enemy_turn = Some(self.resolve_enemy_turn()?);
        }

        Ok(result)
    }

    /// Advances the scheduled enemy turn by `elapsed_seconds`.
    ///
    /// Returns the enemy turn's result on the call that completes the delay,
    /// `None` otherwise.
    pub fn advance(&mut self, elapsed_seconds: f64) -> Result<Option<EnemyTurnResult>, BattleError> {
        let Some(pending) = self.pending_enemy_turn.as_mut() else {
            return Ok(None);
        };
        if !pending.advance(elapsed_seconds) {
            return Ok(None);
        }

        self.pending_enemy_turn = None;
        self.resolve_enemy_turn().map(Some)
    }

    /// Cancels the scheduled enemy turn. The battle stays in `EnemyTurn`
    /// until `enemy_turn()` is called. Returns whether anything was pending.
    pub fn cancel_pending_enemy_turn(&mut self) -> bool {
        let cancelled = self.pending_enemy_turn.take().is_some();
        if cancelled {
            debug!(battle_id = %self.id, "enemy turn cancelled");
        }
        cancelled
    }

    /// Resolves the enemy's reply now, skipping any remaining delay.
    /// Outside `EnemyTurn` this is a no-op returning an inert result.
    pub fn enemy_turn(&mut self) -> Result<EnemyTurnResult, BattleError> {
        if self.state != TurnState::EnemyTurn {
            debug!(battle_id = %self.id, state = %self.state, "enemy turn ignored");
            return Ok(EnemyTurnResult::inert(self.hero.current_hp));
        }
        self.pending_enemy_turn = None;
        self.resolve_enemy_turn()
    }

    /// Fetches a fresh problem for the player's turn. Used to recover after
    /// the generator came back empty following an enemy turn.
    pub fn request_problem(&mut self) -> Result<(), BattleError> {
        if self.state != TurnState::PlayerTurn {
            return Ok(());
        }
        let problem = self.next_problem()?;
        self.current_problem = Some(problem);
        Ok(())
    }

    // === Internals ===

    fn resolve_enemy_turn(&mut self) -> Result<EnemyTurnResult, BattleError> {
        let Some(enemy) = self.enemy.as_ref() else {
            return Ok(EnemyTurnResult::inert(self.hero.current_hp));
        };

        let nominal = calculate_damage(&enemy.stats, &self.hero, true, &mut self.rng);
        let damage = cap_boss_damage(nominal, self.hero.level, self.hero.max_hp);
        let enemy_name = enemy.name.clone();
        let hero_alive = apply_damage(&mut self.hero, damage as i64);

        self.log
            .push(format!("{} attacks you for {} damage!", enemy_name, damage));
        debug!(battle_id = %self.id, nominal, damage, hero_hp = self.hero.current_hp, "enemy attack");
        self.observer.on_event(&BattleEvent::EnemyAttack { damage });

        self.turns.end_turn()?;

        let result = EnemyTurnResult {
            accepted: true,
            damage,
            hero_hp: self.hero.current_hp,
            defeat: !hero_alive,
        };

        if !hero_alive {
            self.state = TurnState::Defeat;
            self.current_problem = None;
            self.log
                .push(format!("You were defeated by the {}...", enemy_name));
            info!(
                battle_id = %self.id,
                enemy = %enemy_name,
                turns = self.turns.turn_count(),
                "defeat"
            );
            self.observer.on_event(&BattleEvent::HeroDefeated);
            self.observer
                .on_event(&BattleEvent::EnemyTurnResolved(result));
            return Ok(result);
        }

        self.turns.start_turn(Side::Player)?;
        self.state = TurnState::PlayerTurn;
        self.current_problem = None;
        self.observer
            .on_event(&BattleEvent::EnemyTurnResolved(result));

        let problem = self.next_problem()?;
        self.current_problem = Some(problem);

        Ok(result)
    }

    fn next_problem(&mut self) -> Result<Problem, BattleError> {
        self.generator
            .generate(self.params.grade, &self.params.unit)
            .ok_or_else(|| {
                warn!(
                    battle_id = %self.id,
                    grade = self.params.grade,
                    unit = %self.params.unit.name,
                    "problem generator returned nothing"
                );
                BattleError::ProblemUnavailable {
                    grade: self.params.grade,
                    unit: self.params.unit.name.clone(),
                }
            })
    }

    /// Fire-and-forget: a failed save is logged, never propagated.
    fn persist_hero(&mut self) {
        if let Err(e) = self.hero.save(self.store.as_mut()) {
            warn!(battle_id = %self.id, error = %e, "failed to save hero");
        }
    }

    fn enemy_hp(&self) -> u32 {
        self.enemy.as_ref().map_or(0, |e| e.stats.current_hp)
    }
}
