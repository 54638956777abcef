//! Integration test: battle flow through the public API
//!
//! Covers victory and defeat resolution, inert calls outside the player's
//! turn, persistence on victory, observer notifications and recovery from an
//! empty problem generator.

use mathquest::battle::{Battle, BattleError, BattleEvent, BattleParams, TurnState};
use mathquest::character::{HeroStore, MemoryStore, SaveError, StatBlock};
use mathquest::combat::Difficulty;
use mathquest::core::config::BattleConfig;
use mathquest::problem::{
    GeneratorRegistry, Problem, ProblemGenerator, StandardAnswerValidator, UnitDescriptor,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn two_plus_two(_grade: u32, _unit: &UnitDescriptor) -> Option<Problem> {
    Some(Problem::new("2 + 2", "4", "addition"))
}

fn battle_with(hero: StatBlock, difficulty: Difficulty) -> Battle {
    Battle::new(
        hero,
        BattleParams::new(1, UnitDescriptor::new("Addition"), difficulty),
        two_plus_two,
        StandardAnswerValidator::default(),
    )
    .with_config(BattleConfig::seeded(7))
}

/// Hits hard enough to end any grade 1 battle in one answer
fn champion() -> StatBlock {
    StatBlock::new(100, 500, 5)
}

/// Dies to the first enemy hit and barely scratches the enemy
fn glass_hero() -> StatBlock {
    StatBlock::new(1, 1, 0)
}

#[derive(Default)]
struct FailingStore;

impl HeroStore for FailingStore {
    fn save_hero(&mut self, _hero: &StatBlock) -> Result<(), SaveError> {
        Err(SaveError::NoConfigDir)
    }

    fn load_hero(&self) -> Result<Option<StatBlock>, SaveError> {
        Ok(None)
    }
}

#[test]
fn test_victory_resolves_within_submit() {
    let mut battle = battle_with(champion(), Difficulty::Medium);
    battle.start_battle().unwrap();

    let result = battle.submit_answer("4").unwrap();
    assert!(result.accepted);
    assert!(result.correct);
    assert!(result.victory);
    assert_eq!(result.enemy_hp, 0);
    assert!(result.enemy_turn.is_none());
    assert_eq!(battle.battle_state(), TurnState::Victory);

    // Enemy level 1 at grade 1, tier 1
    assert_eq!(result.exp_gained, 10);
    assert_eq!(result.gold_gained, 15);
    assert_eq!(battle.hero_stats().gold, 15);
    assert_eq!(battle.hero_stats().experience, 10);
}

#[test]
fn test_enemy_turn_after_victory_is_inert() {
    let mut battle = battle_with(champion(), Difficulty::Medium);
    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();

    let hero_before = battle.hero_stats().clone();
    let log_len = battle.battle_log().len();

    let enemy = battle.enemy_turn().unwrap();
    assert!(!enemy.accepted);
    assert_eq!(enemy.damage, 0);

    let again = battle.submit_answer("4").unwrap();
    assert!(!again.accepted);
    assert!(!again.victory);

    assert_eq!(battle.battle_state(), TurnState::Victory);
    assert_eq!(battle.hero_stats(), &hero_before);
    assert_eq!(battle.battle_log().len(), log_len);
}

#[test]
fn test_defeat_resolves_from_enemy_turn() {
    let mut battle = battle_with(glass_hero(), Difficulty::Medium);
    battle.start_battle().unwrap();

    let result = battle.submit_answer("4").unwrap();
    assert!(result.accepted);
    assert!(!result.victory);

    let enemy = result.enemy_turn.expect("instant config resolves the enemy turn");
    assert!(enemy.accepted);
    assert!(enemy.defeat);
    assert_eq!(enemy.hero_hp, 0);
    assert_eq!(battle.battle_state(), TurnState::Defeat);
    assert!(battle.current_problem().is_none());
}

#[test]
fn test_calls_after_defeat_are_inert() {
    let mut battle = battle_with(glass_hero(), Difficulty::Medium);
    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();

    let hero_before = battle.hero_stats().clone();
    let enemy_before = battle.enemy_stats().cloned();
    let log_len = battle.battle_log().len();

    let submit = battle.submit_answer("4").unwrap();
    assert!(!submit.accepted);
    let enemy = battle.enemy_turn().unwrap();
    assert!(!enemy.accepted);
    assert_eq!(battle.advance(10.0).unwrap(), None);

    assert_eq!(battle.battle_state(), TurnState::Defeat);
    assert_eq!(battle.hero_stats(), &hero_before);
    assert_eq!(battle.enemy_stats().cloned(), enemy_before);
    assert_eq!(battle.battle_log().len(), log_len);
}

#[test]
fn test_submit_during_enemy_turn_is_inert() {
    let mut battle = battle_with(StatBlock::new_hero(), Difficulty::Medium).with_config(
        BattleConfig {
            enemy_turn_delay_seconds: 1.0,
            seed: Some(3),
            ..Default::default()
        },
    );
    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();
    assert_eq!(battle.battle_state(), TurnState::EnemyTurn);

    let hero_before = battle.hero_stats().clone();
    let enemy_before = battle.enemy_stats().cloned();
    let log_len = battle.battle_log().len();
    let turns = battle.turn_count();

    let ignored = battle.submit_answer("4").unwrap();
    assert!(!ignored.accepted);
    assert_eq!(Some(ignored.enemy_hp), enemy_before.as_ref().map(|e| e.current_hp));
    assert_eq!(battle.battle_state(), TurnState::EnemyTurn);
    assert_eq!(battle.hero_stats(), &hero_before);
    assert_eq!(battle.enemy_stats().cloned(), enemy_before);
    assert_eq!(battle.battle_log().len(), log_len);
    assert_eq!(battle.turn_count(), turns);
    assert!(battle.has_pending_enemy_turn());

    let resolved = battle.enemy_turn().unwrap();
    assert!(resolved.accepted);
    assert_eq!(battle.battle_state(), TurnState::PlayerTurn);
    assert!(!battle.has_pending_enemy_turn());
}

#[test]
fn test_cancelled_enemy_turn_waits_for_explicit_call() {
    let mut battle = battle_with(StatBlock::new_hero(), Difficulty::Medium).with_config(
        BattleConfig {
            enemy_turn_delay_seconds: 0.5,
            seed: Some(3),
            ..Default::default()
        },
    );
    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();

    assert!(battle.cancel_pending_enemy_turn());
    assert!(!battle.cancel_pending_enemy_turn());
    assert_eq!(battle.advance(5.0).unwrap(), None);
    assert_eq!(battle.battle_state(), TurnState::EnemyTurn);

    assert!(battle.enemy_turn().unwrap().accepted);
    assert_eq!(battle.battle_state(), TurnState::PlayerTurn);
}

#[test]
fn test_victory_saves_hero_exactly_once() {
    let store = MemoryStore::new();
    let mut battle = battle_with(champion(), Difficulty::Easy).with_store(store.clone());
    battle.start_battle().unwrap();
    assert_eq!(store.save_count(), 0);

    battle.submit_answer("4").unwrap();
    battle.enemy_turn().unwrap();
    battle.submit_answer("4").unwrap();

    assert_eq!(store.save_count(), 1);
    assert_eq!(store.snapshot().as_ref(), Some(battle.hero_stats()));
}

#[test]
fn test_defeat_does_not_save() {
    let store = MemoryStore::new();
    let mut battle = battle_with(glass_hero(), Difficulty::Medium).with_store(store.clone());
    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();

    assert_eq!(battle.battle_state(), TurnState::Defeat);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_failed_save_does_not_block_victory() {
    let mut battle = battle_with(champion(), Difficulty::Medium).with_store(FailingStore);
    battle.start_battle().unwrap();

    let result = battle.submit_answer("4").unwrap();
    assert!(result.victory);
    assert_eq!(battle.battle_state(), TurnState::Victory);
}

#[test]
fn test_observer_sees_one_resolution_per_enemy_turn() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    let mut battle = battle_with(StatBlock::new_hero(), Difficulty::Medium)
        .with_config(BattleConfig {
            enemy_turn_delay_seconds: 1.0,
            seed: Some(11),
            ..Default::default()
        })
        .with_observer(move |event: &BattleEvent| sink.borrow_mut().push(event.clone()));

    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();
    assert!(battle.advance(0.6).unwrap().is_none());
    let resolved = battle.advance(0.6).unwrap().expect("delay elapsed");
    assert!(battle.advance(0.6).unwrap().is_none());

    let events = events.borrow();
    let resolutions: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::EnemyTurnResolved(r) => Some(*r),
            _ => None,
        })
        .collect();
    assert_eq!(resolutions, vec![resolved]);

    assert!(matches!(events[0], BattleEvent::BattleStarted { tier: 1, .. }));
    assert!(matches!(
        events[1],
        BattleEvent::PlayerAttack { correct: true, .. }
    ));
    assert!(matches!(events[2], BattleEvent::EnemyTurnScheduled { .. }));
    assert!(matches!(events[3], BattleEvent::EnemyAttack { .. }));
}

#[test]
fn test_wrong_answer_is_doubly_penalized() {
    // Grade 1 enemy defense is 2, so nominal wrong damage is
    // floor(10 + variance - 1) and medium halves it again.
    let mut battle = battle_with(StatBlock::new(100, 20, 5), Difficulty::Medium);
    battle.start_battle().unwrap();
    let enemy_max = battle.enemy_stats().unwrap().max_hp;

    let result = battle.submit_answer("5").unwrap();
    assert!(result.accepted);
    assert!(!result.correct);
    assert!((4..=7).contains(&result.damage), "damage {}", result.damage);
    assert_eq!(result.enemy_hp, enemy_max - result.damage);
}

#[test]
fn test_correct_answer_hits_harder_than_wrong() {
    let mut battle = battle_with(StatBlock::new(100, 20, 5), Difficulty::Medium);
    battle.start_battle().unwrap();

    let result = battle.submit_answer("4").unwrap();
    assert!(result.correct);
    assert!((19..=24).contains(&result.damage), "damage {}", result.damage);
}

#[test]
fn test_nightmare_boss_hits_are_capped() {
    let mut battle = Battle::new(
        StatBlock::new_hero(),
        BattleParams::new(12, UnitDescriptor::new("Calculus"), Difficulty::Nightmare),
        two_plus_two,
        StandardAnswerValidator::default(),
    )
    .with_config(BattleConfig::seeded(1));
    battle.start_battle().unwrap();
    assert_eq!(battle.enemy().unwrap().tier, 5);

    let mut hits = Vec::new();
    while battle.battle_state() == TurnState::PlayerTurn {
        let result = battle.submit_answer("wrong").unwrap();
        if let Some(enemy) = result.enemy_turn {
            hits.push(enemy.damage);
        }
    }

    // 20% of 100 max HP per hit: the hero survives exactly four
    assert_eq!(hits, vec![20; 5]);
    assert_eq!(battle.battle_state(), TurnState::Defeat);
    assert_eq!(battle.turn_count(), 5);
}

#[test]
fn test_registry_supplies_battle_problems() {
    let mut registry = GeneratorRegistry::new();
    registry.register("fractions", |_: u32, _: &UnitDescriptor| {
        Some(Problem::new("1/2 + 1/4", "3/4", "fractions"))
    });
    registry.register_tier_default(1, two_plus_two);

    let mut battle = Battle::new(
        StatBlock::new_hero(),
        BattleParams::new(
            4,
            UnitDescriptor::new("Unit 2: Adding Fractions"),
            Difficulty::Easy,
        ),
        registry,
        StandardAnswerValidator::default(),
    )
    .with_config(BattleConfig::seeded(5));

    battle.start_battle().unwrap();
    assert_eq!(battle.current_problem().unwrap().topic, "fractions");

    let result = battle.submit_answer("0.75").unwrap();
    assert!(result.correct);
}

#[test]
fn test_unit_difficulty_overrides_grade_tier() {
    let mut battle = Battle::new(
        StatBlock::new_hero(),
        BattleParams::new(
            1,
            UnitDescriptor::new("Challenge").with_difficulty(4),
            Difficulty::Hard,
        ),
        two_plus_two,
        StandardAnswerValidator::default(),
    )
    .with_config(BattleConfig::seeded(5));

    battle.start_battle().unwrap();
    assert_eq!(battle.enemy().unwrap().tier, 5);
}

/// Returns a problem on the first call, nothing on the second, then problems
/// again.
struct FlakyGenerator {
    calls: Rc<Cell<u32>>,
}

impl ProblemGenerator for FlakyGenerator {
    fn generate(&mut self, _grade: u32, _unit: &UnitDescriptor) -> Option<Problem> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        (call != 2).then(|| Problem::new("3 + 3", "6", "addition"))
    }
}

#[test]
fn test_recovers_after_generator_comes_back_empty() {
    let calls = Rc::new(Cell::new(0));
    let mut battle = Battle::new(
        StatBlock::new_hero(),
        BattleParams::new(1, UnitDescriptor::new("Addition"), Difficulty::Medium),
        FlakyGenerator {
            calls: Rc::clone(&calls),
        },
        StandardAnswerValidator::default(),
    )
    .with_config(BattleConfig::seeded(9));
    battle.start_battle().unwrap();

    let hero_max = battle.hero_stats().max_hp;
    let enemy_max = battle.enemy_stats().unwrap().max_hp;

    let err = battle.submit_answer("6").unwrap_err();
    assert!(matches!(err, BattleError::ProblemUnavailable { grade: 1, .. }));
    assert_eq!(battle.battle_state(), TurnState::PlayerTurn);
    assert!(battle.current_problem().is_none());

    // Both hits landed even though the call failed
    assert!(battle.hero_stats().current_hp < hero_max);
    assert!(battle.enemy_stats().unwrap().current_hp < enemy_max);
    assert_eq!(battle.turn_count(), 1);
    let log = battle.battle_log().entries();
    assert!(log[log.len() - 2].starts_with("Correct!"));
    assert!(log[log.len() - 1].contains("attacks you"));

    // No problem to answer
    assert!(!battle.submit_answer("6").unwrap().accepted);

    battle.request_problem().unwrap();
    assert_eq!(calls.get(), 3);
    assert!(battle.current_problem().is_some());
    assert!(battle.submit_answer("6").unwrap().accepted);
}

#[test]
fn test_hero_carries_over_between_battles() {
    let mut battle = battle_with(champion(), Difficulty::Medium);
    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();
    let hero = battle.into_hero();
    assert_eq!(hero.gold, 15);

    let mut next = battle_with(hero, Difficulty::Medium);
    next.start_battle().unwrap();
    next.submit_answer("4").unwrap();
    let hero = next.into_hero();
    assert_eq!(hero.gold, 30);
    assert_eq!(hero.experience, 20);
}

#[test]
fn test_flee_drops_pending_enemy_turn() {
    let mut battle = battle_with(StatBlock::new_hero(), Difficulty::Medium).with_config(
        BattleConfig {
            enemy_turn_delay_seconds: 2.0,
            seed: Some(1),
            ..Default::default()
        },
    );
    battle.start_battle().unwrap();
    battle.submit_answer("4").unwrap();
    assert!(battle.has_pending_enemy_turn());

    let hero = battle.into_hero();
    assert_eq!(hero.current_hp, hero.max_hp);
}
