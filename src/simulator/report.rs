//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics for one campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,
    pub total_turns: u64,
    pub correct_answers: u64,
    pub damage_taken: u64,
    pub enemy_hits: u64,
    /// Largest single enemy hit
    pub max_enemy_hit: u32,
    /// Largest single enemy hit as a fraction of the hero's max HP at the time
    pub max_hit_fraction: f64,
    pub hp_remaining_on_win: u64,
    pub final_level: u32,
    pub final_gold: u64,
}

impl RunStats {
    pub fn record_enemy_hit(&mut self, damage: u32, hero_max_hp: u32) {
        self.damage_taken += damage as u64;
        self.enemy_hits += 1;
        self.max_enemy_hit = self.max_enemy_hit.max(damage);
        if hero_max_hp > 0 {
            self.max_hit_fraction = self
                .max_hit_fraction
                .max(damage as f64 / hero_max_hp as f64);
        }
    }
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub total_battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,
    pub win_rate: f64,

    pub avg_turns_per_battle: f64,
    pub avg_damage_taken_per_battle: f64,
    pub avg_hp_remaining_on_win: f64,
    pub accuracy_observed: f64,
    pub max_enemy_hit: u32,
    pub max_hit_fraction: f64,

    pub avg_final_level: f64,
    pub avg_final_gold: f64,
    pub level_distribution: BTreeMap<u32, u32>,

    // Individual run stats for detailed analysis
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let total_battles: u32 = runs.iter().map(|r| r.battles).sum();
        let wins: u32 = runs.iter().map(|r| r.wins).sum();
        let losses: u32 = runs.iter().map(|r| r.losses).sum();
        let timeouts: u32 = runs.iter().map(|r| r.timeouts).sum();

        let total_turns: u64 = runs.iter().map(|r| r.total_turns).sum();
        let correct: u64 = runs.iter().map(|r| r.correct_answers).sum();
        let damage_taken: u64 = runs.iter().map(|r| r.damage_taken).sum();
        let hp_on_win: u64 = runs.iter().map(|r| r.hp_remaining_on_win).sum();

        let battles = total_battles.max(1) as f64;
        let run_count = num_runs.max(1) as f64;

        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        Self {
            num_runs,
            total_battles,
            wins,
            losses,
            timeouts,
            win_rate: wins as f64 / battles,
            avg_turns_per_battle: total_turns as f64 / battles,
            avg_damage_taken_per_battle: damage_taken as f64 / battles,
            avg_hp_remaining_on_win: hp_on_win as f64 / wins.max(1) as f64,
            accuracy_observed: correct as f64 / total_turns.max(1) as f64,
            max_enemy_hit: runs.iter().map(|r| r.max_enemy_hit).max().unwrap_or(0),
            max_hit_fraction: runs.iter().map(|r| r.max_hit_fraction).fold(0.0, f64::max),
            avg_final_level: runs.iter().map(|r| r.final_level as f64).sum::<f64>() / run_count,
            avg_final_gold: runs.iter().map(|r| r.final_gold as f64).sum::<f64>() / run_count,
            level_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {}, battles: {} ({} won, {} lost, {} timed out)\n\n",
            self.num_runs, self.total_battles, self.wins, self.losses, self.timeouts
        ));

        report.push_str("── BATTLES ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate * 100.0));
        report.push_str(&format!("  Avg Turns:           {:.1}\n", self.avg_turns_per_battle));
        report.push_str(&format!(
            "  Avg Damage Taken:    {:.1}\n",
            self.avg_damage_taken_per_battle
        ));
        report.push_str(&format!(
            "  Avg HP Left on Win:  {:.1}\n",
            self.avg_hp_remaining_on_win
        ));
        report.push_str(&format!(
            "  Observed Accuracy:   {:.1}%\n\n",
            self.accuracy_observed * 100.0
        ));

        report.push_str("── FAIRNESS ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Largest Enemy Hit:   {}\n", self.max_enemy_hit));
        report.push_str(&format!(
            "  Largest Hit / MaxHP: {:.1}%\n\n",
            self.max_hit_fraction * 100.0
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Final Gold:      {:.0}\n", self.avg_final_gold));
        for (level, count) in &self.level_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Level {:2}: {:>5.1}% {}\n", level, pct, bar));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let rating = if self.win_rate > 0.95 {
            "TOO EASY - Players almost never lose"
        } else if self.win_rate > 0.6 {
            "GOOD - Challenging but fair"
        } else if self.win_rate > 0.3 {
            "HARD - Frequent defeats"
        } else {
            "TOO HARD - Most battles are lost"
        };
        report.push_str(&format!("  Rating: {}\n", rating));

        report
    }

    /// One-line summary for `--quiet`.
    pub fn summary_line(&self) -> String {
        format!(
            "battles={} win_rate={:.3} avg_turns={:.1} avg_damage_taken={:.1} max_hit_fraction={:.3} avg_level={:.1}",
            self.total_battles,
            self.win_rate,
            self.avg_turns_per_battle,
            self.avg_damage_taken_per_battle,
            self.max_hit_fraction,
            self.avg_final_level
        )
    }
}
