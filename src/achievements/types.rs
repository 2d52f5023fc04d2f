//! Achievement state and unlock logic.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::game::effects::EffectKind;

/// Unique identifier for each achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    // Score milestones
    FirstScore,
    Score10,
    Score25,
    Score50,
    Score100,
    // Coin milestones (per run)
    FirstCoin,
    Coins10,
    Coins25,
    Coins50,
    // Power-up achievements
    FirstPowerUp,
    ShieldSave,
    SlowmoMaster,  // 5 lifetime slow-mo uses
    MagnetMaster,  // 5 lifetime magnet uses
    AllPowerUps,   // all three kinds in one run
    // Special
    Minimalist, // score 20+ with zero coins
    SpeedDemon, // survive 60 seconds
    Comeback,   // beat your previous high score
}

/// Record of an unlocked achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub unlocked_at: i64,
}

/// Global achievement state (saved to disk).
///
/// Unlocks are permanent; the lifetime counters feed the multi-use
/// milestones and persist with them. `session_power_ups` is per-run
/// scratch state and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Achievements {
    /// Map of unlocked achievements.
    pub unlocked: HashMap<AchievementId, UnlockedAchievement>,

    // Lifetime counters across all runs
    pub slowmo_uses: u64,
    pub magnet_uses: u64,
    pub shield_saves: u64,

    /// Distinct power-up kinds collected this run.
    #[serde(skip)]
    session_power_ups: HashSet<EffectKind>,
}

impl Achievements {
    /// Check if an achievement is unlocked.
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains_key(&id)
    }

    /// Unlock an achievement. Returns true if newly unlocked.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.insert(
            id,
            UnlockedAchievement {
                unlocked_at: chrono::Utc::now().timestamp(),
            },
        );
        true
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Reset per-run scratch state. Call at the start of every run.
    pub fn start_session(&mut self) {
        self.session_power_ups.clear();
    }

    fn unlock_into(&mut self, id: AchievementId, newly: &mut Vec<AchievementId>) {
        if self.unlock(id) {
            newly.push(id);
        }
    }

    /// Called when the run's score changes.
    /// Unlocks score milestones, and Comeback when the previous high
    /// score is first beaten (a zero high score does not count).
    pub fn on_score(&mut self, score: u32, previous_high_score: u32) -> Vec<AchievementId> {
        let mut newly = Vec::new();

        if score >= 1 {
            self.unlock_into(AchievementId::FirstScore, &mut newly);
        }
        if score >= 10 {
            self.unlock_into(AchievementId::Score10, &mut newly);
        }
        if score >= 25 {
            self.unlock_into(AchievementId::Score25, &mut newly);
        }
        if score >= 50 {
            self.unlock_into(AchievementId::Score50, &mut newly);
        }
        if score >= 100 {
            self.unlock_into(AchievementId::Score100, &mut newly);
        }

        if previous_high_score > 0 && score > previous_high_score {
            self.unlock_into(AchievementId::Comeback, &mut newly);
        }

        newly
    }

    /// Called when the run's coin total changes.
    pub fn on_coins(&mut self, run_total: u32) -> Vec<AchievementId> {
        let mut newly = Vec::new();

        if run_total >= 1 {
            self.unlock_into(AchievementId::FirstCoin, &mut newly);
        }
        if run_total >= 10 {
            self.unlock_into(AchievementId::Coins10, &mut newly);
        }
        if run_total >= 25 {
            self.unlock_into(AchievementId::Coins25, &mut newly);
        }
        if run_total >= 50 {
            self.unlock_into(AchievementId::Coins50, &mut newly);
        }

        newly
    }

    /// Called when a power-up is collected.
    /// Tracks lifetime use counters and the per-run kind set.
    pub fn on_power_up(&mut self, kind: EffectKind) -> Vec<AchievementId> {
        let mut newly = Vec::new();

        self.unlock_into(AchievementId::FirstPowerUp, &mut newly);
        self.session_power_ups.insert(kind);

        match kind {
            EffectKind::SlowMo => {
                self.slowmo_uses += 1;
                if self.slowmo_uses >= 5 {
                    self.unlock_into(AchievementId::SlowmoMaster, &mut newly);
                }
            }
            EffectKind::Magnet => {
                self.magnet_uses += 1;
                if self.magnet_uses >= 5 {
                    self.unlock_into(AchievementId::MagnetMaster, &mut newly);
                }
            }
            _ => {}
        }

        if EffectKind::SPAWNABLE
            .iter()
            .all(|k| self.session_power_ups.contains(k))
        {
            self.unlock_into(AchievementId::AllPowerUps, &mut newly);
        }

        newly
    }

    /// Called when a shield absorbs a fatal collision.
    pub fn on_shield_save(&mut self) -> Vec<AchievementId> {
        let mut newly = Vec::new();
        self.shield_saves += 1;
        self.unlock_into(AchievementId::ShieldSave, &mut newly);
        newly
    }

    /// Called once at game over with the run's final score and coin count.
    pub fn on_run_ended(&mut self, score: u32, coins: u32) -> Vec<AchievementId> {
        let mut newly = Vec::new();
        if score >= 20 && coins == 0 {
            self.unlock_into(AchievementId::Minimalist, &mut newly);
        }
        newly
    }

    /// Called as survival time accumulates.
    pub fn on_survival(&mut self, survival_secs: f64) -> Vec<AchievementId> {
        let mut newly = Vec::new();
        if survival_secs >= 60.0 {
            self.unlock_into(AchievementId::SpeedDemon, &mut newly);
        }
        newly
    }
}
