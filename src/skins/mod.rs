//! Cosmetic skin progression.
//!
//! Skins unlock from lifetime stats (high score, games played, coins,
//! power-ups, achievements). Selection is persisted; a selected skin whose
//! requirement is no longer met falls back to the default at read time.

pub mod data;

use serde::{Deserialize, Serialize};
use std::io;

use crate::persistence::{load_json_or_default, save_json, KvStore};
pub use data::{SkinDef, UnlockRule, SKINS};

const STATS_KEY: &str = "player_stats";
const SELECTED_SKIN_KEY: &str = "selected_skin";

/// Lifetime statistics that drive skin unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerStats {
    pub high_score: u32,
    pub total_games: u32,
    pub total_coins: u32,
    pub total_power_ups: u32,
    pub achievements_unlocked: u32,
}

/// Serialized wrapper for the selected skin id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SelectedSkin {
    id: String,
}

impl Default for SelectedSkin {
    fn default() -> Self {
        Self {
            id: "santa".to_string(),
        }
    }
}

/// Owns the lifetime stats and the current skin selection.
#[derive(Debug, Clone, Default)]
pub struct SkinManager {
    pub stats: PlayerStats,
    selected: SelectedSkin,
}

impl SkinManager {
    pub fn load(store: &dyn KvStore) -> Self {
        Self {
            stats: load_json_or_default(store, STATS_KEY),
            selected: load_json_or_default(store, SELECTED_SKIN_KEY),
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) -> io::Result<()> {
        save_json(store, STATS_KEY, &self.stats)?;
        save_json(store, SELECTED_SKIN_KEY, &self.selected)
    }

    /// Fold a finished run into the lifetime stats.
    pub fn record_game(&mut self, score: u32, coins: u32, power_ups: u32) {
        self.stats.total_games += 1;
        self.stats.total_coins += coins;
        self.stats.total_power_ups += power_ups;
        if score > self.stats.high_score {
            self.stats.high_score = score;
        }
    }

    pub fn set_achievements_unlocked(&mut self, count: u32) {
        self.stats.achievements_unlocked = count;
    }

    pub fn is_unlocked(&self, def: &SkinDef) -> bool {
        def.rule.is_met(&self.stats)
    }

    pub fn unlocked_skins(&self) -> Vec<&'static SkinDef> {
        SKINS.iter().filter(|def| self.is_unlocked(def)).collect()
    }

    pub fn all_skins(&self) -> &'static [SkinDef] {
        SKINS
    }

    /// The skin currently in effect. If the stored selection is unknown or
    /// locked, the first (always unlocked) skin is used instead; the stored
    /// selection itself is left alone so it takes effect once re-earned.
    pub fn selected_skin(&self) -> &'static SkinDef {
        SKINS
            .iter()
            .find(|def| def.id == self.selected.id && self.is_unlocked(def))
            .unwrap_or(&SKINS[0])
    }

    /// Select a skin by id. Returns false (and changes nothing) if the id is
    /// unknown or the skin is still locked.
    pub fn select(&mut self, id: &str) -> bool {
        let unlockable = SKINS
            .iter()
            .any(|def| def.id == id && self.is_unlocked(def));
        if !unlockable {
            return false;
        }
        self.selected.id = id.to_string();
        true
    }

    /// Skins unlocked now that were not unlocked under `previous` stats.
    pub fn newly_unlocked_since(&self, previous: &PlayerStats) -> Vec<&'static SkinDef> {
        SKINS
            .iter()
            .filter(|def| def.rule.is_met(&self.stats) && !def.rule.is_met(previous))
            .collect()
    }
}
