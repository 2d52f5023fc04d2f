//! Core game logic: physics, spawning, collision, effects, and the
//! per-frame session state machine.

pub mod collision;
pub mod effects;
pub mod entities;
pub mod player;
pub mod session;
pub mod spawner;

use std::io;
use std::sync::Arc;

use crate::achievements::{load_achievements, save_achievements, Achievements};
use crate::leaderboard::{Leaderboard, ScoreApi};
use crate::persistence::KvStore;
use crate::skins::SkinManager;

/// Everything a session needs besides its own state: the player profile,
/// progression, and the leaderboard client. Owns the persistence store so
/// game over can save in one place.
pub struct GameContext {
    pub store: Box<dyn KvStore>,
    pub achievements: Achievements,
    pub skins: SkinManager,
    pub leaderboard: Leaderboard,
    pub player_name: String,
    pub player_avatar: Option<String>,
    /// Global high score snapshotted when the current run started.
    pub previous_high_score: u32,
}

impl GameContext {
    pub fn new(store: Box<dyn KvStore>, api: Arc<dyn ScoreApi>, player_name: String) -> Self {
        let achievements = load_achievements(store.as_ref());
        let skins = SkinManager::load(store.as_ref());
        Self {
            store,
            achievements,
            skins,
            leaderboard: Leaderboard::new(api),
            player_name,
            player_avatar: None,
            previous_high_score: 0,
        }
    }

    /// Prepare for a new run: reset per-run achievement state and snapshot
    /// the high score so Comeback compares against pre-run data.
    pub fn start_session(&mut self) {
        self.achievements.start_session();
        self.leaderboard.refresh();
        self.previous_high_score = self.leaderboard.high_score().max(self.skins.stats.high_score);
    }

    /// Persist achievements and skin progression.
    pub fn save(&mut self) -> io::Result<()> {
        save_achievements(self.store.as_mut(), &self.achievements)?;
        self.skins.save(self.store.as_mut())
    }
}
