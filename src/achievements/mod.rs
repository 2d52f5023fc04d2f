//! Achievement system module.
//!
//! Tracks lifetime milestones across every run. Unlocks are permanent and
//! stored in the player's save directory alongside the rest of the profile.

pub mod data;
pub mod persistence;
pub mod types;

pub use data::{get_achievement_def, ALL_ACHIEVEMENTS};
pub use persistence::{load_achievements, save_achievements};
pub use types::{AchievementId, Achievements, UnlockedAchievement};
