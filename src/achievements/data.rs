//! Static achievement definitions.

use super::types::{AchievementId, Achievements};

/// Static definition of an achievement.
#[derive(Debug, Clone)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// All achievement definitions in display order.
pub const ALL_ACHIEVEMENTS: &[AchievementDef] = &[
    // Score milestones
    AchievementDef {
        id: AchievementId::FirstScore,
        name: "First Flight",
        description: "Pass your first pipe",
        icon: "🐣",
    },
    AchievementDef {
        id: AchievementId::Score10,
        name: "Getting Started",
        description: "Score 10 in one run",
        icon: "⭐",
    },
    AchievementDef {
        id: AchievementId::Score25,
        name: "Pro Flapper",
        description: "Score 25 in one run",
        icon: "🌟",
    },
    AchievementDef {
        id: AchievementId::Score50,
        name: "Master Flapper",
        description: "Score 50 in one run",
        icon: "💫",
    },
    AchievementDef {
        id: AchievementId::Score100,
        name: "Legend",
        description: "Score 100 in one run",
        icon: "👑",
    },
    // Coin milestones
    AchievementDef {
        id: AchievementId::FirstCoin,
        name: "Shiny!",
        description: "Collect your first coin",
        icon: "🪙",
    },
    AchievementDef {
        id: AchievementId::Coins10,
        name: "Coin Collector",
        description: "Collect 10 coins in one run",
        icon: "💰",
    },
    AchievementDef {
        id: AchievementId::Coins25,
        name: "Treasure Hunter",
        description: "Collect 25 coins in one run",
        icon: "💎",
    },
    AchievementDef {
        id: AchievementId::Coins50,
        name: "Moneybags",
        description: "Collect 50 coins in one run",
        icon: "🤑",
    },
    // Power-ups
    AchievementDef {
        id: AchievementId::FirstPowerUp,
        name: "Power Up!",
        description: "Collect your first power-up",
        icon: "⚡",
    },
    AchievementDef {
        id: AchievementId::ShieldSave,
        name: "Close Call",
        description: "Survive a hit with a shield",
        icon: "🛡️",
    },
    AchievementDef {
        id: AchievementId::SlowmoMaster,
        name: "Time Lord",
        description: "Use slow motion 5 times",
        icon: "⏳",
    },
    AchievementDef {
        id: AchievementId::MagnetMaster,
        name: "Magnetic Personality",
        description: "Use the magnet 5 times",
        icon: "🧲",
    },
    AchievementDef {
        id: AchievementId::AllPowerUps,
        name: "Fully Loaded",
        description: "Collect every power-up type in one run",
        icon: "🎰",
    },
    // Special
    AchievementDef {
        id: AchievementId::Minimalist,
        name: "Minimalist",
        description: "Score 20+ without collecting a single coin",
        icon: "🧘",
    },
    AchievementDef {
        id: AchievementId::SpeedDemon,
        name: "Speed Demon",
        description: "Survive for 60 seconds",
        icon: "🔥",
    },
    AchievementDef {
        id: AchievementId::Comeback,
        name: "Comeback Kid",
        description: "Beat your previous high score",
        icon: "📈",
    },
];

/// Look up the static definition for an achievement.
pub fn get_achievement_def(id: AchievementId) -> Option<&'static AchievementDef> {
    ALL_ACHIEVEMENTS.iter().find(|def| def.id == id)
}

impl Achievements {
    /// Total number of achievements that exist.
    pub fn total_count(&self) -> usize {
        ALL_ACHIEVEMENTS.len()
    }
}
