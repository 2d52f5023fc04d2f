//! Static skin definitions and unlock rules.

use super::PlayerStats;

/// Stat threshold that unlocks a skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRule {
    Always,
    HighScore(u32),
    TotalGames(u32),
    TotalCoins(u32),
    TotalPowerUps(u32),
    AchievementsUnlocked(u32),
}

impl UnlockRule {
    pub fn is_met(&self, stats: &PlayerStats) -> bool {
        match *self {
            UnlockRule::Always => true,
            UnlockRule::HighScore(n) => stats.high_score >= n,
            UnlockRule::TotalGames(n) => stats.total_games >= n,
            UnlockRule::TotalCoins(n) => stats.total_coins >= n,
            UnlockRule::TotalPowerUps(n) => stats.total_power_ups >= n,
            UnlockRule::AchievementsUnlocked(n) => stats.achievements_unlocked >= n,
        }
    }
}

/// Static definition of a skin.
#[derive(Debug, Clone)]
pub struct SkinDef {
    pub id: &'static str,
    pub emoji: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: &'static str,
    pub rule: UnlockRule,
}

/// All skins in display order. The first entry is the fallback when the
/// stored selection is unavailable.
pub const SKINS: &[SkinDef] = &[
    SkinDef {
        id: "snake",
        emoji: "🐍",
        name: "Classic Snake",
        description: "The original",
        requirement: "Always available",
        rule: UnlockRule::Always,
    },
    SkinDef {
        id: "santa",
        emoji: "🎅",
        name: "Santa",
        description: "Ho ho ho",
        requirement: "Always available",
        rule: UnlockRule::Always,
    },
    SkinDef {
        id: "fire",
        emoji: "🔥",
        name: "Fire",
        description: "Hot streak",
        requirement: "High score of 25",
        rule: UnlockRule::HighScore(25),
    },
    SkinDef {
        id: "rocket",
        emoji: "🚀",
        name: "Rocket",
        description: "To the moon",
        requirement: "High score of 50",
        rule: UnlockRule::HighScore(50),
    },
    SkinDef {
        id: "star",
        emoji: "⭐",
        name: "Star",
        description: "A true legend",
        requirement: "High score of 100",
        rule: UnlockRule::HighScore(100),
    },
    SkinDef {
        id: "ghost",
        emoji: "👻",
        name: "Ghost",
        description: "Keeps coming back",
        requirement: "Play 10 games",
        rule: UnlockRule::TotalGames(10),
    },
    SkinDef {
        id: "alien",
        emoji: "👽",
        name: "Alien",
        description: "Out of this world",
        requirement: "Play 25 games",
        rule: UnlockRule::TotalGames(25),
    },
    SkinDef {
        id: "crown",
        emoji: "👑",
        name: "Crown",
        description: "Royalty",
        requirement: "Collect 100 coins total",
        rule: UnlockRule::TotalCoins(100),
    },
    SkinDef {
        id: "diamond",
        emoji: "💎",
        name: "Diamond",
        description: "Unbreakable",
        requirement: "Collect 500 coins total",
        rule: UnlockRule::TotalCoins(500),
    },
    SkinDef {
        id: "unicorn",
        emoji: "🦄",
        name: "Unicorn",
        description: "Pure magic",
        requirement: "Collect 20 power-ups total",
        rule: UnlockRule::TotalPowerUps(20),
    },
    SkinDef {
        id: "dragon",
        emoji: "🐉",
        name: "Dragon",
        description: "Feared by pipes everywhere",
        requirement: "Unlock 10 achievements",
        rule: UnlockRule::AchievementsUnlocked(10),
    },
    SkinDef {
        id: "rainbow",
        emoji: "🌈",
        name: "Rainbow",
        description: "Earned everything",
        requirement: "Unlock every achievement",
        rule: UnlockRule::AchievementsUnlocked(17),
    },
];
