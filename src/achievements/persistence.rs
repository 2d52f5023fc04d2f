//! Achievement persistence (load/save through the key-value store).

use std::io;

use super::types::Achievements;
use crate::persistence::{load_json_or_default, save_json, KvStore};

const ACHIEVEMENTS_KEY: &str = "achievements";

/// Load achievements from the store, or return default if missing or corrupt.
pub fn load_achievements(store: &dyn KvStore) -> Achievements {
    load_json_or_default(store, ACHIEVEMENTS_KEY)
}

/// Save achievements to the store.
pub fn save_achievements(store: &mut dyn KvStore, achievements: &Achievements) -> io::Result<()> {
    save_json(store, ACHIEVEMENTS_KEY, achievements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::types::AchievementId;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_achievements_roundtrip() {
        let mut store = MemoryStore::default();

        let mut achievements = Achievements::default();
        achievements.unlock(AchievementId::FirstScore);
        achievements.magnet_uses = 3;
        save_achievements(&mut store, &achievements).unwrap();

        let loaded = load_achievements(&store);
        assert!(loaded.is_unlocked(AchievementId::FirstScore));
        assert_eq!(loaded.magnet_uses, 3);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let store = MemoryStore::default();
        let loaded = load_achievements(&store);
        assert_eq!(loaded.unlocked_count(), 0);
        assert_eq!(loaded.slowmo_uses, 0);
    }
}
