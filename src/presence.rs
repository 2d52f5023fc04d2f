//! Online presence: heartbeats out, active-player list in.
//!
//! Presence is strictly best-effort. Every network call either runs on a
//! background thread or degrades to an empty result; a dead backend never
//! stalls a frame.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{HEARTBEAT_INTERVAL_MS, PRESENCE_POLL_INTERVAL_MS};
use crate::persistence::KvStore;

const PLAYER_ID_KEY: &str = "player_id";

/// One currently-active player as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePlayer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub score: u32,
    #[serde(rename = "lastSeen", default)]
    pub last_seen: i64,
}

/// Client half of the presence protocol.
pub struct PresenceClient {
    base_url: String,
    agent: ureq::Agent,
    player_id: String,
}

impl PresenceClient {
    /// Create a client, loading or minting the stable per-install player id.
    pub fn new(base_url: impl Into<String>, store: &mut dyn KvStore) -> Self {
        let player_id = match store.get(PLAYER_ID_KEY) {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                let id = Uuid::new_v4().to_string();
                if let Err(e) = store.put(PLAYER_ID_KEY, &id) {
                    log::warn!("could not persist player id: {}", e);
                }
                id
            }
        };
        Self {
            base_url: base_url.into(),
            agent: ureq::Agent::new(),
            player_id,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Send a heartbeat on a background thread. Failures are logged and
    /// swallowed; the next beat retries naturally.
    pub fn heartbeat(&self, name: &str, avatar: Option<&str>, score: u32) {
        let url = format!("{}/api/presence", self.base_url);
        let agent = self.agent.clone();
        let body = serde_json::json!({
            "id": self.player_id,
            "name": name,
            "avatar": avatar,
            "score": score,
        });
        std::thread::spawn(move || {
            if let Err(e) = agent.post(&url).send_json(body) {
                log::debug!("presence heartbeat failed: {}", e);
            }
        });
    }

    /// Remove this player's presence entry (fire-and-forget, used on exit).
    pub fn remove(&self) {
        let url = format!("{}/api/presence/{}", self.base_url, self.player_id);
        let agent = self.agent.clone();
        std::thread::spawn(move || {
            if let Err(e) = agent.delete(&url).call() {
                log::debug!("presence removal failed: {}", e);
            }
        });
    }

    /// Fetch the active-player list, excluding this client. Returns an empty
    /// list on any failure.
    pub fn fetch_active(&self) -> Vec<ActivePlayer> {
        let url = format!("{}/api/presence", self.base_url);
        let players: Vec<ActivePlayer> = match self.agent.get(&url).call() {
            Ok(response) => match response.into_json() {
                Ok(players) => players,
                Err(e) => {
                    log::debug!("presence payload unreadable: {}", e);
                    return Vec::new();
                }
            },
            Err(e) => {
                log::debug!("presence fetch failed: {}", e);
                return Vec::new();
            }
        };
        players
            .into_iter()
            .filter(|p| p.id != self.player_id)
            .collect()
    }
}

/// Decides when a heartbeat or presence poll is due on the host clock.
#[derive(Debug, Clone, Default)]
pub struct PresenceScheduler {
    last_heartbeat_ms: Option<u64>,
    last_poll_ms: Option<u64>,
}

impl PresenceScheduler {
    /// True when a heartbeat should be sent at `now_ms`; marks it sent.
    pub fn heartbeat_due(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_heartbeat_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= HEARTBEAT_INTERVAL_MS);
        if due {
            self.last_heartbeat_ms = Some(now_ms);
        }
        due
    }

    /// True when the active-player list should be re-fetched; marks it done.
    pub fn poll_due(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_poll_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= PRESENCE_POLL_INTERVAL_MS);
        if due {
            self.last_poll_ms = Some(now_ms);
        }
        due
    }
}
