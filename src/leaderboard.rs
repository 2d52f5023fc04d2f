//! Leaderboard client: cached reads, fire-and-forget score submission.
//!
//! The backend is a tiny HTTP service; the game must stay playable when it
//! is unreachable. Reads go through a local cache that survives fetch
//! failures, and submissions return an optimistic rank estimate immediately
//! while a background thread reports the confirmed rank later.

use std::error::Error;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::constants::LEADERBOARD_LIMIT;

pub type ApiError = Box<dyn Error + Send + Sync>;

/// One leaderboard row as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub score: u32,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Remote score service interface. `Send + Sync` so submissions can run on
/// a background thread.
pub trait ScoreApi: Send + Sync {
    /// Fetch the top entries, best first.
    fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, ApiError>;
    /// Submit a finished run's score; returns the confirmed rank.
    fn submit(&self, name: &str, score: u32, avatar: Option<&str>) -> Result<u32, ApiError>;
    /// Fetch the global high score (0 when the board is empty).
    fn fetch_high_score(&self) -> Result<u32, ApiError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    rank: u32,
}

#[derive(Debug, Deserialize)]
struct HighScoreResponse {
    #[serde(rename = "highScore")]
    high_score: u32,
}

/// HTTP implementation of [`ScoreApi`] backed by `ureq`.
pub struct HttpScoreApi {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpScoreApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            agent: ureq::Agent::new(),
        }
    }
}

impl ScoreApi for HttpScoreApi {
    fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let url = format!("{}/api/leaderboard", self.base_url);
        let entries: Vec<LeaderboardEntry> = self.agent.get(&url).call()?.into_json()?;
        Ok(entries)
    }

    fn submit(&self, name: &str, score: u32, avatar: Option<&str>) -> Result<u32, ApiError> {
        let url = format!("{}/api/scores", self.base_url);
        let response: SubmitResponse = self
            .agent
            .post(&url)
            .send_json(serde_json::json!({
                "name": name,
                "score": score,
                "avatar": avatar,
            }))?
            .into_json()?;
        Ok(response.rank)
    }

    fn fetch_high_score(&self) -> Result<u32, ApiError> {
        let url = format!("{}/api/highscore", self.base_url);
        let response: HighScoreResponse = self.agent.get(&url).call()?.into_json()?;
        Ok(response.high_score)
    }
}

/// Outcome of a background submission, delivered via [`Leaderboard::poll_confirmed`].
#[derive(Debug, Clone)]
pub struct RankConfirmation {
    /// Confirmed rank, or `None` if the submission failed.
    pub rank: Option<u32>,
    /// Fresh top entries fetched after the submission, if available.
    pub entries: Option<Vec<LeaderboardEntry>>,
}

/// Cached leaderboard state plus submission plumbing.
pub struct Leaderboard {
    api: Arc<dyn ScoreApi>,
    cached: Vec<LeaderboardEntry>,
    cached_high_score: u32,
    pending: Option<Receiver<RankConfirmation>>,
}

impl Leaderboard {
    pub fn new(api: Arc<dyn ScoreApi>) -> Self {
        Self {
            api,
            cached: Vec::new(),
            cached_high_score: 0,
            pending: None,
        }
    }

    /// Refresh the cache from the backend. On failure the previous cache is
    /// kept, so a flaky network degrades to stale data rather than none.
    pub fn refresh(&mut self) {
        match self.api.fetch_top() {
            Ok(entries) => {
                self.cached = entries;
                self.cached_high_score = self
                    .cached
                    .iter()
                    .map(|e| e.score)
                    .max()
                    .unwrap_or(self.cached_high_score);
            }
            Err(e) => log::warn!("leaderboard refresh failed: {}", e),
        }
        match self.api.fetch_high_score() {
            Ok(high) => self.cached_high_score = self.cached_high_score.max(high),
            Err(e) => log::warn!("high score fetch failed: {}", e),
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.cached
    }

    /// Best known global high score.
    pub fn high_score(&self) -> u32 {
        self.cached_high_score
    }

    /// Rank estimate from the cache: one plus the number of cached entries
    /// with a strictly greater score. Always a positive rank, even when the
    /// cache is empty or stale.
    pub fn estimated_rank(&self, score: u32) -> u32 {
        self.cached.iter().filter(|e| e.score > score).count() as u32 + 1
    }

    pub fn is_top_ten(&self, score: u32) -> bool {
        self.estimated_rank(score) as usize <= LEADERBOARD_LIMIT
    }

    /// Submit a score without blocking the game loop. Returns the optimistic
    /// rank estimate immediately; the confirmed rank arrives later through
    /// [`Self::poll_confirmed`]. A newer submission replaces any pending one.
    pub fn submit(&mut self, name: &str, score: u32, avatar: Option<&str>) -> u32 {
        let estimate = self.estimated_rank(score);

        let (tx, rx) = mpsc::channel();
        self.pending = Some(rx);

        let api = Arc::clone(&self.api);
        let name = name.to_string();
        let avatar = avatar.map(|s| s.to_string());
        thread::spawn(move || {
            let rank = match api.submit(&name, score, avatar.as_deref()) {
                Ok(rank) => Some(rank),
                Err(e) => {
                    log::warn!("score submission failed: {}", e);
                    None
                }
            };
            let entries = api.fetch_top().ok();
            // Receiver may be gone if the game exited; nothing to do then
            let _ = tx.send(RankConfirmation { rank, entries });
        });

        estimate
    }

    /// Check whether a background submission has finished. Merges any fresh
    /// entries into the cache and hands back the confirmation.
    pub fn poll_confirmed(&mut self) -> Option<RankConfirmation> {
        let confirmation = self.pending.as_ref()?.try_recv().ok()?;
        self.pending = None;
        if let Some(entries) = &confirmation.entries {
            self.cached = entries.clone();
            if let Some(max) = self.cached.iter().map(|e| e.score).max() {
                self.cached_high_score = self.cached_high_score.max(max);
            }
        }
        Some(confirmation)
    }
}
