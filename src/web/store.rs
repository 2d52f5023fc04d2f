//! SQLite persistence for scores and presence.

use rusqlite::{params, Connection};

use crate::constants::LEADERBOARD_LIMIT;
use crate::leaderboard::LeaderboardEntry;
use crate::presence::ActivePlayer;

/// Database handle. One connection; the server serializes access behind a
/// mutex.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at the given path.
    pub fn open(path: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (tests).
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                avatar TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS presence (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                avatar TEXT,
                score INTEGER NOT NULL DEFAULT 0,
                last_seen INTEGER NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Top scores, best first; ties broken by earliest submission.
    pub fn top_scores(&self, limit: usize) -> rusqlite::Result<Vec<LeaderboardEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, score, avatar, created_at FROM scores
             ORDER BY score DESC, created_at ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(LeaderboardEntry {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                score: row.get(2)?,
                avatar: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        rows.collect()
    }

    /// Insert a score; returns its row id and rank (count of strictly
    /// greater scores plus one).
    pub fn add_score(
        &self,
        name: &str,
        score: u32,
        avatar: Option<&str>,
    ) -> rusqlite::Result<(i64, u32)> {
        self.conn.execute(
            "INSERT INTO scores (name, score, avatar) VALUES (?1, ?2, ?3)",
            params![name, score, avatar],
        )?;
        let id = self.conn.last_insert_rowid();
        let greater: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM scores WHERE score > ?1",
            params![score],
            |row| row.get(0),
        )?;
        Ok((id, greater + 1))
    }

    /// Highest submitted score, 0 when the table is empty.
    pub fn high_score(&self) -> rusqlite::Result<u32> {
        self.conn.query_row(
            "SELECT COALESCE(MAX(score), 0) FROM scores",
            [],
            |row| row.get(0),
        )
    }

    pub fn clear_scores(&self) -> rusqlite::Result<usize> {
        self.conn.execute("DELETE FROM scores", [])
    }

    pub fn is_top_ten(&self, rank: u32) -> bool {
        rank as usize <= LEADERBOARD_LIMIT
    }

    /// Insert or refresh a presence row.
    pub fn upsert_presence(
        &self,
        id: &str,
        name: &str,
        avatar: Option<&str>,
        score: u32,
        now_ms: i64,
    ) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO presence (id, name, avatar, score, last_seen)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 avatar = excluded.avatar,
                 score = excluded.score,
                 last_seen = excluded.last_seen",
            params![id, name, avatar, score, now_ms],
        )?;
        Ok(())
    }

    /// Drop presence rows whose last heartbeat is older than `cutoff_ms`.
    pub fn prune_presence(&self, cutoff_ms: i64) -> rusqlite::Result<usize> {
        self.conn.execute(
            "DELETE FROM presence WHERE last_seen < ?1",
            params![cutoff_ms],
        )
    }

    /// Players whose heartbeat is newer than `cutoff_ms`, most recent first.
    pub fn active_players(&self, cutoff_ms: i64) -> rusqlite::Result<Vec<ActivePlayer>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, avatar, score, last_seen FROM presence
             WHERE last_seen >= ?1 ORDER BY last_seen DESC",
        )?;
        let rows = stmt.query_map(params![cutoff_ms], |row| {
            Ok(ActivePlayer {
                id: row.get(0)?,
                name: row.get(1)?,
                avatar: row.get(2)?,
                score: row.get(3)?,
                last_seen: row.get(4)?,
            })
        })?;
        rows.collect()
    }

    pub fn remove_presence(&self, id: &str) -> rusqlite::Result<usize> {
        self.conn
            .execute("DELETE FROM presence WHERE id = ?1", params![id])
    }
}
