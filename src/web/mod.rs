//! Leaderboard and presence backend (feature `server`).
//!
//! A small HTTP service over a SQLite database: top-ten scores, global
//! high score, and a presence table with heartbeat expiry.

pub mod server;
pub mod store;

pub use server::run_server;
pub use store::Store;
