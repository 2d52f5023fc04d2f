//! Flappy Snake arcade game core library.
//!
//! Implements the per-frame game loop (physics, spawning, collisions,
//! scoring, power-ups) plus achievement/skin progression and the
//! leaderboard/presence client. The presentation layer (renderer, audio,
//! input widgets) consumes [`game::session::TickEvent`]s and feeds back
//! only the flap input; it is not part of this crate.

pub mod achievements;
pub mod constants;
pub mod game;
pub mod leaderboard;
pub mod persistence;
pub mod presence;
pub mod skins;
#[cfg(feature = "server")]
pub mod web;

pub use game::session::{game_tick, GamePhase, GameSession, TickEvent};
pub use game::GameContext;
