// Playfield dimensions (px)
pub const GAME_WIDTH: f64 = 400.0;
pub const GAME_HEIGHT: f64 = 600.0;

// Player physics
pub const GRAVITY: f64 = 800.0; // px/s^2, downward
pub const FLAP_VELOCITY: f64 = -300.0; // px/s, velocity override (not additive)
pub const PLAYER_X: f64 = 100.0;
pub const PLAYER_RADIUS: f64 = 16.0;

// World scrolling
pub const SCROLL_SPEED: f64 = 200.0; // px/s, leftward
pub const SLOWMO_FACTOR: f64 = 0.4;

// Pipes
pub const PIPE_WIDTH: f64 = 70.0;
pub const PIPE_GAP: f64 = 180.0;
// Gap top stays within [PIPE_MARGIN, GAME_HEIGHT - PIPE_MARGIN - PIPE_GAP]
// so the gap is always fully on-screen and traversable.
pub const PIPE_MARGIN: f64 = 120.0;
pub const PIPE_SPAWN_X: f64 = GAME_WIDTH + 50.0;
pub const PIPE_OFFSCREEN_X: f64 = -60.0;
pub const SCORE_ZONE_WIDTH: f64 = 10.0;
pub const SCORE_ZONE_OFFSET: f64 = PIPE_WIDTH / 2.0 + 20.0;

// Spawn timers (ms on the session clock)
pub const FIRST_PIPE_DELAY_MS: u64 = 1000;
pub const PIPE_SPAWN_INTERVAL_MS: u64 = 1800;
pub const COIN_SPAWN_INTERVAL_MS: u64 = 800;
pub const GIFT_SPAWN_INTERVAL_MS: u64 = 5000;
pub const POWERUP_SPAWN_INTERVAL_MS: u64 = 8000;

// Spawn probability gates (pipes always spawn on their timer)
pub const COIN_SPAWN_CHANCE: f64 = 0.6;
pub const GIFT_SPAWN_CHANCE: f64 = 0.4;
pub const POWERUP_SPAWN_CHANCE: f64 = 0.3;
pub const DIAMOND_CHANCE: f64 = 0.1;

// Collectible values
pub const COIN_VALUE: u32 = 1;
pub const DIAMOND_VALUE: u32 = 5;
pub const GIFT_VALUE_MIN: u32 = 5;
pub const GIFT_VALUE_MAX: u32 = 10;

// Collectible placement and hitboxes
pub const COIN_RADIUS: f64 = 18.0;
pub const COIN_MARGIN: f64 = 80.0;
pub const COIN_SPAWN_X: f64 = GAME_WIDTH + 30.0;
pub const COIN_OFFSCREEN_X: f64 = -30.0;
pub const GIFT_RADIUS: f64 = 25.0;
pub const GIFT_MARGIN: f64 = 100.0;
pub const GIFT_SPAWN_X: f64 = GAME_WIDTH + 40.0;
pub const GIFT_OFFSCREEN_X: f64 = -40.0;
pub const POWERUP_RADIUS: f64 = 22.0;
pub const POWERUP_MARGIN: f64 = 100.0;
pub const POWERUP_SPAWN_X: f64 = GAME_WIDTH + 30.0;
pub const POWERUP_OFFSCREEN_X: f64 = -30.0;

// Power-up effect durations (ms)
pub const SHIELD_DURATION_MS: u64 = 5000;
pub const SLOWMO_DURATION_MS: u64 = 4000;
pub const MAGNET_DURATION_MS: u64 = 6000;
pub const GHOST_DURATION_MS: u64 = 3000;
// Grace window after a shield absorbs a hit, so the player can clear the pipe
pub const SHIELD_BREAK_INVINCIBILITY_MS: u64 = 500;

// Magnet steering
pub const MAGNET_RANGE: f64 = 150.0;
pub const MAGNET_PULL_FACTOR: f64 = 0.1;

// Leaderboard
pub const LEADERBOARD_LIMIT: usize = 10;

// Presence cadence (ms)
pub const HEARTBEAT_INTERVAL_MS: u64 = 2500;
pub const PRESENCE_POLL_INTERVAL_MS: u64 = 3000;
pub const PRESENCE_TIMEOUT_MS: i64 = 10_000;
pub const PRESENCE_CLEANUP_INTERVAL_MS: u64 = 5_000;
