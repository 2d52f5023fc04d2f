//! Headless balance simulator.
//!
//! Runs autopilot games against the real tick loop and prints score and
//! progression statistics. Useful for checking tuning changes without a
//! renderer.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                 # Default: 100 games
//!   cargo run --bin simulate -- -n 1000      # 1000 games
//!   cargo run --bin simulate -- --seed 42    # Reproducible run

use std::env;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use flappy_snake::achievements::ALL_ACHIEVEMENTS;
use flappy_snake::constants::{GAME_HEIGHT, PIPE_GAP, PIPE_WIDTH};
use flappy_snake::game::session::TickEvent;
use flappy_snake::leaderboard::{ApiError, LeaderboardEntry, ScoreApi};
use flappy_snake::persistence::MemoryStore;
use flappy_snake::{game_tick, GameContext, GameSession};

struct SimConfig {
    num_games: u64,
    seed: u64,
    dt_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_games: 100,
            seed: 0,
            dt_ms: 16,
        }
    }
}

/// Score API that always fails, so the simulator never touches the network.
struct NullScoreApi;

impl ScoreApi for NullScoreApi {
    fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        Err("simulation is offline".into())
    }
    fn submit(&self, _: &str, _: u32, _: Option<&str>) -> Result<u32, ApiError> {
        Err("simulation is offline".into())
    }
    fn fetch_high_score(&self) -> Result<u32, ApiError> {
        Err("simulation is offline".into())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("Flappy Snake balance simulator");
    println!("  Games: {}", config.num_games);
    println!("  Seed:  {}", config.seed);
    println!("  Tick:  {}ms", config.dt_ms);
    println!();

    let mut ctx = GameContext::new(
        Box::new(MemoryStore::default()),
        Arc::new(NullScoreApi),
        "autopilot".to_string(),
    );
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut scores = Vec::with_capacity(config.num_games as usize);
    let mut total_coins: u64 = 0;
    let mut total_powerups: u64 = 0;
    let mut total_survival_s = 0.0;

    for _ in 0..config.num_games {
        ctx.start_session();
        let mut session = GameSession::new();

        while !session.is_over() {
            autopilot(&mut session);
            let events = game_tick(&mut session, &mut ctx, config.dt_ms, &mut rng);
            for event in &events {
                if let TickEvent::GameOver { score, coins, .. } = event {
                    scores.push(*score);
                    total_coins += *coins as u64;
                }
            }
        }
        total_powerups += session.powerups_collected as u64;
        total_survival_s += session.survival_seconds();
    }

    scores.sort_unstable();
    let games = scores.len() as f64;
    let avg: f64 = scores.iter().map(|&s| s as f64).sum::<f64>() / games;
    let median = scores[scores.len() / 2];
    let max = scores.last().copied().unwrap_or(0);

    println!("Results:");
    println!("  Score avg/median/max: {:.1} / {} / {}", avg, median, max);
    println!("  Coins per game:       {:.1}", total_coins as f64 / games);
    println!("  Power-ups per game:   {:.2}", total_powerups as f64 / games);
    println!("  Survival avg:         {:.1}s", total_survival_s / games);
    println!(
        "  Achievements:         {}/{}",
        ctx.achievements.unlocked_count(),
        ALL_ACHIEVEMENTS.len()
    );
    println!(
        "  Skins unlocked:       {}/{}",
        ctx.skins.unlocked_skins().len(),
        ctx.skins.all_skins().len()
    );
    println!("  Lifetime high score:  {}", ctx.skins.stats.high_score);
}

/// Steer toward the center of the next pipe gap, flapping when below it.
fn autopilot(session: &mut GameSession) {
    let target = session
        .pipes
        .iter()
        .filter(|p| p.x + PIPE_WIDTH / 2.0 > session.player.x)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|p| p.gap_top + PIPE_GAP / 2.0)
        .unwrap_or(GAME_HEIGHT / 2.0);

    if session.player.y > target && session.player.vy >= 0.0 {
        session.flap();
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--games" => {
                if i + 1 < args.len() {
                    config.num_games = args[i + 1].parse::<u64>().unwrap_or(100).max(1);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--dt" => {
                if i + 1 < args.len() {
                    config.dt_ms = args[i + 1].parse().unwrap_or(16).max(1);
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Usage: simulate [-n GAMES] [-s SEED] [--dt MS]");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}
