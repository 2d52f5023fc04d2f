//! Leaderboard and presence backend binary.
//!
//! Usage:
//!   cargo run --features server --bin flappy-snake-server -- [--port 3000] [--db scores.db]

use std::env;

use flappy_snake::web::{run_server, Store};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mut port: u16 = 3000;
    let mut db_path = "flappy-snake.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--port" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(3000);
                    i += 1;
                }
            }
            "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Usage: flappy-snake-server [--port PORT] [--db PATH]");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    let store = match Store::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            log::error!("could not open database {}: {}", db_path, e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("could not start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_server(port, store)) {
        log::error!("server error: {}", e);
        std::process::exit(1);
    }
}
