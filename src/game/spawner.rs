//! Timed entity spawning on the session clock.
//!
//! Each entity class has its own interval timer. Pipes always spawn when
//! their timer fires; coins, gifts and power-ups roll a probability gate
//! first, so a fired timer may produce nothing. All timers disarm on game
//! over and stay disarmed for the rest of the session.

use rand::Rng;

use crate::constants::{
    COIN_MARGIN, COIN_SPAWN_CHANCE, COIN_SPAWN_INTERVAL_MS, COIN_SPAWN_X, COIN_VALUE,
    DIAMOND_CHANCE, DIAMOND_VALUE, FIRST_PIPE_DELAY_MS, GAME_HEIGHT, GIFT_MARGIN,
    GIFT_SPAWN_CHANCE, GIFT_SPAWN_INTERVAL_MS, GIFT_SPAWN_X, GIFT_VALUE_MAX, GIFT_VALUE_MIN,
    PIPE_GAP, PIPE_MARGIN, PIPE_SPAWN_INTERVAL_MS, PIPE_SPAWN_X, POWERUP_MARGIN,
    POWERUP_SPAWN_CHANCE, POWERUP_SPAWN_INTERVAL_MS, POWERUP_SPAWN_X,
};
use crate::game::effects::EffectKind;
use crate::game::entities::{Coin, Gift, Pipe, PowerUpPickup};

/// Repeating timer on the session clock. `None` means disarmed.
#[derive(Debug, Clone)]
struct IntervalTimer {
    next_fire_ms: Option<u64>,
    interval_ms: u64,
}

impl IntervalTimer {
    fn new(first_fire_ms: u64, interval_ms: u64) -> Self {
        Self {
            next_fire_ms: Some(first_fire_ms),
            interval_ms,
        }
    }

    /// Number of times the timer fires up to and including `now_ms`.
    /// A large tick can cover several intervals; each is reported.
    fn fire_due(&mut self, now_ms: u64) -> u32 {
        let mut fired = 0;
        while let Some(next) = self.next_fire_ms {
            if next > now_ms {
                break;
            }
            self.next_fire_ms = Some(next + self.interval_ms);
            fired += 1;
        }
        fired
    }

    fn disarm(&mut self) {
        self.next_fire_ms = None;
    }
}

/// Owns the four spawn timers and the entity id counter.
#[derive(Debug, Clone)]
pub struct Spawner {
    pipe_timer: IntervalTimer,
    coin_timer: IntervalTimer,
    gift_timer: IntervalTimer,
    powerup_timer: IntervalTimer,
    next_entity_id: u64,
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            pipe_timer: IntervalTimer::new(FIRST_PIPE_DELAY_MS, PIPE_SPAWN_INTERVAL_MS),
            coin_timer: IntervalTimer::new(COIN_SPAWN_INTERVAL_MS, COIN_SPAWN_INTERVAL_MS),
            gift_timer: IntervalTimer::new(GIFT_SPAWN_INTERVAL_MS, GIFT_SPAWN_INTERVAL_MS),
            powerup_timer: IntervalTimer::new(
                POWERUP_SPAWN_INTERVAL_MS,
                POWERUP_SPAWN_INTERVAL_MS,
            ),
            next_entity_id: 0,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Fire every due timer and push the spawned entities.
    pub fn update<R: Rng>(
        &mut self,
        now_ms: u64,
        rng: &mut R,
        pipes: &mut Vec<Pipe>,
        coins: &mut Vec<Coin>,
        gifts: &mut Vec<Gift>,
        powerups: &mut Vec<PowerUpPickup>,
    ) {
        for _ in 0..self.pipe_timer.fire_due(now_ms) {
            let gap_top = rng.gen_range(PIPE_MARGIN..=GAME_HEIGHT - PIPE_MARGIN - PIPE_GAP);
            pipes.push(Pipe::new(self.next_id(), PIPE_SPAWN_X, gap_top));
        }

        for _ in 0..self.coin_timer.fire_due(now_ms) {
            if !rng.gen_bool(COIN_SPAWN_CHANCE) {
                continue;
            }
            let y = rng.gen_range(COIN_MARGIN..=GAME_HEIGHT - COIN_MARGIN);
            let value = if rng.gen_bool(DIAMOND_CHANCE) {
                DIAMOND_VALUE
            } else {
                COIN_VALUE
            };
            coins.push(Coin::new(self.next_id(), COIN_SPAWN_X, y, value));
        }

        for _ in 0..self.gift_timer.fire_due(now_ms) {
            if !rng.gen_bool(GIFT_SPAWN_CHANCE) {
                continue;
            }
            let y = rng.gen_range(GIFT_MARGIN..=GAME_HEIGHT - GIFT_MARGIN);
            let value = rng.gen_range(GIFT_VALUE_MIN..=GIFT_VALUE_MAX);
            gifts.push(Gift::new(self.next_id(), GIFT_SPAWN_X, y, value));
        }

        for _ in 0..self.powerup_timer.fire_due(now_ms) {
            if !rng.gen_bool(POWERUP_SPAWN_CHANCE) {
                continue;
            }
            let y = rng.gen_range(POWERUP_MARGIN..=GAME_HEIGHT - POWERUP_MARGIN);
            let kind = EffectKind::SPAWNABLE[rng.gen_range(0..EffectKind::SPAWNABLE.len())];
            powerups.push(PowerUpPickup::new(self.next_id(), POWERUP_SPAWN_X, y, kind));
        }
    }

    /// Disarm every timer. Called on game over; nothing spawns afterwards.
    pub fn shutdown(&mut self) {
        self.pipe_timer.disarm();
        self.coin_timer.disarm();
        self.gift_timer.disarm();
        self.powerup_timer.disarm();
    }

    pub fn is_shut_down(&self) -> bool {
        self.pipe_timer.next_fire_ms.is_none()
            && self.coin_timer.next_fire_ms.is_none()
            && self.gift_timer.next_fire_ms.is_none()
            && self.powerup_timer.next_fire_ms.is_none()
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}
