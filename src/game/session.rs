//! The per-frame session state machine.
//!
//! [`game_tick`] advances one run by `dt_ms` of session time: physics,
//! spawning, collision, scoring, effect expiry, and (on death) the
//! game-over pipeline. Everything observable about a tick comes back as
//! [`TickEvent`]s; the caller renders them however it likes.

use rand::Rng;

use crate::achievements::AchievementId;
use crate::constants::GAME_HEIGHT;
use crate::game::collision::{circle_rect_overlap, circles_overlap, magnet_pull};
use crate::game::effects::{EffectController, EffectKind};
use crate::game::entities::{Coin, Gift, Pipe, PowerUpPickup};
use crate::game::player::Player;
use crate::game::spawner::Spawner;
use crate::game::GameContext;

/// Session lifecycle. There is no pause state in the core; the caller
/// simply stops ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    GameOver,
}

/// Everything that can happen during one tick, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// A pipe was cleared.
    Scored { score: u32 },
    /// A coin or diamond was collected.
    CoinCollected { value: u32, total: u32 },
    /// A gift was collected.
    GiftCollected { value: u32, total: u32 },
    /// A power-up pickup was collected and its effect activated.
    PowerUpActivated { kind: EffectKind },
    /// An active effect ran out.
    PowerUpExpired { kind: EffectKind },
    /// A shield absorbed a fatal collision.
    ShieldConsumed,
    /// An achievement was newly unlocked.
    AchievementUnlocked { id: AchievementId },
    /// A skin became available.
    SkinUnlocked { id: &'static str },
    /// The run ended. `estimated_rank` is present when the score was
    /// submitted to the leaderboard.
    GameOver {
        score: u32,
        coins: u32,
        estimated_rank: Option<u32>,
    },
}

/// One run's worth of mutable state.
pub struct GameSession {
    pub phase: GamePhase,
    /// Session clock in ms; starts at 0 and only advances while running.
    pub clock_ms: u64,
    pub player: Player,
    pub pipes: Vec<Pipe>,
    pub coins: Vec<Coin>,
    pub gifts: Vec<Gift>,
    pub powerups: Vec<PowerUpPickup>,
    pub effects: EffectController,
    pub spawner: Spawner,
    pub score: u32,
    pub coins_collected: u32,
    pub powerups_collected: u32,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Running,
            clock_ms: 0,
            player: Player::new(),
            pipes: Vec::new(),
            coins: Vec::new(),
            gifts: Vec::new(),
            powerups: Vec::new(),
            effects: EffectController::default(),
            spawner: Spawner::new(),
            score: 0,
            coins_collected: 0,
            powerups_collected: 0,
        }
    }

    /// Flap input. Ignored once the run is over.
    pub fn flap(&mut self) {
        if self.phase == GamePhase::Running {
            self.player.flap();
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn survival_seconds(&self) -> f64 {
        self.clock_ms as f64 / 1000.0
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unlocks(events: &mut Vec<TickEvent>, newly: Vec<AchievementId>) {
    for id in newly {
        events.push(TickEvent::AchievementUnlocked { id });
    }
}

/// Advance the session by `dt_ms`. Returns the tick's events in order.
/// A finished session ticks as a no-op.
pub fn game_tick<R: Rng>(
    session: &mut GameSession,
    ctx: &mut GameContext,
    dt_ms: u64,
    rng: &mut R,
) -> Vec<TickEvent> {
    let mut events = Vec::new();
    if session.phase != GamePhase::Running {
        return events;
    }

    session.clock_ms += dt_ms;
    let now = session.clock_ms;
    let dt_s = dt_ms as f64 / 1000.0;

    // ── 1. Player physics ───────────────────────────────────────
    session.player.update(dt_s);
    if session.player.out_of_bounds() {
        end_game(session, ctx, &mut events);
        return events;
    }

    // ── 2. Spawn new entities ───────────────────────────────────
    session.spawner.update(
        now,
        rng,
        &mut session.pipes,
        &mut session.coins,
        &mut session.gifts,
        &mut session.powerups,
    );

    // ── 3. Scroll the world, magnet steering ────────────────────
    let dx = session.effects.scroll_speed(now) * dt_s;
    let magnet_on = session.effects.is_active(EffectKind::Magnet, now);
    let player_hitbox = session.player.hitbox();

    for pipe in &mut session.pipes {
        pipe.advance(dx);
    }
    for coin in &mut session.coins {
        coin.advance(dx);
        if magnet_on {
            magnet_pull(&player_hitbox, &mut coin.x, &mut coin.y);
        }
    }
    for gift in &mut session.gifts {
        gift.advance(dx);
        if magnet_on {
            magnet_pull(&player_hitbox, &mut gift.x, &mut gift.y);
        }
    }
    for pickup in &mut session.powerups {
        pickup.advance(dx);
    }

    // ── 4. Pipe collisions ──────────────────────────────────────
    let ghost_on = session.effects.is_active(EffectKind::Ghost, now);
    let invincible = session.effects.is_invincible(now);
    let mut shield_consumed = false;
    let mut died = false;
    for pipe in &session.pipes {
        let hit = circle_rect_overlap(&player_hitbox, &pipe.top_rect())
            || circle_rect_overlap(&player_hitbox, &pipe.bottom_rect());
        if !hit || ghost_on || invincible {
            continue;
        }
        if !shield_consumed && session.effects.consume_shield(now) {
            shield_consumed = true;
            continue;
        }
        if !shield_consumed {
            died = true;
            break;
        }
    }
    if shield_consumed {
        events.push(TickEvent::ShieldConsumed);
        push_unlocks(&mut events, ctx.achievements.on_shield_save());
    }
    if died {
        end_game(session, ctx, &mut events);
        return events;
    }

    // ── 5. Score zones ──────────────────────────────────────────
    for pipe in &mut session.pipes {
        if circle_rect_overlap(&player_hitbox, &pipe.score_zone()) && pipe.try_score() {
            session.score += 1;
            events.push(TickEvent::Scored {
                score: session.score,
            });
            push_unlocks(
                &mut events,
                ctx.achievements
                    .on_score(session.score, ctx.previous_high_score),
            );
        }
    }

    // ── 6. Collect coins, gifts, power-ups ──────────────────────
    for coin in &mut session.coins {
        if circles_overlap(&player_hitbox, &coin.hitbox()) {
            if let Some(value) = coin.collect() {
                session.coins_collected += value;
                events.push(TickEvent::CoinCollected {
                    value,
                    total: session.coins_collected,
                });
                push_unlocks(&mut events, ctx.achievements.on_coins(session.coins_collected));
            }
        }
    }
    for gift in &mut session.gifts {
        if circles_overlap(&player_hitbox, &gift.hitbox()) {
            if let Some(value) = gift.collect() {
                session.coins_collected += value;
                events.push(TickEvent::GiftCollected {
                    value,
                    total: session.coins_collected,
                });
                push_unlocks(&mut events, ctx.achievements.on_coins(session.coins_collected));
            }
        }
    }
    for pickup in &mut session.powerups {
        if circles_overlap(&player_hitbox, &pickup.hitbox()) {
            if let Some(kind) = pickup.collect() {
                session.powerups_collected += 1;
                session.effects.activate(kind, now);
                events.push(TickEvent::PowerUpActivated { kind });
                push_unlocks(&mut events, ctx.achievements.on_power_up(kind));
            }
        }
    }

    // ── 7. Prune dead entities ──────────────────────────────────
    session.pipes.retain(|p| !p.is_off_screen());
    session
        .coins
        .retain(|c| !c.is_collected() && !c.is_off_screen());
    session
        .gifts
        .retain(|g| !g.is_collected() && !g.is_off_screen());
    session
        .powerups
        .retain(|p| !p.is_collected() && !p.is_off_screen());

    // ── 8. Expire effects ───────────────────────────────────────
    for kind in session.effects.expire_due(now) {
        events.push(TickEvent::PowerUpExpired { kind });
    }

    // ── 9. Survival milestones ──────────────────────────────────
    push_unlocks(
        &mut events,
        ctx.achievements.on_survival(session.survival_seconds()),
    );

    events
}

/// Game-over pipeline: tear down the session, fold the run into the
/// profile, persist, and submit the score.
fn end_game(session: &mut GameSession, ctx: &mut GameContext, events: &mut Vec<TickEvent>) {
    session.phase = GamePhase::GameOver;
    session.spawner.shutdown();
    session.effects.clear_all();
    // Clamp the reported position into the playfield for renderers
    session.player.y = session.player.y.clamp(0.0, GAME_HEIGHT);

    push_unlocks(
        events,
        ctx.achievements
            .on_run_ended(session.score, session.coins_collected),
    );

    let previous_stats = ctx.skins.stats.clone();
    ctx.skins.record_game(
        session.score,
        session.coins_collected,
        session.powerups_collected,
    );
    ctx.skins
        .set_achievements_unlocked(ctx.achievements.unlocked_count() as u32);
    for skin in ctx.skins.newly_unlocked_since(&previous_stats) {
        events.push(TickEvent::SkinUnlocked { id: skin.id });
    }

    if let Err(e) = ctx.save() {
        log::error!("failed to save profile: {}", e);
    }

    let estimated_rank = if session.score > 0 {
        Some(ctx.leaderboard.submit(
            &ctx.player_name,
            session.score,
            ctx.player_avatar.as_deref(),
        ))
    } else {
        None
    };

    events.push(TickEvent::GameOver {
        score: session.score,
        coins: session.coins_collected,
        estimated_rank,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{ApiError, LeaderboardEntry, ScoreApi};
    use crate::persistence::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    struct OfflineApi;

    impl ScoreApi for OfflineApi {
        fn fetch_top(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
            Err("offline".into())
        }
        fn submit(&self, _: &str, _: u32, _: Option<&str>) -> Result<u32, ApiError> {
            Err("offline".into())
        }
        fn fetch_high_score(&self) -> Result<u32, ApiError> {
            Err("offline".into())
        }
    }

    fn test_ctx() -> GameContext {
        GameContext::new(
            Box::new(MemoryStore::default()),
            Arc::new(OfflineApi),
            "tester".to_string(),
        )
    }

    fn tick(session: &mut GameSession, ctx: &mut GameContext, dt_ms: u64) -> Vec<TickEvent> {
        let mut rng = StdRng::seed_from_u64(1);
        game_tick(session, ctx, dt_ms, &mut rng)
    }

    #[test]
    fn test_falling_out_of_bounds_ends_the_run() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        let mut saw_game_over = false;
        for _ in 0..600 {
            let events = tick(&mut session, &mut ctx, 16);
            if events
                .iter()
                .any(|e| matches!(e, TickEvent::GameOver { .. }))
            {
                saw_game_over = true;
                break;
            }
        }
        assert!(saw_game_over);
        assert!(session.is_over());
        assert!(session.spawner.is_shut_down());
        assert!((0.0..=GAME_HEIGHT).contains(&session.player.y));
    }

    #[test]
    fn test_zero_score_run_is_not_submitted() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        loop {
            let events = tick(&mut session, &mut ctx, 16);
            if let Some(TickEvent::GameOver {
                score,
                estimated_rank,
                ..
            }) = events
                .iter()
                .find(|e| matches!(e, TickEvent::GameOver { .. }))
            {
                assert_eq!(*score, 0);
                assert_eq!(*estimated_rank, None);
                break;
            }
        }
    }

    #[test]
    fn test_finished_session_ticks_as_noop() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        while !session.is_over() {
            tick(&mut session, &mut ctx, 16);
        }
        let clock = session.clock_ms;
        assert!(tick(&mut session, &mut ctx, 16).is_empty());
        assert_eq!(session.clock_ms, clock);
    }

    #[test]
    fn test_flap_ignored_after_game_over() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();
        while !session.is_over() {
            tick(&mut session, &mut ctx, 16);
        }
        let vy = session.player.vy;
        session.flap();
        assert_eq!(session.player.vy, vy);
    }

    #[test]
    fn test_scoring_a_pipe() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        // Plant a pipe whose score zone is about to reach the player,
        // with the gap centered on the player's height.
        let gap_top = session.player.y - crate::constants::PIPE_GAP / 2.0;
        session.pipes.push(Pipe::new(99, 110.0, gap_top));
        session.player.vy = 0.0;

        let mut scored = false;
        for _ in 0..20 {
            session.player.vy = 0.0;
            session.player.y = gap_top + crate::constants::PIPE_GAP / 2.0;
            let events = tick(&mut session, &mut ctx, 16);
            if events
                .iter()
                .any(|e| matches!(e, TickEvent::Scored { score: 1 }))
            {
                scored = true;
                assert!(events.iter().any(|e| {
                    matches!(
                        e,
                        TickEvent::AchievementUnlocked {
                            id: AchievementId::FirstScore
                        }
                    )
                }));
                break;
            }
        }
        assert!(scored);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn test_pipe_collision_kills_without_shield() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        // Pipe right on top of the player with the gap far away
        session.pipes.push(Pipe::new(99, session.player.x, 500.0));
        let events = tick(&mut session, &mut ctx, 16);
        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::GameOver { .. })));
    }

    #[test]
    fn test_shield_absorbs_one_hit() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        session.effects.activate(EffectKind::Shield, 0);
        session.pipes.push(Pipe::new(99, session.player.x, 500.0));

        let events = tick(&mut session, &mut ctx, 16);
        assert!(events.iter().any(|e| matches!(e, TickEvent::ShieldConsumed)));
        assert!(events.iter().any(|e| {
            matches!(
                e,
                TickEvent::AchievementUnlocked {
                    id: AchievementId::ShieldSave
                }
            )
        }));
        assert!(!session.is_over());
    }

    #[test]
    fn test_ghost_passes_through_pipes() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        session.effects.activate(EffectKind::Ghost, 0);
        session.pipes.push(Pipe::new(99, session.player.x, 500.0));

        let events = tick(&mut session, &mut ctx, 16);
        assert!(!events.iter().any(|e| matches!(e, TickEvent::ShieldConsumed)));
        assert!(!session.is_over());
    }

    #[test]
    fn test_coin_collection_totals() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        session.player.vy = 0.0;
        session
            .coins
            .push(Coin::new(1, session.player.x, session.player.y, 5));
        let events = tick(&mut session, &mut ctx, 16);

        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::CoinCollected { value: 5, total: 5 })));
        assert!(events.iter().any(|e| {
            matches!(
                e,
                TickEvent::AchievementUnlocked {
                    id: AchievementId::FirstCoin
                }
            )
        }));
        assert_eq!(session.coins_collected, 5);
        // Collected coin was pruned
        assert!(session.coins.is_empty());
    }

    #[test]
    fn test_power_up_pickup_activates_effect() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        session.powerups.push(PowerUpPickup::new(
            1,
            session.player.x,
            session.player.y,
            EffectKind::SlowMo,
        ));
        let events = tick(&mut session, &mut ctx, 16);

        assert!(events.iter().any(|e| {
            matches!(
                e,
                TickEvent::PowerUpActivated {
                    kind: EffectKind::SlowMo
                }
            )
        }));
        assert_eq!(session.powerups_collected, 1);
        assert!(session
            .effects
            .is_active(EffectKind::SlowMo, session.clock_ms));
    }

    #[test]
    fn test_effect_expiry_emits_event() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        session.powerups.push(PowerUpPickup::new(
            1,
            session.player.x,
            session.player.y,
            EffectKind::SlowMo,
        ));
        tick(&mut session, &mut ctx, 16);

        // Hold the player in bounds and run past the effect duration
        let mut expired = false;
        for _ in 0..300 {
            session.player.y = GAME_HEIGHT / 2.0;
            session.player.vy = 0.0;
            let events = tick(&mut session, &mut ctx, 16);
            if events.iter().any(|e| {
                matches!(
                    e,
                    TickEvent::PowerUpExpired {
                        kind: EffectKind::SlowMo
                    }
                )
            }) {
                expired = true;
                break;
            }
        }
        assert!(expired);
    }

    #[test]
    fn test_game_over_records_stats_and_skins() {
        let mut session = GameSession::new();
        let mut ctx = test_ctx();

        session.score = 30;
        session.coins_collected = 4;
        // Force death
        session.player.y = GAME_HEIGHT - 1.0;
        session.player.vy = 10_000.0;
        let events = tick(&mut session, &mut ctx, 16);

        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::GameOver { score: 30, .. })));
        // High score 30 unlocks the first high-score skin
        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::SkinUnlocked { id: "fire" })));
        assert_eq!(ctx.skins.stats.total_games, 1);
        assert_eq!(ctx.skins.stats.high_score, 30);
    }
}
