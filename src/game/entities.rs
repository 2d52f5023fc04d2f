//! Passive world entities: pipe obstacles and collectibles.
//!
//! Entities are spawned at the trailing (right) edge, translated left by
//! the scroll speed each tick, and destroyed once collected or fully past
//! the leading (left) edge. Collection is one-shot: a `collected`/`scored`
//! flag guards against the per-frame overlap test applying an effect twice.

use crate::constants::{
    COIN_OFFSCREEN_X, COIN_RADIUS, GAME_HEIGHT, GIFT_OFFSCREEN_X, GIFT_RADIUS, PIPE_GAP,
    PIPE_OFFSCREEN_X, PIPE_WIDTH, POWERUP_OFFSCREEN_X, POWERUP_RADIUS, SCORE_ZONE_OFFSET,
    SCORE_ZONE_WIDTH,
};
use crate::game::effects::EffectKind;

/// Circular hitbox (player, collectibles).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// A pipe pair: top stack, bottom stack, and the invisible score-trigger
/// zone in the gap.
#[derive(Debug, Clone)]
pub struct Pipe {
    pub id: u64,
    /// Horizontal center of the pipe pair.
    pub x: f64,
    /// Top edge of the gap.
    pub gap_top: f64,
    /// One-shot flag: score is awarded at most once per pipe.
    pub scored: bool,
}

impl Pipe {
    pub fn new(id: u64, x: f64, gap_top: f64) -> Self {
        Self {
            id,
            x,
            gap_top,
            scored: false,
        }
    }

    pub fn advance(&mut self, dx: f64) {
        self.x -= dx;
    }

    pub fn top_rect(&self) -> Rect {
        Rect {
            x: self.x - PIPE_WIDTH / 2.0,
            y: 0.0,
            w: PIPE_WIDTH,
            h: self.gap_top,
        }
    }

    pub fn bottom_rect(&self) -> Rect {
        let top = self.gap_top + PIPE_GAP;
        Rect {
            x: self.x - PIPE_WIDTH / 2.0,
            y: top,
            w: PIPE_WIDTH,
            h: GAME_HEIGHT - top,
        }
    }

    /// Thin trigger zone centered in the gap, offset slightly past the
    /// pipe's trailing edge so the score lands after the player clears it.
    pub fn score_zone(&self) -> Rect {
        Rect {
            x: self.x + SCORE_ZONE_OFFSET - SCORE_ZONE_WIDTH / 2.0,
            y: self.gap_top,
            w: SCORE_ZONE_WIDTH,
            h: PIPE_GAP,
        }
    }

    /// Mark the pipe scored. Returns false if it was already scored.
    pub fn try_score(&mut self) -> bool {
        if self.scored {
            return false;
        }
        self.scored = true;
        true
    }

    pub fn is_off_screen(&self) -> bool {
        self.x < PIPE_OFFSCREEN_X
    }
}

/// A coin worth 1, or a diamond worth 5.
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub value: u32,
    collected: bool,
}

impl Coin {
    pub fn new(id: u64, x: f64, y: f64, value: u32) -> Self {
        Self {
            id,
            x,
            y,
            value,
            collected: false,
        }
    }

    pub fn advance(&mut self, dx: f64) {
        self.x -= dx;
    }

    pub fn hitbox(&self) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            radius: COIN_RADIUS,
        }
    }

    /// Yield the coin's value exactly once.
    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.value)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn is_off_screen(&self) -> bool {
        self.x < COIN_OFFSCREEN_X
    }
}

/// A gift worth a randomized 5-10 coins.
#[derive(Debug, Clone)]
pub struct Gift {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub value: u32,
    collected: bool,
}

impl Gift {
    pub fn new(id: u64, x: f64, y: f64, value: u32) -> Self {
        Self {
            id,
            x,
            y,
            value,
            collected: false,
        }
    }

    pub fn advance(&mut self, dx: f64) {
        self.x -= dx;
    }

    pub fn hitbox(&self) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            radius: GIFT_RADIUS,
        }
    }

    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.value)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn is_off_screen(&self) -> bool {
        self.x < GIFT_OFFSCREEN_X
    }
}

/// An uncollected power-up floating in the world.
#[derive(Debug, Clone)]
pub struct PowerUpPickup {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub kind: EffectKind,
    collected: bool,
}

impl PowerUpPickup {
    pub fn new(id: u64, x: f64, y: f64, kind: EffectKind) -> Self {
        Self {
            id,
            x,
            y,
            kind,
            collected: false,
        }
    }

    pub fn advance(&mut self, dx: f64) {
        self.x -= dx;
    }

    pub fn hitbox(&self) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            radius: POWERUP_RADIUS,
        }
    }

    pub fn collect(&mut self) -> Option<EffectKind> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.kind)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn is_off_screen(&self) -> bool {
        self.x < POWERUP_OFFSCREEN_X
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GAME_WIDTH;

    #[test]
    fn test_coin_collect_is_one_shot() {
        let mut coin = Coin::new(1, 200.0, 300.0, 5);
        assert_eq!(coin.collect(), Some(5));
        assert_eq!(coin.collect(), None);
        assert!(coin.is_collected());
    }

    #[test]
    fn test_gift_collect_is_one_shot() {
        let mut gift = Gift::new(1, 200.0, 300.0, 7);
        assert_eq!(gift.collect(), Some(7));
        assert_eq!(gift.collect(), None);
    }

    #[test]
    fn test_powerup_collect_is_one_shot() {
        let mut pickup = PowerUpPickup::new(1, 200.0, 300.0, EffectKind::Shield);
        assert_eq!(pickup.collect(), Some(EffectKind::Shield));
        assert_eq!(pickup.collect(), None);
    }

    #[test]
    fn test_pipe_score_is_one_shot() {
        let mut pipe = Pipe::new(1, 200.0, 150.0);
        assert!(pipe.try_score());
        assert!(!pipe.try_score());
    }

    #[test]
    fn test_pipe_geometry() {
        let pipe = Pipe::new(1, 200.0, 150.0);

        let top = pipe.top_rect();
        assert_eq!(top.y, 0.0);
        assert_eq!(top.h, 150.0);
        assert_eq!(top.x, 200.0 - PIPE_WIDTH / 2.0);

        let bottom = pipe.bottom_rect();
        assert_eq!(bottom.y, 150.0 + PIPE_GAP);
        assert_eq!(bottom.y + bottom.h, GAME_HEIGHT);

        let zone = pipe.score_zone();
        assert_eq!(zone.h, PIPE_GAP);
        assert_eq!(zone.y, 150.0);
        // Zone sits past the pipe's trailing edge
        assert!(zone.x > pipe.x + PIPE_WIDTH / 2.0 - SCORE_ZONE_WIDTH);
    }

    #[test]
    fn test_off_screen_predicates() {
        let mut pipe = Pipe::new(1, GAME_WIDTH, 150.0);
        assert!(!pipe.is_off_screen());
        pipe.advance(GAME_WIDTH - PIPE_OFFSCREEN_X + 1.0);
        assert!(pipe.is_off_screen());

        let mut coin = Coin::new(2, 0.0, 300.0, 1);
        assert!(!coin.is_off_screen());
        coin.advance(31.0);
        assert!(coin.is_off_screen());
    }

    #[test]
    fn test_advance_moves_left() {
        let mut pickup = PowerUpPickup::new(1, 100.0, 300.0, EffectKind::Magnet);
        pickup.advance(10.0);
        assert_eq!(pickup.x, 90.0);
    }
}
