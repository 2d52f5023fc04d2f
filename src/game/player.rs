//! The player's physics body: a single point mass under constant gravity
//! with discrete flap impulses.

use crate::constants::{FLAP_VELOCITY, GAME_HEIGHT, GRAVITY, PLAYER_RADIUS, PLAYER_X};
use crate::game::entities::Circle;

#[derive(Debug, Clone)]
pub struct Player {
    /// Horizontal position is fixed; the world scrolls past.
    pub x: f64,
    pub y: f64,
    /// Vertical velocity in px/s, positive = downward.
    pub vy: f64,
}

impl Player {
    pub fn new() -> Self {
        Self {
            x: PLAYER_X,
            y: GAME_HEIGHT / 2.0,
            vy: 0.0,
        }
    }

    /// Apply a flap impulse: velocity is set to the flap constant,
    /// overriding whatever it was (impulse, not accumulation).
    pub fn flap(&mut self) {
        self.vy = FLAP_VELOCITY;
    }

    /// Integrate gravity and advance position. No bounds clamping here;
    /// leaving the playfield is a death condition the session evaluates.
    pub fn update(&mut self, dt_s: f64) {
        self.vy += GRAVITY * dt_s;
        self.y += self.vy * dt_s;
    }

    pub fn hitbox(&self) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            radius: PLAYER_RADIUS,
        }
    }

    /// True once the player has left the vertical playfield bounds.
    pub fn out_of_bounds(&self) -> bool {
        self.y < 0.0 || self.y > GAME_HEIGHT
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flap_overrides_velocity() {
        let mut player = Player::new();
        player.vy = 250.0; // falling fast
        player.flap();
        assert_eq!(player.vy, FLAP_VELOCITY);

        // Flapping again while rising does not accumulate
        player.flap();
        assert_eq!(player.vy, FLAP_VELOCITY);
    }

    #[test]
    fn test_gravity_integration() {
        let mut player = Player::new();
        let y0 = player.y;
        player.update(0.1);
        assert!(player.vy > 0.0);
        assert!(player.y > y0);
    }

    #[test]
    fn test_flap_then_rise() {
        let mut player = Player::new();
        player.flap();
        let y0 = player.y;
        player.update(0.016);
        assert!(player.y < y0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut player = Player::new();
        assert!(!player.out_of_bounds());
        player.y = -0.1;
        assert!(player.out_of_bounds());
        player.y = GAME_HEIGHT + 0.1;
        assert!(player.out_of_bounds());
        player.y = GAME_HEIGHT;
        assert!(!player.out_of_bounds());
    }
}
