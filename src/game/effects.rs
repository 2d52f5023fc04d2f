//! Active power-up effect tracking.
//!
//! Each effect type runs an independent expiry deadline on the session
//! clock: `Idle -> Active` on collect, `Active -> Idle` on expiry (or on
//! consumption, for shield). Re-collecting an active effect resets its
//! deadline to the full duration; durations never stack.

use crate::constants::{
    GHOST_DURATION_MS, MAGNET_DURATION_MS, SCROLL_SPEED, SHIELD_BREAK_INVINCIBILITY_MS,
    SHIELD_DURATION_MS, SLOWMO_DURATION_MS, SLOWMO_FACTOR,
};
use serde::{Deserialize, Serialize};

/// Power-up effect types.
///
/// Ghost exists in the state machine (pass-through on hazards, never
/// consumed) but is not spawned by the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Shield,
    SlowMo,
    Magnet,
    Ghost,
}

impl EffectKind {
    /// Kinds the spawner picks from, uniformly.
    pub const SPAWNABLE: [EffectKind; 3] =
        [EffectKind::Shield, EffectKind::SlowMo, EffectKind::Magnet];

    /// Effect duration assigned at collection time.
    pub fn duration_ms(&self) -> u64 {
        match self {
            EffectKind::Shield => SHIELD_DURATION_MS,
            EffectKind::SlowMo => SLOWMO_DURATION_MS,
            EffectKind::Magnet => MAGNET_DURATION_MS,
            EffectKind::Ghost => GHOST_DURATION_MS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Shield => "shield",
            EffectKind::SlowMo => "slowmo",
            EffectKind::Magnet => "magnet",
            EffectKind::Ghost => "ghost",
        }
    }
}

/// Per-session controller for active effect deadlines.
#[derive(Debug, Clone, Default)]
pub struct EffectController {
    shield_until: Option<u64>,
    slowmo_until: Option<u64>,
    magnet_until: Option<u64>,
    ghost_until: Option<u64>,
    // Grace window after a shield absorbs a hit; expires silently.
    invincible_until: Option<u64>,
}

impl EffectController {
    fn deadline(&mut self, kind: EffectKind) -> &mut Option<u64> {
        match kind {
            EffectKind::Shield => &mut self.shield_until,
            EffectKind::SlowMo => &mut self.slowmo_until,
            EffectKind::Magnet => &mut self.magnet_until,
            EffectKind::Ghost => &mut self.ghost_until,
        }
    }

    /// Activate an effect at `now_ms`. If it is already active, the deadline
    /// resets to the full duration (no stacking, no queuing).
    pub fn activate(&mut self, kind: EffectKind, now_ms: u64) {
        *self.deadline(kind) = Some(now_ms + kind.duration_ms());
    }

    pub fn is_active(&self, kind: EffectKind, now_ms: u64) -> bool {
        let deadline = match kind {
            EffectKind::Shield => self.shield_until,
            EffectKind::SlowMo => self.slowmo_until,
            EffectKind::Magnet => self.magnet_until,
            EffectKind::Ghost => self.ghost_until,
        };
        deadline.is_some_and(|until| now_ms < until)
    }

    /// True while the post-shield grace window is open.
    pub fn is_invincible(&self, now_ms: u64) -> bool {
        self.invincible_until.is_some_and(|until| now_ms < until)
    }

    /// Consume an active shield to absorb a hazard collision. Returns true
    /// if a shield was consumed; the grace window opens in the same call so
    /// the collision that broke the shield cannot also kill.
    pub fn consume_shield(&mut self, now_ms: u64) -> bool {
        if !self.is_active(EffectKind::Shield, now_ms) {
            return false;
        }
        self.shield_until = None;
        self.invincible_until = Some(now_ms + SHIELD_BREAK_INVINCIBILITY_MS);
        true
    }

    /// Clear deadlines that have passed, returning each expired effect
    /// exactly once. The invincibility window expires without an event.
    pub fn expire_due(&mut self, now_ms: u64) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in [
            EffectKind::Shield,
            EffectKind::SlowMo,
            EffectKind::Magnet,
            EffectKind::Ghost,
        ] {
            let slot = self.deadline(kind);
            if slot.is_some_and(|until| until <= now_ms) {
                *slot = None;
                expired.push(kind);
            }
        }
        if self.invincible_until.is_some_and(|until| until <= now_ms) {
            self.invincible_until = None;
        }
        expired
    }

    /// Current scroll speed. Derived from active state each tick so that
    /// repeated slow-mo activations can never compound the multiplier.
    pub fn scroll_speed(&self, now_ms: u64) -> f64 {
        if self.is_active(EffectKind::SlowMo, now_ms) {
            SCROLL_SPEED * SLOWMO_FACTOR
        } else {
            SCROLL_SPEED
        }
    }

    /// Drop every active effect and the grace window (game-over teardown).
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
