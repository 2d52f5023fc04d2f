//! Overlap predicates and the magnet steering formula.
//!
//! Pure geometry; the session decides what an overlap means (death,
//! score, collection).

use crate::constants::{MAGNET_PULL_FACTOR, MAGNET_RANGE};
use crate::game::entities::{Circle, Rect};

/// Circle/rectangle overlap: clamp the circle center into the rectangle
/// and compare the remaining distance against the radius.
pub fn circle_rect_overlap(c: &Circle, r: &Rect) -> bool {
    let nearest_x = c.x.clamp(r.x, r.x + r.w);
    let nearest_y = c.y.clamp(r.y, r.y + r.h);
    let dx = c.x - nearest_x;
    let dy = c.y - nearest_y;
    dx * dx + dy * dy <= c.radius * c.radius
}

pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let reach = a.radius + b.radius;
    dx * dx + dy * dy <= reach * reach
}

/// Steer a collectible toward the player while the magnet is active.
///
/// Within `MAGNET_RANGE`, the position shifts by
/// `delta * (range - dist) / range * MAGNET_PULL_FACTOR` per tick: a
/// linear pull that grows with proximity. This is pure steering and never
/// collects anything by itself; collection still requires a hitbox overlap.
pub fn magnet_pull(player: &Circle, x: &mut f64, y: &mut f64) {
    let dx = player.x - *x;
    let dy = player.y - *y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist >= MAGNET_RANGE || dist == 0.0 {
        return;
    }
    let force = (MAGNET_RANGE - dist) / MAGNET_RANGE;
    *x += dx * force * MAGNET_PULL_FACTOR;
    *y += dy * force * MAGNET_PULL_FACTOR;
}
