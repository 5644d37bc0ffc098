//! Collision detection and response for the ball
//!
//! The ball is an axis-aligned box tracked by its top-left corner. Every
//! contact is solved against a Minkowski-expanded target so the corner can be
//! treated as a point, and contact points are back-solved along the line of
//! motion instead of taken from the stepped position.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, brick_rect};
use super::state::BrickGrid;
use crate::settings::{BoardConfig, PaddleZones};
use crate::vector_from_angle;

/// Ball position and per-tick velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Motion {
    pub const fn new(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }
}

/// Which axes a wall bounce reflected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallHits {
    pub x: bool,
    pub y: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Horizontal band of the enlarged paddle that returned the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleZone {
    Left,
    Middle,
    Right,
}

/// Result of the ball reaching the paddle plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleOutcome {
    /// Ball returned from the exact contact point
    Bounce { motion: Motion, zone: PaddleZone },
    /// Ball passed beside the paddle
    Miss,
}

/// Which pair of brick edges was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickEdge {
    /// Top or bottom edge: vertical velocity flips
    Horizontal,
    /// Left or right edge: horizontal velocity flips
    Vertical,
}

/// Exact contact with one brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickContact {
    pub row: usize,
    pub col: usize,
    pub edge: BrickEdge,
    pub motion: Motion,
}

/// x where the line through `origin` along `dir` crosses `y`
#[inline]
fn x_at_y(origin: DVec2, dir: DVec2, y: f64) -> f64 {
    if dir.y == 0.0 {
        return origin.x;
    }
    origin.x + (y - origin.y) * dir.x / dir.y
}

/// y where the line through `origin` along `dir` crosses `x`
#[inline]
fn y_at_x(origin: DVec2, dir: DVec2, x: f64) -> f64 {
    if dir.x == 0.0 {
        return origin.y;
    }
    origin.y + (x - origin.x) * dir.y / dir.x
}

/// Index of the last cell an exclusive edge at `edge` (in cells) still covers
#[inline]
fn last_cell(edge: f64, count: usize) -> usize {
    (edge.ceil().max(1.0) as usize - 1).min(count - 1)
}

/// Reflect an integrated position off the left, right and top walls.
///
/// The bottom edge is left open; falling past the paddle is a drop, not a
/// bounce.
pub fn bounce_off_walls(config: &BoardConfig, moved: Motion) -> (Motion, WallHits) {
    let Motion { mut pos, mut vel } = moved;
    let mut hits = WallHits::default();
    let max_x = config.ball_max_x();

    if pos.x < 0.0 {
        pos.x = -pos.x;
        hits.x = true;
    } else if pos.x > max_x {
        pos.x = 2.0 * max_x - pos.x;
        hits.x = true;
    }

    if pos.y < 0.0 {
        pos.y = -pos.y;
        hits.y = true;
    }

    if hits.x {
        vel.x = -vel.x;
    }
    if hits.y {
        vel.y = -vel.y;
    }
    (Motion { pos, vel }, hits)
}

/// True once the ball's bottom edge has reached the paddle plane
#[inline]
pub fn reaches_paddle(config: &BoardConfig, pos: DVec2) -> bool {
    pos.y >= config.paddle_contact_y()
}

/// Resolve a ball that reached the paddle plane this tick.
///
/// `prev` is the position before integration and `vel` the velocity after the
/// wall bounce. The paddle counts as hit when the ball's horizontal middle at
/// the contact lies within the paddle widened by one ball width per side.
pub fn collide_with_paddle(
    config: &BoardConfig,
    prev: DVec2,
    vel: DVec2,
    speed: f64,
    paddle: Rect,
) -> PaddleOutcome {
    let collision_y = config.paddle_contact_y();
    let collision_x = x_at_y(prev, vel, collision_y);

    let ball_width = f64::from(config.ball_width);
    let mid_x = collision_x + ball_width / 2.0;
    let left = paddle.left() - ball_width;
    let right = paddle.right() + ball_width;

    if mid_x < left || mid_x > right {
        return PaddleOutcome::Miss;
    }

    let along = (mid_x - left) / (right - left);
    let (zone, vel) = paddle_bounce(config.paddle_zones, along, vel, speed);
    PaddleOutcome::Bounce {
        motion: Motion::new(DVec2::new(collision_x, collision_y), vel),
        zone,
    }
}

/// Outgoing velocity for a ball striking the enlarged paddle at `along`
/// (0 = left edge, 1 = right edge).
///
/// Side zones set an absolute angle that sweeps from the outer angle at the
/// edge to the inner angle at the middle zone; the right side mirrors the
/// left. The middle zone only flips the vertical component.
pub fn paddle_bounce(zones: PaddleZones, along: f64, vel: DVec2, speed: f64) -> (PaddleZone, DVec2) {
    let side = zones.side_fraction();
    let outer = zones.outer_angle_deg();
    let sweep = outer - zones.inner_angle_deg();

    if along < side {
        let angle = outer - (along / side) * sweep;
        (PaddleZone::Left, vector_from_angle(angle.to_radians(), speed))
    } else if along < 1.0 - side {
        (PaddleZone::Middle, DVec2::new(vel.x, -vel.y))
    } else {
        let angle = (180.0 - outer) + ((1.0 - along) / side) * sweep;
        (PaddleZone::Right, vector_from_angle(angle.to_radians(), speed))
    }
}

/// Grid cells the ball box sweeps through moving from `from` to `to`,
/// in the order the path reaches them.
///
/// Rows are visited in the direction of vertical travel; within a row the
/// columns spanned between the path's entry into and exit from that row band
/// are visited in the direction of horizontal travel.
pub fn brick_candidates(config: &BoardConfig, from: DVec2, to: DVec2) -> Vec<(usize, usize)> {
    let (pitch_x, pitch_y) = config.cell_pitch();
    let (pitch_x, pitch_y) = (f64::from(pitch_x), f64::from(pitch_y));
    let ball_w = f64::from(config.ball_width);
    let ball_h = f64::from(config.ball_height);

    let y_min = from.y.min(to.y).max(0.0);
    let y_max = from.y.max(to.y).max(0.0);

    let first_row = (y_min / pitch_y).floor() as usize;
    if first_row >= config.brick_rows {
        return Vec::new();
    }
    let last_row = last_cell((y_max + ball_h) / pitch_y, config.brick_rows).max(first_row);

    let mut rows: Vec<usize> = (first_row..=last_row).collect();
    if to.y < from.y {
        rows.reverse();
    }

    let delta = to - from;
    let cols = config.bricks_per_row;
    let mut candidates = Vec::new();

    for row in rows {
        // Range of the ball's top edge over which its box overlaps this row
        let band_top = (row as f64 * pitch_y - ball_h).clamp(y_min, y_max);
        let band_bottom = ((row + 1) as f64 * pitch_y).clamp(y_min, y_max);
        let (xa, xb) = if delta.y != 0.0 {
            (x_at_y(from, delta, band_top), x_at_y(from, delta, band_bottom))
        } else {
            (from.x, to.x)
        };

        let left = xa.min(xb).max(0.0);
        let right = xa.max(xb) + ball_w;
        let first_col = ((left / pitch_x).floor() as usize).min(cols - 1);
        let last_col = last_cell(right / pitch_x, cols).max(first_col);

        if delta.x < 0.0 {
            candidates.extend((first_col..=last_col).rev().map(|col| (row, col)));
        } else {
            candidates.extend((first_col..=last_col).map(|col| (row, col)));
        }
    }

    candidates
}

/// Brick box grown by the ball size up and to the left, so the ball's
/// top-left corner touches it exactly when the ball touches the brick.
/// Returned as (left, top, right, bottom).
fn expanded_brick(config: &BoardConfig, row: usize, col: usize) -> (f64, f64, f64, f64) {
    let brick = brick_rect(config, row, col);
    (
        brick.left() - f64::from(config.ball_width),
        brick.top() - f64::from(config.ball_height),
        brick.right(),
        brick.bottom(),
    )
}

/// Fraction of the segment at which the ball enters the brick's interior,
/// `None` if it never does during this tick.
fn sweep_entry(bounds: (f64, f64, f64, f64), from: DVec2, delta: DVec2) -> Option<f64> {
    let (left, top, right, bottom) = bounds;
    let mut t_enter = 0.0f64;
    let mut t_exit = 1.0f64;

    for (origin, d, lo, hi) in [(from.x, delta.x, left, right), (from.y, delta.y, top, bottom)] {
        if d == 0.0 {
            if origin <= lo || origin >= hi {
                return None;
            }
        } else {
            let (a, b) = ((lo - origin) / d, (hi - origin) / d);
            t_enter = t_enter.max(a.min(b));
            t_exit = t_exit.min(a.max(b));
        }
    }

    (t_enter < t_exit).then_some(t_enter)
}

/// First present brick the ball runs into between `from` and `to`.
///
/// Candidates are walked in travel order, but a present cell only counts if
/// the swept ball box enters the brick's interior during this step. A cell
/// the box merely overlaps while moving away from it is skipped, so the pick
/// can be a later candidate than the first present one.
pub fn find_brick_hit(
    config: &BoardConfig,
    bricks: &BrickGrid,
    from: DVec2,
    to: DVec2,
) -> Option<(usize, usize)> {
    let delta = to - from;
    brick_candidates(config, from, to)
        .into_iter()
        .filter(|&(row, col)| bricks.is_present(row, col))
        .find(|&(row, col)| sweep_entry(expanded_brick(config, row, col), from, delta).is_some())
}

/// Exact contact point and outgoing velocity for a ball striking a brick.
///
/// Assumes a top/bottom hit first; if the back-solved x falls outside the
/// expanded box the ball must have come through a side edge instead.
pub fn brick_contact(
    config: &BoardConfig,
    row: usize,
    col: usize,
    prev: DVec2,
    vel: DVec2,
) -> BrickContact {
    let (left, top, right, bottom) = expanded_brick(config, row, col);

    let collision_y = if vel.y > 0.0 { top } else { bottom };
    let collision_x = x_at_y(prev, vel, collision_y);

    let (edge, pos, vel) = if (left..=right).contains(&collision_x) {
        (
            BrickEdge::Horizontal,
            DVec2::new(collision_x, collision_y),
            DVec2::new(vel.x, -vel.y),
        )
    } else {
        let collision_x = if collision_x < left { left } else { right };
        let collision_y = y_at_x(prev, vel, collision_x);
        (
            BrickEdge::Vertical,
            DVec2::new(collision_x, collision_y),
            DVec2::new(-vel.x, vel.y),
        )
    };

    BrickContact {
        row,
        col,
        edge,
        motion: Motion::new(pos, vel),
    }
}
