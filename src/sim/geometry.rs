//! Board geometry
//!
//! Pure mappings between logical coordinates (paddle axis, brick row/column)
//! and board pixels. The board origin is the top-left corner and y grows
//! toward the paddle.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::settings::BoardConfig;

/// Axis-aligned integer rectangle in board pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        f64::from(self.x)
    }

    #[inline]
    pub fn top(&self) -> f64 {
        f64::from(self.y)
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> f64 {
        f64::from(self.x) + f64::from(self.width)
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> f64 {
        f64::from(self.y) + f64::from(self.height)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            self.left() + f64::from(self.width) / 2.0,
            self.top() + f64::from(self.height) / 2.0,
        )
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// True if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `dx` on the left and right, `dy` on the top and bottom
    pub fn inflate(&self, dx: u32, dy: u32) -> Rect {
        Rect {
            x: self.x - dx as i32,
            y: self.y - dy as i32,
            width: self.width + 2 * dx,
            height: self.height + 2 * dy,
        }
    }
}

/// Pixel rectangle of the paddle at a logical position.
///
/// The logical axis is normalized to [0, 1] and scaled into the width the
/// paddle can travel, keeping one pixel of margin on the right.
pub fn paddle_rect(config: &BoardConfig, logical_pos: f64) -> Rect {
    let span = config.paddle_max - config.paddle_min;
    let normalized = ((logical_pos - config.paddle_min) / span).clamp(0.0, 1.0);
    let max_left = config
        .board_width
        .saturating_sub(config.paddle_width.saturating_add(1));
    let left = ((f64::from(max_left) * normalized).floor() as u32).min(max_left);

    Rect::new(
        left as i32,
        config.paddle_top as i32,
        config.paddle_width,
        config.paddle_height,
    )
}

/// Pixel rectangle of the brick at `(row, col)`, border excluded
pub fn brick_rect(config: &BoardConfig, row: usize, col: usize) -> Rect {
    let (pitch_x, pitch_y) = config.cell_pitch();
    Rect::new(
        (col as u32 * pitch_x + config.brick_border_x) as i32,
        (row as u32 * pitch_y + config.brick_border_y) as i32,
        config.brick_width,
        config.brick_height,
    )
}

/// Full grid cell of `(row, col)`: the brick plus its border
pub fn brick_cell(config: &BoardConfig, row: usize, col: usize) -> Rect {
    brick_rect(config, row, col).inflate(config.brick_border_x, config.brick_border_y)
}

/// Grid cell containing a pixel position, `None` outside the brick field
pub fn brick_index_at(config: &BoardConfig, pos: DVec2) -> Option<(usize, usize)> {
    if pos.x < 0.0 || pos.y < 0.0 {
        return None;
    }
    let (pitch_x, pitch_y) = config.cell_pitch();
    let row = (pos.y / f64::from(pitch_y)).floor() as usize;
    if row >= config.brick_rows {
        return None;
    }
    let col = (pos.x / f64::from(pitch_x)).floor() as usize;
    if col >= config.bricks_per_row {
        return None;
    }
    Some((row, col))
}

/// Points for destroying a brick in `row`
pub fn points_for_row(config: &BoardConfig, row: usize) -> u32 {
    let mut first_row = 0;
    for group in &config.row_groups {
        first_row += group.rows;
        if row < first_row {
            return group.points;
        }
    }
    config.row_groups.last().map(|g| g.points).unwrap_or(0)
}

/// Full-width color bands, one per row group, top to bottom
pub fn color_zone_rects(config: &BoardConfig) -> Vec<(u32, Rect)> {
    let (_, pitch_y) = config.cell_pitch();
    let mut y = 0u32;
    config
        .row_groups
        .iter()
        .map(|group| {
            let height = group.rows as u32 * pitch_y;
            let zone = (group.color, Rect::new(0, y as i32, config.board_width, height));
            y += height;
            zone
        })
        .collect()
}

/// Integer rectangle a renderer draws for a ball at `pos`
pub fn ball_rect(config: &BoardConfig, pos: DVec2) -> Rect {
    Rect::new(
        pos.x.floor() as i32,
        pos.y.floor() as i32,
        config.ball_width,
        config.ball_height,
    )
}
