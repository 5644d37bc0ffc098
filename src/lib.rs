//! Breakout Core - a deterministic brick-breaker simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, difficulty, game state)
//! - `platform`: Paddle controllers fed by the host's input devices
//! - `settings`: Data-driven board configuration
//! - `error`: Configuration errors

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{BoardConfig, PaddleZones, RowGroup};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Frame rate the per-tick speeds are tuned for
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Board dimensions (pixels)
    pub const BOARD_WIDTH: u32 = 320;
    pub const BOARD_HEIGHT: u32 = 240;

    /// Brick layout: 16 bricks per line at width 18, border 1
    pub const BRICK_WIDTH: u32 = 18;
    pub const BRICK_HEIGHT: u32 = 5;
    pub const BRICK_BORDER_X: u32 = 1;
    pub const BRICK_BORDER_Y: u32 = 1;
    pub const BRICKS_PER_ROW: usize = 16;
    /// Rows per scoring group, farthest from the paddle first
    pub const ROW_GROUP_SIZES: [usize; 5] = [6, 6, 6, 6, 6];
    pub const ROW_GROUP_POINTS: [u32; 5] = [4, 3, 2, 1, 0];
    pub const ROW_GROUP_COLORS: [u32; 5] = [
        colors::BLUE,
        colors::RED,
        colors::GREEN,
        colors::YELLOW,
        colors::WHITE,
    ];

    /// Paddle defaults
    pub const PADDLE_WIDTH: u32 = 30;
    pub const PADDLE_HEIGHT: u32 = 4;
    pub const PADDLE_TOP: u32 = 222;
    pub const PADDLE_MIN: f64 = 0.0;
    pub const PADDLE_MAX: f64 = 1024.0;
    /// Keyboard paddle crosses the whole axis in 0.75 s
    pub const PADDLE_STEP: f64 = 22.0;

    /// Ball defaults (pixels per tick)
    pub const BALL_WIDTH: u32 = 4;
    pub const BALL_HEIGHT: u32 = 4;
    pub const BALL_BASE_SPEED: f64 = 2.75;
    pub const BALL_MAX_SPEED: f64 = 5.0;

    pub const START_LIVES: i32 = 5;

    /// Launch cone, degrees (screen y inverted, so this points at the paddle)
    pub const LAUNCH_ANGLE_MIN_DEG: f64 = 210.0;
    pub const LAUNCH_ANGLE_SPAN_DEG: f64 = 120.0;

    /// Difficulty ramp
    pub const SPEEDUP_FACTOR: f64 = 1.25;
    pub const FALLDOWN_SHRINK: f64 = 0.92;
    pub const MIN_FALLDOWN_PERIOD: u32 = 10;

    /// Overlay colors (0xRRGGBB)
    pub mod colors {
        pub const WHITE: u32 = 0xFFFFFF;
        pub const BLUE: u32 = 0x0000AA;
        pub const RED: u32 = 0x990000;
        pub const GREEN: u32 = 0x00CC00;
        pub const YELLOW: u32 = 0xFFEB00;
    }
}

/// Velocity of the given length pointing at `angle` (radians).
///
/// 0 points right and angles grow counter-clockwise on screen, so the y
/// component is negated for the downward-growing board axis.
#[inline]
pub fn vector_from_angle(angle: f64, length: f64) -> DVec2 {
    DVec2::new(length * angle.cos(), -length * angle.sin())
}

/// Inverse of [`vector_from_angle`], in degrees within [0, 360)
#[inline]
pub fn angle_of_vector(v: DVec2) -> f64 {
    (-v.y).atan2(v.x).to_degrees().rem_euclid(360.0)
}
