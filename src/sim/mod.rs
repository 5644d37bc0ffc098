//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (rows, then columns, in travel order)
//! - No rendering or platform dependencies beyond the paddle controller

pub mod collision;
pub mod difficulty;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::{BrickContact, BrickEdge, Motion, PaddleOutcome, PaddleZone, WallHits};
pub use difficulty::{Difficulty, DifficultyChange};
pub use geometry::{
    Rect, ball_rect, brick_cell, brick_index_at, brick_rect, color_zone_rects, paddle_rect,
    points_for_row,
};
pub use state::{Ball, BrickGrid, GameEvent, GamePhase, GameState, Launch, Paddle};
pub use tick::tick;
