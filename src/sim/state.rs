//! Game state and core simulation types
//!
//! All mutable simulation state lives in one `GameState`; nothing else keeps
//! a copy.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Motion, PaddleZone};
use super::difficulty::Difficulty;
use super::geometry::{Rect, paddle_rect};
use crate::consts::{LAUNCH_ANGLE_MIN_DEG, LAUNCH_ANGLE_SPAN_DEG};
use crate::error::ConfigError;
use crate::settings::BoardConfig;
use crate::vector_from_angle;

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start (initial, and after every drop)
    Stopped,
    /// Running; the next tick launches a ball
    RunningNoBall,
    /// Running with a ball on the board
    RunningBallInFlight,
    /// Out of lives; only `reset` leaves this phase
    GameOver,
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched { x: f64, angle_deg: f64 },
    WallBounce,
    PaddleHit { zone: PaddleZone },
    BrickDestroyed { row: usize, col: usize, points: u32 },
    WallDropped { present: bool },
    SpeedUp { speed: f64 },
    BallDropped { lives: i32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
}

/// Launch parameters for a new ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    /// Left edge of the ball (pixels)
    pub x: f64,
    /// Direction in degrees, 0 = right, counter-clockwise
    pub angle_deg: f64,
}

impl Launch {
    /// Draw a launch: whole-pixel x across the board, angle in the cone
    /// pointing down at the paddle
    pub fn random(rng: &mut impl Rng, config: &BoardConfig) -> Self {
        let x = f64::from(rng.random_range(0..config.board_width));
        let angle_deg = LAUNCH_ANGLE_MIN_DEG + rng.random::<f64>() * LAUNCH_ANGLE_SPAN_DEG;
        Self { x, angle_deg }
    }
}

/// The ball in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner (pixels, sub-pixel precision)
    pub pos: DVec2,
    /// Displacement per tick
    pub vel: DVec2,
    /// False while in ghost mode: bricks are ignored until the first
    /// paddle bounce
    pub collisions_armed: bool,
}

impl Ball {
    pub fn with_motion(self, motion: Motion) -> Self {
        Self {
            pos: motion.pos,
            vel: motion.vel,
            ..self
        }
    }
}

/// The player's paddle on its logical axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub position: f64,
}

/// Rows x columns of present/destroyed bricks, row 0 at the top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl BrickGrid {
    /// Empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// One row per pattern entry, every brick in a row sharing its flag
    pub fn from_pattern(pattern: &[bool], cols: usize) -> Self {
        Self {
            rows: pattern.len(),
            cols,
            cells: pattern
                .iter()
                .flat_map(|&present| std::iter::repeat_n(present, cols))
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_present(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, present: bool) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = present;
        }
    }

    /// Clear a brick; returns whether one was there
    pub fn destroy(&mut self, row: usize, col: usize) -> bool {
        let was_present = self.is_present(row, col);
        self.set(row, col, false);
        was_present
    }

    /// Insert a uniform row at the top, shifting every row down one step and
    /// discarding the bottom row
    pub fn drop_row(&mut self, present: bool) {
        if self.rows == 0 {
            return;
        }
        // The bottom row wraps to the top and is overwritten
        self.cells.rotate_right(self.cols);
        self.cells[..self.cols].fill(present);
    }

    pub fn row(&self, row: usize) -> &[bool] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.cols.max(1))
    }

    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|&&p| p).count()
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) config: BoardConfig,
    /// Run seed for reproducibility
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) paddle: Paddle,
    pub(crate) ball: Option<Ball>,
    pub(crate) bricks: BrickGrid,
    pub(crate) difficulty: Difficulty,
    pub(crate) score: u64,
    /// Survives `reset` for the life of the process
    pub(crate) high_score: u64,
    /// Balls left in reserve; -1 means game over
    pub(crate) lives: i32,
    pub(crate) stopped: bool,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    /// Events produced by the last tick
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given board and seed
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let difficulty = Difficulty::new(&config);
        let bricks = BrickGrid::from_pattern(&config.startup_pattern, config.bricks_per_row);
        let mut state = Self {
            paddle: Paddle {
                position: config.paddle_midpoint(),
            },
            lives: config.lives,
            difficulty,
            bricks,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ball: None,
            score: 0,
            high_score: 0,
            stopped: true,
            time_ticks: 0,
            events: Vec::new(),
            config,
        };
        state.reset();
        Ok(state)
    }

    /// Start a fresh game on the same board; the high score and the random
    /// stream carry on
    pub fn reset(&mut self) {
        self.bricks = BrickGrid::from_pattern(&self.config.startup_pattern, self.config.bricks_per_row);
        self.difficulty = Difficulty::new(&self.config);
        self.paddle.position = self.config.paddle_midpoint();
        self.ball = None;
        self.score = 0;
        self.lives = self.config.lives;
        self.stopped = true;
        self.time_ticks = 0;
        self.events.clear();
        log::info!("Game reset (seed {}, {} lives)", self.seed, self.lives);
    }

    /// Advance the simulation by one fixed step
    pub fn tick(&mut self) {
        super::tick::step(self);
    }

    /// Flip between stopped and running; ignored once the game is over
    pub fn toggle_running(&mut self) {
        if self.is_game_over() {
            log::debug!("Toggle ignored: game over");
            return;
        }
        self.stopped = !self.stopped;
    }

    /// The start key: restarts a finished game, otherwise toggles running
    pub fn start_pressed(&mut self) {
        if self.is_game_over() {
            self.reset();
        } else {
            self.toggle_running();
        }
    }

    /// Store a paddle position, clamped to the logical axis
    pub fn set_paddle_logical_position(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.paddle.position = value.clamp(self.config.paddle_min, self.config.paddle_max);
    }

    /// Launch a ball with explicit parameters, consuming one life.
    ///
    /// The ball starts a third of the way down the board in ghost mode at the
    /// base speed.
    pub fn launch_ball(&mut self, launch: Launch) {
        self.difficulty.arm_for_launch(&self.config);
        let pos = DVec2::new(launch.x, f64::from(self.config.board_height) / 3.0);
        let vel = vector_from_angle(launch.angle_deg.to_radians(), self.difficulty.speed);
        self.ball = Some(Ball {
            pos,
            vel,
            collisions_armed: false,
        });
        self.lives -= 1;
        self.events.push(GameEvent::BallLaunched {
            x: launch.x,
            angle_deg: launch.angle_deg,
        });
        log::debug!(
            "Ball launched at x={} angle={:.1}, {} lives left",
            launch.x,
            launch.angle_deg,
            self.lives
        );
    }

    /// Put a ball on the board as-is, without consuming a life or touching
    /// the speed
    pub fn place_ball(&mut self, ball: Ball) {
        self.ball = Some(ball);
    }

    /// Ball fell past the paddle: stop, and end the game if it was the last
    pub(crate) fn drop_ball(&mut self) {
        self.ball = None;
        self.stopped = true;
        if self.lives == 0 {
            self.lives = -1;
        }
        self.events.push(GameEvent::BallDropped { lives: self.lives });

        if self.is_game_over() {
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!(
                "Game over: score {} (high score {})",
                self.score,
                self.high_score
            );
        } else {
            log::info!("Ball dropped, {} lives left", self.lives);
        }
    }

    /// Add points and carry the high score along
    pub(crate) fn award(&mut self, points: u32) {
        self.score += u64::from(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore { score: self.score });
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.is_game_over() {
            GamePhase::GameOver
        } else if self.stopped {
            GamePhase::Stopped
        } else if self.ball.is_some() {
            GamePhase::RunningBallInFlight
        } else {
            GamePhase::RunningNoBall
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped && !self.is_game_over()
    }

    pub fn is_game_over(&self) -> bool {
        self.lives < 0
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    /// Ball position, and whether a ball is on the board at all
    pub fn ball_position_and_presence(&self) -> (DVec2, bool) {
        match self.ball {
            Some(ball) => (ball.pos, true),
            None => (DVec2::ZERO, false),
        }
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn paddle_logical_position(&self) -> f64 {
        self.paddle.position
    }

    /// Paddle in board pixels
    pub fn paddle_rect(&self) -> Rect {
        paddle_rect(&self.config, self.paddle.position)
    }

    pub fn brick_grid_snapshot(&self) -> &BrickGrid {
        &self.bricks
    }

    /// Current ball speed magnitude (pixels per tick)
    pub fn speed(&self) -> f64 {
        self.difficulty.speed
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
