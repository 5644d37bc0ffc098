//! Configuration errors
//!
//! The simulation itself never fails once constructed; everything that can be
//! wrong is caught when a `BoardConfig` is validated or loaded.

use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Row groups do not add up to the brick row count
    RowGroupMismatch { group_rows: usize, brick_rows: usize },
    /// Startup pattern must describe every brick row
    StartupPatternLength { expected: usize, actual: usize },
    EmptyAdditionalRows,
    NoBrickColumns,
    EmptyPaddleRange { min: f64, max: f64 },
    NonPositivePaddleStep { step: f64 },
    /// Brick field wider than the board or reaching the paddle
    BrickFieldOverflow { field_width: u32, field_height: u32 },
    PaddleTooWide { paddle_width: u32, board_width: u32 },
    PaddleBelowBoard { paddle_top: u32, board_height: u32 },
    InvalidBallSize { width: u32, height: u32 },
    InvalidSpeed { base: f64, max: f64 },
    NegativeLives { lives: i32 },
    Parse(String),
    Io { path: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowGroupMismatch {
                group_rows,
                brick_rows,
            } => write!(
                f,
                "row groups cover {group_rows} rows but the field has {brick_rows}"
            ),
            Self::StartupPatternLength { expected, actual } => write!(
                f,
                "startup pattern has {actual} rows, expected {expected}"
            ),
            Self::EmptyAdditionalRows => write!(f, "additional-row cycle is empty"),
            Self::NoBrickColumns => write!(f, "brick rows need at least one column"),
            Self::EmptyPaddleRange { min, max } => {
                write!(f, "paddle range [{min}, {max}] is empty")
            }
            Self::NonPositivePaddleStep { step } => {
                write!(f, "paddle step {step} must be positive")
            }
            Self::BrickFieldOverflow {
                field_width,
                field_height,
            } => write!(
                f,
                "brick field {field_width}x{field_height} does not fit above the paddle"
            ),
            Self::PaddleTooWide {
                paddle_width,
                board_width,
            } => write!(
                f,
                "paddle width {paddle_width} leaves no travel on a {board_width} px board"
            ),
            Self::PaddleBelowBoard {
                paddle_top,
                board_height,
            } => write!(
                f,
                "paddle top {paddle_top} is outside a {board_height} px board"
            ),
            Self::InvalidBallSize { width, height } => {
                write!(f, "ball size {width}x{height} does not fit the board")
            }
            Self::InvalidSpeed { base, max } => {
                write!(f, "ball speeds must satisfy 0 < base ({base}) <= max ({max})")
            }
            Self::NegativeLives { lives } => write!(f, "starting lives {lives} is negative"),
            Self::Parse(message) => write!(f, "invalid board config: {message}"),
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
