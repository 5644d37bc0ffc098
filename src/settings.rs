//! Board configuration
//!
//! Every size, speed and scoring table the simulation reads lives in one
//! `BoardConfig`. Defaults reproduce the classic 320x240 board; a JSON file can
//! override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How the enlarged paddle is split into bounce zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaddleZones {
    /// 40/20/40 split, side angles sweep 165° -> 60°
    #[default]
    WideSides,
    /// Equal thirds, side angles sweep 165° -> 105°
    EqualThirds,
}

impl PaddleZones {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaddleZones::WideSides => "WideSides",
            PaddleZones::EqualThirds => "EqualThirds",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "widesides" | "wide" | "40/20/40" => Some(PaddleZones::WideSides),
            "equalthirds" | "thirds" => Some(PaddleZones::EqualThirds),
            _ => None,
        }
    }

    /// Fraction of the enlarged paddle taken by each side zone
    pub fn side_fraction(&self) -> f64 {
        match self {
            PaddleZones::WideSides => 0.4,
            PaddleZones::EqualThirds => 1.0 / 3.0,
        }
    }

    /// Left-zone bounce angle at the paddle's outer edge (degrees)
    pub fn outer_angle_deg(&self) -> f64 {
        165.0
    }

    /// Left-zone bounce angle at the boundary with the middle zone (degrees)
    pub fn inner_angle_deg(&self) -> f64 {
        match self {
            PaddleZones::WideSides => 60.0,
            PaddleZones::EqualThirds => 105.0,
        }
    }
}

/// A contiguous band of brick rows sharing one point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowGroup {
    pub rows: usize,
    pub points: u32,
    /// Overlay tint (0xRRGGBB)
    pub color: u32,
}

/// Immutable board description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub board_width: u32,
    pub board_height: u32,

    // === Bricks ===
    pub brick_width: u32,
    pub brick_height: u32,
    pub brick_border_x: u32,
    pub brick_border_y: u32,
    pub bricks_per_row: usize,
    pub brick_rows: usize,
    /// Scoring tiers, farthest from the paddle first
    pub row_groups: Vec<RowGroup>,
    /// Present/empty flag for every row at reset, top row first
    pub startup_pattern: Vec<bool>,
    /// Cycle of rows inserted at the top by a wall drop
    pub additional_rows: Vec<bool>,

    // === Paddle ===
    pub paddle_width: u32,
    pub paddle_height: u32,
    pub paddle_top: u32,
    pub paddle_min: f64,
    pub paddle_max: f64,
    /// Logical distance a held key moves the paddle per tick
    pub paddle_step: f64,
    pub paddle_zones: PaddleZones,

    // === Ball ===
    pub ball_width: u32,
    pub ball_height: u32,
    pub base_speed: f64,
    pub max_speed: f64,

    pub lives: i32,
}

/// `(4 present, 2 empty) x 3` followed by 12 empty rows
fn classic_startup_pattern() -> Vec<bool> {
    let mut pattern = Vec::with_capacity(30);
    for _ in 0..3 {
        pattern.extend([true; 4]);
        pattern.extend([false; 2]);
    }
    pattern.extend([false; 12]);
    pattern
}

impl Default for BoardConfig {
    fn default() -> Self {
        let row_groups = ROW_GROUP_SIZES
            .iter()
            .zip(ROW_GROUP_POINTS)
            .zip(ROW_GROUP_COLORS)
            .map(|((&rows, points), color)| RowGroup {
                rows,
                points,
                color,
            })
            .collect();

        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,

            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_border_x: BRICK_BORDER_X,
            brick_border_y: BRICK_BORDER_Y,
            bricks_per_row: BRICKS_PER_ROW,
            brick_rows: ROW_GROUP_SIZES.iter().sum(),
            row_groups,
            startup_pattern: classic_startup_pattern(),
            additional_rows: vec![false, false, true, true, true, true],

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_top: PADDLE_TOP,
            paddle_min: PADDLE_MIN,
            paddle_max: PADDLE_MAX,
            paddle_step: PADDLE_STEP,
            paddle_zones: PaddleZones::default(),

            ball_width: BALL_WIDTH,
            ball_height: BALL_HEIGHT,
            base_speed: BALL_BASE_SPEED,
            max_speed: BALL_MAX_SPEED,

            lives: START_LIVES,
        }
    }
}

impl BoardConfig {
    /// Parse a JSON config (missing fields take defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded board config from {}", path.display());
        Ok(config)
    }

    /// Check every cross-field invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bricks_per_row == 0 {
            return Err(ConfigError::NoBrickColumns);
        }

        let group_rows = self
            .row_groups
            .iter()
            .try_fold(0usize, |sum, g| sum.checked_add(g.rows));
        if group_rows != Some(self.brick_rows) || self.brick_rows == 0 {
            return Err(ConfigError::RowGroupMismatch {
                group_rows: group_rows.unwrap_or(usize::MAX),
                brick_rows: self.brick_rows,
            });
        }

        if self.startup_pattern.len() != self.brick_rows {
            return Err(ConfigError::StartupPatternLength {
                expected: self.brick_rows,
                actual: self.startup_pattern.len(),
            });
        }

        if self.additional_rows.is_empty() {
            return Err(ConfigError::EmptyAdditionalRows);
        }

        if !(self.paddle_min.is_finite()
            && self.paddle_max.is_finite()
            && self.paddle_max > self.paddle_min)
        {
            return Err(ConfigError::EmptyPaddleRange {
                min: self.paddle_min,
                max: self.paddle_max,
            });
        }

        if !(self.paddle_step.is_finite() && self.paddle_step > 0.0) {
            return Err(ConfigError::NonPositivePaddleStep {
                step: self.paddle_step,
            });
        }

        if self.ball_width == 0 || self.ball_height == 0 || self.ball_width >= self.board_width {
            return Err(ConfigError::InvalidBallSize {
                width: self.ball_width,
                height: self.ball_height,
            });
        }

        if self.paddle_top >= self.board_height || self.paddle_top < self.ball_height {
            return Err(ConfigError::PaddleBelowBoard {
                paddle_top: self.paddle_top,
                board_height: self.board_height,
            });
        }

        // One pixel of margin on the right
        if self
            .paddle_width
            .checked_add(1)
            .is_none_or(|w| w >= self.board_width)
        {
            return Err(ConfigError::PaddleTooWide {
                paddle_width: self.paddle_width,
                board_width: self.board_width,
            });
        }

        let field = self.field_size();
        let fits = field.is_some_and(|(width, height)| {
            width <= self.board_width
                && height
                    .checked_add(self.ball_height)
                    .is_some_and(|h| h <= self.paddle_top)
        });
        if !fits || self.brick_width == 0 || self.brick_height == 0 {
            let (field_width, field_height) = field.unwrap_or((u32::MAX, u32::MAX));
            return Err(ConfigError::BrickFieldOverflow {
                field_width,
                field_height,
            });
        }

        // A single reflection off a side wall must land back on the board
        if !(self.base_speed > 0.0
            && self.base_speed <= self.max_speed
            && self.max_speed < self.ball_max_x())
        {
            return Err(ConfigError::InvalidSpeed {
                base: self.base_speed,
                max: self.max_speed,
            });
        }

        if self.lives < 0 {
            return Err(ConfigError::NegativeLives { lives: self.lives });
        }

        Ok(())
    }

    /// Pixel size of the whole brick field, `None` if it overflows
    fn field_size(&self) -> Option<(u32, u32)> {
        let pitch_x = self.brick_border_x.checked_mul(2)?.checked_add(self.brick_width)?;
        let pitch_y = self.brick_border_y.checked_mul(2)?.checked_add(self.brick_height)?;
        let width = pitch_x.checked_mul(u32::try_from(self.bricks_per_row).ok()?)?;
        let height = pitch_y.checked_mul(u32::try_from(self.brick_rows).ok()?)?;
        Some((width, height))
    }

    /// Size of one brick cell including its border on both sides
    #[inline]
    pub fn cell_pitch(&self) -> (u32, u32) {
        (
            self.brick_width
                .saturating_add(self.brick_border_x.saturating_mul(2)),
            self.brick_height
                .saturating_add(self.brick_border_y.saturating_mul(2)),
        )
    }

    /// Largest x a ball's left edge may reach
    #[inline]
    pub fn ball_max_x(&self) -> f64 {
        f64::from(self.board_width.saturating_sub(self.ball_width))
    }

    /// Ball y at which it reaches the paddle plane
    #[inline]
    pub fn paddle_contact_y(&self) -> f64 {
        f64::from(self.paddle_top.saturating_sub(self.ball_height))
    }

    /// Logical paddle position at the middle of the axis
    #[inline]
    pub fn paddle_midpoint(&self) -> f64 {
        (self.paddle_min + self.paddle_max) / 2.0
    }

    /// Initial period of both difficulty countdowns
    #[inline]
    pub fn initial_difficulty_period(&self) -> u32 {
        u32::try_from(self.bricks_per_row)
            .unwrap_or(u32::MAX)
            .saturating_mul(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BoardConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.brick_rows, 30);
        assert_eq!(config.cell_pitch(), (20, 7));
        assert_eq!(config.initial_difficulty_period(), 32);
        assert_eq!(config.paddle_midpoint(), 512.0);
    }

    #[test]
    fn test_classic_startup_pattern() {
        let pattern = classic_startup_pattern();
        assert_eq!(pattern.len(), 30);
        assert_eq!(pattern.iter().filter(|&&p| p).count(), 12);
        assert!(pattern[..4].iter().all(|&p| p));
        assert!(!pattern[4] && !pattern[5]);
        assert!(pattern[18..].iter().all(|&p| !p));
    }

    #[test]
    fn test_row_group_mismatch_rejected() {
        let mut config = BoardConfig::default();
        config.row_groups.pop();
        assert_eq!(
            config.validate(),
            Err(ConfigError::RowGroupMismatch {
                group_rows: 24,
                brick_rows: 30
            })
        );
    }

    #[test]
    fn test_empty_paddle_range_rejected() {
        let config = BoardConfig {
            paddle_min: 10.0,
            paddle_max: 10.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPaddleRange { .. })
        ));
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let config = BoardConfig {
            base_speed: 6.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeed { .. })
        ));
    }

    #[test]
    fn test_startup_pattern_length_rejected() {
        let mut config = BoardConfig::default();
        config.startup_pattern.truncate(10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartupPatternLength {
                expected: 30,
                actual: 10
            })
        );
    }

    #[test]
    fn test_field_must_fit_above_paddle() {
        let config = BoardConfig {
            paddle_top: 150,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BrickFieldOverflow { .. })
        ));
    }

    #[test]
    fn test_huge_brick_size_rejected() {
        let err = BoardConfig::from_json(r#"{ "brick_width": 4294967295 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BrickFieldOverflow { .. }));

        let err = BoardConfig::from_json(r#"{ "brick_border_y": 4294967295 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BrickFieldOverflow { .. }));
    }

    #[test]
    fn test_huge_paddle_width_rejected() {
        let err = BoardConfig::from_json(r#"{ "paddle_width": 4294967295 }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::PaddleTooWide {
                paddle_width: u32::MAX,
                board_width: BOARD_WIDTH
            }
        );
    }

    #[test]
    fn test_field_width_overflow_rejected() {
        // 16 columns of a 300 million pixel pitch overflow u32
        let config = BoardConfig {
            brick_width: 300_000_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BrickFieldOverflow { .. })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_column_count_past_u32_rejected() {
        // Would truncate to a single column if cast to u32
        let config = BoardConfig {
            bricks_per_row: (1usize << 32) + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BrickFieldOverflow { .. })
        ));
    }

    #[test]
    fn test_row_group_sum_overflow_rejected() {
        let mut config = BoardConfig::default();
        config.row_groups[0].rows = usize::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RowGroupMismatch { .. })
        ));
    }

    #[test]
    fn test_max_speed_must_fit_one_reflection() {
        let config = BoardConfig {
            max_speed: 316.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeed { .. })
        ));

        let config = BoardConfig {
            max_speed: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_paddle_range_rejected() {
        let config = BoardConfig {
            paddle_max: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPaddleRange { .. })
        ));
    }

    #[test]
    fn test_from_json_partial_override() {
        let config =
            BoardConfig::from_json(r#"{ "lives": 3, "paddle_zones": "EqualThirds" }"#).unwrap();
        assert_eq!(config.lives, 3);
        assert_eq!(config.paddle_zones, PaddleZones::EqualThirds);
        assert_eq!(config.board_width, BOARD_WIDTH);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            BoardConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{ "lives": -2 }"#),
            Err(ConfigError::NegativeLives { lives: -2 })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BoardConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_paddle_zones_from_str() {
        assert_eq!(PaddleZones::from_str("thirds"), Some(PaddleZones::EqualThirds));
        assert_eq!(PaddleZones::from_str("WIDE"), Some(PaddleZones::WideSides));
        assert_eq!(PaddleZones::from_str("diagonal"), None);
        assert_eq!(PaddleZones::WideSides.as_str(), "WideSides");
    }
}
