//! Difficulty ramp
//!
//! Two countdowns driven by scoring events. The row-drop countdown ticks once
//! per event and pushes a new brick row in from the top; its period shrinks
//! every time it fires. The speed-up countdown is charged with the event's
//! weight and speeds the ball up on a fixed period.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::BrickGrid;
use crate::consts::{FALLDOWN_SHRINK, MIN_FALLDOWN_PERIOD, SPEEDUP_FACTOR};
use crate::settings::BoardConfig;

/// What a scoring event changed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DifficultyChange {
    /// A wall drop inserted a row; `Some(present)` gives the new row's fill
    pub wall_dropped: Option<bool>,
    /// The ball was sped up to this magnitude
    pub new_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Current ball speed (pixels per tick)
    pub speed: f64,
    /// Events left before the next wall drop
    pub falldown_threshold: i64,
    /// Period the row-drop countdown restarts from
    pub next_falldown_period: u32,
    /// Weight left before the next speed-up
    pub speedup_threshold: i64,
    pub speedup_period: u32,
    /// Index into the additional-row cycle
    pub next_additional_row: usize,
}

impl Difficulty {
    pub fn new(config: &BoardConfig) -> Self {
        let period = config.initial_difficulty_period();
        Self {
            speed: config.base_speed,
            falldown_threshold: i64::from(period),
            next_falldown_period: period,
            speedup_threshold: i64::from(period),
            speedup_period: period,
            next_additional_row: 0,
        }
    }

    /// Every new ball starts at base speed with a full speed-up countdown
    pub fn arm_for_launch(&mut self, config: &BoardConfig) {
        self.speed = config.base_speed;
        self.speedup_threshold = i64::from(self.speedup_period);
    }

    /// Feed one scoring event of `weight` into both countdowns.
    ///
    /// Returns the ball velocity rescaled to any new speed along with what
    /// changed.
    pub fn record_event(
        &mut self,
        config: &BoardConfig,
        weight: u32,
        bricks: &mut BrickGrid,
        vel: DVec2,
    ) -> (DVec2, DifficultyChange) {
        let mut change = DifficultyChange::default();
        let mut vel = vel;

        self.falldown_threshold -= 1;
        if self.falldown_threshold <= 0 {
            change.wall_dropped = Some(self.drop_wall(config, bricks));
        }

        self.speedup_threshold -= i64::from(weight);
        if self.speedup_threshold <= 0 {
            let new_speed = (self.speed * SPEEDUP_FACTOR).min(config.max_speed);
            vel *= new_speed / self.speed;
            self.speed = new_speed;
            self.speedup_threshold = i64::from(self.speedup_period);
            change.new_speed = Some(new_speed);
            log::info!("Ball speed up: {:.3} px/tick", new_speed);
        }

        (vel, change)
    }

    /// Push the next row of the additional-row cycle in from the top
    fn drop_wall(&mut self, config: &BoardConfig, bricks: &mut BrickGrid) -> bool {
        self.falldown_threshold = i64::from(self.next_falldown_period);
        self.next_falldown_period = MIN_FALLDOWN_PERIOD
            .max((FALLDOWN_SHRINK * f64::from(self.next_falldown_period)) as u32);

        let present = config.additional_rows[self.next_additional_row];
        self.next_additional_row = (self.next_additional_row + 1) % config.additional_rows.len();
        bricks.drop_row(present);

        log::info!(
            "Wall dropped ({} row), next drop in {} events",
            if present { "full" } else { "empty" },
            self.falldown_threshold
        );
        present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (BoardConfig, Difficulty, BrickGrid) {
        let config = BoardConfig::default();
        let difficulty = Difficulty::new(&config);
        let grid = BrickGrid::from_pattern(&config.startup_pattern, config.bricks_per_row);
        (config, difficulty, grid)
    }

    #[test]
    fn test_initial_thresholds() {
        let (_, d, _) = setup();
        assert_eq!(d.falldown_threshold, 32);
        assert_eq!(d.speedup_threshold, 32);
        assert_eq!(d.next_falldown_period, 32);
        assert_eq!(d.speed, 2.75);
    }

    #[test]
    fn test_wall_drop_after_threshold_events() {
        let (config, mut d, mut grid) = setup();
        let before = grid.clone();
        let vel = DVec2::new(0.0, 1.0);

        for _ in 0..31 {
            let (_, change) = d.record_event(&config, 0, &mut grid, vel);
            assert_eq!(change.wall_dropped, None);
        }
        assert_eq!(grid, before);

        let (_, change) = d.record_event(&config, 0, &mut grid, vel);
        // First entry of the cycle is an empty row
        assert_eq!(change.wall_dropped, Some(false));
        assert_eq!(grid.rows(), before.rows());
        assert_eq!(grid.cols(), before.cols());
        assert!(grid.row(0).iter().all(|&p| !p));
        for r in 1..grid.rows() {
            assert_eq!(grid.row(r), before.row(r - 1));
        }
        assert_eq!(d.falldown_threshold, 32);
        // int(0.92 * 32)
        assert_eq!(d.next_falldown_period, 29);
    }

    #[test]
    fn test_falldown_period_shrinks_to_floor() {
        let (config, mut d, mut grid) = setup();
        let vel = DVec2::new(0.0, 1.0);
        let mut periods = Vec::new();
        for _ in 0..2000 {
            let (_, change) = d.record_event(&config, 0, &mut grid, vel);
            if change.wall_dropped.is_some() {
                periods.push(d.falldown_threshold);
            }
        }
        assert_eq!(&periods[..4], &[32, 29, 26, 23]);
        assert!(periods.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*periods.last().unwrap(), 10);
    }

    #[test]
    fn test_additional_rows_cycle() {
        let (config, mut d, mut grid) = setup();
        let mut inserted = Vec::new();
        for _ in 0..8 {
            d.falldown_threshold = 1;
            let (_, change) = d.record_event(&config, 0, &mut grid, DVec2::ZERO);
            inserted.push(change.wall_dropped.unwrap());
        }
        assert_eq!(
            inserted,
            vec![false, false, true, true, true, true, false, false]
        );
    }

    #[test]
    fn test_speedup_rescales_velocity() {
        let (config, mut d, mut grid) = setup();
        let vel = DVec2::new(0.6, -0.8) * d.speed;

        let (vel, change) = d.record_event(&config, 31, &mut grid, vel);
        assert_eq!(change.new_speed, None);

        let (vel, change) = d.record_event(&config, 1, &mut grid, vel);
        let expected = 2.75 * 1.25;
        assert_eq!(change.new_speed, Some(expected));
        assert!((vel.length() - expected).abs() < 1e-12);
        assert!((vel.normalize() - DVec2::new(0.6, -0.8)).length() < 1e-12);
        assert_eq!(d.speedup_threshold, 32);
    }

    #[test]
    fn test_speed_capped_at_max() {
        let (config, mut d, mut grid) = setup();
        let mut vel = DVec2::new(0.0, d.speed);
        let mut last = d.speed;
        for _ in 0..20 {
            let (v, _) = d.record_event(&config, 40, &mut grid, vel);
            vel = v;
            assert!(d.speed >= last);
            assert!(d.speed <= config.max_speed);
            last = d.speed;
        }
        assert_eq!(d.speed, config.max_speed);
        assert!((vel.length() - config.max_speed).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_still_counts_for_wall_drop() {
        let (config, mut d, mut grid) = setup();
        d.record_event(&config, 0, &mut grid, DVec2::ZERO);
        assert_eq!(d.falldown_threshold, 31);
        assert_eq!(d.speedup_threshold, 32);
    }

    #[test]
    fn test_arm_for_launch_resets_speed() {
        let (config, mut d, mut grid) = setup();
        d.record_event(&config, 100, &mut grid, DVec2::ZERO);
        assert!(d.speed > config.base_speed);
        d.arm_for_launch(&config);
        assert_eq!(d.speed, config.base_speed);
        assert_eq!(d.speedup_threshold, 32);
    }
}
