//! Paddle controllers
//!
//! Keyboard stepping, analog device mapping, and an autopilot for demo runs.

use crate::settings::BoardConfig;
use crate::sim::GameState;

use super::PaddleController;

/// Horizontal direction of a held key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Moves the paddle a fixed step per tick while exactly one direction key is
/// held
#[derive(Debug, Clone)]
pub struct KeyboardController {
    left_held: bool,
    right_held: bool,
    step: f64,
    min: f64,
    max: f64,
}

impl KeyboardController {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            left_held: false,
            right_held: false,
            step: config.paddle_step,
            min: config.paddle_min,
            max: config.paddle_max,
        }
    }

    pub fn key_down(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.left_held = true,
            Direction::Right => self.right_held = true,
        }
    }

    pub fn key_up(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.left_held = false,
            Direction::Right => self.right_held = false,
        }
    }

    pub fn release_all(&mut self) {
        self.left_held = false;
        self.right_held = false;
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left_held,
            Direction::Right => self.right_held,
        }
    }
}

impl PaddleController for KeyboardController {
    fn move_paddle(&mut self, current: f64) -> f64 {
        let delta = match (self.left_held, self.right_held) {
            (true, false) => -self.step,
            (false, true) => self.step,
            // Neither or both: stay put
            _ => return current,
        };
        (current + delta).clamp(self.min, self.max)
    }
}

/// Maps a raw device reading (a potentiometer, a mouse x) linearly onto the
/// paddle axis
#[derive(Debug, Clone)]
pub struct AnalogController {
    raw_min: f64,
    raw_max: f64,
    min: f64,
    max: f64,
    reading: Option<f64>,
}

impl AnalogController {
    /// `raw_min..raw_max` is the device's range; it may be inverted
    pub fn new(config: &BoardConfig, raw_min: f64, raw_max: f64) -> Self {
        Self {
            raw_min,
            raw_max,
            min: config.paddle_min,
            max: config.paddle_max,
            reading: None,
        }
    }

    pub fn set_reading(&mut self, raw: f64) {
        if raw.is_finite() {
            self.reading = Some(raw);
        }
    }

    pub fn reading(&self) -> Option<f64> {
        self.reading
    }

    fn map(&self, raw: f64) -> f64 {
        let span = self.raw_max - self.raw_min;
        if span == 0.0 {
            return self.min;
        }
        let t = ((raw - self.raw_min) / span).clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }
}

impl PaddleController for AnalogController {
    fn move_paddle(&mut self, current: f64) -> f64 {
        match self.reading {
            Some(raw) => self.map(raw),
            None => current,
        }
    }
}

/// Demo player: predicts where a falling ball will meet the paddle plane and
/// steers a keyboard controller toward it
#[derive(Debug, Clone)]
pub struct Autopilot {
    keys: KeyboardController,
    config: BoardConfig,
    target: Option<f64>,
}

impl Autopilot {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            keys: KeyboardController::new(config),
            config: config.clone(),
            target: None,
        }
    }

    /// Logical target the paddle is heading for, if a ball is falling
    pub fn target(&self) -> Option<f64> {
        self.target
    }

    /// Update the target from the current game state; call before each tick
    pub fn observe(&mut self, state: &GameState) {
        self.target = state
            .ball()
            .filter(|ball| ball.vel.y > 0.0)
            .map(|ball| {
                let contact_y = self.config.paddle_contact_y();
                let ticks = (contact_y - ball.pos.y) / ball.vel.y;
                let landing = fold_into(ball.pos.x + ball.vel.x * ticks, self.config.ball_max_x());

                // Vary the contact point a little so rallies don't loop forever
                let offset = ((state.time_ticks() / 97) % 5) as f64 - 2.0;
                let ball_mid = landing + f64::from(self.config.ball_width) / 2.0 + offset;
                self.logical_for_paddle_center(ball_mid)
            });
    }

    /// Logical position that centers the paddle on pixel `x`
    fn logical_for_paddle_center(&self, x: f64) -> f64 {
        let max_left = f64::from(
            self.config
                .board_width
                .saturating_sub(self.config.paddle_width + 1),
        );
        let left = x - f64::from(self.config.paddle_width) / 2.0;
        let t = if max_left > 0.0 {
            (left / max_left).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.config.paddle_min + t * (self.config.paddle_max - self.config.paddle_min)
    }
}

/// Reflect `x` back into `[0, max]` the way the side walls do
fn fold_into(x: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * max;
    let folded = x.rem_euclid(period);
    if folded > max { period - folded } else { folded }
}

impl PaddleController for Autopilot {
    fn move_paddle(&mut self, current: f64) -> f64 {
        self.keys.release_all();
        if let Some(target) = self.target {
            if target < current - self.keys.step / 2.0 {
                self.keys.key_down(Direction::Left);
            } else if target > current + self.keys.step / 2.0 {
                self.keys.key_down(Direction::Right);
            }
        }
        self.keys.move_paddle(current)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::sim::{Ball, tick};

    fn config() -> BoardConfig {
        BoardConfig::default()
    }

    #[test]
    fn test_keyboard_steps_while_held() {
        let mut keys = KeyboardController::new(&config());
        assert_eq!(keys.move_paddle(500.0), 500.0);

        keys.key_down(Direction::Right);
        assert_eq!(keys.move_paddle(500.0), 522.0);
        keys.key_up(Direction::Right);
        keys.key_down(Direction::Left);
        assert_eq!(keys.move_paddle(500.0), 478.0);
    }

    #[test]
    fn test_keyboard_both_keys_hold_still() {
        let mut keys = KeyboardController::new(&config());
        keys.key_down(Direction::Left);
        keys.key_down(Direction::Right);
        assert_eq!(keys.move_paddle(300.0), 300.0);
        keys.key_up(Direction::Left);
        assert!(keys.is_held(Direction::Right));
        assert_eq!(keys.move_paddle(300.0), 322.0);
    }

    #[test]
    fn test_keyboard_clamps_to_range() {
        let mut keys = KeyboardController::new(&config());
        keys.key_down(Direction::Left);
        assert_eq!(keys.move_paddle(10.0), 0.0);
        keys.release_all();
        keys.key_down(Direction::Right);
        assert_eq!(keys.move_paddle(1020.0), 1024.0);
    }

    #[test]
    fn test_analog_maps_endpoints() {
        let mut analog = AnalogController::new(&config(), 0.0, 255.0);
        // No reading yet: hold position
        assert_eq!(analog.move_paddle(333.0), 333.0);

        analog.set_reading(0.0);
        assert_eq!(analog.move_paddle(333.0), 0.0);
        analog.set_reading(255.0);
        assert_eq!(analog.move_paddle(333.0), 1024.0);
        analog.set_reading(127.5);
        assert_eq!(analog.move_paddle(0.0), 512.0);
        analog.set_reading(400.0);
        assert_eq!(analog.move_paddle(0.0), 1024.0);
    }

    #[test]
    fn test_analog_inverted_range() {
        let mut analog = AnalogController::new(&config(), 1000.0, 0.0);
        analog.set_reading(1000.0);
        assert_eq!(analog.move_paddle(500.0), 0.0);
        analog.set_reading(f64::NAN);
        assert_eq!(analog.reading(), Some(1000.0));
    }

    #[test]
    fn test_pair_applies_in_order() {
        let mut analog = AnalogController::new(&config(), 0.0, 100.0);
        analog.set_reading(50.0);
        let mut keys = KeyboardController::new(&config());
        keys.key_down(Direction::Right);

        let mut pair = (analog, keys);
        assert_eq!(pair.move_paddle(0.0), 534.0);
    }

    #[test]
    fn test_fold_into_board() {
        assert_eq!(fold_into(10.0, 316.0), 10.0);
        assert_eq!(fold_into(-10.0, 316.0), 10.0);
        assert_eq!(fold_into(326.0, 316.0), 306.0);
        assert_eq!(fold_into(642.0, 316.0), 10.0);
    }

    #[test]
    fn test_autopilot_tracks_falling_ball() {
        let config = config();
        let mut state = GameState::new(config.clone(), 3).unwrap();
        state.toggle_running();
        state.place_ball(Ball {
            pos: DVec2::new(280.0, 100.0),
            vel: DVec2::new(0.0, 2.0),
            collisions_armed: true,
        });

        let mut pilot = Autopilot::new(&config);
        pilot.observe(&state);
        let target = pilot.target().unwrap();
        assert!(target > state.paddle_logical_position());

        let before = state.paddle_logical_position();
        tick(&mut state, &mut pilot);
        assert_eq!(state.paddle_logical_position(), before + config.paddle_step);
    }

    #[test]
    fn test_autopilot_idle_when_ball_rising() {
        let config = config();
        let mut state = GameState::new(config.clone(), 3).unwrap();
        state.place_ball(Ball {
            pos: DVec2::new(20.0, 150.0),
            vel: DVec2::new(1.0, -2.0),
            collisions_armed: true,
        });
        let mut pilot = Autopilot::new(&config);
        pilot.observe(&state);
        assert_eq!(pilot.target(), None);
        assert_eq!(pilot.move_paddle(512.0), 512.0);
    }
}
