//! Platform abstraction layer
//!
//! The simulation never reads devices directly. Hosts translate whatever
//! input they have (key events, a potentiometer, a mouse) into a
//! `PaddleController`, which `sim::tick` polls once per step.

pub mod input;

pub use input::{AnalogController, Autopilot, Direction, KeyboardController};

/// Source of paddle movement, polled once per tick
pub trait PaddleController {
    /// Next logical paddle position given the current one. The result is
    /// clamped by the game state, so controllers may overshoot.
    fn move_paddle(&mut self, current: f64) -> f64;
}

impl<C: PaddleController + ?Sized> PaddleController for &mut C {
    fn move_paddle(&mut self, current: f64) -> f64 {
        (**self).move_paddle(current)
    }
}

impl<C: PaddleController + ?Sized> PaddleController for Box<C> {
    fn move_paddle(&mut self, current: f64) -> f64 {
        (**self).move_paddle(current)
    }
}

/// Two controllers in sequence: `A` moves first, `B` sees its result
impl<A: PaddleController, B: PaddleController> PaddleController for (A, B) {
    fn move_paddle(&mut self, current: f64) -> f64 {
        let after_first = self.0.move_paddle(current);
        self.1.move_paddle(after_first)
    }
}
