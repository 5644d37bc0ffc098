//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one step: spawn or integrate the
//! ball, bounce it off the walls, then resolve the paddle or the brick field.

use super::collision::{
    Motion, PaddleOutcome, bounce_off_walls, brick_contact, collide_with_paddle, find_brick_hit,
    reaches_paddle,
};
use super::geometry::points_for_row;
use super::state::{GameEvent, GameState, Launch};
use crate::platform::PaddleController;

/// Poll the paddle controller once, then advance the game by one step
pub fn tick<C: PaddleController + ?Sized>(state: &mut GameState, controller: &mut C) {
    let target = controller.move_paddle(state.paddle_logical_position());
    state.set_paddle_logical_position(target);
    step(state);
}

/// Advance the game by one step without touching the paddle
pub(crate) fn step(state: &mut GameState) {
    state.events.clear();

    if !state.is_running() {
        return;
    }
    state.time_ticks += 1;

    if state.ball.is_none() {
        let launch = Launch::random(&mut state.rng, &state.config);
        state.launch_ball(launch);
    }
    let Some(mut ball) = state.ball else {
        return;
    };

    let prev = ball.pos;
    let (moved, walls) = bounce_off_walls(&state.config, Motion::new(prev + ball.vel, ball.vel));
    if walls.any() {
        state.events.push(GameEvent::WallBounce);
    }
    ball = ball.with_motion(moved);

    // Weight of the scoring event this tick produced, if any
    let mut weight = None;

    if reaches_paddle(&state.config, ball.pos) {
        let paddle = state.paddle_rect();
        match collide_with_paddle(&state.config, prev, ball.vel, state.difficulty.speed, paddle) {
            PaddleOutcome::Miss => {
                log::debug!("Ball missed the paddle at x={:.2}", ball.pos.x);
                state.drop_ball();
                return;
            }
            PaddleOutcome::Bounce { motion, zone } => {
                ball = ball.with_motion(motion);
                ball.collisions_armed = true;
                state.events.push(GameEvent::PaddleHit { zone });
                weight = Some(1);
            }
        }
    } else if ball.collisions_armed {
        if let Some((row, col)) = find_brick_hit(&state.config, &state.bricks, prev, ball.pos) {
            let contact = brick_contact(&state.config, row, col, prev, ball.vel);
            ball = ball.with_motion(contact.motion);
            state.bricks.destroy(row, col);

            let points = points_for_row(&state.config, row);
            state.award(points);
            state.events.push(GameEvent::BrickDestroyed { row, col, points });
            log::debug!(
                "Brick ({}, {}) destroyed via {:?} edge, +{} (score {})",
                row,
                col,
                contact.edge,
                points,
                state.score
            );
            weight = Some(points);
        }
    }

    if let Some(weight) = weight {
        let (vel, change) =
            state
                .difficulty
                .record_event(&state.config, weight, &mut state.bricks, ball.vel);
        ball.vel = vel;
        if let Some(present) = change.wall_dropped {
            state.events.push(GameEvent::WallDropped { present });
        }
        if let Some(speed) = change.new_speed {
            state.events.push(GameEvent::SpeedUp { speed });
        }
    }

    state.ball = Some(ball);
}
