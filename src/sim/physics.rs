//! Racket and ball motion
//!
//! Rackets move in pixels/s, balls in frame units scaled by `60 * dt`.

use glam::Vec2;

use super::collision::{self, Wall};
use super::state::{Ball, GameState, PaddleBody, Side};
use crate::consts::*;

/// What happened to a ball during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BallStep {
    /// Wall touched and where
    pub wall: Option<(Wall, Vec2)>,
    /// Racket that returned the ball and the contact point
    pub paddle: Option<(Side, Vec2)>,
    /// Side credited because the ball left the field
    pub exited: Option<Side>,
}

/// Keyboard control of the human rackets
///
/// Right racket on the arrows; left racket on W/S in two-player. With no key
/// held the racket glides to a stop.
pub fn handle_paddle_input(state: &mut GameState) {
    let keys = state.keys;

    state.right.vy = held_velocity(keys.up, keys.down, state.right.vy);
    if state.two_player {
        state.left.vy = held_velocity(keys.w, keys.s, state.left.vy);
    }
}

fn held_velocity(up: bool, down: bool, vy: f32) -> f32 {
    if up {
        -PLAYER_PADDLE_SPEED
    } else if down {
        PLAYER_PADDLE_SPEED
    } else {
        vy * PADDLE_FRICTION
    }
}

/// Move both rackets and keep them between the walls
pub fn integrate_paddles(state: &mut GameState, dt: f32) {
    for side in [Side::Left, Side::Right] {
        let height = state.effective_height(side);
        let paddle = state.paddle_mut(side);
        paddle.y = clamp_paddle_y(paddle.y + paddle.vy * dt, height);
    }
}

/// Legal range for a racket's top edge
#[inline]
pub fn clamp_paddle_y(y: f32, height: f32) -> f32 {
    y.clamp(FIELD_MARGIN, FIELD_HEIGHT - FIELD_MARGIN - height)
}

/// Advance one ball: integrate, walls, rackets, exit check, trail
///
/// Frozen balls stay put. A ball that exits does not get a trail point.
pub fn advance_ball(
    ball: &mut Ball,
    left: &PaddleBody,
    right: &PaddleBody,
    speed_mult: f32,
    dt: f32,
) -> BallStep {
    let mut step = BallStep::default();
    if ball.frozen {
        return step;
    }

    ball.pos += ball.vel * FRAME_RATE * dt * speed_mult;

    if let Some(wall) = collision::wall_bounce(ball) {
        step.wall = Some((wall, ball.pos));
    }

    for (side, body) in [(Side::Left, left), (Side::Right, right)] {
        if collision::paddle_contact(ball.pos, ball.vel, body, side) {
            ball.vel = collision::paddle_return(ball.vel, ball.pos.y, body, side);
            ball.pos.x = collision::paddle_face(body, side);
            ball.last_hit_by = Some(side);
            step.paddle = Some((side, ball.pos));
        }
    }

    step.exited = collision::exit_scorer(ball.pos);
    if step.exited.is_none() {
        ball.record_trail();
    }
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MatchHistory;
    use crate::settings::Settings;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(11, &Settings::default(), MatchHistory::default())
    }

    fn free_ball(pos: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::serve(&mut Pcg32::seed_from_u64(0));
        ball.pos = pos;
        ball.vel = vel;
        ball.frozen = false;
        ball
    }

    #[test]
    fn test_input_sets_and_glides() {
        let mut s = state();
        s.keys.up = true;
        handle_paddle_input(&mut s);
        assert_eq!(s.right.vy, -420.0);

        s.keys.up = false;
        handle_paddle_input(&mut s);
        assert!((s.right.vy + 357.0).abs() < 1e-3);
    }

    #[test]
    fn test_left_keys_ignored_vs_cpu() {
        let mut s = state();
        s.keys.w = true;
        s.left.vy = 10.0;
        handle_paddle_input(&mut s);
        assert_eq!(s.left.vy, 10.0);

        s.two_player = true;
        handle_paddle_input(&mut s);
        assert_eq!(s.left.vy, -420.0);
    }

    #[test]
    fn test_paddles_clamped() {
        let mut s = state();
        s.right.vy = 10_000.0;
        s.left.vy = -10_000.0;
        integrate_paddles(&mut s, MAX_DT);
        assert_eq!(s.right.y, 500.0);
        assert_eq!(s.left.y, 20.0);
    }

    #[test]
    fn test_frozen_ball_stays() {
        let s = state();
        let mut ball = s.ball.clone();
        let before = ball.pos;
        let step = advance_ball(
            &mut ball,
            &s.paddle_body(Side::Left),
            &s.paddle_body(Side::Right),
            1.0,
            0.016,
        );
        assert_eq!(step, BallStep::default());
        assert_eq!(ball.pos, before);
        assert!(ball.trail.is_empty());
    }

    #[test]
    fn test_integration_in_frame_units() {
        let s = state();
        let mut ball = free_ball(Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.0));
        advance_ball(
            &mut ball,
            &s.paddle_body(Side::Left),
            &s.paddle_body(Side::Right),
            1.5,
            0.02,
        );
        // 5 * 60 * 0.02 * 1.5
        assert!((ball.pos.x - 409.0).abs() < 1e-3);
        assert_eq!(ball.trail.len(), 1);
    }

    #[test]
    fn test_right_racket_returns_ball() {
        let s = state();
        let mut ball = free_ball(Vec2::new(748.0, 300.0), Vec2::new(6.0, 0.0));
        let step = advance_ball(
            &mut ball,
            &s.paddle_body(Side::Left),
            &s.paddle_body(Side::Right),
            1.0,
            0.016,
        );
        assert_eq!(step.paddle.map(|(side, _)| side), Some(Side::Right));
        assert_eq!(ball.last_hit_by, Some(Side::Right));
        assert_eq!(ball.pos.x, 751.0);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_exit_scores_for_opponent() {
        let s = state();
        let mut ball = free_ball(Vec2::new(-10.0, 300.0), Vec2::new(-6.0, 0.0));
        let step = advance_ball(
            &mut ball,
            &s.paddle_body(Side::Left),
            &s.paddle_body(Side::Right),
            1.0,
            0.016,
        );
        assert_eq!(step.exited, Some(Side::Right));
        assert!(ball.trail.is_empty());
    }
}
