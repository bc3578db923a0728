//! Collision detection and response
//!
//! Axis-aligned rackets, flat top/bottom walls and circular pickups. Everything
//! here is a pure function of its inputs so the rules can be tested in
//! isolation.

use glam::Vec2;

use super::state::{Ball, PaddleBody, Side};
use crate::consts::*;

/// Which wall was touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Bottom,
}

/// Reflect the ball off the top/bottom walls
///
/// Clamps the centre to exactly `margin ± radius` and forces `vy` away from
/// the wall, keeping its magnitude.
pub fn wall_bounce(ball: &mut Ball) -> Option<Wall> {
    let top = FIELD_MARGIN;
    let bottom = FIELD_HEIGHT - FIELD_MARGIN;

    if ball.pos.y - BALL_RADIUS < top {
        ball.pos.y = top + BALL_RADIUS;
        ball.vel.y = ball.vel.y.abs();
        return Some(Wall::Top);
    }
    if ball.pos.y + BALL_RADIUS > bottom {
        ball.pos.y = bottom - BALL_RADIUS;
        ball.vel.y = -ball.vel.y.abs();
        return Some(Wall::Bottom);
    }
    None
}

/// Overlap test between a ball and a racket
///
/// Only counts while the ball travels toward that racket, so a ball that was
/// just returned cannot be caught twice.
pub fn paddle_contact(pos: Vec2, vel: Vec2, paddle: &PaddleBody, side: Side) -> bool {
    let in_x = pos.x - BALL_RADIUS <= paddle.x + PADDLE_WIDTH && pos.x + BALL_RADIUS >= paddle.x;
    let in_y = pos.y >= paddle.y && pos.y <= paddle.y + paddle.height;
    let approaching = match side {
        Side::Left => vel.x < 0.0,
        Side::Right => vel.x > 0.0,
    };
    in_x && in_y && approaching
}

/// Outgoing velocity after a racket hit
///
/// The contact point picks the angle (centre is flat, the ends are ±0.3π),
/// each return speeds the ball up 5% up to the cap, and a moving racket adds
/// spin.
pub fn paddle_return(vel: Vec2, ball_y: f32, paddle: &PaddleBody, side: Side) -> Vec2 {
    let rel = (ball_y - paddle.y) / paddle.height;
    let angle = (rel - 0.5) * 2.0 * MAX_BOUNCE_ANGLE;
    let speed = (vel.length() * PADDLE_BOOST).min(BALL_MAX_SPEED);
    // Racket velocity is px/s, the ball works in px per frame
    let spin = paddle.vy / FRAME_RATE * PADDLE_SPIN;

    Vec2::new(
        angle.cos() * speed * side.outward(),
        angle.sin() * speed + spin,
    )
}

/// Ball x after a hit, pushed out to the racket's outer face
pub fn paddle_face(paddle: &PaddleBody, side: Side) -> f32 {
    match side {
        Side::Left => paddle.x + PADDLE_WIDTH + BALL_RADIUS,
        Side::Right => paddle.x - BALL_RADIUS,
    }
}

/// Circle pickup test (strictly inside `reach`)
#[inline]
pub fn circle_contact(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) < reach
}

/// Side that scores when the ball has left the field
pub fn exit_scorer(pos: Vec2) -> Option<Side> {
    if pos.x < -BALL_RADIUS * 2.0 {
        Some(Side::Right)
    } else if pos.x > FIELD_WIDTH + BALL_RADIUS * 2.0 {
        Some(Side::Left)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::PI;

    fn racket(side: Side) -> PaddleBody {
        let x = match side {
            Side::Left => PADDLE_INSET,
            Side::Right => FIELD_WIDTH - PADDLE_INSET - PADDLE_WIDTH,
        };
        PaddleBody {
            x,
            y: 260.0,
            height: PADDLE_HEIGHT,
            vy: 0.0,
        }
    }

    fn ball_at(pos: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::serve(&mut Pcg32::seed_from_u64(0));
        ball.pos = pos;
        ball.vel = vel;
        ball.frozen = false;
        ball
    }

    #[test]
    fn test_centre_hit_is_flat() {
        let p = racket(Side::Right);
        let v = paddle_return(Vec2::new(5.0, 0.0), p.y + p.height / 2.0, &p, Side::Right);
        assert!(v.y.abs() < 1e-5);
        assert!(v.x < 0.0);
    }

    #[test]
    fn test_edge_hits_are_steepest() {
        let p = racket(Side::Left);
        let top = paddle_return(Vec2::new(-5.0, 0.0), p.y, &p, Side::Left);
        let bottom = paddle_return(Vec2::new(-5.0, 0.0), p.y + p.height, &p, Side::Left);
        assert!((top.y.atan2(top.x) + 0.3 * PI).abs() < 1e-4);
        assert!((bottom.y.atan2(bottom.x) - 0.3 * PI).abs() < 1e-4);
    }

    #[test]
    fn test_speed_capped() {
        let p = racket(Side::Right);
        let v = paddle_return(Vec2::new(20.0, 0.0), 300.0, &p, Side::Right);
        assert!((v.length() - BALL_MAX_SPEED).abs() < 1e-4);

        let v = paddle_return(Vec2::new(10.0, 0.0), 300.0, &p, Side::Right);
        assert!((v.length() - 10.5).abs() < 1e-4);
    }

    #[test]
    fn test_spin_from_moving_racket() {
        let mut p = racket(Side::Right);
        p.vy = 420.0;
        let v = paddle_return(Vec2::new(5.0, 0.0), 300.0, &p, Side::Right);
        assert!((v.y - 1.05).abs() < 1e-4);
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut ball = ball_at(Vec2::new(400.0, 22.0), Vec2::new(3.0, -4.0));
        assert_eq!(wall_bounce(&mut ball), Some(Wall::Top));
        assert_eq!(ball.pos.y, 27.0);
        assert_eq!(ball.vel.y, 4.0);
    }

    #[test]
    fn test_bottom_wall_bounce() {
        let mut ball = ball_at(Vec2::new(400.0, 579.0), Vec2::new(3.0, 2.5));
        assert_eq!(wall_bounce(&mut ball), Some(Wall::Bottom));
        assert_eq!(ball.pos.y, 573.0);
        assert_eq!(ball.vel.y, -2.5);
    }

    #[test]
    fn test_no_wall_in_open_court() {
        let mut ball = ball_at(Vec2::new(400.0, 300.0), Vec2::new(3.0, -4.0));
        assert_eq!(wall_bounce(&mut ball), None);
        assert_eq!(ball.vel.y, -4.0);
    }

    #[test]
    fn test_contact_requires_approach() {
        let p = racket(Side::Right);
        let pos = Vec2::new(p.x - 3.0, 300.0);
        assert!(paddle_contact(pos, Vec2::new(5.0, 0.0), &p, Side::Right));
        assert!(!paddle_contact(pos, Vec2::new(-5.0, 0.0), &p, Side::Right));
        // Beyond the racket's vertical span
        assert!(!paddle_contact(Vec2::new(pos.x, 350.0), Vec2::new(5.0, 0.0), &p, Side::Right));
    }

    #[test]
    fn test_face_positions() {
        assert_eq!(paddle_face(&racket(Side::Left), Side::Left), 49.0);
        assert_eq!(paddle_face(&racket(Side::Right), Side::Right), 751.0);
    }

    #[test]
    fn test_exit_scorer() {
        assert_eq!(exit_scorer(Vec2::new(-14.5, 300.0)), Some(Side::Right));
        assert_eq!(exit_scorer(Vec2::new(-14.0, 300.0)), None);
        assert_eq!(exit_scorer(Vec2::new(814.5, 300.0)), Some(Side::Left));
    }

    #[test]
    fn test_circle_contact() {
        assert!(circle_contact(Vec2::ZERO, Vec2::new(16.9, 0.0), GOLD_PICKUP_RADIUS));
        assert!(!circle_contact(Vec2::ZERO, Vec2::new(17.0, 0.0), GOLD_PICKUP_RADIUS));
    }
}
