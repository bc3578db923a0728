//! CPU opponent
//!
//! Steers the left racket toward where it thinks the ball will be. Harder
//! tiers project the ball's path off the walls, all tiers wobble a little.

use super::state::{Ball, Difficulty, GameState, Side};
use crate::consts::*;
use crate::unwrap_into_range;

/// Drive the left racket (single player only)
pub fn update_ai(state: &mut GameState) {
    if state.two_player {
        return;
    }

    let difficulty = state.difficulty;
    let height = state.effective_height(Side::Left);
    let paddle_x = state.left.x;
    let centre = state.left.y + height / 2.0;

    let target = predict_target_y(&state.ball, paddle_x, difficulty)
        + (2.0 * state.time).sin() as f32 * difficulty.jitter();

    state.left.vy = steer(target - centre, state.left.vy, difficulty.top_speed());
}

/// Where the AI aims its racket centre, before jitter
///
/// Easy chases the ball. Medium and Hard project the ball's path to the
/// racket face while it is incoming, mirrored back into the field.
pub fn predict_target_y(ball: &Ball, paddle_x: f32, difficulty: Difficulty) -> f32 {
    if !difficulty.predicts() || ball.vel.x >= 0.0 {
        return ball.pos.y;
    }

    let time_to_reach = (ball.pos.x - paddle_x - PADDLE_WIDTH) / (-ball.vel.x + 0.001);
    let projected = ball.pos.y + ball.vel.y * time_to_reach;
    unwrap_into_range(projected, FIELD_HEIGHT)
}

/// New racket velocity (pixels/s) for an aim error of `diff`
pub fn steer(diff: f32, vy: f32, top_speed: f32) -> f32 {
    if diff.abs() > AI_DEADBAND {
        diff.signum() * (diff.abs() * AI_GAIN).min(top_speed * FRAME_RATE)
    } else {
        vy * AI_DAMPING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball(pos: Vec2, vel: Vec2) -> Ball {
        let mut b = Ball::serve(&mut Pcg32::seed_from_u64(0));
        b.pos = pos;
        b.vel = vel;
        b
    }

    #[test]
    fn test_easy_chases_ball() {
        let b = ball(Vec2::new(400.0, 123.0), Vec2::new(-5.0, 5.0));
        assert_eq!(predict_target_y(&b, 30.0, Difficulty::Easy), 123.0);
    }

    #[test]
    fn test_no_projection_when_receding() {
        let b = ball(Vec2::new(400.0, 200.0), Vec2::new(5.0, 5.0));
        assert_eq!(predict_target_y(&b, 30.0, Difficulty::Hard), 200.0);
    }

    #[test]
    fn test_projection_straight_line() {
        // 100 px to the face at 5 px/frame: 20 frames, 2 px/frame down
        let b = ball(Vec2::new(142.0, 300.0), Vec2::new(-5.0, 2.0));
        let y = predict_target_y(&b, 30.0, Difficulty::Medium);
        assert!((y - 340.0).abs() < 0.1);
    }

    #[test]
    fn test_projection_mirrors_off_wall() {
        // Would reach y = -50, mirrored to 50
        let b = ball(Vec2::new(142.0, 50.0), Vec2::new(-5.0, -5.0));
        let y = predict_target_y(&b, 30.0, Difficulty::Hard);
        assert!((y - 50.0).abs() < 0.2);
    }

    #[test]
    fn test_steer_saturates_at_top_speed() {
        assert_eq!(steer(1000.0, 0.0, 3.5), 210.0);
        assert_eq!(steer(-1000.0, 0.0, 8.0), -480.0);
        assert_eq!(steer(20.0, 0.0, 8.0), 100.0);
    }

    #[test]
    fn test_steer_deadband_damps() {
        assert_eq!(steer(4.0, 100.0, 5.5), 90.0);
    }

    #[test]
    fn test_two_player_leaves_left_alone() {
        use crate::history::MatchHistory;
        use crate::settings::Settings;

        let mut s = GameState::new(1, &Settings::default(), MatchHistory::default());
        s.two_player = true;
        s.left.vy = 42.0;
        update_ai(&mut s);
        assert_eq!(s.left.vy, 42.0);
    }

    fn single_player(difficulty: Difficulty, ball_pos: Vec2, ball_vel: Vec2) -> GameState {
        use crate::history::MatchHistory;
        use crate::settings::Settings;

        let mut s = GameState::new(4, &Settings::default(), MatchHistory::default());
        s.two_player = false;
        s.difficulty = difficulty;
        // Racket centre at 300
        s.left.y = 300.0 - PADDLE_HEIGHT / 2.0;
        s.left.vy = 0.0;
        s.ball.pos = ball_pos;
        s.ball.vel = ball_vel;
        s
    }

    #[test]
    fn test_jitter_amplitudes() {
        assert_eq!(Difficulty::Easy.jitter(), 40.0);
        assert_eq!(Difficulty::Medium.jitter(), 20.0);
        assert_eq!(Difficulty::Hard.jitter(), 8.0);
    }

    #[test]
    fn test_jitter_peak_offsets_target() {
        for difficulty in Difficulty::ALL {
            // Receding ball: every tier aims at its current y
            let mut s = single_player(difficulty, Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.0));

            s.time = std::f64::consts::FRAC_PI_4;
            update_ai(&mut s);
            let expected = difficulty.jitter() * AI_GAIN;
            assert!(
                (s.left.vy - expected).abs() < 1e-2,
                "{:?}: vy {} expected {}",
                difficulty,
                s.left.vy,
                expected
            );

            s.time = 3.0 * std::f64::consts::FRAC_PI_4;
            s.left.vy = 0.0;
            update_ai(&mut s);
            assert!((s.left.vy + expected).abs() < 1e-2);
        }
    }

    #[test]
    fn test_medium_steers_to_prediction() {
        let mut s = single_player(Difficulty::Medium, Vec2::new(142.0, 300.0), Vec2::new(-5.0, 2.0));
        s.time = 0.0;
        update_ai(&mut s);
        // Aims at 340, 40 px below centre
        assert!((s.left.vy - 40.0 * AI_GAIN).abs() < 1.0);
    }

    #[test]
    fn test_within_deadband_damps() {
        let mut s = single_player(Difficulty::Easy, Vec2::new(142.0, 303.0), Vec2::new(-5.0, 2.0));
        s.time = 0.0;
        s.left.vy = 100.0;
        update_ai(&mut s);
        assert!((s.left.vy - 100.0 * AI_DAMPING).abs() < 1e-4);

        update_ai(&mut s);
        assert!((s.left.vy - 100.0 * AI_DAMPING * AI_DAMPING).abs() < 1e-4);
    }
}
