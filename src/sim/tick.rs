//! Per-frame simulation tick
//!
//! Advances the clock and ambient visuals in every phase, then runs exactly
//! one phase-specific update.

use glam::Vec2;

use super::physics::{self, BallStep};
use super::state::{GamePhase, GameState, Side};
use super::{ai, bonus, flow, particles};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::palette;

/// Advance the game state by `dt` seconds (capped at `MAX_DT`)
pub fn tick(state: &mut GameState, dt: f32) {
    let dt = dt.clamp(0.0, MAX_DT);
    state.time += dt as f64;

    if state.shake_enabled {
        state.shake.update(&mut state.rng);
    } else {
        state.shake = Default::default();
    }
    particles::update_particles(&mut state.particles, dt);
    particles::update_stars(&mut state.stars, &mut state.rng, dt);

    match state.phase {
        GamePhase::Countdown => flow::update_countdown(state, dt),
        GamePhase::Playing => update_playing(state, dt),
        GamePhase::Goal => flow::update_goal(state, dt),
        GamePhase::GameOver => {
            particles::confetti(&mut state.particles, &mut state.rng, state.particle_cap)
        }
        GamePhase::Title | GamePhase::ModeSelect | GamePhase::Difficulty | GamePhase::Paused => {}
    }
}

/// One rally step
///
/// Once a goal moves the phase on, nothing else is processed this tick.
fn update_playing(state: &mut GameState, dt: f32) {
    physics::handle_paddle_input(state);
    ai::update_ai(state);
    physics::integrate_paddles(state, dt);

    let left = state.paddle_body(Side::Left);
    let right = state.paddle_body(Side::Right);
    let mult = state.speed_multiplier();

    let step = physics::advance_ball(&mut state.ball, &left, &right, mult, dt);
    ball_feedback(state, &step);
    if let Some(scorer) = step.exited {
        score_point(state, scorer);
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut extras = std::mem::take(&mut state.extra_balls);
    extras.retain_mut(|ball| {
        let step = physics::advance_ball(ball, &left, &right, mult, dt);
        ball_feedback(state, &step);
        step.exited.is_none()
    });
    state.extra_balls = extras;

    bonus::update_gold(state, dt);
    if state.phase != GamePhase::Playing {
        return;
    }
    bonus::update_power_up(state, dt);
    bonus::purge_expired(state);
    flow::update_serve_delay(state, dt);
}

/// Sound, sparks and shake for wall and racket contacts
fn ball_feedback(state: &mut GameState, step: &BallStep) {
    if let Some((_, pos)) = step.wall {
        state.sound(SoundEffect::WallHit);
        state.burst(pos, palette::CYAN, 5, 80.0, 0.3, 2.0);
    }
    if let Some((side, pos)) = step.paddle {
        let accent = state.paddle(side).accent;
        state.sound(SoundEffect::PaddleHit);
        state.burst(pos, accent, 12, 150.0, 0.4, 3.0);
        state.shake.kick(SHAKE_PADDLE_HIT);
    }
}

/// Primary ball left the field
fn score_point(state: &mut GameState, scorer: Side) {
    state.add_score(scorer, 1);
    log::debug!(
        "{:?} scores ({}-{})",
        scorer,
        state.score_left,
        state.score_right
    );

    // Burst at the end that conceded
    let (origin, color) = match scorer {
        Side::Right => (Vec2::new(50.0, FIELD_HEIGHT / 2.0), palette::CPU_RED),
        Side::Left => (Vec2::new(FIELD_WIDTH - 50.0, FIELD_HEIGHT / 2.0), palette::CYAN),
    };
    state.sound(SoundEffect::Score);
    state.burst(origin, color, 30, 200.0, 0.8, 4.0);
    state.shake.kick(SHAKE_GOAL);

    flow::on_goal(state, scorer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MatchHistory;
    use crate::settings::Settings;
    use crate::sim::state::{Ball, GameEvent, GoldBonus, PowerUpKind, PowerUpPickup};

    fn playing() -> GameState {
        let mut s = GameState::new(5, &Settings::default(), MatchHistory::default());
        s.phase = GamePhase::Playing;
        s.ball.frozen = false;
        s
    }

    #[test]
    fn test_dt_is_capped() {
        let mut s = playing();
        tick(&mut s, 1.0);
        assert!((s.time - MAX_DT as f64).abs() < 1e-9);
    }

    #[test]
    fn test_clock_runs_in_menus() {
        let mut s = GameState::new(5, &Settings::default(), MatchHistory::default());
        tick(&mut s, 0.02);
        tick(&mut s, 0.02);
        assert!((s.time - 0.04).abs() < 1e-6);
        assert_eq!(s.phase, GamePhase::Title);
    }

    #[test]
    fn test_effects_run_out_while_paused() {
        let mut s = playing();
        bonus::apply_power_up(&mut s, PowerUpKind::Big, Side::Left);
        assert_eq!(s.effective_height(Side::Left), 120.0);

        s.phase = GamePhase::Paused;
        for _ in 0..200 {
            tick(&mut s, 0.05);
        }
        // Paused ticks leave the effect list alone
        assert_eq!(s.effects.len(), 1);
        assert!(s.time >= 10.0 - 1e-6);

        s.phase = GamePhase::Playing;
        tick(&mut s, 0.016);
        assert!(s.effects.is_empty());
        assert_eq!(s.effective_height(Side::Left), 80.0);
    }

    #[test]
    fn test_exit_scores_and_stops_tick() {
        let mut s = playing();
        s.ball.pos = Vec2::new(-10.0, 300.0);
        s.ball.vel = Vec2::new(-6.0, 0.0);
        s.gold = Some(GoldBonus { pos: Vec2::new(400.0, 300.0) });
        s.power_up_timer = 0.001;

        tick(&mut s, 0.016);
        assert_eq!(s.score_right, 1);
        assert_eq!(s.phase, GamePhase::Goal);
        assert_eq!(s.last_scorer, Some(Side::Right));
        // Power-up spawner did not run after the goal
        assert!(s.power_up.is_none());
        assert!(s.events.contains(&GameEvent::Sound(SoundEffect::Score)));
        assert!(s.events.contains(&GameEvent::PhaseChanged(GamePhase::Goal)));
    }

    #[test]
    fn test_extra_ball_exit_is_silent() {
        let mut s = playing();
        s.ball.pos = Vec2::new(400.0, 300.0);
        s.ball.vel = Vec2::new(1.0, 0.0);
        let mut extra = Ball::loose(Vec2::new(-13.0, 300.0), Vec2::new(-6.0, 0.0), None);
        extra.record_trail();
        s.extra_balls.push(extra);

        tick(&mut s, 0.016);
        assert!(s.extra_balls.is_empty());
        assert_eq!((s.score_left, s.score_right), (0, 0));
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_wall_hit_feedback() {
        let mut s = playing();
        s.ball.pos = Vec2::new(400.0, 28.0);
        s.ball.vel = Vec2::new(2.0, -3.0);
        tick(&mut s, 0.016);
        assert!(s.ball.vel.y > 0.0);
        assert!(s.events.contains(&GameEvent::Sound(SoundEffect::WallHit)));
        assert_eq!(s.particles.len(), 5);
    }

    #[test]
    fn test_paddle_hit_shakes() {
        let mut s = playing();
        s.two_player = true;
        s.ball.pos = Vec2::new(748.0, 300.0);
        s.ball.vel = Vec2::new(6.0, 0.0);
        tick(&mut s, 0.016);
        assert_eq!(s.ball.last_hit_by, Some(Side::Right));
        assert_eq!(s.shake.magnitude, SHAKE_PADDLE_HIT);
        assert!(s.events.contains(&GameEvent::Sound(SoundEffect::PaddleHit)));
    }

    #[test]
    fn test_shake_disabled() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut s = GameState::new(5, &settings, MatchHistory::default());
        s.shake.kick(8.0);
        tick(&mut s, 0.016);
        assert_eq!(s.shake.offset, Vec2::ZERO);
    }

    #[test]
    fn test_power_up_pickup_in_play() {
        let mut s = playing();
        s.ball.pos = Vec2::new(400.0, 300.0);
        s.ball.vel = Vec2::new(1.0, 0.0);
        s.ball.last_hit_by = Some(Side::Left);
        s.power_up = Some(PowerUpPickup {
            pos: Vec2::new(402.0, 300.0),
            kind: PowerUpKind::Big,
        });
        tick(&mut s, 0.016);
        assert!(s.power_up.is_none());
        assert_eq!(s.effective_height(Side::Left), 120.0);
    }

    #[test]
    fn test_game_over_confetti() {
        let mut s = GameState::new(5, &Settings::default(), MatchHistory::default());
        s.phase = GamePhase::GameOver;
        for _ in 0..100 {
            tick(&mut s, 0.001);
        }
        assert!(!s.particles.is_empty());
    }
}
