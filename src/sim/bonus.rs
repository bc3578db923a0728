//! Gold bonus and power-up pickups
//!
//! Both spawn on timers in the middle of the court and are collected by the
//! primary ball only.

use glam::Vec2;
use rand::Rng;

use super::collision::circle_contact;
use super::flow;
use super::state::{ActiveEffect, Ball, GameState, GoldBonus, PowerUpKind, PowerUpPickup, Side};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::palette;

/// Count down, spawn and check the gold bonus
pub fn update_gold(state: &mut GameState, dt: f32) {
    state.gold_timer -= dt;
    if state.gold_timer <= 0.0 && state.gold.is_none() {
        spawn_gold(state);
    }
    check_gold(state);
}

/// Place a gold bonus in the central half of the court
pub fn spawn_gold(state: &mut GameState) {
    let pos = Vec2::new(
        FIELD_WIDTH * 0.25 + state.rng.random::<f32>() * FIELD_WIDTH * 0.5,
        60.0 + state.rng.random::<f32>() * (FIELD_HEIGHT - 120.0),
    );
    log::debug!("Gold bonus at ({:.0}, {:.0})", pos.x, pos.y);
    state.gold = Some(GoldBonus { pos });
    state.gold_timer = GOLD_SPAWN_DELAY;
}

/// Award the gold bonus to whoever last touched the ball
///
/// A ball nobody has hit yet passes straight through and the bonus stays.
pub fn check_gold(state: &mut GameState) {
    let Some(gold) = state.gold else { return };
    if !circle_contact(state.ball.pos, gold.pos, GOLD_PICKUP_RADIUS) {
        return;
    }
    let Some(side) = state.ball.last_hit_by else {
        return;
    };

    state.add_score(side, GOLD_BONUS_POINTS);
    state.sound(SoundEffect::GoldPickup);
    state.burst(gold.pos, palette::GOLD, 25, 180.0, 0.6, 4.0);
    state.gold = None;
    state.gold_timer = GOLD_SPAWN_DELAY;
    log::debug!("{:?} collected the gold bonus", side);

    if state.match_winner().is_some() {
        flow::on_goal(state, side);
    }
}

/// Count down, spawn and check the power-up
pub fn update_power_up(state: &mut GameState, dt: f32) {
    state.power_up_timer -= dt;
    if state.power_up_timer <= 0.0 && state.power_up.is_none() {
        spawn_power_up(state);
    }
    check_power_up(state);
}

/// Place a random power-up near the net
pub fn spawn_power_up(state: &mut GameState) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let pos = Vec2::new(
        FIELD_WIDTH * 0.3 + state.rng.random::<f32>() * FIELD_WIDTH * 0.4,
        80.0 + state.rng.random::<f32>() * (FIELD_HEIGHT - 160.0),
    );
    log::debug!("Power-up {} at ({:.0}, {:.0})", kind.label(), pos.x, pos.y);
    state.power_up = Some(PowerUpPickup { pos, kind });
    state.power_up_timer = POWERUP_SPAWN_DELAY;
}

/// Collect the power-up on contact
///
/// The last toucher owns it; an untouched ball hands it to the right side.
pub fn check_power_up(state: &mut GameState) {
    let Some(pickup) = state.power_up else { return };
    if !circle_contact(state.ball.pos, pickup.pos, POWERUP_PICKUP_RADIUS) {
        return;
    }

    let owner = state.ball.last_hit_by.unwrap_or(Side::Right);
    state.sound(SoundEffect::PowerUp);
    state.burst(pickup.pos, pickup.kind.color(), 20, 150.0, 0.5, 3.0);
    apply_power_up(state, pickup.kind, owner);

    state.power_up = None;
    state.power_up_timer = POWERUP_SPAWN_DELAY;
}

/// Put a collected power-up into force
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind, owner: Side) {
    log::debug!("{:?} activated {}", owner, kind.description());
    match kind {
        PowerUpKind::Multi => {
            for _ in 0..MULTI_BALL_COUNT {
                let extra = multi_ball(&state.ball, &mut state.rng);
                state.extra_balls.push(extra);
            }
        }
        _ => state.effects.push(ActiveEffect {
            kind,
            owner,
            target: owner.opposite(),
            expires_at: state.time + kind.duration(),
            label: kind.description(),
            color: kind.color(),
        }),
    }
}

/// Extra ball split off the primary one
///
/// Heads the same way horizontally at up to ±0.3π, with 80-120% of the
/// primary's speed.
fn multi_ball(primary: &Ball, rng: &mut impl Rng) -> Ball {
    let angle = (rng.random::<f32>() - 0.5) * 2.0 * MAX_BOUNCE_ANGLE;
    let dir = if primary.vel.x > 0.0 { 1.0 } else { -1.0 };
    let speed = primary.vel.length();
    let scale = 0.8 + rng.random::<f32>() * 0.4;
    let vel = Vec2::new(angle.cos() * dir, angle.sin()) * speed * scale;
    Ball::loose(primary.pos, vel, primary.last_hit_by)
}

/// Drop effects whose time is up
pub fn purge_expired(state: &mut GameState) {
    let now = state.time;
    state.effects.retain(|e| e.is_active(now));
}
