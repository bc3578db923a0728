//! Particles, background stars and camera shake
//!
//! Purely cosmetic, but driven by the simulation RNG and clock like
//! everything else.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{CameraShake, Particle, Star};
use crate::consts::*;
use crate::palette::{self, Color};

/// Radial burst of `count` sparks
///
/// Each spark gets a random heading, 30-100% of `speed`, and 50-100% of
/// `life` and `size`. Sparks beyond `cap` are dropped.
#[allow(clippy::too_many_arguments)]
pub fn emit(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    cap: usize,
    origin: Vec2,
    color: Color,
    count: usize,
    speed: f32,
    life: f32,
    size: f32,
) {
    let room = cap.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let angle = rng.random::<f32>() * TAU;
        let spd = speed * (0.3 + rng.random::<f32>() * 0.7);
        particles.push(Particle {
            pos: origin,
            vel: Vec2::from_angle(angle) * spd,
            life: life * (0.5 + rng.random::<f32>() * 0.5),
            max_life: life,
            color,
            size: size * (0.5 + rng.random::<f32>() * 0.5),
        });
    }
}

/// Move, age and drag sparks; drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.life -= dt;
        p.vel *= PARTICLE_DRAG;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Game-over confetti: sometimes one slow spark near the top
pub fn confetti(particles: &mut Vec<Particle>, rng: &mut Pcg32, cap: usize) {
    if rng.random::<f32>() >= 0.3 {
        return;
    }
    let origin = Vec2::new(
        rng.random::<f32>() * FIELD_WIDTH,
        rng.random::<f32>() * 100.0,
    );
    let color = palette::CONFETTI[rng.random_range(0..palette::CONFETTI.len())];
    emit(particles, rng, cap, origin, color, 1, 50.0, 1.5, 3.0);
}

/// Starfield scattered over the whole field
pub fn spawn_stars(rng: &mut Pcg32, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            pos: Vec2::new(
                rng.random::<f32>() * FIELD_WIDTH,
                rng.random::<f32>() * FIELD_HEIGHT,
            ),
            size: rng.random::<f32>() * 1.8 + 0.3,
            speed: rng.random::<f32>() * 15.0 + 5.0,
            brightness: rng.random::<f32>() * 0.5 + 0.2,
        })
        .collect()
}

/// Scroll stars down, wrap at the bottom, twinkle
pub fn update_stars(stars: &mut [Star], rng: &mut Pcg32, dt: f32) {
    for star in stars.iter_mut() {
        star.pos.y += star.speed * dt;
        if star.pos.y > FIELD_HEIGHT {
            star.pos.y = 0.0;
            star.pos.x = rng.random::<f32>() * FIELD_WIDTH;
        }
        star.brightness += (rng.random::<f32>() - 0.5) * 0.1;
        star.brightness = star.brightness.clamp(0.1, 0.7);
    }
}

impl CameraShake {
    /// Start a shake (replaces the current magnitude)
    pub fn kick(&mut self, magnitude: f32) {
        self.magnitude = magnitude;
    }

    /// Jitter and decay; snaps to rest once small
    pub fn update(&mut self, rng: &mut Pcg32) {
        if self.magnitude > SHAKE_DEAD_ZONE {
            let m = self.magnitude;
            self.offset = Vec2::new(
                (rng.random::<f32>() - 0.5) * m * 2.0,
                (rng.random::<f32>() - 0.5) * m * 2.0,
            );
            self.magnitude *= SHAKE_DECAY;
        } else {
            *self = CameraShake::default();
        }
    }
}
