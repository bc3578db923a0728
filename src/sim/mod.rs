//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform code:
//! - Variable timestep, capped at `MAX_DT`
//! - Seeded RNG only
//! - Side effects leave as `GameEvent`s for the driver to dispatch

pub mod ai;
pub mod bonus;
pub mod collision;
pub mod flow;
pub mod input;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use input::{HeldKeys, Key};
pub use state::{
    ActiveEffect, Ball, CameraShake, Difficulty, GameEvent, GamePhase, GameState, GoldBonus, Mode,
    Paddle, PaddleBody, Particle, PowerUpKind, PowerUpPickup, Side, Star, TRAIL_LENGTH,
};
pub use tick::tick;
