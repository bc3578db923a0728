//! Space Tennis - a Pong/tennis hybrid arcade game
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, AI, power-ups, game flow)
//! - `game`: Frame driver wiring the simulation to audio, storage and drawing
//! - `scene`: Per-phase draw lists for the drawing back end
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound effect sink (Web Audio on wasm32)
//! - `persistence`: Key-value storage for streak, history and settings
//! - `platform`: Browser host glue (mounting, input, frame loop)

pub mod audio;
pub mod game;
pub mod history;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use history::{MatchHistory, MatchResult};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Logical playfield (the canvas is always this size)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Top/bottom wall inset
    pub const FIELD_MARGIN: f32 = 20.0;

    /// Longest frame step accepted (avoids spiral of death after tab stalls)
    pub const MAX_DT: f32 = 0.05;
    /// Ball velocities are expressed per 1/60 s
    pub const FRAME_RATE: f32 = 60.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 12.0;
    pub const PADDLE_HEIGHT: f32 = 80.0;
    /// Distance from the side edge to the paddle
    pub const PADDLE_INSET: f32 = 30.0;
    /// Human paddle speed (pixels/s)
    pub const PLAYER_PADDLE_SPEED: f32 = 420.0;
    /// Per-tick velocity damping when no key is held
    pub const PADDLE_FRICTION: f32 = 0.85;
    pub const BIG_PADDLE_SCALE: f32 = 1.5;
    pub const SMALL_PADDLE_SCALE: f32 = 0.6;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 7.0;
    pub const BALL_SERVE_SPEED: f32 = 5.5;
    pub const BALL_MAX_SPEED: f32 = 14.0;
    /// Speed gain on every paddle return (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.05;
    /// Steepest return angle off the horizontal
    pub const MAX_BOUNCE_ANGLE: f32 = 0.3 * PI;
    /// Share of paddle velocity transferred to the ball on a return
    pub const PADDLE_SPIN: f32 = 0.15;
    /// Serve angle spread around the horizontal
    pub const SERVE_ANGLE_SPREAD: f32 = 0.4;
    pub const FAST_BALL_SCALE: f32 = 1.5;
    pub const SLOW_BALL_SCALE: f32 = 0.6;

    /// Match rules
    pub const WIN_SCORE: u32 = 11;
    pub const COUNTDOWN_SECS: f32 = 3.0;
    pub const GOAL_PAUSE_SECS: f32 = 1.2;
    pub const MATCH_POINT_PAUSE_SECS: f32 = 2.0;
    pub const SERVE_DELAY_SECS: f32 = 0.5;

    /// Bonus spawns
    pub const GOLD_SPAWN_DELAY: f32 = 8.0;
    pub const POWERUP_SPAWN_DELAY: f32 = 15.0;
    pub const GOLD_BONUS_POINTS: u32 = 3;
    pub const GOLD_PICKUP_RADIUS: f32 = BALL_RADIUS + 10.0;
    pub const POWERUP_PICKUP_RADIUS: f32 = BALL_RADIUS + 12.0;
    /// Extra balls spawned by MULTI
    pub const MULTI_BALL_COUNT: usize = 2;

    /// AI opponent
    pub const AI_GAIN: f32 = 5.0;
    pub const AI_DEADBAND: f32 = 5.0;
    pub const AI_DAMPING: f32 = 0.9;

    /// Camera shake
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_DEAD_ZONE: f32 = 0.5;
    pub const SHAKE_PADDLE_HIT: f32 = 3.0;
    pub const SHAKE_GOAL: f32 = 8.0;

    /// Particle drag per tick
    pub const PARTICLE_DRAG: f32 = 0.98;
}

/// Named colours (RGBA, 0-1)
pub mod palette {
    pub type Color = [f32; 4];

    /// Convert a 0xRRGGBB literal to an opaque colour
    pub const fn rgb(hex: u32) -> Color {
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    /// Same colour with a different alpha
    pub const fn with_alpha(c: Color, a: f32) -> Color {
        [c[0], c[1], c[2], a]
    }

    pub const CPU_RED: Color = rgb(0xff0044);
    pub const CPU_PINK: Color = rgb(0xff66aa);
    pub const SCORE_PINK: Color = rgb(0xff4488);
    pub const CYAN: Color = rgb(0x00ffff);
    pub const CYAN_LIGHT: Color = rgb(0x66ffff);
    pub const GOLD: Color = rgb(0xffd700);
    pub const TENNIS_BALL: Color = rgb(0xccff00);
    pub const EXTRA_BALL: Color = rgb(0xff88ff);
    pub const WHITE: Color = rgb(0xffffff);
    pub const BACKGROUND: Color = rgb(0x050015);
    pub const EASY_GREEN: Color = rgb(0x00ff88);
    pub const MEDIUM_ORANGE: Color = rgb(0xffaa00);
    pub const HARD_RED: Color = rgb(0xff2244);
    pub const SLOW_PURPLE: Color = rgb(0x8844ff);
    pub const MULTI_MAGENTA: Color = rgb(0xff00ff);

    /// Confetti colours for the game-over screen
    pub const CONFETTI: [Color; 5] = [CPU_RED, CYAN, GOLD, CPU_PINK, CYAN_LIGHT];
}

/// Mirror a coordinate back into `[0, extent]` as if it bounced off both ends.
///
/// Equivalent to reflecting repeatedly across the boundaries, but runs in
/// constant time for far-out projections.
#[inline]
pub fn unwrap_into_range(value: f32, extent: f32) -> f32 {
    if !value.is_finite() || extent <= 0.0 {
        return extent / 2.0;
    }
    let period = 2.0 * extent;
    let folded = value.rem_euclid(period);
    if folded > extent { period - folded } else { folded }
}
