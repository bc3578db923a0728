//! Game state and core simulation types
//!
//! Everything the engine mutates per frame lives in one `GameState`.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::HeldKeys;
use super::particles;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::history::{MatchHistory, MatchResult};
use crate::palette::{self, Color};
use crate::settings::Settings;

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Attract screen
    Title,
    /// 1 PLAYER / 2 PLAYERS
    ModeSelect,
    /// AI tier picker (single player only)
    Difficulty,
    /// 3-2-1 before the first serve
    Countdown,
    /// Active rally
    Playing,
    /// Short pause after a point
    Goal,
    /// Match finished, waiting for confirm
    GameOver,
    /// Rally frozen by the player
    Paused,
}

impl GamePhase {
    /// Name reported to the host page
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Title => "title",
            GamePhase::ModeSelect => "mode_select",
            GamePhase::Difficulty => "difficulty",
            GamePhase::Countdown => "countdown",
            GamePhase::Playing => "playing",
            GamePhase::Goal => "goal",
            GamePhase::GameOver => "game_over",
            GamePhase::Paused => "paused",
        }
    }
}

/// Which end of the court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Horizontal direction of a ball returned by this side's paddle
    pub fn outward(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Selected play mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    VsCpu,
    TwoPlayer,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::VsCpu => Mode::TwoPlayer,
            Mode::TwoPlayer => Mode::VsCpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::VsCpu => "1 PLAYER",
            Mode::TwoPlayer => "2 PLAYERS",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Mode::VsCpu => "VS CPU",
            Mode::TwoPlayer => "LOCAL VERSUS",
        }
    }
}

/// AI opponent tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Difficulty::Easy => "Slow AI - Good for learning",
            Difficulty::Medium => "Balanced AI - A fair match",
            Difficulty::Hard => "Fast AI - True arcade challenge",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Difficulty::Easy => palette::EASY_GREEN,
            Difficulty::Medium => palette::MEDIUM_ORANGE,
            Difficulty::Hard => palette::HARD_RED,
        }
    }

    /// Paddle top speed in ball frame units
    pub fn top_speed(self) -> f32 {
        match self {
            Difficulty::Easy => 3.5,
            Difficulty::Medium => 5.5,
            Difficulty::Hard => 8.0,
        }
    }

    /// Aim wobble amplitude (pixels)
    pub fn jitter(self) -> f32 {
        match self {
            Difficulty::Easy => 40.0,
            Difficulty::Medium => 20.0,
            Difficulty::Hard => 8.0,
        }
    }

    /// Whether the AI projects the ball's path instead of chasing it
    pub fn predicts(self) -> bool {
        self != Difficulty::Easy
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

/// A racket
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub side: Side,
    /// Left edge (fixed)
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Vertical velocity (pixels/s)
    pub vy: f32,
    pub name: &'static str,
    pub accent: Color,
    pub highlight: Color,
}

impl Paddle {
    pub fn new(side: Side) -> Self {
        let (x, name, accent, highlight) = match side {
            Side::Left => (PADDLE_INSET, "CPU", palette::CPU_RED, palette::CPU_PINK),
            Side::Right => (
                FIELD_WIDTH - PADDLE_INSET - PADDLE_WIDTH,
                "P1",
                palette::CYAN,
                palette::CYAN_LIGHT,
            ),
        };
        Self {
            side,
            x,
            y: FIELD_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
            vy: 0.0,
            name,
            accent,
            highlight,
        }
    }

    /// Back to the vertical centre, at rest
    pub fn recentre(&mut self) {
        self.y = FIELD_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0;
        self.vy = 0.0;
    }

    /// Collision snapshot at the given effective height
    pub fn body(&self, height: f32) -> PaddleBody {
        PaddleBody {
            x: self.x,
            y: self.y,
            height,
            vy: self.vy,
        }
    }
}

/// Plain-data view of a paddle for the collision routines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleBody {
    pub x: f32,
    pub y: f32,
    pub height: f32,
    pub vy: f32,
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in frame units (pixels per 1/60 s)
    pub vel: Vec2,
    /// Nominal speed
    pub speed: f32,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
    pub last_hit_by: Option<Side>,
    /// Waiting for the serve
    pub frozen: bool,
}

impl Ball {
    /// Fresh serve from the centre: angle within ±0.4 rad, random direction, frozen
    pub fn serve(rng: &mut Pcg32) -> Self {
        use rand::Rng;

        let angle = rng.random::<f32>() * 2.0 * SERVE_ANGLE_SPREAD - SERVE_ANGLE_SPREAD;
        let dir = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            vel: Vec2::new(
                angle.cos() * BALL_SERVE_SPEED * dir,
                angle.sin() * BALL_SERVE_SPEED,
            ),
            speed: BALL_SERVE_SPEED,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            last_hit_by: None,
            frozen: true,
        }
    }

    /// Ball in flight with no history, used for MULTI spawns
    pub fn loose(pos: Vec2, vel: Vec2, last_hit_by: Option<Side>) -> Self {
        Self {
            pos,
            vel,
            speed: vel.length(),
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            last_hit_by,
            frozen: false,
        }
    }

    /// Record current position to the trail, evicting the oldest
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

/// Gold bonus pickup (+3 to the last toucher)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldBonus {
    pub pos: Vec2,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Collector's racket grows
    Big,
    /// Opponent's racket shrinks
    Small,
    /// All balls speed up
    Fast,
    /// All balls slow down
    Slow,
    /// Two extra balls
    Multi,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Big,
        PowerUpKind::Small,
        PowerUpKind::Fast,
        PowerUpKind::Slow,
        PowerUpKind::Multi,
    ];

    /// Three-letter pickup label
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Big => "BIG",
            PowerUpKind::Small => "SML",
            PowerUpKind::Fast => "FST",
            PowerUpKind::Slow => "SLO",
            PowerUpKind::Multi => "MUL",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerUpKind::Big => "RACKET GROW",
            PowerUpKind::Small => "FOE SHRINK",
            PowerUpKind::Fast => "SPEED BALL",
            PowerUpKind::Slow => "SLOW BALL",
            PowerUpKind::Multi => "MULTI BALL",
        }
    }

    pub fn color(self) -> Color {
        match self {
            PowerUpKind::Big => palette::EASY_GREEN,
            PowerUpKind::Small => palette::SCORE_PINK,
            PowerUpKind::Fast => palette::MEDIUM_ORANGE,
            PowerUpKind::Slow => palette::SLOW_PURPLE,
            PowerUpKind::Multi => palette::MULTI_MAGENTA,
        }
    }

    /// Effect lifetime in seconds (MULTI is instantaneous)
    pub fn duration(self) -> f64 {
        match self {
            PowerUpKind::Big | PowerUpKind::Small => 8.0,
            PowerUpKind::Fast | PowerUpKind::Slow => 6.0,
            PowerUpKind::Multi => 0.0,
        }
    }
}

/// Power-up waiting on the court
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpPickup {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

/// A collected power-up still in force
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub owner: Side,
    pub target: Side,
    /// Expiry on the simulation clock (seconds)
    pub expires_at: f64,
    pub label: &'static str,
    pub color: Color,
}

impl ActiveEffect {
    pub fn is_active(&self, now: f64) -> bool {
        now < self.expires_at
    }

    pub fn remaining(&self, now: f64) -> f64 {
        (self.expires_at - now).max(0.0)
    }
}

/// Short-lived spark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub color: Color,
    pub size: f32,
}

/// Background star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    /// Downward scroll (pixels/s)
    pub speed: f32,
    pub brightness: f32,
}

/// Decaying screen shake
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    pub magnitude: f32,
    pub offset: Vec2,
}

/// Side effects produced by the simulation, drained by the driver
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    PhaseChanged(GamePhase),
    MatchFinished(MatchResult),
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    /// Simulation clock (seconds), advances in every phase
    pub time: f64,
    pub phase: GamePhase,

    // === Match ===
    pub two_player: bool,
    pub difficulty: Difficulty,
    pub mode_cursor: Mode,
    pub difficulty_cursor: Difficulty,
    pub score_left: u32,
    pub score_right: u32,
    pub last_scorer: Option<Side>,
    pub countdown_timer: f32,
    pub goal_timer: f32,
    /// Set on entering Goal when the match was won
    pub match_over: bool,
    /// Time left before a frozen ball is relaunched
    pub serve_delay: Option<f32>,

    // === Entities ===
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    pub extra_balls: Vec<Ball>,
    pub gold: Option<GoldBonus>,
    pub gold_timer: f32,
    pub power_up: Option<PowerUpPickup>,
    pub power_up_timer: f32,
    pub effects: Vec<ActiveEffect>,

    // === Visuals ===
    pub particles: Vec<Particle>,
    pub particle_cap: usize,
    pub stars: Vec<Star>,
    pub shake: CameraShake,
    pub shake_enabled: bool,
    pub trails_enabled: bool,

    pub keys: HeldKeys,
    pub history: MatchHistory,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New engine state on the title screen
    pub fn new(seed: u64, settings: &Settings, history: MatchHistory) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::serve(&mut rng);
        let stars = particles::spawn_stars(&mut rng, settings.quality.star_count());

        Self {
            rng,
            time: 0.0,
            phase: GamePhase::Title,
            two_player: false,
            difficulty: Difficulty::Medium,
            mode_cursor: Mode::VsCpu,
            difficulty_cursor: Difficulty::Medium,
            score_left: 0,
            score_right: 0,
            last_scorer: None,
            countdown_timer: 0.0,
            goal_timer: 0.0,
            match_over: false,
            serve_delay: None,
            left: Paddle::new(Side::Left),
            right: Paddle::new(Side::Right),
            ball,
            extra_balls: Vec::new(),
            gold: None,
            gold_timer: GOLD_SPAWN_DELAY,
            power_up: None,
            power_up_timer: POWERUP_SPAWN_DELAY,
            effects: Vec::new(),
            particles: Vec::new(),
            particle_cap: settings.max_particles(),
            stars,
            shake: CameraShake::default(),
            shake_enabled: settings.effective_screen_shake(),
            trails_enabled: settings.trails,
            keys: HeldKeys::default(),
            history,
            events: Vec::new(),
        }
    }

    /// Re-read visual preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.particle_cap = settings.max_particles();
        self.shake_enabled = settings.effective_screen_shake();
        self.trails_enabled = settings.trails;
        let star_count = settings.quality.star_count();
        if self.stars.len() != star_count {
            self.stars = particles::spawn_stars(&mut self.rng, star_count);
        }
        if !self.shake_enabled {
            self.shake = CameraShake::default();
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.score_left,
            Side::Right => self.score_right,
        }
    }

    pub fn add_score(&mut self, side: Side, points: u32) {
        match side {
            Side::Left => self.score_left += points,
            Side::Right => self.score_right += points,
        }
    }

    /// Side that has reached the winning score, if any
    pub fn match_winner(&self) -> Option<Side> {
        if self.score_left >= WIN_SCORE {
            Some(Side::Left)
        } else if self.score_right >= WIN_SCORE {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Paddle height after size effects (last matching effect wins)
    pub fn effective_height(&self, side: Side) -> f32 {
        let mut height = PADDLE_HEIGHT;
        for effect in &self.effects {
            match effect.kind {
                PowerUpKind::Big if effect.owner == side => {
                    height = PADDLE_HEIGHT * BIG_PADDLE_SCALE;
                }
                PowerUpKind::Small if effect.target == side => {
                    height = PADDLE_HEIGHT * SMALL_PADDLE_SCALE;
                }
                _ => {}
            }
        }
        height
    }

    /// Ball speed scale from FAST/SLOW (last matching effect wins)
    pub fn speed_multiplier(&self) -> f32 {
        let mut mult = 1.0;
        for effect in &self.effects {
            match effect.kind {
                PowerUpKind::Fast => mult = FAST_BALL_SCALE,
                PowerUpKind::Slow => mult = SLOW_BALL_SCALE,
                _ => {}
            }
        }
        mult
    }

    pub fn paddle_body(&self, side: Side) -> PaddleBody {
        self.paddle(side).body(self.effective_height(side))
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Particle burst at `origin`
    pub fn burst(&mut self, origin: Vec2, color: Color, count: usize, speed: f32, life: f32, size: f32) {
        particles::emit(
            &mut self.particles,
            &mut self.rng,
            self.particle_cap,
            origin,
            color,
            count,
            speed,
            life,
            size,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, &Settings::default(), MatchHistory::default())
    }

    fn effect(kind: PowerUpKind, owner: Side) -> ActiveEffect {
        ActiveEffect {
            kind,
            owner,
            target: owner.opposite(),
            expires_at: 8.0,
            label: kind.description(),
            color: kind.color(),
        }
    }

    #[test]
    fn test_initial_layout() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Title);
        assert_eq!(s.left.x, 30.0);
        assert_eq!(s.right.x, 758.0);
        assert_eq!(s.left.y, 260.0);
        assert_eq!(s.stars.len(), 120);
        assert!(s.ball.frozen);
    }

    #[test]
    fn test_serve_within_spread() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let ball = Ball::serve(&mut rng);
            assert!((ball.vel.length() - BALL_SERVE_SPEED).abs() < 1e-4);
            let angle = (ball.vel.y / ball.vel.length()).asin();
            assert!(angle.abs() <= SERVE_ANGLE_SPREAD + 1e-4);
        }
    }

    #[test]
    fn test_trail_bounded() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = Ball::serve(&mut rng);
        for i in 0..30 {
            ball.pos.x = i as f32;
            ball.record_trail();
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        assert_eq!(ball.trail.front().map(|p| p.x), Some(10.0));
        assert_eq!(ball.trail.back().map(|p| p.x), Some(29.0));
    }

    #[test]
    fn test_effective_height_last_wins() {
        let mut s = state();
        assert_eq!(s.effective_height(Side::Right), 80.0);

        s.effects.push(effect(PowerUpKind::Big, Side::Right));
        assert_eq!(s.effective_height(Side::Right), 120.0);
        assert_eq!(s.effective_height(Side::Left), 80.0);

        // Left shrinks the right paddle afterwards
        s.effects.push(effect(PowerUpKind::Small, Side::Left));
        assert_eq!(s.effective_height(Side::Right), 48.0);
    }

    #[test]
    fn test_speed_multiplier_last_wins() {
        let mut s = state();
        assert_eq!(s.speed_multiplier(), 1.0);
        s.effects.push(effect(PowerUpKind::Slow, Side::Left));
        s.effects.push(effect(PowerUpKind::Fast, Side::Right));
        assert_eq!(s.speed_multiplier(), 1.5);
    }

    #[test]
    fn test_effect_expiry_boundary() {
        let e = effect(PowerUpKind::Big, Side::Left);
        assert!(e.is_active(7.99));
        assert!(!e.is_active(8.0));
        assert_eq!(e.remaining(9.0), 0.0);
    }

    #[test]
    fn test_difficulty_wraps() {
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.prev(), Difficulty::Hard);
        assert!(!Difficulty::Easy.predicts());
        assert!(Difficulty::Medium.predicts() && Difficulty::Hard.predicts());
    }

    #[test]
    fn test_match_winner() {
        let mut s = state();
        s.score_left = 10;
        assert_eq!(s.match_winner(), None);
        s.add_score(Side::Right, 11);
        assert_eq!(s.match_winner(), Some(Side::Right));
    }
}
