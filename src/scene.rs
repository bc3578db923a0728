//! Per-phase draw lists
//!
//! `build_frame` turns the game state into a flat list of primitive draw
//! commands in logical 800×600 coordinates. The drawing back end only has to
//! know how to fill shapes and place text.

use glam::Vec2;

use crate::consts::*;
use crate::palette::{self, Color, with_alpha};
use crate::sim::{Ball, Difficulty, GamePhase, GameState, Mode, Paddle, Side};

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Filled axis-aligned rectangle (top-left + size)
    Rect { pos: Vec2, size: Vec2, color: Color },
    /// Rectangle outline
    StrokeRect {
        pos: Vec2,
        size: Vec2,
        width: f32,
        color: Color,
    },
    /// Filled disc
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Circle outline
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    /// Ellipse outline (racket frames)
    Ellipse {
        center: Vec2,
        radii: Vec2,
        width: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Text at a baseline position
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: Align,
    },
    /// Seven-segment number, top-left anchored
    Digits {
        pos: Vec2,
        value: u32,
        /// Number of digits, zero padded
        width: usize,
        scale: f32,
        color: Color,
    },
}

/// A complete frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Camera shake offset applied to every command
    pub offset: Vec2,
    pub clear: Color,
    pub cmds: Vec<DrawCmd>,
}

impl Frame {
    fn new(offset: Vec2) -> Self {
        Self {
            offset,
            clear: palette::BACKGROUND,
            cmds: Vec::with_capacity(256),
        }
    }

    fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.push(DrawCmd::Rect {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.push(DrawCmd::Text {
            pos: Vec2::new(x, y),
            text: text.into(),
            size,
            color,
            align: Align::Center,
        });
    }

    /// All text commands, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Consumer of finished frames
pub trait DrawSink {
    fn present(&mut self, frame: &Frame);
}

/// Sink that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DrawSink for NullSink {
    fn present(&mut self, _frame: &Frame) {}
}

/// Sink that keeps the last frame for inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub frames: usize,
    pub last: Option<Frame>,
}

impl DrawSink for RecordingSink {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        self.last = Some(frame.clone());
    }
}

const CENTER_X: f32 = FIELD_WIDTH / 2.0;
const CENTER_Y: f32 = FIELD_HEIGHT / 2.0;
const DIM: Color = with_alpha(palette::WHITE, 0.25);

/// Build the draw list for the current phase
pub fn build_frame(state: &GameState) -> Frame {
    let mut frame = Frame::new(state.shake.offset);
    let t = state.time as f32;

    draw_background(&mut frame, state);
    match state.phase {
        GamePhase::Title => draw_title(&mut frame, t),
        GamePhase::ModeSelect => {
            draw_court(&mut frame);
            draw_mode_select(&mut frame, state, t);
        }
        GamePhase::Difficulty => {
            draw_court(&mut frame);
            draw_difficulty(&mut frame, state, t);
        }
        GamePhase::Countdown => {
            draw_court(&mut frame);
            draw_paddles(&mut frame, state);
            draw_hud(&mut frame, state);
            draw_countdown(&mut frame, state);
        }
        GamePhase::Playing => {
            draw_court(&mut frame);
            draw_paddles(&mut frame, state);
            draw_balls(&mut frame, state);
            draw_pickups(&mut frame, state, t);
            draw_active_effects(&mut frame, state);
            draw_hud(&mut frame, state);
            draw_particles(&mut frame, state);
        }
        GamePhase::Goal => {
            draw_court(&mut frame);
            draw_paddles(&mut frame, state);
            draw_hud(&mut frame, state);
            draw_goal_flash(&mut frame, state);
            draw_particles(&mut frame, state);
        }
        GamePhase::GameOver => {
            draw_court(&mut frame);
            draw_hud(&mut frame, state);
            draw_game_over(&mut frame, state, t);
            draw_particles(&mut frame, state);
        }
        GamePhase::Paused => {
            draw_court(&mut frame);
            draw_paddles(&mut frame, state);
            draw_balls(&mut frame, state);
            draw_pickups(&mut frame, state, t);
            draw_hud(&mut frame, state);
            draw_pause(&mut frame, state, t);
        }
    }
    frame
}

// === Backdrop ===

fn draw_background(frame: &mut Frame, state: &GameState) {
    for star in &state.stars {
        frame.rect(
            star.pos.x,
            star.pos.y,
            star.size,
            star.size,
            with_alpha(palette::WHITE, star.brightness),
        );
    }
}

/// Tennis court markings
fn draw_court(frame: &mut Frame) {
    let (w, h) = (FIELD_WIDTH, FIELD_HEIGHT);

    frame.rect(15.0, 15.0, w - 30.0, h - 30.0, [0.0, 60.0 / 255.0, 30.0 / 255.0, 0.12]);
    frame.push(DrawCmd::StrokeRect {
        pos: Vec2::new(15.0, 15.0),
        size: Vec2::new(w - 30.0, h - 30.0),
        width: 2.5,
        color: with_alpha(palette::WHITE, 0.35),
    });

    // Net with posts
    frame.line(Vec2::new(CENTER_X, 15.0), Vec2::new(CENTER_X, h - 15.0), 2.0, with_alpha(palette::WHITE, 0.5));
    let mut ny = 20.0;
    while ny < h - 20.0 {
        frame.line(
            Vec2::new(CENTER_X - 4.0, ny),
            Vec2::new(CENTER_X + 4.0, ny),
            0.5,
            with_alpha(palette::WHITE, 0.08),
        );
        ny += 12.0;
    }
    let post = with_alpha(palette::WHITE, 0.4);
    frame.rect(CENTER_X - 3.0, 12.0, 6.0, 6.0, post);
    frame.rect(CENTER_X - 3.0, h - 18.0, 6.0, 6.0, post);

    // Service lines
    let service = with_alpha(palette::WHITE, 0.2);
    for x in [w * 0.3, w * 0.7] {
        frame.line(Vec2::new(x, 15.0), Vec2::new(x, h - 15.0), 1.5, service);
    }
    frame.line(Vec2::new(w * 0.3, CENTER_Y), Vec2::new(w * 0.7, CENTER_Y), 1.5, service);

    // Baseline centre marks
    let mark = DIM;
    for x in [15.0, w - 15.0] {
        frame.line(Vec2::new(x, CENTER_Y - 8.0), Vec2::new(x, CENTER_Y + 8.0), 2.0, mark);
    }

    // Tramlines
    let tram = with_alpha(palette::WHITE, 0.1);
    for y in [45.0, h - 45.0] {
        frame.line(Vec2::new(15.0, y), Vec2::new(w - 15.0, y), 1.0, tram);
    }
}

// === Entities ===

fn draw_paddles(frame: &mut Frame, state: &GameState) {
    for side in [Side::Left, Side::Right] {
        draw_paddle(frame, state.paddle(side), state.effective_height(side));
    }
}

/// Oval racket head with strings
fn draw_paddle(frame: &mut Frame, paddle: &Paddle, height: f32) {
    let center = Vec2::new(paddle.x + PADDLE_WIDTH / 2.0, paddle.y + height / 2.0);
    let radii = Vec2::new(PADDLE_WIDTH * 0.9, height / 2.0);

    frame.push(DrawCmd::Ellipse {
        center,
        radii: radii + Vec2::splat(3.0),
        width: 4.0,
        color: with_alpha(paddle.accent, 0.25),
    });
    frame.push(DrawCmd::Ellipse {
        center,
        radii,
        width: 3.0,
        color: paddle.highlight,
    });

    let strings = with_alpha(paddle.accent, 0.2);
    for i in 1..5 {
        let sy = paddle.y + height / 5.0 * i as f32;
        let rel = (sy - center.y) / radii.y;
        if rel.abs() >= 1.0 {
            continue;
        }
        let extent = radii.x * (1.0 - rel * rel).sqrt();
        frame.line(
            Vec2::new(center.x - extent, sy),
            Vec2::new(center.x + extent, sy),
            0.8,
            strings,
        );
    }
    for i in 1..3 {
        let sx = paddle.x + PADDLE_WIDTH / 3.0 * i as f32;
        let rel = (sx - center.x) / radii.x;
        if rel.abs() >= 1.0 {
            continue;
        }
        let extent = radii.y * (1.0 - rel * rel).sqrt();
        frame.line(
            Vec2::new(sx, center.y - extent),
            Vec2::new(sx, center.y + extent),
            0.8,
            strings,
        );
    }

    frame.push(DrawCmd::Circle {
        center,
        radius: 2.0,
        color: with_alpha(paddle.accent, 0.4),
    });
}

fn draw_balls(frame: &mut Frame, state: &GameState) {
    if state.trails_enabled {
        draw_trail(frame, &state.ball, palette::TENNIS_BALL);
        for extra in &state.extra_balls {
            draw_trail(frame, extra, with_alpha(palette::TENNIS_BALL, 0.7));
        }
    }
    draw_ball(frame, &state.ball, palette::TENNIS_BALL);
    for extra in &state.extra_balls {
        draw_ball(frame, extra, palette::EXTRA_BALL);
    }
}

/// Fading dots, oldest smallest
fn draw_trail(frame: &mut Frame, ball: &Ball, color: Color) {
    let n = ball.trail.len() as f32;
    for (i, p) in ball.trail.iter().enumerate() {
        let k = i as f32 / n;
        frame.push(DrawCmd::Circle {
            center: *p,
            radius: BALL_RADIUS * k * 0.7,
            color: with_alpha(color, color[3] * k * 0.3),
        });
    }
}

fn draw_ball(frame: &mut Frame, ball: &Ball, color: Color) {
    frame.push(DrawCmd::Circle {
        center: ball.pos,
        radius: BALL_RADIUS + 3.0,
        color: with_alpha(color, 0.2),
    });
    frame.push(DrawCmd::Circle {
        center: ball.pos,
        radius: BALL_RADIUS,
        color,
    });
    frame.push(DrawCmd::Circle {
        center: ball.pos - Vec2::splat(2.0),
        radius: BALL_RADIUS * 0.3,
        color: with_alpha(palette::WHITE, 0.35),
    });
}

fn draw_pickups(frame: &mut Frame, state: &GameState, t: f32) {
    if let Some(gold) = state.gold {
        let pulse = (t * 5.0).sin() * 0.3 + 0.7;
        let size = 8.0 + (t * 3.3).sin() * 2.0;
        frame.push(DrawCmd::Ring {
            center: gold.pos,
            radius: size + 6.0,
            width: 1.5,
            color: with_alpha(palette::GOLD, pulse * 0.5),
        });
        frame.push(DrawCmd::Circle {
            center: gold.pos,
            radius: size,
            color: with_alpha(palette::GOLD, pulse),
        });
        frame.text("+3", gold.pos.x, gold.pos.y - size - 8.0, 10.0, palette::GOLD);
    }

    if let Some(pickup) = state.power_up {
        let color = pickup.kind.color();
        let pulse = (t * 4.0).sin() * 0.3 + 0.7;
        let size = 10.0 + (t * 2.9).sin() * 2.0;
        frame.push(DrawCmd::Ring {
            center: pickup.pos,
            radius: size + 8.0,
            width: 2.0,
            color: with_alpha(color, pulse * 0.4),
        });
        frame.push(DrawCmd::Circle {
            center: pickup.pos,
            radius: size * 0.7,
            color: with_alpha(color, pulse),
        });
        frame.text(
            pickup.kind.label(),
            pickup.pos.x,
            pickup.pos.y + size + 16.0,
            8.0,
            palette::WHITE,
        );
    }
}

/// Effect labels with seconds left, stacked upward per owner
fn draw_active_effects(frame: &mut Frame, state: &GameState) {
    let mut y_off = 0.0;
    for effect in &state.effects {
        let x = match effect.owner {
            Side::Left => 50.0,
            Side::Right => FIELD_WIDTH - 180.0,
        };
        frame.push(DrawCmd::Text {
            pos: Vec2::new(x, FIELD_HEIGHT - 35.0 + y_off),
            text: format!("{} {:.1}s", effect.label, effect.remaining(state.time)),
            size: 9.0,
            color: with_alpha(effect.color, 0.8),
            align: Align::Left,
        });
        y_off -= 14.0;
    }
}

fn draw_particles(frame: &mut Frame, state: &GameState) {
    for p in &state.particles {
        let alpha = (p.life / p.max_life).max(0.0);
        let s = p.size * (0.5 + 0.5 * alpha);
        frame.rect(p.pos.x - s / 2.0, p.pos.y - s / 2.0, s, s, with_alpha(p.color, alpha));
    }
}

// === HUD ===

fn draw_hud(frame: &mut Frame, state: &GameState) {
    frame.push(DrawCmd::Digits {
        pos: Vec2::new(CENTER_X - 120.0, 35.0),
        value: state.score_left.min(99),
        width: 2,
        scale: 1.4,
        color: palette::SCORE_PINK,
    });
    frame.push(DrawCmd::Digits {
        pos: Vec2::new(CENTER_X + 50.0, 35.0),
        value: state.score_right.min(99),
        width: 2,
        scale: 1.4,
        color: palette::CYAN,
    });

    frame.text(state.left.name, CENTER_X - 90.0, 28.0, 10.0, with_alpha(state.left.accent, 0.6));
    frame.text(state.right.name, CENTER_X + 82.0, 28.0, 10.0, with_alpha(state.right.accent, 0.6));
    frame.text(
        format!("FIRST TO {}", WIN_SCORE),
        CENTER_X,
        FIELD_HEIGHT - 8.0,
        8.0,
        with_alpha(palette::WHITE, 0.2),
    );
}

// === Screens ===

fn draw_title(frame: &mut Frame, t: f32) {
    let pulse = (t * 2.0).sin() * 0.15 + 0.85;
    frame.text("JEDAI", CENTER_X, CENTER_Y - 80.0, 62.0, with_alpha(palette::CYAN, pulse));
    frame.text(
        "SPACE TENNIS",
        CENTER_X,
        CENTER_Y - 35.0,
        28.0,
        with_alpha(palette::TENNIS_BALL, pulse),
    );

    // Demo rally
    let ball = Vec2::new(
        CENTER_X + (t * 3.0).sin() * 180.0,
        CENTER_Y + 30.0 + (t * 4.7).sin() * 60.0,
    );
    frame.push(DrawCmd::Circle {
        center: ball,
        radius: 6.0,
        color: palette::TENNIS_BALL,
    });
    let left_y = CENTER_Y + 30.0 + (t * 4.7).sin() * 50.0;
    let right_y = CENTER_Y + 30.0 + (t * 4.7 + 0.3).sin() * 50.0;
    for (x, y, color) in [
        (CENTER_X - 196.0, left_y, palette::CPU_RED),
        (CENTER_X + 196.0, right_y, palette::CYAN),
    ] {
        frame.push(DrawCmd::Ellipse {
            center: Vec2::new(x, y),
            radii: Vec2::new(6.0, 30.0),
            width: 2.0,
            color,
        });
    }

    frame.text(
        "WHERE VIDEO GAMES ALL STARTED",
        CENTER_X,
        CENTER_Y + 120.0,
        10.0,
        with_alpha(palette::WHITE, 0.3),
    );
    if (t * 3.0).sin() > 0.0 {
        frame.text("PRESS ENTER OR CLICK TO START", CENTER_X, CENTER_Y + 160.0, 13.0, palette::WHITE);
    }
    let credit = with_alpha(palette::WHITE, 0.15);
    frame.text("INSPIRED BY PONG  ATARI  1972", CENTER_X, FIELD_HEIGHT - 30.0, 8.0, credit);
    frame.text("JEDAI SPACE TENNIS EDITION", CENTER_X, FIELD_HEIGHT - 15.0, 8.0, credit);
}

/// Highlight box plus bobbing arrow for the selected menu row
fn draw_selection(frame: &mut Frame, y: f32, half_height: f32, color: Color, t: f32) {
    frame.rect(CENTER_X - 200.0, y - half_height, 400.0, half_height * 2.0, with_alpha(color, 0.08));
    frame.push(DrawCmd::StrokeRect {
        pos: Vec2::new(CENTER_X - 200.0, y - half_height),
        size: Vec2::new(400.0, half_height * 2.0),
        width: 2.0,
        color,
    });
    frame.text(">", CENTER_X - 180.0 + (t * 5.0).sin() * 5.0, y + 6.0, 16.0, color);
}

fn draw_menu_hints(frame: &mut Frame) {
    frame.text(
        "UP/DOWN TO SELECT  -  ENTER TO CONFIRM",
        CENTER_X,
        FIELD_HEIGHT - 50.0,
        9.0,
        DIM,
    );
    frame.text("ESC TO GO BACK", CENTER_X, FIELD_HEIGHT - 30.0, 9.0, DIM);
}

fn draw_mode_select(frame: &mut Frame, state: &GameState, t: f32) {
    frame.text("SELECT MODE", CENTER_X, 100.0, 28.0, palette::CYAN);

    for (i, mode) in [Mode::VsCpu, Mode::TwoPlayer].into_iter().enumerate() {
        let y = 220.0 + i as f32 * 80.0;
        let selected = state.mode_cursor == mode;
        if selected {
            draw_selection(frame, y, 25.0, palette::CYAN, t);
        }
        let (size, color) = if selected {
            (16.0, palette::WHITE)
        } else {
            (14.0, with_alpha(palette::WHITE, 0.35))
        };
        frame.text(
            format!("{}  {}", mode.label(), mode.caption()),
            CENTER_X,
            y + 6.0,
            size,
            color,
        );
    }

    draw_menu_hints(frame);
    if state.history.win_streak > 0 {
        frame.text(
            format!("WIN STREAK: {}", state.history.win_streak),
            CENTER_X,
            FIELD_HEIGHT - 80.0,
            10.0,
            palette::GOLD,
        );
    }
}

fn draw_difficulty(frame: &mut Frame, state: &GameState, t: f32) {
    frame.text("SELECT DIFFICULTY", CENTER_X, 100.0, 24.0, palette::CYAN);

    for (i, tier) in Difficulty::ALL.into_iter().enumerate() {
        let y = 190.0 + i as f32 * 90.0;
        let selected = state.difficulty_cursor == tier;
        if selected {
            draw_selection(frame, y, 28.0, tier.color(), t);
            frame.text(tier.label(), CENTER_X, y + 6.0, 18.0, tier.color());
            frame.text(
                tier.description(),
                CENTER_X,
                y + 26.0,
                9.0,
                with_alpha(palette::WHITE, 0.4),
            );
        } else {
            frame.text(tier.label(), CENTER_X, y + 6.0, 14.0, with_alpha(palette::WHITE, 0.3));
        }
    }

    draw_menu_hints(frame);
}

fn draw_countdown(frame: &mut Frame, state: &GameState) {
    let timer = state.countdown_timer.max(0.0);
    let num = timer.ceil() as u32;
    let frac = timer - timer.floor();

    let (label, color) = if num > 0 {
        (num.to_string(), palette::WHITE)
    } else {
        ("GO!".to_string(), palette::EASY_GREEN)
    };
    let size = 72.0 * (1.0 + (1.0 - frac) * 0.5);
    frame.text(label, CENTER_X, CENTER_Y + size * 0.35, size, with_alpha(color, frac));
}

fn draw_goal_flash(frame: &mut Frame, state: &GameState) {
    let scorer = state.last_scorer.unwrap_or(Side::Left);
    let color = match scorer {
        Side::Left => palette::CPU_RED,
        Side::Right => palette::CYAN,
    };
    let progress = 1.0 - state.goal_timer / GOAL_PAUSE_SECS;
    let alpha = (0.3 * (1.0 - progress)).max(0.0);
    frame.rect(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT, with_alpha(color, alpha));

    let name = state.paddle(scorer).name;
    frame.text(
        format!("{} SCORES!", name),
        CENTER_X,
        CENTER_Y,
        32.0,
        with_alpha(color, (1.0 - progress * 0.5).clamp(0.0, 1.0)),
    );
}

fn draw_game_over(frame: &mut Frame, state: &GameState, t: f32) {
    let left_won = state.score_left >= WIN_SCORE;
    let (win_text, win_color) = match (state.two_player, left_won) {
        (true, true) => ("PLAYER 1 WINS!", palette::SCORE_PINK),
        (true, false) => ("PLAYER 2 WINS!", palette::CYAN),
        (false, true) => ("CPU WINS!", palette::SCORE_PINK),
        (false, false) => ("YOU WIN!", palette::CYAN),
    };
    let pulse = (t * 3.0).sin() * 0.1 + 0.9;
    frame.text(win_text, CENTER_X, CENTER_Y - 30.0, 36.0, with_alpha(win_color, pulse));
    frame.text(
        format!("{}  -  {}", state.score_left, state.score_right),
        CENTER_X,
        CENTER_Y + 20.0,
        18.0,
        palette::WHITE,
    );

    if !state.two_player && state.history.win_streak > 0 {
        frame.text(
            format!("WIN STREAK: {}", state.history.win_streak),
            CENTER_X,
            CENTER_Y + 55.0,
            12.0,
            palette::GOLD,
        );
    }

    if !state.history.is_empty() {
        frame.text("RECENT MATCHES", CENTER_X, CENTER_Y + 90.0, 8.0, with_alpha(palette::WHITE, 0.3));
        for (i, entry) in state.history.recent(5).enumerate() {
            let color = if entry.contains("WIN") {
                palette::EASY_GREEN
            } else if entry.contains("LOSS") {
                palette::rgb(0xff4444)
            } else {
                palette::rgb(0xaaaaaa)
            };
            frame.text(entry, CENTER_X, CENTER_Y + 110.0 + i as f32 * 16.0, 8.0, color);
        }
    }

    if (t * 3.0).sin() > 0.0 {
        frame.text("PRESS ENTER TO CONTINUE", CENTER_X, FIELD_HEIGHT - 40.0, 11.0, palette::WHITE);
    }
}

fn draw_pause(frame: &mut Frame, state: &GameState, t: f32) {
    frame.rect(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT, [0.0, 0.0, 0.0, 0.6]);

    let pulse = (t * 2.0).sin() * 0.15 + 0.85;
    frame.text("PAUSED", CENTER_X, CENTER_Y - 20.0, 36.0, with_alpha(palette::CYAN, pulse));
    frame.text(
        "PRESS ESC OR P TO RESUME",
        CENTER_X,
        CENTER_Y + 30.0,
        10.0,
        with_alpha(palette::WHITE, 0.5),
    );
    let controls = if state.two_player {
        "P1: W / S    P2: UP / DOWN"
    } else {
        "CONTROLS: UP / DOWN ARROWS"
    };
    frame.text(controls, CENTER_X, CENTER_Y + 70.0, 9.0, with_alpha(palette::WHITE, 0.3));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{MatchHistory, MatchResult};
    use crate::settings::Settings;
    use crate::sim::{ActiveEffect, PowerUpKind};

    fn state() -> GameState {
        GameState::new(13, &Settings::default(), MatchHistory::default())
    }

    fn digits(frame: &Frame) -> Vec<u32> {
        frame
            .cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Digits { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_title_has_heading() {
        let frame = build_frame(&state());
        assert!(frame.texts().any(|t| t == "SPACE TENNIS"));
        assert!(digits(&frame).is_empty());
    }

    #[test]
    fn test_hud_scores_capped() {
        let mut s = state();
        s.phase = GamePhase::Playing;
        s.score_left = 7;
        s.score_right = 120;
        let frame = build_frame(&s);
        assert_eq!(digits(&frame), vec![7, 99]);
    }

    #[test]
    fn test_mode_select_streak() {
        let mut s = state();
        s.phase = GamePhase::ModeSelect;
        assert!(!build_frame(&s).texts().any(|t| t.starts_with("WIN STREAK")));
        s.history.win_streak = 3;
        assert!(build_frame(&s).texts().any(|t| t == "WIN STREAK: 3"));
    }

    #[test]
    fn test_difficulty_shows_description_of_cursor() {
        let mut s = state();
        s.phase = GamePhase::Difficulty;
        s.difficulty_cursor = Difficulty::Hard;
        let frame = build_frame(&s);
        assert!(frame.texts().any(|t| t == "Fast AI - True arcade challenge"));
        assert!(!frame.texts().any(|t| t == "Slow AI - Good for learning"));
    }

    #[test]
    fn test_effect_label_with_remaining() {
        let mut s = state();
        s.phase = GamePhase::Playing;
        s.time = 2.0;
        s.effects.push(ActiveEffect {
            kind: PowerUpKind::Big,
            owner: Side::Right,
            target: Side::Left,
            expires_at: 8.0,
            label: PowerUpKind::Big.description(),
            color: PowerUpKind::Big.color(),
        });
        let frame = build_frame(&s);
        assert!(frame.texts().any(|t| t == "RACKET GROW 6.0s"));
    }

    #[test]
    fn test_game_over_lists_recent_five() {
        let mut s = state();
        s.phase = GamePhase::GameOver;
        s.score_right = 11;
        for i in 0..7 {
            s.history.record(&MatchResult {
                left_name: "CPU".into(),
                right_name: "P1".into(),
                left_score: i,
                right_score: 11,
                two_player: false,
            });
        }
        let frame = build_frame(&s);
        assert!(frame.texts().any(|t| t == "YOU WIN!"));
        let listed = frame.texts().filter(|t| t.starts_with("WIN (")).count();
        assert_eq!(listed, 5);
    }

    #[test]
    fn test_pause_overlay() {
        let mut s = state();
        s.phase = GamePhase::Paused;
        s.two_player = true;
        let frame = build_frame(&s);
        assert!(frame.texts().any(|t| t == "PAUSED"));
        assert!(frame.texts().any(|t| t.starts_with("P1: W / S")));
    }

    #[test]
    fn test_frame_carries_shake() {
        let mut s = state();
        s.shake.offset = Vec2::new(2.0, -1.0);
        assert_eq!(build_frame(&s).offset, Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::default();
        sink.present(&build_frame(&state()));
        assert_eq!(sink.frames, 1);
        assert!(sink.last.is_some());
    }
}
