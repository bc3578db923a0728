//! Game flow state machine
//!
//! Menus, countdown, goal pauses and match end. Every phase change goes
//! through `transition`, which owns the table of legal moves and their entry
//! effects.

use super::input::Key;
use super::state::{Ball, Difficulty, GameEvent, GamePhase, GameState, Mode, Side};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::history::MatchResult;

/// Whether `from -> to` is a legal phase change
pub fn is_allowed(from: GamePhase, to: GamePhase) -> bool {
    use GamePhase as P;

    matches!(
        (from, to),
        (P::Title, P::ModeSelect)
            | (P::ModeSelect, P::Title)
            | (P::ModeSelect, P::Difficulty)
            | (P::ModeSelect, P::Countdown)
            | (P::Difficulty, P::ModeSelect)
            | (P::Difficulty, P::Countdown)
            | (P::Countdown, P::Playing)
            | (P::Playing, P::Paused)
            | (P::Paused, P::Playing)
            | (P::Playing, P::Goal)
            | (P::Goal, P::Playing)
            | (P::Goal, P::GameOver)
            | (P::GameOver, P::ModeSelect)
    )
}

/// Change phase, running the entry effects of the new one
///
/// Illegal moves are logged and ignored. Returns whether the phase changed.
pub fn transition(state: &mut GameState, to: GamePhase) -> bool {
    use GamePhase as P;

    let from = state.phase;
    if !is_allowed(from, to) {
        log::warn!("Ignoring phase change {:?} -> {:?}", from, to);
        return false;
    }
    log::debug!("Phase {:?} -> {:?}", from, to);

    match (from, to) {
        (P::Title, P::ModeSelect)
        | (P::Difficulty, P::ModeSelect)
        | (P::GameOver, P::ModeSelect) => {
            state.sound(SoundEffect::MenuSelect);
            state.mode_cursor = Mode::VsCpu;
        }
        (P::ModeSelect, P::Title) => state.sound(SoundEffect::MenuSelect),
        (P::ModeSelect, P::Difficulty) => {
            state.sound(SoundEffect::MenuSelect);
            state.two_player = false;
            state.left.name = "CPU";
            state.right.name = "P1";
            state.difficulty_cursor = Difficulty::Medium;
        }
        (P::ModeSelect, P::Countdown) => {
            state.sound(SoundEffect::MenuSelect);
            state.two_player = true;
            state.left.name = "P1";
            state.right.name = "P2";
            start_countdown(state);
        }
        (P::Difficulty, P::Countdown) => {
            state.sound(SoundEffect::MenuSelect);
            state.difficulty = state.difficulty_cursor;
            start_countdown(state);
        }
        (P::Countdown, P::Playing) => state.ball.frozen = false,
        (P::Goal, P::Playing) => {
            reset_ball(state);
            state.serve_delay = Some(SERVE_DELAY_SECS);
        }
        _ => {}
    }

    state.phase = to;
    state.events.push(GameEvent::PhaseChanged(to));
    true
}

// === Input ===

/// React to a key press in the current phase
pub fn key_down(state: &mut GameState, key: Key) {
    state.keys.set(key, true);

    match state.phase {
        GamePhase::Title => {
            if key.is_confirm() {
                transition(state, GamePhase::ModeSelect);
            }
        }
        GamePhase::ModeSelect => {
            if key.is_nav_up() || key.is_nav_down() {
                state.mode_cursor = state.mode_cursor.toggled();
                state.sound(SoundEffect::MenuSelect);
            } else if key.is_confirm() {
                let to = match state.mode_cursor {
                    Mode::VsCpu => GamePhase::Difficulty,
                    Mode::TwoPlayer => GamePhase::Countdown,
                };
                transition(state, to);
            } else if key.is_cancel() {
                transition(state, GamePhase::Title);
            }
        }
        GamePhase::Difficulty => {
            if key.is_nav_up() {
                state.difficulty_cursor = state.difficulty_cursor.prev();
                state.sound(SoundEffect::MenuSelect);
            } else if key.is_nav_down() {
                state.difficulty_cursor = state.difficulty_cursor.next();
                state.sound(SoundEffect::MenuSelect);
            } else if key.is_confirm() {
                transition(state, GamePhase::Countdown);
            } else if key.is_cancel() {
                transition(state, GamePhase::ModeSelect);
            }
        }
        GamePhase::Playing => {
            if key.is_pause() {
                transition(state, GamePhase::Paused);
            }
        }
        GamePhase::Paused => {
            if key.is_pause() || key == Key::Space {
                transition(state, GamePhase::Playing);
            }
        }
        GamePhase::GameOver => {
            if key.is_confirm() {
                transition(state, GamePhase::ModeSelect);
            }
        }
        GamePhase::Countdown | GamePhase::Goal => {}
    }
}

pub fn key_up(state: &mut GameState, key: Key) {
    state.keys.set(key, false);
}

/// Pointer click (only starts the game from the title)
pub fn click(state: &mut GameState) {
    if state.phase == GamePhase::Title {
        transition(state, GamePhase::ModeSelect);
    }
}

// === Match setup ===

/// Fresh match and the 3 s countdown
pub fn start_countdown(state: &mut GameState) {
    reset_field(state);
    state.countdown_timer = COUNTDOWN_SECS;
}

/// Zero the scores and clear the court
pub fn reset_field(state: &mut GameState) {
    state.score_left = 0;
    state.score_right = 0;
    state.last_scorer = None;
    state.match_over = false;
    state.serve_delay = None;
    state.gold = None;
    state.gold_timer = GOLD_SPAWN_DELAY;
    state.power_up = None;
    state.power_up_timer = POWERUP_SPAWN_DELAY;
    state.effects.clear();
    state.left.recentre();
    state.right.recentre();
    reset_ball(state);
}

/// New frozen serve from the centre; extra balls are discarded
pub fn reset_ball(state: &mut GameState) {
    state.ball = Ball::serve(&mut state.rng);
    state.extra_balls.clear();
}

// === Scoring ===

/// A point was scored (or a gold bonus reached the winning score)
pub fn on_goal(state: &mut GameState, scorer: Side) {
    state.last_scorer = Some(scorer);

    if let Some(winner) = state.match_winner() {
        state.match_over = true;
        state.goal_timer = MATCH_POINT_PAUSE_SECS;
        finish_match(state, winner);
    } else {
        state.match_over = false;
        state.goal_timer = GOAL_PAUSE_SECS;
    }
    transition(state, GamePhase::Goal);
}

/// Streak, result log and the end-of-match cue
pub fn finish_match(state: &mut GameState, winner: Side) {
    if state.two_player {
        state.sound(SoundEffect::Victory);
    } else {
        let human_won = winner == Side::Right;
        state.history.update_streak(human_won);
        state.sound(if human_won {
            SoundEffect::Victory
        } else {
            SoundEffect::GameOver
        });
    }

    let result = MatchResult {
        left_name: state.left.name.to_string(),
        right_name: state.right.name.to_string(),
        left_score: state.score_left,
        right_score: state.score_right,
        two_player: state.two_player,
    };
    state.history.record(&result);
    log::info!(
        "Match finished: {} (streak {})",
        result,
        state.history.win_streak
    );
    state.events.push(GameEvent::MatchFinished(result));
}

// === Timers ===

/// 3-2-1 countdown with a cue on each whole second
pub fn update_countdown(state: &mut GameState, dt: f32) {
    let prev = state.countdown_timer.ceil();
    state.countdown_timer -= dt;
    let curr = state.countdown_timer.ceil();

    if curr < prev {
        state.sound(if curr > 0.0 {
            SoundEffect::CountdownTick
        } else {
            SoundEffect::CountdownGo
        });
    }
    if state.countdown_timer <= 0.0 {
        transition(state, GamePhase::Playing);
    }
}

/// Pause after a point, then serve again or end the match
pub fn update_goal(state: &mut GameState, dt: f32) {
    state.goal_timer -= dt;
    if state.goal_timer <= 0.0 {
        let to = if state.match_over {
            GamePhase::GameOver
        } else {
            GamePhase::Playing
        };
        transition(state, to);
    }
}

/// Release the frozen serve once the delay runs out
pub fn update_serve_delay(state: &mut GameState, dt: f32) {
    if let Some(remaining) = state.serve_delay {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            state.serve_delay = None;
            state.ball.frozen = false;
        } else {
            state.serve_delay = Some(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MatchHistory;
    use crate::settings::Settings;

    fn state() -> GameState {
        GameState::new(99, &Settings::default(), MatchHistory::default())
    }

    fn phases(state: &GameState) -> Vec<GamePhase> {
        state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_title_to_single_player_countdown() {
        let mut s = state();
        key_down(&mut s, Key::Enter);
        assert_eq!(s.phase, GamePhase::ModeSelect);
        key_down(&mut s, Key::Space);
        assert_eq!(s.phase, GamePhase::Difficulty);
        assert_eq!(s.difficulty_cursor, Difficulty::Medium);
        key_down(&mut s, Key::ArrowDown);
        key_down(&mut s, Key::Enter);
        assert_eq!(s.phase, GamePhase::Countdown);
        assert_eq!(s.difficulty, Difficulty::Hard);
        assert!(!s.two_player);
        assert_eq!((s.left.name, s.right.name), ("CPU", "P1"));
        assert_eq!(s.countdown_timer, 3.0);
        assert_eq!(
            phases(&s),
            vec![GamePhase::ModeSelect, GamePhase::Difficulty, GamePhase::Countdown]
        );
    }

    #[test]
    fn test_two_player_skips_difficulty() {
        let mut s = state();
        click(&mut s);
        key_down(&mut s, Key::S);
        assert_eq!(s.mode_cursor, Mode::TwoPlayer);
        key_down(&mut s, Key::Enter);
        assert_eq!(s.phase, GamePhase::Countdown);
        assert!(s.two_player);
        assert_eq!((s.left.name, s.right.name), ("P1", "P2"));
    }

    #[test]
    fn test_escape_backs_out() {
        let mut s = state();
        key_down(&mut s, Key::Enter);
        key_down(&mut s, Key::Enter);
        key_down(&mut s, Key::Escape);
        assert_eq!(s.phase, GamePhase::ModeSelect);
        assert_eq!(s.mode_cursor, Mode::VsCpu);
        key_down(&mut s, Key::Escape);
        assert_eq!(s.phase, GamePhase::Title);
    }

    #[test]
    fn test_difficulty_wraps_up() {
        let mut s = state();
        key_down(&mut s, Key::Enter);
        key_down(&mut s, Key::Enter);
        key_down(&mut s, Key::W);
        key_down(&mut s, Key::W);
        assert_eq!(s.difficulty_cursor, Difficulty::Hard);
    }

    #[test]
    fn test_illegal_transition_ignored() {
        let mut s = state();
        assert!(!transition(&mut s, GamePhase::Playing));
        assert_eq!(s.phase, GamePhase::Title);
        assert!(s.events.is_empty());
    }

    #[test]
    fn test_pause_toggle() {
        let mut s = state();
        s.phase = GamePhase::Playing;
        key_down(&mut s, Key::P);
        assert_eq!(s.phase, GamePhase::Paused);
        key_down(&mut s, Key::Enter);
        assert_eq!(s.phase, GamePhase::Paused);
        key_down(&mut s, Key::Space);
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_countdown_cues() {
        let mut s = state();
        s.phase = GamePhase::Countdown;
        s.countdown_timer = 3.0;
        let mut cues = Vec::new();
        while s.phase == GamePhase::Countdown {
            update_countdown(&mut s, 0.05);
            for e in s.drain_events() {
                if let GameEvent::Sound(fx) = e {
                    cues.push(fx);
                }
            }
        }
        assert_eq!(
            cues,
            vec![
                SoundEffect::CountdownTick,
                SoundEffect::CountdownTick,
                SoundEffect::CountdownGo
            ]
        );
        assert_eq!(s.phase, GamePhase::Playing);
        assert!(!s.ball.frozen);
    }

    #[test]
    fn test_goal_then_serve() {
        let mut s = state();
        s.phase = GamePhase::Playing;
        s.score_left = 5;
        on_goal(&mut s, Side::Left);
        assert_eq!(s.phase, GamePhase::Goal);
        assert_eq!(s.goal_timer, GOAL_PAUSE_SECS);
        assert!(!s.match_over);

        update_goal(&mut s, 1.25);
        assert_eq!(s.phase, GamePhase::Playing);
        assert!(s.ball.frozen);
        assert_eq!(s.serve_delay, Some(SERVE_DELAY_SECS));

        update_serve_delay(&mut s, 0.3);
        assert!(s.ball.frozen);
        update_serve_delay(&mut s, 0.3);
        assert!(!s.ball.frozen);
        assert_eq!(s.serve_delay, None);
    }

    #[test]
    fn test_cpu_win_resets_streak() {
        let mut s = state();
        s.history.win_streak = 4;
        s.phase = GamePhase::Playing;
        s.score_left = 11;
        s.score_right = 6;
        on_goal(&mut s, Side::Left);

        assert!(s.match_over);
        assert_eq!(s.goal_timer, MATCH_POINT_PAUSE_SECS);
        assert_eq!(s.history.win_streak, 0);
        assert_eq!(s.history.results.back().map(String::as_str), Some("LOSS (11-6)"));
        assert!(s.events.contains(&GameEvent::Sound(SoundEffect::GameOver)));

        update_goal(&mut s, 2.01);
        assert_eq!(s.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_two_player_win_keeps_streak() {
        let mut s = state();
        s.history.win_streak = 2;
        s.two_player = true;
        s.left.name = "P1";
        s.right.name = "P2";
        s.phase = GamePhase::Playing;
        s.score_left = 11;
        s.score_right = 3;
        on_goal(&mut s, Side::Left);
        assert_eq!(s.history.win_streak, 2);
        assert_eq!(s.history.results.back().map(String::as_str), Some("P1 11 - 3 P2"));
        assert!(s.events.contains(&GameEvent::Sound(SoundEffect::Victory)));
    }

    #[test]
    fn test_reset_field_clears_court() {
        let mut s = state();
        s.score_left = 7;
        s.extra_balls.push(s.ball.clone());
        s.left.y = 20.0;
        reset_field(&mut s);
        assert_eq!(s.score_left, 0);
        assert!(s.extra_balls.is_empty());
        assert_eq!(s.left.y, 260.0);
        assert!(s.ball.frozen);
    }
}
