//! Frame driver
//!
//! Owns the simulation and its collaborators. Each frame it turns wall-clock
//! time into a tick, routes the resulting events to audio, the phase
//! observer and storage, then hands the scene to the drawing sink.

use std::cell::Cell;
use std::rc::Rc;

use crate::audio::AudioSink;
use crate::consts::MAX_DT;
use crate::history::MatchHistory;
use crate::persistence::{KeyValueStore, StorageError};
use crate::scene::{DrawSink, build_frame};
use crate::settings::{QualityPreset, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, Key, flow, tick};

/// Callback told about every phase change
pub type PhaseObserver = Box<dyn FnMut(GamePhase)>;

/// Stops a game without borrowing it, so callbacks running inside a frame
/// can end the game they belong to
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// A running game
pub struct Game {
    state: GameState,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    store: Box<dyn KeyValueStore>,
    observer: Option<PhaseObserver>,
    /// Timestamp of the previous frame (ms)
    last_time: Option<f64>,
    running: bool,
    stop_handle: StopHandle,
}

impl Game {
    /// Load settings and history from `store` and start on the title screen
    pub fn new(seed: u64, mut audio: Box<dyn AudioSink>, store: Box<dyn KeyValueStore>) -> Self {
        let settings = Settings::load(store.as_ref());
        audio.apply_settings(&settings);
        let history = MatchHistory::load(store.as_ref());
        log::info!(
            "Game initialized with seed {} (streak {}, {} past matches)",
            seed,
            history.win_streak,
            history.results.len()
        );

        Self {
            state: GameState::new(seed, &settings, history),
            settings,
            audio,
            store,
            observer: None,
            last_time: None,
            running: true,
            stop_handle: StopHandle::default(),
        }
    }

    /// Replace the phase observer
    pub fn set_phase_observer(&mut self, observer: impl FnMut(GamePhase) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Handle that stops this game from outside
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    pub fn key_down(&mut self, key: Key) {
        if !self.check_running() {
            return;
        }
        flow::key_down(&mut self.state, key);
        self.dispatch();
    }

    pub fn key_up(&mut self, key: Key) {
        if !self.check_running() {
            return;
        }
        flow::key_up(&mut self.state, key);
    }

    pub fn click(&mut self) {
        if !self.check_running() {
            return;
        }
        flow::click(&mut self.state);
        self.dispatch();
    }

    /// Run one frame at host time `now_ms` and draw it
    ///
    /// The first frame has zero dt. Returns false once stopped, including
    /// when a callback stopped the game during this frame.
    pub fn frame(&mut self, now_ms: f64, sink: &mut dyn DrawSink) -> bool {
        if !self.check_running() {
            return false;
        }

        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_DT as f64) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);

        self.advance(dt);
        if !self.check_running() {
            return false;
        }
        sink.present(&build_frame(&self.state));
        true
    }

    /// Tick and dispatch without drawing
    pub fn advance(&mut self, dt: f32) {
        if !self.check_running() {
            return;
        }
        tick(&mut self.state, dt);
        self.dispatch();
    }

    /// Freeze the game; nothing runs after this
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Game stopped");
        }
        self.running = false;
        self.observer = None;
        self.stop_handle.stop();
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.stop_handle.is_stopped()
    }

    /// Honour a pending external stop
    fn check_running(&mut self) -> bool {
        if self.running && self.stop_handle.is_stopped() {
            self.stop();
        }
        self.running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Apply and persist new settings
    pub fn update_settings(&mut self, settings: Settings) {
        log::info!("Settings updated (quality {})", settings.quality.as_str());
        self.state.apply_settings(&settings);
        self.audio.apply_settings(&settings);
        if let Err(e) = settings.save(self.store.as_mut()) {
            log_storage_error("settings", &e);
        }
        self.settings = settings;
    }

    /// Switch quality preset, keeping the other preferences
    pub fn set_quality(&mut self, preset: QualityPreset) {
        let mut settings = self.settings.clone();
        settings.apply_preset(preset);
        self.update_settings(settings);
    }

    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(effect) => self.audio.play(effect),
                GameEvent::PhaseChanged(phase) => {
                    if let Some(observer) = self.observer.as_mut() {
                        observer(phase);
                    }
                }
                GameEvent::MatchFinished(result) => {
                    log::info!("Result recorded: {}", result);
                    if let Err(e) = self.state.history.save(self.store.as_mut()) {
                        log_storage_error("match history", &e);
                    }
                }
            }
        }
    }
}

fn log_storage_error(what: &str, e: &StorageError) {
    if e.is_recoverable() {
        log::warn!("Failed to save {}: {}", what, e);
    } else {
        log::error!("Failed to save {}: {}", what, e);
    }
}
