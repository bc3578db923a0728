//! Sound effect sink
//!
//! The simulation only names the cue it wants; how it sounds is up to the
//! sink. On wasm32 the sink synthesises retro square-wave pips with the Web
//! Audio API.

#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits a paddle
    PaddleHit,
    /// Ball hits the top or bottom wall
    WallHit,
    /// A point was scored
    Score,
    /// Menu navigation / confirm
    MenuSelect,
    /// Countdown number changed
    CountdownTick,
    /// Countdown reached zero
    CountdownGo,
    /// Gold bonus collected
    GoldPickup,
    /// Power-up collected
    PowerUp,
    /// Match won
    Victory,
    /// Match lost against the CPU
    GameOver,
}

/// Receives fire-and-forget sound cues
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Pick up volume and mute preferences
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Sink that swallows every cue (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedAudio;

impl AudioSink for MutedAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Sink that remembers what was played
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<SoundEffect>,
    /// Last settings handed over
    pub settings: Option<Settings>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.settings = Some(settings.clone());
    }
}

/// A single square-wave note: frequency (Hz), length (s), start offset (s)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pip {
    pub freq: f32,
    pub duration: f64,
    pub delay: f64,
}

impl Pip {
    const fn at(freq: f32, duration: f64, delay: f64) -> Self {
        Self {
            freq,
            duration,
            delay,
        }
    }
}

impl SoundEffect {
    /// The notes making up this cue
    pub fn pips(self) -> Vec<Pip> {
        match self {
            SoundEffect::PaddleHit => vec![Pip::at(480.0, 0.05, 0.0)],
            SoundEffect::WallHit => vec![Pip::at(300.0, 0.04, 0.0)],
            SoundEffect::Score => vec![Pip::at(220.0, 0.25, 0.0)],
            SoundEffect::MenuSelect => vec![Pip::at(600.0, 0.03, 0.0)],
            SoundEffect::CountdownTick => vec![Pip::at(800.0, 0.08, 0.0)],
            SoundEffect::CountdownGo => vec![Pip::at(1200.0, 0.15, 0.0)],
            SoundEffect::GoldPickup => arpeggio(&[660.0, 880.0, 1100.0, 1320.0], 0.08, 0.06),
            SoundEffect::PowerUp => arpeggio(&[500.0, 700.0, 900.0], 0.06, 0.05),
            SoundEffect::Victory => arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.12, 0.12),
            SoundEffect::GameOver => arpeggio(&[400.0, 350.0, 300.0, 200.0], 0.15, 0.15),
        }
    }
}

fn arpeggio(freqs: &[f32], duration: f64, step: f64) -> Vec<Pip> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &f)| Pip::at(f, duration, i as f64 * step))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pip_cues() {
        let pips = SoundEffect::PaddleHit.pips();
        assert_eq!(pips.len(), 1);
        assert_eq!(pips[0].freq, 480.0);
        assert_eq!(pips[0].delay, 0.0);
    }

    #[test]
    fn test_gold_arpeggio_ascends() {
        let pips = SoundEffect::GoldPickup.pips();
        assert_eq!(pips.len(), 4);
        assert!(pips.windows(2).all(|w| w[1].freq > w[0].freq));
        assert!((pips[3].delay - 0.18).abs() < 1e-9);
    }

    #[test]
    fn test_game_over_descends() {
        let pips = SoundEffect::GameOver.pips();
        assert!(pips.windows(2).all(|w| w[1].freq < w[0].freq));
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingAudio::default();
        sink.play(SoundEffect::WallHit);
        sink.play(SoundEffect::Score);
        assert_eq!(sink.played, vec![SoundEffect::WallHit, SoundEffect::Score]);
    }
}
