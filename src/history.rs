//! Win streak and match history
//!
//! Persisted in two key-value slots, tracks the last 10 results.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::Side;

/// Maximum number of results to keep
pub const MAX_HISTORY: usize = 10;

/// Final score of a completed match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub left_name: String,
    pub right_name: String,
    pub left_score: u32,
    pub right_score: u32,
    pub two_player: bool,
}

impl MatchResult {
    /// Side that reached the higher score (right on a tie)
    pub fn winner(&self) -> Side {
        if self.left_score > self.right_score {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.two_player {
            write!(
                f,
                "{} {} - {} {}",
                self.left_name, self.left_score, self.right_score, self.right_name
            )
        } else {
            let outcome = match self.winner() {
                Side::Right => "WIN",
                Side::Left => "LOSS",
            };
            write!(f, "{} ({}-{})", outcome, self.left_score, self.right_score)
        }
    }
}

/// Streak counter plus FIFO log of formatted results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHistory {
    /// Consecutive single-player wins
    pub win_streak: u32,
    /// Oldest first
    pub results: VecDeque<String>,
}

impl MatchHistory {
    const STREAK_KEY: &'static str = "jedai_streak";
    const HISTORY_KEY: &'static str = "jedai_history";

    /// Create empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result, evicting the oldest past the cap
    pub fn record(&mut self, result: &MatchResult) {
        self.results.push_back(result.to_string());
        while self.results.len() > MAX_HISTORY {
            self.results.pop_front();
        }
    }

    /// Apply a finished single-player match to the streak
    pub fn update_streak(&mut self, human_won: bool) {
        if human_won {
            self.win_streak += 1;
        } else {
            self.win_streak = 0;
        }
    }

    /// Most recent `n` results, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.results.len().saturating_sub(n);
        self.results.iter().skip(skip).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Read both slots, falling back to defaults for anything missing or corrupt
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let win_streak = match store.get(Self::STREAK_KEY) {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                log::warn!("Ignoring corrupt win streak {:?}", raw);
                0
            }),
            None => 0,
        };

        let mut results: VecDeque<String> = match store.get(Self::HISTORY_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt match history: {}", e);
                VecDeque::new()
            }),
            None => VecDeque::new(),
        };
        while results.len() > MAX_HISTORY {
            results.pop_front();
        }

        log::debug!(
            "Loaded history: streak {}, {} results",
            win_streak,
            results.len()
        );
        Self {
            win_streak,
            results,
        }
    }

    /// Write both slots
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STREAK_KEY, &self.win_streak.to_string())?;
        let json = serde_json::to_string(&self.results)?;
        store.set(Self::HISTORY_KEY, &json)?;
        log::info!("History saved ({} entries)", self.results.len());
        Ok(())
    }
}
