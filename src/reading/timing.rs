use std::time::Duration;

use super::words::{Pause, Word};

pub const BASE_WORD_MS: u64 = 180;
pub const PER_LETTER_MS: u64 = 55;
pub const CLAUSE_PAUSE_MS: u64 = 250;
pub const SENTENCE_PAUSE_MS: u64 = 450;

pub const MIN_RATE: f64 = 0.5;
pub const MAX_RATE: f64 = 2.0;
pub const DEFAULT_RATE: f64 = 1.0;

/// Speech rate as accepted by synthesis engines, 1.0 being normal speed.
pub fn clamp_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(MIN_RATE, MAX_RATE)
    } else {
        DEFAULT_RATE
    }
}

/// How long a word is expected to take, including the pause after it.
pub fn estimate_word_duration(word: &Word, rate: f64) -> Duration {
    let rate = clamp_rate(rate);
    let letters = word.letters().chars().count() as u64;
    let pause = match word.trailing_pause() {
        Some(Pause::Clause) => CLAUSE_PAUSE_MS,
        Some(Pause::Sentence) => SENTENCE_PAUSE_MS,
        None => 0,
    };

    let spoken = (BASE_WORD_MS + PER_LETTER_MS * letters) as f64 / rate;
    Duration::from_millis(spoken.round() as u64 + (pause as f64 / rate).round() as u64)
}
