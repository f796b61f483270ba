use serde::Serialize;

use super::linking::{LinkKind, link_between};
use super::style::{Highlight, WordStyle};
use super::timing::{clamp_rate, estimate_word_duration};
use super::words::split_words;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PlannedWord {
    pub text: String,
    /// UTF-16 offset in the source text.
    pub offset: usize,
    pub length: usize,
    /// Expected start, relative to the start of speech.
    pub start_ms: u64,
    pub duration_ms: u64,
    /// Linking sound into the next word, if any.
    pub link: Option<LinkKind>,
    /// Style before playback starts.
    pub style: WordStyle,
}

/// Everything a client needs to highlight a text while it is being read out:
/// word positions, fallback timings and linking sounds.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ReadingPlan {
    pub rate: f64,
    pub words: Vec<PlannedWord>,
    pub total_ms: u64,
}

impl ReadingPlan {
    pub fn new(text: &str, rate: f64) -> Self {
        let rate = clamp_rate(rate);
        let words = split_words(text);

        let mut start_ms = 0;
        let planned = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let duration_ms = estimate_word_duration(word, rate).as_millis() as u64;
                let link = words.get(i + 1).and_then(|next| link_between(word, next));
                let planned = PlannedWord {
                    text: word.text().to_string(),
                    offset: word.offset(),
                    length: word.length(),
                    start_ms,
                    duration_ms,
                    link,
                    style: WordStyle {
                        highlight: Highlight::Pending,
                        linked: link.is_some(),
                    },
                };
                start_ms += duration_ms;
                planned
            })
            .collect();

        Self {
            rate,
            words: planned,
            total_ms: start_ms,
        }
    }

    pub fn linked_pairs(&self) -> usize {
        self.words.iter().filter(|w| w.link.is_some()).count()
    }
}
