//! Answer checking for the three exercise kinds.

use serde::Serialize;

/// Minimal share of expected words a reading transcript has to contain.
pub const READING_PASS_ACCURACY: f64 = 0.8;

/// Transcript words looked at per expected word, the rest is ignored.
const HEARD_WORDS_PER_EXPECTED: usize = 3;

/// Lowercases, trims, drops punctuation (apostrophes inside words survive)
/// and collapses whitespace.
pub fn normalize_answer(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut cleaned = String::with_capacity(input.len());

    for (i, c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || c.is_whitespace() {
            cleaned.extend(c.to_lowercase());
        } else if is_apostrophe(*c) {
            let inside_word = i > 0
                && chars[i - 1].is_alphanumeric()
                && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            if inside_word {
                cleaned.push('\'');
            }
        } else {
            cleaned.push(' ');
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

pub fn normalized_words(input: &str) -> Vec<String> {
    normalize_answer(input)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn check_choice(expected: &str, given: &str) -> bool {
    normalize_answer(expected) == normalize_answer(given)
}

/// `expected` may hold several accepted translations separated by `|`.
pub fn check_translation(expected: &str, given: &str) -> bool {
    let given = normalize_answer(given);
    if given.is_empty() {
        return false;
    }

    expected
        .split('|')
        .map(normalize_answer)
        .any(|accepted| accepted == given)
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ReadingScore {
    /// Share of expected words found in the transcript, in order.
    pub accuracy: f64,
    /// One flag per expected word.
    pub matched: Vec<bool>,
}

impl ReadingScore {
    pub fn is_passing(&self) -> bool {
        self.accuracy >= READING_PASS_ACCURACY
    }
}

/// Aligns a recognized transcript against the expected text with a longest
/// common subsequence over normalized words.
pub fn score_reading(expected: &str, transcript: &str) -> ReadingScore {
    let expected = normalized_words(expected);
    let mut heard = normalized_words(transcript);
    heard.truncate(expected.len() * HEARD_WORDS_PER_EXPECTED + 8);

    if expected.is_empty() {
        return ReadingScore {
            accuracy: if heard.is_empty() { 1.0 } else { 0.0 },
            matched: Vec::new(),
        };
    }

    let (n, m) = (expected.len(), heard.len());
    let width = m + 1;
    // row-major (n + 1) x (m + 1), cell (i, j) is the LCS of expected[i..] and heard[j..]
    let mut table = vec![0u32; (n + 1) * width];
    let at = |i: usize, j: usize| i * width + j;
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[at(i, j)] = if expected[i] == heard[j] {
                table[at(i + 1, j + 1)] + 1
            } else {
                table[at(i + 1, j)].max(table[at(i, j + 1)])
            };
        }
    }

    let mut matched = vec![false; n];
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if expected[i] == heard[j] {
            matched[i] = true;
            i += 1;
            j += 1;
        } else if table[at(i + 1, j)] >= table[at(i, j + 1)] {
            i += 1;
        } else {
            j += 1;
        }
    }

    let hits = matched.iter().filter(|m| **m).count();
    ReadingScore {
        accuracy: hits as f64 / n as f64,
        matched,
    }
}
