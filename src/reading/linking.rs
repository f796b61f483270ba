use serde::Serialize;

use super::words::Word;

/// How the end of one word runs into the start of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// "pick it", "make it"
    ConsonantVowel,
    /// "go on", "the end"
    VowelVowel,
    /// "big game", "bus stop"
    SameConsonant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Index of the first word of the pair.
    pub from: usize,
    pub kind: LinkKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sound {
    Vowel,
    Consonant(char),
}

// Words starting with a silent "h".
const SILENT_H: &[&str] = &["hour", "hours", "honest", "honestly", "honor", "honour", "heir"];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn final_sound(letters: &str) -> Option<Sound> {
    let chars: Vec<char> = letters.chars().collect();
    let last = *chars.last()?;

    // silent e: "make", "home". Short words like "the" or "we" end in a vowel sound.
    if last == 'e' && chars.len() > 3 && !is_vowel(chars[chars.len() - 2]) {
        return Some(Sound::Consonant(chars[chars.len() - 2]));
    }

    if is_vowel(last) || matches!(last, 'y' | 'w') {
        Some(Sound::Vowel)
    } else {
        Some(Sound::Consonant(last))
    }
}

fn initial_sound(letters: &str) -> Option<Sound> {
    let first = letters.chars().next()?;

    if is_vowel(first) || SILENT_H.contains(&letters) {
        Some(Sound::Vowel)
    } else {
        Some(Sound::Consonant(first))
    }
}

pub fn link_between(first: &Word, second: &Word) -> Option<LinkKind> {
    if first.trailing_pause().is_some() {
        return None;
    }

    match (final_sound(first.letters())?, initial_sound(second.letters())?) {
        (Sound::Consonant(_), Sound::Vowel) => Some(LinkKind::ConsonantVowel),
        (Sound::Vowel, Sound::Vowel) => Some(LinkKind::VowelVowel),
        (Sound::Consonant(a), Sound::Consonant(b)) if a == b => Some(LinkKind::SameConsonant),
        _ => None,
    }
}

pub fn detect_links(words: &[Word]) -> Vec<Link> {
    words
        .windows(2)
        .enumerate()
        .filter_map(|(from, pair)| link_between(&pair[0], &pair[1]).map(|kind| Link { from, kind }))
        .collect()
}
