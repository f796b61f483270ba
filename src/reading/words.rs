/// A whitespace separated token of the source text.
///
/// Offsets are measured in UTF-16 code units because that is what speech
/// engines report in their boundary events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    text: String,
    offset: usize,
    length: usize,
    byte_offset: usize,
    letters: String,
}

/// Punctuation at the end of a word that makes the speaker pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Clause,
    Sentence,
}

impl Word {
    fn new(text: &str, offset: usize, byte_offset: usize) -> Self {
        Self {
            text: text.to_string(),
            offset,
            length: text.encode_utf16().count(),
            byte_offset,
            letters: text
                .chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(char::to_lowercase)
                .collect(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Lowercase alphabetic characters only.
    pub fn letters(&self) -> &str {
        &self.letters
    }

    pub fn trailing_pause(&self) -> Option<Pause> {
        let last = self
            .text
            .chars()
            .rev()
            .find(|c| !matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}'))?;

        match last {
            '.' | '!' | '?' | '\u{2026}' => Some(Pause::Sentence),
            ',' | ';' | ':' | '-' | '\u{2013}' | '\u{2014}' => Some(Pause::Clause),
            _ => None,
        }
    }
}

pub fn split_words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut utf16_pos = 0;

    for (byte_pos, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some((byte_start, utf16_start)) = start.take() {
                words.push(Word::new(&text[byte_start..byte_pos], utf16_start, byte_start));
            }
        } else if start.is_none() {
            start = Some((byte_pos, utf16_pos));
        }
        utf16_pos += c.len_utf16();
    }

    if let Some((byte_start, utf16_start)) = start {
        words.push(Word::new(&text[byte_start..], utf16_start, byte_start));
    }

    words
}

/// Index of the word containing `offset`, or of the next word when the offset
/// points at whitespace. `None` past the last word.
pub fn word_index_at(words: &[Word], offset: usize) -> Option<usize> {
    let idx = words.partition_point(|w| w.end() <= offset);
    (idx < words.len()).then_some(idx)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_tracks_offsets() {
        let words = split_words("  Hello there,\tfriend!");
        let texts: Vec<_> = words.iter().map(Word::text).collect();
        assert_eq!(texts, vec!["Hello", "there,", "friend!"]);
        assert_eq!(words[0].offset(), 2);
        assert_eq!(words[1].offset(), 8);
        assert_eq!(words[2].offset(), 15);
        assert_eq!(words[2].letters(), "friend");
    }

    #[test]
    fn offsets_are_utf16() {
        // the emoji takes two UTF-16 units and four bytes
        let words = split_words("😀 café ok");
        assert_eq!(words[1].offset(), 3);
        assert_eq!(words[1].byte_offset(), 5);
        assert_eq!(words[1].length(), 4);
        assert_eq!(words[2].offset(), 8);
    }

    #[test]
    fn empty_text() {
        assert!(split_words("").is_empty());
        assert!(split_words("   \n").is_empty());
    }

    #[test]
    fn index_lookup() {
        let words = split_words("one two  three");
        assert_eq!(word_index_at(&words, 0), Some(0));
        assert_eq!(word_index_at(&words, 2), Some(0));
        // whitespace maps forward
        assert_eq!(word_index_at(&words, 3), Some(1));
        assert_eq!(word_index_at(&words, 8), Some(2));
        assert_eq!(word_index_at(&words, 9), Some(2));
        assert_eq!(word_index_at(&words, 14), None);
    }

    #[test]
    fn trailing_pause_detection() {
        let words = split_words("Wait, what? \"Yes.\" no");
        assert_eq!(words[0].trailing_pause(), Some(Pause::Clause));
        assert_eq!(words[1].trailing_pause(), Some(Pause::Sentence));
        assert_eq!(words[2].trailing_pause(), Some(Pause::Sentence));
        assert_eq!(words[3].trailing_pause(), None);
    }
}
