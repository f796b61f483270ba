use std::time::Duration;

use super::linking::link_between;
use super::style::{Highlight, WordStyle};
use super::timing::estimate_word_duration;
use super::words::{Word, split_words, word_index_at};

/// How long to wait for the first boundary event before trusting the timer.
pub const BOUNDARY_TIMEOUT: Duration = Duration::from_millis(700);

/// Extra time a word may overrun its estimate before the timer takes over.
pub const BOUNDARY_GRACE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideState {
    Idle,
    Speaking,
    Paused,
    Finished,
}

/// Where highlighting progress comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Speech started, no boundary event seen yet.
    Waiting,
    Boundary,
    /// Estimated timings drive the highlighting.
    Fallback,
}

/// Where to restart speech after a pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePoint {
    pub word_index: usize,
    /// UTF-16 offset of the word in the full text.
    pub offset: usize,
    /// Text to hand to the synthesizer. Boundary offsets reported for it are
    /// relative to its start.
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ReadingGuide {
    text: String,
    words: Vec<Word>,
    durations: Vec<Duration>,
    linked: Vec<bool>,
    state: GuideState,
    mode: SyncMode,
    current: Option<usize>,
    last_completed: Option<usize>,
    // when the current word became active
    anchor: Duration,
    // first word of the utterance being spoken, boundary offsets are relative to it
    segment_start: usize,
}

impl ReadingGuide {
    pub fn new(text: &str, rate: f64) -> Self {
        let words = split_words(text);
        let durations = words
            .iter()
            .map(|w| estimate_word_duration(w, rate))
            .collect();
        let linked = (0..words.len())
            .map(|i| {
                words
                    .get(i + 1)
                    .is_some_and(|next| link_between(&words[i], next).is_some())
            })
            .collect();

        Self {
            text: text.to_string(),
            words,
            durations,
            linked,
            state: GuideState::Idle,
            mode: SyncMode::Waiting,
            current: None,
            last_completed: None,
            anchor: Duration::ZERO,
            segment_start: 0,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn state(&self) -> GuideState {
        self.state
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn last_completed(&self) -> Option<usize> {
        self.last_completed
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.last_completed.is_some_and(|last| index <= last)
    }

    pub fn start(&mut self, now: Duration) {
        self.last_completed = None;
        self.begin_segment(0, now);
    }

    /// Handles a boundary event. `offset` is relative to the utterance that is
    /// currently being spoken. Returns the new current word when it changed.
    pub fn on_boundary(&mut self, offset: usize, now: Duration) -> Option<usize> {
        if self.state != GuideState::Speaking {
            return None;
        }

        let base = self.words.get(self.segment_start)?.offset();
        let index = word_index_at(&self.words, base.checked_add(offset)?)?;

        // late or duplicated events, or the timer already ran ahead
        if self.current.is_some_and(|current| index < current) {
            return None;
        }

        self.mode = SyncMode::Boundary;
        if self.current == Some(index) {
            self.anchor = now;
            return None;
        }

        if index > 0 {
            self.complete_through(index - 1);
        }
        self.current = Some(index);
        self.anchor = now;
        Some(index)
    }

    /// Advances on the estimated schedule when boundary events don't arrive.
    /// Returns the new current word when it changed.
    pub fn tick(&mut self, now: Duration) -> Option<usize> {
        if self.state != GuideState::Speaking {
            return None;
        }

        let current = self.current?;
        match self.mode {
            SyncMode::Waiting => {
                if now.saturating_sub(self.anchor) < BOUNDARY_TIMEOUT {
                    return None;
                }
                tracing::debug!("no word boundary events, switching to timed highlighting");
                self.mode = SyncMode::Fallback;
                self.advance_on_schedule(now)
            }
            SyncMode::Boundary => {
                let deadline = self.anchor + self.durations[current] + BOUNDARY_GRACE;
                if now < deadline {
                    return None;
                }
                tracing::debug!(word = current, "word boundary overdue, switching to timed highlighting");
                self.mode = SyncMode::Fallback;
                self.anchor = now;
                self.advance_one()
            }
            SyncMode::Fallback => self.advance_on_schedule(now),
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.state != GuideState::Speaking {
            return false;
        }
        self.state = GuideState::Paused;
        true
    }

    /// Continues from the word after the last completed one.
    pub fn resume(&mut self, now: Duration) -> Option<ResumePoint> {
        if self.state != GuideState::Paused {
            return None;
        }

        let index = self.last_completed.map_or(0, |last| last + 1);
        if index >= self.words.len() {
            self.finish();
            return None;
        }

        self.begin_segment(index, now);
        let word = &self.words[index];
        Some(ResumePoint {
            word_index: index,
            offset: word.offset(),
            text: self.text[word.byte_offset()..].to_string(),
        })
    }

    /// Speech reported its end. Ignored unless speaking, since engines also
    /// fire it when an utterance is cancelled for a pause.
    pub fn on_end(&mut self) {
        if self.state == GuideState::Speaking {
            self.finish();
        }
    }

    pub fn stop(&mut self) {
        self.state = GuideState::Idle;
        self.mode = SyncMode::Waiting;
        self.current = None;
        self.last_completed = None;
        self.segment_start = 0;
    }

    pub fn style(&self, index: usize) -> WordStyle {
        let highlight = if self.state == GuideState::Finished || self.is_completed(index) {
            Highlight::Completed
        } else if self.current == Some(index) {
            Highlight::Active
        } else {
            Highlight::Pending
        };

        WordStyle {
            highlight,
            linked: self.linked.get(index).copied().unwrap_or(false),
        }
    }

    pub fn styles(&self) -> Vec<WordStyle> {
        (0..self.words.len()).map(|i| self.style(i)).collect()
    }

    fn begin_segment(&mut self, index: usize, now: Duration) {
        if self.words.is_empty() {
            self.finish();
            return;
        }

        self.state = GuideState::Speaking;
        self.mode = SyncMode::Waiting;
        self.current = Some(index);
        self.segment_start = index;
        self.anchor = now;
    }

    fn advance_on_schedule(&mut self, now: Duration) -> Option<usize> {
        let mut changed = None;
        while let Some(current) = self.current {
            let deadline = self.anchor + self.durations[current];
            if now < deadline {
                break;
            }
            self.anchor = deadline;
            changed = self.advance_one().or(changed);
            if self.state == GuideState::Finished {
                break;
            }
        }
        changed
    }

    fn advance_one(&mut self) -> Option<usize> {
        let current = self.current?;
        self.complete_through(current);

        let next = current + 1;
        if next < self.words.len() {
            self.current = Some(next);
            Some(next)
        } else {
            self.finish();
            None
        }
    }

    fn complete_through(&mut self, index: usize) {
        self.last_completed = Some(self.last_completed.map_or(index, |last| last.max(index)));
    }

    fn finish(&mut self) {
        if let Some(last) = self.words.len().checked_sub(1) {
            self.complete_through(last);
        }
        self.current = None;
        self.state = GuideState::Finished;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // every word of "aa bb cc dd" takes 180 + 2 * 55 = 290ms at rate 1.0
    const TEXT: &str = "aa bb cc dd";

    #[test]
    fn boundary_events_drive_highlight() {
        let mut guide = ReadingGuide::new(TEXT, 1.0);
        guide.start(ms(0));
        assert_eq!(guide.current(), Some(0));
        assert_eq!(guide.on_boundary(0, ms(10)), None);
        assert_eq!(guide.mode(), SyncMode::Boundary);

        assert_eq!(guide.on_boundary(3, ms(300)), Some(1));
        assert_eq!(guide.last_completed(), Some(0));

        // skipping a word completes it too
        assert_eq!(guide.on_boundary(9, ms(600)), Some(3));
        assert_eq!(guide.last_completed(), Some(2));

        // stale event is ignored
        assert_eq!(guide.on_boundary(3, ms(650)), None);
        assert_eq!(guide.current(), Some(3));

        guide.on_end();
        assert_eq!(guide.state(), GuideState::Finished);
        assert_eq!(guide.last_completed(), Some(3));
        assert_eq!(guide.current(), None);
    }

    #[test]
    fn out_of_range_boundary_is_ignored_after_resume() {
        let mut guide = ReadingGuide::new(TEXT, 1.0);
        guide.start(ms(0));
        guide.on_boundary(3, ms(300));
        assert!(guide.pause());
        assert!(guide.resume(ms(1000)).is_some());

        let current = guide.current();
        assert_eq!(guide.on_boundary(usize::MAX, ms(1100)), None);
        assert_eq!(guide.current(), current);
    }

    #[test]
    fn falls_back_when_no_boundary_arrives() {
        let mut guide = ReadingGuide::new(TEXT, 1.0);
        guide.start(ms(0));
        assert_eq!(guide.tick(ms(500)), None);
        assert_eq!(guide.mode(), SyncMode::Waiting);

        // timeout reached, catches up on the schedule: 290, 580 passed
        assert_eq!(guide.tick(ms(700)), Some(2));
        assert_eq!(guide.mode(), SyncMode::Fallback);
        assert_eq!(guide.last_completed(), Some(1));

        assert_eq!(guide.tick(ms(869)), None);
        assert_eq!(guide.tick(ms(870)), Some(3));
        assert_eq!(guide.tick(ms(1160)), None);
        assert_eq!(guide.state(), GuideState::Finished);
        assert_eq!(guide.last_completed(), Some(3));
    }

    #[test]
    fn overdue_boundary_switches_to_timer() {
        let mut guide = ReadingGuide::new(TEXT, 1.0);
        guide.start(ms(0));
        guide.on_boundary(0, ms(0));
        // 290 + 400 grace
        assert_eq!(guide.tick(ms(689)), None);
        assert_eq!(guide.tick(ms(690)), Some(1));
        assert_eq!(guide.mode(), SyncMode::Fallback);

        // a late boundary for a later word takes over again
        assert_eq!(guide.on_boundary(6, ms(800)), Some(2));
        assert_eq!(guide.mode(), SyncMode::Boundary);
    }

    #[test]
    fn pause_resume_restarts_after_last_completed() {
        let mut guide = ReadingGuide::new(TEXT, 1.0);
        guide.start(ms(0));
        guide.on_boundary(0, ms(0));
        guide.on_boundary(3, ms(300));
        guide.on_boundary(6, ms(600));
        assert!(guide.pause());
        assert_eq!(guide.state(), GuideState::Paused);

        // cancelled utterance fires its end event, which must not finish the guide
        guide.on_end();
        assert_eq!(guide.state(), GuideState::Paused);
        assert_eq!(guide.tick(ms(5000)), None);

        let resume = guide.resume(ms(10_000)).unwrap();
        assert_eq!(resume.word_index, 2);
        assert_eq!(resume.offset, 6);
        assert_eq!(resume.text, "cc dd");
        assert_eq!(guide.mode(), SyncMode::Waiting);

        // offsets are relative to the resumed utterance now
        assert_eq!(guide.on_boundary(3, ms(10_300)), Some(3));
        assert_eq!(guide.last_completed(), Some(2));
    }

    #[test]
    fn resume_after_everything_completed_finishes() {
        let mut guide = ReadingGuide::new("one", 1.0);
        guide.start(ms(0));
        guide.tick(ms(2000));
        assert_eq!(guide.state(), GuideState::Finished);
        assert!(!guide.pause());
        assert_eq!(guide.resume(ms(3000)), None);
    }

    #[test]
    fn empty_text_finishes_immediately() {
        let mut guide = ReadingGuide::new("   ", 1.0);
        guide.start(ms(0));
        assert_eq!(guide.state(), GuideState::Finished);
        assert_eq!(guide.current(), None);
        assert!(guide.styles().is_empty());
    }

    #[test]
    fn stop_resets() {
        let mut guide = ReadingGuide::new(TEXT, 1.0);
        guide.start(ms(0));
        guide.on_boundary(3, ms(100));
        guide.stop();
        assert_eq!(guide.state(), GuideState::Idle);
        assert_eq!(guide.current(), None);
        assert_eq!(guide.last_completed(), None);
        assert!(guide.styles().iter().all(|s| s.highlight == Highlight::Pending));
    }

    #[test]
    fn styles_follow_state() {
        let mut guide = ReadingGuide::new("pick it up", 1.0);
        guide.start(ms(0));
        guide.on_boundary(5, ms(200));
        let styles = guide.styles();
        assert_eq!(styles[0], WordStyle { highlight: Highlight::Completed, linked: true });
        assert_eq!(styles[1], WordStyle { highlight: Highlight::Active, linked: true });
        assert_eq!(styles[2], WordStyle { highlight: Highlight::Pending, linked: false });
    }
}
