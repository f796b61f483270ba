//! Reading guide: keeps text highlighting in step with speech synthesis.
//!
//! Speech engines report progress through word boundary events carrying an
//! offset into the spoken text. Those events are unreliable: some voices never
//! send them, some stop halfway, and most engines cannot resume a paused
//! utterance. The guide accepts boundary events when they come and falls back
//! to estimated per-word timings when they don't.
//!
//! Nothing here touches a clock. Callers pass the time elapsed since speech
//! started, which keeps the state machine deterministic.

mod words;
pub use words::{Pause, Word, split_words, word_index_at};

mod linking;
pub use linking::{Link, LinkKind, detect_links, link_between};

mod timing;
pub use timing::{
    BASE_WORD_MS, CLAUSE_PAUSE_MS, DEFAULT_RATE, MAX_RATE, MIN_RATE, PER_LETTER_MS, SENTENCE_PAUSE_MS,
    clamp_rate, estimate_word_duration,
};

mod plan;
pub use plan::{PlannedWord, ReadingPlan};

mod guide;
pub use guide::{BOUNDARY_GRACE, BOUNDARY_TIMEOUT, GuideState, ReadingGuide, ResumePoint, SyncMode};

mod style;
pub use style::{Highlight, WordStyle};
