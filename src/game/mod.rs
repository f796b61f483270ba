//! Progression rules: experience points, levels, streaks and answer grading.
//!
//! Everything here is pure. The database layer feeds stored values in and
//! writes the results back.

mod xp;
pub use xp::{PASS_SCORE, is_passing, lesson_xp};

mod level;
pub use level::{XP_PER_LEVEL, level_for_xp, xp_to_next_level};

mod streak;
pub use streak::{effective_streak, next_streak};

pub mod grading;
