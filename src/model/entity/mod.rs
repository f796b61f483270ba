mod user;
pub use user::{UserEntity, UserEntityCreateUpdate, UserProgression};

mod lesson;
pub use lesson::{
    DEFAULT_XP_REWARD, DIFFICULTIES, Lesson, LessonCreate, LessonFilter, LessonWithStatusRow,
};

mod exercise;
pub use exercise::{Exercise, ExerciseCreate, ExerciseKind};

mod exercise_attempt;
pub use exercise_attempt::{ExerciseAttempt, ExerciseAttemptCreate};

mod user_progress;
pub use user_progress::{UserProgress, UserProgressAttempt};

mod daily_stats;
pub use daily_stats::{DailyStats, DailyStatsDelta};
