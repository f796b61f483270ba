//! Recording a finished lesson run: progress, XP, level, streak and daily
//! stats change together in one transaction.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::game;
use crate::model::entity::{
    DailyStats, DailyStatsDelta, Lesson, LessonWithStatusRow, UserEntity, UserProgress,
    UserProgressAttempt, UserProgression,
};
use crate::model::{DatabaseError, DatabaseResult, ModelManager};
use crate::web::AuthenticatedUser;

#[derive(Debug, Clone, Copy)]
pub struct LessonResult {
    pub lesson_id: Uuid,
    /// Percentage of correct answers, 0..=100.
    pub score: i32,
    /// Seconds.
    pub time_spent: i32,
}

#[derive(Debug)]
pub struct LessonOutcome {
    pub progress: UserProgress,
    pub user: UserEntity,
    pub xp_awarded: i32,
    pub passed: bool,
    /// First passing run of this lesson.
    pub first_completion: bool,
    pub previous_level: i32,
    pub next_lesson_id: Option<Uuid>,
}

impl LessonOutcome {
    pub fn leveled_up(&self) -> bool {
        self.user.level() > self.previous_level
    }
}

/// `Ok(None)` when the lesson doesn't exist.
#[tracing::instrument(skip(mm, actor), fields(user = %actor.user_id()))]
pub async fn record_lesson_result(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    result: LessonResult,
    today: NaiveDate,
) -> DatabaseResult<Option<LessonOutcome>> {
    let mut tx = mm.begin().await?;

    let Some(lesson) = Lesson::find_in_tx(&mut tx, result.lesson_id).await? else {
        return Ok(None);
    };

    // a deleted account with a still valid session
    let user = UserEntity::find_for_update(&mut tx, actor.user_id())
        .await?
        .ok_or(DatabaseError::SqlxError(sqlx::Error::RowNotFound))?;

    let previous = UserProgress::find_for(&mut tx, user.id(), lesson.id()).await?;
    let previous_completions = previous.as_ref().map_or(0, UserProgress::completions);
    let was_completed = previous.as_ref().is_some_and(UserProgress::completed);

    let passed = game::is_passing(result.score);
    let xp_awarded = game::lesson_xp(lesson.xp_reward(), result.score, previous_completions);

    let progress = UserProgress::upsert(
        &mut tx,
        UserProgressAttempt {
            user_id: user.id(),
            lesson_id: lesson.id(),
            score: result.score,
            passed,
            time_spent: result.time_spent,
            xp_awarded,
        },
    )
    .await?;

    let previous_level = user.level();
    let xp = user.xp().saturating_add(xp_awarded);
    let streak = game::next_streak(user.streak(), user.last_active_date(), today);
    let progression = UserProgression {
        xp,
        level: game::level_for_xp(xp),
        streak,
        longest_streak: user.longest_streak().max(streak),
        last_active_date: today,
    };
    let user = user.save_progression(&mut tx, progression).await?;

    let first_completion = passed && !was_completed;
    DailyStats::add(
        &mut tx,
        user.id(),
        today,
        DailyStatsDelta {
            xp_earned: xp_awarded,
            lessons_completed: i32::from(first_completion),
            time_spent: result.time_spent,
            ..Default::default()
        },
    )
    .await?;

    let next_lesson_id =
        LessonWithStatusRow::find_next_uncompleted(&mut tx, user.id(), lesson.id()).await?;

    tx.commit().await?;

    tracing::info!(
        lesson = %lesson.id(),
        score = result.score,
        xp_awarded,
        streak,
        "lesson result recorded"
    );

    Ok(Some(LessonOutcome {
        progress,
        user,
        xp_awarded,
        passed,
        first_completion,
        previous_level,
        next_lesson_id,
    }))
}
