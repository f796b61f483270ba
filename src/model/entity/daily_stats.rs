use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Activity of one user on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct DailyStats {
    #[serde(skip)]
    user_id: Uuid,
    day: NaiveDate,
    xp_earned: i32,
    lessons_completed: i32,
    exercises_answered: i32,
    correct_answers: i32,
    /// Seconds.
    time_spent: i32,
}

/// Amounts added to a day's stats.
#[derive(Debug, Default, Clone, Copy)]
pub struct DailyStatsDelta {
    pub xp_earned: i32,
    pub lessons_completed: i32,
    pub exercises_answered: i32,
    pub correct_answers: i32,
    pub time_spent: i32,
}

impl ResourceTyped for DailyStats {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::DailyStats
    }
}

impl DailyStats {
    pub fn empty(user_id: Uuid, day: NaiveDate) -> Self {
        Self {
            user_id,
            day,
            xp_earned: 0,
            lessons_completed: 0,
            exercises_answered: 0,
            correct_answers: 0,
            time_spent: 0,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn xp_earned(&self) -> i32 {
        self.xp_earned
    }

    pub fn lessons_completed(&self) -> i32 {
        self.lessons_completed
    }

    pub fn exercises_answered(&self) -> i32 {
        self.exercises_answered
    }

    pub fn correct_answers(&self) -> i32 {
        self.correct_answers
    }

    pub fn time_spent(&self) -> i32 {
        self.time_spent
    }

    pub async fn find(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        day: NaiveDate,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query_as("SELECT * FROM daily_stats WHERE user_id = $1 AND day = $2")
            .bind(actor.user_id())
            .bind(day)
            .fetch_optional(mm.executor())
            .await?;

        Ok(result.unwrap_or_else(|| Self::empty(actor.user_id(), day)))
    }

    /// Days from `since` on that have any activity, newest first.
    pub async fn since(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        since: NaiveDate,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM daily_stats WHERE user_id = $1 AND day >= $2 ORDER BY day DESC",
        )
        .bind(actor.user_id())
        .bind(since)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn add(
        conn: &mut PgConnection,
        user_id: Uuid,
        day: NaiveDate,
        delta: DailyStatsDelta,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO daily_stats (
                user_id, day, xp_earned, lessons_completed, exercises_answered, correct_answers, time_spent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, day) DO UPDATE SET
                xp_earned = daily_stats.xp_earned + EXCLUDED.xp_earned,
                lessons_completed = daily_stats.lessons_completed + EXCLUDED.lessons_completed,
                exercises_answered = daily_stats.exercises_answered + EXCLUDED.exercises_answered,
                correct_answers = daily_stats.correct_answers + EXCLUDED.correct_answers,
                time_spent = daily_stats.time_spent + EXCLUDED.time_spent
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(day)
        .bind(delta.xp_earned)
        .bind(delta.lessons_completed)
        .bind(delta.exercises_answered)
        .bind(delta.correct_answers)
        .bind(delta.time_spent)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }
}
