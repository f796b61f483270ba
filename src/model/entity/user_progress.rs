use crate::model::access::{HasOwner, Owner};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Progress of one user on one lesson.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserProgress {
    id: Uuid,
    user_id: Uuid,
    lesson_id: Uuid,
    completed: bool,
    best_score: i32,
    last_score: i32,
    attempts: i32,
    completions: i32,
    /// Seconds.
    time_spent: i32,
    xp_earned: i32,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl ResourceTyped for UserProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserProgress
    }
}

impl UserProgress {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn best_score(&self) -> i32 {
        self.best_score
    }

    pub fn last_score(&self) -> i32 {
        self.last_score
    }

    pub fn attempts(&self) -> i32 {
        self.attempts
    }

    pub fn completions(&self) -> i32 {
        self.completions
    }

    pub fn time_spent(&self) -> i32 {
        self.time_spent
    }

    pub fn xp_earned(&self) -> i32 {
        self.xp_earned
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

/// One lesson attempt to fold into the stored progress.
#[derive(Debug, Clone, Copy)]
pub struct UserProgressAttempt {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub score: i32,
    pub passed: bool,
    pub time_spent: i32,
    pub xp_awarded: i32,
}

impl UserProgress {
    pub async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM user_progress WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn all_for_user(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM user_progress WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(actor.user_id())
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn count_completed(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_progress WHERE user_id = $1 AND completed = TRUE",
        )
        .bind(actor.user_id())
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn find_for(
        conn: &mut PgConnection,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM user_progress WHERE user_id = $1 AND lesson_id = $2")
                .bind(user_id)
                .bind(lesson_id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(result)
    }

    /// Inserts or folds the attempt into the existing row. Completion is
    /// sticky, best score only grows.
    pub async fn upsert(conn: &mut PgConnection, attempt: UserProgressAttempt) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_progress (
                id, user_id, lesson_id, completed, best_score, last_score,
                attempts, completions, time_spent, xp_earned, completed_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $5,
                1, CASE WHEN $4 THEN 1 ELSE 0 END, $6, $7,
                CASE WHEN $4 THEN now() END, now()
            )
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                completed = user_progress.completed OR EXCLUDED.completed,
                best_score = GREATEST(user_progress.best_score, EXCLUDED.best_score),
                last_score = EXCLUDED.last_score,
                attempts = user_progress.attempts + 1,
                completions = user_progress.completions + EXCLUDED.completions,
                time_spent = user_progress.time_spent + EXCLUDED.time_spent,
                xp_earned = user_progress.xp_earned + EXCLUDED.xp_earned,
                completed_at = COALESCE(user_progress.completed_at, EXCLUDED.completed_at),
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(attempt.user_id)
        .bind(attempt.lesson_id)
        .bind(attempt.passed)
        .bind(attempt.score)
        .bind(attempt.time_spent)
        .bind(attempt.xp_awarded)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }
}

impl HasOwner for UserProgress {
    fn owner(&self) -> Owner {
        Owner::Learner(self.user_id)
    }
}
