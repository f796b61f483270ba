use crate::model::entity::DailyStatsDelta;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, entity::DailyStats, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ExerciseAttempt {
    id: Uuid,
    user_id: Uuid,
    exercise_id: Uuid,
    answer: String,
    is_correct: bool,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for ExerciseAttempt {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::ExerciseAttempt
    }
}

impl ExerciseAttempt {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn exercise_id(&self) -> Uuid {
        self.exercise_id
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

pub struct ExerciseAttemptCreate {
    pub exercise_id: Uuid,
    pub answer: String,
    pub is_correct: bool,
}

impl ExerciseAttemptCreate {
    pub fn new(exercise_id: Uuid, answer: String, is_correct: bool) -> Self {
        Self {
            exercise_id,
            answer,
            is_correct,
        }
    }
}

impl ExerciseAttempt {
    /// Stores the attempt and counts it in the actor's stats for `day`.
    pub async fn record(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ExerciseAttemptCreate,
        day: NaiveDate,
    ) -> DatabaseResult<Self> {
        let mut tx = mm.begin().await?;

        let row: Self = sqlx::query_as(
            r#"
            INSERT INTO exercise_attempts (id, user_id, exercise_id, answer, is_correct)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(actor.user_id())
        .bind(data.exercise_id)
        .bind(&data.answer)
        .bind(data.is_correct)
        .fetch_one(&mut *tx)
        .await?;

        let delta = DailyStatsDelta {
            exercises_answered: 1,
            correct_answers: i32::from(data.is_correct),
            ..Default::default()
        };
        DailyStats::add(&mut tx, actor.user_id(), day, delta).await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn count(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM exercise_attempts WHERE user_id = $1")
                .bind(actor.user_id())
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }

    pub async fn count_correct(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM exercise_attempts WHERE user_id = $1 AND is_correct = TRUE",
        )
        .bind(actor.user_id())
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }
}
