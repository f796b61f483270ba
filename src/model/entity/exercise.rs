use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    MultipleChoice,
    Translation,
    /// Read the prompt out loud, graded on the recognized transcript.
    Reading,
}

impl ExerciseKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "multiple_choice" => Some(Self::MultipleChoice),
            "translation" => Some(Self::Translation),
            "reading" => Some(Self::Reading),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultipleChoice => write!(f, "multiple_choice"),
            Self::Translation => write!(f, "translation"),
            Self::Reading => write!(f, "reading"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Exercise {
    id: Uuid,
    lesson_id: Uuid,
    kind: String,
    prompt: String,
    options: Vec<String>,
    answer: String,
    explanation: String,
    order_index: i32,
}

impl ResourceTyped for Exercise {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Exercise
    }
}

impl Exercise {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    /// The column is constrained to known kinds, anything else reads as
    /// multiple choice.
    pub fn kind(&self) -> ExerciseKind {
        ExerciseKind::parse(&self.kind).unwrap_or(ExerciseKind::MultipleChoice)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ExerciseCreate {
    pub lesson_id: Uuid,
    pub kind: ExerciseKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: Option<String>,
    pub order_index: Option<i32>,
}

#[async_trait]
impl CrudRepository<Exercise, ExerciseCreate, uuid::Uuid> for Exercise {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ExerciseCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO exercises (id, lesson_id, kind, prompt, options, answer, explanation, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.lesson_id)
        .bind(data.kind.to_string())
        .bind(&data.prompt)
        .bind(&data.options)
        .bind(&data.answer)
        .bind(data.explanation.unwrap_or_default())
        .bind(data.order_index.unwrap_or(0))
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ExerciseCreate,
    ) -> DatabaseResult<Self> {
        self.lesson_id = data.lesson_id;
        self.kind = data.kind.to_string();
        self.prompt = data.prompt;
        self.options = data.options;
        self.answer = data.answer;
        if let Some(explanation) = data.explanation {
            self.explanation = explanation;
        }
        if let Some(order_index) = data.order_index {
            self.order_index = order_index;
        }

        sqlx::query(
            r#"
            UPDATE exercises
            SET lesson_id = $1, kind = $2, prompt = $3, options = $4, answer = $5, explanation = $6, order_index = $7
            WHERE id = $8
            "#,
        )
        .bind(self.lesson_id)
        .bind(&self.kind)
        .bind(&self.prompt)
        .bind(&self.options)
        .bind(&self.answer)
        .bind(&self.explanation)
        .bind(self.order_index)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: uuid::Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM exercises WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM exercises ORDER BY lesson_id, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Exercise, ExerciseCreate, Uuid);

impl Exercise {
    pub async fn all_by_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        lesson_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM exercises WHERE lesson_id = $1 ORDER BY order_index, id",
        )
        .bind(lesson_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_names_match_column_values() {
        for kind in [ExerciseKind::MultipleChoice, ExerciseKind::Translation, ExerciseKind::Reading] {
            assert_eq!(ExerciseKind::parse(&kind.to_string()), Some(kind));
        }
        assert_eq!(ExerciseKind::parse("essay"), None);
    }
}
