use crate::impl_paginatable_for;
use crate::model::access::{HasOwner, Owner};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const DIFFICULTIES: &[&str] = &["beginner", "intermediate", "advanced"];

pub const DEFAULT_XP_REWARD: i32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    difficulty: String,
    xp_reward: i32,
    order_index: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn xp_reward(&self) -> i32 {
        self.xp_reward
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LessonCreate {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: Option<String>,
    pub xp_reward: Option<i32>,
    pub order_index: Option<i32>,
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, uuid::Uuid> for Lesson {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO lessons (id, title, description, category, difficulty, xp_reward, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(data.description.unwrap_or_default())
        .bind(&data.category)
        .bind(data.difficulty.unwrap_or_else(|| DIFFICULTIES[0].to_string()))
        .bind(data.xp_reward.unwrap_or(DEFAULT_XP_REWARD))
        .bind(data.order_index.unwrap_or(0))
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        self.title = data.title;
        self.category = data.category;
        if let Some(description) = data.description {
            self.description = description;
        }
        if let Some(difficulty) = data.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(xp_reward) = data.xp_reward {
            self.xp_reward = xp_reward;
        }
        if let Some(order_index) = data.order_index {
            self.order_index = order_index;
        }

        sqlx::query(
            r#"
            UPDATE lessons
            SET title = $1, description = $2, category = $3, difficulty = $4, xp_reward = $5, order_index = $6
            WHERE id = $7
            "#,
        )
        .bind(&self.title)
        .bind(&self.description)
        .bind(&self.category)
        .bind(&self.difficulty)
        .bind(self.xp_reward)
        .bind(self.order_index)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
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
            "SELECT * FROM lessons ORDER BY category, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Lesson, LessonCreate, Uuid);

impl Lesson {
    pub async fn find_in_tx(conn: &mut PgConnection, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(result)
    }
}

impl HasOwner for Lesson {
    fn owner(&self) -> Owner {
        Owner::Catalog
    }
}

// Utils

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LessonFilter {
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LessonWithStatusRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub xp_reward: i32,
    pub order_index: i32,
    pub exercise_count: i64,
    pub completed: bool,
    pub best_score: i32,
}

impl LessonWithStatusRow {
    pub async fn list(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        filter: &LessonFilter,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                l.id,
                l.title,
                l.description,
                l.category,
                l.difficulty,
                l.xp_reward,
                l.order_index,
                (SELECT COUNT(*) FROM exercises e WHERE e.lesson_id = l.id) AS exercise_count,
                COALESCE(up.completed, FALSE) AS completed,
                COALESCE(up.best_score, 0) AS best_score
            FROM lessons l
            LEFT JOIN user_progress up
                ON up.lesson_id = l.id AND up.user_id = $1
            WHERE ($2::TEXT IS NULL OR l.category = $2)
              AND ($3::TEXT IS NULL OR l.difficulty = $3)
            ORDER BY l.category, l.order_index, l.title
            "#,
        )
        .bind(actor.user_id())
        .bind(filter.category.as_deref())
        .bind(filter.difficulty.as_deref())
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }

    pub async fn find_by_id(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        lesson_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(
            r#"
            SELECT
                l.id,
                l.title,
                l.description,
                l.category,
                l.difficulty,
                l.xp_reward,
                l.order_index,
                (SELECT COUNT(*) FROM exercises e WHERE e.lesson_id = l.id) AS exercise_count,
                COALESCE(up.completed, FALSE) AS completed,
                COALESCE(up.best_score, 0) AS best_score
            FROM lessons l
            LEFT JOIN user_progress up
                ON l.id = up.lesson_id AND up.user_id = $2
            WHERE l.id = $1
            "#,
        )
        .bind(lesson_id)
        .bind(actor.user_id())
        .fetch_optional(mm.executor())
        .await?;

        Ok(row)
    }

    /// Next lesson of the same category the user hasn't completed yet.
    pub async fn find_next_uncompleted(
        conn: &mut PgConnection,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> DatabaseResult<Option<Uuid>> {
        let next = sqlx::query_scalar(
            r#"
            SELECT l.id
            FROM lessons l
            LEFT JOIN user_progress up
                ON up.lesson_id = l.id
                AND up.user_id = $2
            WHERE l.category = (
                SELECT category FROM lessons WHERE id = $1
            )
            AND l.order_index > (
                SELECT order_index FROM lessons WHERE id = $1
            )
            AND COALESCE(up.completed, FALSE) = FALSE
            ORDER BY l.order_index ASC
            LIMIT 1
            "#,
        )
        .bind(lesson_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(next)
    }
}
