use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    game::grading::ReadingScore,
    model::entity::{
        DIFFICULTIES, Exercise, ExerciseCreate, ExerciseKind, LessonCreate, LessonWithStatusRow,
    },
    web::{Validate, WebError, WebResult},
};

pub const MAX_XP_REWARD: i32 = 1000;

/// Longest accepted answer, authored or submitted, in characters.
pub const MAX_ANSWER_LEN: usize = 2000;

fn validate_answer_len(answer: &str) -> WebResult<()> {
    if answer.chars().count() > MAX_ANSWER_LEN {
        return Err(WebError::invalid_field(
            "answer",
            format!("must be at most {MAX_ANSWER_LEN} characters long"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonSummary {
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

impl From<LessonWithStatusRow> for LessonSummary {
    fn from(row: LessonWithStatusRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            difficulty: row.difficulty,
            xp_reward: row.xp_reward,
            order_index: row.order_index,
            exercise_count: row.exercise_count,
            completed: row.completed,
            best_score: row.best_score,
        }
    }
}

/// Exercise as shown to learners, without the expected answer.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub kind: ExerciseKind,
    pub prompt: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
    pub order_index: i32,
}

impl From<&Exercise> for ExerciseResponse {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id(),
            kind: exercise.kind(),
            prompt: exercise.prompt().to_string(),
            options: exercise.options().to_vec(),
            order_index: exercise.order_index(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonDetailResponse {
    #[serde(flatten)]
    pub lesson: LessonSummary,
    pub exercises: Vec<ExerciseResponse>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LessonListQuery {
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonBody {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: Option<String>,
    pub xp_reward: Option<i32>,
    pub order_index: Option<i32>,
}

impl Validate for LessonBody {
    fn validate(&self) -> WebResult<()> {
        if self.title.trim().is_empty() {
            return Err(WebError::invalid_field("title", "must not be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(WebError::invalid_field("category", "must not be empty"));
        }
        if let Some(difficulty) = &self.difficulty {
            if !DIFFICULTIES.contains(&difficulty.as_str()) {
                return Err(WebError::invalid_field(
                    "difficulty",
                    format!("must be one of {}", DIFFICULTIES.join(", ")),
                ));
            }
        }
        if let Some(xp_reward) = self.xp_reward {
            if !(0..=MAX_XP_REWARD).contains(&xp_reward) {
                return Err(WebError::invalid_field(
                    "xp_reward",
                    format!("must be between 0 and {MAX_XP_REWARD}"),
                ));
            }
        }
        Ok(())
    }
}

impl From<LessonBody> for LessonCreate {
    fn from(body: LessonBody) -> Self {
        Self {
            title: body.title.trim().to_string(),
            description: body.description,
            category: body.category.trim().to_lowercase(),
            difficulty: body.difficulty,
            xp_reward: body.xp_reward,
            order_index: body.order_index,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExerciseBody {
    pub kind: ExerciseKind,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Several accepted translations may be separated by `|`.
    pub answer: String,
    pub explanation: Option<String>,
    pub order_index: Option<i32>,
}

impl Validate for ExerciseBody {
    fn validate(&self) -> WebResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(WebError::invalid_field("prompt", "must not be empty"));
        }
        if self.answer.trim().is_empty() {
            return Err(WebError::invalid_field("answer", "must not be empty"));
        }
        validate_answer_len(&self.answer)?;
        if self.kind == ExerciseKind::MultipleChoice {
            if self.options.len() < 2 {
                return Err(WebError::invalid_field("options", "needs at least two choices"));
            }
            if !self.options.iter().any(|o| o == &self.answer) {
                return Err(WebError::invalid_field("answer", "must be one of the options"));
            }
        }
        Ok(())
    }
}

impl ExerciseBody {
    pub fn into_create(self, lesson_id: Uuid) -> ExerciseCreate {
        ExerciseCreate {
            lesson_id,
            kind: self.kind,
            prompt: self.prompt,
            options: self.options,
            answer: self.answer,
            explanation: self.explanation,
            order_index: self.order_index,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExerciseCheckRequest {
    /// Chosen option, typed translation or speech transcript.
    pub answer: String,
}

impl Validate for ExerciseCheckRequest {
    fn validate(&self) -> WebResult<()> {
        validate_answer_len(&self.answer)
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ExerciseCheckResponse {
    pub correct: bool,
    /// Revealed only after a wrong answer.
    pub expected: Option<String>,
    pub explanation: String,
    /// Only for reading exercises.
    pub reading: Option<ReadingScore>,
}
