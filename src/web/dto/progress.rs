use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    model::{
        completion::{LessonOutcome, LessonResult},
        entity::UserProgress,
    },
    web::{Validate, WebError, WebResult, dto::user::UserResponse},
};

/// Longest run we accept for a single lesson, in seconds.
pub const MAX_TIME_SPENT: i32 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProgressSubmitRequest {
    pub lesson_id: Uuid,
    /// Percentage of correct answers.
    pub score: i32,
    /// Seconds spent on the lesson.
    #[serde(default)]
    pub time_spent: i32,
}

impl Validate for ProgressSubmitRequest {
    fn validate(&self) -> WebResult<()> {
        if !(0..=100).contains(&self.score) {
            return Err(WebError::invalid_field("score", "must be between 0 and 100"));
        }
        if !(0..=MAX_TIME_SPENT).contains(&self.time_spent) {
            return Err(WebError::invalid_field(
                "time_spent",
                format!("must be between 0 and {MAX_TIME_SPENT}"),
            ));
        }
        Ok(())
    }
}

impl From<&ProgressSubmitRequest> for LessonResult {
    fn from(req: &ProgressSubmitRequest) -> Self {
        Self {
            lesson_id: req.lesson_id,
            score: req.score,
            time_spent: req.time_spent,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProgressOutcomeResponse {
    pub progress: UserProgress,
    pub user: UserResponse,
    pub xp_awarded: i32,
    pub passed: bool,
    pub first_completion: bool,
    pub leveled_up: bool,
    pub next_lesson_id: Option<Uuid>,
}

impl ProgressOutcomeResponse {
    pub fn from_outcome(outcome: LessonOutcome, today: chrono::NaiveDate) -> Self {
        let leveled_up = outcome.leveled_up();
        Self {
            user: UserResponse::from_entity(&outcome.user, today),
            progress: outcome.progress,
            xp_awarded: outcome.xp_awarded,
            passed: outcome.passed,
            first_completion: outcome.first_completion,
            leveled_up,
            next_lesson_id: outcome.next_lesson_id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn submit(score: i32, time_spent: i32) -> ProgressSubmitRequest {
        ProgressSubmitRequest {
            lesson_id: Uuid::new_v4(),
            score,
            time_spent,
        }
    }

    #[test]
    fn score_must_be_a_percentage() {
        assert!(submit(0, 10).validate().is_ok());
        assert!(submit(100, 10).validate().is_ok());
        assert!(submit(101, 10).validate().is_err());
        assert!(submit(-1, 10).validate().is_err());
    }

    #[test]
    fn negative_time_is_rejected() {
        assert!(submit(80, -5).validate().is_err());
    }

    #[test]
    fn time_spent_defaults_to_zero() {
        let body: ProgressSubmitRequest = serde_json::from_str(&format!(
            r#"{{"lesson_id":"{}","score":90}}"#,
            Uuid::nil()
        ))
        .unwrap();
        assert_eq!(body.time_spent, 0);
    }
}
