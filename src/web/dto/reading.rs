use serde::{Deserialize, Serialize};

use crate::{
    reading::DEFAULT_RATE,
    web::{Validate, WebError, WebResult},
};

pub const MAX_TEXT_LEN: usize = 5000;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReadingPlanRequest {
    pub text: String,
    /// Speech rate, clamped to 0.5..=2.0.
    pub rate: Option<f64>,
}

impl ReadingPlanRequest {
    pub fn rate(&self) -> f64 {
        self.rate.unwrap_or(DEFAULT_RATE)
    }
}

impl Validate for ReadingPlanRequest {
    fn validate(&self) -> WebResult<()> {
        if self.text.trim().is_empty() {
            return Err(WebError::invalid_field("text", "must not be empty"));
        }
        if self.text.chars().count() > MAX_TEXT_LEN {
            return Err(WebError::invalid_field(
                "text",
                format!("must be at most {MAX_TEXT_LEN} characters long"),
            ));
        }
        Ok(())
    }
}
