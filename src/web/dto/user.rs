use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    game,
    model::entity::UserEntity,
    web::{
        Validate, WebResult,
        dto::auth::{validate_password, validate_username},
    },
};

/// Public view of a user, including progression.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub xp: i32,
    pub level: i32,
    pub xp_to_next_level: i32,
    /// Streak as of today, 0 once a day was missed.
    pub streak: i32,
    pub longest_streak: i32,
    pub last_active_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_entity(user: &UserEntity, today: NaiveDate) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            role: user.role().to_string(),
            xp: user.xp(),
            level: user.level(),
            xp_to_next_level: game::xp_to_next_level(user.xp()),
            streak: game::effective_streak(user.streak(), user.last_active_date(), today),
            longest_streak: user.longest_streak(),
            last_active_date: user.last_active_date(),
            created_at: user.created_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserUpdateBody {
    pub username: String,
    /// Keeps the current password when absent.
    pub password: Option<String>,
}

impl Validate for UserUpdateBody {
    fn validate(&self) -> WebResult<()> {
        validate_username(&self.username)?;
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }
}
