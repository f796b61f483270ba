use serde::{Deserialize, Serialize};

use crate::web::{Validate, WebError, WebResult};

pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 4;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CredentialsBody {
    pub username: String,
    pub password: String,
}

/// Login accepts anything well formed, wrong credentials are a 401.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

impl Validate for LoginBody {
    fn validate(&self) -> WebResult<()> {
        Ok(())
    }
}

pub fn validate_username(username: &str) -> WebResult<()> {
    let len = username.chars().count();
    if len == 0 || len > USERNAME_MAX_LEN {
        return Err(WebError::invalid_field(
            "username",
            format!("must be 1 to {USERNAME_MAX_LEN} characters long"),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(WebError::invalid_field(
            "username",
            "may only contain letters, digits, `_`, `-` and `.`",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> WebResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(WebError::invalid_field(
            "password",
            format!("must be at least {PASSWORD_MIN_LEN} characters long"),
        ));
    }
    Ok(())
}

impl Validate for CredentialsBody {
    fn validate(&self) -> WebResult<()> {
        validate_username(&self.username)?;
        validate_password(&self.password)
    }
}
