use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::web::{WebError, WebResult};

/// Field level checks run after a body was deserialized.
pub trait Validate {
    fn validate(&self) -> WebResult<()>;
}

/// `Json` that rejects malformed bodies and failed validation with a 400.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| WebError::invalid_body(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
