use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod lessons;
pub mod progress;
pub mod reading;
pub mod stats;
pub mod user;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Calendar day used for streaks and daily stats.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/auth", auth::routes(state.clone()))
        .nest("/api", user::routes(state.clone()))
        .nest("/api/lessons", lessons::routes(state.clone()))
        .nest("/api/progress", progress::routes(state.clone()))
        .nest("/api/stats", stats::routes(state.clone()))
        .nest("/api/reading", reading::routes(state.clone()))
        .layer(CookieManagerLayer::default())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.app().docs() {
        router = router.merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    router
}
