use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        ResourceTyped, check_access,
        completion::{LessonResult, record_lesson_result},
        entity::{Lesson, UserProgress},
    },
    web::{
        AppState, RequestContext, ValidJson, WebError, WebResult,
        dto::progress::{ProgressOutcomeResponse, ProgressSubmitRequest},
        error::ErrorResponse,
        middlewares,
        routes::today,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(progress_list_handler).post(progress_submit_handler))
        .route("/{id}", get(progress_get_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/progress",
    request_body = ProgressSubmitRequest,
    description = "Records a finished lesson run, awarding XP and updating the streak",
    responses(
        (status = 200, description = "Result recorded", body = ProgressOutcomeResponse),
        (status = 400, description = "Score or time out of range", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "progress"
)]
async fn progress_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ProgressSubmitRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let today = today();

    let outcome = record_lesson_result(state.pool(), user, LessonResult::from(&payload), today)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserProgress::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    Ok((
        StatusCode::OK,
        Json(ProgressOutcomeResponse::from_outcome(outcome, today)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/progress",
    description = "Progress of the signed in user on every lesson started so far",
    responses(
        (status = 200, description = "Progress rows, most recent first", body = Vec<UserProgress>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "progress"
)]
async fn progress_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let progress = UserProgress::all_for_user(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserProgress::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(progress)))
}

#[utoipa::path(
    get,
    path = "/api/progress/{progress_id}",
    params(
        ("progress_id" = Uuid, Path, description = "ID of the progress row")
    ),
    responses(
        (status = 200, description = "Progress found", body = UserProgress),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Progress of another user", body = ErrorResponse),
        (status = 404, description = "Progress not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "progress"
)]
async fn progress_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let progress = UserProgress::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserProgress::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserProgress::get_resource_type()))?;

    check_access(user, &progress)
        .map_err(|e| WebError::resource_access_error(UserProgress::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(progress)))
}
