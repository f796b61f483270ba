use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};

use crate::{
    reading::ReadingPlan,
    web::{AppState, ValidJson, WebResult, dto::reading::ReadingPlanRequest, error::ErrorResponse},
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/plan", post(reading_plan_handler))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/reading/plan",
    request_body = ReadingPlanRequest,
    description = "Splits a text into words with UTF-16 offsets, estimated timings and linking sounds",
    responses(
        (status = 200, description = "Reading plan", body = ReadingPlan),
        (status = 400, description = "Empty or too long text", body = ErrorResponse),
    ),
    tag = "reading"
)]
async fn reading_plan_handler(
    ValidJson(payload): ValidJson<ReadingPlanRequest>,
) -> WebResult<impl IntoResponse> {
    let plan = ReadingPlan::new(&payload.text, payload.rate());
    tracing::debug!(words = plan.words.len(), links = plan.linked_pairs(), "reading plan built");

    Ok((StatusCode::OK, Json(plan)))
}
