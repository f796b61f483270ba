use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::{
    model::{
        ResourceTyped,
        entity::{DailyStats, ExerciseAttempt, UserProgress},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::stats::{DailyStatsResponse, HistoryQuery, StatsSummaryResponse, history_for},
        error::ErrorResponse,
        middlewares,
        routes::today,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/daily", get(stats_daily_handler))
        .route("/history", get(stats_history_handler))
        .route("/summary", get(stats_summary_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/stats/daily",
    description = "Today's activity of the signed in user",
    responses(
        (status = 200, description = "Today's stats, zeroes when idle", body = DailyStatsResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "stats"
)]
async fn stats_daily_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let stats = DailyStats::find(state.pool(), user, today())
        .await
        .map_err(|e| WebError::resource_fetch_error(DailyStats::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(DailyStatsResponse::from(&stats))))
}

#[utoipa::path(
    get,
    path = "/api/stats/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "One entry per day, oldest first", body = Vec<DailyStatsResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "stats"
)]
async fn stats_history_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let today = today();
    let days = query.days();

    let since = today - chrono::Duration::days(days - 1);
    let stats = DailyStats::since(state.pool(), user, since)
        .await
        .map_err(|e| WebError::resource_fetch_error(DailyStats::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(history_for(&stats, today, days))))
}

#[utoipa::path(
    get,
    path = "/api/stats/summary",
    description = "All time totals of the signed in user",
    responses(
        (status = 200, description = "Totals", body = StatsSummaryResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "stats"
)]
async fn stats_summary_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let (lessons_completed, answered, correct) = tokio::try_join!(
        UserProgress::count_completed(state.pool(), user),
        ExerciseAttempt::count(state.pool(), user),
        ExerciseAttempt::count_correct(state.pool(), user),
    )
    .map_err(|e| WebError::resource_fetch_error(DailyStats::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(StatsSummaryResponse::new(lessons_completed, answered, correct)),
    ))
}
