use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    game::grading::{check_choice, check_translation, score_reading},
    model::{
        CrudRepository, ResourceTyped, check_access,
        entity::{
            DIFFICULTIES, Exercise, ExerciseAttempt, ExerciseAttemptCreate, ExerciseKind, Lesson,
            LessonCreate, LessonFilter, LessonWithStatusRow,
        },
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, ValidJson, WebError, WebResult,
        dto::lessons::{
            ExerciseBody, ExerciseCheckRequest, ExerciseCheckResponse, ExerciseResponse,
            LessonBody, LessonDetailResponse, LessonListQuery, LessonSummary,
        },
        error::ErrorResponse,
        middlewares,
        routes::today,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(lessons_list_handler).post(lessons_create_handler))
        .route(
            "/{id}",
            get(lessons_get_handler)
                .put(lessons_update_handler)
                .delete(lessons_delete_handler),
        )
        .route("/{id}/exercises", post(exercises_create_handler))
        .route(
            "/{id}/exercises/{exercise_id}",
            put(exercises_update_handler).delete(exercises_delete_handler),
        )
        .route("/{id}/exercises/{exercise_id}/check", post(exercises_check_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

/// Lesson by id for a content change, admins only.
async fn find_lesson_for_edit(
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
) -> WebResult<Lesson> {
    let lesson = Lesson::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    check_access(user, &lesson)
        .map_err(|e| WebError::resource_access_error(Lesson::get_resource_type(), e))?;

    Ok(lesson)
}

/// Exercise by id, 404 unless it belongs to the lesson in the path.
async fn find_exercise(
    state: &AppState,
    user: &AuthenticatedUser,
    lesson_id: Uuid,
    exercise_id: Uuid,
) -> WebResult<Exercise> {
    Exercise::find_by_id(state.pool(), user, exercise_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?
        .filter(|exercise| exercise.lesson_id() == lesson_id)
        .ok_or_else(|| WebError::resource_not_found(Exercise::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/api/lessons",
    description = "Lists lessons with the completion state of the signed in user",
    params(LessonListQuery),
    responses(
        (status = 200, description = "Lessons", body = Vec<LessonSummary>),
        (status = 400, description = "Unknown difficulty", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn lessons_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<LessonListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if let Some(difficulty) = &query.difficulty {
        if !DIFFICULTIES.contains(&difficulty.as_str()) {
            return Err(WebError::invalid_field(
                "difficulty",
                format!("must be one of {}", DIFFICULTIES.join(", ")),
            ));
        }
    }

    let filter = LessonFilter {
        category: query.category.map(|c| c.trim().to_lowercase()),
        difficulty: query.difficulty,
    };

    let lessons: Vec<LessonSummary> = LessonWithStatusRow::list(state.pool(), user, &filter)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .into_iter()
        .map(LessonSummary::from)
        .collect();

    Ok((StatusCode::OK, Json(lessons)))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{lesson_id}",
    description = "Lesson with its exercises, expected answers are not included",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to get")
    ),
    responses(
        (status = 200, description = "Lesson found", body = LessonDetailResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn lessons_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let (lesson, exercises) = tokio::try_join!(
        LessonWithStatusRow::find_by_id(state.pool(), user, id),
        Exercise::all_by_lesson(state.pool(), user, id),
    )
    .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let lesson = lesson.ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    let response = LessonDetailResponse {
        lesson: LessonSummary::from(lesson),
        exercises: exercises.iter().map(ExerciseResponse::from).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = LessonBody,
    responses(
        (status = 200, description = "Lesson created", body = Lesson),
        (status = 400, description = "Invalid lesson", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn lessons_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LessonBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_admin(Lesson::get_resource_type())?;

    let created = Lesson::create(state.pool(), user, LessonCreate::from(payload))
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    tracing::info!(lesson = %created.id(), title = created.title(), "lesson created");
    Ok((StatusCode::OK, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{lesson_id}",
    request_body = LessonBody,
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to update")
    ),
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 400, description = "Invalid lesson", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn lessons_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<LessonBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_admin(Lesson::get_resource_type())?;
    let lesson = find_lesson_for_edit(&state, user, id).await?;

    let updated = lesson
        .update(state.pool(), user, LessonCreate::from(payload))
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{lesson_id}",
    description = "Deletes a lesson with its exercises and all progress on it",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to delete")
    ),
    responses(
        (status = 200, description = "Lesson deleted"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn lessons_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_admin(Lesson::get_resource_type())?;
    let lesson = find_lesson_for_edit(&state, user, id).await?;

    lesson
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    tracing::info!(lesson = %id, "lesson deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/lessons/{lesson_id}/exercises",
    request_body = ExerciseBody,
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to add the exercise to")
    ),
    responses(
        (status = 200, description = "Exercise created", body = Exercise),
        (status = 400, description = "Invalid exercise", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn exercises_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<ExerciseBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_admin(Exercise::get_resource_type())?;
    let lesson = find_lesson_for_edit(&state, user, id).await?;

    let created = Exercise::create(state.pool(), user, payload.into_create(lesson.id()))
        .await
        .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{lesson_id}/exercises/{exercise_id}",
    request_body = ExerciseBody,
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson"),
        ("exercise_id" = Uuid, Path, description = "ID of the exercise to update")
    ),
    responses(
        (status = 200, description = "Exercise updated", body = Exercise),
        (status = 400, description = "Invalid exercise", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn exercises_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(Uuid, Uuid)>,
    ValidJson(payload): ValidJson<ExerciseBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_admin(Exercise::get_resource_type())?;
    let exercise = find_exercise(&state, user, id, exercise_id).await?;

    let updated = exercise
        .update(state.pool(), user, payload.into_create(id))
        .await
        .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{lesson_id}/exercises/{exercise_id}",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson"),
        ("exercise_id" = Uuid, Path, description = "ID of the exercise to delete")
    ),
    responses(
        (status = 200, description = "Exercise deleted"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn exercises_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(Uuid, Uuid)>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_admin(Exercise::get_resource_type())?;
    let exercise = find_exercise(&state, user, id, exercise_id).await?;

    exercise
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/lessons/{lesson_id}/exercises/{exercise_id}/check",
    description = "Grades an answer and records the attempt in today's stats",
    request_body = ExerciseCheckRequest,
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson"),
        ("exercise_id" = Uuid, Path, description = "ID of the exercise to answer")
    ),
    responses(
        (status = 200, description = "Answer graded", body = ExerciseCheckResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
async fn exercises_check_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(Uuid, Uuid)>,
    ValidJson(payload): ValidJson<ExerciseCheckRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let exercise = find_exercise(&state, user, id, exercise_id).await?;

    let (correct, reading) = match exercise.kind() {
        ExerciseKind::MultipleChoice => (check_choice(exercise.answer(), &payload.answer), None),
        ExerciseKind::Translation => (check_translation(exercise.answer(), &payload.answer), None),
        ExerciseKind::Reading => {
            let score = score_reading(exercise.answer(), &payload.answer);
            (score.is_passing(), Some(score))
        }
    };

    ExerciseAttempt::record(
        state.pool(),
        user,
        ExerciseAttemptCreate::new(exercise.id(), payload.answer, correct),
        today(),
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(ExerciseAttempt::get_resource_type(), e))?;

    let response = ExerciseCheckResponse {
        correct,
        expected: (!correct).then(|| exercise.answer().to_string()),
        explanation: exercise.explanation().to_string(),
        reading,
    };

    Ok((StatusCode::OK, Json(response)))
}
