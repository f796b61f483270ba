use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use tower_cookies::Cookies;

use crate::{
    auth::hash_password,
    model::{
        CrudRepository, PaginatableRepository, ResourceTyped, check_access,
        entity::{UserEntity, UserEntityCreateUpdate},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, ValidJson, WebError, WebResult,
        dto::user::{UserResponse, UserUpdateBody},
        error::ErrorResponse,
        middlewares::{self, removal_cookie},
        routes::{PaginationQuery, today},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/user",
            get(user_get_handler)
                .put(user_update_handler)
                .delete(user_delete_handler),
        )
        .route("/users/page", get(user_list_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn find_self(state: &AppState, user: &AuthenticatedUser) -> WebResult<UserEntity> {
    let found = UserEntity::find_by_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))?;

    check_access(user, &found)
        .map_err(|e| WebError::resource_access_error(UserEntity::get_resource_type(), e))?;

    Ok(found)
}

#[utoipa::path(
    get,
    path = "/api/user",
    description = "Profile of the signed in user with XP, level and streak",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "user",
    security(
        ("cookie" = [])
    )
)]
async fn user_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let found = find_self(&state, user).await?;

    Ok((StatusCode::OK, Json(UserResponse::from_entity(&found, today()))))
}

#[utoipa::path(
    get,
    path = "/api/users/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Learners with their progression", body = crate::model::Page<UserResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "user",
    security(
        ("cookie" = [])
    )
)]
async fn user_list_handler(
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_admin(UserEntity::get_resource_type())?;

    let users = UserEntity::page(state.pool(), user, page.limit(), page.offset())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let today = today();
    let users = users.map(|found| UserResponse::from_entity(&found, today));

    Ok((StatusCode::OK, Json(users)))
}

#[utoipa::path(
    put,
    path = "/api/user",
    request_body = UserUpdateBody,
    description = "Renames the signed in user, optionally changing the password",
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid username or password", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "user",
    security(
        ("cookie" = [])
    )
)]
async fn user_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<UserUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let found = find_self(&state, user).await?;

    let conflict = UserEntity::find_by_username(state.pool(), user, &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    if conflict.is_some_and(|other| other.id() != found.id()) {
        return Err(WebError::registration_conflict());
    }

    let password_hash = match &payload.password {
        Some(password) => hash_password(password).map_err(WebError::server_crypt_error)?,
        None => String::new(),
    };

    let updated = found
        .update(
            state.pool(),
            user,
            UserEntityCreateUpdate {
                username: payload.username,
                password_hash,
            },
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                WebError::registration_conflict()
            } else {
                WebError::resource_fetch_error(UserEntity::get_resource_type(), e)
            }
        })?;

    Ok((StatusCode::OK, Json(UserResponse::from_entity(&updated, today()))))
}

#[utoipa::path(
    delete,
    path = "/api/user",
    description = "Deletes the signed in user together with its progress",
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "user",
    security(
        ("cookie" = [])
    )
)]
async fn user_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    cookies: Cookies,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let found = find_self(&state, user).await?;

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    cookies.remove(removal_cookie());
    tracing::info!(user = %user.user_id(), "user deleted");

    Ok(StatusCode::OK)
}
