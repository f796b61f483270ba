use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tower_cookies::Cookies;

use crate::{
    auth::{self, UserClaims, hash_password, verify_password},
    model::{
        CrudRepository, ResourceTyped,
        entity::{UserEntity, UserEntityCreateUpdate},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, ValidJson, WebError, WebResult,
        dto::{
            auth::{CredentialsBody, LoginBody},
            user::UserResponse,
        },
        error::ErrorResponse,
        middlewares::{self, removal_cookie, session_cookie},
        routes::today,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let protected = Router::new()
        .route("/me", get(auth_me_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ));

    Router::new()
        .route("/register", post(auth_register_handler))
        .route("/login", post(auth_login_handler))
        .route("/logout", post(auth_logout_handler))
        .merge(protected)
        .with_state(state)
}

fn start_session(state: &AppState, cookies: &Cookies, user: &UserEntity) -> WebResult<()> {
    let app = state.settings();
    let claims = UserClaims::for_user(user.id(), app.session_ttl());
    let token = auth::generate_token(claims, app.jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;
    cookies.add(session_cookie(token));
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsBody,
    description = "Creates a new learner account and signs it in",
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid username or password", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
async fn auth_register_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidJson(payload): ValidJson<CredentialsBody>,
) -> WebResult<impl IntoResponse> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_username(state.pool(), &admin, &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    if found.is_some() {
        return Err(WebError::registration_conflict());
    }

    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;
    let created = UserEntity::create(
        state.pool(),
        &admin,
        UserEntityCreateUpdate {
            username: payload.username,
            password_hash: hash,
        },
    )
    .await
    .map_err(|e| {
        // lost a race against another registration of the same name
        if e.is_unique_violation() {
            WebError::registration_conflict()
        } else {
            WebError::resource_fetch_error(UserEntity::get_resource_type(), e)
        }
    })?;

    start_session(&state, &cookies, &created)?;
    tracing::info!(user = %created.id(), "user registered");

    Ok((StatusCode::OK, Json(UserResponse::from_entity(&created, today()))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginBody,
    description = "Signs a user in and sets the session cookie",
    responses(
        (status = 200, description = "Signed in", body = UserResponse),
        (status = 401, description = "Unknown user or wrong password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
async fn auth_login_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidJson(payload): ValidJson<LoginBody>,
) -> WebResult<impl IntoResponse> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_username(state.pool(), &admin, &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_invalid_credentials)?;

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;

    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    start_session(&state, &cookies, &found)?;

    Ok((StatusCode::OK, Json(UserResponse::from_entity(&found, today()))))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    description = "Removes the session cookie",
    responses(
        (status = 200, description = "Signed out"),
    ),
    tag = "auth"
)]
async fn auth_logout_handler(cookies: Cookies) -> impl IntoResponse {
    cookies.remove(removal_cookie());
    StatusCode::OK
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    description = "Returns the signed in user",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth",
    security(
        ("cookie" = [])
    )
)]
async fn auth_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let found = UserEntity::find_by_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_required)?;

    Ok((StatusCode::OK, Json(UserResponse::from_entity(&found, today()))))
}
