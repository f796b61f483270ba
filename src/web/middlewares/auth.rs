use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::{Cookie, Cookies};

use crate::{
    auth,
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{AppState, RequestContext, context::AuthenticatedUser, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";

/// Resolves the session cookie into a `RequestContext`. Requests without a
/// usable session continue anonymously, handlers decide whether that's a 401.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(token) => token.value().to_string(),
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
            return Ok(next.run(req).await);
        }
    };

    let id = match auth::process_token(&token, state.settings().jwt()) {
        Ok(data) => data.claims.user_id(),
        Err(e) => {
            tracing::debug!("dropping invalid session cookie: {}", e);
            None
        }
    };

    let Some(id) = id else {
        cookies.remove(removal_cookie());
        req.extensions_mut().insert(RequestContext::new(None));
        return Ok(next.run(req).await);
    };

    let found = UserEntity::find_by_id(state.pool(), &AuthenticatedUser::admin(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let ctx = match found {
        Some(user) => RequestContext::new(Some(AuthenticatedUser::new(id, user.role()))),
        // account deleted while the session was alive
        None => {
            cookies.remove(removal_cookie());
            RequestContext::new(None)
        }
    };

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_TOKEN, token);
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_TOKEN, "");
    cookie.set_path("/");
    cookie
}
