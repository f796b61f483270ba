use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::middlewares::AUTH_TOKEN;

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    AUTH_TOKEN,
                    "JWT token for current user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "LingoQuest", description = "Gamified English lessons"),
    paths(
        crate::web::routes::auth::auth_register_handler,
        crate::web::routes::auth::auth_login_handler,
        crate::web::routes::auth::auth_logout_handler,
        crate::web::routes::auth::auth_me_handler,
        crate::web::routes::user::user_get_handler,
        crate::web::routes::user::user_list_handler,
        crate::web::routes::user::user_update_handler,
        crate::web::routes::user::user_delete_handler,
        crate::web::routes::lessons::lessons_list_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::lessons::lessons_create_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_delete_handler,
        crate::web::routes::lessons::exercises_create_handler,
        crate::web::routes::lessons::exercises_update_handler,
        crate::web::routes::lessons::exercises_delete_handler,
        crate::web::routes::lessons::exercises_check_handler,
        crate::web::routes::progress::progress_submit_handler,
        crate::web::routes::progress::progress_list_handler,
        crate::web::routes::progress::progress_get_handler,
        crate::web::routes::stats::stats_daily_handler,
        crate::web::routes::stats::stats_history_handler,
        crate::web::routes::stats::stats_summary_handler,
        crate::web::routes::reading::reading_plan_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn documents_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/user",
            "/api/lessons/{lesson_id}/exercises/{exercise_id}/check",
            "/api/progress",
            "/api/stats/history",
            "/api/reading/plan",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
