mod common;
use lingoquest::{
    auth::hash_password,
    config::AdminAccount,
    ensure_admin,
    model::{
        CrudRepository,
        entity::{UserEntity, UserEntityCreateUpdate},
    },
    web::{AuthenticatedUser, UserRole, dto::user::UserResponse, middlewares::AUTH_TOKEN},
};
use reqwest::StatusCode;
use serde_json::json;
use tower_cookies::cookie::SameSite;

use crate::common::{
    Action, Flow, login_action, login_admin_action, model_manager, register_action, setup_server,
    setup_test_db,
};

#[tokio::test]
async fn route_register_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(
            register_action("jane", "hunter2")
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
                    assert_eq!(cookie.path(), Some("/"));
                    assert_eq!(cookie.http_only(), Some(true));
                })
                .assert_body(|body| {
                    let user: UserResponse = serde_json::from_str(body).expect("Invalid body format");
                    assert_eq!(user.username, "jane");
                    assert_eq!(user.role, "user");
                    assert_eq!(user.xp, 0);
                    assert_eq!(user.level, 1);
                    assert_eq!(user.streak, 0);
                    assert_eq!(user.xp_to_next_level, 100);
                }),
        )
        .step(
            Action::new("me", "GET", "/api/auth/me")
                .assert_json(|body| assert_eq!(body["username"], "jane")),
        )
        // same name twice
        .step(register_action("jane", "hunter2").with_expect(StatusCode::CONFLICT))
        .step(
            register_action("with space", "hunter2")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("username"))),
        )
        .step(register_action("short", "abc").with_expect(StatusCode::BAD_REQUEST))
        .step(
            Action::new("register_malformed", "POST", "/api/auth/register")
                .with_body(json!({ "username": "nopassword" }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_login_logout_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(register_action("LOGINTEST", "LOGINTEST").with_save_cookies(false))
        .step(
            Action::new("me_anonymous", "GET", "/api/auth/me")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(
            login_action("LOGINTEST", "LOGINTEST")
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.http_only(), Some(true));
                })
                .assert_json(|body| assert_eq!(body["username"], "LOGINTEST")),
        )
        .step(Action::new("me", "GET", "/api/auth/me"))
        .step(Action::new("logout", "POST", "/api/auth/logout"))
        .step(
            Action::new("me_after_logout", "GET", "/api/auth/me")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        // wrong credentials
        .step(
            login_action("LOGINTEST", "WRONGPASSWORD")
                .with_save_cookies(false)
                .with_clear_cookies(true)
                .assert_body(|body| assert!(body.contains("Authentication error")))
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        // non-existing account
        .step(
            login_action("nonexisting", "nvm")
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_body(|body| assert!(body.contains("Authentication error"))),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn garbage_session_cookie_is_anonymous() {
    let pool = setup_test_db().await;
    let server = setup_server(&pool).await;

    let resp = server
        .get("/api/auth/me")
        .add_cookie(tower_cookies::Cookie::new(AUTH_TOKEN, "not-a-jwt"))
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    drop(pool);
}

#[tokio::test]
async fn route_user_list_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(register_action("FOOBAR", "FOOBAZ"))
        .step(
            Action::new("user_list", "GET", "/api/users/page")
                .with_param("limit", "5")
                .with_param("offset", "0")
                .assert_body(|body| assert!(body.contains("forbidden")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(login_admin_action())
        .step(
            Action::new("user_list", "GET", "/api/users/page")
                .with_param("limit", "5")
                .with_param("offset", "0")
                .assert_json(|body| {
                    // admin and FOOBAR
                    assert_eq!(body["total"], 2);
                    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
                    assert!(body["items"][0].get("password_hash").is_none());
                    assert_eq!(body["items"][0]["level"], 1);
                }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_user_update_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(register_action("FOOBAR", "FOOBAZ").with_save_cookies(false))
        .step(register_action("FOOBAR2", "FOOBAZ2"))
        .step(
            Action::new("user_get", "GET", "/api/user")
                .assert_json(|body| assert_eq!(body["username"], "FOOBAR2")),
        )
        // rename self
        .step(
            Action::new("user_update", "PUT", "/api/user")
                .with_body(json!({ "username": "FOOBAR3" }))
                .assert_json(|body| assert_eq!(body["username"], "FOOBAR3")),
        )
        // the old password survives a rename
        .step(login_action("FOOBAR3", "FOOBAZ2").with_clear_cookies(true))
        // taken by somebody else
        .step(
            Action::new("user_update_conflict", "PUT", "/api/user")
                .with_body(json!({ "username": "FOOBAR" }))
                .with_expect(StatusCode::CONFLICT),
        )
        .step(
            Action::new("user_update_password", "PUT", "/api/user")
                .with_body(json!({ "username": "FOOBAR3", "password": "new-secret" })),
        )
        .step(
            login_action("FOOBAR3", "FOOBAZ2")
                .with_clear_cookies(true)
                .with_save_cookies(false)
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(login_action("FOOBAR3", "new-secret"))
        .step(
            Action::new("user_update_invalid", "PUT", "/api/user")
                .with_body(json!({ "username": "" }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_user_delete_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(
            Action::new("user_delete_anonymous", "DELETE", "/api/user")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(register_action("FOOBAR", "FOOBAZ"))
        .step(Action::new("user_delete", "DELETE", "/api/user"))
        .step(Action::new("user_get", "GET", "/api/user").with_expect(StatusCode::UNAUTHORIZED))
        .step(
            login_action("FOOBAR", "FOOBAZ")
                .with_clear_cookies(true)
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn configured_admin_never_takes_over_a_learner_test() {
    let db = setup_test_db().await;
    let mm = model_manager(&db);
    let actor = AuthenticatedUser::admin();

    UserEntity::create(
        &mm,
        &actor,
        UserEntityCreateUpdate {
            username: "headmaster".to_string(),
            password_hash: hash_password("learner-password").unwrap(),
        },
    )
    .await
    .unwrap();

    let account: AdminAccount =
        toml::from_str("username = \"headmaster\"\npassword = \"operator-password\"").unwrap();
    ensure_admin(&mm, &account).await.unwrap();

    let learner = UserEntity::find_by_username(&mm, &actor, "headmaster")
        .await
        .unwrap()
        .expect("learner kept");
    assert_eq!(learner.role(), UserRole::User);

    // a free name is created as admin, and a second boot keeps it
    let account: AdminAccount =
        toml::from_str("username = \"operator\"\npassword = \"operator-password\"").unwrap();
    ensure_admin(&mm, &account).await.unwrap();
    ensure_admin(&mm, &account).await.unwrap();

    let admin = UserEntity::find_by_username(&mm, &actor, "operator")
        .await
        .unwrap()
        .expect("admin created");
    assert_eq!(admin.role(), UserRole::Admin);
}
