use crate::config::AdminAccount;
use crate::model::entity::{UserEntity, UserEntityCreateUpdate};
use crate::model::{CrudRepository, DbConnection, ModelManager};
use crate::utils::signal::shutdown_signal;
use crate::web::{AuthenticatedUser, UserRole};
use crate::{error::AppResult, web::AppState};
use axum::Router;
use tokio::net::TcpListener;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod auth;
pub mod error;
pub mod game;
pub mod model;
pub mod reading;
pub mod utils;
pub mod web;

pub static APPLICATION_NAME: &str = "lingoquest";

pub async fn build_server() -> AppResult<(AppState, Router)> {
    let use_local = cfg!(debug_assertions);
    let config = Config::get_or_init(use_local).await;

    let db = DbConnection::connect(config.app().database_uri())?;
    db.migrate().await?;

    build_with(db, config).await
}

/// Same as `build_server`, on an already migrated pool. Reads the local config.
pub async fn build_server_with_pool(db: DbConnection) -> AppResult<(AppState, Router)> {
    let config = Config::get_or_init(true).await;
    build_with(db, config).await
}

async fn build_with(db: DbConnection, config: &'static Config) -> AppResult<(AppState, Router)> {
    let mm = ModelManager::new(db);
    if let Some(admin) = config.app().admin() {
        ensure_admin(&mm, admin).await?;
    }

    let state = AppState::new(mm, config.app());
    let app = web::routes::build_app(state.clone(), config);
    Ok((state, app))
}

/// Creates the configured admin account when its name is still free.
///
/// An existing admin is left as is. An existing learner with that name is
/// never promoted, an operator has to pick another name or use the CLI.
#[tracing::instrument(skip_all, fields(username = account.username()))]
pub async fn ensure_admin(mm: &ModelManager, account: &AdminAccount) -> AppResult<()> {
    let actor = AuthenticatedUser::admin();

    if let Some(user) = UserEntity::find_by_username(mm, &actor, account.username()).await? {
        if user.role() != UserRole::Admin {
            tracing::error!("configured admin name belongs to a learner, not promoting it");
        }
        return Ok(());
    }

    let password_hash = auth::hash_password(account.password())?;
    let created = UserEntity::create(
        mm,
        &actor,
        UserEntityCreateUpdate {
            username: account.username().to_string(),
            password_hash,
        },
    )
    .await?;
    created.set_role(mm, &actor, UserRole::Admin).await?;
    tracing::info!("admin account created");
    Ok(())
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let (_, app) = build_server().await?;
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("{} is listening at: {}", APPLICATION_NAME, config.host().bindto());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
