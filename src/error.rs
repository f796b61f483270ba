use thiserror::Error;
use tracing::error;
use tracing_error::SpanTrace;

/// Failures that stop the server or the CLI before or while serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot bind or serve: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("database unavailable: {0}")]
    Database(#[from] crate::model::DatabaseError),
    #[error("credential error: {0}")]
    Crypt(#[from] crate::auth::CryptError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

pub async fn run_with_error_handler<F, T>(run: F) -> T
where
    F: AsyncFn() -> AppResult<T>,
    T: Send + Sync,
{
    match run().await {
        Ok(value) => value,
        Err(e) => {
            log_error(&e);
            std::process::exit(1);
        }
    }
}

/// Logs an error along with the spans it happened in.
pub fn log_error<E: std::error::Error>(error: &E) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}
