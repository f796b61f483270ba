use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_session_ttl_hours")]
    session_ttl_hours: i64,
    admin: Option<AdminAccount>,
}

/// Admin created on startup when no user with this name exists yet.
/// An existing learner of the same name keeps its role.
#[derive(Debug, Deserialize)]
pub struct AdminAccount {
    username: String,
    password: String,
}

/// One year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

fn default_session_ttl_hours() -> i64 {
    24
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_slice(&bytes)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| ConfigError::InvalidEncoding)?;
        let config: Self = toml::from_str(text)?;
        Ok(config)
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS))
    }

    #[inline]
    pub fn admin(&self) -> Option<&AdminAccount> {
        self.admin.as_ref()
    }
}

impl AdminAccount {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000"); // defaults
    }

    #[test]
    fn optional_keys_have_defaults() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/lingoquest"
            "#,
        )
        .unwrap();

        assert!(!config.app().docs());
        assert_eq!(config.app().session_ttl(), chrono::Duration::hours(24));
        assert!(config.app().admin().is_none());
    }

    #[test]
    fn admin_account_is_parsed() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/lingoquest"
            docs = true
            session_ttl_hours = 2

            [app.admin]
            username = "root"
            password = "hunter2"
            "#,
        )
        .unwrap();

        let admin = config.app().admin().unwrap();
        assert_eq!(admin.username(), "root");
        assert_eq!(admin.password(), "hunter2");
        assert_eq!(config.app().session_ttl(), chrono::Duration::hours(2));
        assert!(config.app().docs());
    }

    #[test]
    fn missing_section_is_an_error() {
        let result = Config::from_slice(b"[host]\nbindto = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }

    #[test]
    fn session_ttl_is_clamped() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/lingoquest"
            session_ttl_hours = 9223372036854775807
            "#,
        )
        .unwrap();
        assert_eq!(
            config.app().session_ttl(),
            chrono::Duration::hours(MAX_SESSION_TTL_HOURS)
        );

        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/lingoquest"
            session_ttl_hours = -5
            "#,
        )
        .unwrap();
        assert_eq!(config.app().session_ttl(), chrono::Duration::hours(1));
    }
}
