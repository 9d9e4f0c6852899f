use std::path::PathBuf;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use tower_sessions::cookie::SameSite;

/// Error raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// Every field except the session secret has a default suitable for local
/// development. Database credentials live in [`DatabaseConfig`] and have no
/// defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from the comma-separated `CORS_ORIGIN` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded photos are written to and served from.
    pub upload_dir: PathBuf,
    /// Largest accepted request body in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Attach the session guard to character write routes (default: `false`).
    pub require_session_for_writes: bool,
    pub session: SessionConfig,
}

/// Session cookie policy.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key material for signing the session cookie. At least 64 bytes.
    /// When absent a random key is generated per process.
    pub secret: Option<String>,
    pub cookie_name: String,
    pub secure: bool,
    pub same_site: SameSite,
    /// Expire sessions after this many idle minutes. `None` keeps the
    /// cookie for the browser session.
    pub idle_timeout_mins: Option<i64>,
}

/// Minimum length of `SESSION_SECRET`, dictated by the cookie signing key.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                  |
    /// |------------------------------|--------------------------|
    /// | `HOST`                       | `0.0.0.0`                |
    /// | `PORT`                       | `5000`                   |
    /// | `CORS_ORIGIN`                | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                     |
    /// | `UPLOAD_DIR`                 | `uploads`                |
    /// | `MAX_UPLOAD_BYTES`           | `10485760`               |
    /// | `REQUIRE_SESSION_FOR_WRITES` | `false`                  |
    /// | `SESSION_SECRET`             | random per process       |
    /// | `SESSION_COOKIE_NAME`        | `personagens.sid`        |
    /// | `SESSION_COOKIE_SECURE`      | `true`                   |
    /// | `SESSION_SAME_SITE`          | `none`                   |
    /// | `SESSION_IDLE_TIMEOUT_MINS`  | unset                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reads from an arbitrary source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cors_origins = lookup("CORS_ORIGIN")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let secret = lookup("SESSION_SECRET").filter(|s| !s.is_empty());
        if let Some(secret) = &secret {
            if secret.len() < MIN_SESSION_SECRET_LEN {
                return Err(ConfigError::Invalid {
                    key: "SESSION_SECRET",
                    value: "<redacted>".into(),
                    reason: format!("must be at least {MIN_SESSION_SECRET_LEN} bytes"),
                });
            }
        }

        let same_site = match lookup("SESSION_SAME_SITE")
            .unwrap_or_else(|| "none".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "none" => SameSite::None,
            "lax" => SameSite::Lax,
            "strict" => SameSite::Strict,
            other => {
                return Err(ConfigError::Invalid {
                    key: "SESSION_SAME_SITE",
                    value: other.to_string(),
                    reason: "expected none, lax or strict".into(),
                })
            }
        };

        let session = SessionConfig {
            secret,
            cookie_name: lookup("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| "personagens.sid".into()),
            secure: parse_or(&lookup, "SESSION_COOKIE_SECURE", true)?,
            same_site,
            idle_timeout_mins: parse_opt(&lookup, "SESSION_IDLE_TIMEOUT_MINS")?,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 5000)?,
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            require_session_for_writes: parse_or(&lookup, "REQUIRE_SESSION_FOR_WRITES", false)?,
            session,
        })
    }
}

/// Database connection settings.
///
/// Either `DATABASE_URL` or the `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
/// quartet must be provided; credentials never have defaults.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub connect_options: PgConnectOptions,
    /// Pool size (default: `10`).
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    // PgConnectOptions' Debug output includes the password.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.connect_options.get_host())
            .field("database", &self.connect_options.get_database())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// | Env Var              | Default                 |
    /// |----------------------|-------------------------|
    /// | `DATABASE_URL`       | built from the parts    |
    /// | `DB_HOST`            | required without URL    |
    /// | `DB_PORT`            | `5432`                  |
    /// | `DB_USER`            | required without URL    |
    /// | `DB_PASSWORD`        | required without URL    |
    /// | `DB_NAME`            | required without URL    |
    /// | `DB_SSL_MODE`        | `prefer`                |
    /// | `DB_MAX_CONNECTIONS` | `10`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let connect_options = match lookup("DATABASE_URL") {
            Some(url) => PgConnectOptions::from_str(&url).map_err(|e| ConfigError::Invalid {
                key: "DATABASE_URL",
                value: "<redacted>".into(),
                reason: e.to_string(),
            })?,
            None => {
                let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
                PgConnectOptions::new()
                    .host(&require("DB_HOST")?)
                    .port(parse_or(&lookup, "DB_PORT", 5432)?)
                    .username(&require("DB_USER")?)
                    .password(&require("DB_PASSWORD")?)
                    .database(&require("DB_NAME")?)
                    .ssl_mode(parse_or(&lookup, "DB_SSL_MODE", PgSslMode::Prefer)?)
            }
        };

        Ok(Self {
            connect_options,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn parse_opt<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
