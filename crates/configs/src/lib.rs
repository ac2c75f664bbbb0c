//! # configs
//!
//! Layered settings for review-market:
//! built-in defaults, then `config/default.*` and `config/local.*` (both
//! optional), then `APP__`-prefixed environment variables, e.g.
//! `APP__SERVER__PORT=8080` or `APP__AUTH__TOKEN_SECRET=...`.
//! A `.env` file is read first if present.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use domains::Site;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Shortest accepted token signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub site: SiteSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    /// `reviews` or `market`
    pub variant: Site,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Postgres URL. Unset means in-memory storage.
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub token_secret: SecretString,
    pub session_ttl_hours: i64,
    pub confirmation_ttl_hours: i64,
    pub cookie_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub filter: String,
}

impl Settings {
    /// Loads `.env`, the config files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let builder = defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "auth.token_secret",
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        if self.auth.session_ttl_hours <= 0 || self.auth.confirmation_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "auth.*_ttl_hours",
                reason: "must be positive".to_string(),
            });
        }
        if self.auth.cookie_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "auth.cookie_name",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("site.variant", "reviews")?
        .set_default("database.max_connections", 5)?
        .set_default("auth.session_ttl_hours", 24 * 14)?
        .set_default("auth.confirmation_ttl_hours", 24 * 3)?
        .set_default("auth.cookie_name", "sessionid")?
        .set_default("log.format", "json")?
        .set_default("log.filter", "info")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::build(defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_fill_everything_but_the_secret() {
        let settings = from_toml(
            r#"
            [auth]
            token_secret = "0123456789abcdef0123456789abcdef"
            "#,
        )
        .unwrap();
        assert_eq!(settings.server.addr(), "127.0.0.1:8080");
        assert_eq!(settings.site.variant, Site::Reviews);
        assert!(settings.database.url.is_none());
        assert_eq!(settings.auth.cookie_name, "sessionid");
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn market_variant_and_database_url() {
        let settings = from_toml(
            r#"
            [site]
            variant = "market"
            [database]
            url = "postgres://localhost/market"
            [auth]
            token_secret = "0123456789abcdef0123456789abcdef"
            "#,
        )
        .unwrap();
        assert_eq!(settings.site.variant, Site::Market);
        let url = settings.database.url.unwrap();
        assert_eq!(url.expose_secret(), "postgres://localhost/market");
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = from_toml(
            r#"
            [auth]
            token_secret = "short"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "auth.token_secret", .. }));
    }

    #[test]
    fn missing_secret_is_a_load_error() {
        assert!(matches!(from_toml(""), Err(ConfigError::Load(_))));
    }
}
