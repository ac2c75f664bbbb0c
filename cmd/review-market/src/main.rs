//! # review-market
//!
//! Server entry point. Assembles the adapters picked at compile time with
//! the site variant picked in configuration.

#[cfg(not(all(feature = "web-axum", feature = "auth-jwt")))]
compile_error!("review-market needs the `web-axum` and `auth-jwt` features");

use std::sync::Arc;

use anyhow::Context;
use api_adapters::web::{self, AppState, Repositories};
use auth_adapters::{Argon2PasswordHasher, JwtTokenIssuer, TokenLifetimes};
use configs::{LogFormat, LogSettings, Settings};
use secrecy::ExposeSecret;
use storage_adapters::{MemoryContentRepository, MemoryUserRepository};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

async fn repositories(settings: &Settings) -> anyhow::Result<Repositories> {
    #[cfg(feature = "db-postgres")]
    if let Some(url) = &settings.database.url {
        use storage_adapters::postgres::{self, PgPostRepository, PgReviewRepository, PgUserRepository};

        let pool = postgres::connect(url.expose_secret(), settings.database.max_connections).await?;
        return Ok(Repositories {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool)),
        });
    }

    #[cfg(not(feature = "db-postgres"))]
    if settings.database.url.is_some() {
        warn!("database.url is set but this build has no postgres support");
    }

    warn!("no database configured, data lives in memory only");
    Ok(Repositories {
        users: Arc::new(MemoryUserRepository::new()),
        reviews: Arc::new(MemoryContentRepository::new()),
        posts: Arc::new(MemoryContentRepository::new()),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("load settings")?;
    init_tracing(&settings.log);

    let repos = repositories(&settings).await?;
    let tokens = JwtTokenIssuer::new(
        settings.auth.token_secret.expose_secret().as_bytes(),
        TokenLifetimes {
            session: chrono::Duration::hours(settings.auth.session_ttl_hours),
            email_confirmation: chrono::Duration::hours(settings.auth.confirmation_ttl_hours),
        },
    );
    let state = AppState::new(
        settings.site.variant,
        repos,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(tokens),
        settings.auth.cookie_name.as_str(),
    );

    let addr = settings.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, site = ?settings.site.variant, "review-market listening");

    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
