//! # HirePath API Server
//!
//! REST backend for the HirePath recruitment pipeline: candidate accounts,
//! document review, payments and step-by-step progress.
//!
//! ## Startup
//!
//! 1. Tracing (`RUST_LOG`, defaults below)
//! 2. Configuration from the environment (`.env` honoured)
//! 3. Database pool and migrations
//! 4. Optional bootstrap admin
//! 5. Mail transport and document store
//! 6. Serve until Ctrl-C, then drain and close the pool
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p hirepath-api
//! ```

use anyhow::Context;
use hirepath_api::{
    app::{build_router, AppState},
    bootstrap,
    config::{Config, MailTransport},
};
use hirepath_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    mail::{LettreMailer, Mailer, MemoryMailer},
    storage::LocalDocumentStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hirepath_api=debug,hirepath_shared=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "HirePath API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("invalid configuration")?;

    let pool = create_pool(
        DatabaseConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await
    .context("failed to connect to the database")?;

    run_migrations(&pool).await.context("failed to run migrations")?;

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap::ensure_admin(&pool, admin).await?;
    }

    let mailer: Arc<dyn Mailer> = match config.mail.transport {
        MailTransport::Smtp => Arc::new(LettreMailer::smtp(
            &config.mail.smtp_settings(),
            &config.mail.from,
        )?),
        MailTransport::File => Arc::new(LettreMailer::file(&config.mail.spool_dir, &config.mail.from)?),
        MailTransport::Memory => {
            tracing::warn!("MAIL_TRANSPORT=memory: emails are kept in memory and never delivered");
            Arc::new(MemoryMailer::new())
        }
    };

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("failed to create upload dir {}", config.uploads.dir.display()))?;
    let documents = Arc::new(LocalDocumentStore::new(config.uploads.dir.clone()));

    let address = config.bind_address();
    let state = AppState::new(pool.clone(), config, mailer, documents);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
}
