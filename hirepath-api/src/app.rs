/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use hirepath_api::{app::AppState, config::Config};
/// use hirepath_shared::{mail::MemoryMailer, storage::LocalDocumentStore};
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let store = LocalDocumentStore::new(config.uploads.dir.clone());
/// let state = AppState::new(pool, config, Arc::new(MemoryMailer::new()), Arc::new(store));
/// let app = hirepath_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::jwt_auth_layer, security::SecurityHeadersLayer},
    routes,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use hirepath_shared::mail::Mailer;
use hirepath_shared::storage::DocumentStore;
use hirepath_shared::workflow::progression::ProgressionPolicy;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every
/// field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Outgoing email
    pub mailer: Arc<dyn Mailer>,

    /// Uploaded document files
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        config: Config,
        mailer: Arc<dyn Mailer>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            mailer,
            documents,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    pub fn policy(&self) -> ProgressionPolicy {
        self.config.progression_policy()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /health                                   public
/// /api
/// ├── POST /users                           register (public)
/// ├── POST /login, /forgot-password, /reset-password (public)
/// ├── GET  /job_offers                      public listing
/// ├── GET  /admin/validate-document/:id     signed review link
/// ├── GET  /admin/reject-document/:id       signed review link
/// └── (Bearer JWT)
///     ├── /users/me, /users
///     ├── /check-documents
///     ├── /documents, /documents/:id, /documents/:id/file
///     ├── /job_offers (write), /job_offers/:id
///     ├── /notifications, /notifications/:id, /notifications/:id/read
///     ├── /payments, /payments/all, /payments/:id, /payments/:id/submit
///     ├── /steps, /steps/:id
///     └── /user_steps, /user_steps/step/:step_id, /user_steps/:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (protected group only)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_routes = Router::new()
        .route("/users", post(routes::users::register))
        .route("/login", post(routes::auth::login))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route("/reset-password", post(routes::auth::reset_password))
        .route("/job_offers", get(routes::job_offers::list_job_offers))
        .route(
            "/admin/validate-document/:id",
            get(routes::review::validate_document),
        )
        .route(
            "/admin/reject-document/:id",
            get(routes::review::reject_document),
        );

    let upload_limit = state.config.uploads.max_bytes;

    let protected_routes = Router::new()
        .route(
            "/users/me",
            get(routes::users::get_me)
                .put(routes::users::update_me)
                .delete(routes::users::delete_me),
        )
        .route("/users", get(routes::users::list_users))
        .route("/check-documents", post(routes::progress::check_documents))
        .route(
            "/documents",
            post(routes::documents::upload_document)
                .get(routes::documents::list_documents)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/documents/:id",
            get(routes::documents::get_document)
                .put(routes::documents::update_document)
                .delete(routes::documents::delete_document),
        )
        .route("/documents/:id/file", get(routes::documents::download_document))
        .route("/job_offers", post(routes::job_offers::create_job_offer))
        .route(
            "/job_offers/:id",
            get(routes::job_offers::get_job_offer)
                .put(routes::job_offers::update_job_offer)
                .delete(routes::job_offers::delete_job_offer),
        )
        .route(
            "/notifications",
            post(routes::notifications::create_notification)
                .get(routes::notifications::list_notifications),
        )
        .route(
            "/notifications/:id",
            put(routes::notifications::update_notification)
                .delete(routes::notifications::delete_notification),
        )
        .route("/notifications/:id/read", put(routes::notifications::mark_read))
        .route(
            "/payments",
            post(routes::payments::create_payment).get(routes::payments::list_payments),
        )
        .route("/payments/all", get(routes::payments::list_all_payments))
        .route(
            "/payments/:id",
            get(routes::payments::get_payment)
                .put(routes::payments::update_payment)
                .delete(routes::payments::delete_payment),
        )
        .route("/payments/:id/submit", post(routes::payments::submit_payment))
        .route(
            "/steps",
            post(routes::steps::create_step).get(routes::steps::list_steps),
        )
        .route(
            "/steps/:id",
            get(routes::steps::get_step)
                .put(routes::steps::update_step)
                .delete(routes::steps::delete_step),
        )
        .route(
            "/user_steps",
            post(routes::user_steps::create_user_steps).get(routes::user_steps::list_user_steps),
        )
        .route(
            "/user_steps/step/:step_id",
            get(routes::user_steps::list_by_step),
        )
        .route(
            "/user_steps/:id",
            put(routes::user_steps::update_user_step).delete(routes::user_steps::delete_user_step),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
