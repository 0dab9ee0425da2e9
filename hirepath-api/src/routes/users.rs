/// User account endpoints
///
/// # Endpoints
///
/// - `POST /api/users` - Register (public)
/// - `GET /api/users/me` - Current profile
/// - `PUT /api/users/me` - Update profile
/// - `DELETE /api/users/me` - Delete account and stored documents
/// - `GET /api/users` - List users (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::{issue_access_token, SessionResponse},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use hirepath_shared::{
    auth::{authorization::require_admin, middleware::AuthContext, password},
    mail::templates,
    models::{
        document::Document,
        user::{CreateUser, UpdateUser, User, UserProfile, UserRole},
    },
    workflow::executor,
};
use serde::Deserialize;
use validator::Validate;

/// Registration form
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name is required (max 100 characters)"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required (max 100 characters)"))]
    pub last_name: String,

    #[serde(default)]
    pub accept_terms: bool,

    #[serde(default)]
    pub newsletter: bool,

    #[serde(flatten)]
    pub profile: UserProfile,
}

/// Profile update; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,

    pub newsletter: Option<bool>,

    #[serde(flatten)]
    pub profile: UserProfile,
}

/// Registers a candidate
///
/// Creates the account and its pipeline progress (steps 1 and 2 completed,
/// step 3 current) in one transaction, sends the welcome email and returns
/// a session.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed or terms not accepted
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    req.validate()?;
    if !req.accept_terms {
        return Err(ApiError::invalid_field(
            "acceptTerms",
            "Terms and conditions must be accepted",
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let mut tx = state.db.begin().await?;
    let user = User::create(
        &mut *tx,
        CreateUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            accept_terms: req.accept_terms,
            newsletter: req.newsletter,
            role: UserRole::Candidate,
            profile: req.profile,
        },
    )
    .await?;
    executor::initialize(&mut *tx, user.id, &state.policy()).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "User registered");

    let welcome = templates::welcome(&user.email, &user.first_name, &state.config.api.frontend_url);
    if let Err(e) = state.mailer.send(welcome).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to send welcome email");
    }

    let token = issue_access_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(SessionResponse { token, user })))
}

pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateMeRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            first_name: req.first_name,
            last_name: req.last_name,
            newsletter: req.newsletter,
            profile: req.profile,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes the caller's account
///
/// Rows cascade in the database; stored document files are removed here.
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<StatusCode> {
    let documents = Document::list_by_user(&state.db, auth.user_id).await?;

    if !User::delete(&state.db, auth.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    for document in documents {
        if let Err(e) = state.documents.delete(&document.file_path).await {
            tracing::warn!(document_id = %document.id, error = %e, "Failed to remove stored file");
        }
    }

    tracing::info!(user_id = %auth.user_id, "User deleted own account");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<User>>> {
    require_admin(&auth)?;

    Ok(Json(User::list(&state.db).await?))
}
