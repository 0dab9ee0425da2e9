/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/login` - Exchange credentials for an access token
/// - `POST /api/forgot-password` - Email a single-use reset link
/// - `POST /api/reset-password` - Set a new password with a reset token
///
/// Registration lives with the user routes (`POST /api/users`).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chrono::Duration;
use hirepath_shared::{
    auth::{
        jwt::{self, Claims},
        password::{self, MIN_PASSWORD_LENGTH},
        reset_token::{generate_reset_token, hash_reset_token, is_well_formed},
    },
    mail::templates,
    models::{
        notification::{CreateNotification, Notification, NotificationType},
        password_reset::{PasswordResetToken, RESET_TOKEN_LIFETIME_MINUTES},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Session returned by login and registration
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Access token (JWT_EXPIRATION_HOURS)
    pub token: String,

    pub user: User,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[serde(alias = "newPassword")]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Signs an access token for `user`
pub(crate) fn issue_access_token(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = Claims::new(user.id, user.email.clone(), user.role)
        .with_name(user.first_name.clone(), user.last_name.clone())
        .expires_in(Duration::hours(state.config.jwt.expiration_hours));

    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Login endpoint
///
/// ```text
/// POST /api/login
/// { "email": "ada@example.com", "password": "..." }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_access_token(&state, &user)?;
    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User logged in");

    Ok(Json(SessionResponse { token, user }))
}

/// Starts a password reset
///
/// Always answers 200 for unknown addresses so the endpoint cannot be used
/// to discover which emails have accounts. Delivery failure is a 500: without
/// the email the reset cannot proceed.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Value>> {
    req.validate()?;

    let response = json!({
        "message": "If an account exists for this email, a reset link has been sent."
    });

    let Some(user) = User::find_by_email(&state.db, &req.email).await? else {
        tracing::debug!("Password reset requested for unknown email");
        return Ok(Json(response));
    };

    let (token, token_hash) = generate_reset_token();
    let stored = PasswordResetToken::create(&state.db, user.id, &token_hash).await?;

    let link = format!("{}/reset-password?token={}", state.config.api.frontend_url, token);
    let email = templates::password_reset(
        &user.email,
        &user.first_name,
        &link,
        RESET_TOKEN_LIFETIME_MINUTES,
    );

    if let Err(e) = state.mailer.send(email).await {
        PasswordResetToken::delete(&state.db, stored.id).await?;
        return Err(e.into());
    }

    tracing::info!(user_id = %user.id, "Password reset link sent");
    Ok(Json(response))
}

/// Completes a password reset
///
/// The token is deleted on use; an expired token is deleted and refused.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    req.validate()?;
    if req.new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::invalid_field(
            "new_password",
            "Password must be at least 8 characters",
        ));
    }

    if !is_well_formed(&req.token) {
        return Err(ApiError::BadRequest(INVALID_RESET_TOKEN.to_string()));
    }

    let password_hash = password::hash_password(&req.new_password)?;

    let mut tx = state.db.begin().await?;
    let Some(stored) = PasswordResetToken::consume(&mut *tx, &hash_reset_token(&req.token)).await? else {
        return Err(ApiError::BadRequest(INVALID_RESET_TOKEN.to_string()));
    };

    if stored.is_expired() {
        tx.commit().await?;
        tracing::info!(user_id = %stored.user_id, "Expired reset token refused");
        return Err(ApiError::BadRequest(INVALID_RESET_TOKEN.to_string()));
    }

    if !User::update_password(&mut *tx, stored.user_id, &password_hash).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    PasswordResetToken::delete_for_user(&mut *tx, stored.user_id).await?;
    Notification::create(
        &mut *tx,
        CreateNotification::new(
            stored.user_id,
            "Password reset successfully",
            NotificationType::Success,
        ),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = %stored.user_id, "Password reset completed");
    Ok(Json(json!({ "message": "Password reset successfully" })))
}
