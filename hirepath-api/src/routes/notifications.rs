/// Notification endpoints
///
/// Candidates see and manage their own notifications; administrators can
/// post to and read any user's.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::UserFilter,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use hirepath_shared::{
    auth::{
        authorization::{require_self_or_admin, resolve_target_user},
        middleware::AuthContext,
    },
    models::notification::{CreateNotification, Notification, NotificationType, UpdateNotification},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    /// Defaults to the caller
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 2000, message = "Message is required (max 2000 characters)"))]
    pub message: String,

    #[serde(default, rename = "type")]
    pub kind: NotificationType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNotificationRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,

    pub is_read: Option<bool>,
}

pub async fn create_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    req.validate()?;
    let user_id = resolve_target_user(&auth, req.user_id)?;

    let notification = Notification::create(
        &state.db,
        CreateNotification::new(user_id, req.message, req.kind),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

/// Newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<Vec<Notification>>> {
    let user_id = resolve_target_user(&auth, filter.user_id)?;

    Ok(Json(Notification::list_by_user(&state.db, user_id).await?))
}

async fn load_owned(state: &AppState, auth: &AuthContext, id: Uuid) -> ApiResult<Notification> {
    let notification = Notification::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;
    require_self_or_admin(auth, notification.user_id)?;

    Ok(notification)
}

pub async fn update_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNotificationRequest>,
) -> ApiResult<Json<Notification>> {
    req.validate()?;
    load_owned(&state, &auth, id).await?;

    let notification = Notification::update(
        &state.db,
        id,
        UpdateNotification {
            message: req.message,
            kind: req.kind,
            is_read: req.is_read,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    load_owned(&state, &auth, id).await?;

    let notification = Notification::mark_as_read(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    load_owned(&state, &auth, id).await?;

    if !Notification::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
