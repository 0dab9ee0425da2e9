/// User progress endpoints
///
/// Progress rows only move forward (`pending` → `current` → `completed`);
/// an update that would move one back is a `409`.

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
use chrono::{DateTime, Utc};
use hirepath_shared::{
    auth::{
        authorization::{require_admin, require_self_or_admin, resolve_target_user},
        middleware::AuthContext,
    },
    models::user_step::{CreateUserStep, UserStep, UserStepDetail, UserStepStatus},
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct StepEntry {
    pub step_id: Uuid,

    #[serde(default = "default_status")]
    pub status: UserStepStatus,

    pub completion_date: Option<DateTime<Utc>>,
}

fn default_status() -> UserStepStatus {
    UserStepStatus::Pending
}

#[derive(Debug, Deserialize)]
pub struct CreateUserStepsRequest {
    /// Defaults to the caller
    pub user_id: Option<Uuid>,

    pub steps: Vec<StepEntry>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStepRequest {
    pub status: Option<UserStepStatus>,
    pub completion_date: Option<DateTime<Utc>>,
}

/// Creates several progress rows at once; all or nothing
pub async fn create_user_steps(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUserStepsRequest>,
) -> ApiResult<(StatusCode, Json<Vec<UserStep>>)> {
    let user_id = resolve_target_user(&auth, req.user_id)?;
    if req.steps.is_empty() {
        return Err(ApiError::invalid_field("steps", "At least one step is required"));
    }

    let mut tx = state.db.begin().await?;
    let mut created = Vec::with_capacity(req.steps.len());
    for entry in req.steps {
        let user_step = UserStep::create(
            &mut *tx,
            CreateUserStep {
                user_id,
                step_id: entry.step_id,
                status: entry.status,
                completion_date: entry.completion_date,
            },
        )
        .await?;
        created.push(user_step);
    }
    tx.commit().await?;

    tracing::info!(user_id = %user_id, count = created.len(), "User steps created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Progress joined with step names, in pipeline order
pub async fn list_user_steps(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<Vec<UserStepDetail>>> {
    let user_id = resolve_target_user(&auth, filter.user_id)?;

    Ok(Json(UserStep::list_by_user(&state.db, user_id).await?))
}

pub async fn list_by_step(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(step_id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserStep>>> {
    require_admin(&auth)?;

    Ok(Json(UserStep::list_by_step(&state.db, step_id).await?))
}

async fn load_owned(state: &AppState, auth: &AuthContext, id: Uuid) -> ApiResult<UserStep> {
    let user_step = UserStep::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User step not found".to_string()))?;
    require_self_or_admin(auth, user_step.user_id)?;

    Ok(user_step)
}

/// Refuses a move that would take `current` backwards
fn check_transition(current: UserStepStatus, target: UserStepStatus) -> ApiResult<()> {
    if current.can_transition_to(target) {
        Ok(())
    } else {
        Err(ApiError::Conflict(format!(
            "Cannot move step from {} back to {}",
            current.as_str(),
            target.as_str()
        )))
    }
}

pub async fn update_user_step(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserStepRequest>,
) -> ApiResult<Json<UserStep>> {
    let existing = load_owned(&state, &auth, id).await?;

    let status = req.status.unwrap_or(existing.status);
    check_transition(existing.status, status)?;

    let completion_date = req.completion_date.or(existing.completion_date);
    let user_step = UserStep::update(&state.db, id, status, completion_date)
        .await?
        .ok_or_else(|| ApiError::NotFound("User step not found".to_string()))?;

    tracing::info!(
        user_step_id = %id,
        from = existing.status.as_str(),
        to = user_step.status.as_str(),
        "User step updated"
    );
    Ok(Json(user_step))
}

pub async fn delete_user_step(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    load_owned(&state, &auth, id).await?;

    if !UserStep::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User step not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_moves_allowed() {
        assert!(check_transition(UserStepStatus::Pending, UserStepStatus::Current).is_ok());
        assert!(check_transition(UserStepStatus::Current, UserStepStatus::Completed).is_ok());
        assert!(check_transition(UserStepStatus::Completed, UserStepStatus::Completed).is_ok());
    }

    #[test]
    fn test_backward_move_is_conflict() {
        match check_transition(UserStepStatus::Completed, UserStepStatus::Current) {
            Err(ApiError::Conflict(msg)) => assert_eq!(msg, "Cannot move step from completed back to current"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bulk_request_defaults_to_pending() {
        let req: CreateUserStepsRequest = serde_json::from_value(serde_json::json!({
            "steps": [{ "step_id": Uuid::nil() }]
        }))
        .unwrap();

        assert!(req.user_id.is_none());
        assert_eq!(req.steps[0].status, UserStepStatus::Pending);
    }
}
