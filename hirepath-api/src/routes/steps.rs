/// Step catalog endpoints
///
/// Any signed-in user can read the catalog; administrators edit it.
/// Step orders are unique, a duplicate is a `409`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use hirepath_shared::{
    auth::{authorization::require_admin, middleware::AuthContext},
    models::step::{CreateStep, Step, UpdateStep},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStepRequest {
    #[validate(length(min = 1, max = 255, message = "Step name is required (max 255 characters)"))]
    pub step_name: String,

    #[validate(range(min = 1, message = "Step order must be positive"))]
    pub step_order: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStepRequest {
    #[validate(length(min = 1, max = 255, message = "Step name must be 1-255 characters"))]
    pub step_name: Option<String>,

    #[validate(range(min = 1, message = "Step order must be positive"))]
    pub step_order: Option<i32>,
}

pub async fn create_step(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateStepRequest>,
) -> ApiResult<(StatusCode, Json<Step>)> {
    require_admin(&auth)?;
    req.validate()?;

    let step = Step::create(
        &state.db,
        CreateStep {
            step_name: req.step_name,
            step_order: req.step_order,
        },
    )
    .await?;

    tracing::info!(step_id = %step.id, step_order = step.step_order, "Step created");
    Ok((StatusCode::CREATED, Json(step)))
}

/// Catalog in step order
pub async fn list_steps(State(state): State<AppState>) -> ApiResult<Json<Vec<Step>>> {
    Ok(Json(Step::list(&state.db).await?))
}

pub async fn get_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Step>> {
    let step = Step::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Step not found".to_string()))?;

    Ok(Json(step))
}

pub async fn update_step(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStepRequest>,
) -> ApiResult<Json<Step>> {
    require_admin(&auth)?;
    req.validate()?;

    let step = Step::update(
        &state.db,
        id,
        UpdateStep {
            step_name: req.step_name,
            step_order: req.step_order,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Step not found".to_string()))?;

    Ok(Json(step))
}

pub async fn delete_step(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;

    if !Step::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Step not found".to_string()));
    }

    tracing::info!(step_id = %id, "Step deleted");
    Ok(StatusCode::NO_CONTENT)
}
