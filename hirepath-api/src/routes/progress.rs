/// Pipeline progress check
///
/// `POST /api/check-documents` asks whether the caller's documents allow
/// leaving the document step. Wrong counts and documents still under review
/// come back as `400` with the reason; a catalog without the document step
/// is a `409`.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use hirepath_shared::{
    auth::middleware::AuthContext,
    workflow::{
        executor::{self, DocumentProgress},
        WorkflowError,
    },
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CheckDocumentsResponse {
    pub message: String,

    /// Step order that became current, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<i32>,

    /// Payment requested on the way, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
}

pub async fn check_documents(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<CheckDocumentsResponse>> {
    let progress = executor::advance_documents(&state.db, auth.user_id, &state.policy()).await?;

    let response = match progress {
        DocumentProgress::AlreadyCompleted => CheckDocumentsResponse {
            message: "Document step already completed".to_string(),
            current_step: None,
            payment_id: None,
        },
        DocumentProgress::Advanced { activated, payment } => {
            tracing::info!(user_id = %auth.user_id, activated = ?activated, "Document step completed");
            CheckDocumentsResponse {
                message: "All documents validated, step completed".to_string(),
                current_step: activated,
                payment_id: payment.map(|p| p.id),
            }
        }
    };

    Ok(Json(response))
}

/// Advances `user_id` past the document step if the documents allow it
///
/// Called after an admin validates a document. Documents still missing or
/// under review are the normal case here and only logged.
pub(crate) async fn try_advance_documents(state: &AppState, user_id: Uuid) -> ApiResult<()> {
    match executor::advance_documents(&state.db, user_id, &state.policy()).await {
        Ok(DocumentProgress::Advanced { activated, .. }) => {
            tracing::info!(user_id = %user_id, activated = ?activated, "Document step completed");
            Ok(())
        }
        Ok(DocumentProgress::AlreadyCompleted) => Ok(()),
        Err(WorkflowError::Progression(reason)) => {
            tracing::debug!(user_id = %user_id, reason = %reason, "Document step not complete yet");
            Ok(())
        }
        Err(WorkflowError::StepNotInCatalog(order)) => {
            tracing::warn!(user_id = %user_id, step_order = order, "Document step missing from catalog");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
