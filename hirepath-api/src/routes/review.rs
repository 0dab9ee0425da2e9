/// Emailed document review links
///
/// The recruitment office follows these from the review email, so they are
/// public GET routes authorized by the signed `token` query parameter
/// instead of a session. A token is bound to one document and one decision.
///
/// - `GET /api/admin/validate-document/:id?token=`
/// - `GET /api/admin/reject-document/:id?token=`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::progress::try_advance_documents,
};
use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use hirepath_shared::{
    auth::jwt::{self, ReviewClaims, ReviewDecision},
    mail::templates::{self, escape_html},
    models::{
        document::{Document, DocumentStatus},
        notification::{CreateNotification, Notification, NotificationType},
        user::User,
    },
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub token: String,
}

/// Checks that `token` authorizes `decision` on `document_id`
fn authorize(
    state: &AppState,
    token: &str,
    document_id: Uuid,
    decision: ReviewDecision,
) -> ApiResult<ReviewClaims> {
    let claims = jwt::validate_review_token(token, state.jwt_secret())?;

    if claims.sub != document_id || claims.decision != decision {
        tracing::warn!(
            document_id = %document_id,
            decision = decision.as_str(),
            "Review token does not match the link"
        );
        return Err(ApiError::Unauthorized(
            "Review link does not match this document".to_string(),
        ));
    }

    Ok(claims)
}

fn page(title: &str, message: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body style=\"font-family: Arial, sans-serif; margin: 40px;\"><h1>{title}</h1><p>{message}</p></body></html>",
        title = escape_html(title),
        message = escape_html(message),
    ))
}

pub async fn validate_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReviewQuery>,
) -> ApiResult<Html<String>> {
    authorize(&state, &query.token, id, ReviewDecision::Validate)?;

    let document = Document::set_status(&state.db, id, DocumentStatus::Validated)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    tracing::info!(document_id = %document.id, user_id = %document.user_id, "Document validated");

    try_advance_documents(&state, document.user_id).await?;

    Ok(page(
        "Document validated",
        &format!("\"{}\" has been validated.", document.document_name),
    ))
}

/// Rejects a document
///
/// The row and the stored file are removed so the candidate can upload a
/// replacement; the candidate gets a warning notification and an email.
pub async fn reject_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReviewQuery>,
) -> ApiResult<Html<String>> {
    let claims = authorize(&state, &query.token, id, ReviewDecision::Reject)?;

    let document = Document::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    if let Err(e) = state.documents.delete(&document.file_path).await {
        tracing::warn!(document_id = %document.id, error = %e, "Failed to remove stored file");
    }

    Notification::create(
        &state.db,
        CreateNotification::new(
            document.user_id,
            format!(
                "Your document \"{}\" was rejected. Please upload it again.",
                document.document_name
            ),
            NotificationType::Warning,
        ),
    )
    .await?;

    match User::find_by_id(&state.db, claims.owner).await? {
        Some(owner) => {
            let email = templates::document_rejected(&owner.email, &owner.first_name, &document.document_name);
            if let Err(e) = state.mailer.send(email).await {
                tracing::warn!(document_id = %document.id, error = %e, "Failed to send rejection email");
            }
        }
        None => tracing::warn!(user_id = %claims.owner, "Owner of rejected document not found"),
    }

    tracing::info!(document_id = %document.id, user_id = %document.user_id, "Document rejected");

    Ok(page(
        "Document rejected",
        &format!(
            "\"{}\" has been rejected and the candidate was notified.",
            document.document_name
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_escapes_content() {
        let Html(body) = page("Done", "<b>passport</b>");
        assert!(body.contains("&lt;b&gt;passport&lt;/b&gt;"));
        assert!(body.contains("<h1>Done</h1>"));
    }
}
