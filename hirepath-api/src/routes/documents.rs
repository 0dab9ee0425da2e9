/// Candidate document endpoints
///
/// # Endpoints
///
/// - `POST /api/documents` - Upload (multipart: `document_name`, `file`)
/// - `GET /api/documents?user_id=` - List documents
/// - `GET /api/documents/:id` - Get metadata
/// - `GET /api/documents/:id/file` - Download the stored file
/// - `PUT /api/documents/:id` - Rename or set status (admin)
/// - `DELETE /api/documents/:id` - Delete row and stored file
///
/// An upload emails the recruitment office with the file attached and two
/// signed links (validate / reject), then tells the candidate the document
/// is under review.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{progress::try_advance_documents, UserFilter},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use bytes::Bytes;
use chrono::Duration;
use hirepath_shared::{
    auth::{
        authorization::{require_admin, require_self_or_admin, resolve_target_user},
        jwt::{self, ReviewClaims, ReviewDecision},
        middleware::AuthContext,
    },
    mail::{templates, Attachment},
    models::{
        document::{CreateDocument, Document, DocumentStatus, UpdateDocument},
        user::User,
    },
    storage::{allowed_extension, content_type_for},
    workflow::executor,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "Document name must be 1-255 characters"))]
    pub document_name: Option<String>,

    pub status: Option<DocumentStatus>,
}

/// Fields collected from the upload form
#[derive(Debug, Default)]
struct UploadForm {
    document_name: Option<String>,
    filename: Option<String>,
    bytes: Option<Bytes>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "document_name" => form.document_name = Some(field.text().await?),
                "file" => {
                    form.filename = field.file_name().map(str::to_string);
                    form.bytes = Some(field.bytes().await?);
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unknown upload field");
                }
            }
        }

        Ok(form)
    }
}

/// Builds the validate or reject link for an uploaded document
fn review_link(state: &AppState, document: &Document, decision: ReviewDecision) -> ApiResult<String> {
    let claims = ReviewClaims::new(
        document.id,
        document.user_id,
        decision,
        Duration::hours(state.config.jwt.review_link_expiration_hours),
    );
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(format!(
        "{}/api/admin/{}-document/{}?token={}",
        state.config.api.backend_url,
        decision.as_str(),
        document.id,
        token
    ))
}

/// Quotes a filename for a `Content-Disposition` header
fn disposition_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

/// Upload endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Missing field or unsupported file type
/// - `413 Payload Too Large`: File exceeds `UPLOAD_MAX_BYTES`
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let form = UploadForm::read(multipart).await?;

    let document_name = form
        .document_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("document_name is required".to_string()))?;
    let (Some(filename), Some(bytes)) = (form.filename, form.bytes) else {
        return Err(ApiError::BadRequest("file is required".to_string()));
    };
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let extension = allowed_extension(&filename)?;
    let content_type = content_type_for(&extension);

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let key = state.documents.put(user.id, &filename, bytes.clone()).await?;

    let document = match Document::create(
        &state.db,
        CreateDocument {
            user_id: user.id,
            document_name,
            file_path: key.clone(),
            original_filename: filename,
            content_type: content_type.to_string(),
        },
    )
    .await
    {
        Ok(document) => document,
        Err(e) => {
            if let Err(cleanup) = state.documents.delete(&key).await {
                tracing::warn!(key = %key, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = %user.id,
        document_id = %document.id,
        size = bytes.len(),
        "Document uploaded"
    );

    let validate_link = review_link(&state, &document, ReviewDecision::Validate)?;
    let reject_link = review_link(&state, &document, ReviewDecision::Reject)?;
    let candidate_name = user.full_name();
    let email = templates::document_review(
        &state.config.mail.admin_email,
        &templates::DocumentReview {
            candidate_name: &candidate_name,
            candidate_email: &user.email,
            document_name: &document.document_name,
            original_filename: &document.original_filename,
            validate_link: &validate_link,
            reject_link: &reject_link,
        },
    )
    .with_attachment(Attachment {
        filename: document.original_filename.clone(),
        content_type: document.content_type.clone(),
        bytes,
    });

    if let Err(e) = state.mailer.send(email).await {
        tracing::warn!(document_id = %document.id, error = %e, "Failed to send review email");
    }

    executor::record_submission(&state.db, user.id, &document.document_name, &state.policy())
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_documents(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<Vec<Document>>> {
    let user_id = resolve_target_user(&auth, filter.user_id)?;

    Ok(Json(Document::list_by_user(&state.db, user_id).await?))
}

/// Loads a document the caller may see
async fn load_visible(state: &AppState, auth: &AuthContext, id: Uuid) -> ApiResult<Document> {
    let document = Document::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;
    require_self_or_admin(auth, document.user_id)?;

    Ok(document)
}

pub async fn get_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Document>> {
    Ok(Json(load_visible(&state, &auth, id).await?))
}

pub async fn download_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let document = load_visible(&state, &auth, id).await?;
    let bytes = state.documents.get(&document.file_path).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        disposition_filename(&document.original_filename)
    );

    Ok((
        [
            (header::CONTENT_TYPE, document.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Admin update
///
/// Marking a document validated here has the same effect as the emailed
/// validate link.
pub async fn update_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDocumentRequest>,
) -> ApiResult<Json<Document>> {
    require_admin(&auth)?;
    req.validate()?;

    let document = Document::update(
        &state.db,
        id,
        UpdateDocument {
            document_name: req.document_name,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    if req.status == Some(DocumentStatus::Validated) {
        try_advance_documents(&state, document.user_id).await?;
    }

    Ok(Json(document))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let document = load_visible(&state, &auth, id).await?;

    if Document::delete(&state.db, document.id).await?.is_none() {
        return Err(ApiError::NotFound("Document not found".to_string()));
    }
    if let Err(e) = state.documents.delete(&document.file_path).await {
        tracing::warn!(document_id = %document.id, error = %e, "Failed to remove stored file");
    }

    tracing::info!(document_id = %document.id, deleted_by = %auth.user_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_filename_strips_quotes() {
        assert_eq!(disposition_filename("passport.pdf"), "passport.pdf");
        assert_eq!(disposition_filename("a\"b\\c\n.pdf"), "a_b_c_.pdf");
    }

    #[test]
    fn test_update_request_reads_status() {
        let req: UpdateDocumentRequest =
            serde_json::from_value(serde_json::json!({ "status": "validated" })).unwrap();
        assert_eq!(req.status, Some(DocumentStatus::Validated));
        assert!(req.document_name.is_none());
        assert!(req.validate().is_ok());
    }
}
