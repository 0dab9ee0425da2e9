/// Uploaded candidate documents
///
/// A document row points at a file held by the [`DocumentStore`]; `file_path`
/// is the store key, never an absolute path. Review moves the status from
/// `pending` to `validated`; a rejected upload is deleted outright.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE document_status AS ENUM ('pending', 'validated', 'missing');
///
/// CREATE TABLE documents (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     document_name VARCHAR(255) NOT NULL,
///     status document_status NOT NULL DEFAULT 'pending',
///     file_path VARCHAR(512) NOT NULL,
///     original_filename VARCHAR(255) NOT NULL,
///     content_type VARCHAR(100) NOT NULL,
///     uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// [`DocumentStore`]: crate::storage::DocumentStore

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Review status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Uploaded, waiting for the recruitment office
    Pending,

    /// Accepted by the recruitment office
    Validated,

    /// Placeholder for a required document not yet provided
    Missing,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Validated => "validated",
            DocumentStatus::Missing => "missing",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_name: String,
    pub status: DocumentStatus,

    /// Storage key; files are served through `/api/documents/:id/file`
    #[serde(skip_serializing)]
    pub file_path: String,

    pub original_filename: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub user_id: Uuid,
    pub document_name: String,
    pub file_path: String,
    pub original_filename: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocument {
    pub document_name: Option<String>,
    pub status: Option<DocumentStatus>,
}

const DOCUMENT_COLUMNS: &str = "id, user_id, document_name, status, file_path, original_filename, \
     content_type, uploaded_at, updated_at";

impl Document {
    pub async fn create(pool: &PgPool, data: CreateDocument) -> Result<Self, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(&format!(
            r#"
            INSERT INTO documents (user_id, document_name, file_path, original_filename, content_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.document_name)
        .bind(data.file_path)
        .bind(data.original_filename)
        .bind(data.content_type)
        .fetch_one(pool)
        .await?;

        Ok(document)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a user's documents, oldest upload first
    pub async fn list_by_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 ORDER BY uploaded_at"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(documents)
    }

    /// Applies a partial update (admin review or rename)
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateDocument,
    ) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(&format!(
            r#"
            UPDATE documents SET
                document_name = COALESCE($2, document_name),
                status = COALESCE($3, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.document_name)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        Self::update(
            pool,
            id,
            UpdateDocument {
                document_name: None,
                status: Some(status),
            },
        )
        .await
    }

    /// Deletes the row and returns it, so the caller can remove the stored file
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "DELETE FROM documents WHERE id = $1 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
