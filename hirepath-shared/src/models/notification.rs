/// In-app notifications shown on the candidate dashboard
///
/// # Schema
///
/// ```sql
/// CREATE TYPE notification_type AS ENUM ('info', 'warning', 'success');
///
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     message TEXT NOT NULL,
///     notification_type notification_type NOT NULL DEFAULT 'info',
///     is_read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Warning,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,

    #[serde(rename = "type")]
    #[sqlx(rename = "notification_type")]
    pub kind: NotificationType,

    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationType,
}

impl CreateNotification {
    pub fn new(user_id: Uuid, message: impl Into<String>, kind: NotificationType) -> Self {
        Self {
            user_id,
            message: message.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateNotification {
    pub message: Option<String>,
    pub kind: Option<NotificationType>,
    pub is_read: Option<bool>,
}

const NOTIFICATION_COLUMNS: &str = "id, user_id, message, notification_type, is_read, created_at";

impl Notification {
    pub async fn create<'e, E>(executor: E, data: CreateNotification) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, message, notification_type)
            VALUES ($1, $2, $3)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.message)
        .bind(data.kind)
        .fetch_one(executor)
        .await?;

        Ok(notification)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateNotification,
    ) -> Result<Option<Self>, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET
                message = COALESCE($2, message),
                notification_type = COALESCE($3, notification_type),
                is_read = COALESCE($4, is_read)
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.message)
        .bind(data.kind)
        .bind(data.is_read)
        .fetch_optional(pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_as_read(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        Self::update(
            pool,
            id,
            UpdateNotification {
                is_read: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            message: "Step 4: in progress".to_string(),
            kind: NotificationType::Info,
            is_read: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "info");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_default_type_is_info() {
        assert_eq!(NotificationType::default(), NotificationType::Info);
        let kind: NotificationType = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(kind, NotificationType::Warning);
    }
}
