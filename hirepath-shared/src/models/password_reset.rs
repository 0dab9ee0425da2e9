/// Single-use password reset tokens
///
/// Only the SHA-256 of the emailed token is stored. A token is deleted when
/// used and refused once `expires_at` has passed.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE password_reset_tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT password_reset_tokens_hash_key UNIQUE (token_hash)
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

/// How long an emailed reset link stays usable
pub const RESET_TOKEN_LIFETIME_MINUTES: i64 = 60;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Stores a new token hash for a user
    pub async fn create<'e, E>(
        executor: E,
        user_id: Uuid,
        token_hash: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_LIFETIME_MINUTES);

        let token = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash.to_string())
        .bind(expires_at)
        .fetch_one(executor)
        .await?;

        Ok(token)
    }

    /// Deletes the token with this hash and returns it
    ///
    /// Concurrent callers race on the row lock; only one of them gets the row
    /// back, so a token can be redeemed at most once. Expiry is left to the
    /// caller.
    pub async fn consume<'e, E>(executor: E, token_hash: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let token = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            DELETE FROM password_reset_tokens
            WHERE token_hash = $1
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(token_hash.to_string())
        .fetch_optional(executor)
        .await?;

        Ok(token)
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Drops every outstanding token of a user
    pub async fn delete_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: DateTime<Utc>) -> PasswordResetToken {
        PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "ab".repeat(32),
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired() {
        assert!(token(Utc::now() - Duration::seconds(1)).is_expired());
        assert!(!token(Utc::now() + Duration::minutes(5)).is_expired());
    }
}
