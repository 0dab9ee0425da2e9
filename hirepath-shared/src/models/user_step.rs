/// Per-user progress through the step catalog
///
/// One row per (user, step). Status only ever moves forward:
///
/// ```text
/// pending → current → completed
/// pending ─────────→ completed
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_step_status AS ENUM ('pending', 'current', 'completed');
///
/// CREATE TABLE user_steps (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     step_id UUID NOT NULL REFERENCES steps(id) ON DELETE CASCADE,
///     status user_step_status NOT NULL DEFAULT 'pending',
///     completion_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, step_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Progress status of one step for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_step_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStepStatus {
    /// Not started
    Pending,

    /// The step the user is working on
    Current,

    /// Done
    Completed,
}

impl UserStepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStepStatus::Pending => "pending",
            UserStepStatus::Current => "current",
            UserStepStatus::Completed => "completed",
        }
    }

    /// Position in the forward-only ordering
    pub fn rank(&self) -> u8 {
        match self {
            UserStepStatus::Pending => 0,
            UserStepStatus::Current => 1,
            UserStepStatus::Completed => 2,
        }
    }

    /// Checks if moving to `target` keeps the status moving forward
    ///
    /// Staying put is allowed so repeated updates are harmless.
    pub fn can_transition_to(&self, target: UserStepStatus) -> bool {
        target.rank() >= self.rank()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStep {
    pub id: Uuid,
    pub user_id: Uuid,
    pub step_id: Uuid,
    pub status: UserStepStatus,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress row joined with its catalog entry
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserStepDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub step_id: Uuid,
    pub step_name: String,
    pub step_order: i32,
    pub status: UserStepStatus,
    pub completion_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateUserStep {
    pub user_id: Uuid,
    pub step_id: Uuid,
    pub status: UserStepStatus,
    pub completion_date: Option<DateTime<Utc>>,
}

const USER_STEP_COLUMNS: &str =
    "id, user_id, step_id, status, completion_date, created_at, updated_at";

impl UserStep {
    pub async fn create<'e, E>(executor: E, data: CreateUserStep) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let completion_date = match data.status {
            UserStepStatus::Completed => data.completion_date.or_else(|| Some(Utc::now())),
            _ => data.completion_date,
        };

        let user_step = sqlx::query_as::<_, UserStep>(&format!(
            r#"
            INSERT INTO user_steps (user_id, step_id, status, completion_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_STEP_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.step_id)
        .bind(data.status)
        .bind(completion_date)
        .fetch_one(executor)
        .await?;

        Ok(user_step)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserStep>(&format!(
            "SELECT {USER_STEP_COLUMNS} FROM user_steps WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Loads and row-locks every progress row of a user
    pub async fn lock_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, UserStep>(&format!(
            "SELECT {USER_STEP_COLUMNS} FROM user_steps WHERE user_id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// A user's progress joined with step names, in pipeline order
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserStepDetail>, sqlx::Error> {
        sqlx::query_as::<_, UserStepDetail>(
            r#"
            SELECT us.id, us.user_id, us.step_id, s.step_name, s.step_order,
                   us.status, us.completion_date
            FROM user_steps us
            JOIN steps s ON s.id = us.step_id
            WHERE us.user_id = $1
            ORDER BY s.step_order
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Every user's row for one step
    pub async fn list_by_step(pool: &PgPool, step_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserStep>(&format!(
            "SELECT {USER_STEP_COLUMNS} FROM user_steps WHERE step_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(step_id)
        .fetch_all(pool)
        .await
    }

    /// Sets status and completion date on an existing row
    ///
    /// Callers check [`UserStepStatus::can_transition_to`] first.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        status: UserStepStatus,
        completion_date: Option<DateTime<Utc>>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user_step = sqlx::query_as::<_, UserStep>(&format!(
            r#"
            UPDATE user_steps SET
                status = $2,
                completion_date = CASE
                    WHEN $2 = 'completed'::user_step_status
                        THEN COALESCE($3, completion_date, NOW())
                    ELSE $3
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_STEP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(completion_date)
        .fetch_optional(pool)
        .await?;

        Ok(user_step)
    }

    /// Inserts or moves the (user, step) row to `status`
    ///
    /// Completion keeps an existing completion date. Used by the workflow
    /// executor after it has checked the transition under lock.
    pub async fn upsert_status<'e, E>(
        executor: E,
        user_id: Uuid,
        step_id: Uuid,
        status: UserStepStatus,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let completion_date = (status == UserStepStatus::Completed).then(Utc::now);

        let user_step = sqlx::query_as::<_, UserStep>(&format!(
            r#"
            INSERT INTO user_steps (user_id, step_id, status, completion_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, step_id) DO UPDATE SET
                status = EXCLUDED.status,
                completion_date = COALESCE(user_steps.completion_date, EXCLUDED.completion_date),
                updated_at = NOW()
            RETURNING {USER_STEP_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(step_id)
        .bind(status)
        .bind(completion_date)
        .fetch_one(executor)
        .await?;

        Ok(user_step)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_steps WHERE id = $1")
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
    fn test_forward_transitions_allowed() {
        use UserStepStatus::*;

        assert!(Pending.can_transition_to(Current));
        assert!(Pending.can_transition_to(Completed));
        assert!(Current.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        use UserStepStatus::*;

        assert!(!Completed.can_transition_to(Current));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Current.can_transition_to(Pending));
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&UserStepStatus::Current).unwrap(), "\"current\"");
        assert_eq!(UserStepStatus::Completed.as_str(), "completed");
    }
}
