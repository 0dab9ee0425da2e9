/// Recruitment pipeline step catalog
///
/// Steps are ordered by `step_order` (unique, starting at 1). The default
/// catalog is seeded by the initial migration and can be edited by admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Step {
    pub id: Uuid,
    pub step_name: String,
    pub step_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateStep {
    pub step_name: String,
    pub step_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStep {
    pub step_name: Option<String>,
    pub step_order: Option<i32>,
}

impl Step {
    pub async fn create(pool: &PgPool, data: CreateStep) -> Result<Self, sqlx::Error> {
        let step = sqlx::query_as::<_, Step>(
            r#"
            INSERT INTO steps (step_name, step_order)
            VALUES ($1, $2)
            RETURNING id, step_name, step_order, created_at
            "#,
        )
        .bind(data.step_name)
        .bind(data.step_order)
        .fetch_one(pool)
        .await?;

        Ok(step)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Step>(
            "SELECT id, step_name, step_order, created_at FROM steps WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Full catalog in pipeline order
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Step>(
            "SELECT id, step_name, step_order, created_at FROM steps ORDER BY step_order",
        )
        .fetch_all(executor)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateStep,
    ) -> Result<Option<Self>, sqlx::Error> {
        let step = sqlx::query_as::<_, Step>(
            r#"
            UPDATE steps SET
                step_name = COALESCE($2, step_name),
                step_order = COALESCE($3, step_order)
            WHERE id = $1
            RETURNING id, step_name, step_order, created_at
            "#,
        )
        .bind(id)
        .bind(data.step_name)
        .bind(data.step_order)
        .fetch_optional(pool)
        .await?;

        Ok(step)
    }

    /// Deletes a step; user progress rows for it cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM steps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
