/// Public job offer listings
///
/// # Schema
///
/// ```sql
/// CREATE TABLE job_offers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     company VARCHAR(255) NOT NULL,
///     location VARCHAR(255) NOT NULL,
///     employment_type VARCHAR(100) NOT NULL,
///     salary VARCHAR(100),
///     category VARCHAR(100),
///     featured BOOLEAN NOT NULL DEFAULT FALSE,
///     description TEXT NOT NULL,
///     requirements TEXT,
///     posted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobOffer {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,

    /// Full-time, part-time, contract...
    #[serde(rename = "type")]
    pub employment_type: String,

    pub salary: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub description: String,
    pub requirements: Option<String>,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateJobOffer {
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub salary: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub description: String,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateJobOffer {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub description: Option<String>,
    pub requirements: Option<String>,
}

const JOB_OFFER_COLUMNS: &str = "id, title, company, location, employment_type, salary, category, \
     featured, description, requirements, posted_at";

impl JobOffer {
    pub async fn create(pool: &PgPool, data: CreateJobOffer) -> Result<Self, sqlx::Error> {
        let offer = sqlx::query_as::<_, JobOffer>(&format!(
            r#"
            INSERT INTO job_offers
                (title, company, location, employment_type, salary, category, featured, description, requirements)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {JOB_OFFER_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.company)
        .bind(data.location)
        .bind(data.employment_type)
        .bind(data.salary)
        .bind(data.category)
        .bind(data.featured)
        .bind(data.description)
        .bind(data.requirements)
        .fetch_one(pool)
        .await?;

        Ok(offer)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, JobOffer>(&format!(
            "SELECT {JOB_OFFER_COLUMNS} FROM job_offers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, JobOffer>(&format!(
            "SELECT {JOB_OFFER_COLUMNS} FROM job_offers ORDER BY posted_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateJobOffer,
    ) -> Result<Option<Self>, sqlx::Error> {
        let offer = sqlx::query_as::<_, JobOffer>(&format!(
            r#"
            UPDATE job_offers SET
                title = COALESCE($2, title),
                company = COALESCE($3, company),
                location = COALESCE($4, location),
                employment_type = COALESCE($5, employment_type),
                salary = COALESCE($6, salary),
                category = COALESCE($7, category),
                featured = COALESCE($8, featured),
                description = COALESCE($9, description),
                requirements = COALESCE($10, requirements),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_OFFER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.company)
        .bind(data.location)
        .bind(data.employment_type)
        .bind(data.salary)
        .bind(data.category)
        .bind(data.featured)
        .bind(data.description)
        .bind(data.requirements)
        .fetch_optional(pool)
        .await?;

        Ok(offer)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_offers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
