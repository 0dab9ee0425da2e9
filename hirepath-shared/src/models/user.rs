/// User model and database operations
///
/// A user is either a candidate going through the recruitment pipeline or an
/// administrator of the recruitment office. The row holds credentials plus the
/// profile collected by the registration form.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('candidate', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(100) NOT NULL,
///     last_name VARCHAR(100) NOT NULL,
///     phone, birth_date, nationality, current_country, current_city,
///     preferred_province, current_job, experience, education, languages,
///     accept_terms BOOLEAN NOT NULL DEFAULT FALSE,
///     newsletter BOOLEAN NOT NULL DEFAULT FALSE,
///     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     role user_role NOT NULL DEFAULT 'candidate',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Emails are stored normalized (trimmed, lowercase); see [`normalize_email`].
///
/// # Example
///
/// ```no_run
/// use hirepath_shared::models::user::{CreateUser, User, UserProfile, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     accept_terms: true,
///     newsletter: false,
///     role: UserRole::Candidate,
///     profile: UserProfile::default(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ADA@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Applicant going through the pipeline
    Candidate,

    /// Recruitment office staff
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Candidate => "candidate",
            UserRole::Admin => "admin",
        }
    }
}

/// User account
///
/// Serialized in camelCase for the frontend. The password hash never leaves
/// the server.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub current_country: Option<String>,
    pub current_city: Option<String>,
    pub preferred_province: Option<String>,
    pub current_job: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub languages: Option<String>,
    pub accept_terms: bool,
    pub newsletter: bool,
    pub is_verified: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last", used in emails and payment listings
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Optional profile fields from the registration form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub current_country: Option<String>,
    pub current_city: Option<String>,
    pub preferred_province: Option<String>,
    pub current_job: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub languages: Option<String>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (normalized before insert)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub accept_terms: bool,
    pub newsletter: bool,
    pub role: UserRole,
    pub profile: UserProfile,
}

/// Profile update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub newsletter: Option<bool>,
    pub profile: UserProfile,
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, birth_date, \
     nationality, current_country, current_city, preferred_province, current_job, experience, \
     education, languages, accept_terms, newsletter, is_verified, role, created_at, updated_at";

/// Lowercases and trims an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_email_key` if the email is taken.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let profile = data.profile;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                email, password_hash, first_name, last_name, phone, birth_date, nationality,
                current_country, current_city, preferred_province, current_job, experience,
                education, languages, accept_terms, newsletter, role
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(normalize_email(&data.email))
        .bind(data.password_hash)
        .bind(data.first_name.trim().to_string())
        .bind(data.last_name.trim().to_string())
        .bind(profile.phone)
        .bind(profile.birth_date)
        .bind(profile.nationality)
        .bind(profile.current_country)
        .bind(profile.current_city)
        .bind(profile.preferred_province)
        .bind(profile.current_job)
        .bind(profile.experience)
        .bind(profile.education)
        .bind(profile.languages)
        .bind(data.accept_terms)
        .bind(data.newsletter)
        .bind(data.role)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email (case-insensitive through normalization)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await
    }

    /// Lists all users, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Locks the user row for the rest of the transaction
    ///
    /// Progression for one user is serialized on this lock. Returns `false`
    /// if the user does not exist.
    pub async fn lock<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.is_some())
    }

    /// Updates profile fields that are present in `data`
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = data.profile;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                newsletter = COALESCE($4, newsletter),
                phone = COALESCE($5, phone),
                birth_date = COALESCE($6, birth_date),
                nationality = COALESCE($7, nationality),
                current_country = COALESCE($8, current_country),
                current_city = COALESCE($9, current_city),
                preferred_province = COALESCE($10, preferred_province),
                current_job = COALESCE($11, current_job),
                experience = COALESCE($12, experience),
                education = COALESCE($13, education),
                languages = COALESCE($14, languages),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.first_name.map(|s| s.trim().to_string()))
        .bind(data.last_name.map(|s| s.trim().to_string()))
        .bind(data.newsletter)
        .bind(profile.phone)
        .bind(profile.birth_date)
        .bind(profile.nationality)
        .bind(profile.current_country)
        .bind(profile.current_city)
        .bind(profile.preferred_province)
        .bind(profile.current_job)
        .bind(profile.experience)
        .bind(profile.education)
        .bind(profile.languages)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replaces the password hash
    pub async fn update_password<'e, E>(
        executor: E,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Changes a user's role
    pub async fn set_role(pool: &PgPool, id: Uuid, role: UserRole) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user; documents, steps, payments and notifications cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: None,
            birth_date: NaiveDate::from_ymd_opt(1990, 12, 10),
            nationality: Some("British".to_string()),
            current_country: None,
            current_city: None,
            preferred_province: Some("Quebec".to_string()),
            current_job: None,
            experience: None,
            education: None,
            languages: None,
            accept_terms: true,
            newsletter: false,
            is_verified: false,
            role: UserRole::Candidate,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_user_json_hides_password_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["preferredProvince"], "Quebec");
        assert_eq!(json["birthDate"], "1990-12-10");
        assert_eq!(json["role"], "candidate");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_user().full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Candidate.as_str(), "candidate");
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }
}
