/// Database models for HirePath
///
/// Each model owns its table and exposes its CRUD operations as associated
/// functions. Functions that take a generic `PgExecutor` can run either on
/// the pool or inside a transaction (`&mut *tx`).
///
/// # Models
///
/// - `user`: Candidate and admin accounts with their profile
/// - `step`: The ordered pipeline catalog
/// - `user_step`: Per-user progress through the catalog
/// - `document`: Uploaded candidate documents
/// - `payment`: Payment requests (evaluation fee, ...)
/// - `notification`: Dashboard notifications
/// - `password_reset`: Single-use reset token hashes
/// - `job_offer`: Public job listings
///
/// # Example
///
/// ```no_run
/// use hirepath_shared::models::user::{CreateUser, User, UserProfile, UserRole};
/// use hirepath_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::new("postgresql://localhost/hirepath")).await?;
///
/// let new_user = CreateUser {
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     accept_terms: true,
///     newsletter: false,
///     role: UserRole::Candidate,
///     profile: UserProfile::default(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod document;
pub mod job_offer;
pub mod notification;
pub mod password_reset;
pub mod payment;
pub mod step;
pub mod user;
pub mod user_step;
