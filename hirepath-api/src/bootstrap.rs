/// Startup provisioning of the first administrator
///
/// With `BOOTSTRAP_ADMIN_EMAIL` / `BOOTSTRAP_ADMIN_PASSWORD` set, the server
/// makes sure that account exists and has the admin role. An existing
/// account keeps its password and is only promoted. Safe to run on every
/// start.

use crate::config::BootstrapAdmin;
use anyhow::Context;
use hirepath_shared::{
    auth::password,
    models::user::{CreateUser, User, UserProfile, UserRole},
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

#[instrument(skip_all, fields(email = %admin.email))]
pub async fn ensure_admin(pool: &PgPool, admin: &BootstrapAdmin) -> anyhow::Result<Uuid> {
    if let Some(existing) = User::find_by_email(pool, &admin.email).await? {
        if existing.role != UserRole::Admin {
            User::set_role(pool, existing.id, UserRole::Admin).await?;
            tracing::info!(user_id = %existing.id, "Promoted existing user to admin");
        }
        return Ok(existing.id);
    }

    let password_hash =
        password::hash_password(&admin.password).context("failed to hash bootstrap admin password")?;

    let user = User::create(
        pool,
        CreateUser {
            email: admin.email.clone(),
            password_hash,
            first_name: "Admin".to_string(),
            last_name: "Account".to_string(),
            accept_terms: true,
            newsletter: false,
            role: UserRole::Admin,
            profile: UserProfile::default(),
        },
    )
    .await
    .context("failed to create bootstrap admin")?;

    tracing::info!(user_id = %user.id, "Bootstrap admin created");
    Ok(user.id)
}
