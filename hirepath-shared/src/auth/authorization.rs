/// Authorization checks
///
/// HirePath has two roles. Candidates can only touch their own records;
/// admins (the recruitment office) can touch everyone's. Handlers call these
/// helpers after loading the record whose owner they need to compare.
///
/// # Example
///
/// ```
/// use hirepath_shared::auth::authorization::{require_admin, require_self_or_admin};
/// use hirepath_shared::auth::middleware::AuthContext;
/// use hirepath_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let me = Uuid::new_v4();
/// let auth = AuthContext { user_id: me, email: "me@example.com".into(), role: UserRole::Candidate };
///
/// assert!(require_self_or_admin(&auth, me).is_ok());
/// assert!(require_self_or_admin(&auth, Uuid::new_v4()).is_err());
/// assert!(require_admin(&auth).is_err());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Route is reserved for administrators
    #[error("Administrator access required")]
    AdminRequired,

    /// Caller neither owns the resource nor is an administrator
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Allows administrators only
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}

/// Allows the owner of a resource, or any administrator
pub fn require_self_or_admin(auth: &AuthContext, owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id == owner_id || auth.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::NotAuthorized)
    }
}

/// Resolves an optional `user_id` filter to the user the caller may query
///
/// Candidates default to themselves; asking for someone else requires admin.
pub fn resolve_target_user(auth: &AuthContext, requested: Option<Uuid>) -> Result<Uuid, AuthzError> {
    let target = requested.unwrap_or(auth.user_id);
    require_self_or_admin(auth, target)?;
    Ok(target)
}
