/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access tokens and document review link tokens
/// - [`middleware`]: Bearer token extraction into an `AuthContext`
/// - [`authorization`]: Role and ownership checks
/// - [`reset_token`]: Single-use password reset tokens
///
/// # Example
///
/// ```no_run
/// use hirepath_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod reset_token;
