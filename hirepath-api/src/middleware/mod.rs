/// Middleware modules for the API server
///
/// - `security`: Browser hardening headers
/// - `auth`: Bearer JWT authentication for protected routes

pub mod auth;
pub mod security;
