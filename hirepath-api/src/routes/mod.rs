/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and password reset
/// - `users`: Registration and profile
/// - `progress`: Document step check
/// - `documents`: Uploads, downloads and admin updates
/// - `review`: Signed review links from the upload email
/// - `job_offers`, `notifications`, `payments`, `steps`, `user_steps`: CRUD

use serde::Deserialize;
use uuid::Uuid;

pub mod auth;
pub mod documents;
pub mod health;
pub mod job_offers;
pub mod notifications;
pub mod payments;
pub mod progress;
pub mod review;
pub mod steps;
pub mod user_steps;
pub mod users;

/// `?user_id=` filter on per-user collections
///
/// Absent means the caller; another user's id requires admin.
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub user_id: Option<Uuid>,
}
