/// Application-progress state machine
///
/// Split in two halves:
///
/// - `progression`: pure planning (which steps to complete, which to
///   activate, which notifications and payment requests to create)
/// - `executor`: applies a plan inside a PostgreSQL transaction, with the
///   user's progress rows locked so concurrent milestones serialize
///
/// # Example
///
/// ```no_run
/// use hirepath_shared::workflow::{executor, progression::ProgressionPolicy};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = executor::advance_documents(&pool, user_id, &ProgressionPolicy::default()).await?;
/// println!("{:?}", outcome);
/// # Ok(())
/// # }
/// ```

pub mod executor;
pub mod progression;

use thiserror::Error;
use uuid::Uuid;

pub use progression::ProgressionError;

/// Errors raised while applying progression
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("No step with order {0} in the catalog")]
    StepNotInCatalog(i32),
}
