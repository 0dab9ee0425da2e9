/// Applies progression plans to the database
///
/// Every entry point runs in one transaction: the user row and all of the
/// user's `user_steps` rows are locked with `FOR UPDATE` before anything is
/// written, so two requests reaching the same milestone serialize and the
/// second one sees the first one's result.
///
/// Rules enforced while applying:
///
/// - a step is never moved backwards (completed stays completed, current is
///   never reset to pending)
/// - a milestone whose steps are already completed writes nothing, so no
///   duplicate notifications or payment requests appear
/// - step orders missing from the catalog are skipped with a warning; a plan
///   with none of its steps in the catalog writes nothing at all

use crate::models::document::Document;
use crate::models::notification::{CreateNotification, Notification};
use crate::models::payment::{CreatePayment, Payment, PaymentStatus};
use crate::models::step::Step;
use crate::models::user::User;
use crate::models::user_step::{UserStep, UserStepStatus};
use crate::workflow::progression::{
    check_documents, plan, Milestone, ProgressPlan, ProgressionPolicy, DOCUMENT_STEP,
};
use crate::workflow::WorkflowError;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What applying a plan changed
#[derive(Debug, Clone)]
pub enum AppliedProgress {
    /// Every step of the plan was already completed; nothing was written
    AlreadyReached,

    Applied {
        completed: Vec<i32>,
        activated: Option<i32>,
        notifications: Vec<Notification>,
        payment: Option<Payment>,
    },
}

/// Outcome of a document step check
#[derive(Debug, Clone)]
pub enum DocumentProgress {
    /// The document step was completed earlier
    AlreadyCompleted,

    /// The document step was just completed
    Advanced {
        activated: Option<i32>,
        payment: Option<Payment>,
    },
}

/// Applies `plan` for `user_id` on an open transaction
///
/// The caller owns the transaction and commits it.
pub async fn apply_plan(
    conn: &mut PgConnection,
    user_id: Uuid,
    plan: &ProgressPlan,
) -> Result<AppliedProgress, WorkflowError> {
    if !User::lock(&mut *conn, user_id).await? {
        return Err(WorkflowError::UserNotFound(user_id));
    }

    let catalog = Step::list(&mut *conn).await?;
    let by_order: HashMap<i32, &Step> = catalog.iter().map(|s| (s.step_order, s)).collect();

    let progress = UserStep::lock_for_user(&mut *conn, user_id).await?;
    let status_of: HashMap<Uuid, UserStepStatus> =
        progress.iter().map(|row| (row.step_id, row.status)).collect();

    let mut to_complete = Vec::with_capacity(plan.complete.len());
    for order in &plan.complete {
        match by_order.get(order) {
            Some(step) => to_complete.push(*step),
            None => warn!(user_id = %user_id, step_order = order, "Step order not in catalog, skipping"),
        }
    }

    if !plan.complete.is_empty() && to_complete.is_empty() {
        warn!(user_id = %user_id, steps = ?plan.complete, "No milestone step in catalog, nothing applied");
        return Ok(AppliedProgress::AlreadyReached);
    }

    let already_reached = !to_complete.is_empty()
        && to_complete
            .iter()
            .all(|step| status_of.get(&step.id) == Some(&UserStepStatus::Completed));
    if already_reached {
        debug!(user_id = %user_id, steps = ?plan.complete, "Milestone already reached");
        return Ok(AppliedProgress::AlreadyReached);
    }

    let mut completed = Vec::new();
    for step in to_complete {
        let current = status_of.get(&step.id).copied();
        if current == Some(UserStepStatus::Completed) {
            continue;
        }
        UserStep::upsert_status(&mut *conn, user_id, step.id, UserStepStatus::Completed).await?;
        completed.push(step.step_order);
    }

    let mut activated = None;
    if let Some(order) = plan.activate {
        match by_order.get(&order) {
            Some(step) => {
                let current = status_of
                    .get(&step.id)
                    .copied()
                    .unwrap_or(UserStepStatus::Pending);
                if current == UserStepStatus::Pending {
                    UserStep::upsert_status(&mut *conn, user_id, step.id, UserStepStatus::Current)
                        .await?;
                    activated = Some(order);
                }
            }
            None => warn!(user_id = %user_id, step_order = order, "Step order not in catalog, skipping"),
        }
    }

    let mut notifications = Vec::with_capacity(plan.notifications.len());
    for draft in &plan.notifications {
        let notification = Notification::create(
            &mut *conn,
            CreateNotification::new(user_id, draft.message.clone(), draft.kind),
        )
        .await?;
        notifications.push(notification);
    }

    let mut payment = None;
    if let Some(draft) = &plan.payment {
        let step_id = draft
            .step_order
            .and_then(|order| by_order.get(&order))
            .map(|step| step.id);

        let existing = match step_id {
            Some(step_id) => Payment::find_pending_for_step(&mut *conn, user_id, step_id).await?,
            None => None,
        };

        payment = match existing {
            Some(existing) => {
                debug!(user_id = %user_id, payment_id = %existing.id, "Payment already requested");
                Some(existing)
            }
            None => Some(
                Payment::create(
                    &mut *conn,
                    CreatePayment {
                        user_id,
                        step_id,
                        description: draft.description.clone(),
                        amount: draft.amount,
                        currency: draft.currency.clone(),
                        status: PaymentStatus::Pending,
                        payment_date: None,
                    },
                )
                .await?,
            ),
        };
    }

    info!(
        user_id = %user_id,
        completed = ?completed,
        activated = ?activated,
        notifications = notifications.len(),
        payment_requested = payment.is_some(),
        "Progress applied"
    );

    Ok(AppliedProgress::Applied {
        completed,
        activated,
        notifications,
        payment,
    })
}

/// Plans `milestone` against the current catalog and applies it
pub async fn reach(
    conn: &mut PgConnection,
    user_id: Uuid,
    milestone: &Milestone,
    policy: &ProgressionPolicy,
) -> Result<AppliedProgress, WorkflowError> {
    let orders: Vec<i32> = Step::list(&mut *conn)
        .await?
        .iter()
        .map(|step| step.step_order)
        .collect();

    debug!(user_id = %user_id, milestone = milestone.as_str(), "Milestone reached");

    let progress_plan = plan(milestone, &orders, policy);
    apply_plan(conn, user_id, &progress_plan).await
}

/// Sets up the pipeline for a freshly registered user
///
/// Runs on the caller's transaction so the account and its progress are
/// created together.
pub async fn initialize(
    conn: &mut PgConnection,
    user_id: Uuid,
    policy: &ProgressionPolicy,
) -> Result<AppliedProgress, WorkflowError> {
    reach(conn, user_id, &Milestone::Registered, policy).await
}

/// Notifies the candidate that an uploaded document is under review
pub async fn record_submission(
    pool: &PgPool,
    user_id: Uuid,
    document_name: &str,
    policy: &ProgressionPolicy,
) -> Result<AppliedProgress, WorkflowError> {
    let mut tx = pool.begin().await?;
    let milestone = Milestone::DocumentSubmitted {
        document_name: document_name.to_string(),
    };
    let applied = reach(&mut *tx, user_id, &milestone, policy).await?;
    tx.commit().await?;

    Ok(applied)
}

/// Leaves the document step if every required document is validated
///
/// # Errors
///
/// Returns [`WorkflowError::Progression`] when the document count is wrong
/// or some documents are still under review, and
/// [`WorkflowError::StepNotInCatalog`] when no catalog step holds the
/// document step's order.
pub async fn advance_documents(
    pool: &PgPool,
    user_id: Uuid,
    policy: &ProgressionPolicy,
) -> Result<DocumentProgress, WorkflowError> {
    let mut tx = pool.begin().await?;

    if !User::lock(&mut *tx, user_id).await? {
        return Err(WorkflowError::UserNotFound(user_id));
    }

    let catalog = Step::list(&mut *tx).await?;
    let progress = UserStep::lock_for_user(&mut *tx, user_id).await?;

    let Some(document_step) = catalog.iter().find(|step| step.step_order == DOCUMENT_STEP) else {
        return Err(WorkflowError::StepNotInCatalog(DOCUMENT_STEP));
    };
    let document_step_done = progress
        .iter()
        .any(|row| row.step_id == document_step.id && row.status == UserStepStatus::Completed);
    if document_step_done {
        return Ok(DocumentProgress::AlreadyCompleted);
    }

    let statuses: Vec<_> = Document::list_by_user(&mut *tx, user_id)
        .await?
        .into_iter()
        .map(|doc| doc.status)
        .collect();
    check_documents(&statuses, policy.required_documents)?;

    let applied = reach(&mut *tx, user_id, &Milestone::DocumentsValidated, policy).await?;
    tx.commit().await?;

    Ok(match applied {
        AppliedProgress::AlreadyReached => DocumentProgress::AlreadyCompleted,
        AppliedProgress::Applied {
            activated, payment, ..
        } => DocumentProgress::Advanced { activated, payment },
    })
}

/// Completes the step gated by a payment that is now paid
///
/// Returns `None` when the payment is not paid or gates no step.
pub async fn settle_payment(
    pool: &PgPool,
    payment: &Payment,
    policy: &ProgressionPolicy,
) -> Result<Option<AppliedProgress>, WorkflowError> {
    if payment.status != PaymentStatus::Paid {
        return Ok(None);
    }
    let Some(step_id) = payment.step_id else {
        return Ok(None);
    };

    let mut tx = pool.begin().await?;

    let Some(step) = Step::find_by_id(&mut *tx, step_id).await? else {
        warn!(payment_id = %payment.id, step_id = %step_id, "Payment linked to a deleted step");
        return Ok(None);
    };

    let milestone = Milestone::PaymentSettled {
        step_order: step.step_order,
    };
    let applied = reach(&mut *tx, payment.user_id, &milestone, policy).await?;
    tx.commit().await?;

    Ok(Some(applied))
}
