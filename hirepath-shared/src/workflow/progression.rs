/// Step progression planning
///
/// Pure functions that decide what happens when a candidate reaches a
/// milestone. Nothing here touches the database: [`plan`] returns a
/// [`ProgressPlan`] that the executor applies inside a transaction.
///
/// # Pipeline
///
/// ```text
/// 1 Account creation ─┐
/// 2 Profile completion┴─ Registered
/// 3 Documents ─────────── DocumentSubmitted (per upload), DocumentsValidated
/// 4 Evaluation fee ────── PaymentSettled
/// 5 Application review
/// ```
///
/// Step numbers refer to `step_order` in the catalog, not to row ids, so an
/// admin can rename steps or append new ones without touching this module.
///
/// # Example
///
/// ```
/// use hirepath_shared::workflow::progression::{plan, Milestone, ProgressionPolicy};
///
/// let policy = ProgressionPolicy::default();
/// let p = plan(&Milestone::DocumentsValidated, &[1, 2, 3, 4, 5], &policy);
///
/// assert_eq!(p.complete, vec![3]);
/// assert_eq!(p.activate, Some(4));
/// assert!(p.payment.is_some());
/// ```

use crate::models::document::DocumentStatus;
use crate::models::notification::NotificationType;
use rust_decimal::Decimal;
use thiserror::Error;

pub use crate::models::user_step::UserStepStatus;

/// Catalog order of the account creation step
pub const ACCOUNT_STEP: i32 = 1;

/// Catalog order of the profile form step
pub const PROFILE_STEP: i32 = 2;

/// Catalog order of the document upload and validation step
pub const DOCUMENT_STEP: i32 = 3;

/// Default number of validated documents needed to leave the document step
pub const DEFAULT_REQUIRED_DOCUMENTS: usize = 5;

/// Description of the payment requested after document validation
pub const EVALUATION_FEE_DESCRIPTION: &str = "Evaluation fee";

/// Event that may move a candidate forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Milestone {
    /// Account created through the registration form
    Registered,

    /// A document was uploaded and awaits review
    DocumentSubmitted { document_name: String },

    /// Every required document has been validated
    DocumentsValidated,

    /// A payment gating `step_order` was marked paid
    PaymentSettled { step_order: i32 },
}

impl Milestone {
    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Milestone::Registered => "registered",
            Milestone::DocumentSubmitted { .. } => "document_submitted",
            Milestone::DocumentsValidated => "documents_validated",
            Milestone::PaymentSettled { .. } => "payment_settled",
        }
    }
}

/// Tunables of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionPolicy {
    /// Exact number of validated documents the document step needs
    pub required_documents: usize,

    /// Amount of the evaluation fee requested after validation
    pub evaluation_fee: Decimal,

    /// ISO 4217 code of the evaluation fee
    pub evaluation_fee_currency: String,
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            required_documents: DEFAULT_REQUIRED_DOCUMENTS,
            evaluation_fee: Decimal::from(150),
            evaluation_fee_currency: "USD".to_string(),
        }
    }
}

/// Notification to insert for the candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub message: String,
    pub kind: NotificationType,
}

impl NotificationDraft {
    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationType::Success,
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationType::Info,
        }
    }
}

/// Pending payment request to insert for the candidate
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub description: String,
    pub amount: Decimal,
    pub currency: String,

    /// Step the payment gates; settling the payment completes it
    pub step_order: Option<i32>,
}

/// Records to write once a milestone is reached
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressPlan {
    /// Step orders to mark completed
    pub complete: Vec<i32>,

    /// Step order to mark current
    pub activate: Option<i32>,

    pub notifications: Vec<NotificationDraft>,
    pub payment: Option<PaymentDraft>,
}

impl ProgressPlan {
    /// True when applying the plan would write nothing
    pub fn is_empty(&self) -> bool {
        self.complete.is_empty()
            && self.activate.is_none()
            && self.notifications.is_empty()
            && self.payment.is_none()
    }
}

/// Reasons the document step cannot be left yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("Incorrect number of documents: found {found}, expected {expected}")]
    IncorrectDocumentCount { found: usize, expected: usize },

    #[error("Not all documents are validated ({pending} still under review)")]
    DocumentsNotValidated { pending: usize },
}

/// Smallest catalog order strictly greater than `after`
pub fn next_step(after: i32, catalog_orders: &[i32]) -> Option<i32> {
    catalog_orders.iter().copied().filter(|order| *order > after).min()
}

/// Decides which records a milestone produces
///
/// `catalog_orders` is the set of `step_order` values currently in the
/// catalog; the step to activate is looked up there so gaps are tolerated.
pub fn plan(milestone: &Milestone, catalog_orders: &[i32], policy: &ProgressionPolicy) -> ProgressPlan {
    match milestone {
        Milestone::Registered => ProgressPlan {
            complete: vec![ACCOUNT_STEP, PROFILE_STEP],
            activate: next_step(PROFILE_STEP, catalog_orders),
            notifications: vec![
                NotificationDraft::success("Step 1: account created successfully."),
                NotificationDraft::success("Step 2: profile form completed successfully."),
            ],
            payment: None,
        },

        Milestone::DocumentSubmitted { document_name } => ProgressPlan {
            notifications: vec![NotificationDraft::success(format!(
                "Step 3: your document {} was uploaded successfully and is now under review.",
                document_name
            ))],
            ..Default::default()
        },

        Milestone::DocumentsValidated => {
            let activate = next_step(DOCUMENT_STEP, catalog_orders);

            let mut notifications = vec![NotificationDraft::success(
                "Great! Step 3 is validated. Your documents were processed successfully.",
            )];
            if let Some(order) = activate {
                notifications.push(NotificationDraft::info(format!("Step {}: in progress", order)));
            }
            notifications.push(NotificationDraft::info(format!(
                "Payment pending: {} {} {}",
                EVALUATION_FEE_DESCRIPTION, policy.evaluation_fee, policy.evaluation_fee_currency
            )));

            ProgressPlan {
                complete: vec![DOCUMENT_STEP],
                activate,
                notifications,
                payment: Some(PaymentDraft {
                    description: EVALUATION_FEE_DESCRIPTION.to_string(),
                    amount: policy.evaluation_fee,
                    currency: policy.evaluation_fee_currency.clone(),
                    step_order: activate,
                }),
            }
        }

        Milestone::PaymentSettled { step_order } => ProgressPlan {
            complete: vec![*step_order],
            activate: next_step(*step_order, catalog_orders),
            notifications: vec![NotificationDraft::success(format!(
                "Payment received: step {} is complete.",
                step_order
            ))],
            payment: None,
        },
    }
}

/// Checks that exactly `required` documents exist and all are validated
pub fn check_documents(statuses: &[DocumentStatus], required: usize) -> Result<(), ProgressionError> {
    if statuses.len() != required {
        return Err(ProgressionError::IncorrectDocumentCount {
            found: statuses.len(),
            expected: required,
        });
    }

    let pending = statuses
        .iter()
        .filter(|status| **status != DocumentStatus::Validated)
        .count();
    if pending > 0 {
        return Err(ProgressionError::DocumentsNotValidated { pending });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: [i32; 5] = [1, 2, 3, 4, 5];

    fn messages(plan: &ProgressPlan) -> Vec<&str> {
        plan.notifications.iter().map(|n| n.message.as_str()).collect()
    }

    #[test]
    fn test_registered_completes_first_two_steps() {
        let p = plan(&Milestone::Registered, &CATALOG, &ProgressionPolicy::default());

        assert_eq!(p.complete, vec![1, 2]);
        assert_eq!(p.activate, Some(3));
        assert_eq!(
            messages(&p),
            vec![
                "Step 1: account created successfully.",
                "Step 2: profile form completed successfully."
            ]
        );
        assert!(p.notifications.iter().all(|n| n.kind == NotificationType::Success));
        assert!(p.payment.is_none());
    }

    #[test]
    fn test_document_submitted_only_notifies() {
        let milestone = Milestone::DocumentSubmitted {
            document_name: "Passport".to_string(),
        };
        let p = plan(&milestone, &CATALOG, &ProgressionPolicy::default());

        assert!(p.complete.is_empty());
        assert!(p.activate.is_none());
        assert_eq!(
            messages(&p),
            vec!["Step 3: your document Passport was uploaded successfully and is now under review."]
        );
    }

    #[test]
    fn test_documents_validated_requests_payment() {
        let policy = ProgressionPolicy::default();
        let p = plan(&Milestone::DocumentsValidated, &CATALOG, &policy);

        assert_eq!(p.complete, vec![3]);
        assert_eq!(p.activate, Some(4));
        assert_eq!(
            messages(&p),
            vec![
                "Great! Step 3 is validated. Your documents were processed successfully.",
                "Step 4: in progress",
                "Payment pending: Evaluation fee 150 USD",
            ]
        );
        assert_eq!(p.notifications[1].kind, NotificationType::Info);

        let payment = p.payment.unwrap();
        assert_eq!(payment.description, "Evaluation fee");
        assert_eq!(payment.amount, Decimal::from(150));
        assert_eq!(payment.currency, "USD");
        assert_eq!(payment.step_order, Some(4));
    }

    #[test]
    fn test_documents_validated_uses_policy_fee() {
        let policy = ProgressionPolicy {
            required_documents: 3,
            evaluation_fee: Decimal::new(9950, 2),
            evaluation_fee_currency: "CAD".to_string(),
        };
        let p = plan(&Milestone::DocumentsValidated, &CATALOG, &policy);

        assert!(messages(&p).contains(&"Payment pending: Evaluation fee 99.50 CAD"));
        assert_eq!(p.payment.unwrap().currency, "CAD");
    }

    #[test]
    fn test_payment_settled_moves_to_next_step() {
        let p = plan(
            &Milestone::PaymentSettled { step_order: 4 },
            &CATALOG,
            &ProgressionPolicy::default(),
        );

        assert_eq!(p.complete, vec![4]);
        assert_eq!(p.activate, Some(5));
        assert_eq!(messages(&p), vec!["Payment received: step 4 is complete."]);
    }

    #[test]
    fn test_catalog_end_activates_nothing() {
        let p = plan(
            &Milestone::PaymentSettled { step_order: 5 },
            &CATALOG,
            &ProgressionPolicy::default(),
        );

        assert_eq!(p.complete, vec![5]);
        assert_eq!(p.activate, None);
    }

    #[test]
    fn test_next_step_skips_gaps() {
        assert_eq!(next_step(3, &[1, 2, 3, 7, 10]), Some(7));
        assert_eq!(next_step(2, &[5, 3, 1]), Some(3));
        assert_eq!(next_step(10, &[1, 2, 3]), None);
        assert_eq!(next_step(0, &[]), None);
    }

    #[test]
    fn test_check_documents_wrong_count() {
        let statuses = vec![DocumentStatus::Validated; 4];

        assert_eq!(
            check_documents(&statuses, 5),
            Err(ProgressionError::IncorrectDocumentCount { found: 4, expected: 5 })
        );

        let statuses = vec![DocumentStatus::Validated; 6];
        assert!(matches!(
            check_documents(&statuses, 5),
            Err(ProgressionError::IncorrectDocumentCount { found: 6, .. })
        ));
    }

    #[test]
    fn test_check_documents_pending() {
        let statuses = vec![
            DocumentStatus::Validated,
            DocumentStatus::Pending,
            DocumentStatus::Validated,
            DocumentStatus::Missing,
            DocumentStatus::Validated,
        ];

        assert_eq!(
            check_documents(&statuses, 5),
            Err(ProgressionError::DocumentsNotValidated { pending: 2 })
        );
    }

    #[test]
    fn test_check_documents_ok() {
        let statuses = vec![DocumentStatus::Validated; 5];
        assert!(check_documents(&statuses, 5).is_ok());
    }

    #[test]
    fn test_empty_plan() {
        assert!(ProgressPlan::default().is_empty());
        assert!(!plan(&Milestone::Registered, &CATALOG, &ProgressionPolicy::default()).is_empty());
    }
}
