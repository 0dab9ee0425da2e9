/// Payment requests and their settlement
///
/// Payments are records, not transactions: the recruitment office creates a
/// request (e.g. the evaluation fee) and flips it to `paid` once the money
/// arrives. A payment may gate a pipeline step through `step_id`; settling it
/// completes that step.
///
/// `payment_date` follows the status: set (defaulting to now) when paid,
/// cleared when pending. The rule lives in SQL so create and update agree.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE payment_status AS ENUM ('pending', 'paid');
///
/// CREATE TABLE payments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     step_id UUID REFERENCES steps(id) ON DELETE SET NULL,
///     description VARCHAR(255) NOT NULL,
///     amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
///     currency VARCHAR(3) NOT NULL,
///     status payment_status NOT NULL DEFAULT 'pending',
///     payment_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,

    /// Step this payment gates, if any
    pub step_id: Option<Uuid>,

    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Whether this update moved the payment from pending to paid
    pub fn was_settled_from(&self, previous: &Payment) -> bool {
        previous.status == PaymentStatus::Pending && self.status == PaymentStatus::Paid
    }
}

/// Payment with the payer's name, for the admin overview
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,

    pub user_name: String,
}

#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub user_id: Uuid,
    pub step_id: Option<Uuid>,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePayment {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<PaymentStatus>,
    pub payment_date: Option<DateTime<Utc>>,
}

const PAYMENT_COLUMNS: &str = "id, user_id, step_id, description, amount, currency, status, \
     payment_date, created_at, updated_at";

/// Normalizes an ISO 4217 currency code
pub fn normalize_currency(code: &str) -> String {
    code.trim().to_uppercase()
}

impl Payment {
    pub async fn create<'e, E>(executor: E, data: CreatePayment) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (user_id, step_id, description, amount, currency, status, payment_date)
            VALUES (
                $1, $2, $3, $4, $5, $6,
                CASE WHEN $6 = 'paid'::payment_status THEN COALESCE($7, NOW()) ELSE NULL END
            )
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.step_id)
        .bind(data.description)
        .bind(data.amount)
        .bind(normalize_currency(&data.currency))
        .bind(data.status)
        .bind(data.payment_date)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Every payment with the payer's full name, newest first
    pub async fn list_all_with_users(pool: &PgPool) -> Result<Vec<PaymentWithUser>, sqlx::Error> {
        sqlx::query_as::<_, PaymentWithUser>(
            r#"
            SELECT p.id, p.user_id, p.step_id, p.description, p.amount, p.currency, p.status,
                   p.payment_date, p.created_at, p.updated_at,
                   TRIM(u.first_name || ' ' || u.last_name) AS user_name
            FROM payments p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Pending payment already requested for a user and step
    pub async fn find_pending_for_step<'e, E>(
        executor: E,
        user_id: Uuid,
        step_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments
            WHERE user_id = $1 AND step_id = $2 AND status = 'pending'
            ORDER BY created_at
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(step_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    /// Applies a partial update and re-derives `payment_date` from the status
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePayment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            UPDATE payments SET
                description = COALESCE($2, description),
                amount = COALESCE($3, amount),
                currency = COALESCE($4, currency),
                status = COALESCE($5, status),
                payment_date = CASE
                    WHEN COALESCE($5, status) = 'paid'::payment_status
                        THEN COALESCE($6, payment_date, NOW())
                    ELSE NULL
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.description)
        .bind(data.amount)
        .bind(data.currency.as_deref().map(normalize_currency))
        .bind(data.status)
        .bind(data.payment_date)
        .fetch_optional(pool)
        .await?;

        Ok(payment)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payment(status: PaymentStatus) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            step_id: None,
            description: "Evaluation fee".to_string(),
            amount: Decimal::from(150),
            currency: "USD".to_string(),
            status,
            payment_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency(" usd "), "USD");
    }

    #[test]
    fn test_was_settled_from() {
        let pending = payment(PaymentStatus::Pending);
        let paid = payment(PaymentStatus::Paid);

        assert!(paid.was_settled_from(&pending));
        assert!(!paid.was_settled_from(&paid));
        assert!(!pending.was_settled_from(&paid));
    }

    #[test]
    fn test_payment_with_user_serializes_flat() {
        let mut p = payment(PaymentStatus::Paid);
        p.amount = Decimal::from_str("150.50").unwrap();
        let row = PaymentWithUser {
            payment: p,
            user_name: "Ada Lovelace".to_string(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["user_name"], "Ada Lovelace");
        assert_eq!(json["status"], "paid");
        assert_eq!(json["amount"], "150.50");
    }
}
