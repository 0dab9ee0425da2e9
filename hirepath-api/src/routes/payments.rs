/// Payment endpoints
///
/// Payments are records kept by the recruitment office: administrators
/// create them and mark them paid, candidates read their own and report a
/// payment through `/submit`. Marking a payment that gates a step as paid
/// completes that step.
///
/// # Endpoints
///
/// - `POST /api/payments` - Create (admin)
/// - `GET /api/payments?user_id=` - List
/// - `GET /api/payments/all` - List all with payer names (admin)
/// - `GET /api/payments/:id` - Get
/// - `PUT /api/payments/:id` - Update (admin)
/// - `DELETE /api/payments/:id` - Delete (admin)
/// - `POST /api/payments/:id/submit` - Email payment details to the office

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::UserFilter,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use hirepath_shared::{
    auth::{
        authorization::{require_admin, require_self_or_admin, resolve_target_user},
        middleware::AuthContext,
    },
    mail::templates,
    models::{
        payment::{CreatePayment, Payment, PaymentStatus, PaymentWithUser, UpdatePayment},
        user::User,
    },
    workflow::executor,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub user_id: Uuid,

    /// Step this payment unlocks, if any
    pub step_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Description is required (max 255 characters)"))]
    pub description: String,

    pub amount: Decimal,

    /// ISO 4217 code; defaults to the evaluation fee currency
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    #[serde(default = "default_status")]
    pub status: PaymentStatus,

    pub payment_date: Option<DateTime<Utc>>,
}

fn default_status() -> PaymentStatus {
    PaymentStatus::Pending
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: Option<String>,

    pub amount: Option<Decimal>,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    pub status: Option<PaymentStatus>,

    pub payment_date: Option<DateTime<Utc>>,
}

fn check_amount(amount: Decimal) -> ApiResult<()> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::invalid_field("amount", "Amount must be greater than zero"));
    }
    Ok(())
}

/// Completes the gated step when `payment` is paid
async fn settle(state: &AppState, payment: &Payment) -> ApiResult<()> {
    if let Some(applied) = executor::settle_payment(&state.db, payment, &state.policy()).await? {
        tracing::info!(payment_id = %payment.id, user_id = %payment.user_id, outcome = ?applied, "Payment settled");
    }
    Ok(())
}

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePaymentRequest>,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    require_admin(&auth)?;
    req.validate()?;
    check_amount(req.amount)?;

    let currency = req
        .currency
        .unwrap_or_else(|| state.config.workflow.evaluation_fee_currency.clone());

    let payment = Payment::create(
        &state.db,
        CreatePayment {
            user_id: req.user_id,
            step_id: req.step_id,
            description: req.description,
            amount: req.amount,
            currency,
            status: req.status,
            payment_date: req.payment_date,
        },
    )
    .await?;

    tracing::info!(payment_id = %payment.id, user_id = %payment.user_id, status = payment.status.as_str(), "Payment created");

    settle(&state, &payment).await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<Vec<Payment>>> {
    let user_id = resolve_target_user(&auth, filter.user_id)?;

    Ok(Json(Payment::list_by_user(&state.db, user_id).await?))
}

pub async fn list_all_payments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<PaymentWithUser>>> {
    require_admin(&auth)?;

    Ok(Json(Payment::list_all_with_users(&state.db).await?))
}

async fn load_visible(state: &AppState, auth: &AuthContext, id: Uuid) -> ApiResult<Payment> {
    let payment = Payment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;
    require_self_or_admin(auth, payment.user_id)?;

    Ok(payment)
}

pub async fn get_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Payment>> {
    Ok(Json(load_visible(&state, &auth, id).await?))
}

/// Admin update
///
/// `paid` sets `payment_date` (now unless given), `pending` clears it.
/// Moving from pending to paid completes the linked step.
pub async fn update_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePaymentRequest>,
) -> ApiResult<Json<Payment>> {
    require_admin(&auth)?;
    req.validate()?;
    if let Some(amount) = req.amount {
        check_amount(amount)?;
    }

    let previous = Payment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    let payment = Payment::update(
        &state.db,
        id,
        UpdatePayment {
            description: req.description,
            amount: req.amount,
            currency: req.currency,
            status: req.status,
            payment_date: req.payment_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    if payment.was_settled_from(&previous) {
        settle(&state, &payment).await?;
    }

    Ok(Json(payment))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;

    if !Payment::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Payment not found".to_string()));
    }

    tracing::info!(payment_id = %id, "Payment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Reports a payment to the recruitment office by email
///
/// Delivery failure is logged; the candidate still gets a success answer.
pub async fn submit_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let payment = load_visible(&state, &auth, id).await?;

    let payer = User::find_by_id(&state.db, payment.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let email = templates::payment_submitted(
        &state.config.mail.admin_email,
        &payer.full_name(),
        &payer.email,
        &payment.description,
        payment.amount,
        &payment.currency,
    );

    if let Err(e) = state.mailer.send(email).await {
        tracing::warn!(payment_id = %payment.id, error = %e, "Failed to send payment submission email");
    } else {
        tracing::info!(payment_id = %payment.id, user_id = %payer.id, "Payment submission sent");
    }

    Ok(Json(json!({ "message": "Payment details submitted" })))
}
