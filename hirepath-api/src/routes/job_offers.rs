/// Job offer endpoints
///
/// Listing is public; reading one offer needs a session; writes are admin-only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use hirepath_shared::{
    auth::{authorization::require_admin, middleware::AuthContext},
    models::job_offer::{CreateJobOffer, JobOffer, UpdateJobOffer},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobOfferRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required (max 255 characters)"))]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "Company is required (max 255 characters)"))]
    pub company: String,

    #[validate(length(min = 1, max = 255, message = "Location is required (max 255 characters)"))]
    pub location: String,

    /// Employment type, e.g. "Full-time"
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Type is required (max 50 characters)"))]
    pub employment_type: String,

    pub salary: Option<String>,
    pub category: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub requirements: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobOfferRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub company: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub employment_type: Option<String>,

    pub salary: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    pub requirements: Option<String>,
}

/// Public listing, newest first
pub async fn list_job_offers(State(state): State<AppState>) -> ApiResult<Json<Vec<JobOffer>>> {
    Ok(Json(JobOffer::list(&state.db).await?))
}

pub async fn get_job_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<JobOffer>> {
    let offer = JobOffer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job offer not found".to_string()))?;

    Ok(Json(offer))
}

pub async fn create_job_offer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateJobOfferRequest>,
) -> ApiResult<(StatusCode, Json<JobOffer>)> {
    require_admin(&auth)?;
    req.validate()?;

    let offer = JobOffer::create(
        &state.db,
        CreateJobOffer {
            title: req.title,
            company: req.company,
            location: req.location,
            employment_type: req.employment_type,
            salary: req.salary,
            category: req.category,
            featured: req.featured,
            description: req.description,
            requirements: req.requirements,
        },
    )
    .await?;

    tracing::info!(job_offer_id = %offer.id, "Job offer created");
    Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn update_job_offer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJobOfferRequest>,
) -> ApiResult<Json<JobOffer>> {
    require_admin(&auth)?;
    req.validate()?;

    let offer = JobOffer::update(
        &state.db,
        id,
        UpdateJobOffer {
            title: req.title,
            company: req.company,
            location: req.location,
            employment_type: req.employment_type,
            salary: req.salary,
            category: req.category,
            featured: req.featured,
            description: req.description,
            requirements: req.requirements,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Job offer not found".to_string()))?;

    Ok(Json(offer))
}

pub async fn delete_job_offer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;

    if !JobOffer::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Job offer not found".to_string()));
    }

    tracing::info!(job_offer_id = %id, "Job offer deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_reads_type_field() {
        let req: CreateJobOfferRequest = serde_json::from_value(serde_json::json!({
            "title": "Welder",
            "company": "Maritime Steel",
            "location": "Halifax",
            "type": "Full-time",
            "description": "MIG and TIG welding"
        }))
        .unwrap();

        assert_eq!(req.employment_type, "Full-time");
        assert!(!req.featured);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_blank_title() {
        let req: CreateJobOfferRequest = serde_json::from_value(serde_json::json!({
            "title": "",
            "company": "Maritime Steel",
            "location": "Halifax",
            "type": "Full-time",
            "description": "MIG and TIG welding"
        }))
        .unwrap();

        assert!(req.validate().unwrap_err().field_errors().contains_key("title"));
    }
}
