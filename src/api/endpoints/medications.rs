//! Medication endpoints.
//!
//! - `POST   /api/medications` — create with per-time schedules
//! - `GET    /api/medications` — list (active by default)
//! - `GET    /api/medications/:id` — detail with schedules
//! - `POST   /api/medications/:id/refill` — add pills
//! - `DELETE /api/medications/:id` — soft deactivate

use axum::extract::{Path, Query, State};
use axum::Extension;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{AccountContext, ApiContext};
use crate::medications;
use crate::models::{Medication, Schedule};

#[derive(Deserialize)]
pub struct CreateMedicationRequest {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub form: Option<String>,
    pub frequency_type: Option<String>,
    /// Intake times as "HH:MM" strings, one schedule per entry.
    pub times: Option<Vec<String>>,
    pub days_of_week: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub with_food: bool,
    pub instructions: Option<String>,
    pub pills_remaining: Option<i64>,
}

#[derive(Serialize)]
pub struct MedicationResponse {
    pub medication: Medication,
    pub schedules: Vec<Schedule>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {field}")))
}

fn parse_date(value: Option<String>, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("Invalid date for {field}: {s}")))
        })
        .transpose()
}

/// `POST /api/medications` — validates the form input, derives the
/// grace/reminder/cutoff thresholds from the frequency table, and
/// returns the created medication with its generated schedules.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Json(body): Json<CreateMedicationRequest>,
) -> Result<Json<MedicationResponse>, ApiError> {
    let name = required(body.name.filter(|s| !s.trim().is_empty()), "name")?;
    let dosage = required(body.dosage.filter(|s| !s.trim().is_empty()), "dosage")?;
    let form = required(body.form, "form")?
        .parse()
        .map_err(ApiError::from)?;
    let frequency_type = required(body.frequency_type, "frequency_type")?
        .parse()
        .map_err(ApiError::from)?;

    let time_strings = required(body.times.filter(|t| !t.is_empty()), "times")?;
    let mut times = Vec::with_capacity(time_strings.len());
    for raw in &time_strings {
        let time = NaiveTime::parse_from_str(raw, "%H:%M")
            .map_err(|_| ApiError::BadRequest(format!("Invalid time: {raw}")))?;
        times.push(time);
    }

    let input = medications::NewMedication {
        name,
        dosage,
        form,
        frequency_type,
        times,
        days_of_week: body.days_of_week,
        start_date: parse_date(body.start_date, "start_date")?,
        end_date: parse_date(body.end_date, "end_date")?,
        with_food: body.with_food,
        instructions: body.instructions,
        pills_remaining: body.pills_remaining,
    };

    let mut conn = ctx.core.open_db()?;
    let (medication, schedules) =
        medications::create_medication(&mut conn, &account.account_id, &input)?;

    tracing::info!(
        medication_id = %medication.id,
        schedules = schedules.len(),
        "medication created"
    );

    Ok(Json(MedicationResponse {
        medication,
        schedules,
    }))
}

#[derive(Deserialize)]
pub struct MedListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Serialize)]
pub struct MedicationListResponse {
    pub medications: Vec<Medication>,
}

/// `GET /api/medications`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Query(query): Query<MedListQuery>,
) -> Result<Json<MedicationListResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let meds =
        medications::fetch_medications(&conn, &account.account_id, query.include_inactive)?;
    Ok(Json(MedicationListResponse { medications: meds }))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Invalid medication ID: {e}")))
}

/// `GET /api/medications/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Path(medication_id): Path<String>,
) -> Result<Json<MedicationResponse>, ApiError> {
    let med_id = parse_id(&medication_id)?;
    let conn = ctx.core.open_db()?;

    let medication = medications::fetch_medication(&conn, &account.account_id, &med_id)?
        .ok_or_else(|| ApiError::NotFound("Medication not found".into()))?;
    let schedules = medications::fetch_schedules(&conn, &medication.id)?;

    Ok(Json(MedicationResponse {
        medication,
        schedules,
    }))
}

#[derive(Deserialize)]
pub struct RefillRequest {
    pub pills_added: Option<i64>,
}

#[derive(Serialize)]
pub struct RefillResponse {
    pub medication: Medication,
}

/// `POST /api/medications/:id/refill`
pub async fn refill(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Path(medication_id): Path<String>,
    Json(body): Json<RefillRequest>,
) -> Result<Json<RefillResponse>, ApiError> {
    let med_id = parse_id(&medication_id)?;
    let pills_added = required(body.pills_added, "pills_added")?;
    if pills_added <= 0 {
        return Err(ApiError::BadRequest("pills_added must be positive".into()));
    }

    let conn = ctx.core.open_db()?;
    let medication =
        medications::refill_medication(&conn, &account.account_id, &med_id, pills_added)?
            .ok_or_else(|| ApiError::NotFound("Medication not found".into()))?;

    Ok(Json(RefillResponse { medication }))
}

#[derive(Serialize)]
pub struct DeactivateResponse {
    pub deactivated: bool,
}

/// `DELETE /api/medications/:id` — soft deactivate, history preserved.
pub async fn deactivate(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Path(medication_id): Path<String>,
) -> Result<Json<DeactivateResponse>, ApiError> {
    let med_id = parse_id(&medication_id)?;
    let conn = ctx.core.open_db()?;

    if !medications::deactivate_medication(&conn, &account.account_id, &med_id)? {
        return Err(ApiError::NotFound("Medication not found".into()));
    }

    tracing::info!(medication_id = %med_id, "medication deactivated");

    Ok(Json(DeactivateResponse { deactivated: true }))
}
