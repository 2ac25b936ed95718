//! `POST /api/reminders/update` — record an action against a scheduled
//! dose and return the persisted log with its computed status.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{AccountContext, ApiContext};
use crate::dose_logs;
use crate::models::DoseLog;

#[derive(Deserialize)]
pub struct ReminderUpdateRequest {
    pub medication_id: Option<Uuid>,
    pub schedule_id: Option<Uuid>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub action: Option<String>,
    pub acted_at: Option<DateTime<Utc>>,
    pub snooze_minutes: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct ReminderUpdateResponse {
    pub dose_log: DoseLog,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {field}")))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Json(body): Json<ReminderUpdateRequest>,
) -> Result<Json<ReminderUpdateResponse>, ApiError> {
    let input = dose_logs::DoseActionInput {
        medication_id: required(body.medication_id, "medication_id")?,
        schedule_id: required(body.schedule_id, "schedule_id")?,
        scheduled_time: required(body.scheduled_time, "scheduled_time")?,
        action: required(body.action, "action")?
            .parse()
            .map_err(ApiError::from)?,
        acted_at: body.acted_at,
        snooze_minutes: body.snooze_minutes,
        notes: body.notes,
    };

    let conn = ctx.core.open_db()?;
    let log = dose_logs::record_dose_action(&conn, &account.account_id, &input)?;

    tracing::debug!(
        medication_id = %log.medication_id,
        status = log.status.as_str(),
        "dose action recorded"
    );

    Ok(Json(ReminderUpdateResponse { dose_log: log }))
}
