//! Dashboard and calendar endpoints.
//!
//! - `GET /api/dashboard/summary?days=N` — streak + adherence percent
//! - `GET /api/calendar?start&end` — per-day scheduled/taken summaries

use axum::extract::{Query, State};
use axum::Extension;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::adherence::{self, DayAdherence};
use crate::api::error::ApiError;
use crate::api::types::{AccountContext, ApiContext};
use crate::dose_logs;

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub days: Option<u32>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub streak: u32,
    pub adherence_percent: f64,
    pub today: DayAdherence,
}

/// `GET /api/dashboard/summary` — adherence stats over the last `days`
/// days (default 30, capped at 365), ending today.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let days = i64::from(query.days.unwrap_or(30).clamp(1, 365));
    let today = Utc::now().date_naive();
    let start = today - Duration::days(days - 1);

    let conn = ctx.core.open_db()?;
    let summaries = dose_logs::day_summaries(&conn, &account.account_id, start, today)?;

    let today_summary = summaries
        .last()
        .copied()
        .unwrap_or(DayAdherence {
            date: today,
            scheduled: 0,
            taken: 0,
        });

    Ok(Json(SummaryResponse {
        streak: adherence::current_streak(&summaries, today),
        adherence_percent: adherence::adherence_percent(&summaries),
        today: today_summary,
    }))
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub days: Vec<DayAdherence>,
}

fn parse_date(value: Option<String>, field: &str) -> Result<NaiveDate, ApiError> {
    let raw =
        value.ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {field}")))?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date for {field}: {raw}")))
}

/// `GET /api/calendar?start=YYYY-MM-DD&end=YYYY-MM-DD`
pub async fn calendar(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let start = parse_date(query.start, "start")?;
    let end = parse_date(query.end, "end")?;
    if end < start {
        return Err(ApiError::BadRequest("end must not be before start".into()));
    }
    if (end - start).num_days() > 366 {
        return Err(ApiError::BadRequest("date range too large".into()));
    }

    let conn = ctx.core.open_db()?;
    let days = dose_logs::day_summaries(&conn, &account.account_id, start, end)?;
    Ok(Json(CalendarResponse { days }))
}
