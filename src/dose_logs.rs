//! Dose log repository: recording actions against scheduled occurrences
//! and aggregating per-day summaries for the dashboard.
//!
//! An occurrence is (medication, schedule, scheduled time). The first
//! action creates the log row; any later action updates it in place, so
//! the table never holds two rows for the same occurrence.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::adherence::DayAdherence;
use crate::db::DatabaseError;
use crate::dosing::{self, DoseWindows};
use crate::medications;
use crate::models::enums::{DoseAction, DoseStatus};
use crate::models::DoseLog;

/// One action against a scheduled occurrence, as received from the API.
#[derive(Debug, Clone)]
pub struct DoseActionInput {
    pub medication_id: Uuid,
    pub schedule_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub action: DoseAction,
    /// When the action happened. Defaults to now when omitted.
    pub acted_at: Option<DateTime<Utc>>,
    pub snooze_minutes: Option<i64>,
    pub notes: Option<String>,
}

/// Record an action against an occurrence, creating or updating its log.
///
/// The status is always recomputed from the inputs, never carried over,
/// so re-submitting the same action yields the same row. The pill
/// counter is decremented only when the occurrence transitions into
/// `taken`, not on every taken re-submission.
pub fn record_dose_action(
    conn: &Connection,
    account_id: &Uuid,
    input: &DoseActionInput,
) -> Result<DoseLog, DatabaseError> {
    let medication = medications::fetch_medication(conn, account_id, &input.medication_id)?
        .ok_or_else(|| DatabaseError::NotFound {
            entity_type: "medication".to_string(),
            id: input.medication_id.to_string(),
        })?;
    let schedule = medications::fetch_schedule(conn, &input.medication_id, &input.schedule_id)?
        .ok_or_else(|| DatabaseError::NotFound {
            entity_type: "schedule".to_string(),
            id: input.schedule_id.to_string(),
        })?;

    let windows = DoseWindows {
        grace_minutes: medication.grace_minutes,
        reminder_minutes: medication.reminder_minutes,
        cutoff_minutes: medication.cutoff_minutes,
    };

    let acted_at = input.acted_at.unwrap_or_else(Utc::now);
    let status = dosing::classify_dose(input.action, input.scheduled_time, acted_at, &windows);
    let snooze_until = match input.action {
        DoseAction::Snoozed => Some(dosing::snooze_until(acted_at, input.snooze_minutes)),
        _ => None,
    };

    let existing = fetch_log_for_occurrence(
        conn,
        &input.medication_id,
        &schedule.id,
        input.scheduled_time,
    )?;

    let log = match existing {
        Some(previous) => {
            conn.execute(
                "UPDATE dose_logs
                 SET action = ?2, status = ?3, acted_at = ?4, snooze_until = ?5, notes = ?6
                 WHERE id = ?1",
                params![
                    previous.id.to_string(),
                    input.action.as_str(),
                    status.as_str(),
                    acted_at.to_rfc3339(),
                    snooze_until.map(|t| t.to_rfc3339()),
                    input.notes,
                ],
            )?;
            if input.action == DoseAction::Taken && previous.action != DoseAction::Taken {
                medications::decrement_pills(conn, &medication.id)?;
            }
            DoseLog {
                id: previous.id,
                medication_id: input.medication_id,
                schedule_id: schedule.id,
                scheduled_time: input.scheduled_time,
                action: input.action,
                status,
                acted_at,
                snooze_until,
                notes: input.notes.clone(),
            }
        }
        None => {
            let log = DoseLog {
                id: Uuid::new_v4(),
                medication_id: input.medication_id,
                schedule_id: schedule.id,
                scheduled_time: input.scheduled_time,
                action: input.action,
                status,
                acted_at,
                snooze_until,
                notes: input.notes.clone(),
            };
            conn.execute(
                "INSERT INTO dose_logs (
                    id, medication_id, schedule_id, scheduled_time,
                    action, status, acted_at, snooze_until, notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    log.id.to_string(),
                    log.medication_id.to_string(),
                    log.schedule_id.to_string(),
                    log.scheduled_time.to_rfc3339(),
                    log.action.as_str(),
                    log.status.as_str(),
                    log.acted_at.to_rfc3339(),
                    log.snooze_until.map(|t| t.to_rfc3339()),
                    log.notes,
                ],
            )?;
            if log.action == DoseAction::Taken {
                medications::decrement_pills(conn, &medication.id)?;
            }
            log
        }
    };

    Ok(log)
}

/// The log for one occurrence, if it has been actioned.
pub fn fetch_log_for_occurrence(
    conn: &Connection,
    medication_id: &Uuid,
    schedule_id: &Uuid,
    scheduled_time: DateTime<Utc>,
) -> Result<Option<DoseLog>, DatabaseError> {
    let log = conn
        .query_row(
            "SELECT id, medication_id, schedule_id, scheduled_time,
                    action, status, acted_at, snooze_until, notes
             FROM dose_logs
             WHERE medication_id = ?1 AND schedule_id = ?2 AND scheduled_time = ?3",
            params![
                medication_id.to_string(),
                schedule_id.to_string(),
                scheduled_time.to_rfc3339(),
            ],
            dose_log_from_row,
        )
        .optional()?;
    Ok(log)
}

/// All of an account's logs with scheduled times inside [start, end),
/// newest first.
pub fn fetch_logs_in_range(
    conn: &Connection,
    account_id: &Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DoseLog>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.medication_id, l.schedule_id, l.scheduled_time,
                l.action, l.status, l.acted_at, l.snooze_until, l.notes
         FROM dose_logs l
         JOIN medications m ON m.id = l.medication_id
         WHERE m.account_id = ?1 AND l.scheduled_time >= ?2 AND l.scheduled_time < ?3
         ORDER BY l.scheduled_time DESC",
    )?;
    let logs = stmt
        .query_map(
            params![
                account_id.to_string(),
                start.to_rfc3339(),
                end.to_rfc3339()
            ],
            dose_log_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(logs)
}

/// Per-day scheduled/taken counts for an account over [start, end]
/// inclusive, one entry per day.
///
/// Scheduled counts come from expanding the account's schedules against
/// each date (medication date window plus day-of-week restriction);
/// taken counts come from the logs. A schedule deactivated after a dose
/// was taken can leave taken above scheduled; the aggregation layer caps
/// that when computing percentages.
pub fn day_summaries(
    conn: &Connection,
    account_id: &Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayAdherence>, DatabaseError> {
    let meds = medications::fetch_medications(conn, account_id, false)?;
    let mut med_schedules = Vec::with_capacity(meds.len());
    for med in &meds {
        let schedules = medications::fetch_schedules(conn, &med.id)?;
        med_schedules.push((med, schedules));
    }

    let mut taken_by_date: std::collections::HashMap<NaiveDate, u32> =
        std::collections::HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT date(l.scheduled_time), COUNT(*)
             FROM dose_logs l
             JOIN medications m ON m.id = l.medication_id
             WHERE m.account_id = ?1
               AND l.action = 'taken'
               AND date(l.scheduled_time) BETWEEN ?2 AND ?3
             GROUP BY date(l.scheduled_time)",
        )?;
        let rows = stmt.query_map(
            params![account_id.to_string(), start.to_string(), end.to_string()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)),
        )?;
        for row in rows {
            let (date, count) = row?;
            if let Ok(date) = date.parse() {
                taken_by_date.insert(date, count);
            }
        }
    }

    let mut summaries = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let mut scheduled = 0;
        for (med, schedules) in &med_schedules {
            if !med.in_effect_on(cursor) {
                continue;
            }
            scheduled += schedules
                .iter()
                .filter(|s| s.applies_on(cursor.weekday()))
                .count() as u32;
        }
        summaries.push(DayAdherence {
            date: cursor,
            scheduled,
            taken: taken_by_date.get(&cursor).copied().unwrap_or(0),
        });
        cursor = match cursor.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(summaries)
}

fn dose_log_from_row(row: &Row<'_>) -> rusqlite::Result<DoseLog> {
    let parse_ts = |s: String| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    };
    Ok(DoseLog {
        id: row
            .get::<_, String>(0)?
            .parse()
            .unwrap_or_else(|_| Uuid::nil()),
        medication_id: row
            .get::<_, String>(1)?
            .parse()
            .unwrap_or_else(|_| Uuid::nil()),
        schedule_id: row
            .get::<_, String>(2)?
            .parse()
            .unwrap_or_else(|_| Uuid::nil()),
        scheduled_time: parse_ts(row.get(3)?),
        action: row
            .get::<_, String>(4)?
            .parse()
            .unwrap_or(DoseAction::Missed),
        status: row
            .get::<_, String>(5)?
            .parse()
            .unwrap_or(DoseStatus::Missed),
        acted_at: parse_ts(row.get(6)?),
        snooze_until: row.get::<_, Option<String>>(7)?.map(parse_ts),
        notes: row.get(8)?,
    })
}
