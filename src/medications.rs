//! Medication and schedule repository.
//!
//! Creation derives grace/reminder/cutoff thresholds from the frequency
//! lookup table and writes one schedule row per intake time. All reads
//! and writes are scoped to the owning account.

use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::dosing::DoseWindows;
use crate::models::enums::{FrequencyType, MedicationForm};
use crate::models::{Medication, Schedule};

/// Validated input for medication creation. Field validation and string
/// parsing happen at the API boundary; this struct is already typed.
#[derive(Debug, Clone)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub form: MedicationForm,
    pub frequency_type: FrequencyType,
    /// One schedule is created per intake time.
    pub times: Vec<NaiveTime>,
    /// Day-of-week restriction applied to every created schedule.
    pub days_of_week: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub with_food: bool,
    pub instructions: Option<String>,
    pub pills_remaining: Option<i64>,
}

/// Create a medication plus its per-time schedules in one transaction.
pub fn create_medication(
    conn: &mut Connection,
    account_id: &Uuid,
    input: &NewMedication,
) -> Result<(Medication, Vec<Schedule>), DatabaseError> {
    let windows = DoseWindows::for_frequency(input.frequency_type);

    let medication = Medication {
        id: Uuid::new_v4(),
        account_id: *account_id,
        name: input.name.clone(),
        dosage: input.dosage.clone(),
        form: input.form,
        frequency_type: input.frequency_type,
        grace_minutes: windows.grace_minutes,
        reminder_minutes: windows.reminder_minutes,
        cutoff_minutes: windows.cutoff_minutes,
        pills_remaining: input.pills_remaining,
        with_food: input.with_food,
        instructions: input.instructions.clone(),
        start_date: input.start_date,
        end_date: input.end_date,
        active: true,
        created_at: Utc::now(),
    };

    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO medications (
            id, account_id, name, dosage, form, frequency_type,
            grace_minutes, reminder_minutes, cutoff_minutes, pills_remaining,
            with_food, instructions, start_date, end_date, active, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 1, ?15)",
        params![
            medication.id.to_string(),
            account_id.to_string(),
            medication.name,
            medication.dosage,
            medication.form.as_str(),
            medication.frequency_type.as_str(),
            medication.grace_minutes,
            medication.reminder_minutes,
            medication.cutoff_minutes,
            medication.pills_remaining,
            medication.with_food as i32,
            medication.instructions,
            medication.start_date.map(|d| d.to_string()),
            medication.end_date.map(|d| d.to_string()),
            medication.created_at.to_rfc3339(),
        ],
    )?;

    let days_csv = input.days_of_week.as_ref().map(|days| days.join(","));
    let mut schedules = Vec::with_capacity(input.times.len());
    for time in &input.times {
        let schedule = Schedule {
            id: Uuid::new_v4(),
            medication_id: medication.id,
            time_of_day: *time,
            days_of_week: input.days_of_week.clone(),
            with_food: input.with_food,
            instructions: input.instructions.clone(),
        };
        tx.execute(
            "INSERT INTO schedules (id, medication_id, time_of_day, days_of_week, with_food, instructions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                schedule.id.to_string(),
                medication.id.to_string(),
                time.format("%H:%M").to_string(),
                days_csv,
                schedule.with_food as i32,
                schedule.instructions,
            ],
        )?;
        schedules.push(schedule);
    }

    tx.commit()?;
    Ok((medication, schedules))
}

/// Fetch an account's medications, active first, newest within each group.
pub fn fetch_medications(
    conn: &Connection,
    account_id: &Uuid,
    include_inactive: bool,
) -> Result<Vec<Medication>, DatabaseError> {
    let mut sql = String::from(
        "SELECT id, account_id, name, dosage, form, frequency_type,
                grace_minutes, reminder_minutes, cutoff_minutes, pills_remaining,
                with_food, instructions, start_date, end_date, active, created_at
         FROM medications
         WHERE account_id = ?1",
    );
    if !include_inactive {
        sql.push_str(" AND active = 1");
    }
    sql.push_str(" ORDER BY active DESC, created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let meds = stmt
        .query_map(params![account_id.to_string()], medication_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(meds)
}

/// Fetch a single medication, scoped to the owning account. `None` both
/// for unknown ids and for medications owned by someone else.
pub fn fetch_medication(
    conn: &Connection,
    account_id: &Uuid,
    medication_id: &Uuid,
) -> Result<Option<Medication>, DatabaseError> {
    let med = conn
        .query_row(
            "SELECT id, account_id, name, dosage, form, frequency_type,
                    grace_minutes, reminder_minutes, cutoff_minutes, pills_remaining,
                    with_food, instructions, start_date, end_date, active, created_at
             FROM medications
             WHERE id = ?1 AND account_id = ?2",
            params![medication_id.to_string(), account_id.to_string()],
            medication_from_row,
        )
        .optional()?;
    Ok(med)
}

/// Fetch the schedules for a medication, ordered by time of day.
pub fn fetch_schedules(
    conn: &Connection,
    medication_id: &Uuid,
) -> Result<Vec<Schedule>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, medication_id, time_of_day, days_of_week, with_food, instructions
         FROM schedules
         WHERE medication_id = ?1
         ORDER BY time_of_day ASC",
    )?;
    let rows = stmt
        .query_map(params![medication_id.to_string()], schedule_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Fetch one schedule of a medication.
pub fn fetch_schedule(
    conn: &Connection,
    medication_id: &Uuid,
    schedule_id: &Uuid,
) -> Result<Option<Schedule>, DatabaseError> {
    let schedule = conn
        .query_row(
            "SELECT id, medication_id, time_of_day, days_of_week, with_food, instructions
             FROM schedules
             WHERE id = ?1 AND medication_id = ?2",
            params![schedule_id.to_string(), medication_id.to_string()],
            schedule_from_row,
        )
        .optional()?;
    Ok(schedule)
}

/// Add pills to a medication's counter (refill). Returns the updated
/// medication, or `None` when it does not exist for this account.
pub fn refill_medication(
    conn: &Connection,
    account_id: &Uuid,
    medication_id: &Uuid,
    pills_added: i64,
) -> Result<Option<Medication>, DatabaseError> {
    let updated = conn.execute(
        "UPDATE medications
         SET pills_remaining = COALESCE(pills_remaining, 0) + ?3
         WHERE id = ?1 AND account_id = ?2",
        params![
            medication_id.to_string(),
            account_id.to_string(),
            pills_added
        ],
    )?;
    if updated == 0 {
        return Ok(None);
    }
    fetch_medication(conn, account_id, medication_id)
}

/// Decrement the pill counter after a taken dose. Stops at zero.
pub fn decrement_pills(
    conn: &Connection,
    medication_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE medications
         SET pills_remaining = MAX(pills_remaining - 1, 0)
         WHERE id = ?1 AND pills_remaining IS NOT NULL",
        params![medication_id.to_string()],
    )?;
    Ok(())
}

/// Soft-deactivate a medication. Returns whether a row was updated.
pub fn deactivate_medication(
    conn: &Connection,
    account_id: &Uuid,
    medication_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE medications SET active = 0 WHERE id = ?1 AND account_id = ?2",
        params![medication_id.to_string(), account_id.to_string()],
    )?;
    Ok(updated > 0)
}

fn medication_from_row(row: &Row<'_>) -> rusqlite::Result<Medication> {
    Ok(Medication {
        id: row
            .get::<_, String>(0)?
            .parse()
            .unwrap_or_else(|_| Uuid::nil()),
        account_id: row
            .get::<_, String>(1)?
            .parse()
            .unwrap_or_else(|_| Uuid::nil()),
        name: row.get(2)?,
        dosage: row.get(3)?,
        form: row
            .get::<_, String>(4)?
            .parse()
            .unwrap_or(MedicationForm::Other),
        frequency_type: row
            .get::<_, String>(5)?
            .parse()
            .unwrap_or(FrequencyType::OnceDaily),
        grace_minutes: row.get(6)?,
        reminder_minutes: row.get(7)?,
        cutoff_minutes: row.get(8)?,
        pills_remaining: row.get(9)?,
        with_food: row.get::<_, i32>(10)? != 0,
        instructions: row.get(11)?,
        start_date: row
            .get::<_, Option<String>>(12)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        end_date: row
            .get::<_, Option<String>>(13)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        active: row.get::<_, i32>(14)? != 0,
        created_at: row
            .get::<_, String>(15)?
            .parse()
            .unwrap_or_else(|_| Utc::now()),
    })
}

fn schedule_from_row(row: &Row<'_>) -> rusqlite::Result<Schedule> {
    Ok(Schedule {
        id: row
            .get::<_, String>(0)?
            .parse()
            .unwrap_or_else(|_| Uuid::nil()),
        medication_id: row
            .get::<_, String>(1)?
            .parse()
            .unwrap_or_else(|_| Uuid::nil()),
        time_of_day: NaiveTime::parse_from_str(&row.get::<_, String>(2)?, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
        days_of_week: row
            .get::<_, Option<String>>(3)?
            .map(|csv| csv.split(',').map(str::to_string).collect()),
        with_food: row.get::<_, i32>(4)? != 0,
        instructions: row.get(5)?,
    })
}
