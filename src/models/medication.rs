use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{FrequencyType, MedicationForm};

/// A medication owned by one account. Soft-deactivated via `active`,
/// never deleted, so dose history stays intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub form: MedicationForm,
    pub frequency_type: FrequencyType,
    pub grace_minutes: i64,
    pub reminder_minutes: i64,
    pub cutoff_minutes: i64,
    pub pills_remaining: Option<i64>,
    pub with_food: bool,
    pub instructions: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Medication {
    /// Whether any dose of this medication is due on `date` at all:
    /// active and inside the optional start/end window.
    pub fn in_effect_on(&self, date: NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// One intake time for a medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub time_of_day: NaiveTime,
    /// Lowercase short day names (mon..sun). `None` means every day.
    pub days_of_week: Option<Vec<String>>,
    pub with_food: bool,
    pub instructions: Option<String>,
}

impl Schedule {
    /// Whether this schedule fires on the given weekday.
    pub fn applies_on(&self, weekday: Weekday) -> bool {
        match &self.days_of_week {
            None => true,
            Some(days) => days.iter().any(|d| d == weekday_short(weekday)),
        }
    }
}

/// Short name used in the days_of_week column.
pub fn weekday_short(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medication(start: Option<&str>, end: Option<&str>, active: bool) -> Medication {
        Medication {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: "Metformin".into(),
            dosage: "500mg".into(),
            form: MedicationForm::Tablet,
            frequency_type: FrequencyType::TwiceDaily,
            grace_minutes: 60,
            reminder_minutes: 30,
            cutoff_minutes: 240,
            pills_remaining: Some(60),
            with_food: true,
            instructions: None,
            start_date: start.map(|s| s.parse().unwrap()),
            end_date: end.map(|s| s.parse().unwrap()),
            active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn in_effect_respects_date_window() {
        let med = medication(Some("2026-08-01"), Some("2026-08-31"), true);
        assert!(!med.in_effect_on("2026-07-31".parse().unwrap()));
        assert!(med.in_effect_on("2026-08-01".parse().unwrap()));
        assert!(med.in_effect_on("2026-08-31".parse().unwrap()));
        assert!(!med.in_effect_on("2026-09-01".parse().unwrap()));
    }

    #[test]
    fn inactive_medication_never_in_effect() {
        let med = medication(None, None, false);
        assert!(!med.in_effect_on("2026-08-15".parse().unwrap()));
    }

    #[test]
    fn open_ended_medication_always_in_effect() {
        let med = medication(None, None, true);
        assert!(med.in_effect_on("1999-01-01".parse().unwrap()));
        assert!(med.in_effect_on("2099-01-01".parse().unwrap()));
    }

    #[test]
    fn schedule_without_restriction_applies_every_day() {
        let schedule = Schedule {
            id: Uuid::new_v4(),
            medication_id: Uuid::new_v4(),
            time_of_day: "08:00:00".parse().unwrap(),
            days_of_week: None,
            with_food: false,
            instructions: None,
        };
        assert!(schedule.applies_on(Weekday::Mon));
        assert!(schedule.applies_on(Weekday::Sun));
    }

    #[test]
    fn schedule_with_restriction_applies_only_on_listed_days() {
        let schedule = Schedule {
            id: Uuid::new_v4(),
            medication_id: Uuid::new_v4(),
            time_of_day: "08:00:00".parse().unwrap(),
            days_of_week: Some(vec!["mon".into(), "wed".into(), "fri".into()]),
            with_food: false,
            instructions: None,
        };
        assert!(schedule.applies_on(Weekday::Mon));
        assert!(!schedule.applies_on(Weekday::Tue));
        assert!(schedule.applies_on(Weekday::Fri));
        assert!(!schedule.applies_on(Weekday::Sat));
    }
}
