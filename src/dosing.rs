//! Dose-status classification.
//!
//! Pure functions mapping (scheduled time, action, action time, configured
//! thresholds) to a `DoseStatus`. No I/O, no clock reads — callers pass
//! the action time in, which keeps classification deterministic and lets
//! the same inputs always produce the same output.

use chrono::{DateTime, Utc};

use crate::config;
use crate::models::enums::{DoseAction, DoseStatus, FrequencyType};

/// Per-medication timing thresholds, all in minutes after the scheduled
/// time. `grace` is inclusive: a dose taken exactly at the grace boundary
/// is still on time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoseWindows {
    pub grace_minutes: i64,
    pub reminder_minutes: i64,
    pub cutoff_minutes: i64,
}

impl DoseWindows {
    /// Fallbacks for medications with no configured thresholds.
    pub fn defaults() -> Self {
        Self {
            grace_minutes: config::DEFAULT_GRACE_MINUTES,
            reminder_minutes: config::DEFAULT_REMINDER_MINUTES,
            cutoff_minutes: config::DEFAULT_CUTOFF_MINUTES,
        }
    }

    /// Fixed lookup table keyed by frequency type. Medications created
    /// through the API inherit these values.
    pub fn for_frequency(frequency: FrequencyType) -> Self {
        let (grace_minutes, reminder_minutes, cutoff_minutes) = match frequency {
            FrequencyType::OnceDaily => (120, 60, 360),
            FrequencyType::TwiceDaily => (60, 30, 240),
            FrequencyType::ThreeTimesDaily => (45, 20, 180),
            FrequencyType::FourTimesDaily => (30, 15, 120),
            FrequencyType::WithMeals => (60, 30, 180),
            FrequencyType::BeforeMeals => (30, 15, 120),
        };
        Self {
            grace_minutes,
            reminder_minutes,
            cutoff_minutes,
        }
    }
}

/// Classify a dose outcome.
///
/// - taken: elapsed ≤ grace → ON_TIME; grace < elapsed ≤ cutoff → LATE;
///   beyond the cutoff → MISSED even though it was logged.
/// - snoozed: stays PENDING (the deferral itself comes from [`snooze_until`]).
/// - skipped / missed: MISSED regardless of elapsed time, negative included.
pub fn classify_dose(
    action: DoseAction,
    scheduled: DateTime<Utc>,
    acted: DateTime<Utc>,
    windows: &DoseWindows,
) -> DoseStatus {
    match action {
        DoseAction::Taken => {
            let elapsed = (acted - scheduled).num_minutes();
            if elapsed <= windows.grace_minutes {
                DoseStatus::OnTime
            } else if elapsed <= windows.cutoff_minutes {
                DoseStatus::Late
            } else {
                DoseStatus::Missed
            }
        }
        DoseAction::Snoozed => DoseStatus::Pending,
        DoseAction::Skipped | DoseAction::Missed => DoseStatus::Missed,
    }
}

/// Deferred reminder time for a snoozed dose: action time plus the
/// requested minutes (default 10, floor 1 so the result is always
/// strictly after the action time).
pub fn snooze_until(acted: DateTime<Utc>, minutes: Option<i64>) -> DateTime<Utc> {
    let minutes = minutes.unwrap_or(config::DEFAULT_SNOOZE_MINUTES).max(1);
    acted + chrono::Duration::minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, hour, min, 0).unwrap()
    }

    fn minutes_after(base: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
        base + chrono::Duration::minutes(minutes)
    }

    const WINDOWS: DoseWindows = DoseWindows {
        grace_minutes: 60,
        reminder_minutes: 30,
        cutoff_minutes: 180,
    };

    #[test]
    fn taken_within_grace_is_on_time() {
        let scheduled = at(8, 0);
        let status = classify_dose(
            DoseAction::Taken,
            scheduled,
            minutes_after(scheduled, 30),
            &WINDOWS,
        );
        assert_eq!(status, DoseStatus::OnTime);
    }

    #[test]
    fn grace_boundary_is_inclusive() {
        let scheduled = at(8, 0);
        let exactly = classify_dose(
            DoseAction::Taken,
            scheduled,
            minutes_after(scheduled, WINDOWS.grace_minutes),
            &WINDOWS,
        );
        assert_eq!(exactly, DoseStatus::OnTime);

        let one_past = classify_dose(
            DoseAction::Taken,
            scheduled,
            minutes_after(scheduled, WINDOWS.grace_minutes + 1),
            &WINDOWS,
        );
        assert_eq!(one_past, DoseStatus::Late);
    }

    #[test]
    fn cutoff_boundary_is_inclusive_for_late() {
        let scheduled = at(8, 0);
        let at_cutoff = classify_dose(
            DoseAction::Taken,
            scheduled,
            minutes_after(scheduled, WINDOWS.cutoff_minutes),
            &WINDOWS,
        );
        assert_eq!(at_cutoff, DoseStatus::Late);
    }

    #[test]
    fn taken_beyond_cutoff_is_missed_no_matter_how_late() {
        let scheduled = at(8, 0);
        for elapsed in [
            WINDOWS.cutoff_minutes + 1,
            WINDOWS.cutoff_minutes + 500,
            60 * 24 * 30,
        ] {
            let status = classify_dose(
                DoseAction::Taken,
                scheduled,
                minutes_after(scheduled, elapsed),
                &WINDOWS,
            );
            assert_eq!(status, DoseStatus::Missed, "elapsed {elapsed}m");
        }
    }

    #[test]
    fn taken_early_is_on_time() {
        let scheduled = at(8, 0);
        let status = classify_dose(
            DoseAction::Taken,
            scheduled,
            minutes_after(scheduled, -45),
            &WINDOWS,
        );
        assert_eq!(status, DoseStatus::OnTime);
    }

    #[test]
    fn skipped_and_missed_are_missed_for_any_elapsed() {
        let scheduled = at(8, 0);
        for action in [DoseAction::Skipped, DoseAction::Missed] {
            for elapsed in [-120, 0, 30, 10_000] {
                let status = classify_dose(
                    action,
                    scheduled,
                    minutes_after(scheduled, elapsed),
                    &WINDOWS,
                );
                assert_eq!(status, DoseStatus::Missed);
            }
        }
    }

    #[test]
    fn snoozed_stays_pending() {
        let scheduled = at(8, 0);
        for elapsed in [-10, 0, 500] {
            let status = classify_dose(
                DoseAction::Snoozed,
                scheduled,
                minutes_after(scheduled, elapsed),
                &WINDOWS,
            );
            assert_eq!(status, DoseStatus::Pending);
        }
    }

    #[test]
    fn snooze_until_is_strictly_after_action_time() {
        let acted = at(9, 15);
        assert_eq!(snooze_until(acted, None), minutes_after(acted, 10));
        assert_eq!(snooze_until(acted, Some(25)), minutes_after(acted, 25));
        // Zero and negative requests still defer.
        assert!(snooze_until(acted, Some(0)) > acted);
        assert!(snooze_until(acted, Some(-5)) > acted);
    }

    #[test]
    fn classification_is_idempotent() {
        let scheduled = at(8, 0);
        let acted = minutes_after(scheduled, 95);
        let first = classify_dose(DoseAction::Taken, scheduled, acted, &WINDOWS);
        let second = classify_dose(DoseAction::Taken, scheduled, acted, &WINDOWS);
        assert_eq!(first, second);
    }

    #[test]
    fn once_daily_scenario_from_frequency_table() {
        // Once daily: grace 120, cutoff 360. Scheduled 08:00.
        let windows = DoseWindows::for_frequency(FrequencyType::OnceDaily);
        assert_eq!(windows.grace_minutes, 120);
        assert_eq!(windows.cutoff_minutes, 360);

        let scheduled = at(8, 0);
        // Taken 09:30 (90m elapsed) → ON_TIME.
        let status = classify_dose(DoseAction::Taken, scheduled, at(9, 30), &windows);
        assert_eq!(status, DoseStatus::OnTime);
        // Taken 14:30 (390m elapsed) → MISSED.
        let status = classify_dose(DoseAction::Taken, scheduled, at(14, 30), &windows);
        assert_eq!(status, DoseStatus::Missed);
    }

    #[test]
    fn twice_daily_inherits_60_240() {
        let windows = DoseWindows::for_frequency(FrequencyType::TwiceDaily);
        assert_eq!(windows.grace_minutes, 60);
        assert_eq!(windows.cutoff_minutes, 240);
    }

    #[test]
    fn defaults_match_config() {
        let windows = DoseWindows::defaults();
        assert_eq!(windows.grace_minutes, 60);
        assert_eq!(windows.cutoff_minutes, 180);
    }
}
