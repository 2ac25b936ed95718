//! Adherence and streak aggregation over per-day dose summaries.
//!
//! Pure functions over `[DayAdherence]`; the repository layer builds the
//! summaries from schedules and dose logs (`dose_logs::day_summaries`).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's scheduled-versus-taken dose counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAdherence {
    pub date: NaiveDate,
    pub scheduled: u32,
    pub taken: u32,
}

impl DayAdherence {
    /// A day counts toward the streak only when something was scheduled
    /// and everything scheduled was taken. A day with zero scheduled
    /// doses breaks the chain rather than being skipped.
    pub fn qualifies(&self) -> bool {
        self.scheduled > 0 && self.taken >= self.scheduled
    }
}

/// Length of the current streak: consecutive qualifying days ending at
/// `today`. When today has not (yet) qualified, the walk starts from
/// yesterday instead, so an in-progress day does not cut a streak short.
/// Days absent from `days` count as zero-dose days and break the chain.
pub fn current_streak(days: &[DayAdherence], today: NaiveDate) -> u32 {
    let by_date: HashMap<NaiveDate, &DayAdherence> =
        days.iter().map(|d| (d.date, d)).collect();

    let qualifies = |date: NaiveDate| by_date.get(&date).is_some_and(|d| d.qualifies());

    let mut cursor = today;
    if !qualifies(cursor) {
        cursor = match cursor.pred_opt() {
            Some(prev) => prev,
            None => return 0,
        };
    }

    let mut streak = 0;
    while qualifies(cursor) {
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}

/// Percentage of scheduled doses taken across the window. 0 when nothing
/// was scheduled.
pub fn adherence_percent(days: &[DayAdherence]) -> f64 {
    let scheduled: u32 = days.iter().map(|d| d.scheduled).sum();
    if scheduled == 0 {
        return 0.0;
    }
    let taken: u32 = days.iter().map(|d| d.taken.min(d.scheduled)).sum();
    f64::from(taken) * 100.0 / f64::from(scheduled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Build consecutive days ending at `end`, most recent last.
    fn run(end: &str, counts: &[(u32, u32)]) -> Vec<DayAdherence> {
        let end = date(end);
        counts
            .iter()
            .rev()
            .enumerate()
            .map(|(offset, &(scheduled, taken))| DayAdherence {
                date: end - chrono::Duration::days(offset as i64),
                scheduled,
                taken,
            })
            .rev()
            .collect()
    }

    #[test]
    fn perfect_record_yields_full_streak() {
        let days = run("2026-08-31", &[(2, 2), (2, 2), (2, 2), (2, 2), (2, 2)]);
        assert_eq!(current_streak(&days, date("2026-08-31")), 5);
    }

    #[test]
    fn partial_day_ends_streak() {
        let days = run("2026-08-31", &[(2, 2), (2, 1), (2, 2), (2, 2)]);
        // The 2-of-2 days after the 1-of-2 day count; nothing before it does.
        assert_eq!(current_streak(&days, date("2026-08-31")), 2);
    }

    #[test]
    fn zero_dose_day_breaks_streak() {
        let days = run("2026-08-31", &[(2, 2), (2, 2), (0, 0), (2, 2), (2, 2)]);
        assert_eq!(current_streak(&days, date("2026-08-31")), 2);
    }

    #[test]
    fn missing_day_breaks_streak() {
        let mut days = run("2026-08-31", &[(2, 2), (2, 2), (2, 2)]);
        days.remove(1); // gap on the 30th
        assert_eq!(current_streak(&days, date("2026-08-31")), 1);
    }

    #[test]
    fn in_progress_today_does_not_cut_streak() {
        // Today 1 of 2 taken so far; the three full days before still count.
        let days = run("2026-08-31", &[(2, 2), (2, 2), (2, 2), (2, 1)]);
        assert_eq!(current_streak(&days, date("2026-08-31")), 3);
    }

    #[test]
    fn no_qualifying_days_is_zero() {
        let days = run("2026-08-31", &[(2, 0), (2, 1), (0, 0)]);
        assert_eq!(current_streak(&days, date("2026-08-31")), 0);
        assert_eq!(current_streak(&[], date("2026-08-31")), 0);
    }

    #[test]
    fn streak_ignores_days_after_today() {
        // Summaries may extend past today (e.g. a week view); only days
        // at or before today count.
        let days = run("2026-09-02", &[(2, 2), (2, 2), (2, 2), (2, 2), (2, 2)]);
        assert_eq!(current_streak(&days, date("2026-08-31")), 3);
    }

    #[test]
    fn percent_over_window() {
        let days = run("2026-08-31", &[(2, 2), (2, 1), (2, 2)]);
        let percent = adherence_percent(&days);
        assert!((percent - 83.333).abs() < 0.01, "got {percent}");
    }

    #[test]
    fn percent_empty_window_is_zero() {
        assert_eq!(adherence_percent(&[]), 0.0);
        let days = run("2026-08-31", &[(0, 0), (0, 0)]);
        assert_eq!(adherence_percent(&days), 0.0);
    }

    #[test]
    fn percent_caps_overcounted_days() {
        // A taken count above scheduled (deactivated schedule edge) cannot
        // push the percentage over 100.
        let days = run("2026-08-31", &[(2, 3)]);
        assert_eq!(adherence_percent(&days), 100.0);
    }
}
