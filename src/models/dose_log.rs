use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DoseAction, DoseStatus};

/// Record of one scheduled medication occurrence and its outcome.
///
/// Created lazily the first time a dose is actioned, then updated in
/// place — at most one log per (medication, schedule, scheduled time),
/// enforced by a unique index plus a lookup-before-insert check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseLog {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub schedule_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub action: DoseAction,
    pub status: DoseStatus,
    pub acted_at: DateTime<Utc>,
    pub snooze_until: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
