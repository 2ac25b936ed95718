pub mod dose_log;
pub mod enums;
pub mod medication;

pub use dose_log::DoseLog;
pub use enums::{DoseAction, DoseStatus, FrequencyType, MedicationForm, Theme};
pub use medication::{weekday_short, Medication, Schedule};
