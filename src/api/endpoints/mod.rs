pub mod accounts;
pub mod dashboard;
pub mod health;
pub mod medications;
pub mod preferences;
pub mod reminders;
