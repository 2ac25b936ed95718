//! Dosetrack: self-hosted medication-adherence tracking service.
//!
//! Domain logic (dose classification, streak aggregation), a SQLite
//! persistence layer, and a local HTTP API for clients.

pub mod adherence;
pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod dose_logs;
pub mod dosing;
pub mod medications;
pub mod models;
pub mod preferences;
