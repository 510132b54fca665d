#![forbid(unsafe_code)]

//! Core domain model and estimation logic for the Sundose tracker.
//!
//! This crate provides:
//! - Domain types (body regions, exposure masks, entries, profile)
//! - Dosimetry tables and the vitamin D estimator
//! - The day-keyed entry store with atomic flat-file persistence
//! - User profile storage and the external UV forecast signal

pub mod types;
pub mod error;
pub mod tables;
pub mod dose;
pub mod store;
pub mod profile;
pub mod forecast;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use dose::{compute_bsa, estimate_vitamin_d};
pub use forecast::{load_uv_forecast, UvForecast};
pub use store::{DayEntries, EntryStore};
