//! External UV forecast signal loader.
//!
//! Whatever fetches weather data (a cron job, a script wrapping a weather
//! API) drops a `forecast.json` in the data directory with the next seven
//! daily UV maxima, today first. This module reads the file; the estimator
//! consumes only today's clear-sky maximum.

use crate::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// Seven-day forecast file format (matches the external fetcher's output)
#[derive(Clone, Debug, Deserialize)]
pub struct UvForecast {
    /// Daily UV index maxima, today first
    #[serde(default)]
    pub uv_index_max: Vec<f64>,
    /// Daily clear-sky UV index maxima, today first
    pub uv_index_clear_sky_max: Vec<f64>,
    /// When the fetcher produced the file; older fetchers omit it
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl UvForecast {
    /// Today's clear-sky maximum, `None` when the file held no days
    pub fn clear_sky_max_today(&self) -> Option<f64> {
        self.uv_index_clear_sky_max.first().copied()
    }

    /// Whether the file is older than the allowed age
    ///
    /// A file without a `fetched_at` stamp is never considered stale.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age_hours: i64) -> bool {
        match self.fetched_at {
            Some(fetched_at) => now - fetched_at > chrono::Duration::hours(max_age_hours),
            None => false,
        }
    }
}

/// Load the UV forecast signal from a JSON file
///
/// Returns None if the file doesn't exist (nothing has fetched a forecast).
/// Unreadable or malformed files are logged and treated the same way; the
/// UV index can always be supplied directly instead.
pub fn load_uv_forecast(path: &Path) -> Result<Option<UvForecast>> {
    if !path.exists() {
        tracing::debug!("No forecast file found at {:?}", path);
        return Ok(None);
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                "Failed to read forecast at {:?}: {}. Ignoring signal.",
                path,
                e
            );
            return Ok(None);
        }
    };

    let forecast: UvForecast = match serde_json::from_str(&contents) {
        Ok(forecast) => forecast,
        Err(e) => {
            tracing::warn!(
                "Failed to parse forecast at {:?}: {}. Ignoring signal.",
                path,
                e
            );
            return Ok(None);
        }
    };

    tracing::info!(
        "Loaded UV forecast: {} days, clear-sky max today {:?}",
        forecast.uv_index_clear_sky_max.len(),
        forecast.clear_sky_max_today()
    );

    Ok(Some(forecast))
}
