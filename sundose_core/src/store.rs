//! The entry store: the day-keyed exposure log with file locking.
//!
//! Entries live in memory as nested ordered maps and the whole store is
//! rewritten to disk after every mutation. Writes go to a temp file that
//! is renamed over the old one, so a crash mid-write leaves the previous
//! good file in place.

use crate::dose;
use crate::types::{EntryDraft, ExposureEntry, LogDate, LogTime, UserProfile};
use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// One day's sessions, keyed by start time
pub type DayEntries = BTreeMap<LogTime, ExposureEntry>;

/// The full exposure log, keyed by calendar day
///
/// Serialized as the flat `{day: {time: entry}}` object the entry file has
/// always held. Typed keys keep both levels in calendar and clock order
/// without re-parsing strings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EntryStore {
    days: BTreeMap<LogDate, DayEntries>,
}

impl EntryStore {
    /// Load the store from a file with shared locking, then seed `today`
    /// with an empty day
    ///
    /// A missing file is an empty store. Malformed JSON is an error:
    /// rewriting the file from a half-read store would lose history.
    pub fn load(path: &Path, today: LogDate) -> Result<Self> {
        let mut store = if path.exists() {
            let file = File::open(path)?;
            file.lock_shared()?;

            let mut contents = String::new();
            let mut reader = std::io::BufReader::new(&file);
            if let Err(e) = reader.read_to_string(&mut contents) {
                let _ = file.unlock();
                return Err(e.into());
            }
            file.unlock()?;

            let store = serde_json::from_str::<EntryStore>(&contents)?;
            tracing::debug!("Loaded {} days from {:?}", store.day_count(), path);
            store
        } else {
            tracing::info!("No entry file found at {:?}, starting empty", path);
            EntryStore::default()
        };

        store.ensure_day(today);
        Ok(store)
    }

    /// Save the store to a file with exclusive locking
    ///
    /// Atomically writes the log by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(
            path.parent()
                .ok_or_else(|| Error::Other("entry path missing parent".into()))?,
        )?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            // The entry file is a single compact line of JSON
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old entry file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} days to {:?}", self.day_count(), path);
        Ok(())
    }

    /// Load the store, modify it, and save it back atomically
    pub fn update<F>(path: &Path, today: LogDate, f: F) -> Result<Self>
    where
        F: FnOnce(&mut EntryStore) -> Result<()>,
    {
        let mut store = Self::load(path, today)?;
        f(&mut store)?;
        store.save(path)?;
        Ok(store)
    }

    /// Make sure a day exists, keeping its entries when it already does
    pub fn ensure_day(&mut self, day: LogDate) {
        self.days.entry(day).or_default();
    }

    /// Insert an entry, creating its day if needed
    ///
    /// Start times are unique within a day; inserting at a taken time
    /// replaces the previous entry, which is returned.
    pub fn add_entry(
        &mut self,
        day: LogDate,
        time: LogTime,
        entry: ExposureEntry,
    ) -> Option<ExposureEntry> {
        self.days.entry(day).or_default().insert(time, entry)
    }

    /// Compute a session's reading and record it under `today`
    ///
    /// Duration is the absolute distance between start and end, so a
    /// reversed pair logs the same session as the forward one. Returns
    /// the estimated IU; the caller persists the store afterwards.
    pub fn process_entry(
        &mut self,
        today: LogDate,
        draft: &EntryDraft,
        profile: &UserProfile,
        uv_clear_sky_max: f64,
    ) -> u32 {
        let duration_seconds = draft.start_time.abs_duration_secs(draft.end_time);

        let reading_iu = dose::estimate_vitamin_d(
            &draft.body,
            draft.start_time,
            duration_seconds,
            profile.skin_type,
            profile.age,
            uv_clear_sky_max,
        );

        tracing::info!(
            "Recording {}s session at {} estimated at {} IU",
            duration_seconds,
            draft.start_time,
            reading_iu
        );

        self.add_entry(
            today,
            draft.start_time,
            ExposureEntry {
                duration_seconds,
                reading_iu,
                location: draft.location.clone(),
                body: draft.body.clone(),
            },
        );

        reading_iu
    }

    /// Sum of readings for a day; 0 when the day is absent or empty
    pub fn daily_total(&self, day: LogDate) -> u32 {
        self.days
            .get(&day)
            .map(|entries| entries.values().map(|e| e.reading_iu).sum())
            .unwrap_or(0)
    }

    /// Every recorded day, calendar ascending
    pub fn sorted_days(&self) -> Vec<LogDate> {
        self.days.keys().copied().collect()
    }

    /// A day's start times in clock order; empty for unknown days
    pub fn sorted_times(&self, day: LogDate) -> Vec<LogTime> {
        self.days
            .get(&day)
            .map(|entries| entries.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The 7 most recent recorded days, calendar ascending
    ///
    /// All of them when fewer than 7 exist.
    pub fn last_7_days(&self) -> Vec<LogDate> {
        let days = self.sorted_days();
        let skip = days.len().saturating_sub(7);
        days[skip..].to_vec()
    }

    /// All entries for a day
    pub fn entries(&self, day: LogDate) -> Option<&DayEntries> {
        self.days.get(&day)
    }

    /// A single entry by day and start time
    pub fn entry(&self, day: LogDate, time: LogTime) -> Option<&ExposureEntry> {
        self.days.get(&day).and_then(|entries| entries.get(&time))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}
