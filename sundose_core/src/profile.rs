//! User profile persistence.
//!
//! The profile lives in its own JSON file next to the entry store. A
//! missing file means no profile has been created yet; malformed content
//! is an error.

use crate::types::UserProfile;
use crate::{Error, Result};
use fs2::FileExt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

impl UserProfile {
    /// Load the profile, `None` when none has been saved yet
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No profile file found at {:?}", path);
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)?;
        let profile: UserProfile = serde_json::from_str(&contents)?;
        profile.validate()?;

        tracing::debug!("Loaded profile from {:?}", path);
        Ok(Some(profile))
    }

    /// Save the profile to a file, written atomically like the entry store
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(
            path.parent()
                .ok_or_else(|| Error::Other("profile path missing parent".into()))?,
        )?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }

    /// Reject values the estimator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.target_iu == 0 {
            return Err(Error::Profile("daily target must be positive".into()));
        }
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(Error::Profile(format!(
                "latitude {} out of range",
                self.location.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(Error::Profile(format!(
                "longitude {} out of range",
                self.location.longitude
            )));
        }
        Ok(())
    }
}
