//! Core domain types for the Sundose tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Body regions and the per-session exposure mask
//! - Age brackets and Fitzpatrick skin types
//! - Date and time keys for the entry store
//! - Logged entries and the user profile

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Body Regions and Exposure Mask
// ============================================================================

/// One of the 15 fixed body regions a session can expose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyRegion {
    Head,
    Neck,
    LeftArmUpper,
    LeftArmLower,
    LeftPalm,
    RightArmUpper,
    RightArmLower,
    RightPalm,
    Torso,
    LeftLegUpper,
    LeftLegLower,
    LeftFoot,
    RightLegUpper,
    RightLegLower,
    RightFoot,
}

impl BodyRegion {
    /// All regions, in the order the entry file writes them
    pub const ALL: [BodyRegion; 15] = [
        BodyRegion::Head,
        BodyRegion::Neck,
        BodyRegion::LeftArmUpper,
        BodyRegion::LeftArmLower,
        BodyRegion::LeftPalm,
        BodyRegion::RightArmUpper,
        BodyRegion::RightArmLower,
        BodyRegion::RightPalm,
        BodyRegion::Torso,
        BodyRegion::LeftLegUpper,
        BodyRegion::LeftLegLower,
        BodyRegion::LeftFoot,
        BodyRegion::RightLegUpper,
        BodyRegion::RightLegLower,
        BodyRegion::RightFoot,
    ];

    /// Wire name of the region, matching the keys of the persisted `body` object
    pub fn key(self) -> &'static str {
        match self {
            BodyRegion::Head => "head",
            BodyRegion::Neck => "neck",
            BodyRegion::LeftArmUpper => "left_arm_upper",
            BodyRegion::LeftArmLower => "left_arm_lower",
            BodyRegion::LeftPalm => "left_palm",
            BodyRegion::RightArmUpper => "right_arm_upper",
            BodyRegion::RightArmLower => "right_arm_lower",
            BodyRegion::RightPalm => "right_palm",
            BodyRegion::Torso => "torso",
            BodyRegion::LeftLegUpper => "left_leg_upper",
            BodyRegion::LeftLegLower => "left_leg_lower",
            BodyRegion::LeftFoot => "left_feet",
            BodyRegion::RightLegUpper => "right_leg_upper",
            BodyRegion::RightLegLower => "right_leg_lower",
            BodyRegion::RightFoot => "right_feet",
        }
    }
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BodyRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BodyRegion::ALL
            .iter()
            .copied()
            .find(|region| region.key() == s)
            .ok_or_else(|| Error::Input(format!("unknown body region '{}'", s)))
    }
}

/// Which body regions were exposed during a session
///
/// A closed record rather than an open map, so a misspelled region name
/// cannot be stored. Field names match the persisted `body` object, and
/// regions missing from older files default to covered.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExposureMask {
    #[serde(default)]
    pub head: bool,
    #[serde(default)]
    pub neck: bool,
    #[serde(default)]
    pub left_arm_upper: bool,
    #[serde(default)]
    pub left_arm_lower: bool,
    #[serde(default)]
    pub left_palm: bool,
    #[serde(default)]
    pub right_arm_upper: bool,
    #[serde(default)]
    pub right_arm_lower: bool,
    #[serde(default)]
    pub right_palm: bool,
    #[serde(default)]
    pub torso: bool,
    #[serde(default)]
    pub left_leg_upper: bool,
    #[serde(default)]
    pub left_leg_lower: bool,
    #[serde(default)]
    pub left_feet: bool,
    #[serde(default)]
    pub right_leg_upper: bool,
    #[serde(default)]
    pub right_leg_lower: bool,
    #[serde(default)]
    pub right_feet: bool,
}

impl ExposureMask {
    /// Mask with every region covered
    pub fn none() -> Self {
        Self::default()
    }

    /// Mask with every region exposed
    pub fn all() -> Self {
        let mut mask = Self::default();
        for region in BodyRegion::ALL {
            mask.set(region, true);
        }
        mask
    }

    /// Whether a region is exposed
    pub fn is_exposed(&self, region: BodyRegion) -> bool {
        match region {
            BodyRegion::Head => self.head,
            BodyRegion::Neck => self.neck,
            BodyRegion::LeftArmUpper => self.left_arm_upper,
            BodyRegion::LeftArmLower => self.left_arm_lower,
            BodyRegion::LeftPalm => self.left_palm,
            BodyRegion::RightArmUpper => self.right_arm_upper,
            BodyRegion::RightArmLower => self.right_arm_lower,
            BodyRegion::RightPalm => self.right_palm,
            BodyRegion::Torso => self.torso,
            BodyRegion::LeftLegUpper => self.left_leg_upper,
            BodyRegion::LeftLegLower => self.left_leg_lower,
            BodyRegion::LeftFoot => self.left_feet,
            BodyRegion::RightLegUpper => self.right_leg_upper,
            BodyRegion::RightLegLower => self.right_leg_lower,
            BodyRegion::RightFoot => self.right_feet,
        }
    }

    /// Set a region's exposure state
    pub fn set(&mut self, region: BodyRegion, exposed: bool) {
        match region {
            BodyRegion::Head => self.head = exposed,
            BodyRegion::Neck => self.neck = exposed,
            BodyRegion::LeftArmUpper => self.left_arm_upper = exposed,
            BodyRegion::LeftArmLower => self.left_arm_lower = exposed,
            BodyRegion::LeftPalm => self.left_palm = exposed,
            BodyRegion::RightArmUpper => self.right_arm_upper = exposed,
            BodyRegion::RightArmLower => self.right_arm_lower = exposed,
            BodyRegion::RightPalm => self.right_palm = exposed,
            BodyRegion::Torso => self.torso = exposed,
            BodyRegion::LeftLegUpper => self.left_leg_upper = exposed,
            BodyRegion::LeftLegLower => self.left_leg_lower = exposed,
            BodyRegion::LeftFoot => self.left_feet = exposed,
            BodyRegion::RightLegUpper => self.right_leg_upper = exposed,
            BodyRegion::RightLegLower => self.right_leg_lower = exposed,
            BodyRegion::RightFoot => self.right_feet = exposed,
        }
    }

    /// Builder-style helper exposing one region
    pub fn with(mut self, region: BodyRegion) -> Self {
        self.set(region, true);
        self
    }

    /// Iterator over the exposed regions, in wire order
    pub fn exposed_regions(&self) -> impl Iterator<Item = BodyRegion> + '_ {
        BodyRegion::ALL
            .iter()
            .copied()
            .filter(|region| self.is_exposed(*region))
    }

    /// Number of exposed regions
    pub fn exposed_count(&self) -> usize {
        self.exposed_regions().count()
    }
}

// ============================================================================
// Age Brackets and Skin Types
// ============================================================================

/// Age bracket indexing the body surface area table
///
/// Surface share shifts from the head to the legs as the body grows, so
/// the table carries one column per bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgeBracket {
    Birth,
    OneToFour,
    FiveToNine,
    TenToFourteen,
    Fifteen,
    Adult,
}

impl AgeBracket {
    /// Bracket for an age in whole years
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=1 => AgeBracket::Birth,
            2..=4 => AgeBracket::OneToFour,
            5..=9 => AgeBracket::FiveToNine,
            10..=14 => AgeBracket::TenToFourteen,
            15 => AgeBracket::Fifteen,
            _ => AgeBracket::Adult,
        }
    }
}

/// Fitzpatrick skin type, 1 (always burns) through 6 (never burns)
///
/// Persisted as the bare number, same as the profile file has always
/// stored it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SkinType {
    Type1 = 1,
    Type2,
    Type3,
    Type4,
    Type5,
    Type6,
}

impl From<SkinType> for u8 {
    fn from(skin_type: SkinType) -> u8 {
        skin_type as u8
    }
}

impl TryFrom<u8> for SkinType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(SkinType::Type1),
            2 => Ok(SkinType::Type2),
            3 => Ok(SkinType::Type3),
            4 => Ok(SkinType::Type4),
            5 => Ok(SkinType::Type5),
            6 => Ok(SkinType::Type6),
            other => Err(Error::Profile(format!(
                "skin type must be between 1 and 6, got {}",
                other
            ))),
        }
    }
}

// ============================================================================
// Date and Time Keys
// ============================================================================

const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMAT: &str = "%H:%M";

/// A calendar day key, serialized in the `DD-MM-YYYY` form the entry file
/// has always used
///
/// Ordering is by calendar date, not by the serialized string, so days
/// from different months and years sort correctly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogDate(NaiveDate);

impl LogDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in local time, the day new sessions are logged under
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for LogDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(NaiveDate::parse_from_str(s, DATE_FORMAT)?))
    }
}

impl Serialize for LogDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A session start time key at minute precision, serialized as `HH:MM`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogTime(NaiveTime);

impl LogTime {
    /// Build a time from hour and minute; `None` outside the valid clock range
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// Seconds between two times, ignoring direction
    ///
    /// A reversed pair (end before start) yields the same duration as the
    /// forward pair.
    pub fn abs_duration_secs(self, other: LogTime) -> u32 {
        self.0
            .num_seconds_from_midnight()
            .abs_diff(other.0.num_seconds_from_midnight())
    }
}

impl fmt::Display for LogTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for LogTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(NaiveTime::parse_from_str(s, TIME_FORMAT)?))
    }
}

impl Serialize for LogTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Entries and Profile
// ============================================================================

/// A logged exposure session, as stored in the entry file
///
/// New files write the numeric fields as JSON numbers; the string encoding
/// found in older files is still accepted on read.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExposureEntry {
    /// Session length in seconds
    #[serde(rename = "duration", deserialize_with = "u32_from_string_or_number")]
    pub duration_seconds: u32,
    /// Estimated vitamin D synthesized during the session, in IU
    #[serde(rename = "reading", deserialize_with = "u32_from_string_or_number")]
    pub reading_iu: u32,
    /// Free-form location label
    pub location: String,
    /// Regions exposed during the session
    pub body: ExposureMask,
}

/// Accepts a JSON number or the legacy string encoding of one
fn u32_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Input for logging a new session
///
/// Duration and reading are derived when the draft is processed, so they
/// have no place here.
#[derive(Clone, Debug)]
pub struct EntryDraft {
    pub start_time: LogTime,
    pub end_time: LogTime,
    pub location: String,
    pub body: ExposureMask,
}

/// The user's home location: a display label plus geocoded coordinates
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HomeLocation {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Persistent user profile backing every estimate
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Age in whole years
    pub age: u32,
    /// Daily vitamin D target in IU
    #[serde(rename = "target")]
    pub target_iu: u32,
    /// Default location for sessions logged without one
    pub location: HomeLocation,
    pub skin_type: SkinType,
}
