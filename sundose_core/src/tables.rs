//! Fixed dosimetry tables.
//!
//! The built-in constants the estimator runs on: the Lund-Browder body
//! surface table, minimal erythema doses per Fitzpatrick type, and the
//! hourly attenuation profile of clear-sky UV across the day.

use crate::types::{AgeBracket, BodyRegion, SkinType};

/// Percent of total body surface one region contributes at a given age
///
/// Values follow the Lund-Browder chart. The age-varying rows shift
/// surface share from the head to the legs as the body grows; the `torso`
/// entry covers the anterior trunk only.
pub fn region_surface_percent(bracket: AgeBracket, region: BodyRegion) -> f64 {
    use BodyRegion::*;

    // Column order: birth-1, 1-4, 5-9, 10-14, 15, adult.
    let by_age = |row: [f64; 6]| row[bracket as usize];

    match region {
        Head => by_age([19.0, 17.0, 13.0, 11.0, 9.0, 7.0]),
        Neck => 2.0,
        Torso => 13.0,
        LeftArmUpper | RightArmUpper => 4.0,
        LeftArmLower | RightArmLower => 3.0,
        LeftPalm | RightPalm => 2.5,
        LeftLegUpper | RightLegUpper => by_age([5.5, 6.5, 8.0, 8.5, 9.0, 9.5]),
        LeftLegLower | RightLegLower => by_age([5.0, 5.0, 5.5, 6.0, 6.5, 7.0]),
        LeftFoot | RightFoot => 3.5,
    }
}

/// Minimal erythema dose in J/m² for a Fitzpatrick skin type
pub fn med_j_per_m2(skin_type: SkinType) -> f64 {
    match skin_type {
        SkinType::Type1 => 200.0,
        SkinType::Type2 => 250.0,
        SkinType::Type3 => 300.0,
        SkinType::Type4 => 450.0,
        SkinType::Type5 => 600.0,
        SkinType::Type6 => 1000.0,
    }
}

/// Fraction of the daily clear-sky UV maximum in effect at a start hour
///
/// Symmetric around solar noon. Hours outside the 08:00-16:59 window
/// contribute nothing.
pub fn uv_hour_fraction(hour: u32) -> f64 {
    match hour {
        8 | 16 => 0.2,
        9 | 15 => 0.5,
        10 | 14 => 0.7,
        11 | 13 => 0.9,
        12 => 1.0,
        _ => 0.0,
    }
}
