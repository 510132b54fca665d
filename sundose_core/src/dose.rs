//! Vitamin D dose estimation.
//!
//! Pure arithmetic over the dosimetry tables: body surface fraction from
//! the exposure mask, then the IU estimate from UV index, session length,
//! and the skin's minimal erythema dose.

use crate::tables;
use crate::types::{AgeBracket, ExposureMask, LogTime, SkinType};

/// IU of vitamin D synthesized by one minimal erythema dose over the whole body
const IU_PER_FULL_BODY_MED: f64 = 21120.0;

/// One UV index unit corresponds to 25 mW/m² of erythemal irradiance,
/// so dividing by 40 converts a UV index into W/m²
const UV_INDEX_PER_W_PER_M2: f64 = 40.0;

/// Fraction of total body surface exposed, per the mask and age bracket
///
/// An empty mask yields 0.0. Even a full mask stays below 1.0 because the
/// table covers the anterior trunk only.
pub fn compute_bsa(body: &ExposureMask, age: u32) -> f64 {
    let bracket = AgeBracket::from_age(age);
    let total: f64 = body
        .exposed_regions()
        .map(|region| tables::region_surface_percent(bracket, region))
        .sum();
    total / 100.0
}

/// Estimate the IU of vitamin D synthesized by one session
///
/// The daily clear-sky maximum is attenuated by the start hour; a start
/// outside the 08:00-16:59 window zeroes the estimate regardless of how
/// long the session ran.
pub fn estimate_vitamin_d(
    body: &ExposureMask,
    start_time: LogTime,
    duration_seconds: u32,
    skin_type: SkinType,
    age: u32,
    uv_clear_sky_max: f64,
) -> u32 {
    let bsa = compute_bsa(body, age);
    let med = tables::med_j_per_m2(skin_type);
    let uvi = uv_clear_sky_max * tables::uv_hour_fraction(start_time.hour());

    tracing::debug!(
        "estimating dose: uvi={}, duration={}s, bsa={}, med={}",
        uvi,
        duration_seconds,
        bsa,
        med
    );

    let iu = (IU_PER_FULL_BODY_MED * uvi * duration_seconds as f64 * bsa)
        / (UV_INDEX_PER_W_PER_M2 * med);
    iu.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BodyRegion;

    fn noon() -> LogTime {
        "12:00".parse().unwrap()
    }

    #[test]
    fn test_empty_mask_yields_zero_bsa() {
        assert_eq!(compute_bsa(&ExposureMask::none(), 30), 0.0);
    }

    #[test]
    fn test_full_mask_stays_below_one() {
        for age in [0, 3, 7, 12, 15, 40] {
            let bsa = compute_bsa(&ExposureMask::all(), age);
            assert!(bsa > 0.0 && bsa < 1.0, "age {} gave bsa {}", age, bsa);
        }
    }

    #[test]
    fn test_bsa_depends_on_age_bracket() {
        let mask = ExposureMask::none().with(BodyRegion::Head);
        assert_eq!(compute_bsa(&mask, 0), 0.19);
        assert_eq!(compute_bsa(&mask, 40), 0.07);
    }

    #[test]
    fn test_known_scenario() {
        // Anterior torso for half an hour at noon under a clear-sky max of
        // 8.0, skin type II, adult: 21120 * 8 * 1800 * 0.13 / (40 * 250).
        let mask = ExposureMask::none().with(BodyRegion::Torso);
        let iu = estimate_vitamin_d(&mask, noon(), 1800, SkinType::Type2, 30, 8.0);
        assert_eq!(iu, 3954);
    }

    #[test]
    fn test_zero_outside_uv_window() {
        let mask = ExposureMask::all();
        let early: LogTime = "07:59".parse().unwrap();
        let late: LogTime = "17:00".parse().unwrap();

        assert_eq!(estimate_vitamin_d(&mask, early, 7200, SkinType::Type1, 30, 11.0), 0);
        assert_eq!(estimate_vitamin_d(&mask, late, 7200, SkinType::Type1, 30, 11.0), 0);
    }

    #[test]
    fn test_zero_duration_yields_zero() {
        let mask = ExposureMask::all();
        assert_eq!(estimate_vitamin_d(&mask, noon(), 0, SkinType::Type3, 30, 8.0), 0);
    }

    #[test]
    fn test_fully_covered_session_yields_zero() {
        let mask = ExposureMask::none();
        assert_eq!(
            estimate_vitamin_d(&mask, noon(), 3600, SkinType::Type1, 30, 11.0),
            0
        );
    }

    #[test]
    fn test_estimate_scales_with_duration() {
        let mask = ExposureMask::none().with(BodyRegion::Torso);
        let half_hour = estimate_vitamin_d(&mask, noon(), 1800, SkinType::Type2, 30, 8.0);
        let hour = estimate_vitamin_d(&mask, noon(), 3600, SkinType::Type2, 30, 8.0);

        // Each call rounds independently, so allow 1 IU of slack.
        let diff = (i64::from(hour) - 2 * i64::from(half_hour)).abs();
        assert!(diff <= 1, "expected ~2x, got {} vs {}", hour, half_hour);
    }

    #[test]
    fn test_darker_skin_synthesizes_less() {
        let mask = ExposureMask::all();
        let fair = estimate_vitamin_d(&mask, noon(), 1800, SkinType::Type1, 30, 8.0);
        let dark = estimate_vitamin_d(&mask, noon(), 1800, SkinType::Type6, 30, 8.0);
        assert!(fair > dark);
        assert!(dark > 0);
    }

    #[test]
    fn test_morning_attenuation() {
        let mask = ExposureMask::none().with(BodyRegion::Torso);
        let noon_iu = estimate_vitamin_d(&mask, noon(), 1800, SkinType::Type2, 30, 8.0);
        let eight: LogTime = "08:30".parse().unwrap();
        let morning_iu = estimate_vitamin_d(&mask, eight, 1800, SkinType::Type2, 30, 8.0);

        // 0.2 of the noon fraction, subject to rounding.
        assert!(morning_iu < noon_iu / 4);
        assert!(morning_iu > 0);
    }
}
