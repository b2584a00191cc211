//! # Constants and type definitions for Warpfield
//!
//! This module centralizes the **unit conversion factors**, **reference epochs**, and
//! **common type aliases** used throughout the `warpfield` library.
//!
//! ## Overview
//!
//! - Angular conversions (degrees, milliarcseconds ↔ radians)
//! - Time constants (Julian year, J2000.0 reference epoch)
//! - Layout of the SIP distortion coefficient blocks
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Milliarcseconds → radians
pub const RADMAS: f64 = std::f64::consts::PI / 648_000_000.0;

/// Milliarcseconds in one degree
pub const MAS_PER_DEGREE: f64 = 3_600_000.0;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Number of seconds in a Julian year
pub const SECONDS_PER_JULIAN_YEAR: f64 = DAYS_PER_JULIAN_YEAR * SECONDS_PER_DAY;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00)
pub const T2000: f64 = 51544.5;

/// Julian year of the standard epoch assumed when a table carries no epoch column
pub const J2000_YEAR: f64 = 2000.0;

/// Distance in parsecs of a source with a parallax of one milliarcsecond
pub const PARSEC_MAS: f64 = 1000.0;

// -------------------------------------------------------------------------------------------------
// SIP distortion layout
// -------------------------------------------------------------------------------------------------

/// Polynomial orders covered by the distortion coefficients, lowest first.
pub const SIP_ORDERS: [usize; 4] = [2, 3, 4, 5];

/// Number of coefficients held by each axis of the distortion model.
///
/// An order `k` block has `k + 1` terms, so the sum runs 3 + 4 + 5 + 6.
pub const SIP_COEFF_LEN: usize = 18;

/// Decimal exponent applied per unit of polynomial order when normalizing coefficients.
pub const SIP_SCALE_EXPONENT: i32 = -4;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Angle in milliarcseconds
pub type MilliArcSec = f64;
/// Angular rate in milliarcseconds per Julian year
pub type MasPerYear = f64;
/// Distance in parsecs
pub type Parsec = f64;
/// Time expressed as a decimal Julian year (e.g. 2016.0)
pub type JulianYear = f64;
/// Length on the focal plane in micrometers
pub type Micrometer = f64;
/// Position on the detector in pixels
pub type Pixel = f64;

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_block_lengths_sum_to_coefficient_count() {
        let total: usize = SIP_ORDERS.iter().map(|order| order + 1).sum();
        assert_eq!(total, SIP_COEFF_LEN);
    }

    #[test]
    fn test_mas_conversion() {
        assert!((MAS_PER_DEGREE * RADMAS - RADEG).abs() < 1e-18);
    }
}
