use hifitime::{Epoch, TimeScale};

use crate::constants::{JulianYear, DAYS_PER_JULIAN_YEAR, J2000_YEAR, SECONDS_PER_JULIAN_YEAR, T2000};

/// Time scale in which catalogue epochs are interpreted.
///
/// Astrometric catalogues quote their reference epoch in TCB. `hifitime` has no TCB
/// scale, so epochs are carried in TDB, which differs from TCB by a linear drift that
/// is common to every source and cancels out of epoch differences.
pub const EPOCH_TIME_SCALE: TimeScale = TimeScale::TDB;

/// Transformation from a decimal Julian year to an epoch
///
/// Argument
/// --------
/// * `year`: a decimal Julian year (e.g. `2016.0` for J2016.0)
///
/// Return
/// ------
/// * the corresponding [`Epoch`] in the TDB time scale
pub fn decimal_year_to_epoch(year: JulianYear) -> Epoch {
    let mjd = T2000 + (year - J2000_YEAR) * DAYS_PER_JULIAN_YEAR;
    Epoch::from_mjd_in_time_scale(mjd, EPOCH_TIME_SCALE)
}

/// Transformation from a vector of decimal Julian years to epochs
pub fn decimal_years_to_epochs(years: &[JulianYear]) -> Vec<Epoch> {
    years.iter().map(|y| decimal_year_to_epoch(*y)).collect()
}

/// The standard epoch J2000.0
pub fn j2000() -> Epoch {
    decimal_year_to_epoch(J2000_YEAR)
}

/// Elapsed time between two epochs, in Julian years
///
/// The result is positive when `to` is later than `from`.
pub fn years_between(from: &Epoch, to: &Epoch) -> f64 {
    (*to - *from).to_seconds() / SECONDS_PER_JULIAN_YEAR
}

/// Transformation from an epoch to a decimal Julian year
///
/// Argument
/// --------
/// * `epoch`: any epoch
///
/// Return
/// ------
/// * the decimal Julian year of `epoch` measured in the TDB time scale
pub fn epoch_to_decimal_year(epoch: &Epoch) -> JulianYear {
    J2000_YEAR + years_between(&j2000(), epoch)
}
