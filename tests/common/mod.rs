use approx::assert_abs_diff_eq;
use warpfield::constants::MAS_PER_DEGREE;
use warpfield::table::{Column, ColumnUnit, QTable};

/// A small Gaia-like catalogue scattered around `(ra0, dec0)` (degrees).
///
/// `offsets` are `(Δra·cos δ, Δdec)` in degrees; every star has the same proper motion.
#[allow(dead_code)]
pub fn catalogue_around(
    ra0: f64,
    dec0: f64,
    offsets: &[(f64, f64)],
    pmra: f64,
    pmdec: f64,
) -> QTable {
    let n = offsets.len();
    let cos_dec = dec0.to_radians().cos();
    let ra = offsets.iter().map(|(dx, _)| ra0 + dx / cos_dec).collect();
    let dec = offsets.iter().map(|(_, dy)| dec0 + dy).collect();
    QTable::new()
        .with_column("source_id", Column::int((0..n as i64).collect()))
        .unwrap()
        .with_column("ra", Column::float(ra, ColumnUnit::Degree))
        .unwrap()
        .with_column("dec", Column::float(dec, ColumnUnit::Degree))
        .unwrap()
        .with_column("pmra", Column::float(vec![pmra; n], ColumnUnit::MasPerYear))
        .unwrap()
        .with_column("pmdec", Column::float(vec![pmdec; n], ColumnUnit::MasPerYear))
        .unwrap()
        .with_column("parallax", Column::float(vec![2.0; n], ColumnUnit::MilliArcSec))
        .unwrap()
        .with_column("phot_g_mean_mag", Column::float(vec![12.0; n], ColumnUnit::Magnitude))
        .unwrap()
        .with_column("ref_epoch", Column::float(vec![2016.0; n], ColumnUnit::Year))
        .unwrap()
}

/// Angular separation between two directions, in milliarcseconds.
#[allow(dead_code)]
pub fn separation_mas(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let hav = ((dec2 - dec1) / 2.0).sin().powi(2)
        + dec1.cos() * dec2.cos() * ((ra2 - ra1) / 2.0).sin().powi(2);
    2.0 * hav.sqrt().asin().to_degrees() * MAS_PER_DEGREE
}

#[allow(dead_code)]
pub fn assert_all_close(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_abs_diff_eq!(a, e, epsilon = epsilon);
    }
}
