//! # Astronomical source tables
//!
//! A [`SourceTable`] wraps a [`QTable`] of astrometric records and derives a [`SkyCoord`]
//! from it. The table recognises the following columns:
//!
//! - `ra`, `dec`: position (required for the derived coordinates)
//! - `pmra`, `pmdec`: proper motion in right ascension (μα*) and declination (μδ)
//! - `parallax`: parallax, converted to a distance
//! - `ref_epoch` (or `epoch`): measurement epoch as a decimal Julian year
//!
//! Missing optional columns fall back to neutral values: zero proper motion, undefined
//! distance, epoch J2000.0. A table without `ra` or `dec` is still a valid table; its
//! derived coordinates are simply unavailable.
//!
//! [`FocalPlanePositionTable`] and [`DetectorPositionTable`] are source tables that must
//! additionally carry focal-plane (`x`, `y`) and pixel (`nx`, `ny`) coordinates.
use std::{marker::PhantomData, ops::Deref, ops::DerefMut};

use hifitime::Epoch;
use itertools::izip;
use log::{debug, warn};
use nalgebra::Vector2;

use crate::{
    constants::{Micrometer, Parsec, Pixel, J2000_YEAR, PARSEC_MAS},
    sky_coord::SkyCoord,
    table::{Column, ColumnUnit, QTable},
    time::decimal_years_to_epochs,
    warpfield_errors::WarpfieldError,
};

/// Columns retrieved from the Gaia DR3 source catalogue, with their units.
pub const GAIA_COLUMNS: [(&str, Option<ColumnUnit>); 17] = [
    ("source_id", None),
    ("ra", Some(ColumnUnit::Degree)),
    ("ra_error", Some(ColumnUnit::MilliArcSec)),
    ("dec", Some(ColumnUnit::Degree)),
    ("dec_error", Some(ColumnUnit::MilliArcSec)),
    ("phot_g_mean_mag", Some(ColumnUnit::Magnitude)),
    ("phot_bp_mean_mag", Some(ColumnUnit::Magnitude)),
    ("phot_rp_mean_mag", Some(ColumnUnit::Magnitude)),
    ("pmra", Some(ColumnUnit::MasPerYear)),
    ("pmra_error", Some(ColumnUnit::MasPerYear)),
    ("pmdec", Some(ColumnUnit::MasPerYear)),
    ("pmdec_error", Some(ColumnUnit::MasPerYear)),
    ("parallax", Some(ColumnUnit::MilliArcSec)),
    ("parallax_error", Some(ColumnUnit::MilliArcSec)),
    ("ruwe", None),
    ("non_single_star", None),
    ("ref_epoch", Some(ColumnUnit::Year)),
];

/// Result of an epoch propagation request.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum PropagationOutcome {
    /// The derived coordinates now refer to the requested epoch.
    Propagated,
    /// The derived coordinates were left at their previous epoch.
    Unchanged(WarpfieldError),
}

impl PropagationOutcome {
    pub fn is_propagated(&self) -> bool {
        matches!(self, PropagationOutcome::Propagated)
    }
}

/// Table of celestial sources with their derived coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    table: QTable,
    skycoord: Option<SkyCoord>,
}

/// Reference epoch of every row: `ref_epoch`, else `epoch`, else J2000.0.
///
/// Missing entries (NaN or infinite) also fall back to J2000.0.
fn source_epochs(table: &QTable) -> Result<Vec<Epoch>, WarpfieldError> {
    let years = if table.contains("ref_epoch") {
        table.values_in("ref_epoch", ColumnUnit::Year)?
    } else if table.contains("epoch") {
        table.values_in("epoch", ColumnUnit::Year)?
    } else {
        vec![J2000_YEAR; table.len()]
    };
    let missing = years.iter().filter(|y| !y.is_finite()).count();
    if missing > 0 {
        warn!(
            "{missing} sources have no valid epoch, J{:.1} is assumed",
            J2000_YEAR
        );
    }
    let years: Vec<f64> = years
        .into_iter()
        .map(|y| if y.is_finite() { y } else { J2000_YEAR })
        .collect();
    Ok(decimal_years_to_epochs(&years))
}

/// Proper motion `(μα*, μδ)` in mas/yr when both columns are present.
///
/// Missing entries (NaN) are read as zero motion.
fn source_proper_motion(table: &QTable) -> Result<Option<(Vec<f64>, Vec<f64>)>, WarpfieldError> {
    if !(table.contains("pmra") && table.contains("pmdec")) {
        return Ok(None);
    }
    let or_zero = |v: Vec<f64>| -> Vec<f64> {
        v.into_iter()
            .map(|x| if x.is_nan() { 0.0 } else { x })
            .collect()
    };
    Ok(Some((
        or_zero(table.values_in("pmra", ColumnUnit::MasPerYear)?),
        or_zero(table.values_in("pmdec", ColumnUnit::MasPerYear)?),
    )))
}

/// Distance derived from the parallax column, if present.
///
/// Rows with a non-positive or missing parallax have an undefined distance.
fn source_distance(table: &QTable) -> Result<Option<Vec<Option<Parsec>>>, WarpfieldError> {
    if !table.contains("parallax") {
        return Ok(None);
    }
    let parallax = table.values_in("parallax", ColumnUnit::MilliArcSec)?;
    Ok(Some(
        parallax
            .into_iter()
            .map(|p| (p > 0.0).then(|| PARSEC_MAS / p))
            .collect(),
    ))
}

fn build_skycoord(table: &QTable) -> Result<SkyCoord, WarpfieldError> {
    let obstime = source_epochs(table)?;
    let proper_motion = source_proper_motion(table)?;
    let distance = source_distance(table)?;

    let ra = table.values_in("ra", ColumnUnit::Radian)?;
    let dec = table.values_in("dec", ColumnUnit::Radian)?;

    SkyCoord::new(ra, dec, proper_motion, distance, obstime)
}

impl SourceTable {
    /// Wrap a table and derive its celestial coordinates.
    ///
    /// This never fails: when the coordinates cannot be derived (e.g. `ra` or `dec` is
    /// missing) a warning is logged and [`SourceTable::skycoord`] returns `None`.
    pub fn new(table: QTable) -> Self {
        let skycoord = match build_skycoord(&table) {
            Ok(skycoord) => {
                debug!(
                    "derived coordinates for {} sources (proper motion: {:?})",
                    skycoord.len(),
                    skycoord.motion()
                );
                Some(skycoord)
            }
            Err(e) => {
                warn!("skip updating `skycoord` since {e}");
                None
            }
        };
        SourceTable { table, skycoord }
    }

    /// Build a table holding the `ra` and `dec` columns (degrees) of `skycoord`.
    pub fn from_skycoord(skycoord: &SkyCoord) -> Result<Self, WarpfieldError> {
        let table = QTable::new()
            .with_column("ra", Column::float(skycoord.ra_deg(), ColumnUnit::Degree))?
            .with_column("dec", Column::float(skycoord.dec_deg(), ColumnUnit::Degree))?;
        Ok(SourceTable::new(table))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.table.column(name)
    }

    /// Derived coordinates at the table's current epoch, if available.
    pub fn skycoord(&self) -> Option<&SkyCoord> {
        self.skycoord.as_ref()
    }

    /// Propagate the derived coordinates to `epoch` using the proper motions.
    ///
    /// The records themselves (including `ref_epoch`) are untouched; only the derived
    /// coordinates move to the new epoch. When no proper motion information is available
    /// the positions stay at their previous epoch and a warning is logged.
    pub fn apply_space_motion(&mut self, epoch: Epoch) -> PropagationOutcome {
        let propagated = self
            .skycoord
            .as_ref()
            .ok_or(WarpfieldError::SkyCoordUnavailable)
            .and_then(|skycoord| skycoord.apply_space_motion(epoch));

        match propagated {
            Ok(skycoord) => {
                self.skycoord = Some(skycoord);
                PropagationOutcome::Propagated
            }
            Err(e) => {
                warn!("{e}: the positions are not updated to the new epoch");
                PropagationOutcome::Unchanged(e)
            }
        }
    }

    /// Rows at `indices`, in that order.
    ///
    /// The derived coordinates keep their current epoch.
    ///
    /// # Panics
    /// If an index is not smaller than [`SourceTable::len`].
    pub fn select(&self, indices: &[usize]) -> SourceTable {
        SourceTable {
            table: self.table.take(indices),
            skycoord: self.skycoord.as_ref().map(|s| s.take(indices)),
        }
    }

    /// Rows at `indices` extended with `columns`, keeping the current derived coordinates.
    pub(crate) fn select_with_columns(
        &self,
        indices: &[usize],
        columns: Vec<(&str, Column)>,
    ) -> Result<SourceTable, WarpfieldError> {
        let mut selected = self.select(indices);
        for (name, column) in columns {
            selected.table.add_column(name, column)?;
        }
        Ok(selected)
    }
}

/// A set of columns a position table must carry.
pub trait RequiredColumns {
    const COLUMNS: &'static [&'static str];
}

/// Marker for tables carrying focal-plane coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FocalPlaneColumns;

impl RequiredColumns for FocalPlaneColumns {
    const COLUMNS: &'static [&'static str] = &["x", "y"];
}

/// Marker for tables carrying focal-plane and detector coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorColumns;

impl RequiredColumns for DetectorColumns {
    const COLUMNS: &'static [&'static str] = &["x", "y", "nx", "ny"];
}

/// A [`SourceTable`] validated to carry the columns listed by `R`.
#[derive(Debug, Clone, PartialEq)]
pub struct Positioned<R: RequiredColumns> {
    source: SourceTable,
    _columns: PhantomData<R>,
}

/// Source table with focal-plane coordinates `x`, `y` (micrometers).
pub type FocalPlanePositionTable = Positioned<FocalPlaneColumns>;

/// Source table with focal-plane coordinates and detector coordinates `nx`, `ny` (pixels).
pub type DetectorPositionTable = Positioned<DetectorColumns>;

impl<R: RequiredColumns> Positioned<R> {
    /// Wrap `table`, failing with [`WarpfieldError::MissingColumn`] if a required column is
    /// absent.
    pub fn new(table: QTable) -> Result<Self, WarpfieldError> {
        Self::from_source(SourceTable::new(table))
    }

    pub fn from_source(source: SourceTable) -> Result<Self, WarpfieldError> {
        for name in R::COLUMNS {
            source.table.require(name)?;
        }
        Ok(Positioned {
            source,
            _columns: PhantomData,
        })
    }

    pub fn source(&self) -> &SourceTable {
        &self.source
    }

    pub fn into_source(self) -> SourceTable {
        self.source
    }

    fn pairs(&self, x: &str, y: &str, unit: ColumnUnit) -> Result<Vec<Vector2<f64>>, WarpfieldError> {
        let xs = self.source.table.values_in(x, unit)?;
        let ys = self.source.table.values_in(y, unit)?;
        Ok(izip!(xs, ys).map(|(x, y)| Vector2::new(x, y)).collect())
    }

    /// Focal-plane coordinates in micrometers.
    pub fn focal_plane_xy(&self) -> Result<Vec<Vector2<Micrometer>>, WarpfieldError> {
        self.pairs("x", "y", ColumnUnit::Micrometer)
    }
}

impl DetectorPositionTable {
    /// Detector coordinates in pixels.
    pub fn pixel_xy(&self) -> Result<Vec<Vector2<Pixel>>, WarpfieldError> {
        self.pairs("nx", "ny", ColumnUnit::Pixel)
    }
}

impl<R: RequiredColumns> Deref for Positioned<R> {
    type Target = SourceTable;

    fn deref(&self) -> &Self::Target {
        &self.source
    }
}

impl<R: RequiredColumns> DerefMut for Positioned<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.source
    }
}

#[cfg(test)]
mod source_test {
    use super::*;
    use crate::time::{decimal_year_to_epoch, j2000, years_between};
    use approx::assert_abs_diff_eq;

    fn gaia_like() -> QTable {
        QTable::new()
            .with_column("source_id", Column::int(vec![11, 12]))
            .unwrap()
            .with_column("ra", Column::float(vec![269.452, 10.0], ColumnUnit::Degree))
            .unwrap()
            .with_column("dec", Column::float(vec![4.693, -30.0], ColumnUnit::Degree))
            .unwrap()
            .with_column("pmra", Column::float(vec![-801.551, f64::NAN], ColumnUnit::MasPerYear))
            .unwrap()
            .with_column("pmdec", Column::float(vec![10362.394, 5.0], ColumnUnit::MasPerYear))
            .unwrap()
            .with_column("parallax", Column::float(vec![546.976, -0.2], ColumnUnit::MilliArcSec))
            .unwrap()
            .with_column("ref_epoch", Column::float(vec![2016.0, 2016.0], ColumnUnit::Year))
            .unwrap()
    }

    #[test]
    fn test_gaia_schema() {
        assert_eq!(GAIA_COLUMNS.len(), 17);
        assert_eq!(GAIA_COLUMNS[1], ("ra", Some(ColumnUnit::Degree)));
        assert!(GAIA_COLUMNS
            .iter()
            .any(|(n, u)| *n == "ref_epoch" && *u == Some(ColumnUnit::Year)));
    }

    #[test]
    fn test_full_record() {
        let table = SourceTable::new(gaia_like());
        assert_eq!(table.len(), 2);
        let sky = table.skycoord().unwrap();
        assert!(sky.has_proper_motion());
        assert_eq!(sky.pm_ra_cosdec(), &[-801.551, 0.0]);

        let distance = sky.distance().unwrap();
        assert_abs_diff_eq!(distance[0].unwrap(), 1000.0 / 546.976, epsilon = 1e-12);
        assert_eq!(distance[1], None);

        let epoch = decimal_year_to_epoch(2016.0);
        assert_eq!(years_between(&epoch, &sky.obstime()[0]), 0.0);
    }

    #[test]
    fn test_epoch_fallbacks() {
        let base = QTable::new()
            .with_column("ra", Column::float(vec![1.0], ColumnUnit::Degree))
            .unwrap()
            .with_column("dec", Column::float(vec![2.0], ColumnUnit::Degree))
            .unwrap();

        let table = SourceTable::new(base.clone());
        let sky = table.skycoord().unwrap();
        assert!(!sky.has_proper_motion());
        assert!(sky.distance().is_none());
        assert_eq!(
            years_between(&decimal_year_to_epoch(2000.0), &sky.obstime()[0]),
            0.0
        );

        let with_epoch = base
            .with_column("epoch", Column::float(vec![2015.5], ColumnUnit::Year))
            .unwrap();
        let table = SourceTable::new(with_epoch);
        assert_eq!(
            years_between(
                &decimal_year_to_epoch(2015.5),
                &table.skycoord().unwrap().obstime()[0]
            ),
            0.0
        );
    }

    #[test]
    fn test_missing_epoch_falls_back_to_j2000() {
        let table = QTable::new()
            .with_column("ra", Column::float(vec![1.0, 2.0, 3.0], ColumnUnit::Degree))
            .unwrap()
            .with_column("dec", Column::float(vec![2.0, 3.0, 4.0], ColumnUnit::Degree))
            .unwrap()
            .with_column(
                "ref_epoch",
                Column::float(vec![2016.0, f64::NAN, f64::INFINITY], ColumnUnit::Year),
            )
            .unwrap();
        let sky = SourceTable::new(table);
        let obstime = sky.skycoord().unwrap().obstime();

        assert_eq!(years_between(&decimal_year_to_epoch(2016.0), &obstime[0]), 0.0);
        assert_eq!(years_between(&j2000(), &obstime[1]), 0.0);
        assert_eq!(years_between(&j2000(), &obstime[2]), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_select_out_of_range() {
        let table = SourceTable::new(gaia_like());
        let _ = table.select(&[table.len()]);
    }

    #[test]
    fn test_missing_position_gives_unavailable_coordinates() {
        let table = QTable::new()
            .with_column("ra", Column::float(vec![1.0, 2.0], ColumnUnit::Degree))
            .unwrap()
            .with_column("phot_g_mean_mag", Column::float(vec![12.0, 13.5], ColumnUnit::Magnitude))
            .unwrap();
        let mut table = SourceTable::new(table);
        assert_eq!(table.len(), 2);
        assert!(table.skycoord().is_none());
        assert!(table.column("phot_g_mean_mag").is_some());

        let outcome = table.apply_space_motion(decimal_year_to_epoch(2030.0));
        assert_eq!(
            outcome,
            PropagationOutcome::Unchanged(WarpfieldError::SkyCoordUnavailable)
        );
        assert!(table.skycoord().is_none());
    }

    #[test]
    fn test_propagation_keeps_records() {
        let mut table = SourceTable::new(gaia_like());
        let before = table.skycoord().unwrap().clone();
        let target = decimal_year_to_epoch(2026.0);

        assert!(table.apply_space_motion(target).is_propagated());
        let after = table.skycoord().unwrap();
        assert!(after.dec()[0] > before.dec()[0]);
        assert_eq!(years_between(&target, &after.obstime()[1]), 0.0);
        assert_eq!(
            table.column("ref_epoch"),
            gaia_like().column("ref_epoch")
        );
        assert_eq!(table.table().colnames(), gaia_like().colnames());
    }

    #[test]
    fn test_select_keeps_current_epoch() {
        let mut table = SourceTable::new(gaia_like());
        let target = decimal_year_to_epoch(2020.0);
        assert!(table.apply_space_motion(target).is_propagated());

        let sub = table.select(&[1]);
        assert_eq!(sub.len(), 1);
        assert_eq!(years_between(&target, &sub.skycoord().unwrap().obstime()[0]), 0.0);
        assert_eq!(sub.skycoord().unwrap().ra()[0], table.skycoord().unwrap().ra()[1]);
    }

    #[test]
    fn test_from_skycoord() {
        let source = SourceTable::new(gaia_like());
        let rebuilt = SourceTable::from_skycoord(source.skycoord().unwrap()).unwrap();
        assert_eq!(rebuilt.table().colnames(), vec!["ra", "dec"]);
        let sky = rebuilt.skycoord().unwrap();
        assert_abs_diff_eq!(sky.ra()[0], source.skycoord().unwrap().ra()[0], epsilon = 1e-14);
    }

    #[test]
    fn test_required_columns() {
        let table = gaia_like();
        assert_eq!(
            FocalPlanePositionTable::new(table.clone()).err(),
            Some(WarpfieldError::MissingColumn("x".into()))
        );

        let with_xy = table
            .with_column("x", Column::float(vec![1.0, 2.0], ColumnUnit::Millimeter))
            .unwrap()
            .with_column("y", Column::float(vec![3.0, 4.0], ColumnUnit::Micrometer))
            .unwrap();
        let fp = FocalPlanePositionTable::new(with_xy.clone()).unwrap();
        assert_eq!(
            fp.focal_plane_xy().unwrap(),
            vec![Vector2::new(1000.0, 3.0), Vector2::new(2000.0, 4.0)]
        );
        assert_eq!(fp.len(), 2);

        assert_eq!(
            DetectorPositionTable::new(with_xy.clone()).err(),
            Some(WarpfieldError::MissingColumn("nx".into()))
        );
        let with_pixels = with_xy
            .with_column("nx", Column::float(vec![10.5, 20.5], ColumnUnit::Pixel))
            .unwrap()
            .with_column("ny", Column::float(vec![30.5, 40.5], ColumnUnit::Pixel))
            .unwrap();
        let det = DetectorPositionTable::new(with_pixels).unwrap();
        assert_eq!(det.pixel_xy().unwrap()[1], Vector2::new(20.5, 40.5));
    }
}
