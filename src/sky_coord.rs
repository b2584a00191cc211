//! # Celestial coordinates with space motion
//!
//! [`SkyCoord`] holds, for a set of sources, their equatorial position at an observation
//! time, their proper motion and (when known) their distance. It can be propagated to another
//! epoch with [`SkyCoord::apply_space_motion`].
//!
//! ## Space motion model
//!
//! Each source moves on a straight line in Cartesian space with constant velocity. The
//! velocity is built from the proper motion and a radial term that starts at zero:
//!
//! ```text
//! r(t) = d · (u + w · Δt)
//! w    = μα* · e_α + μδ · e_δ + μr · u        (rad / yr)
//! ```
//!
//! where `u` is the unit vector towards the source, `e_α` and `e_δ` the local east and north
//! unit vectors, and `d` the distance. The new direction is `r / |r|`; the distance, when
//! known, becomes `d |r|`. The velocity is re-expressed in the local frame of the new
//! direction (including the radial term `μr` it acquires), so propagating in several steps
//! is equivalent to a single step.
use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    constants::{MasPerYear, Parsec, Radian, DPI, RADEG, RADMAS},
    time::years_between,
    warpfield_errors::WarpfieldError,
};

/// A single equatorial direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaDec {
    pub ra: Radian,
    pub dec: Radian,
}

impl RaDec {
    pub fn new(ra: Radian, dec: Radian) -> Self {
        RaDec { ra, dec }
    }

    pub fn from_degrees(ra: f64, dec: f64) -> Self {
        RaDec {
            ra: ra * RADEG,
            dec: dec * RADEG,
        }
    }

    pub fn unit_vector(&self) -> Vector3<f64> {
        radec_to_unit_vector(self.ra, self.dec)
    }
}

/// Where the proper motion of a [`SkyCoord`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOrigin {
    /// Measured proper motion was supplied.
    Catalogue,
    /// No proper motion was supplied; a zero motion stands in for it.
    Default,
}

/// Unit vector pointing towards (ra, dec).
pub fn radec_to_unit_vector(ra: Radian, dec: Radian) -> Vector3<f64> {
    let (sin_ra, cos_ra) = ra.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Convert a cartesian direction into (ra, dec), with ra in [0, 2π).
///
/// A null vector maps to (0, 0).
pub fn cartesian_to_radec(position: &Vector3<f64>) -> (Radian, Radian) {
    let norm = position.norm();
    if norm == 0. {
        return (0.0, 0.0);
    }
    let dec = (position.z / norm).clamp(-1.0, 1.0).asin();
    let ra = position.y.atan2(position.x);
    let ra = if ra < 0.0 { ra + DPI } else { ra };
    (ra, dec)
}

/// Local east (`e_α`) and north (`e_δ`) unit vectors at (ra, dec).
pub(crate) fn local_frame(ra: Radian, dec: Radian) -> (Vector3<f64>, Vector3<f64>) {
    let (sin_ra, cos_ra) = ra.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    (
        Vector3::new(-sin_ra, cos_ra, 0.0),
        Vector3::new(-sin_dec * cos_ra, -sin_dec * sin_ra, cos_dec),
    )
}

/// Equatorial positions of a set of sources, with their motion and observation time.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyCoord {
    ra: Vec<Radian>,
    dec: Vec<Radian>,
    pm_ra_cosdec: Vec<MasPerYear>,
    pm_dec: Vec<MasPerYear>,
    pm_radial: Vec<MasPerYear>,
    distance: Option<Vec<Option<Parsec>>>,
    obstime: Vec<Epoch>,
    motion: MotionOrigin,
}

fn check_len<T>(name: &str, values: &[T], expected: usize) -> Result<(), WarpfieldError> {
    if values.len() != expected {
        return Err(WarpfieldError::ColumnLengthMismatch {
            column: name.to_string(),
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

impl SkyCoord {
    /// Build a set of coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: positions in radians.
    /// * `proper_motion`: `(μα*, μδ)` in mas/yr; `None` stands for a zero motion with
    ///   [`MotionOrigin::Default`].
    /// * `distance`: per-source distance in parsecs, `None` where undefined.
    /// * `obstime`: observation time of every source.
    ///
    /// Return
    /// ------
    /// * the coordinates, or [`WarpfieldError::ColumnLengthMismatch`] if the inputs do not
    ///   share the same length.
    pub fn new(
        ra: Vec<Radian>,
        dec: Vec<Radian>,
        proper_motion: Option<(Vec<MasPerYear>, Vec<MasPerYear>)>,
        distance: Option<Vec<Option<Parsec>>>,
        obstime: Vec<Epoch>,
    ) -> Result<Self, WarpfieldError> {
        let n = ra.len();
        check_len("dec", &dec, n)?;
        check_len("obstime", &obstime, n)?;
        if let Some(distance) = &distance {
            check_len("distance", distance, n)?;
        }

        let (pm_ra_cosdec, pm_dec, motion) = match proper_motion {
            Some((pmra, pmdec)) => {
                check_len("pm_ra_cosdec", &pmra, n)?;
                check_len("pm_dec", &pmdec, n)?;
                (pmra, pmdec, MotionOrigin::Catalogue)
            }
            None => (vec![0.0; n], vec![0.0; n], MotionOrigin::Default),
        };

        Ok(SkyCoord {
            ra,
            dec,
            pm_ra_cosdec,
            pm_dec,
            pm_radial: vec![0.0; n],
            distance,
            obstime,
            motion,
        })
    }

    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }

    pub fn ra(&self) -> &[Radian] {
        &self.ra
    }

    pub fn dec(&self) -> &[Radian] {
        &self.dec
    }

    pub fn ra_deg(&self) -> Vec<f64> {
        self.ra.iter().map(|a| a / RADEG).collect()
    }

    pub fn dec_deg(&self) -> Vec<f64> {
        self.dec.iter().map(|d| d / RADEG).collect()
    }

    pub fn pm_ra_cosdec(&self) -> &[MasPerYear] {
        &self.pm_ra_cosdec
    }

    pub fn pm_dec(&self) -> &[MasPerYear] {
        &self.pm_dec
    }

    /// Rate of change of the distance, as a fraction of the distance, in mas/yr.
    ///
    /// Zero at construction; grows as a source moving on a straight line is propagated away
    /// from its closest approach.
    pub fn pm_radial(&self) -> &[MasPerYear] {
        &self.pm_radial
    }

    pub fn distance(&self) -> Option<&[Option<Parsec>]> {
        self.distance.as_deref()
    }

    pub fn obstime(&self) -> &[Epoch] {
        &self.obstime
    }

    pub fn motion(&self) -> MotionOrigin {
        self.motion
    }

    pub fn has_proper_motion(&self) -> bool {
        self.motion == MotionOrigin::Catalogue
    }

    pub fn get(&self, index: usize) -> Option<RaDec> {
        Some(RaDec::new(*self.ra.get(index)?, *self.dec.get(index)?))
    }

    pub fn unit_vectors(&self) -> Vec<Vector3<f64>> {
        self.ra
            .iter()
            .zip(&self.dec)
            .map(|(ra, dec)| radec_to_unit_vector(*ra, *dec))
            .collect()
    }

    /// Coordinates of the sources at `indices`, in that order.
    ///
    /// # Panics
    /// If an index is not smaller than [`SkyCoord::len`].
    pub fn take(&self, indices: &[usize]) -> SkyCoord {
        let pick = |v: &[f64]| indices.iter().map(|&i| v[i]).collect::<Vec<_>>();
        SkyCoord {
            ra: pick(&self.ra),
            dec: pick(&self.dec),
            pm_ra_cosdec: pick(&self.pm_ra_cosdec),
            pm_dec: pick(&self.pm_dec),
            pm_radial: pick(&self.pm_radial),
            distance: self
                .distance
                .as_ref()
                .map(|d| indices.iter().map(|&i| d[i]).collect()),
            obstime: indices.iter().map(|&i| self.obstime[i]).collect(),
            motion: self.motion,
        }
    }

    /// Propagate every source from its observation time to `epoch`.
    ///
    /// Return
    /// ------
    /// * new coordinates whose observation time is `epoch` for every source, or
    ///   [`WarpfieldError::ProperMotionUnavailable`] if these coordinates carry no measured
    ///   proper motion.
    pub fn apply_space_motion(&self, epoch: Epoch) -> Result<SkyCoord, WarpfieldError> {
        if self.motion == MotionOrigin::Default {
            return Err(WarpfieldError::ProperMotionUnavailable);
        }

        let n = self.len();
        let mut ra = Vec::with_capacity(n);
        let mut dec = Vec::with_capacity(n);
        let mut pm_ra_cosdec = Vec::with_capacity(n);
        let mut pm_dec = Vec::with_capacity(n);
        let mut pm_radial = Vec::with_capacity(n);
        let mut stretch = Vec::with_capacity(n);

        for i in 0..n {
            let dt = years_between(&self.obstime[i], &epoch);
            let u = radec_to_unit_vector(self.ra[i], self.dec[i]);
            let (e_ra, e_dec) = local_frame(self.ra[i], self.dec[i]);
            let w = (e_ra * self.pm_ra_cosdec[i] + e_dec * self.pm_dec[i] + u * self.pm_radial[i])
                * RADMAS;

            // Position in units of the initial distance.
            let r = u + w * dt;
            let s = r.norm();
            let (new_ra, new_dec) = cartesian_to_radec(&r);
            let (new_e_ra, new_e_dec) = local_frame(new_ra, new_dec);
            let new_u = r / s;

            // Same velocity, in units of the new distance.
            let w = w / (s * RADMAS);

            ra.push(new_ra);
            dec.push(new_dec);
            pm_ra_cosdec.push(w.dot(&new_e_ra));
            pm_dec.push(w.dot(&new_e_dec));
            pm_radial.push(w.dot(&new_u));
            stretch.push(s);
        }

        let distance = self.distance.as_ref().map(|d| {
            d.iter()
                .zip(&stretch)
                .map(|(d, s)| d.map(|d| d * s))
                .collect()
        });

        Ok(SkyCoord {
            ra,
            dec,
            pm_ra_cosdec,
            pm_dec,
            pm_radial,
            distance,
            obstime: vec![epoch; n],
            motion: self.motion,
        })
    }
}
