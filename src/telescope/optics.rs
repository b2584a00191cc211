use hifitime::Epoch;
use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::radian,
    f64::{Angle, Length},
    length::{meter, micrometer},
};

use crate::{
    constants::Micrometer,
    distortion::DistortionModel,
    sky_coord::{local_frame, radec_to_unit_vector, SkyCoord},
    source::{FocalPlanePositionTable, SourceTable},
    table::{Column, ColumnUnit},
    warpfield_errors::WarpfieldError,
};

/// Direction of the optical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointing {
    pub ra: Angle,
    pub dec: Angle,
}

impl Pointing {
    pub fn new(ra: Angle, dec: Angle) -> Self {
        Pointing { ra, dec }
    }
}

/// Optical part of a telescope: where it points and how the sky is imaged on the focal plane.
///
/// # Fields
///
/// * `pointing` - Direction of the optical axis
/// * `position_angle` - Rotation of the focal plane around the optical axis
/// * `focal_length` - Effective focal length
/// * `diameter` - Clear aperture diameter
/// * `fov_radius` - Radius of the usable field on the focal plane
/// * `distortion` - Distortion applied to the ideal focal-plane positions
#[derive(Debug, Clone)]
pub struct Optics {
    pub pointing: Pointing,
    pub position_angle: Angle,
    pub focal_length: Length,
    pub diameter: Length,
    pub fov_radius: Length,
    pub distortion: DistortionModel,
}

impl Optics {
    /// Create a new optics configuration
    ///
    /// Return
    /// ------
    /// * the optics, or [`WarpfieldError::InvalidParameter`] if the focal length, the
    ///   diameter or the field radius is not strictly positive.
    pub fn new(
        pointing: Pointing,
        position_angle: Angle,
        focal_length: Length,
        diameter: Length,
        fov_radius: Length,
        distortion: DistortionModel,
    ) -> Result<Self, WarpfieldError> {
        for (name, value) in [
            ("focal_length", focal_length),
            ("diameter", diameter),
            ("fov_radius", fov_radius),
        ] {
            if !(value.get::<meter>() > 0.0) {
                return Err(WarpfieldError::InvalidParameter(format!(
                    "{name} must be positive"
                )));
            }
        }
        Ok(Optics {
            pointing,
            position_angle,
            focal_length,
            diameter,
            fov_radius,
            distortion,
        })
    }

    pub fn f_number(&self) -> f64 {
        self.focal_length.get::<meter>() / self.diameter.get::<meter>()
    }

    /// Angle subtended by one micrometer at the centre of the focal plane, in radians.
    pub fn scale(&self) -> f64 {
        1.0 / self.focal_length.get::<micrometer>()
    }

    /// Radius of the usable field on the focal plane.
    pub fn focal_plane_radius(&self) -> Length {
        self.fov_radius
    }

    /// Angular radius of the field of view.
    pub fn field_of_view_radius(&self) -> Angle {
        let ratio =
            self.focal_plane_radius().get::<micrometer>() / self.focal_length.get::<micrometer>();
        Angle::new::<radian>(ratio.atan())
    }

    /// Ideal (undistorted) focal-plane positions of the sources, in micrometers.
    ///
    /// Gnomonic projection around the pointing, rotated by the position angle. At a zero
    /// position angle `x` points east and `y` north. Sources more than 90° away from the
    /// pointing have no image (`None`).
    pub fn project(&self, sky: &SkyCoord) -> Vec<Option<Vector2<Micrometer>>> {
        let ra = self.pointing.ra.get::<radian>();
        let dec = self.pointing.dec.get::<radian>();
        let axis = radec_to_unit_vector(ra, dec);
        let (east, north) = local_frame(ra, dec);
        let (sin_pa, cos_pa) = self.position_angle.get::<radian>().sin_cos();
        let f = self.focal_length.get::<micrometer>();

        sky.unit_vectors()
            .iter()
            .map(|s| {
                let cos_c = s.dot(&axis);
                if cos_c <= 0.0 {
                    return None;
                }
                let xi = s.dot(&east) / cos_c;
                let eta = s.dot(&north) / cos_c;
                Some(Vector2::new(
                    f * (xi * cos_pa - eta * sin_pa),
                    f * (xi * sin_pa + eta * cos_pa),
                ))
            })
            .collect()
    }

    /// Image the sources on the focal plane.
    ///
    /// Arguments
    /// ---------
    /// * `sources`: the catalogue to image.
    /// * `epoch`: observation epoch; when given, positions are first propagated to it.
    ///
    /// Return
    /// ------
    /// * the sources falling inside the field of view, with their distorted focal-plane
    ///   coordinates in the `x` and `y` columns.
    ///
    /// # Errors
    /// * [`WarpfieldError::SkyCoordUnavailable`] if the sources carry no coordinates.
    /// * any error raised by the distortion function.
    pub fn imaging(
        &self,
        sources: &SourceTable,
        epoch: Option<Epoch>,
    ) -> Result<FocalPlanePositionTable, WarpfieldError> {
        let mut sources = sources.clone();
        if let Some(epoch) = epoch {
            let outcome = sources.apply_space_motion(epoch);
            debug!("imaging at {epoch}: {outcome:?}");
        }
        let sky = sources
            .skycoord()
            .ok_or(WarpfieldError::SkyCoordUnavailable)?;

        let fov = self.focal_plane_radius().get::<micrometer>();
        let (indices, xy): (Vec<usize>, Vec<Vector2<f64>>) = self
            .project(sky)
            .into_iter()
            .enumerate()
            .filter_map(|(i, p)| p.filter(|p| p.norm() <= fov).map(|p| (i, p)))
            .unzip();

        let distorted = self.distortion.apply(&xy)?;
        let (x, y): (Vec<f64>, Vec<f64>) = distorted.iter().map(|p| (p.x, p.y)).unzip();

        let table = sources.select_with_columns(
            &indices,
            vec![
                ("x", Column::float(x, ColumnUnit::Micrometer)),
                ("y", Column::float(y, ColumnUnit::Micrometer)),
            ],
        )?;
        FocalPlanePositionTable::from_source(table)
    }
}
