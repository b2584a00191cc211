use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

use crate::{
    constants::Micrometer,
    source::{DetectorPositionTable, FocalPlanePositionTable},
    table::{Column, ColumnUnit},
    warpfield_errors::WarpfieldError,
};

fn zero_length() -> Length {
    Length::new::<micrometer>(0.0)
}

/// A pixel array placed on the focal plane.
///
/// Pixel `(i, j)` covers `[i, i + 1) × [j, j + 1)` in detector coordinates, so the centre of
/// the array sits at `(naxis1 / 2, naxis2 / 2)`. The centre of the array is shifted from the
/// optical axis by `(offset_dx, offset_dy)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub naxis1: usize,
    pub naxis2: usize,
    pub pixel_scale: Length,
    #[serde(default = "zero_length")]
    pub offset_dx: Length,
    #[serde(default = "zero_length")]
    pub offset_dy: Length,
}

impl Detector {
    /// A detector centred on the optical axis.
    pub fn new(naxis1: usize, naxis2: usize, pixel_scale: Length) -> Self {
        Detector {
            naxis1,
            naxis2,
            pixel_scale,
            offset_dx: zero_length(),
            offset_dy: zero_length(),
        }
    }

    pub fn with_offset(self, offset_dx: Length, offset_dy: Length) -> Self {
        Detector {
            offset_dx,
            offset_dy,
            ..self
        }
    }

    pub fn width(&self) -> Length {
        self.pixel_scale * self.naxis1 as f64
    }

    pub fn height(&self) -> Length {
        self.pixel_scale * self.naxis2 as f64
    }

    /// Focal-plane positions of the four corners, counter-clockwise from the lower left.
    pub fn corners(&self) -> [Vector2<Micrometer>; 4] {
        let cx = self.offset_dx.get::<micrometer>();
        let cy = self.offset_dy.get::<micrometer>();
        let hw = self.width().get::<micrometer>() / 2.0;
        let hh = self.height().get::<micrometer>() / 2.0;
        [
            Vector2::new(cx - hw, cy - hh),
            Vector2::new(cx + hw, cy - hh),
            Vector2::new(cx + hw, cy + hh),
            Vector2::new(cx - hw, cy + hh),
        ]
    }

    /// Pixel coordinates of a focal-plane position (micrometers).
    pub fn to_pixel(&self, xy: &Vector2<Micrometer>) -> Vector2<f64> {
        let scale = self.pixel_scale.get::<micrometer>();
        Vector2::new(
            (xy.x - self.offset_dx.get::<micrometer>()) / scale + self.naxis1 as f64 / 2.0,
            (xy.y - self.offset_dy.get::<micrometer>()) / scale + self.naxis2 as f64 / 2.0,
        )
    }

    pub fn contains_pixel(&self, pixel: &Vector2<f64>) -> bool {
        (0.0..self.naxis1 as f64).contains(&pixel.x) && (0.0..self.naxis2 as f64).contains(&pixel.y)
    }

    /// Record the sources that land on this detector.
    ///
    /// Return
    /// ------
    /// * the sources of `focal_plane` whose position falls on the pixel grid, with their
    ///   pixel coordinates in the `nx` and `ny` columns.
    pub fn capture(
        &self,
        focal_plane: &FocalPlanePositionTable,
    ) -> Result<DetectorPositionTable, WarpfieldError> {
        if !(self.pixel_scale.get::<micrometer>() > 0.0) {
            return Err(WarpfieldError::InvalidParameter(
                "pixel_scale must be positive".into(),
            ));
        }

        let (indices, pixels): (Vec<usize>, Vec<Vector2<f64>>) = focal_plane
            .focal_plane_xy()?
            .iter()
            .map(|xy| self.to_pixel(xy))
            .enumerate()
            .filter(|(_, pixel)| self.contains_pixel(pixel))
            .unzip();

        let (nx, ny): (Vec<f64>, Vec<f64>) = pixels.iter().map(|p| (p.x, p.y)).unzip();
        let table = focal_plane.source().select_with_columns(
            &indices,
            vec![
                ("nx", Column::float(nx, ColumnUnit::Pixel)),
                ("ny", Column::float(ny, ColumnUnit::Pixel)),
            ],
        )?;
        DetectorPositionTable::from_source(table)
    }
}
