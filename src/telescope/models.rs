//! Reference telescope configurations.
use uom::si::{
    f64::{Angle, Length},
    length::{meter, micrometer},
};

use crate::distortion::DistortionModel;

use super::{Detector, Optics, Pointing, Telescope};

/// A JASMINE-like near-infrared astrometry telescope.
///
/// 3.86 m effective focal length, 0.3 m aperture, a 30 mm field radius and a single
/// 4096 × 4096 detector with 10 µm pixels centred on the optical axis.
pub fn jasmine(
    pointing: Pointing,
    position_angle: Angle,
    distortion: DistortionModel,
) -> Telescope {
    let optics = Optics {
        pointing,
        position_angle,
        focal_length: Length::new::<meter>(3.86),
        diameter: Length::new::<meter>(0.3),
        fov_radius: Length::new::<micrometer>(30000.0),
        distortion,
    };
    Telescope {
        optics,
        detectors: vec![Detector::new(4096, 4096, Length::new::<micrometer>(10.0))],
    }
}
