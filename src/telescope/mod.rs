//! # Telescope model
//!
//! A [`Telescope`] is an [`Optics`] (pointing, focal length, field of view, distortion)
//! together with the [`Detector`]s laid on its focal plane. Observing a [`SourceTable`]
//! runs the two stages in turn:
//!
//! 1. [`Optics::imaging`] propagates the sources to the observation epoch, projects them on
//!    the focal plane, keeps those inside the field of view and applies the distortion.
//! 2. [`Detector::capture`] converts the focal-plane positions to pixel coordinates and keeps
//!    the sources that land on the pixel grid.
//!
//! Ready-made configurations live in [`models`].
pub mod detector;
pub mod models;
pub mod optics;

use hifitime::Epoch;
use log::debug;

use crate::{
    source::{DetectorPositionTable, SourceTable},
    warpfield_errors::WarpfieldError,
};

pub use detector::Detector;
pub use optics::{Optics, Pointing};

#[derive(Debug, Clone)]
pub struct Telescope {
    pub optics: Optics,
    pub detectors: Vec<Detector>,
}

impl Telescope {
    /// Assemble a telescope.
    ///
    /// Return
    /// ------
    /// * [`WarpfieldError::InvalidParameter`] if `detectors` is empty.
    pub fn new(optics: Optics, detectors: Vec<Detector>) -> Result<Self, WarpfieldError> {
        if detectors.is_empty() {
            return Err(WarpfieldError::InvalidParameter(
                "a telescope needs at least one detector".into(),
            ));
        }
        Ok(Telescope { optics, detectors })
    }

    /// Observe the sources at `epoch`.
    ///
    /// Arguments
    /// ---------
    /// * `sources`: the catalogue to observe.
    /// * `epoch`: observation epoch; `None` keeps the epoch of the catalogue.
    ///
    /// Return
    /// ------
    /// * one table per detector, in the order of [`Telescope::detectors`].
    pub fn observe(
        &self,
        sources: &SourceTable,
        epoch: Option<Epoch>,
    ) -> Result<Vec<DetectorPositionTable>, WarpfieldError> {
        let focal_plane = self.optics.imaging(sources, epoch)?;
        debug!(
            "{} of {} sources inside the field of view",
            focal_plane.len(),
            sources.len()
        );
        self.detectors
            .iter()
            .map(|detector| detector.capture(&focal_plane))
            .collect()
    }
}
