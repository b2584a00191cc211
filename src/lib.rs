//! # warpfield
//!
//! Simulated astrometric observations: celestial sources are propagated to an observation
//! epoch, imaged through a telescope with a pluggable focal-plane distortion and recorded on
//! its detectors.
//!
//! - [`source`]: source tables and the tables derived from them along the pipeline.
//! - [`sky_coord`]: equatorial coordinates with linear space motion.
//! - [`distortion`]: distortion functions, including the 5th-order SIP polynomial.
//! - [`telescope`]: optics, detectors and reference configurations.
pub mod constants;
pub mod distortion;
pub mod sky_coord;
pub mod source;
pub mod table;
pub mod telescope;
pub mod time;
pub mod warpfield_errors;

pub use distortion::{DistortionFn, DistortionModel, SipCoefficients};
pub use sky_coord::{RaDec, SkyCoord};
pub use source::{DetectorPositionTable, FocalPlanePositionTable, SourceTable};
pub use table::{Column, ColumnUnit, QTable};
pub use telescope::{Detector, Optics, Pointing, Telescope};
pub use warpfield_errors::WarpfieldError;
