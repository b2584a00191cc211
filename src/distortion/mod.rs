//! # Focal-plane distortion models
//!
//! A distortion function maps undistorted focal-plane coordinates to distorted ones. Every
//! distortion function shares the signature [`DistortionFn`]: two coefficient sequences (one
//! per axis) and a batch of coordinates, returning a batch of the same size.
//!
//! ## Public API
//!
//! - [`identity_transformation`]: the default slot, leaves positions untouched.
//! - [`sip::distortion`]: 5th-order SIP-style polynomial without affine terms.
//! - [`SipCoefficients`]: validated pair of 18-element coefficient sequences.
//! - [`DistortionModel`]: a distortion function bound to its coefficients, as carried by
//!   [`crate::telescope::Optics`].
//!
//! ```rust
//! use nalgebra::Vector2;
//! use warpfield::distortion::{DistortionModel, SipCoefficients};
//!
//! let mut sip_a = vec![0.0; 18];
//! sip_a[0] = 1.0;
//! let coefficients = SipCoefficients::new(sip_a, vec![0.0; 18]).unwrap();
//! let model = DistortionModel::sip(coefficients);
//!
//! let distorted = model.apply(&[Vector2::new(10_000.0, 0.0)]).unwrap();
//! assert!((distorted[0].x - 10_001.0).abs() < 1e-9);
//! ```
pub mod sip;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::{constants::SIP_COEFF_LEN, warpfield_errors::WarpfieldError};

pub use sip::{distortion, distortion_jacobian, polymap};

/// Signature shared by every pluggable distortion function.
pub type DistortionFn =
    fn(&[f64], &[f64], &[Vector2<f64>]) -> Result<Vec<Vector2<f64>>, WarpfieldError>;

/// Distortion function that returns the input coordinates unchanged.
///
/// The coefficient sequences are ignored.
pub fn identity_transformation(
    _sip_a: &[f64],
    _sip_b: &[f64],
    xy: &[Vector2<f64>],
) -> Result<Vec<Vector2<f64>>, WarpfieldError> {
    Ok(xy.to_vec())
}

/// Pair of SIP coefficient sequences, 18 values each.
///
/// The shape is validated on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSipCoefficients")]
pub struct SipCoefficients {
    sip_a: Vec<f64>,
    sip_b: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSipCoefficients {
    sip_a: Vec<f64>,
    sip_b: Vec<f64>,
}

impl TryFrom<RawSipCoefficients> for SipCoefficients {
    type Error = WarpfieldError;

    fn try_from(raw: RawSipCoefficients) -> Result<Self, Self::Error> {
        SipCoefficients::new(raw.sip_a, raw.sip_b)
    }
}

impl SipCoefficients {
    /// Build a coefficient pair, rejecting sequences that do not hold exactly 18 values.
    pub fn new(sip_a: Vec<f64>, sip_b: Vec<f64>) -> Result<Self, WarpfieldError> {
        for (axis, coeff) in [("sip_a", &sip_a), ("sip_b", &sip_b)] {
            if coeff.len() != SIP_COEFF_LEN {
                return Err(WarpfieldError::InvalidCoefficientLength {
                    axis,
                    expected: SIP_COEFF_LEN,
                    found: coeff.len(),
                });
            }
        }
        Ok(SipCoefficients { sip_a, sip_b })
    }

    /// All-zero coefficients (no displacement).
    pub fn zeros() -> Self {
        SipCoefficients {
            sip_a: vec![0.0; SIP_COEFF_LEN],
            sip_b: vec![0.0; SIP_COEFF_LEN],
        }
    }

    pub fn sip_a(&self) -> &[f64] {
        &self.sip_a
    }

    pub fn sip_b(&self) -> &[f64] {
        &self.sip_b
    }
}

impl Default for SipCoefficients {
    fn default() -> Self {
        Self::zeros()
    }
}

/// A distortion function bound to the coefficients it is evaluated with.
#[derive(Debug, Clone)]
pub struct DistortionModel {
    function: DistortionFn,
    coefficients: SipCoefficients,
}

impl DistortionModel {
    pub fn new(function: DistortionFn, coefficients: SipCoefficients) -> Self {
        DistortionModel {
            function,
            coefficients,
        }
    }

    /// The default model: no displacement.
    pub fn identity() -> Self {
        Self::new(identity_transformation, SipCoefficients::zeros())
    }

    /// SIP polynomial distortion with the given coefficients.
    pub fn sip(coefficients: SipCoefficients) -> Self {
        Self::new(distortion::<f64>, coefficients)
    }

    pub fn coefficients(&self) -> &SipCoefficients {
        &self.coefficients
    }

    /// Return a copy of this model evaluated with other coefficients.
    pub fn with_coefficients(&self, coefficients: SipCoefficients) -> Self {
        Self::new(self.function, coefficients)
    }

    /// Apply the distortion to a batch of focal-plane coordinates.
    pub fn apply(&self, xy: &[Vector2<f64>]) -> Result<Vec<Vector2<f64>>, WarpfieldError> {
        (self.function)(self.coefficients.sip_a(), self.coefficients.sip_b(), xy)
    }
}

impl Default for DistortionModel {
    fn default() -> Self {
        Self::identity()
    }
}
