//! # SIP-style polynomial distortion
//!
//! Maps undistorted focal-plane coordinates to their distorted (as-observed) positions
//! using a 5th-order polynomial without affine terms. Each axis carries 18 coefficients:
//!
//! - elements 0-2:   second order coefficients
//! - elements 3-6:   third order coefficients
//! - elements 7-11:  fourth order coefficients
//! - elements 12-17: fifth order coefficients
//!
//! Within an order `k` block, the `i`-th coefficient multiplies `x^(k-i) * y^i`.
//!
//! Raw coefficients are multiplied by `10^(-4 k)` before evaluation, so that calibration
//! fits handle coefficients of comparable magnitude across orders.
//!
//! Every function is generic over [`RealField`] so the map can be evaluated with any scalar
//! implementing it, including automatic-differentiation types. The evaluation never branches
//! on coefficient values.
use std::ops::Range;

use nalgebra::{RealField, Vector2};

use crate::{
    constants::{SIP_COEFF_LEN, SIP_ORDERS, SIP_SCALE_EXPONENT},
    warpfield_errors::WarpfieldError,
};

/// Calculate a two-dimensional polynomial expansion for a single order block.
///
/// For a block of length `L`, the exponent pair starts at `(L-1, 0)`; each term decrements
/// the power of `x` and increments the power of `y`, ending at `(0, L-1)`. Terms are summed
/// strictly left to right.
///
/// Arguments
/// ---------
/// * `coeff`: coefficients of the polynomial block.
/// * `xy`: original coordinates on the focal plane.
///
/// Return
/// ------
/// * one value `Σ coeff[i] * x^m_i * y^n_i` per input point.
pub fn polymap<T: RealField + Copy>(coeff: &[T], xy: &[Vector2<T>]) -> Vec<T> {
    let start = coeff.len() as i32 - 1;
    xy.iter()
        .map(|p| {
            let (value, _) = coeff
                .iter()
                .fold((T::zero(), (start, 0)), |(acc, (m, n)), c| {
                    (acc + *c * p.x.powi(m) * p.y.powi(n), (m - 1, n + 1))
                });
            value
        })
        .collect()
}

/// Index ranges of the order blocks inside an 18-element coefficient sequence.
pub fn block_ranges() -> impl Iterator<Item = Range<usize>> {
    SIP_ORDERS.iter().scan(0, |start, order| {
        let range = *start..*start + order + 1;
        *start = range.end;
        Some(range)
    })
}

/// Polynomial order of every coefficient, in coefficient order.
pub fn coefficient_orders() -> impl Iterator<Item = usize> {
    SIP_ORDERS
        .iter()
        .flat_map(|&order| std::iter::repeat(order).take(order + 1))
}

/// Normalization factor `10^(-4 k)` applied to every raw coefficient of order `k`.
pub fn sip_scale<T: RealField + Copy>() -> Vec<T> {
    coefficient_orders()
        .map(|order| nalgebra::convert(10f64.powi(SIP_SCALE_EXPONENT * order as i32)))
        .collect()
}

fn check_length<T>(axis: &'static str, coeff: &[T]) -> Result<(), WarpfieldError> {
    if coeff.len() != SIP_COEFF_LEN {
        return Err(WarpfieldError::InvalidCoefficientLength {
            axis,
            expected: SIP_COEFF_LEN,
            found: coeff.len(),
        });
    }
    Ok(())
}

/// Sum of the polymaps of every scaled order block.
fn displacement<T: RealField + Copy>(scaled: &[T], xy: &[Vector2<T>]) -> Vec<T> {
    block_ranges().fold(vec![T::zero(); xy.len()], |acc, range| {
        acc.into_iter()
            .zip(polymap(&scaled[range], xy))
            .map(|(total, part)| total + part)
            .collect()
    })
}

/// Distort the coordinates using the SIP coefficients.
///
/// Arguments
/// ---------
/// * `sip_a`: 18 raw coefficients of the displacement along `x`.
/// * `sip_b`: 18 raw coefficients of the displacement along `y`.
/// * `xy`: undistorted coordinates on the focal plane.
///
/// Return
/// ------
/// * the distorted coordinates, one per input point, or
///   [`WarpfieldError::InvalidCoefficientLength`] when a coefficient sequence does not hold
///   exactly 18 values.
pub fn distortion<T: RealField + Copy>(
    sip_a: &[T],
    sip_b: &[T],
    xy: &[Vector2<T>],
) -> Result<Vec<Vector2<T>>, WarpfieldError> {
    check_length("sip_a", sip_a)?;
    check_length("sip_b", sip_b)?;

    let scale = sip_scale::<T>();
    let sip_a: Vec<T> = sip_a.iter().zip(&scale).map(|(c, s)| *c * *s).collect();
    let sip_b: Vec<T> = sip_b.iter().zip(&scale).map(|(c, s)| *c * *s).collect();

    let dx = displacement(&sip_a, xy);
    let dy = displacement(&sip_b, xy);

    Ok(xy
        .iter()
        .zip(dx.into_iter().zip(dy))
        .map(|(p, (dx, dy))| p + Vector2::new(dx, dy))
        .collect())
}

/// Partial derivatives of the distortion with respect to the raw coefficients.
///
/// The distortion is linear in its coefficients, so for every point the derivative of the
/// `x` output with respect to `sip_a[i]` equals the derivative of the `y` output with respect
/// to `sip_b[i]`: `scale_i * x^m_i * y^n_i`. Cross derivatives are zero.
///
/// Return
/// ------
/// * one row of 18 basis values per input point.
pub fn distortion_jacobian<T: RealField + Copy>(xy: &[Vector2<T>]) -> Vec<[T; SIP_COEFF_LEN]> {
    let scale = sip_scale::<T>();
    xy.iter()
        .map(|p| {
            let mut row = [T::zero(); SIP_COEFF_LEN];
            for range in block_ranges() {
                let degree = (range.len() - 1) as i32;
                for (n, i) in range.enumerate() {
                    let n = n as i32;
                    row[i] = scale[i] * p.x.powi(degree - n) * p.y.powi(n);
                }
            }
            row
        })
        .collect()
}
