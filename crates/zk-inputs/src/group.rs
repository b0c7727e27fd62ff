// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Scalar and point arithmetic over Baby Jubjub.
//!
//! Baby Jubjub is the twisted Edwards curve defined over the BN254 scalar field, so
//! point coordinates live in the same field the Noir vote circuit computes over.
//! All points handed to the rest of the crate are affine and have passed
//! [`validate_point`].

use crate::errors::{Result, ZkInputsError};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, Fq, Fr};
use ark_ff::{PrimeField, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Integer modulo the prime subgroup order.
pub type Scalar = Fr;
/// Field the curve coordinates are defined over.
pub type BaseField = Fq;
/// Affine curve point.
pub type Point = EdwardsAffine;
/// Projective curve point, used for intermediate arithmetic.
pub type ProjectivePoint = EdwardsProjective;

/// Bytes drawn per scalar before wide reduction.
const WIDE_SCALAR_BYTES: usize = 64;

/// Fixed generator of the prime order subgroup.
pub fn generator() -> Point {
    Point::generator()
}

/// The neutral element.
pub fn identity() -> Point {
    ProjectivePoint::zero().into_affine()
}

/// `scalar·G`.
pub fn mul_generator(scalar: &Scalar) -> Point {
    (generator() * scalar).into_affine()
}

/// `scalar·point`.
pub fn scalar_mul(point: &Point, scalar: &Scalar) -> Point {
    (*point * scalar).into_affine()
}

pub fn add(a: &Point, b: &Point) -> Point {
    (a.into_group() + b).into_affine()
}

pub fn sub(a: &Point, b: &Point) -> Point {
    (a.into_group() - b).into_affine()
}

pub fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
    *a + b
}

pub fn scalar_mul_scalar(a: &Scalar, b: &Scalar) -> Scalar {
    *a * b
}

/// Checks that `point` lies on the curve and in the prime order subgroup.
pub fn validate_point(point: &Point) -> Result<()> {
    if !point.is_on_curve() {
        return Err(ZkInputsError::InvalidPoint("point is not on the curve".into()));
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ZkInputsError::InvalidPoint(
            "point is not in the prime order subgroup".into(),
        ));
    }
    Ok(())
}

/// Draws a uniformly random non-zero scalar.
///
/// Uses `try_fill_bytes` so an exhausted or failing source surfaces as
/// [`ZkInputsError::InsufficientEntropy`] instead of a panic.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Scalar> {
    loop {
        let mut bytes = Zeroizing::new([0u8; WIDE_SCALAR_BYTES]);
        rng.try_fill_bytes(&mut bytes[..])?;
        let scalar = Scalar::from_le_bytes_mod_order(&bytes[..]);
        if !scalar.is_zero() {
            return Ok(scalar);
        }
    }
}
