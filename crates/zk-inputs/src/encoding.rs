// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Conversions between curve values and the circuit field.
//!
//! The vote circuit computes over the BN254 scalar field. Curve coordinates and
//! scalars are carried across as integers and checked against the target
//! modulus, so a mismatched curve/circuit pairing fails loudly instead of
//! silently reducing.

use crate::errors::{Result, ZkInputsError};
use crate::group::{self, BaseField, Point, Scalar};
use ark_ff::PrimeField;
use num_bigint::BigUint;

/// Element of the circuit field.
pub type FieldElement = ark_bn254::Fr;

const CIRCUIT_FIELD: &str = "circuit field";
const BASE_FIELD: &str = "curve base field";
const SCALAR_FIELD: &str = "curve scalar field";

/// Moves `value` into field `T` without reduction.
fn convert<S: PrimeField, T: PrimeField>(value: &S, field: &'static str) -> Result<T> {
    let n: BigUint = value.into_bigint().into();
    let modulus: BigUint = T::MODULUS.into();
    if n >= modulus {
        return Err(ZkInputsError::FieldOverflow { field });
    }
    Ok(T::from(n))
}

/// Affine coordinates `(x, y)` of `point` as circuit field elements.
pub fn point_to_field(point: &Point) -> Result<(FieldElement, FieldElement)> {
    Ok((
        convert(&point.x, CIRCUIT_FIELD)?,
        convert(&point.y, CIRCUIT_FIELD)?,
    ))
}

/// Rebuilds a validated point from circuit field coordinates.
pub fn field_to_point(x: &FieldElement, y: &FieldElement) -> Result<Point> {
    let x: BaseField = convert(x, BASE_FIELD)?;
    let y: BaseField = convert(y, BASE_FIELD)?;
    let point = Point::new_unchecked(x, y);
    group::validate_point(&point)?;
    Ok(point)
}

pub fn scalar_to_field(scalar: &Scalar) -> Result<FieldElement> {
    convert(scalar, CIRCUIT_FIELD)
}

/// Fails with `FieldOverflow` when `value` is not below the group order.
pub fn field_to_scalar(value: &FieldElement) -> Result<Scalar> {
    convert(value, SCALAR_FIELD)
}

/// Decimal string form used in JSON inputs and Prover.toml.
pub fn field_to_decimal(value: &FieldElement) -> String {
    let n: BigUint = value.into_bigint().into();
    n.to_string()
}

/// Parses a decimal or `0x`-prefixed hex literal into a circuit field element.
pub fn field_from_str(literal: &str) -> Result<FieldElement> {
    let literal = literal.trim();
    let parsed = match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => literal.parse::<BigUint>().ok(),
    };
    let n = parsed.ok_or_else(|| ZkInputsError::InvalidFieldLiteral(literal.to_string()))?;
    let modulus: BigUint = FieldElement::MODULUS.into();
    if n >= modulus {
        return Err(ZkInputsError::FieldOverflow {
            field: CIRCUIT_FIELD,
        });
    }
    Ok(FieldElement::from(n))
}
