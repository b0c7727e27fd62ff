// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Election key management.
//!
//! The secret scalar is only reachable through a borrowed [`SecretKey`] and is
//! wiped from memory when the [`Keypair`] is dropped.

use crate::errors::{Result, ZkInputsError};
use crate::group::{self, Point, Scalar};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use std::fmt;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Election secret scalar.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Scalar);

impl SecretKey {
    pub(crate) fn scalar(&self) -> &Scalar {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Election public key. Always on the curve, in the prime order subgroup and
/// never the identity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(Point);

impl PublicKey {
    pub fn new(point: Point) -> Result<Self> {
        group::validate_point(&point)?;
        if point == group::identity() {
            return Err(ZkInputsError::InvalidPoint(
                "public key is the identity".into(),
            ));
        }
        Ok(Self(point))
    }

    pub fn point(&self) -> &Point {
        &self.0
    }

    /// Compressed canonical encoding (32 bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.0.compressed_size());
        // Writing into a Vec cannot fail.
        let _ = self.0.serialize_compressed(&mut bytes);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let point = Point::deserialize_compressed(bytes)
            .map_err(|e| ZkInputsError::InvalidPoint(format!("public key: {}", e)))?;
        Self::new(point)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.to_bytes()))
    }
}

/// A secret scalar together with its public point `secret·G`.
#[derive(Debug)]
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }
}

/// Draws a fresh election keypair from `rng`.
pub fn generate_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Keypair> {
    let secret = SecretKey(group::random_scalar(rng)?);
    let public = PublicKey::new(group::mul_generator(secret.scalar()))?;
    debug!("Generated election keypair");
    Ok(Keypair { secret, public })
}

/// Projection of the public half of `keypair`.
pub fn public_key_of(keypair: &Keypair) -> PublicKey {
    keypair.public
}
