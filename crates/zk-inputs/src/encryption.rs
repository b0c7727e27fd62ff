// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Exponential ElGamal over Baby Jubjub.
//!
//! A vote `v` is encoded as `v·G`, so adding two ciphertexts point-wise yields a
//! ciphertext of the sum of their votes. Decryption recovers `v·G` and searches
//! a bounded range for `v`, which is why the plaintext space must stay small.

use crate::errors::{Result, ZkInputsError};
use crate::group::{self, Point, ProjectivePoint, Scalar};
use crate::keys::{PublicKey, SecretKey};
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use std::fmt;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The set of votes a ballot may carry: `0..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteDomain {
    max: u64,
}

impl VoteDomain {
    pub fn new(max: u64) -> Self {
        Self { max }
    }

    /// The `{0, 1}` domain of a yes/no ballot.
    pub fn binary() -> Self {
        Self::new(1)
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Accepts `value` if it lies in the domain.
    pub fn check(&self, value: i64) -> Result<Vote> {
        match u64::try_from(value) {
            Ok(v) if v <= self.max => Ok(Vote(v)),
            _ => {
                warn!("Rejected vote outside of domain 0..={}", self.max);
                Err(ZkInputsError::VoteOutOfRange {
                    vote: value,
                    max: self.max,
                })
            }
        }
    }
}

impl Default for VoteDomain {
    fn default() -> Self {
        Self::binary()
    }
}

/// A vote that has been checked against a [`VoteDomain`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Vote(u64);

impl Vote {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn to_scalar(&self) -> Scalar {
        Scalar::from(self.0)
    }

    /// `v·G`.
    pub fn encode(&self) -> Point {
        group::mul_generator(&self.to_scalar())
    }
}

impl fmt::Debug for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Vote(<hidden>)")
    }
}

/// The encryption scalar `r` of a single ciphertext.
///
/// Not `Clone`: each value belongs to exactly one ciphertext and is wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Randomness(Scalar);

impl Randomness {
    pub fn scalar(&self) -> &Scalar {
        &self.0
    }
}

impl fmt::Debug for Randomness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Randomness(<redacted>)")
    }
}

/// ElGamal ciphertext `(c1, c2) = (r·G, v·G + r·PK)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ciphertext {
    c1: Point,
    c2: Point,
}

impl Ciphertext {
    /// Builds a ciphertext from two points, validating both.
    pub fn new(c1: Point, c2: Point) -> Result<Self> {
        group::validate_point(&c1)?;
        group::validate_point(&c2)?;
        Ok(Self { c1, c2 })
    }

    pub fn c1(&self) -> &Point {
        &self.c1
    }

    pub fn c2(&self) -> &Point {
        &self.c2
    }

    pub fn validate(&self) -> Result<()> {
        group::validate_point(&self.c1)?;
        group::validate_point(&self.c2)
    }

    /// Compressed canonical encoding of `c1 || c2` (64 bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.c1.compressed_size() * 2);
        // Writing into a Vec cannot fail.
        let _ = self.c1.serialize_compressed(&mut bytes);
        let _ = self.c2.serialize_compressed(&mut bytes);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let c1 = Point::deserialize_compressed(&mut reader)
            .map_err(|e| ZkInputsError::InvalidPoint(format!("ciphertext c1: {}", e)))?;
        let c2 = Point::deserialize_compressed(&mut reader)
            .map_err(|e| ZkInputsError::InvalidPoint(format!("ciphertext c2: {}", e)))?;
        if !reader.is_empty() {
            return Err(ZkInputsError::InvalidPoint(format!(
                "ciphertext has {} trailing bytes",
                reader.len()
            )));
        }
        Self::new(c1, c2)
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({})", hex::encode(self.to_bytes()))
    }
}

/// Encrypts `vote` under `public_key` with a fresh scalar drawn from `rng`.
///
/// Returns the randomness next to the ciphertext because the witness needs it.
/// Every call draws a new scalar; there is no entry point that accepts one.
pub fn encrypt<R: RngCore + CryptoRng>(
    vote: &Vote,
    public_key: &PublicKey,
    rng: &mut R,
) -> Result<(Ciphertext, Randomness)> {
    let r = Randomness(group::random_scalar(rng)?);
    let c1 = group::mul_generator(r.scalar());
    let shared = public_key.point().into_group() * r.scalar();
    let c2 = (shared + vote.encode()).into_affine();
    debug!("Encrypted vote under election key");
    Ok((Ciphertext { c1, c2 }, r))
}

/// Point-wise sum of two ciphertexts under the same key.
pub fn combine(a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
    a.validate()?;
    b.validate()?;
    Ok(Ciphertext {
        c1: group::add(&a.c1, &b.c1),
        c2: group::add(&a.c2, &b.c2),
    })
}

/// Recovers the plaintext of `ciphertext`, searching `0..=decode_bound`.
pub fn decrypt(ciphertext: &Ciphertext, secret: &SecretKey, decode_bound: u64) -> Result<u64> {
    ciphertext.validate()?;
    let encoded = group::sub(&ciphertext.c2, &group::scalar_mul(&ciphertext.c1, secret.scalar()))
        .into_group();
    let g = group::generator();
    let mut candidate = ProjectivePoint::default();
    for value in 0..=decode_bound {
        if candidate == encoded {
            return Ok(value);
        }
        candidate += g;
    }
    Err(ZkInputsError::DecodeMismatch {
        bound: decode_bound,
    })
}
