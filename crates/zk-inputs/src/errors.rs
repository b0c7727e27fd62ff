// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for ballot encryption and witness assembly.

use thiserror::Error;

/// Who should act on an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller supplied a bad ballot and may ask the voter again.
    User,
    /// Transient failure of the randomness source; retry after a backoff.
    Retryable,
    /// Configuration or integration bug. Operator facing.
    Fatal,
}

#[derive(Error, Debug)]
pub enum ZkInputsError {
    #[error("Vote {vote} is outside the allowed domain 0..={max}")]
    VoteOutOfRange { vote: i64, max: u64 },

    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    #[error("Randomness source could not supply enough entropy: {0}")]
    InsufficientEntropy(#[from] rand::Error),

    #[error("Value does not fit in the {field} modulus")]
    FieldOverflow { field: &'static str },

    #[error("Not a field element literal: '{0}'")]
    InvalidFieldLiteral(String),

    #[error("Decrypted point does not encode any value in 0..={bound}")]
    DecodeMismatch { bound: u64 },

    #[error("Failed to encode witness input '{name}': {reason}")]
    WitnessEncodingError { name: String, reason: String },

    #[error("Witness does not match circuit schema: {0}")]
    SchemaMismatch(String),

    #[error("Circuit constraint not satisfied: {0}")]
    UnsatisfiedConstraint(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl ZkInputsError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ZkInputsError::VoteOutOfRange { .. } => ErrorClass::User,
            ZkInputsError::InsufficientEntropy(_) => ErrorClass::Retryable,
            _ => ErrorClass::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.class() != ErrorClass::Fatal
    }
}

impl From<figment::Error> for ZkInputsError {
    fn from(e: figment::Error) -> Self {
        ZkInputsError::InvalidConfig(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ZkInputsError>;
