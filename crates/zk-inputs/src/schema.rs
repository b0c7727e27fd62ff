// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Input interface of the vote circuit.
//!
//! A [`CircuitSchema`] is the ordered list of named inputs the circuit declares.
//! Witness assembly checks its output against the schema entry by entry, so a
//! drift between this crate and the compiled circuit is caught before the
//! executor runs.

use crate::errors::{Result, ZkInputsError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input names used by the built-in schemas.
pub mod names {
    pub const PK_X: &str = "pk_x";
    pub const PK_Y: &str = "pk_y";
    pub const CT_C1_X: &str = "ct_c1_x";
    pub const CT_C1_Y: &str = "ct_c1_y";
    pub const CT_C2_X: &str = "ct_c2_x";
    pub const CT_C2_Y: &str = "ct_c2_y";
    pub const PREV_CT_C1_X: &str = "prev_ct_c1_x";
    pub const PREV_CT_C1_Y: &str = "prev_ct_c1_y";
    pub const PREV_CT_C2_X: &str = "prev_ct_c2_x";
    pub const PREV_CT_C2_Y: &str = "prev_ct_c2_y";
    pub const VOTE: &str = "vote";
    pub const RANDOMNESS: &str = "randomness";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// One named field input of the circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub visibility: Visibility,
}

impl InputSpec {
    pub fn public(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visibility: Visibility::Public,
        }
    }

    pub fn private(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visibility: Visibility::Private,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitSchema {
    inputs: Vec<InputSpec>,
}

impl CircuitSchema {
    /// Builds a schema, rejecting duplicate input names.
    pub fn new(inputs: Vec<InputSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for input in &inputs {
            if !seen.insert(input.name.as_str()) {
                return Err(ZkInputsError::SchemaMismatch(format!(
                    "duplicate input '{}'",
                    input.name
                )));
            }
        }
        Ok(Self { inputs })
    }

    /// Fresh ballot: public key and new ciphertext public, vote and randomness private.
    pub fn vote() -> Self {
        let mut inputs = Self::ballot_public_inputs();
        inputs.extend(Self::ballot_private_inputs());
        Self { inputs }
    }

    /// Re-vote: as [`CircuitSchema::vote`] plus the prior ciphertext as public input.
    pub fn vote_update() -> Self {
        let mut inputs = Self::ballot_public_inputs();
        inputs.extend(
            [
                names::PREV_CT_C1_X,
                names::PREV_CT_C1_Y,
                names::PREV_CT_C2_X,
                names::PREV_CT_C2_Y,
            ]
            .into_iter()
            .map(InputSpec::public),
        );
        inputs.extend(Self::ballot_private_inputs());
        Self { inputs }
    }

    fn ballot_public_inputs() -> Vec<InputSpec> {
        [
            names::PK_X,
            names::PK_Y,
            names::CT_C1_X,
            names::CT_C1_Y,
            names::CT_C2_X,
            names::CT_C2_Y,
        ]
        .into_iter()
        .map(InputSpec::public)
        .collect()
    }

    fn ballot_private_inputs() -> Vec<InputSpec> {
        vec![
            InputSpec::private(names::VOTE),
            InputSpec::private(names::RANDOMNESS),
        ]
    }

    /// Reads the parameter list of a compiled Noir circuit artifact.
    ///
    /// Only scalar `field` parameters are supported; the ballot circuit takes no
    /// arrays or structs.
    pub fn from_abi_json(json: &str) -> Result<Self> {
        let artifact: CompiledArtifact = serde_json::from_str(json)?;
        let inputs = artifact
            .abi
            .parameters
            .into_iter()
            .map(|p| {
                if p.typ.kind != "field" {
                    return Err(ZkInputsError::SchemaMismatch(format!(
                        "input '{}' has unsupported type '{}'",
                        p.name, p.typ.kind
                    )));
                }
                Ok(InputSpec {
                    name: p.name,
                    visibility: p.visibility,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(inputs)
    }

    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inputs.iter().any(|i| i.name == name)
    }

    pub fn public_inputs(&self) -> impl Iterator<Item = &InputSpec> {
        self.inputs
            .iter()
            .filter(|i| i.visibility == Visibility::Public)
    }

    pub fn private_inputs(&self) -> impl Iterator<Item = &InputSpec> {
        self.inputs
            .iter()
            .filter(|i| i.visibility == Visibility::Private)
    }

    pub fn expects_prior_ciphertext(&self) -> bool {
        self.contains(names::PREV_CT_C1_X)
    }

    /// Compares an assembled input list against the schema, reporting the first
    /// difference in name, visibility, position or count.
    pub fn check<'a, I>(&self, assembled: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, Visibility)>,
    {
        let mut assembled = assembled.into_iter();
        for (position, expected) in self.inputs.iter().enumerate() {
            match assembled.next() {
                None => {
                    return Err(ZkInputsError::SchemaMismatch(format!(
                        "missing input '{}' at position {}",
                        expected.name, position
                    )))
                }
                Some((name, visibility)) => {
                    if name != expected.name {
                        return Err(ZkInputsError::SchemaMismatch(format!(
                            "expected '{}' at position {}, found '{}'",
                            expected.name, position, name
                        )));
                    }
                    if visibility != expected.visibility {
                        return Err(ZkInputsError::SchemaMismatch(format!(
                            "input '{}' must be {:?}, found {:?}",
                            name, expected.visibility, visibility
                        )));
                    }
                }
            }
        }
        if let Some((name, _)) = assembled.next() {
            return Err(ZkInputsError::SchemaMismatch(format!(
                "unexpected extra input '{}'",
                name
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CompiledArtifact {
    abi: Abi,
}

#[derive(Deserialize)]
struct Abi {
    parameters: Vec<AbiParameter>,
}

#[derive(Deserialize)]
struct AbiParameter {
    name: String,
    #[serde(rename = "type")]
    typ: AbiType,
    visibility: Visibility,
}

#[derive(Deserialize)]
struct AbiType {
    kind: String,
}
