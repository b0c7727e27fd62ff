// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Witness inputs for the vote circuit.
//!
//! [`WitnessInputs`] is an ordered, immutable list of named circuit field
//! elements. It serializes to the flat `name -> decimal string` JSON object that
//! `noir_js` executes, and to `Prover.toml` for `nargo`.

use crate::encoding::{self, FieldElement};
use crate::encryption::{Ciphertext, Randomness, Vote};
use crate::errors::{Result, ZkInputsError};
use crate::group::{Point, Scalar};
use crate::keys::PublicKey;
use crate::schema::{names, CircuitSchema, Visibility};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use zeroize::Zeroize;

#[derive(Clone, PartialEq, Eq)]
pub struct WitnessEntry {
    name: String,
    visibility: Visibility,
    value: FieldElement,
}

impl WitnessEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn value(&self) -> &FieldElement {
        &self.value
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

impl fmt::Debug for WitnessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.visibility {
            Visibility::Public => write!(
                f,
                "{}: {}",
                self.name,
                encoding::field_to_decimal(&self.value)
            ),
            Visibility::Private => write!(f, "{}: <private>", self.name),
        }
    }
}

/// Circuit inputs in schema order. Private values are wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct WitnessInputs {
    entries: Vec<WitnessEntry>,
}

impl WitnessInputs {
    pub fn entries(&self) -> &[WitnessEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldElement> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    pub fn public_inputs(&self) -> impl Iterator<Item = &WitnessEntry> {
        self.entries.iter().filter(|e| e.is_public())
    }

    pub fn private_inputs(&self) -> impl Iterator<Item = &WitnessEntry> {
        self.entries.iter().filter(|e| !e.is_public())
    }

    /// Public values in circuit order, as a verifier receives them.
    pub fn public_values(&self) -> Vec<FieldElement> {
        self.public_inputs().map(|e| e.value).collect()
    }

    /// Flat JSON object of decimal strings, keys in circuit order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// `Prover.toml` contents for `nargo execute`.
    pub fn to_prover_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Parses inputs produced by [`WitnessInputs::to_json`] back against `schema`.
    ///
    /// Values may be decimal or `0x` hex strings, or JSON integers.
    pub fn from_json(json: &str, schema: &CircuitSchema) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(schema.len());
        for spec in schema.inputs() {
            let raw = object.get(&spec.name).ok_or_else(|| {
                ZkInputsError::SchemaMismatch(format!("missing input '{}'", spec.name))
            })?;
            let literal = match raw {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) if n.is_u64() => n.to_string(),
                other => {
                    return Err(ZkInputsError::WitnessEncodingError {
                        name: spec.name.clone(),
                        reason: format!("expected a field element string, found {}", other),
                    })
                }
            };
            let value = encoding::field_from_str(&literal)
                .map_err(|e| encoding_error(&spec.name, e))?;
            entries.push(WitnessEntry {
                name: spec.name.clone(),
                visibility: spec.visibility,
                value,
            });
        }

        if let Some(extra) = object.keys().find(|k| !schema.contains(k)) {
            return Err(ZkInputsError::SchemaMismatch(format!(
                "unexpected extra input '{}'",
                extra
            )));
        }

        Ok(Self { entries })
    }
}

impl Serialize for WitnessInputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &encoding::field_to_decimal(&entry.value))?;
        }
        map.end()
    }
}

impl fmt::Debug for WitnessInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl Drop for WitnessInputs {
    fn drop(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| !e.is_public()) {
            entry.value.zeroize();
        }
    }
}

/// Output of a witness build: the circuit inputs plus the ciphertext the voter
/// submits on chain.
#[derive(Debug)]
pub struct GeneratedInputs {
    inputs: WitnessInputs,
    ciphertext: Ciphertext,
}

impl GeneratedInputs {
    pub(crate) fn new(inputs: WitnessInputs, ciphertext: Ciphertext) -> Self {
        Self { inputs, ciphertext }
    }

    pub fn inputs(&self) -> &WitnessInputs {
        &self.inputs
    }

    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }

    pub fn into_parts(self) -> (WitnessInputs, Ciphertext) {
        (self.inputs, self.ciphertext)
    }
}

fn encoding_error(name: &str, err: ZkInputsError) -> ZkInputsError {
    ZkInputsError::WitnessEncodingError {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

#[derive(Default)]
struct WitnessBuilder {
    entries: Vec<WitnessEntry>,
}

impl WitnessBuilder {
    fn push(&mut self, name: &str, visibility: Visibility, value: FieldElement) {
        self.entries.push(WitnessEntry {
            name: name.to_string(),
            visibility,
            value,
        });
    }

    fn public_point(&mut self, x_name: &str, y_name: &str, point: &Point) -> Result<()> {
        let (x, y) = encoding::point_to_field(point).map_err(|e| encoding_error(x_name, e))?;
        self.push(x_name, Visibility::Public, x);
        self.push(y_name, Visibility::Public, y);
        Ok(())
    }

    fn public_ciphertext(&mut self, inputs: [&str; 4], ciphertext: &Ciphertext) -> Result<()> {
        self.public_point(inputs[0], inputs[1], ciphertext.c1())?;
        self.public_point(inputs[2], inputs[3], ciphertext.c2())
    }

    fn private_scalar(&mut self, name: &str, scalar: &Scalar) -> Result<()> {
        let value = encoding::scalar_to_field(scalar).map_err(|e| encoding_error(name, e))?;
        self.push(name, Visibility::Private, value);
        Ok(())
    }

    fn finish(self, schema: &CircuitSchema) -> Result<WitnessInputs> {
        schema.check(self.entries.iter().map(|e| (e.name.as_str(), e.visibility)))?;
        Ok(WitnessInputs {
            entries: self.entries,
        })
    }
}

/// Assembles and schema-checks the inputs of one ballot encryption.
pub(crate) fn build_inputs(
    public_key: &PublicKey,
    ciphertext: &Ciphertext,
    prior: Option<&Ciphertext>,
    vote: &Vote,
    randomness: &Randomness,
    schema: &CircuitSchema,
) -> Result<WitnessInputs> {
    let mut builder = WitnessBuilder::default();

    builder.public_point(names::PK_X, names::PK_Y, public_key.point())?;
    builder.public_ciphertext(
        [
            names::CT_C1_X,
            names::CT_C1_Y,
            names::CT_C2_X,
            names::CT_C2_Y,
        ],
        ciphertext,
    )?;
    if let Some(prior) = prior {
        builder.public_ciphertext(
            [
                names::PREV_CT_C1_X,
                names::PREV_CT_C1_Y,
                names::PREV_CT_C2_X,
                names::PREV_CT_C2_Y,
            ],
            prior,
        )?;
    }

    builder.private_scalar(names::VOTE, &vote.to_scalar())?;
    builder.private_scalar(names::RANDOMNESS, randomness.scalar())?;

    builder.finish(schema)
}
