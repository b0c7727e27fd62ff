// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::encoding::{self, FieldElement};
use crate::encryption::VoteDomain;
use crate::errors::{Result, ZkInputsError};
use crate::group::{self, Point};
use crate::keys::PublicKey;
use crate::schema::{names, CircuitSchema};
use crate::witness::WitnessInputs;
use ark_ff::PrimeField;
use num_bigint::BigUint;
use tracing::{debug, warn};

/// Something that can run the vote circuit on a set of inputs.
///
/// Returns `Ok(())` when every constraint is satisfied.
pub trait CircuitExecutor {
    fn execute(&self, inputs: &WitnessInputs) -> Result<()>;
}

/// Native evaluation of the ballot encryption relation:
///
/// - the vote lies in the configured domain,
/// - `c1 = r·G` and `c2 = v·G + r·PK`,
/// - the public key is a valid curve point other than the identity,
/// - any prior ciphertext consists of valid curve points.
#[derive(Clone, Debug)]
pub struct ReferenceCircuit {
    schema: CircuitSchema,
    domain: VoteDomain,
}

impl ReferenceCircuit {
    pub fn new(schema: CircuitSchema, domain: VoteDomain) -> Self {
        Self { schema, domain }
    }

    pub fn vote(domain: VoteDomain) -> Self {
        Self::new(CircuitSchema::vote(), domain)
    }

    pub fn vote_update(domain: VoteDomain) -> Self {
        Self::new(CircuitSchema::vote_update(), domain)
    }

    pub fn schema(&self) -> &CircuitSchema {
        &self.schema
    }
}

fn input<'a>(inputs: &'a WitnessInputs, name: &str) -> Result<&'a FieldElement> {
    inputs
        .get(name)
        .ok_or_else(|| ZkInputsError::SchemaMismatch(format!("missing input '{}'", name)))
}

fn point_input(inputs: &WitnessInputs, x: &str, y: &str) -> Result<Point> {
    encoding::field_to_point(input(inputs, x)?, input(inputs, y)?)
}

fn unsatisfied(constraint: &'static str) -> ZkInputsError {
    warn!("Reference circuit constraint failed: {}", constraint);
    ZkInputsError::UnsatisfiedConstraint(constraint)
}

impl CircuitExecutor for ReferenceCircuit {
    fn execute(&self, inputs: &WitnessInputs) -> Result<()> {
        self.schema.check(
            inputs
                .entries()
                .iter()
                .map(|e| (e.name(), e.visibility())),
        )?;

        let pk = PublicKey::new(point_input(inputs, names::PK_X, names::PK_Y)?)?;
        let c1 = point_input(inputs, names::CT_C1_X, names::CT_C1_Y)?;
        let c2 = point_input(inputs, names::CT_C2_X, names::CT_C2_Y)?;
        if self.schema.expects_prior_ciphertext() {
            point_input(inputs, names::PREV_CT_C1_X, names::PREV_CT_C1_Y)?;
            point_input(inputs, names::PREV_CT_C2_X, names::PREV_CT_C2_Y)?;
        }

        let vote: BigUint = input(inputs, names::VOTE)?.into_bigint().into();
        if vote > BigUint::from(self.domain.max()) {
            return Err(unsatisfied("vote in domain"));
        }
        let vote = encoding::field_to_scalar(input(inputs, names::VOTE)?)?;
        let r = encoding::field_to_scalar(input(inputs, names::RANDOMNESS)?)?;

        if c1 != group::mul_generator(&r) {
            return Err(unsatisfied("c1 = r·G"));
        }
        let expected_c2 = group::add(
            &group::mul_generator(&vote),
            &group::scalar_mul(pk.point(), &r),
        );
        if c2 != expected_c2 {
            return Err(unsatisfied("c2 = v·G + r·PK"));
        }

        debug!("Reference circuit satisfied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::encrypt;
    use crate::keys::generate_keypair;
    use crate::schema::InputSpec;
    use crate::witness::build_inputs;
    use ark_ff::One;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn ballot(seed: u64, value: i64, domain: VoteDomain) -> WitnessInputs {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let keypair = generate_keypair(&mut rng).unwrap();
        let vote = domain.check(value).unwrap();
        let (ct, r) = encrypt(&vote, keypair.public_key(), &mut rng).unwrap();
        build_inputs(
            keypair.public_key(),
            &ct,
            None,
            &vote,
            &r,
            &CircuitSchema::vote(),
        )
        .unwrap()
    }

    /// Rebuilds `inputs` with one value replaced.
    fn tamper(inputs: &WitnessInputs, name: &str, value: FieldElement) -> WitnessInputs {
        let mut object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&inputs.to_json().unwrap()).unwrap();
        object.insert(
            name.to_string(),
            serde_json::Value::String(encoding::field_to_decimal(&value)),
        );
        let json = serde_json::to_string(&object).unwrap();
        WitnessInputs::from_json(&json, &CircuitSchema::vote()).unwrap()
    }

    #[test]
    fn test_honest_ballot_satisfies() {
        let circuit = ReferenceCircuit::vote(VoteDomain::binary());
        for v in [0, 1] {
            assert!(circuit.execute(&ballot(21, v, VoteDomain::binary())).is_ok());
        }
    }

    #[test]
    fn test_vote_outside_circuit_domain() {
        // Encrypted under a wider domain than the circuit accepts.
        let inputs = ballot(22, 3, VoteDomain::new(3));
        let circuit = ReferenceCircuit::vote(VoteDomain::binary());
        assert!(matches!(
            circuit.execute(&inputs),
            Err(ZkInputsError::UnsatisfiedConstraint("vote in domain"))
        ));
    }

    #[test]
    fn test_flipped_vote_fails() {
        let inputs = ballot(23, 1, VoteDomain::binary());
        let flipped = tamper(&inputs, names::VOTE, FieldElement::from(0u64));
        let circuit = ReferenceCircuit::vote(VoteDomain::binary());
        assert!(matches!(
            circuit.execute(&flipped),
            Err(ZkInputsError::UnsatisfiedConstraint(_))
        ));
    }

    #[test]
    fn test_wrong_randomness_fails() {
        let inputs = ballot(24, 0, VoteDomain::binary());
        let r = *inputs.get(names::RANDOMNESS).unwrap();
        let shifted = tamper(&inputs, names::RANDOMNESS, r + FieldElement::one());
        let circuit = ReferenceCircuit::vote(VoteDomain::binary());
        assert!(matches!(
            circuit.execute(&shifted),
            Err(ZkInputsError::UnsatisfiedConstraint("c1 = r·G"))
        ));
    }

    #[test]
    fn test_off_curve_public_key_fails() {
        let inputs = ballot(25, 1, VoteDomain::binary());
        let y = *inputs.get(names::PK_Y).unwrap();
        let broken = tamper(&inputs, names::PK_Y, y + FieldElement::one());
        let circuit = ReferenceCircuit::vote(VoteDomain::binary());
        assert!(matches!(
            circuit.execute(&broken),
            Err(ZkInputsError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_identity_public_key_fails() {
        // With PK = O the ciphertext is c2 = v·G, i.e. the vote in the clear.
        let mut rng = ChaCha20Rng::seed_from_u64(27);
        let r = group::random_scalar(&mut rng).unwrap();
        let (c1_x, c1_y) = encoding::point_to_field(&group::mul_generator(&r)).unwrap();
        let (c2_x, c2_y) = encoding::point_to_field(&group::generator()).unwrap();
        let values = [
            (names::PK_X, FieldElement::from(0u64)),
            (names::PK_Y, FieldElement::from(1u64)),
            (names::CT_C1_X, c1_x),
            (names::CT_C1_Y, c1_y),
            (names::CT_C2_X, c2_x),
            (names::CT_C2_Y, c2_y),
            (names::VOTE, FieldElement::from(1u64)),
            (names::RANDOMNESS, encoding::scalar_to_field(&r).unwrap()),
        ];
        let object: serde_json::Map<String, serde_json::Value> = values
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    serde_json::Value::String(encoding::field_to_decimal(value)),
                )
            })
            .collect();
        let json = serde_json::to_string(&object).unwrap();
        let inputs = WitnessInputs::from_json(&json, &CircuitSchema::vote()).unwrap();

        let circuit = ReferenceCircuit::vote(VoteDomain::binary());
        assert!(matches!(
            circuit.execute(&inputs),
            Err(ZkInputsError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_schema_is_enforced() {
        let inputs = ballot(26, 1, VoteDomain::binary());
        let circuit = ReferenceCircuit::vote_update(VoteDomain::binary());
        assert!(matches!(
            circuit.execute(&inputs),
            Err(ZkInputsError::SchemaMismatch(_))
        ));

        let other = CircuitSchema::new(vec![InputSpec::public("x")]).unwrap();
        let circuit = ReferenceCircuit::new(other, VoteDomain::binary());
        assert!(circuit.execute(&inputs).is_err());
    }
}
