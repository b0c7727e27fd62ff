// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Core CRISP ballot encryption and ZK inputs generation library.
//!
//! A voter encrypts a vote from `0..=max_vote` under the election public key
//! with exponential ElGamal on Baby Jubjub, then hands the circuit executor the
//! public key, the ciphertext (and the ciphertext it replaces, when re-voting)
//! as public inputs, and the vote and encryption randomness as private inputs.
//!
//! [`ZKInputsGenerator`] is the entry point. It exposes typed operations through
//! [`InputsGenerator`] and a byte-level surface for the WASM bindings.

mod circuit;
mod config;
mod encoding;
mod encryption;
mod errors;
pub mod group;
mod keys;
mod schema;
mod witness;

pub use circuit::{CircuitExecutor, ReferenceCircuit};
pub use config::{GeneratorConfig, ENV_PREFIX, MAX_DECODE_BOUND};
pub use encoding::{
    field_from_str, field_to_decimal, field_to_point, field_to_scalar, point_to_field,
    scalar_to_field, FieldElement,
};
pub use encryption::{combine, decrypt, encrypt, Ciphertext, Randomness, Vote, VoteDomain};
pub use errors::{ErrorClass, Result, ZkInputsError};
pub use group::{Point, Scalar};
pub use keys::{generate_keypair, public_key_of, Keypair, PublicKey, SecretKey};
pub use schema::{names, CircuitSchema, InputSpec, Visibility};
pub use witness::{GeneratedInputs, WitnessEntry, WitnessInputs};

use rand::{thread_rng, CryptoRng, RngCore};
use tracing::debug;

/// The two operations a voting client needs from an inputs generator.
pub trait InputsGenerator {
    /// Generates an election keypair and returns its public half.
    fn generate_public_key<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<PublicKey>;

    /// Encrypts `vote` and assembles the circuit inputs proving the encryption
    /// is well formed. `prior` is the voter's previous ciphertext when re-voting.
    fn generate_inputs<R: RngCore + CryptoRng>(
        &self,
        vote: i64,
        public_key: &PublicKey,
        prior: Option<&Ciphertext>,
        rng: &mut R,
    ) -> Result<GeneratedInputs>;
}

#[derive(Clone, Debug)]
pub struct ZKInputsGenerator {
    config: GeneratorConfig,
    vote_schema: CircuitSchema,
    vote_update_schema: CircuitSchema,
}

impl ZKInputsGenerator {
    /// Creates a new generator after validating `config`.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Creates a generator for a yes/no ballot.
    pub fn with_defaults() -> Self {
        // The default configuration always passes `validate`.
        Self::from_validated(GeneratorConfig::default())
    }

    fn from_validated(config: GeneratorConfig) -> Self {
        Self {
            config,
            vote_schema: CircuitSchema::vote(),
            vote_update_schema: CircuitSchema::vote_update(),
        }
    }

    /// Checks generated inputs against `schema` instead of the built-in one.
    ///
    /// A schema declaring the prior ciphertext inputs replaces the re-vote
    /// schema; any other replaces the fresh ballot schema.
    pub fn with_circuit_schema(mut self, schema: CircuitSchema) -> Self {
        if schema.expects_prior_ciphertext() {
            self.vote_update_schema = schema;
        } else {
            self.vote_schema = schema;
        }
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn vote_domain(&self) -> VoteDomain {
        self.config.vote_domain()
    }

    /// Schema that [`InputsGenerator::generate_inputs`] checks against.
    pub fn schema(&self, update: bool) -> &CircuitSchema {
        if update {
            &self.vote_update_schema
        } else {
            &self.vote_schema
        }
    }

    pub fn generate_keypair<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Keypair> {
        generate_keypair(rng)
    }

    /// Encrypts `vote` after checking it against the configured domain.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        vote: i64,
        public_key: &PublicKey,
        rng: &mut R,
    ) -> Result<(Ciphertext, Randomness)> {
        let vote = self.vote_domain().check(vote)?;
        encrypt(&vote, public_key, rng)
    }

    /// Decrypts a single ballot or a combined tally up to `decode_bound`.
    pub fn decrypt(&self, ciphertext: &Ciphertext, secret: &SecretKey) -> Result<u64> {
        decrypt(ciphertext, secret, self.config.decode_bound)
    }

    /// Generates a new keypair and returns the compressed public key.
    ///
    /// The secret key is discarded; this is for clients and tests that only
    /// need a key to encrypt to.
    pub fn generate_public_key_bytes(&self) -> Result<Vec<u8>> {
        let public_key = self.generate_public_key(&mut thread_rng())?;
        Ok(public_key.to_bytes())
    }

    /// Encrypts a vote under a serialized public key.
    ///
    /// # Returns
    /// Ciphertext bytes
    pub fn encrypt_vote(&self, public_key: &[u8], vote: i64) -> Result<Vec<u8>> {
        let public_key = PublicKey::from_bytes(public_key)?;
        let (ciphertext, _) = self.encrypt(vote, &public_key, &mut thread_rng())?;
        Ok(ciphertext.to_bytes())
    }

    /// Generates CRISP ZK inputs from serialized keys and ciphertexts.
    ///
    /// # Arguments
    /// * `prev_ciphertext` - Ciphertext being replaced, if this is a re-vote
    /// * `public_key` - Public key bytes for encryption
    /// * `vote` - Vote value
    ///
    /// # Returns
    /// JSON string of the circuit inputs
    pub fn generate_inputs_json(
        &self,
        prev_ciphertext: Option<&[u8]>,
        public_key: &[u8],
        vote: i64,
    ) -> Result<String> {
        let public_key = PublicKey::from_bytes(public_key)?;
        let prior = prev_ciphertext.map(Ciphertext::from_bytes).transpose()?;
        let generated =
            self.generate_inputs(vote, &public_key, prior.as_ref(), &mut thread_rng())?;
        generated.inputs().to_json()
    }
}

impl Default for ZKInputsGenerator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl InputsGenerator for ZKInputsGenerator {
    fn generate_public_key<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<PublicKey> {
        let keypair = generate_keypair(rng)?;
        Ok(public_key_of(&keypair))
    }

    fn generate_inputs<R: RngCore + CryptoRng>(
        &self,
        vote: i64,
        public_key: &PublicKey,
        prior: Option<&Ciphertext>,
        rng: &mut R,
    ) -> Result<GeneratedInputs> {
        let vote = self.vote_domain().check(vote)?;
        if let Some(prior) = prior {
            prior.validate()?;
        }

        let (ciphertext, randomness) = encrypt(&vote, public_key, rng)?;
        let schema = self.schema(prior.is_some());
        let inputs =
            witness::build_inputs(public_key, &ciphertext, prior, &vote, &randomness, schema)?;

        debug!(
            "Generated {} circuit inputs ({} public, update: {})",
            inputs.len(),
            inputs.public_inputs().count(),
            prior.is_some()
        );
        Ok(GeneratedInputs::new(inputs, ciphertext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::testing::FailingRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use tracing_test::traced_test;

    #[test]
    fn test_inputs_generation_with_defaults() {
        let generator = ZKInputsGenerator::with_defaults();
        let public_key = generator
            .generate_public_key_bytes()
            .expect("failed to generate public key");
        let prev_ciphertext = generator
            .encrypt_vote(&public_key, 0)
            .expect("failed to generate previous ciphertext");
        let result = generator.generate_inputs_json(Some(prev_ciphertext.as_slice()), &public_key, 1);

        assert!(result.is_ok());
        let json_output = result.unwrap();
        assert!(json_output.contains("pk_x"));
        assert!(json_output.contains("prev_ct_c2_y"));
        assert!(json_output.contains("randomness"));
    }

    #[test]
    fn test_inputs_generation_without_previous_ciphertext() {
        let generator = ZKInputsGenerator::with_defaults();
        let public_key = generator.generate_public_key_bytes().unwrap();
        let json_output = generator.generate_inputs_json(None, &public_key, 0).unwrap();

        let parsed = WitnessInputs::from_json(&json_output, &CircuitSchema::vote()).unwrap();
        assert_eq!(parsed.get(names::VOTE), Some(&FieldElement::from(0u64)));
    }

    #[test]
    fn test_inputs_generation_with_custom_config() {
        let generator = ZKInputsGenerator::new(GeneratorConfig {
            max_vote: 10,
            decode_bound: 100,
        })
        .unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let keypair = generator.generate_keypair(&mut rng).unwrap();

        let generated = generator
            .generate_inputs(7, keypair.public_key(), None, &mut rng)
            .unwrap();
        assert_eq!(
            generator
                .decrypt(generated.ciphertext(), keypair.secret_key())
                .unwrap(),
            7
        );
        assert!(ReferenceCircuit::vote(generator.vote_domain())
            .execute(generated.inputs())
            .is_ok());
    }

    #[test]
    fn test_with_defaults_matches_validated_defaults() {
        assert!(GeneratorConfig::default().validate().is_ok());
        let validated = ZKInputsGenerator::new(GeneratorConfig::default()).unwrap();
        let defaults = ZKInputsGenerator::with_defaults();
        assert_eq!(defaults.config(), validated.config());
        assert_eq!(defaults.schema(false), validated.schema(false));
        assert_eq!(defaults.schema(true), validated.schema(true));
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let generator = ZKInputsGenerator::with_defaults();
        let err = generator.generate_public_key(&mut FailingRng).unwrap_err();
        assert!(matches!(err, ZkInputsError::InsufficientEntropy(_)));

        let mut rng = ChaCha20Rng::seed_from_u64(34);
        let keypair = generator.generate_keypair(&mut rng).unwrap();
        let err = generator
            .generate_inputs(1, keypair.public_key(), None, &mut FailingRng)
            .unwrap_err();
        assert!(matches!(err, ZkInputsError::InsufficientEntropy(_)));
        assert_eq!(err.class(), ErrorClass::Retryable);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ZKInputsGenerator::new(GeneratorConfig {
            max_vote: 10,
            decode_bound: 5,
        });
        assert!(matches!(result, Err(ZkInputsError::InvalidConfig(_))));
    }

    #[test]
    fn test_encrypt_vote_rejects_bad_input() {
        let generator = ZKInputsGenerator::with_defaults();
        let public_key = generator.generate_public_key_bytes().unwrap();

        let err = generator.encrypt_vote(&public_key, 2).unwrap_err();
        assert_eq!(err.class(), ErrorClass::User);

        let err = generator.encrypt_vote(&[0u8; 5], 1).unwrap_err();
        assert!(matches!(err, ZkInputsError::InvalidPoint(_)));

        let err = generator
            .generate_inputs_json(Some(&[0xFFu8; 64][..]), &public_key, 1)
            .unwrap_err();
        assert!(matches!(err, ZkInputsError::InvalidPoint(_)));
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let generator = ZKInputsGenerator::with_defaults();
        let run = |seed: u64| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let pk = generator.generate_public_key(&mut rng).unwrap();
            generator
                .generate_inputs(1, &pk, None, &mut rng)
                .unwrap()
                .inputs()
                .to_json()
                .unwrap()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }

    #[test]
    fn test_custom_schema_from_abi() {
        let params: Vec<String> = CircuitSchema::vote()
            .inputs()
            .iter()
            .map(|i| {
                format!(
                    r#"{{"name":"{}","type":{{"kind":"field"}},"visibility":"{}"}}"#,
                    i.name,
                    match i.visibility {
                        Visibility::Public => "public",
                        Visibility::Private => "private",
                    }
                )
            })
            .collect();
        let artifact = format!(r#"{{"abi":{{"parameters":[{}]}}}}"#, params.join(","));
        let schema = CircuitSchema::from_abi_json(&artifact).unwrap();

        let generator = ZKInputsGenerator::with_defaults().with_circuit_schema(schema.clone());
        assert_eq!(generator.schema(false), &schema);

        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let pk = generator.generate_public_key(&mut rng).unwrap();
        assert!(generator.generate_inputs(1, &pk, None, &mut rng).is_ok());

        // A circuit expecting different inputs is caught before execution.
        let other = CircuitSchema::new(vec![InputSpec::public("x"), InputSpec::private("y")])
            .unwrap();
        let generator = ZKInputsGenerator::with_defaults().with_circuit_schema(other);
        assert!(matches!(
            generator.generate_inputs(1, &pk, None, &mut rng),
            Err(ZkInputsError::SchemaMismatch(_))
        ));
    }

    #[traced_test]
    #[test]
    fn test_logs_never_contain_secrets() {
        let generator = ZKInputsGenerator::with_defaults();
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let pk = generator.generate_public_key(&mut rng).unwrap();
        let generated = generator.generate_inputs(1, &pk, None, &mut rng).unwrap();
        let randomness = field_to_decimal(generated.inputs().get(names::RANDOMNESS).unwrap());

        assert!(logs_contain("Generated 8 circuit inputs"));
        assert!(!logs_contain(&randomness));

        assert!(generator.generate_inputs(-1, &pk, None, &mut rng).is_err());
        assert!(logs_contain("Rejected vote outside of domain"));
    }
}
