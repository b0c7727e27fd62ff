// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! JavaScript library with WASM bindings for CRISP ballot inputs generation.

use crisp_zk_inputs::{GeneratorConfig, ZKInputsGenerator as CoreZKInputsGenerator};
use wasm_bindgen::prelude::*;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JavaScript-compatible CRISP ZK inputs generator.
#[wasm_bindgen]
pub struct ZKInputsGenerator {
    generator: CoreZKInputsGenerator,
}

#[wasm_bindgen]
impl ZKInputsGenerator {
    /// Create a generator accepting votes in `0..=maxVote`.
    ///
    /// # Arguments
    /// - `max_vote`: Largest vote accepted
    /// - `decode_bound`: Largest tally `decrypt` searches for
    #[wasm_bindgen(constructor)]
    pub fn new(max_vote: u64, decode_bound: u64) -> Result<ZKInputsGenerator, JsValue> {
        let generator = CoreZKInputsGenerator::new(GeneratorConfig {
            max_vote,
            decode_bound,
        })
        .map_err(to_js_error)?;
        Ok(ZKInputsGenerator { generator })
    }

    /// Create a generator for a yes/no ballot.
    #[wasm_bindgen(js_name = "withDefaults")]
    pub fn with_defaults() -> ZKInputsGenerator {
        ZKInputsGenerator {
            generator: CoreZKInputsGenerator::with_defaults(),
        }
    }

    /// Generate the circuit inputs for a ballot. Pass the previous ciphertext
    /// when re-voting, or `undefined` for a first vote.
    #[wasm_bindgen(js_name = "generateInputs")]
    pub fn generate_inputs(
        &self,
        prev_ciphertext: Option<Vec<u8>>,
        public_key: &[u8],
        vote: i32,
    ) -> Result<JsValue, JsValue> {
        let inputs_json = self
            .generator
            .generate_inputs_json(prev_ciphertext.as_deref(), public_key, i64::from(vote))
            .map_err(to_js_error)?;
        js_sys::JSON::parse(&inputs_json)
            .map_err(|_| JsValue::from_str("Failed to parse inputs JSON"))
    }

    /// Generate a public key from JavaScript.
    #[wasm_bindgen(js_name = "generatePublicKey")]
    pub fn generate_public_key(&self) -> Result<Vec<u8>, JsValue> {
        self.generator
            .generate_public_key_bytes()
            .map_err(to_js_error)
    }

    /// Encrypt a vote from JavaScript.
    #[wasm_bindgen(js_name = "encryptVote")]
    pub fn encrypt_vote(&self, public_key: &[u8], vote: i32) -> Result<Vec<u8>, JsValue> {
        self.generator
            .encrypt_vote(public_key, i64::from(vote))
            .map_err(to_js_error)
    }

    /// Get the version of the library.
    #[wasm_bindgen]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}
