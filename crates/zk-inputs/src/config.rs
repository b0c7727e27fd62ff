// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::encryption::VoteDomain;
use crate::errors::{Result, ZkInputsError};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `CRISP_ZK_MAX_VOTE=3`.
pub const ENV_PREFIX: &str = "CRISP_ZK_";

/// Upper limit for `decode_bound`. Decryption walks the bound linearly.
pub const MAX_DECODE_BOUND: u64 = 1 << 24;

/// Generator settings shared by every call of a [`crate::ZKInputsGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Largest vote accepted. The domain is `0..=max_vote`.
    pub max_vote: u64,
    /// Largest plaintext `decrypt` will search for. Must cover any tally the
    /// caller intends to decrypt.
    pub decode_bound: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_vote: 1,
            decode_bound: u16::MAX as u64,
        }
    }
}

impl GeneratorConfig {
    /// Layers defaults, an optional YAML document, then `CRISP_ZK_*` environment
    /// variables.
    pub fn load(yaml: Option<&str>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(GeneratorConfig::default()));
        if let Some(yaml) = yaml {
            figment = figment.merge(Yaml::string(yaml));
        }
        Self::extract(figment)
    }

    /// Same as [`GeneratorConfig::load`] but reads the YAML from `path`.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ZkInputsError::InvalidConfig(format!(
                "could not read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::load(Some(&contents))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: GeneratorConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).only(&["max_vote", "decode_bound"]))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.decode_bound < self.max_vote {
            return Err(ZkInputsError::InvalidConfig(format!(
                "decode_bound ({}) is smaller than max_vote ({})",
                self.decode_bound, self.max_vote
            )));
        }
        if self.decode_bound > MAX_DECODE_BOUND {
            return Err(ZkInputsError::InvalidConfig(format!(
                "decode_bound ({}) exceeds {}",
                self.decode_bound, MAX_DECODE_BOUND
            )));
        }
        Ok(())
    }

    pub fn vote_domain(&self) -> VoteDomain {
        VoteDomain::new(self.max_vote)
    }
}
