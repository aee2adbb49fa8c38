use ark_serialize::Compress;
use serde::{Deserialize, Serialize};

use crate::error::{Groth16Error, Result};

/// Whether the witness evaluator checks R1CS satisfaction before handing a witness to the prover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionCheck {
    #[default]
    Enforce,
    /// Performance opt-out for trusted callers. Only counts are validated, and the prover still
    /// rejects an unsatisfying witness when it computes the quotient polynomial.
    Skip,
}

/// Curve point encoding used for keys and proofs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointEncoding {
    #[default]
    Compressed,
    Uncompressed,
}

impl From<PointEncoding> for Compress {
    fn from(encoding: PointEncoding) -> Self {
        match encoding {
            PointEncoding::Compressed => Compress::Yes,
            PointEncoding::Uncompressed => Compress::No,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Groth16Config {
    /// How many times a zero toxic waste scalar is resampled before setup gives up.
    pub max_sampling_attempts: u32,
    pub satisfaction_check: SatisfactionCheck,
    pub point_encoding: PointEncoding,
}

impl Default for Groth16Config {
    fn default() -> Self {
        Groth16Config {
            max_sampling_attempts: 16,
            satisfaction_check: SatisfactionCheck::Enforce,
            point_encoding: PointEncoding::Compressed,
        }
    }
}

impl Groth16Config {
    /// Parse a configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Groth16Config = serde_json::from_str(json)
            .map_err(|err| Groth16Error::DecodeError(format!("configuration: {err}")))?;
        if config.max_sampling_attempts == 0 {
            return Err(Groth16Error::DecodeError(
                "configuration: max_sampling_attempts must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}
