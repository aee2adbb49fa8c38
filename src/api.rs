//! Request and response shapes for a host-language binding layer. Everything crossing this
//! boundary is text: field elements as big-endian hex, points, keys and proofs as hex of their
//! canonical encoding.

use ark_ec::pairing::Pairing;
use log::debug;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::backend::CurveBackend;
use crate::circuits::{ConstraintSystem, Entry, Matrix};
use crate::codec::{field_from_hex, fields_from_hex, from_hex, to_hex};
use crate::config::Groth16Config;
use crate::error::Result;
use crate::groth16::{self, Proof, ProvingKey, VerifyingKey};
use crate::witness;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitParams {
    pub constraint_count: usize,
    pub variable_count: usize,
    pub public_input_count: usize,
}

/// A constraint matrix coefficient with its value as hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedEntry {
    pub matrix: Matrix,
    pub row: usize,
    pub column: usize,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedProvingKey {
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedVerifyingKey {
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedKeyPair {
    pub proving_key: EncodedProvingKey,
    pub verifying_key: EncodedVerifyingKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedProof {
    pub a: String,
    pub b: String,
    pub c: String,
}

impl CircuitParams {
    pub fn build<F: ark_ff::PrimeField>(
        &self,
        entries: &[EncodedEntry],
    ) -> Result<ConstraintSystem<F>> {
        let entries = entries
            .iter()
            .map(|entry| {
                Ok(Entry::new(
                    entry.matrix,
                    entry.row,
                    entry.column,
                    field_from_hex(&entry.value)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        ConstraintSystem::build(
            self.constraint_count,
            self.variable_count,
            self.public_input_count,
            entries,
        )
    }
}

impl<E: Pairing> Proof<E> {
    pub fn encode(&self, config: &Groth16Config) -> Result<EncodedProof> {
        Ok(EncodedProof {
            a: to_hex(&self.a, config.point_encoding)?,
            b: to_hex(&self.b, config.point_encoding)?,
            c: to_hex(&self.c, config.point_encoding)?,
        })
    }

    pub fn decode(encoded: &EncodedProof, config: &Groth16Config) -> Result<Self> {
        Ok(Proof {
            a: from_hex(&encoded.a, config.point_encoding)?,
            b: from_hex(&encoded.b, config.point_encoding)?,
            c: from_hex(&encoded.c, config.point_encoding)?,
        })
    }
}

/// Build the constraint system described by `params` and `entries` and run the trusted setup.
pub fn setup<E, R>(
    params: &CircuitParams,
    entries: &[EncodedEntry],
    rng: &mut R,
    config: &Groth16Config,
) -> Result<EncodedKeyPair>
where
    E: CurveBackend,
    R: RngCore + CryptoRng + ?Sized,
{
    let cs = params.build::<E::ScalarField>(entries)?;
    let keys = groth16::setup::<E, R>(&cs, rng, config)?;
    Ok(EncodedKeyPair {
        proving_key: EncodedProvingKey {
            data: to_hex(&keys.proving_key, config.point_encoding)?,
        },
        verifying_key: EncodedVerifyingKey {
            data: to_hex(&keys.verifying_key, config.point_encoding)?,
        },
    })
}

/// Decode the key and inputs, assemble the witness and prove.
pub fn prove<E, R>(
    proving_key: &EncodedProvingKey,
    public_inputs: &[String],
    private_inputs: &[String],
    rng: &mut R,
    config: &Groth16Config,
) -> Result<EncodedProof>
where
    E: CurveBackend,
    R: RngCore + CryptoRng + ?Sized,
{
    let pk: ProvingKey<E> = from_hex(&proving_key.data, config.point_encoding)?;
    let public_inputs = fields_from_hex::<E::ScalarField>(public_inputs)?;
    let private_inputs = fields_from_hex::<E::ScalarField>(private_inputs)?;
    debug!(
        "Decoded proving key and {} public, {} private inputs",
        public_inputs.len(),
        private_inputs.len()
    );

    let witness = witness::evaluate_with(
        &pk.constraint_system,
        &public_inputs,
        &private_inputs,
        config.satisfaction_check,
    )?;
    groth16::prove(&pk, witness, rng)?.encode(config)
}

/// Decode the key, proof and public inputs and verify.
pub fn verify<E: CurveBackend>(
    verifying_key: &EncodedVerifyingKey,
    proof: &EncodedProof,
    public_inputs: &[String],
    config: &Groth16Config,
) -> Result<bool> {
    let vk: VerifyingKey<E> = from_hex(&verifying_key.data, config.point_encoding)?;
    let proof = Proof::<E>::decode(proof, config)?;
    let public_inputs = fields_from_hex::<E::ScalarField>(public_inputs)?;
    groth16::verify(&vk, &proof, &public_inputs)
}
