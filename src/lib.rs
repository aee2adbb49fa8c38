//!# Groth16 engine
//!
//!This crate provides a library for running the Groth16 zkSNARK over a given Rank 1 Constraint System: a circuit-specific
//!trusted setup, proof generation and proof verification.
//!
//!The implementation is type generic over any pairing engine that implements `backend::CurveBackend`. BN254 is always
//!available and is the default backend of the `api` module; BLS12-381 is enabled with the `bls12-381` feature. The
//!`parallel` feature spreads FFTs, batch scalar multiplication and MSMs across threads with rayon.
//!
//!Randomness is always passed in explicitly as a `rand::CryptoRng`, and the toxic waste, the witness and the prover's
//!blinding factors are wiped with `zeroize` once they are no longer needed.
//!
//!The core types are `circuits::ConstraintSystem`, `circuits::QAP`, `witness::Witness`, `groth16::ProvingKey`,
//!`groth16::VerifyingKey` and `groth16::Proof`.
//!
//!The general flow is:
//!
//!- Define the R1CS with `ConstraintSystem::build`
//!- Generate keys with `groth16::setup`
//!- Assemble a witness with `witness::evaluate`
//!- Generate a proof using `proving_key.prove(witness, rng)`
//!- Verify the proof with `proof.verify(verifying_key, public_inputs)`
//!
//!Errors are reported through `error::Groth16Error`, which sorts every failure into an `error::ErrorCategory`.
//!

/// The API exposed to a host-language binding layer.
pub mod api;
/// Curve backends and the group operations shared by setup, proving and verification.
pub mod backend;
/// Contains the types for Rank 1 Constraint Systems and Quadratic Arithmetic Programs.
pub mod circuits;
/// Hex and byte encodings.
pub mod codec;
pub mod config;
/// Radix-2 evaluation domains.
pub mod domain;
pub mod error;
/// Contains types for the actual Groth16 proof algorithm.
pub mod groth16;
mod helpers;
/// Contains types for polynomials.
pub mod polynomial;
/// Contains the witness evaluator.
pub mod witness;

pub use backend::{CurveBackend, DefaultBackend};
pub use circuits::{ConstraintSystem, Entry, Matrix, QAP};
pub use config::Groth16Config;
pub use error::{ErrorCategory, Groth16Error, Result};
pub use groth16::{KeyPair, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
pub use witness::Witness;
