//! Setup, proving and verification, generic over any [`CurveBackend`](crate::backend::CurveBackend).

mod keys;
mod prover;
mod setup;
mod verifier;

pub use keys::{KeyPair, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
pub use prover::prove;
pub use setup::setup;
pub use verifier::{prepare_inputs, prepare_verifying_key, verify, verify_with_prepared};
