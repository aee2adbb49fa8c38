//! The curve backend: field, group and pairing operations are delegated to arkworks. A backend is
//! any pairing engine the crate has been built with; BN254 is always available and BLS12-381 is
//! enabled with the `bls12-381` feature.

use ark_ec::pairing::Pairing;
use ark_ec::{ScalarMul, VariableBaseMSM};
use ark_ff::{FftField, Zero};

use crate::error::{Groth16Error, Result};

/// Capability interface over which setup, proving and verification are generic.
pub trait CurveBackend: Pairing {
    /// Short name used in logs.
    const NAME: &'static str;
}

impl CurveBackend for ark_bn254::Bn254 {
    const NAME: &'static str = "bn254";
}

#[cfg(feature = "bls12-381")]
impl CurveBackend for ark_bls12_381::Bls12_381 {
    const NAME: &'static str = "bls12-381";
}

/// Backend used by the binding-level API when the caller does not pick one.
pub type DefaultBackend = ark_bn254::Bn254;

/// Largest radix-2 evaluation domain the field's multiplicative group supports.
pub fn max_domain_size<F: FftField>() -> usize {
    1usize
        .checked_shl(F::TWO_ADICITY)
        .unwrap_or(1usize << (usize::BITS - 1))
}

/// `Σ scalars[i] · bases[i]`. Mismatched lengths are an internal error rather than a silent
/// truncation.
pub fn msm<G: VariableBaseMSM>(bases: &[G::MulBase], scalars: &[G::ScalarField]) -> Result<G> {
    if bases.len() != scalars.len() {
        return Err(Groth16Error::Internal("msm bases and scalars differ in length"));
    }
    if bases.is_empty() {
        return Ok(G::zero());
    }
    G::msm(bases, scalars).map_err(|_| Groth16Error::Internal("msm length mismatch"))
}

/// `[s · base for s in scalars]`, using a precomputed window table for the fixed base.
pub fn batch_mul<G: ScalarMul>(base: G, scalars: &[G::ScalarField]) -> Vec<G::MulBase> {
    if scalars.is_empty() {
        return Vec::new();
    }
    base.batch_mul(scalars)
}
