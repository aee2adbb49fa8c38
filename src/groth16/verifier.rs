use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use log::debug;

use crate::backend::msm;
use crate::error::{Groth16Error, Result};
use crate::groth16::keys::{PreparedVerifyingKey, Proof, VerifyingKey};

/// Precompute `e(α, β)` and the prepared `-γ`, `-δ` so that each verification costs one
/// multi-Miller loop and one final exponentiation.
pub fn prepare_verifying_key<E: Pairing>(
    vk: &VerifyingKey<E>,
) -> Result<PreparedVerifyingKey<E>> {
    let alpha_g1_beta_g2 = E::final_exponentiation(E::multi_miller_loop([vk.alpha_g1], [vk.beta_g2]))
        .ok_or(Groth16Error::PairingFailure)?;
    Ok(PreparedVerifyingKey {
        vk: vk.clone(),
        alpha_g1_beta_g2,
        gamma_g2_neg_pc: E::G2Prepared::from((-vk.gamma_g2.into_group()).into_affine()),
        delta_g2_neg_pc: E::G2Prepared::from((-vk.delta_g2.into_group()).into_affine()),
    })
}

/// `IC_0 + Σ public_inputs[j] · IC_{j+1}`.
pub fn prepare_inputs<E: Pairing>(
    vk: &VerifyingKey<E>,
    public_inputs: &[E::ScalarField],
) -> Result<E::G1> {
    let Some((constant, commitments)) = vk.gamma_abc_g1.split_first() else {
        return Err(Groth16Error::InvalidDimension(
            "verifying key has no input commitments".to_string(),
        ));
    };
    if public_inputs.len() != commitments.len() {
        return Err(Groth16Error::InputCountMismatch {
            what: "public inputs",
            expected: commitments.len(),
            actual: public_inputs.len(),
        });
    }
    Ok(constant.into_group() + msm::<E::G1>(commitments, public_inputs)?)
}

/// Check `e(A, B) = e(α, β) · e(vk_x, γ) · e(C, δ)` against a prepared key.
///
/// Returns `Ok(false)` for a well-formed proof that does not verify.
pub fn verify_with_prepared<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    proof: &Proof<E>,
    public_inputs: &[E::ScalarField],
) -> Result<bool> {
    let vk_x = prepare_inputs(&pvk.vk, public_inputs)?.into_affine();

    let miller_loop = E::multi_miller_loop(
        [proof.a, vk_x, proof.c],
        [
            E::G2Prepared::from(proof.b),
            pvk.gamma_g2_neg_pc.clone(),
            pvk.delta_g2_neg_pc.clone(),
        ],
    );
    let product = E::final_exponentiation(miller_loop).ok_or(Groth16Error::PairingFailure)?;

    let valid = product == pvk.alpha_g1_beta_g2;
    debug!(
        "Proof {} for {} public inputs",
        if valid { "verified" } else { "rejected" },
        public_inputs.len()
    );
    Ok(valid)
}

/// Verify `proof` for `public_inputs` (without the constant wire) under `vk`.
pub fn verify<E: Pairing>(
    vk: &VerifyingKey<E>,
    proof: &Proof<E>,
    public_inputs: &[E::ScalarField],
) -> Result<bool> {
    if public_inputs.len() != vk.public_input_count() {
        return Err(Groth16Error::InputCountMismatch {
            what: "public inputs",
            expected: vk.public_input_count(),
            actual: public_inputs.len(),
        });
    }
    let pvk = prepare_verifying_key(vk)?;
    verify_with_prepared(&pvk, proof, public_inputs)
}

impl<E: Pairing> Proof<E> {
    /// See [`verify`].
    pub fn verify(&self, vk: &VerifyingKey<E>, public_inputs: &[E::ScalarField]) -> Result<bool> {
        verify(vk, self, public_inputs)
    }
}

impl<E: Pairing> VerifyingKey<E> {
    pub fn prepare(&self) -> Result<PreparedVerifyingKey<E>> {
        prepare_verifying_key(self)
    }
}
