use ark_ec::pairing::{Pairing, PairingOutput};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
};

use crate::circuits::ConstraintSystem;

/// Elements needed to check a proof.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct VerifyingKey<E: Pairing> {
    pub alpha_g1: E::G1Affine,
    pub beta_g2: E::G2Affine,
    pub gamma_g2: E::G2Affine,
    pub delta_g2: E::G2Affine,
    /// `IC_j = (β·u_j(τ) + α·v_j(τ) + w_j(τ)) / γ · G1` for the constant wire and each public
    /// input.
    pub gamma_abc_g1: Vec<E::G1Affine>,
}

impl<E: Pairing> VerifyingKey<E> {
    /// Number of public inputs this key verifies, excluding the constant wire.
    pub fn public_input_count(&self) -> usize {
        self.gamma_abc_g1.len().saturating_sub(1)
    }
}

/// Verifying key with the pairing `e(α, β)` and the negated G2 elements precomputed, for checking
/// many proofs against the same key.
#[derive(Clone, Debug)]
pub struct PreparedVerifyingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    pub alpha_g1_beta_g2: PairingOutput<E>,
    pub gamma_g2_neg_pc: E::G2Prepared,
    pub delta_g2_neg_pc: E::G2Prepared,
}

/// Everything the prover needs: the verifying key, the query vectors derived from the toxic waste
/// and the constraint system they were generated for.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct ProvingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    pub beta_g1: E::G1Affine,
    pub delta_g1: E::G1Affine,
    /// `u_i(τ)·G1` for every variable.
    pub a_query: Vec<E::G1Affine>,
    /// `v_i(τ)·G1` for every variable.
    pub b_g1_query: Vec<E::G1Affine>,
    /// `v_i(τ)·G2` for every variable.
    pub b_g2_query: Vec<E::G2Affine>,
    /// `τ^i·Z(τ)/δ·G1` for `i < d - 1`.
    pub h_query: Vec<E::G1Affine>,
    /// `(β·u_j(τ) + α·v_j(τ) + w_j(τ))/δ·G1` for every private variable.
    pub l_query: Vec<E::G1Affine>,
    pub constraint_system: ConstraintSystem<E::ScalarField>,
}

impl<E: Pairing> ProvingKey<E> {
    pub fn verifying_key(&self) -> &VerifyingKey<E> {
        &self.vk
    }

    pub fn variable_count(&self) -> usize {
        self.a_query.len()
    }
}

/// Length-prefixed vector read one element at a time. The prefix comes from untrusted input, so
/// nothing is reserved up front: a forged length runs out of bytes instead of allocating.
fn read_vec<T, R>(
    mut reader: R,
    compress: Compress,
    validate: Validate,
) -> Result<Vec<T>, SerializationError>
where
    T: CanonicalDeserialize,
    R: Read,
{
    let len = u64::deserialize_with_mode(&mut reader, compress, validate)?;
    let mut values = Vec::new();
    for _ in 0..len {
        values.push(T::deserialize_with_mode(&mut reader, compress, validate)?);
    }
    Ok(values)
}

impl<E: Pairing> Valid for VerifyingKey<E> {
    fn check(&self) -> Result<(), SerializationError> {
        self.alpha_g1.check()?;
        self.beta_g2.check()?;
        self.gamma_g2.check()?;
        self.delta_g2.check()?;
        self.gamma_abc_g1.check()
    }
}

impl<E: Pairing> CanonicalDeserialize for VerifyingKey<E> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        Ok(VerifyingKey {
            alpha_g1: E::G1Affine::deserialize_with_mode(&mut reader, compress, validate)?,
            beta_g2: E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?,
            gamma_g2: E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?,
            delta_g2: E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?,
            gamma_abc_g1: read_vec(&mut reader, compress, validate)?,
        })
    }
}

impl<E: Pairing> Valid for ProvingKey<E> {
    fn check(&self) -> Result<(), SerializationError> {
        self.vk.check()?;
        self.beta_g1.check()?;
        self.delta_g1.check()?;
        self.a_query.check()?;
        self.b_g1_query.check()?;
        self.b_g2_query.check()?;
        self.h_query.check()?;
        self.l_query.check()?;
        self.constraint_system.check()
    }
}

impl<E: Pairing> CanonicalDeserialize for ProvingKey<E> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        Ok(ProvingKey {
            vk: VerifyingKey::deserialize_with_mode(&mut reader, compress, validate)?,
            beta_g1: E::G1Affine::deserialize_with_mode(&mut reader, compress, validate)?,
            delta_g1: E::G1Affine::deserialize_with_mode(&mut reader, compress, validate)?,
            a_query: read_vec(&mut reader, compress, validate)?,
            b_g1_query: read_vec(&mut reader, compress, validate)?,
            b_g2_query: read_vec(&mut reader, compress, validate)?,
            h_query: read_vec(&mut reader, compress, validate)?,
            l_query: read_vec(&mut reader, compress, validate)?,
            constraint_system: ConstraintSystem::deserialize_with_mode(
                &mut reader,
                compress,
                validate,
            )?,
        })
    }
}

/// Output of one setup run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair<E: Pairing> {
    pub proving_key: ProvingKey<E>,
    pub verifying_key: VerifyingKey<E>,
}

impl<E: Pairing> From<ProvingKey<E>> for KeyPair<E> {
    fn from(proving_key: ProvingKey<E>) -> Self {
        KeyPair {
            verifying_key: proving_key.vk.clone(),
            proving_key,
        }
    }
}

/// A Groth16 proof. Carries no secrets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<E: Pairing> {
    pub a: E::G1Affine,
    pub b: E::G2Affine,
    pub c: E::G1Affine,
}
