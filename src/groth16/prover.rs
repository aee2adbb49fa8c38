use ark_ec::AffineRepr;
use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use itertools::izip;
use log::debug;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::backend::msm;
use crate::circuits::{ConstraintSystem, Matrix};
use crate::error::{Groth16Error, Result};
use crate::groth16::keys::{Proof, ProvingKey};
use crate::helpers::rand_scalar;
use crate::witness::Witness;

/// Coefficients of `H(x) = (A(x)B(x) - C(x)) / Z(x)`, where `A(x) = Σ z_i·u_i(x)` and likewise for
/// `B` and `C`.
///
/// The division is exact precisely when `(A·z)_k · (B·z)_k = (C·z)_k` at every domain point, so
/// that is checked first. The quotient is then recovered on the coset `g·H`, where `Z` is a
/// non-zero constant.
pub(crate) fn compute_quotient<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    z: &[F],
) -> Result<Zeroizing<Vec<F>>> {
    let domain = cs.domain()?;
    let rows = cs.constraint_count();

    let mut a = Zeroizing::new(cs.matrix(Matrix::A).mul_vector(z, rows));
    let mut b = Zeroizing::new(cs.matrix(Matrix::B).mul_vector(z, rows));
    let mut c = Zeroizing::new(cs.matrix(Matrix::C).mul_vector(z, rows));

    if let Some(row) = izip!(a.iter(), b.iter(), c.iter()).position(|(a, b, c)| *a * b != *c) {
        debug!("Quotient has a non-zero remainder at domain point {row}");
        return Err(Groth16Error::WitnessNotSatisfying { row });
    }

    for evaluations in [&mut a, &mut b, &mut c] {
        domain.ifft_in_place(evaluations)?;
        domain.coset_fft_in_place(evaluations)?;
    }
    debug!("Evaluated A, B and C on the coset");

    let vanishing_inverse = domain
        .coset_vanishing_value()
        .inverse()
        .ok_or(Groth16Error::Internal("vanishing polynomial is zero on the coset"))?;
    for (a_k, b_k, c_k) in izip!(a.iter_mut(), b.iter(), c.iter()) {
        *a_k = (*a_k * b_k - c_k) * vanishing_inverse;
    }
    domain.coset_ifft_in_place(&mut a)?;

    // deg(H) <= d - 2
    let mut h = a;
    if h.pop().is_some_and(|top| !top.is_zero()) {
        return Err(Groth16Error::Internal("quotient polynomial has degree d - 1"));
    }
    Ok(h)
}

/// Create a proof that `witness` satisfies the constraint system `pk` was generated for.
///
/// The blinding factors `r` and `s` are drawn fresh from `rng` on every call. The witness is
/// consumed and wiped when this returns.
pub fn prove<E, R>(
    pk: &ProvingKey<E>,
    witness: Witness<E::ScalarField>,
    rng: &mut R,
) -> Result<Proof<E>>
where
    E: Pairing,
    R: RngCore + CryptoRng + ?Sized,
{
    let cs = &pk.constraint_system;
    if witness.len() != pk.variable_count() {
        return Err(Groth16Error::KeyWitnessSizeMismatch {
            expected: pk.variable_count(),
            actual: witness.len(),
        });
    }
    if witness.public_input_count() != cs.public_input_count() {
        return Err(Groth16Error::InputCountMismatch {
            what: "public inputs in witness",
            expected: cs.public_input_count(),
            actual: witness.public_input_count(),
        });
    }
    check_key_shape(pk)?;
    debug!("Proving with {} variables", witness.len());

    let h = compute_quotient(cs, witness.values())?;
    debug!("Computed quotient polynomial ({} coefficients)", h.len());

    let r = Zeroizing::new(rand_scalar::<E::ScalarField, _>(rng));
    let s = Zeroizing::new(rand_scalar::<E::ScalarField, _>(rng));
    let rs = Zeroizing::new(*r * *s);

    let z = witness.values();
    let a_acc = msm::<E::G1>(&pk.a_query, z)?;
    let b_g1_acc = msm::<E::G1>(&pk.b_g1_query, z)?;
    let b_g2_acc = msm::<E::G2>(&pk.b_g2_query, z)?;
    let h_acc = msm::<E::G1>(&pk.h_query, h.as_slice())?;
    let l_acc = msm::<E::G1>(&pk.l_query, witness.private_values())?;
    debug!("Computed multi-scalar multiplications");

    let a = pk.vk.alpha_g1.into_group() + a_acc + pk.delta_g1 * *r;
    let b = pk.vk.beta_g2.into_group() + b_g2_acc + pk.vk.delta_g2 * *s;
    let b_g1 = pk.beta_g1.into_group() + b_g1_acc + pk.delta_g1 * *s;
    let c = l_acc + h_acc + a * *s + b_g1 * *r - pk.delta_g1 * *rs;

    Ok(Proof {
        a: a.into(),
        b: b.into(),
        c: c.into(),
    })
}

/// Keys are deserialized field by field, so the query lengths are checked against the embedded
/// constraint system before use.
fn check_key_shape<E: Pairing>(pk: &ProvingKey<E>) -> Result<()> {
    let cs = &pk.constraint_system;
    let domain_size = cs.domain()?.size();
    let expected = [
        ("A query", pk.a_query.len(), cs.variable_count()),
        ("B query", pk.b_g1_query.len(), cs.variable_count()),
        ("B query in G2", pk.b_g2_query.len(), cs.variable_count()),
        ("H query", pk.h_query.len(), domain_size - 1),
        ("L query", pk.l_query.len(), cs.private_input_count()),
        (
            "input commitments",
            pk.vk.gamma_abc_g1.len(),
            cs.public_input_count() + 1,
        ),
    ];
    for (name, actual, wanted) in expected {
        if actual != wanted {
            return Err(Groth16Error::InvalidDimension(format!(
                "proving key {name} has {actual} elements, expected {wanted}"
            )));
        }
    }
    Ok(())
}

impl<E: Pairing> ProvingKey<E> {
    /// See [`prove`].
    pub fn prove<R>(&self, witness: Witness<E::ScalarField>, rng: &mut R) -> Result<Proof<E>>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        prove(self, witness, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::Entry;
    use crate::circuits::tests::{cubic_assignment, cubic_circuit, square_circuit};
    use crate::config::Groth16Config;
    use crate::groth16::setup::setup;
    use crate::polynomial::Polynomial;
    use crate::witness::{evaluate, evaluate_unchecked};
    use ark_bn254::Bn254;
    use ark_ff::Zero;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    type Field = ark_bn254::Fr;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn quotient_matches_polynomial_division() -> Result<()> {
        init();
        let cs = cubic_circuit::<Field>();
        let z = cubic_assignment::<Field>(3);
        let h = compute_quotient(&cs, &z)?;

        let qap = cs.to_qap()?;
        let combine = |polys: &[Polynomial<Field>]| -> Polynomial<Field> {
            polys.iter().zip(&z).map(|(p, z_i)| p * *z_i).sum()
        };
        let target = &(&combine(&qap.u) * &combine(&qap.v)) - &combine(&qap.w);
        let (quotient, remainder) = target.div_rem(&qap.vanishing)?;
        assert!(remainder.is_zero());

        let mut expected = quotient.into_coefficients();
        expected.resize(qap.degree() - 1, Field::zero());
        assert_eq!(h.as_slice(), expected.as_slice());
        Ok(())
    }

    #[test]
    fn quotient_rejects_unsatisfying_assignment() {
        let cs = cubic_circuit::<Field>();
        let mut z = cubic_assignment::<Field>(3);
        z[4] += Field::from(1u64);
        assert!(matches!(
            compute_quotient(&cs, &z),
            Err(Groth16Error::WitnessNotSatisfying { row: 1 })
        ));
    }

    #[test]
    fn prover_refuses_unchecked_bad_witness() -> Result<()> {
        init();
        let cs = square_circuit::<Field>();
        let mut rng = StdRng::seed_from_u64(10);
        let keys = setup::<Bn254, _>(&cs, &mut rng, &Groth16Config::default())?;
        let witness = evaluate_unchecked(
            &cs,
            &[Field::from(16u64)],
            &[Field::from(3u64), Field::zero()],
        )?;
        let err = keys.proving_key.prove(witness, &mut rng).unwrap_err();
        assert!(matches!(err, Groth16Error::WitnessNotSatisfying { row: 0 }));
        Ok(())
    }

    #[test]
    fn witness_for_another_circuit_is_rejected() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let keys =
            setup::<Bn254, _>(&square_circuit::<Field>(), &mut rng, &Groth16Config::default())?;
        let cubic = cubic_circuit::<Field>();
        let z = cubic_assignment::<Field>(2);
        let witness = evaluate(&cubic, &z[1..2], &z[2..])?;
        let err = prove(&keys.proving_key, witness, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Groth16Error::KeyWitnessSizeMismatch {
                expected: 4,
                actual: 5
            }
        ));
        Ok(())
    }

    #[test]
    fn witness_with_another_public_split_is_rejected() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(14);
        let keys =
            setup::<Bn254, _>(&square_circuit::<Field>(), &mut rng, &Groth16Config::default())?;
        // Same variable count, but two public inputs instead of one.
        let other = ConstraintSystem::build(
            1,
            4,
            2,
            [
                Entry::new(Matrix::A, 0, 3, Field::from(1u64)),
                Entry::new(Matrix::B, 0, 3, Field::from(1u64)),
                Entry::new(Matrix::C, 0, 1, Field::from(1u64)),
            ],
        )?;
        let witness = evaluate(&other, &[Field::from(9u64), Field::zero()], &[Field::from(3u64)])?;
        let err = keys.proving_key.prove(witness, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Groth16Error::InputCountMismatch {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert!(!err.is_fatal());
        Ok(())
    }

    #[test]
    fn truncated_key_is_rejected() -> Result<()> {
        let cs = square_circuit::<Field>();
        let mut rng = StdRng::seed_from_u64(12);
        let mut keys = setup::<Bn254, _>(&cs, &mut rng, &Groth16Config::default())?;
        keys.proving_key.l_query.pop();
        let witness = evaluate(&cs, &[Field::from(9u64)], &[Field::from(3u64), Field::zero()])?;
        assert!(matches!(
            keys.proving_key.prove(witness, &mut rng),
            Err(Groth16Error::InvalidDimension(_))
        ));
        Ok(())
    }

    #[test]
    fn proofs_are_randomized() -> Result<()> {
        let cs = square_circuit::<Field>();
        let mut rng = StdRng::seed_from_u64(13);
        let keys = setup::<Bn254, _>(&cs, &mut rng, &Groth16Config::default())?;
        let public = [Field::from(9u64)];
        let private = [Field::from(3u64), Field::zero()];
        let first = keys.proving_key.prove(evaluate(&cs, &public, &private)?, &mut rng)?;
        let second = keys.proving_key.prove(evaluate(&cs, &public, &private)?, &mut rng)?;
        assert_ne!(first, second);
        Ok(())
    }
}
