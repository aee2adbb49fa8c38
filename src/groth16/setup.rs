use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{Field, PrimeField};
use itertools::izip;
use log::{debug, info, warn};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::backend::{CurveBackend, batch_mul};
use crate::circuits::ConstraintSystem;
use crate::config::Groth16Config;
use crate::error::{Groth16Error, Result};
use crate::groth16::keys::{KeyPair, ProvingKey, VerifyingKey};
use crate::helpers::rand_nonzero_scalar;

/// The secret trapdoor of one setup run. Anyone holding it can forge proofs, so it never leaves
/// [`setup`] and is wiped on every exit path.
struct ToxicWaste<F: PrimeField> {
    alpha: F,
    beta: F,
    gamma: F,
    delta: F,
    tau: F,
}

impl<F: PrimeField> ToxicWaste<F> {
    fn sample<R>(rng: &mut R, max_attempts: u32) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        Ok(ToxicWaste {
            alpha: rand_nonzero_scalar(rng, max_attempts)?,
            beta: rand_nonzero_scalar(rng, max_attempts)?,
            gamma: rand_nonzero_scalar(rng, max_attempts)?,
            delta: rand_nonzero_scalar(rng, max_attempts)?,
            tau: rand_nonzero_scalar(rng, max_attempts)?,
        })
    }
}

impl<F: PrimeField> Zeroize for ToxicWaste<F> {
    fn zeroize(&mut self) {
        self.alpha.zeroize();
        self.beta.zeroize();
        self.gamma.zeroize();
        self.delta.zeroize();
        self.tau.zeroize();
    }
}

impl<F: PrimeField> Drop for ToxicWaste<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<F: PrimeField> ZeroizeOnDrop for ToxicWaste<F> {}

/// Run the circuit-specific trusted setup and return the proving and verifying keys.
///
/// All randomness is drawn from `rng`, which must be cryptographically secure. The toxic waste is
/// dropped before this function returns.
pub fn setup<E, R>(
    cs: &ConstraintSystem<E::ScalarField>,
    rng: &mut R,
    config: &Groth16Config,
) -> Result<KeyPair<E>>
where
    E: CurveBackend,
    R: RngCore + CryptoRng + ?Sized,
{
    info!(
        "Starting trusted setup on {}: {} constraints, {} variables, {} public inputs",
        E::NAME,
        cs.constraint_count(),
        cs.variable_count(),
        cs.public_input_count()
    );

    let qap = cs.to_qap()?;
    let domain_size = qap.degree();
    debug!("Derived QAP over a domain of size {domain_size}");

    let toxic_waste = ToxicWaste::<E::ScalarField>::sample(rng, config.max_sampling_attempts)?;
    debug!("Sampled toxic waste");

    let gamma_inverse = Zeroizing::new(
        toxic_waste
            .gamma
            .inverse()
            .ok_or(Groth16Error::SingularToxicWaste("gamma"))?,
    );
    let delta_inverse = Zeroizing::new(
        toxic_waste
            .delta
            .inverse()
            .ok_or(Groth16Error::SingularToxicWaste("delta"))?,
    );

    let evaluation = qap.evaluate_at(toxic_waste.tau);
    debug!("Evaluated QAP at tau");

    // β·u_i(τ) + α·v_i(τ) + w_i(τ), divided by γ for the constant wire and public inputs and by δ
    // for the private variables.
    let public_slots = cs.public_input_count() + 1;
    let combined: Zeroizing<Vec<E::ScalarField>> = Zeroizing::new(
        izip!(&evaluation.u, &evaluation.v, &evaluation.w)
            .enumerate()
            .map(|(i, (u_i, v_i, w_i))| {
                let divisor = if i < public_slots {
                    *gamma_inverse
                } else {
                    *delta_inverse
                };
                (toxic_waste.beta * u_i + toxic_waste.alpha * v_i + w_i) * divisor
            })
            .collect(),
    );
    let (gamma_abc_scalars, l_scalars) = combined.split_at(public_slots);

    // τ^i·Z(τ)/δ for i = 0..d-2, enough for a quotient of degree at most d - 2.
    let h_scalars: Zeroizing<Vec<E::ScalarField>> = Zeroizing::new(
        std::iter::successors(Some(evaluation.vanishing * *delta_inverse), |acc| {
            Some(*acc * toxic_waste.tau)
        })
        .take(domain_size - 1)
        .collect(),
    );
    debug!("Derived scalar vectors");

    let g1 = E::G1::generator();
    let g2 = E::G2::generator();

    let a_query: Vec<E::G1Affine> = batch_mul(g1, &evaluation.u);
    debug!("Generated A query");
    let b_g1_query: Vec<E::G1Affine> = batch_mul(g1, &evaluation.v);
    let b_g2_query: Vec<E::G2Affine> = batch_mul(g2, &evaluation.v);
    debug!("Generated B queries");
    let h_query: Vec<E::G1Affine> = batch_mul(g1, h_scalars.as_slice());
    debug!("Generated H query ({} elements)", h_query.len());
    let l_query: Vec<E::G1Affine> = batch_mul(g1, l_scalars);
    debug!("Generated L query ({} elements)", l_query.len());
    let gamma_abc_g1: Vec<E::G1Affine> = batch_mul(g1, gamma_abc_scalars);
    debug!("Generated input commitments");

    for (j, commitment) in gamma_abc_g1.iter().enumerate().skip(1) {
        if commitment.is_zero() {
            warn!("Public input {j} does not appear in any constraint; proofs do not bind it");
        }
    }

    let verifying_key = VerifyingKey {
        alpha_g1: (g1 * toxic_waste.alpha).into_affine(),
        beta_g2: (g2 * toxic_waste.beta).into_affine(),
        gamma_g2: (g2 * toxic_waste.gamma).into_affine(),
        delta_g2: (g2 * toxic_waste.delta).into_affine(),
        gamma_abc_g1,
    };
    let proving_key = ProvingKey {
        vk: verifying_key,
        beta_g1: (g1 * toxic_waste.beta).into_affine(),
        delta_g1: (g1 * toxic_waste.delta).into_affine(),
        a_query,
        b_g1_query,
        b_g2_query,
        h_query,
        l_query,
        constraint_system: cs.clone(),
    };

    info!("Trusted setup complete");
    Ok(KeyPair::from(proving_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::tests::{cubic_circuit, square_circuit};
    use crate::helpers::tests::{SaturatedRng, ZeroRng};
    use ark_bn254::{Bn254, G1Projective, G2Projective};
    use ark_ff::Zero;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    type Field = ark_bn254::Fr;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn key_shapes_follow_the_circuit() -> Result<()> {
        init();
        let cs = cubic_circuit::<Field>();
        let mut rng = StdRng::seed_from_u64(1);
        let keys = setup::<Bn254, _>(&cs, &mut rng, &Groth16Config::default())?;
        let pk = &keys.proving_key;

        assert_eq!(pk.a_query.len(), 5);
        assert_eq!(pk.b_g1_query.len(), 5);
        assert_eq!(pk.b_g2_query.len(), 5);
        // Three constraints round up to a domain of four points.
        assert_eq!(pk.h_query.len(), 3);
        assert_eq!(pk.l_query.len(), 3);
        assert_eq!(keys.verifying_key.gamma_abc_g1.len(), 2);
        assert_eq!(keys.verifying_key.public_input_count(), 1);
        assert_eq!(pk.vk, keys.verifying_key);
        assert_eq!(pk.constraint_system, cs);
        Ok(())
    }

    #[test]
    fn beta_and_delta_agree_across_groups() -> Result<()> {
        use ark_ec::pairing::Pairing;

        let cs = square_circuit::<Field>();
        let mut rng = StdRng::seed_from_u64(2);
        let keys = setup::<Bn254, _>(&cs, &mut rng, &Groth16Config::default())?;
        let pk = &keys.proving_key;
        let g1 = G1Projective::generator();
        let g2 = G2Projective::generator();
        assert_eq!(Bn254::pairing(pk.beta_g1, g2), Bn254::pairing(g1, pk.vk.beta_g2));
        assert_eq!(Bn254::pairing(pk.delta_g1, g2), Bn254::pairing(g1, pk.vk.delta_g2));
        for (b1, b2) in pk.b_g1_query.iter().zip(&pk.b_g2_query) {
            assert_eq!(Bn254::pairing(*b1, g2), Bn254::pairing(g1, *b2));
        }
        Ok(())
    }

    #[test]
    fn independent_runs_produce_different_keys() -> Result<()> {
        let cs = square_circuit::<Field>();
        let config = Groth16Config::default();
        let first = setup::<Bn254, _>(&cs, &mut StdRng::seed_from_u64(3), &config)?;
        let second = setup::<Bn254, _>(&cs, &mut StdRng::seed_from_u64(4), &config)?;
        let again = setup::<Bn254, _>(&cs, &mut StdRng::seed_from_u64(3), &config)?;
        assert_ne!(first.verifying_key, second.verifying_key);
        assert_eq!(first, again);
        Ok(())
    }

    #[test]
    fn broken_entropy_source_is_fatal() {
        init();
        let cs = square_circuit::<Field>();
        let config = Groth16Config {
            max_sampling_attempts: 4,
            ..Groth16Config::default()
        };
        let err = setup::<Bn254, _>(&cs, &mut ZeroRng, &config).unwrap_err();
        assert!(matches!(err, Groth16Error::SamplingFailed { attempts: 4 }));
        assert!(err.is_fatal());
    }

    #[test]
    fn saturated_entropy_source_does_not_hang() -> Result<()> {
        let cs = square_circuit::<Field>();
        let keys = setup::<Bn254, _>(&cs, &mut SaturatedRng, &Groth16Config::default())?;
        assert_eq!(keys.proving_key.a_query.len(), cs.variable_count());
        Ok(())
    }

    #[test]
    fn empty_system_has_no_quotient_query() -> Result<()> {
        init();
        let cs = ConstraintSystem::<Field>::build(0, 2, 1, [])?;
        let mut rng = StdRng::seed_from_u64(5);
        let keys = setup::<Bn254, _>(&cs, &mut rng, &Groth16Config::default())?;
        assert!(keys.proving_key.h_query.is_empty());
        // The unconstrained public input commits to the identity.
        assert!(keys.verifying_key.gamma_abc_g1[1].is_zero());
        Ok(())
    }

    #[test]
    fn toxic_waste_is_wiped() -> Result<()> {
        let mut toxic = ToxicWaste::<Field>::sample(&mut StdRng::seed_from_u64(6), 1)?;
        assert!(!toxic.tau.is_zero());
        toxic.zeroize();
        for value in [toxic.alpha, toxic.beta, toxic.gamma, toxic.delta, toxic.tau] {
            assert!(value.is_zero());
        }
        Ok(())
    }
}
