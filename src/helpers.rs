use ark_ff::PrimeField;
use log::warn;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Groth16Error, Result};

/// Uniform scalar from 64 random bytes reduced modulo the field order. Twice the width of every
/// supported modulus keeps the reduction bias negligible, and one draw always suffices.
pub fn rand_scalar<F, R>(rng: &mut R) -> F
where
    F: PrimeField,
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = Zeroizing::new([0u8; 64]);
    rng.fill_bytes(&mut *bytes);
    F::from_le_bytes_mod_order(&*bytes)
}

/// Uniform non-zero scalar, giving up after `max_attempts` zero draws.
pub fn rand_nonzero_scalar<F, R>(rng: &mut R, max_attempts: u32) -> Result<F>
where
    F: PrimeField,
    R: RngCore + CryptoRng + ?Sized,
{
    for attempt in 1..=max_attempts {
        let scalar: F = rand_scalar(rng);
        if !scalar.is_zero() {
            return Ok(scalar);
        }
        warn!("Sampled a zero scalar (attempt {attempt}/{max_attempts}), resampling");
    }
    Err(Groth16Error::SamplingFailed {
        attempts: max_attempts,
    })
}
