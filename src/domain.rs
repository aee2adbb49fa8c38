use ark_ff::FftField;
use ark_poly::{EvaluationDomain as _, Radix2EvaluationDomain};

use crate::backend::max_domain_size;
use crate::error::{Groth16Error, Result};
use crate::polynomial::Polynomial;

/// Multiplicative subgroup `H = {ω^0, ..., ω^(size-1)}` of the scalar field, with radix-2 FFTs
/// over `H` and over the coset `g·H` where `g` is the field's multiplicative generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluationDomain<F: FftField> {
    subgroup: Radix2EvaluationDomain<F>,
    coset: Radix2EvaluationDomain<F>,
}

impl<F: FftField> EvaluationDomain<F> {
    /// Domain of exactly `size` points. `size` must be a power of two no larger than the field's
    /// two-adic subgroup.
    pub fn new(size: usize) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(Groth16Error::InvalidDimension(format!(
                "evaluation domain size {size} is not a power of two"
            )));
        }
        let max = max_domain_size::<F>();
        if size > max {
            return Err(Groth16Error::DomainTooLarge { size, max });
        }
        let subgroup =
            Radix2EvaluationDomain::new(size).ok_or(Groth16Error::DomainTooLarge { size, max })?;
        let coset = subgroup
            .get_coset(F::GENERATOR)
            .ok_or(Groth16Error::Internal("multiplicative generator is zero"))?;
        Ok(EvaluationDomain { subgroup, coset })
    }

    /// Smallest domain with at least `num_points` points.
    pub fn for_points(num_points: usize) -> Result<Self> {
        let size = num_points
            .checked_next_power_of_two()
            .ok_or(Groth16Error::DomainTooLarge {
                size: num_points,
                max: max_domain_size::<F>(),
            })?;
        Self::new(size)
    }

    pub fn size(&self) -> usize {
        self.subgroup.size()
    }

    pub fn group_gen(&self) -> F {
        self.subgroup.group_gen()
    }

    /// `ω^i` for every point of the domain.
    pub fn elements(&self) -> impl Iterator<Item = F> + '_ {
        self.subgroup.elements()
    }

    /// `Z(x) = x^size - 1`.
    pub fn vanishing_polynomial(&self) -> Polynomial<F> {
        Polynomial::vanishing(self.size())
    }

    pub fn evaluate_vanishing_polynomial(&self, x: F) -> F {
        self.subgroup.evaluate_vanishing_polynomial(x)
    }

    /// Coefficients to evaluations over `H`. Input shorter than the domain is zero-padded.
    pub fn fft_in_place(&self, values: &mut Vec<F>) -> Result<()> {
        self.check_len(values)?;
        self.subgroup.fft_in_place(values);
        Ok(())
    }

    /// Evaluations over `H` to coefficients.
    pub fn ifft_in_place(&self, values: &mut Vec<F>) -> Result<()> {
        self.check_len(values)?;
        self.subgroup.ifft_in_place(values);
        Ok(())
    }

    /// Coefficients to evaluations over `g·H`.
    pub fn coset_fft_in_place(&self, values: &mut Vec<F>) -> Result<()> {
        self.check_len(values)?;
        self.coset.fft_in_place(values);
        Ok(())
    }

    /// Evaluations over `g·H` to coefficients.
    pub fn coset_ifft_in_place(&self, values: &mut Vec<F>) -> Result<()> {
        self.check_len(values)?;
        self.coset.ifft_in_place(values);
        Ok(())
    }

    /// `Z(g)`, the value of the vanishing polynomial at every point of the coset `g·H`.
    pub fn coset_vanishing_value(&self) -> F {
        self.subgroup
            .evaluate_vanishing_polynomial(self.coset.coset_offset())
    }

    /// Interpolate `evaluations` (one per domain point, missing ones are zero) into coefficient
    /// form.
    pub fn interpolate(&self, evaluations: Vec<F>) -> Result<Polynomial<F>> {
        let mut values = evaluations;
        self.ifft_in_place(&mut values)?;
        Ok(Polynomial::new(values))
    }

    /// arkworks truncates oversized input silently.
    fn check_len(&self, values: &[F]) -> Result<()> {
        if values.len() > self.size() {
            return Err(Groth16Error::InvalidDimension(format!(
                "{} values do not fit a domain of size {}",
                values.len(),
                self.size()
            )));
        }
        Ok(())
    }
}
