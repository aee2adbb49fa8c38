use ark_ff::Field;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use crate::error::{Groth16Error, Result};

/// Dense univariate polynomial. Trailing zero coefficients are always trimmed, so the zero
/// polynomial has no coefficients and structural equality is polynomial equality.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Polynomial<F>
where
    F: Field,
{
    /// x^0, x^1, x^2, ...
    coefficients: Vec<F>,
}

impl<F: Field> Polynomial<F> {
    pub fn new(coefficients: Vec<F>) -> Self {
        let mut poly = Polynomial { coefficients };
        poly.trim();
        poly
    }

    pub fn zero() -> Self {
        Polynomial {
            coefficients: Vec::new(),
        }
    }

    /// `x^size - 1`, which vanishes exactly on a multiplicative subgroup of order `size`.
    pub fn vanishing(size: usize) -> Self {
        let mut coefficients = vec![F::zero(); size + 1];
        coefficients[0] = -F::one();
        coefficients[size] += F::one();
        Polynomial::new(coefficients)
    }

    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vec<F> {
        self.coefficients
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Degree of the polynomial, `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    fn trim(&mut self) {
        while self.coefficients.last().is_some_and(|c| c.is_zero()) {
            self.coefficients.pop();
        }
    }

    pub fn evaluate(&self, x: F) -> F {
        self.coefficients
            .iter()
            .rev()
            .fold(F::zero(), |acc, coefficient| acc * x + coefficient)
    }

    /// Long division, returning `(quotient, remainder)` with `deg(remainder) < deg(divisor)`.
    pub fn div_rem(&self, divisor: &Polynomial<F>) -> Result<(Polynomial<F>, Polynomial<F>)> {
        let Some(divisor_degree) = divisor.degree() else {
            return Err(Groth16Error::Internal("polynomial division by zero"));
        };
        let Some(self_degree) = self.degree() else {
            return Ok((Polynomial::zero(), Polynomial::zero()));
        };
        if self_degree < divisor_degree {
            return Ok((Polynomial::zero(), self.clone()));
        }

        let lead_inverse = divisor.coefficients[divisor_degree]
            .inverse()
            .ok_or(Groth16Error::Internal("divisor has a zero leading coefficient"))?;
        let mut remainder = self.coefficients.clone();
        let mut quotient = vec![F::zero(); self_degree - divisor_degree + 1];

        for shift in (0..quotient.len()).rev() {
            let factor = remainder[shift + divisor_degree] * lead_inverse;
            quotient[shift] = factor;
            for (i, d) in divisor.coefficients.iter().enumerate() {
                remainder[shift + i] -= factor * d;
            }
        }

        Ok((Polynomial::new(quotient), Polynomial::new(remainder)))
    }
}

fn pad_zip<F: Field>(a: &[F], b: &[F], op: impl Fn(F, F) -> F) -> Vec<F> {
    (0..a.len().max(b.len()))
        .map(|i| {
            op(
                a.get(i).copied().unwrap_or_default(),
                b.get(i).copied().unwrap_or_default(),
            )
        })
        .collect()
}

impl<F: Field> Add for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: Self) -> Self::Output {
        Polynomial::new(pad_zip(&self.coefficients, &rhs.coefficients, |a, b| a + b))
    }
}

impl<F: Field> Add for Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<F: Field> Sub for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        Polynomial::new(pad_zip(&self.coefficients, &rhs.coefficients, |a, b| a - b))
    }
}

impl<F: Field> Sub for Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl<F: Field> Mul for &Polynomial<F> {
    type Output = Polynomial<F>;

    /// Schoolbook multiplication. The protocol paths multiply through the FFT domain instead; this
    /// is kept for cross-checks and small debugging circuits.
    fn mul(self, rhs: &Polynomial<F>) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut out = vec![F::zero(); self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in rhs.coefficients.iter().enumerate() {
                out[i + j] += *a * b;
            }
        }
        Polynomial::new(out)
    }
}

impl<F: Field> Mul for Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: Polynomial<F>) -> Self::Output {
        &self * &rhs
    }
}

impl<F: Field> Mul<F> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: F) -> Self::Output {
        Polynomial::new(self.coefficients.iter().map(|x| *x * rhs).collect())
    }
}

impl<F: Field> Sum for Polynomial<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Polynomial::zero(), |acc, p| &acc + &p)
    }
}
