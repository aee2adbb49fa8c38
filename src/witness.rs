//! Assembles the full variable vector from public and private inputs and checks it against the
//! constraint system before anything is proven.

use std::fmt;

use ark_ff::PrimeField;
use log::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::circuits::ConstraintSystem;
use crate::config::SatisfactionCheck;
use crate::error::{Groth16Error, Result};

/// Full assignment `z = [1, public inputs..., private inputs...]`.
///
/// Deliberately not `Clone`: a witness is built for one proof and wiped when dropped.
pub struct Witness<F: PrimeField> {
    values: Vec<F>,
    public_input_count: usize,
}

impl<F: PrimeField> Witness<F> {
    /// Wrap a complete assignment. Only the shape is validated here; satisfaction is checked by
    /// [`check`].
    pub fn from_assignment(cs: &ConstraintSystem<F>, values: Vec<F>) -> Result<Self> {
        let witness = Witness {
            values,
            public_input_count: cs.public_input_count(),
        };
        if witness.values.len() != cs.variable_count() {
            return Err(Groth16Error::InputCountMismatch {
                what: "witness values",
                expected: cs.variable_count(),
                actual: witness.values.len(),
            });
        }
        if witness.values[0] != F::one() {
            return Err(Groth16Error::DecodeError(
                "witness slot 0 must hold the constant one".to_string(),
            ));
        }
        Ok(witness)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Number of public inputs in the layout this witness was assembled for.
    pub fn public_input_count(&self) -> usize {
        self.public_input_count
    }

    /// The public inputs, excluding the constant wire. Empty once the witness has been wiped.
    pub fn public_inputs(&self) -> &[F] {
        self.values.get(1..=self.public_input_count).unwrap_or(&[])
    }

    pub(crate) fn private_values(&self) -> &[F] {
        self.values
            .get(self.public_input_count + 1..)
            .unwrap_or(&[])
    }
}

impl<F: PrimeField> fmt::Debug for Witness<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Witness")
            .field("len", &self.values.len())
            .field("public_inputs", &self.public_inputs())
            .finish_non_exhaustive()
    }
}

impl<F: PrimeField> Zeroize for Witness<F> {
    fn zeroize(&mut self) {
        self.values.zeroize();
    }
}

impl<F: PrimeField> Drop for Witness<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<F: PrimeField> ZeroizeOnDrop for Witness<F> {}

/// Assemble the witness and check that it satisfies every constraint.
pub fn evaluate<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    public_inputs: &[F],
    private_inputs: &[F],
) -> Result<Witness<F>> {
    let witness = evaluate_unchecked(cs, public_inputs, private_inputs)?;
    check(cs, &witness)?;
    Ok(witness)
}

/// Assemble the witness validating only the input counts.
///
/// This skips the R1CS satisfaction check and is meant for trusted callers that have already
/// checked the assignment. The prover still refuses to produce a proof for an unsatisfying
/// witness.
pub fn evaluate_unchecked<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    public_inputs: &[F],
    private_inputs: &[F],
) -> Result<Witness<F>> {
    if public_inputs.len() != cs.public_input_count() {
        return Err(Groth16Error::InputCountMismatch {
            what: "public inputs",
            expected: cs.public_input_count(),
            actual: public_inputs.len(),
        });
    }
    if private_inputs.len() != cs.private_input_count() {
        return Err(Groth16Error::InputCountMismatch {
            what: "private inputs",
            expected: cs.private_input_count(),
            actual: private_inputs.len(),
        });
    }

    let mut values = Vec::with_capacity(cs.variable_count());
    values.push(F::one());
    values.extend_from_slice(public_inputs);
    values.extend_from_slice(private_inputs);
    Ok(Witness {
        values,
        public_input_count: cs.public_input_count(),
    })
}

/// [`evaluate`] or [`evaluate_unchecked`], as selected by configuration.
pub fn evaluate_with<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    public_inputs: &[F],
    private_inputs: &[F],
    satisfaction_check: SatisfactionCheck,
) -> Result<Witness<F>> {
    match satisfaction_check {
        SatisfactionCheck::Enforce => evaluate(cs, public_inputs, private_inputs),
        SatisfactionCheck::Skip => {
            debug!("Skipping R1CS satisfaction check on request");
            evaluate_unchecked(cs, public_inputs, private_inputs)
        }
    }
}

/// Fail with the first row where `(A·z) ∘ (B·z) ≠ C·z`.
pub fn check<F: PrimeField>(cs: &ConstraintSystem<F>, witness: &Witness<F>) -> Result<()> {
    if witness.len() != cs.variable_count() {
        return Err(Groth16Error::InputCountMismatch {
            what: "witness values",
            expected: cs.variable_count(),
            actual: witness.len(),
        });
    }
    match cs.first_unsatisfied_row(witness.values()) {
        Some(row) => {
            debug!("Witness violates constraint {row}");
            Err(Groth16Error::UnsatisfiedConstraint(row))
        }
        None => Ok(()),
    }
}
