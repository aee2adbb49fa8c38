use std::collections::BTreeMap;

use ark_ff::{FftField, Field, PrimeField};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
};
use ark_std::{cfg_into_iter, cfg_iter};
use itertools::izip;
use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::EvaluationDomain;
use crate::error::{Groth16Error, Result};
use crate::polynomial::Polynomial;

/// One of the three R1CS matrices in `(A·z) ∘ (B·z) = C·z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Matrix {
    A,
    B,
    C,
}

/// A non-zero coefficient of one of the constraint matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<F> {
    pub matrix: Matrix,
    pub row: usize,
    pub column: usize,
    pub value: F,
}

impl<F> Entry<F> {
    pub fn new(matrix: Matrix, row: usize, column: usize, value: F) -> Self {
        Entry {
            matrix,
            row,
            column,
            value,
        }
    }
}

/// Sparse matrix keyed by `(row, column)`. Only non-zero values are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct SparseMatrix<F: Field> {
    entries: BTreeMap<(usize, usize), F>,
}

impl<F: Field> SparseMatrix<F> {
    fn insert(&mut self, row: usize, column: usize, value: F) {
        let slot = self.entries.entry((row, column)).or_insert_with(F::zero);
        *slot += value;
        if slot.is_zero() {
            self.entries.remove(&(row, column));
        }
    }

    pub fn get(&self, row: usize, column: usize) -> F {
        self.entries
            .get(&(row, column))
            .copied()
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, F)> + '_ {
        self.entries.iter().map(|(&(row, column), &value)| (row, column, value))
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// `M·z`, padded with zeros up to `len` rows.
    pub fn mul_vector(&self, z: &[F], len: usize) -> Vec<F> {
        let mut out = vec![F::zero(); len];
        for (&(row, column), value) in &self.entries {
            out[row] += *value * z[column];
        }
        out
    }

    /// Group entries by column: `columns[j]` holds `(row, value)` pairs of column `j`.
    fn columns(&self, variable_count: usize) -> Vec<Vec<(usize, F)>> {
        let mut columns = vec![Vec::new(); variable_count];
        for (&(row, column), &value) in &self.entries {
            columns[column].push((row, value));
        }
        columns
    }

    fn check_bounds(&self, constraint_count: usize, variable_count: usize) -> Result<()> {
        for (&(row, column), value) in &self.entries {
            if row >= constraint_count || column >= variable_count {
                return Err(Groth16Error::InvalidDimension(format!(
                    "entry ({row}, {column}) outside a {constraint_count}x{variable_count} matrix"
                )));
            }
            if value.is_zero() {
                return Err(Groth16Error::InvalidDimension(format!(
                    "explicit zero stored at ({row}, {column})"
                )));
            }
        }
        Ok(())
    }
}

/// Rank-1 constraint system `(A·z) ∘ (B·z) = C·z`.
///
/// The variable vector is laid out as `z = [1, public inputs..., private inputs...]`: index 0 is
/// the constant "one" wire and indices `1..=public_input_count` hold the public inputs.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct ConstraintSystem<F: Field> {
    constraint_count: usize,
    variable_count: usize,
    public_input_count: usize,
    a: SparseMatrix<F>,
    b: SparseMatrix<F>,
    c: SparseMatrix<F>,
}

impl<F: PrimeField> ConstraintSystem<F> {
    /// Build a constraint system from its dimensions and the non-zero matrix entries. Duplicate
    /// entries for the same cell are summed.
    pub fn build(
        constraint_count: usize,
        variable_count: usize,
        public_input_count: usize,
        entries: impl IntoIterator<Item = Entry<F>>,
    ) -> Result<Self> {
        Self::check_shape(constraint_count, variable_count, public_input_count)?;

        let mut cs = ConstraintSystem {
            constraint_count,
            variable_count,
            public_input_count,
            a: SparseMatrix::default(),
            b: SparseMatrix::default(),
            c: SparseMatrix::default(),
        };
        for entry in entries {
            if entry.row >= constraint_count {
                return Err(Groth16Error::InvalidDimension(format!(
                    "row {} of matrix {:?} is out of range for {constraint_count} constraints",
                    entry.row, entry.matrix
                )));
            }
            if entry.column >= variable_count {
                return Err(Groth16Error::InvalidDimension(format!(
                    "column {} of matrix {:?} is out of range for {variable_count} variables",
                    entry.column, entry.matrix
                )));
            }
            let matrix = match entry.matrix {
                Matrix::A => &mut cs.a,
                Matrix::B => &mut cs.b,
                Matrix::C => &mut cs.c,
            };
            matrix.insert(entry.row, entry.column, entry.value);
        }

        debug!(
            "Built constraint system: {} constraints, {} variables, {} public inputs, {} non-zero entries",
            constraint_count,
            variable_count,
            public_input_count,
            cs.a.nnz() + cs.b.nnz() + cs.c.nnz()
        );
        Ok(cs)
    }

    fn check_shape(
        constraint_count: usize,
        variable_count: usize,
        public_input_count: usize,
    ) -> Result<()> {
        if variable_count == 0 {
            return Err(Groth16Error::InvalidDimension(format!(
                "variable count must include the constant wire, got 0 (with {constraint_count} constraints)"
            )));
        }
        if public_input_count > variable_count - 1 {
            return Err(Groth16Error::InvalidPublicInputCount {
                public_input_count,
                variable_count,
            });
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        Self::check_shape(
            self.constraint_count,
            self.variable_count,
            self.public_input_count,
        )?;
        for matrix in [&self.a, &self.b, &self.c] {
            matrix.check_bounds(self.constraint_count, self.variable_count)?;
        }
        Ok(())
    }

    pub fn constraint_count(&self) -> usize {
        self.constraint_count
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn public_input_count(&self) -> usize {
        self.public_input_count
    }

    /// Number of private variables, i.e. everything after the constant wire and public inputs.
    pub fn private_input_count(&self) -> usize {
        self.variable_count - 1 - self.public_input_count
    }

    pub fn matrix(&self, matrix: Matrix) -> &SparseMatrix<F> {
        match matrix {
            Matrix::A => &self.a,
            Matrix::B => &self.b,
            Matrix::C => &self.c,
        }
    }

    /// The evaluation domain the QAP of this system is interpolated over.
    pub fn domain(&self) -> Result<EvaluationDomain<F>> {
        EvaluationDomain::for_points(self.constraint_count)
    }

    /// Index of the first row where `(A·z) ∘ (B·z) ≠ C·z`, if any. `z` must have
    /// `variable_count` entries.
    pub fn first_unsatisfied_row(&self, z: &[F]) -> Option<usize> {
        let az = self.a.mul_vector(z, self.constraint_count);
        let bz = self.b.mul_vector(z, self.constraint_count);
        let cz = self.c.mul_vector(z, self.constraint_count);
        izip!(&az, &bz, &cz).position(|(a, b, c)| *a * b != *c)
    }

    /// Convert to a quadratic arithmetic program by interpolating every matrix column over the
    /// evaluation domain.
    pub fn to_qap(&self) -> Result<QAP<F>> {
        let domain = self.domain()?;
        debug!(
            "Converting {} constraints to a QAP over a domain of size {}",
            self.constraint_count,
            domain.size()
        );

        let interpolate_matrix = |matrix: &SparseMatrix<F>| -> Result<Vec<Polynomial<F>>> {
            cfg_into_iter!(matrix.columns(self.variable_count))
                .map(|column| {
                    if column.is_empty() {
                        return Ok(Polynomial::zero());
                    }
                    let mut evaluations = vec![F::zero(); domain.size()];
                    for (row, value) in column {
                        evaluations[row] = value;
                    }
                    domain.interpolate(evaluations)
                })
                .collect()
        };

        let u = interpolate_matrix(&self.a)?;
        trace!("Interpolated A columns");
        let v = interpolate_matrix(&self.b)?;
        trace!("Interpolated B columns");
        let w = interpolate_matrix(&self.c)?;
        trace!("Interpolated C columns");

        Ok(QAP {
            u,
            v,
            w,
            vanishing: domain.vanishing_polynomial(),
            domain,
            public_input_count: self.public_input_count,
        })
    }
}

impl<F: PrimeField> Valid for ConstraintSystem<F> {
    fn check(&self) -> Result<(), SerializationError> {
        self.validate().map_err(|_| SerializationError::InvalidData)
    }
}

impl<F: PrimeField> CanonicalDeserialize for ConstraintSystem<F> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let cs = ConstraintSystem {
            constraint_count: usize::deserialize_with_mode(&mut reader, compress, validate)?,
            variable_count: usize::deserialize_with_mode(&mut reader, compress, validate)?,
            public_input_count: usize::deserialize_with_mode(&mut reader, compress, validate)?,
            a: SparseMatrix::deserialize_with_mode(&mut reader, compress, validate)?,
            b: SparseMatrix::deserialize_with_mode(&mut reader, compress, validate)?,
            c: SparseMatrix::deserialize_with_mode(&mut reader, compress, validate)?,
        };
        if let Validate::Yes = validate {
            cs.check()?;
        }
        Ok(cs)
    }
}

/// Quadratic arithmetic program: one polynomial per variable for each of A, B and C, interpolated
/// over an evaluation domain, together with the domain's vanishing polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QAP<F>
where
    F: FftField,
{
    /// LHS of multiplication
    pub u: Vec<Polynomial<F>>,
    /// RHS of multiplication
    pub v: Vec<Polynomial<F>>,
    /// Output
    pub w: Vec<Polynomial<F>>,
    /// `Z(x) = x^d - 1`
    pub vanishing: Polynomial<F>,
    pub domain: EvaluationDomain<F>,
    pub public_input_count: usize,
}

/// Every QAP polynomial evaluated at one point. When that point is the setup's τ these values are
/// as sensitive as τ itself, so they are wiped on drop.
pub struct QapEvaluation<F: Field> {
    pub u: Vec<F>,
    pub v: Vec<F>,
    pub w: Vec<F>,
    pub vanishing: F,
}

impl<F: Field> Zeroize for QapEvaluation<F> {
    fn zeroize(&mut self) {
        self.u.zeroize();
        self.v.zeroize();
        self.w.zeroize();
        self.vanishing.zeroize();
    }
}

impl<F: Field> Drop for QapEvaluation<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<F: Field> ZeroizeOnDrop for QapEvaluation<F> {}

impl<F: FftField> QAP<F> {
    /// Size of the evaluation domain.
    pub fn degree(&self) -> usize {
        self.domain.size()
    }

    pub fn variable_count(&self) -> usize {
        self.u.len()
    }

    pub fn evaluate_at(&self, x: F) -> QapEvaluation<F> {
        let evaluate_all = |polys: &[Polynomial<F>]| -> Vec<F> {
            cfg_iter!(polys).map(|p| p.evaluate(x)).collect()
        };
        QapEvaluation {
            u: evaluate_all(&self.u),
            v: evaluate_all(&self.v),
            w: evaluate_all(&self.w),
            vanishing: self.domain.evaluate_vanishing_polynomial(x),
        }
    }

    /// Debugging check: whether `Σz_i·u_i · Σz_i·v_i - Σz_i·w_i` is divisible by `Z(x)`.
    pub fn is_satisfied(&self, z: &[F]) -> Result<bool> {
        if z.len() != self.variable_count() {
            return Err(Groth16Error::KeyWitnessSizeMismatch {
                expected: self.variable_count(),
                actual: z.len(),
            });
        }
        let combine = |polys: &[Polynomial<F>]| -> Polynomial<F> {
            polys.iter().zip(z).map(|(p, z_i)| p * *z_i).sum()
        };
        let target = &(&combine(&self.u) * &combine(&self.v)) - &combine(&self.w);
        let (_, remainder) = target.div_rem(&self.vanishing)?;
        Ok(remainder.is_zero())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ark_ff::{One, Zero};

    type Field = ark_bn254::Fr;

    /// `x * x = y` with `y` public at index 1 and `x` private at index 2. Index 3 is unused.
    pub(crate) fn square_circuit<F: PrimeField>() -> ConstraintSystem<F> {
        ConstraintSystem::build(
            1,
            4,
            1,
            [
                Entry::new(Matrix::A, 0, 2, F::one()),
                Entry::new(Matrix::B, 0, 2, F::one()),
                Entry::new(Matrix::C, 0, 1, F::one()),
            ],
        )
        .unwrap()
    }

    /// `out = x^3 + x + 5` with `out` public:
    /// `x * x = sym1`, `sym1 * x = y`, `(y + x + 5) * 1 = out`.
    /// Variables: `[1, out, x, sym1, y]`.
    pub(crate) fn cubic_circuit<F: PrimeField>() -> ConstraintSystem<F> {
        ConstraintSystem::build(
            3,
            5,
            1,
            [
                Entry::new(Matrix::A, 0, 2, F::one()),
                Entry::new(Matrix::B, 0, 2, F::one()),
                Entry::new(Matrix::C, 0, 3, F::one()),
                Entry::new(Matrix::A, 1, 3, F::one()),
                Entry::new(Matrix::B, 1, 2, F::one()),
                Entry::new(Matrix::C, 1, 4, F::one()),
                Entry::new(Matrix::A, 2, 4, F::one()),
                Entry::new(Matrix::A, 2, 2, F::one()),
                Entry::new(Matrix::A, 2, 0, F::from(5u64)),
                Entry::new(Matrix::B, 2, 0, F::one()),
                Entry::new(Matrix::C, 2, 1, F::one()),
            ],
        )
        .unwrap()
    }

    pub(crate) fn cubic_assignment<F: PrimeField>(x: u64) -> Vec<F> {
        let x = F::from(x);
        let sym1 = x * x;
        let y = sym1 * x;
        let out = y + x + F::from(5u64);
        vec![F::one(), out, x, sym1, y]
    }

    fn as_field(values: &[u64]) -> Vec<Field> {
        values.iter().map(|v| Field::from(*v)).collect()
    }

    #[test]
    fn build_rejects_out_of_range_entries() {
        let row = ConstraintSystem::build(1, 2, 0, [Entry::new(Matrix::A, 1, 0, Field::one())]);
        assert!(matches!(row, Err(Groth16Error::InvalidDimension(_))));
        let column = ConstraintSystem::build(1, 2, 0, [Entry::new(Matrix::C, 0, 2, Field::one())]);
        assert!(matches!(column, Err(Groth16Error::InvalidDimension(_))));
        let empty = ConstraintSystem::<Field>::build(0, 0, 0, []);
        assert!(matches!(empty, Err(Groth16Error::InvalidDimension(_))));
    }

    #[test]
    fn build_rejects_too_many_public_inputs() {
        for public_input_count in [4, 5] {
            let err = ConstraintSystem::<Field>::build(1, 4, public_input_count, []).unwrap_err();
            assert!(matches!(err, Groth16Error::InvalidPublicInputCount { .. }));
        }
        assert!(ConstraintSystem::<Field>::build(1, 4, 3, []).is_ok());
    }

    #[test]
    fn duplicate_entries_are_summed_and_zeros_dropped() -> Result<()> {
        let cs = ConstraintSystem::build(
            1,
            3,
            0,
            [
                Entry::new(Matrix::A, 0, 1, Field::from(2u64)),
                Entry::new(Matrix::A, 0, 1, Field::from(3u64)),
                Entry::new(Matrix::B, 0, 2, Field::one()),
                Entry::new(Matrix::B, 0, 2, -Field::one()),
                Entry::new(Matrix::C, 0, 0, Field::zero()),
            ],
        )?;
        assert_eq!(cs.matrix(Matrix::A).get(0, 1), Field::from(5u64));
        assert_eq!(cs.matrix(Matrix::B).nnz(), 0);
        assert_eq!(cs.matrix(Matrix::C).nnz(), 0);
        Ok(())
    }

    #[test]
    fn satisfaction_by_rows() {
        let cs = square_circuit::<Field>();
        assert_eq!(cs.first_unsatisfied_row(&as_field(&[1, 9, 3, 0])), None);
        assert_eq!(cs.first_unsatisfied_row(&as_field(&[1, 16, 3, 0])), Some(0));

        let cubic = cubic_circuit::<Field>();
        assert_eq!(cubic.first_unsatisfied_row(&cubic_assignment(3)), None);
        let mut broken = cubic_assignment::<Field>(3);
        broken[4] += Field::one();
        assert_eq!(cubic.first_unsatisfied_row(&broken), Some(1));
    }

    #[test]
    fn r1cs_to_qap_interpolates_columns() -> Result<()> {
        let cs = cubic_circuit::<Field>();
        let qap = cs.to_qap()?;
        assert_eq!(qap.degree(), 4);
        assert_eq!(qap.variable_count(), 5);

        let points: Vec<Field> = qap.domain.elements().collect();
        for (matrix, polys) in [(Matrix::A, &qap.u), (Matrix::B, &qap.v), (Matrix::C, &qap.w)] {
            for (column, poly) in polys.iter().enumerate() {
                assert!(poly.degree().is_none_or(|d| d < qap.degree()));
                for (row, x) in points.iter().enumerate() {
                    let expected = if row < cs.constraint_count() {
                        cs.matrix(matrix).get(row, column)
                    } else {
                        Field::zero()
                    };
                    assert_eq!(poly.evaluate(*x), expected);
                }
            }
        }
        for x in &points {
            assert!(qap.vanishing.evaluate(*x).is_zero());
        }
        Ok(())
    }

    #[test]
    fn qap_divisibility_tracks_satisfaction() -> Result<()> {
        let qap = cubic_circuit::<Field>().to_qap()?;
        assert!(qap.is_satisfied(&cubic_assignment(4))?);
        let mut broken = cubic_assignment::<Field>(4);
        broken[1] += Field::one();
        assert!(!qap.is_satisfied(&broken)?);
        assert!(qap.is_satisfied(&broken[..3]).is_err());
        Ok(())
    }

    #[test]
    fn empty_system_uses_single_point_domain() -> Result<()> {
        let cs = ConstraintSystem::<Field>::build(0, 1, 0, [])?;
        let qap = cs.to_qap()?;
        assert_eq!(qap.degree(), 1);
        assert!(qap.u[0].is_zero());
        Ok(())
    }

    #[test]
    fn serialization_validates_invariants() -> Result<()> {
        let cs = cubic_circuit::<Field>();
        let mut bytes = Vec::new();
        cs.serialize_compressed(&mut bytes).unwrap();
        let decoded = ConstraintSystem::<Field>::deserialize_compressed(&bytes[..]).unwrap();
        assert_eq!(decoded, cs);

        // Rewrite the variable count (second u64) so that existing entries fall out of range.
        let mut tampered = bytes.clone();
        tampered[8..16].copy_from_slice(&2u64.to_le_bytes());
        assert!(ConstraintSystem::<Field>::deserialize_compressed(&tampered[..]).is_err());
        Ok(())
    }
}
