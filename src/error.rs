use ark_serialize::SerializationError;

/// Broad classes of failure, used by callers to decide whether retrying with different input makes
/// sense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad dimensions or input counts. Fix the inputs and retry.
    Construction,
    /// Malformed encodings or a domain the field cannot support.
    Decoding,
    /// The assignment does not satisfy the constraint system.
    Satisfiability,
    /// Backend or environment fault. Not caused by the caller.
    Fatal,
}

/// Errors that can occur while building circuits and running setup, proving or verification.
#[derive(Debug, thiserror::Error)]
pub enum Groth16Error {
    /// A matrix entry or dimension does not fit the declared constraint system shape.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),
    /// More public inputs were declared than there are non-constant variables.
    #[error(
        "public input count {public_input_count} does not fit in {variable_count} variables (one slot is reserved for the constant wire)"
    )]
    InvalidPublicInputCount {
        public_input_count: usize,
        variable_count: usize,
    },
    /// The evaluation domain would exceed the largest power-of-two subgroup of the scalar field.
    #[error("evaluation domain of size {size} exceeds the maximum supported size {max}")]
    DomainTooLarge { size: usize, max: usize },
    /// A sampled toxic waste value had no inverse.
    #[error("toxic waste value {0} is not invertible")]
    SingularToxicWaste(&'static str),
    /// The number of supplied inputs does not match the circuit.
    #[error("expected {expected} {what}, got {actual}")]
    InputCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// The witness violates the constraint in the given row.
    #[error("witness does not satisfy constraint {0}")]
    UnsatisfiedConstraint(usize),
    /// The quotient polynomial division left a non-zero remainder; the first offending domain point
    /// is reported.
    #[error("witness is not satisfying: A(x)B(x) - C(x) is not divisible by Z(x) (row {row})")]
    WitnessNotSatisfying { row: usize },
    /// The witness length disagrees with the number of variables in the proving key.
    #[error("proving key expects {expected} variables, witness has {actual}")]
    KeyWitnessSizeMismatch { expected: usize, actual: usize },
    /// Malformed field element, point, key or proof encoding.
    #[error("decode error: {0}")]
    DecodeError(String),
    /// Writing an encoding failed.
    #[error("encode error: {0}")]
    EncodeError(String),
    /// The random source kept producing zero scalars.
    #[error("sampled a zero scalar {attempts} times in a row")]
    SamplingFailed { attempts: u32 },
    /// The pairing backend did not return an element of the target group.
    #[error("final exponentiation returned no target group element")]
    PairingFailure,
    /// An internal invariant was violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Groth16Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Groth16Error::InvalidDimension(_)
            | Groth16Error::InvalidPublicInputCount { .. }
            | Groth16Error::InputCountMismatch { .. }
            | Groth16Error::KeyWitnessSizeMismatch { .. } => ErrorCategory::Construction,
            Groth16Error::DomainTooLarge { .. }
            | Groth16Error::DecodeError(_)
            | Groth16Error::EncodeError(_) => ErrorCategory::Decoding,
            Groth16Error::UnsatisfiedConstraint(_) | Groth16Error::WitnessNotSatisfying { .. } => {
                ErrorCategory::Satisfiability
            }
            Groth16Error::SingularToxicWaste(_)
            | Groth16Error::SamplingFailed { .. }
            | Groth16Error::PairingFailure
            | Groth16Error::Internal(_) => ErrorCategory::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Fatal
    }

    pub(crate) fn decode(err: SerializationError) -> Self {
        Groth16Error::DecodeError(err.to_string())
    }
}

pub type Result<T, E = Groth16Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            Groth16Error::UnsatisfiedConstraint(3).category(),
            ErrorCategory::Satisfiability
        );
        assert_eq!(
            Groth16Error::DecodeError("bad".into()).category(),
            ErrorCategory::Decoding
        );
        assert!(Groth16Error::PairingFailure.is_fatal());
        assert!(!Groth16Error::InvalidDimension("row".into()).is_fatal());
    }

    #[test]
    fn display_mentions_row() {
        let err = Groth16Error::UnsatisfiedConstraint(7);
        assert!(err.to_string().contains('7'));
    }
}
