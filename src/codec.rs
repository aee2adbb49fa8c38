//! Text and byte encodings for field elements, keys and proofs.
//!
//! Field elements travel as big-endian hex strings. Curve points, keys and proofs use the
//! arkworks canonical encoding and are always validated (on curve, in the prime-order subgroup)
//! when decoded.

use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Validate};

use crate::config::PointEncoding;
use crate::error::{Groth16Error, Result};

/// Canonical byte length of an element of `F`.
fn field_byte_len<F: PrimeField>() -> usize {
    F::zero().compressed_size()
}

/// Parse a big-endian hex field element. A `0x` prefix and an odd number of digits are accepted;
/// an empty string, more bytes than the canonical length or a value not below the modulus are not.
pub fn field_from_hex<F: PrimeField>(text: &str) -> Result<F> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return Err(Groth16Error::DecodeError(format!(
            "empty field element {text:?}"
        )));
    }
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    let mut bytes = hex::decode(digits)
        .map_err(|err| Groth16Error::DecodeError(format!("field element {text:?}: {err}")))?;

    let size = field_byte_len::<F>();
    if bytes.len() > size {
        return Err(Groth16Error::DecodeError(format!(
            "field element {text:?} is {} bytes, at most {size} allowed",
            bytes.len()
        )));
    }
    bytes.reverse();
    bytes.resize(size, 0);
    F::deserialize_compressed(&bytes[..]).map_err(|_| {
        Groth16Error::DecodeError(format!("field element {text:?} is not below the modulus"))
    })
}

/// `0x`-prefixed big-endian hex of the canonical representative, padded to the canonical length.
pub fn field_to_hex<F: PrimeField>(value: &F) -> Result<String> {
    let mut bytes = Vec::with_capacity(field_byte_len::<F>());
    value
        .serialize_compressed(&mut bytes)
        .map_err(|err| Groth16Error::EncodeError(err.to_string()))?;
    bytes.reverse();
    Ok(format!("0x{}", hex::encode(bytes)))
}

pub fn fields_from_hex<F: PrimeField>(values: &[impl AsRef<str>]) -> Result<Vec<F>> {
    values
        .iter()
        .map(|value| field_from_hex(value.as_ref()))
        .collect()
}

/// Canonical encoding of a key, proof or point.
pub fn to_bytes<T: CanonicalSerialize>(value: &T, encoding: PointEncoding) -> Result<Vec<u8>> {
    let compress = encoding.into();
    let mut bytes = Vec::with_capacity(value.serialized_size(compress));
    value
        .serialize_with_mode(&mut bytes, compress)
        .map_err(|err| Groth16Error::EncodeError(err.to_string()))?;
    Ok(bytes)
}

/// Decode and validate a key, proof or point. The whole input must be consumed.
pub fn from_bytes<T: CanonicalDeserialize>(bytes: &[u8], encoding: PointEncoding) -> Result<T> {
    let mut reader = bytes;
    let value = T::deserialize_with_mode(&mut reader, encoding.into(), Validate::Yes)
        .map_err(Groth16Error::decode)?;
    if !reader.is_empty() {
        return Err(Groth16Error::DecodeError(format!(
            "{} trailing bytes after encoded value",
            reader.len()
        )));
    }
    Ok(value)
}

pub fn to_hex<T: CanonicalSerialize>(value: &T, encoding: PointEncoding) -> Result<String> {
    Ok(hex::encode(to_bytes(value, encoding)?))
}

pub fn from_hex<T: CanonicalDeserialize>(text: &str, encoding: PointEncoding) -> Result<T> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(digits).map_err(|err| Groth16Error::DecodeError(err.to_string()))?;
    from_bytes(&bytes, encoding)
}
