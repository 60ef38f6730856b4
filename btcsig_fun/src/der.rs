//! A narrow DER codec for `(r, s)` signature pairs.
//!
//! The encoding is `30 L 02 Lr r 02 Ls s` where `r` and `s` are minimal
//! big-endian integers with a `00` byte in front when their top bit is set.
//! Since `r` and `s` are at most 32 bytes every length fits in a single byte,
//! so decoding reads the lengths from fixed offsets. This is not a general
//! ASN.1 parser: long-form lengths and trailing data after `s` are rejected
//! rather than interpreted.
use core::{fmt, str::FromStr};
use keyfun::{DomainError, hex};
use num_bigint::BigUint;

const SEQUENCE: u8 = 0x30;
const INTEGER: u8 = 0x02;

/// An ECDSA signature without a recovery id.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// `R.x mod n`, big-endian.
    pub r: [u8; 32],
    /// The signature scalar, big-endian.
    pub s: [u8; 32],
}

fn der_integer(value: &[u8; 32], out: &mut Vec<u8>) {
    let start = value.iter().position(|byte| *byte != 0).unwrap_or(31);
    let digits = &value[start..];
    let pad = digits[0] & 0x80 != 0;
    out.push(INTEGER);
    out.push((digits.len() + pad as usize) as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(digits);
}

fn parse_integer(bytes: &[u8], at: usize) -> Result<([u8; 32], usize), DomainError> {
    if bytes.get(at) != Some(&INTEGER) {
        return Err(DomainError::InvalidDer("expected an INTEGER"));
    }
    let len = *bytes
        .get(at + 1)
        .ok_or(DomainError::InvalidDer("truncated INTEGER"))? as usize;
    let body = bytes
        .get(at + 2..at + 2 + len)
        .ok_or(DomainError::InvalidDer("truncated INTEGER"))?;
    let start = body.iter().position(|byte| *byte != 0).unwrap_or(body.len());
    let digits = &body[start..];
    if digits.len() > 32 {
        return Err(DomainError::InvalidDer("INTEGER longer than 32 bytes"));
    }
    let mut value = [0u8; 32];
    value[32 - digits.len()..].copy_from_slice(digits);
    Ok((value, at + 2 + len))
}

impl Signature {
    /// Builds a signature from integers. Fails with
    /// [`DomainError::ValueTooLarge`] if either does not fit in 32 bytes.
    pub fn from_ints(r: &BigUint, s: &BigUint) -> Result<Self, DomainError> {
        let mut bytes = [[0u8; 32]; 2];
        for (out, value) in bytes.iter_mut().zip([r, s]) {
            let be = value.to_bytes_be();
            if be.len() > 32 {
                return Err(DomainError::ValueTooLarge);
            }
            out[32 - be.len()..].copy_from_slice(&be);
        }
        Ok(Signature {
            r: bytes[0],
            s: bytes[1],
        })
    }

    /// `r` and `s` as integers.
    pub fn as_tuple(&self) -> (BigUint, BigUint) {
        (
            BigUint::from_bytes_be(&self.r),
            BigUint::from_bytes_be(&self.s),
        )
    }

    /// The DER encoding.
    ///
    /// ```
    /// use btcsig_fun::Signature;
    /// use num_bigint::BigUint;
    /// let sig = Signature::from_ints(&BigUint::from(0x80u32), &BigUint::from(1u32)).unwrap();
    /// assert_eq!(sig.to_der_hex(), "300702020080020101");
    /// ```
    pub fn to_der(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(70);
        der_integer(&self.r, &mut body);
        der_integer(&self.s, &mut body);
        let mut der = Vec::with_capacity(body.len() + 2);
        der.push(SEQUENCE);
        der.push(body.len() as u8);
        der.extend_from_slice(&body);
        der
    }

    /// Decodes the layout produced by [`to_der`](Self::to_der).
    pub fn from_der(bytes: &[u8]) -> Result<Self, DomainError> {
        if bytes.first() != Some(&SEQUENCE) {
            return Err(DomainError::InvalidDer("expected a SEQUENCE"));
        }
        match bytes.get(1) {
            Some(len) if *len as usize == bytes.len() - 2 => {}
            _ => return Err(DomainError::InvalidDer("SEQUENCE length mismatch")),
        }
        let (r, next) = parse_integer(bytes, 2)?;
        let (s, end) = parse_integer(bytes, next)?;
        if end != bytes.len() {
            return Err(DomainError::InvalidDer("trailing bytes"));
        }
        Ok(Signature { r, s })
    }

    /// The DER encoding as lowercase hex.
    pub fn to_der_hex(&self) -> String {
        hex::encode(&self.to_der())
    }

    /// Decodes DER given as hex.
    pub fn from_der_hex(text: &str) -> Result<Self, DomainError> {
        Self::from_der(&hex::decode(text)?)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_der_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Signature({})", self.to_der_hex())
    }
}

impl FromStr for Signature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_der_hex(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_der_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_der_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sig(r: &str, s: &str) -> Signature {
        Signature {
            r: hex::decode_array(r).unwrap(),
            s: hex::decode_array(s).unwrap(),
        }
    }

    const R_HIGH: &str = "f544c5a1fc015cf3e175b8b7350bdd2abbeb63baa87e0d79d20cd13f891c9943";
    const S_LOW: &str = "4f3ddaf244b0181ec6e01de4f3a389c06f2f25e1a0c510ce14c058fb5db9f995";

    #[test]
    fn high_bit_gets_padded() {
        let signature = sig(R_HIGH, S_LOW);
        let der = signature.to_der_hex();
        assert_eq!(der, format!("3045022100{}0220{}", R_HIGH, S_LOW));
        assert_eq!(Signature::from_der_hex(&der).unwrap(), signature);

        let swapped = sig(S_LOW, R_HIGH);
        let der = swapped.to_der_hex();
        assert_eq!(der, format!("30450220{}022100{}", S_LOW, R_HIGH));
        assert_eq!(Signature::from_der_hex(&der).unwrap(), swapped);
    }

    #[test]
    fn both_high_and_both_low() {
        let high = sig(R_HIGH, R_HIGH);
        assert_eq!(high.to_der().len(), 2 + 2 * 35);
        assert_eq!(Signature::from_der(&high.to_der()).unwrap(), high);
        let low = sig(S_LOW, S_LOW);
        assert_eq!(low.to_der().len(), 2 + 2 * 34);
        assert_eq!(Signature::from_der(&low.to_der()).unwrap(), low);
    }

    #[test]
    fn leading_zero_bytes_are_stripped() {
        let signature = Signature::from_ints(&BigUint::from(0x0100u32), &BigUint::from(0x7fu32))
            .unwrap();
        assert_eq!(signature.to_der_hex(), "30070202010002017f");
        assert_eq!(
            Signature::from_der_hex(&signature.to_der_hex()).unwrap(),
            signature
        );
        assert_eq!(
            signature.as_tuple(),
            (BigUint::from(0x0100u32), BigUint::from(0x7fu32))
        );
    }

    #[test]
    fn malformed_der() {
        let good = sig(R_HIGH, S_LOW).to_der();
        assert!(matches!(Signature::from_der(&[]), Err(DomainError::InvalidDer(_))));
        let mut wrong_tag = good.clone();
        wrong_tag[0] = 0x31;
        assert!(Signature::from_der(&wrong_tag).is_err());
        assert!(Signature::from_der(&good[..good.len() - 1]).is_err());
        let mut trailing = good.clone();
        trailing.push(0);
        assert!(Signature::from_der(&trailing).is_err());
        assert!(matches!(
            Signature::from_der_hex("zz"),
            Err(DomainError::Hex(_))
        ));
        assert_eq!(
            Signature::from_ints(&(BigUint::from(1u32) << 256), &BigUint::from(1u32)),
            Err(DomainError::ValueTooLarge)
        );
    }
}
