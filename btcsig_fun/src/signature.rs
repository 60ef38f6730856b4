use crate::der::Signature;
use base64::{Engine, engine::general_purpose::STANDARD};
use core::{fmt, str::FromStr};
use keyfun::DomainError;
use num_bigint::BigUint;

const HEADER_BASE: u8 = 27;
const COMPRESSED_OFFSET: u8 = 4;
const MAX_ID: u8 = 2;

/// Which of the up to four points with x-coordinate congruent to `r` is the
/// signature's `R`, and whether the signer's public key was compressed.
///
/// Bit 0 of `id` is the parity of `R.y`. Bit 1 is set when `R.x ≥ n`, i.e.
/// `R.x = r + n`. An overflowed `R` with odd `y` (id 3) is not representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecoveryId {
    id: u8,
    compressed: bool,
}

impl RecoveryId {
    /// Makes a recovery id. `id` must be in `0..=2`.
    pub fn new(id: u8, compressed: bool) -> Result<Self, DomainError> {
        if id > MAX_ID {
            return Err(DomainError::InvalidRecoveryId(id));
        }
        Ok(RecoveryId { id, compressed })
    }

    /// Interprets the first byte of a compact signature.
    ///
    /// `27..=29` are uncompressed, `31..=33` are compressed and a bare
    /// `0..=2` is taken as uncompressed.
    ///
    /// ```
    /// use btcsig_fun::RecoveryId;
    /// let id = RecoveryId::from_header(32).unwrap();
    /// assert_eq!((id.id(), id.is_compressed()), (1, true));
    /// assert!(RecoveryId::from_header(34).is_err());
    /// ```
    pub fn from_header(header: u8) -> Result<Self, DomainError> {
        match header {
            0..=MAX_ID => RecoveryId::new(header, false),
            27..=29 => RecoveryId::new(header - HEADER_BASE, false),
            31..=33 => RecoveryId::new(header - HEADER_BASE - COMPRESSED_OFFSET, true),
            other => Err(DomainError::InvalidRecoveryId(other)),
        }
    }

    /// The header byte: `27 + id`, plus 4 if the key was compressed.
    pub fn to_header(self) -> u8 {
        HEADER_BASE + self.id + if self.compressed { COMPRESSED_OFFSET } else { 0 }
    }

    /// The id in `0..=2`.
    pub fn id(self) -> u8 {
        self.id
    }

    /// Whether the signer's public key was compressed.
    pub fn is_compressed(self) -> bool {
        self.compressed
    }

    /// Whether `R.y` is odd.
    pub fn is_y_odd(self) -> bool {
        self.id & 1 == 1
    }

    /// Whether `R.x` overflowed the group order.
    pub fn is_x_overflow(self) -> bool {
        self.id & 2 == 2
    }

    /// The same id for the negated `R` (used when `s` is negated). Fails for
    /// an overflowed `R` since its negation would need id 3.
    pub fn flip_parity(self) -> Result<Self, DomainError> {
        RecoveryId::new(self.id ^ 1, self.compressed)
    }
}

/// A compact recoverable signature: a header byte followed by `r` and `s`,
/// 65 bytes in all, usually passed around as base64.
///
/// `r` and `s` are big-endian and not range checked here; verification
/// rejects values outside `[1, n)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecoverableSignature {
    /// The recovery id and compression flag.
    pub recovery_id: RecoveryId,
    /// The x-coordinate of `R` reduced mod `n`.
    pub r: [u8; 32],
    /// The signature scalar.
    pub s: [u8; 32],
}

impl RecoverableSignature {
    /// The 65-byte wire form.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0] = self.recovery_id.to_header();
        bytes[1..33].copy_from_slice(&self.r);
        bytes[33..65].copy_from_slice(&self.s);
        bytes
    }

    /// Parses the 65-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        if bytes.len() != 65 {
            return Err(DomainError::InvalidLength {
                expected: 65,
                got: bytes.len(),
            });
        }
        let recovery_id = RecoveryId::from_header(bytes[0])?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);
        Ok(RecoverableSignature { recovery_id, r, s })
    }

    /// The wire form in standard (padded) base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parses base64 text.
    ///
    /// ```
    /// use btcsig_fun::RecoverableSignature;
    /// let sig = RecoverableSignature::from_base64(
    ///     "H/VExaH8AVzz4XW4tzUL3Sq762O6qH4NedIM0T+JHJlDTz3a8kSwGB7G4B3k86OJwG8vJeGgxRDOFMBY+125+ZU=",
    /// )
    /// .unwrap();
    /// assert!(sig.recovery_id.is_compressed());
    /// assert_eq!(sig.recovery_id.id(), 0);
    /// ```
    pub fn from_base64(text: &str) -> Result<Self, DomainError> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|_| DomainError::InvalidBase64)?;
        Self::from_bytes(&bytes)
    }

    /// `r` as an integer.
    pub fn r_int(&self) -> BigUint {
        BigUint::from_bytes_be(&self.r)
    }

    /// `s` as an integer.
    pub fn s_int(&self) -> BigUint {
        BigUint::from_bytes_be(&self.s)
    }

    /// Drops the recovery id, leaving the `(r, s)` pair that DER encodes.
    pub fn to_signature(&self) -> Signature {
        Signature {
            r: self.r,
            s: self.s,
        }
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_base64())
    }
}

impl FromStr for RecoverableSignature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecoverableSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(serde::de::Error::custom)
    }
}
