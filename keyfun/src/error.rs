//! Errors shared by every component of the crate.
//!
//! There are only two kinds of failure: the input was malformed for the
//! operation ([`DomainError`]) or a Base58Check string failed its checksum
//! ([`ChecksumError`]). A structurally valid signature that does not verify is
//! not an error at all; verification returns `false`.
use crate::hex::HexError;
use core::fmt;

/// The input is malformed, ambiguous or outside the domain of the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A modulus was zero.
    InvalidModulus,
    /// The value shares a factor with the modulus so it has no inverse.
    NotInvertible,
    /// A set of curve parameters was rejected.
    InvalidCurve(&'static str),
    /// The coordinates do not satisfy the curve equation.
    PointNotOnCurve,
    /// No supported format matches the shape of the data.
    UnrecognizedFormat,
    /// The data has the wrong length for the requested format.
    InvalidLength {
        /// The length the format requires.
        expected: usize,
        /// The length that was provided.
        got: usize,
    },
    /// The data does not have the prefix or suffix byte the format requires.
    InvalidPrefix(u8),
    /// Invalid hex.
    Hex(HexError),
    /// A character outside the base-58 alphabet.
    InvalidBase58Character(char),
    /// Invalid base64 text.
    InvalidBase64,
    /// A DER signature that does not follow the `30 .. 02 .. 02 ..` layout.
    InvalidDer(&'static str),
    /// A recovery id that cannot be normalized into `0..=2`.
    InvalidRecoveryId(u8),
    /// The scalar was zero where a non-zero scalar is required.
    ZeroScalar,
    /// A value does not fit its fixed-width encoding.
    ValueTooLarge,
    /// The value has no representation in the requested format.
    NoEncoding(&'static str),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DomainError::*;
        match self {
            InvalidModulus => write!(f, "modulus must be positive"),
            NotInvertible => write!(f, "value has no inverse for this modulus"),
            InvalidCurve(reason) => write!(f, "invalid curve parameters: {}", reason),
            PointNotOnCurve => write!(f, "point not on curve"),
            UnrecognizedFormat => write!(f, "unrecognized format"),
            InvalidLength { expected, got } => {
                write!(f, "invalid length: expected {} got {}", expected, got)
            }
            InvalidPrefix(byte) => write!(f, "unexpected prefix/suffix byte 0x{:02x}", byte),
            Hex(e) => write!(f, "{}", e),
            InvalidBase58Character(c) => write!(f, "invalid base58 character {:?}", c),
            InvalidBase64 => write!(f, "invalid base64"),
            InvalidDer(reason) => write!(f, "invalid DER signature: {}", reason),
            InvalidRecoveryId(v) => write!(f, "invalid recovery id: {}", v),
            ZeroScalar => write!(f, "scalar must be non-zero"),
            ValueTooLarge => write!(f, "value too large for its encoding"),
            NoEncoding(what) => write!(f, "no encoding for {}", what),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<HexError> for DomainError {
    fn from(e: HexError) -> Self {
        DomainError::Hex(e)
    }
}

/// The trailing four bytes of a Base58Check string do not match the double
/// SHA-256 of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumError;

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "base58check checksum mismatch")
    }
}

impl std::error::Error for ChecksumError {}

/// Either kind of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// See [`DomainError`].
    Domain(DomainError),
    /// See [`ChecksumError`].
    Checksum(ChecksumError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Domain(e) => write!(f, "{}", e),
            Error::Checksum(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Domain(e) => Some(e),
            Error::Checksum(e) => Some(e),
        }
    }
}

impl From<DomainError> for Error {
    fn from(e: DomainError) -> Self {
        Error::Domain(e)
    }
}

impl From<ChecksumError> for Error {
    fn from(e: ChecksumError) -> Self {
        Error::Checksum(e)
    }
}

impl From<HexError> for Error {
    fn from(e: HexError) -> Self {
        Error::Domain(DomainError::Hex(e))
    }
}
