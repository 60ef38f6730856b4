//! Hex encoding and decoding for keys, digests and DER signatures.
//!
//! Encoding always produces lowercase. Decoding accepts either case.
use core::fmt;

/// Error representing a failed conversion from hex into bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// The string contained a character that is not a hex digit.
    InvalidHex,
    /// The string had an odd number of characters.
    OddLength,
    /// The string was not the right length for the target type.
    InvalidLength,
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use HexError::*;
        match self {
            InvalidHex => write!(f, "invalid hex string"),
            OddLength => write!(f, "hex string had an odd length"),
            InvalidLength => write!(f, "hex string had the wrong length for the target type"),
        }
    }
}

impl std::error::Error for HexError {}

const DIGITS: &[u8; 16] = b"0123456789abcdef";

fn nibble(c: u8) -> Result<u8, HexError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(HexError::InvalidHex),
    }
}

/// Encode some bytes as a lowercase hex `String`.
///
/// # Examples
/// ```
/// use keyfun::hex;
/// assert_eq!(hex::encode(&[0x02, 0xab, 0xff]), "02abff");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push(DIGITS[(byte >> 4) as usize] as char);
        hex.push(DIGITS[(byte & 0x0f) as usize] as char);
    }
    hex
}

/// Decode a hex string into a `Vec<u8>`.
///
/// # Examples
/// ```
/// use keyfun::hex;
/// assert_eq!(hex::decode("02ABff").unwrap(), vec![0x02, 0xab, 0xff]);
/// assert!(hex::decode("0").is_err());
/// ```
pub fn decode(hex: &str) -> Result<Vec<u8>, HexError> {
    let hex = hex.as_bytes();
    if hex.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }
    hex.chunks(2)
        .map(|pair| Ok(nibble(pair[0])? << 4 | nibble(pair[1])?))
        .collect()
}

/// Decode a hex string into a fixed length array.
pub fn decode_array<const N: usize>(hex: &str) -> Result<[u8; N], HexError> {
    if hex.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }
    if hex.len() != N * 2 {
        return Err(HexError::InvalidLength);
    }
    let mut bytes = [0u8; N];
    for (pair, byte) in hex.as_bytes().chunks(2).zip(bytes.iter_mut()) {
        *byte = nibble(pair[0])? << 4 | nibble(pair[1])?;
    }
    Ok(bytes)
}

/// Whether `s` is a non-empty, even-length string of hex digits.
pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|c| nibble(c).is_ok())
}
