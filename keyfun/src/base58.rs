//! Base58 and Base58Check.
//!
//! Base58Check is `base58(version ‖ payload ‖ checksum)` where `checksum` is the
//! first four bytes of the double SHA-256 of `version ‖ payload`. Each leading
//! zero byte of the encoded data is written as a leading `1`.
//!
//! ```
//! use keyfun::base58;
//! let address = base58::encode(&[0u8; 20], 0x00);
//! assert_eq!(address, "1111111111111111111114oLvT2");
//! assert_eq!(base58::decode(&address).unwrap(), (0x00, vec![0u8; 20]));
//! ```
use crate::{ChecksumError, DomainError, Error, hash::double_sha256, hex};
use num_bigint::BigUint;

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn digit(c: char) -> Result<u8, DomainError> {
    ALPHABET
        .iter()
        .position(|&a| a as char == c)
        .map(|i| i as u8)
        .ok_or(DomainError::InvalidBase58Character(c))
}

/// Whether `c` is in the base-58 alphabet.
pub fn is_base58_char(c: char) -> bool {
    c.is_ascii() && ALPHABET.contains(&(c as u8))
}

/// Plain base-58 with no version byte or checksum.
///
/// ```
/// use keyfun::base58;
/// assert_eq!(base58::encode_raw(b"hello world"), "StV1DL6CwTryKyV");
/// assert_eq!(base58::encode_raw(&[0, 0, 1]), "112");
/// ```
pub fn encode_raw(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let mut out = "1".repeat(zeros);
    let rest = &bytes[zeros..];
    if !rest.is_empty() {
        for d in BigUint::from_bytes_be(rest).to_radix_be(58) {
            out.push(ALPHABET[d as usize] as char);
        }
    }
    out
}

/// Inverse of [`encode_raw`].
pub fn decode_raw(text: &str) -> Result<Vec<u8>, DomainError> {
    let digits = text.chars().map(digit).collect::<Result<Vec<u8>, _>>()?;
    let zeros = digits.iter().take_while(|&&d| d == 0).count();
    let mut out = vec![0u8; zeros];
    let rest = &digits[zeros..];
    if !rest.is_empty() {
        let value = BigUint::from_radix_be(rest, 58).ok_or(DomainError::UnrecognizedFormat)?;
        out.extend_from_slice(&value.to_bytes_be());
    }
    Ok(out)
}

fn checksum(data: &[u8]) -> [u8; 4] {
    let hash = double_sha256(data);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Base58Check-encodes `payload` under `version`.
pub fn encode(payload: &[u8], version: u8) -> String {
    let mut data = Vec::with_capacity(payload.len() + 5);
    data.push(version);
    data.extend_from_slice(payload);
    let check = checksum(&data);
    data.extend_from_slice(&check);
    encode_raw(&data)
}

/// Decodes a Base58Check string into its version byte and payload.
///
/// Fails with a [`ChecksumError`] if the checksum doesn't match and a
/// [`DomainError`] if the text isn't base-58 or is too short to hold a
/// version byte and checksum.
pub fn decode(text: &str) -> Result<(u8, Vec<u8>), Error> {
    let data = decode_raw(text)?;
    if data.len() < 5 {
        return Err(DomainError::InvalidLength {
            expected: 5,
            got: data.len(),
        }
        .into());
    }
    let (body, check) = data.split_at(data.len() - 4);
    if checksum(body) != check {
        return Err(ChecksumError.into());
    }
    Ok((body[0], body[1..].to_vec()))
}

/// Decodes a Base58Check string and returns only its version byte.
///
/// ```
/// use keyfun::base58;
/// assert_eq!(base58::extract_version_byte("mtQ6C2A8hVabXxzskNatUNCe7A8qaqEG73").unwrap(), 0x6f);
/// ```
pub fn extract_version_byte(text: &str) -> Result<u8, Error> {
    decode(text).map(|(version, _)| version)
}

/// [`encode`] for a hex payload.
pub fn hex_to_base58check(payload_hex: &str, version: u8) -> Result<String, DomainError> {
    Ok(encode(&hex::decode(payload_hex)?, version))
}

/// [`decode`] returning the payload as hex and dropping the version byte.
pub fn base58check_to_hex(text: &str) -> Result<String, Error> {
    decode(text).map(|(_, payload)| hex::encode(&payload))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn raw_round_trip_with_leading_zeros() {
        for bytes in [&[][..], &[0][..], &[0, 0, 0xff][..], &[1, 2, 3, 0][..], &[0xff; 40][..]] {
            assert_eq!(decode_raw(&encode_raw(bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn known_address() {
        let hash160 = hex::decode("3442193e1bb70916e914552172cd4e2dbc9df811").unwrap();
        assert_eq!(encode(&hash160, 0), "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma");
        assert_eq!(
            base58check_to_hex("15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma").unwrap(),
            "3442193e1bb70916e914552172cd4e2dbc9df811"
        );
        assert_eq!(
            hex_to_base58check("3442193e1bb70916e914552172cd4e2dbc9df811", 0).unwrap(),
            "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma"
        );
    }

    #[test]
    fn every_single_character_corruption_is_caught() {
        let encoded = encode(b"some payload", 0x80);
        for (i, c) in encoded.char_indices() {
            let replacement = if c == '2' { '3' } else { '2' };
            let mut corrupted = encoded.clone();
            corrupted.replace_range(i..i + 1, &replacement.to_string());
            assert_eq!(
                decode(&corrupted),
                Err(Error::Checksum(ChecksumError)),
                "position {}",
                i
            );
        }
    }

    #[test]
    fn bad_input() {
        assert_eq!(
            decode("0OIl"),
            Err(Error::Domain(DomainError::InvalidBase58Character('0')))
        );
        assert!(matches!(
            decode("1111"),
            Err(Error::Domain(DomainError::InvalidLength { .. }))
        ));
        assert_eq!(
            decode("15mKKb2eos1hWa6tisdPwwDC1a5J1y9nmb"),
            Err(Error::Checksum(ChecksumError))
        );
    }
}
