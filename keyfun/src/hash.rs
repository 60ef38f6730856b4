//! Generally useful utilities related to hashing.
//!
//! The digest functions here are the fixed set Bitcoin needs: SHA-256,
//! double SHA-256, RIPEMD-160, HASH160, the signed-message digest and a
//! deliberately slow iterated SHA-256. Each has a `_hex` twin returning lowercase
//! hex. Hashing of structured values is done through [`HashInto`] and
//! [`HashAdd`] which are defined against the [`Digest`] trait from the
//! [`RustCrypto`] project.
//!
//! [`Digest`]: digest::Digest
//! [`RustCrypto`]: https://github.com/RustCrypto/hashes
use crate::{Point, Scalar, hex};
use digest::Digest;
use num_bigint::BigUint;
use ripemd::Ripemd160;
use sha2::Sha256;

/// The framing prepended to a message before it is hashed for signing.
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// Number of rounds of [`slow_hash`].
pub const SLOW_HASH_ROUNDS: usize = 100_000;

/// Anything that can be hashed.
///
/// The implementations of this trait decide how the type will be converted into
/// bytes so that it can be included in the hash.
///
/// # Example
///
/// ```
/// use digest::Digest;
/// use keyfun::hash::{HashAdd, HashInto};
/// struct CryptoData([u8; 42]);
///
/// impl HashInto for CryptoData {
///     fn hash_into(&self, hash: &mut impl digest::Digest) {
///         hash.update(&self.0[..])
///     }
/// }
///
/// let cryptodata = CryptoData([42u8; 42]);
/// let hash = sha2::Sha256::default().add(&cryptodata).finalize();
/// ```
pub trait HashInto {
    /// Asks the item to convert itself to bytes and add itself to `hash`.
    fn hash_into(&self, hash: &mut impl digest::Digest);
}

impl HashInto for [u8] {
    fn hash_into(&self, hash: &mut impl digest::Digest) {
        hash.update(self)
    }
}

impl HashInto for str {
    fn hash_into(&self, hash: &mut impl digest::Digest) {
        hash.update(self.as_bytes())
    }
}

impl HashInto for u8 {
    fn hash_into(&self, hash: &mut impl digest::Digest) {
        hash.update([*self])
    }
}

impl<const N: usize> HashInto for [u8; N] {
    fn hash_into(&self, hash: &mut impl digest::Digest) {
        hash.update(self)
    }
}

impl HashInto for Scalar {
    fn hash_into(&self, hash: &mut impl digest::Digest) {
        hash.update(self.to_bytes())
    }
}

impl HashInto for Point {
    fn hash_into(&self, hash: &mut impl digest::Digest) {
        hash.update(self.to_bytes())
    }
}

/// Extension trait for [`digest::Digest`] to make adding things to the hash convenient.
pub trait HashAdd {
    /// Converts something that implements [`HashInto`] to bytes and then incorporate the result into the digest (`self`).
    fn add<HI: HashInto + ?Sized>(self, data: &HI) -> Self;
}

impl<D: Digest> HashAdd for D {
    fn add<HI: HashInto + ?Sized>(mut self, data: &HI) -> Self {
        data.hash_into(&mut self);
        self
    }
}

/// SHA-256.
///
/// ```
/// use keyfun::hash::sha256_hex;
/// assert_eq!(
///     sha256_hex(b"abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::default().add(data).finalize().into()
}

/// SHA-256 applied twice.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::default().add(&sha256(data)).finalize().into()
}

/// RIPEMD-160.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::default().add(data).finalize().into()
}

/// `RIPEMD-160(SHA-256(data))`, the hash committed to by an address.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::default().add(&sha256(data)).finalize().into()
}

/// An iterated SHA-256 for stretching low-entropy input: starting from
/// `state = data`, each of the [`SLOW_HASH_ROUNDS`] rounds computes
/// `state = SHA-256(state ‖ data)`.
pub fn slow_hash(data: &[u8]) -> [u8; 32] {
    let mut state = Sha256::default().add(data).add(data).finalize();
    for _ in 1..SLOW_HASH_ROUNDS {
        state = Sha256::default().add(&state[..]).add(data).finalize();
    }
    state.into()
}

/// Bitcoin's compact-size integer encoding.
///
/// ```
/// use keyfun::hash::var_int;
/// assert_eq!(var_int(252), vec![0xfc]);
/// assert_eq!(var_int(253), vec![0xfd, 0xfd, 0x00]);
/// assert_eq!(var_int(0x1_0000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
/// ```
pub fn var_int(value: u64) -> Vec<u8> {
    match value {
        0..=252 => vec![value as u8],
        253..=0xffff => {
            let mut out = vec![0xfd];
            out.extend_from_slice(&(value as u16).to_le_bytes());
            out
        }
        0x1_0000..=0xffff_ffff => {
            let mut out = vec![0xfe];
            out.extend_from_slice(&(value as u32).to_le_bytes());
            out
        }
        _ => {
            let mut out = vec![0xff];
            out.extend_from_slice(&value.to_le_bytes());
            out
        }
    }
}

/// The digest a "signed message" commits to:
/// `SHA-256d("\x18Bitcoin Signed Message:\n" ‖ var_int(len) ‖ message)`.
pub fn electrum_message_digest(message: &[u8]) -> [u8; 32] {
    let inner = Sha256::default()
        .add(SIGNED_MESSAGE_PREFIX)
        .add(&var_int(message.len() as u64)[..])
        .add(message)
        .finalize();
    Sha256::default().add(&inner[..]).finalize().into()
}

/// Hex variant of [`sha256`].
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(&sha256(data))
}

/// Hex variant of [`double_sha256`].
pub fn double_sha256_hex(data: &[u8]) -> String {
    hex::encode(&double_sha256(data))
}

/// Hex variant of [`ripemd160`].
pub fn ripemd160_hex(data: &[u8]) -> String {
    hex::encode(&ripemd160(data))
}

/// Hex variant of [`hash160`].
pub fn hash160_hex(data: &[u8]) -> String {
    hex::encode(&hash160(data))
}

/// Hex variant of [`slow_hash`].
pub fn slow_hash_hex(data: &[u8]) -> String {
    hex::encode(&slow_hash(data))
}

/// Interprets a digest as a big-endian integer.
///
/// A 40 or 64 character hex string (a hex RIPEMD-160 or SHA-256 digest) is
/// decoded from hex first; anything else is taken to be the raw digest bytes.
pub fn hash_to_int(digest: &[u8]) -> BigUint {
    if matches!(digest.len(), 40 | 64) {
        if let Some(value) = core::str::from_utf8(digest)
            .ok()
            .filter(|text| hex::is_hex(text))
            .and_then(|text| BigUint::parse_bytes(text.as_bytes(), 16))
        {
            return value;
        }
    }
    BigUint::from_bytes_be(digest)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            double_sha256_hex(b"hello"),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
        assert_eq!(ripemd160_hex(b""), "9c1185a5c5e9fc54612808977ee8f548b2258d31");
        assert_eq!(
            hash160_hex(b"hello"),
            "b6a9c8c230722b7c748331a8b450f05566dc7d0f"
        );
    }

    #[test]
    fn signed_message_digest() {
        assert_eq!(
            hex::encode(&electrum_message_digest(b"hello")),
            "cf0447ec85f0ce7150a257db32ebfcb7523dae17c36dbd1be598779fec0484f4"
        );
    }

    #[test]
    fn slow_hash_vector() {
        assert_eq!(
            slow_hash_hex(b"hello"),
            "3434f74dfea7cfc35ff945f349fdc790b00457ad8d0ec6d8b7daedea852ff35c"
        );
    }

    #[test]
    fn var_int_boundaries() {
        assert_eq!(var_int(0), vec![0x00]);
        assert_eq!(var_int(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(var_int(0xffff_ffff), vec![0xfe, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(
            var_int(0x1_0000_0000),
            vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn hash_to_int_accepts_hex_or_bytes() {
        let digest = sha256(b"abc");
        let from_bytes = hash_to_int(&digest);
        let from_hex = hash_to_int(hex::encode(&digest).as_bytes());
        assert_eq!(from_bytes, from_hex);
        assert_eq!(hash_to_int(&[0x01, 0x00]), BigUint::from(256u32));
    }
}
