//! Pay-to-public-key-hash addresses.
//!
//! An address is `Base58Check(magic, HASH160(public key bytes))` where the
//! public key bytes are the compressed or uncompressed binary encoding,
//! whichever the key is written in. The same point therefore has two
//! addresses.
use crate::{
    Curve, DomainError, Error, Point, base58,
    hash::hash160,
    keys::{EncodedPrivateKey, EncodedPublicKey, PrivateKey, PublicKey},
};

/// Address magic byte of the main network.
pub const MAINNET_MAGIC: u8 = 0x00;
/// Address magic byte of the test network.
pub const TESTNET_MAGIC: u8 = 0x6f;

/// The address of `point` under `magic`.
pub fn point_to_address(point: &Point, compressed: bool, magic: u8) -> String {
    let digest = if compressed {
        hash160(&point.to_bytes())
    } else {
        hash160(&point.to_bytes_uncompressed())
    };
    base58::encode(&digest, magic)
}

impl PublicKey {
    /// The address of this key. Keys in a compressed format hash their
    /// compressed encoding, everything else hashes the uncompressed one.
    pub fn to_address(&self, magic: u8) -> String {
        point_to_address(self.point(), self.is_compressed(), magic)
    }
}

/// The address of an encoded public key.
///
/// ```
/// use keyfun::{Curve, address::public_key_to_address, keys::EncodedPublicKey};
/// let curve = Curve::secp256k1();
/// let key = EncodedPublicKey::from(
///     "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2",
/// );
/// assert_eq!(
///     public_key_to_address(&curve, &key, 0x00).unwrap(),
///     "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma"
/// );
/// ```
pub fn public_key_to_address(
    curve: &Curve,
    key: &EncodedPublicKey,
    magic: u8,
) -> Result<String, DomainError> {
    Ok(PublicKey::decode(curve, key)?.to_address(magic))
}

/// The address of the public key of an encoded private key.
pub fn private_key_to_address(
    curve: &Curve,
    key: &EncodedPrivateKey,
    magic: u8,
) -> Result<String, Error> {
    Ok(PrivateKey::decode(curve, key)?
        .public_key(curve)?
        .to_address(magic))
}

/// Whether `text` looks like an address: `1`, `2`, `3`, `m` or `n` followed
/// by 26 to 33 base-58 characters. The checksum is not checked.
pub fn is_address(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some('1' | '2' | '3' | 'm' | 'n') => {}
        _ => return false,
    }
    let rest = chars.as_str();
    (26..=33).contains(&rest.len()) && rest.chars().all(base58::is_base58_char)
}
