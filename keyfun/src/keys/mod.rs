//! Private and public keys in the encodings Bitcoin software passes around.
//!
//! A key arrives as an [`EncodedPrivateKey`] or [`EncodedPublicKey`]: an
//! integer (or pair of integers), a byte string or a text string. Its format is
//! either given explicitly or detected from its shape by walking a fixed
//! priority list ([`PrivateKeyFormat::DETECTION_ORDER`] and
//! [`PublicKeyFormat::DETECTION_ORDER`]). The format is metadata carried next
//! to the decoded [`Scalar`] or [`Point`] in a [`PrivateKey`] or [`PublicKey`]
//! so arithmetic can hand results back in the caller's format.
//!
//! ```
//! use keyfun::{Curve, keys::*};
//! let curve = Curve::secp256k1();
//! let wif = EncodedPrivateKey::from("KzpjABzbCjoxyhxzweCzGG3fqpKgbgJpsJeTqGV37f2KN7RM9eGD");
//! assert_eq!(detect_private_key_format(&wif).unwrap(), PrivateKeyFormat::WifCompressed);
//! let public_key = private_key_to_public_key(&curve, &wif).unwrap();
//! assert_eq!(
//!     public_key.to_string(),
//!     "03fdf4907810a9f5d9462a1ae09feee5ab205d32798b0ffcc379442021f84c5bbf"
//! );
//! ```
//!
//! [`Scalar`]: crate::Scalar
//! [`Point`]: crate::Point
use crate::hex;
use core::fmt;
use num_bigint::BigUint;

mod arithmetic;
mod private;
mod public;

pub use arithmetic::*;
pub use private::*;
pub use public::*;

/// How a private key is written down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrivateKeyFormat {
    /// The scalar as an integer.
    Decimal,
    /// 32 big-endian bytes.
    Binary,
    /// 32 big-endian bytes followed by `0x01`.
    BinaryCompressed,
    /// 64 hex characters.
    Hex,
    /// 64 hex characters followed by `01`.
    HexCompressed,
    /// Wallet Import Format: Base58Check of the 32 bytes.
    Wif,
    /// Base58Check of the 32 bytes followed by `0x01`.
    WifCompressed,
}

impl PrivateKeyFormat {
    /// The order in which formats are tried when none is given.
    pub const DETECTION_ORDER: [PrivateKeyFormat; 7] = [
        PrivateKeyFormat::Decimal,
        PrivateKeyFormat::Binary,
        PrivateKeyFormat::BinaryCompressed,
        PrivateKeyFormat::Hex,
        PrivateKeyFormat::HexCompressed,
        PrivateKeyFormat::Wif,
        PrivateKeyFormat::WifCompressed,
    ];

    /// Whether the `0x01` suffix is present, meaning the public key derived
    /// from this private key should be compressed.
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            PrivateKeyFormat::BinaryCompressed
                | PrivateKeyFormat::HexCompressed
                | PrivateKeyFormat::WifCompressed
        )
    }

    /// The format the public key of a private key in this format is written
    /// in. WIF has no public key counterpart so it maps to hex.
    pub fn public_key_format(self) -> PublicKeyFormat {
        match self {
            PrivateKeyFormat::Decimal => PublicKeyFormat::Decimal,
            PrivateKeyFormat::Binary => PublicKeyFormat::Binary,
            PrivateKeyFormat::BinaryCompressed => PublicKeyFormat::BinaryCompressed,
            PrivateKeyFormat::Hex | PrivateKeyFormat::Wif => PublicKeyFormat::Hex,
            PrivateKeyFormat::HexCompressed | PrivateKeyFormat::WifCompressed => {
                PublicKeyFormat::HexCompressed
            }
        }
    }
}

/// How a public key is written down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PublicKeyFormat {
    /// The coordinates as a pair of integers.
    Decimal,
    /// `0x04 ‖ x ‖ y`, 65 bytes.
    Binary,
    /// `0x02`/`0x03` by y parity `‖ x`, 33 bytes.
    BinaryCompressed,
    /// Hex of [`PublicKeyFormat::Binary`], 130 characters.
    Hex,
    /// Hex of [`PublicKeyFormat::BinaryCompressed`], 66 characters.
    HexCompressed,
    /// `x ‖ y` with no prefix, 64 bytes. Never detected automatically.
    ElectrumBinary,
    /// Hex of [`PublicKeyFormat::ElectrumBinary`], 128 characters. Never
    /// detected automatically.
    ElectrumHex,
}

impl PublicKeyFormat {
    /// The order in which formats are tried when none is given. The Electrum
    /// formats are absent: they have no prefix to recognize them by.
    pub const DETECTION_ORDER: [PublicKeyFormat; 5] = [
        PublicKeyFormat::Decimal,
        PublicKeyFormat::Binary,
        PublicKeyFormat::Hex,
        PublicKeyFormat::BinaryCompressed,
        PublicKeyFormat::HexCompressed,
    ];

    /// Every public key format.
    pub const ALL: [PublicKeyFormat; 7] = [
        PublicKeyFormat::Decimal,
        PublicKeyFormat::Binary,
        PublicKeyFormat::BinaryCompressed,
        PublicKeyFormat::Hex,
        PublicKeyFormat::HexCompressed,
        PublicKeyFormat::ElectrumBinary,
        PublicKeyFormat::ElectrumHex,
    ];

    /// Whether this is one of the 33-byte compressed encodings.
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            PublicKeyFormat::BinaryCompressed | PublicKeyFormat::HexCompressed
        )
    }

    /// The format with the same representation (integer, bytes or text) and
    /// the requested compression. Decimal and Electrum keys compress to hex.
    pub fn with_compression(self, compressed: bool) -> PublicKeyFormat {
        use PublicKeyFormat::*;
        match (self, compressed) {
            (Binary | BinaryCompressed, true) => BinaryCompressed,
            (Binary | BinaryCompressed, false) => Binary,
            (Hex | HexCompressed | Decimal | ElectrumHex | ElectrumBinary, true) => HexCompressed,
            (Hex | HexCompressed, false) => Hex,
            (other, false) => other,
        }
    }
}

/// A private key as it arrives from or is handed back to a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodedPrivateKey {
    /// An integer.
    Decimal(BigUint),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Hex or WIF text.
    Text(String),
}

/// A public key as it arrives from or is handed back to a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodedPublicKey {
    /// The `(x, y)` coordinates as integers.
    Decimal(BigUint, BigUint),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Hex text.
    Text(String),
}

macro_rules! impl_encoded_from {
    ($type:ident) => {
        impl From<&str> for $type {
            fn from(text: &str) -> Self {
                $type::Text(text.to_string())
            }
        }

        impl From<String> for $type {
            fn from(text: String) -> Self {
                $type::Text(text)
            }
        }

        impl From<&[u8]> for $type {
            fn from(bytes: &[u8]) -> Self {
                $type::Bytes(bytes.to_vec())
            }
        }

        impl From<Vec<u8>> for $type {
            fn from(bytes: Vec<u8>) -> Self {
                $type::Bytes(bytes)
            }
        }

        impl<const N: usize> From<[u8; N]> for $type {
            fn from(bytes: [u8; N]) -> Self {
                $type::Bytes(bytes.to_vec())
            }
        }
    };
}

impl_encoded_from!(EncodedPrivateKey);
impl_encoded_from!(EncodedPublicKey);

impl From<BigUint> for EncodedPrivateKey {
    fn from(value: BigUint) -> Self {
        EncodedPrivateKey::Decimal(value)
    }
}

impl From<(BigUint, BigUint)> for EncodedPublicKey {
    fn from((x, y): (BigUint, BigUint)) -> Self {
        EncodedPublicKey::Decimal(x, y)
    }
}

/// Integers print in decimal, bytes in hex and text as it is.
impl fmt::Display for EncodedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodedPrivateKey::Decimal(value) => write!(f, "{}", value),
            EncodedPrivateKey::Bytes(bytes) => write!(f, "{}", hex::encode(bytes)),
            EncodedPrivateKey::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Integers print as `(x, y)`, bytes in hex and text as it is.
impl fmt::Display for EncodedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodedPublicKey::Decimal(x, y) => write!(f, "({}, {})", x, y),
            EncodedPublicKey::Bytes(bytes) => write!(f, "{}", hex::encode(bytes)),
            EncodedPublicKey::Text(text) => write!(f, "{}", text),
        }
    }
}
