use super::{EncodedPrivateKey, PrivateKeyFormat, PublicKey};
use crate::{Curve, DomainError, Error, Scalar, base58, hex, op};
use num_bigint::BigUint;

/// The version byte of a mainnet WIF key. A key for a network with address
/// magic byte `m` uses version `0x80 + m`.
pub const WIF_VERSION: u8 = 0x80;

const COMPRESSED_SUFFIX: u8 = 0x01;

/// A decoded private key together with the format it was written in.
///
/// The WIF version byte is carried along so that a WIF key passed through key
/// arithmetic comes back out for the same network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    scalar: Scalar,
    format: PrivateKeyFormat,
    wif_version: u8,
}

fn wif_version_for(magic: u8) -> Result<u8, DomainError> {
    WIF_VERSION
        .checked_add(magic)
        .ok_or(DomainError::NoEncoding("WIF version for this network"))
}

/// Works out which format `data` is in by trying each of
/// [`PrivateKeyFormat::DETECTION_ORDER`] in turn.
///
/// WIF can only be recognized by Base58Check-decoding it, so text that is not
/// hex and not valid Base58Check is reported as
/// [`DomainError::UnrecognizedFormat`], whatever the reason the decode failed.
pub fn detect_private_key_format(
    data: &EncodedPrivateKey,
) -> Result<PrivateKeyFormat, DomainError> {
    let detected = match data {
        EncodedPrivateKey::Decimal(_) => Some(PrivateKeyFormat::Decimal),
        EncodedPrivateKey::Bytes(bytes) => match bytes.len() {
            32 => Some(PrivateKeyFormat::Binary),
            33 if bytes[32] == COMPRESSED_SUFFIX => Some(PrivateKeyFormat::BinaryCompressed),
            _ => None,
        },
        EncodedPrivateKey::Text(text) => {
            if text.len() == 64 && hex::is_hex(text) {
                Some(PrivateKeyFormat::Hex)
            } else if text.len() == 66 && hex::is_hex(text) && text.ends_with("01") {
                Some(PrivateKeyFormat::HexCompressed)
            } else {
                match base58::decode(text) {
                    Ok((_, payload)) if payload.len() == 32 => Some(PrivateKeyFormat::Wif),
                    Ok((_, payload))
                        if payload.len() == 33 && payload[32] == COMPRESSED_SUFFIX =>
                    {
                        Some(PrivateKeyFormat::WifCompressed)
                    }
                    _ => None,
                }
            }
        }
    };
    tracing::trace!(format = ?detected, "detected private key format");
    detected.ok_or(DomainError::UnrecognizedFormat)
}

fn scalar_from_bytes(curve: &Curve, bytes: &[u8]) -> Result<Scalar, DomainError> {
    scalar_from_int(curve, BigUint::from_bytes_be(bytes))
}

fn scalar_from_int(curve: &Curve, value: BigUint) -> Result<Scalar, DomainError> {
    if &value >= curve.n() {
        return Err(DomainError::ValueTooLarge);
    }
    Ok(Scalar::from_biguint(curve, value))
}

fn expect_length(bytes: &[u8], expected: usize) -> Result<(), DomainError> {
    if bytes.len() != expected {
        return Err(DomainError::InvalidLength {
            expected,
            got: bytes.len(),
        });
    }
    Ok(())
}

fn expect_suffix(bytes: &[u8]) -> Result<(), DomainError> {
    match bytes.last() {
        Some(&COMPRESSED_SUFFIX) => Ok(()),
        Some(&other) => Err(DomainError::InvalidPrefix(other)),
        None => Err(DomainError::InvalidLength {
            expected: 33,
            got: 0,
        }),
    }
}

impl PrivateKey {
    /// A mainnet key in `format`.
    pub fn new(scalar: Scalar, format: PrivateKeyFormat) -> Self {
        PrivateKey {
            scalar,
            format,
            wif_version: WIF_VERSION,
        }
    }

    /// A key in `format` for the network whose addresses use `magic` (`0x00`
    /// main, `0x6f` test). Only WIF encodings are affected.
    pub fn for_network(
        scalar: Scalar,
        format: PrivateKeyFormat,
        magic: u8,
    ) -> Result<Self, DomainError> {
        Ok(PrivateKey {
            scalar,
            format,
            wif_version: wif_version_for(magic)?,
        })
    }

    /// Decodes a private key, detecting its format.
    pub fn decode(curve: &Curve, data: &EncodedPrivateKey) -> Result<Self, Error> {
        let format = detect_private_key_format(data)?;
        Self::decode_as(curve, data, format)
    }

    /// Decodes a private key that is expected to be in `format`.
    ///
    /// The integer must be less than the curve order; the codec never reduces
    /// silently so that decoding and re-encoding gives back the input.
    pub fn decode_as(
        curve: &Curve,
        data: &EncodedPrivateKey,
        format: PrivateKeyFormat,
    ) -> Result<Self, Error> {
        use PrivateKeyFormat::*;
        let mut wif_version = WIF_VERSION;
        let scalar = match (format, data) {
            (Decimal, EncodedPrivateKey::Decimal(value)) => scalar_from_int(curve, value.clone())?,
            (Binary, EncodedPrivateKey::Bytes(bytes)) => {
                expect_length(bytes, 32)?;
                scalar_from_bytes(curve, bytes)?
            }
            (BinaryCompressed, EncodedPrivateKey::Bytes(bytes)) => {
                expect_length(bytes, 33)?;
                expect_suffix(bytes)?;
                scalar_from_bytes(curve, &bytes[..32])?
            }
            (Hex, EncodedPrivateKey::Text(text)) => {
                let bytes = hex::decode(text)?;
                expect_length(&bytes, 32)?;
                scalar_from_bytes(curve, &bytes)?
            }
            (HexCompressed, EncodedPrivateKey::Text(text)) => {
                let bytes = hex::decode(text)?;
                expect_length(&bytes, 33)?;
                expect_suffix(&bytes)?;
                scalar_from_bytes(curve, &bytes[..32])?
            }
            (Wif, EncodedPrivateKey::Text(text)) => {
                let (version, payload) = base58::decode(text)?;
                expect_length(&payload, 32)?;
                wif_version = version;
                scalar_from_bytes(curve, &payload)?
            }
            (WifCompressed, EncodedPrivateKey::Text(text)) => {
                let (version, payload) = base58::decode(text)?;
                expect_length(&payload, 33)?;
                expect_suffix(&payload)?;
                wif_version = version;
                scalar_from_bytes(curve, &payload[..32])?
            }
            _ => return Err(DomainError::UnrecognizedFormat.into()),
        };
        Ok(PrivateKey {
            scalar,
            format,
            wif_version,
        })
    }

    /// Writes the key in its format.
    pub fn encode(&self) -> EncodedPrivateKey {
        use PrivateKeyFormat::*;
        let bytes = self.scalar.to_bytes();
        let compressed = || {
            let mut out = bytes.to_vec();
            out.push(COMPRESSED_SUFFIX);
            out
        };
        match self.format {
            Decimal => EncodedPrivateKey::Decimal(self.scalar.as_biguint().clone()),
            Binary => EncodedPrivateKey::Bytes(bytes.to_vec()),
            BinaryCompressed => EncodedPrivateKey::Bytes(compressed()),
            Hex => EncodedPrivateKey::Text(hex::encode(&bytes)),
            HexCompressed => EncodedPrivateKey::Text(hex::encode(&compressed())),
            Wif => EncodedPrivateKey::Text(base58::encode(&bytes, self.wif_version)),
            WifCompressed => {
                EncodedPrivateKey::Text(base58::encode(&compressed(), self.wif_version))
            }
        }
    }

    /// The same key in a different format.
    pub fn to_format(&self, format: PrivateKeyFormat) -> Self {
        PrivateKey {
            format,
            ..self.clone()
        }
    }

    /// A different scalar in this key's format and network.
    pub fn with_scalar(&self, scalar: Scalar) -> Self {
        PrivateKey {
            scalar,
            ..self.clone()
        }
    }

    /// The secret scalar.
    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// The format the key was written in.
    pub fn format(&self) -> PrivateKeyFormat {
        self.format
    }

    /// The WIF version byte used when encoding as WIF.
    pub fn wif_version(&self) -> u8 {
        self.wif_version
    }

    /// Whether the public key should be compressed.
    pub fn is_compressed(&self) -> bool {
        self.format.is_compressed()
    }

    /// `scalar · G`, in the public key format matching this key's format.
    pub fn public_key(&self, curve: &Curve) -> Result<PublicKey, DomainError> {
        let point = op::scalar_mul_point(curve, &self.scalar, curve.generator())?;
        Ok(PublicKey::new(point, self.format.public_key_format()))
    }
}

/// Encodes `scalar` in `format`. `magic` is the address magic byte of the
/// network (`0x00` main, `0x6f` test) and only matters for WIF.
///
/// ```
/// use keyfun::{Curve, Scalar, keys::*};
/// use num_bigint::BigUint;
/// let curve = Curve::secp256k1();
/// let one = Scalar::from_biguint(&curve, BigUint::from(1u32));
/// let encoded = encode_private_key(&one, PrivateKeyFormat::HexCompressed, 0x00).unwrap();
/// assert_eq!(
///     encoded.to_string(),
///     "000000000000000000000000000000000000000000000000000000000000000101"
/// );
/// ```
pub fn encode_private_key(
    scalar: &Scalar,
    format: PrivateKeyFormat,
    magic: u8,
) -> Result<EncodedPrivateKey, DomainError> {
    Ok(PrivateKey::for_network(scalar.clone(), format, magic)?.encode())
}

/// Decodes a private key in `format`, or in whatever format it is detected
/// to be in if `format` is `None`.
pub fn decode_private_key(
    curve: &Curve,
    data: &EncodedPrivateKey,
    format: Option<PrivateKeyFormat>,
) -> Result<Scalar, Error> {
    let key = match format {
        Some(format) => PrivateKey::decode_as(curve, data, format)?,
        None => PrivateKey::decode(curve, data)?,
    };
    Ok(key.scalar)
}

/// Re-encodes a private key in another format, keeping its network.
pub fn convert_private_key(
    curve: &Curve,
    data: &EncodedPrivateKey,
    format: PrivateKeyFormat,
) -> Result<EncodedPrivateKey, Error> {
    Ok(PrivateKey::decode(curve, data)?.to_format(format).encode())
}

/// Whether `data` is a private key in some recognizable format.
pub fn is_private_key(curve: &Curve, data: &EncodedPrivateKey) -> bool {
    PrivateKey::decode(curve, data).is_ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hash::sha256;

    fn key_one(curve: &Curve) -> Scalar {
        Scalar::from_bytes_mod_order(curve, &sha256(b"1"))
    }

    #[test]
    fn wif_vectors() {
        let curve = Curve::secp256k1();
        let key = key_one(&curve);
        let wif = |format, magic| encode_private_key(&key, format, magic).unwrap().to_string();
        assert_eq!(
            wif(PrivateKeyFormat::WifCompressed, 0),
            "KzpjABzbCjoxyhxzweCzGG3fqpKgbgJpsJeTqGV37f2KN7RM9eGD"
        );
        assert_eq!(
            wif(PrivateKeyFormat::Wif, 0),
            "5JdeC9P7Pbd1uGdFVEsJ41EkEnADbbHGq6p1BwFxm6txNBsQnsw"
        );
        assert_eq!(
            wif(PrivateKeyFormat::WifCompressed, 0x6f),
            "cRBid6zSdoWE99SGL427daYjU3d6G8QWwLnvwgwYcmgKcrYBM2pL"
        );
    }

    #[test]
    fn every_format_round_trips() {
        let curve = Curve::secp256k1();
        let key = key_one(&curve);
        for format in PrivateKeyFormat::DETECTION_ORDER {
            let encoded = encode_private_key(&key, format, 0x6f).unwrap();
            assert_eq!(detect_private_key_format(&encoded).unwrap(), format);
            assert_eq!(decode_private_key(&curve, &encoded, Some(format)).unwrap(), key);
            assert_eq!(decode_private_key(&curve, &encoded, None).unwrap(), key);
            let decoded = PrivateKey::decode(&curve, &encoded).unwrap();
            assert_eq!(decoded.encode(), encoded);
        }
    }

    #[test]
    fn detection_failures() {
        let curve = Curve::secp256k1();
        let bad: [EncodedPrivateKey; 5] = [
            vec![1u8; 31].into(),
            // 33 bytes without the 0x01 suffix
            [2u8; 33].into(),
            "not a key".into(),
            // right length, not hex, not base58check
            "z".repeat(64).into(),
            // a valid address is base58check but its payload is 20 bytes
            "1Dt8ty59tU9LkrXG2ocWeSzKFAY8fu6jga".into(),
        ];
        for data in bad.iter() {
            assert_eq!(
                detect_private_key_format(data),
                Err(DomainError::UnrecognizedFormat),
                "{}",
                data
            );
            assert!(!is_private_key(&curve, data));
        }
    }

    #[test]
    fn explicit_format_mismatch() {
        let curve = Curve::secp256k1();
        let hex_key: EncodedPrivateKey = hex::encode(&[7u8; 32]).into();
        assert_eq!(
            decode_private_key(&curve, &hex_key, Some(PrivateKeyFormat::Binary)),
            Err(Error::Domain(DomainError::UnrecognizedFormat))
        );
        assert!(matches!(
            decode_private_key(&curve, &hex_key, Some(PrivateKeyFormat::HexCompressed)),
            Err(Error::Domain(DomainError::InvalidLength { .. }))
        ));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let curve = Curve::secp256k1();
        let n: EncodedPrivateKey = curve.n().clone().into();
        assert_eq!(
            decode_private_key(&curve, &n, None),
            Err(Error::Domain(DomainError::ValueTooLarge))
        );
    }

    #[test]
    fn wif_checksum_error_surfaces_when_format_is_explicit() {
        let curve = Curve::secp256k1();
        let corrupted: EncodedPrivateKey =
            "KzpjABzbCjoxyhxzweCzGG3fqpKgbgJpsJeTqGV37f2KN7RM9eGE".into();
        assert_eq!(
            decode_private_key(&curve, &corrupted, Some(PrivateKeyFormat::WifCompressed)),
            Err(Error::Checksum(crate::ChecksumError))
        );
        assert_eq!(
            detect_private_key_format(&corrupted),
            Err(DomainError::UnrecognizedFormat)
        );
    }

    #[test]
    fn wif_network_survives_conversion() {
        let curve = Curve::secp256k1();
        let testnet: EncodedPrivateKey =
            "cRBid6zSdoWE99SGL427daYjU3d6G8QWwLnvwgwYcmgKcrYBM2pL".into();
        let key = PrivateKey::decode(&curve, &testnet).unwrap();
        assert_eq!(key.wif_version(), 0xef);
        let hex = convert_private_key(&curve, &testnet, PrivateKeyFormat::Hex).unwrap();
        assert_eq!(
            hex.to_string(),
            "6b86b273ff34fce19d6b804eff5a3f5747ada4eaa22f1d49c01e52ddb7875b4b"
        );
        assert_eq!(
            convert_private_key(&curve, &testnet, PrivateKeyFormat::WifCompressed).unwrap(),
            testnet
        );
        assert!(encode_private_key(key.scalar(), PrivateKeyFormat::Wif, 0x80).is_err());
    }
}
