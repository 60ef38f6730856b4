use super::{EncodedPublicKey, PublicKeyFormat};
use crate::{Curve, DomainError, Point, hex, modular::to_bytes32, op};
use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;

/// A decoded public key together with the format it was written in.
///
/// The point at infinity has no real encoding. It is written as the
/// compressed encoding of `x = 0` (`02` followed by 32 zero bytes) in the
/// binary and hex formats, as `(0, 0)` in decimal and as all zeros in the
/// Electrum formats, and each of those decodes back to infinity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
    format: PublicKeyFormat,
}

/// Works out which format `data` is in by trying each of
/// [`PublicKeyFormat::DETECTION_ORDER`] in turn.
///
/// The Electrum formats are never detected. Pass them explicitly to
/// [`PublicKey::decode_as`] or [`decode_public_key`].
pub fn detect_public_key_format(data: &EncodedPublicKey) -> Result<PublicKeyFormat, DomainError> {
    let detected = match data {
        EncodedPublicKey::Decimal(..) => Some(PublicKeyFormat::Decimal),
        EncodedPublicKey::Bytes(bytes) => match (bytes.len(), bytes.first()) {
            (65, Some(0x04)) => Some(PublicKeyFormat::Binary),
            (33, Some(0x02 | 0x03)) => Some(PublicKeyFormat::BinaryCompressed),
            _ => None,
        },
        EncodedPublicKey::Text(text) if hex::is_hex(text) => match (text.len(), &text[..2]) {
            (130, "04") => Some(PublicKeyFormat::Hex),
            (66, "02" | "03") => Some(PublicKeyFormat::HexCompressed),
            _ => None,
        },
        EncodedPublicKey::Text(_) => None,
    };
    tracing::trace!(format = ?detected, "detected public key format");
    detected.ok_or(DomainError::UnrecognizedFormat)
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

fn from_coordinates(curve: &Curve, x: BigUint, y: BigUint) -> Result<Point, DomainError> {
    if x.is_zero() && y.is_zero() {
        return Ok(Point::Infinity);
    }
    Point::new(curve, x, y)
}

fn from_uncompressed(curve: &Curve, bytes: &[u8]) -> Result<Point, DomainError> {
    // infinity keeps its compressed encoding in the uncompressed formats
    if bytes == &Point::Infinity.to_bytes()[..] {
        return Ok(Point::Infinity);
    }
    expect_length(bytes, 65)?;
    if bytes[0] != 0x04 {
        return Err(DomainError::InvalidPrefix(bytes[0]));
    }
    from_coordinates(
        curve,
        BigUint::from_bytes_be(&bytes[1..33]),
        BigUint::from_bytes_be(&bytes[33..]),
    )
}

fn from_compressed(curve: &Curve, bytes: &[u8]) -> Result<Point, DomainError> {
    expect_length(bytes, 33)?;
    let y_odd = match bytes[0] {
        0x02 => false,
        0x03 => true,
        other => return Err(DomainError::InvalidPrefix(other)),
    };
    let x = BigUint::from_bytes_be(&bytes[1..]);
    if x.is_zero() && !y_odd {
        return Ok(Point::Infinity);
    }
    op::decompress(curve, &x, y_odd)
}

fn from_electrum(curve: &Curve, bytes: &[u8]) -> Result<Point, DomainError> {
    expect_length(bytes, 64)?;
    from_coordinates(
        curve,
        BigUint::from_bytes_be(&bytes[..32]),
        BigUint::from_bytes_be(&bytes[32..]),
    )
}

impl PublicKey {
    /// Pairs a point with the format it should be written in.
    pub fn new(point: Point, format: PublicKeyFormat) -> Self {
        PublicKey { point, format }
    }

    /// Decodes a public key, detecting its format.
    pub fn decode(curve: &Curve, data: &EncodedPublicKey) -> Result<Self, DomainError> {
        let format = detect_public_key_format(data)?;
        Self::decode_as(curve, data, format)
    }

    /// Decodes a public key that is expected to be in `format`. The point
    /// must be on `curve`.
    pub fn decode_as(
        curve: &Curve,
        data: &EncodedPublicKey,
        format: PublicKeyFormat,
    ) -> Result<Self, DomainError> {
        use PublicKeyFormat::*;
        let point = match (format, data) {
            (Decimal, EncodedPublicKey::Decimal(x, y)) => {
                from_coordinates(curve, x.clone(), y.clone())?
            }
            (Binary, EncodedPublicKey::Bytes(bytes)) => from_uncompressed(curve, bytes)?,
            (BinaryCompressed, EncodedPublicKey::Bytes(bytes)) => from_compressed(curve, bytes)?,
            (ElectrumBinary, EncodedPublicKey::Bytes(bytes)) => from_electrum(curve, bytes)?,
            (Hex, EncodedPublicKey::Text(text)) => from_uncompressed(curve, &hex::decode(text)?)?,
            (HexCompressed, EncodedPublicKey::Text(text)) => {
                from_compressed(curve, &hex::decode(text)?)?
            }
            (ElectrumHex, EncodedPublicKey::Text(text)) => {
                from_electrum(curve, &hex::decode(text)?)?
            }
            _ => return Err(DomainError::UnrecognizedFormat),
        };
        Ok(PublicKey { point, format })
    }

    /// Writes the key in its format.
    pub fn encode(&self) -> EncodedPublicKey {
        use PublicKeyFormat::*;
        let electrum = || {
            let mut out = to_bytes32(&self.point.x()).to_vec();
            out.extend_from_slice(&to_bytes32(&self.point.y()));
            out
        };
        let uncompressed = || match self.point {
            Point::Infinity => self.point.to_bytes().to_vec(),
            Point::Affine { .. } => self.point.to_bytes_uncompressed().to_vec(),
        };
        match self.format {
            Decimal => EncodedPublicKey::Decimal(self.point.x(), self.point.y()),
            Binary => EncodedPublicKey::Bytes(uncompressed()),
            BinaryCompressed => EncodedPublicKey::Bytes(self.point.to_bytes().to_vec()),
            Hex => EncodedPublicKey::Text(hex::encode(&uncompressed())),
            HexCompressed => EncodedPublicKey::Text(hex::encode(&self.point.to_bytes())),
            ElectrumBinary => EncodedPublicKey::Bytes(electrum()),
            ElectrumHex => EncodedPublicKey::Text(hex::encode(&electrum())),
        }
    }

    /// The same key in a different format.
    pub fn to_format(&self, format: PublicKeyFormat) -> Self {
        PublicKey {
            point: self.point.clone(),
            format,
        }
    }

    /// The same point in another key's format.
    pub fn with_point(&self, point: Point) -> Self {
        PublicKey {
            point,
            format: self.format,
        }
    }

    /// The point.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// The format the key was written in.
    pub fn format(&self) -> PublicKeyFormat {
        self.format
    }

    /// Whether the key is written in one of the compressed formats.
    pub fn is_compressed(&self) -> bool {
        self.format.is_compressed()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Encodes `point` in `format`.
pub fn encode_public_key(point: &Point, format: PublicKeyFormat) -> EncodedPublicKey {
    PublicKey::new(point.clone(), format).encode()
}

/// Decodes a public key in `format`, or in whatever format it is detected to
/// be in if `format` is `None`.
///
/// ```
/// use keyfun::{Curve, keys::*};
/// let curve = Curve::secp256k1();
/// let encoded = EncodedPublicKey::from(
///     "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
/// );
/// let point = decode_public_key(&curve, &encoded, None).unwrap();
/// assert_eq!(&point, curve.generator());
/// ```
pub fn decode_public_key(
    curve: &Curve,
    data: &EncodedPublicKey,
    format: Option<PublicKeyFormat>,
) -> Result<Point, DomainError> {
    let key = match format {
        Some(format) => PublicKey::decode_as(curve, data, format)?,
        None => PublicKey::decode(curve, data)?,
    };
    Ok(key.point)
}

/// Whether `data` decodes to a public key on `curve`.
pub fn is_public_key(curve: &Curve, data: &EncodedPublicKey) -> bool {
    PublicKey::decode(curve, data).is_ok()
}

/// Converts a public key to the compressed member of its family: binary
/// stays binary, everything else becomes compressed hex. Keys that are
/// already compressed come back unchanged.
pub fn compress_public_key(
    curve: &Curve,
    data: &EncodedPublicKey,
) -> Result<EncodedPublicKey, DomainError> {
    let key = PublicKey::decode(curve, data)?;
    if key.is_compressed() {
        return Ok(data.clone());
    }
    Ok(key.to_format(key.format.with_compression(true)).encode())
}

/// Converts a compressed public key to the uncompressed member of its
/// family. Keys that are not compressed come back unchanged.
pub fn decompress_public_key(
    curve: &Curve,
    data: &EncodedPublicKey,
) -> Result<EncodedPublicKey, DomainError> {
    let key = PublicKey::decode(curve, data)?;
    if !key.is_compressed() {
        return Ok(data.clone());
    }
    Ok(key.to_format(key.format.with_compression(false)).encode())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Scalar, curve::test::toy_curve};

    const COMPRESSED: &str = "03fdf4907810a9f5d9462a1ae09feee5ab205d32798b0ffcc379442021f84c5bbf";
    const UNCOMPRESSED: &str = "04fdf4907810a9f5d9462a1ae09feee5ab205d32798b0ffcc379442021f84c5bbf\
                                c891eb16b0faef4bef99ba6d522fb85470a20df730808e583778aa35c7af98f5";

    #[test]
    fn every_format_round_trips() {
        for curve in [Curve::secp256k1(), toy_curve()] {
            let point = op::scalar_mul_point(
                &curve,
                &Scalar::from_biguint(&curve, BigUint::from(1234u32)),
                curve.generator(),
            )
            .unwrap();
            for format in PublicKeyFormat::ALL {
                let encoded = encode_public_key(&point, format);
                assert_eq!(
                    decode_public_key(&curve, &encoded, Some(format)).unwrap(),
                    point,
                    "{:?}",
                    format
                );
                let key = PublicKey::decode_as(&curve, &encoded, format).unwrap();
                assert_eq!(key.encode(), encoded);
                if PublicKeyFormat::DETECTION_ORDER.contains(&format) {
                    assert_eq!(detect_public_key_format(&encoded).unwrap(), format);
                } else {
                    assert!(detect_public_key_format(&encoded).is_err());
                }
            }
        }
    }

    #[test]
    fn compress_and_decompress() {
        let curve = Curve::secp256k1();
        let compressed = EncodedPublicKey::from(COMPRESSED);
        let uncompressed = EncodedPublicKey::from(UNCOMPRESSED);
        assert_eq!(compress_public_key(&curve, &uncompressed).unwrap(), compressed);
        assert_eq!(compress_public_key(&curve, &compressed).unwrap(), compressed);
        assert_eq!(decompress_public_key(&curve, &compressed).unwrap(), uncompressed);
        assert_eq!(decompress_public_key(&curve, &uncompressed).unwrap(), uncompressed);

        let binary = EncodedPublicKey::Bytes(hex::decode(UNCOMPRESSED).unwrap());
        assert_eq!(
            compress_public_key(&curve, &binary).unwrap(),
            EncodedPublicKey::Bytes(hex::decode(COMPRESSED).unwrap())
        );
        let point = decode_public_key(&curve, &compressed, None).unwrap();
        let decimal = encode_public_key(&point, PublicKeyFormat::Decimal);
        assert_eq!(compress_public_key(&curve, &decimal).unwrap(), compressed);
        assert_eq!(decompress_public_key(&curve, &decimal).unwrap(), decimal);
    }

    #[test]
    fn infinity_convention() {
        let curve = Curve::secp256k1();
        let zero_x = format!("02{}", "00".repeat(32));
        assert_eq!(
            encode_public_key(&Point::Infinity, PublicKeyFormat::Hex),
            EncodedPublicKey::Text(zero_x.clone())
        );
        assert_eq!(
            encode_public_key(&Point::Infinity, PublicKeyFormat::BinaryCompressed),
            EncodedPublicKey::Bytes(hex::decode(&zero_x).unwrap())
        );
        assert_eq!(
            decode_public_key(&curve, &zero_x.into(), None).unwrap(),
            Point::Infinity
        );
        let zeros = EncodedPublicKey::Decimal(BigUint::zero(), BigUint::zero());
        assert_eq!(decode_public_key(&curve, &zeros, None).unwrap(), Point::Infinity);
    }

    #[test]
    fn infinity_round_trips_through_every_format() {
        for curve in [Curve::secp256k1(), toy_curve()] {
            for format in PublicKeyFormat::ALL {
                let encoded = encode_public_key(&Point::Infinity, format);
                assert_eq!(
                    decode_public_key(&curve, &encoded, Some(format)),
                    Ok(Point::Infinity),
                    "{:?}",
                    format
                );
            }
        }
        // a 33 byte string other than the infinity encoding is still the wrong length
        let curve = Curve::secp256k1();
        let mut not_infinity = Point::Infinity.to_bytes();
        not_infinity[32] = 1;
        assert_eq!(
            decode_public_key(&curve, &not_infinity.into(), Some(PublicKeyFormat::Binary)),
            Err(DomainError::InvalidLength {
                expected: 65,
                got: 33
            })
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        let curve = Curve::secp256k1();
        // y + 1 is not on the curve
        let mut off_curve = hex::decode(UNCOMPRESSED).unwrap();
        off_curve[64] ^= 1;
        assert_eq!(
            decode_public_key(&curve, &off_curve.into(), None),
            Err(DomainError::PointNotOnCurve)
        );
        let short = EncodedPublicKey::Bytes(vec![0x04; 64]);
        assert_eq!(
            detect_public_key_format(&short),
            Err(DomainError::UnrecognizedFormat)
        );
        let wrong_prefix = EncodedPublicKey::from(COMPRESSED.replacen("03", "05", 1));
        assert_eq!(
            detect_public_key_format(&wrong_prefix),
            Err(DomainError::UnrecognizedFormat)
        );
        assert_eq!(
            decode_public_key(&curve, &wrong_prefix, Some(PublicKeyFormat::HexCompressed)),
            Err(DomainError::InvalidPrefix(0x05))
        );
        // x = 0 has no square root of 7 on secp256k1
        let no_root = EncodedPublicKey::from(format!("03{}", "00".repeat(32)));
        assert_eq!(
            decode_public_key(&curve, &no_root, None),
            Err(DomainError::PointNotOnCurve)
        );
        assert!(!is_public_key(&curve, &EncodedPublicKey::from("zz")));
    }
}
