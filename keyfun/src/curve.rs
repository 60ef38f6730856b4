//! The curve context.
//!
//! Every operation in this crate takes a `&Curve` rather than reading ambient
//! parameters, so different curves can be used side by side (e.g. a toy curve
//! in one test and secp256k1 in another running on a different thread).
use crate::{DomainError, Point, modular};
use num_bigint::BigUint;
use num_traits::Zero;

/// The largest field/order size in bits. Keys and signatures use fixed 32-byte
/// encodings so anything bigger cannot be represented.
pub const MAX_BITS: u64 = 256;

const SECP256K1_P: &str = "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
const SECP256K1_N: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
const SECP256K1_GX: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
const SECP256K1_GY: &str = "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

/// Parameters of a short Weierstrass curve `y² = x³ + a·x + b (mod p)` with a
/// base point `G` of prime order `n`.
///
/// A `Curve` is immutable. To use different parameters build a new one with
/// [`Curve::new`].
///
/// ```
/// use keyfun::Curve;
/// let curve = Curve::secp256k1();
/// assert_eq!(curve.p().bits(), 256);
/// assert_eq!(curve, Curve::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "CurveParams", into = "CurveParams")
)]
pub struct Curve {
    p: BigUint,
    n: BigUint,
    a: BigUint,
    b: BigUint,
    g: Point,
    half_n: BigUint,
}

fn parse_hex(hex: &str) -> Option<BigUint> {
    BigUint::parse_bytes(hex.as_bytes(), 16)
}

impl Curve {
    /// The secp256k1 curve used by Bitcoin.
    pub fn secp256k1() -> Self {
        let field = |hex| parse_hex(hex).unwrap_or_default();
        let n = field(SECP256K1_N);
        Curve {
            p: field(SECP256K1_P),
            half_n: &n >> 1,
            n,
            a: BigUint::zero(),
            b: BigUint::from(7u8),
            g: Point::Affine {
                x: field(SECP256K1_GX),
                y: field(SECP256K1_GY),
            },
        }
    }

    /// Builds and validates a curve from its parameters.
    ///
    /// Fails with [`DomainError::InvalidCurve`] unless `p` is an odd prime
    /// greater than 3, `n` is prime, both fit in 256 bits, `a` and `b` are
    /// reduced mod `p`, the curve is non-singular and `(gx, gy)` is on it.
    ///
    /// ```
    /// use keyfun::Curve;
    /// use num_bigint::BigUint;
    /// let toy = Curve::new(
    ///     BigUint::from(10007u32),
    ///     BigUint::from(9871u32),
    ///     BigUint::from(3u32),
    ///     BigUint::from(17u32),
    ///     BigUint::from(3u32),
    ///     BigUint::from(8790u32),
    /// )
    /// .unwrap();
    /// assert_eq!(toy.n(), &BigUint::from(9871u32));
    /// ```
    pub fn new(
        p: BigUint,
        n: BigUint,
        a: BigUint,
        b: BigUint,
        gx: BigUint,
        gy: BigUint,
    ) -> Result<Self, DomainError> {
        if p <= BigUint::from(3u8) || (&p % 2u32).is_zero() {
            return Err(DomainError::InvalidCurve("p must be an odd prime greater than 3"));
        }
        if p.bits() > MAX_BITS || n.bits() > MAX_BITS {
            return Err(DomainError::InvalidCurve("parameters larger than 256 bits"));
        }
        if !modular::is_probable_prime(&p) {
            return Err(DomainError::InvalidCurve("p is not prime"));
        }
        if !modular::is_probable_prime(&n) {
            return Err(DomainError::InvalidCurve("n is not prime"));
        }
        if a >= p || b >= p {
            return Err(DomainError::InvalidCurve("coefficients not reduced mod p"));
        }
        // 4a³ + 27b² ≠ 0
        let discriminant = modular::add(
            &modular::mul(&BigUint::from(4u8), &a.modpow(&BigUint::from(3u8), &p), &p),
            &modular::mul(&BigUint::from(27u8), &(&b * &b), &p),
            &p,
        );
        if discriminant.is_zero() {
            return Err(DomainError::InvalidCurve("curve is singular"));
        }
        let curve = Curve {
            half_n: &n >> 1,
            p,
            n,
            a,
            b,
            g: Point::Affine { x: gx, y: gy },
        };
        if !curve.contains(&curve.g) || curve.g.is_infinity() {
            return Err(DomainError::InvalidCurve("generator not on curve"));
        }
        tracing::debug!(
            p_bits = curve.p.bits(),
            n_bits = curve.n.bits(),
            "constructed custom curve context"
        );
        Ok(curve)
    }

    /// The field prime.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The order of the generator.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// The coefficient `a`.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// The coefficient `b`.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// The base point `G`.
    pub fn generator(&self) -> &Point {
        &self.g
    }

    /// `⌊n / 2⌋`. Scalars above this are "high".
    pub fn half_n(&self) -> &BigUint {
        &self.half_n
    }

    /// Whether `point` is the point at infinity or satisfies the curve
    /// equation with both coordinates in `[0, p)`.
    pub fn contains(&self, point: &Point) -> bool {
        match point {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                if x >= &self.p || y >= &self.p {
                    return false;
                }
                (y * y) % &self.p == self.rhs(x)
            }
        }
    }

    /// `x³ + a·x + b mod p`
    pub(crate) fn rhs(&self, x: &BigUint) -> BigUint {
        let x3 = x.modpow(&BigUint::from(3u8), &self.p);
        (x3 + &self.a * x + &self.b) % &self.p
    }
}

impl Default for Curve {
    fn default() -> Self {
        Curve::secp256k1()
    }
}

/// The serialized form of a [`Curve`]: each parameter as a big-endian hex
/// string.
///
/// Deserializing a `Curve` goes through [`Curve::new`] so a parameter record
/// that does not describe a valid curve is rejected.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct CurveParams {
    /// Field prime.
    pub p: String,
    /// Group order.
    pub n: String,
    /// Coefficient `a`.
    pub a: String,
    /// Coefficient `b`.
    pub b: String,
    /// Generator x-coordinate.
    pub gx: String,
    /// Generator y-coordinate.
    pub gy: String,
}

#[cfg(feature = "serde")]
impl TryFrom<CurveParams> for Curve {
    type Error = DomainError;

    fn try_from(params: CurveParams) -> Result<Self, Self::Error> {
        let field =
            |hex: &str| parse_hex(hex).ok_or(DomainError::Hex(crate::hex::HexError::InvalidHex));
        Curve::new(
            field(&params.p)?,
            field(&params.n)?,
            field(&params.a)?,
            field(&params.b)?,
            field(&params.gx)?,
            field(&params.gy)?,
        )
    }
}

#[cfg(feature = "serde")]
impl From<Curve> for CurveParams {
    fn from(curve: Curve) -> Self {
        let (gx, gy) = match &curve.g {
            Point::Affine { x, y } => (x.to_str_radix(16), y.to_str_radix(16)),
            Point::Infinity => (String::new(), String::new()),
        };
        CurveParams {
            p: curve.p.to_str_radix(16),
            n: curve.n.to_str_radix(16),
            a: curve.a.to_str_radix(16),
            b: curve.b.to_str_radix(16),
            gx,
            gy,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use num_traits::One;

    /// y² = x³ + 3x + 17 over F_10007 with a generator of prime order 9871.
    pub(crate) fn toy_curve() -> Curve {
        Curve::new(
            BigUint::from(10007u32),
            BigUint::from(9871u32),
            BigUint::from(3u32),
            BigUint::from(17u32),
            BigUint::from(3u32),
            BigUint::from(8790u32),
        )
        .unwrap()
    }

    #[test]
    fn secp256k1_generator_is_on_curve() {
        let curve = Curve::secp256k1();
        assert!(curve.contains(curve.generator()));
        assert!(modular::is_probable_prime(curve.p()));
        assert!(modular::is_probable_prime(curve.n()));
    }

    #[test]
    fn toy_curve_is_valid() {
        let curve = toy_curve();
        assert!(curve.contains(curve.generator()));
        assert_ne!(curve, Curve::secp256k1());
    }

    #[test]
    fn rejects_bad_parameters() {
        let secp = Curve::secp256k1();
        let (gx, gy) = secp.generator().coordinates().unwrap();
        let attempt = |p: &BigUint, n: &BigUint, b: u32, gy: &BigUint| {
            Curve::new(
                p.clone(),
                n.clone(),
                BigUint::zero(),
                BigUint::from(b),
                gx.clone(),
                gy.clone(),
            )
        };
        assert!(attempt(secp.p(), secp.n(), 7, gy).is_ok());
        // wrong b moves G off the curve
        assert!(matches!(
            attempt(secp.p(), secp.n(), 5, gy),
            Err(DomainError::InvalidCurve(_))
        ));
        // composite order
        assert!(matches!(
            attempt(secp.p(), &(secp.n() + 1u32), 7, gy),
            Err(DomainError::InvalidCurve(_))
        ));
        // even modulus
        assert!(matches!(
            attempt(&(secp.p() + 1u32), secp.n(), 7, gy),
            Err(DomainError::InvalidCurve(_))
        ));
        // too many bits
        let big = (BigUint::one() << 257u32) + 1u32;
        assert!(matches!(
            attempt(&big, secp.n(), 7, gy),
            Err(DomainError::InvalidCurve(_))
        ));
        // singular: a = b = 0
        assert!(matches!(
            Curve::new(
                BigUint::from(10007u32),
                BigUint::from(9871u32),
                BigUint::zero(),
                BigUint::zero(),
                BigUint::zero(),
                BigUint::zero(),
            ),
            Err(DomainError::InvalidCurve(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_validates() {
        let curve = toy_curve();
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(serde_json::from_str::<Curve>(&json).unwrap(), curve);
        let bad = json.replace("\"gy\":\"2256\"", "\"gy\":\"2257\"");
        assert_ne!(bad, json);
        assert!(serde_json::from_str::<Curve>(&bad).is_err());
    }
}
