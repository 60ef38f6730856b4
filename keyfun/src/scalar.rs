//! Scalar arithmetic (integers mod the group order of a [`Curve`])
use crate::{Curve, modular::to_bytes32};
use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::RngCore;
use subtle::ConstantTimeEq;

/// An integer mod the order `n` of a [`Curve`].
///
/// A `Scalar` is always reduced into `[0, n)` when it is constructed so two
/// scalars compare equal exactly when they are the same residue. Scalars are
/// used as private keys and as nonces; the scalars multiplying the generator
/// give the corresponding public keys:
///
/// ```
/// use keyfun::{Curve, Scalar, op};
/// let curve = Curve::secp256k1();
/// let x = Scalar::random(&curve, &mut rand::thread_rng());
/// let X = op::scalar_mul_point(&curve, &x, curve.generator()).unwrap();
/// assert!(!X.is_infinity());
/// ```
///
/// Since every supported curve has an order of at most 256 bits a scalar
/// always fits in 32 bytes.
#[derive(Clone, Eq)]
pub struct Scalar(BigUint);

impl Scalar {
    pub(crate) fn from_reduced(value: BigUint) -> Self {
        Scalar(value)
    }

    /// Reduces an integer modulo the curve order.
    pub fn from_biguint(curve: &Curve, value: BigUint) -> Self {
        Scalar(value % curve.n())
    }

    /// Interprets `bytes` as a big-endian integer and reduces it modulo the
    /// curve order.
    ///
    /// ```
    /// use keyfun::{Curve, Scalar};
    /// let curve = Curve::secp256k1();
    /// let n_bytes = curve.n().to_bytes_be();
    /// assert!(Scalar::from_bytes_mod_order(&curve, &n_bytes).is_zero());
    /// ```
    pub fn from_bytes_mod_order(curve: &Curve, bytes: &[u8]) -> Self {
        Self::from_biguint(curve, BigUint::from_bytes_be(bytes))
    }

    /// Converts 32 big-endian bytes into a scalar only if they are already
    /// reduced.
    pub fn from_bytes(curve: &Curve, bytes: [u8; 32]) -> Option<Self> {
        let value = BigUint::from_bytes_be(&bytes);
        if &value < curve.n() {
            Some(Scalar(value))
        } else {
            None
        }
    }

    /// Generates a uniformly random non-zero scalar.
    ///
    /// Bytes are drawn from `rng`, masked to the bit length of `n` and
    /// rejected until they land in `[1, n)`.
    pub fn random<R: RngCore>(curve: &Curve, rng: &mut R) -> Self {
        let bits = curve.n().bits();
        let len = bits.div_ceil(8) as usize;
        let excess = (len as u64 * 8 - bits) as u32;
        let mut bytes = vec![0u8; len];
        loop {
            rng.fill_bytes(&mut bytes);
            bytes[0] &= 0xffu8 >> excess;
            let candidate = BigUint::from_bytes_be(&bytes);
            if !candidate.is_zero() && &candidate < curve.n() {
                return Scalar(candidate);
            }
        }
    }

    /// The zero scalar.
    pub fn zero() -> Self {
        Scalar(BigUint::zero())
    }

    /// The scalar as an integer in `[0, n)`.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Converts the scalar to its 32-byte big-endian representation.
    pub fn to_bytes(&self) -> [u8; 32] {
        to_bytes32(&self.0)
    }

    /// Is this the zero scalar?
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the scalar is greater than `⌊n / 2⌋`.
    ///
    /// For any non-zero scalar exactly one of `s` and `-s` is high.
    pub fn is_high(&self, curve: &Curve) -> bool {
        &self.0 > curve.half_n()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, rhs: &Self) -> bool {
        self.to_bytes()[..].ct_eq(&rhs.to_bytes()[..]).into()
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Scalar(")?;
        for byte in self.to_bytes().iter() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curve::test::toy_curve;
    use rand::SeedableRng;

    #[test]
    fn random_is_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for curve in [toy_curve(), Curve::secp256k1()] {
            for _ in 0..200 {
                let x = Scalar::random(&curve, &mut rng);
                assert!(!x.is_zero());
                assert!(x.as_biguint() < curve.n());
            }
        }
    }

    #[test]
    fn from_bytes_rejects_unreduced() {
        let curve = Curve::secp256k1();
        let n = to_bytes32(curve.n());
        assert_eq!(Scalar::from_bytes(&curve, n), None);
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(
            Scalar::from_bytes(&curve, one),
            Some(Scalar::from_biguint(&curve, BigUint::from(1u32)))
        );
        assert_eq!(Scalar::from_bytes_mod_order(&curve, &n), Scalar::zero());
    }

    #[test]
    fn is_high() {
        let curve = Curve::secp256k1();
        let half = Scalar::from_biguint(&curve, curve.half_n().clone());
        let above = Scalar::from_biguint(&curve, curve.half_n() + 1u32);
        assert!(!half.is_high(&curve));
        assert!(above.is_high(&curve));
        assert!(!Scalar::zero().is_high(&curve));
    }
}
