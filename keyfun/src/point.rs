use crate::{Curve, DomainError, modular::to_bytes32};
use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;

/// A point on a [`Curve`] in affine coordinates, or the point at infinity.
///
/// A `Point` does not carry its curve around with it. Use [`Point::new`] to
/// construct one from untrusted coordinates so they are checked against the
/// curve equation; everything in [`op`] and the key codecs hands back points
/// that are already known to be valid.
///
/// The `Display` implementation shows the 33-byte compressed encoding in hex.
/// Infinity shows as `02` followed by 32 zero bytes.
///
/// [`op`]: crate::op
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Point {
    /// The identity of the group.
    Infinity,
    /// A finite point `(x, y)` with coordinates reduced mod `p`.
    Affine {
        /// The x-coordinate.
        x: BigUint,
        /// The y-coordinate.
        y: BigUint,
    },
}

impl Point {
    /// Creates a finite point after checking it lies on `curve`.
    ///
    /// ```
    /// use keyfun::{Curve, Point};
    /// use num_bigint::BigUint;
    /// let curve = Curve::secp256k1();
    /// let (x, y) = curve.generator().coordinates().unwrap();
    /// assert!(Point::new(&curve, x.clone(), y.clone()).is_ok());
    /// assert!(Point::new(&curve, x.clone(), y + 1u32).is_err());
    /// ```
    pub fn new(curve: &Curve, x: BigUint, y: BigUint) -> Result<Self, DomainError> {
        let point = Point::Affine { x, y };
        if curve.contains(&point) {
            Ok(point)
        } else {
            Err(DomainError::PointNotOnCurve)
        }
    }

    /// Is this the point at infinity?
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// The affine coordinates, or `None` for infinity.
    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, y } => Some((x, y)),
        }
    }

    /// The x-coordinate, taking infinity's to be zero.
    pub fn x(&self) -> BigUint {
        match self {
            Point::Infinity => BigUint::zero(),
            Point::Affine { x, .. } => x.clone(),
        }
    }

    /// The y-coordinate, taking infinity's to be zero.
    pub fn y(&self) -> BigUint {
        match self {
            Point::Infinity => BigUint::zero(),
            Point::Affine { y, .. } => y.clone(),
        }
    }

    /// Whether the y-coordinate is odd. Infinity counts as even.
    pub fn is_y_odd(&self) -> bool {
        match self {
            Point::Infinity => false,
            Point::Affine { y, .. } => !(y % 2u32).is_zero(),
        }
    }

    /// The 33-byte compressed encoding: `02`/`03` by y parity followed by x.
    pub fn to_bytes(&self) -> [u8; 33] {
        let mut bytes = [0u8; 33];
        bytes[0] = if self.is_y_odd() { 0x03 } else { 0x02 };
        bytes[1..].copy_from_slice(&to_bytes32(&self.x()));
        bytes
    }

    /// The 65-byte uncompressed encoding: `04` followed by x and y.
    pub fn to_bytes_uncompressed(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0] = 0x04;
        bytes[1..33].copy_from_slice(&to_bytes32(&self.x()));
        bytes[33..].copy_from_slice(&to_bytes32(&self.y()));
        bytes
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in self.to_bytes().iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Point::Infinity => write!(f, "Point(infinity)"),
            Point::Affine { .. } => write!(f, "Point({})", self),
        }
    }
}
