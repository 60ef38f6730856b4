//! Operations on [`Point`]s and [`Scalar`]s over a [`Curve`].
//!
//! These are plain functions that take the curve explicitly. Point operations
//! check that their inputs are on the curve since a point may have come from
//! anywhere; scalar operations can't fail because a [`Scalar`] is always
//! reduced.
//!
//! ```
//! use keyfun::{Curve, Scalar, op};
//! let curve = Curve::secp256k1();
//! let x = Scalar::random(&curve, &mut rand::thread_rng());
//! let y = Scalar::random(&curve, &mut rand::thread_rng());
//! let xy = op::scalar_mul(&curve, &x, &y);
//! let X = op::scalar_mul_point(&curve, &x, curve.generator()).unwrap();
//! let XY = op::scalar_mul_point(&curve, &y, &X).unwrap();
//! assert_eq!(XY, op::scalar_mul_point(&curve, &xy, curve.generator()).unwrap());
//! ```
use crate::{Curve, DomainError, Point, Scalar, backend::{self, Jacobian}, modular};
use num_bigint::BigUint;
use num_traits::Zero;

fn check(curve: &Curve, point: &Point) -> Result<(), DomainError> {
    if curve.contains(point) {
        Ok(())
    } else {
        Err(DomainError::PointNotOnCurve)
    }
}

/// Is `point` infinity or a point satisfying the curve equation?
pub fn is_on_curve(curve: &Curve, point: &Point) -> bool {
    curve.contains(point)
}

/// Adds two points, handling doubling and the identity.
pub fn point_add(curve: &Curve, A: &Point, B: &Point) -> Result<Point, DomainError> {
    check(curve, A)?;
    check(curve, B)?;
    Ok(Jacobian::from_affine(A)
        .add(&Jacobian::from_affine(B), curve)
        .to_affine(curve))
}

/// Subtracts one point from another.
pub fn point_sub(curve: &Curve, A: &Point, B: &Point) -> Result<Point, DomainError> {
    point_add(curve, A, &point_negate(curve, B)?)
}

/// Negates a point: `(x, p - y)`.
pub fn point_negate(curve: &Curve, A: &Point) -> Result<Point, DomainError> {
    check(curve, A)?;
    Ok(match A {
        Point::Infinity => Point::Infinity,
        Point::Affine { x, y } => Point::Affine {
            x: x.clone(),
            y: modular::neg(y, curve.p()),
        },
    })
}

/// Multiplies the point `A` by the scalar `x`.
pub fn scalar_mul_point(curve: &Curve, x: &Scalar, A: &Point) -> Result<Point, DomainError> {
    check(curve, A)?;
    Ok(backend::scalar_mul(curve, x.as_biguint(), A).to_affine(curve))
}

/// Multiplies `A` by an arbitrary integer, which is reduced mod `n` first.
pub fn int_mul_point(curve: &Curve, k: &BigUint, A: &Point) -> Result<Point, DomainError> {
    check(curve, A)?;
    Ok(backend::scalar_mul(curve, k, A).to_affine(curve))
}

/// Computes `x * A + y * B` more efficiently than calling
/// [`scalar_mul_point`] twice.
pub fn double_mul(
    curve: &Curve,
    x: &Scalar,
    A: &Point,
    y: &Scalar,
    B: &Point,
) -> Result<Point, DomainError> {
    check(curve, A)?;
    check(curve, B)?;
    Ok(backend::double_mul(curve, x.as_biguint(), A, y.as_biguint(), B).to_affine(curve))
}

/// Recovers the point with x-coordinate `x` and the given y parity.
///
/// Fails with [`DomainError::PointNotOnCurve`] if `x` is not reduced mod `p`
/// or `x³ + a·x + b` has no square root.
///
/// ```
/// use keyfun::{Curve, op};
/// let curve = Curve::secp256k1();
/// let G = curve.generator();
/// assert_eq!(&op::decompress(&curve, &G.x(), G.is_y_odd()).unwrap(), G);
/// ```
pub fn decompress(curve: &Curve, x: &BigUint, y_odd: bool) -> Result<Point, DomainError> {
    if x >= curve.p() {
        return Err(DomainError::PointNotOnCurve);
    }
    let y = modular::sqrt(&curve.rhs(x), curve.p()).ok_or(DomainError::PointNotOnCurve)?;
    let is_odd = !(&y % 2u32).is_zero();
    let y = if is_odd == y_odd {
        y
    } else {
        modular::neg(&y, curve.p())
    };
    Point::new(curve, x.clone(), y)
}

/// Adds two scalars together (modulo the curve order).
pub fn scalar_add(curve: &Curve, x: &Scalar, y: &Scalar) -> Scalar {
    Scalar::from_reduced(modular::add(x.as_biguint(), y.as_biguint(), curve.n()))
}

/// Subtracts one scalar from another.
pub fn scalar_sub(curve: &Curve, x: &Scalar, y: &Scalar) -> Scalar {
    Scalar::from_reduced(modular::sub(x.as_biguint(), y.as_biguint(), curve.n()))
}

/// Multiplies two scalars together (modulo the curve order).
pub fn scalar_mul(curve: &Curve, x: &Scalar, y: &Scalar) -> Scalar {
    Scalar::from_reduced(modular::mul(x.as_biguint(), y.as_biguint(), curve.n()))
}

/// Negates a scalar.
pub fn scalar_negate(curve: &Curve, x: &Scalar) -> Scalar {
    Scalar::from_reduced(modular::neg(x.as_biguint(), curve.n()))
}

/// Inverts a scalar. Zero has no inverse.
pub fn scalar_invert(curve: &Curve, x: &Scalar) -> Result<Scalar, DomainError> {
    if x.is_zero() {
        return Err(DomainError::ZeroScalar);
    }
    Ok(Scalar::from_reduced(modular::inverse(x.as_biguint(), curve.n())?))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curve::test::toy_curve;

    fn s(curve: &Curve, k: u32) -> Scalar {
        Scalar::from_biguint(curve, BigUint::from(k))
    }

    #[test]
    fn group_laws() {
        for curve in [toy_curve(), Curve::secp256k1()] {
            let G = curve.generator();
            let two_g = scalar_mul_point(&curve, &s(&curve, 2), G).unwrap();
            assert_eq!(point_add(&curve, G, G).unwrap(), two_g);
            assert_eq!(point_sub(&curve, &two_g, G).unwrap(), *G);
            assert_eq!(point_sub(&curve, G, G).unwrap(), Point::Infinity);
            assert_eq!(point_add(&curve, &Point::Infinity, G).unwrap(), *G);
            let minus_g = point_negate(&curve, G).unwrap();
            assert_eq!(point_add(&curve, G, &minus_g).unwrap(), Point::Infinity);
            assert_eq!(point_negate(&curve, &Point::Infinity).unwrap(), Point::Infinity);
        }
    }

    #[test]
    fn zero_scalar_gives_infinity() {
        let curve = Curve::secp256k1();
        let zero = s(&curve, 0);
        assert_eq!(
            scalar_mul_point(&curve, &zero, curve.generator()).unwrap(),
            Point::Infinity
        );
        assert_eq!(
            int_mul_point(&curve, curve.n(), curve.generator()).unwrap(),
            Point::Infinity
        );
        assert_eq!(scalar_invert(&curve, &zero), Err(DomainError::ZeroScalar));
    }

    #[test]
    fn off_curve_inputs_are_rejected() {
        let curve = Curve::secp256k1();
        let bogus = Point::Affine {
            x: BigUint::from(1u32),
            y: BigUint::from(1u32),
        };
        assert_eq!(
            point_add(&curve, curve.generator(), &bogus),
            Err(DomainError::PointNotOnCurve)
        );
        assert_eq!(
            scalar_mul_point(&curve, &s(&curve, 3), &bogus),
            Err(DomainError::PointNotOnCurve)
        );
        assert_eq!(
            decompress(&curve, &BigUint::from(0u32), false),
            Err(DomainError::PointNotOnCurve)
        );
        assert_eq!(
            decompress(&curve, curve.p(), false),
            Err(DomainError::PointNotOnCurve)
        );
    }

    #[test]
    fn decompress_every_toy_multiple() {
        let curve = toy_curve();
        let mut P = Point::Infinity;
        for _ in 0..300 {
            P = point_add(&curve, &P, curve.generator()).unwrap();
            let (x, _) = P.coordinates().unwrap();
            assert_eq!(decompress(&curve, x, P.is_y_odd()).unwrap(), P);
            assert_eq!(
                decompress(&curve, x, !P.is_y_odd()).unwrap(),
                point_negate(&curve, &P).unwrap()
            );
        }
    }

    #[test]
    fn scalar_arithmetic() {
        let curve = toy_curve();
        let a = s(&curve, 9000);
        let b = s(&curve, 1000);
        assert_eq!(scalar_add(&curve, &a, &b), s(&curve, 129));
        assert_eq!(scalar_sub(&curve, &b, &a), s(&curve, 1871));
        assert_eq!(scalar_negate(&curve, &b), s(&curve, 8871));
        let inv = scalar_invert(&curve, &a).unwrap();
        assert_eq!(scalar_mul(&curve, &a, &inv), s(&curve, 1));
    }
}
