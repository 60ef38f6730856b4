//! Arithmetic on encoded keys.
//!
//! These decode their arguments, do the operation with the functions in
//! [`op`] and encode the result in the format of the first argument. Work with
//! [`Scalar`] and [`Point`] through [`op`] directly to skip the codecs.
//!
//! [`Scalar`]: crate::Scalar
//! [`Point`]: crate::Point
use super::{EncodedPrivateKey, EncodedPublicKey, PrivateKey, PublicKey};
use crate::{Curve, DomainError, Error, op};

fn private_binary(
    curve: &Curve,
    lhs: &EncodedPrivateKey,
    rhs: &EncodedPrivateKey,
    f: impl FnOnce(&Curve, &crate::Scalar, &crate::Scalar) -> crate::Scalar,
) -> Result<EncodedPrivateKey, Error> {
    let lhs = PrivateKey::decode(curve, lhs)?;
    let rhs = PrivateKey::decode(curve, rhs)?;
    Ok(lhs.with_scalar(f(curve, lhs.scalar(), rhs.scalar())).encode())
}

/// `(a + b) mod n`
///
/// ```
/// use keyfun::{Curve, keys::*};
/// use num_bigint::BigUint;
/// let curve = Curve::secp256k1();
/// let a = EncodedPrivateKey::from(BigUint::from(40u32));
/// // 2 as compressed hex
/// let b = EncodedPrivateKey::from(format!("{:064x}01", 2));
/// assert_eq!(add_private_keys(&curve, &a, &b).unwrap(), BigUint::from(42u32).into());
/// ```
pub fn add_private_keys(
    curve: &Curve,
    a: &EncodedPrivateKey,
    b: &EncodedPrivateKey,
) -> Result<EncodedPrivateKey, Error> {
    private_binary(curve, a, b, op::scalar_add)
}

/// `(a - b) mod n`
pub fn subtract_private_keys(
    curve: &Curve,
    a: &EncodedPrivateKey,
    b: &EncodedPrivateKey,
) -> Result<EncodedPrivateKey, Error> {
    private_binary(curve, a, b, op::scalar_sub)
}

/// `(a · b) mod n`
pub fn multiply_private_keys(
    curve: &Curve,
    a: &EncodedPrivateKey,
    b: &EncodedPrivateKey,
) -> Result<EncodedPrivateKey, Error> {
    private_binary(curve, a, b, op::scalar_mul)
}

/// `-a mod n`
pub fn negate_private_key(
    curve: &Curve,
    a: &EncodedPrivateKey,
) -> Result<EncodedPrivateKey, Error> {
    let a = PrivateKey::decode(curve, a)?;
    Ok(a.with_scalar(op::scalar_negate(curve, a.scalar())).encode())
}

/// `A + B`
pub fn add_public_keys(
    curve: &Curve,
    A: &EncodedPublicKey,
    B: &EncodedPublicKey,
) -> Result<EncodedPublicKey, DomainError> {
    let A = PublicKey::decode(curve, A)?;
    let B = PublicKey::decode(curve, B)?;
    Ok(A.with_point(op::point_add(curve, A.point(), B.point())?).encode())
}

/// `A - B`. Subtracting a key from itself gives the point at infinity, which
/// encodes as `02` followed by 32 zero bytes (see [`PublicKey`]).
pub fn subtract_public_keys(
    curve: &Curve,
    A: &EncodedPublicKey,
    B: &EncodedPublicKey,
) -> Result<EncodedPublicKey, DomainError> {
    let A = PublicKey::decode(curve, A)?;
    let B = PublicKey::decode(curve, B)?;
    Ok(A.with_point(op::point_sub(curve, A.point(), B.point())?).encode())
}

/// `-A`
pub fn negate_public_key(
    curve: &Curve,
    A: &EncodedPublicKey,
) -> Result<EncodedPublicKey, DomainError> {
    let A = PublicKey::decode(curve, A)?;
    Ok(A.with_point(op::point_negate(curve, A.point())?).encode())
}

/// `x · A`
pub fn multiply_public_key(
    curve: &Curve,
    A: &EncodedPublicKey,
    x: &EncodedPrivateKey,
) -> Result<EncodedPublicKey, Error> {
    let A = PublicKey::decode(curve, A)?;
    let x = PrivateKey::decode(curve, x)?;
    Ok(A.with_point(op::scalar_mul_point(curve, x.scalar(), A.point())?).encode())
}

/// `x⁻¹ · A`. Fails with [`DomainError::ZeroScalar`] if `x` is zero.
pub fn divide_public_key(
    curve: &Curve,
    A: &EncodedPublicKey,
    x: &EncodedPrivateKey,
) -> Result<EncodedPublicKey, Error> {
    let A = PublicKey::decode(curve, A)?;
    let x = PrivateKey::decode(curve, x)?;
    let x_inv = op::scalar_invert(curve, x.scalar())?;
    Ok(A.with_point(op::scalar_mul_point(curve, &x_inv, A.point())?).encode())
}

/// `x · G`, written in the public key format matching the private key's
/// format (compressed iff the private key carries the compression suffix).
pub fn private_key_to_public_key(
    curve: &Curve,
    x: &EncodedPrivateKey,
) -> Result<EncodedPublicKey, Error> {
    Ok(PrivateKey::decode(curve, x)?.public_key(curve)?.encode())
}
