//! Functions used to generate test data for property-based testing with [`proptest`].
//!
//! Strategies here are for secp256k1. Scalars include the pathological values
//! `1` and `n - 1` now and then.
//!
//! [`proptest`]: https://github.com/altsysrq/proptest
use crate::{Curve, Point, Scalar, keys::{PrivateKeyFormat, PublicKeyFormat}, op};
use ::proptest::prelude::*;
use num_bigint::BigUint;

prop_compose! {
    /// Generate a random `Scalar`.
    pub fn scalar()(
        bytes in any::<[u8; 32]>(),
    ) -> Scalar {
        Scalar::from_bytes_mod_order(&Curve::secp256k1(), &bytes)
    }
}

/// Generate a random, non-zero `Scalar`.
pub fn non_zero_scalar() -> impl Strategy<Value = Scalar> {
    let curve = Curve::secp256k1();
    let minus_one = curve.n() - 1u32;
    prop_oneof![
        1 => Just(Scalar::from_biguint(&curve, BigUint::from(1u32))),
        1 => Just(Scalar::from_biguint(&curve, minus_one)),
        18 => scalar().prop_filter("Value cannot be zero", |x| !x.is_zero()),
    ]
}

prop_compose! {
    /// Generate a random non-infinity `Point`.
    pub fn point()(
        x in non_zero_scalar(),
    ) -> Point {
        let curve = Curve::secp256k1();
        op::scalar_mul_point(&curve, &x, curve.generator())
            .unwrap_or(Point::Infinity)
    }
}

/// Any private key format.
pub fn private_key_format() -> impl Strategy<Value = PrivateKeyFormat> {
    ::proptest::sample::select(PrivateKeyFormat::DETECTION_ORDER.to_vec())
}

/// Any public key format that can be detected, so not the Electrum ones.
pub fn public_key_format() -> impl Strategy<Value = PublicKeyFormat> {
    ::proptest::sample::select(PublicKeyFormat::DETECTION_ORDER.to_vec())
}

prop_compose! {
    /// Generate a message between 0 and 200 bytes long.
    pub fn message()(
        bytes in ::proptest::collection::vec(any::<u8>(), 0..200),
    ) -> Vec<u8> {
        bytes
    }
}
