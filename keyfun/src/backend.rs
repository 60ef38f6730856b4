//! Group arithmetic in Jacobian coordinates.
//!
//! A Jacobian point `(X, Y, Z)` represents the affine point `(X/Z², Y/Z³)` and
//! `Z = 0` is the point at infinity. Working projectively means a chain of
//! additions needs a single field inversion at the very end. The formulas are
//! the general-`a` ones (`dbl-1998-cmo-2` and `add-1998-cmo-2`) so they work for
//! any short Weierstrass curve, not just `a = 0`.
use crate::{Curve, Point, modular};
use num_bigint::BigUint;
use num_traits::{One, Zero};

#[derive(Clone, Debug)]
pub(crate) struct Jacobian {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

struct Field<'a>(&'a BigUint);

impl Field<'_> {
    fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        modular::add(a, b, self.0)
    }
    fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        modular::sub(a, b, self.0)
    }
    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        modular::mul(a, b, self.0)
    }
    fn square(&self, a: &BigUint) -> BigUint {
        modular::mul(a, a, self.0)
    }
    fn small(&self, k: u32, a: &BigUint) -> BigUint {
        (a * k) % self.0
    }
}

impl Jacobian {
    pub(crate) fn infinity() -> Self {
        Jacobian {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    pub(crate) fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub(crate) fn from_affine(point: &Point) -> Self {
        match point {
            Point::Infinity => Self::infinity(),
            Point::Affine { x, y } => Jacobian {
                x: x.clone(),
                y: y.clone(),
                z: BigUint::one(),
            },
        }
    }

    pub(crate) fn to_affine(&self, curve: &Curve) -> Point {
        if self.is_infinity() {
            return Point::Infinity;
        }
        let f = Field(curve.p());
        // p is prime so z^(p-2) = z⁻¹
        let z_inv = self.z.modpow(&(curve.p() - 2u32), curve.p());
        let z_inv2 = f.square(&z_inv);
        let z_inv3 = f.mul(&z_inv2, &z_inv);
        Point::Affine {
            x: f.mul(&self.x, &z_inv2),
            y: f.mul(&self.y, &z_inv3),
        }
    }

    pub(crate) fn double(&self, curve: &Curve) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::infinity();
        }
        let f = Field(curve.p());
        let xx = f.square(&self.x);
        let yy = f.square(&self.y);
        let yyyy = f.square(&yy);
        let zz = f.square(&self.z);
        let s = f.small(4, &f.mul(&self.x, &yy));
        let m = f.add(&f.small(3, &xx), &f.mul(curve.a(), &f.square(&zz)));
        let x3 = f.sub(&f.square(&m), &f.small(2, &s));
        let y3 = f.sub(&f.mul(&m, &f.sub(&s, &x3)), &f.small(8, &yyyy));
        let z3 = f.small(2, &f.mul(&self.y, &self.z));
        Jacobian {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    pub(crate) fn add(&self, other: &Jacobian, curve: &Curve) -> Self {
        if self.is_infinity() {
            return other.clone();
        }
        if other.is_infinity() {
            return self.clone();
        }
        let f = Field(curve.p());
        let z1z1 = f.square(&self.z);
        let z2z2 = f.square(&other.z);
        let u1 = f.mul(&self.x, &z2z2);
        let u2 = f.mul(&other.x, &z1z1);
        let s1 = f.mul(&self.y, &f.mul(&other.z, &z2z2));
        let s2 = f.mul(&other.y, &f.mul(&self.z, &z1z1));
        let h = f.sub(&u2, &u1);
        let r = f.sub(&s2, &s1);
        if h.is_zero() {
            return if r.is_zero() {
                self.double(curve)
            } else {
                Self::infinity()
            };
        }
        let hh = f.square(&h);
        let hhh = f.mul(&h, &hh);
        let v = f.mul(&u1, &hh);
        let x3 = f.sub(&f.sub(&f.square(&r), &hhh), &f.small(2, &v));
        let y3 = f.sub(&f.mul(&r, &f.sub(&v, &x3)), &f.mul(&s1, &hhh));
        let z3 = f.mul(&f.mul(&self.z, &other.z), &h);
        Jacobian {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    pub(crate) fn negate(&self, curve: &Curve) -> Self {
        Jacobian {
            x: self.x.clone(),
            y: modular::neg(&self.y, curve.p()),
            z: self.z.clone(),
        }
    }
}

fn bit(le_bytes: &[u8], i: u64) -> bool {
    le_bytes
        .get((i / 8) as usize)
        .is_some_and(|byte| (byte >> (i % 8)) & 1 == 1)
}

/// Montgomery ladder over a fixed number of iterations (the bit length of
/// `n`) so the sequence of group operations doesn't depend on `k`. The
/// underlying bignum arithmetic is still variable time.
pub(crate) fn scalar_mul(curve: &Curve, k: &BigUint, point: &Point) -> Jacobian {
    let k = k % curve.n();
    if k.is_zero() || point.is_infinity() {
        return Jacobian::infinity();
    }
    let k_bytes = k.to_bytes_le();
    let mut r0 = Jacobian::infinity();
    let mut r1 = Jacobian::from_affine(point);
    for i in (0..curve.n().bits()).rev() {
        if bit(&k_bytes, i) {
            r0 = r0.add(&r1, curve);
            r1 = r1.double(curve);
        } else {
            r1 = r0.add(&r1, curve);
            r0 = r0.double(curve);
        }
    }
    r0
}

/// `x·A + y·B` with Shamir's trick.
pub(crate) fn double_mul(
    curve: &Curve,
    x: &BigUint,
    a: &Point,
    y: &BigUint,
    b: &Point,
) -> Jacobian {
    let x = x % curve.n();
    let y = y % curve.n();
    let a = Jacobian::from_affine(a);
    let b = Jacobian::from_affine(b);
    let ab = a.add(&b, curve);
    let (x_bytes, y_bytes) = (x.to_bytes_le(), y.to_bytes_le());
    let mut acc = Jacobian::infinity();
    for i in (0..x.bits().max(y.bits())).rev() {
        acc = acc.double(curve);
        match (bit(&x_bytes, i), bit(&y_bytes, i)) {
            (true, true) => acc = acc.add(&ab, curve),
            (true, false) => acc = acc.add(&a, curve),
            (false, true) => acc = acc.add(&b, curve),
            (false, false) => {}
        }
    }
    acc
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curve::test::toy_curve;

    fn naive_mul(curve: &Curve, k: u32, point: &Point) -> Point {
        let mut acc = Jacobian::infinity();
        let p = Jacobian::from_affine(point);
        for _ in 0..k {
            acc = acc.add(&p, curve);
        }
        acc.to_affine(curve)
    }

    #[test]
    fn ladder_matches_repeated_addition() {
        let curve = toy_curve();
        let g = curve.generator();
        for k in [0u32, 1, 2, 3, 7, 64, 255, 9870, 9871, 9872] {
            let expected = naive_mul(&curve, k % 9871, g);
            let got = scalar_mul(&curve, &BigUint::from(k), g).to_affine(&curve);
            assert_eq!(got, expected, "k = {}", k);
            assert!(curve.contains(&got));
        }
    }

    #[test]
    fn add_handles_inverse_and_equal_points() {
        let curve = toy_curve();
        let g = Jacobian::from_affine(curve.generator());
        assert!(g.add(&g.negate(&curve), &curve).is_infinity());
        assert_eq!(
            g.add(&g, &curve).to_affine(&curve),
            g.double(&curve).to_affine(&curve)
        );
        // same point with a different Z
        let g2 = g.double(&curve);
        let g3 = g2.add(&g, &curve);
        let g3_other = g.add(&g2, &curve);
        assert_eq!(g3.to_affine(&curve), g3_other.to_affine(&curve));
    }

    #[test]
    fn double_mul_matches_separate_muls() {
        let curve = Curve::secp256k1();
        let g = curve.generator();
        let h = scalar_mul(&curve, &BigUint::from(1234567u32), g).to_affine(&curve);
        let x = BigUint::from(987654321u64);
        let y = BigUint::from(55555u32);
        let expected = scalar_mul(&curve, &x, g)
            .add(&scalar_mul(&curve, &y, &h), &curve)
            .to_affine(&curve);
        assert_eq!(double_mul(&curve, &x, g, &y, &h).to_affine(&curve), expected);
    }

    #[test]
    fn order_times_generator_is_infinity() {
        let curve = Curve::secp256k1();
        let n_minus_one = curve.n() - 1u32;
        let minus_g = scalar_mul(&curve, &n_minus_one, curve.generator());
        let g = Jacobian::from_affine(curve.generator());
        assert!(minus_g.add(&g, &curve).is_infinity());
    }
}
