//! Modular arithmetic over arbitrary-precision unsigned integers.
//!
//! Every function takes its modulus explicitly so the same code serves both the
//! field of the curve (mod `p`) and its scalars (mod `n`). Results are always
//! reduced into `[0, m)`.
use crate::DomainError;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

/// Returns the multiplicative inverse of `a` modulo `n` using the extended
/// Euclidean algorithm.
///
/// By convention the inverse of anything congruent to zero is zero. Fails with
/// [`DomainError::InvalidModulus`] if `n` is zero and with
/// [`DomainError::NotInvertible`] if `a` and `n` share a factor.
///
/// # Example
/// ```
/// use keyfun::modular::inverse;
/// use num_bigint::BigUint;
/// let inv = inverse(&BigUint::from(3u32), &BigUint::from(11u32)).unwrap();
/// assert_eq!(inv, BigUint::from(4u32));
/// assert_eq!(inverse(&BigUint::from(22u32), &BigUint::from(11u32)).unwrap(), BigUint::from(0u32));
/// ```
pub fn inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, DomainError> {
    if n.is_zero() {
        return Err(DomainError::InvalidModulus);
    }
    let a = a % n;
    if a.is_zero() {
        return Ok(BigUint::zero());
    }
    let mut low_m = BigInt::one();
    let mut high_m = BigInt::zero();
    let mut low = BigInt::from(a);
    let mut high = BigInt::from(n.clone());
    while low > BigInt::one() {
        let r = &high / &low;
        let next_m = &high_m - &low_m * &r;
        let next = &high - &low * &r;
        high_m = core::mem::replace(&mut low_m, next_m);
        high = core::mem::replace(&mut low, next);
    }
    if low.is_zero() {
        return Err(DomainError::NotInvertible);
    }
    let n = BigInt::from(n.clone());
    let mut inv = low_m % &n;
    if inv.is_negative() {
        inv += &n;
    }
    Ok(inv.magnitude().clone())
}

/// Computes `base^exp mod modulus`.
pub fn pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> Result<BigUint, DomainError> {
    if modulus.is_zero() {
        return Err(DomainError::InvalidModulus);
    }
    Ok(base.modpow(exp, modulus))
}

/// Finds a square root of `a` modulo the odd prime `p`, if one exists.
///
/// When `p ≡ 3 (mod 4)` (as it is for secp256k1) the root is the closed form
/// `a^((p+1)/4)`. Otherwise Tonelli–Shanks is used. Either way the candidate is
/// squared and compared against `a` so a non-residue is always reported as
/// `None` rather than as a wrong root.
pub fn sqrt(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    if p.is_zero() {
        return None;
    }
    let a = a % p;
    if a.is_zero() {
        return Some(a);
    }
    let one = BigUint::one();
    let four = BigUint::from(4u8);
    let root = if (p % &four) == BigUint::from(3u8) {
        a.modpow(&((p + &one) / &four), p)
    } else {
        tonelli_shanks(&a, p)?
    };
    if (&root * &root) % p == a {
        Some(root)
    } else {
        None
    }
}

fn tonelli_shanks(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let one = BigUint::one();
    let p_minus_one = p - &one;
    if a.modpow(&(&p_minus_one >> 1), p) != one {
        return None;
    }
    let s = p_minus_one.trailing_zeros().unwrap_or(0);
    let q = &p_minus_one >> s;
    let mut z = BigUint::from(2u8);
    while z.modpow(&(&p_minus_one >> 1), p) != p_minus_one {
        z += &one;
    }
    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + &one) >> 1), p);
    while t != one {
        let mut i = 0u64;
        let mut t_pow = t.clone();
        while t_pow != one {
            t_pow = (&t_pow * &t_pow) % p;
            i += 1;
            if i == m {
                return None;
            }
        }
        let mut b = c.clone();
        for _ in 0..(m - i - 1) {
            b = (&b * &b) % p;
        }
        m = i;
        c = (&b * &b) % p;
        t = (&t * &c) % p;
        r = (&r * &b) % p;
    }
    Some(r)
}

/// `(a + b) mod m`
pub fn add(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// `(a - b) mod m` for `a, b` already reduced mod `m`.
pub fn sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    if a >= b {
        (a - b) % m
    } else {
        (m - (b - a) % m) % m
    }
}

/// `(a * b) mod m`
pub fn mul(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// `-a mod m`
pub fn neg(a: &BigUint, m: &BigUint) -> BigUint {
    let a = a % m;
    if a.is_zero() { a } else { m - a }
}

/// Miller–Rabin with the first twelve primes as bases. Deterministic below
/// 3.3·10²⁴ and a strong probable-prime test above that.
pub fn is_probable_prime(n: &BigUint) -> bool {
    const BASES: [u8; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    let one = BigUint::one();
    if n <= &one {
        return false;
    }
    for base in BASES {
        let base = BigUint::from(base);
        if n == &base {
            return true;
        }
        if (n % &base).is_zero() {
            return false;
        }
    }
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    'witness: for base in BASES {
        let mut x = BigUint::from(base).modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Big-endian bytes of `value` left-padded with zeros to exactly `len` bytes.
pub fn to_fixed_bytes(value: &BigUint, len: usize) -> Result<Vec<u8>, DomainError> {
    if value.is_zero() {
        return Ok(vec![0u8; len]);
    }
    let bytes = value.to_bytes_be();
    if bytes.len() > len {
        return Err(DomainError::ValueTooLarge);
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

/// Big-endian 32-byte encoding of a value already known to be below 2²⁵⁶.
pub(crate) fn to_bytes32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    let start = 32usize.saturating_sub(bytes.len());
    out[start..].copy_from_slice(&bytes[bytes.len() - (32 - start)..]);
    out
}
