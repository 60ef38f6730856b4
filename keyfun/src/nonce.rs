//! Nonce generation utilities
//!
//! An ECDSA nonce must be secret and never repeat for two different messages
//! signed under the same key. Rather than rely on a random number generator at
//! signing time the nonce is derived from the secret key and the message
//! digest following [RFC 6979] with HMAC-SHA256.
//!
//! Schemes take a [`NonceGen`] when they are instantiated. [`Deterministic`] is
//! the only one provided.
//!
//! [RFC 6979]: https://tools.ietf.org/html/rfc6979
use crate::{Curve, Scalar};
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn hmac(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// The HMAC-DRBG state after seeding with the secret and the digest
/// (RFC 6979 section 3.2 steps b to g).
fn seed(message_digest: &[u8; 32], secret: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];
    k = hmac(&k, &[&v, &[0x00], secret, message_digest]);
    v = hmac(&k, &[&v]);
    k = hmac(&k, &[&v, &[0x01], secret, message_digest]);
    v = hmac(&k, &[&v]);
    (k, v)
}

/// The first RFC 6979 candidate for a 256-bit group: `HMAC(k, v)` read as a
/// big-endian integer, after seeding with the 32-byte secret and digest.
///
/// The result is not reduced or range checked; see [`Deterministic`] for the
/// nonce stream a signer should actually use.
///
/// ```
/// use keyfun::{hash::sha256, nonce::deterministic_nonce};
/// let k = deterministic_nonce(&sha256(b"0"), &[0u8; 32]);
/// assert_eq!(
///     k.to_string(),
///     "32783320859482229023646250050688645858316445811207841524283044428614360139869"
/// );
/// ```
pub fn deterministic_nonce(message_digest: &[u8; 32], secret: &[u8; 32]) -> BigUint {
    let (k, v) = seed(message_digest, secret);
    BigUint::from_bytes_be(&hmac(&k, &[&v]))
}

/// A source of signing nonces.
///
/// `nonces` returns an endless stream of candidates for a given secret and
/// message digest. A signer takes the first candidate and moves to the next
/// only if the candidate gives a degenerate signature (`r = 0` or `s = 0`).
/// The stream must be a deterministic function of its inputs for signatures to
/// be reproducible.
pub trait NonceGen {
    /// The iterator of candidate nonces.
    type Nonces: Iterator<Item = Scalar>;

    /// Starts a nonce stream for signing `message_digest` with `secret`.
    fn nonces(&self, curve: &Curve, secret: &Scalar, message_digest: &[u8; 32]) -> Self::Nonces;
}

/// RFC 6979 deterministic nonces with HMAC-SHA256.
///
/// On secp256k1 the first nonce is exactly [`deterministic_nonce`].
///
/// # Example
///
/// ```
/// use keyfun::{Curve, Scalar, hash::sha256, nonce::{Deterministic, NonceGen}};
/// let curve = Curve::secp256k1();
/// let secret = Scalar::random(&curve, &mut rand::thread_rng());
/// let digest = sha256(b"message");
/// let first = Deterministic.nonces(&curve, &secret, &digest).next();
/// assert_eq!(first, Deterministic.nonces(&curve, &secret, &digest).next());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deterministic;

impl NonceGen for Deterministic {
    type Nonces = Rfc6979Nonces;

    fn nonces(&self, curve: &Curve, secret: &Scalar, message_digest: &[u8; 32]) -> Self::Nonces {
        let (k, v) = seed(message_digest, &secret.to_bytes());
        Rfc6979Nonces {
            k,
            v,
            n: curve.n().clone(),
            started: false,
        }
    }
}

/// The nonce stream of [`Deterministic`].
///
/// Each candidate is `bits2int(v)` for a fresh `v = HMAC(k, v)`: the 256-bit
/// output truncated to the bit length of `n`. Candidates outside `[1, n)` are
/// skipped. Between candidates the state is updated with
/// `k = HMAC(k, v ‖ 0x00)` and `v = HMAC(k, v)` (RFC 6979 section 3.2 step h.3).
#[derive(Clone, Debug)]
pub struct Rfc6979Nonces {
    k: [u8; 32],
    v: [u8; 32],
    n: BigUint,
    started: bool,
}

impl Iterator for Rfc6979Nonces {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        loop {
            if self.started {
                self.k = hmac(&self.k, &[&self.v, &[0x00]]);
                self.v = hmac(&self.k, &[&self.v]);
            }
            self.started = true;
            self.v = hmac(&self.k, &[&self.v]);
            let candidate = BigUint::from_bytes_be(&self.v) >> (256 - self.n.bits().min(256));
            if !candidate.is_zero() && candidate < self.n {
                return Some(Scalar::from_reduced(candidate));
            }
        }
    }
}
