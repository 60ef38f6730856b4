#![doc = include_str!("../README.md")]
#![allow(non_snake_case)]
#![deny(missing_docs)]

pub use keyfun;
use keyfun::{
    Curve, DomainError, Point, Scalar, address, base58,
    hash::electrum_message_digest,
    keys::{
        EncodedPrivateKey, EncodedPublicKey, PrivateKey, PublicKey, PublicKeyFormat,
        encode_public_key,
    },
    nonce::{Deterministic, NonceGen},
    op,
};
use num_traits::Zero;

pub mod der;
mod error;
mod signature;
pub use der::Signature;
pub use error::SignError;
pub use signature::{RecoverableSignature, RecoveryId};

/// Signs and verifies Bitcoin signed messages with ECDSA over a [`Curve`].
///
/// Messages are hashed with [`electrum_message_digest`] (the
/// `"\x18Bitcoin Signed Message:\n"` framing) before signing. The `raw_*`
/// methods work on a digest the caller has already computed.
pub struct MessageSigner<NG = Deterministic> {
    /// The curve every key and signature is interpreted on.
    pub curve: Curve,
    /// Produces the signing nonces.
    pub nonce_gen: NG,
    /// `enforce_low_s`: Whether verification rejects signatures with `s > n/2` (see [BIP-146]).
    ///
    /// [BIP-146]: https://github.com/bitcoin/bips/blob/master/bip-0146.mediawiki#low_s
    pub enforce_low_s: bool,
}

impl MessageSigner<Deterministic> {
    /// A signer on `curve` using RFC 6979 nonces.
    pub fn new(curve: Curve) -> Self {
        MessageSigner {
            curve,
            nonce_gen: Deterministic,
            enforce_low_s: false,
        }
    }
}

impl Default for MessageSigner<Deterministic> {
    fn default() -> Self {
        MessageSigner::new(Curve::secp256k1())
    }
}

impl MessageSigner<()> {
    /// Creates a `MessageSigner` that cannot sign messages but can verify
    /// signatures and recover keys.
    pub fn verify_only(curve: Curve) -> Self {
        MessageSigner {
            curve,
            nonce_gen: (),
            enforce_low_s: false,
        }
    }
}

impl<NG> MessageSigner<NG> {
    /// A signer on `curve` with a custom nonce generator.
    pub fn with_nonce_gen(curve: Curve, nonce_gen: NG) -> Self {
        MessageSigner {
            curve,
            nonce_gen,
            enforce_low_s: false,
        }
    }

    /// Transforms the instance into one which enforces the [BIP-146] low s constraint.
    ///
    /// [BIP-146]: https://github.com/bitcoin/bips/blob/master/bip-0146.mediawiki#low_s
    pub fn enforce_low_s(self) -> Self {
        MessageSigner {
            enforce_low_s: true,
            ..self
        }
    }

    /// Verifies `signature` on a digest against a public key.
    ///
    /// Returns `false` for any `r` or `s` outside `[1, n)`, for a public key
    /// that is infinity or off the curve, and for high `s` when
    /// [`enforce_low_s`](Self::enforce_low_s) is on.
    pub fn raw_verify(&self, digest: &[u8; 32], signature: &Signature, public_key: &Point) -> bool {
        let curve = &self.curve;
        let (r, s) = signature.as_tuple();
        if r.is_zero() || s.is_zero() || &r >= curve.n() || &s >= curve.n() {
            return false;
        }
        if public_key.is_infinity() || !op::is_on_curve(curve, public_key) {
            return false;
        }
        let r = Scalar::from_biguint(curve, r);
        let s = Scalar::from_biguint(curve, s);
        // This ensures that there is only one valid s value per r for any given message.
        if s.is_high(curve) && self.enforce_low_s {
            return false;
        }

        let z = Scalar::from_bytes_mod_order(curve, digest);
        let s_inv = match op::scalar_invert(curve, &s) {
            Ok(s_inv) => s_inv,
            Err(_) => return false,
        };
        let u1 = op::scalar_mul(curve, &z, &s_inv);
        let u2 = op::scalar_mul(curve, &r, &s_inv);
        match op::double_mul(curve, &u1, curve.generator(), &u2, public_key) {
            Ok(implied_R) if !implied_R.is_infinity() => {
                Scalar::from_biguint(curve, implied_R.x()) == r
            }
            _ => false,
        }
    }

    /// Reconstructs the public key that produced `signature` on `digest`.
    ///
    /// With `R` the point selected by the recovery id this is
    /// `r⁻¹ · (s·R − z·G)`. Fails with [`DomainError::ZeroScalar`] or
    /// [`DomainError::ValueTooLarge`] if `r` or `s` is out of range and with
    /// [`DomainError::PointNotOnCurve`] if no such `R` exists or the result is
    /// the point at infinity.
    pub fn raw_recover(
        &self,
        digest: &[u8; 32],
        signature: &RecoverableSignature,
    ) -> Result<Point, DomainError> {
        let curve = &self.curve;
        let (r, s) = (signature.r_int(), signature.s_int());
        if r.is_zero() || s.is_zero() {
            return Err(DomainError::ZeroScalar);
        }
        if &r >= curve.n() || &s >= curve.n() {
            return Err(DomainError::ValueTooLarge);
        }
        let id = signature.recovery_id;
        let R_x = if id.is_x_overflow() { &r + curve.n() } else { r.clone() };
        let R = op::decompress(curve, &R_x, id.is_y_odd())?;

        let r = Scalar::from_biguint(curve, r);
        let s = Scalar::from_biguint(curve, s);
        let z = Scalar::from_bytes_mod_order(curve, digest);
        let r_inv = op::scalar_invert(curve, &r)?;
        let u1 = op::scalar_negate(curve, &op::scalar_mul(curve, &r_inv, &z));
        let u2 = op::scalar_mul(curve, &r_inv, &s);
        let Q = op::double_mul(curve, &u1, curve.generator(), &u2, &R)?;
        if Q.is_infinity() {
            return Err(DomainError::PointNotOnCurve);
        }
        Ok(Q)
    }

    /// Verifies a signature on `message` against a decoded public key.
    pub fn verify_with_public_key(
        &self,
        message: &[u8],
        signature: &RecoverableSignature,
        public_key: &Point,
    ) -> bool {
        self.raw_verify(
            &electrum_message_digest(message),
            &signature.to_signature(),
            public_key,
        )
    }

    /// Verifies a signature on `message` against an address by recovering the
    /// public key and comparing both of its addresses (compressed and
    /// uncompressed) under the address's magic byte.
    ///
    /// Errors only if `address` is not an address or fails its checksum. A
    /// signature that recovers no key verifies as `false`.
    pub fn verify_with_address(
        &self,
        message: &[u8],
        signature: &RecoverableSignature,
        address: &str,
    ) -> Result<bool, keyfun::Error> {
        if !address::is_address(address) {
            return Err(DomainError::UnrecognizedFormat.into());
        }
        let magic = base58::extract_version_byte(address)?;
        if self.enforce_low_s
            && Scalar::from_biguint(&self.curve, signature.s_int()).is_high(&self.curve)
        {
            return Ok(false);
        }
        let Q = match self.raw_recover(&electrum_message_digest(message), signature) {
            Ok(Q) => Q,
            Err(e) => {
                tracing::trace!(error = %e, "no public key recovered from signature");
                return Ok(false);
            }
        };
        Ok([false, true]
            .into_iter()
            .any(|compressed| address::point_to_address(&Q, compressed, magic) == address))
    }

    /// Verifies a base64 compact signature on `message`.
    ///
    /// `key` is either an encoded public key in any detectable format or, as
    /// text, an address. Returns `Ok(false)` for a well-formed signature that
    /// does not verify and an error for malformed input: bad base64, a wrong
    /// length, an invalid recovery id, an undecodable key or an address with
    /// a bad checksum.
    ///
    /// ```
    /// use btcsig_fun::MessageSigner;
    /// use keyfun::keys::EncodedPublicKey;
    /// let signer = MessageSigner::verify_only(keyfun::Curve::secp256k1());
    /// let signature =
    ///     "H/VExaH8AVzz4XW4tzUL3Sq762O6qH4NedIM0T+JHJlDTz3a8kSwGB7G4B3k86OJwG8vJeGgxRDOFMBY+125+ZU=";
    /// let address = EncodedPublicKey::from("1Dt8ty59tU9LkrXG2ocWeSzKFAY8fu6jga");
    /// assert!(signer.verify(b"hello", signature, &address).unwrap());
    /// assert!(!signer.verify(b"hellp", signature, &address).unwrap());
    /// ```
    pub fn verify(
        &self,
        message: &[u8],
        signature: &str,
        key: &EncodedPublicKey,
    ) -> Result<bool, keyfun::Error> {
        let signature = RecoverableSignature::from_base64(signature)?;
        match key {
            EncodedPublicKey::Text(text) if address::is_address(text) => {
                self.verify_with_address(message, &signature, text)
            }
            _ => {
                let public_key = PublicKey::decode(&self.curve, key)?;
                Ok(self.verify_with_public_key(message, &signature, public_key.point()))
            }
        }
    }

    /// Recovers the public key from a base64 compact signature on `message`.
    ///
    /// The key is returned as compressed hex if the recovery id says the
    /// signer's key was compressed (`31..=33`) and as uncompressed hex
    /// otherwise.
    pub fn recover(
        &self,
        message: &[u8],
        signature: &str,
    ) -> Result<EncodedPublicKey, keyfun::Error> {
        let signature = RecoverableSignature::from_base64(signature)?;
        let Q = self.raw_recover(&electrum_message_digest(message), &signature)?;
        let format = if signature.recovery_id.is_compressed() {
            PublicKeyFormat::HexCompressed
        } else {
            PublicKeyFormat::Hex
        };
        Ok(encode_public_key(&Q, format))
    }
}

impl<NG: NonceGen> MessageSigner<NG> {
    /// Produces a recoverable signature on a digest.
    ///
    /// Nonces are taken from the generator until one gives non-zero `r` and
    /// `s` and a recovery id other than 3 (`R.x ≥ n` with odd `y`). `s` is
    /// always made low and the recovery id is adjusted to match.
    /// The compression flag is taken from the key's format.
    pub fn raw_sign(
        &self,
        digest: &[u8; 32],
        key: &PrivateKey,
    ) -> Result<RecoverableSignature, SignError> {
        let curve = &self.curve;
        let x = key.scalar();
        if x.is_zero() {
            return Err(DomainError::ZeroScalar.into());
        }
        let z = Scalar::from_bytes_mod_order(curve, digest);
        for k in self.nonce_gen.nonces(curve, x, digest) {
            let R = op::scalar_mul_point(curve, &k, curve.generator())?;
            if R.is_infinity() {
                continue;
            }
            // r is R's x-coordinate reduced mod n. When R.x ≥ n the recovery
            // id has to record the overflow.
            let R_x = R.x();
            let overflow = &R_x >= curve.n();
            let r = Scalar::from_biguint(curve, R_x);
            if r.is_zero() {
                continue;
            }
            let k_inv = op::scalar_invert(curve, &k)?;
            let mut s = op::scalar_mul(
                curve,
                &k_inv,
                &op::scalar_add(curve, &z, &op::scalar_mul(curve, &r, x)),
            );
            if s.is_zero() {
                continue;
            }
            let mut y_odd = R.is_y_odd();
            // s values must be low (at most half the group order), otherwise
            // signatures would be malleable i.e. (r, s) and (r, -s) would both
            // be valid signatures. Negating s negates R.
            if s.is_high(curve) {
                s = op::scalar_negate(curve, &s);
                y_odd = !y_odd;
            }
            // recovery id 3 is not accepted on the wire
            if overflow && y_odd {
                tracing::trace!("skipping nonce whose R overflows n with odd y");
                continue;
            }
            let recovery_id =
                RecoveryId::new((y_odd as u8) | ((overflow as u8) << 1), key.is_compressed())?;
            return Ok(RecoverableSignature {
                recovery_id,
                r: r.to_bytes(),
                s: s.to_bytes(),
            });
        }
        Err(SignError::NoncesExhausted)
    }

    /// Signs `message` with an encoded private key.
    ///
    /// The signature is verified against the key's public key before it is
    /// returned; if that fails [`SignError::SelfVerificationFailed`] is
    /// returned instead of the signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use btcsig_fun::MessageSigner;
    /// use keyfun::keys::EncodedPrivateKey;
    /// let signer = MessageSigner::default();
    /// let key = EncodedPrivateKey::from("KzpjABzbCjoxyhxzweCzGG3fqpKgbgJpsJeTqGV37f2KN7RM9eGD");
    /// let signature = signer.sign(b"hello", &key).unwrap();
    /// assert_eq!(
    ///     signature.to_base64(),
    ///     "H/VExaH8AVzz4XW4tzUL3Sq762O6qH4NedIM0T+JHJlDTz3a8kSwGB7G4B3k86OJwG8vJeGgxRDOFMBY+125+ZU="
    /// );
    /// ```
    pub fn sign(
        &self,
        message: &[u8],
        key: &EncodedPrivateKey,
    ) -> Result<RecoverableSignature, SignError> {
        let key = PrivateKey::decode(&self.curve, key)?;
        let digest = electrum_message_digest(message);
        let signature = self.raw_sign(&digest, &key)?;
        let public_key = key.public_key(&self.curve)?;
        if !self.raw_verify(&digest, &signature.to_signature(), public_key.point()) {
            tracing::error!(
                header = signature.recovery_id.to_header(),
                n_bits = self.curve.n().bits(),
                "signature failed to verify against its own key"
            );
            return Err(SignError::SelfVerificationFailed);
        }
        Ok(signature)
    }
}
