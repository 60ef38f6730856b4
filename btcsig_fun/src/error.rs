use core::fmt;

/// Error returned by the signing functions of [`MessageSigner`].
///
/// [`MessageSigner`]: crate::MessageSigner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// The private key could not be decoded or was zero.
    Key(keyfun::Error),
    /// The signature just produced did not verify against the signing key.
    ///
    /// This never happens with a correct curve context. Seeing it means the
    /// curve parameters are inconsistent (e.g. `n` is not the order of `G`).
    SelfVerificationFailed,
    /// The nonce generator stopped producing candidates before one gave a
    /// valid signature.
    NoncesExhausted,
}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignError::Key(e) => write!(f, "invalid signing key: {}", e),
            SignError::SelfVerificationFailed => {
                write!(f, "produced signature failed to verify against the signing key")
            }
            SignError::NoncesExhausted => write!(f, "nonce generator ran out of candidates"),
        }
    }
}

impl std::error::Error for SignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SignError::Key(e) => Some(e),
            _ => None,
        }
    }
}

impl From<keyfun::Error> for SignError {
    fn from(e: keyfun::Error) -> Self {
        SignError::Key(e)
    }
}

impl From<keyfun::DomainError> for SignError {
    fn from(e: keyfun::DomainError) -> Self {
        SignError::Key(e.into())
    }
}
