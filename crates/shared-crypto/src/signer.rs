//! # Relay Response Signing (ECDSA secp256k1)
//!
//! The supplier signs every relay response hash with its configured signing
//! key. RFC 6979 deterministic nonces, so signing needs no RNG.

use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use k256::Scalar;
use zeroize::Zeroize;

use crate::errors::CryptoError;

/// secp256k1 keypair backing both the simple signer and ring signers.
#[derive(Clone, Debug)]
pub struct SigningKeypair {
    signing_key: SigningKey,
}

impl SigningKeypair {
    /// Generate a random keypair.
    #[must_use]
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// The public key in SEC1 compressed form (33 bytes).
    ///
    /// # Panics
    ///
    /// Does not panic: a compressed secp256k1 public key is always exactly
    /// 33 bytes (one parity byte plus the 32-byte x-coordinate).
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; 33] {
        let sec1 = self.signing_key.verifying_key().to_sec1_bytes();
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(&sec1[..33]);
        bytes
    }

    /// The verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// The secret scalar, needed to close a ring signature.
    pub(crate) fn secret_scalar(&self) -> Scalar {
        *self.signing_key.as_nonzero_scalar().as_ref()
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> [u8; 64] {
        let sig: Signature = self.signing_key.sign(digest);
        sig.to_bytes().into()
    }
}

impl Drop for SigningKeypair {
    fn drop(&mut self) {
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

/// Signs digests with a single key. Used for relay responses, where the
/// supplier signs in its own name rather than on behalf of a ring.
pub struct SimpleSigner {
    keypair: SigningKeypair,
}

impl SimpleSigner {
    /// Wrap a keypair into a signer.
    #[must_use]
    pub fn new(keypair: SigningKeypair) -> Self {
        Self { keypair }
    }

    /// Sign a 32-byte digest, returning the signature as r || s.
    #[must_use]
    pub fn sign(&self, digest: &[u8; 32]) -> [u8; 64] {
        self.keypair.sign_digest(digest)
    }

    /// The signer's public key in SEC1 compressed form.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.keypair.public_key_bytes()
    }
}

/// Verify an r || s signature over a digest against a compressed public key.
pub fn verify_signature(
    public_key: &[u8],
    digest: &[u8; 32],
    signature: &[u8; 64],
) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_sec1_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig =
        Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;
    verifying_key
        .verify(digest, &sig)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
