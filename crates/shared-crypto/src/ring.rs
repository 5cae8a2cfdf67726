//! # Ring Signatures (SAG, secp256k1)
//!
//! Spontaneous anonymous group signatures over the delegation ring of an
//! application: the application's own key plus any delegated gateway keys.
//! A verifier learns that *some* ring member signed, never which one.
//!
//! The construction is the classic AOS/SAG challenge chain: starting from
//! the signer's commitment, each member's challenge is derived from the
//! previous member's response, and the signer closes the chain with its
//! secret key. Verification walks the whole chain and checks that it wraps
//! around to the starting challenge.

use k256::elliptic_curve::{
    ops::Reduce,
    sec1::{FromEncodedPoint, ToEncodedPoint},
    Field, PrimeField,
};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};
use sha2::{Digest, Sha256};

use crate::errors::CryptoError;
use crate::signer::SigningKeypair;

/// Length of a SEC1 compressed secp256k1 point.
pub const COMPRESSED_POINT_LEN: usize = 33;

/// A secp256k1 curve point representing one ring member's public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingPoint(ProjectivePoint);

impl RingPoint {
    /// Decode a SEC1 compressed public key (33 bytes) to a curve point.
    pub fn from_compressed_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != COMPRESSED_POINT_LEN {
            return Err(CryptoError::InvalidPublicKey);
        }
        let encoded =
            EncodedPoint::from_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(CryptoError::InvalidPublicKey)?;
        Ok(Self(ProjectivePoint::from(affine)))
    }

    /// Encode the point as SEC1 compressed bytes.
    #[must_use]
    pub fn to_compressed_bytes(&self) -> [u8; COMPRESSED_POINT_LEN] {
        let encoded = self.0.to_affine().to_encoded_point(true);
        let mut bytes = [0u8; COMPRESSED_POINT_LEN];
        bytes.copy_from_slice(encoded.as_bytes());
        bytes
    }
}

/// An ordered ring of public keys.
///
/// The owning application's key occupies index 0. Rings have at least two
/// members; callers with no delegatees duplicate the application key to
/// reach the minimum.
#[derive(Debug, Clone)]
pub struct Ring {
    points: Vec<RingPoint>,
}

impl Ring {
    /// Build a ring from curve points.
    ///
    /// # Errors
    ///
    /// [`CryptoError::RingTooSmall`] when fewer than two points are given.
    pub fn from_points(points: Vec<RingPoint>) -> Result<Self, CryptoError> {
        if points.len() < 2 {
            return Err(CryptoError::RingTooSmall {
                size: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Number of ring members (counting duplicates).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ring is empty. Never true for a constructed ring.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The ring's points, in order.
    #[must_use]
    pub fn points(&self) -> &[RingPoint] {
        &self.points
    }

    /// Challenge scalar for one step of the chain: binds the ring, the
    /// message, and the step's commitment point.
    fn challenge(&self, message: &[u8], commitment: &ProjectivePoint) -> Scalar {
        let mut hasher = Sha256::new();
        for point in &self.points {
            hasher.update(point.to_compressed_bytes());
        }
        hasher.update(message);
        hasher.update(RingPoint(*commitment).to_compressed_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(&digest))
    }
}

/// A ring signer: a ring plus the one member key we actually hold.
#[derive(Debug)]
pub struct RingSigner {
    ring: Ring,
    keypair: SigningKeypair,
    signer_index: usize,
}

impl RingSigner {
    /// Bind a keypair to its position in a ring.
    ///
    /// # Errors
    ///
    /// [`CryptoError::SignerNotInRing`] when the keypair's public key does
    /// not appear among the ring's points.
    pub fn new(ring: Ring, keypair: SigningKeypair) -> Result<Self, CryptoError> {
        let own_point = ProjectivePoint::from(*keypair.verifying_key().as_affine());
        let signer_index = ring
            .points()
            .iter()
            .position(|p| p.0 == own_point)
            .ok_or(CryptoError::SignerNotInRing)?;
        Ok(Self {
            ring,
            keypair,
            signer_index,
        })
    }

    /// The ring this signer signs over.
    #[must_use]
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// Produce a ring signature over `message`.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> RingSignature {
        let mut rng = rand::thread_rng();
        let n = self.ring.len();
        let j = self.signer_index;
        let secret = self.keypair.secret_scalar();

        let mut responses = vec![Scalar::ZERO; n];
        let mut challenges = vec![Scalar::ZERO; n];

        // Commit at the signer's slot, then walk the ring with random
        // responses until the chain returns to the signer.
        let nonce = Scalar::random(&mut rng);
        challenges[(j + 1) % n] = self
            .ring
            .challenge(message, &(ProjectivePoint::GENERATOR * nonce));

        let mut i = (j + 1) % n;
        while i != j {
            responses[i] = Scalar::random(&mut rng);
            let commitment =
                ProjectivePoint::GENERATOR * responses[i] + self.ring.points()[i].0 * challenges[i];
            let next = (i + 1) % n;
            challenges[next] = self.ring.challenge(message, &commitment);
            i = next;
        }

        // Close the chain: the signer's response absorbs its challenge.
        responses[j] = nonce - challenges[j] * secret;

        RingSignature {
            challenge: challenges[0],
            responses,
        }
    }
}

/// A SAG ring signature: the initial challenge plus one response per member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSignature {
    challenge: Scalar,
    responses: Vec<Scalar>,
}

impl RingSignature {
    /// Verify the signature over `message` against `ring`.
    #[must_use]
    pub fn verify(&self, ring: &Ring, message: &[u8]) -> bool {
        if self.responses.len() != ring.len() {
            return false;
        }

        let mut c = self.challenge;
        for (response, point) in self.responses.iter().zip(ring.points()) {
            let commitment = ProjectivePoint::GENERATOR * response + point.0 * c;
            c = ring.challenge(message, &commitment);
        }
        c == self.challenge
    }

    /// Serialize as `challenge || response_0 || ... || response_{n-1}`,
    /// 32 bytes per scalar.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(32 * (1 + self.responses.len()));
        bytes.extend_from_slice(&self.challenge.to_bytes());
        for response in &self.responses {
            bytes.extend_from_slice(&response.to_bytes());
        }
        bytes
    }

    /// Parse a serialized signature.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidSignatureFormat`] when the length is not a
    /// multiple of 32, holds fewer than three scalars, or any scalar is
    /// out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() % 32 != 0 || bytes.len() < 32 * 3 {
            return Err(CryptoError::InvalidSignatureFormat);
        }

        let mut scalars = bytes.chunks_exact(32).map(|chunk| {
            Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(chunk)))
                .ok_or(CryptoError::InvalidSignatureFormat)
        });

        let challenge = scalars.next().ok_or(CryptoError::InvalidSignatureFormat)??;
        let responses = scalars.collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            challenge,
            responses,
        })
    }
}
