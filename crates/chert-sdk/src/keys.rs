//! Key material for the stealth subsystem.
//!
//! Scalars live on edwards25519; public keys are compressed Edwards points,
//! hex-encoded (64 characters) on the wire. Secret scalars are wrapped in
//! [`SecretScalar`], which zeroizes on drop and redacts itself from `Debug`
//! output. Externally supplied public keys are always validated before they
//! participate in any derivation.

use std::fmt;

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::{Result, SdkError};

/// Wire length of a hex-encoded public key.
pub const PUBLIC_KEY_HEX_LEN: usize = 64;

/// A secret scalar that zeroizes its bytes on drop.
#[derive(Clone)]
pub struct SecretScalar {
    bytes: [u8; 32],
}

impl SecretScalar {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn from_scalar(scalar: &Scalar) -> Self {
        Self {
            bytes: scalar.to_bytes(),
        }
    }

    pub fn to_scalar(&self) -> Scalar {
        Scalar::from_bytes_mod_order(self.bytes)
    }

    /// Raw bytes, for caller-owned storage. Handle with care.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretScalar(..)")
    }
}

/// A scalar/point keypair with `public = secret * G`.
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretScalar,
    /// Compressed Edwards encoding of the public point.
    pub public: [u8; 32],
}

impl KeyPair {
    /// Generate a fresh keypair from OS entropy.
    pub fn generate() -> Result<Self> {
        let scalar = random_scalar()?;
        Ok(Self::from_scalar(&scalar))
    }

    /// Rebuild a keypair from stored secret bytes.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        Self::from_scalar(&Scalar::from_bytes_mod_order(*bytes))
    }

    fn from_scalar(scalar: &Scalar) -> Self {
        let public = (scalar * ED25519_BASEPOINT_POINT).compress().to_bytes();
        Self {
            secret: SecretScalar::from_scalar(scalar),
            public,
        }
    }

    pub fn secret(&self) -> &SecretScalar {
        &self.secret
    }

    pub fn public_hex(&self) -> String {
        hex::encode(self.public)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public_hex())
            .finish_non_exhaustive()
    }
}

/// A recipient's published privacy identity: view keypair for detecting
/// incoming payments, spend keypair for authorizing their spend.
#[derive(Debug, Clone)]
pub struct StealthKeySet {
    pub view: KeyPair,
    pub spend: KeyPair,
}

impl StealthKeySet {
    pub fn generate() -> Result<Self> {
        Ok(Self {
            view: KeyPair::generate()?,
            spend: KeyPair::generate()?,
        })
    }

    /// The published meta-address: (view public, spend public).
    pub fn meta_address(&self) -> ([u8; 32], [u8; 32]) {
        (self.view.public, self.spend.public)
    }
}

fn random_scalar() -> Result<Scalar> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SdkError::KeyGeneration(format!("OS entropy source unavailable: {}", e)))?;
    let scalar = Scalar::from_bytes_mod_order(bytes);
    bytes.zeroize();
    Ok(scalar)
}

/// Check whether bytes encode a usable public key: a canonical curve point
/// that is neither the identity nor of small order.
pub fn validate_public(bytes: &[u8; 32]) -> bool {
    decode_point(bytes).is_ok()
}

/// Decode and validate a compressed public key, rejecting non-canonical
/// encodings, the identity, and small-order points before any arithmetic
/// touches them.
pub(crate) fn decode_point(bytes: &[u8; 32]) -> Result<EdwardsPoint> {
    let point = CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or_else(|| SdkError::InvalidKey("Not a valid curve point".into()))?;
    // Decompression tolerates unreduced y-coordinates; insist the bytes are
    // the canonical encoding of the point they name.
    if point.compress().to_bytes() != *bytes {
        return Err(SdkError::InvalidKey("Non-canonical point encoding".into()));
    }
    if point.is_identity() {
        return Err(SdkError::InvalidKey("Identity point rejected".into()));
    }
    if point.is_small_order() {
        return Err(SdkError::InvalidKey("Small-order point rejected".into()));
    }
    Ok(point)
}

/// Decode a hex-encoded public key from an external source.
pub fn decode_public_key(hex_key: &str) -> Result<[u8; 32]> {
    if hex_key.len() != PUBLIC_KEY_HEX_LEN {
        return Err(SdkError::InvalidKey(format!(
            "Public key must be {} hex characters, got {}",
            PUBLIC_KEY_HEX_LEN,
            hex_key.len()
        )));
    }
    let bytes =
        hex::decode(hex_key).map_err(|_| SdkError::InvalidKey("Invalid hex encoding".into()))?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    decode_point(&key)?;
    Ok(key)
}
