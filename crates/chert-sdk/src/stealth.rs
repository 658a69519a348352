//! Dual-key stealth addressing.
//!
//! ## Protocol
//!
//! ### Recipient setup
//! 1. Generate view keypair (v, V) and spend keypair (b, B)
//! 2. Publish the meta-address (V, B)
//!
//! ### Sender
//! 1. Generate ephemeral keypair (r, R), fresh per transaction
//! 2. Shared secret: ss = r·V
//! 3. One-time destination: P = B + H(ss)·G
//! 4. Address funds to P, embed R in the transaction, discard r
//!
//! ### Recipient scanning
//! 1. For each output with ephemeral key R: ss = v·R (same value as sender's)
//! 2. If B + H(ss)·G matches the destination, the output is theirs
//! 3. Spending key: p = b + H(ss), so that p·G = P
//!
//! An observer sees only (R, P), neither of which links back to (V, B)
//! without knowledge of v. The hash H is domain-separated so the same
//! shared secret keys the spend tweak and the memo cipher independently.

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Result, SdkError};
use crate::keys::{decode_point, decode_public_key, KeyPair, SecretScalar};

/// Domain tag for deriving the one-time spend tweak from a shared secret.
const STEALTH_SPEND_DOMAIN: &[u8] = b"chert/stealth-spend/v1";
/// Domain tag for deriving the memo encryption key from a shared secret.
const MEMO_KEY_DOMAIN: &[u8] = b"chert/memo-key/v1";

pub const STEALTH_ADDRESS_PREFIX: &str = "stealth_";

/// Diffie-Hellman shared secret between an ephemeral key and a view key.
///
/// Never transmitted; each side recomputes it independently. Zeroized on
/// drop and redacted from `Debug` output.
pub struct SharedSecret {
    bytes: [u8; 32],
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// Compute `my_secret * their_public`, validating `their_public` first.
///
/// Symmetric: `derive_shared_secret(r, V) == derive_shared_secret(v, R)`.
pub fn derive_shared_secret(my_secret: &SecretScalar, their_public: &[u8; 32]) -> Result<SharedSecret> {
    let point = decode_point(their_public)?;
    Ok(shared_from_point(&my_secret.to_scalar(), &point))
}

fn shared_from_point(secret: &Scalar, point: &EdwardsPoint) -> SharedSecret {
    SharedSecret {
        bytes: (secret * point).compress().to_bytes(),
    }
}

/// One-way, domain-separated reduction of a shared secret to a scalar.
///
/// Distinct domain labels yield independent scalars from the same secret,
/// so the spend tweak can never be reinterpreted as a memo key or vice
/// versa.
pub fn secret_to_scalar(shared: &SharedSecret, domain: &[u8]) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(shared.as_bytes());
    let mut hash: [u8; 32] = hasher.finalize().into();
    let scalar = Scalar::from_bytes_mod_order(hash);
    hash.zeroize();
    scalar
}

fn stealth_tweak(shared: &SharedSecret) -> Scalar {
    secret_to_scalar(shared, STEALTH_SPEND_DOMAIN)
}

/// AES-256 key for memo encryption, derived from the shared secret under
/// its own domain label. Long-term keys never key the memo cipher.
fn memo_key(shared: &SharedSecret) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(MEMO_KEY_DOMAIN);
    hasher.update(shared.as_bytes());
    hasher.finalize().into()
}

/// A recipient's registered privacy identity, assembled from their
/// published keys. Pure data; no curve work happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthAccount {
    /// Deterministic handle for the identity, `stealth_`-prefixed.
    pub address: String,
    /// Hex-encoded view public key.
    pub view_public: String,
    /// Hex-encoded spend public key.
    pub spend_public: String,
}

/// Record a recipient's published (view, spend) identity for later address
/// generation.
pub fn create_stealth_account(view_public: &str, spend_public: &str) -> Result<StealthAccount> {
    if view_public.is_empty() || spend_public.is_empty() {
        return Err(SdkError::validation(
            "keys",
            "View key and spend public key are required",
        ));
    }
    let view = decode_public_key(view_public)?;
    let spend = decode_public_key(spend_public)?;

    let mut hasher = Sha256::new();
    hasher.update(view);
    hasher.update(spend);
    let digest = hex::encode(hasher.finalize());

    Ok(StealthAccount {
        address: format!("{}{}", STEALTH_ADDRESS_PREFIX, &digest[..40]),
        view_public: hex::encode(view),
        spend_public: hex::encode(spend),
    })
}

/// One-time destination for a single private transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthAddress {
    /// P = B + H(ss)·G
    #[serde(with = "hex::serde")]
    pub one_time_public: [u8; 32],
    /// R = r·G, embedded so the recipient can recompute the shared secret.
    #[serde(with = "hex::serde")]
    pub ephemeral_public: [u8; 32],
    /// Wire encoding of the one-time destination.
    pub encoded_address: String,
}

/// Output of [`derive_send_address`]: the address plus the shared secret,
/// returned together so memo encryption reuses the same exchange instead of
/// regenerating the ephemeral.
pub struct StealthDerivation {
    pub address: StealthAddress,
    pub shared_secret: SharedSecret,
}

/// Sender side: derive a fresh one-time destination for a recipient.
///
/// Generates a new ephemeral keypair every call; two calls for the same
/// recipient are unlinkable. The ephemeral secret is dropped before this
/// function returns.
pub fn derive_send_address(
    recipient_view_public: &[u8; 32],
    recipient_spend_public: &[u8; 32],
) -> Result<StealthDerivation> {
    let view_point = decode_point(recipient_view_public)?;
    let spend_point = decode_point(recipient_spend_public)?;

    let ephemeral = KeyPair::generate()?;
    let shared = shared_from_point(&ephemeral.secret().to_scalar(), &view_point);

    let one_time_point = spend_point + stealth_tweak(&shared) * ED25519_BASEPOINT_POINT;
    let one_time_public = one_time_point.compress().to_bytes();

    Ok(StealthDerivation {
        address: StealthAddress {
            one_time_public,
            ephemeral_public: ephemeral.public,
            encoded_address: encode_stealth_address(&one_time_public),
        },
        shared_secret: shared,
    })
}

/// Recipient side: derive the scalar that spends an output sent to a
/// one-time address. Satisfies `(b + H(ss)) * G == P`.
pub fn recover_one_time_secret(
    view_secret: &SecretScalar,
    spend_secret: &SecretScalar,
    ephemeral_public: &[u8; 32],
) -> Result<SecretScalar> {
    let shared = derive_shared_secret(view_secret, ephemeral_public)?;
    let one_time = spend_secret.to_scalar() + stealth_tweak(&shared);
    Ok(SecretScalar::from_scalar(&one_time))
}

/// Recipient side: test whether an `(R, P)` pair is addressed to the holder
/// of `view_secret` / `spend_public`. Needs no spend secret, so it can run
/// on a view-only scanner. Comparison is constant-time.
pub fn belongs_to(
    view_secret: &SecretScalar,
    spend_public: &[u8; 32],
    ephemeral_public: &[u8; 32],
    one_time_public: &[u8; 32],
) -> bool {
    let spend_point = match decode_point(spend_public) {
        Ok(p) => p,
        Err(_) => return false,
    };
    let shared = match derive_shared_secret(view_secret, ephemeral_public) {
        Ok(s) => s,
        Err(_) => return false,
    };

    let expected = spend_point + stealth_tweak(&shared) * ED25519_BASEPOINT_POINT;
    bool::from(expected.compress().to_bytes().ct_eq(one_time_public))
}

pub fn encode_stealth_address(one_time_public: &[u8; 32]) -> String {
    format!("{}{}", STEALTH_ADDRESS_PREFIX, hex::encode(one_time_public))
}

/// Decode a one-time destination address back to its public key, rejecting
/// malformed input before any arithmetic is attempted.
pub fn decode_stealth_address(address: &str) -> Result<[u8; 32]> {
    let payload = address
        .strip_prefix(STEALTH_ADDRESS_PREFIX)
        .ok_or_else(|| SdkError::InvalidKey("Missing stealth address prefix".into()))?;
    decode_public_key(payload)
}

/// Memo ciphertext as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMemo {
    /// Hex-encoded AES-256-GCM ciphertext (tag included).
    pub ciphertext: String,
    /// Hex-encoded 96-bit nonce.
    pub nonce: String,
}

/// Encrypt a memo under the transaction's shared secret.
pub fn encrypt_memo(memo: &str, shared: &SharedSecret) -> Result<EncryptedMemo> {
    let mut key = memo_key(shared);
    let cipher = Aes256Gcm::new_from_slice(&key).expect("Valid key length");
    key.zeroize();

    let mut nonce_bytes = [0u8; 12];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| SdkError::KeyGeneration(format!("OS entropy source unavailable: {}", e)))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, memo.as_bytes())
        .map_err(|_| SdkError::Crypto("Memo encryption failed".into()))?;

    Ok(EncryptedMemo {
        ciphertext: hex::encode(ciphertext),
        nonce: hex::encode(nonce_bytes),
    })
}

/// Decrypt a memo with the recipient-recomputed shared secret.
pub fn decrypt_memo(memo: &EncryptedMemo, shared: &SharedSecret) -> Result<String> {
    let ciphertext = hex::decode(&memo.ciphertext)
        .map_err(|_| SdkError::Serialization("Invalid memo ciphertext encoding".into()))?;
    let nonce_bytes = hex::decode(&memo.nonce)
        .map_err(|_| SdkError::Serialization("Invalid memo nonce encoding".into()))?;
    if nonce_bytes.len() != 12 {
        return Err(SdkError::Serialization("Memo nonce must be 96 bits".into()));
    }

    let mut key = memo_key(shared);
    let cipher = Aes256Gcm::new_from_slice(&key).expect("Valid key length");
    key.zeroize();

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| SdkError::Crypto("Memo decryption failed".into()))?;

    String::from_utf8(plaintext).map_err(|_| SdkError::Crypto("Memo is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StealthKeySet;

    #[test]
    fn shared_secret_is_symmetric() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();

        let ab = derive_shared_secret(a.secret(), &b.public).unwrap();
        let ba = derive_shared_secret(b.secret(), &a.public).unwrap();
        assert_eq!(ab.as_bytes(), ba.as_bytes());
    }

    #[test]
    fn domain_labels_separate_derivations() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        let shared = derive_shared_secret(a.secret(), &b.public).unwrap();

        let spend = secret_to_scalar(&shared, STEALTH_SPEND_DOMAIN);
        let memo = secret_to_scalar(&shared, MEMO_KEY_DOMAIN);
        assert_ne!(spend, memo);
    }

    #[test]
    fn recovered_secret_matches_one_time_public() {
        let keys = StealthKeySet::generate().unwrap();
        let derivation = derive_send_address(&keys.view.public, &keys.spend.public).unwrap();

        let recovered = recover_one_time_secret(
            keys.view.secret(),
            keys.spend.secret(),
            &derivation.address.ephemeral_public,
        )
        .unwrap();

        let rebuilt = KeyPair::from_secret_bytes(recovered.as_bytes());
        assert_eq!(rebuilt.public, derivation.address.one_time_public);
    }

    #[test]
    fn belongs_to_accepts_own_outputs_and_rejects_others() {
        let alice = StealthKeySet::generate().unwrap();
        let eve = StealthKeySet::generate().unwrap();

        for _ in 0..8 {
            let derivation = derive_send_address(&alice.view.public, &alice.spend.public).unwrap();
            let addr = &derivation.address;

            assert!(belongs_to(
                alice.view.secret(),
                &alice.spend.public,
                &addr.ephemeral_public,
                &addr.one_time_public,
            ));
            assert!(!belongs_to(
                eve.view.secret(),
                &eve.spend.public,
                &addr.ephemeral_public,
                &addr.one_time_public,
            ));
        }
    }

    #[test]
    fn repeated_sends_are_unlinkable() {
        let keys = StealthKeySet::generate().unwrap();

        let first = derive_send_address(&keys.view.public, &keys.spend.public).unwrap();
        let second = derive_send_address(&keys.view.public, &keys.spend.public).unwrap();

        assert_ne!(
            first.address.encoded_address,
            second.address.encoded_address
        );
        assert_ne!(
            first.address.ephemeral_public,
            second.address.ephemeral_public
        );
    }

    #[test]
    fn derive_rejects_invalid_recipient_keys() {
        let keys = StealthKeySet::generate().unwrap();
        assert!(matches!(
            derive_send_address(&[0u8; 32], &keys.spend.public),
            Err(SdkError::InvalidKey(_))
        ));
        assert!(matches!(
            derive_send_address(&keys.view.public, &[0xFF; 32]),
            Err(SdkError::InvalidKey(_))
        ));
    }

    #[test]
    fn stealth_address_encoding_roundtrip() {
        let keys = StealthKeySet::generate().unwrap();
        let derivation = derive_send_address(&keys.view.public, &keys.spend.public).unwrap();

        let decoded = decode_stealth_address(&derivation.address.encoded_address).unwrap();
        assert_eq!(decoded, derivation.address.one_time_public);

        assert!(decode_stealth_address("chert_notstealth").is_err());
        assert!(decode_stealth_address("stealth_abcd").is_err());
    }

    #[test]
    fn stealth_account_from_published_keys() {
        let keys = StealthKeySet::generate().unwrap();
        let account =
            create_stealth_account(&keys.view.public_hex(), &keys.spend.public_hex()).unwrap();

        assert!(account.address.starts_with(STEALTH_ADDRESS_PREFIX));
        assert_eq!(account.view_public, keys.view.public_hex());

        // Deterministic for the same identity.
        let again =
            create_stealth_account(&keys.view.public_hex(), &keys.spend.public_hex()).unwrap();
        assert_eq!(account, again);

        assert!(matches!(
            create_stealth_account("", &keys.spend.public_hex()),
            Err(SdkError::Validation { .. })
        ));
    }

    #[test]
    fn memo_roundtrip_and_wrong_secret() {
        let sender = KeyPair::generate().unwrap();
        let recipient = KeyPair::generate().unwrap();
        let shared = derive_shared_secret(sender.secret(), &recipient.public).unwrap();

        let encrypted = encrypt_memo("hello, chain", &shared).unwrap();
        assert_ne!(encrypted.ciphertext, hex::encode("hello, chain"));

        // Recipient recomputes the same secret from the other side.
        let recomputed = derive_shared_secret(recipient.secret(), &sender.public).unwrap();
        assert_eq!(decrypt_memo(&encrypted, &recomputed).unwrap(), "hello, chain");

        let stranger = KeyPair::generate().unwrap();
        let wrong = derive_shared_secret(stranger.secret(), &recipient.public).unwrap();
        assert!(decrypt_memo(&encrypted, &wrong).is_err());
    }
}
