//! Private transaction assembly.
//!
//! The builder validates amounts before anything else so that structurally
//! invalid input never consumes randomness or touches the curve, then
//! derives a one-time destination and encrypts the optional memo under the
//! same key exchange. The result is returned unsigned; signing happens
//! against the sender's real account key (privacy covers the destination,
//! not the origin).

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};
use crate::keys::decode_public_key;
use crate::stealth::{derive_send_address, encrypt_memo, EncryptedMemo, StealthAddress};

/// How much of the transaction is shielded.
///
/// Both levels derive a stealth destination; `Encrypted` additionally
/// expects a memo ciphertext. Sender-side unlinkability (hiding the origin)
/// is not provided at either level and would slot in as a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Stealth,
    Encrypted,
}

/// An assembled, unsigned private transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateTransaction {
    pub destination: StealthAddress,
    pub amount: String,
    pub fee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_memo: Option<EncryptedMemo>,
    pub nonce: u64,
    pub privacy_level: PrivacyLevel,
}

impl PrivateTransaction {
    /// Canonical bytes the sender signs and the network verifies.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| SdkError::Serialization(e.to_string()))
    }
}

/// Assemble a private transfer to a recipient's published (view, spend)
/// identity. Fails without consuming randomness if `amount` or `fee` is
/// invalid; fails with `InvalidKey` if either recipient key does not decode
/// to a usable point. Nonce uniqueness is the caller's contract.
pub fn build_private_transaction(
    recipient_view_public: &str,
    recipient_spend_public: &str,
    amount: &str,
    fee: &str,
    memo: Option<&str>,
    nonce: u64,
    privacy_level: PrivacyLevel,
) -> Result<PrivateTransaction> {
    validate_amount(amount)?;
    validate_fee(fee)?;

    let view_public = decode_public_key(recipient_view_public)?;
    let spend_public = decode_public_key(recipient_spend_public)?;

    let derivation = derive_send_address(&view_public, &spend_public)?;

    let encrypted_memo = match memo {
        Some(m) if !m.is_empty() => Some(encrypt_memo(m, &derivation.shared_secret)?),
        _ => None,
    };

    Ok(PrivateTransaction {
        destination: derivation.address,
        amount: amount.to_string(),
        fee: fee.to_string(),
        encrypted_memo,
        nonce,
        privacy_level,
    })
}

/// Amounts travel as decimal strings; reject anything that does not parse
/// to a finite positive value.
pub(crate) fn validate_amount(amount: &str) -> Result<f64> {
    let value: f64 = amount
        .trim()
        .parse()
        .map_err(|_| SdkError::InvalidAmount(format!("Unparseable amount {:?}", amount)))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(SdkError::InvalidAmount(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(value)
}

pub(crate) fn validate_fee(fee: &str) -> Result<f64> {
    let value: f64 = fee
        .trim()
        .parse()
        .map_err(|_| SdkError::InvalidAmount(format!("Unparseable fee {:?}", fee)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(SdkError::InvalidAmount(format!(
            "Fee must be non-negative, got {}",
            fee
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StealthKeySet;
    use crate::stealth::STEALTH_ADDRESS_PREFIX;

    fn recipient() -> StealthKeySet {
        StealthKeySet::generate().unwrap()
    }

    #[test]
    fn builds_with_memo_and_stealth_destination() {
        let keys = recipient();
        let tx = build_private_transaction(
            &keys.view.public_hex(),
            &keys.spend.public_hex(),
            "25.0",
            "0.02",
            Some("hi"),
            1,
            PrivacyLevel::Stealth,
        )
        .unwrap();

        assert_eq!(tx.amount, "25.0");
        assert_eq!(tx.nonce, 1);
        assert!(tx.encrypted_memo.is_some());
        assert!(tx
            .destination
            .encoded_address
            .starts_with(STEALTH_ADDRESS_PREFIX));
    }

    #[test]
    fn omits_memo_when_absent_or_empty() {
        let keys = recipient();
        for memo in [None, Some("")] {
            let tx = build_private_transaction(
                &keys.view.public_hex(),
                &keys.spend.public_hex(),
                "1.0",
                "0.0",
                memo,
                2,
                PrivacyLevel::Encrypted,
            )
            .unwrap();
            assert!(tx.encrypted_memo.is_none());
        }
    }

    #[test]
    fn rejects_bad_amounts_before_touching_keys() {
        // Recipient keys here are garbage; an amount error proves the
        // builder bailed out before any key work or randomness.
        for amount in ["-1", "0", "abc", "NaN", "inf"] {
            let result = build_private_transaction(
                "zz",
                "zz",
                amount,
                "0.02",
                None,
                1,
                PrivacyLevel::Stealth,
            );
            assert!(
                matches!(result, Err(SdkError::InvalidAmount(_))),
                "amount {:?} should be rejected as invalid",
                amount
            );
        }
    }

    #[test]
    fn rejects_negative_fee() {
        let result =
            build_private_transaction("zz", "zz", "1.0", "-0.5", None, 1, PrivacyLevel::Stealth);
        assert!(matches!(result, Err(SdkError::InvalidAmount(_))));
    }

    #[test]
    fn rejects_malformed_recipient_keys() {
        let keys = recipient();
        let result = build_private_transaction(
            "deadbeef",
            &keys.spend.public_hex(),
            "1.0",
            "0.0",
            None,
            1,
            PrivacyLevel::Stealth,
        );
        assert!(matches!(result, Err(SdkError::InvalidKey(_))));
    }

    #[test]
    fn signing_payload_is_deterministic() {
        let keys = recipient();
        let tx = build_private_transaction(
            &keys.view.public_hex(),
            &keys.spend.public_hex(),
            "3.0",
            "0.01",
            Some("note"),
            9,
            PrivacyLevel::Stealth,
        )
        .unwrap();

        assert_eq!(tx.signing_payload().unwrap(), tx.signing_payload().unwrap());
    }

    #[test]
    fn privacy_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PrivacyLevel::Stealth).unwrap(),
            "\"stealth\""
        );
        assert_eq!(
            serde_json::to_string(&PrivacyLevel::Encrypted).unwrap(),
            "\"encrypted\""
        );
    }
}
