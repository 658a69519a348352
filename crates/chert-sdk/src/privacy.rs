//! Privacy operations: stealth identities and private transfers.
//!
//! The manager orchestrates the synchronous crypto core (key material,
//! stealth derivation, transaction assembly) and only suspends at the
//! submission boundary.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::ChertClient;
use crate::error::{Result, SdkError};
use crate::keys::{SecretScalar, StealthKeySet};
use crate::stealth::{self, StealthAccount};
use crate::transaction::{build_private_transaction, PrivacyLevel};
use crate::wallet::Account;

/// Parameters for one outgoing private transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateTransactionRequest {
    /// Recipient's published view public key (hex).
    pub recipient_view_public: String,
    /// Recipient's published spend public key (hex).
    pub recipient_spend_public: String,
    pub amount: String,
    pub fee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Unique per sender account; the ledger rejects replays.
    pub nonce: u64,
    pub privacy_level: PrivacyLevel,
}

pub struct PrivacyManager<'a> {
    client: &'a ChertClient,
}

impl<'a> PrivacyManager<'a> {
    pub(crate) fn new(client: &'a ChertClient) -> Self {
        Self { client }
    }

    /// Generate a fresh stealth identity (view + spend keypairs).
    pub fn generate_stealth_keys(&self) -> Result<StealthKeySet> {
        StealthKeySet::generate()
    }

    /// Register a recipient's published identity for later sends.
    pub fn create_stealth_account(
        &self,
        view_public: &str,
        spend_public: &str,
    ) -> Result<StealthAccount> {
        stealth::create_stealth_account(view_public, spend_public)
    }

    /// Build, sign, and submit a private transfer. Returns the transaction
    /// identifier. The stealth destination and memo ciphertext are derived
    /// from a single fresh key exchange; the sender signs with their real
    /// account key.
    pub async fn send_private_transaction(
        &self,
        request: &PrivateTransactionRequest,
        sender: &Account,
    ) -> Result<String> {
        if !sender.can_sign() {
            return Err(SdkError::Transaction(
                "Sender account does not have a private key".into(),
            ));
        }

        let tx = build_private_transaction(
            &request.recipient_view_public,
            &request.recipient_spend_public,
            &request.amount,
            &request.fee,
            request.memo.as_deref(),
            request.nonce,
            request.privacy_level,
        )?;

        let signature = sender.sign(&tx.signing_payload()?)?;
        let payload = json!({
            "transaction": tx,
            "sender": sender.address,
            "public_key": sender.public_key,
            "signature": signature,
        });

        let receipt = self
            .client
            .submit_payload("sendPrivateTransaction", payload)
            .await?;
        Ok(receipt.transaction_id)
    }

    /// Recipient side: does this `(ephemeral, one-time)` pair belong to the
    /// holder of `keys`? Usable while scanning announced outputs.
    pub fn scan_output(
        &self,
        keys: &StealthKeySet,
        ephemeral_public: &[u8; 32],
        one_time_public: &[u8; 32],
    ) -> bool {
        stealth::belongs_to(
            keys.view.secret(),
            &keys.spend.public,
            ephemeral_public,
            one_time_public,
        )
    }

    /// Recipient side: recover the scalar that spends an output addressed
    /// to one of our one-time destinations.
    pub fn recover_spending_secret(
        &self,
        keys: &StealthKeySet,
        ephemeral_public: &[u8; 32],
    ) -> Result<SecretScalar> {
        stealth::recover_one_time_secret(
            keys.view.secret(),
            keys.spend.secret(),
            ephemeral_public,
        )
    }
}
