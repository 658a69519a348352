//! Account management and plain (non-private) transfers.

use std::fmt;
use std::time::Duration;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::json;
use sha2::{Digest, Sha256};
use tokio::time::{sleep, Instant};
use tracing::debug;
use zeroize::Zeroize;

use crate::client::ChertClient;
use crate::error::{Result, SdkError};
use crate::transaction::{validate_amount, validate_fee};
use crate::types::{Balance, Fee, Transaction, TransactionRequest, TransactionStatus};

pub const ADDRESS_PREFIX: &str = "chert_";
const SECRET_KEY_HEX_LEN: usize = 64;

/// Deterministic account address from a public key.
pub fn generate_address(public_key: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(public_key));
    format!("{}{}", ADDRESS_PREFIX, &digest[..40])
}

/// A ledger account. Watch-only accounts carry no signing key and refuse
/// to sign.
pub struct Account {
    pub address: String,
    /// Hex-encoded public key.
    pub public_key: String,
    signing_key: Option<SigningKey>,
}

impl Account {
    /// Create a new account with a freshly generated keypair.
    pub fn create() -> Result<Self> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| SdkError::KeyGeneration(format!("OS entropy source unavailable: {}", e)))?;
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self::from_signing_key(signing_key))
    }

    /// Import an account from a hex-encoded secret key.
    pub fn from_secret_hex(secret: &str) -> Result<Self> {
        if secret.len() != SECRET_KEY_HEX_LEN {
            return Err(SdkError::validation(
                "private_key",
                format!("Private key must be {} hex characters", SECRET_KEY_HEX_LEN),
            ));
        }
        let bytes = hex::decode(secret)
            .map_err(|_| SdkError::validation("private_key", "Invalid hex format"))?;
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self::from_signing_key(signing_key))
    }

    /// Create a watch-only account from a hex-encoded public key.
    pub fn watch_only(public_key: &str) -> Result<Self> {
        if public_key.len() != SECRET_KEY_HEX_LEN {
            return Err(SdkError::validation(
                "public_key",
                format!("Public key must be {} hex characters", SECRET_KEY_HEX_LEN),
            ));
        }
        let bytes = hex::decode(public_key)
            .map_err(|_| SdkError::validation("public_key", "Invalid hex format"))?;
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        VerifyingKey::from_bytes(&key)
            .map_err(|_| SdkError::validation("public_key", "Not a valid public key"))?;

        Ok(Self {
            address: generate_address(&key),
            public_key: hex::encode(key),
            signing_key: None,
        })
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public = signing_key.verifying_key().to_bytes();
        Self {
            address: generate_address(&public),
            public_key: hex::encode(public),
            signing_key: Some(signing_key),
        }
    }

    pub fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Sign arbitrary payload bytes, returning the hex-encoded signature.
    pub fn sign(&self, message: &[u8]) -> Result<String> {
        let key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| SdkError::Transaction("Account does not have a private key".into()))?;
        Ok(hex::encode(key.sign(message).to_bytes()))
    }

    /// Export the secret key for caller-owned storage.
    pub fn export_secret_hex(&self) -> Option<String> {
        self.signing_key
            .as_ref()
            .map(|k| hex::encode(k.to_bytes()))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Verify a hex signature against a hex public key.
pub fn verify_signature(public_key: &str, message: &[u8], signature: &str) -> Result<bool> {
    if public_key.len() != SECRET_KEY_HEX_LEN {
        return Err(SdkError::InvalidKey("Public key must be 64 hex characters".into()));
    }
    let key_bytes = hex::decode(public_key)
        .map_err(|_| SdkError::InvalidKey("Invalid hex encoding".into()))?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&key_bytes);
    let verifying = VerifyingKey::from_bytes(&key)
        .map_err(|_| SdkError::InvalidKey("Not a valid public key".into()))?;

    let sig_bytes = hex::decode(signature)
        .map_err(|_| SdkError::Serialization("Invalid signature encoding".into()))?;
    let signature = Signature::from_slice(&sig_bytes)
        .map_err(|_| SdkError::Serialization("Signature must be 64 bytes".into()))?;

    Ok(verifying.verify(message, &signature).is_ok())
}

pub struct WalletManager<'a> {
    client: &'a ChertClient,
}

impl<'a> WalletManager<'a> {
    pub(crate) fn new(client: &'a ChertClient) -> Self {
        Self { client }
    }

    pub fn create_account(&self) -> Result<Account> {
        Account::create()
    }

    pub fn import_account(&self, private_key: &str) -> Result<Account> {
        Account::from_secret_hex(private_key)
    }

    pub fn create_watch_only_account(&self, public_key: &str) -> Result<Account> {
        Account::watch_only(public_key)
    }

    pub async fn get_balance(&self, address: &str) -> Result<Balance> {
        if address.is_empty() {
            return Err(SdkError::validation("address", "Address cannot be empty"));
        }
        self.client.rpc_call("getBalance", json!([address])).await
    }

    /// Sign and submit a transfer, returning the transaction hash.
    pub async fn send_transaction(
        &self,
        request: &TransactionRequest,
        account: &Account,
    ) -> Result<String> {
        if !account.can_sign() {
            return Err(SdkError::Transaction(
                "Account does not have a private key".into(),
            ));
        }
        validate_transaction_request(request)?;

        let signature = account.sign(&signing_bytes(request)?)?;

        let mut tx_data = json!({
            "sender": account.address,
            "recipient": request.to,
            "amount": request.amount,
            "fee": request.fee,
            "nonce": request.nonce.unwrap_or(0),
            "public_key": account.public_key,
            "signature": signature,
        });
        if let Some(memo) = &request.memo {
            tx_data["memo"] = json!(memo);
        }

        let receipt = self.client.submit_payload("sendTransaction", tx_data).await?;
        Ok(receipt.transaction_id)
    }

    pub async fn estimate_fee(&self, request: &TransactionRequest) -> Result<Fee> {
        validate_transaction_request(request)?;
        self.client.rpc_call("estimateFee", json!([request])).await
    }

    /// Poll until the transaction confirms, fails, or the timeout elapses.
    /// Returns `None` on timeout; a failed or rejected transaction is an
    /// error. "Transaction not found yet" keeps polling.
    pub async fn wait_for_transaction(
        &self,
        tx_hash: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<Option<Transaction>> {
        if tx_hash.is_empty() {
            return Err(SdkError::validation(
                "tx_hash",
                "Transaction hash cannot be empty",
            ));
        }

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match self.client.get_transaction(tx_hash).await {
                Ok(tx) => match tx.status {
                    TransactionStatus::Confirmed => return Ok(Some(tx)),
                    TransactionStatus::Failed | TransactionStatus::Rejected => {
                        return Err(SdkError::Transaction(format!(
                            "Transaction {:?}",
                            tx.status
                        )));
                    }
                    TransactionStatus::Pending => {}
                },
                Err(e) => debug!(tx_hash, error = %e, "transaction not visible yet"),
            }
            sleep(interval).await;
        }

        Ok(None)
    }
}

fn validate_transaction_request(request: &TransactionRequest) -> Result<()> {
    if request.to.is_empty() {
        return Err(SdkError::validation("to", "Recipient address cannot be empty"));
    }
    validate_amount(&request.amount)?;
    validate_fee(&request.fee)?;
    Ok(())
}

/// Canonical payload bytes for transfer signing; the network re-derives
/// the same bytes to verify.
fn signing_bytes(request: &TransactionRequest) -> Result<Vec<u8>> {
    let payload = json!({
        "to": request.to,
        "amount": request.amount,
        "fee": request.fee,
        "nonce": request.nonce.unwrap_or(0),
        "memo": request.memo,
    });
    serde_json::to_vec(&payload).map_err(|e| SdkError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;

    fn request() -> TransactionRequest {
        TransactionRequest {
            to: "chert_recipient".into(),
            amount: "10.0".into(),
            fee: "0.01".into(),
            memo: None,
            nonce: Some(1),
        }
    }

    #[test]
    fn created_account_has_prefixed_address_and_signs() {
        let account = Account::create().unwrap();
        assert!(account.address.starts_with(ADDRESS_PREFIX));
        assert!(account.can_sign());

        let signature = account.sign(b"payload").unwrap();
        assert!(verify_signature(&account.public_key, b"payload", &signature).unwrap());
        assert!(!verify_signature(&account.public_key, b"tampered", &signature).unwrap());
    }

    #[test]
    fn import_roundtrip() {
        let account = Account::create().unwrap();
        let secret = account.export_secret_hex().unwrap();

        let imported = Account::from_secret_hex(&secret).unwrap();
        assert_eq!(imported.address, account.address);
        assert_eq!(imported.public_key, account.public_key);
    }

    #[test]
    fn import_rejects_bad_secrets() {
        assert!(matches!(
            Account::from_secret_hex("abcd"),
            Err(SdkError::Validation { .. })
        ));
        assert!(matches!(
            Account::from_secret_hex(&"zz".repeat(32)),
            Err(SdkError::Validation { .. })
        ));
    }

    #[test]
    fn watch_only_cannot_sign() {
        let full = Account::create().unwrap();
        let watcher = Account::watch_only(&full.public_key).unwrap();

        assert_eq!(watcher.address, full.address);
        assert!(!watcher.can_sign());
        assert!(watcher.sign(b"payload").is_err());
        assert!(watcher.export_secret_hex().is_none());
    }

    #[test]
    fn watch_only_rejects_invalid_points() {
        // y = 2 does not decompress to a curve point.
        let no_point = format!("02{}", "00".repeat(31));
        assert!(Account::watch_only(&no_point).is_err());
        assert!(Account::watch_only("short").is_err());
    }

    #[test]
    fn request_validation() {
        assert!(validate_transaction_request(&request()).is_ok());

        let mut bad = request();
        bad.to.clear();
        assert!(matches!(
            validate_transaction_request(&bad),
            Err(SdkError::Validation { .. })
        ));

        let mut bad = request();
        bad.amount = "-5".into();
        assert!(matches!(
            validate_transaction_request(&bad),
            Err(SdkError::InvalidAmount(_))
        ));
    }

    #[test]
    fn signing_bytes_cover_every_field() {
        let base = signing_bytes(&request()).unwrap();

        let mut changed = request();
        changed.amount = "11.0".into();
        assert_ne!(base, signing_bytes(&changed).unwrap());

        let mut changed = request();
        changed.memo = Some("hi".into());
        assert_ne!(base, signing_bytes(&changed).unwrap());
    }

    #[test]
    fn debug_output_redacts_signing_key() {
        let account = Account::create().unwrap();
        let secret = account.export_secret_hex().unwrap();
        let rendered = format!("{:?}", account);
        assert!(!rendered.contains(&secret));
    }

    #[tokio::test]
    async fn wait_for_transaction_rejects_empty_hash() {
        let client = ChertClient::new(ClientConfig::default()).unwrap();
        let result = client
            .wallet()
            .wait_for_transaction("", Duration::from_millis(100), Duration::from_millis(10))
            .await;
        assert!(matches!(result, Err(SdkError::Validation { .. })));
    }

    #[tokio::test]
    async fn wait_for_transaction_times_out_quietly() {
        // Unreachable endpoint: every poll errors, which counts as "not
        // visible yet", so the call runs out the clock and returns None.
        let config = ClientConfig::default().with_endpoint("http://127.0.0.1:9");
        let client = ChertClient::new(config).unwrap();

        let result = client
            .wallet()
            .wait_for_transaction("deadbeef", Duration::from_millis(200), Duration::from_millis(50))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
