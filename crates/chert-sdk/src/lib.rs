//! Client SDK for the Chert blockchain network.
//!
//! Covers wallet management, plain and private transfers, staking, and
//! governance against a remote ledger's JSON-RPC API. The privacy subsystem
//! implements dual-key stealth addressing: each private transfer goes to a
//! freshly derived one-time destination that only the recipient can link
//! back to their published identity.
//!
//! ```rust,no_run
//! use chert_sdk::{ChertClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> chert_sdk::Result<()> {
//!     let client = ChertClient::new(ClientConfig::default())?;
//!
//!     let account = client.wallet().create_account()?;
//!     let recipient = client.privacy().generate_stealth_keys()?;
//!     println!("account {} ready to pay {}", account.address, recipient.view.public_hex());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod governance;
pub mod keys;
pub mod privacy;
pub mod staking;
pub mod stealth;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChertClient, ClientConfig, DEFAULT_ENDPOINT};
pub use error::{Result, SdkError};
pub use keys::{decode_public_key, validate_public, KeyPair, SecretScalar, StealthKeySet};
pub use privacy::{PrivacyManager, PrivateTransactionRequest};
pub use stealth::{
    belongs_to, create_stealth_account, decrypt_memo, derive_send_address, encrypt_memo,
    recover_one_time_secret, EncryptedMemo, SharedSecret, StealthAccount, StealthAddress,
    StealthDerivation,
};
pub use transaction::{build_private_transaction, PrivacyLevel, PrivateTransaction};
pub use types::{
    Balance, Block, Delegation, Fee, Network, NetworkStatus, Proposal, ProposalStatus,
    StakingRewards, SubmitReceipt, Transaction, TransactionReceipt, TransactionRequest,
    TransactionStatus, Validator, ValidatorStatus, VoteOption, VoteTally,
};
pub use wallet::{Account, WalletManager};
