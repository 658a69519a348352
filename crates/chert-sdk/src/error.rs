use thiserror::Error;

pub type Result<T> = std::result::Result<T, SdkError>;

/// Closed error taxonomy for the SDK.
///
/// `Validation`, `InvalidKey`, and `InvalidAmount` are caller-input problems
/// and are never retried internally. `KeyGeneration` means the OS entropy
/// source failed. `Network` and `Api` belong to the transport boundary and
/// carry enough detail to tell transient from permanent failure. No variant
/// ever carries secret material in its message.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Validation error in {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Network error: {0}")]
    Network(#[from] chert_net::NetError),

    #[error("API error {code}: {message}")]
    Api {
        code: String,
        message: String,
        status: Option<u16>,
    },
}

impl SdkError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        SdkError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
