//! HTTP transport for the Chert SDK.
//!
//! A thin JSON-over-HTTP client with timeout, credential, and header
//! configuration. Everything protocol-specific lives in `chert-sdk`; this
//! crate only moves bytes.
//!
//! ```rust,no_run
//! use chert_net::{Config, HttpClient};
//!
//! #[tokio::main]
//! async fn main() -> chert_net::Result<()> {
//!     let config = Config::default().with_timeout(10);
//!     let client = HttpClient::new(config)?;
//!     let status: serde_json::Value = client.get_json("https://api.chert.com/status").await?;
//!     println!("{status}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http_client;

pub use config::{Config, DEFAULT_TIMEOUT_SECS};
pub use error::{NetError, Result};
pub use http_client::HttpClient;
