//! # Crownpeak Access API Rust SDK
//!
//! A stateful client for the Crownpeak CMS Access API. One login per
//! client establishes a cookie session that every later call rides on,
//! and a minimum-interval throttle spaces all outbound requests.
//!
//! ## Features
//!
//! - **Session handling**: cookie-based CMS session behind one client value
//! - **Publish protocol**: `update_file` runs the prepare/bytes/complete/route
//!   sequence for you
//! - **Idempotent resolution**: get-or-create for assets (status-aware,
//!   branch-on-mismatch) and folders (duplicate-safe)
//! - **Polite by construction**: at most one request per throttle interval
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crownpeak_access_rs::{Credentials, CrownpeakClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credentials = Credentials::new(
//!         "bot-user",
//!         "secret",
//!         "https://cms.example.net",
//!         "acme-prod",
//!         "api-key-value",
//!     );
//!     let client = CrownpeakClient::new(credentials)?;
//!     client.authenticate().await?;
//!
//!     let routed = client.update_file(42, 7, "doc.txt", "./doc.txt", 3).await?;
//!     println!("routing outcome: {routed}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod client;
pub mod config;
pub mod cookies;
pub mod throttle;
pub mod traits;
pub mod http;
pub mod asset;
pub mod search;
pub mod api;
pub mod upload;
pub mod resolve;

// Re-export main types for convenience
pub use api::{AccessApi, ExistsResult};
pub use asset::{ASSET_TYPE_FILE, ASSET_TYPE_FOLDER, AssetContent, CmsAsset, FieldValue};
pub use client::CrownpeakClient;
pub use config::{Config, Credentials};
pub use error::{CrownpeakError, Result};
pub use search::{FilterExpression, FilterOperation, LogicalConnector, SearchRequest, SearchResult};
pub use upload::{UploadStage, UploadTicket};
