//! Trait abstractions for the Crownpeak Access API SDK.
//!
//! Every REST operation in the crate funnels through the single [`Transport`]
//! seam. Production code plugs in the throttled, cookie-aware HTTP client;
//! tests substitute a recording mock so call order, payload shape and
//! call counts can be asserted without a network.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The single chokepoint for outbound Access API calls.
///
/// Implementations own all session state (cookie jar, throttle deadline)
/// behind `&self`; callers never see it. The trait is object safe on
/// purpose: the client holds an `Arc<dyn Transport>` so the transport can
/// be swapped for testing.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` as JSON to `path` (relative to the Access API base URL)
    /// and returns the decoded JSON envelope. The caller interprets the
    /// envelope's shape; transport reports only network/decode failures.
    async fn send(&self, path: &str, body: Value) -> Result<Value>;
}
