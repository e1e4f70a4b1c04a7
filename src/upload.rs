//! Multi-step publish protocol for pushing local file content into an
//! existing asset.
//!
//! The protocol is strictly sequential: read the source file, open an
//! upload session, transfer the base64 content, commit the session, then
//! route the asset through its workflow command. Each step gates the
//! next, and a failure anywhere wraps into
//! [`CrownpeakError::UploadFailed`] with the stage it happened in and
//! skips every remaining step. There is no remote-side cleanup: a
//! session prepared before a failed transfer is left dangling on the
//! service, which the error surfaces but does not repair.

use crate::api::AccessApi;
use crate::config::UploadConfig;
use crate::error::{CrownpeakError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// The step of the publish protocol a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    /// Reading and size-checking the local source file.
    Read,
    /// Opening the upload session.
    Prepare,
    /// Transferring the base64 content.
    TransferBytes,
    /// Committing the upload session.
    Complete,
    /// Routing the asset through its workflow command.
    Route,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadStage::Read => "file read",
            UploadStage::Prepare => "upload prepare",
            UploadStage::TransferBytes => "bytes transfer",
            UploadStage::Complete => "upload completion",
            UploadStage::Route => "workflow routing",
        };
        write!(f, "{name}")
    }
}

/// Single-use handle for one upload session.
///
/// Issued by the prepare endpoint and consumed (by move) when the
/// session is committed, so a committed ticket cannot be replayed.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTicket(String);

impl UploadTicket {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw ticket string, as the wire carries it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Orchestrator for the publish protocol.
pub struct AssetUploader {
    api: Arc<AccessApi>,
    config: UploadConfig,
}

impl AssetUploader {
    /// Creates an uploader over the shared operation catalog.
    pub fn new(api: Arc<AccessApi>, config: UploadConfig) -> Self {
        Self { api, config }
    }

    /// Replaces the content of asset `asset_id` with the file at
    /// `src_path` and routes the asset with `command_id`.
    ///
    /// Returns the decoded routing envelope so the caller can inspect
    /// the workflow outcome. The intermediate prepare/bytes/complete
    /// envelopes are not surfaced.
    pub async fn update_file(
        &self,
        asset_id: i64,
        command_id: i64,
        asset_label: &str,
        src_path: impl AsRef<Path>,
        asset_model_id: i64,
    ) -> Result<Value> {
        let path = src_path.as_ref();

        let data = fs::read(path).await.map_err(|e| {
            CrownpeakError::upload_failed(
                UploadStage::Read,
                CrownpeakError::file_error(path.display().to_string(), e.to_string()),
            )
        })?;

        let total_size = data.len() as u64;
        if total_size > self.config.max_upload_size {
            return Err(CrownpeakError::upload_failed(
                UploadStage::Read,
                CrownpeakError::validation_error(format!(
                    "source file is {total_size} bytes, the configured limit is {} bytes",
                    self.config.max_upload_size
                )),
            ));
        }

        // the wire carries base64; the session is sized by the raw length
        let encoded = STANDARD.encode(&data);

        debug!(asset_id, label = %asset_label, total_size, "starting publish protocol");

        let ticket = self
            .api
            .prepare_upload(asset_id, asset_label, asset_model_id, total_size)
            .await
            .map_err(|e| CrownpeakError::upload_failed(UploadStage::Prepare, e))?;

        self.api
            .upload_bytes(&encoded, &ticket)
            .await
            .map_err(|e| CrownpeakError::upload_failed(UploadStage::TransferBytes, e))?;

        self.api
            .complete_upload(asset_id, asset_label, asset_model_id, ticket)
            .await
            .map_err(|e| CrownpeakError::upload_failed(UploadStage::Complete, e))?;

        let routed = self
            .api
            .route_assets(&[asset_id], command_id)
            .await
            .map_err(|e| CrownpeakError::upload_failed(UploadStage::Route, e))?;

        info!(asset_id, command_id, "publish protocol finished");
        Ok(routed)
    }
}
