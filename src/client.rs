//! Main client interface for the Crownpeak Access API SDK.

use crate::api::{AccessApi, ExistsResult};
use crate::asset::{AssetContent, CmsAsset};
use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::http::CrownpeakHttpClient;
use crate::resolve::AssetResolver;
use crate::search::{SearchRequest, SearchResult};
use crate::traits::Transport;
use crate::upload::AssetUploader;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// High-level client for driving a Crownpeak CMS instance.
///
/// One client owns one CMS session: its cookie jar, its request throttle
/// and the credentials it was built with. Call [`authenticate`] once
/// after construction; every later call rides on the session cookies the
/// login established.
///
/// # Example
///
/// ```rust,no_run
/// use crownpeak_access_rs::{Credentials, CrownpeakClient};
///
/// #[tokio::main]
/// async fn main() -> crownpeak_access_rs::Result<()> {
///     let credentials = Credentials::new(
///         "bot-user",
///         "secret",
///         "https://cms.example.net",
///         "acme-prod",
///         "api-key-value",
///     );
///     let client = CrownpeakClient::new(credentials)?;
///
///     if !client.authenticate().await? {
///         return Err(crownpeak_access_rs::CrownpeakError::permission_error(
///             "login rejected",
///         ));
///     }
///
///     let folder = client.get_or_create_folder_id("releases", 1234, 5).await?;
///     let asset = client.get_or_create_asset_id("doc.txt", folder, 880, 3).await?;
///     client.update_file(asset, 7, "doc.txt", "./doc.txt", 3).await?;
///     Ok(())
/// }
/// ```
///
/// [`authenticate`]: CrownpeakClient::authenticate
pub struct CrownpeakClient {
    api: Arc<AccessApi>,
    uploader: AssetUploader,
    resolver: AssetResolver,
}

impl CrownpeakClient {
    /// Creates a client with default configuration.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, Config::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(credentials: Credentials, config: Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(CrownpeakHttpClient::with_config(
            &credentials,
            config.clone(),
        )?);
        Ok(Self::with_transport(credentials, config, transport))
    }

    /// Creates a client over a caller-supplied transport.
    ///
    /// The standard HTTP transport (and its credential/config validation)
    /// is bypassed; session mechanics become the transport's business.
    pub fn with_transport(
        credentials: Credentials,
        config: Config,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let api = Arc::new(AccessApi::new(credentials, transport));
        let uploader = AssetUploader::new(Arc::clone(&api), config.upload);
        let resolver = AssetResolver::new(Arc::clone(&api));
        Self {
            api,
            uploader,
            resolver,
        }
    }

    /// Logs in and establishes the session. Returns `false` when the
    /// service rejects the credentials.
    pub async fn authenticate(&self) -> Result<bool> {
        self.api.authenticate().await
    }

    /// Checks whether an asset exists, by numeric id or CMS path.
    pub async fn asset_exists(&self, asset_id_or_path: &str) -> Result<ExistsResult> {
        self.api.asset_exists(asset_id_or_path).await
    }

    /// Uploads base64 content as a new workflow-bound asset in one call.
    pub async fn upload_asset(
        &self,
        new_name: &str,
        destination_folder_id: i64,
        model_id: i64,
        workflow_id: i64,
        bytes_base64: &str,
    ) -> Result<Value> {
        self.api
            .upload_asset(
                new_name,
                destination_folder_id,
                model_id,
                workflow_id,
                bytes_base64,
            )
            .await
    }

    /// Creates an empty asset from a model. Refuses the instance root.
    pub async fn create_asset(
        &self,
        new_name: &str,
        destination_folder_id: i64,
        model_id: i64,
        asset_type: i64,
    ) -> Result<CmsAsset> {
        self.api
            .create_asset(new_name, destination_folder_id, model_id, asset_type)
            .await
    }

    /// Force-unlocks an asset held by another session.
    pub async fn unlock_asset(&self, asset_id: i64) -> Result<Value> {
        self.api.unlock_asset(asset_id).await
    }

    /// Replaces content field values on an asset.
    pub async fn update_asset(&self, asset_id: i64, fields: &Map<String, Value>) -> Result<Value> {
        self.api.update_asset(asset_id, fields).await
    }

    /// Branches an asset and returns the new branch record.
    pub async fn branch_asset(&self, asset_id: i64) -> Result<CmsAsset> {
        self.api.branch_asset(asset_id).await
    }

    /// Runs a workflow command (republish, typically) on one asset.
    pub async fn execute_workflow_command(
        &self,
        asset_id: i64,
        command_id: i64,
    ) -> Result<Value> {
        self.api.execute_workflow_command(asset_id, command_id).await
    }

    /// Reads the full record of one asset.
    pub async fn read_asset(&self, asset_id: i64) -> Result<CmsAsset> {
        self.api.read_asset(asset_id).await
    }

    /// Reads the content fields of one asset.
    pub async fn asset_content(&self, asset_id: i64) -> Result<AssetContent> {
        self.api.asset_content(asset_id).await
    }

    /// Runs an arbitrary advanced search.
    pub async fn advanced_search(&self, request: &SearchRequest) -> Result<SearchResult> {
        self.api.advanced_search(request).await
    }

    /// Lists every non-folder asset under `folder_id`.
    pub async fn folder_contents(&self, folder_id: i64) -> Result<Vec<CmsAsset>> {
        self.api.folder_contents(folder_id).await
    }

    /// Deletes an asset, but only if the bot identity created it.
    pub async fn delete_asset(&self, asset_id: i64) -> Result<Value> {
        self.api.delete_asset(asset_id).await
    }

    /// Routes a batch of assets to a workflow state.
    pub async fn route_assets(&self, asset_ids: &[i64], state_id: i64) -> Result<Value> {
        self.api.route_assets(asset_ids, state_id).await
    }

    /// Replaces an asset's content with a local file and routes it
    /// through `command_id`. Returns the routing envelope.
    ///
    /// See [`crate::upload`] for the protocol and its failure behavior.
    pub async fn update_file(
        &self,
        asset_id: i64,
        command_id: i64,
        asset_label: &str,
        src_path: impl AsRef<Path>,
        asset_model_id: i64,
    ) -> Result<Value> {
        self.uploader
            .update_file(asset_id, command_id, asset_label, src_path, asset_model_id)
            .await
    }

    /// Resolves (or creates, or branches) the asset named `label` under
    /// `folder_id` in workflow status `status_id`.
    pub async fn get_or_create_asset_id(
        &self,
        label: &str,
        folder_id: i64,
        status_id: i64,
        model_id: i64,
    ) -> Result<i64> {
        self.resolver
            .get_or_create_asset_id(label, folder_id, status_id, model_id)
            .await
    }

    /// Resolves (or creates) the folder named `label` under `folder_id`.
    pub async fn get_or_create_folder_id(
        &self,
        label: &str,
        folder_id: i64,
        model_id: i64,
    ) -> Result<i64> {
        self.resolver
            .get_or_create_folder_id(label, folder_id, model_id)
            .await
    }
}
