//! Typed catalog of Access API operations.
//!
//! One method per REST endpoint. Each method owns its request payload
//! shape, issues a single POST through the [`Transport`] seam and, where
//! the envelope has a known shape, decodes it into a typed result. No
//! method retries, caches or reorders anything; multi-call workflows live
//! in [`crate::upload`] and [`crate::resolve`].

use crate::asset::{AssetContent, CmsAsset};
use crate::config::Credentials;
use crate::error::{CrownpeakError, Result};
use crate::search::{SearchRequest, SearchResult};
use crate::traits::Transport;
use crate::upload::UploadTicket;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result-code literal the service returns for a successful login.
const AUTH_SUCCESS: &str = "conWS_Success";

/// Creator identity an asset must carry for the SDK to delete it.
const BOT_CREATOR: &str = "Zink Bot";

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    instance: &'a str,
    username: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthResponse {
    #[serde(rename = "resultCode")]
    result_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExistsRequest<'a> {
    asset_id_or_path: &'a str,
}

/// Existence probe result for an id or path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsResult {
    pub asset_id: i64,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    new_name: &'a str,
    destination_folder_id: i64,
    model_id: i64,
    workflow_id: i64,
    bytes: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    new_name: &'a str,
    destination_folder_id: i64,
    model_id: i64,
    #[serde(rename = "type")]
    asset_type: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnlockRequest {
    asset_ids: Vec<i64>,
    force_unlock: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    asset_id: i64,
    fields: &'a Map<String, Value>,
    fields_to_delete: Vec<String>,
    field_to_delete: String,
    run_post_input: bool,
    run_post_save: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrepareRequest<'a> {
    destination_id: i64,
    label: &'a str,
    total_size: u64,
    model_id: i64,
}

#[derive(Debug, Deserialize)]
struct PrepareResponse {
    #[serde(rename = "uploadTicket")]
    upload_ticket: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BytesRequest<'a> {
    bytes: &'a str,
    /// Legacy slot, always null on the wire.
    base64: Option<String>,
    /// Always null; the service does not verify checksums on this route.
    checksum: Option<String>,
    upload_ticket: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRequest<'a> {
    destination_id: i64,
    label: &'a str,
    model_id: i64,
    upload_ticket: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowCommandRequest {
    asset_id: i64,
    command_id: i64,
    skip_dependencies: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRequest<'a> {
    list: &'a [i64],
    state_id: i64,
    state_change_check: bool,
    publish_dependencies: bool,
}

/// Envelope wrapper for endpoints that return one asset record.
#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    asset: CmsAsset,
}

/// Thin client for the individual Access API endpoints.
///
/// Holds the credentials (for the login payload) and the shared
/// transport. All session mechanics (throttle, cookies, headers) live
/// behind the transport; this layer only knows payload and envelope
/// shapes.
pub struct AccessApi {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl AccessApi {
    /// Creates an operation catalog over `transport`.
    pub fn new(credentials: Credentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    /// Serializes `body` and dispatches it through the transport.
    async fn post(&self, path: &str, body: impl Serialize) -> Result<Value> {
        self.transport.send(path, serde_json::to_value(body)?).await
    }

    /// Decodes an envelope, attributing shape mismatches to `path`.
    fn decode<T: serde::de::DeserializeOwned>(path: &str, envelope: Value) -> Result<T> {
        serde_json::from_value(envelope).map_err(|e| {
            CrownpeakError::transport_error(path, format!("unexpected response shape: {e}"))
        })
    }

    /// Logs in and establishes the session cookies.
    ///
    /// Returns `true` only when the service answers with its success
    /// literal. The session itself lives in the transport's cookie jar;
    /// there is no token to hold on to.
    pub async fn authenticate(&self) -> Result<bool> {
        let body = AuthRequest {
            instance: &self.credentials.cms_instance,
            username: &self.credentials.user_name,
            password: &self.credentials.password,
            remember_me: false,
        };

        let envelope = self.post("/auth/authenticate", body).await?;
        let response: AuthResponse = Self::decode("/auth/authenticate", envelope)?;

        let accepted = response.result_code == AUTH_SUCCESS;
        if accepted {
            info!(
                instance = %self.credentials.cms_instance,
                "authenticated against the Access API"
            );
        } else {
            warn!(
                result_code = %response.result_code,
                "authentication rejected"
            );
        }
        Ok(accepted)
    }

    /// Checks whether an asset exists, by numeric id or CMS path.
    pub async fn asset_exists(&self, asset_id_or_path: &str) -> Result<ExistsResult> {
        let body = ExistsRequest { asset_id_or_path };
        let envelope = self.post("/asset/Exists", body).await?;
        Self::decode("/asset/Exists", envelope)
    }

    /// Single-shot upload of base64 content as a new asset bound to a
    /// workflow.
    pub async fn upload_asset(
        &self,
        new_name: &str,
        destination_folder_id: i64,
        model_id: i64,
        workflow_id: i64,
        bytes_base64: &str,
    ) -> Result<Value> {
        let body = UploadRequest {
            new_name,
            destination_folder_id,
            model_id,
            workflow_id,
            bytes: bytes_base64,
        };
        self.post("/asset/Upload", body).await
    }

    /// Creates an empty asset (file or folder) from a model.
    ///
    /// A destination folder id of 0 addresses the instance root, which
    /// the SDK refuses to write into; the request is rejected locally
    /// and no call is issued.
    pub async fn create_asset(
        &self,
        new_name: &str,
        destination_folder_id: i64,
        model_id: i64,
        asset_type: i64,
    ) -> Result<CmsAsset> {
        if destination_folder_id == 0 {
            return Err(CrownpeakError::validation_error(
                "not allowed to import to root",
            ));
        }

        debug!(
            label = %new_name,
            folder_id = destination_folder_id,
            asset_type,
            "creating asset"
        );

        let body = CreateRequest {
            new_name,
            destination_folder_id,
            model_id,
            asset_type,
        };
        let envelope = self.post("/asset/Create", body).await?;
        let created: AssetEnvelope = Self::decode("/asset/Create", envelope)?;
        Ok(created.asset)
    }

    /// Force-unlocks an asset held by another session.
    pub async fn unlock_asset(&self, asset_id: i64) -> Result<Value> {
        let body = UnlockRequest {
            asset_ids: vec![asset_id],
            force_unlock: true,
        };
        self.post("/asset/unlock", body).await
    }

    /// Replaces content field values on an asset. Post-input and
    /// post-save hooks run remote-side; nothing is deleted.
    pub async fn update_asset(&self, asset_id: i64, fields: &Map<String, Value>) -> Result<Value> {
        let body = UpdateRequest {
            asset_id,
            fields,
            fields_to_delete: Vec::new(),
            field_to_delete: String::new(),
            run_post_input: true,
            run_post_save: true,
        };
        self.post("/Asset/Update", body).await
    }

    /// Branches an asset and returns the new branch record.
    pub async fn branch_asset(&self, asset_id: i64) -> Result<CmsAsset> {
        let path = format!("/Asset/Branch/{asset_id}");
        let envelope = self.post(&path, json!({})).await?;
        let branched: AssetEnvelope = Self::decode(&path, envelope)?;
        debug!(source = asset_id, branch = branched.asset.id, "branched asset");
        Ok(branched.asset)
    }

    /// Opens an upload session for `total_size` bytes of new content on
    /// an existing asset and returns the session's ticket.
    pub async fn prepare_upload(
        &self,
        destination_id: i64,
        label: &str,
        model_id: i64,
        total_size: u64,
    ) -> Result<UploadTicket> {
        let body = PrepareRequest {
            destination_id,
            label,
            total_size,
            model_id,
        };
        let envelope = self.post("/upload/assetprepare", body).await?;
        let response: PrepareResponse = Self::decode("/upload/assetprepare", envelope)?;
        Ok(UploadTicket::new(response.upload_ticket))
    }

    /// Transfers base64 content into an open upload session.
    pub async fn upload_bytes(&self, bytes_base64: &str, ticket: &UploadTicket) -> Result<Value> {
        let body = BytesRequest {
            bytes: bytes_base64,
            base64: None,
            checksum: None,
            upload_ticket: ticket.as_str(),
        };
        self.post("/upload/bytes", body).await
    }

    /// Closes an upload session, committing the transferred content.
    /// Takes the ticket by value; a committed session cannot be reused.
    pub async fn complete_upload(
        &self,
        destination_id: i64,
        label: &str,
        model_id: i64,
        ticket: UploadTicket,
    ) -> Result<Value> {
        let body = CompleteRequest {
            destination_id,
            label,
            model_id,
            upload_ticket: ticket.as_str(),
        };
        self.post("/upload/assetcomplete", body).await
    }

    /// Runs a workflow command (republish, typically) on one asset,
    /// skipping its dependencies.
    pub async fn execute_workflow_command(
        &self,
        asset_id: i64,
        command_id: i64,
    ) -> Result<Value> {
        let body = WorkflowCommandRequest {
            asset_id,
            command_id,
            skip_dependencies: true,
        };
        self.post("/asset/executeworkflowcommand", body).await
    }

    /// Reads the full record of one asset.
    pub async fn read_asset(&self, asset_id: i64) -> Result<CmsAsset> {
        let path = format!("/asset/read/{asset_id}");
        let envelope = self.post(&path, json!({})).await?;
        let read: AssetEnvelope = Self::decode(&path, envelope)?;
        Ok(read.asset)
    }

    /// Reads the content fields of one asset.
    pub async fn asset_content(&self, asset_id: i64) -> Result<AssetContent> {
        let path = format!("/asset/fields/{asset_id}");
        let envelope = self.post(&path, json!({})).await?;
        Self::decode(&path, envelope)
    }

    /// Runs an arbitrary advanced search.
    pub async fn advanced_search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let envelope = self.post("/asset/advancedsearch", request).await?;
        Self::decode("/asset/advancedsearch", envelope)
    }

    /// Lists every non-folder asset under `folder_id` in one page.
    pub async fn folder_contents(&self, folder_id: i64) -> Result<Vec<CmsAsset>> {
        let result = self
            .advanced_search(&SearchRequest::folder_listing(folder_id))
            .await?;
        Ok(result.search_results)
    }

    /// Deletes an asset, but only if the bot identity created it.
    ///
    /// The record is read first; when the creator is anyone else the
    /// delete is refused locally and never reaches the service. This is
    /// the SDK's guard against destroying human-authored content.
    pub async fn delete_asset(&self, asset_id: i64) -> Result<Value> {
        let asset = self.read_asset(asset_id).await?;
        if asset.created_by != BOT_CREATOR {
            return Err(CrownpeakError::permission_error(format!(
                "can only delete assets created by {BOT_CREATOR:?}"
            )));
        }

        info!(asset_id, "deleting bot-created asset");
        self.post(&format!("/asset/delete/{asset_id}"), json!({}))
            .await
    }

    /// Routes a batch of assets to a workflow state. Dependency
    /// publishing and state-change checks are left off, matching how the
    /// publish protocol drives this endpoint.
    pub async fn route_assets(&self, asset_ids: &[i64], state_id: i64) -> Result<Value> {
        let body = RouteRequest {
            list: asset_ids,
            state_id,
            state_change_check: false,
            publish_dependencies: false,
        };
        self.post("/asset/routeassets", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ASSET_TYPE_FILE;
    use crate::traits::mock::MockTransport;

    fn test_api() -> (Arc<MockTransport>, AccessApi) {
        let transport = Arc::new(MockTransport::new());
        let credentials = Credentials::new(
            "bot-user",
            "secret",
            "https://cms.example.net",
            "acme-prod",
            "key-123",
        );
        let api = AccessApi::new(credentials, transport.clone());
        (transport, api)
    }

    #[tokio::test]
    async fn test_authenticate_payload_and_success() {
        let (transport, api) = test_api();
        transport.push_response(json!({"resultCode": "conWS_Success"}));

        let accepted = api.authenticate().await.unwrap();

        assert!(accepted);
        let calls = transport.calls();
        assert_eq!(calls[0].0, "/auth/authenticate");
        assert_eq!(
            calls[0].1,
            json!({
                "instance": "acme-prod",
                "username": "bot-user",
                "password": "secret",
                "remember_me": false,
            })
        );
    }

    #[tokio::test]
    async fn test_authenticate_rejection_is_ok_false() {
        let (transport, api) = test_api();
        transport.push_response(json!({"resultCode": "conWS_LoginFailed"}));

        assert!(!api.authenticate().await.unwrap());
    }

    #[tokio::test]
    async fn test_asset_exists_payload_and_result() {
        let (transport, api) = test_api();
        transport.push_response(json!({"assetId": 77, "exists": true}));

        let result = api.asset_exists("/Site/docs/doc.txt").await.unwrap();

        assert_eq!(result.asset_id, 77);
        assert!(result.exists);
        assert_eq!(
            transport.calls()[0].1,
            json!({"assetIdOrPath": "/Site/docs/doc.txt"})
        );
    }

    #[tokio::test]
    async fn test_upload_asset_payload() {
        let (transport, api) = test_api();

        api.upload_asset("doc.txt", 7, 3, 11, "AAECAw==")
            .await
            .unwrap();

        assert_eq!(transport.calls()[0].0, "/asset/Upload");
        assert_eq!(
            transport.calls()[0].1,
            json!({
                "newName": "doc.txt",
                "destinationFolderId": 7,
                "modelId": 3,
                "workflowId": 11,
                "bytes": "AAECAw==",
            })
        );
    }

    #[tokio::test]
    async fn test_create_asset_refuses_root_without_network() {
        let (transport, api) = test_api();

        let err = api
            .create_asset("doc.txt", 0, 3, ASSET_TYPE_FILE)
            .await
            .unwrap_err();

        assert!(matches!(err, CrownpeakError::Validation { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_asset_payload_and_envelope() {
        let (transport, api) = test_api();
        transport.push_response(json!({"asset": {"id": 55, "label": "doc.txt"}}));

        let created = api
            .create_asset("doc.txt", 7, 3, ASSET_TYPE_FILE)
            .await
            .unwrap();

        assert_eq!(created.id, 55);
        let calls = transport.calls();
        assert_eq!(calls[0].0, "/asset/Create");
        assert_eq!(
            calls[0].1,
            json!({
                "newName": "doc.txt",
                "destinationFolderId": 7,
                "modelId": 3,
                "type": 2,
            })
        );
    }

    #[tokio::test]
    async fn test_unlock_payload() {
        let (transport, api) = test_api();

        api.unlock_asset(9).await.unwrap();

        assert_eq!(transport.calls()[0].0, "/asset/unlock");
        assert_eq!(
            transport.calls()[0].1,
            json!({"assetIds": [9], "forceUnlock": true})
        );
    }

    #[tokio::test]
    async fn test_update_payload_carries_hook_flags() {
        let (transport, api) = test_api();
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("Welcome"));

        api.update_asset(42, &fields).await.unwrap();

        assert_eq!(transport.calls()[0].0, "/Asset/Update");
        assert_eq!(
            transport.calls()[0].1,
            json!({
                "assetId": 42,
                "fields": {"title": "Welcome"},
                "fieldsToDelete": [],
                "fieldToDelete": "",
                "runPostInput": true,
                "runPostSave": true,
            })
        );
    }

    #[tokio::test]
    async fn test_branch_path_and_envelope() {
        let (transport, api) = test_api();
        transport.push_response(json!({"asset": {"id": 90, "branchId": 42}}));

        let branched = api.branch_asset(42).await.unwrap();

        assert_eq!(branched.id, 90);
        assert_eq!(transport.calls()[0].0, "/Asset/Branch/42");
        assert_eq!(transport.calls()[0].1, json!({}));
    }

    #[tokio::test]
    async fn test_prepare_upload_extracts_ticket() {
        let (transport, api) = test_api();
        transport.push_response(json!({"uploadTicket": "ticket-123"}));

        let ticket = api.prepare_upload(42, "doc.txt", 3, 10).await.unwrap();

        assert_eq!(ticket.as_str(), "ticket-123");
        assert_eq!(transport.calls()[0].0, "/upload/assetprepare");
        assert_eq!(
            transport.calls()[0].1,
            json!({
                "destinationId": 42,
                "label": "doc.txt",
                "totalSize": 10,
                "modelId": 3,
            })
        );
    }

    #[tokio::test]
    async fn test_prepare_upload_missing_ticket_is_error() {
        let (transport, api) = test_api();
        transport.push_response(json!({"resultCode": "conWS_Error"}));

        let err = api.prepare_upload(42, "doc.txt", 3, 10).await.unwrap_err();

        assert!(matches!(err, CrownpeakError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_bytes_payload_keeps_null_slots() {
        let (transport, api) = test_api();
        let ticket = UploadTicket::new("ticket-1");

        api.upload_bytes("AAECAw==", &ticket).await.unwrap();

        assert_eq!(transport.calls()[0].0, "/upload/bytes");
        assert_eq!(
            transport.calls()[0].1,
            json!({
                "bytes": "AAECAw==",
                "base64": null,
                "checksum": null,
                "uploadTicket": "ticket-1",
            })
        );
    }

    #[tokio::test]
    async fn test_complete_payload_consumes_ticket() {
        let (transport, api) = test_api();
        let ticket = UploadTicket::new("ticket-1");

        api.complete_upload(42, "doc.txt", 3, ticket).await.unwrap();

        assert_eq!(transport.calls()[0].0, "/upload/assetcomplete");
        assert_eq!(
            transport.calls()[0].1,
            json!({
                "destinationId": 42,
                "label": "doc.txt",
                "modelId": 3,
                "uploadTicket": "ticket-1",
            })
        );
    }

    #[tokio::test]
    async fn test_workflow_command_payload() {
        let (transport, api) = test_api();

        api.execute_workflow_command(42, 7).await.unwrap();

        assert_eq!(transport.calls()[0].0, "/asset/executeworkflowcommand");
        assert_eq!(
            transport.calls()[0].1,
            json!({"assetId": 42, "commandId": 7, "skipDependencies": true})
        );
    }

    #[tokio::test]
    async fn test_read_asset_unwraps_envelope() {
        let (transport, api) = test_api();
        transport.push_response(json!({
            "asset": {"id": 42, "createdBy": "Zink Bot", "status": 880}
        }));

        let asset = api.read_asset(42).await.unwrap();

        assert_eq!(asset.id, 42);
        assert_eq!(asset.status, 880);
        assert_eq!(transport.calls()[0].0, "/asset/read/42");
        assert_eq!(transport.calls()[0].1, json!({}));
    }

    #[tokio::test]
    async fn test_delete_refuses_foreign_creator_after_read() {
        let (transport, api) = test_api();
        transport.push_response(json!({
            "asset": {"id": 42, "createdBy": "Alice Admin"}
        }));

        let err = api.delete_asset(42).await.unwrap_err();

        assert!(matches!(err, CrownpeakError::Permission { .. }));
        // the read went out, the delete never did
        assert_eq!(transport.paths(), vec!["/asset/read/42"]);
    }

    #[tokio::test]
    async fn test_delete_of_bot_created_asset_proceeds() {
        let (transport, api) = test_api();
        transport.push_response(json!({
            "asset": {"id": 42, "createdBy": "Zink Bot"}
        }));
        transport.push_response(json!({"deleted": true}));

        api.delete_asset(42).await.unwrap();

        assert_eq!(
            transport.paths(),
            vec!["/asset/read/42", "/asset/delete/42"]
        );
    }

    #[tokio::test]
    async fn test_route_payload() {
        let (transport, api) = test_api();

        api.route_assets(&[42], 7).await.unwrap();

        assert_eq!(transport.calls()[0].0, "/asset/routeassets");
        assert_eq!(
            transport.calls()[0].1,
            json!({
                "list": [42],
                "stateId": 7,
                "stateChangeCheck": false,
                "publishDependencies": false,
            })
        );
    }

    #[tokio::test]
    async fn test_folder_contents_extracts_results() {
        let (transport, api) = test_api();
        transport.push_response(json!({
            "searchResults": [
                {"id": 1, "label": "a.txt"},
                {"id": 2, "label": "b.txt"},
            ]
        }));

        let contents = api.folder_contents(99).await.unwrap();

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].label, "a.txt");
        let body = &transport.calls()[0].1;
        assert_eq!(body["baseAssetId"], json!(99));
        assert_eq!(body["limit"], json!(15000));
    }

    #[tokio::test]
    async fn test_asset_content_decoding() {
        let (transport, api) = test_api();
        transport.push_response(json!({
            "fields": [{"name": "title", "value": "Welcome"}]
        }));

        let content = api.asset_content(42).await.unwrap();

        assert_eq!(content.field("title"), Some("Welcome"));
        assert_eq!(transport.calls()[0].0, "/asset/fields/42");
    }
}
