//! Asset data models for the Crownpeak Access API.
//!
//! The remote service describes every content item (files and folders
//! alike) with one record type. Its JSON mixes `snake_case` and
//! `camelCase` field names, so the mapping here is field-by-field rather
//! than a blanket rename rule. Only the fields the SDK consumes are
//! modelled; the remote sends many more, and unknown fields are ignored
//! on decode.

use serde::{Deserialize, Serialize};

/// Asset type discriminator for regular file assets.
pub const ASSET_TYPE_FILE: i64 = 2;

/// Asset type discriminator for folder assets.
pub const ASSET_TYPE_FOLDER: i64 = 4;

/// A content item as described by the remote service.
///
/// Returned by `read`, `branch` and `create` envelopes (under an `asset`
/// key) and by search results. Partial envelopes are common, so every
/// field falls back to its default when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsAsset {
    /// Unique asset id.
    pub id: i64,
    /// Display label (file or folder name).
    pub label: String,
    /// Type discriminator; see [`ASSET_TYPE_FILE`] and
    /// [`ASSET_TYPE_FOLDER`].
    #[serde(rename = "type")]
    pub asset_type: i64,
    /// Id of the containing folder.
    pub folder_id: i64,
    /// Id of the workflow the asset is bound to.
    pub workflow_id: i64,
    /// Current workflow status id.
    pub status: i64,
    /// Human-readable name of the workflow status.
    #[serde(rename = "statusName")]
    pub status_name: String,
    /// Id of the branch lineage this asset belongs to.
    #[serde(rename = "branchId")]
    pub branch_id: i64,
    /// Model the asset was created from.
    pub model_id: i64,
    /// Template bound to the asset.
    pub template_id: i64,
    /// Display name of the creating user.
    #[serde(rename = "createdBy")]
    pub created_by: String,
    /// Display name of the last modifying user.
    #[serde(rename = "modifiedBy")]
    pub modified_by: String,
    /// Creation timestamp, as the service renders it.
    pub create_date: String,
    /// Last-modification timestamp, as the service renders it.
    pub modified_date: String,
    /// Size of the stored content in bytes.
    pub size: i64,
    /// File extension, without the dot.
    pub extension: String,
    /// Full CMS path of the asset.
    #[serde(rename = "fullPath")]
    pub full_path: String,
}

impl CmsAsset {
    /// True when the type discriminator marks a folder.
    pub fn is_folder(&self) -> bool {
        self.asset_type == ASSET_TYPE_FOLDER
    }

    /// True when the type discriminator marks a regular file.
    pub fn is_file(&self) -> bool {
        self.asset_type == ASSET_TYPE_FILE
    }
}

/// One named content field of an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

/// The content fields of an asset, as returned by the fields endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetContent {
    pub fields: Vec<FieldValue>,
}

impl AssetContent {
    /// Looks up a field value by name. The service can repeat a name; the
    /// first occurrence wins.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_asset_decodes_mixed_case_wire_names() {
        let asset: CmsAsset = serde_json::from_value(json!({
            "id": 42,
            "label": "doc.txt",
            "type": 2,
            "folder_id": 7,
            "workflow_id": 3,
            "status": 880,
            "statusName": "Live",
            "branchId": 42,
            "createdBy": "Zink Bot",
            "modifiedBy": "Zink Bot",
            "create_date": "2023-01-10T12:00:00",
            "fullPath": "/Site/docs/doc.txt",
        }))
        .unwrap();

        assert_eq!(asset.id, 42);
        assert_eq!(asset.label, "doc.txt");
        assert_eq!(asset.asset_type, ASSET_TYPE_FILE);
        assert_eq!(asset.folder_id, 7);
        assert_eq!(asset.status, 880);
        assert_eq!(asset.status_name, "Live");
        assert_eq!(asset.branch_id, 42);
        assert_eq!(asset.created_by, "Zink Bot");
        assert_eq!(asset.full_path, "/Site/docs/doc.txt");
    }

    #[test]
    fn test_asset_tolerates_partial_envelope() {
        // search results carry far fewer fields than a full read
        let asset: CmsAsset = serde_json::from_value(json!({
            "id": 9,
            "status": 779,
        }))
        .unwrap();

        assert_eq!(asset.id, 9);
        assert_eq!(asset.status, 779);
        assert_eq!(asset.label, "");
        assert_eq!(asset.folder_id, 0);
    }

    #[test]
    fn test_asset_ignores_unknown_fields() {
        let asset: CmsAsset = serde_json::from_value(json!({
            "id": 5,
            "taskCount": 3,
            "permissionList": "rw",
            "isWcoIntegrated": false,
        }))
        .unwrap();

        assert_eq!(asset.id, 5);
    }

    #[test]
    fn test_type_discriminators() {
        let folder = CmsAsset {
            asset_type: ASSET_TYPE_FOLDER,
            ..Default::default()
        };
        assert!(folder.is_folder());
        assert!(!folder.is_file());

        let file = CmsAsset {
            asset_type: ASSET_TYPE_FILE,
            ..Default::default()
        };
        assert!(file.is_file());
        assert!(!file.is_folder());
    }

    #[test]
    fn test_content_field_lookup() {
        let content: AssetContent = serde_json::from_value(json!({
            "fields": [
                {"name": "title", "value": "Welcome"},
                {"name": "body", "value": "<p>hello</p>"},
                {"name": "title", "value": "shadowed"},
            ]
        }))
        .unwrap();

        assert_eq!(content.field("title"), Some("Welcome"));
        assert_eq!(content.field("body"), Some("<p>hello</p>"));
        assert_eq!(content.field("missing"), None);
    }
}
