//! Advanced-search request building for the Access API.
//!
//! The search endpoint takes a page-window plus a list of filter
//! expressions. The wire format is fussy about details: property values
//! travel as strings under `value`, drop-down discriminators as numbers
//! under `valueDropDown`, and the unused slot must be absent from the
//! JSON rather than null. The constructors here produce exactly the
//! predicate shapes the SDK needs.

use crate::asset::{ASSET_TYPE_FOLDER, CmsAsset};
use serde::{Deserialize, Serialize};

/// Response shape requested from the search endpoint.
const RESPONSE_TYPE_WORKLIST: &str = "WorklistAsset";

/// Result cap for name-resolution searches.
const RESOLVE_LIMIT: i64 = 500;

/// Page size for name-resolution searches.
const RESOLVE_PAGE_SIZE: i64 = 50;

/// Result cap (and page size) for whole-folder listings.
const FOLDER_LISTING_LIMIT: i64 = 15000;

/// How a filter expression combines with the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalConnector {
    And,
    NotSet,
}

/// Comparison applied by a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperation {
    Equals,
    NotEquals,
}

/// One predicate of an advanced search.
///
/// `value` carries free-form property values (always stringified, even
/// for numeric properties like a folder id); `value_drop_down` carries
/// enumerated discriminators such as the asset type. Exactly one of the
/// two is set, and the other is omitted from the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExpression {
    pub filter_id: i64,
    pub logical: LogicalConnector,
    /// Bracketed display name of the property, e.g. `[Label]`.
    pub name: String,
    pub property_name: String,
    pub operation: FilterOperation,
    pub order_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_drop_down: Option<i64>,
}

impl FilterExpression {
    /// Predicate: asset label equals `label`. First in a chain, so it
    /// carries the `And` connector.
    pub fn label_equals(label: &str) -> Self {
        Self {
            filter_id: 0,
            logical: LogicalConnector::And,
            name: "[Label]".to_string(),
            property_name: "Label".to_string(),
            operation: FilterOperation::Equals,
            order_id: 1,
            value: Some(label.to_string()),
            value_drop_down: None,
        }
    }

    /// Predicate: containing folder equals `folder_id`. Chain terminator.
    pub fn folder_equals(folder_id: i64) -> Self {
        Self {
            filter_id: 0,
            logical: LogicalConnector::NotSet,
            name: "[FolderId]".to_string(),
            property_name: "FolderId".to_string(),
            operation: FilterOperation::Equals,
            order_id: 2,
            value: Some(folder_id.to_string()),
            value_drop_down: None,
        }
    }

    /// Predicate: asset type differs from `asset_type`.
    pub fn type_not_equals(asset_type: i64) -> Self {
        Self {
            filter_id: 0,
            logical: LogicalConnector::NotSet,
            name: "[Type]".to_string(),
            property_name: "Type".to_string(),
            operation: FilterOperation::NotEquals,
            order_id: 1,
            value: None,
            value_drop_down: Some(asset_type),
        }
    }
}

/// Request body for the advanced-search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub limit: i64,
    pub filter_expressions: Vec<FilterExpression>,
    /// Always null; the service applies its own ordering.
    pub sort_order: Option<String>,
    /// Root of the search; 0 searches the whole instance.
    pub base_asset_id: i64,
    /// Always null.
    pub additional_built_in_fields: Option<String>,
    pub response_type: String,
    pub page_number: i64,
    pub page_size: i64,
}

impl SearchRequest {
    /// Instance-wide lookup of assets named `label` inside `folder_id`.
    /// This is the query both name resolvers run.
    pub fn by_label_in_folder(label: &str, folder_id: i64) -> Self {
        Self {
            limit: RESOLVE_LIMIT,
            filter_expressions: vec![
                FilterExpression::label_equals(label),
                FilterExpression::folder_equals(folder_id),
            ],
            sort_order: None,
            base_asset_id: 0,
            additional_built_in_fields: None,
            response_type: RESPONSE_TYPE_WORKLIST.to_string(),
            page_number: 0,
            page_size: RESOLVE_PAGE_SIZE,
        }
    }

    /// Single-page listing of every non-folder asset under `folder_id`.
    /// The window is wide enough that pagination never kicks in for real
    /// folders.
    pub fn folder_listing(folder_id: i64) -> Self {
        Self {
            limit: FOLDER_LISTING_LIMIT,
            filter_expressions: vec![FilterExpression::type_not_equals(ASSET_TYPE_FOLDER)],
            sort_order: None,
            base_asset_id: folder_id,
            additional_built_in_fields: None,
            response_type: RESPONSE_TYPE_WORKLIST.to_string(),
            page_number: 0,
            page_size: FOLDER_LISTING_LIMIT,
        }
    }
}

/// Decoded envelope of a search call. Each hit is a partial asset record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    #[serde(rename = "searchResults")]
    pub search_results: Vec<CmsAsset>,
}
