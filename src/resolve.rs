//! Idempotent name-to-id resolution for assets and folders.
//!
//! Both resolvers run the same label-in-folder search and then diverge.
//! Asset resolution reconciles on workflow status: a hit in the target
//! status is reused, while a hit in any other status is branched rather
//! than touched, because the live copy must stay as it is. Folder
//! resolution is strict: duplicate names under one parent are an error,
//! and only a missing folder is ever created.

use crate::api::AccessApi;
use crate::asset::{ASSET_TYPE_FILE, ASSET_TYPE_FOLDER};
use crate::error::{CrownpeakError, Result};
use crate::search::SearchRequest;
use std::sync::Arc;
use tracing::debug;

/// Resolves labels to asset ids, creating or branching as needed.
pub struct AssetResolver {
    api: Arc<AccessApi>,
}

impl AssetResolver {
    /// Creates a resolver over the shared operation catalog.
    pub fn new(api: Arc<AccessApi>) -> Self {
        Self { api }
    }

    /// Returns the id of the asset named `label` in `folder_id` that is
    /// in workflow status `status_id`.
    ///
    /// Search hits in another status are not reused; the first hit is
    /// branched and the branch id returned. With no hits at all, a fresh
    /// file asset is created from `model_id`.
    pub async fn get_or_create_asset_id(
        &self,
        label: &str,
        folder_id: i64,
        status_id: i64,
        model_id: i64,
    ) -> Result<i64> {
        let found = self
            .api
            .advanced_search(&SearchRequest::by_label_in_folder(label, folder_id))
            .await?;
        let results = found.search_results;

        if !results.is_empty() {
            for result in &results {
                if result.status == status_id {
                    debug!(label = %label, asset_id = result.id, "reusing asset in target status");
                    return Ok(result.id);
                }
            }

            // every hit is in the wrong status; continue on a branch of
            // the first one
            let branched = self.api.branch_asset(results[0].id).await?;
            debug!(label = %label, source = results[0].id, branch = branched.id, "no hit in target status, branched");
            return Ok(branched.id);
        }

        let created = self
            .api
            .create_asset(label, folder_id, model_id, ASSET_TYPE_FILE)
            .await?;
        debug!(label = %label, asset_id = created.id, "created missing asset");
        Ok(created.id)
    }

    /// Returns the id of the folder named `label` in `folder_id`,
    /// creating it from `model_id` when absent.
    ///
    /// Folder names must be unique under one parent; two hits mean the
    /// remote tree is in a state the resolver refuses to guess about.
    pub async fn get_or_create_folder_id(
        &self,
        label: &str,
        folder_id: i64,
        model_id: i64,
    ) -> Result<i64> {
        let found = self
            .api
            .advanced_search(&SearchRequest::by_label_in_folder(label, folder_id))
            .await?;
        let results = found.search_results;

        if results.len() > 1 {
            return Err(CrownpeakError::AmbiguousName {
                label: label.to_string(),
                folder_id,
            });
        }

        if let Some(existing) = results.first() {
            debug!(label = %label, folder = existing.id, "reusing existing folder");
            return Ok(existing.id);
        }

        let created = self
            .api
            .create_asset(label, folder_id, model_id, ASSET_TYPE_FOLDER)
            .await?;
        debug!(label = %label, folder = created.id, "created missing folder");
        Ok(created.id)
    }
}
