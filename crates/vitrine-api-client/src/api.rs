//! Domain methods for the catalog store.

use std::sync::Arc;

use bytes::Bytes;
use vitrine_core::models::{AssetReference, MediaKind, Resource, ResourceKind};
use vitrine_core::validation::NormalizedFields;

use crate::progress::{tracked_body, ProgressFn, ProgressTracker};
use crate::{ApiClient, ClientError};

/// Binary to send to an upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ApiClient {
    /// List every record of `kind`.
    pub async fn list_resources(&self, kind: ResourceKind) -> Result<Vec<Resource>, ClientError> {
        let values: Vec<serde_json::Value> =
            self.get(&format!("/{}", kind.path_segment())).await?;

        values
            .into_iter()
            .map(|value| {
                Resource::from_json(kind, value).map_err(|e| ClientError::Decode(e.to_string()))
            })
            .collect()
    }

    /// Create a record from validated fields.
    pub async fn create_resource(
        &self,
        fields: &NormalizedFields,
    ) -> Result<Resource, ClientError> {
        let kind = fields.kind();
        let value: serde_json::Value = self
            .post_json(&format!("/{}", kind.path_segment()), fields)
            .await?;
        Resource::from_json(kind, value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Replace the fields of record `id`.
    pub async fn update_resource(
        &self,
        id: &str,
        fields: &NormalizedFields,
    ) -> Result<Resource, ClientError> {
        let kind = fields.kind();
        let value: serde_json::Value = self
            .put_json(&format!("/{}/{}", kind.path_segment(), id), fields)
            .await?;
        Resource::from_json(kind, value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Delete record `id` of `kind`.
    pub async fn delete_resource(&self, kind: ResourceKind, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/{}/{}", kind.path_segment(), id))
            .await
    }

    /// Upload a binary and return the store's reference to it.
    ///
    /// `on_progress` receives non-decreasing percentages while the body is sent
    /// and a final 100 once the store has accepted the file. Nothing is
    /// reported for an empty body.
    pub async fn upload_asset(
        &self,
        media: MediaKind,
        file: &UploadFile,
        on_progress: Option<ProgressFn>,
    ) -> Result<AssetReference, ClientError> {
        let total = file.data.len() as u64;
        let tracker = on_progress
            .and_then(|callback| ProgressTracker::new(total, callback))
            .map(Arc::new);

        let body = tracked_body(file.data.clone(), tracker.clone());
        let mut part = reqwest::multipart::Part::stream_with_length(body, total)
            .mime_str(&file.content_type)
            .map_err(ClientError::Transport)?;
        if let Some(name) = &file.file_name {
            part = part.file_name(name.clone());
        }
        let form = reqwest::multipart::Form::new().part(media.multipart_field(), part);

        tracing::debug!(
            media = %media,
            content_type = %file.content_type,
            bytes = total,
            "Uploading asset"
        );

        let reference: String = self.post_multipart(media.upload_path(), form).await?;
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ClientError::Decode(
                "upload response did not contain an asset reference".to_string(),
            ));
        }

        if let Some(tracker) = &tracker {
            tracker.finish();
        }

        Ok(AssetReference::new(reference))
    }
}
