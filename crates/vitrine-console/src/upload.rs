//! Upload coordination
//!
//! [`UploadCoordinator`] turns a [`PendingUpload`] into an [`AssetReference`]
//! through an [`AssetUploader`]. Every form session gets its own coordinator,
//! which allows a single upload in flight for that form. A concurrent call is
//! refused instead of queued.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use vitrine_api_client::{ApiClient, ProgressFn};
use vitrine_core::models::{AssetReference, MediaKind};

use crate::error::UploadError;
use crate::session::PendingUpload;

/// Moves binary content to the asset store.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    async fn upload(
        &self,
        media: MediaKind,
        file: &PendingUpload,
        on_progress: Option<ProgressFn>,
    ) -> Result<AssetReference, UploadError>;
}

#[async_trait]
impl AssetUploader for ApiClient {
    async fn upload(
        &self,
        media: MediaKind,
        file: &PendingUpload,
        on_progress: Option<ProgressFn>,
    ) -> Result<AssetReference, UploadError> {
        Ok(self
            .upload_asset(media, &file.to_upload_file(), on_progress)
            .await?)
    }
}

pub struct UploadCoordinator {
    uploader: Arc<dyn AssetUploader>,
    in_flight: AtomicBool,
}

impl Debug for UploadCoordinator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UploadCoordinator")
            .field("in_flight", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag when the upload future completes or is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UploadCoordinator {
    pub fn new(uploader: Arc<dyn AssetUploader>) -> Self {
        Self {
            uploader,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Upload `file` to the `media` endpoint.
    ///
    /// Resolves exactly once. The file content is only borrowed for the length
    /// of the call.
    pub async fn upload(
        &self,
        file: &PendingUpload,
        media: MediaKind,
        on_progress: Option<ProgressFn>,
    ) -> Result<AssetReference, UploadError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!(media = %media, "Upload refused: another upload is in flight");
            return Err(UploadError::AlreadyInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        tracing::info!(
            media = %media,
            content_type = %file.content_type,
            bytes = file.len(),
            "Starting asset upload"
        );

        match self.uploader.upload(media, file, on_progress).await {
            Ok(reference) => {
                tracing::info!(media = %media, reference = %reference, "Asset uploaded");
                Ok(reference)
            }
            Err(e) => {
                tracing::warn!(media = %media, error = %e, "Asset upload failed");
                Err(e)
            }
        }
    }
}
