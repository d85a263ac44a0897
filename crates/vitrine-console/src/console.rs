use std::sync::Arc;

use vitrine_api_client::ApiClient;
use vitrine_core::models::ResourceKind;
use vitrine_core::ConsoleConfig;

use crate::cache::ResourceCollectionCache;
use crate::store::RecordStore;
use crate::submission::SubmissionController;
use crate::upload::AssetUploader;

/// Wires the store client, one collection cache per resource kind, and the
/// submission controllers together.
pub struct Console {
    store: Arc<dyn RecordStore>,
    uploader: Arc<dyn AssetUploader>,
    items: Arc<ResourceCollectionCache>,
    media: Arc<ResourceCollectionCache>,
}

impl Console {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_backends(client.clone(), client)
    }

    pub fn with_backends(store: Arc<dyn RecordStore>, uploader: Arc<dyn AssetUploader>) -> Self {
        Self {
            items: Arc::new(ResourceCollectionCache::new(
                ResourceKind::Item,
                store.clone(),
            )),
            media: Arc::new(ResourceCollectionCache::new(
                ResourceKind::MediaEntry,
                store.clone(),
            )),
            store,
            uploader,
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let client = ApiClient::from_config(config)?;
        tracing::info!(api_url = %config.api_url, "Console connected");
        Ok(Self::new(Arc::new(client)))
    }

    /// The shared collection cache for `kind`.
    pub fn cache(&self, kind: ResourceKind) -> Arc<ResourceCollectionCache> {
        match kind {
            ResourceKind::Item => self.items.clone(),
            ResourceKind::MediaEntry => self.media.clone(),
        }
    }

    /// A controller for forms of `kind`. Each form it opens guards its own
    /// upload.
    pub fn controller(&self, kind: ResourceKind) -> SubmissionController {
        SubmissionController::new(
            kind,
            self.uploader.clone(),
            self.store.clone(),
            self.cache(kind),
        )
    }
}
