//! Record persistence abstraction
//!
//! The submission controller and the collection caches only see this trait;
//! [`ApiClient`] is the production implementation.

use async_trait::async_trait;
use vitrine_api_client::ApiClient;
use vitrine_core::models::{Resource, ResourceKind};
use vitrine_core::validation::NormalizedFields;

use crate::error::PersistenceError;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record of `kind`, in store order
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>, PersistenceError>;

    /// Create a record; the kind is taken from `fields`
    async fn create(&self, fields: &NormalizedFields) -> Result<Resource, PersistenceError>;

    /// Replace the fields of record `id`
    async fn update(
        &self,
        id: &str,
        fields: &NormalizedFields,
    ) -> Result<Resource, PersistenceError>;

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), PersistenceError>;
}

#[async_trait]
impl RecordStore for ApiClient {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>, PersistenceError> {
        Ok(self.list_resources(kind).await?)
    }

    async fn create(&self, fields: &NormalizedFields) -> Result<Resource, PersistenceError> {
        Ok(self.create_resource(fields).await?)
    }

    async fn update(
        &self,
        id: &str,
        fields: &NormalizedFields,
    ) -> Result<Resource, PersistenceError> {
        Ok(self.update_resource(id, fields).await?)
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), PersistenceError> {
        Ok(self.delete_resource(kind, id).await?)
    }
}
