//! In-memory doubles for the record store and the asset uploader
//!
//! Both record every call so tests can assert on what would have gone over the
//! network, and both can be told to fail.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use vitrine_api_client::ProgressFn;
use vitrine_console::{
    AssetUploader, PendingUpload, PersistenceError, RecordStore, UploadCause, UploadError,
};
use vitrine_core::models::{AssetReference, MediaKind, Resource, ResourceKind};
use vitrine_core::validation::NormalizedFields;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List(ResourceKind),
    Create(NormalizedFields),
    Update(String, NormalizedFields),
    Delete(ResourceKind, String),
}

#[derive(Clone, Default)]
pub struct MockStore {
    records: Arc<Mutex<Vec<Resource>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    persist_error: Arc<Mutex<Option<PersistenceError>>>,
    list_error: Arc<Mutex<Option<PersistenceError>>>,
    next_id: Arc<AtomicUsize>,
    persist_gate: Arc<Mutex<Option<Arc<Notify>>>>,
    list_gate: Arc<Mutex<Option<Arc<Notify>>>>,
    held: Arc<Notify>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Resource>) -> Self {
        let store = Self::new();
        *store.records.lock().unwrap() = records;
        store
    }

    /// Make every create/update fail with `err`.
    pub fn fail_persist(&self, err: PersistenceError) {
        *self.persist_error.lock().unwrap() = Some(err);
    }

    /// Stop failing create/update calls.
    pub fn recover(&self) {
        *self.persist_error.lock().unwrap() = None;
    }

    pub fn fail_list(&self, err: PersistenceError) {
        *self.list_error.lock().unwrap() = Some(err);
    }

    pub fn add_record(&self, resource: Resource) {
        self.records.lock().unwrap().push(resource);
    }

    /// Hold the next create/update until the returned handle is notified.
    pub fn hold_next_persist(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.persist_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold the next list call until the returned handle is notified. The
    /// records it returns are read before it waits.
    pub fn hold_next_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Notified once a held call is waiting.
    pub fn held(&self) -> Arc<Notify> {
        self.held.clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Create and update calls, in order.
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, StoreCall::Create(_) | StoreCall::Update(..)))
            .collect()
    }

    pub fn records(&self) -> Vec<Resource> {
        self.records.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn wait_if_held(&self, gate: &Mutex<Option<Arc<Notify>>>) {
        let gate = gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.held.notify_one();
            gate.notified().await;
        }
    }

    fn persist_error(&self) -> Option<PersistenceError> {
        self.persist_error.lock().unwrap().clone()
    }

    fn to_resource(id: &str, fields: &NormalizedFields) -> Result<Resource, PersistenceError> {
        let mut value = serde_json::to_value(fields)
            .map_err(|e| PersistenceError::MalformedResponse(e.to_string()))?;
        value["_id"] = serde_json::Value::String(id.to_string());
        Resource::from_json(fields.kind(), value)
            .map_err(|e| PersistenceError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>, PersistenceError> {
        self.record(StoreCall::List(kind));
        let listed = match self.list_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(self
                .records()
                .into_iter()
                .filter(|resource| resource.kind() == kind)
                .collect()),
        };
        self.wait_if_held(&self.list_gate).await;
        listed
    }

    async fn create(&self, fields: &NormalizedFields) -> Result<Resource, PersistenceError> {
        self.record(StoreCall::Create(fields.clone()));
        self.wait_if_held(&self.persist_gate).await;
        if let Some(err) = self.persist_error() {
            return Err(err);
        }
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let resource = Self::to_resource(&id, fields)?;
        self.records.lock().unwrap().push(resource.clone());
        Ok(resource)
    }

    async fn update(
        &self,
        id: &str,
        fields: &NormalizedFields,
    ) -> Result<Resource, PersistenceError> {
        self.record(StoreCall::Update(id.to_string(), fields.clone()));
        self.wait_if_held(&self.persist_gate).await;
        if let Some(err) = self.persist_error() {
            return Err(err);
        }
        let resource = Self::to_resource(id, fields)?;
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id() == Some(id)) {
            Some(existing) => {
                *existing = resource.clone();
                Ok(resource)
            }
            None => Err(PersistenceError::Rejected {
                status: 404,
                message: "Record not found".to_string(),
                field: None,
            }),
        }
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), PersistenceError> {
        self.record(StoreCall::Delete(kind, id.to_string()));
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id() != Some(id));
        if records.len() == before {
            return Err(PersistenceError::Rejected {
                status: 404,
                message: "Record not found".to_string(),
                field: None,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UploadCall {
    pub media: MediaKind,
    pub bytes: usize,
    pub content_type: String,
}

#[derive(Clone)]
pub struct MockUploader {
    outcome: Arc<Mutex<Result<String, UploadCause>>>,
    calls: Arc<Mutex<Vec<UploadCall>>>,
    started: Arc<Notify>,
    gate: Option<Arc<Notify>>,
}

impl MockUploader {
    pub fn succeeding(reference: &str) -> Self {
        Self::with_outcome(Ok(reference.to_string()))
    }

    pub fn failing(cause: UploadCause) -> Self {
        Self::with_outcome(Err(cause))
    }

    fn with_outcome(outcome: Result<String, UploadCause>) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            calls: Arc::new(Mutex::new(Vec::new())),
            started: Arc::new(Notify::new()),
            gate: None,
        }
    }

    /// Hold every upload until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Notified once an upload has begun.
    pub fn started(&self) -> Arc<Notify> {
        self.started.clone()
    }

    pub fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetUploader for MockUploader {
    async fn upload(
        &self,
        media: MediaKind,
        file: &PendingUpload,
        on_progress: Option<ProgressFn>,
    ) -> Result<AssetReference, UploadError> {
        self.calls.lock().unwrap().push(UploadCall {
            media,
            bytes: file.len(),
            content_type: file.content_type.clone(),
        });
        if let Some(callback) = &on_progress {
            callback(0);
            callback(50);
        }
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            Ok(reference) => {
                if let Some(callback) = &on_progress {
                    callback(100);
                }
                Ok(AssetReference::new(reference))
            }
            Err(cause) => Err(UploadError::new(cause, "mock upload failure")),
        }
    }
}
