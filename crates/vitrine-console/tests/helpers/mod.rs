//! Test helpers: in-memory store and uploader doubles plus record fixtures.
//!
//! Run from workspace root: `cargo test -p vitrine-console`.

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::sync::Arc;

use vitrine_console::{ResourceCollectionCache, SubmissionController};
use vitrine_core::models::ResourceKind;

use mocks::{MockStore, MockUploader};

/// A controller wired to the given doubles, with its own cache.
pub fn controller(
    kind: ResourceKind,
    store: &MockStore,
    uploader: &MockUploader,
) -> (SubmissionController, Arc<ResourceCollectionCache>) {
    let store = Arc::new(store.clone());
    let cache = Arc::new(ResourceCollectionCache::new(kind, store.clone()));
    (
        SubmissionController::new(kind, Arc::new(uploader.clone()), store, cache.clone()),
        cache,
    )
}
