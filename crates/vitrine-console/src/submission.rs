//! Submission controller
//!
//! Runs one submit of an open form end to end: validation, the optional asset
//! upload, the create or update call, and the collection refresh. The steps
//! run strictly in that order and every await is guarded on the identity of
//! the session that started the submit, so a form closed mid-flight is never
//! written to by a late result.

use std::sync::{Arc, Mutex, MutexGuard};

use vitrine_api_client::ProgressFn;
use vitrine_core::models::{AssetReference, Resource, ResourceKind};
use vitrine_core::validation::{validate, NormalizedFields};
use vitrine_core::ErrorMetadata;

use crate::cache::ResourceCollectionCache;
use crate::error::{log_submit_error, CacheRefreshError, PersistenceError, SubmitError};
use crate::session::{FormSession, PendingUpload, SessionId, SessionView, SubmitPhase};
use crate::store::RecordStore;
use crate::upload::{AssetUploader, UploadCoordinator};

/// Result of a successful submit.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// The record as returned by the store
    pub resource: Resource,
    /// Reference of the asset uploaded during this submit, if any
    pub uploaded_asset: Option<AssetReference>,
    /// Set when the record was saved but the list could not be re-fetched
    pub cache_refresh_error: Option<CacheRefreshError>,
}

type SharedSession = Arc<Mutex<Option<FormSession>>>;

/// What one submit carries past the validation step.
struct Attempt {
    session_id: SessionId,
    fields: NormalizedFields,
    /// The selected file and the upload guard of the form it belongs to
    upload: Option<(PendingUpload, Arc<UploadCoordinator>)>,
    editing_id: Option<String>,
}

fn lock(state: &Mutex<Option<FormSession>>) -> MutexGuard<'_, Option<FormSession>> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct SubmissionController {
    kind: ResourceKind,
    uploader: Arc<dyn AssetUploader>,
    store: Arc<dyn RecordStore>,
    cache: Arc<ResourceCollectionCache>,
    state: SharedSession,
    on_progress: Option<ProgressFn>,
}

impl SubmissionController {
    pub fn new(
        kind: ResourceKind,
        uploader: Arc<dyn AssetUploader>,
        store: Arc<dyn RecordStore>,
        cache: Arc<ResourceCollectionCache>,
    ) -> Self {
        Self {
            kind,
            uploader,
            store,
            cache,
            state: Arc::new(Mutex::new(None)),
            on_progress: None,
        }
    }

    /// Forward upload progress of the open form to `on_progress`.
    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Open an empty create form, discarding any open one.
    pub fn open_create(&self) -> SessionId {
        self.replace_session(FormSession::create(self.kind, self.uploader.clone()))
    }

    /// Open an edit form pre-filled from `resource`, discarding any open one.
    pub fn open_edit(&self, resource: Resource) -> Result<SessionId, SubmitError> {
        if resource.kind() != self.kind {
            return Err(SubmitError::WrongKind {
                expected: self.kind,
                found: resource.kind(),
            });
        }
        Ok(self.replace_session(FormSession::edit(resource, self.uploader.clone())))
    }

    fn replace_session(&self, session: FormSession) -> SessionId {
        let id = session.id;
        if let Some(previous) = lock(&self.state).replace(session) {
            tracing::debug!(session_id = %previous.id, "Discarded open form");
        }
        tracing::debug!(session_id = %id, kind = %self.kind, "Form opened");
        id
    }

    /// Close the open form. An in-flight submit keeps running but its result
    /// no longer touches any form.
    pub fn close(&self) -> bool {
        match lock(&self.state).take() {
            Some(session) => {
                tracing::debug!(
                    session_id = %session.id,
                    submitting = session.submitting,
                    "Form closed"
                );
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> Option<SessionView> {
        lock(&self.state).as_ref().map(FormSession::view)
    }

    pub fn set_field(&self, field: &str, value: impl Into<String>) -> Result<(), SubmitError> {
        self.with_idle_session(|session| {
            session.set_field(field, value.into());
            Ok(())
        })
    }

    /// Attach a local file to the form's asset field.
    pub fn select_file(&self, file: PendingUpload) -> Result<(), SubmitError> {
        self.with_idle_session(|session| session.select_file(file).map_err(SubmitError::Validation))
    }

    pub fn clear_file(&self) -> Result<(), SubmitError> {
        self.with_idle_session(|session| {
            session.clear_file();
            Ok(())
        })
    }

    fn with_idle_session<T>(
        &self,
        f: impl FnOnce(&mut FormSession) -> Result<T, SubmitError>,
    ) -> Result<T, SubmitError> {
        let mut guard = lock(&self.state);
        let session = guard.as_mut().ok_or(SubmitError::NoSession)?;
        if session.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        f(session)
    }

    /// Submit the open form.
    ///
    /// Validation failures are recorded on the form and no request is made.
    /// Upload and persistence failures leave the form open for a retry.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let Attempt {
            session_id,
            mut fields,
            upload,
            editing_id,
        } = self.begin()?;

        let uploaded_asset = match upload {
            Some((file, uploads)) => {
                let reference = self.upload(session_id, &uploads, &file).await?;
                fields.set_asset_reference(reference.clone());
                Some(reference)
            }
            None => None,
        };

        self.advance(session_id, SubmitPhase::Persisting, uploaded_asset.as_ref())?;

        let persisted = match editing_id.as_deref() {
            Some(id) => self.store.update(id, &fields).await,
            None => self.store.create(&fields).await,
        };

        let resource = match persisted {
            Ok(resource) => resource,
            Err(e) => {
                if let Some(reference) = &uploaded_asset {
                    tracing::warn!(
                        session_id = %session_id,
                        asset_reference = %reference,
                        "Record not saved; uploaded asset is left unreferenced"
                    );
                }
                return Err(self.fail(session_id, SubmitError::Persistence(e)));
            }
        };

        self.succeed(session_id, &resource);

        let cache_refresh_error = self.cache.refresh().await.err();
        if let Some(e) = &cache_refresh_error {
            tracing::warn!(session_id = %session_id, error = %e, "Record saved but list refresh failed");
        }

        Ok(SubmitOutcome {
            resource,
            uploaded_asset,
            cache_refresh_error,
        })
    }

    /// Validate and mark the session as submitting.
    fn begin(&self) -> Result<Attempt, SubmitError> {
        let mut guard = lock(&self.state);
        let session = guard.as_mut().ok_or(SubmitError::NoSession)?;
        if session.submitting {
            tracing::warn!(session_id = %session.id, "Submit refused: already submitting");
            return Err(SubmitError::AlreadySubmitting);
        }

        session.phase = SubmitPhase::Validating;
        session.notice = None;
        let fields = match validate(self.kind, &session.input) {
            Ok(fields) => fields,
            Err(errors) => {
                session.errors = errors.clone();
                session.phase = SubmitPhase::Failed;
                let err = SubmitError::Validation(errors);
                log_submit_error(&err, &session.id.to_string());
                return Err(err);
            }
        };

        session.errors.clear();
        session.submitting = true;
        session.progress = 0;
        session.phase = if session.pending.is_some() {
            SubmitPhase::UploadingAsset
        } else {
            SubmitPhase::Persisting
        };

        tracing::info!(
            session_id = %session.id,
            kind = %self.kind,
            editing = session.editing_id().is_some(),
            with_upload = session.pending.is_some(),
            "Submitting record"
        );

        Ok(Attempt {
            session_id: session.id,
            fields,
            upload: session
                .pending
                .clone()
                .map(|file| (file, Arc::clone(&session.uploads))),
            editing_id: session.editing_id().map(str::to_string),
        })
    }

    async fn upload(
        &self,
        session_id: SessionId,
        uploads: &UploadCoordinator,
        file: &PendingUpload,
    ) -> Result<AssetReference, SubmitError> {
        let state = Arc::clone(&self.state);
        let forward = self.on_progress.clone();
        let on_progress: ProgressFn = Arc::new(move |percent| {
            let mut guard = lock(&state);
            let Some(session) = guard.as_mut().filter(|s| s.id == session_id) else {
                return;
            };
            session.progress = percent;
            drop(guard);
            if let Some(forward) = &forward {
                forward(percent);
            }
        });

        let result = uploads
            .upload(file, self.kind.media_kind(), Some(on_progress))
            .await;

        match result {
            Ok(reference) => Ok(reference),
            Err(e) => Err(self.fail(session_id, SubmitError::Upload(e))),
        }
    }

    /// Move the session to `phase`, or report that it was closed meanwhile.
    fn advance(
        &self,
        session_id: SessionId,
        phase: SubmitPhase,
        uploaded: Option<&AssetReference>,
    ) -> Result<(), SubmitError> {
        let mut guard = lock(&self.state);
        match guard.as_mut().filter(|s| s.id == session_id) {
            Some(session) => {
                session.phase = phase;
                Ok(())
            }
            None => {
                match uploaded {
                    Some(reference) => tracing::warn!(
                        session_id = %session_id,
                        asset_reference = %reference,
                        "Form closed during upload; uploaded asset is left unreferenced"
                    ),
                    None => tracing::debug!(session_id = %session_id, "Form closed during submit"),
                }
                Err(SubmitError::SessionDiscarded)
            }
        }
    }

    /// Record `err` on the session if it is still open, and hand it back.
    fn fail(&self, session_id: SessionId, err: SubmitError) -> SubmitError {
        log_submit_error(&err, &session_id.to_string());

        let mut guard = lock(&self.state);
        let Some(session) = guard.as_mut().filter(|s| s.id == session_id) else {
            tracing::debug!(session_id = %session_id, "Failure arrived after the form was closed");
            return match err {
                SubmitError::Upload(_) => SubmitError::SessionDiscarded,
                other => other,
            };
        };

        session.submitting = false;
        session.phase = SubmitPhase::Failed;
        session.notice = Some(err.client_message());
        if let SubmitError::Persistence(PersistenceError::Rejected {
            field: Some(field),
            message,
            ..
        }) = &err
        {
            session.errors.insert(field, message.clone());
        }
        err
    }

    fn succeed(&self, session_id: SessionId, resource: &Resource) {
        let mut guard = lock(&self.state);
        // a succeeded form is closed; a newer form opened meanwhile is kept
        if guard.as_ref().is_some_and(|s| s.id == session_id) {
            *guard = None;
        }
        tracing::info!(
            session_id = %session_id,
            kind = %self.kind,
            id = resource.id().unwrap_or_default(),
            "Record saved"
        );
    }
}
