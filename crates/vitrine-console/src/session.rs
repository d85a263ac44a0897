//! Form session state
//!
//! A [`FormSession`] is the mutable state of one open create or edit form. It
//! is owned by a single `SubmissionController` and only mutated through it.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;
use vitrine_api_client::UploadFile;
use vitrine_core::models::{Resource, ResourceKind};
use vitrine_core::validation::{check_content_type, FieldErrors, RawInput};

use crate::upload::{AssetUploader, UploadCoordinator};

const UNNAMED_FILE_PLACEHOLDER: &str = "selected file";

/// Identity of one open form; used to drop late continuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Where a submission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    UploadingAsset,
    Persisting,
    Succeeded,
    Failed,
}

impl Display for SubmitPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            SubmitPhase::Idle => "idle",
            SubmitPhase::Validating => "validating",
            SubmitPhase::UploadingAsset => "uploading",
            SubmitPhase::Persisting => "persisting",
            SubmitPhase::Succeeded => "succeeded",
            SubmitPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A locally selected file that has not been uploaded yet.
///
/// `data` is a shared buffer; cloning a pending upload does not copy the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub data: Bytes,
    pub content_type: String,
    pub label: Option<String>,
}

impl PendingUpload {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Value put in the asset field until the real reference exists.
    pub fn placeholder(&self) -> &str {
        self.label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(UNNAMED_FILE_PLACEHOLDER)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn to_upload_file(&self) -> UploadFile {
        UploadFile {
            data: self.data.clone(),
            content_type: self.content_type.clone(),
            file_name: self.label.clone(),
        }
    }
}

#[derive(Debug)]
pub struct FormSession {
    pub(crate) id: SessionId,
    pub(crate) kind: ResourceKind,
    pub(crate) editing: Option<Resource>,
    pub(crate) input: RawInput,
    pub(crate) pending: Option<PendingUpload>,
    pub(crate) errors: FieldErrors,
    pub(crate) submitting: bool,
    pub(crate) progress: u8,
    pub(crate) phase: SubmitPhase,
    pub(crate) notice: Option<String>,
    /// Upload guard of this form only; a discarded form keeps its own.
    pub(crate) uploads: Arc<UploadCoordinator>,
}

impl FormSession {
    pub(crate) fn create(kind: ResourceKind, uploader: Arc<dyn AssetUploader>) -> Self {
        Self {
            id: SessionId::new(),
            kind,
            editing: None,
            input: RawInput::new(),
            pending: None,
            errors: FieldErrors::new(),
            submitting: false,
            progress: 0,
            phase: SubmitPhase::Idle,
            notice: None,
            uploads: Arc::new(UploadCoordinator::new(uploader)),
        }
    }

    /// Edit form pre-populated from `resource`. A record without an id can
    /// only be re-created, so it opens as a pre-filled create form.
    pub(crate) fn edit(resource: Resource, uploader: Arc<dyn AssetUploader>) -> Self {
        let mut session = Self::create(resource.kind(), uploader);
        session.input = RawInput::from_resource(&resource);
        if resource.id().is_some() {
            session.editing = Some(resource);
        }
        session
    }

    pub(crate) fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().and_then(Resource::id)
    }

    pub(crate) fn set_field(&mut self, field: &str, value: String) {
        if field == self.kind.asset_field() {
            // an explicitly entered reference replaces any selected file
            self.pending = None;
        }
        self.input.set(field, value);
        self.touch();
    }

    /// Attach `file` after checking it against the content type allow-list.
    pub(crate) fn select_file(&mut self, file: PendingUpload) -> Result<(), FieldErrors> {
        let asset_field = self.kind.asset_field();
        if let Err(e) = check_content_type(self.kind.media_kind(), &file.content_type) {
            let errors = FieldErrors::single(asset_field, e.to_string());
            self.errors = errors.clone();
            return Err(errors);
        }

        self.input.set(asset_field, file.placeholder());
        self.pending = Some(file);
        self.touch();
        Ok(())
    }

    /// Drop the selected file; edit forms fall back to the persisted asset.
    pub(crate) fn clear_file(&mut self) {
        self.pending = None;
        let original = self
            .editing
            .as_ref()
            .map(|resource| resource.asset_reference().to_string())
            .unwrap_or_default();
        self.input.set(self.kind.asset_field(), original);
        self.touch();
    }

    fn touch(&mut self) {
        if matches!(self.phase, SubmitPhase::Failed | SubmitPhase::Succeeded) {
            self.phase = SubmitPhase::Idle;
        }
        self.errors.clear();
        self.notice = None;
    }

    pub(crate) fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            kind: self.kind,
            phase: self.phase,
            editing_id: self.editing_id().map(str::to_string),
            input: self.input.clone(),
            errors: self.errors.clone(),
            submitting: self.submitting,
            upload_progress: self.progress,
            pending_label: self.pending.as_ref().map(|p| p.placeholder().to_string()),
            notice: self.notice.clone(),
        }
    }
}

/// Read-only snapshot of a form session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub id: SessionId,
    pub kind: ResourceKind,
    pub phase: SubmitPhase,
    pub editing_id: Option<String>,
    pub input: RawInput,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub upload_progress: u8,
    pub pending_label: Option<String>,
    pub notice: Option<String>,
}
