//! Error types for the submission workflow.
//!
//! Upload and persistence failures keep their cause so the controller can tell
//! the operator what happened. `ErrorMetadata` decides the log level and the
//! notice shown for each of them.

use std::fmt::{Display, Formatter, Result as FmtResult};

use vitrine_api_client::ClientError;
use vitrine_core::models::ResourceKind;
use vitrine_core::validation::FieldErrors;
use vitrine_core::{ErrorMetadata, LogLevel};

/// Why an upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCause {
    /// Transport failure: connection refused, reset, timed out
    NetworkError,
    /// The upload endpoint answered with a non-2xx status
    ServerRejected,
    /// 2xx, but the body was not an asset reference
    MalformedResponse,
}

impl Display for UploadCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadCause::NetworkError => write!(f, "network error"),
            UploadCause::ServerRejected => write!(f, "server rejected"),
            UploadCause::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Asset upload failed ({cause}): {message}")]
    Failed { cause: UploadCause, message: String },

    #[error("An upload is already in flight for this form")]
    AlreadyInFlight,
}

impl UploadError {
    pub fn new(cause: UploadCause, message: impl Into<String>) -> Self {
        UploadError::Failed {
            cause,
            message: message.into(),
        }
    }

    pub fn cause(&self) -> Option<UploadCause> {
        match self {
            UploadError::Failed { cause, .. } => Some(*cause),
            UploadError::AlreadyInFlight => None,
        }
    }
}

impl From<ClientError> for UploadError {
    fn from(err: ClientError) -> Self {
        let cause = match &err {
            ClientError::Transport(_) => UploadCause::NetworkError,
            ClientError::Status { .. } => UploadCause::ServerRejected,
            ClientError::Decode(_) => UploadCause::MalformedResponse,
        };
        UploadError::new(cause, err.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PersistenceError {
    #[error("Could not reach the store: {0}")]
    Network(String),

    #[error("Store rejected the record ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        field: Option<String>,
    },

    #[error("Store returned an unexpected response: {0}")]
    MalformedResponse(String),
}

impl From<ClientError> for PersistenceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(e) => PersistenceError::Network(e.to_string()),
            ClientError::Status {
                status,
                message,
                field,
            } => PersistenceError::Rejected {
                status,
                message,
                field,
            },
            ClientError::Decode(msg) => PersistenceError::MalformedResponse(msg),
        }
    }
}

/// The list could not be re-fetched after a successful mutation. The mutation
/// itself stands.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to refresh the {kind} list: {source}")]
pub struct CacheRefreshError {
    pub kind: ResourceKind,
    #[source]
    pub source: PersistenceError,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Form has validation errors: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("No form is open")]
    NoSession,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Form was closed before the submission finished")]
    SessionDiscarded,

    #[error("Cannot open a {found} record in the {expected} form")]
    WrongKind {
        expected: ResourceKind,
        found: ResourceKind,
    },
}

impl ErrorMetadata for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            SubmitError::Validation(_) => "VALIDATION_ERROR",
            SubmitError::Upload(UploadError::AlreadyInFlight) => "UPLOAD_IN_FLIGHT",
            SubmitError::Upload(UploadError::Failed { cause, .. }) => match cause {
                UploadCause::NetworkError => "UPLOAD_NETWORK_ERROR",
                UploadCause::ServerRejected => "UPLOAD_REJECTED",
                UploadCause::MalformedResponse => "UPLOAD_MALFORMED_RESPONSE",
            },
            SubmitError::Persistence(PersistenceError::Network(_)) => "STORE_NETWORK_ERROR",
            SubmitError::Persistence(PersistenceError::Rejected { .. }) => "STORE_REJECTED",
            SubmitError::Persistence(PersistenceError::MalformedResponse(_)) => {
                "STORE_MALFORMED_RESPONSE"
            }
            SubmitError::NoSession => "NO_SESSION",
            SubmitError::AlreadySubmitting => "ALREADY_SUBMITTING",
            SubmitError::SessionDiscarded => "SESSION_DISCARDED",
            SubmitError::WrongKind { .. } => "WRONG_KIND",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SubmitError::Validation(_) | SubmitError::Upload(_) | SubmitError::Persistence(_)
        )
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            SubmitError::Validation(_) => Some("Fix the highlighted fields and submit again"),
            SubmitError::Upload(UploadError::AlreadyInFlight) => {
                Some("Wait for the current upload to finish")
            }
            SubmitError::Upload(_) => Some("Check the file and connection, then submit again"),
            SubmitError::Persistence(PersistenceError::Rejected { .. }) => {
                Some("Adjust the record and submit again")
            }
            SubmitError::Persistence(_) => Some("Submit again once the store is reachable"),
            SubmitError::AlreadySubmitting => Some("Wait for the current submission to finish"),
            SubmitError::NoSession | SubmitError::SessionDiscarded => {
                Some("Open the form again")
            }
            SubmitError::WrongKind { .. } => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            SubmitError::Validation(errors) => errors.to_string(),
            SubmitError::Upload(UploadError::AlreadyInFlight) => {
                "The file is still uploading.".to_string()
            }
            SubmitError::Upload(_) => "Failed to upload the file.".to_string(),
            SubmitError::Persistence(PersistenceError::Rejected { message, .. }) => {
                message.clone()
            }
            SubmitError::Persistence(_) => "Something went wrong, try again.".to_string(),
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            SubmitError::Validation(_) => LogLevel::Debug,
            SubmitError::Persistence(PersistenceError::Rejected { .. })
            | SubmitError::Upload(UploadError::AlreadyInFlight)
            | SubmitError::Upload(UploadError::Failed {
                cause: UploadCause::ServerRejected,
                ..
            }) => LogLevel::Warn,
            SubmitError::Upload(_) | SubmitError::Persistence(_) => LogLevel::Error,
            SubmitError::NoSession
            | SubmitError::AlreadySubmitting
            | SubmitError::SessionDiscarded
            | SubmitError::WrongKind { .. } => LogLevel::Warn,
        }
    }
}

/// Emit `err` at the level its metadata asks for.
pub(crate) fn log_submit_error(err: &SubmitError, session_id: &str) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(session_id, code, error = %err, "Submission failed"),
        LogLevel::Warn => tracing::warn!(session_id, code, error = %err, "Submission failed"),
        LogLevel::Error => tracing::error!(session_id, code, error = %err, "Submission failed"),
    }
}
