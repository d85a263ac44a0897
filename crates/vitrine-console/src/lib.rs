//! Vitrine Console
//!
//! The asset-backed submission workflow: a form session that may hold a
//! locally selected file, an upload coordinator that turns that file into an
//! asset reference, and a submission controller that validates, uploads,
//! persists and refreshes the list as one logical action.

pub mod cache;
pub mod console;
pub mod error;
pub mod session;
pub mod store;
pub mod submission;
pub mod upload;

pub use cache::ResourceCollectionCache;
pub use console::Console;
pub use error::{CacheRefreshError, PersistenceError, SubmitError, UploadCause, UploadError};
pub use session::{PendingUpload, SessionId, SessionView, SubmitPhase};
pub use store::RecordStore;
pub use submission::{SubmissionController, SubmitOutcome};
pub use upload::{AssetUploader, UploadCoordinator};
