//! Client-side content type allow-list.
//!
//! This is a convenience pre-filter for the file picker. The upload endpoints
//! do their own checks.

use std::path::Path;

use crate::models::MediaKind;

const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];
const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4", "video/x-msvideo", "video/x-matroska"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MimeError {
    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    NotAllowed {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Cannot determine content type of {0}")]
    UnknownExtension(String),
}

pub fn allowed_content_types(media: MediaKind) -> &'static [&'static str] {
    match media {
        MediaKind::Image => IMAGE_CONTENT_TYPES,
        MediaKind::Video => VIDEO_CONTENT_TYPES,
    }
}

/// Accept `content_type` (case-insensitive, parameters ignored) for `media`.
pub fn check_content_type(media: MediaKind, content_type: &str) -> Result<(), MimeError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    let allowed = allowed_content_types(media);
    if allowed.iter().any(|ct| *ct == essence) {
        Ok(())
    } else {
        Err(MimeError::NotAllowed {
            content_type: content_type.to_string(),
            allowed: allowed.iter().map(|ct| ct.to_string()).collect(),
        })
    }
}

/// Guess a content type from a file extension.
pub fn content_type_for_path(path: &Path) -> Result<&'static str, MimeError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MimeError::UnknownExtension(path.display().to_string()))?;

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "gif" => Ok("image/gif"),
        "mp4" => Ok("video/mp4"),
        "avi" => Ok("video/x-msvideo"),
        "mkv" => Ok("video/x-matroska"),
        _ => Err(MimeError::UnknownExtension(path.display().to_string())),
    }
}
