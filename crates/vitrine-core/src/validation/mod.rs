//! Validation modules
//!
//! `schema` checks raw form input per resource kind, `mime` holds the
//! client-side allow-list applied when a file is selected.

pub mod mime;
pub mod schema;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::models::{fields, AssetReference, MediaCategory, Resource, ResourceKind};

pub use mime::{check_content_type, content_type_for_path, MimeError};
pub use schema::{validate, MIN_TITLE_LENGTH};

/// Raw form values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput(BTreeMap<String, String>);

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Input pre-populated from a persisted record, for edit mode.
    pub fn from_resource(resource: &Resource) -> Self {
        match resource {
            Resource::Item(item) => Self::new()
                .with(fields::TITLE, item.title.clone())
                .with(fields::DESCRIPTION, item.description.clone())
                .with(fields::IMG_URL, item.img_url.clone()),
            Resource::MediaEntry(entry) => Self::new()
                .with(fields::CATEGORY, entry.category.as_str())
                .with(fields::VIDEO_URL, entry.video_url.clone()),
        }
    }
}

/// Validation messages keyed by field name, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFields {
    pub title: String,
    pub description: String,
    #[serde(rename = "imgUrl")]
    pub img_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaEntryFields {
    #[serde(rename = "type")]
    pub category: MediaCategory,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

/// Validated values, serialized as the create/update request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedFields {
    Item(ItemFields),
    MediaEntry(MediaEntryFields),
}

impl NormalizedFields {
    pub fn kind(&self) -> ResourceKind {
        match self {
            NormalizedFields::Item(_) => ResourceKind::Item,
            NormalizedFields::MediaEntry(_) => ResourceKind::MediaEntry,
        }
    }

    pub fn asset_reference(&self) -> &str {
        match self {
            NormalizedFields::Item(fields) => &fields.img_url,
            NormalizedFields::MediaEntry(fields) => &fields.video_url,
        }
    }

    /// Replace the placeholder (or previous reference) with an uploaded asset.
    pub fn set_asset_reference(&mut self, reference: AssetReference) {
        match self {
            NormalizedFields::Item(fields) => fields.img_url = reference.into_string(),
            NormalizedFields::MediaEntry(fields) => fields.video_url = reference.into_string(),
        }
    }
}
