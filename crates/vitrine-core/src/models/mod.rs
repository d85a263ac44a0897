pub mod form;
pub mod resource;

/// Field names as they appear in form input and on the wire.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const IMG_URL: &str = "imgUrl";
    pub const CATEGORY: &str = "type";
    pub const VIDEO_URL: &str = "videoUrl";
}

pub use form::{form_layout, CustomField, FieldDescriptor, FieldKind};
pub use resource::{
    AssetReference, Item, MediaCategory, MediaEntry, MediaKind, Resource, ResourceKind,
};
